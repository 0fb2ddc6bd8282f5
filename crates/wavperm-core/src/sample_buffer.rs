//! 交错 PCM 采样缓冲区.

use crate::audio_format::AudioFormat;
use crate::error::{PermError, PermResult};

/// 交错 PCM 帧的原始字节序列
///
/// 长度始终是帧大小的整数倍.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleBuffer {
    /// 原始字节
    data: Vec<u8>,
    /// 帧大小 (字节)
    frame_size: usize,
}

impl SampleBuffer {
    /// 从字节创建, 要求长度与帧大小对齐
    pub fn new(data: Vec<u8>, format: &AudioFormat) -> PermResult<Self> {
        let frame_size = format.frame_size();
        if frame_size == 0 || data.len() % frame_size != 0 {
            return Err(PermError::Usage(format!(
                "采样数据长度 {} 不是帧大小 {} 的整数倍",
                data.len(),
                frame_size
            )));
        }
        Ok(Self { data, frame_size })
    }

    /// 从字节创建, 丢弃末尾不足一帧的字节
    ///
    /// 返回缓冲区与被丢弃的字节数.
    pub fn from_truncated(mut data: Vec<u8>, format: &AudioFormat) -> (Self, usize) {
        let frame_size = format.frame_size().max(1);
        let dropped = data.len() % frame_size;
        data.truncate(data.len() - dropped);
        (Self { data, frame_size }, dropped)
    }

    /// 创建空缓冲区
    pub fn empty(format: &AudioFormat) -> Self {
        Self {
            data: Vec::new(),
            frame_size: format.frame_size(),
        }
    }

    /// 字节长度
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 帧数
    pub fn frames(&self) -> usize {
        if self.frame_size == 0 {
            0
        } else {
            self.data.len() / self.frame_size
        }
    }

    /// 帧大小 (字节)
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// 获取原始字节
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 消耗自身, 返回原始字节
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo16() -> AudioFormat {
        AudioFormat::new(44100, 16, 2).unwrap()
    }

    #[test]
    fn test_对齐数据创建() {
        let buf = SampleBuffer::new(vec![0u8; 12], &stereo16()).unwrap();
        assert_eq!(buf.len(), 12);
        assert_eq!(buf.frames(), 3);
        assert_eq!(buf.frame_size(), 4);
    }

    #[test]
    fn test_未对齐数据报错() {
        let err = SampleBuffer::new(vec![0u8; 10], &stereo16()).unwrap_err();
        assert!(matches!(err, PermError::Usage(_)));
    }

    #[test]
    fn test_截断末尾不完整帧() {
        let (buf, dropped) = SampleBuffer::from_truncated(vec![1u8; 10], &stereo16());
        assert_eq!(buf.len(), 8);
        assert_eq!(dropped, 2);
    }

    #[test]
    fn test_空缓冲区() {
        let buf = SampleBuffer::empty(&stereo16());
        assert!(buf.is_empty());
        assert_eq!(buf.frames(), 0);
    }
}
