//! 音频块定义.

/// 音频块
///
/// 从采样缓冲区复制出的一段连续帧, 独立拥有自己的字节.
/// 切块后只在加窗时原地修改一次, 之后只读.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 在切块序列中的位置 (从 0 开始)
    index: usize,
    /// 交错 PCM 字节
    data: Vec<u8>,
}

impl Chunk {
    /// 创建音频块
    pub fn new(index: usize, data: Vec<u8>) -> Self {
        Self { index, data }
    }

    /// 在切块序列中的位置
    pub fn index(&self) -> usize {
        self.index
    }

    /// 字节长度
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}
