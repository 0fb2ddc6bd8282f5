//! 切块器.
//!
//! 按节拍把采样缓冲区切成等长的十六分音符块:
//!
//! ```text
//! frames_per_chunk = floor(sample_rate × 240 / (16 × bpm))
//! offset_bytes     = floor(offset_ms / 1000 × sample_rate) × frame_size
//! ```
//!
//! 先丢弃开头 `offset_bytes` 字节, 再从头连续切出完整块, 末尾不足一块的部分丢弃.

use log::{debug, warn};
use wavperm_core::{AudioFormat, PermError, PermResult, SampleBuffer};

use crate::chunk::Chunk;

/// 一个全音符对应的秒数 × bpm (4 拍 × 60 秒)
const WHOLE_NOTE_BEAT_SECONDS: f64 = 240.0;
/// 每个全音符包含的十六分音符数
const SIXTEENTHS_PER_WHOLE_NOTE: f64 = 16.0;

/// 切块布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLayout {
    /// 每块帧数 (每声道采样数)
    pub frames_per_chunk: usize,
    /// 每块字节数
    pub bytes_per_chunk: usize,
    /// 开头跳过的字节数 (帧对齐)
    pub offset_bytes: usize,
}

impl ChunkLayout {
    /// 根据格式、节拍与偏移计算切块布局
    ///
    /// bpm 非正、非有限, 或使每块帧数为 0 时返回 [`PermError::Usage`].
    pub fn new(format: &AudioFormat, bpm: f64, offset_ms: u64) -> PermResult<Self> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(PermError::Usage(format!("bpm 必须为正数, 实际为 {bpm}")));
        }

        let sample_rate = f64::from(format.sample_rate);
        let frames = (sample_rate * WHOLE_NOTE_BEAT_SECONDS / (SIXTEENTHS_PER_WHOLE_NOTE * bpm))
            .floor();
        if frames < 1.0 {
            return Err(PermError::Usage(format!(
                "bpm={bpm} 过大: {} Hz 下每块采样数为 0",
                format.sample_rate
            )));
        }
        if frames > usize::MAX as f64 {
            return Err(PermError::Usage(format!("bpm={bpm} 过小: 块长度溢出")));
        }

        let frame_size = format.frame_size();
        let frames_per_chunk = frames as usize;
        let bytes_per_chunk = frames_per_chunk
            .checked_mul(frame_size)
            .ok_or_else(|| PermError::Usage(format!("bpm={bpm} 过小: 块长度溢出")))?;

        // 浮点到整数的转换会饱和, 超长偏移最终表现为丢弃全部数据
        let offset_frames = (offset_ms as f64 / 1000.0 * sample_rate).floor() as usize;
        let offset_bytes = offset_frames.saturating_mul(frame_size);

        debug!(
            "切块布局: bpm={}, 每块 {} 帧 / {} 字节, 偏移 {} 字节",
            bpm, frames_per_chunk, bytes_per_chunk, offset_bytes
        );

        Ok(Self {
            frames_per_chunk,
            bytes_per_chunk,
            offset_bytes,
        })
    }

    /// 给定缓冲区长度可切出的完整块数
    pub fn chunk_count(&self, buffer_len: usize) -> usize {
        buffer_len.saturating_sub(self.offset_bytes) / self.bytes_per_chunk
    }

    /// 按布局切块, 每块复制一份独立的字节
    pub fn split(&self, samples: &SampleBuffer) -> Vec<Chunk> {
        let bytes = samples.as_bytes();
        if self.offset_bytes > bytes.len() {
            warn!(
                "偏移 {} 字节超过音频长度 {} 字节, 输出为空",
                self.offset_bytes,
                bytes.len()
            );
            return Vec::new();
        }

        let trimmed = &bytes[self.offset_bytes..];
        let chunks: Vec<Chunk> = trimmed
            .chunks_exact(self.bytes_per_chunk)
            .enumerate()
            .map(|(index, data)| Chunk::new(index, data.to_vec()))
            .collect();

        let remainder = trimmed.len() % self.bytes_per_chunk;
        if remainder > 0 {
            debug!("丢弃末尾不完整的块: {} 字节", remainder);
        }
        debug!("切出 {} 个块", chunks.len());
        chunks
    }
}

/// 按节拍与偏移切块
pub fn chunk(
    samples: &SampleBuffer,
    format: &AudioFormat,
    bpm: f64,
    offset_ms: u64,
) -> PermResult<Vec<Chunk>> {
    let layout = ChunkLayout::new(format, bpm, offset_ms)?;
    Ok(layout.split(samples))
}
