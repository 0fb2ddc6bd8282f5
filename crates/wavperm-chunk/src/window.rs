//! 窗函数处理器.
//!
//! 对每个块施加包络, 消除块边界处的咔哒声. 第 `i` 帧的增益为
//!
//! ```text
//! g(i) = (0.5 × (1 − cos(2π·i / (S − 1))))^(1/12)
//! ```
//!
//! 即 Hann 窗开 12 次方根: 两端为 0, 中间迅速升到接近 1, 比纯 Hann 窗保留更多能量.
//! 单帧块 (`S = 1`) 的增益定义为 1.

use std::f64::consts::PI;

use wavperm_core::AudioFormat;
use wavperm_core::sample::{read_sample, write_sample};

use crate::chunk::Chunk;

/// Hann 窗的开方次数
const WINDOW_ROOT: f64 = 12.0;

/// 计算 `frames` 帧块中第 `i` 帧的增益 (0.0 ~ 1.0)
pub fn gain_at(i: usize, frames: usize) -> f64 {
    if frames <= 1 {
        return 1.0;
    }
    let phase = 2.0 * PI * i as f64 / (frames - 1) as f64;
    let hann = (0.5 * (1.0 - phase.cos())).max(0.0);
    hann.powf(1.0 / WINDOW_ROOT)
}

/// 预先计算好增益表的窗函数
///
/// 同一次运行中所有块等长, 增益表只需计算一次.
#[derive(Debug, Clone)]
pub struct Window {
    /// 每帧增益
    gains: Vec<f64>,
}

impl Window {
    /// 为 `frames` 帧长的块创建窗函数
    pub fn new(frames: usize) -> Self {
        Self {
            gains: (0..frames).map(|i| gain_at(i, frames)).collect(),
        }
    }

    /// 原地对块加窗
    ///
    /// 同一帧内所有声道使用相同增益. 缩放结果向 0 截断, 超出位深范围时钳位.
    /// 块长与窗长不一致时按块的实际长度重新计算增益.
    pub fn apply(&self, chunk: &mut Chunk, format: &AudioFormat) {
        let frame_size = format.frame_size();
        let bytes_per_sample = format.bytes_per_sample();
        if frame_size == 0 {
            return;
        }

        let frames = chunk.len() / frame_size;
        if frames != self.gains.len() {
            Window::new(frames).apply(chunk, format);
            return;
        }

        let encoding = format.encoding();
        for (frame, &gain) in chunk
            .as_bytes_mut()
            .chunks_exact_mut(frame_size)
            .zip(&self.gains)
        {
            for sample in frame.chunks_exact_mut(bytes_per_sample) {
                let value = read_sample(sample, encoding);
                let scaled = (value as f64 * gain) as i64;
                write_sample(sample, scaled, encoding);
            }
        }
    }
}

/// 按块自身长度对块加窗
pub fn apply_window(chunk: &mut Chunk, format: &AudioFormat) {
    let frames = chunk.len() / format.frame_size().max(1);
    Window::new(frames).apply(chunk, format);
}
