//! # wavperm-core
//!
//! wavperm 核心库, 提供错误类型、音频格式描述与 PCM 采样读写.

pub mod audio_format;
pub mod error;
pub mod sample;
pub mod sample_buffer;

// 重导出常用类型
pub use audio_format::{AudioFormat, SampleEncoding};
pub use error::{PermError, PermResult};
pub use sample_buffer::SampleBuffer;
