//! 音频格式描述.
//!
//! 描述交错 PCM 数据的采样率、位深与声道数. 字节序固定为小端 (WAV 约定).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PermError, PermResult};

/// 支持的最大位深
pub const MAX_BITS_PER_SAMPLE: u16 = 32;

/// PCM 采样的整数编码方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleEncoding {
    /// 无符号偏移码 (WAV 的 8 位 PCM), 静音值为 128
    Unsigned,
    /// 小端有符号补码 (16/24/32 位等)
    Signed,
}

/// 音频格式
///
/// 帧 (frame) 指同一时刻所有声道的采样, 帧大小 = 声道数 × 每采样字节数.
/// 所有切块运算都以帧为单位对齐.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 位深 (每采样位数, 8 的整数倍)
    pub bits_per_sample: u16,
    /// 声道数
    pub channels: u16,
}

impl AudioFormat {
    /// 创建并校验音频格式
    pub fn new(sample_rate: u32, bits_per_sample: u16, channels: u16) -> PermResult<Self> {
        let format = Self {
            sample_rate,
            bits_per_sample,
            channels,
        };
        format.validate()?;
        Ok(format)
    }

    /// 校验格式参数
    pub fn validate(&self) -> PermResult<()> {
        if self.sample_rate == 0 {
            return Err(PermError::Decode("采样率必须大于 0".into()));
        }
        if self.channels == 0 {
            return Err(PermError::Decode("声道数必须大于 0".into()));
        }
        if self.bits_per_sample == 0
            || self.bits_per_sample % 8 != 0
            || self.bits_per_sample > MAX_BITS_PER_SAMPLE
        {
            return Err(PermError::Decode(format!(
                "不支持的 PCM 位深: {}",
                self.bits_per_sample
            )));
        }
        Ok(())
    }

    /// 每个采样点占用的字节数
    pub const fn bytes_per_sample(&self) -> usize {
        (self.bits_per_sample / 8) as usize
    }

    /// 每帧字节数 (所有声道)
    pub const fn frame_size(&self) -> usize {
        self.channels as usize * self.bytes_per_sample()
    }

    /// 采样编码方式: 8 位为无符号, 其余为有符号
    pub const fn encoding(&self) -> SampleEncoding {
        if self.bits_per_sample == 8 {
            SampleEncoding::Unsigned
        } else {
            SampleEncoding::Signed
        }
    }

    /// 每秒字节数
    pub const fn byte_rate(&self) -> u64 {
        self.sample_rate as u64 * self.frame_size() as u64
    }

    /// 将字节数换算为时长 (秒)
    pub fn duration_secs(&self, bytes: usize) -> f64 {
        let frames = bytes / self.frame_size().max(1);
        frames as f64 / f64::from(self.sample_rate.max(1))
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} 声道, {} 位",
            self.sample_rate, self.channels, self.bits_per_sample
        )
    }
}
