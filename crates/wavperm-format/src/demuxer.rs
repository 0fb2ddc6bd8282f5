//! WAV (RIFF WAVE) 解封装器.
//!
//! 支持整数 PCM 及子格式为 PCM 的 `WAVE_FORMAT_EXTENSIBLE`.
//!
//! WAV 文件结构:
//! ```text
//! RIFF header:  "RIFF" + file_size-8 + "WAVE"
//! fmt  chunk:   "fmt " + chunk_size + audio_format + channels + sample_rate
//!              + byte_rate + block_align + bits_per_sample [+ 扩展]
//! data chunk:   "data" + data_size + PCM samples...
//! ```

use std::io::Read;

use log::{debug, warn};
use wavperm_core::{AudioFormat, PermError, PermResult, SampleBuffer};

use crate::io::IoContext;

/// WAV 音频格式码: PCM 整数
pub const WAV_FORMAT_PCM: u16 = 0x0001;
/// WAV 音频格式码: 可扩展格式 (真实格式在子格式 GUID 中)
pub const WAV_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// KSDATAFORMAT 子格式 GUID 中格式码之后的固定 14 字节
const KSDATAFORMAT_GUID_TAIL: [u8; 14] = [
    0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71,
];

/// 标准 PCM fmt 块大小
const FMT_CHUNK_MIN_SIZE: u64 = 16;
/// 含 cbSize, valid_bits, channel_mask 与子格式 GUID 的可扩展 fmt 块大小
const FMT_CHUNK_EXTENSIBLE_SIZE: u64 = 40;

/// WAV 解封装器
#[derive(Debug, Default)]
pub struct WavDemuxer {
    /// 解析出的音频格式
    format: Option<AudioFormat>,
    /// data 块声明的大小 (字节)
    data_size: u64,
}

/// 将文件头解析过程中的 EOF 转换为解码错误
fn header_eof(err: PermError) -> PermError {
    match err {
        PermError::Eof => PermError::Decode("WAV 文件头不完整".into()),
        other => other,
    }
}

impl WavDemuxer {
    /// 创建 WAV 解封装器
    pub fn new() -> Self {
        Self::default()
    }

    /// 打开容器并解析头部, 读取位置停在 data 块数据起始处
    pub fn open<T: Read>(&mut self, io: &mut IoContext<T>) -> PermResult<AudioFormat> {
        self.parse_header(io).map_err(header_eof)
    }

    fn parse_header<T: Read>(&mut self, io: &mut IoContext<T>) -> PermResult<AudioFormat> {
        // 读取 RIFF 头
        let riff_tag = io.read_tag()?;
        if &riff_tag != b"RIFF" {
            return Err(PermError::Decode("不是有效的 RIFF 文件".into()));
        }

        let _file_size = io.read_u32_le()?;

        let wave_tag = io.read_tag()?;
        if &wave_tag != b"WAVE" {
            return Err(PermError::Decode("不是有效的 WAVE 文件".into()));
        }

        debug!("检测到 RIFF/WAVE 文件");

        let mut format: Option<AudioFormat> = None;

        loop {
            let chunk_id = match io.read_tag() {
                Ok(tag) => tag,
                Err(PermError::Eof) => {
                    return Err(PermError::Decode(if format.is_some() {
                        "未找到 data 块".into()
                    } else {
                        "未找到 fmt 块".into()
                    }));
                }
                Err(e) => return Err(e),
            };
            let chunk_size = u64::from(io.read_u32_le()?);

            match &chunk_id {
                b"fmt " => {
                    format = Some(Self::parse_fmt(io, chunk_size)?);
                }
                b"data" => {
                    let Some(format) = format else {
                        return Err(PermError::Decode("data 块出现在 fmt 块之前".into()));
                    };
                    self.data_size = chunk_size;
                    self.format = Some(format);
                    debug!("data: size={}", chunk_size);
                    debug!("WAV 打开完成: {}", format);
                    return Ok(format);
                }
                _ => {
                    warn!(
                        "跳过未知块: '{}', 大小={}",
                        String::from_utf8_lossy(&chunk_id),
                        chunk_size
                    );
                    io.skip(chunk_size)?;
                }
            }

            // WAV 块要求偶数对齐, 奇数大小需要跳过 1 个填充字节
            if chunk_size % 2 != 0 {
                io.skip(1)?;
            }
        }
    }

    /// 解析 fmt 块 (chunk 头之后的部分)
    fn parse_fmt<T: Read>(io: &mut IoContext<T>, chunk_size: u64) -> PermResult<AudioFormat> {
        if chunk_size < FMT_CHUNK_MIN_SIZE {
            return Err(PermError::Decode("fmt 块大小不足 16 字节".into()));
        }
        let audio_format = io.read_u16_le()?;
        let channels = io.read_u16_le()?;
        let sample_rate = io.read_u32_le()?;
        let _byte_rate = io.read_u32_le()?;
        let block_align = io.read_u16_le()?;
        let bits_per_sample = io.read_u16_le()?;
        let mut consumed = FMT_CHUNK_MIN_SIZE;

        debug!(
            "fmt: format=0x{:04X}, channels={}, rate={}, block_align={}, bits={}",
            audio_format, channels, sample_rate, block_align, bits_per_sample,
        );

        match audio_format {
            WAV_FORMAT_PCM => {}
            WAV_FORMAT_EXTENSIBLE => {
                if chunk_size < FMT_CHUNK_EXTENSIBLE_SIZE {
                    return Err(PermError::Decode("可扩展 fmt 块大小不足 40 字节".into()));
                }
                let _cb_size = io.read_u16_le()?;
                let _valid_bits = io.read_u16_le()?;
                let _channel_mask = io.read_u32_le()?;
                let mut guid = [0u8; 16];
                io.read_exact(&mut guid)?;
                consumed = FMT_CHUNK_EXTENSIBLE_SIZE;

                let sub_format = u16::from_le_bytes([guid[0], guid[1]]);
                if sub_format != WAV_FORMAT_PCM || guid[2..] != KSDATAFORMAT_GUID_TAIL {
                    return Err(PermError::Decode(format!(
                        "不支持的可扩展子格式: 0x{:04X}",
                        sub_format
                    )));
                }
            }
            other => {
                return Err(PermError::Decode(format!(
                    "不支持的 WAV 格式码: 0x{:04X} (仅支持整数 PCM)",
                    other
                )));
            }
        }

        // 跳过 fmt 块的剩余扩展部分
        if chunk_size > consumed {
            io.skip(chunk_size - consumed)?;
        }

        let format = AudioFormat::new(sample_rate, bits_per_sample, channels)?;
        if usize::from(block_align) != format.frame_size() {
            return Err(PermError::Decode(format!(
                "block_align={} 与声道数和位深不符 (应为 {})",
                block_align,
                format.frame_size()
            )));
        }
        Ok(format)
    }

    /// 已解析的音频格式
    pub fn format(&self) -> Option<AudioFormat> {
        self.format
    }

    /// data 块声明的大小 (字节)
    pub fn data_size(&self) -> u64 {
        self.data_size
    }

    /// 读取 data 块中的全部采样
    ///
    /// 声明大小超过实际数据时按实际数据截断, 末尾不足一帧的字节被丢弃.
    pub fn read_samples<T: Read>(&mut self, io: &mut IoContext<T>) -> PermResult<SampleBuffer> {
        let format = self
            .format
            .ok_or_else(|| PermError::Decode("解封装器尚未打开".into()))?;

        let data = io.read_up_to(self.data_size)?;
        if (data.len() as u64) < self.data_size {
            warn!(
                "data 块声明 {} 字节, 实际只有 {} 字节, 按实际数据处理",
                self.data_size,
                data.len()
            );
        }

        let (samples, dropped) = SampleBuffer::from_truncated(data, &format);
        if dropped > 0 {
            warn!("丢弃末尾不完整的帧: {} 字节", dropped);
        }
        debug!(
            "读取采样: {} 帧, {} 字节",
            samples.frames(),
            samples.len()
        );
        Ok(samples)
    }
}
