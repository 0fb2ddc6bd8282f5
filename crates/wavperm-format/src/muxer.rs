//! WAV (RIFF WAVE) 封装器.
//!
//! 将交错 PCM 数据写入标准 44 字节头部的 WAV 文件.
//!
//! 写入流程:
//! 1. `write_header()` - 写入 RIFF 和 fmt 块, 预留 data 块大小
//! 2. `write_samples()` - 追加 PCM 数据
//! 3. `write_trailer()` - 补齐填充字节, 回填 RIFF 大小和 data 块大小

use std::io::{Seek, SeekFrom, Write};

use log::debug;
use wavperm_core::{AudioFormat, PermError, PermResult};

use crate::demuxer::WAV_FORMAT_PCM;
use crate::io::IoContext;

/// RIFF 大小字段的文件偏移
const RIFF_SIZE_OFFSET: u64 = 4;
/// data 块大小字段的文件偏移: 12 (RIFF) + 24 (fmt) + 4 (data tag)
const DATA_SIZE_OFFSET: u64 = 40;
/// 标准头部大小, RIFF 大小 = 文件大小 - 8 = 36 + data 大小
const RIFF_HEADER_OVERHEAD: u64 = 36;

/// WAV 封装器
#[derive(Debug, Default)]
pub struct WavMuxer {
    /// 输出格式, `write_header()` 之后有效
    format: Option<AudioFormat>,
    /// 已写入的数据字节数
    data_written: u64,
}

impl WavMuxer {
    /// 创建 WAV 封装器
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入容器头部
    pub fn write_header<T: Write>(
        &mut self,
        io: &mut IoContext<T>,
        format: &AudioFormat,
    ) -> PermResult<()> {
        format
            .validate()
            .map_err(|e| PermError::Encode(format!("无效的输出格式: {e}")))?;

        let block_align = u16::try_from(format.frame_size())
            .map_err(|_| PermError::Encode("帧大小超出 WAV 范围".into()))?;
        let byte_rate = u32::try_from(format.byte_rate())
            .map_err(|_| PermError::Encode("码率超出 WAV 范围".into()))?;

        // RIFF header
        io.write_tag(b"RIFF")?;
        io.write_u32_le(0)?; // 占位, trailer 中回填
        io.write_tag(b"WAVE")?;

        // fmt chunk
        io.write_tag(b"fmt ")?;
        io.write_u32_le(16)?;
        io.write_u16_le(WAV_FORMAT_PCM)?;
        io.write_u16_le(format.channels)?;
        io.write_u32_le(format.sample_rate)?;
        io.write_u32_le(byte_rate)?;
        io.write_u16_le(block_align)?;
        io.write_u16_le(format.bits_per_sample)?;

        // data chunk header
        io.write_tag(b"data")?;
        io.write_u32_le(0)?; // 占位, trailer 中回填

        self.format = Some(*format);
        self.data_written = 0;

        debug!("WAV 写入头部: {}", format);
        Ok(())
    }

    /// 追加 PCM 数据
    pub fn write_samples<T: Write>(&mut self, io: &mut IoContext<T>, data: &[u8]) -> PermResult<()> {
        let format = self
            .format
            .ok_or_else(|| PermError::Encode("尚未写入 WAV 头部".into()))?;
        if data.len() % format.frame_size() != 0 {
            return Err(PermError::Encode(format!(
                "数据长度 {} 不是帧大小 {} 的整数倍",
                data.len(),
                format.frame_size()
            )));
        }

        let total = self.data_written + data.len() as u64;
        // data 大小加填充字节和头部开销都必须能放进 32 位 RIFF 大小字段
        if total + (total % 2) + RIFF_HEADER_OVERHEAD > u64::from(u32::MAX) {
            return Err(PermError::Encode(format!(
                "数据大小 {} 字节超出 WAV 4GB 限制",
                total
            )));
        }

        io.write_all(data)?;
        self.data_written = total;
        Ok(())
    }

    /// 写入容器尾部, 回填大小字段
    pub fn write_trailer<T: Write + Seek>(&mut self, io: &mut IoContext<T>) -> PermResult<()> {
        if self.format.is_none() {
            return Err(PermError::Encode("尚未写入 WAV 头部".into()));
        }

        // 奇数大小的 data 块需要 1 个填充字节, 不计入 data 大小
        let pad = self.data_written % 2;
        if pad != 0 {
            io.write_all(&[0])?;
        }

        let data_size = self.data_written as u32;
        let riff_size = (RIFF_HEADER_OVERHEAD + self.data_written + pad) as u32;

        io.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
        io.write_u32_le(riff_size)?;

        io.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
        io.write_u32_le(data_size)?;

        io.seek(SeekFrom::End(0))?;
        io.flush()?;

        debug!(
            "WAV 写入尾部: riff_size={}, data_size={}",
            riff_size, data_size,
        );
        Ok(())
    }
}
