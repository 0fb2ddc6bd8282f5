//! # wavperm-format
//!
//! WAV 容器读写. 对外提供两个入口:
//!
//! - [`decode`]: WAV 字节 → (音频格式, 交错 PCM 采样)
//! - [`encode`]: (音频格式, 交错 PCM 采样) → WAV 字节
//!
//! 底层由 [`WavDemuxer`] / [`WavMuxer`] 在 [`IoContext`] 上完成.

pub mod demuxer;
pub mod io;
pub mod muxer;

use std::io::Cursor;

use wavperm_core::{AudioFormat, PermError, PermResult, SampleBuffer};

// 重导出常用类型
pub use demuxer::WavDemuxer;
pub use io::IoContext;
pub use muxer::WavMuxer;

/// 解码 WAV 字节
///
/// 非 PCM 或损坏的容器返回 [`PermError::Decode`].
pub fn decode(bytes: &[u8]) -> PermResult<(AudioFormat, SampleBuffer)> {
    let mut io = IoContext::new(Cursor::new(bytes));
    let mut demuxer = WavDemuxer::new();
    let format = demuxer.open(&mut io).map_err(into_decode_error)?;
    let samples = demuxer.read_samples(&mut io).map_err(into_decode_error)?;
    Ok((format, samples))
}

/// 编码为 WAV 字节
///
/// 输出头部的 data 大小与采样字节数一致.
pub fn encode(format: &AudioFormat, samples: &SampleBuffer) -> PermResult<Vec<u8>> {
    let mut io = IoContext::memory();
    write_wav(&mut io, format, samples).map_err(into_encode_error)?;
    Ok(io.into_data())
}

fn write_wav(
    io: &mut IoContext<Cursor<Vec<u8>>>,
    format: &AudioFormat,
    samples: &SampleBuffer,
) -> PermResult<()> {
    let mut muxer = WavMuxer::new();
    muxer.write_header(io, format)?;
    muxer.write_samples(io, samples.as_bytes())?;
    muxer.write_trailer(io)
}

fn into_decode_error(err: PermError) -> PermError {
    match err {
        PermError::Io(e) => PermError::Decode(format!("读取失败: {e}")),
        PermError::Eof => PermError::Decode("数据提前结束".into()),
        other => other,
    }
}

fn into_encode_error(err: PermError) -> PermError {
    match err {
        PermError::Io(e) => PermError::Encode(format!("写入失败: {e}")),
        other => other,
    }
}
