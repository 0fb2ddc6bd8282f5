//! PCM 采样读写.
//!
//! 任意字节宽度 (1~4 字节) 的小端整数采样与以 0 为中心的 `i64` 之间互转.
//! 有符号格式做符号扩展, 无符号格式 (8 位) 减去中点偏移.

use byteorder::{ByteOrder, LittleEndian};

use crate::audio_format::SampleEncoding;

/// 指定位深的有符号取值范围 `(min, max)`
pub const fn sample_range(bits_per_sample: u16) -> (i64, i64) {
    let half = 1i64 << (bits_per_sample - 1);
    (-half, half - 1)
}

/// 读取一个采样, 返回以 0 为中心的值
///
/// `src` 的长度即采样字节宽度.
pub fn read_sample(src: &[u8], encoding: SampleEncoding) -> i64 {
    let nbytes = src.len();
    match encoding {
        SampleEncoding::Signed => LittleEndian::read_int(src, nbytes),
        SampleEncoding::Unsigned => {
            let offset = 1i64 << (nbytes * 8 - 1);
            LittleEndian::read_uint(src, nbytes) as i64 - offset
        }
    }
}

/// 写入一个以 0 为中心的采样值, 超出位深范围时钳位
///
/// `dst` 的长度即采样字节宽度.
pub fn write_sample(dst: &mut [u8], value: i64, encoding: SampleEncoding) {
    let nbytes = dst.len();
    let (min, max) = sample_range((nbytes * 8) as u16);
    let clamped = value.clamp(min, max);
    match encoding {
        SampleEncoding::Signed => LittleEndian::write_int(dst, clamped, nbytes),
        SampleEncoding::Unsigned => {
            let offset = 1i64 << (nbytes * 8 - 1);
            LittleEndian::write_uint(dst, (clamped + offset) as u64, nbytes);
        }
    }
}
