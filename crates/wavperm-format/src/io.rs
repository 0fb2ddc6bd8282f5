//! I/O 抽象层.
//!
//! 为解封装器/封装器提供统一的小端读写接口, 后端可以是内存缓冲区,
//! 文件或任意实现了 `Read`/`Write`/`Seek` 的类型.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use wavperm_core::{PermError, PermResult};

/// I/O 上下文
///
/// 封装底层读写对象. 读取时遇到数据提前结束统一返回 [`PermError::Eof`].
pub struct IoContext<T> {
    /// 内部 I/O 实现
    inner: T,
}

impl<T> IoContext<T> {
    /// 包装一个 I/O 后端
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl IoContext<Cursor<Vec<u8>>> {
    /// 创建空的内存上下文 (用于写入)
    pub fn memory() -> Self {
        Self::new(Cursor::new(Vec::new()))
    }

    /// 消耗自身, 返回已写入的全部数据
    pub fn into_data(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

/// 将 `UnexpectedEof` 统一为 `PermError::Eof`
fn map_read_err(err: io::Error) -> PermError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        PermError::Eof
    } else {
        PermError::Io(err)
    }
}

// ========================
// 读取方法
// ========================

impl<T: Read> IoContext<T> {
    /// 读满整个缓冲区
    pub fn read_exact(&mut self, buf: &mut [u8]) -> PermResult<()> {
        self.inner.read_exact(buf).map_err(map_read_err)
    }

    /// 读取 u16 小端
    pub fn read_u16_le(&mut self) -> PermResult<u16> {
        self.inner.read_u16::<LittleEndian>().map_err(map_read_err)
    }

    /// 读取 u32 小端
    pub fn read_u32_le(&mut self) -> PermResult<u32> {
        self.inner.read_u32::<LittleEndian>().map_err(map_read_err)
    }

    /// 读取 4 字节标签 (FourCC)
    pub fn read_tag(&mut self) -> PermResult<[u8; 4]> {
        let mut buf = [0u8; 4];
        self.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// 最多读取 `count` 字节, 数据不足时返回实际读到的部分
    pub fn read_up_to(&mut self, count: u64) -> PermResult<Vec<u8>> {
        let mut buf = Vec::new();
        (&mut self.inner).take(count).read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// 跳过指定字节数
    pub fn skip(&mut self, count: u64) -> PermResult<()> {
        let skipped = io::copy(&mut (&mut self.inner).take(count), &mut io::sink())?;
        if skipped < count {
            return Err(PermError::Eof);
        }
        Ok(())
    }
}

// ========================
// 写入方法
// ========================

impl<T: Write> IoContext<T> {
    /// 写入全部数据
    pub fn write_all(&mut self, buf: &[u8]) -> PermResult<()> {
        self.inner.write_all(buf)?;
        Ok(())
    }

    /// 写入 u16 小端
    pub fn write_u16_le(&mut self, v: u16) -> PermResult<()> {
        self.inner.write_u16::<LittleEndian>(v)?;
        Ok(())
    }

    /// 写入 u32 小端
    pub fn write_u32_le(&mut self, v: u32) -> PermResult<()> {
        self.inner.write_u32::<LittleEndian>(v)?;
        Ok(())
    }

    /// 写入 4 字节标签 (FourCC)
    pub fn write_tag(&mut self, tag: &[u8; 4]) -> PermResult<()> {
        self.write_all(tag)
    }

    /// 刷新底层写缓冲
    pub fn flush(&mut self) -> PermResult<()> {
        self.inner.flush()?;
        Ok(())
    }
}

// ========================
// 定位方法
// ========================

impl<T: Seek> IoContext<T> {
    /// 定位 (seek)
    pub fn seek(&mut self, pos: SeekFrom) -> PermResult<u64> {
        Ok(self.inner.seek(pos)?)
    }

    /// 获取当前位置
    pub fn position(&mut self) -> PermResult<u64> {
        Ok(self.inner.stream_position()?)
    }
}
