//! 统一错误类型定义.
//!
//! 所有 wavperm crate 共用的错误类型, 支持跨模块传播.
//!
//! 错误分为两类: 参数/文件层面的硬错误 (本枚举), 以及置换语义上的
//! 软降级 (越界索引, 空输出等), 后者不会产生错误, 只记录 `warn` 日志.

use thiserror::Error;

/// wavperm 统一错误类型
#[derive(Debug, Error)]
pub enum PermError {
    /// 调用参数不足或取值非法 (如 bpm <= 0, 分组大小为 0)
    #[error("用法错误: {0}")]
    Usage(String),

    /// 数值参数无法解析
    #[error("参数解析错误: {0}")]
    Parse(String),

    /// 输入文件缺失, 不可读或不是有效的 PCM WAV
    #[error("解码错误: {0}")]
    Decode(String),

    /// 输出容器无法生成或写入
    #[error("编码错误: {0}")]
    Encode(String),

    /// I/O 错误
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 已到达数据末尾
    #[error("已到达数据末尾")]
    Eof,
}

/// wavperm 统一 Result 类型
pub type PermResult<T> = Result<T, PermError>;
