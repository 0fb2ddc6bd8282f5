//! # wavperm
//!
//! 按节拍切分 PCM WAV 音频, 对每块加窗后按置换向量重排.
//!
//! 本 crate 是整个项目的门面, 重导出各子 crate 并提供端到端的处理管线.
//!
//! ## 模块结构
//!
//! - [`core`]: 音频格式、采样缓冲区、错误类型
//! - [`format`]: WAV 解码与编码
//! - [`chunk`]: 切块、加窗、重排
//! - [`config`]: 运行参数与解析
//! - [`pipeline`]: 解码 → 切块 → 加窗 → 重排 → 编码
//!
//! ## 示例
//!
//! ```no_run
//! use std::path::Path;
//! use wavperm::{PermuteConfig, run_file};
//!
//! let config = PermuteConfig::new(120.0, 0, 4, vec![3, 2, 1, 0]);
//! let summary = run_file(Path::new("in.wav"), Path::new("out.wav"), &config)?;
//! println!("输出 {} 块", summary.output_chunks);
//! # Ok::<(), wavperm::PermError>(())
//! ```

pub use wavperm_chunk as chunk;
pub use wavperm_core as core;
pub use wavperm_format as format;

pub mod config;
pub mod pipeline;

pub use config::{
    PermuteConfig, parse_bpm, parse_group_size, parse_offset_ms, parse_permutation,
};
pub use pipeline::{Processed, RunSummary, plan, plan_file, process, run, run_file};
pub use wavperm_core::{AudioFormat, PermError, PermResult, SampleBuffer};

/// 获取版本信息
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
