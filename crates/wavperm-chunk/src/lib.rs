//! # wavperm-chunk
//!
//! 节拍切块、窗函数与块置换.
//!
//! - [`chunker`]: 按十六分音符时长切块
//! - [`window`]: Hann 开方窗, 消除块边界咔哒声
//! - [`permute`]: 分组置换, 支持重复/省略/重排

pub mod chunk;
pub mod chunker;
pub mod permute;
pub mod window;

// 重导出常用类型
pub use chunk::Chunk;
pub use chunker::{ChunkLayout, chunk};
pub use permute::{PermutePlan, permute};
pub use window::{Window, apply_window, gain_at};
