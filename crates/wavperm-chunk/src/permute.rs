//! 块置换引擎.
//!
//! 把块序列按 `n` 个一组划分, 对每个完整组应用置换向量 `p`:
//! 第 `i` 组的第 `j` 个输出槽位取该组内第 `p[j]` 个块.
//!
//! 处理分两个阶段:
//! 1. 填充: 在长度为 `ceil(块数 / n) × len(p)` 的稀疏槽位表中写入源块
//! 2. 压缩: 去掉未被写入的空槽位, 保持其余槽位的相对顺序
//!
//! `p[j] >= n` 的槽位以及末尾不足 `n` 个块的残缺组都不产生输出, 也不报错.

use log::{debug, warn};
use wavperm_core::{PermError, PermResult};

use crate::chunk::Chunk;

/// 置换计划: 每个输出槽位对应的源块索引
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutePlan {
    /// 完整组数
    groups: usize,
    /// 稀疏槽位表, `None` 表示空槽位
    slots: Vec<Option<usize>>,
}

impl PermutePlan {
    /// 根据块数、分组大小与置换向量生成槽位表
    ///
    /// 分组大小为 0 时返回 [`PermError::Usage`].
    pub fn new(chunk_count: usize, group_size: usize, permutation: &[usize]) -> PermResult<Self> {
        if group_size == 0 {
            return Err(PermError::Usage("分组大小 n 必须大于 0".into()));
        }

        let groups = chunk_count / group_size;
        let slot_count = chunk_count.div_ceil(group_size) * permutation.len();
        let mut slots = vec![None; slot_count];

        for group in 0..groups {
            for (j, &p) in permutation.iter().enumerate() {
                if p >= group_size {
                    continue;
                }
                let source = group * group_size + p;
                if source >= chunk_count {
                    continue;
                }
                if let Some(slot) = slots.get_mut(group * permutation.len() + j) {
                    *slot = Some(source);
                }
            }
        }

        let out_of_range = permutation.iter().filter(|&&p| p >= group_size).count();
        if out_of_range > 0 {
            warn!(
                "置换向量中有 {} 个索引 >= 分组大小 {}, 对应槽位被丢弃",
                out_of_range, group_size
            );
        }
        let leftover = chunk_count - groups * group_size;
        if leftover > 0 {
            debug!("末尾 {} 个块不足一组, 被忽略", leftover);
        }

        Ok(Self { groups, slots })
    }

    /// 完整组数
    pub fn groups(&self) -> usize {
        self.groups
    }

    /// 槽位总数 (含空槽位)
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// 已填充的槽位数
    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// 稀疏槽位表
    pub fn slots(&self) -> &[Option<usize>] {
        &self.slots
    }

    /// 压缩后的源块索引序列
    pub fn sources(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// 按槽位表从 `chunks` 中取块, 返回压缩后的输出序列
    pub fn apply<'a>(&self, chunks: &'a [Chunk]) -> Vec<&'a Chunk> {
        // 填充阶段
        let sparse: Vec<Option<&Chunk>> = self
            .slots
            .iter()
            .map(|slot| slot.and_then(|source| chunks.get(source)))
            .collect();

        // 压缩阶段
        let output: Vec<&Chunk> = sparse.into_iter().flatten().collect();
        debug!(
            "置换完成: {} 个槽位, 输出 {} 个块",
            self.slots.len(),
            output.len()
        );
        output
    }
}

/// 对块序列应用分组置换
///
/// 返回的序列借用输入块; 同一个块可能出现多次, 也可能不出现.
pub fn permute<'a>(
    chunks: &'a [Chunk],
    group_size: usize,
    permutation: &[usize],
) -> PermResult<Vec<&'a Chunk>> {
    let plan = PermutePlan::new(chunks.len(), group_size, permutation)?;
    Ok(plan.apply(chunks))
}
