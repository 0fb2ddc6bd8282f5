//! 运行参数.
//!
//! 命令行的数值参数都在这里解析与校验, 便于库调用方复用同一套规则.

use serde::{Deserialize, Serialize};
use wavperm_core::{PermError, PermResult};

/// 一次重排运行的参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermuteConfig {
    /// 节拍 (每分钟拍数), 决定十六分音符块长
    pub bpm: f64,
    /// 切块前跳过的时长 (毫秒)
    pub offset_ms: u64,
    /// 分组大小 n
    pub group_size: usize,
    /// 置换向量 p, 每个元素应小于 n
    pub permutation: Vec<usize>,
}

impl PermuteConfig {
    pub fn new(bpm: f64, offset_ms: u64, group_size: usize, permutation: Vec<usize>) -> Self {
        Self {
            bpm,
            offset_ms,
            group_size,
            permutation,
        }
    }

    /// 校验参数
    ///
    /// 只拒绝无法运行的取值; `p[j] >= n` 之类的置换语义问题不算错误.
    pub fn validate(&self) -> PermResult<()> {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            return Err(PermError::Usage(format!(
                "bpm 必须为正数, 实际为 {}",
                self.bpm
            )));
        }
        if self.group_size == 0 {
            return Err(PermError::Usage("分组大小 n 必须大于 0".into()));
        }
        Ok(())
    }
}

/// 解析 bpm (正实数)
pub fn parse_bpm(text: &str) -> PermResult<f64> {
    let bpm: f64 = text
        .trim()
        .parse()
        .map_err(|_| PermError::Parse(format!("无效的 bpm: '{text}'")))?;
    if !bpm.is_finite() || bpm <= 0.0 {
        return Err(PermError::Usage(format!("bpm 必须为正数, 实际为 {text}")));
    }
    Ok(bpm)
}

/// 解析偏移毫秒数 (非负整数)
pub fn parse_offset_ms(text: &str) -> PermResult<u64> {
    text.trim()
        .parse()
        .map_err(|_| PermError::Parse(format!("无效的偏移毫秒数: '{text}'")))
}

/// 解析分组大小 n (正整数)
pub fn parse_group_size(text: &str) -> PermResult<usize> {
    let n: usize = text
        .trim()
        .parse()
        .map_err(|_| PermError::Parse(format!("无效的分组大小: '{text}'")))?;
    if n == 0 {
        return Err(PermError::Usage("分组大小 n 必须大于 0".into()));
    }
    Ok(n)
}

/// 解析以空白分隔的置换向量, 如 `"3 2 1 0"`
pub fn parse_permutation(text: &str) -> PermResult<Vec<usize>> {
    let permutation = text
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| PermError::Parse(format!("置换向量中的无效索引: '{token}'")))
        })
        .collect::<PermResult<Vec<_>>>()?;
    if permutation.is_empty() {
        return Err(PermError::Parse("置换向量不能为空".into()));
    }
    Ok(permutation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_解析置换向量() {
        assert_eq!(parse_permutation("3 2 1 0").unwrap(), vec![3, 2, 1, 0]);
        assert_eq!(parse_permutation("  0\t1\n 1 ").unwrap(), vec![0, 1, 1]);
    }

    #[test]
    fn test_置换向量非法元素() {
        let err = parse_permutation("0 x 2").unwrap_err();
        match err {
            PermError::Parse(msg) => assert!(msg.contains("'x'")),
            other => panic!("意外错误: {other:?}"),
        }
        assert!(matches!(parse_permutation("0 -1"), Err(PermError::Parse(_))));
        assert!(matches!(parse_permutation("   "), Err(PermError::Parse(_))));
    }

    #[test]
    fn test_解析数值参数() {
        assert_eq!(parse_bpm("120").unwrap(), 120.0);
        assert_eq!(parse_bpm("97.5").unwrap(), 97.5);
        assert!(matches!(parse_bpm("fast"), Err(PermError::Parse(_))));
        assert!(matches!(parse_bpm("0"), Err(PermError::Usage(_))));
        assert!(matches!(parse_bpm("-3"), Err(PermError::Usage(_))));

        assert_eq!(parse_offset_ms("250").unwrap(), 250);
        assert!(matches!(parse_offset_ms("-5"), Err(PermError::Parse(_))));
        assert!(matches!(parse_offset_ms("1.5"), Err(PermError::Parse(_))));

        assert_eq!(parse_group_size("4").unwrap(), 4);
        assert!(matches!(parse_group_size("0"), Err(PermError::Usage(_))));
        assert!(matches!(parse_group_size("four"), Err(PermError::Parse(_))));
    }

    #[test]
    fn test_配置校验() {
        assert!(PermuteConfig::new(120.0, 0, 4, vec![0, 1, 2, 3]).validate().is_ok());
        assert!(PermuteConfig::new(120.0, 0, 4, Vec::new()).validate().is_ok());
        assert!(matches!(
            PermuteConfig::new(0.0, 0, 4, vec![0]).validate(),
            Err(PermError::Usage(_))
        ));
        assert!(matches!(
            PermuteConfig::new(120.0, 0, 0, vec![0]).validate(),
            Err(PermError::Usage(_))
        ));
    }

    #[test]
    fn test_配置序列化() {
        let config = PermuteConfig::new(128.0, 20, 2, vec![1, 0]);
        let json = serde_json::to_string(&config).unwrap();
        let back: PermuteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
