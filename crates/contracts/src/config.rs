//! LabelerConfig - Config Loader 输出
//!
//! 描述录制数据所在位置以及匹配方式。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

use crate::{Policy, Timestamp};

/// Config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的标注配置
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LabelerConfig {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 数据根目录，每个数据集一个子目录
    pub data_dir: PathBuf,

    /// `data_dir` 下的数据集目录名
    #[validate(length(min = 1, message = "at least one dataset is required"))]
    pub datasets: Vec<String>,

    /// 应用于每个会话的匹配选项
    #[serde(default)]
    #[validate(nested)]
    pub matching: MatchOptions,
}

/// Options for matching a single session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct MatchOptions {
    /// Largest allowed `second - first` (exclusive) when associating
    #[serde(default = "default_max_offset")]
    #[validate(range(min = 1, message = "max_offset must be >= 1"))]
    pub max_offset: Timestamp,

    /// Recompute every stage even when its output file exists
    #[serde(default)]
    pub redo_matching: bool,

    /// Drop frames whose left and right controls are both zero
    #[serde(default = "default_remove_zeros")]
    pub remove_zeros: bool,

    /// 控制方案
    #[serde(default)]
    pub policy: Policy,
}

fn default_max_offset() -> Timestamp {
    1000
}

fn default_remove_zeros() -> bool {
    true
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_offset: default_max_offset(),
            redo_matching: false,
            remove_zeros: default_remove_zeros(),
            policy: Policy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_options_defaults_from_empty_json() {
        let options: MatchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, MatchOptions::default());
        assert_eq!(options.max_offset, 1000);
        assert!(options.remove_zeros);
        assert!(!options.redo_matching);
    }

    #[test]
    fn test_zero_offset_fails_validation() {
        let options = MatchOptions {
            max_offset: 0,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_policy_from_json() {
        let options: MatchOptions =
            serde_json::from_str(r#"{"policy": "point_goal_nav", "max_offset": 50}"#).unwrap();
        assert_eq!(options.policy, Policy::PointGoalNav);
        assert_eq!(options.max_offset, 50);
    }
}
