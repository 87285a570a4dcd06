//! 配置校验模块
//!
//! 校验规则：
//! - 合约类型上声明的字段约束（`validator` derive）
//! - 数据集名称非空且唯一
//! - 数据集名称是普通目录名，不能是路径

use std::collections::HashSet;

use ::validator::Validate;
use contracts::{LabelError, LabelerConfig};

/// 校验 LabelerConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &LabelerConfig) -> Result<(), LabelError> {
    validate_declared(config)?;
    validate_dataset_names(config)?;
    Ok(())
}

/// Constraints declared with `#[validate(...)]`
fn validate_declared(config: &LabelerConfig) -> Result<(), LabelError> {
    config
        .validate()
        .map_err(|e| LabelError::config_validation("config", e.to_string()))
}

/// Dataset names must be unique directory names
fn validate_dataset_names(config: &LabelerConfig) -> Result<(), LabelError> {
    let mut seen = HashSet::new();
    for (idx, dataset) in config.datasets.iter().enumerate() {
        if dataset.trim().is_empty() {
            return Err(LabelError::config_validation(
                format!("datasets[{idx}]"),
                "dataset name cannot be empty",
            ));
        }
        if dataset.contains(['/', '\\']) {
            return Err(LabelError::config_validation(
                format!("datasets[{idx}]"),
                format!("dataset '{dataset}' must be a directory name, not a path"),
            ));
        }
        if !seen.insert(dataset.as_str()) {
            return Err(LabelError::config_validation(
                format!("datasets[{idx}]"),
                format!("duplicate dataset '{dataset}'"),
            ));
        }
    }
    Ok(())
}
