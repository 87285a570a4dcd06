//! Resolve the effective `LabelerConfig` from file, flags and environment.

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{ConfigVersion, LabelerConfig, MatchOptions};
use tracing::info;

use crate::cli::SourceArgs;
use crate::error::CliError;

/// Load the config file (if any) and apply flag overrides, then validate
pub fn resolve_config(source: &SourceArgs) -> Result<LabelerConfig> {
    let mut config = match &source.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path).into());
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?
        }
        None => {
            let data_dir = source.data_dir.clone().ok_or(CliError::MissingDataSource)?;
            if source.datasets.is_empty() {
                return Err(CliError::MissingDataSource.into());
            }
            LabelerConfig {
                version: ConfigVersion::V1,
                data_dir,
                datasets: Vec::new(),
                matching: MatchOptions::default(),
            }
        }
    };

    if let Some(data_dir) = &source.data_dir {
        config.data_dir = data_dir.clone();
    }
    if !source.datasets.is_empty() {
        config.datasets = source.datasets.clone();
    }
    if let Some(policy) = source.policy {
        info!(policy = %policy, "Overriding policy from CLI");
        config.matching.policy = policy;
    }
    if let Some(max_offset) = source.max_offset {
        info!(max_offset, "Overriding max_offset from CLI");
        config.matching.max_offset = max_offset;
    }

    ConfigLoader::validate(&config).context("Invalid labeling configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::Policy;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_flags_without_config_file() {
        let source = SourceArgs {
            data_dir: Some(PathBuf::from("/data")),
            datasets: vec!["train".to_string()],
            max_offset: Some(50),
            ..Default::default()
        };
        let config = resolve_config(&source).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.matching.max_offset, 50);
        assert!(config.matching.remove_zeros);
        assert_eq!(config.matching.policy, Policy::Autopilot);
    }

    #[test]
    fn test_missing_source() {
        let source = SourceArgs {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        let err = resolve_config(&source).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::MissingDataSource)
        ));
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("labeler.toml");
        fs::write(
            &path,
            r#"
data_dir = "/from/file"
datasets = ["a", "b"]

[matching]
max_offset = 200
"#,
        )
        .unwrap();

        let source = SourceArgs {
            config: Some(path),
            datasets: vec!["c".to_string()],
            policy: Some(Policy::PointGoalNav),
            ..Default::default()
        };
        let config = resolve_config(&source).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/from/file"));
        assert_eq!(config.datasets, vec!["c"]);
        assert_eq!(config.matching.max_offset, 200);
        assert_eq!(config.matching.policy, Policy::PointGoalNav);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let source = SourceArgs {
            data_dir: Some(PathBuf::from("/data")),
            datasets: vec!["train".to_string()],
            max_offset: Some(0),
            ..Default::default()
        };
        assert!(resolve_config(&source).is_err());
    }
}
