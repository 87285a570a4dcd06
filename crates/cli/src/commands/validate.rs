//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::LabelerConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    data_dir: String,
    datasets: Vec<String>,
    policy: String,
    max_offset: i64,
    redo_matching: bool,
    remove_zeros: bool,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            let matching = &config.matching;

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    data_dir: config.data_dir.display().to_string(),
                    datasets: config.datasets.clone(),
                    policy: matching.policy.to_string(),
                    max_offset: matching.max_offset,
                    redo_matching: matching.redo_matching,
                    remove_zeros: matching.remove_zeros,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &LabelerConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if !config.data_dir.is_dir() {
        warnings.push(format!(
            "data_dir '{}' does not exist - run will fail",
            config.data_dir.display()
        ));
    } else {
        for dataset in &config.datasets {
            if !config.data_dir.join(dataset).is_dir() {
                warnings.push(format!("Dataset '{}' not found under data_dir", dataset));
            }
        }
    }

    if config.matching.redo_matching {
        warnings.push("redo_matching is set - cached files will be overwritten".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Data dir: {}", summary.data_dir);
            println!("  Datasets: {}", summary.datasets.join(", "));
            println!("  Policy: {}", summary.policy);
            println!("  Max offset: {}", summary.max_offset);
            println!("  Redo matching: {}", summary.redo_matching);
            println!("  Remove zeros: {}", summary.remove_zeros);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
