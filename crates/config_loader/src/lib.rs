//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `LabelerConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("labeler.toml")).unwrap();
//! println!("Datasets: {:?}", config.datasets);
//! ```

mod parser;
mod validator;

pub use contracts::LabelerConfig;
pub use parser::ConfigFormat;

use contracts::LabelError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<LabelerConfig, LabelError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<LabelerConfig, LabelError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate a configuration assembled in code (e.g. from CLI flags)
    pub fn validate(config: &LabelerConfig) -> Result<(), LabelError> {
        crate::validator::validate(config)
    }

    /// Serialize LabelerConfig to TOML string
    pub fn to_toml(config: &LabelerConfig) -> Result<String, LabelError> {
        toml::to_string_pretty(config)
            .map_err(|e| LabelError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize LabelerConfig to JSON string
    pub fn to_json(config: &LabelerConfig) -> Result<String, LabelError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| LabelError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, LabelError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            LabelError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext)
            .ok_or_else(|| LabelError::config_parse(format!("unsupported config format: .{ext}")))
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, LabelError> {
        std::fs::read_to_string(path).map_err(|e| LabelError::io(path, e))
    }

    /// Parse and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<LabelerConfig, LabelError> {
        let config = parser::parse(content, format)?;
        crate::validator::validate(&config)?;
        Ok(config)
    }
}
