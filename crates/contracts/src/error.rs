//! Layered error definitions
//!
//! Categorized by source: config / input logs / label fields / io

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::Timestamp;

/// Unified error type
#[derive(Debug, Error)]
pub enum LabelError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Policy name outside the supported set
    #[error("unknown policy '{value}' (expected 'autopilot' or 'point_goal_nav')")]
    UnknownPolicy { value: String },

    // ===== Input Log Errors =====
    /// A required log holds no data rows
    #[error("empty log file: {}", path.display())]
    EmptyLog { path: PathBuf },

    /// Leading token of a data line is not an integer
    #[error("invalid timestamp '{value}' at {}:{line}", path.display())]
    TimestampParse {
        path: PathBuf,
        line: usize,
        value: String,
    },

    // ===== Label Errors =====
    /// Numeric label field could not be parsed
    #[error("invalid {field} value '{value}' for timestamp {timestamp}")]
    FieldParse {
        timestamp: Timestamp,
        field: &'static str,
        value: String,
    },

    // ===== General Errors =====
    /// IO error with the offending path
    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LabelError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create empty log error
    pub fn empty_log(path: impl AsRef<Path>) -> Self {
        Self::EmptyLog {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Wrap an io error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LabelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_log_message_names_file() {
        let err = LabelError::empty_log("/tmp/s1/sensor_data/ctrlLog.txt");
        assert!(err.to_string().contains("ctrlLog.txt"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = LabelError::io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("missing.txt"));
    }
}
