//! Error types for CLI operations.

use std::path::PathBuf;

use contracts::LabelError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// Neither a config file nor `--data-dir`/`--dataset` given
    #[error("No data source: pass --config, or both --data-dir and --dataset")]
    MissingDataSource,

    /// A session failed to match; the batch is aborted
    #[error("Session {} failed", session.display())]
    SessionFailed {
        session: PathBuf,
        #[source]
        source: LabelError,
    },

    /// A worker task panicked or was cancelled
    #[error("Worker task failed: {message}")]
    Worker { message: String },
}

impl CliError {
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn session_failed(session: impl Into<PathBuf>, source: LabelError) -> Self {
        Self::SessionFailed {
            session: session.into(),
            source,
        }
    }

    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
