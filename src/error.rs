//! Error types for the treeprint inventory and audit system.

use std::path::PathBuf;
use thiserror::Error;

/// Storage and filesystem errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Cannot traverse {path:?}: {reason}")]
    Traversal { path: PathBuf, reason: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Run-level errors surfaced by the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid mode '{0}'. Use 'w' for write or 'r' for read.")]
    InvalidMode(String),

    #[error("No files found in directory {0:?}")]
    NoFilesFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl ApiError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
