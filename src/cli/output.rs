//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StorageError};

/// Map domain errors to the message shown to the operator.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StorageError(StorageError::Traversal { path, reason }) => format!(
            "Filesystem error: cannot read {}: {}\nNo files found in directory",
            path.display(),
            reason
        ),
        ApiError::InvalidMode(_) => format!("{}\nModes: w - write mode, r - read mode", e),
        _ => e.to_string(),
    }
}
