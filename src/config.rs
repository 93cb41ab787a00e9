//! Configuration System
//!
//! Layered configuration for hashing, traversal, baseline storage, output and
//! logging. Sources are merged in order: built-in defaults, the global config
//! file, a `treeprint.toml` in the working directory, then `TREEPRINT__*`
//! environment variables. CLI flags are applied last by the binary.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::store::DEFAULT_BASELINE_FILE;
use crate::tree::hasher::{DigestAlgorithm, DEFAULT_BUFFER_SIZE};
use crate::tree::{Concurrency, WalkerConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreeprintConfig {
    #[serde(default)]
    pub hashing: HashingConfig,

    #[serde(default)]
    pub walker: WalkerSettings,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hashing engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashingConfig {
    /// Worker count: "auto" or a positive integer
    #[serde(default)]
    pub concurrency: Concurrency,

    #[serde(default)]
    pub algorithm: DigestAlgorithm,

    /// Read chunk size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            concurrency: Concurrency::Auto,
            algorithm: DigestAlgorithm::default(),
            buffer_size: default_buffer_size(),
        }
    }
}

/// Traversal settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkerSettings {
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Directory or file names to skip anywhere in the tree
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl WalkerSettings {
    /// Walker configuration excluding the given files
    pub fn to_walker_config(&self, exclude: Vec<PathBuf>) -> WalkerConfig {
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            ignore_patterns: self.ignore_patterns.clone(),
            max_depth: self.max_depth,
            exclude,
        }
    }
}

/// Baseline storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Baseline inventory file; relative paths resolve against the working directory
    #[serde(default = "default_baseline_file")]
    pub baseline_file: PathBuf,
}

fn default_baseline_file() -> PathBuf {
    PathBuf::from(DEFAULT_BASELINE_FILE)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            baseline_file: default_baseline_file(),
        }
    }
}

impl StorageConfig {
    /// Resolve the baseline path against a working directory
    pub fn resolve_baseline(&self, cwd: &Path) -> PathBuf {
        if self.baseline_file.is_absolute() {
            self.baseline_file.clone()
        } else {
            cwd.join(&self.baseline_file)
        }
    }
}

/// Report presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format: text or json
    #[serde(default = "default_output_format")]
    pub format: String,

    /// Colorize text output
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_output_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_output_format(),
            color: default_true(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Hashing(String),
    Storage(String),
    Output(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Hashing(msg) => write!(f, "Hashing: {}", msg),
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::Output(msg) => write!(f, "Output: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl TreeprintConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.hashing.buffer_size == 0 {
            errors.push(ValidationError::Hashing(
                "Buffer size must be at least 1 byte".to_string(),
            ));
        }

        if self.storage.baseline_file.as_os_str().is_empty() {
            errors.push(ValidationError::Storage(
                "Baseline file cannot be empty".to_string(),
            ));
        }

        if self.output.format != "text" && self.output.format != "json" {
            errors.push(ValidationError::Output(format!(
                "Invalid report format: {} (must be 'text' or 'json')",
                self.output.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding every error into a single [`ApiError`]
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}
