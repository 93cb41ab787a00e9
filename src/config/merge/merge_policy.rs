//! Merge rules: defaults, override order, conflict handling.

use crate::store::DEFAULT_BASELINE_FILE;
use crate::tree::hasher::DEFAULT_BUFFER_SIZE;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("hashing.concurrency", "auto")?
        .set_default("hashing.algorithm", "sha256")?
        .set_default("hashing.buffer_size", DEFAULT_BUFFER_SIZE as i64)?
        .set_default("storage.baseline_file", DEFAULT_BASELINE_FILE)?
        .set_default("output.format", "text")
}
