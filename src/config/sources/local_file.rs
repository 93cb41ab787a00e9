//! Working directory config file source: ./treeprint.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "treeprint.toml";

/// Add `cwd/treeprint.toml` to the builder when present.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    cwd: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = cwd.join(LOCAL_CONFIG_FILE);
    if path.exists() {
        return Ok(builder.add_source(File::from(path).required(false)));
    }
    Ok(builder)
}
