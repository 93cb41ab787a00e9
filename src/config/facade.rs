//! Config loader: merges every source into a [`TreeprintConfig`].

use super::merge::merge_policy;
use super::sources::{environment, global_file, local_file};
use super::TreeprintConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};

/// Loads configuration from defaults, files and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a run started in `cwd`
    ///
    /// Precedence (lowest to highest): defaults, global config file,
    /// `cwd/treeprint.toml`, `TREEPRINT__*` environment variables.
    pub fn load(cwd: &Path) -> Result<TreeprintConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = local_file::add_to_builder(builder, cwd)?;
        let builder = environment::add_to_builder(builder);

        let config: TreeprintConfig = builder.build()?.try_deserialize()?;
        config.validated()
    }

    /// Load configuration from one explicit file (plus defaults and environment)
    pub fn load_from_file(path: &Path) -> Result<TreeprintConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);

        let config: TreeprintConfig = builder.build()?.try_deserialize()?;
        config.validated()
    }

    /// Path of the global config file, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
