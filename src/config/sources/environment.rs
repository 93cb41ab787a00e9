//! Environment source: TREEPRINT__SECTION__KEY=value

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

/// Add `TREEPRINT__*` variables (e.g. `TREEPRINT__HASHING__CONCURRENCY=8`).
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("TREEPRINT")
            .prefix_separator("__")
            .separator("__"),
    )
}
