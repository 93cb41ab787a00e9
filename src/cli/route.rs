//! CLI route: run context and mode dispatch. Orchestrates walk, hash, store and diff.

use crate::cli::parse::Cli;
use crate::cli::presentation::{
    format_collisions, format_failures, format_load_diagnostic, format_report,
    format_write_summary, Styler,
};
use crate::config::{ConfigLoader, TreeprintConfig};
use crate::error::ApiError;
use crate::inventory::Inventory;
use crate::reconcile;
use crate::report;
use crate::store::{InventoryStore, JsonInventoryStore};
use crate::tree::{HashRun, HashingEngine, Walker};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, instrument, warn};

/// What a run does with the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Hash the tree and store it as the new baseline
    Write,
    /// Hash the tree and report differences against the stored baseline
    Read,
}

impl FromStr for Mode {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "w" | "write" => Ok(Mode::Write),
            "r" | "read" => Ok(Mode::Read),
            other => Err(ApiError::InvalidMode(other.to_string())),
        }
    }
}

/// Load configuration (explicit file or layered sources) and apply CLI flags on top.
pub fn load_config(cli: &Cli, cwd: &Path) -> Result<TreeprintConfig, ApiError> {
    let config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(cwd)?,
    };
    apply_cli_overrides(config, cli).validated()
}

/// CLI flags override config file values. Precedence: flags > env > files > defaults.
pub fn apply_cli_overrides(mut config: TreeprintConfig, cli: &Cli) -> TreeprintConfig {
    if let Some(jobs) = cli.jobs {
        config.hashing.concurrency = jobs;
    }
    if let Some(algorithm) = cli.algorithm {
        config.hashing.algorithm = algorithm;
    }
    if let Some(ref baseline) = cli.baseline {
        config.storage.baseline_file = baseline.clone();
    }
    if let Some(ref format) = cli.format {
        config.output.format = format.clone();
    }
    if cli.no_color {
        config.output.color = false;
        config.logging.color = false;
    }
    if cli.follow_symlinks {
        config.walker.follow_symlinks = true;
    }
    config.walker.ignore_patterns.extend(cli.ignore.iter().cloned());

    let logging = &mut config.logging;
    if cli.quiet {
        logging.enabled = false;
    }
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        logging.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        logging.file = Some(file.clone());
        if cli.log_output.is_none() {
            logging.output = "file".to_string();
        }
    }

    config
}

/// Runtime context for one CLI invocation: root, resolved config and presentation.
pub struct RunContext {
    root: PathBuf,
    config: TreeprintConfig,
    baseline: PathBuf,
    styler: Styler,
    /// Print progress lines to stderr
    progress: bool,
}

impl RunContext {
    pub fn new(root: PathBuf, config: TreeprintConfig, cwd: &Path) -> Self {
        let baseline = config.storage.resolve_baseline(cwd);
        let styler = Styler::new(config.output.color);
        Self {
            root,
            config,
            baseline,
            styler,
            progress: true,
        }
    }

    /// Disable progress lines (used by `--quiet` and tests)
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn baseline_path(&self) -> &Path {
        &self.baseline
    }

    /// Run the given mode, returning the text destined for stdout
    pub fn execute(&self, mode: Mode) -> Result<String, ApiError> {
        match mode {
            Mode::Write => self.write_baseline(),
            Mode::Read => self.read_and_diff(),
        }
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn write_baseline(&self) -> Result<String, ApiError> {
        let (inventory, run) = self.scan()?;

        self.status(&self.styler.info(&format!(
            "Writing checksums to {}",
            self.baseline.display()
        )));
        let store = JsonInventoryStore::new(&self.baseline);
        let receipt = store.store(&inventory)?;

        Ok(format_write_summary(
            inventory.len(),
            run.failures.len(),
            &receipt,
            self.styler,
        ))
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn read_and_diff(&self) -> Result<String, ApiError> {
        let store = JsonInventoryStore::new(&self.baseline);
        self.status(&self.styler.info(&format!(
            "Loading existing checksums from {}",
            store.location()
        )));
        let loaded = Inventory::load(&store);
        if let Some(ref diagnostic) = loaded.diagnostic {
            // Always shown: an empty baseline makes every file look new
            eprintln!(
                "{}",
                format_load_diagnostic(diagnostic, &store.location(), self.styler)
            );
        }
        if loaded.skipped_entries > 0 {
            warn!(skipped = loaded.skipped_entries, "Ignored non-string baseline entries");
        }

        let (current, _run) = self.scan()?;

        let changes = reconcile::diff(&loaded.inventory, &current);
        let report = report::format(&changes);
        info!(changes = changes.len(), "Comparison completed");

        format_report(&report, &self.config.output.format, self.styler)
    }

    /// Walk the root and hash every file found
    fn scan(&self) -> Result<(Inventory, HashRun), ApiError> {
        self.status(&self.styler.info(&format!(
            "Scanning directory: {}",
            self.root.display()
        )));

        let walker_config = self
            .config
            .walker
            .to_walker_config(vec![self.baseline.clone()]);
        let walk = Walker::with_config(self.root.clone(), walker_config).walk_with_summary()?;
        if walk.skipped > 0 {
            self.status(&self.styler.warning(&format!(
                "Skipped {} unreadable entr{} while scanning",
                walk.skipped,
                if walk.skipped == 1 { "y" } else { "ies" }
            )));
        }
        if !walk.collisions.is_empty() {
            eprintln!("{}", format_collisions(&walk.collisions, self.styler));
        }
        if walk.files.is_empty() {
            return Err(ApiError::NoFilesFound(self.root.clone()));
        }

        self.status(&self.styler.success(&format!(
            "Found {} files. Computing hashes...",
            walk.files.len()
        )));

        let hashing = &self.config.hashing;
        let engine = HashingEngine::new(&self.root)
            .with_algorithm(hashing.algorithm)
            .with_buffer_size(hashing.buffer_size);
        let run = engine.run(&walk.files, hashing.concurrency);

        if !run.failures.is_empty() {
            eprintln!("{}", format_failures(&run.failures, self.styler));
        }

        let inventory = Inventory::from_hashes(run.hashes.iter().cloned());
        Ok((inventory, run))
    }

    fn status(&self, line: &str) {
        if self.progress {
            eprintln!("{}", line);
        }
    }
}
