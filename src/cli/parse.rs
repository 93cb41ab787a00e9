//! CLI parse: clap types for treeprint. No behavior; definitions only.

use crate::tree::{Concurrency, DigestAlgorithm};
use clap::Parser;
use std::path::PathBuf;

/// Treeprint CLI - content-addressed file tree inventories and change audits
#[derive(Parser, Debug)]
#[command(name = "treeprint", version)]
#[command(about = "Inventory every file under a directory and audit it for moves, renames and edits")]
pub struct Cli {
    /// Directory to inventory
    pub root: PathBuf,

    /// Mode: w (write baseline inventory) or r (read baseline and show differences)
    pub mode: String,

    /// Baseline inventory file (default: checksums.json in the working directory)
    #[arg(long)]
    pub baseline: Option<PathBuf>,

    /// Hashing workers: "auto" or a positive integer
    #[arg(long, short = 'j')]
    pub jobs: Option<Concurrency>,

    /// Digest algorithm (sha256, blake3)
    #[arg(long)]
    pub algorithm: Option<DigestAlgorithm>,

    /// Report format (text or json)
    #[arg(long)]
    pub format: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// File or directory name to skip (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Follow symbolic links while walking
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Suppress progress messages and logging
    #[arg(long, short)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
