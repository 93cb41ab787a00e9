//! Treeprint CLI Binary
//!
//! Writes a content-addressed inventory of a directory tree, or compares the
//! tree against a stored inventory and reports what moved, changed or vanished.

use clap::error::ErrorKind;
use clap::Parser;
use std::process;
use tracing::{error, info};
use treeprint::cli::{load_config, map_error, Cli, Mode, RunContext};
use treeprint::error::{ApiError, StorageError};
use treeprint::logging::init_logging;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
                _ => process::exit(1),
            }
        }
    };

    if let Err(e) = run(cli) {
        error!("Command failed: {}", e);
        eprintln!("{}", map_error(&e));
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), ApiError> {
    let mode: Mode = cli.mode.parse()?;
    let cwd = std::env::current_dir().map_err(StorageError::from)?;

    let config = load_config(&cli, &cwd)?;
    if let Err(e) = init_logging(Some(&config.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    info!(mode = ?mode, root = %cli.root.display(), "Treeprint starting");

    let context = RunContext::new(cli.root.clone(), config, &cwd).with_progress(!cli.quiet);
    let output = context.execute(mode)?;
    println!("{}", output);

    info!("Command completed successfully");
    Ok(())
}
