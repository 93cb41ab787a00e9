//! CLI domain: parse, route, output, and presentation only.
//! Orchestration lives in the route; everything else is definitions or formatting.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::Cli;
pub use presentation::{
    format_collisions, format_failures, format_load_diagnostic, format_report, format_report_text,
    format_write_summary, Styler,
};
pub use route::{apply_cli_overrides, load_config, Mode, RunContext};
