//! CLI presentation: text and JSON rendering of run results.
//!
//! Color is a property of the [`Styler`] value handed to each formatter; no
//! process-wide terminal state is touched.

use crate::error::ApiError;
use crate::inventory::LoadDiagnostic;
use crate::reconcile::{ChangeKind, ChangeRecord};
use crate::report::Report;
use crate::store::StoreReceipt;
use crate::tree::{HashFailure, KeyCollision};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Digest prefix length shown in tables
const SHORT_HASH_LEN: usize = 12;

/// Applies (or skips) terminal colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styler {
    color: bool,
}

impl Styler {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn success(&self, text: &str) -> String {
        if self.color {
            text.bright_green().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn error(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    pub fn info(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn kind(&self, kind: ChangeKind) -> String {
        let label = kind.as_str();
        if !self.color {
            return label.to_string();
        }
        match kind {
            ChangeKind::Moved => label.cyan().to_string(),
            ChangeKind::Renamed => label.blue().to_string(),
            ChangeKind::Modified => label.yellow().to_string(),
            ChangeKind::Added => label.green().to_string(),
            ChangeKind::Removed => label.red().to_string(),
        }
    }
}

/// First `SHORT_HASH_LEN` characters; baseline digests are not guaranteed ASCII
fn short_hash(hash: &str) -> &str {
    hash.char_indices()
        .nth(SHORT_HASH_LEN)
        .map_or(hash, |(end, _)| &hash[..end])
}

/// Render a report as a heading, a change table and a per-kind summary.
pub fn format_report_text(report: &Report, styler: Styler) -> String {
    let changes = match report {
        Report::NoDifferences => return styler.success("No differences found"),
        Report::Differences(changes) => changes,
    };

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Status", "Path", "Details"]);
    for change in changes {
        let (path, details) = match change {
            ChangeRecord::Moved {
                old_path,
                new_path,
                hash,
            } => (
                format!("{} -> {}", old_path, new_path),
                short_hash(hash).to_string(),
            ),
            ChangeRecord::Renamed {
                old_name,
                new_name,
                hash,
            } => (
                format!("{} -> {}", old_name, new_name),
                short_hash(hash).to_string(),
            ),
            ChangeRecord::Modified {
                filename,
                old_hash,
                new_hash,
            } => (
                filename.clone(),
                format!("{} -> {}", short_hash(old_hash), short_hash(new_hash)),
            ),
            ChangeRecord::Added { filename, hash } | ChangeRecord::Removed { filename, hash } => {
                (filename.clone(), short_hash(hash).to_string())
            }
        };
        table.add_row(vec![change.kind().as_str().to_string(), path, details]);
    }

    let summary = report.summary();
    let counts: Vec<String> = ChangeKind::ALL
        .iter()
        .filter(|kind| summary.count(**kind) > 0)
        .map(|kind| format!("{} {}", summary.count(*kind), styler.kind(*kind)))
        .collect();

    format!(
        "{}\n{}\n{} change(s): {}",
        styler.heading("Differences found:"),
        table,
        summary.total(),
        counts.join(", ")
    )
}

/// Render a report in the requested format ("text" or "json").
pub fn format_report(report: &Report, format: &str, styler: Styler) -> Result<String, ApiError> {
    if format == "json" {
        return Ok(report.to_json_pretty()?);
    }
    Ok(format_report_text(report, styler))
}

/// List files that could not be hashed.
pub fn format_failures(failures: &[HashFailure], styler: Styler) -> String {
    let mut lines = vec![styler.error(&format!(
        "{} file(s) could not be hashed and were recorded as ERROR:",
        failures.len()
    ))];
    for failure in failures {
        lines.push(format!(
            "  - {} ({}: {})",
            failure.relative_path, failure.kind, failure.message
        ));
    }
    lines.join("\n")
}

/// List files left out because another file already claimed their key.
pub fn format_collisions(collisions: &[KeyCollision], styler: Styler) -> String {
    let mut lines = vec![styler.warning(&format!(
        "{} inventory key(s) are shared by distinct files; only the first file is recorded:",
        collisions.len()
    ))];
    for collision in collisions {
        lines.push(format!(
            "  - {} (kept {}, skipped {})",
            collision.key,
            collision.kept.display(),
            collision
                .dropped
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    lines.join("\n")
}

/// Summary printed after a baseline has been written.
pub fn format_write_summary(files: usize, failed: usize, receipt: &StoreReceipt, styler: Styler) -> String {
    let mut lines = Vec::new();
    if receipt.size_mismatch() {
        lines.push(styler.warning(&format!(
            "Warning: File size mismatch. Expected: {} bytes, wrote: {} bytes",
            receipt.expected_bytes, receipt.written_bytes
        )));
    } else {
        lines.push(styler.success(&format!(
            "Successfully wrote {} bytes to {}",
            receipt.written_bytes, receipt.location
        )));
    }
    let mut counts = format!("Inventoried {} file(s)", files);
    if failed > 0 {
        counts.push_str(&format!(", {} unreadable", failed));
    }
    lines.push(counts);
    lines.join("\n")
}

/// Explain why the baseline is empty so "everything added" is not misread.
pub fn format_load_diagnostic(diagnostic: &LoadDiagnostic, location: &str, styler: Styler) -> String {
    styler.warning(&format!(
        "Warning: {} ({}); every file will be reported as Added",
        diagnostic, location
    ))
}
