//! Structured report over a reconciliation result

use crate::error::StorageError;
use crate::reconcile::{ChangeKind, ChangeRecord};
use serde::{Deserialize, Serialize};

/// Outcome of comparing two inventories
///
/// Serializes as `{"result":"no_differences"}` or
/// `{"result":"differences","changes":[...]}` so an empty comparison is never
/// confused with a report that has not been filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "changes", rename_all = "snake_case")]
pub enum Report {
    NoDifferences,
    Differences(Vec<ChangeRecord>),
}

/// Per-kind counts of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    pub moved: usize,
    pub renamed: usize,
    pub modified: usize,
    pub added: usize,
    pub removed: usize,
}

impl ChangeSummary {
    pub fn total(&self) -> usize {
        self.moved + self.renamed + self.modified + self.added + self.removed
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        match kind {
            ChangeKind::Moved => self.moved,
            ChangeKind::Renamed => self.renamed,
            ChangeKind::Modified => self.modified,
            ChangeKind::Added => self.added,
            ChangeKind::Removed => self.removed,
        }
    }
}

/// Build a report from reconciliation output
pub fn format(changes: &[ChangeRecord]) -> Report {
    if changes.is_empty() {
        Report::NoDifferences
    } else {
        Report::Differences(changes.to_vec())
    }
}

impl Report {
    pub fn has_differences(&self) -> bool {
        matches!(self, Report::Differences(_))
    }

    /// Records in reconciliation order; empty for [`Report::NoDifferences`]
    pub fn changes(&self) -> &[ChangeRecord] {
        match self {
            Report::NoDifferences => &[],
            Report::Differences(changes) => changes,
        }
    }

    pub fn summary(&self) -> ChangeSummary {
        let mut summary = ChangeSummary::default();
        for change in self.changes() {
            match change.kind() {
                ChangeKind::Moved => summary.moved += 1,
                ChangeKind::Renamed => summary.renamed += 1,
                ChangeKind::Modified => summary.modified += 1,
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Removed => summary.removed += 1,
            }
        }
        summary
    }

    pub fn to_json_pretty(&self) -> Result<String, StorageError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::Serialization(format!("Failed to serialize report: {}", e)))
    }
}
