//! Reconciliation of two inventories
//!
//! Changes are classified by content identity first and path identity
//! second, in four fixed phases:
//!
//! 1. Moved / Renamed: a digest present on both sides under different paths
//! 2. Modified: same path, different digest
//! 3. Added: path only in the new inventory
//! 4. Removed: path only in the old inventory
//!
//! A path consumed by an earlier phase is skipped by every later one, so each
//! path appears in at most one record.
//!
//! Duplicate digests: each side keeps one representative path per digest
//! (the last in path order). Other paths sharing that digest are not paired
//! and fall through to Added / Removed.

use crate::inventory::Inventory;
use crate::tree::engine::ERROR_DIGEST;
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use tracing::{debug, instrument};

/// One classified difference between two inventories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ChangeRecord {
    /// Same file name, different directory, identical content
    Moved {
        old_path: String,
        new_path: String,
        hash: String,
    },
    /// Different file name, identical content
    Renamed {
        old_name: String,
        new_name: String,
        hash: String,
    },
    Modified {
        filename: String,
        old_hash: String,
        new_hash: String,
    },
    Added {
        filename: String,
        hash: String,
    },
    Removed {
        filename: String,
        hash: String,
    },
}

/// Discriminant of a [`ChangeRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChangeKind {
    Moved,
    Renamed,
    Modified,
    Added,
    Removed,
}

impl ChangeKind {
    pub const ALL: [ChangeKind; 5] = [
        ChangeKind::Moved,
        ChangeKind::Renamed,
        ChangeKind::Modified,
        ChangeKind::Added,
        ChangeKind::Removed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Moved => "Moved",
            ChangeKind::Renamed => "Renamed",
            ChangeKind::Modified => "Modified",
            ChangeKind::Added => "Added",
            ChangeKind::Removed => "Removed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ChangeRecord {
    pub fn kind(&self) -> ChangeKind {
        match self {
            ChangeRecord::Moved { .. } => ChangeKind::Moved,
            ChangeRecord::Renamed { .. } => ChangeKind::Renamed,
            ChangeRecord::Modified { .. } => ChangeKind::Modified,
            ChangeRecord::Added { .. } => ChangeKind::Added,
            ChangeRecord::Removed { .. } => ChangeKind::Removed,
        }
    }

    /// Old and new path touched by this record
    pub fn paths(&self) -> (Option<&str>, Option<&str>) {
        match self {
            ChangeRecord::Moved {
                old_path, new_path, ..
            } => (Some(old_path), Some(new_path)),
            ChangeRecord::Renamed {
                old_name, new_name, ..
            } => (Some(old_name), Some(new_name)),
            ChangeRecord::Modified { filename, .. } => (Some(filename), Some(filename)),
            ChangeRecord::Added { filename, .. } => (None, Some(filename)),
            ChangeRecord::Removed { filename, .. } => (Some(filename), None),
        }
    }
}

/// Digest → representative path for one inventory
///
/// Built in path order with overwrite, so the last path per digest wins.
/// Error-sentinel entries carry no content identity and are left out.
struct DigestIndex<'a> {
    by_digest: BTreeMap<&'a str, &'a str>,
}

impl<'a> DigestIndex<'a> {
    fn build(inventory: &'a Inventory) -> Self {
        let mut by_digest = BTreeMap::new();
        for (path, digest) in inventory.iter() {
            if digest == ERROR_DIGEST {
                continue;
            }
            by_digest.insert(digest, path);
        }
        Self { by_digest }
    }

    fn get(&self, digest: &str) -> Option<&'a str> {
        self.by_digest.get(digest).copied()
    }

    fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + '_ {
        self.by_digest.iter().map(|(d, p)| (*d, *p))
    }
}

/// Diff two inventories into an ordered sequence of changes
///
/// Output order: moves and renames, then modifications, additions, removals.
/// Within a phase, moves follow digest order and the rest follow path order.
#[instrument(skip_all, fields(old = old.len(), new = new.len()))]
pub fn diff(old: &Inventory, new: &Inventory) -> Vec<ChangeRecord> {
    let old_index = DigestIndex::build(old);
    let new_index = DigestIndex::build(new);
    let mut processed: HashSet<&str> = HashSet::new();
    let mut changes = Vec::new();

    // Phase 1: moves and renames
    for (digest, old_path) in old_index.iter() {
        let Some(new_path) = new_index.get(digest) else {
            continue;
        };
        if old_path == new_path {
            continue;
        }

        let record = if path::file_name(old_path) == path::file_name(new_path) {
            ChangeRecord::Moved {
                old_path: old_path.to_string(),
                new_path: new_path.to_string(),
                hash: digest.to_string(),
            }
        } else {
            ChangeRecord::Renamed {
                old_name: old_path.to_string(),
                new_name: new_path.to_string(),
                hash: digest.to_string(),
            }
        };
        changes.push(record);
        processed.insert(old_path);
        processed.insert(new_path);
    }
    let relocated = changes.len();

    // Phase 2: modifications
    for (path, new_digest) in new.iter() {
        if processed.contains(path) {
            continue;
        }
        if let Some(old_digest) = old.get(path) {
            if old_digest != new_digest {
                changes.push(ChangeRecord::Modified {
                    filename: path.to_string(),
                    old_hash: old_digest.to_string(),
                    new_hash: new_digest.to_string(),
                });
                processed.insert(path);
            }
        }
    }

    // Phase 3: additions
    for (path, digest) in new.iter() {
        if !old.contains(path) && !processed.contains(path) {
            changes.push(ChangeRecord::Added {
                filename: path.to_string(),
                hash: digest.to_string(),
            });
        }
    }

    // Phase 4: removals
    for (path, digest) in old.iter() {
        if !new.contains(path) && !processed.contains(path) {
            changes.push(ChangeRecord::Removed {
                filename: path.to_string(),
                hash: digest.to_string(),
            });
        }
    }

    debug!(relocated, total = changes.len(), "Reconciliation completed");
    changes
}
