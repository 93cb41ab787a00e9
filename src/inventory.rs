//! Inventory: a path → digest snapshot of a file tree
//!
//! Built fresh from a hashing run, or loaded from a persisted baseline for
//! the "previous" side of a comparison. Entries are kept sorted by path so
//! that every walk over an inventory is stable for a given input.

use crate::store::InventoryStore;
use crate::tree::engine::{FileHash, ERROR_DIGEST};
use crate::tree::path;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

/// Mapping from normalized relative path to hex digest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory {
    entries: BTreeMap<String, String>,
}

/// Keys pass through [`Inventory::insert`], so they come out normalized
impl<'de> Deserialize<'de> for Inventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        let mut inventory = Inventory::new();
        for (path, digest) in raw {
            inventory.insert(path, digest);
        }
        Ok(inventory)
    }
}

/// Why a persisted baseline could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadDiagnostic {
    /// Nothing stored yet
    Missing,
    Unreadable(String),
    Malformed(String),
}

impl fmt::Display for LoadDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadDiagnostic::Missing => f.write_str("baseline not found"),
            LoadDiagnostic::Unreadable(msg) => write!(f, "baseline could not be read: {}", msg),
            LoadDiagnostic::Malformed(msg) => write!(f, "baseline is malformed: {}", msg),
        }
    }
}

/// Outcome of loading a baseline; a diagnostic means the inventory is empty
#[derive(Debug, Clone, Default)]
pub struct LoadedInventory {
    pub inventory: Inventory,
    pub diagnostic: Option<LoadDiagnostic>,
    /// Entries dropped because their value was not a string
    pub skipped_entries: usize,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold hashing results into an inventory (last write wins on duplicate paths)
    pub fn from_hashes<I>(hashes: I) -> Self
    where
        I: IntoIterator<Item = FileHash>,
    {
        let mut inventory = Self::new();
        for hash in hashes {
            inventory.insert(hash.relative_path, hash.digest);
        }
        inventory
    }

    /// Load a previously stored inventory
    ///
    /// Never fails: a missing, unreadable or malformed baseline yields an
    /// empty inventory together with a diagnostic for the operator.
    pub fn load(store: &dyn InventoryStore) -> LoadedInventory {
        let location = store.location();
        let bytes = match store.load_raw() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                warn!(baseline = %location, "Baseline not found; starting from an empty inventory");
                return LoadedInventory::empty(LoadDiagnostic::Missing);
            }
            Err(e) => {
                warn!(baseline = %location, error = %e, "Failed to read baseline");
                return LoadedInventory::empty(LoadDiagnostic::Unreadable(e.to_string()));
            }
        };

        let value: serde_json::Value = match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(e) => {
                warn!(baseline = %location, error = %e, "Baseline parse error");
                return LoadedInventory::empty(LoadDiagnostic::Malformed(e.to_string()));
            }
        };

        let serde_json::Value::Object(map) = value else {
            warn!(baseline = %location, "Baseline is not a JSON object");
            return LoadedInventory::empty(LoadDiagnostic::Malformed(
                "expected a JSON object of path to digest".to_string(),
            ));
        };

        let mut loaded = LoadedInventory::default();
        for (key, value) in map {
            match value {
                serde_json::Value::String(digest) => loaded.inventory.insert(key, digest),
                other => {
                    warn!(path = %key, value = %other, "Skipping non-string baseline entry");
                    loaded.skipped_entries += 1;
                }
            }
        }

        info!(
            baseline = %location,
            entries = loaded.inventory.len(),
            "Loaded baseline"
        );
        loaded
    }

    /// Insert one entry, normalizing the path key
    pub fn insert(&mut self, relative_path: impl AsRef<str>, digest: impl Into<String>) {
        let key = path::normalize_relative(relative_path.as_ref());
        self.entries.insert(key, digest.into());
    }

    pub fn get(&self, relative_path: &str) -> Option<&str> {
        self.entries.get(relative_path).map(String::as_str)
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.entries.contains_key(relative_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, d)| (p.as_str(), d.as_str()))
    }

    /// Number of entries carrying the error sentinel
    pub fn error_count(&self) -> usize {
        self.entries.values().filter(|d| *d == ERROR_DIGEST).count()
    }
}

impl LoadedInventory {
    fn empty(diagnostic: LoadDiagnostic) -> Self {
        Self {
            inventory: Inventory::new(),
            diagnostic: Some(diagnostic),
            skipped_entries: 0,
        }
    }
}

impl FromIterator<FileHash> for Inventory {
    fn from_iter<T: IntoIterator<Item = FileHash>>(iter: T) -> Self {
        Self::from_hashes(iter)
    }
}
