//! Filesystem walker that enumerates regular files under a root

use crate::error::StorageError;
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

/// Filesystem walker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false for determinism)
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Path components to skip (e.g., ".git", "node_modules")
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,
    /// Exact files to leave out, such as the baseline being written
    #[serde(skip)]
    pub exclude: Vec<PathBuf>,
}

/// One regular file found by a walk
///
/// `key` is the normalized inventory key; `path` is the root-relative path
/// exactly as stored on disk, which is what gets opened for hashing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WalkEntry {
    pub key: String,
    pub path: PathBuf,
}

/// Distinct files whose names normalize to the same inventory key
///
/// The entry with the smallest on-disk path is kept; the rest are not hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCollision {
    pub key: String,
    pub kept: PathBuf,
    pub dropped: Vec<PathBuf>,
}

/// Result of a walk: the files found, skipped entries and key collisions
#[derive(Debug, Clone, Default)]
pub struct WalkSummary {
    /// One entry per inventory key, sorted by key
    pub files: Vec<WalkEntry>,
    /// Entries below the root that could not be read
    pub skipped: usize,
    pub collisions: Vec<KeyCollision>,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the filesystem and collect every regular file
    ///
    /// Returns entries sorted by key for determinism.
    pub fn walk(&self) -> Result<Vec<WalkEntry>, StorageError> {
        Ok(self.walk_with_summary()?.files)
    }

    /// Walk the filesystem, also reporting skipped entries and key collisions
    ///
    /// A missing or non-directory root is fatal. Unreadable entries below the
    /// root are logged and skipped.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn walk_with_summary(&self) -> Result<WalkSummary, StorageError> {
        let root = self.canonical_root()?;
        let excluded: Vec<PathBuf> = self
            .config
            .exclude
            .iter()
            .filter_map(|p| dunce::canonicalize(p).ok())
            .collect();

        let walker = WalkDir::new(&root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX));

        let mut summary = WalkSummary::default();
        let mut found = Vec::new();
        let mut iter = walker.into_iter();

        while let Some(entry) = iter.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.depth() == 0 {
                        return Err(StorageError::Traversal {
                            path: root.clone(),
                            reason: e.to_string(),
                        });
                    }
                    warn!(error = %e, "Skipping unreadable entry");
                    summary.skipped += 1;
                    continue;
                }
            };

            if entry.depth() > 0 && self.should_ignore(&entry) {
                if entry.file_type().is_dir() {
                    iter.skip_current_dir();
                }
                continue;
            }

            if !entry.file_type().is_file() {
                // Directories and, when not following links, symlinks
                continue;
            }

            let entry_path = entry.path();
            if !excluded.is_empty() && excluded.iter().any(|ex| ex == entry_path) {
                debug!(path = %entry_path.display(), "Excluded from walk");
                continue;
            }

            match path::relative_to(&root, entry_path) {
                Ok(key) => found.push(WalkEntry {
                    key,
                    path: entry_path.strip_prefix(&root).unwrap_or(entry_path).to_path_buf(),
                }),
                Err(e) => {
                    warn!(error = %e, "Skipping entry outside root");
                    summary.skipped += 1;
                }
            }
        }

        found.sort();
        let (files, collisions) = split_collisions(found);
        summary.files = files;
        summary.collisions = collisions;
        debug!(
            file_count = summary.files.len(),
            skipped = summary.skipped,
            collisions = summary.collisions.len(),
            "Walked filesystem"
        );
        Ok(summary)
    }

    fn canonical_root(&self) -> Result<PathBuf, StorageError> {
        let root = dunce::canonicalize(&self.root).map_err(|e| StorageError::Traversal {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;
        if !root.is_dir() {
            return Err(StorageError::Traversal {
                path: self.root.clone(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(root)
    }

    /// Check if the entry name matches an ignore pattern; ignored directories are pruned
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        if self.config.ignore_patterns.is_empty() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| name == pattern.as_str())
    }

    /// Root directory being walked
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Keep the first entry per key from a sorted list, collecting the others
fn split_collisions(sorted: Vec<WalkEntry>) -> (Vec<WalkEntry>, Vec<KeyCollision>) {
    let mut files: Vec<WalkEntry> = Vec::with_capacity(sorted.len());
    let mut collisions: Vec<KeyCollision> = Vec::new();

    for entry in sorted {
        let Some(last) = files.last() else {
            files.push(entry);
            continue;
        };
        if last.key != entry.key {
            files.push(entry);
            continue;
        }

        warn!(
            key = %entry.key,
            kept = %last.path.display(),
            dropped = %entry.path.display(),
            "Distinct files share one inventory key"
        );
        match collisions.last_mut() {
            Some(collision) if collision.key == entry.key => collision.dropped.push(entry.path),
            _ => collisions.push(KeyCollision {
                key: entry.key,
                kept: last.path.clone(),
                dropped: vec![entry.path],
            }),
        }
    }

    (files, collisions)
}
