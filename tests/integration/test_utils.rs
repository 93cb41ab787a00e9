//! Shared fixtures for integration tests

use std::fs;
use std::path::Path;
use treeprint::inventory::Inventory;
use treeprint::tree::{Concurrency, HashingEngine, Walker};

/// Write `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Walk and hash a tree with the default algorithm
pub fn snapshot(root: &Path, concurrency: Concurrency) -> Inventory {
    let files = Walker::new(root.to_path_buf()).walk().unwrap();
    let hashes = HashingEngine::new(root).compute_hashes(&files, concurrency);
    Inventory::from_hashes(hashes)
}
