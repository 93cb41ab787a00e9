//! Relative path normalization for inventory keys

use crate::error::StorageError;
use std::path::{Component, Path};
use unicode_normalization::UnicodeNormalization;

/// Normalize a tree-relative path string into an inventory key
///
/// This function:
/// 1. Uses `/` as the only separator (backslashes are converted)
/// 2. Drops empty and `.` components (so `./a//b/` becomes `a/b`)
/// 3. Normalizes Unicode to NFC
///
/// Keys produced on different platforms for the same file compare equal.
pub fn normalize_relative(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let joined = unified
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/");
    joined.nfc().collect()
}

/// Final component of a normalized relative path
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Express `path` relative to `root` as a normalized inventory key
pub fn relative_to(root: &Path, path: &Path) -> Result<String, StorageError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        StorageError::InvalidPath(format!("{:?} is not under root {:?}", path, root))
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
            Component::CurDir => {}
            other => {
                return Err(StorageError::InvalidPath(format!(
                    "Unexpected component {:?} in {:?}",
                    other, path
                )))
            }
        }
    }

    if parts.is_empty() {
        return Err(StorageError::InvalidPath(format!(
            "{:?} is the root itself",
            path
        )));
    }

    Ok(normalize_relative(&parts.join("/")))
}
