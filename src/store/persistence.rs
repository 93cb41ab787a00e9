//! JSON file persistence for inventories

use crate::error::StorageError;
use crate::inventory::Inventory;
use crate::store::{InventoryStore, StoreReceipt};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Baseline file name used when none is configured
pub const DEFAULT_BASELINE_FILE: &str = "checksums.json";

/// Stores an inventory as a pretty-printed JSON object of path → digest
#[derive(Debug, Clone)]
pub struct JsonInventoryStore {
    path: PathBuf,
}

impl JsonInventoryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn serialize(inventory: &Inventory) -> Result<String, StorageError> {
        serde_json::to_string_pretty(inventory)
            .map_err(|e| StorageError::Serialization(format!("Failed to serialize inventory: {}", e)))
    }
}

impl InventoryStore for JsonInventoryStore {
    fn load_raw(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::IoError(e)),
        }
    }

    /// Write the inventory, then verify the on-disk size against the document length
    fn store(&self, inventory: &Inventory) -> Result<StoreReceipt, StorageError> {
        let document = Self::serialize(inventory)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, document.as_bytes())?;

        let receipt = StoreReceipt {
            location: self.location(),
            expected_bytes: document.len() as u64,
            written_bytes: fs::metadata(&self.path)?.len(),
        };

        if receipt.size_mismatch() {
            warn!(
                baseline = %receipt.location,
                expected = receipt.expected_bytes,
                written = receipt.written_bytes,
                "File size mismatch after writing baseline"
            );
        } else {
            info!(
                baseline = %receipt.location,
                bytes = receipt.written_bytes,
                entries = inventory.len(),
                "Baseline written"
            );
        }

        Ok(receipt)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
