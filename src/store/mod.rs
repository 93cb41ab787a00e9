//! Inventory Store
//!
//! Persists the inventory written in write mode so that a later read-mode
//! run has a baseline to reconcile against.

pub mod persistence;

pub use persistence::{JsonInventoryStore, DEFAULT_BASELINE_FILE};

use crate::error::StorageError;
use crate::inventory::Inventory;
use serde::Serialize;

/// What a store reports after writing an inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreReceipt {
    pub location: String,
    /// Length of the serialized document
    pub expected_bytes: u64,
    /// Size observed on the medium after the write
    pub written_bytes: u64,
}

impl StoreReceipt {
    pub fn size_mismatch(&self) -> bool {
        self.expected_bytes != self.written_bytes
    }
}

/// Inventory Store interface
pub trait InventoryStore {
    /// Raw persisted bytes, or `None` when nothing has been stored yet
    fn load_raw(&self) -> Result<Option<Vec<u8>>, StorageError>;

    fn store(&self, inventory: &Inventory) -> Result<StoreReceipt, StorageError>;

    /// Human-readable location for diagnostics
    fn location(&self) -> String;
}
