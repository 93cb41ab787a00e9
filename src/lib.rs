//! Treeprint: content-addressed file tree inventories
//!
//! Walks a directory tree, digests every regular file in parallel and stores the
//! result as a flat path-to-digest inventory. A later run reconciles a fresh
//! inventory against the stored one and classifies each difference as a move,
//! rename, modification, addition or removal.

pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod reconcile;
pub mod report;
pub mod store;
pub mod tree;
