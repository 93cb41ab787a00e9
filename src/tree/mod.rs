//! File Tree Hashing
//!
//! Enumerates the regular files under a root and turns them into
//! content digests with a bounded pool of worker threads.

pub mod engine;
pub mod hasher;
pub mod path;
pub mod walker;

pub use engine::{
    Concurrency, FileHash, HashErrorKind, HashFailure, HashRun, HashTarget, HashingEngine,
    ERROR_DIGEST,
};
pub use hasher::DigestAlgorithm;
pub use walker::{KeyCollision, WalkEntry, WalkSummary, Walker, WalkerConfig};
