//! Bounded worker pool that digests a list of files
//!
//! Workers share one queue of pending files and one results buffer.
//! Each worker claims a single path under the queue lock, releases it, hashes
//! the file, then appends the outcome under the results lock. The two locks
//! are never held together and neither is held across file I/O.
//!
//! A file that cannot be read does not stop the run: its entry carries the
//! [`ERROR_DIGEST`] sentinel and a [`HashFailure`] describes what went wrong.

use crate::tree::hasher::{self, DigestAlgorithm, DEFAULT_BUFFER_SIZE};
use crate::tree::walker::WalkEntry;
use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, trace, warn};

/// Digest recorded for files that could not be hashed
pub const ERROR_DIGEST: &str = "ERROR";

/// Worker count used when the host parallelism cannot be determined
pub const FALLBACK_CONCURRENCY: usize = 4;

/// Number of hashing workers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concurrency {
    /// One worker per available CPU
    #[default]
    Auto,
    Fixed(NonZeroUsize),
}

impl Concurrency {
    pub fn fixed(workers: usize) -> Option<Self> {
        NonZeroUsize::new(workers).map(Concurrency::Fixed)
    }

    /// Concrete worker count for this host
    pub fn resolve(&self) -> usize {
        match self {
            Concurrency::Fixed(n) => n.get(),
            Concurrency::Auto => thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(FALLBACK_CONCURRENCY),
        }
    }
}

impl fmt::Display for Concurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concurrency::Auto => f.write_str("auto"),
            Concurrency::Fixed(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for Concurrency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Concurrency::Auto);
        }
        let n: usize = s
            .parse()
            .map_err(|_| format!("Invalid concurrency: {} (must be 'auto' or a positive integer)", s))?;
        Concurrency::fixed(n).ok_or_else(|| "Concurrency must be at least 1".to_string())
    }
}

impl Serialize for Concurrency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Concurrency::Auto => serializer.serialize_str("auto"),
            Concurrency::Fixed(n) => serializer.serialize_u64(n.get() as u64),
        }
    }
}

impl<'de> Deserialize<'de> for Concurrency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(n) => Concurrency::fixed(n as usize)
                .ok_or_else(|| serde::de::Error::custom("concurrency must be at least 1")),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Digest of one file from one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHash {
    pub relative_path: String,
    /// Lowercase hex digest, or [`ERROR_DIGEST`]
    pub digest: String,
}

impl FileHash {
    pub fn new(relative_path: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            digest: digest.into(),
        }
    }

    /// Entry for a file that could not be hashed
    pub fn error(relative_path: impl Into<String>) -> Self {
        Self::new(relative_path, ERROR_DIGEST)
    }

    pub fn is_error(&self) -> bool {
        self.digest == ERROR_DIGEST
    }
}

/// Why a file could not be hashed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashErrorKind {
    NotFound,
    PermissionDenied,
    NotAFile,
    Io,
}

impl From<io::ErrorKind> for HashErrorKind {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => HashErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => HashErrorKind::PermissionDenied,
            _ => HashErrorKind::Io,
        }
    }
}

impl fmt::Display for HashErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HashErrorKind::NotFound => "not found",
            HashErrorKind::PermissionDenied => "permission denied",
            HashErrorKind::NotAFile => "not a regular file",
            HashErrorKind::Io => "I/O error",
        };
        f.write_str(label)
    }
}

/// A per-file failure absorbed by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFailure {
    pub relative_path: String,
    pub kind: HashErrorKind,
    pub message: String,
}

impl HashFailure {
    fn from_io(relative_path: &str, err: &io::Error) -> Self {
        Self {
            relative_path: relative_path.to_string(),
            kind: err.kind().into(),
            message: err.to_string(),
        }
    }
}

/// Everything produced by one hashing run
#[derive(Debug, Clone, Default)]
pub struct HashRun {
    /// One entry per input path, in completion order
    pub hashes: Vec<FileHash>,
    pub failures: Vec<HashFailure>,
    /// Bytes actually read through the digest
    pub bytes_hashed: u64,
    pub workers: usize,
    pub elapsed: Duration,
}

/// A file the engine can hash: the key it is recorded under and where it lives
///
/// For plain strings the key doubles as the root-relative location.
pub trait HashTarget: Sync {
    fn key(&self) -> &str;
    fn location(&self) -> &Path;
}

impl HashTarget for String {
    fn key(&self) -> &str {
        self
    }

    fn location(&self) -> &Path {
        Path::new(self)
    }
}

impl HashTarget for WalkEntry {
    fn key(&self) -> &str {
        &self.key
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Shared state borrowed by every worker
struct WorkState<'a, T> {
    queue: Mutex<VecDeque<&'a T>>,
    results: Mutex<Vec<FileHash>>,
    failures: Mutex<Vec<HashFailure>>,
    bytes: AtomicU64,
}

/// Hashes files under a root directory with a fixed pool of threads
#[derive(Debug, Clone)]
pub struct HashingEngine {
    root: PathBuf,
    algorithm: DigestAlgorithm,
    buffer_size: usize,
}

impl HashingEngine {
    /// Create an engine that resolves relative paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            algorithm: DigestAlgorithm::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Hash every path, returning exactly one [`FileHash`] per input
    ///
    /// Output order follows completion, not input order.
    pub fn compute_hashes<T: HashTarget>(&self, paths: &[T], concurrency: Concurrency) -> Vec<FileHash> {
        self.run(paths, concurrency).hashes
    }

    /// Hash every path and report failures and throughput alongside the digests
    ///
    /// Blocks until every worker has finished its last file.
    #[instrument(skip(self, paths), fields(root = %self.root.display(), files = paths.len()))]
    pub fn run<T: HashTarget>(&self, paths: &[T], concurrency: Concurrency) -> HashRun {
        let start = Instant::now();
        let workers = concurrency.resolve().min(paths.len()).max(1);
        info!(workers, algorithm = %self.algorithm, "Starting hash run");

        let state = WorkState {
            queue: Mutex::new(paths.iter().collect()),
            results: Mutex::new(Vec::with_capacity(paths.len())),
            failures: Mutex::new(Vec::new()),
            bytes: AtomicU64::new(0),
        };

        thread::scope(|scope| {
            for worker_id in 0..workers {
                let state = &state;
                scope.spawn(move || self.work(worker_id, state));
            }
        });

        let run = HashRun {
            hashes: state.results.into_inner(),
            failures: state.failures.into_inner(),
            bytes_hashed: state.bytes.into_inner(),
            workers,
            elapsed: start.elapsed(),
        };

        info!(
            hashed = run.hashes.len() - run.failures.len(),
            failed = run.failures.len(),
            bytes = run.bytes_hashed,
            duration_ms = run.elapsed.as_millis(),
            "Hash run completed"
        );
        run
    }

    /// Worker loop: claim one file, hash it, publish, repeat until the queue is empty
    fn work<T: HashTarget>(&self, worker_id: usize, state: &WorkState<'_, T>) {
        let mut processed = 0usize;
        loop {
            let claimed = state.queue.lock().pop_front();
            let Some(target) = claimed else {
                break;
            };
            let key = target.key();

            let entry = match self.hash_one(key, target.location()) {
                Ok(digest) => {
                    state.bytes.fetch_add(digest.bytes_read, Ordering::Relaxed);
                    FileHash::new(key, digest.hex)
                }
                Err(failure) => {
                    warn!(
                        path = %failure.relative_path,
                        kind = %failure.kind,
                        error = %failure.message,
                        "Error processing file"
                    );
                    state.failures.lock().push(failure);
                    FileHash::error(key)
                }
            };

            state.results.lock().push(entry);
            processed += 1;
        }
        debug!(worker_id, processed, "Worker finished");
    }

    /// Digest `location` (relative to the root), reporting failures under `key`
    fn hash_one(&self, key: &str, location: &Path) -> Result<hasher::StreamDigest, HashFailure> {
        trace!(path = key, "Hashing file");
        let full_path = self.root.join(location);

        let file = File::open(&full_path).map_err(|e| HashFailure::from_io(key, &e))?;
        let metadata = file.metadata().map_err(|e| HashFailure::from_io(key, &e))?;
        if !metadata.is_file() {
            return Err(HashFailure {
                relative_path: key.to_string(),
                kind: HashErrorKind::NotAFile,
                message: format!("{} is not a regular file", full_path.display()),
            });
        }

        hasher::digest_reader(file, self.algorithm, self.buffer_size)
            .map_err(|e| HashFailure::from_io(key, &e))
    }
}
