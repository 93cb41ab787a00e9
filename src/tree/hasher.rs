//! Content digests for file bytes using SHA-256 or BLAKE3

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Read chunk size used when streaming file content (64 KiB)
pub const DEFAULT_BUFFER_SIZE: usize = 1 << 16;

/// Hash function used to fingerprint file content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, the format of existing `checksums.json` baselines
    #[default]
    Sha256,
    Blake3,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "blake3" => Ok(DigestAlgorithm::Blake3),
            other => Err(format!(
                "Unknown digest algorithm: {} (must be 'sha256' or 'blake3')",
                other
            )),
        }
    }
}

/// Incremental state for either algorithm
enum StreamHasher {
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl StreamHasher {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Sha256 => StreamHasher::Sha256(Sha256::new()),
            DigestAlgorithm::Blake3 => StreamHasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    fn update(&mut self, chunk: &[u8]) {
        match self {
            StreamHasher::Sha256(h) => h.update(chunk),
            StreamHasher::Blake3(h) => {
                h.update(chunk);
            }
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            StreamHasher::Sha256(h) => hex::encode(h.finalize()),
            StreamHasher::Blake3(h) => hex::encode(h.finalize().as_bytes()),
        }
    }
}

/// Digest of a stream and the number of bytes that went into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDigest {
    /// Lowercase hex, no separators
    pub hex: String,
    pub bytes_read: u64,
}

/// Stream a reader through the digest in fixed-size chunks
///
/// Memory use is bounded by `buffer_size` regardless of input length. Read
/// errors are returned to the caller; the digest itself cannot fail.
pub fn digest_reader<R: Read>(
    mut reader: R,
    algorithm: DigestAlgorithm,
    buffer_size: usize,
) -> io::Result<StreamDigest> {
    let mut hasher = StreamHasher::new(algorithm);
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut bytes_read = 0u64;

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
                bytes_read += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(StreamDigest {
        hex: hasher.finalize_hex(),
        bytes_read,
    })
}

/// Digest of the file at `path`
pub fn digest_file(
    path: &Path,
    algorithm: DigestAlgorithm,
    buffer_size: usize,
) -> io::Result<String> {
    let file = File::open(path)?;
    Ok(digest_reader(file, algorithm, buffer_size)?.hex)
}

/// Digest of in-memory content
pub fn digest_bytes(content: &[u8], algorithm: DigestAlgorithm) -> String {
    let mut hasher = StreamHasher::new(algorithm);
    hasher.update(content);
    hasher.finalize_hex()
}
