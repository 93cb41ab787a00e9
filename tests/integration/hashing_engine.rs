//! Hashing engine verification against real trees

use super::test_utils::{snapshot, write_file};
use sha2::{Digest, Sha256};
use std::fs;
use tempfile::TempDir;
use treeprint::tree::hasher::{digest_bytes, DigestAlgorithm};
use treeprint::tree::{Concurrency, HashErrorKind, HashingEngine, Walker, ERROR_DIGEST};

/// Digest of a file matches SHA-256 computed directly
#[test]
fn test_file_digest_matches_sha256() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "doc.txt", "test content");

    let hashes = HashingEngine::new(temp_dir.path())
        .compute_hashes(&["doc.txt".to_string()], Concurrency::Auto);

    let expected = hex::encode(Sha256::digest(b"test content"));
    assert_eq!(hashes.len(), 1);
    assert_eq!(hashes[0].digest, expected);
}

/// BLAKE3 mode agrees with the blake3 crate
#[test]
fn test_blake3_mode_matches_blake3() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "doc.txt", "test content");

    let hashes = HashingEngine::new(temp_dir.path())
        .with_algorithm(DigestAlgorithm::Blake3)
        .compute_hashes(&["doc.txt".to_string()], Concurrency::Auto);

    assert_eq!(
        hashes[0].digest,
        blake3::hash(b"test content").to_hex().to_string()
    );
}

/// Worker count never changes the resulting inventory
#[test]
fn test_inventory_independent_of_worker_count() {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..40 {
        write_file(
            temp_dir.path(),
            &format!("dir{}/file{}.txt", i % 5, i),
            &format!("content {}", i),
        );
    }

    let single = snapshot(temp_dir.path(), Concurrency::fixed(1).unwrap());
    let many = snapshot(temp_dir.path(), Concurrency::fixed(16).unwrap());
    let auto = snapshot(temp_dir.path(), Concurrency::Auto);

    assert_eq!(single.len(), 40);
    assert_eq!(single, many);
    assert_eq!(single, auto);
}

/// A file that disappears between walk and hash is isolated as ERROR
#[test]
fn test_vanished_file_is_isolated() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "keep.txt", "keep");
    write_file(temp_dir.path(), "gone.txt", "gone");

    let files = Walker::new(temp_dir.path().to_path_buf()).walk().unwrap();
    fs::remove_file(temp_dir.path().join("gone.txt")).unwrap();

    let run = HashingEngine::new(temp_dir.path()).run(&files, Concurrency::fixed(2).unwrap());

    assert_eq!(run.hashes.len(), 2);
    let gone = run
        .hashes
        .iter()
        .find(|h| h.relative_path == "gone.txt")
        .unwrap();
    assert_eq!(gone.digest, ERROR_DIGEST);
    let keep = run
        .hashes
        .iter()
        .find(|h| h.relative_path == "keep.txt")
        .unwrap();
    assert_eq!(keep.digest, digest_bytes(b"keep", DigestAlgorithm::Sha256));

    assert_eq!(run.failures.len(), 1);
    assert_eq!(run.failures[0].kind, HashErrorKind::NotFound);
}

/// Large files hash identically regardless of read chunk size
#[test]
fn test_large_file_chunking() {
    let temp_dir = TempDir::new().unwrap();
    let content: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
    fs::write(temp_dir.path().join("big.bin"), &content).unwrap();
    let files = vec!["big.bin".to_string()];

    let small = HashingEngine::new(temp_dir.path())
        .with_buffer_size(7)
        .compute_hashes(&files, Concurrency::Auto);
    let large = HashingEngine::new(temp_dir.path())
        .with_buffer_size(1 << 20)
        .compute_hashes(&files, Concurrency::Auto);

    assert_eq!(small, large);
    assert_eq!(small[0].digest, digest_bytes(&content, DigestAlgorithm::Sha256));
}

/// Empty files get the digest of empty input
#[test]
fn test_empty_file_digest() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "empty", "");

    let hashes =
        HashingEngine::new(temp_dir.path()).compute_hashes(&["empty".to_string()], Concurrency::Auto);
    assert_eq!(
        hashes[0].digest,
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
    );
}

/// A decomposed (NFD) file name is hashed from disk and keyed in NFC
#[test]
fn test_decomposed_file_name_hashes_cleanly() {
    let temp_dir = TempDir::new().unwrap();
    write_file(temp_dir.path(), "cafe\u{0301}.txt", "coffee");

    let files = Walker::new(temp_dir.path().to_path_buf()).walk().unwrap();
    let run = HashingEngine::new(temp_dir.path()).run(&files, Concurrency::Auto);

    assert!(run.failures.is_empty(), "{:?}", run.failures);
    assert_eq!(run.hashes.len(), 1);
    assert_eq!(run.hashes[0].relative_path, "caf\u{e9}.txt");
    assert_eq!(
        run.hashes[0].digest,
        digest_bytes(b"coffee", DigestAlgorithm::Sha256)
    );
}

/// A non-UTF-8 file name still hashes; only its key is lossy
#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_file_name_hashes_cleanly() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let temp_dir = TempDir::new().unwrap();
    let name = OsStr::from_bytes(b"raw\xff.bin");
    fs::write(temp_dir.path().join(name), "bytes").unwrap();

    let files = Walker::new(temp_dir.path().to_path_buf()).walk().unwrap();
    let run = HashingEngine::new(temp_dir.path()).run(&files, Concurrency::Auto);

    assert!(run.failures.is_empty(), "{:?}", run.failures);
    assert_eq!(run.hashes[0].relative_path, "raw\u{fffd}.bin");
}
