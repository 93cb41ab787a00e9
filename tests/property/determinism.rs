//! Property-based tests for digest and path determinism

use proptest::prelude::*;
use std::io::Cursor;
use treeprint::tree::hasher::{digest_bytes, digest_reader, DigestAlgorithm};
use treeprint::tree::path::normalize_relative;

fn algorithm() -> impl Strategy<Value = DigestAlgorithm> {
    prop_oneof![Just(DigestAlgorithm::Sha256), Just(DigestAlgorithm::Blake3)]
}

proptest! {
    /// Streaming digest does not depend on the read chunk size
    #[test]
    fn digest_independent_of_buffer_size(
        content in proptest::collection::vec(any::<u8>(), 0..4096),
        buffer_size in 1usize..512,
        algorithm in algorithm(),
    ) {
        let streamed = digest_reader(Cursor::new(&content), algorithm, buffer_size).unwrap();
        prop_assert_eq!(streamed.bytes_read, content.len() as u64);
        prop_assert_eq!(streamed.hex, digest_bytes(&content, algorithm));
    }

    /// Digests are lowercase hex of the algorithm's width
    #[test]
    fn digest_is_lowercase_hex(content in any::<Vec<u8>>(), algorithm in algorithm()) {
        let digest = digest_bytes(&content, algorithm);
        prop_assert_eq!(digest.len(), 64);
        prop_assert!(digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    /// Distinct content yields distinct digests
    #[test]
    fn distinct_content_distinct_digest(a in any::<Vec<u8>>(), b in any::<Vec<u8>>()) {
        prop_assume!(a != b);
        prop_assert_ne!(
            digest_bytes(&a, DigestAlgorithm::Sha256),
            digest_bytes(&b, DigestAlgorithm::Sha256)
        );
    }

    /// Normalizing a path twice changes nothing
    #[test]
    fn normalize_is_idempotent(raw in "[a-zA-Z0-9_./\\\\]{0,40}") {
        let once = normalize_relative(&raw);
        prop_assert_eq!(normalize_relative(&once), once.clone());
        prop_assert!(!once.contains('\\'));
    }
}
