//! SHA-256 helpers for the audit chain and compliance reports

use sha2::{Digest, Sha256};

/// Previous-hash of the first entry ever appended to an empty journal
pub const GENESIS_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Lowercase-hex SHA-256 of a byte slice
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Chain hash: SHA-256 over `previous_hash || canonical_bytes`
pub fn chain_hash(previous_hash: &str, canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(previous_hash.as_bytes());
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

/// Whether a string is a well-formed lowercase-hex SHA-256 digest
pub fn is_well_formed_hash(candidate: &str) -> bool {
    candidate.len() == 64
        && candidate
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genesis_is_well_formed() {
        assert_eq!(GENESIS_HASH.len(), 64);
        assert!(is_well_formed_hash(GENESIS_HASH));
    }

    #[test]
    fn sha256_matches_known_vector() {
        // SHA-256("abc")
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn chain_hash_is_prefix_sensitive() {
        let a = chain_hash(GENESIS_HASH, "{}");
        let b = chain_hash(&a, "{}");
        assert_ne!(a, b);
        assert!(is_well_formed_hash(&a));
    }

    #[test]
    fn rejects_uppercase_and_short_digests() {
        assert!(!is_well_formed_hash("ABC"));
        assert!(!is_well_formed_hash(&"A".repeat(64)));
        assert!(is_well_formed_hash(&"a".repeat(64)));
    }
}
