//! SHA-256 utilities
//!
//! Content hashing for archive integrity. No custom construction — a single
//! SHA-256 digest over the whole blob, hex-encoded.

use sha2::{Digest, Sha256};

/// Compute the lowercase hex SHA-256 digest of `data` (64 hex chars).
pub fn compute_file_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        // sha256("") == e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855
        assert_eq!(
            compute_file_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn is_deterministic_and_sensitive_to_content() {
        let a = compute_file_hash(b"haven export payload");
        let b = compute_file_hash(b"haven export payload");
        let c = compute_file_hash(b"haven export payload ");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
