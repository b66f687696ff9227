//! Integrity digest over the finished envelope bytes.
//!
//! The backend recomputes this digest over the `encryptedPayload` string it
//! receives and rejects the request on mismatch *before* attempting any
//! decryption, so the digest must be a cryptographically strong hash rather
//! than a checksum: the channel is adversarial, not merely noisy.

use sha2::{Digest, Sha256};

/// Length of the rendered digest: 32 SHA-256 bytes as lowercase hex.
pub const DIGEST_LEN: usize = 64;

/// Compute the SHA-256 digest of `bytes`, rendered as lowercase hex.
///
/// Pure and deterministic: identical input always yields identical output.
pub fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(digest(b"envelope"), digest(b"envelope"));
    }

    #[test]
    fn fixed_length_lowercase_hex() {
        let d = digest(b"anything at all");
        assert_eq!(d.len(), DIGEST_LEN);
        assert!(d.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn single_byte_flip_changes_digest() {
        let mut input = b"payload bytes".to_vec();
        let before = digest(&input);
        input[0] ^= 0x01;
        assert_ne!(before, digest(&input));
    }

    #[test]
    fn known_vector() {
        // SHA-256 of the empty string.
        assert_eq!(
            digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
