//! AES-256-GCM-SIV bulk encryption of the serialised payload.
//!
//! **Algorithm choice:** AES-256-GCM-SIV (RFC 8452) is nonce-misuse-resistant.
//! The encoder already generates a fresh key *and* nonce per call, so a nonce
//! never repeats under the same key in normal operation; SIV keeps a CSPRNG
//! fault from turning into a catastrophic confidentiality break.

use aes_gcm_siv::{
    aead::{Aead, KeyInit},
    Aes256GcmSiv, Nonce,
};

use super::CryptoError;
use crate::keys::SessionKey;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Encrypt the serialised payload under a single-use session key.
///
/// Returns the ciphertext with the 16-byte authentication tag appended.
///
/// # Errors
///
/// Returns [`CryptoError::AeadFailure`] on an internal AEAD error (should be
/// unreachable with a correctly sized key and nonce).
pub fn seal(plaintext: &[u8], session: &SessionKey) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256GcmSiv::new_from_slice(session.key_bytes())
        .map_err(|_| CryptoError::AeadFailure)?;
    let nonce = Nonce::from_slice(session.nonce_bytes());
    cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CryptoError::AeadFailure)
}

/// Decrypt ciphertext produced by [`seal`].
///
/// This is the receiving side of the contract; the client library carries it
/// so the round-trip property is verifiable in-tree, and the self-test and
/// integration tests exercise it.
///
/// # Errors
///
/// Returns [`CryptoError::AeadFailure`] if authentication fails (wrong key,
/// wrong nonce, or tampered ciphertext).
pub fn open(ciphertext: &[u8], key: &[u8; KEY_LEN], nonce: &[u8; NONCE_LEN]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256GcmSiv::new_from_slice(key).map_err(|_| CryptoError::AeadFailure)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::AeadFailure)
}
