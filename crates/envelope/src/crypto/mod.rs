//! Cryptographic primitives for the envelope pipeline.
//!
//! This module is free of configuration and transport concerns. It provides
//! the symmetric seal ([`cipher`]) and the asymmetric session-key wrap
//! ([`wrap`]) that the encoder composes into an envelope.

pub mod cipher;
pub mod wrap;

use thiserror::Error;

/// Errors produced by the crypto layer.
///
/// Messages never include key bytes or plaintext.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The configured public key is not parseable RSA SubjectPublicKeyInfo.
    #[error("public key is not a valid RSA public key")]
    InvalidPublicKey,

    /// The configuration names an algorithm this build does not implement.
    #[error("unsupported algorithm identifier: {0}")]
    UnsupportedAlgorithm(String),

    /// The wrap key modulus is below the accepted minimum.
    #[error("public key too small: {0} bits, need at least 2048")]
    WeakKey(usize),

    /// AEAD encryption failed.
    #[error("aead operation failed")]
    AeadFailure,

    /// RSA-OAEP wrapping of the session key failed.
    #[error("session key wrap failed")]
    WrapFailure,
}
