//! Top-level error taxonomy for the envelope pipeline.

use thiserror::Error;

use crate::config::ConfigError;
use crate::crypto::CryptoError;

/// Any failure an [`encrypt_payload`](crate::PayloadEncryptor::encrypt_payload)
/// call can surface.
///
/// Every variant is terminal for that call — the encoder never retries and
/// never returns a partially built envelope. Callers must abort the request
/// the payload was destined for rather than fall back to plaintext.
///
/// `Display` output is safe to log: it never contains key material or
/// payload plaintext.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Key material or algorithm configuration is missing or malformed.
    /// Fatal for every subsequent call until the configuration is fixed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The payload could not be serialised to canonical bytes.
    #[error("payload serialisation failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A cryptographic primitive failed — bad key encoding, unsupported
    /// algorithm identifier, or an AEAD/wrap error.
    #[error("crypto operation failed: {0}")]
    CryptoOperation(#[from] CryptoError),

    /// Assembling or encoding the final envelope failed.
    #[error("envelope encoding failed: {0}")]
    Encoding(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_layer_message() {
        let e = EnvelopeError::from(CryptoError::AeadFailure);
        assert!(e.to_string().contains("crypto operation failed"));
    }

    #[test]
    fn encoding_carries_detail() {
        let e = EnvelopeError::Encoding("oversized field".into());
        assert!(e.to_string().contains("oversized field"));
    }
}
