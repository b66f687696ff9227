//! Envelope assembly and the [`PayloadEncryptor`] orchestrator.
//!
//! # Transport format
//!
//! ```text
//! base64( {"v":1,"cipherText":"<b64>","iv":"<b64>","wrappedKey":"<b64>"} )
//! ```
//!
//! Inner fields and the outer string both use the standard base64 alphabet
//! with padding. The integrity digest is computed over the exact ASCII bytes
//! of the outer string, so the backend can verify it bit-for-bit before
//! decoding anything. The `v` field enables future algorithm migration
//! without breaking existing clients.
//!
//! The outgoing request carries the outer string as the `body` form field
//! and the digest in the `X-Payload-Hash` header; see [`BODY_FIELD`] and
//! [`HASH_HEADER`].

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{cipher, wrap};
use crate::crypto::cipher::NONCE_LEN;
use crate::error::EnvelopeError;
use crate::hash;
use crate::keys::{KeyMaterial, SessionKey};

/// Current envelope format version.
pub const ENVELOPE_VERSION: u8 = 1;

/// Multipart form field the caller attaches the envelope to.
pub const BODY_FIELD: &str = "body";

/// Request header the caller attaches the digest to.
pub const HASH_HEADER: &str = "X-Payload-Hash";

/// The composite wrapped-key + nonce + ciphertext structure, one per request.
///
/// Field names and casing are part of the wire contract with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Format version; always [`ENVELOPE_VERSION`] for envelopes this build produces.
    pub v: u8,
    /// Session key wrapped under the backend public key, base64.
    pub wrapped_key: String,
    /// AEAD nonce, base64.
    pub iv: String,
    /// Payload ciphertext + authentication tag, base64.
    pub cipher_text: String,
}

/// Errors raised while decoding a transport string back into an [`Envelope`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The outer string or an inner field is not valid base64.
    #[error("invalid base64 in envelope")]
    InvalidBase64,

    /// The decoded bytes are not the expected JSON structure.
    #[error("envelope is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The envelope was produced by a format version this build does not know.
    #[error("unsupported envelope version: {0}")]
    UnsupportedVersion(u8),

    /// The IV field decoded to the wrong number of bytes.
    #[error("invalid iv length: expected {NONCE_LEN} bytes, got {0}")]
    InvalidIvLength(usize),
}

impl Envelope {
    fn assemble(wrapped_key: &[u8], iv: &[u8; NONCE_LEN], cipher_text: &[u8]) -> Self {
        Self {
            v: ENVELOPE_VERSION,
            wrapped_key: STANDARD.encode(wrapped_key),
            iv: STANDARD.encode(iv),
            cipher_text: STANDARD.encode(cipher_text),
        }
    }

    /// Serialise and base64-encode this envelope into the opaque transport string.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Encoding`] if JSON serialisation fails.
    pub fn to_transport(&self) -> Result<String, EnvelopeError> {
        let json = serde_json::to_string(self).map_err(|e| EnvelopeError::Encoding(e.to_string()))?;
        Ok(STANDARD.encode(json))
    }

    /// Decode an opaque transport string back into an [`Envelope`].
    ///
    /// This is the receiving side of the contract, carried here so the
    /// round-trip property is verifiable in-tree.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] describing the first structural problem found.
    pub fn from_transport(s: &str) -> Result<Self, TransportError> {
        let json = STANDARD.decode(s).map_err(|_| TransportError::InvalidBase64)?;
        let envelope: Envelope = serde_json::from_slice(&json).map_err(TransportError::InvalidJson)?;
        if envelope.v != ENVELOPE_VERSION {
            return Err(TransportError::UnsupportedVersion(envelope.v));
        }
        Ok(envelope)
    }

    /// Decode the wrapped session key field.
    pub fn wrapped_key_bytes(&self) -> Result<Vec<u8>, TransportError> {
        STANDARD.decode(&self.wrapped_key).map_err(|_| TransportError::InvalidBase64)
    }

    /// Decode the IV field, enforcing the AEAD nonce length.
    pub fn iv_bytes(&self) -> Result<[u8; NONCE_LEN], TransportError> {
        let bytes = STANDARD.decode(&self.iv).map_err(|_| TransportError::InvalidBase64)?;
        bytes
            .try_into()
            .map_err(|b: Vec<u8>| TransportError::InvalidIvLength(b.len()))
    }

    /// Decode the ciphertext field.
    pub fn cipher_text_bytes(&self) -> Result<Vec<u8>, TransportError> {
        STANDARD.decode(&self.cipher_text).map_err(|_| TransportError::InvalidBase64)
    }
}

/// The two values the caller attaches to an outgoing request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedPayload {
    /// The complete envelope as one opaque base64 string.
    pub encrypted_payload: String,
    /// Integrity digest over the exact bytes of `encrypted_payload`.
    pub hash: String,
}

/// Stateless encoder turning JSON-serialisable payloads into sealed envelopes.
///
/// Holds only the parsed backend key material; every call allocates its own
/// session key and touches no shared mutable state, so a single instance can
/// be shared freely across concurrent callers.
#[derive(Debug, Clone)]
pub struct PayloadEncryptor {
    keys: KeyMaterial,
}

impl PayloadEncryptor {
    /// Create an encoder from already-validated key material.
    pub fn new(keys: KeyMaterial) -> Self {
        Self { keys }
    }

    /// Create an encoder straight from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::CryptoOperation`] if the configured key or
    /// algorithm identifiers are invalid.
    pub fn from_config(cfg: &crate::config::EnvelopeConfig) -> Result<Self, EnvelopeError> {
        Ok(Self::new(KeyMaterial::from_config(cfg)?))
    }

    /// Encrypt a payload into a sealed envelope plus integrity digest.
    ///
    /// The pipeline: canonical JSON bytes → fresh session key → AEAD seal →
    /// RSA-OAEP key wrap → envelope assembly → transport encoding → digest.
    /// It either fully succeeds or fails with no output; the session key is
    /// discarded when this function returns.
    ///
    /// Two calls with the same payload never produce the same envelope — the
    /// session key and nonce are fresh each time.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::Serialization`] if `payload` cannot be represented
    ///   as JSON (e.g. a map with non-string keys).
    /// - [`EnvelopeError::CryptoOperation`] if a primitive fails.
    /// - [`EnvelopeError::Encoding`] if envelope assembly fails.
    pub fn encrypt_payload<T: Serialize + ?Sized>(
        &self,
        payload: &T,
    ) -> Result<SealedPayload, EnvelopeError> {
        // Route through `Value` so map keys serialise in a stable order and
        // the byte form is independent of the caller's field declaration order.
        let value = serde_json::to_value(payload).map_err(EnvelopeError::Serialization)?;
        let plaintext = serde_json::to_vec(&value).map_err(EnvelopeError::Serialization)?;

        let session = SessionKey::generate();
        let cipher_text = cipher::seal(&plaintext, &session)?;
        let wrapped_key = wrap::wrap_session_key(&session, self.keys.public_key())?;

        let envelope = Envelope::assemble(&wrapped_key, session.nonce_bytes(), &cipher_text);
        let encrypted_payload = envelope.to_transport()?;
        let hash = hash::digest(encrypted_payload.as_bytes());

        Ok(SealedPayload {
            encrypted_payload,
            hash,
        })
    }
}
