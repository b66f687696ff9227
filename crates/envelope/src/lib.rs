//! Secure payload envelope for outbound API requests.
//!
//! Client-side hybrid encryption of structured request bodies (credentials,
//! personal data, resident records) before they leave the device, plus an
//! integrity digest the backend verifies before decrypting. Confidentiality
//! does not depend on where TLS terminates.
//!
//! Pipeline, per call:
//!
//! 1. Serialise the payload to canonical JSON bytes.
//! 2. Generate a fresh AES-256 session key + nonce from the OS CSPRNG.
//! 3. Seal the bytes with AES-256-GCM-SIV.
//! 4. Wrap the session key with RSA-OAEP-SHA-256 under the backend public key.
//! 5. Assemble `{wrappedKey, iv, cipherText}` and base64-encode it into one
//!    opaque `encryptedPayload` string.
//! 6. Digest that exact string with SHA-256 → `hash`.
//!
//! The caller attaches `encryptedPayload` as the `body` form field and
//! `hash` as the `X-Payload-Hash` header; see [`BODY_FIELD`] and
//! [`HASH_HEADER`].
//!
//! ```no_run
//! use envelope::{EnvelopeConfig, PayloadEncryptor};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), envelope::EnvelopeError> {
//! let cfg = EnvelopeConfig::from_env()?;
//! let encryptor = PayloadEncryptor::from_config(&cfg)?;
//! envelope::selftest::run(&encryptor);
//!
//! let sealed = encryptor.encrypt_payload(&json!({
//!     "email": "test@example.com",
//!     "password": "test123456",
//! }))?;
//! // attach sealed.encrypted_payload + sealed.hash to the outgoing request
//! # Ok(())
//! # }
//! ```
//!
//! Every call is a stateless, single-shot transform: no session, no cache,
//! no retry. Errors are terminal for that call and must abort the request
//! they were meant for — the encoder never falls back to plaintext.

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod hash;
pub mod keys;
pub mod selftest;

pub use config::{ConfigError, EnvelopeConfig};
pub use crypto::CryptoError;
pub use envelope::{
    Envelope, PayloadEncryptor, SealedPayload, TransportError, BODY_FIELD, ENVELOPE_VERSION,
    HASH_HEADER,
};
pub use error::EnvelopeError;
pub use keys::{KeyMaterial, SessionKey};

/// Shared RSA keypair for unit tests. Generating one per test is slow, so a
/// single 2048-bit key is created lazily and reused.
#[cfg(test)]
pub(crate) mod testkit {
    use rsa::pkcs8::{EncodePublicKey, LineEnding};
    use rsa::{RsaPrivateKey, RsaPublicKey};
    use std::sync::OnceLock;

    pub(crate) fn private_key() -> &'static RsaPrivateKey {
        static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
        KEY.get_or_init(|| {
            RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).expect("test key generation")
        })
    }

    pub(crate) fn public_key() -> RsaPublicKey {
        private_key().to_public_key()
    }

    pub(crate) fn public_key_pem() -> String {
        public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("test key PEM encoding")
    }
}
