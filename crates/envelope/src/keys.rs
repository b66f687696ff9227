//! Key material: the parsed backend public key and the per-call session key.
//!
//! [`KeyMaterial`] is built once from [`EnvelopeConfig`] at the composition
//! root and shared by reference; parsing and algorithm validation happen
//! here, not on the per-request path. [`SessionKey`] is the throwaway half:
//! a fresh key + nonce pair generated per encode call from the OS CSPRNG,
//! held only in memory for the duration of the call.
//!
//! # Security invariants
//!
//! - A session key is **never** reused across calls, persisted, or logged.
//!   Its memory is zeroed on drop and its `Debug` output is redacted.
//! - The public key is read-only after construction and never transmitted.

use rand::rngs::OsRng;
use rand::RngCore;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;

use crate::config::{EnvelopeConfig, CIPHER_ALG, DIGEST_ALG, WRAP_ALG};
use crate::crypto::cipher::{KEY_LEN, NONCE_LEN};
use crate::crypto::CryptoError;

/// Minimum RSA modulus size accepted for the wrap key, in bytes.
const MIN_MODULUS_LEN: usize = 256; // 2048 bits

/// Parsed, validated backend key material.
///
/// Construction front-loads every check that would otherwise fail deep in
/// the encode pipeline: the PEM parses, the key is RSA of adequate size, and
/// the configured algorithm identifiers are ones this build implements.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    public_key: RsaPublicKey,
}

impl KeyMaterial {
    /// Parse and validate key material from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnsupportedAlgorithm`] if the configuration
    /// names a scheme this build does not implement,
    /// [`CryptoError::InvalidPublicKey`] if the PEM does not parse as an RSA
    /// SubjectPublicKeyInfo, and [`CryptoError::WeakKey`] if the modulus is
    /// shorter than 2048 bits.
    pub fn from_config(cfg: &EnvelopeConfig) -> Result<Self, CryptoError> {
        for (configured, supported) in [
            (cfg.wrap_algorithm.as_str(), WRAP_ALG),
            (cfg.cipher_algorithm.as_str(), CIPHER_ALG),
            (cfg.digest_algorithm.as_str(), DIGEST_ALG),
        ] {
            if configured != supported {
                return Err(CryptoError::UnsupportedAlgorithm(configured.to_owned()));
            }
        }

        let public_key = RsaPublicKey::from_public_key_pem(&cfg.public_key_pem)
            .map_err(|_| CryptoError::InvalidPublicKey)?;

        if public_key.size() < MIN_MODULUS_LEN {
            return Err(CryptoError::WeakKey(public_key.size() * 8));
        }

        Ok(Self { public_key })
    }

    /// Borrow the backend public key.
    pub(crate) fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }
}

/// A single-use symmetric key + nonce pair.
///
/// One is generated per encode call and discarded when the call returns.
pub struct SessionKey {
    key: [u8; KEY_LEN],
    nonce: [u8; NONCE_LEN],
}

impl SessionKey {
    /// Generate a fresh session key and nonce from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut key);
        OsRng.fill_bytes(&mut nonce);
        Self { key, nonce }
    }

    /// Raw key bytes, for the symmetric seal and the asymmetric wrap.
    pub(crate) fn key_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Raw nonce bytes, carried in the envelope as `iv`.
    pub(crate) fn nonce_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }
}

impl Drop for SessionKey {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.key.iter_mut().for_each(|b| *b = 0);
        self.nonce.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("SessionKey([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvelopeConfig;
    use crate::testkit;

    #[test]
    fn from_config_parses_valid_key() {
        let cfg = EnvelopeConfig::with_public_key_pem(testkit::public_key_pem()).unwrap();
        assert!(KeyMaterial::from_config(&cfg).is_ok());
    }

    #[test]
    fn from_config_rejects_garbage_pem() {
        let cfg = EnvelopeConfig::with_public_key_pem(
            "-----BEGIN PUBLIC KEY-----\nbm90IGEga2V5\n-----END PUBLIC KEY-----\n",
        )
        .unwrap();
        assert!(matches!(
            KeyMaterial::from_config(&cfg),
            Err(CryptoError::InvalidPublicKey)
        ));
    }

    #[test]
    fn from_config_rejects_unknown_wrap_algorithm() {
        let mut cfg = EnvelopeConfig::with_public_key_pem(testkit::public_key_pem()).unwrap();
        cfg.wrap_algorithm = "RSA-PKCS1v15".into();
        assert!(matches!(
            KeyMaterial::from_config(&cfg),
            Err(CryptoError::UnsupportedAlgorithm(a)) if a == "RSA-PKCS1v15"
        ));
    }

    #[test]
    fn session_keys_are_distinct() {
        let a = SessionKey::generate();
        let b = SessionKey::generate();
        assert_ne!(a.key_bytes(), b.key_bytes());
        assert_ne!(a.nonce_bytes(), b.nonce_bytes());
    }

    #[test]
    fn session_key_redacted_in_debug() {
        let key = SessionKey::generate();
        assert_eq!(format!("{key:?}"), "SessionKey([REDACTED])");
    }
}
