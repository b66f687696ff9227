//! Envelope configuration: the backend public key and algorithm identifiers.
//!
//! The key material ships with the application build. It is loaded exactly
//! once, at the composition root, and passed by reference into
//! [`KeyMaterial::from_config`](crate::keys::KeyMaterial::from_config) —
//! there is no module-level global and no runtime fetch. A missing or
//! malformed configuration fails at first use with a [`ConfigError`]; it is
//! never swallowed, since every subsequent encode call depends on it.

use serde::Deserialize;
use thiserror::Error;

/// Wrap-scheme identifier this build supports.
pub const WRAP_ALG: &str = "RSA-OAEP-256";

/// Symmetric cipher identifier this build supports.
pub const CIPHER_ALG: &str = "A256GCMSIV";

/// Digest identifier this build supports.
pub const DIGEST_ALG: &str = "SHA-256";

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration source could not be read or deserialised.
    #[error("failed to load envelope configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A required field is absent or empty.
    #[error("{0} is required and must not be empty")]
    MissingField(&'static str),

    /// The public key field is present but not PEM-encoded SubjectPublicKeyInfo.
    #[error("public key must be a PEM-encoded public key block")]
    MalformedPublicKey,
}

/// Immutable, process-wide envelope configuration.
///
/// Holds the backend's long-lived public key (PEM, `-----BEGIN PUBLIC
/// KEY-----`) and the algorithm identifiers the backend expects. The key is
/// read-only after load and is never transmitted.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeConfig {
    /// PEM-encoded backend public key. **Required.**
    pub public_key_pem: String,

    /// Asymmetric wrap scheme identifier.
    #[serde(default = "default_wrap_algorithm")]
    pub wrap_algorithm: String,

    /// Symmetric cipher identifier.
    #[serde(default = "default_cipher_algorithm")]
    pub cipher_algorithm: String,

    /// Integrity digest identifier.
    #[serde(default = "default_digest_algorithm")]
    pub digest_algorithm: String,
}

fn default_wrap_algorithm() -> String {
    WRAP_ALG.into()
}
fn default_cipher_algorithm() -> String {
    CIPHER_ALG.into()
}
fn default_digest_algorithm() -> String {
    DIGEST_ALG.into()
}

impl EnvelopeConfig {
    /// Load and validate configuration from `ENVELOPE_`-prefixed environment
    /// variables (e.g. `ENVELOPE_PUBLIC_KEY_PEM`).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a required variable is absent or fails
    /// validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("ENVELOPE"))
            .build()?;

        let c: EnvelopeConfig = cfg.try_deserialize()?;
        c.validate()?;
        Ok(c)
    }

    /// Construct a configuration with the default algorithm identifiers and
    /// the given public key, for callers that bundle the key another way.
    pub fn with_public_key_pem(pem: impl Into<String>) -> Result<Self, ConfigError> {
        let c = Self {
            public_key_pem: pem.into(),
            wrap_algorithm: default_wrap_algorithm(),
            cipher_algorithm: default_cipher_algorithm(),
            digest_algorithm: default_digest_algorithm(),
        };
        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.public_key_pem.trim().is_empty() {
            return Err(ConfigError::MissingField("PUBLIC_KEY_PEM"));
        }
        if !self.public_key_pem.contains("-----BEGIN") {
            return Err(ConfigError::MalformedPublicKey);
        }
        if self.wrap_algorithm.trim().is_empty() {
            return Err(ConfigError::MissingField("WRAP_ALGORITHM"));
        }
        if self.cipher_algorithm.trim().is_empty() {
            return Err(ConfigError::MissingField("CIPHER_ALGORITHM"));
        }
        if self.digest_algorithm.trim().is_empty() {
            return Err(ConfigError::MissingField("DIGEST_ALGORITHM"));
        }
        Ok(())
    }
}
