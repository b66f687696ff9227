//! RSA-OAEP wrapping of the session key under the backend public key.
//!
//! The backend holds the matching private key; unwrapping never happens on
//! the client. OAEP is randomised, so wrapping the same session key twice
//! yields different bytes — freshness of the envelope does not rest on this,
//! but it means the wrapped key leaks nothing through equality either.

use rand::rngs::OsRng;
use rsa::{Oaep, RsaPublicKey};
use sha2::Sha256;

use super::CryptoError;
use crate::keys::SessionKey;

/// Wrap the session key for the backend using RSA-OAEP with SHA-256.
///
/// # Errors
///
/// Returns [`CryptoError::WrapFailure`] if the OAEP operation fails; with a
/// 2048-bit-or-larger modulus and a 32-byte session key the message always
/// fits, so a failure here indicates corrupt key material.
pub fn wrap_session_key(
    session: &SessionKey,
    public_key: &RsaPublicKey,
) -> Result<Vec<u8>, CryptoError> {
    public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), session.key_bytes())
        .map_err(|_| CryptoError::WrapFailure)
}
