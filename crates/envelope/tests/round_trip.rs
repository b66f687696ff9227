//! Backend-side round trip: everything the server does on receipt, done
//! in-tree against a locally generated keypair.

use envelope::crypto::cipher;
use envelope::{hash, Envelope, EnvelopeConfig, EnvelopeError, PayloadEncryptor};
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{Oaep, RsaPrivateKey};
use serde_json::{json, Value};
use sha2::Sha256;

struct Backend {
    private_key: RsaPrivateKey,
    encryptor: PayloadEncryptor,
}

impl Backend {
    fn new() -> Self {
        let private_key = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).expect("keygen");
        let pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("pem");
        let cfg = EnvelopeConfig::with_public_key_pem(pem).expect("config");
        let encryptor = PayloadEncryptor::from_config(&cfg).expect("encryptor");
        Self {
            private_key,
            encryptor,
        }
    }

    /// Verify the digest, unwrap the session key, open the ciphertext, and
    /// parse the original JSON — the backend's receive path.
    fn receive(&self, encrypted_payload: &str, claimed_hash: &str) -> Value {
        assert_eq!(
            hash::digest(encrypted_payload.as_bytes()),
            claimed_hash,
            "digest mismatch: envelope was tampered with in transit"
        );

        let env = Envelope::from_transport(encrypted_payload).expect("decode");
        let session_key: [u8; cipher::KEY_LEN] = self
            .private_key
            .decrypt(Oaep::new::<Sha256>(), &env.wrapped_key_bytes().expect("wrappedKey"))
            .expect("unwrap session key")
            .try_into()
            .expect("session key length");
        let iv = env.iv_bytes().expect("iv");
        let plaintext =
            cipher::open(&env.cipher_text_bytes().expect("cipherText"), &session_key, &iv)
                .expect("open ciphertext");
        serde_json::from_slice(&plaintext).expect("payload JSON")
    }
}

#[test]
fn round_trip_recovers_deep_equal_payload() {
    let backend = Backend::new();
    let payload = json!({
        "resident": {
            "name": "Dana Okafor",
            "flat": "A-12",
            "family": [
                { "name": "Femi", "relation": "spouse" },
                { "name": "Ada", "relation": "child" }
            ]
        },
        "visitors_today": 3,
        "gate_pass": true,
        "note": null,
        "pin": "0427"
    });

    let sealed = backend.encryptor.encrypt_payload(&payload).unwrap();
    let recovered = backend.receive(&sealed.encrypted_payload, &sealed.hash);
    assert_eq!(recovered, payload);
}

#[test]
fn round_trip_handles_unicode_and_empty_values() {
    let backend = Backend::new();
    let payload = json!({ "name": "Renée Müller 住宅", "tags": [], "memo": "" });

    let sealed = backend.encryptor.encrypt_payload(&payload).unwrap();
    assert_eq!(backend.receive(&sealed.encrypted_payload, &sealed.hash), payload);
}

#[test]
fn fresh_envelopes_decrypt_to_the_same_payload() {
    let backend = Backend::new();
    let payload = json!({ "email": "test@example.com", "password": "test123456" });

    let a = backend.encryptor.encrypt_payload(&payload).unwrap();
    let b = backend.encryptor.encrypt_payload(&payload).unwrap();

    assert_ne!(a.encrypted_payload, b.encrypted_payload);
    assert_eq!(backend.receive(&a.encrypted_payload, &a.hash), payload);
    assert_eq!(backend.receive(&b.encrypted_payload, &b.hash), payload);
}

#[test]
fn tampered_envelope_is_rejected_before_decryption() {
    let backend = Backend::new();
    let sealed = backend
        .encryptor
        .encrypt_payload(&json!({ "amount": "25000.00" }))
        .unwrap();

    let mut bytes = sealed.encrypted_payload.clone().into_bytes();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0x01;
    let tampered = String::from_utf8(bytes).unwrap();

    assert_ne!(hash::digest(tampered.as_bytes()), sealed.hash);
}

#[test]
fn wrong_private_key_cannot_unwrap() {
    let backend = Backend::new();
    let stranger = RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048).unwrap();

    let sealed = backend
        .encryptor
        .encrypt_payload(&json!({ "badge": "SEC-007" }))
        .unwrap();
    let env = Envelope::from_transport(&sealed.encrypted_payload).unwrap();

    assert!(stranger
        .decrypt(Oaep::new::<Sha256>(), &env.wrapped_key_bytes().unwrap())
        .is_err());
}

#[test]
fn missing_configuration_fails_with_config_error() {
    // No ENVELOPE_* variables are set in the test environment.
    let err = EnvelopeConfig::from_env().unwrap_err();
    let top = EnvelopeError::from(err);
    assert!(matches!(top, EnvelopeError::Config(_)));
}
