//! Startup smoke test for the encode pipeline.
//!
//! Called once at application launch with a fixed sample payload. It asserts
//! only "the pipeline did not fail" — it is not a correctness oracle, and a
//! failure is logged and reported to the caller rather than aborting startup.

use serde_json::json;
use tracing::{debug, warn};

use crate::envelope::PayloadEncryptor;

/// Run the pipeline once against a fixed sample object.
///
/// Returns `true` if the encode succeeded. On failure, logs a warning with
/// the error's display form (which carries no key material or plaintext) and
/// returns `false`; callers should treat this as non-fatal.
pub fn run(encryptor: &PayloadEncryptor) -> bool {
    let sample = json!({ "email": "selftest@example.com", "password": "selftest" });
    match encryptor.encrypt_payload(&sample) {
        Ok(sealed) => {
            debug!(
                envelope_len = sealed.encrypted_payload.len(),
                "envelope self-test passed"
            );
            true
        }
        Err(e) => {
            warn!(error = %e, "envelope self-test failed; encrypted requests will not work");
            false
        }
    }
}
