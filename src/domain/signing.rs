//! HMAC-SHA256 request signing.
//!
//! The signature is computed over `{amount}{time}` with the deploy-time
//! secret and rendered as 64 lowercase hex characters.

use crate::error::RelayError;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign `message` with `secret_key`.
///
/// An empty key is rejected as invalid key material.
pub fn sign(secret_key: &str, message: &str) -> Result<String, RelayError> {
    if secret_key.is_empty() {
        return Err(RelayError::SigningError(
            "secret key must not be empty".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| RelayError::SigningError(e.to_string()))?;
    mac.update(message.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}
