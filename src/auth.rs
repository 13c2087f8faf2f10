use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::history::{HistoryStore, StoreError};

/// Mints a new bearer token: 32 random bytes, URL-safe base64 without
/// padding. The raw token is transmitted to the user exactly once; only its
/// digest is ever stored.
pub fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Hex-encoded SHA-256 of a presented or freshly minted key.
pub fn digest(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Denied when no key is presented, no record exists for `user_id`, no
/// credential was ever issued, or the digest does not match. Only storage
/// faults other than a missing record propagate.
pub async fn authorize(
    store: &HistoryStore,
    user_id: &str,
    presented: Option<&str>,
) -> Result<bool, StoreError> {
    let Some(key) = presented else {
        return Ok(false);
    };
    let stored = match store.api_key_hash(user_id).await {
        Ok(hash) => hash,
        Err(StoreError::NotFound) => return Ok(false),
        Err(e) => return Err(e),
    };
    if stored.is_empty() {
        return Ok(false);
    }
    Ok(constant_time_eq(&digest(key), &stored))
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a.bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}
