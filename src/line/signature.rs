//! Webhook authenticity check: LINE signs the raw request body with
//! HMAC-SHA256 over the channel secret and sends the base64 digest in the
//! `X-Line-Signature` header.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign a payload and return the base64-encoded signature.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify a presented signature against a payload.
pub fn verify(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let expected = sign(channel_secret, body);
    // Constant-time comparison
    expected.len() == signature.len()
        && expected
            .as_bytes()
            .iter()
            .zip(signature.as_bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
