//! Payment gateway signature checks.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 using the merchant key
//! secret and hands the lowercase hex digest to the client, which forwards it to us.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex-encoded signature the gateway produces for an order/payment pair.
pub fn sign(
    secret: &str,
    order_id: &str,
    payment_id: &str,
) -> Result<String, hmac::digest::InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Returns true when `signature` exactly matches the recomputed signature.
pub fn verify(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    sign(secret, order_id, payment_id)
        .map(|expected| expected == signature)
        .unwrap_or(false)
}
