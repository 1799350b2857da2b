//! Payment callback signature verification
//!
//! The gateway signs `"{gateway_order_id}|{gateway_payment_id}"` with
//! HMAC-SHA256 over the shared key secret and sends the hex digest along
//! with the callback. Verification goes through `ring::hmac::verify`, which
//! compares in constant time.

use ring::hmac;

/// Hex HMAC-SHA256 digest of `message` under `secret`
fn hmac_hex(secret: &[u8], message: &[u8]) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret);
    hex::encode(hmac::sign(&key, message).as_ref())
}

/// Compute the signature the gateway would produce for this payment.
///
/// Only needed when acting as the signer (tests, local mock gateway).
pub fn payment_signature(secret: &str, gateway_order_id: &str, gateway_payment_id: &str) -> String {
    let message = format!("{}|{}", gateway_order_id, gateway_payment_id);
    hmac_hex(secret.as_bytes(), message.as_bytes())
}

/// Check a callback signature. Returns false on any mismatch, including
/// malformed hex.
pub fn verify_payment_signature(
    secret: &str,
    gateway_order_id: &str,
    gateway_payment_id: &str,
    signature_hex: &str,
) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };
    let message = format!("{}|{}", gateway_order_id, gateway_payment_id);
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes());
    hmac::verify(&key, message.as_bytes(), &signature).is_ok()
}
