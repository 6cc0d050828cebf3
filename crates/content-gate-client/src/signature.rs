// crates/content-gate-client/src/signature.rs
// ============================================================================
// Module: Webhook Signatures
// Description: HMAC-SHA256 signing for content sync webhook payloads.
// Purpose: Produce and check `X-Hub-Signature-256` values over exact bytes.
// Dependencies: hmac, sha2, hex, subtle
// ============================================================================

//! ## Overview
//! The content sync webhook authenticates pushes with a GitHub-style
//! `sha256=<hex>` HMAC over the raw request body. Signing serializes the
//! payload with the same compact encoder the client uses to send it, so a
//! signature produced here always matches the bytes on the wire.

use hmac::Hmac;
use hmac::Mac;
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::ClientError;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature-256";
/// Prefix of the signature header value.
const SIGNATURE_PREFIX: &str = "sha256=";

/// HMAC-SHA256 keyed with the webhook secret.
type HmacSha256 = Hmac<Sha256>;

/// Serializes a webhook payload exactly as the client sends it.
///
/// # Errors
///
/// Returns [`ClientError::Json`] when the payload cannot be serialized.
pub fn webhook_body(payload: &Value) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(payload).map_err(|err| ClientError::Json(err.to_string()))
}

/// Signs a webhook payload and returns the `sha256=<hex>` header value.
///
/// # Errors
///
/// Returns [`ClientError`] when the secret is unusable or the payload cannot
/// be serialized.
pub fn sign_webhook_payload(secret: &str, payload: &Value) -> Result<String, ClientError> {
    let body = webhook_body(payload)?;
    sign_bytes(secret, &body)
}

/// Signs raw body bytes and returns the `sha256=<hex>` header value.
///
/// # Errors
///
/// Returns [`ClientError::Config`] when the secret is rejected by the MAC.
pub fn sign_bytes(secret: &str, body: &[u8]) -> Result<String, ClientError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| ClientError::Config(format!("invalid webhook secret: {err}")))?;
    mac.update(body);
    Ok(format!("{SIGNATURE_PREFIX}{}", hex::encode(mac.finalize().into_bytes())))
}

/// Returns true when `header` is a valid signature of `body` under `secret`.
#[must_use]
pub fn verify_webhook_signature(secret: &str, body: &[u8], header: &str) -> bool {
    let Ok(expected) = sign_bytes(secret, body) else {
        return false;
    };
    let provided = header.trim();
    if !provided.starts_with(SIGNATURE_PREFIX) {
        return false;
    }
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}
