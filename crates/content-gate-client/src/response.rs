// crates/content-gate-client/src/response.rs
// ============================================================================
// Module: API Response
// Description: Status code plus decoded JSON body for every API call.
// Purpose: Give tests uniform accessors for asserting on backend responses.
// Dependencies: serde, serde_json
// ============================================================================

//! Normalized HTTP responses.

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Map;
use serde_json::Value;

use crate::error::ClientError;

/// Key used when a response body is not valid JSON.
pub const RAW_RESPONSE_KEY: &str = "raw_response";

/// HTTP status and decoded body returned by every client call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON body (or `{"raw_response": ...}` for non-JSON bodies).
    pub body: Value,
}

impl ApiResponse {
    /// Builds a response from raw body bytes.
    ///
    /// Empty bodies decode to `{}`; non-JSON bodies are wrapped under
    /// [`RAW_RESPONSE_KEY`].
    #[must_use]
    pub fn from_bytes(status: u16, bytes: &[u8]) -> Self {
        let body = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(bytes).unwrap_or_else(|_| {
                let mut raw = Map::new();
                raw.insert(
                    RAW_RESPONSE_KEY.to_string(),
                    Value::String(String::from_utf8_lossy(bytes).into_owned()),
                );
                Value::Object(raw)
            })
        };
        Self {
            status,
            body,
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true when the status is one of `accepted`.
    #[must_use]
    pub fn status_in(&self, accepted: &[u16]) -> bool {
        accepted.contains(&self.status)
    }

    /// Returns a top-level body field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// Returns true when the body is an object containing `name`.
    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.body.get(name).is_some()
    }

    /// Returns a top-level string field.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }

    /// Returns a top-level boolean field.
    #[must_use]
    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.body.get(name).and_then(Value::as_bool)
    }

    /// Returns the lowercased `error` field, or an empty string.
    #[must_use]
    pub fn error_message(&self) -> String {
        self.str_field("error").unwrap_or_default().to_lowercase()
    }

    /// Returns the lowercased `message` field, or an empty string.
    #[must_use]
    pub fn message(&self) -> String {
        self.str_field("message").unwrap_or_default().to_lowercase()
    }

    /// Fails unless the status equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] on mismatch.
    pub fn expect_status(&self, expected: u16) -> Result<&Self, ClientError> {
        self.expect_status_in(&[expected])
    }

    /// Fails unless the status is one of `accepted`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnexpectedStatus`] on mismatch.
    pub fn expect_status_in(&self, accepted: &[u16]) -> Result<&Self, ClientError> {
        if self.status_in(accepted) {
            return Ok(self);
        }
        let expected =
            accepted.iter().map(u16::to_string).collect::<Vec<_>>().join(" or ");
        Err(ClientError::UnexpectedStatus {
            expected,
            actual: self.status,
            body: self.body.to_string(),
        })
    }

    /// Decodes the body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Json`] when the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        serde_json::from_value(self.body.clone())
            .map_err(|err| ClientError::Json(format!("decode response body: {err}")))
    }
}
