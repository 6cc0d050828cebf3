// crates/content-gate-client/src/error.rs
// ============================================================================
// Module: Client Errors
// Description: Error type for the Content Gate HTTP client.
// Purpose: Separate transport failures from HTTP-level outcomes.
// Dependencies: thiserror
// ============================================================================

//! Errors returned by [`crate::ApiClient`].

use thiserror::Error;

/// Content Gate client errors.
///
/// # Invariants
/// - Variants are stable for harness error mapping and tests.
/// - HTTP error statuses are not errors; they are returned as responses.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid client configuration (base URL, header values).
    #[error("client config error: {0}")]
    Config(String),
    /// Request could not be delivered or the response could not be read.
    #[error("request failed: {0}")]
    Transport(String),
    /// Request or response JSON handling failed.
    #[error("json error: {0}")]
    Json(String),
    /// Response body exceeded the configured byte limit.
    #[error("response body too large: {actual} bytes exceeds limit of {limit}")]
    ResponseTooLarge {
        /// Observed body size in bytes.
        actual: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Response status did not match the caller's expectation.
    #[error("expected status {expected}, got {actual}. Response: {body}")]
    UnexpectedStatus {
        /// Accepted status codes, formatted for display.
        expected: String,
        /// Observed status code.
        actual: u16,
        /// Response body rendered as compact JSON.
        body: String,
    },
}
