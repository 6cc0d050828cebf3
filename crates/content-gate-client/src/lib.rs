// crates/content-gate-client/src/lib.rs
// ============================================================================
// Module: Content Gate Client Library
// Description: Typed async HTTP client for the Content Gate backend API.
// Purpose: Give system-tests one request pipeline for every backend endpoint.
// Dependencies: reqwest, serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! `content-gate-client` wraps the Content Gate HTTP API: health, visitor
//! authentication, internal access-rule administration, the access-control
//! API, the content catalog, content sync, and content management.
//!
//! Responses are returned as [`ApiResponse`] values regardless of HTTP status
//! so callers can assert on error payloads. Only transport, serialization,
//! and size-limit failures surface as [`ClientError`].
//!
//! Security posture: server responses are untrusted; bodies are size-limited
//! and API keys are never recorded in transcripts or debug output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod endpoints;
pub mod error;
pub mod response;
pub mod signature;
pub mod types;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ApiClient;
pub use client::ClientConfig;
pub use client::DEFAULT_USER_AGENT;
pub use client::MAX_RESPONSE_BYTES;
pub use client::TranscriptEntry;
pub use error::ClientError;
pub use response::ApiResponse;
pub use signature::SIGNATURE_HEADER;
pub use signature::sign_webhook_payload;
pub use signature::verify_webhook_signature;
pub use types::*;
