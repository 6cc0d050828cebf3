// crates/content-gate-client/src/endpoints/mod.rs
// ============================================================================
// Module: Endpoint Wrappers
// Description: One async method per Content Gate API endpoint.
// Purpose: Keep route paths and body shapes out of the test suites.
// Dependencies: reqwest, serde
// ============================================================================

//! ## Overview
//! Each submodule adds an `impl ApiClient` block for one API surface. All
//! wrappers return [`crate::ApiResponse`] for any HTTP status.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod access_control;
pub mod access_rules;
pub mod auth;
pub mod catalog;
pub mod content;
pub mod content_sync;
pub mod health;
