// system-tests/src/lib.rs
// ============================================================================
// Module: Content Gate System Tests Library
// Description: Shared configuration, data, and lifecycle helpers for suites.
// Purpose: Provide common utilities for the Content Gate system-test binaries.
// Dependencies: content-gate-client, serde_yaml, tracing
// ============================================================================

//! ## Overview
//! This crate hosts the harness used by the suites in `system-tests/tests`
//! and by the `content-gate-api-tests` runner: environment configuration,
//! YAML test data, fixture builders, tracked cleanup, response validation,
//! logging, and `cargo test` plan construction.
//! Security posture: backend responses and environment inputs are untrusted;
//! production runs are fail-closed on mutation and cleanup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cleanup;
pub mod config;
pub mod data;
pub mod fixtures;
pub mod logging;
pub mod runner;
pub mod validation;

// ============================================================================
// SECTION: Tests
// ============================================================================
