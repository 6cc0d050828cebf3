// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Centralized configuration for Content Gate system tests.
// Purpose: Provide typed access to target environment settings and defaults.
// Dependencies: dotenvy, thiserror, time
// ============================================================================

//! ## Overview
//! System-test configuration is read from environment variables and mapped into
//! small typed structures for reuse across test helpers and the runner.
//! Security posture: environment inputs are untrusted and parsed fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod harness;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::ArtifactEnv;
pub use env::ArtifactSettings;
pub use harness::BackendTarget;
pub use harness::DEFAULT_API_BASE_URL;
pub use harness::DEFAULT_DEV_API_KEY;
pub use harness::DEFAULT_MAX_TEST_DATA_AGE_HOURS;
pub use harness::DEFAULT_REQUEST_TIMEOUT;
pub use harness::EnvironmentInfo;
pub use harness::HarnessConfig;
pub use harness::HarnessConfigError;
pub use harness::HarnessEnv;
pub use harness::TestEnvironment;
pub use harness::default_data_dir;
pub use harness::load_env_file;
