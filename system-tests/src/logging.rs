// system-tests/src/logging.rs
// ============================================================================
// Module: Logging
// Description: Tracing subscriber setup and the environment banner.
// Purpose: One subscriber per process with environment-aware default levels.
// Dependencies: tracing, tracing-subscriber
// ============================================================================

//! Installs the tracing subscriber and logs the target environment once.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::EnvironmentInfo;
use crate::config::TestEnvironment;

/// Guards one-time subscriber installation.
static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Returns the default filter directive for an environment.
#[must_use]
pub const fn default_directive(environment: TestEnvironment) -> &'static str {
    match environment {
        TestEnvironment::Dev => "debug",
        TestEnvironment::Staging | TestEnvironment::Prod => "info",
    }
}

/// Installs the global subscriber once. `RUST_LOG` overrides the default.
///
/// Output goes through the test writer so `cargo test` captures it per test.
pub fn init_logging(environment: TestEnvironment) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(environment)));
        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_test_writer())
            .with(filter);
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}

/// Logs the run banner for an environment snapshot.
pub fn log_environment_banner(info: &EnvironmentInfo) {
    tracing::info!(
        environment = %info.environment,
        api_url = %info.api_url,
        backend = %info.backend,
        data_mutations = if info.mutations_allowed { "allowed" } else { "disabled" },
        cleanup = if info.cleanup_enabled { "enabled" } else { "disabled" },
        "content gate api test environment"
    );
    if info.environment.is_production() {
        tracing::warn!("production mode: extra safety checks enabled");
    }
}
