// system-tests/src/config/harness.rs
// ============================================================================
// Module: Harness Configuration
// Description: Target environment, backend, credentials, and safety switches.
// Purpose: Resolve what the suites may do against which backend.
// Dependencies: content-gate-client, dotenvy, thiserror, time
// ============================================================================

//! ## Overview
//! [`HarnessConfig`] is resolved once per test from environment variables,
//! optionally seeded from a `.env.<environment>` file. Production runs are
//! fail-closed: mutation requires `ALLOW_DATA_MUTATION_PROD=true`, and cleanup
//! is always on but restricted by the production cleanup criteria.
//!
//! Security posture: the API key is never rendered by `Debug`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use content_gate_client::ClientConfig;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::env::ArtifactSettings;
use super::env::EnvValue;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Backend URL used when `API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8787";
/// Development API key used when `API_KEY` is unset.
pub const DEFAULT_DEV_API_KEY: &str =
    "d458ab3fede5cfefb6f33b8aa21cc93988052c020e59075b8bdc6d95b9847246";
/// Default request timeout before env overrides.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Default age bound for stale test data.
pub const DEFAULT_MAX_TEST_DATA_AGE_HOURS: u64 = 24;

/// Returns the default test data directory (`system-tests/data`).
#[must_use]
pub fn default_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

// ============================================================================
// SECTION: Environment Keys
// ============================================================================

/// Environment keys for harness configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessEnv {
    /// Target environment (`dev`, `staging`, `prod`).
    TestEnv,
    /// Backend base URL.
    ApiBaseUrl,
    /// Admin API key.
    ApiKey,
    /// Allow mutating tests outside production.
    AllowDataMutation,
    /// Allow mutating tests in production.
    AllowDataMutationProd,
    /// Delete tracked test resources after each test.
    CleanupTestData,
    /// Require interactive confirmation before mutating production.
    RequireConfirmation,
    /// Age bound for stale test data in hours.
    MaxTestDataAgeHours,
    /// Directory holding YAML test data.
    TestDataDir,
    /// Backend selection (`live` or `stub`).
    TestBackend,
}

impl HarnessEnv {
    /// All harness keys, used by tests and `.env` diagnostics.
    pub const ALL: [Self; 10] = [
        Self::TestEnv,
        Self::ApiBaseUrl,
        Self::ApiKey,
        Self::AllowDataMutation,
        Self::AllowDataMutationProd,
        Self::CleanupTestData,
        Self::RequireConfirmation,
        Self::MaxTestDataAgeHours,
        Self::TestDataDir,
        Self::TestBackend,
    ];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TestEnv => "TEST_ENV",
            Self::ApiBaseUrl => "API_BASE_URL",
            Self::ApiKey => "API_KEY",
            Self::AllowDataMutation => "ALLOW_DATA_MUTATION",
            Self::AllowDataMutationProd => "ALLOW_DATA_MUTATION_PROD",
            Self::CleanupTestData => "CLEANUP_TEST_DATA",
            Self::RequireConfirmation => "REQUIRE_CONFIRMATION",
            Self::MaxTestDataAgeHours => "MAX_TEST_DATA_AGE_HOURS",
            Self::TestDataDir => "TEST_DATA_DIR",
            Self::TestBackend => "TEST_BACKEND",
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Harness configuration errors.
#[derive(Debug, Error)]
pub enum HarnessConfigError {
    /// Environment variable could not be read.
    #[error("environment error: {0}")]
    Env(String),
    /// Environment value failed validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// Env file could not be loaded.
    #[error("env file error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Enums
// ============================================================================

/// Deployment environment targeted by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestEnvironment {
    /// Local or shared development backend.
    #[default]
    Dev,
    /// Pre-production backend.
    Staging,
    /// Production backend.
    Prod,
}

impl TestEnvironment {
    /// All environments in promotion order.
    pub const ALL: [Self; 3] = [Self::Dev, Self::Staging, Self::Prod];

    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Staging => "staging",
            Self::Prod => "prod",
        }
    }

    /// Returns true for production.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Prod)
    }
}

impl fmt::Display for TestEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestEnvironment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "dev" => Ok(Self::Dev),
            "staging" => Ok(Self::Staging),
            "prod" => Ok(Self::Prod),
            other => Err(format!("unknown test environment: {other} (expected dev, staging, or prod)")),
        }
    }
}

/// Backend the suites talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendTarget {
    /// Deployed backend at `API_BASE_URL`.
    Live,
    /// In-process stub backend.
    Stub,
}

impl BackendTarget {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Stub => "stub",
        }
    }

    /// Resolves the backend from `TEST_BACKEND`, falling back to `live` when a
    /// base URL was configured and `stub` otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown backend label.
    pub fn resolve(explicit: Option<&str>, base_url_configured: bool) -> Result<Self, String> {
        match explicit.map(str::trim) {
            Some(label) => label.parse(),
            None if base_url_configured => Ok(Self::Live),
            None => Ok(Self::Stub),
        }
    }
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendTarget {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "live" => Ok(Self::Live),
            "stub" => Ok(Self::Stub),
            other => Err(format!("unknown test backend: {other} (expected live or stub)")),
        }
    }
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Resolved harness configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Target environment.
    pub environment: TestEnvironment,
    /// Backend base URL without trailing slash.
    pub api_base_url: String,
    /// Admin API key.
    pub api_key: String,
    /// Mutating tests may run.
    pub allow_data_mutation: bool,
    /// Tracked test resources are deleted after each test.
    pub cleanup_test_data: bool,
    /// Mutating production runs require confirmation.
    pub require_confirmation: bool,
    /// Age bound for stale test data in hours.
    pub max_test_data_age_hours: u64,
    /// Directory holding YAML test data.
    pub data_dir: PathBuf,
    /// Backend selection.
    pub backend: BackendTarget,
    /// Artifact and timeout settings.
    pub artifacts: ArtifactSettings,
}

impl fmt::Debug for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarnessConfig")
            .field("environment", &self.environment)
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &"<redacted>")
            .field("allow_data_mutation", &self.allow_data_mutation)
            .field("cleanup_test_data", &self.cleanup_test_data)
            .field("require_confirmation", &self.require_confirmation)
            .field("max_test_data_age_hours", &self.max_test_data_age_hours)
            .field("data_dir", &self.data_dir)
            .field("backend", &self.backend)
            .field("artifacts", &self.artifacts)
            .finish()
    }
}

impl HarnessConfig {
    /// Loads configuration for the environment named by `TEST_ENV`.
    ///
    /// A `.env.<environment>` file next to the crate is applied first when it
    /// exists; variables already set in the process win.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessConfigError`] when a variable is malformed.
    pub fn load() -> Result<Self, HarnessConfigError> {
        let environment = EnvValue::read(HarnessEnv::TestEnv.as_str())
            .map_err(HarnessConfigError::Env)?
            .map(|value| value.into_string().parse::<TestEnvironment>())
            .transpose()
            .map_err(HarnessConfigError::Invalid)?
            .unwrap_or_default();
        Self::load_for(environment)
    }

    /// Loads configuration for an explicit environment.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessConfigError`] when a variable is malformed.
    pub fn load_for(environment: TestEnvironment) -> Result<Self, HarnessConfigError> {
        load_env_file(Path::new(env!("CARGO_MANIFEST_DIR")), environment)?;
        Self::from_env(environment)
    }

    /// Resolves configuration from the current process environment only.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessConfigError`] when a variable is malformed.
    pub fn from_env(environment: TestEnvironment) -> Result<Self, HarnessConfigError> {
        let value = |key: HarnessEnv| EnvValue::read(key.as_str()).map_err(HarnessConfigError::Env);
        let read = |key: HarnessEnv| value(key).map(|found| found.map(EnvValue::into_string));
        let flag = |key: HarnessEnv, default: bool| -> Result<bool, HarnessConfigError> {
            Ok(value(key)?
                .map(|found| found.flag())
                .transpose()
                .map_err(HarnessConfigError::Invalid)?
                .unwrap_or(default))
        };

        let configured_url = read(HarnessEnv::ApiBaseUrl)?;
        let backend =
            BackendTarget::resolve(read(HarnessEnv::TestBackend)?.as_deref(), configured_url.is_some())
                .map_err(HarnessConfigError::Invalid)?;
        let api_base_url = configured_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        let api_key = read(HarnessEnv::ApiKey)?.unwrap_or_else(|| DEFAULT_DEV_API_KEY.to_string());

        let (allow_data_mutation, cleanup_test_data) = if environment.is_production() {
            (flag(HarnessEnv::AllowDataMutationProd, false)?, true)
        } else {
            (flag(HarnessEnv::AllowDataMutation, true)?, flag(HarnessEnv::CleanupTestData, true)?)
        };
        let require_confirmation = flag(HarnessEnv::RequireConfirmation, false)?;
        let max_test_data_age_hours = value(HarnessEnv::MaxTestDataAgeHours)?
            .map(|found| found.positive())
            .transpose()
            .map_err(HarnessConfigError::Invalid)?
            .unwrap_or(DEFAULT_MAX_TEST_DATA_AGE_HOURS);
        let data_dir =
            read(HarnessEnv::TestDataDir)?.map_or_else(default_data_dir, PathBuf::from);
        let artifacts = ArtifactSettings::from_env().map_err(HarnessConfigError::Invalid)?;

        Ok(Self {
            environment,
            api_base_url,
            api_key,
            allow_data_mutation,
            cleanup_test_data,
            require_confirmation,
            max_test_data_age_hours,
            data_dir,
            backend,
            artifacts,
        })
    }

    /// Returns the request timeout after env overrides.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.artifacts.request_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Returns a client configuration for `base_url` carrying the API key.
    #[must_use]
    pub fn client_config(&self, base_url: &str) -> ClientConfig {
        ClientConfig::new(base_url)
            .with_api_key(self.api_key.clone())
            .with_timeout(self.request_timeout())
    }

    /// Returns the age bound for stale test data.
    #[must_use]
    pub const fn max_test_data_age(&self) -> Duration {
        Duration::from_secs(self.max_test_data_age_hours.saturating_mul(3600))
    }

    /// Returns a snapshot of the run's environment for banners and artifacts.
    #[must_use]
    pub fn environment_info(&self) -> EnvironmentInfo {
        let timestamp =
            OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| String::from("unknown"));
        EnvironmentInfo {
            environment: self.environment,
            api_url: self.api_base_url.clone(),
            backend: self.backend,
            mutations_allowed: self.allow_data_mutation,
            cleanup_enabled: self.cleanup_test_data,
            timestamp,
        }
    }
}

/// Environment summary logged at startup and written to artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentInfo {
    /// Target environment.
    pub environment: TestEnvironment,
    /// Backend base URL.
    pub api_url: String,
    /// Backend selection.
    pub backend: BackendTarget,
    /// Mutating tests may run.
    pub mutations_allowed: bool,
    /// Tracked resources are cleaned up.
    pub cleanup_enabled: bool,
    /// RFC 3339 capture time.
    pub timestamp: String,
}

// ============================================================================
// SECTION: Env Files
// ============================================================================

/// Loads `<dir>/.env.<environment>` when present.
///
/// Returns the loaded path. Variables already present in the process are not
/// overridden.
///
/// # Errors
///
/// Returns [`HarnessConfigError::Io`] when the file exists but cannot be parsed.
pub fn load_env_file(
    dir: &Path,
    environment: TestEnvironment,
) -> Result<Option<PathBuf>, HarnessConfigError> {
    let path = dir.join(format!(".env.{}", environment.as_str()));
    if !path.is_file() {
        return Ok(None);
    }
    dotenvy::from_path(&path)
        .map_err(|err| HarnessConfigError::Io(format!("{}: {err}", path.display())))?;
    Ok(Some(path))
}
