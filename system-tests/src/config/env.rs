// system-tests/src/config/env.rs
// ============================================================================
// Module: Artifact Settings
// Description: Artifact root, timeout floor, and overwrite switch from env.
// Purpose: Shared fail-closed reader for every harness environment variable.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every harness variable is read through [`EnvValue`]: a variable that is
//! set must be valid UTF-8 and non-blank, so a typo fails the run instead of
//! quietly falling back to a default. [`ArtifactSettings`] carries the knobs
//! read by the artifact writer and the client timeout.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

// ============================================================================
// SECTION: Variables
// ============================================================================

/// Environment variables controlling test artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactEnv {
    /// Shared root for per-test artifact directories.
    RunRoot,
    /// Lower bound for request timeouts, in seconds.
    TimeoutSeconds,
    /// Reuse artifact directories that already hold a summary.
    AllowOverwrite,
}

impl ArtifactEnv {
    /// Every artifact variable.
    pub const ALL: [Self; 3] = [Self::RunRoot, Self::TimeoutSeconds, Self::AllowOverwrite];

    /// Returns the variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "CONTENT_GATE_SYSTEM_TEST_RUN_ROOT",
            Self::TimeoutSeconds => "CONTENT_GATE_SYSTEM_TEST_TIMEOUT_SEC",
            Self::AllowOverwrite => "CONTENT_GATE_SYSTEM_TEST_ALLOW_OVERWRITE",
        }
    }
}

// ============================================================================
// SECTION: Values
// ============================================================================

/// A set, non-blank environment value tagged with its variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EnvValue {
    /// Variable the value came from, used in error messages.
    name: &'static str,
    /// Raw value as set.
    raw: String,
}

impl EnvValue {
    /// Reads `name`. Unset is `Ok(None)`; non-UTF-8 or blank is an error.
    ///
    /// # Errors
    ///
    /// Returns a message naming the variable when the value is unusable.
    pub(crate) fn read(name: &'static str) -> Result<Option<Self>, String> {
        let Some(raw) = std::env::var_os(name) else {
            return Ok(None);
        };
        let raw = raw.into_string().map_err(|_| format!("{name} must be valid UTF-8"))?;
        if raw.trim().is_empty() {
            return Err(format!("{name} must not be empty"));
        }
        Ok(Some(Self {
            name,
            raw,
        }))
    }

    /// Returns the raw value.
    pub(crate) fn into_string(self) -> String {
        self.raw
    }

    /// Parses a positive integer.
    ///
    /// # Errors
    ///
    /// Returns a message when the value is non-numeric or zero.
    pub(crate) fn positive(&self) -> Result<u64, String> {
        match self.raw.trim().parse::<u64>() {
            Ok(0) => Err(format!("{} must be greater than zero", self.name)),
            Ok(value) => Ok(value),
            Err(_) => Err(format!("{} must be a positive integer", self.name)),
        }
    }

    /// Parses `true`/`false`/`1`/`0`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns a message for any other literal.
    pub(crate) fn flag(&self) -> Result<bool, String> {
        match self.raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(format!("{} must be 1, 0, true, or false", self.name)),
        }
    }
}

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Artifact and timeout settings resolved from [`ArtifactEnv`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactSettings {
    /// Shared artifact root; each test writes to `<root>/<test name>`.
    pub run_root: Option<PathBuf>,
    /// Minimum request timeout.
    pub timeout_floor: Option<Duration>,
    /// Reuse directories that already hold a summary.
    pub allow_overwrite: bool,
}

impl ArtifactSettings {
    /// Reads the settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first malformed variable.
    pub fn from_env() -> Result<Self, String> {
        let run_root =
            EnvValue::read(ArtifactEnv::RunRoot.as_str())?.map(|value| PathBuf::from(value.into_string()));
        let timeout_floor = EnvValue::read(ArtifactEnv::TimeoutSeconds.as_str())?
            .map(|value| value.positive().map(Duration::from_secs))
            .transpose()?;
        let allow_overwrite = EnvValue::read(ArtifactEnv::AllowOverwrite.as_str())?
            .map(|value| value.flag())
            .transpose()?
            .unwrap_or(false);
        Ok(Self {
            run_root,
            timeout_floor,
            allow_overwrite,
        })
    }

    /// Returns `requested` raised to the configured floor.
    #[must_use]
    pub fn request_timeout(&self, requested: Duration) -> Duration {
        self.timeout_floor.map_or(requested, |floor| requested.max(floor))
    }

    /// Returns the artifact directory for `test_name` in the current run.
    ///
    /// Every test in one process shares the same `run_<ms>` root.
    #[must_use]
    pub fn run_test_dir(&self, test_name: &str) -> PathBuf {
        self.test_dir(test_name, run_stamp_ms())
    }

    /// Returns the artifact directory for `test_name`.
    ///
    /// Without a configured root, `run_stamp_ms` names the run directory
    /// under `target/system-tests`.
    #[must_use]
    pub fn test_dir(&self, test_name: &str, run_stamp_ms: u128) -> PathBuf {
        self.run_root.as_ref().map_or_else(
            || PathBuf::from("target/system-tests").join(format!("run_{run_stamp_ms}")),
            Clone::clone,
        )
        .join(test_name)
    }
}

/// Milliseconds since the epoch at the first artifact lookup in this process.
fn run_stamp_ms() -> u128 {
    /// First stamp taken in this process.
    static STAMP: OnceLock<u128> = OnceLock::new();
    *STAMP.get_or_init(|| SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis())
}
