// system-tests/src/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Translates runner options into a `cargo test` invocation.
// Purpose: Keep suite selection and safety gating pure and unit-testable.
// Dependencies: clap, thiserror
// ============================================================================

//! ## Overview
//! The runner never executes tests itself. [`RunPlan::from_options`] selects
//! the suite binaries, filters, and environment for one `cargo test` call;
//! the binary in `src/bin` spawns it. Production gating lives in
//! [`confirmation_required`] and [`confirm`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::str::FromStr;

use clap::ValueEnum;
use thiserror::Error;

use crate::config::BackendTarget;
use crate::config::HarnessEnv;
use crate::config::TestEnvironment;

/// Cargo package holding the suites.
pub const SUITE_PACKAGE: &str = "system-tests";
/// Feature gating the suite binaries.
pub const SUITE_FEATURE: &str = "system-tests";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Runner option errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    /// Options contradict each other.
    #[error("conflicting options: {0}")]
    Conflict(String),
    /// Option value is invalid.
    #[error("invalid option: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Suites
// ============================================================================

/// Suite test binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Suite {
    /// Read-only endpoint and flow checks.
    Functional,
    /// Mutating CRUD and data checks.
    DataValidation,
    /// Stub-backed failure injection and end-to-end sync.
    Integration,
}

impl Suite {
    /// All suites in execution order.
    pub const ALL: [Self; 3] = [Self::Functional, Self::DataValidation, Self::Integration];

    /// Returns the test binary name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Functional => "functional",
            Self::DataValidation => "data_validation",
            Self::Integration => "integration",
        }
    }

    /// Returns true when the suite creates or deletes backend data.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Functional)
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|suite| suite.as_str() == value)
            .ok_or_else(|| format!("unknown suite: {value}"))
    }
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Runner options after CLI parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Target environment.
    pub environment: TestEnvironment,
    /// Run only read-only suites.
    pub readonly_only: bool,
    /// Run only mutating suites.
    pub mutating_only: bool,
    /// Explicit suite selection.
    pub suites: Vec<Suite>,
    /// Test name filter.
    pub pattern: Option<String>,
    /// Show test output.
    pub verbose: bool,
    /// List tests instead of running them.
    pub list_tests: bool,
    /// Test thread count.
    pub test_threads: Option<usize>,
    /// Backend override.
    pub backend: Option<BackendTarget>,
    /// Test data directory override.
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// SECTION: Plan
// ============================================================================

/// A fully resolved `cargo test` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    /// Program to execute.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<String>,
    /// Environment variables set on the child.
    pub envs: Vec<(String, String)>,
    /// Selected suites.
    pub suites: Vec<Suite>,
}

impl RunPlan {
    /// Builds the plan for `options`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the options conflict or select nothing.
    pub fn from_options(options: &RunOptions) -> Result<Self, RunnerError> {
        if options.readonly_only && options.mutating_only {
            return Err(RunnerError::Conflict(
                "--readonly-only and --mutating-only are mutually exclusive".to_string(),
            ));
        }
        if options.test_threads == Some(0) {
            return Err(RunnerError::Invalid("--test-threads must be at least 1".to_string()));
        }
        let suites = select_suites(options)?;

        let mut args: Vec<String> = ["test", "-p", SUITE_PACKAGE, "--features", SUITE_FEATURE]
            .into_iter()
            .map(str::to_string)
            .collect();
        for suite in &suites {
            args.push("--test".to_string());
            args.push(suite.as_str().to_string());
        }
        if let Some(pattern) = options.pattern.as_ref().filter(|value| !value.trim().is_empty()) {
            args.push(pattern.trim().to_string());
        }
        args.push("--".to_string());
        if let Some(threads) = options.test_threads {
            args.push(format!("--test-threads={threads}"));
        }
        if options.verbose {
            args.push("--nocapture".to_string());
        }
        if options.list_tests {
            args.push("--list".to_string());
        }

        let mut envs =
            vec![(HarnessEnv::TestEnv.as_str().to_string(), options.environment.as_str().to_string())];
        if let Some(backend) = options.backend {
            envs.push((HarnessEnv::TestBackend.as_str().to_string(), backend.as_str().to_string()));
        }
        if let Some(dir) = &options.data_dir {
            envs.push((HarnessEnv::TestDataDir.as_str().to_string(), dir.display().to_string()));
        }

        Ok(Self {
            program: "cargo".to_string(),
            args,
            envs,
            suites,
        })
    }

    /// Returns true when any selected suite mutates backend data.
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        self.suites.iter().any(|suite| suite.is_mutating())
    }

    /// Builds the child process command.
    #[must_use]
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.envs {
            command.env(key, value);
        }
        command
    }

    /// Renders the plan as a shell-like line for logs.
    #[must_use]
    pub fn display(&self) -> String {
        let envs = self.envs.iter().map(|(key, value)| format!("{key}={value}"));
        envs.chain(std::iter::once(self.program.clone()))
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Resolves the suite list from the readonly/mutating switches and explicit suites.
fn select_suites(options: &RunOptions) -> Result<Vec<Suite>, RunnerError> {
    let mut suites: Vec<Suite> =
        if options.suites.is_empty() { Suite::ALL.to_vec() } else { options.suites.clone() };
    suites.sort_unstable();
    suites.dedup();
    if options.readonly_only {
        if !options.suites.is_empty() && options.suites.iter().any(|suite| suite.is_mutating()) {
            return Err(RunnerError::Conflict(
                "--readonly-only cannot select a mutating suite".to_string(),
            ));
        }
        suites.retain(|suite| !suite.is_mutating());
    } else if options.mutating_only {
        suites.retain(|suite| suite.is_mutating());
    }
    if suites.is_empty() {
        return Err(RunnerError::Invalid("no suites selected".to_string()));
    }
    Ok(suites)
}

// ============================================================================
// SECTION: Safety
// ============================================================================

/// Returns true when a mutating production run must be confirmed first.
#[must_use]
pub fn confirmation_required(
    environment: TestEnvironment,
    require_confirmation: bool,
    plan: &RunPlan,
) -> bool {
    require_confirmation && environment.is_production() && plan.is_mutating()
}

/// Prompts on `output` and returns true only when `input` answers `yes`.
///
/// # Errors
///
/// Returns an I/O error when the prompt cannot be written or read.
pub fn confirm<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    environment: TestEnvironment,
) -> std::io::Result<bool> {
    write!(
        output,
        "About to run mutating tests against {environment}. Type 'yes' to continue: "
    )?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
