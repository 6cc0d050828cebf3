// system-tests/tests/helpers/artifacts.rs
// ============================================================================
// Module: Test Artifacts
// Description: Per-test artifact directories and run records.
// Purpose: Leave a canonical record of every suite test, including panics.
// Dependencies: system-tests, serde, serde_jcs
// ============================================================================

//! ## Overview
//! Each suite test owns one artifact directory resolved through
//! [`ArtifactSettings`]. JSON artifacts are written in JCS form so two runs
//! with the same traffic produce byte-identical files. [`TestReporter`]
//! always leaves `summary.json` and `summary.md` behind, falling back to a
//! `panic` record when the test unwinds before finishing.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use system_tests::config::ArtifactSettings;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Final state of a suite test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestOutcome {
    /// Every check held.
    Pass,
    /// A check or request failed.
    Fail,
    /// Skipped by a mutation or backend guard.
    Skip,
    /// The test panicked before finishing.
    Panic,
    /// The reporter was dropped without a recorded outcome.
    Unfinished,
}

impl TestOutcome {
    /// Returns the label written to summaries.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Skip => "skip",
            Self::Panic => "panic",
            Self::Unfinished => "unfinished",
        }
    }
}

/// Where the test ran, copied into the summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunTarget {
    /// Environment label (`dev`, `staging`, `prod`).
    pub environment: String,
    /// Backend label (`stub` or `live`).
    pub backend: String,
    /// Base URL the client talked to.
    pub base_url: String,
}

/// Serialized body of `summary.json`.
#[derive(Debug, Serialize)]
struct RunRecord<'a> {
    /// Test function name.
    test_name: &'a str,
    /// Final outcome.
    outcome: TestOutcome,
    /// Environment and backend the test ran against.
    target: &'a RunTarget,
    /// Start time, epoch milliseconds.
    started_at_ms: u128,
    /// End time, epoch milliseconds.
    ended_at_ms: u128,
    /// Wall-clock duration.
    duration_ms: u128,
    /// Free-form notes from the test.
    notes: &'a [String],
    /// File names written to the artifact directory.
    artifacts: &'a [String],
}

/// Milliseconds since the unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Reporter
// ============================================================================

/// Artifact directory and run record for one suite test.
pub struct TestReporter {
    /// Artifact directory for this test.
    dir: PathBuf,
    /// Test function name.
    test_name: String,
    /// Where the test ran.
    target: RunTarget,
    /// Start time, epoch milliseconds.
    started_at_ms: u128,
    /// Artifact file names in write order.
    written: Vec<String>,
    /// Set once a summary has been written.
    finalized: bool,
}

impl TestReporter {
    /// Creates the artifact directory for `test_name`.
    ///
    /// Refuses a directory that already holds a summary unless overwrite is
    /// enabled.
    pub fn new(test_name: &str, target: RunTarget) -> io::Result<Self> {
        let started_at_ms = now_millis();
        let settings = ArtifactSettings::from_env().map_err(io::Error::other)?;
        let dir = settings.run_test_dir(test_name);
        if dir.join("summary.json").exists() && !settings.allow_overwrite {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("artifacts already exist at {}", dir.display()),
            ));
        }
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            test_name: test_name.to_string(),
            target,
            started_at_ms,
            written: Vec::new(),
            finalized: false,
        })
    }

    /// Writes `value` as canonical JSON and records it in the summary.
    pub fn write_json<T: Serialize + ?Sized>(&mut self, name: &str, value: &T) -> io::Result<()> {
        let bytes = serde_jcs::to_vec(value).map_err(|err| io::Error::other(err.to_string()))?;
        self.write(name, &bytes)
    }

    /// Writes raw bytes and records the file name once.
    fn write(&mut self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::write(self.dir.join(name), bytes)?;
        if !self.written.iter().any(|existing| existing == name) {
            self.written.push(name.to_string());
        }
        Ok(())
    }

    /// Writes `summary.json` and `summary.md`.
    pub fn finish(&mut self, outcome: TestOutcome, notes: &[String]) -> io::Result<()> {
        self.finalized = true;
        let mut artifacts = self.written.clone();
        for summary in ["summary.json", "summary.md"] {
            if !artifacts.iter().any(|name| name == summary) {
                artifacts.push(summary.to_string());
            }
        }
        let ended_at_ms = now_millis();
        let record = RunRecord {
            test_name: &self.test_name,
            outcome,
            target: &self.target,
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(self.started_at_ms),
            notes,
            artifacts: &artifacts,
        };
        let json = serde_jcs::to_vec(&record).map_err(|err| io::Error::other(err.to_string()))?;
        let markdown = render_markdown(&record);
        self.write("summary.json", &json)?;
        self.write("summary.md", markdown.as_bytes())
    }
}

impl Drop for TestReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let outcome =
            if std::thread::panicking() { TestOutcome::Panic } else { TestOutcome::Unfinished };
        let _ = self.finish(outcome, &["test ended before its summary was written".to_string()]);
    }
}

/// Renders the human-readable summary.
fn render_markdown(record: &RunRecord<'_>) -> String {
    let mut out = format!("# {}\n\n", record.test_name);
    let _ = writeln!(out, "- Outcome: {}", record.outcome.as_str());
    let _ = writeln!(out, "- Environment: {}", record.target.environment);
    let _ = writeln!(out, "- Backend: {} ({})", record.target.backend, record.target.base_url);
    let _ = writeln!(out, "- Duration (ms): {}", record.duration_ms);
    for (title, items) in [("Notes", record.notes), ("Artifacts", record.artifacts)] {
        let _ = write!(out, "\n## {title}\n\n");
        if items.is_empty() {
            out.push_str("- None\n");
        }
        for item in items {
            let _ = writeln!(out, "- {item}");
        }
    }
    out
}
