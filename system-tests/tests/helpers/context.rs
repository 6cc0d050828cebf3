// system-tests/tests/helpers/context.rs
// ============================================================================
// Module: Test Context
// Description: Per-test harness: config, backend, client, fixtures, cleanup.
// Purpose: Give every suite test the same setup and teardown lifecycle.
// Dependencies: content-gate-client, system-tests, tracing
// ============================================================================

//! ## Overview
//! [`TestContext::start`] resolves the harness configuration, starts the stub
//! backend when the target is `stub`, and builds the client and fixtures.
//! [`TestContext::finish`] deletes tracked resources through the cleanup
//! policy and writes the transcript and summary artifacts. Suites go through
//! [`run_test`] so cleanup also runs when a check fails.

use std::error::Error;

use content_gate_client::AccessRuleRequest;
use content_gate_client::ApiClient;
use content_gate_client::ContentFileRequest;
use system_tests::cleanup::CleanupPolicy;
use system_tests::cleanup::ResourceTracker;
use system_tests::cleanup::TrackedResource;
use system_tests::config::BackendTarget;
use system_tests::config::HarnessConfig;
use system_tests::data::TestData;
use system_tests::fixtures::Fixtures;
use system_tests::logging::init_logging;
use system_tests::logging::log_environment_banner;

use crate::helpers::artifacts::RunTarget;
use crate::helpers::artifacts::TestOutcome;
use crate::helpers::artifacts::TestReporter;
use crate::helpers::backend_stub::BackendStubConfig;
use crate::helpers::backend_stub::BackendStubHandle;
use crate::helpers::backend_stub::DEFAULT_WEBHOOK_SECRET;
use crate::helpers::backend_stub::spawn_backend_stub;

/// Boxed error returned by suite tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Harness state for one suite test.
pub struct TestContext {
    /// Test function name.
    name: String,
    /// Resolved harness configuration.
    config: HarnessConfig,
    /// Fixture builders over the loaded test data.
    fixtures: Fixtures,
    /// Client for the target backend.
    client: ApiClient,
    /// Resources to delete when the test ends.
    tracker: ResourceTracker,
    /// Artifact writer.
    reporter: TestReporter,
    /// In-process backend when running against the stub.
    stub: Option<BackendStubHandle>,
    /// Notes copied into the summary.
    notes: Vec<String>,
}

impl TestContext {
    /// Loads configuration and data and connects to the target backend.
    pub fn start(name: &str) -> TestResult<Self> {
        let config = HarnessConfig::load()?;
        init_logging(config.environment);
        log_environment_banner(&config.environment_info());
        let data = TestData::load(&config.data_dir, config.environment)?;
        let stub = match config.backend {
            BackendTarget::Live => None,
            BackendTarget::Stub => Some(spawn_backend_stub(BackendStubConfig {
                api_key: config.api_key.clone(),
                webhook_secret: data
                    .content_sync
                    .webhook_secret
                    .clone()
                    .unwrap_or_else(|| DEFAULT_WEBHOOK_SECRET.to_string()),
            })?),
        };
        let base_url = stub.as_ref().map_or(config.api_base_url.as_str(), BackendStubHandle::base_url);
        let client = ApiClient::new(config.client_config(base_url))?;
        let policy = CleanupPolicy::from_config(&config, data.cleanup_criteria.as_ref());
        let reporter = TestReporter::new(name, RunTarget {
            environment: config.environment.as_str().to_string(),
            backend: config.backend.to_string(),
            base_url: client.base_url().to_string(),
        })?;
        tracing::info!(test = name, backend = %config.backend, base_url = client.base_url(), "test started");
        Ok(Self {
            name: name.to_string(),
            config,
            fixtures: Fixtures::new(data),
            client,
            tracker: ResourceTracker::new(policy),
            reporter,
            stub,
            notes: Vec::new(),
        })
    }

    /// Returns the resolved configuration.
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Returns the API client.
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Returns the fixture builders.
    pub const fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Returns the loaded test data.
    pub const fn data(&self) -> &TestData {
        self.fixtures.data()
    }

    /// Returns true when running against the in-process stub.
    pub const fn is_stub(&self) -> bool {
        self.stub.is_some()
    }

    /// Returns the stub handle, failing against a live backend.
    pub fn stub(&self) -> TestResult<&BackendStubHandle> {
        self.stub.as_ref().ok_or_else(|| "test requires the stub backend".into())
    }

    /// Adds a note to the summary.
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Returns false and records a skip when data mutation is disabled.
    pub fn require_mutation(&mut self) -> bool {
        if self.config.allow_data_mutation {
            return true;
        }
        tracing::warn!(test = %self.name, environment = %self.config.environment, "data mutation disabled; skipping");
        self.note(format!("skipped: data mutation disabled in {}", self.config.environment));
        false
    }

    /// Returns false and records a skip when the target is a live backend.
    pub fn require_stub(&mut self) -> bool {
        if self.is_stub() {
            return true;
        }
        tracing::warn!(test = %self.name, "fault injection needs the stub backend; skipping");
        self.note("skipped: fault injection needs the stub backend");
        false
    }

    /// Tracks a resource for cleanup.
    pub fn track(&mut self, resource: TrackedResource) {
        self.tracker.track(resource);
    }

    /// Tracks a created access rule.
    pub fn track_rule(&mut self, rule: &AccessRuleRequest) {
        self.track(TrackedResource::access_rule(
            rule.content_type.clone(),
            rule.slug.clone(),
            rule.description.as_deref(),
        ));
    }

    /// Tracks a created content file.
    pub fn track_file(&mut self, file: &ContentFileRequest) {
        self.track(TrackedResource::content_file(file.content_type.clone(), file.slug.clone()));
    }

    /// Cleans up tracked resources, writes artifacts, and returns `outcome`.
    pub async fn finish(mut self, outcome: TestResult) -> TestResult {
        if let Some(stub) = &self.stub {
            stub.clear_faults();
        }
        let report = self.tracker.cleanup(&self.client).await;
        if !report.is_clean() {
            self.notes.push(format!("cleanup failures: {}", report.failed.join("; ")));
        }
        let status = match &outcome {
            Err(err) => {
                self.notes.push(format!("failure: {err}"));
                TestOutcome::Fail
            }
            Ok(()) if self.notes.iter().any(|note| note.starts_with("skipped")) => TestOutcome::Skip,
            Ok(()) => TestOutcome::Pass,
        };
        self.reporter.write_json("transcript.json", &self.client.transcript())?;
        self.reporter.write_json("cleanup.json", &report)?;
        self.reporter.finish(status, &self.notes)?;
        tracing::info!(
            test = %self.name,
            status = status.as_str(),
            deleted = report.deleted.len(),
            "test finished"
        );
        outcome
    }
}

/// Runs `body` inside a fresh context and always finishes the context.
pub async fn run_test<F>(name: &str, body: F) -> TestResult
where
    F: AsyncFnOnce(&mut TestContext) -> TestResult,
{
    let mut ctx = TestContext::start(name)?;
    let outcome = body(&mut ctx).await;
    ctx.finish(outcome).await
}
