// system-tests/src/cleanup.rs
// ============================================================================
// Module: Cleanup Lifecycle
// Description: Tracking and policy-gated deletion of resources tests create.
// Purpose: Remove test data without ever touching resources that are not ours.
// Dependencies: content-gate-client, regex, thiserror, tracing
// ============================================================================

//! ## Overview
//! Tests register every resource they create with a [`ResourceTracker`]. At
//! the end of the test the tracker deletes, newest first, only the resources
//! that [`CleanupPolicy::is_test_resource`] accepts for the target
//! environment. Production uses the explicit cleanup criteria from test data;
//! other environments accept anything that looks like test data.
//!
//! Invariants:
//! - Disabled cleanup deletes nothing.
//! - A failed deletion never stops the remaining deletions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;
use std::time::Duration;

use content_gate_client::ApiClient;
use content_gate_client::ClientError;
use content_gate_client::ContentFileDelete;
use regex::RegexSet;
use serde::Serialize;
use thiserror::Error;

use crate::config::HarnessConfig;
use crate::config::TestEnvironment;
use crate::data::CleanupCriteria;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while deleting a tracked resource.
#[derive(Debug, Error)]
pub enum CleanupError {
    /// The request itself failed.
    #[error("cleanup request failed: {0}")]
    Client(#[from] ClientError),
    /// The backend refused the deletion.
    #[error("cleanup rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Response body.
        body: String,
    },
}

// ============================================================================
// SECTION: Resources
// ============================================================================

/// A backend resource created by a test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrackedResource {
    /// Access rule created through either rule API.
    AccessRule {
        /// Content type.
        content_type: String,
        /// Content slug.
        slug: String,
        /// Rule description, used by cleanup criteria.
        description: Option<String>,
    },
    /// Content file written to the repository.
    ContentFile {
        /// Content type.
        content_type: String,
        /// Content slug.
        slug: String,
    },
}

impl TrackedResource {
    /// Builds an access rule resource.
    pub fn access_rule(
        content_type: impl Into<String>,
        slug: impl Into<String>,
        description: Option<&str>,
    ) -> Self {
        Self::AccessRule {
            content_type: content_type.into(),
            slug: slug.into(),
            description: description.map(str::to_string),
        }
    }

    /// Builds a content file resource.
    pub fn content_file(content_type: impl Into<String>, slug: impl Into<String>) -> Self {
        Self::ContentFile {
            content_type: content_type.into(),
            slug: slug.into(),
        }
    }

    /// Returns the resource slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        match self {
            Self::AccessRule { slug, .. } | Self::ContentFile { slug, .. } => slug,
        }
    }

    /// Returns the resource content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        match self {
            Self::AccessRule { content_type, .. } | Self::ContentFile { content_type, .. } => {
                content_type
            }
        }
    }

    /// Returns the resource description, or `""`.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::AccessRule { description, .. } => description.as_deref().unwrap_or_default(),
            Self::ContentFile { .. } => "",
        }
    }

    /// Returns a `type/slug` label for logs.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.content_type(), self.slug())
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Decides which tracked resources may be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupPolicy {
    /// Target environment.
    pub environment: TestEnvironment,
    /// Cleanup switch.
    pub cleanup_enabled: bool,
    /// Production cleanup criteria.
    pub criteria: CleanupCriteria,
}

impl CleanupPolicy {
    /// Builds the policy for a harness configuration.
    #[must_use]
    pub fn from_config(config: &HarnessConfig, criteria: Option<&CleanupCriteria>) -> Self {
        Self {
            environment: config.environment,
            cleanup_enabled: config.cleanup_test_data,
            criteria: criteria.cloned().unwrap_or_default(),
        }
    }

    /// Returns true when `resource` is test data that may be deleted.
    #[must_use]
    pub fn is_test_resource(&self, resource: &TrackedResource) -> bool {
        if !self.cleanup_enabled {
            return false;
        }
        let slug = resource.slug();
        let description = resource.description();
        match self.environment {
            TestEnvironment::Prod => {
                self.criteria
                    .slug_patterns
                    .iter()
                    .any(|pattern| slug.contains(pattern.replace('*', "").as_str()))
                    || self
                        .criteria
                        .description_markers
                        .iter()
                        .any(|marker| description.contains(marker.as_str()))
            }
            TestEnvironment::Dev | TestEnvironment::Staging => {
                slug.to_lowercase().contains("test")
                    || description.to_lowercase().contains("[test]")
            }
        }
    }
}

/// Returns true when a test slug embeds a unix timestamp older than `max_age`.
#[must_use]
pub fn is_stale(slug: &str, now_secs: u64, max_age: Duration) -> bool {
    slug_timestamp(slug).is_some_and(|created| now_secs.saturating_sub(created) > max_age.as_secs())
}

/// Extracts the unix-seconds token rendered by the slug generator.
fn slug_timestamp(slug: &str) -> Option<u64> {
    slug.split('-')
        .filter(|part| part.len() == 10)
        .filter_map(|part| part.parse::<u64>().ok())
        .next_back()
}

// ============================================================================
// SECTION: Slug Heuristics
// ============================================================================

/// Returns true when `slug` follows a test naming convention.
#[must_use]
pub fn is_test_slug(slug: &str) -> bool {
    /// Compiled test-slug patterns; `None` when a pattern fails to compile.
    static PATTERNS: OnceLock<Option<RegexSet>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            RegexSet::new([r"^test-", r"^.*-test-", r"^test-automated-", r"^.*-\{timestamp\}"]).ok()
        })
        .as_ref()
        .is_some_and(|set| set.is_match(slug))
}

// ============================================================================
// SECTION: Tracker
// ============================================================================

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    /// Resources deleted (or already gone).
    pub deleted: Vec<String>,
    /// Resources the policy refused to delete.
    pub skipped: Vec<String>,
    /// Resources whose deletion failed, with the reason.
    pub failed: Vec<String>,
}

impl CleanupReport {
    /// Returns true when no deletion failed.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Tracks resources created during one test.
#[derive(Debug)]
pub struct ResourceTracker {
    /// Deletion policy.
    policy: CleanupPolicy,
    /// Resources in creation order.
    resources: Vec<TrackedResource>,
}

impl ResourceTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new(policy: CleanupPolicy) -> Self {
        Self {
            policy,
            resources: Vec::new(),
        }
    }

    /// Returns the deletion policy.
    #[must_use]
    pub const fn policy(&self) -> &CleanupPolicy {
        &self.policy
    }

    /// Registers a created resource.
    pub fn track(&mut self, resource: TrackedResource) {
        tracing::debug!(resource = %resource.label(), "tracking test resource");
        self.resources.push(resource);
    }

    /// Returns pending resources in creation order.
    #[must_use]
    pub fn pending(&self) -> &[TrackedResource] {
        &self.resources
    }

    /// Deletes tracked resources newest first and drains the tracker.
    pub async fn cleanup(&mut self, client: &ApiClient) -> CleanupReport {
        let mut report = CleanupReport::default();
        while let Some(resource) = self.resources.pop() {
            let label = resource.label();
            if !self.policy.is_test_resource(&resource) {
                tracing::info!(resource = %label, "cleanup skipped by policy");
                report.skipped.push(label);
                continue;
            }
            match delete_resource(client, &resource).await {
                Ok(()) => {
                    tracing::info!(resource = %label, "cleaned up test resource");
                    report.deleted.push(label);
                }
                Err(err) => {
                    tracing::warn!(resource = %label, error = %err, "failed to clean up test resource");
                    report.failed.push(format!("{label}: {err}"));
                }
            }
        }
        report
    }
}

impl Drop for ResourceTracker {
    fn drop(&mut self) {
        if !self.resources.is_empty() {
            let pending: Vec<String> = self.resources.iter().map(TrackedResource::label).collect();
            tracing::warn!(?pending, "resource tracker dropped with uncleaned resources");
        }
    }
}

/// Deletes one resource through the API that owns it.
async fn delete_resource(client: &ApiClient, resource: &TrackedResource) -> Result<(), CleanupError> {
    match resource {
        TrackedResource::AccessRule { content_type, slug, .. } => {
            let response = client.delete_access_rule(content_type, slug).await?;
            accept_deletion(response.status, &response.body)
        }
        TrackedResource::ContentFile { content_type, slug } => {
            let current = client.get_content_file(content_type, slug).await?;
            if current.status == 404 {
                return Ok(());
            }
            if !current.is_success() {
                return Err(CleanupError::Rejected {
                    status: current.status,
                    body: current.body.to_string(),
                });
            }
            let delete = ContentFileDelete {
                sha: current.str_field("sha").map(str::to_string),
                commit_message: format!("test: clean up {content_type}/{slug}"),
            };
            let response = client.delete_content_file(content_type, slug, &delete).await?;
            accept_deletion(response.status, &response.body)
        }
    }
}

/// Treats 2xx and 404 as deleted.
fn accept_deletion(status: u16, body: &serde_json::Value) -> Result<(), CleanupError> {
    if matches!(status, 200..=299 | 404) {
        return Ok(());
    }
    Err(CleanupError::Rejected {
        status,
        body: body.to_string(),
    })
}

// ============================================================================
// SECTION: Stale Sweep
// ============================================================================

/// Deletes stale test access rules left behind by earlier runs.
///
/// A rule is swept when its slug passes [`is_test_slug`], the policy accepts
/// it, and the timestamp embedded in its slug is older than `max_age`.
///
/// # Errors
///
/// Returns [`CleanupError`] when the rule listing cannot be fetched.
pub async fn sweep_stale_access_rules(
    client: &ApiClient,
    policy: &CleanupPolicy,
    now_secs: u64,
    max_age: Duration,
) -> Result<CleanupReport, CleanupError> {
    let listing = client.get_access_rules(None, None).await?;
    if !listing.is_success() {
        return Err(CleanupError::Rejected {
            status: listing.status,
            body: listing.body.to_string(),
        });
    }
    let mut tracker = ResourceTracker::new(policy.clone());
    let rules = listing.field("rules").and_then(serde_json::Value::as_array).cloned().unwrap_or_default();
    for rule in rules {
        let (Some(content_type), Some(slug)) =
            (rule.get("type").and_then(|v| v.as_str()), rule.get("slug").and_then(|v| v.as_str()))
        else {
            continue;
        };
        if is_test_slug(slug) && is_stale(slug, now_secs, max_age) {
            let description = rule.get("description").and_then(|v| v.as_str());
            tracker.track(TrackedResource::access_rule(content_type, slug, description));
        }
    }
    Ok(tracker.cleanup(client).await)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
