// crates/content-gate-client/src/types.rs
// ============================================================================
// Module: API Types
// Description: Request payloads and enums for the Content Gate API.
// Purpose: Typed request bodies that serialize to the backend wire format.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Request bodies mirror the backend's camelCase JSON. Content types are
//! carried as plain strings in requests so tests can send invalid values;
//! [`ContentType`] enumerates the types the backend is expected to support.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Enums
// ============================================================================

/// Access gating mode for protected content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessMode {
    /// Shared password required.
    Password,
    /// Visitor email must be on the allowlist.
    EmailList,
    /// No gating.
    Open,
}

impl AccessMode {
    /// All access modes in wire order.
    pub const ALL: [Self; 3] = [Self::Password, Self::EmailList, Self::Open];

    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Password => "password",
            Self::EmailList => "email-list",
            Self::Open => "open",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "password" => Ok(Self::Password),
            "email-list" => Ok(Self::EmailList),
            "open" => Ok(Self::Open),
            other => Err(format!("unknown access mode: {other}")),
        }
    }
}

/// Content collections served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// Short notes.
    Notes,
    /// Idea drafts.
    Ideas,
    /// Published long-form writing.
    Publications,
    /// Standalone pages.
    Pages,
}

impl ContentType {
    /// All content types in catalog order.
    pub const ALL: [Self; 4] = [Self::Notes, Self::Ideas, Self::Publications, Self::Pages];

    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notes => "notes",
            Self::Ideas => "ideas",
            Self::Publications => "publications",
            Self::Pages => "pages",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| format!("unknown content type: {value}"))
    }
}

// ============================================================================
// SECTION: Access Rules
// ============================================================================

/// Body for creating an access rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRuleRequest {
    /// Content type the rule applies to.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Content slug the rule applies to.
    pub slug: String,
    /// Gating mode.
    pub access_mode: AccessMode,
    /// Plain password (internal API, password mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Password value submitted through the access-control API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Allowlisted emails (email-list mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_emails: Option<Vec<String>>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AccessRuleRequest {
    /// Builds a rule request with no mode-specific fields.
    #[must_use]
    pub fn new(content_type: impl Into<String>, slug: impl Into<String>, mode: AccessMode) -> Self {
        Self {
            content_type: content_type.into(),
            slug: slug.into(),
            access_mode: mode,
            password: None,
            password_hash: None,
            allowed_emails: None,
            description: None,
        }
    }
}

/// Partial update for an access rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRuleUpdate {
    /// Replacement description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement access mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_mode: Option<AccessMode>,
    /// Replacement password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Replacement allowlist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_emails: Option<Vec<String>>,
}

/// Filters for the internal access log listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Maximum entries returned.
    pub limit: Option<u32>,
    /// Restrict to failed (`true`) or successful (`false`) attempts.
    pub failed: Option<bool>,
    /// Restrict to a content type.
    pub content_type: Option<String>,
    /// Restrict to a slug.
    pub slug: Option<String>,
}

impl LogQuery {
    /// Returns query pairs in a fixed order, omitting unset filters.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit.filter(|limit| *limit > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(failed) = self.failed {
            pairs.push(("failed", failed.to_string()));
        }
        if let Some(content_type) = self.content_type.as_ref().filter(|value| !value.is_empty()) {
            pairs.push(("type", content_type.clone()));
        }
        if let Some(slug) = self.slug.as_ref().filter(|value| !value.is_empty()) {
            pairs.push(("slug", slug.clone()));
        }
        pairs
    }
}

/// Date range for the statistics endpoint (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    /// Inclusive start date.
    pub start: Option<String>,
    /// Inclusive end date.
    pub end: Option<String>,
}

impl StatsQuery {
    /// Returns query pairs in a fixed order, omitting unset bounds.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(start) = self.start.as_ref().filter(|value| !value.is_empty()) {
            pairs.push(("start", start.clone()));
        }
        if let Some(end) = self.end.as_ref().filter(|value| !value.is_empty()) {
            pairs.push(("end", end.clone()));
        }
        pairs
    }
}

// ============================================================================
// SECTION: Content Sync
// ============================================================================

/// Body for a manual content sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualSyncRequest {
    /// Sync every content file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_sync: Option<bool>,
    /// Explicit repository paths to sync.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
}

impl ManualSyncRequest {
    /// Requests a full sync.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            full_sync: Some(true),
            files: None,
        }
    }

    /// Requests a sync of specific repository paths.
    #[must_use]
    pub fn files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            full_sync: None,
            files: Some(files.into_iter().map(Into::into).collect()),
        }
    }
}

// ============================================================================
// SECTION: Content Management
// ============================================================================

/// Body for creating a content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFileRequest {
    /// Content type directory.
    #[serde(rename = "type")]
    pub content_type: String,
    /// File slug (`<slug>.md`).
    pub slug: String,
    /// Markdown body without frontmatter.
    pub markdown: String,
    /// Frontmatter fields.
    pub frontmatter: Value,
    /// Commit message for the repository write.
    pub commit_message: String,
}

/// Body for updating a content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFileUpdate {
    /// Replacement markdown body.
    pub markdown: String,
    /// Replacement frontmatter.
    pub frontmatter: Value,
    /// Blob SHA the update is based on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Commit message for the repository write.
    pub commit_message: String,
}

/// Body for deleting a content file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFileDelete {
    /// Blob SHA being deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Commit message for the repository write.
    pub commit_message: String,
}
