// system-tests/src/data.rs
// ============================================================================
// Module: Test Data
// Description: Environment-specific YAML templates and named test scenarios.
// Purpose: Load rule, content, and webhook templates that fixtures render.
// Dependencies: serde, serde_yaml, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Each environment has its own `test-data-<env>.yaml` so production runs can
//! carry stricter slugs and the cleanup criteria that gate deletion there.
//! `test-scenarios.yaml` classifies named scenarios as read-only or mutating.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use content_gate_client::AccessMode;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::TestEnvironment;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Test data loading errors.
#[derive(Debug, Error)]
pub enum TestDataError {
    /// Data file could not be read.
    #[error("test data io error: {0}")]
    Io(String),
    /// Data file is not valid YAML for the expected model.
    #[error("test data parse error: {0}")]
    Parse(String),
    /// A required template is absent.
    #[error("test data missing: {0}")]
    Missing(String),
}

// ============================================================================
// SECTION: Test Data Model
// ============================================================================

/// Contents of `test-data-<env>.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestData {
    /// Internal access-rule templates.
    pub access_rules: AccessRuleTemplates,
    /// Access-control API templates.
    pub access_control_api: AccessControlApiData,
    /// Content management templates.
    #[serde(default)]
    pub content_management: ContentManagementData,
    /// Content sync webhook payloads.
    #[serde(default)]
    pub content_sync: ContentSyncData,
    /// Criteria gating production cleanup.
    #[serde(default)]
    pub cleanup_criteria: Option<CleanupCriteria>,
}

/// Internal access-rule templates grouped by mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRuleTemplates {
    /// Password rule templates.
    pub password_protected: Vec<RuleTemplate>,
    /// Email allowlist rule templates.
    pub email_list: Vec<RuleTemplate>,
    /// Open access rule templates.
    pub open_access: Vec<RuleTemplate>,
}

/// Template for an internal access rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTemplate {
    /// Content type.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Slug with a `{timestamp}` placeholder.
    pub slug_template: String,
    /// Password for password rules.
    #[serde(default)]
    pub password: Option<String>,
    /// Allowlist for email rules.
    #[serde(default)]
    pub allowed_emails: Option<Vec<String>>,
    /// Rule description.
    pub description: String,
}

/// Access-control API templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessControlApiData {
    /// One rule template per access mode.
    pub rules: AccessControlRuleTemplates,
    /// Named partial updates.
    #[serde(default)]
    pub updates: Vec<NamedPayload>,
    /// Named invalid payloads with the error fragment they should produce.
    #[serde(default)]
    pub invalid_data: Vec<InvalidPayload>,
}

/// One access-control rule template per mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlRuleTemplates {
    /// Password rule template.
    pub password_rule: AccessControlRuleTemplate,
    /// Email allowlist rule template.
    #[serde(rename = "email-list_rule")]
    pub email_list_rule: AccessControlRuleTemplate,
    /// Open rule template.
    pub open_rule: AccessControlRuleTemplate,
}

impl AccessControlRuleTemplates {
    /// Returns the template for `mode`.
    #[must_use]
    pub const fn for_mode(&self, mode: AccessMode) -> &AccessControlRuleTemplate {
        match mode {
            AccessMode::Password => &self.password_rule,
            AccessMode::EmailList => &self.email_list_rule,
            AccessMode::Open => &self.open_rule,
        }
    }
}

/// Template for an access-control API rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlRuleTemplate {
    /// Content type.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Slug with a `{timestamp}` placeholder.
    #[serde(rename = "slug_template")]
    pub slug_template: String,
    /// Access mode.
    pub access_mode: AccessMode,
    /// Plain password; fixtures submit its SHA-256 hex as `passwordHash`.
    #[serde(default)]
    pub password: Option<String>,
    /// Allowlist for email rules.
    #[serde(default)]
    pub allowed_emails: Option<Vec<String>>,
    /// Rule description.
    pub description: String,
}

/// Named JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPayload {
    /// Payload name.
    pub name: String,
    /// JSON body.
    pub data: Value,
}

/// Named invalid payload and the error fragment it should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidPayload {
    /// Payload name.
    pub name: String,
    /// JSON body.
    pub data: Value,
    /// Lowercase fragment expected in the `error` field.
    pub expected_error: String,
}

/// Content management templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentManagementData {
    /// Content file templates.
    #[serde(default)]
    pub files: Vec<ContentFileTemplate>,
}

/// Template for a content file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFileTemplate {
    /// Content type.
    #[serde(rename = "type")]
    pub content_type: String,
    /// Slug with a `{timestamp}` placeholder.
    pub slug_template: String,
    /// Markdown body.
    pub markdown: String,
    /// Frontmatter fields.
    #[serde(default)]
    pub frontmatter: Value,
    /// Commit message.
    pub commit_message: String,
}

/// Content sync templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSyncData {
    /// Secret the stub backend verifies webhook signatures with.
    #[serde(default)]
    pub webhook_secret: Option<String>,
    /// Named webhook payloads.
    #[serde(default)]
    pub webhook_payloads: Vec<WebhookPayload>,
}

/// Named webhook payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Payload name.
    pub name: String,
    /// GitHub push event body.
    pub payload: Value,
}

/// Criteria a production resource must meet before it may be deleted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupCriteria {
    /// Slug glob patterns; `*` is stripped and the rest matched as a substring.
    #[serde(default)]
    pub slug_patterns: Vec<String>,
    /// Description substrings marking test resources.
    #[serde(default)]
    pub description_markers: Vec<String>,
}

impl TestData {
    /// Returns the data file path for an environment.
    #[must_use]
    pub fn path_for(dir: &Path, environment: TestEnvironment) -> PathBuf {
        dir.join(format!("test-data-{}.yaml", environment.as_str()))
    }

    /// Loads and validates `test-data-<env>.yaml` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError`] when the file is unreadable, malformed, or
    /// lacks templates the fixtures depend on.
    pub fn load(dir: &Path, environment: TestEnvironment) -> Result<Self, TestDataError> {
        let path = Self::path_for(dir, environment);
        let raw = fs::read_to_string(&path)
            .map_err(|err| TestDataError::Io(format!("{}: {err}", path.display())))?;
        let data = Self::parse(&raw)
            .map_err(|err| TestDataError::Parse(format!("{}: {err}", path.display())))?;
        data.validate(environment)?;
        Ok(data)
    }

    /// Parses test data YAML without environment validation.
    ///
    /// # Errors
    ///
    /// Returns the YAML error message when parsing fails.
    pub fn parse(raw: &str) -> Result<Self, String> {
        serde_yaml::from_str(raw).map_err(|err| err.to_string())
    }

    /// Checks that every template group fixtures draw from is populated.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError::Missing`] naming the first absent template.
    pub fn validate(&self, environment: TestEnvironment) -> Result<(), TestDataError> {
        let groups = [
            ("access_rules.password_protected", self.access_rules.password_protected.is_empty()),
            ("access_rules.email_list", self.access_rules.email_list.is_empty()),
            ("access_rules.open_access", self.access_rules.open_access.is_empty()),
        ];
        if let Some((name, _)) = groups.iter().find(|(_, empty)| *empty) {
            return Err(TestDataError::Missing((*name).to_string()));
        }
        if environment.is_production() && self.cleanup_criteria.is_none() {
            return Err(TestDataError::Missing("cleanup_criteria (required in prod)".to_string()));
        }
        Ok(())
    }

    /// Returns a named access-control update.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError::Missing`] when no update has that name.
    pub fn update(&self, name: &str) -> Result<&NamedPayload, TestDataError> {
        self.access_control_api
            .updates
            .iter()
            .find(|update| update.name == name)
            .ok_or_else(|| TestDataError::Missing(format!("access_control_api.updates.{name}")))
    }

    /// Returns a named invalid payload.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError::Missing`] when no payload has that name.
    pub fn invalid(&self, name: &str) -> Result<&InvalidPayload, TestDataError> {
        self.access_control_api
            .invalid_data
            .iter()
            .find(|payload| payload.name == name)
            .ok_or_else(|| TestDataError::Missing(format!("access_control_api.invalid_data.{name}")))
    }

    /// Returns a named webhook payload.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError::Missing`] when no payload has that name.
    pub fn webhook_payload(&self, name: &str) -> Result<&Value, TestDataError> {
        self.content_sync
            .webhook_payloads
            .iter()
            .find(|payload| payload.name == name)
            .map(|payload| &payload.payload)
            .ok_or_else(|| TestDataError::Missing(format!("content_sync.webhook_payloads.{name}")))
    }
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Whether a scenario changes backend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Only reads backend state.
    Readonly,
    /// Creates, updates, or deletes backend data.
    Mutating,
}

impl ScenarioKind {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Readonly => "readonly",
            Self::Mutating => "mutating",
        }
    }
}

/// A named end-to-end scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name (snake case).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Read-only or mutating.
    pub kind: ScenarioKind,
    /// Suite binary that covers the scenario.
    pub suite: String,
    /// Ordered step descriptions.
    #[serde(default)]
    pub steps: Vec<String>,
}

/// Contents of `test-scenarios.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenarios {
    /// All scenarios in file order.
    pub scenarios: Vec<Scenario>,
}

impl Scenarios {
    /// File name of the scenario catalog.
    pub const FILE_NAME: &'static str = "test-scenarios.yaml";

    /// Loads `test-scenarios.yaml` from `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError`] when the file is unreadable or malformed.
    pub fn load(dir: &Path) -> Result<Self, TestDataError> {
        let path = dir.join(Self::FILE_NAME);
        let raw = fs::read_to_string(&path)
            .map_err(|err| TestDataError::Io(format!("{}: {err}", path.display())))?;
        serde_yaml::from_str(&raw)
            .map_err(|err| TestDataError::Parse(format!("{}: {err}", path.display())))
    }

    /// Returns scenarios of one kind.
    pub fn of_kind(&self, kind: ScenarioKind) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter().filter(move |scenario| scenario.kind == kind)
    }

    /// Looks up a scenario by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|scenario| scenario.name == name)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
