// system-tests/src/fixtures.rs
// ============================================================================
// Module: Fixtures
// Description: Unique slug generation and typed request builders.
// Purpose: Render YAML templates into fresh, collision-free request bodies.
// Dependencies: content-gate-client, hex, sha2
// ============================================================================

//! ## Overview
//! Every builder renders a template's `{timestamp}` placeholder through
//! [`SlugGenerator`], so two fixtures built in the same process never share a
//! slug even within one wall-clock second.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::OnceLock;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use content_gate_client::AccessMode;
use content_gate_client::AccessRuleRequest;
use content_gate_client::ContentFileRequest;
use sha2::Digest;
use sha2::Sha256;

use crate::data::AccessControlRuleTemplate;
use crate::data::InvalidPayload;
use crate::data::NamedPayload;
use crate::data::RuleTemplate;
use crate::data::TestData;
use crate::data::TestDataError;
use crate::data::WebhookPayload;

/// Placeholder replaced in slug templates.
pub const TIMESTAMP_PLACEHOLDER: &str = "{timestamp}";

// ============================================================================
// SECTION: Slug Generation
// ============================================================================

/// Produces unique timestamp tokens for slugs.
///
/// # Invariants
/// - Tokens are unix seconds, suffixed with `-<n>` for the n-th extra token
///   issued within the same second.
/// - A clock that moves backwards reuses the last second and keeps counting.
#[derive(Debug, Default)]
pub struct SlugGenerator {
    /// Last issued second and the number of extra tokens issued in it.
    state: Mutex<Option<(u64, u32)>>,
}

impl SlugGenerator {
    /// Returns the process-wide generator.
    pub fn global() -> &'static Self {
        /// Process-wide slug generator.
        static GENERATOR: OnceLock<SlugGenerator> = OnceLock::new();
        GENERATOR.get_or_init(Self::default)
    }

    /// Returns the next unique timestamp token.
    pub fn next_token(&self) -> String {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        self.token_at(now)
    }

    /// Returns the next token as if the clock read `now_secs`.
    pub fn token_at(&self, now_secs: u64) -> String {
        let mut guard = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let (second, extra) = match *guard {
            Some((last, count)) if now_secs <= last => (last, count.saturating_add(1)),
            _ => (now_secs, 0),
        };
        *guard = Some((second, extra));
        drop(guard);
        if extra == 0 { second.to_string() } else { format!("{second}-{extra}") }
    }

    /// Renders `{timestamp}` in a slug template.
    pub fn render(&self, template: &str) -> String {
        template.replace(TIMESTAMP_PLACEHOLDER, &self.next_token())
    }

    /// Returns a bare `test-<timestamp>` slug.
    pub fn unique_slug(&self) -> String {
        format!("test-{}", self.next_token())
    }
}

/// Returns a bare `test-<timestamp>` slug from the global generator.
#[must_use]
pub fn unique_slug() -> String {
    SlugGenerator::global().unique_slug()
}

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Typed request builders over loaded test data.
#[derive(Debug, Clone)]
pub struct Fixtures {
    /// Loaded templates.
    data: TestData,
}

impl Fixtures {
    /// Wraps loaded test data.
    #[must_use]
    pub const fn new(data: TestData) -> Self {
        Self {
            data,
        }
    }

    /// Returns the underlying test data.
    #[must_use]
    pub const fn data(&self) -> &TestData {
        &self.data
    }

    /// Password rule for the internal API.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError::Missing`] when the template or its password is absent.
    pub fn access_rule_password(&self) -> Result<AccessRuleRequest, TestDataError> {
        let template = first(&self.data.access_rules.password_protected, "password_protected")?;
        let password = template
            .password
            .clone()
            .ok_or_else(|| TestDataError::Missing("access_rules.password_protected.password".into()))?;
        let mut rule = internal_rule(template, AccessMode::Password);
        rule.password = Some(password);
        Ok(rule)
    }

    /// Email-list rule for the internal API.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError::Missing`] when the template or its allowlist is absent.
    pub fn access_rule_email(&self) -> Result<AccessRuleRequest, TestDataError> {
        let template = first(&self.data.access_rules.email_list, "email_list")?;
        let emails = template
            .allowed_emails
            .clone()
            .ok_or_else(|| TestDataError::Missing("access_rules.email_list.allowed_emails".into()))?;
        let mut rule = internal_rule(template, AccessMode::EmailList);
        rule.allowed_emails = Some(emails);
        Ok(rule)
    }

    /// Open rule for the internal API.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError::Missing`] when the template is absent.
    pub fn access_rule_open(&self) -> Result<AccessRuleRequest, TestDataError> {
        let template = first(&self.data.access_rules.open_access, "open_access")?;
        Ok(internal_rule(template, AccessMode::Open))
    }

    /// Access-control API rule for `mode`.
    ///
    /// Password rules submit the SHA-256 hex of the template password as
    /// `passwordHash`, so the plain template password unlocks them.
    #[must_use]
    pub fn access_control_rule_by_mode(&self, mode: AccessMode) -> AccessRuleRequest {
        access_control_rule(self.data.access_control_api.rules.for_mode(mode))
    }

    /// Password rule for the access-control API.
    #[must_use]
    pub fn access_control_password_rule(&self) -> AccessRuleRequest {
        self.access_control_rule_by_mode(AccessMode::Password)
    }

    /// Email-list rule for the access-control API.
    #[must_use]
    pub fn access_control_email_rule(&self) -> AccessRuleRequest {
        self.access_control_rule_by_mode(AccessMode::EmailList)
    }

    /// Open rule for the access-control API.
    #[must_use]
    pub fn access_control_open_rule(&self) -> AccessRuleRequest {
        self.access_control_rule_by_mode(AccessMode::Open)
    }

    /// Named partial updates for the access-control API.
    #[must_use]
    pub fn access_control_updates(&self) -> &[NamedPayload] {
        &self.data.access_control_api.updates
    }

    /// Named invalid payloads for the access-control API.
    #[must_use]
    pub fn access_control_invalid_data(&self) -> &[InvalidPayload] {
        &self.data.access_control_api.invalid_data
    }

    /// Content file creation request.
    ///
    /// # Errors
    ///
    /// Returns [`TestDataError::Missing`] when no content template exists.
    pub fn content_file(&self) -> Result<ContentFileRequest, TestDataError> {
        let template = self
            .data
            .content_management
            .files
            .first()
            .ok_or_else(|| TestDataError::Missing("content_management.files".into()))?;
        Ok(ContentFileRequest {
            content_type: template.content_type.clone(),
            slug: SlugGenerator::global().render(&template.slug_template),
            markdown: template.markdown.clone(),
            frontmatter: template.frontmatter.clone(),
            commit_message: template.commit_message.clone(),
        })
    }

    /// Named webhook payloads.
    #[must_use]
    pub fn webhook_payloads(&self) -> &[WebhookPayload] {
        &self.data.content_sync.webhook_payloads
    }
}

/// Returns the lowercase SHA-256 hex digest stored as `passwordHash`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Returns the first template in `group` or a missing-data error.
fn first<'a>(templates: &'a [RuleTemplate], group: &str) -> Result<&'a RuleTemplate, TestDataError> {
    templates.first().ok_or_else(|| TestDataError::Missing(format!("access_rules.{group}")))
}

/// Builds an internal-API rule from a template.
fn internal_rule(template: &RuleTemplate, mode: AccessMode) -> AccessRuleRequest {
    let mut rule = AccessRuleRequest::new(
        template.content_type.clone(),
        SlugGenerator::global().render(&template.slug_template),
        mode,
    );
    rule.description = Some(template.description.clone());
    rule
}

/// Builds an access-control API rule from a template.
fn access_control_rule(template: &AccessControlRuleTemplate) -> AccessRuleRequest {
    let mut rule = AccessRuleRequest::new(
        template.content_type.clone(),
        SlugGenerator::global().render(&template.slug_template),
        template.access_mode,
    );
    rule.description = Some(template.description.clone());
    match template.access_mode {
        AccessMode::Password => rule.password_hash = template.password.as_deref().map(hash_password),
        AccessMode::EmailList => rule.allowed_emails.clone_from(&template.allowed_emails),
        AccessMode::Open => {}
    }
    rule
}

// ============================================================================
// SECTION: Tests
// ============================================================================
