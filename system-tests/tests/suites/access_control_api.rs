// system-tests/tests/suites/access_control_api.rs
// ============================================================================
// Module: Access Control API Suite
// Description: Rule CRUD, validation, and logs through the access-control API.
// Purpose: Validate the admin-facing rule API against named test payloads.
// Dependencies: content-gate-client, system-tests helpers
// ============================================================================

//! Access-control API data validation.

use content_gate_client::AccessMode;
use helpers::checks::ensure;
use helpers::checks::expect_error;
use helpers::checks::expect_fields;
use helpers::checks::expect_status;
use helpers::checks::expect_str;
use helpers::context::TestContext;
use helpers::context::TestResult;
use helpers::context::run_test;
use serde_json::Value;
use serde_json::json;
use system_tests::validation::FieldExpectation;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn rule_crud_lifecycle() -> TestResult {
    run_test("rule_crud_lifecycle", async |ctx: &mut TestContext| {
        if !ctx.require_mutation() {
            return Ok(());
        }
        let rule = ctx.fixtures().access_control_password_rule();
        let created = ctx.client().create_access_control_rule(&rule).await?;
        ctx.track_rule(&rule);
        expect_status(&created, &[200, 201])?;
        expect_str(&created.body, "slug", &rule.slug)?;

        let fetched = ctx.client().get_access_control_rule(&rule.content_type, &rule.slug).await?;
        expect_status(&fetched, &[200])?;
        expect_str(&fetched.body, "accessMode", "password")?;

        let update = ctx.data().update("update_description")?.data.clone();
        let updated =
            ctx.client().update_access_control_rule(&rule.content_type, &rule.slug, &update).await?;
        expect_status(&updated, &[200])?;
        expect_str(&updated.body, "description", "Updated test rule")?;

        let deleted =
            ctx.client().delete_access_control_rule(&rule.content_type, &rule.slug, &json!({})).await?;
        expect_status(&deleted, &[200, 204])?;
        let missing = ctx.client().get_access_control_rule(&rule.content_type, &rule.slug).await?;
        expect_error(&missing, 404, "not found")
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn rules_can_be_created_for_every_mode() -> TestResult {
    run_test("rules_can_be_created_for_every_mode", async |ctx: &mut TestContext| {
        if !ctx.require_mutation() {
            return Ok(());
        }
        for mode in AccessMode::ALL {
            let rule = ctx.fixtures().access_control_rule_by_mode(mode);
            let response = ctx.client().create_access_control_rule(&rule).await?;
            ctx.track_rule(&rule);
            expect_status(&response, &[200, 201])?;
            expect_str(&response.body, "accessMode", mode.as_str())?;
        }
        Ok(())
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn password_rule_stores_password_hash() -> TestResult {
    run_test("password_rule_stores_password_hash", async |ctx: &mut TestContext| {
        if !ctx.require_mutation() {
            return Ok(());
        }
        let rule = ctx.fixtures().access_control_password_rule();
        let created = ctx.client().create_access_control_rule(&rule).await?;
        ctx.track_rule(&rule);
        expect_status(&created, &[200, 201])?;
        let fetched = ctx.client().get_access_control_rule(&rule.content_type, &rule.slug).await?;
        expect_fields(&fetched.body, &[("passwordHash", FieldExpectation::String)])
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn password_rule_unlocks_with_template_password() -> TestResult {
    run_test("password_rule_unlocks_with_template_password", async |ctx: &mut TestContext| {
        if !ctx.require_mutation() {
            return Ok(());
        }
        let rule = ctx.fixtures().access_control_password_rule();
        let created = ctx.client().create_access_control_rule(&rule).await?;
        ctx.track_rule(&rule);
        expect_status(&created, &[200, 201])?;
        let password = ctx
            .data()
            .access_control_api
            .rules
            .password_rule
            .password
            .clone()
            .ok_or("password template should carry a password")?;
        let verified = ctx.client().verify_password(&rule.content_type, &rule.slug, &password).await?;
        expect_status(&verified, &[200])?;
        ensure(verified.bool_field("success") == Some(true), "template password should unlock the rule")
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn email_rule_stores_nonempty_allowlist() -> TestResult {
    run_test("email_rule_stores_nonempty_allowlist", async |ctx: &mut TestContext| {
        if !ctx.require_mutation() {
            return Ok(());
        }
        let rule = ctx.fixtures().access_control_email_rule();
        let created = ctx.client().create_access_control_rule(&rule).await?;
        ctx.track_rule(&rule);
        expect_status(&created, &[200, 201])?;
        let fetched = ctx.client().get_access_control_rule(&rule.content_type, &rule.slug).await?;
        let emails = fetched.field("allowedEmails").and_then(Value::as_array).map_or(0, Vec::len);
        ensure(emails > 0, "email-list rule should keep its allowlist")
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn named_updates_apply() -> TestResult {
    run_test("named_updates_apply", async |ctx: &mut TestContext| {
        if !ctx.require_mutation() {
            return Ok(());
        }
        let rule = ctx.fixtures().access_control_email_rule();
        let created = ctx.client().create_access_control_rule(&rule).await?;
        ctx.track_rule(&rule);
        expect_status(&created, &[200, 201])?;

        let replace = ctx.data().update("replace_allowlist")?.data.clone();
        let replaced =
            ctx.client().update_access_control_rule(&rule.content_type, &rule.slug, &replace).await?;
        expect_status(&replaced, &[200])?;
        ensure(
            replaced.field("allowedEmails") == replace.get("allowedEmails"),
            "allowlist should be replaced",
        )?;

        let open = ctx.data().update("change_to_open")?.data.clone();
        let opened = ctx.client().update_access_control_rule(&rule.content_type, &rule.slug, &open).await?;
        expect_status(&opened, &[200])?;
        expect_str(&opened.body, "accessMode", "open")
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn list_rules_has_rules_and_count() -> TestResult {
    run_test("list_rules_has_rules_and_count", async |ctx: &mut TestContext| {
        let response = ctx.client().get_access_control_rules().await?;
        expect_status(&response, &[200])?;
        expect_fields(&response.body, &[("rules", FieldExpectation::List), ("count", FieldExpectation::Int)])
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn logs_are_paginated() -> TestResult {
    run_test("logs_are_paginated", async |ctx: &mut TestContext| {
        let response = ctx.client().get_access_control_logs(Some(1), Some(5)).await?;
        expect_status(&response, &[200])?;
        expect_fields(&response.body, &[("logs", FieldExpectation::List), ("pagination", FieldExpectation::Dict)])?;
        let pagination = response.field("pagination").ok_or("missing pagination")?;
        expect_fields(
            pagination,
            &[
                ("page", FieldExpectation::Equals(json!(1))),
                ("limit", FieldExpectation::Equals(json!(5))),
                ("total", FieldExpectation::Int),
                ("totalPages", FieldExpectation::Int),
                ("hasNext", FieldExpectation::Bool),
                ("hasPrev", FieldExpectation::Equals(json!(false))),
            ],
        )?;
        let entries = response.field("logs").and_then(Value::as_array).map_or(0, Vec::len);
        ensure(entries <= 5, "page should not exceed the requested limit")
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_payloads_are_rejected() -> TestResult {
    run_test("invalid_payloads_are_rejected", async |ctx: &mut TestContext| {
        let payloads = ctx.fixtures().access_control_invalid_data().to_vec();
        ensure(!payloads.is_empty(), "test data should define invalid payloads")?;
        for payload in &payloads {
            let response = ctx.client().create_access_control_rule(&payload.data).await?;
            expect_error(&response, 400, &payload.expected_error)
                .map_err(|err| format!("{}: {err}", payload.name))?;
        }
        Ok(())
    })
    .await
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_rules_return_not_found() -> TestResult {
    run_test("missing_rules_return_not_found", async |ctx: &mut TestContext| {
        let slug = "nonexistent-rule-12345";
        let fetched = ctx.client().get_access_control_rule("notes", slug).await?;
        expect_error(&fetched, 404, "not found")?;
        let update = json!({ "description": "never stored" });
        let updated = ctx.client().update_access_control_rule("notes", slug, &update).await?;
        expect_error(&updated, 404, "not found")?;
        let deleted = ctx.client().delete_access_control_rule("notes", slug, &json!({})).await?;
        expect_error(&deleted, 404, "not found")
    })
    .await
}
