// crates/content-gate-client/src/endpoints/access_rules.rs
// ============================================================================
// Module: Internal Admin Endpoints
// Description: Access-rule CRUD, email allowlists, access logs, and stats.
// Purpose: Wrap the API-key protected `/api/internal/*` routes.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! Internal admin endpoints for access rules and their logs.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::response::ApiResponse;
use crate::types::LogQuery;
use crate::types::StatsQuery;

/// Path segment for internal routes.
const INTERNAL: &str = "internal";
/// Path segment for the access-rule collection.
const ACCESS_RULES: &str = "access-rules";

impl ApiClient {
    /// `POST /api/internal/access-rules`
    ///
    /// Accepts a typed [`crate::AccessRuleRequest`] or raw JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn create_access_rule<T: Serialize + ?Sized>(
        &self,
        rule: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::POST, &["api", INTERNAL, ACCESS_RULES], rule).await
    }

    /// `GET /api/internal/access-rules?type=&mode=`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_access_rules(
        &self,
        content_type: Option<&str>,
        access_mode: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let mut query = Vec::new();
        if let Some(content_type) = content_type.filter(|value| !value.is_empty()) {
            query.push(("type", content_type.to_string()));
        }
        if let Some(mode) = access_mode.filter(|value| !value.is_empty()) {
            query.push(("mode", mode.to_string()));
        }
        self.get(&["api", INTERNAL, ACCESS_RULES], &query).await
    }

    /// `GET /api/internal/access-rules/:type/:slug`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_access_rule(
        &self,
        content_type: &str,
        slug: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.get(&["api", INTERNAL, ACCESS_RULES, content_type, slug], &[]).await
    }

    /// `PUT /api/internal/access-rules/:type/:slug`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn update_access_rule<T: Serialize + ?Sized>(
        &self,
        content_type: &str,
        slug: &str,
        update: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::PUT, &["api", INTERNAL, ACCESS_RULES, content_type, slug], update)
            .await
    }

    /// `DELETE /api/internal/access-rules/:type/:slug`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn delete_access_rule(
        &self,
        content_type: &str,
        slug: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.delete(&["api", INTERNAL, ACCESS_RULES, content_type, slug]).await
    }

    /// `POST /api/internal/access-rules/:type/:slug/emails`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn add_email_to_allowlist(
        &self,
        content_type: &str,
        slug: &str,
        email: &str,
    ) -> Result<ApiResponse, ClientError> {
        let body = json!({ "email": email });
        self.send_json(
            Method::POST,
            &["api", INTERNAL, ACCESS_RULES, content_type, slug, "emails"],
            &body,
        )
        .await
    }

    /// `DELETE /api/internal/access-rules/:type/:slug/emails/:email`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn remove_email_from_allowlist(
        &self,
        content_type: &str,
        slug: &str,
        email: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.delete(&["api", INTERNAL, ACCESS_RULES, content_type, slug, "emails", email]).await
    }

    /// `GET /api/internal/logs` with optional filters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_logs(&self, query: &LogQuery) -> Result<ApiResponse, ClientError> {
        self.get(&["api", INTERNAL, "logs"], &query.pairs()).await
    }

    /// `GET /api/internal/stats` with an optional date range.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_stats(&self, query: &StatsQuery) -> Result<ApiResponse, ClientError> {
        self.get(&["api", INTERNAL, "stats"], &query.pairs()).await
    }
}
