// crates/content-gate-client/src/endpoints/access_control.rs
// ============================================================================
// Module: Access Control Endpoints
// Description: Admin rule management and paginated access logs.
// Purpose: Wrap the API-key protected `/api/access-control/*` routes.
// Dependencies: reqwest, serde
// ============================================================================

//! Access-control admin endpoints.

use reqwest::Method;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::response::ApiResponse;

/// Path segment for access-control routes.
const ACCESS_CONTROL: &str = "access-control";

impl ApiClient {
    /// `POST /api/access-control/rules`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn create_access_control_rule<T: Serialize + ?Sized>(
        &self,
        rule: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::POST, &["api", ACCESS_CONTROL, "rules"], rule).await
    }

    /// `GET /api/access-control/rules`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_access_control_rules(&self) -> Result<ApiResponse, ClientError> {
        self.get(&["api", ACCESS_CONTROL, "rules"], &[]).await
    }

    /// `GET /api/access-control/rules/:type/:slug`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_access_control_rule(
        &self,
        content_type: &str,
        slug: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.get(&["api", ACCESS_CONTROL, "rules", content_type, slug], &[]).await
    }

    /// `PUT /api/access-control/rules/:type/:slug`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn update_access_control_rule<T: Serialize + ?Sized>(
        &self,
        content_type: &str,
        slug: &str,
        update: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::PUT, &["api", ACCESS_CONTROL, "rules", content_type, slug], update)
            .await
    }

    /// `DELETE /api/access-control/rules/:type/:slug` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn delete_access_control_rule<T: Serialize + ?Sized>(
        &self,
        content_type: &str,
        slug: &str,
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::DELETE, &["api", ACCESS_CONTROL, "rules", content_type, slug], body)
            .await
    }

    /// `GET /api/access-control/logs?page=&limit=`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_access_control_logs(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<ApiResponse, ClientError> {
        let mut query = Vec::new();
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get(&["api", ACCESS_CONTROL, "logs"], &query).await
    }
}
