// crates/content-gate-client/src/endpoints/auth.rs
// ============================================================================
// Module: Visitor Auth Endpoints
// Description: Verification, access checks, and protected content retrieval.
// Purpose: Wrap the public `/auth/*` routes used by site visitors.
// Dependencies: reqwest, serde_json
// ============================================================================

//! Public authentication endpoints.

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde_json::json;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::response::ApiResponse;

impl ApiClient {
    /// `POST /auth/verify` with a password.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn verify_password(
        &self,
        content_type: &str,
        slug: &str,
        password: &str,
    ) -> Result<ApiResponse, ClientError> {
        let body = json!({ "type": content_type, "slug": slug, "password": password });
        self.send_json(Method::POST, &["auth", "verify"], &body).await
    }

    /// `POST /auth/verify` with an email address.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn verify_email(
        &self,
        content_type: &str,
        slug: &str,
        email: &str,
    ) -> Result<ApiResponse, ClientError> {
        let body = json!({ "type": content_type, "slug": slug, "email": email });
        self.send_json(Method::POST, &["auth", "verify"], &body).await
    }

    /// `POST /auth/verify` for open-access content.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn verify_open_access(
        &self,
        content_type: &str,
        slug: &str,
    ) -> Result<ApiResponse, ClientError> {
        let body = json!({ "type": content_type, "slug": slug });
        self.send_json(Method::POST, &["auth", "verify"], &body).await
    }

    /// `GET /auth/access/:type/:slug`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn check_access(
        &self,
        content_type: &str,
        slug: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.get(&["auth", "access", content_type, slug], &[]).await
    }

    /// `GET /auth/content/:type/:slug` with `Authorization: Bearer <token>`.
    ///
    /// The header is sent even for an empty token so the backend's handling
    /// of blank credentials is exercised.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures or an unencodable token.
    pub async fn get_protected_content(
        &self,
        content_type: &str,
        slug: &str,
        token: &str,
    ) -> Result<ApiResponse, ClientError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ClientError::Config("invalid bearer token header".to_string()))?;
        headers.insert(AUTHORIZATION, value);
        self.request(Method::GET, &["auth", "content", content_type, slug], &[], None, headers)
            .await
    }
}
