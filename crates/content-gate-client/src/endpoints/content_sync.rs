// crates/content-gate-client/src/endpoints/content_sync.rs
// ============================================================================
// Module: Content Sync Endpoints
// Description: Signed GitHub webhook, manual sync, and bucket status.
// Purpose: Wrap the `/api/content-sync/*` routes.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! The webhook route is authenticated by an HMAC signature header rather than
//! the API key. The payload travels as a JSON value so the pipeline encodes it
//! with the same compact serializer [`crate::sign_webhook_payload`] signs.

use reqwest::Method;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use serde::Serialize;
use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::response::ApiResponse;
use crate::signature::SIGNATURE_HEADER;

/// Path segment for content sync routes.
const CONTENT_SYNC: &str = "content-sync";

impl ApiClient {
    /// `POST /api/content-sync/webhook`, optionally signed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures or an unencodable signature.
    pub async fn content_sync_webhook(
        &self,
        payload: &Value,
        signature: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(signature) = signature {
            let name = HeaderName::from_bytes(SIGNATURE_HEADER.as_bytes())
                .map_err(|_| ClientError::Config("invalid signature header name".to_string()))?;
            let value = HeaderValue::from_str(signature)
                .map_err(|_| ClientError::Config("invalid signature header".to_string()))?;
            headers.insert(name, value);
        }
        self.request(
            Method::POST,
            &["api", CONTENT_SYNC, "webhook"],
            &[],
            Some(payload.clone()),
            headers,
        )
        .await
    }

    /// `POST /api/content-sync/manual`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn content_sync_manual<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::POST, &["api", CONTENT_SYNC, "manual"], body).await
    }

    /// `GET /api/content-sync/status`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn content_sync_status(&self) -> Result<ApiResponse, ClientError> {
        self.get(&["api", CONTENT_SYNC, "status"], &[]).await
    }
}
