// crates/content-gate-client/src/endpoints/content.rs
// ============================================================================
// Module: Content Management Endpoints
// Description: Markdown content files stored in the backing repository.
// Purpose: Wrap the API-key protected `/api/content/*` routes.
// Dependencies: reqwest, serde
// ============================================================================

//! Content file management endpoints.

use reqwest::Method;
use serde::Serialize;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::response::ApiResponse;

impl ApiClient {
    /// `GET /api/content/types`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_content_types(&self) -> Result<ApiResponse, ClientError> {
        self.get(&["api", "content", "types"], &[]).await
    }

    /// `GET /api/content/:type`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn list_content_by_type(
        &self,
        content_type: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.get(&["api", "content", content_type], &[]).await
    }

    /// `GET /api/content/:type/:slug`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_content_file(
        &self,
        content_type: &str,
        slug: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.get(&["api", "content", content_type, slug], &[]).await
    }

    /// `POST /api/content`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn create_content_file<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::POST, &["api", "content"], body).await
    }

    /// `PUT /api/content/:type/:slug`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn update_content_file<T: Serialize + ?Sized>(
        &self,
        content_type: &str,
        slug: &str,
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::PUT, &["api", "content", content_type, slug], body).await
    }

    /// `DELETE /api/content/:type/:slug` with a JSON body carrying the blob SHA.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization or transport failures.
    pub async fn delete_content_file<T: Serialize + ?Sized>(
        &self,
        content_type: &str,
        slug: &str,
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        self.send_json(Method::DELETE, &["api", "content", content_type, slug], body).await
    }
}
