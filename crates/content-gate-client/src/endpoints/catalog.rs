// crates/content-gate-client/src/endpoints/catalog.rs
// ============================================================================
// Module: Content Catalog Endpoints
// Description: Catalog listing used by the static site build.
// Dependencies: content-gate-client
// ============================================================================

//! Content catalog endpoints.

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::response::ApiResponse;

impl ApiClient {
    /// `GET /api/content-catalog`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_content_catalog(&self) -> Result<ApiResponse, ClientError> {
        self.get(&["api", "content-catalog"], &[]).await
    }

    /// `GET /api/content-catalog/:type`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn get_content_catalog_by_type(
        &self,
        content_type: &str,
    ) -> Result<ApiResponse, ClientError> {
        self.get(&["api", "content-catalog", content_type], &[]).await
    }
}
