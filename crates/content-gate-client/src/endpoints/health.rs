// crates/content-gate-client/src/endpoints/health.rs
// ============================================================================
// Module: Health Endpoint
// Description: Liveness probe wrapper.
// Dependencies: content-gate-client
// ============================================================================

//! Health endpoint.

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::response::ApiResponse;

impl ApiClient {
    /// `GET /health`
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport failures.
    pub async fn health_check(&self) -> Result<ApiResponse, ClientError> {
        self.get(&["health"], &[]).await
    }
}
