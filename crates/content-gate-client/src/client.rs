// crates/content-gate-client/src/client.rs
// ============================================================================
// Module: API Client
// Description: Shared HTTP pipeline for Content Gate API requests.
// Purpose: Build URLs, attach credentials, retry transient sends, capture transcripts.
// Dependencies: reqwest, serde_json, tokio, tracing, url
// ============================================================================

//! ## Overview
//! [`ApiClient`] owns one `reqwest` client and issues every endpoint call
//! through [`ApiClient::request`]. Endpoint wrappers live in
//! [`crate::endpoints`]; this module only handles the transport concerns:
//!
//! - base URL joining with percent-encoded path segments,
//! - `X-API-Key` attachment for `/api/*` routes (except the signed webhook),
//! - bounded retries for transient send failures (never for HTTP statuses),
//! - a hard response size limit,
//! - an in-memory transcript of every exchange for test artifacts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;
use url::Url;

use crate::error::ClientError;
use crate::response::ApiResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "API-Test-Client/1.0";
/// Maximum response body size accepted by the client.
pub const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;
/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Header carrying the admin API key.
pub const API_KEY_HEADER: &str = "x-api-key";
/// Webhook route authenticated by signature instead of API key.
pub const WEBHOOK_PATH: &str = "/api/content-sync/webhook";
/// Maximum attempts for transient HTTP send failures.
const MAX_HTTP_SEND_ATTEMPTS: u32 = 3;
/// Base backoff delay for transient HTTP send retries.
const BASE_HTTP_SEND_RETRY_DELAY_MS: u64 = 50;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Backend base URL; a trailing `/` is ignored.
    pub base_url: String,
    /// Admin API key attached to `/api/*` routes.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Builds a configuration with default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sets the admin API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// One recorded request/response exchange.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    /// 1-based sequence number.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Endpoint path including query string.
    pub path: String,
    /// HTTP status when a response was received.
    pub status: Option<u16>,
    /// Request JSON body, if any.
    pub request: Option<Value>,
    /// Decoded response body (`null` on transport failure).
    pub response: Value,
    /// Transport error message, if any.
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Async Content Gate API client with transcript capture.
#[derive(Clone)]
pub struct ApiClient {
    /// Normalized base URL without trailing slash.
    base_url: String,
    /// Admin API key.
    api_key: Option<String>,
    /// Shared reqwest client.
    client: Client,
    /// Exchanges recorded by this client and its clones.
    transcript: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the base URL is invalid or the
    /// HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        let parsed = Url::parse(&base_url)
            .map_err(|err| ClientError::Config(format!("invalid base url {base_url}: {err}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::Config(format!("base url cannot carry paths: {base_url}")));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .user_agent(config.user_agent)
            .build()
            .map_err(|err| ClientError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self {
            base_url,
            api_key: config.api_key,
            client,
            transcript: Arc::new(Mutex::new(Vec::new())),
        })
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true when an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns a clone that sends no API key. Shares the transcript.
    #[must_use]
    pub fn without_api_key(&self) -> Self {
        let mut clone = self.clone();
        clone.api_key = None;
        clone
    }

    /// Returns a snapshot of recorded exchanges.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Clears recorded exchanges.
    pub fn clear_transcript(&self) {
        if let Ok(mut guard) = self.transcript.lock() {
            guard.clear();
        }
    }

    /// Issues a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or size-limit failures.
    pub async fn get(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<ApiResponse, ClientError> {
        self.request(Method::GET, segments, query, None, HeaderMap::new()).await
    }

    /// Issues a DELETE request without a body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on transport or size-limit failures.
    pub async fn delete(&self, segments: &[&str]) -> Result<ApiResponse, ClientError> {
        self.request(Method::DELETE, segments, &[], None, HeaderMap::new()).await
    }

    /// Issues a request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on serialization, transport, or size-limit failures.
    pub async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &T,
    ) -> Result<ApiResponse, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|err| ClientError::Json(format!("request serialization failed: {err}")))?;
        self.request(method, segments, &[], Some(value), HeaderMap::new()).await
    }

    /// Issues a request through the shared pipeline.
    ///
    /// `segments` are percent-encoded path segments appended to the base URL.
    /// A caller-supplied `x-api-key` header is never overridden.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on configuration, transport, or size-limit failures.
    pub async fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&'static str, String)],
        body: Option<Value>,
        mut headers: HeaderMap,
    ) -> Result<ApiResponse, ClientError> {
        let path = endpoint_path(segments);
        let url = self.endpoint_url(segments, query)?;
        let display_path = match url.query() {
            Some(query) => format!("{path}?{query}"),
            None => path.clone(),
        };
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = self.api_key.as_deref()
            && requires_api_key(&path)
            && !headers.contains_key(API_KEY_HEADER)
        {
            let value = HeaderValue::from_str(api_key)
                .map_err(|_| ClientError::Config("invalid api key header".to_string()))?;
            headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
        }
        let bytes = body
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| ClientError::Json(format!("request serialization failed: {err}")))?;

        match self.send_with_retry(&method, &url, &headers, bytes.as_deref()).await {
            Ok(response) => {
                tracing::debug!(
                    method = %method,
                    path = %display_path,
                    status = response.status,
                    "content gate api call"
                );
                self.record(&method, display_path, Some(response.status), body, response.body.clone(), None);
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(method = %method, path = %display_path, error = %err, "content gate api call failed");
                self.record(&method, display_path, None, body, Value::Null, Some(err.to_string()));
                Err(err)
            }
        }
    }

    /// Builds the absolute URL for an endpoint.
    fn endpoint_url(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| ClientError::Config(format!("invalid base url: {err}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ClientError::Config("base url cannot carry paths".to_string()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends a request, retrying transient send failures.
    async fn send_with_retry(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, ClientError> {
        for attempt in 1..=MAX_HTTP_SEND_ATTEMPTS {
            let mut request = self.client.request(method.clone(), url.as_str()).headers(headers.clone());
            if let Some(body) = body {
                request = request.body(body.to_vec());
            }
            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    if should_retry_http_send(&err, attempt) {
                        sleep(retry_delay_for_attempt(attempt)).await;
                        continue;
                    }
                    return Err(ClientError::Transport(format!(
                        "http request failed after {attempt} attempt(s): {err}"
                    )));
                }
            };
            let status = response.status().as_u16();
            let bytes = read_response_body_with_limit(response, MAX_RESPONSE_BYTES).await?;
            return Ok(ApiResponse::from_bytes(status, &bytes));
        }
        Err(ClientError::Transport("http request failed: exhausted retry attempts".to_string()))
    }

    /// Appends an exchange to the transcript.
    fn record(
        &self,
        method: &Method,
        path: String,
        status: Option<u16>,
        request: Option<Value>,
        response: Value,
        error: Option<String>,
    ) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            method: method.to_string(),
            path,
            status,
            request,
            response,
            error,
        });
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders segments as an unencoded `/a/b` path.
fn endpoint_path(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

/// Returns true when the API key applies to `path`.
#[must_use]
pub fn requires_api_key(path: &str) -> bool {
    path.starts_with("/api/") && path != WEBHOOK_PATH
}

/// Reads a response body while enforcing a hard byte limit.
async fn read_response_body_with_limit(
    mut response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, ClientError> {
    let mut body = Vec::new();
    while let Some(chunk) =
        response.chunk().await.map_err(|err| ClientError::Transport(err.to_string()))?
    {
        let next_total = body.len().checked_add(chunk.len()).ok_or(ClientError::ResponseTooLarge {
            actual: usize::MAX,
            limit,
        })?;
        if next_total > limit {
            return Err(ClientError::ResponseTooLarge {
                actual: next_total,
                limit,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Returns true when an HTTP send failure should be retried.
fn should_retry_http_send(err: &reqwest::Error, attempt: u32) -> bool {
    if attempt >= MAX_HTTP_SEND_ATTEMPTS {
        return false;
    }
    if err.is_connect() || err.is_timeout() {
        return true;
    }
    if !err.is_request() {
        return false;
    }
    let msg = err.to_string().to_ascii_lowercase();
    msg.contains("connection reset")
        || msg.contains("connection closed")
        || msg.contains("broken pipe")
        || msg.contains("connection aborted")
        || msg.contains("eof")
}

/// Returns bounded linear backoff for HTTP send retries.
fn retry_delay_for_attempt(attempt: u32) -> Duration {
    Duration::from_millis(u64::from(attempt) * BASE_HTTP_SEND_RETRY_DELAY_MS)
}
