// api-tests/src/client/http.rs
// ============================================================================
// Module: API HTTP Client
// Description: HTTP client for the services under test with transcripts.
// Purpose: Send authenticated requests, retry transient failures, and record
//          every exchange.
// Dependencies: reqwest, serde, serde_jcs, tokio, tracing, url
// ============================================================================

//! ## Overview
//! [`ApiClient`] is bound to one service base URL and a set of
//! [`Credential`]s. Requests return an [`ApiResponse`] for any HTTP status;
//! only transport failures are errors. Connect failures are retried for
//! every method with linear backoff. Timeouts and connection resets are
//! retried only for idempotent methods, so a POST is never sent twice.
//! HTTP statuses are never retried. Every attempt, including failed sends,
//! is appended to a shared [`Transcript`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;
use tracing::debug;
use tracing::warn;
use url::Url;

use super::auth::Credential;
use super::response::ApiResponse;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Request timeout used when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum attempts for transient send failures.
pub(crate) const MAX_SEND_ATTEMPTS: u32 = 3;
/// Base backoff delay between send attempts.
const BASE_RETRY_DELAY_MS: u64 = 50;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Transport-level client failures.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The underlying HTTP client could not be built.
    #[error("api client build failed: {0}")]
    Build(String),
    /// A base URL or joined request URL is invalid.
    #[error("invalid request url {url}: {message}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Parser message.
        message: String,
    },
    /// A JSON body could not be serialized.
    #[error("request body for {url} could not be serialized: {message}")]
    Body {
        /// Request URL.
        url: String,
        /// Serializer message.
        message: String,
    },
    /// The request could not be sent.
    #[error("{method} {url} failed after {attempts} attempt(s): {message}")]
    Send {
        /// Request method.
        method: String,
        /// Request URL.
        url: String,
        /// Attempts made.
        attempts: u32,
        /// Last transport error.
        message: String,
    },
    /// The response body could not be read.
    #[error("{method} {url}: reading response failed: {message}")]
    Read {
        /// Request method.
        method: String,
        /// Request URL.
        url: String,
        /// Transport error.
        message: String,
    },
    /// The transcript could not be written.
    #[error("transcript write failed: {0}")]
    Transcript(String),
}

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based position in the transcript.
    pub sequence: u64,
    /// Request method.
    pub method: String,
    /// Absolute request URL.
    pub url: String,
    /// Response status; `None` when no response arrived.
    pub status: Option<u16>,
    /// Request body; raw bodies are recorded as strings.
    pub request: Value,
    /// Response body; non-JSON bodies are recorded as strings.
    pub response: Value,
    /// Transport error, if any.
    pub error: Option<String>,
}

/// Shared, append-only list of exchanges. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Recorded entries.
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl Transcript {
    /// Creates an empty transcript.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the entries.
    #[must_use]
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    /// Returns true when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends an entry, assigning the next sequence number.
    fn record(
        &self,
        method: &Method,
        url: &str,
        status: Option<u16>,
        request: Value,
        response: Value,
        error: Option<String>,
    ) {
        let Ok(mut guard) = self.entries.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            method: method.as_str().to_string(),
            url: url.to_string(),
            status,
            request,
            response,
            error,
        });
    }

    /// Writes the entries as canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Transcript`] when serialization or the
    /// write fails.
    pub fn write_json(&self, path: &Path) -> Result<(), ApiClientError> {
        let bytes = serde_jcs::to_vec(&self.entries())
            .map_err(|err| ApiClientError::Transcript(err.to_string()))?;
        std::fs::write(path, bytes)
            .map_err(|err| ApiClientError::Transcript(format!("{}: {err}", path.display())))
    }
}

// ============================================================================
// SECTION: Request Bodies
// ============================================================================

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body.
    Empty,
    /// Serialized JSON value.
    Json(Value),
    /// Raw text sent as `application/json`, used for malformed payloads.
    Raw(String),
}

impl RequestBody {
    /// Returns the value recorded in the transcript.
    fn transcript_value(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value.clone(),
            Self::Raw(raw) => Value::String(raw.clone()),
        }
    }
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client bound to one service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Pooled HTTP client.
    client: Client,
    /// Credentials sent with every request, at most one per header.
    credentials: Vec<Credential>,
    /// Exchange log.
    transcript: Transcript,
}

impl ApiClient {
    /// Creates a client with a request timeout and no credentials.
    ///
    /// # Errors
    ///
    /// Returns an error when `base_url` is not an absolute URL or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        Url::parse(base_url).map_err(|err| ApiClientError::InvalidUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiClientError::Build(err.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials: Vec::new(),
            transcript: Transcript::new(),
        })
    }

    /// Adds a credential, replacing any credential sent in the same header.
    #[must_use]
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credentials.retain(|existing| !existing.same_header(&credential));
        self.credentials.push(credential);
        self
    }

    /// Removes every credential.
    #[must_use]
    pub fn without_credentials(mut self) -> Self {
        self.credentials.clear();
        self
    }

    /// Records exchanges into a shared transcript.
    #[must_use]
    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = transcript;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the attached credentials.
    #[must_use]
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Returns the transcript handle.
    #[must_use]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Joins a path onto the base URL; the leading `/` is optional.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// Sends `GET`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent.
    pub async fn get(&self, path: &str) -> Result<ApiResponse, ApiClientError> {
        self.request(Method::GET, path, RequestBody::Empty).await
    }

    /// Sends `DELETE`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent.
    pub async fn delete(&self, path: &str) -> Result<ApiResponse, ApiClientError> {
        self.request(Method::DELETE, path, RequestBody::Empty).await
    }

    /// Sends `POST` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error when the body does not serialize or the request
    /// cannot be sent.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ApiClientError> {
        let body = self.json_body(path, body)?;
        self.request(Method::POST, path, body).await
    }

    /// Sends `PUT` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error when the body does not serialize or the request
    /// cannot be sent.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<ApiResponse, ApiClientError> {
        let body = self.json_body(path, body)?;
        self.request(Method::PUT, path, body).await
    }

    /// Sends `POST` with a raw body.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent.
    pub async fn post_raw(
        &self,
        path: &str,
        body: impl Into<String>,
    ) -> Result<ApiResponse, ApiClientError> {
        self.request(Method::POST, path, RequestBody::Raw(body.into())).await
    }

    /// Sends `PUT` with a raw body.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be sent.
    pub async fn put_raw(
        &self,
        path: &str,
        body: impl Into<String>,
    ) -> Result<ApiResponse, ApiClientError> {
        self.request(Method::PUT, path, RequestBody::Raw(body.into())).await
    }

    /// Serializes a JSON body.
    fn json_body<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<RequestBody, ApiClientError> {
        serde_json::to_value(body).map(RequestBody::Json).map_err(|err| ApiClientError::Body {
            url: self.url_for(path),
            message: err.to_string(),
        })
    }

    /// Sends a request, retrying transient send failures.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid, every attempt fails to
    /// send, or the response body cannot be read.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<ApiResponse, ApiClientError> {
        let url = self.url_for(path);
        Url::parse(&url).map_err(|err| ApiClientError::InvalidUrl {
            url: url.clone(),
            message: err.to_string(),
        })?;
        let request_value = body.transcript_value();
        let mut attempt = 0u32;
        loop {
            attempt = attempt.saturating_add(1);
            let mut builder = self.client.request(method.clone(), &url);
            for credential in &self.credentials {
                builder = credential.apply(builder);
            }
            builder = match &body {
                RequestBody::Empty => builder,
                RequestBody::Json(value) => builder.json(value),
                RequestBody::Raw(raw) => {
                    builder.header(CONTENT_TYPE, "application/json").body(raw.clone())
                }
            };
            let response = match builder.send().await {
                Ok(response) => response,
                Err(err) if should_retry_send(&err, &method, attempt) => {
                    warn!(method = %method, url = %url, attempt, error = %err, "retrying request");
                    self.transcript.record(
                        &method,
                        &url,
                        None,
                        request_value.clone(),
                        Value::Null,
                        Some(err.to_string()),
                    );
                    sleep(retry_delay_for_attempt(attempt)).await;
                    continue;
                }
                Err(err) => {
                    let message = err.to_string();
                    self.transcript.record(
                        &method,
                        &url,
                        None,
                        request_value,
                        Value::Null,
                        Some(message.clone()),
                    );
                    return Err(ApiClientError::Send {
                        method: method.to_string(),
                        url,
                        attempts: attempt,
                        message,
                    });
                }
            };
            let status = response.status().as_u16();
            let text = match response.text().await {
                Ok(text) => text,
                Err(err) => {
                    let message = err.to_string();
                    self.transcript.record(
                        &method,
                        &url,
                        Some(status),
                        request_value,
                        Value::Null,
                        Some(message.clone()),
                    );
                    return Err(ApiClientError::Read {
                        method: method.to_string(),
                        url,
                        message,
                    });
                }
            };
            debug!(method = %method, url = %url, status, "api request");
            let api_response = ApiResponse::new(method.as_str(), &url, status, text);
            self.transcript.record(
                &method,
                &url,
                Some(status),
                request_value,
                api_response.body_value(),
                None,
            );
            return Ok(api_response);
        }
    }
}

// ============================================================================
// SECTION: Retry Policy
// ============================================================================

/// Returns true when a send failure should be retried.
///
/// A failed connect never reached the service, so it is retried for any
/// method. Timeouts and resets may follow a request the service already
/// handled; those are retried only when `method` is idempotent.
pub(crate) fn should_retry_send(err: &reqwest::Error, method: &Method, attempt: u32) -> bool {
    if attempt >= MAX_SEND_ATTEMPTS {
        return false;
    }
    let msg = err.to_string().to_ascii_lowercase();
    if err.is_connect() || msg.contains("connection refused") {
        return true;
    }
    if !method.is_idempotent() {
        return false;
    }
    if err.is_timeout() {
        return true;
    }
    if !err.is_request() {
        return false;
    }
    msg.contains("connection reset")
        || msg.contains("connection closed")
        || msg.contains("broken pipe")
        || msg.contains("connection aborted")
        || msg.contains("timed out")
}

/// Returns bounded linear backoff for send retries.
pub(crate) fn retry_delay_for_attempt(attempt: u32) -> Duration {
    Duration::from_millis(u64::from(attempt).saturating_mul(BASE_RETRY_DELAY_MS))
}
