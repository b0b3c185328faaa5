//! HTTP transport seam.
//!
//! The API client never talks to the network directly; it hands requests to
//! an [`HttpTransport`]. [`ReqwestTransport`] is the production transport and
//! [`RecordingTransport`] serves scripted responses while recording every
//! request for the tests.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// JSON body; `None` sends no body and no content type
    pub body: Option<Value>,
}

/// Response with the body kept as text so callers decide how to parse it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport level failures: no HTTP response was produced
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Transport error: {0}")]
    Other(String),
}

/// Sends HTTP requests on behalf of the API client
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Get transport name/identifier
    fn transport_name(&self) -> &'static str;
}

/// Production transport backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nullbots/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(Self::map_error)?;

        Ok(Self { client })
    }

    /// Wrap an already configured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn map_error(error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(error.to_string())
        } else if error.is_connect() {
            TransportError::Connection(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(request.url),
            HttpMethod::Post => self.client.post(request.url),
        };

        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(Self::map_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::map_error)?;

        Ok(HttpResponse { status, body })
    }

    fn transport_name(&self) -> &'static str {
        "reqwest"
    }
}

/// Scripted response rule
#[derive(Debug, Clone)]
struct ResponseRule {
    method: HttpMethod,
    path_suffix: String,
    outcome: Result<HttpResponse, TransportError>,
}

/// Transport that answers from scripted rules and records every request.
///
/// Rules match on method and URL path suffix, first match wins. Requests
/// that match no rule get the default response (`200 {}` unless replaced).
#[derive(Debug)]
pub struct RecordingTransport {
    rules: Vec<ResponseRule>,
    default_response: HttpResponse,
    requests: Mutex<Vec<HttpRequest>>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            default_response: HttpResponse::new(200, "{}"),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer matching requests with `response`
    pub fn with_response(
        mut self,
        method: HttpMethod,
        path_suffix: impl Into<String>,
        response: HttpResponse,
    ) -> Self {
        self.rules.push(ResponseRule {
            method,
            path_suffix: path_suffix.into(),
            outcome: Ok(response),
        });
        self
    }

    /// Fail matching requests at the transport level
    pub fn with_failure(
        mut self,
        method: HttpMethod,
        path_suffix: impl Into<String>,
        error: TransportError,
    ) -> Self {
        self.rules.push(ResponseRule {
            method,
            path_suffix: path_suffix.into(),
            outcome: Err(error),
        });
        self
    }

    pub fn with_default_response(mut self, response: HttpResponse) -> Self {
        self.default_response = response;
        self
    }

    /// Snapshot of every request sent so far, in order
    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }

    /// Requests whose URL path ends with `path_suffix`
    pub async fn requests_to(&self, path_suffix: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.url.path().ends_with(path_suffix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        debug!("Recording {} {}", request.method, request.url);

        let outcome = self
            .rules
            .iter()
            .find(|rule| {
                rule.method == request.method && request.url.path().ends_with(&rule.path_suffix)
            })
            .map(|rule| rule.outcome.clone())
            .unwrap_or_else(|| Ok(self.default_response.clone()));

        self.requests.lock().await.push(request);
        outcome
    }

    fn transport_name(&self) -> &'static str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("http://backend.test").unwrap().join(path).unwrap()
    }

    #[tokio::test]
    async fn test_recording_transport_matches_rules_in_order() {
        let transport = RecordingTransport::new()
            .with_response(HttpMethod::Get, "/projects/1", HttpResponse::new(404, "{}"))
            .with_response(HttpMethod::Get, "/projects/1", HttpResponse::new(200, "{}"));

        let response = transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: url("/api/projects/1"),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_recording_transport_default_and_method_mismatch() {
        let transport = RecordingTransport::new()
            .with_failure(
                HttpMethod::Post,
                "/health",
                TransportError::Connection("refused".to_string()),
            )
            .with_default_response(HttpResponse::new(204, ""));

        let response = transport
            .send(HttpRequest {
                method: HttpMethod::Get,
                url: url("/api/health"),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 204);
        assert_eq!(transport.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_recording_transport_failure_is_recorded() {
        let transport = RecordingTransport::new().with_failure(
            HttpMethod::Post,
            "/analytics/track",
            TransportError::Timeout("slow".to_string()),
        );

        let result = transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: url("/api/analytics/track"),
                body: Some(serde_json::json!({})),
            })
            .await;

        assert!(matches!(result, Err(TransportError::Timeout(_))));
        assert_eq!(transport.requests_to("/analytics/track").await.len(), 1);
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(201, "").is_success());
        assert!(!HttpResponse::new(304, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }
}
