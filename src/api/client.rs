use crate::api::config::ClientConfig;
use crate::api::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport,
};
use crate::api::types::{
    Acknowledgement, AnalyticsEvent, ApiError, Category, ContactSubmission, ErrorBody,
    ListEnvelope, Project, ProjectFilter, RecordEnvelope,
};
use crate::session::SessionIdentity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Typed client for the site backend.
///
/// Cheap to clone; clones share the transport and the session identity.
/// Operations are grouped per backend resource:
///
/// ```rust,no_run
/// use nullbots::{ApiClient, ClientConfig, SessionIdentity};
///
/// # async fn demo() -> Result<(), nullbots::ApiError> {
/// let client = ApiClient::from_config(&ClientConfig::from_env(), SessionIdentity::in_memory())?;
/// let _featured = client.projects().get_all(Some(&nullbots::ProjectFilter::featured())).await?;
/// client.analytics().track("page_view", "/portfolio", None).await;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    referrer: String,
    transport: Arc<dyn HttpTransport>,
    identity: SessionIdentity,
}

impl ApiClient {
    /// Build a client sending through `transport`.
    ///
    /// Fails only when the configured base URL cannot be used as a base.
    pub fn new(
        config: &ClientConfig,
        transport: Arc<dyn HttpTransport>,
        identity: SessionIdentity,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        debug!(
            "API client targeting {} via {} transport",
            base_url,
            transport.transport_name()
        );

        Ok(Self {
            base_url,
            referrer: config.referrer.clone(),
            transport,
            identity,
        })
    }

    /// Build a client on the production `reqwest` transport
    pub fn from_config(config: &ClientConfig, identity: SessionIdentity) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new().map_err(|e| ApiError::Network(e.to_string()))?;
        Self::new(config, Arc::new(transport), identity)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn contact(&self) -> ContactApi<'_> {
        ContactApi { client: self }
    }

    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi { client: self }
    }

    pub fn newsletter(&self) -> NewsletterApi<'_> {
        NewsletterApi { client: self }
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi { client: self }
    }

    pub fn health(&self) -> HealthApi<'_> {
        HealthApi { client: self }
    }

    /// Base URL with `segments` appended, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        debug!("{} {}", method, url);
        let response = self
            .transport
            .send(HttpRequest { method, url, body })
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        debug!("-> HTTP {}", response.status);
        Ok(response)
    }

    async fn get(&self, url: Url) -> Result<HttpResponse, ApiError> {
        self.send(HttpMethod::Get, url, None).await
    }

    async fn post_json<T: Serialize>(&self, url: Url, payload: &T) -> Result<HttpResponse, ApiError> {
        let body = serde_json::to_value(payload).map_err(|e| ApiError::Encoding(e.to_string()))?;
        self.send(HttpMethod::Post, url, Some(body)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("referrer", &self.referrer)
            .field("transport", &self.transport.transport_name())
            .finish()
    }
}

/// Parse a success body, reporting malformed JSON as an invalid response
fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Non-success response mapped to the body's `message`, or `default` when
/// the body has none or is not JSON
fn rejected(response: &HttpResponse, default: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| default.to_string());

    ApiError::Rejected {
        status: response.status,
        message,
    }
}

fn fetch_failed(response: &HttpResponse, message: &str) -> ApiError {
    ApiError::FetchFailed {
        status: response.status,
        message: message.to_string(),
    }
}

/// `/contact` endpoints
pub struct ContactApi<'a> {
    client: &'a ApiClient,
}

impl ContactApi<'_> {
    pub async fn submit(&self, submission: &ContactSubmission) -> Result<Acknowledgement, ApiError> {
        let url = self.client.endpoint(&["contact", "submit"])?;
        let response = self.client.post_json(url, submission).await?;

        if !response.is_success() {
            return Err(rejected(&response, "Failed to send message"));
        }
        parse_body(&response)
    }
}

/// `/projects` endpoints
pub struct ProjectsApi<'a> {
    client: &'a ApiClient,
}

impl ProjectsApi<'_> {
    pub async fn get_all(&self, filter: Option<&ProjectFilter>) -> Result<Vec<Project>, ApiError> {
        let mut url = self.client.endpoint(&["projects"])?;
        let pairs = filter.map(ProjectFilter::query_pairs).unwrap_or_default();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let response = self.client.get(url).await?;
        if !response.is_success() {
            return Err(fetch_failed(&response, "Failed to fetch projects"));
        }
        parse_body::<ListEnvelope<Project>>(&response).map(ListEnvelope::into_inner)
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Project, ApiError> {
        let url = self.client.endpoint(&["projects", id])?;
        let response = self.client.get(url).await?;

        if response.status == 404 {
            return Err(ApiError::NotFound("Project not found".to_string()));
        }
        if !response.is_success() {
            return Err(fetch_failed(&response, "Failed to fetch project"));
        }
        parse_body::<RecordEnvelope<Project>>(&response).map(RecordEnvelope::into_inner)
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, ApiError> {
        let url = self.client.endpoint(&["projects", "meta", "categories"])?;
        let response = self.client.get(url).await?;

        if !response.is_success() {
            return Err(fetch_failed(&response, "Failed to fetch categories"));
        }
        parse_body::<ListEnvelope<Category>>(&response).map(ListEnvelope::into_inner)
    }

    pub async fn like(&self, id: &str) -> Result<Acknowledgement, ApiError> {
        let url = self.client.endpoint(&["projects", id, "like"])?;
        let response = self.client.send(HttpMethod::Post, url, None).await?;

        if !response.is_success() {
            return Err(fetch_failed(&response, "Failed to like project"));
        }
        parse_body(&response)
    }
}

#[derive(Serialize)]
struct NewsletterRequest<'a> {
    email: &'a str,
}

/// `/newsletter` endpoints
pub struct NewsletterApi<'a> {
    client: &'a ApiClient,
}

impl NewsletterApi<'_> {
    pub async fn subscribe(&self, email: &str) -> Result<Acknowledgement, ApiError> {
        self.post("subscribe", email, "Failed to subscribe").await
    }

    pub async fn unsubscribe(&self, email: &str) -> Result<Acknowledgement, ApiError> {
        self.post("unsubscribe", email, "Failed to unsubscribe").await
    }

    async fn post(
        &self,
        action: &str,
        email: &str,
        default_error: &str,
    ) -> Result<Acknowledgement, ApiError> {
        let url = self.client.endpoint(&["newsletter", action])?;
        let response = self
            .client
            .post_json(url, &NewsletterRequest { email })
            .await?;

        if !response.is_success() {
            return Err(rejected(&response, default_error));
        }
        parse_body(&response)
    }
}

/// `/analytics` endpoint
pub struct AnalyticsApi<'a> {
    client: &'a ApiClient,
}

impl AnalyticsApi<'_> {
    /// Report an event. Never fails: any problem is logged and dropped.
    pub async fn track(&self, event: &str, page: &str, project_id: Option<&str>) {
        let event = AnalyticsEvent {
            event: event.to_string(),
            page: page.to_string(),
            project_id: project_id.map(str::to_string),
            referrer: self.client.referrer.clone(),
            session_id: self.client.identity.session_id(),
        };

        match self.send(&event).await {
            Ok(response) if response.is_success() => {
                debug!("Tracked {} on {}", event.event, event.page);
            }
            Ok(response) => {
                warn!(
                    "Analytics tracking failed: HTTP {} for {} on {}",
                    response.status, event.event, event.page
                );
            }
            Err(e) => {
                warn!("Analytics tracking failed: {}", e);
            }
        }
    }

    async fn send(&self, event: &AnalyticsEvent) -> Result<HttpResponse, ApiError> {
        let url = self.client.endpoint(&["analytics", "track"])?;
        self.client.post_json(url, event).await
    }
}

/// `/health` endpoint
pub struct HealthApi<'a> {
    client: &'a ApiClient,
}

impl HealthApi<'_> {
    /// Liveness probe; the body is returned whatever the status code
    pub async fn check(&self) -> Result<Value, ApiError> {
        let url = self.client.endpoint(&["health"])?;
        let response = self.client.get(url).await?;
        if !response.is_success() {
            debug!("Health endpoint answered HTTP {}", response.status);
        }
        parse_body(&response)
    }
}
