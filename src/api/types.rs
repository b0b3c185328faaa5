use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Contact form submission sent to `/contact/submit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Optional filters for the project listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
}

impl ProjectFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            featured: None,
        }
    }

    pub fn featured() -> Self {
        Self {
            category: None,
            featured: Some(true),
        }
    }

    /// Query pairs in the order the backend documents them.
    ///
    /// An empty category is treated as absent and `featured` is only sent
    /// when it is `true`.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if self.featured == Some(true) {
            pairs.push(("featured", "true".to_string()));
        }
        pairs
    }
}

/// Portfolio project record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProjectRecord")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub featured: bool,
    pub likes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub technologies: Vec<String>,
    /// Backend fields this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Record identifier as sent by the backend, text or numeric
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

impl RecordId {
    fn into_string(self) -> String {
        match self {
            RecordId::Text(text) => text,
            RecordId::Number(number) => number.to_string(),
        }
    }
}

/// Wire shape of a project. Document stores send `_id`, some also echo it
/// as `id`; either one identifies the record, `_id` wins.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectRecord {
    #[serde(rename = "_id", default)]
    document_id: Option<RecordId>,
    #[serde(default)]
    id: Option<RecordId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    featured: bool,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    technologies: Vec<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<ProjectRecord> for Project {
    type Error = String;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        let id = record
            .document_id
            .or(record.id)
            .map(RecordId::into_string)
            .ok_or_else(|| "missing field `id`".to_string())?;

        Ok(Project {
            id,
            title: record.title,
            description: record.description,
            category: record.category,
            featured: record.featured,
            likes: record.likes,
            image: record.image,
            technologies: record.technologies,
            extra: record.extra,
        })
    }
}

/// Project category as reported by `/projects/meta/categories`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Name(String),
    Detailed {
        #[serde(alias = "_id", alias = "category")]
        name: String,
        #[serde(default)]
        count: Option<u64>,
    },
}

impl Category {
    pub fn name(&self) -> &str {
        match self {
            Category::Name(name) => name,
            Category::Detailed { name, .. } => name,
        }
    }
}

/// Generic acknowledgement returned by write endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

/// Telemetry event posted to `/analytics/track`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event: String,
    pub page: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub referrer: String,
    pub session_id: String,
}

/// Event name fired on every route change
pub const PAGE_VIEW_EVENT: &str = "page_view";

/// List payloads arrive either bare or wrapped in an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "projects", alias = "categories")]
        data: Vec<T>,
    },
}

impl<T> ListEnvelope<T> {
    pub(crate) fn into_inner(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

/// Single records arrive either bare or wrapped under `data`/`project`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RecordEnvelope<T> {
    Wrapped {
        #[serde(alias = "project")]
        data: T,
    },
    Bare(T),
}

impl<T> RecordEnvelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            RecordEnvelope::Wrapped { data } => data,
            RecordEnvelope::Bare(item) => item,
        }
    }
}

/// Error body shape shared by every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// API client errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Network(String),
    /// Non-success response whose message came from the body or a default
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// Non-success response mapped to a fixed message, body ignored
    #[error("{message}")]
    FetchFailed { status: u16, message: String },
    /// The requested record does not exist
    #[error("{0}")]
    NotFound(String),
    /// Success status with a body that does not parse
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Failed to encode request: {0}")]
    Encoding(String),
    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// User-facing message without any category prefix
    pub fn message(&self) -> &str {
        match self {
            ApiError::Network(msg)
            | ApiError::NotFound(msg)
            | ApiError::InvalidResponse(msg)
            | ApiError::Encoding(msg)
            | ApiError::InvalidUrl(msg) => msg,
            ApiError::Rejected { message, .. } | ApiError::FetchFailed { message, .. } => message,
        }
    }

    /// HTTP status for errors that came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } | ApiError::FetchFailed { status, .. } => {
                Some(*status)
            }
            ApiError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}
