use crate::env;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Settings the API client is built from.
///
/// Resolved once at startup; a built client never rereads the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Referrer reported with analytics events; empty when there is none
    pub referrer: String,
    /// Persist the session store here instead of keeping it in memory
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: env::api::DEFAULT_API_BASE_URL.to_string(),
            referrer: String::new(),
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Defaults with the environment override applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply `NULLBOTS_API_URL` when it is set and non-empty
    pub fn with_env_overrides(self) -> Self {
        match std::env::var(env::api::API_URL_ENV_VAR) {
            Ok(url) if !url.trim().is_empty() => {
                debug!(
                    "Using API base URL from {}: {}",
                    env::api::API_URL_ENV_VAR,
                    url
                );
                self.with_base_url(url)
            }
            _ => self,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().to_string();
        self
    }

    pub fn with_referrer(mut self, referrer: impl Into<String>) -> Self {
        self.referrer = referrer.into();
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }
}
