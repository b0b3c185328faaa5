//! # NULLBOTS site client
//!
//! Typed client for the backend behind the NULLBOTS studio website: contact
//! submissions, the project portfolio, newsletter subscriptions, health
//! probes and page-view analytics correlated by a per-session identifier.
//!
//! ## Architecture Overview
//!
//! - **[`api`]**: One namespace per backend resource behind an injectable HTTP transport
//! - **[`session`]**: Session-scoped storage and the lazily created session identifier
//! - **[`analytics`]**: Route-bound page-view and event tracking, fire-and-forget
//! - **[`site`]**: The site's route table and its contact/newsletter forms
//!
//! ## Error Handling
//!
//! Every client call returns `Result<_, ApiError>` except analytics tracking,
//! which logs failures and returns `()`. A 404 on a single project is
//! [`ApiError::NotFound`], distinct from the generic [`ApiError::FetchFailed`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nullbots::{AnalyticsTracker, ApiClient, ClientConfig, SessionIdentity};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ApiClient::from_config(&ClientConfig::from_env(), SessionIdentity::in_memory())?;
//!
//!     let (mut tracker, _) = AnalyticsTracker::mount(client.clone(), "/");
//!     tracker.navigate("/portfolio");
//!
//!     for project in client.projects().get_all(None).await? {
//!         println!("{}: {}", project.id, project.title);
//!     }
//!     Ok(())
//! }
//! ```

/// Typed access to the backend REST API.
///
/// Contact, projects, newsletter, analytics and health endpoints, the error
/// taxonomy they share, and the transport seam requests go through.
pub mod api;

/// Session-scoped storage and the session identifier used to correlate
/// analytics events.
pub mod session;

/// Page-view and event instrumentation bound to the current route.
pub mod analytics;

/// Site routes and forms that drive the client.
pub mod site;

/// Environment constants and path utilities.
///
/// Centralizes default addresses, variable names and file locations used
/// throughout the crate for easier maintenance and consistency.
pub mod env;

// Re-export main API types
pub use api::{
    Acknowledgement, AnalyticsEvent, ApiClient, ApiError, Category, ClientConfig,
    ContactSubmission, HttpTransport, Project, ProjectFilter, RecordingTransport,
    ReqwestTransport,
};

// Re-export session types
pub use session::{FileSessionStore, MemorySessionStore, SessionIdentity, SessionStore};

// Re-export analytics types
pub use analytics::{AnalyticsTracker, TrackHandle};

// CLI module for command-line interface
pub mod cli;
