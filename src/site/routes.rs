//! Route table of the studio site.
//!
//! The analytics tracker only needs the path string; this table gives the
//! CLI and the forms a typed view of which page a path belongs to.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Home,
    Services,
    Portfolio,
    ProjectDetail { id: String },
    Team,
    Contact,
    NotFound { path: String },
}

impl Route {
    /// Map a location path to its route.
    ///
    /// Query strings and fragments are ignored and a trailing slash is
    /// tolerated, so `/services/` and `/services?ref=x` are both Services.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["services"] => Route::Services,
            ["portfolio"] => Route::Portfolio,
            ["portfolio", id] => Route::ProjectDetail { id: id.to_string() },
            ["team"] => Route::Team,
            ["contact"] => Route::Contact,
            _ => Route::NotFound {
                path: if path.is_empty() {
                    "/".to_string()
                } else {
                    path.to_string()
                },
            },
        }
    }

    /// Canonical path for this route
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Services => "/services".to_string(),
            Route::Portfolio => "/portfolio".to_string(),
            Route::ProjectDetail { id } => format!("/portfolio/{}", id),
            Route::Team => "/team".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::NotFound { path } => path.clone(),
        }
    }

    /// Page name as shown in navigation
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Services => "Services",
            Route::Portfolio => "Portfolio",
            Route::ProjectDetail { .. } => "Project",
            Route::Team => "Team",
            Route::Contact => "Contact",
            Route::NotFound { .. } => "Not Found",
        }
    }

    /// Project shown by this route, if any
    pub fn project_id(&self) -> Option<&str> {
        match self {
            Route::ProjectDetail { id } => Some(id),
            _ => None,
        }
    }

    /// Routes reachable from the navigation bar
    pub fn navigation() -> [Route; 5] {
        [
            Route::Home,
            Route::Services,
            Route::Portfolio,
            Route::Team,
            Route::Contact,
        ]
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.path())
    }
}
