use crate::api::{ApiClient, PAGE_VIEW_EVENT};
use tokio::task::JoinHandle;
use tracing::debug;

/// Handle to a dispatched tracking call.
///
/// Carries no error; dropping it lets the call finish in the background.
pub type TrackHandle = JoinHandle<()>;

/// Page-view and event instrumentation bound to the current route.
///
/// Every route change fires a `page_view` event, including the initial
/// mount and revisits of a path seen before. Each event is an independent
/// request spawned on the tokio runtime; nothing is batched or retried.
#[derive(Debug)]
pub struct AnalyticsTracker {
    client: ApiClient,
    current_path: String,
}

impl AnalyticsTracker {
    /// Bind to `initial_path` and fire its page view.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount(client: ApiClient, initial_path: impl Into<String>) -> (Self, TrackHandle) {
        let tracker = Self {
            client,
            current_path: initial_path.into(),
        };
        let handle = tracker.page_view();
        (tracker, handle)
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Move to `path` and fire its page view
    pub fn navigate(&mut self, path: impl Into<String>) -> TrackHandle {
        self.current_path = path.into();
        debug!("Route changed to {}", self.current_path);
        self.page_view()
    }

    /// Fire `event` for the current path
    pub fn track_event(&self, event: &str, project_id: Option<&str>) -> TrackHandle {
        self.dispatch(event.to_string(), project_id.map(str::to_string))
    }

    fn page_view(&self) -> TrackHandle {
        self.dispatch(PAGE_VIEW_EVENT.to_string(), None)
    }

    fn dispatch(&self, event: String, project_id: Option<String>) -> TrackHandle {
        let client = self.client.clone();
        let page = self.current_path.clone();

        tokio::spawn(async move {
            client
                .analytics()
                .track(&event, &page, project_id.as_deref())
                .await;
        })
    }
}
