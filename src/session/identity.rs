use crate::env;
use crate::session::store::{MemorySessionStore, SessionError, SessionStore};
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, warn};

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of each random half of a generated identifier
const SEGMENT_LEN: usize = 13;

/// Lazily creates and hands out the session identifier.
///
/// The identifier lives in the injected [`SessionStore`], so every clone of
/// this provider, and every client built on the same store, sees the same
/// value until the store is cleared.
#[derive(Clone)]
pub struct SessionIdentity {
    store: Arc<dyn SessionStore>,
}

impl SessionIdentity {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// Provider backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Return the session identifier, creating and storing it on first use.
    ///
    /// Never fails: if the store cannot persist a new identifier the freshly
    /// generated one is returned anyway and a warning is logged.
    pub fn session_id(&self) -> String {
        let mut generated = None;
        let result = self
            .store
            .get_or_insert_with(env::session::SESSION_ID_KEY, &mut || {
                let id = generate_session_id();
                generated = Some(id.clone());
                id
            });

        match result {
            Ok(id) => {
                if generated.is_some() {
                    debug!("Created new session id {}", id);
                }
                id
            }
            Err(e) => {
                warn!("Failed to persist session id: {}", e);
                generated.unwrap_or_else(generate_session_id)
            }
        }
    }

    /// Identifier for this session if one was already created
    pub fn existing(&self) -> Option<String> {
        self.store.get(env::session::SESSION_ID_KEY)
    }

    /// End the session; the next call to [`session_id`](Self::session_id)
    /// creates a new identifier.
    pub fn reset(&self) -> Result<(), SessionError> {
        self.store.clear()
    }
}

impl std::fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("session_id", &self.existing())
            .finish()
    }
}

/// Two independent random base-36 segments joined together
pub fn generate_session_id() -> String {
    let mut rng = rand::rng();
    let mut id = String::with_capacity(SEGMENT_LEN * 2);
    for _ in 0..2 {
        id.extend(
            (0..SEGMENT_LEN).map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char),
        );
    }
    id
}
