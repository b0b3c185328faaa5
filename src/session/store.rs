use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Errors raised by session stores
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session store I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Session store is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Session-scoped key/value storage.
///
/// Values live as long as the session does. `clear` ends the session: the
/// next reader starts from an empty store.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Return the stored value for `key`, inserting `init()` first if absent.
    ///
    /// The check and the insert happen atomically with respect to other
    /// callers of this store. Persistence failures are returned as errors.
    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> String,
    ) -> Result<String, SessionError>;

    fn remove(&self, key: &str) -> Result<Option<String>, SessionError>;

    fn clear(&self) -> Result<(), SessionError>;
}

/// In-process store; the session lasts as long as the store value.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|value| value.clone())
    }

    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> String,
    ) -> Result<String, SessionError> {
        let value = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| init())
            .clone();
        Ok(value)
    }

    fn remove(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.remove(key).map(|(_, value)| value))
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.entries.clear();
        Ok(())
    }
}

/// JSON file backed store.
///
/// Lets separate CLI invocations share one session. Entries are cached in
/// memory and written through to disk on every change; clearing the store
/// deletes the file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileSessionStore {
    /// Open the store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let entries = DashMap::new();

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| SessionError::Io {
                path: path.clone(),
                source,
            })?;
            if !content.trim().is_empty() {
                let stored: BTreeMap<String, String> = serde_json::from_str(&content)?;
                for (key, value) in stored {
                    entries.insert(key, value);
                }
            }
            debug!("Loaded {} session entries from {:?}", entries.len(), path);
        }

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(io_err)?;

        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let content = serde_json::to_string_pretty(&snapshot)?;

        // Each write gets its own temp file, renamed over the store atomically
        let mut temp = NamedTempFile::new_in(dir).map_err(io_err)?;
        temp.write_all(content.as_bytes()).map_err(io_err)?;
        temp.persist(&self.path).map_err(|e| io_err(e.error))?;

        debug!("Persisted session store to {:?}", self.path);
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|value| value.clone())
    }

    fn get_or_insert_with(
        &self,
        key: &str,
        init: &mut dyn FnMut() -> String,
    ) -> Result<String, SessionError> {
        let value = {
            match self.entries.entry(key.to_string()) {
                Entry::Occupied(entry) => return Ok(entry.get().clone()),
                Entry::Vacant(entry) => {
                    let value = init();
                    entry.insert(value.clone());
                    value
                }
            }
        };
        // Shard lock is released here; persist walks every shard
        self.persist()?;
        Ok(value)
    }

    fn remove(&self, key: &str) -> Result<Option<String>, SessionError> {
        let removed = self.entries.remove(key).map(|(_, value)| value);
        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.entries.clear();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
