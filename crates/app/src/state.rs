//! Application state management

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use inkpad_core::{Result, Session, Store, UploadStore};
use uuid::Uuid;

use crate::config::AppConfig;

/// Main application state
pub struct AppState {
    store: Store,
    uploads: UploadStore,
    // Live client sessions. Concurrent requests from the same client are
    // serialized here; last write wins.
    sessions: Mutex<HashMap<Uuid, Session>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            store: Store::open(&config.data_dir)?,
            uploads: UploadStore::open(&config.uploads_dir)?,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.uploads
    }

    /// Start a fresh client session and return its handle.
    pub fn open_session(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.lock_sessions().insert(id, Session::new());
        id
    }

    /// Run a closure against one client's session.
    ///
    /// An unknown handle gets a fresh empty session; the auth guard then
    /// fails downstream like any logged-out client.
    pub fn with_session<R>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.lock_sessions();
        f(sessions.entry(id).or_default())
    }

    /// Drop a client session entirely.
    pub fn end_session(&self, id: Uuid) {
        self.lock_sessions().remove(&id);
    }

    fn lock_sessions(&self) -> MutexGuard<'_, HashMap<Uuid, Session>> {
        // Session state is plain data; poisoning has nothing to corrupt.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }
}
