//! Session persistence: the one [`SessionState`] record and the theme
//! preference, both living in single-key [`Storage`].
//!
//! All writes are read-merge-write through [`SessionPatch`]; a blind overwrite
//! would clobber fields another call site just set. Read failures of any kind
//! degrade to defaults, never to an error the caller sees.

use std::sync::{Arc, Mutex};

use crate::models::{
    SessionPatch, SessionState, ThemeMode, SESSION_STATE_KEY, THEME_KEY,
};
use crate::services::Storage;

pub mod restore;

pub use restore::{restore_session, RestoreOutcome};

/// Shared handle to the persisted session record.
///
/// Cloning shares the underlying storage; both the shell and the viewer write
/// through the same handle so the merge discipline actually merges.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<Mutex<dyn Storage + Send>>,
}

impl SessionStore {
    pub fn new(storage: impl Storage + Send + 'static) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
        }
    }

    /// Current persisted state, fully defined. A missing key or malformed
    /// JSON both produce the default record.
    pub fn read(&self) -> SessionState {
        let raw = match self.storage.lock() {
            Ok(storage) => storage.get(SESSION_STATE_KEY),
            Err(_) => None,
        };
        let Some(raw) = raw else {
            return SessionState::default();
        };
        match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(err) => {
                tracing::debug!(%err, "session state unreadable, using defaults");
                SessionState::default()
            }
        }
    }

    /// Overlay `patch` on the current persisted record and write the union
    /// back. Fields the patch does not mention keep their persisted values.
    pub fn write(&self, patch: SessionPatch) {
        let merged = patch.apply(self.read());
        match serde_json::to_string(&merged) {
            Ok(json) => {
                if let Ok(mut storage) = self.storage.lock() {
                    storage.set(SESSION_STATE_KEY, &json);
                }
            }
            Err(err) => tracing::warn!(%err, "session state serialize failed"),
        }
    }

    pub fn clear(&self) {
        if let Ok(mut storage) = self.storage.lock() {
            storage.remove(SESSION_STATE_KEY);
        }
    }

    pub fn theme(&self) -> ThemeMode {
        let raw = match self.storage.lock() {
            Ok(storage) => storage.get(THEME_KEY),
            Err(_) => None,
        };
        raw.map(|v| ThemeMode::from_str_or_default(&v))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: ThemeMode) {
        if let Ok(mut storage) = self.storage.lock() {
            storage.set(THEME_KEY, theme.as_str());
        }
    }
}
