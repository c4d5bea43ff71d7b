use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::expiry::is_expired_at;
use super::storage::{MemoryStorage, SessionStorage};

/// Client-held record of the current credential and identity.
///
/// Serialized as `{"credential": "...", "currentUserId": 0}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(rename = "credential", default)]
    pub token: String,
    #[serde(rename = "currentUserId", default)]
    pub current_user_id: i64,
}

impl SessionState {
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = token.into();
    }

    pub fn set_current_user_id(&mut self, id: i64) {
        self.current_user_id = id;
    }

    /// Clear the credential. The user id is left as-is until the next login.
    pub fn remove_token(&mut self) {
        self.token.clear();
    }

    /// Returns true if the credential is live at `now`, clearing it otherwise.
    pub fn check_at(&mut self, now: i64) -> bool {
        if is_expired_at(&self.token, now) {
            self.token.clear();
            return false;
        }
        true
    }

    pub fn has_token(&self) -> bool {
        !self.token.is_empty()
    }
}

/// Process-wide owner of the session state.
///
/// Clone is cheap and every clone sees the same state. Each operation runs
/// under one lock; when it changes the state, the new snapshot is handed to
/// the storage backend before the lock is released.
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Open a store backed by `storage`, rehydrating any saved state.
    ///
    /// Unreadable saved state is logged and the store starts empty.
    pub fn open(storage: Arc<dyn SessionStorage>) -> Self {
        let state = match storage.load() {
            Ok(Some(state)) => {
                debug!(
                    has_token = state.has_token(),
                    user_id = state.current_user_id,
                    "Session rehydrated"
                );
                state
            }
            Ok(None) => SessionState::default(),
            Err(e) => {
                warn!(error = %e, "Failed to load saved session, starting empty");
                SessionState::default()
            }
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            storage,
        }
    }

    /// A store that is not persisted across restarts.
    pub fn in_memory() -> Self {
        Self::open(Arc::new(MemoryStorage::new()))
    }

    pub fn is_persisted(&self) -> bool {
        self.storage.is_durable()
    }

    /// Current credential, empty when signed out.
    pub fn token(&self) -> String {
        self.state.lock().token.clone()
    }

    pub fn has_token(&self) -> bool {
        self.state.lock().has_token()
    }

    pub fn current_user_id(&self) -> i64 {
        self.state.lock().current_user_id
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        self.update(|state| state.set_token(token));
    }

    pub fn set_current_user_id(&self, id: i64) {
        self.update(|state| state.set_current_user_id(id));
    }

    pub fn remove_token(&self) {
        self.update(SessionState::remove_token);
    }

    /// Whether the stored credential is live. An expired credential is
    /// cleared before this returns false.
    pub fn is_login(&self) -> bool {
        self.is_login_at(Utc::now().timestamp())
    }

    pub fn is_login_at(&self, now: i64) -> bool {
        self.update(|state| state.check_at(now))
    }

    fn update<R>(&self, transition: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut state = self.state.lock();
        let before = state.clone();
        let result = transition(&mut *state);

        if *state != before {
            if let Err(e) = self.storage.save(&*state) {
                warn!(error = %e, "Failed to persist session");
            }
        }
        result
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SessionStore")
            .field("has_token", &state.has_token())
            .field("current_user_id", &state.current_user_id)
            .field("persisted", &self.storage.is_durable())
            .finish()
    }
}
