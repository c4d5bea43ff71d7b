//! Durable storage backends for session state.
//!
//! The session store hands every changed snapshot to one of these. All of them
//! keep the state under the same fixed key so switching backends is a config
//! change only.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keyring::Entry;
use parking_lot::Mutex;
use tracing::warn;

use super::session::SessionState;

/// Fixed key the session state is persisted under.
pub const SESSION_KEY: &str = "ecowatt-user";

/// Keychain service name
const KEYRING_SERVICE: &str = "ecowatt";

pub trait SessionStorage: Send + Sync {
    /// Read the persisted state, `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<SessionState>>;

    /// Replace the persisted state with `state`.
    fn save(&self, state: &SessionState) -> Result<()>;

    /// Whether saved state survives a restart.
    fn is_durable(&self) -> bool {
        true
    }
}

/// Keeps state for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<SessionState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the storage as if a previous run had saved `state`.
    pub fn with_state(state: SessionState) -> Self {
        Self {
            slot: Mutex::new(Some(state)),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<SessionState>> {
        Ok(self.slot.lock().clone())
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        *self.slot.lock() = Some(state.clone());
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }
}

/// JSON file in the cache directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            path: cache_dir.join(format!("{}.json", SESSION_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<SessionState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read session file")?;
        let state = serde_json::from_str(&contents)
            .context("Failed to parse session file")?;
        Ok(Some(state))
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }
}

/// Whether a native keystore is compiled in for this target.
/// Elsewhere keyring falls back to an in-process mock that keeps nothing.
const NATIVE_KEYSTORE: bool = cfg!(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "windows",
    target_os = "linux"
));

/// OS keychain entry holding the serialized state.
///
/// The entry is opened once so every save and load goes through the same
/// credential.
#[derive(Debug)]
pub struct KeyringStorage {
    entry: Entry,
    durable: bool,
}

impl KeyringStorage {
    pub fn new() -> Result<Self> {
        let entry = Entry::new(KEYRING_SERVICE, SESSION_KEY).context("Failed to create keyring entry")?;
        if !NATIVE_KEYSTORE {
            warn!("No native keystore on this platform, session will not survive a restart");
        }
        Ok(Self {
            entry,
            durable: NATIVE_KEYSTORE,
        })
    }

    /// Wrap an already-built entry, e.g. one backed by a custom credential store.
    pub fn with_entry(entry: Entry, durable: bool) -> Self {
        Self { entry, durable }
    }
}

impl SessionStorage for KeyringStorage {
    fn load(&self) -> Result<Option<SessionState>> {
        match self.entry.get_password() {
            Ok(contents) => {
                let state = serde_json::from_str(&contents)
                    .context("Failed to parse session from keychain")?;
                Ok(Some(state))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to read session from keychain"),
        }
    }

    fn save(&self, state: &SessionState) -> Result<()> {
        let contents = serde_json::to_string(state)?;
        self.entry
            .set_password(&contents)
            .context("Failed to store session in keychain")?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        self.durable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyring::credential::CredentialBuilderApi;

    fn sample_state() -> SessionState {
        SessionState {
            token: "a.b.c".to_string(),
            current_user_id: 42,
        }
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        assert!(!storage.is_durable());

        storage.save(&sample_state()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(sample_state()));
    }

    #[test]
    fn test_file_storage_uses_fixed_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.path(), dir.path().join("ecowatt-user.json").as_path());
        assert!(storage.load().unwrap().is_none());

        storage.save(&sample_state()).unwrap();
        let raw = std::fs::read_to_string(storage.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["credential"], "a.b.c");
        assert_eq!(json["currentUserId"], 42);

        assert_eq!(storage.load().unwrap(), Some(sample_state()));
    }

    #[test]
    fn test_file_storage_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(&dir.path().join("nested").join("cache"));

        storage.save(&sample_state()).unwrap();
        assert!(storage.path().exists());
    }

    #[test]
    fn test_file_storage_reports_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        std::fs::write(storage.path(), "{not json").unwrap();

        assert!(storage.load().is_err());
    }

    fn mock_keyring_storage() -> KeyringStorage {
        let credential = keyring::mock::default_credential_builder()
            .build(None, KEYRING_SERVICE, SESSION_KEY)
            .unwrap();
        KeyringStorage::with_entry(Entry::new_with_credential(credential), false)
    }

    #[test]
    fn test_keyring_storage_roundtrip() {
        let storage = mock_keyring_storage();
        assert!(storage.load().unwrap().is_none());

        storage.save(&sample_state()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(sample_state()));

        let updated = SessionState {
            token: String::new(),
            ..sample_state()
        };
        storage.save(&updated).unwrap();
        assert_eq!(storage.load().unwrap(), Some(updated));
    }

    #[test]
    fn test_keyring_storage_reports_durability() {
        assert!(!mock_keyring_storage().is_durable());

        let credential = keyring::mock::default_credential_builder()
            .build(None, KEYRING_SERVICE, SESSION_KEY)
            .unwrap();
        let storage = KeyringStorage::with_entry(Entry::new_with_credential(credential), true);
        assert!(storage.is_durable());
    }

    #[test]
    fn test_keyring_storage_reports_corrupt_entry() {
        let storage = mock_keyring_storage();
        storage.entry.set_password("{not json").unwrap();
        assert!(storage.load().is_err());
    }
}
