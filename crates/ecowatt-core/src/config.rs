//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the API base address, where the session is persisted,
//! and the last used username.
//!
//! Configuration is stored at `~/.config/ecowatt/config.json`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{ClientConfig, DEFAULT_API_BASE_URL};
use crate::auth::{FileStorage, KeyringStorage, MemoryStorage, SessionStorage};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "ecowatt";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base address
pub const BASE_URL_ENV: &str = "ECOWATT_API_BASE_URL";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Keyring,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub session_storage: StorageBackend,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Base address, in priority order: environment, config file, built-in default.
    pub fn base_url(&self) -> String {
        self.resolve_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    fn resolve_base_url(&self, from_env: Option<String>) -> String {
        from_env
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    pub fn client_config(&self) -> Result<ClientConfig> {
        let base_url = self.base_url();
        ClientConfig::new(&base_url).with_context(|| format!("Invalid API base URL: {}", base_url))
    }

    /// Open the configured session storage backend.
    pub fn session_storage(&self) -> Result<Arc<dyn SessionStorage>> {
        let storage: Arc<dyn SessionStorage> = match self.session_storage {
            StorageBackend::File => Arc::new(FileStorage::new(&self.cache_dir()?)),
            StorageBackend::Keyring => Arc::new(KeyringStorage::new()?),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };
        Ok(storage)
    }
}
