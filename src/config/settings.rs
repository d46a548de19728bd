//! Persisted client-side key-value settings and base URL resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::config::ConfigError;

/// Settings key holding the API base URL override.
pub const API_URL_KEY: &str = "api_url";

pub const FALLBACK_BASE_URL: &str = "http://127.0.0.1:8000";

/// Base URL used when no override is stored. Set `NEWSROOM_API_BASE_URL`
/// at build time to change it.
pub fn default_base_url() -> &'static str {
    option_env!("NEWSROOM_API_BASE_URL").unwrap_or(FALLBACK_BASE_URL)
}

/// String key-value store that survives between sessions.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError>;
    fn remove(&self, key: &str) -> Result<(), ConfigError>;
}

/// Resolve the API base URL: the stored override when present and
/// non-blank, otherwise the default. Trailing slashes are removed.
pub fn resolve_base_url(store: &dyn SettingsStore) -> String {
    let chosen = store
        .get(API_URL_KEY)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| default_base_url().to_string());
    chosen.trim_end_matches('/').to_string()
}

/// Settings kept in a flat TOML table, written through on every change.
pub struct FileSettings {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl FileSettings {
    /// Open the settings file at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.clone(),
                source: e,
            })?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// `~/.config/newsroom/settings.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsroom").join("settings.toml"))
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let content = toml::to_string(values).map_err(|e| ConfigError::Serialize {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(&self.path, content).map_err(|e| ConfigError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut values = self.values.write().map_err(|_| ConfigError::Poisoned)?;
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<(), ConfigError> {
        let mut values = self.values.write().map_err(|_| ConfigError::Poisoned)?;
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

/// Non-persistent store, for tests and one-off sessions.
#[derive(Default)]
pub struct MemorySettings {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.values
            .write()
            .map_err(|_| ConfigError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ConfigError> {
        self.values
            .write()
            .map_err(|_| ConfigError::Poisoned)?
            .remove(key);
        Ok(())
    }
}
