//! Configuration management for newsroom.
//!
//! Tunables are read from `~/.config/newsroom/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.
//! The API base URL is a user setting rather than a tunable and lives in the
//! separate key-value store, see [`settings`].

pub mod client;
pub mod settings;

pub use client::ClientConfig;
pub use settings::{
    default_base_url, resolve_base_url, FileSettings, MemorySettings, SettingsStore, API_URL_KEY,
};

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source: e,
        })?;

        config
            .client
            .validate()
            .map_err(|message| ConfigError::Invalid {
                path: config_path.to_path_buf(),
                message,
            })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/newsroom/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("newsroom").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# newsroom configuration
#
# The API base URL is not set here; use `newsroom config set-url <URL>`.

[client]
# Timeout of the first attempt to fetch articles (seconds)
request_timeout_secs = 10

# Timeout of each retry attempt (seconds)
retry_timeout_secs = 5

# Timeout of the reachability probe sent before fetching (seconds)
health_timeout_secs = 3

# Timeout of single article / generated content lookups (seconds)
lookup_timeout_secs = 10

# Retries after a timed-out or unreachable first attempt
max_retries = 1

# Backoff before the first retry, doubled on each further retry (milliseconds)
base_delay_ms = 1000

# Upper bound on backoff (milliseconds)
max_delay_ms = 5000

# Probe the service before fetching articles
health_check = true
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file at {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    #[error("Failed to serialize settings for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },

    #[error("Settings store lock poisoned")]
    Poisoned,
}
