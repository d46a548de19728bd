use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::Result;
use crate::client::{HttpTransport, NewsClient, Transport};
use crate::config::{Config, FileSettings, SettingsStore};

pub struct AppContext {
    pub config: Config,
    pub settings: Arc<dyn SettingsStore>,
    pub client: NewsClient,
}

impl AppContext {
    /// Load config and settings from their default locations unless paths
    /// are given.
    pub fn new(config_path: Option<PathBuf>, settings_path: Option<PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(p) => Config::load_from(&p)?,
            None => Config::load()?,
        };

        let settings_path = match settings_path {
            Some(p) => p,
            None => FileSettings::default_path()?,
        };
        let settings: Arc<dyn SettingsStore> = Arc::new(FileSettings::open(&settings_path)?);
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new()?);

        Ok(Self::with_parts(config, settings, transport))
    }

    pub fn with_parts(
        config: Config,
        settings: Arc<dyn SettingsStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let client = NewsClient::new(transport, settings.clone(), config.client.clone());
        Self {
            config,
            settings,
            client,
        }
    }
}
