use thiserror::Error;

use crate::client::Failure;
use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum NewsroomError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Request(#[from] Failure),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, NewsroomError>;
