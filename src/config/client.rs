use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client::RetryPolicy;

/// Timeouts and retry tuning for the request layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Timeout of the first attempt of the article fetch, in seconds (default: 10)
    pub request_timeout_secs: u64,

    /// Timeout of each retry attempt, in seconds (default: 5)
    pub retry_timeout_secs: u64,

    /// Timeout of the health probe, in seconds (default: 3)
    pub health_timeout_secs: u64,

    /// Timeout of single article and generated content lookups, in seconds (default: 10)
    pub lookup_timeout_secs: u64,

    /// Retries after the first failed attempt (default: 1)
    pub max_retries: u32,

    /// Backoff before the first retry, in milliseconds; doubles each retry (default: 1000)
    pub base_delay_ms: u64,

    /// Upper bound on backoff, in milliseconds (default: 5000)
    pub max_delay_ms: u64,

    /// Probe the service before fetching articles (default: true)
    pub health_check: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            retry_timeout_secs: 5,
            health_timeout_secs: 3,
            lookup_timeout_secs: 10,
            max_retries: 1,
            base_delay_ms: 1000,
            max_delay_ms: 5000,
            health_check: true,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_secs(self.health_timeout_secs)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// Reject values that would make every request fail at once.
    pub fn validate(&self) -> Result<(), String> {
        let timeouts = [
            ("request_timeout_secs", self.request_timeout_secs),
            ("retry_timeout_secs", self.retry_timeout_secs),
            ("health_timeout_secs", self.health_timeout_secs),
            ("lookup_timeout_secs", self.lookup_timeout_secs),
        ];
        for (name, secs) in timeouts {
            if secs == 0 {
                return Err(format!("client.{} must be at least 1", name));
            }
        }
        if self.max_delay_ms < self.base_delay_ms {
            return Err("client.max_delay_ms must not be below client.base_delay_ms".into());
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            retry_timeout: Some(Duration::from_secs(self.retry_timeout_secs)),
            ..RetryPolicy::default()
        }
    }
}
