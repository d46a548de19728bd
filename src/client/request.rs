use std::time::Duration;

use url::Url;

use crate::client::outcome::{Failure, Outcome};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

/// Description of one logical request against the service.
///
/// Built fresh for every call. Query parameters keep insertion order and
/// repeated keys are kept as separate pairs, never merged or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Path segments below the base URL, unescaped.
    pub segments: Vec<String>,
    pub method: Method,
    pub query: Vec<(String, String)>,
    pub timeout: Duration,
}

impl RequestSpec {
    /// `path` is split on `/`; use [`segment`](Self::segment) for values
    /// that may themselves contain a slash.
    pub fn get(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            method: Method::Get,
            query: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append one path segment; it is percent-encoded as a whole.
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Append one `key=value` pair per element, in iteration order.
    pub fn params<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.query.push((key.to_string(), value.into()));
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Full URL for this request under `base_url`.
    ///
    /// A base URL that does not parse is reported as a validation failure,
    /// since no request can be sent.
    pub fn url(&self, base_url: &str) -> Outcome<Url> {
        let invalid = |reason: String| {
            Failure::validation(format!("Invalid API base URL '{}': {}", base_url, reason))
        };

        let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(&self.segments);

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}
