//! Scripted transport for exercising the request layer without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::client::request::Method;
use crate::client::transport::{RawResponse, Transport, TransportError};

#[derive(Debug, Clone)]
pub enum Step {
    Respond(u16, String),
    Fail(TransportError),
    /// Respond after a delay.
    Slow(Duration, u16, String),
    /// Never settle on its own.
    Hang,
}

impl Step {
    pub fn ok(body: &str) -> Self {
        Step::Respond(200, body.to_string())
    }

    pub fn status(status: u16, body: &str) -> Self {
        Step::Respond(status, body.to_string())
    }

    pub fn refused() -> Self {
        Step::Fail(TransportError::Connect("connection refused".into()))
    }
}

/// Replays steps per path. The last step of a path repeats once the others
/// are used up; unscripted paths answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<Url>>,
    completed: AtomicUsize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, path: &str, step: Step) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(step);
        self
    }

    pub fn healthy(self) -> Self {
        self.on("/health", Step::ok(r#"{"status":"healthy"}"#))
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Url> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|u| u.path() == path)
            .count()
    }

    /// Number of calls whose future ran to completion.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    fn next_step(&self, path: &str) -> Step {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(path) {
            Some(steps) if steps.len() > 1 => steps.pop_front().unwrap(),
            Some(steps) if !steps.is_empty() => steps[0].clone(),
            _ => Step::status(404, r#"{"detail":"Not Found"}"#),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        _method: Method,
        url: Url,
        cancel: CancellationToken,
    ) -> Result<RawResponse, TransportError> {
        let step = self.next_step(url.path());
        self.calls.lock().unwrap().push(url);

        let result = match step {
            Step::Respond(status, body) => Ok(RawResponse::new(status, body)),
            Step::Fail(err) => Err(err),
            Step::Slow(delay, status, body) => {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(TransportError::Aborted),
                    _ = tokio::time::sleep(delay) => Ok(RawResponse::new(status, body)),
                }
            }
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
                Ok(RawResponse::new(200, "[]"))
            }
        };

        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}
