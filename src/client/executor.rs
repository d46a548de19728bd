use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::classify::{classify, ensure_success, RawFailure};
use crate::client::outcome::{Failure, Outcome};
use crate::client::request::RequestSpec;
use crate::client::transport::{RawResponse, Transport};

/// Runs requests against one base URL under a caller's cancellation token.
///
/// Built per façade call; cloning is cheap.
#[derive(Clone)]
pub struct Executor {
    transport: Arc<dyn Transport>,
    base_url: String,
    cancel: CancellationToken,
}

impl Executor {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            cancel,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Send one request, settling within `timeout`.
    ///
    /// Whichever finishes first among caller cancellation, the timer, and
    /// the call decides the outcome, in that priority. The losing futures
    /// are dropped, so the timer never outlives the call and a timed-out
    /// request is aborted rather than left running. Any status code counts
    /// as a response here; see [`execute_checked`](Self::execute_checked).
    pub async fn execute(&self, spec: &RequestSpec, timeout: Duration) -> Outcome<RawResponse> {
        let url = spec.url(&self.base_url)?;
        let call_token = self.cancel.child_token();

        tracing::debug!(
            "{:?} {} (timeout {}ms)",
            spec.method,
            url,
            timeout.as_millis()
        );

        let call = self.transport.send(spec.method, url, call_token.clone());

        let settled = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RawFailure::CallerCancelled),
            _ = tokio::time::sleep(timeout) => {
                tracing::debug!("Request to {} timed out after {}ms", spec.path(), timeout.as_millis());
                Err(RawFailure::TimerElapsed)
            }
            result = call => result.map_err(RawFailure::Transport),
        };

        call_token.cancel();
        settled.map_err(|raw| Failure::from(classify(raw)))
    }

    /// Like [`execute`](Self::execute), but non-2xx responses are failures.
    pub async fn execute_checked(
        &self,
        spec: &RequestSpec,
        timeout: Duration,
    ) -> Outcome<RawResponse> {
        ensure_success(self.execute(spec, timeout).await?)
    }
}
