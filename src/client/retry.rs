use std::time::Duration;

use crate::client::executor::Executor;
use crate::client::outcome::{ErrorKind, Failure, Outcome};
use crate::client::request::RequestSpec;
use crate::client::transport::RawResponse;

/// How many times to try, how long to wait between tries, and which
/// failures are worth another try.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Timeout for attempts after the first; the first attempt uses the
    /// request's own timeout. `None` keeps the request timeout throughout.
    pub retry_timeout: Option<Duration>,
    pub retry_on: fn(&ErrorKind) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(5000),
            retry_timeout: Some(Duration::from_secs(5)),
            retry_on: ErrorKind::is_transient,
        }
    }
}

impl RetryPolicy {
    /// Backoff before the attempt following `attempt` (0-based):
    /// `min(base * 2^attempt, max)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    pub fn timeout_for(&self, attempt: u32, request_timeout: Duration) -> Duration {
        match (attempt, self.retry_timeout) {
            (0, _) | (_, None) => request_timeout,
            (_, Some(timeout)) => timeout,
        }
    }

    /// A failure is retried only if it is flagged retryable and the policy
    /// predicate agrees.
    pub fn should_retry(&self, failure: &Failure) -> bool {
        failure.retryable && (self.retry_on)(&failure.kind)
    }
}

impl Executor {
    /// Drive up to `max_retries + 1` sequential attempts of `spec`.
    ///
    /// Success on any attempt returns at once. A terminal failure, or a
    /// retryable one with no attempts left, is returned as the final
    /// outcome. The backoff wait observes the caller's cancellation token.
    pub async fn with_retry(
        &self,
        spec: &RequestSpec,
        policy: &RetryPolicy,
    ) -> Outcome<RawResponse> {
        let total = policy.max_retries + 1;
        let mut attempt = 0;

        loop {
            let timeout = policy.timeout_for(attempt, spec.timeout);
            tracing::debug!("Attempt {}/{} for {}", attempt + 1, total, spec.path());

            let failure = match self.execute_checked(spec, timeout).await {
                Ok(response) => return Ok(response),
                Err(failure) => failure,
            };

            if attempt >= policy.max_retries || !policy.should_retry(&failure) {
                return Err(failure);
            }

            let delay = policy.delay_for(attempt);
            tracing::warn!(
                "Attempt {}/{} for {} failed ({}), retrying in {}ms",
                attempt + 1,
                total,
                spec.path(),
                failure.kind,
                delay.as_millis()
            );

            tokio::select! {
                biased;
                _ = self.cancel_token().cancelled() => return Err(Failure::cancelled()),
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }
}
