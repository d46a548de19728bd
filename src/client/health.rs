use std::time::Duration;

use crate::client::classify::error_detail;
use crate::client::executor::Executor;
use crate::client::outcome::{ErrorKind, Failure, Outcome, ProbeFailure};
use crate::client::request::RequestSpec;
use crate::client::transport::RawResponse;

pub const HEALTH_PATH: &str = "/health";
pub const ROOT_PATH: &str = "/";
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// Probe the service before an expensive request.
///
/// Tries `/health`; if that path does not exist (404) the service root is
/// probed once instead. Not retried: any failure here is final for the
/// calling operation.
pub async fn check_reachable(executor: &Executor, timeout: Duration) -> Outcome<()> {
    let probe = RequestSpec::get(HEALTH_PATH).timeout(timeout);
    let response = probe_once(executor, &probe).await?;

    if response.is_success() {
        tracing::debug!("{} is reachable", executor.base_url());
        return Ok(());
    }

    if response.status != 404 {
        return Err(status_failure(response));
    }

    tracing::debug!("Health endpoint not found, probing service root");
    let root = RequestSpec::get(ROOT_PATH).timeout(timeout);
    let response = probe_once(executor, &root).await?;

    if response.is_success() {
        Ok(())
    } else {
        Err(status_failure(response))
    }
}

async fn probe_once(executor: &Executor, spec: &RequestSpec) -> Outcome<RawResponse> {
    executor
        .execute(spec, spec.timeout)
        .await
        .map_err(unreachable)
}

fn unreachable(failure: Failure) -> Failure {
    tracing::warn!("Health check failed: {}", failure.message);
    let probe = match failure.kind {
        ErrorKind::Timeout => ProbeFailure::TimedOut,
        ErrorKind::NetworkUnreachable => ProbeFailure::NoConnection,
        // Cancellation, local misconfiguration and unrecognized transport
        // errors keep their own kind and raw message.
        _ => return failure,
    };
    Failure::new(ErrorKind::ServiceUnreachable(probe))
}

fn status_failure(response: RawResponse) -> Failure {
    tracing::warn!("Health check returned status {}", response.status);
    Failure::new(ErrorKind::ServiceUnreachable(ProbeFailure::Status {
        status: response.status,
        detail: error_detail(&response.body),
    }))
}
