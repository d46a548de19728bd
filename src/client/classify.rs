//! Maps raw request failures onto the [`ErrorKind`] taxonomy.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::client::outcome::{ErrorKind, Failure, Outcome};
use crate::client::transport::{RawResponse, TransportError};

/// A failure as observed, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// The executor's timer fired.
    TimerElapsed,
    /// The caller's cancellation token fired.
    CallerCancelled,
    Transport(TransportError),
    /// Non-2xx response.
    Status(RawResponse),
    /// 2xx response whose body did not decode.
    UndecodableBody(String),
}

/// Error envelope sent by the service: `{"detail": "..."}`, or a list of
/// validation entries each carrying a `msg`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Detail>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Detail {
    Text(String),
    Entries(Vec<DetailEntry>),
}

#[derive(Debug, Deserialize)]
struct DetailEntry {
    msg: String,
}

/// Extract the server's detail message from an error body.
///
/// Returns `None` for bodies that are not JSON, lack `detail`, or carry
/// an empty one.
pub fn error_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    let text = match parsed.detail? {
        Detail::Text(text) => text,
        Detail::Entries(entries) => entries
            .into_iter()
            .map(|e| e.msg)
            .collect::<Vec<_>>()
            .join("; "),
    };
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

pub fn classify(raw: RawFailure) -> ErrorKind {
    match raw {
        RawFailure::TimerElapsed => ErrorKind::Timeout,
        RawFailure::CallerCancelled => ErrorKind::Cancelled,
        RawFailure::Transport(TransportError::Connect(_)) => ErrorKind::NetworkUnreachable,
        RawFailure::Transport(TransportError::TimedOut(_)) => ErrorKind::Timeout,
        RawFailure::Transport(TransportError::Aborted) => ErrorKind::Cancelled,
        RawFailure::Transport(TransportError::Other(message)) => ErrorKind::Unknown(message),
        RawFailure::Status(response) => ErrorKind::Http {
            status: response.status,
            detail: error_detail(&response.body),
        },
        RawFailure::UndecodableBody(_) => ErrorKind::MalformedResponse,
    }
}

/// Turn a raw response into the 2xx response, or a classified failure.
pub fn ensure_success(response: RawResponse) -> Outcome<RawResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(classify(RawFailure::Status(response)).into())
    }
}

/// Decode a 2xx body as `T`, classifying decode errors as malformed.
pub fn decode<T: DeserializeOwned>(response: &RawResponse) -> Outcome<T> {
    serde_json::from_slice(&response.body).map_err(|e| {
        tracing::debug!("Response body did not decode: {}", e);
        Failure::from(classify(RawFailure::UndecodableBody(e.to_string())))
    })
}
