use std::fmt;

use thiserror::Error;

/// Result of one request-layer operation.
///
/// Every path through the client ends in one of these; nothing below the
/// façade surfaces a panic or an unclassified error.
pub type Outcome<T> = std::result::Result<T, Failure>;

/// Why the health probe declared the service unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The probe did not answer within its timeout.
    TimedOut,
    /// No connection could be made (DNS, refused, TLS).
    NoConnection,
    /// The service answered with a non-2xx status.
    Status { status: u16, detail: Option<String> },
}

/// Closed taxonomy of request failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input was rejected locally; no request was sent.
    Validation(String),
    /// The per-attempt timer fired before the call settled.
    Timeout,
    /// The caller cancelled the call.
    Cancelled,
    /// Connection-level failure (DNS, refused, TLS).
    NetworkUnreachable,
    /// The health pre-check failed.
    ServiceUnreachable(ProbeFailure),
    /// Non-2xx response, with the server's detail message when it sent one.
    Http { status: u16, detail: Option<String> },
    /// 2xx response whose body is not the expected envelope.
    MalformedResponse,
    /// Anything else, with the raw message preserved.
    Unknown(String),
}

impl ErrorKind {
    /// Transient failures that are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::NetworkUnreachable)
    }

    /// Short stable name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Validation(_) => "validation",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::NetworkUnreachable => "network_unreachable",
            ErrorKind::ServiceUnreachable(_) => "service_unreachable",
            ErrorKind::Http { .. } => "http",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::Unknown(_) => "unknown",
        }
    }

    /// Message suitable for showing to the user verbatim.
    pub fn human_message(&self) -> String {
        match self {
            ErrorKind::Validation(reason) => reason.clone(),
            ErrorKind::Timeout => "Request timed out. The API server might be unavailable or \
                                   taking too long to respond. Please check your API settings."
                .to_string(),
            ErrorKind::Cancelled => "Request was cancelled.".to_string(),
            ErrorKind::NetworkUnreachable => "Network error: Could not connect to the API \
                                              server. Please check if the server is running \
                                              and accessible."
                .to_string(),
            ErrorKind::ServiceUnreachable(ProbeFailure::TimedOut) => {
                "API server is not responding. The request timed out. Please check if the \
                 server is running and accessible."
                    .to_string()
            }
            ErrorKind::ServiceUnreachable(ProbeFailure::NoConnection) => {
                "Cannot connect to API server. Please check your API URL settings and ensure \
                 the server is running."
                    .to_string()
            }
            ErrorKind::ServiceUnreachable(ProbeFailure::Status {
                detail: Some(detail),
                ..
            }) => detail.clone(),
            ErrorKind::ServiceUnreachable(ProbeFailure::Status {
                status,
                detail: None,
            }) => format!("API server returned status {}", status),
            ErrorKind::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ErrorKind::Http {
                status,
                detail: None,
            } => format!("Request failed with status {}", status),
            ErrorKind::MalformedResponse => {
                "The API server returned a response that could not be understood.".to_string()
            }
            ErrorKind::Unknown(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Http { status, .. } => write!(f, "http({})", status),
            other => f.write_str(other.name()),
        }
    }
}

/// A classified failure: the kind, a user-facing message and whether the
/// retry orchestrator may try again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl Failure {
    pub fn new(kind: ErrorKind) -> Self {
        let message = kind.human_message();
        let retryable = kind.is_transient();
        Self {
            kind,
            message,
            retryable,
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation(reason.into()))
    }

    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled)
    }

    pub fn malformed() -> Self {
        Self::new(ErrorKind::MalformedResponse)
    }
}

impl From<ErrorKind> for Failure {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}
