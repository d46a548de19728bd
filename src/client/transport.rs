use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::app::Result;
use crate::client::request::Method;

/// A fully-read HTTP response. Any status code, including non-2xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Low-level failure reported by a transport, before classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, refused connection, TLS handshake.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The transport's own timer fired.
    #[error("transport timed out: {0}")]
    TimedOut(String),

    /// The call observed its cancellation token.
    #[error("request aborted")]
    Aborted,

    #[error("{0}")]
    Other(String),
}

/// Sends a single request and reads the whole body.
///
/// Implementations should stop work when `cancel` fires; the executor also
/// drops the returned future on timeout, which aborts any in-flight I/O.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        url: Url,
        cancel: CancellationToken,
    ) -> std::result::Result<RawResponse, TransportError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build the reqwest client. Timeouts are enforced by the executor, so
    /// none is configured here.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(concat!("newsroom/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_timeout() {
        TransportError::TimedOut(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: Url,
        cancel: CancellationToken,
    ) -> std::result::Result<RawResponse, TransportError> {
        let request = match method {
            Method::Get => self.client.get(url),
        };

        let call = async {
            let response = request
                .header(reqwest::header::ACCEPT, "application/json")
                .send()
                .await
                .map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();
            Ok::<_, TransportError>(RawResponse { status, body })
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Aborted),
            result = call => result,
        }
    }
}
