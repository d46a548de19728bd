//! # newsroom
//!
//! Client for a news generation service that turns RSS feeds into
//! AI-written articles in several languages.
//!
//! ## Architecture
//!
//! ```text
//! UiState ← NewsClient → health probe → retry loop → executor → Transport
//! ```
//!
//! - [`client`]: the resilient request layer (timeouts, cancellation,
//!   retry with backoff, health pre-check, failure classification)
//! - [`config`]: tunables file and the persisted API URL setting
//! - [`app`]: error type, context wiring and the UI state store
//! - [`cli`]: command-line front end
//!
//! ## Quick Start
//!
//! ```bash
//! # Point at the service
//! newsroom config set-url http://127.0.0.1:8000
//!
//! # Generate three articles in English and Hindi
//! newsroom fetch -f https://feeds.bbci.co.uk/news/rss.xml -l en -l hi -n 3
//!
//! # Read one generated article
//! newsroom generated <ID> --language hi
//! ```

/// Application context, errors and UI state.
///
/// - [`AppContext`](app::AppContext): wires settings, config and client
/// - [`UiState`](app::UiState): articles / loading / error for the front end
pub mod app;

/// Command-line interface using clap.
///
/// - `fetch -f <feed>... [-l <lang>...] [-n <limit>] [-s <sentiment>]`
/// - `article <id>`, `generated <id> [-l <lang>]`
/// - `health`
/// - `config get-url | set-url <url> | clear-url`
pub mod cli;

/// Request layer talking to the service.
///
/// - [`NewsClient`](client::NewsClient): the public operations
/// - [`Transport`](client::Transport): async trait for sending one request
/// - [`HttpTransport`](client::HttpTransport): reqwest-based implementation
/// - [`RetryPolicy`](client::RetryPolicy): attempts, backoff and timeouts
pub mod client;

/// Configuration management.
///
/// Loads tunables from `~/.config/newsroom/config.toml`; the API URL
/// override lives in `~/.config/newsroom/settings.toml`.
pub mod config;

/// Data shapes returned by the service.
///
/// - [`Article`](domain::Article)
/// - [`GeneratedContent`](domain::GeneratedContent)
/// - [`Sentiment`](domain::Sentiment)
pub mod domain;
