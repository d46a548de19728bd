//! Resilient client for the news generation service.
//!
//! ```text
//! NewsClient → health probe → retry loop → timeout-bound executor → Transport
//!                      ↘ failures → classify → Failure
//! ```
//!
//! Every operation returns an [`Outcome`]: either the decoded value or a
//! classified [`Failure`] whose `message` can be shown to the user as is.

pub mod classify;
pub mod executor;
pub mod health;
pub mod outcome;
pub mod request;
pub mod retry;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use executor::Executor;
pub use outcome::{ErrorKind, Failure, Outcome, ProbeFailure};
pub use request::{Method, RequestSpec};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, RawResponse, Transport, TransportError};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::{resolve_base_url, ClientConfig, SettingsStore};
use crate::domain::{Article, GeneratedContent, Sentiment};

pub const FETCH_PATH: &str = "/api/articles/fetch";
pub const ARTICLES_PATH: &str = "/api/articles";
pub const GENERATED_PATH: &str = "/api/generated";
pub const DEFAULT_LANGUAGE: &str = "en";

/// Parameters of an article fetch.
///
/// `feed_urls` and `languages` are sent in the given order, duplicates
/// included; the service attributes articles to feeds by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub feed_urls: Vec<String>,
    pub languages: Vec<String>,
    pub limit: u32,
    pub sentiment: Option<Sentiment>,
}

impl ArticleQuery {
    pub fn new<F, L>(feed_urls: F, languages: L, limit: u32) -> Self
    where
        F: IntoIterator,
        F::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            feed_urls: feed_urls.into_iter().map(Into::into).collect(),
            languages: languages.into_iter().map(Into::into).collect(),
            limit,
            sentiment: None,
        }
    }

    pub fn sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Local checks; a failure here means nothing is sent.
    pub fn validate(&self) -> Outcome<()> {
        if self.feed_urls.is_empty() {
            return Err(Failure::validation("At least one feed URL is required"));
        }
        if self.languages.is_empty() {
            return Err(Failure::validation("At least one language is required"));
        }
        if self.limit == 0 {
            return Err(Failure::validation("Limit must be a positive number"));
        }
        Ok(())
    }

    fn to_request(&self, config: &ClientConfig) -> RequestSpec {
        let spec = RequestSpec::get(FETCH_PATH)
            .params("feed_urls", self.feed_urls.iter().cloned())
            .params("languages", self.languages.iter().cloned())
            .param("limit", self.limit.to_string())
            .timeout(config.request_timeout());
        // `Unknown` only exists to tolerate new labels in responses; it is
        // not a filter the service accepts.
        match self.sentiment {
            Some(Sentiment::Unknown) | None => spec,
            Some(sentiment) => spec.param("sentiment", sentiment.as_str()),
        }
    }
}

/// Public entry point to the service.
///
/// The base URL is resolved from the settings store on every call, so a
/// changed override applies to the next request without rebuilding.
#[derive(Clone)]
pub struct NewsClient {
    transport: Arc<dyn Transport>,
    settings: Arc<dyn SettingsStore>,
    config: ClientConfig,
}

impl NewsClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: Arc<dyn SettingsStore>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            settings,
            config,
        }
    }

    pub fn base_url(&self) -> String {
        resolve_base_url(self.settings.as_ref())
    }

    fn executor(&self, cancel: CancellationToken) -> Executor {
        Executor::new(self.transport.clone(), self.base_url(), cancel)
    }

    pub async fn fetch_articles(&self, query: &ArticleQuery) -> Outcome<Vec<Article>> {
        self.fetch_articles_cancellable(query, CancellationToken::new())
            .await
    }

    /// Fetch generated articles: validate, probe, then the main request
    /// under the retry policy.
    pub async fn fetch_articles_cancellable(
        &self,
        query: &ArticleQuery,
        cancel: CancellationToken,
    ) -> Outcome<Vec<Article>> {
        query.validate()?;

        let executor = self.executor(cancel);
        let spec = query.to_request(&self.config);
        tracing::debug!(
            "Fetching up to {} articles from {} feed(s) via {}",
            query.limit,
            query.feed_urls.len(),
            executor.base_url()
        );

        if self.config.health_check {
            health::check_reachable(&executor, self.config.health_timeout()).await?;
        }

        let response = executor
            .with_retry(&spec, &self.config.retry_policy())
            .await?;
        let articles: Vec<Article> = classify::decode(&response)?;

        tracing::info!("Fetched {} articles", articles.len());
        Ok(articles)
    }

    /// Single attempt, no health probe.
    pub async fn get_article_by_id(&self, article_id: &str) -> Outcome<Article> {
        let id = non_blank(article_id, "Article id is required")?;
        let spec = RequestSpec::get(ARTICLES_PATH)
            .segment(id)
            .timeout(self.config.lookup_timeout());
        self.lookup(&spec).await
    }

    /// Single attempt, no health probe. `language` defaults to `en`.
    pub async fn get_generated_content(
        &self,
        article_id: &str,
        language: Option<&str>,
    ) -> Outcome<GeneratedContent> {
        let id = non_blank(article_id, "Article id is required")?;
        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);
        let spec = RequestSpec::get(GENERATED_PATH)
            .segment(id)
            .param("language", language)
            .timeout(self.config.lookup_timeout());
        self.lookup(&spec).await
    }

    /// Ask the service whether it is up, using the same probe as
    /// [`fetch_articles`](Self::fetch_articles).
    pub async fn check_health(&self) -> Outcome<()> {
        let executor = self.executor(CancellationToken::new());
        health::check_reachable(&executor, self.config.health_timeout()).await
    }

    async fn lookup<T: serde::de::DeserializeOwned>(&self, spec: &RequestSpec) -> Outcome<T> {
        let executor = self.executor(CancellationToken::new());
        let response = executor.execute_checked(spec, spec.timeout).await?;
        classify::decode(&response)
    }
}

fn non_blank<'a>(value: &'a str, reason: &str) -> Outcome<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(Failure::validation(reason))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_base_url, MemorySettings, API_URL_KEY};
    use crate::client::testing::{MockTransport, Step};
    use tokio_test::{assert_err, assert_ok};

    const ARTICLES: &str = r#"[
        {"id": "a1", "title": "First", "summary": "s", "sentiment": "positive",
         "source": "A", "published_date": "2025-01-01T00:00:00",
         "generated_contents": [{"article_id": "a1", "title": "t", "summary": "s",
            "content": "c", "language": "en", "sentiment": "positive",
            "sentiment_score": 0.5, "generated_date": "2025-01-01T00:00:01"}]},
        {"id": "a2", "title": "Second", "summary": "s", "sentiment": "neutral",
         "source": "B", "published_date": "2025-01-02T00:00:00",
         "generated_contents": []}
    ]"#;

    fn client(mock: Arc<MockTransport>) -> NewsClient {
        let settings = MemorySettings::with(API_URL_KEY, "http://service.test/");
        NewsClient::new(mock, Arc::new(settings), ClientConfig::default())
    }

    fn default_host() -> String {
        url::Url::parse(default_base_url())
            .unwrap()
            .host_str()
            .unwrap()
            .to_string()
    }

    fn query() -> ArticleQuery {
        ArticleQuery::new(["https://a"], ["en"], 5)
    }

    #[tokio::test]
    async fn test_empty_feeds_fail_without_network() {
        let mock = MockTransport::new().healthy().into_arc();
        let c = client(mock.clone());

        let failure = c
            .fetch_articles(&ArticleQuery::new(Vec::<String>::new(), ["en"], 5))
            .await
            .unwrap_err();
        assert!(matches!(failure.kind, ErrorKind::Validation(_)));
        assert_eq!(failure.message, "At least one feed URL is required");

        let failure = c
            .fetch_articles(&ArticleQuery::new(["https://a"], Vec::<String>::new(), 5))
            .await
            .unwrap_err();
        assert!(matches!(failure.kind, ErrorKind::Validation(_)));

        assert_err!(c.fetch_articles(&ArticleQuery::new(["https://a"], ["en"], 0)).await);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_articles_success() {
        let mock = MockTransport::new()
            .healthy()
            .on(FETCH_PATH, Step::ok(ARTICLES))
            .into_arc();
        let articles = assert_ok!(client(mock.clone()).fetch_articles(&query()).await);

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].id, "a1");
        assert_eq!(articles[1].id, "a2");
        assert!(articles[1].generated_for("en").is_none());

        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].path(), "/health");
        assert_eq!(calls[1].path(), FETCH_PATH);
    }

    #[tokio::test]
    async fn test_query_string_encoding_and_order() {
        let mock = MockTransport::new()
            .healthy()
            .on(FETCH_PATH, Step::ok("[]"))
            .into_arc();
        let c = client(mock.clone());

        c.fetch_articles(&query()).await.unwrap();
        let url = mock.calls().pop().unwrap();
        assert_eq!(
            url.query(),
            Some("feed_urls=https%3A%2F%2Fa&languages=en&limit=5")
        );

        let q = ArticleQuery::new(["https://z", "https://a", "https://z"], ["te", "en"], 3)
            .sentiment(Sentiment::Negative);
        c.fetch_articles(&q).await.unwrap();
        let url = mock.calls().pop().unwrap();
        assert_eq!(
            url.query(),
            Some(
                "feed_urls=https%3A%2F%2Fz&feed_urls=https%3A%2F%2Fa&feed_urls=https%3A%2F%2Fz\
                 &languages=te&languages=en&limit=3&sentiment=negative"
            )
        );
    }

    #[tokio::test]
    async fn test_unknown_sentiment_not_sent() {
        let mock = MockTransport::new()
            .healthy()
            .on(FETCH_PATH, Step::ok("[]"))
            .into_arc();
        let q = query().sentiment(Sentiment::Unknown);
        client(mock.clone()).fetch_articles(&q).await.unwrap();

        let url = mock.calls().pop().unwrap();
        assert_eq!(
            url.query(),
            Some("feed_urls=https%3A%2F%2Fa&languages=en&limit=5")
        );
    }

    #[tokio::test]
    async fn test_health_failure_short_circuits() {
        let mock = MockTransport::new()
            .on("/health", Step::refused())
            .on(FETCH_PATH, Step::ok(ARTICLES))
            .into_arc();
        let failure = client(mock.clone())
            .fetch_articles(&query())
            .await
            .unwrap_err();

        assert_eq!(
            failure.kind,
            ErrorKind::ServiceUnreachable(ProbeFailure::NoConnection)
        );
        assert_eq!(mock.calls_to(FETCH_PATH), 0);
    }

    #[tokio::test]
    async fn test_health_check_can_be_disabled() {
        let mock = MockTransport::new()
            .on(FETCH_PATH, Step::ok("[]"))
            .into_arc();
        let config = ClientConfig {
            health_check: false,
            ..Default::default()
        };
        let c = NewsClient::new(mock.clone(), Arc::new(MemorySettings::new()), config);

        c.fetch_articles(&query()).await.unwrap();
        assert_eq!(mock.calls_to("/health"), 0);
        assert_eq!(mock.calls()[0].host_str(), Some(default_host().as_str()));
    }

    #[tokio::test]
    async fn test_malformed_envelope() {
        let mock = MockTransport::new()
            .healthy()
            .on(FETCH_PATH, Step::ok(r#"{"articles": []}"#))
            .into_arc();
        let failure = client(mock.clone())
            .fetch_articles(&query())
            .await
            .unwrap_err();
        assert_eq!(failure.kind, ErrorKind::MalformedResponse);
        // Terminal: no retry
        assert_eq!(mock.calls_to(FETCH_PATH), 1);
    }

    #[tokio::test]
    async fn test_server_detail_surfaces() {
        let mock = MockTransport::new()
            .healthy()
            .on(
                FETCH_PATH,
                Step::status(404, r#"{"detail":"No articles found from the provided feeds"}"#),
            )
            .into_arc();
        let failure = client(mock).fetch_articles(&query()).await.unwrap_err();
        assert_eq!(failure.message, "No articles found from the provided feeds");
        assert_eq!(
            failure.kind,
            ErrorKind::Http {
                status: 404,
                detail: Some("No articles found from the provided feeds".into())
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_retried_once() {
        let mock = MockTransport::new()
            .healthy()
            .on(FETCH_PATH, Step::refused())
            .on(FETCH_PATH, Step::ok(ARTICLES))
            .into_arc();
        let articles = client(mock.clone())
            .fetch_articles(&query())
            .await
            .unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(mock.calls_to(FETCH_PATH), 2);
        // Health probe is not repeated per attempt
        assert_eq!(mock.calls_to("/health"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_fetch() {
        let mock = MockTransport::new()
            .healthy()
            .on(FETCH_PATH, Step::Hang)
            .into_arc();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
            trigger.cancel();
        });

        let failure = client(mock.clone())
            .fetch_articles_cancellable(&query(), cancel)
            .await
            .unwrap_err();
        assert_eq!(failure.kind, ErrorKind::Cancelled);
        assert_eq!(mock.calls_to(FETCH_PATH), 1);
    }

    #[tokio::test]
    async fn test_get_article_by_id_is_idempotent() {
        let mock = MockTransport::new()
            .on(
                "/api/articles/a1",
                Step::ok(r#"{"id": "a1", "title": "First", "generated_contents": []}"#),
            )
            .into_arc();
        let c = client(mock.clone());

        let first = c.get_article_by_id("a1").await;
        let second = c.get_article_by_id("a1").await;
        assert_eq!(first, second);
        assert_eq!(first.unwrap().title, "First");
        // No health probe, no retries
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_get_article_by_id_not_found() {
        let mock = MockTransport::new()
            .on("/api/articles/nope", Step::status(404, "Not Found"))
            .into_arc();
        let failure = client(mock).get_article_by_id("nope").await.unwrap_err();
        assert_eq!(
            failure.kind,
            ErrorKind::Http {
                status: 404,
                detail: None
            }
        );
    }

    #[tokio::test]
    async fn test_get_article_blank_id() {
        let mock = MockTransport::new().into_arc();
        let failure = client(mock.clone())
            .get_article_by_id("  ")
            .await
            .unwrap_err();
        assert!(matches!(failure.kind, ErrorKind::Validation(_)));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_generated_content_language() {
        let body = r#"{"article_id": "a1", "title": "t", "summary": "s", "content": "c",
                       "language": "hi", "sentiment": "neutral", "sentiment_score": 0.0,
                       "generated_date": "2025-01-01T00:00:00"}"#;
        let mock = MockTransport::new()
            .on("/api/generated/a1", Step::ok(body))
            .into_arc();
        let c = client(mock.clone());

        let content = c.get_generated_content("a1", Some("hi")).await.unwrap();
        assert_eq!(content.language, "hi");
        c.get_generated_content("a1", None).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].query(), Some("language=hi"));
        assert_eq!(calls[1].query(), Some("language=en"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_is_not_retried() {
        let mock = MockTransport::new()
            .on("/api/articles/a1", Step::refused())
            .into_arc();
        let failure = client(mock.clone())
            .get_article_by_id("a1")
            .await
            .unwrap_err();
        assert_eq!(failure.kind, ErrorKind::NetworkUnreachable);
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_base_url_read_per_call() {
        let mock = MockTransport::new()
            .on("/api/articles/a1", Step::ok(r#"{"id":"a1"}"#))
            .into_arc();
        let settings = Arc::new(MemorySettings::new());
        let c = NewsClient::new(mock.clone(), settings.clone(), ClientConfig::default());

        c.get_article_by_id("a1").await.unwrap();
        settings.set(API_URL_KEY, "http://elsewhere.test:9000").unwrap();
        c.get_article_by_id("a1").await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].host_str(), Some(default_host().as_str()));
        assert_eq!(calls[1].host_str(), Some("elsewhere.test"));
    }
}
