use std::future::Future;

use crate::client::Outcome;
use crate::domain::Article;

/// What the UI shows for the article list: the last fetched articles, a
/// loading flag, and the last error message.
///
/// Owned by a single writer. [`track`](Self::track) borrows the store
/// mutably for the whole call, so one owner cannot have two tracked fetches
/// in flight at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub articles: Vec<Article>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the previous result and mark a call as in flight.
    pub fn begin(&mut self) {
        self.articles.clear();
        self.error = None;
        self.is_loading = true;
    }

    /// Record the outcome of the call started by [`begin`](Self::begin).
    pub fn settle(&mut self, outcome: Outcome<Vec<Article>>) {
        match outcome {
            Ok(articles) => {
                self.articles = articles;
                self.error = None;
            }
            Err(failure) => {
                self.articles.clear();
                self.error = Some(failure.message);
            }
        }
        self.is_loading = false;
    }

    /// Run one fetch against this state: reset, await, record.
    pub async fn track<F>(&mut self, call: F) -> &Self
    where
        F: Future<Output = Outcome<Vec<Article>>>,
    {
        self.begin();
        let outcome = call.await;
        self.settle(outcome);
        self
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
