use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Sentiment;

/// Content the service generated from an article in one language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    #[serde(default)]
    pub article_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub sentiment_score: f64,
    #[serde(default)]
    pub generated_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub generated_contents: Vec<GeneratedContent>,
}

impl Article {
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    /// Parse `published_date`, which the service sends either as RFC 3339
    /// or as a naive ISO timestamp (assumed UTC).
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_date.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    /// Generated content for `language`, if the service produced any.
    ///
    /// The service may return fewer languages than were requested.
    pub fn generated_for(&self, language: &str) -> Option<&GeneratedContent> {
        self.generated_contents
            .iter()
            .find(|c| c.language.eq_ignore_ascii_case(language))
    }

    /// Language codes present in the generated contents, in response order.
    pub fn languages(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for content in &self.generated_contents {
            if !seen.contains(&content.language.as_str()) {
                seen.push(&content.language);
            }
        }
        seen
    }
}
