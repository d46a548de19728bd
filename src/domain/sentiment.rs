use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sentiment label attached to articles by the service.
///
/// The service is not consistent about casing, so both `positive` and
/// `POSITIVE` are accepted. Labels this client does not know about decode
/// as [`Sentiment::Unknown`] instead of failing the whole response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[serde(alias = "POSITIVE", alias = "Positive")]
    Positive,
    #[default]
    #[serde(alias = "NEUTRAL", alias = "Neutral")]
    Neutral,
    #[serde(alias = "NEGATIVE", alias = "Negative")]
    Negative,
    #[serde(other)]
    Unknown,
}

impl Sentiment {
    /// Query parameter value understood by the service.
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!(
                "Invalid sentiment: {}. Use positive, neutral or negative",
                other
            )),
        }
    }
}
