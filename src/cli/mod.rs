pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Sentiment;

#[derive(Parser)]
#[command(name = "newsroom")]
#[command(about = "Fetch AI-generated news articles from a newsroom service", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/newsroom/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Settings file holding the API URL (default: ~/.config/newsroom/settings.toml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate articles from one or more RSS feeds
    Fetch {
        /// RSS feed URL (repeat for several, order is kept)
        #[arg(short, long = "feed", required = true)]
        feeds: Vec<String>,

        /// Language to generate content in (repeat for several)
        #[arg(short, long = "language", default_values_t = ["en".to_string(), "hi".to_string(), "te".to_string()])]
        languages: Vec<String>,

        /// Maximum number of articles
        #[arg(short = 'n', long, default_value_t = 3)]
        limit: u32,

        /// Only keep articles with this sentiment (positive, neutral, negative)
        #[arg(short, long)]
        sentiment: Option<Sentiment>,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },
    /// Show a single article
    Article {
        id: String,

        #[arg(long)]
        json: bool,
    },
    /// Show generated content for an article in one language
    Generated {
        id: String,

        #[arg(short, long, default_value = "en")]
        language: String,

        #[arg(long)]
        json: bool,
    },
    /// Check whether the service is reachable
    Health,
    /// Manage the API URL setting
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the API URL in use
    GetUrl,
    /// Store an API URL override
    SetUrl { url: String },
    /// Remove the override and use the default URL
    ClearUrl,
}
