use crate::app::{AppContext, NewsroomError, Result, UiState};
use crate::client::{ArticleQuery, ErrorKind};
use crate::config::{default_base_url, SettingsStore, API_URL_KEY};
use crate::domain::{Article, GeneratedContent, Sentiment};

pub async fn fetch_articles(
    ctx: &AppContext,
    state: &mut UiState,
    feeds: Vec<String>,
    languages: Vec<String>,
    limit: u32,
    sentiment: Option<Sentiment>,
    json: bool,
) -> Result<()> {
    let mut query = ArticleQuery::new(feeds, languages, limit);
    if let Some(sentiment) = sentiment {
        query = query.sentiment(sentiment);
    }

    eprintln!("Generating articles via {} ...", ctx.client.base_url());
    state.track(ctx.client.fetch_articles(&query)).await;

    if let Some(error) = &state.error {
        return Err(NewsroomError::Other(error.clone()));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&state.articles)?);
        return Ok(());
    }

    if state.articles.is_empty() {
        println!("No articles");
        return Ok(());
    }

    for article in &state.articles {
        print_article(article, &query.languages);
    }
    println!("{} articles", state.articles.len());
    Ok(())
}

pub async fn show_article(ctx: &AppContext, id: &str, json: bool) -> Result<()> {
    let article = ctx.client.get_article_by_id(id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&article)?);
    } else {
        let languages: Vec<String> = article.languages().into_iter().map(String::from).collect();
        print_article(&article, &languages);
    }
    Ok(())
}

pub async fn show_generated(ctx: &AppContext, id: &str, language: &str, json: bool) -> Result<()> {
    let content = ctx.client.get_generated_content(id, Some(language)).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&content)?);
    } else {
        print_generated(&content);
    }
    Ok(())
}

pub async fn check_health(ctx: &AppContext) -> Result<()> {
    let base_url = ctx.client.base_url();
    match ctx.client.check_health().await {
        Ok(()) => println!("{} is reachable", base_url),
        Err(failure) => {
            if matches!(failure.kind, ErrorKind::ServiceUnreachable(_)) {
                eprintln!("Hint: set the API URL with `newsroom config set-url <URL>`");
            }
            return Err(failure.into());
        }
    }
    Ok(())
}

pub fn get_url(ctx: &AppContext) -> Result<()> {
    let source = if ctx.settings.get(API_URL_KEY).is_some() {
        "override"
    } else {
        "default"
    };
    println!("{} ({})", ctx.client.base_url(), source);
    Ok(())
}

pub fn set_url(ctx: &AppContext, url: &str) -> Result<()> {
    let trimmed = parse_api_url(url)?;
    ctx.settings.set(API_URL_KEY, trimmed)?;
    println!("API URL set to {}", ctx.client.base_url());
    Ok(())
}

/// Accept only absolute http(s) URLs. `localhost:8000` parses with
/// `localhost` as its scheme and cannot be used as a base.
fn parse_api_url(url: &str) -> Result<&str> {
    let trimmed = url.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| NewsroomError::Other(format!("Invalid URL '{}': {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Ok(trimmed),
        _ => Err(NewsroomError::Other(format!(
            "Invalid URL '{}': expected an http:// or https:// address",
            trimmed
        ))),
    }
}

pub fn clear_url(ctx: &AppContext) -> Result<()> {
    ctx.settings.remove(API_URL_KEY)?;
    println!("API URL reset to default {}", default_base_url());
    Ok(())
}

fn print_article(article: &Article, languages: &[String]) {
    let date = article
        .published_at()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "          ".to_string());

    println!("{} [{}] {}", date, article.sentiment, article.display_title());
    if !article.source.is_empty() {
        println!("  {}", article.source);
    }
    if !article.summary.is_empty() {
        println!("  {}", article.summary);
    }

    for language in languages {
        match article.generated_for(language) {
            Some(content) => println!("  [{}] {}", content.language, content.title),
            None => println!("  [{}] (not generated)", language),
        }
    }
    println!();
}

fn print_generated(content: &GeneratedContent) {
    println!(
        "[{}] {} ({}, {:.2})",
        content.language, content.title, content.sentiment, content.sentiment_score
    );
    if !content.summary.is_empty() {
        println!("\n{}", content.summary);
    }
    if !content.content.is_empty() {
        println!("\n{}", content.content);
    }
}
