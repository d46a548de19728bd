use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsroom::app::{AppContext, UiState};
use newsroom::cli::{commands, Cli, Commands, ConfigAction};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config, cli.settings)?;
    let mut state = UiState::new();

    match cli.command {
        Commands::Fetch {
            feeds,
            languages,
            limit,
            sentiment,
            json,
        } => {
            commands::fetch_articles(&ctx, &mut state, feeds, languages, limit, sentiment, json)
                .await?;
        }
        Commands::Article { id, json } => {
            commands::show_article(&ctx, &id, json).await?;
        }
        Commands::Generated { id, language, json } => {
            commands::show_generated(&ctx, &id, &language, json).await?;
        }
        Commands::Health => {
            commands::check_health(&ctx).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::GetUrl => commands::get_url(&ctx)?,
            ConfigAction::SetUrl { url } => commands::set_url(&ctx, &url)?,
            ConfigAction::ClearUrl => commands::clear_url(&ctx)?,
        },
    }

    Ok(())
}
