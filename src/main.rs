//! Husk CLI entry point.

use anyhow::Result;
use clap::Parser;
use husk::cli::{commands, Cli, Commands};
use husk::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = settings.general.effective_log_level(cli.verbose);

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("husk={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match &cli.command {
        Commands::Chunk { file, duration } => {
            commands::run_chunk(file, *duration, &settings)?;
        }

        Commands::Prepare {
            input,
            output,
            file,
            duration,
        } => {
            commands::run_prepare(input.clone(), output.clone(), file, *duration, settings).await?;
        }

        Commands::Index { corpus, clear } => {
            commands::run_index(corpus.clone(), *clear, settings).await?;
        }

        Commands::Ask {
            question,
            cag,
            corpus,
            model,
        } => {
            commands::run_ask(question, *cag, corpus.clone(), model.clone(), settings).await?;
        }

        Commands::List => {
            commands::run_list(settings).await?;
        }

        Commands::Serve {
            host,
            port,
            no_index,
        } => {
            commands::run_serve(host.clone(), *port, *no_index, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
