mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bioconvert_core::{load_config, metrics, validate_config};

use cli::{Cli, Commands};
use commands::Session;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Loading configuration from {:?}", cli.config);
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    validate_config(&config).context("Configuration validation failed")?;

    let session = Session::new(&config);

    match &cli.command {
        Commands::List => print!("{}", commands::list(&session)),
        Commands::Convert(args) => {
            if let Some(duration) = commands::convert(&session, args).await? {
                info!("Conversion done in {:.3} seconds", duration.as_secs_f64());
            }
        }
    }

    if cli.metrics {
        print!("{}", metrics::encode_metrics());
    }

    Ok(())
}
