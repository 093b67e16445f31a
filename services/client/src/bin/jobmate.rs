//! services/client/src/bin/jobmate.rs

use clap::Parser;
use client_lib::{cli::Cli, commands::App, config::Config, error::ClientError};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Parse arguments, load configuration & set up logging ---
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_string();
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded.");

    // --- 2. Wire the adapters and run the command ---
    let app = App::new(&config)?;
    if let Err(e) = app.run(cli.command).await {
        error!("command failed: {}", e);
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }

    Ok(())
}
