//! Research API server binary
//!
//! Run with: cargo run -p research-api --bin research-api-server

use clap::Parser;
use research_api::{
    config::ResearchConfig,
    providers::{LlmProvider, OpenAiClient},
    server::ResearchServer,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "research-api-server", version, about = "Research query service")]
struct Args {
    /// TOML configuration file (environment variables still apply on top)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the bind host
    #[arg(long)]
    host: Option<String>,
    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "research_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ResearchConfig::from_file(path)?,
        None => ResearchConfig::from_env()?,
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Generative backend: {}", config.generative_enabled());
    tracing::info!("  - Model: {}", config.llm.model);
    tracing::info!("  - Latency mode: {:?}", config.latency.mode);

    if config.generative_enabled() {
        let client = OpenAiClient::new(&config.llm)?;
        tracing::info!("Checking generative backend at {}...", config.llm.base_url);
        match client.health_check().await {
            Ok(true) => tracing::info!("Generative backend is reachable"),
            _ => tracing::warn!(
                "Generative backend not reachable at {}, requests will fall back until it is",
                config.llm.base_url
            ),
        }
    }

    let server = ResearchServer::new(config)?;
    tracing::info!("Research endpoint: POST http://{}/research", server.address());

    server.start().await?;

    Ok(())
}
