//! Grade engine HTTP server.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use grade_engine::api::{AppState, create_router};
use grade_engine::config::ConfigLoader;
use grade_engine::gradebook::Gradebook;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_LOG_FILTER: &str = "grade_engine=info";

#[derive(Debug, Parser)]
#[command(name = "grade-engine", version, about = "Grade computation and aggregation service")]
struct Args {
    /// Configuration directory containing engine.yaml.
    #[arg(long, env = "GRADE_ENGINE_CONFIG", default_value = "./config/default")]
    config: PathBuf,

    /// Address to listen on; overrides the configured server address.
    #[arg(long, env = "GRADE_ENGINE_BIND")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ConfigLoader::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    let settings = config.settings();

    let default_filter = settings
        .logging
        .as_ref()
        .map(|l| l.filter.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    let bind_address = args
        .bind
        .or_else(|| settings.server.as_ref().map(|s| s.bind_address.clone()))
        .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

    let gradebook = Gradebook::from_config(&config).context("seeding the catalog")?;
    let app = create_router(AppState::new(gradebook));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("binding {}", bind_address))?;
    tracing::info!(
        service = %settings.service.name,
        version = %settings.service.version,
        address = %bind_address,
        "Grade engine listening"
    );

    axum::serve(listener, app).await.context("serving HTTP")?;
    Ok(())
}
