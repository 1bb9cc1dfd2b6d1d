use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wellness_core::{build_orchestrator, config::Config, http};

#[derive(Parser, Debug)]
#[command(author, version, about = "Nurse wellness scoring and coaching service", long_about = None)]
struct Args {
    /// TOML config path (falls back to WELLNESS_CONFIG, then wellness.toml)
    #[arg(long)]
    config: Option<String>,

    /// Override the HTTP bind address, e.g. 0.0.0.0:8790
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match args.config.as_deref() {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;
    if let Some(bind) = args.bind {
        config.server.http_bind = bind;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.runtime.log_level))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!(
        "Configuration loaded: provider={}, model={}, attempts={}, bind={}",
        config.generation.provider,
        config.generation.model,
        config.generation.max_attempts,
        config.server.http_bind
    );

    let orchestrator = build_orchestrator(&config)?;
    let state = http::AppState::new(Arc::new(config), orchestrator);
    http::start_http_server(state).await
}
