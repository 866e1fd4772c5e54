//! Python docs scraper web front end
//!
//! Serves the mode selection form, the JSON API and the status endpoints.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use pydocs_scraper::handlers::{app_router, AppState};
use pydocs_scraper::{telemetry, ScraperConfig, Session};

/// Python docs scraper web front end
#[derive(Parser, Debug)]
#[command(name = "pydocs-web")]
#[command(version)]
#[command(about = "Web front end for the Python docs scraper")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Path to a TOML config file
    #[arg(long, env = "PYDOCS_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ScraperConfig::load(args.config.as_deref())?;
    let _guard = telemetry::init(args.verbose, &config.log_path())?;

    let session = Session::from_config(&config)?;
    let state = Arc::new(AppState::new(session, config));
    let app = app_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("pydocs-web listening on http://{addr}");

    axum::serve(listener, app).await.context("server shutdown")?;
    Ok(())
}
