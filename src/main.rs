//! Python docs scraper CLI
//!
//! Runs one extraction mode and presents the result.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use pydocs_scraper::fetch::Session;
use pydocs_scraper::output::{self, OutputFormat};
use pydocs_scraper::{run_mode, telemetry, Mode, Outcome, ScraperConfig};

/// Python documentation scraper
#[derive(Parser, Debug)]
#[command(name = "pydocs")]
#[command(version)]
#[command(about = "Scrape release notes, versions, PEP statuses and the PDF archive from docs.python.org")]
struct Args {
    /// Extraction mode
    #[arg(value_enum)]
    mode: Mode,

    /// Clear the HTTP cache before running
    #[arg(short, long)]
    clear_cache: bool,

    /// How to present the results; omitted means not displayed
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

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

    info!("Parser started");
    info!(
        mode = %args.mode,
        clear_cache = args.clear_cache,
        output = ?args.output,
        "Command line arguments"
    );

    if let Err(e) = run(&args, &config).await {
        error!(error = %e, "Parser failed");
        return Err(e.into());
    }

    info!("Parser finished");
    Ok(())
}

async fn run(args: &Args, config: &ScraperConfig) -> pydocs_scraper::Result<()> {
    let session = Session::from_config(config)?;
    if args.clear_cache {
        session.clear_cache().await?;
        info!("HTTP cache cleared");
    }

    match run_mode(args.mode, &session, config).await? {
        Outcome::Table(results) => {
            output::present(&results, args.output, args.mode, &config.results_path())?;
        }
        Outcome::Archive(archive) => {
            info!(path = %archive.path.display(), size = archive.size, "Archive downloaded");
        }
    }
    Ok(())
}
