//! Extraction modes and dispatch

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::ScraperConfig;
use crate::error::{Error, Result};
use crate::extraction::{self, DownloadedArchive, ResultSet};
use crate::fetch::Session;

/// The four supported scrape-and-report operations
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Release notes articles with title and editors
    WhatsNew,
    /// Documentation versions and their status
    LatestVersions,
    /// Download the A4 PDF documentation archive
    Download,
    /// PEP count per status
    Pep,
}

impl Mode {
    /// Every mode
    pub const ALL: [Mode; 4] = [Mode::WhatsNew, Mode::LatestVersions, Mode::Download, Mode::Pep];

    /// Command-line / form name
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }

    /// Every mode, sorted by name
    pub fn sorted() -> Vec<Mode> {
        let mut modes = Self::ALL.to_vec();
        modes.sort_by_key(|m| m.as_str());
        modes
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::generic(format!("Unknown mode: {s}")))
    }
}

/// What a mode produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rows for display or export
    Table(ResultSet),
    /// Archive written to disk
    Archive(DownloadedArchive),
}

/// Run one extraction mode to completion
#[instrument(skip(session, config))]
pub async fn run_mode(mode: Mode, session: &Session, config: &ScraperConfig) -> Result<Outcome> {
    let outcome = match mode {
        Mode::WhatsNew => Outcome::Table(extraction::whats_new(session, config).await?),
        Mode::LatestVersions => Outcome::Table(extraction::latest_versions(session, config).await?),
        Mode::Download => Outcome::Archive(extraction::download(session, config).await?),
        Mode::Pep => Outcome::Table(extraction::pep(session, config).await?),
    };

    match &outcome {
        Outcome::Table(results) => info!(%mode, rows = results.len(), "Mode finished"),
        Outcome::Archive(archive) => info!(%mode, path = %archive.path.display(), "Mode finished"),
    }
    Ok(outcome)
}
