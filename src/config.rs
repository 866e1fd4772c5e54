//! Scraper configuration
//!
//! Upstream URLs, local directories, cache backend and HTTP client settings.
//! Every field has a default, so a config file only needs the keys it wants
//! to override:
//!
//! ```toml
//! base_dir = "/var/lib/pydocs"
//! request_timeout_secs = 10
//! pep_layout = "plain-table"
//!
//! [cache]
//! backend = "memory"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::extraction::pep::PepLayout;

/// Main documentation page
pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";

/// "What's new" index page
pub const WHATS_NEW_URL: &str = "https://docs.python.org/3/whatsnew/";

/// Downloads page listing the documentation archives
pub const DOWNLOADS_URL: &str = "https://docs.python.org/3/download.html";

/// PEP index
pub const PEP_URL: &str = "https://peps.python.org/";

/// Where the response cache lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Process-local, lost on exit
    Memory,
    /// One file per URL under `cache.dir`
    #[default]
    Disk,
}

/// Response cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend selection
    pub backend: CacheBackend,
    /// Directory for the disk backend, relative to `base_dir`
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Disk,
            dir: PathBuf::from(".http_cache"),
        }
    }
}

/// Complete scraper configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Main documentation page (version sidebar)
    pub main_doc_url: String,
    /// Release notes index
    pub whats_new_url: String,
    /// Archive downloads page
    pub downloads_url: String,
    /// PEP index
    pub pep_url: String,
    /// Root for every relative directory below
    pub base_dir: PathBuf,
    /// Downloaded archives
    pub downloads_dir: PathBuf,
    /// CSV exports
    pub results_dir: PathBuf,
    /// Rolling log files
    pub log_dir: PathBuf,
    /// Response cache
    pub cache: CacheConfig,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// User-Agent header sent upstream
    pub user_agent: String,
    /// PEP index parse strategy
    pub pep_layout: PepLayout,
    /// Count PEP rows whose card status disagrees with a valid summary code
    pub tally_soft_mismatches: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            main_doc_url: MAIN_DOC_URL.to_string(),
            whats_new_url: WHATS_NEW_URL.to_string(),
            downloads_url: DOWNLOADS_URL.to_string(),
            pep_url: PEP_URL.to_string(),
            base_dir: PathBuf::from("."),
            downloads_dir: PathBuf::from("downloads"),
            results_dir: PathBuf::from("results"),
            log_dir: PathBuf::from("logs"),
            cache: CacheConfig::default(),
            request_timeout_secs: 30,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
            pep_layout: PepLayout::Auto,
            tally_soft_mismatches: false,
        }
    }
}

impl ScraperConfig {
    /// Load configuration from `path`, or defaults when no path is given.
    ///
    /// An explicitly named file that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file given, using defaults");
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = Self::from_toml_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Rebase every directory onto `dir`
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Directory for downloaded archives
    pub fn downloads_path(&self) -> PathBuf {
        self.base_dir.join(&self.downloads_dir)
    }

    /// Directory for CSV exports
    pub fn results_path(&self) -> PathBuf {
        self.base_dir.join(&self.results_dir)
    }

    /// Directory for log files
    pub fn log_path(&self) -> PathBuf {
        self.base_dir.join(&self.log_dir)
    }

    /// Directory for the disk cache backend
    pub fn cache_path(&self) -> PathBuf {
        self.base_dir.join(&self.cache.dir)
    }
}
