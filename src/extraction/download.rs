//! Documentation archive download
//!
//! Finds the A4 PDF zip on the downloads page and stores it under the
//! downloads directory, named after the last segment of its URL.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

use super::locate::{attr_of, locate, locate_in, Locator};
use crate::config::ScraperConfig;
use crate::error::{Error, FetchError, Result};
use crate::fetch::Session;

fn archive_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r".+pdf-a4\.zip$").expect("archive pattern is valid"))
}

/// An archive written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedArchive {
    /// Remote URL the archive came from
    pub url: String,
    /// Absolute local path
    pub path: PathBuf,
    /// Bytes written
    pub size: u64,
}

impl DownloadedArchive {
    /// File name component of the local path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Absolute URL of the A4 PDF archive on the downloads page
pub fn archive_link(html: &str, base: &Url) -> Result<Url> {
    let document = Html::parse_document(html);
    let main = locate_in(&document, &Locator::new("div").attr("role", "main"))?;
    let table = locate(main, &Locator::new("table").attr("class", "docutils"))?;
    let anchor = locate(
        table,
        &Locator::new("a").attr_regex("href", archive_pattern().clone()),
    )?;
    Ok(base.join(attr_of(anchor, "href")?)?)
}

/// Last non-empty path segment of `url`
pub fn archive_file_name(url: &Url) -> Result<String> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| Error::from(FetchError::InvalidUrl(format!("{url} has no file name"))))
}

fn absolute(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        Ok(dir.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(dir))
    }
}

/// Download the archive and return where it was written
#[instrument(skip_all)]
pub async fn download(session: &Session, config: &ScraperConfig) -> Result<DownloadedArchive> {
    let page = session
        .fetch(&config.downloads_url)
        .await
        .ok_or_else(|| FetchError::NoResponse(config.downloads_url.clone()))?;
    let archive_url = archive_link(&page.body, &Url::parse(&page.url)?)?;
    let file_name = archive_file_name(&archive_url)?;

    let downloads_dir = absolute(&config.downloads_path())?;
    tokio::fs::create_dir_all(&downloads_dir).await?;
    let path = downloads_dir.join(&file_name);

    let bytes = session.fetch_bytes(archive_url.as_str()).await?;
    tokio::fs::write(&path, &bytes).await?;
    info!(path = %path.display(), size = bytes.len(), "Archive downloaded and saved");

    Ok(DownloadedArchive {
        url: archive_url.to_string(),
        path,
        size: bytes.len() as u64,
    })
}
