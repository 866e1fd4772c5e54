//! Documentation version listing
//!
//! Reads the "All versions" list from the sidebar of the main documentation
//! page and splits every entry into version number and status.

use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;
use tracing::{info, instrument};

use super::locate::{attr_of, locate_all, locate_in, text_of, Locator};
use super::table::ResultSet;
use crate::config::ScraperConfig;
use crate::error::{ExtractionError, FetchError, Result};
use crate::fetch::Session;

/// Column names
pub const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

/// Text that identifies the version list in the sidebar
pub const VERSIONS_MARKER: &str = "All versions";

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"Python (?P<version>\d\.\d+) \((?P<status>.*)\)")
            .expect("version pattern is valid")
    })
}

/// Split a label like `Python 3.9 (stable)` into `("3.9", "stable")`.
///
/// Labels without the pattern come back whole, with an empty status.
pub fn parse_version_label(text: &str) -> (String, String) {
    match version_pattern().captures(text) {
        Some(caps) => (caps["version"].to_string(), caps["status"].to_string()),
        None => (text.to_string(), String::new()),
    }
}

/// Parse the main documentation page into version rows
pub fn parse_versions(html: &str) -> Result<ResultSet> {
    let document = Html::parse_document(html);
    let sidebar = locate_in(
        &document,
        &Locator::new("div").attr("class", "sphinxsidebarwrapper"),
    )?;

    let list = locate_all(sidebar, &Locator::new("ul"))
        .into_iter()
        .find(|ul| text_of(*ul).contains(VERSIONS_MARKER))
        .ok_or_else(|| ExtractionError::NothingFound(format!("no list with {VERSIONS_MARKER:?}")))?;

    let mut results = ResultSet::new(HEADER);
    for anchor in locate_all(list, &Locator::new("a")) {
        let link = attr_of(anchor, "href")?;
        let (version, status) = parse_version_label(&text_of(anchor));
        results.push([link.to_string(), version, status])?;
    }
    Ok(results)
}

/// Version rows from the main documentation page
#[instrument(skip_all)]
pub async fn latest_versions(session: &Session, config: &ScraperConfig) -> Result<ResultSet> {
    let page = session
        .fetch(&config.main_doc_url)
        .await
        .ok_or_else(|| FetchError::NoResponse(config.main_doc_url.clone()))?;
    let results = parse_versions(&page.body)?;
    info!(versions = results.len(), "Version list parsed");
    Ok(results)
}
