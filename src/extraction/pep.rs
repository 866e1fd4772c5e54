//! PEP status tally
//!
//! Counts PEPs per status from the numerical index. Two page shapes are
//! understood:
//!
//! - **indexed**: `section#numerical-index` with a `tbody`; every row links to
//!   the PEP page, whose declared status is fetched and cross-checked against
//!   the one-letter code shown in the index;
//! - **plain table**: the first `table` on the page; the index code is counted
//!   directly, no PEP pages are fetched.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::locate::{attr_of, find_first, locate, locate_all, locate_in, text_of, Locator};
use super::progress::page_bar;
use super::table::ResultSet;
use super::tally::StatusTally;
use crate::config::ScraperConfig;
use crate::error::{ExtractionError, FetchError, Result, ValidationError};
use crate::fetch::Session;

/// Column names
pub const HEADER: [&str; 2] = ["Status", "Count"];

/// Which parse strategy to use for the PEP index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PepLayout {
    /// Probe the page for `section#numerical-index`
    #[default]
    Auto,
    /// Sectioned index with per-PEP cross-check
    Indexed,
    /// Bare first table, codes counted directly
    PlainTable,
}

/// Concrete page shape after probing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageShape {
    /// `section#numerical-index` present
    Indexed,
    /// Anything else
    PlainTable,
}

impl PepLayout {
    /// Settle `Auto` by looking at the page
    pub fn resolve(self, html: &str) -> PageShape {
        match self {
            PepLayout::Indexed => PageShape::Indexed,
            PepLayout::PlainTable => PageShape::PlainTable,
            PepLayout::Auto => {
                let document = Html::parse_document(html);
                match find_first(document.root_element(), &numerical_index()) {
                    Some(_) => PageShape::Indexed,
                    None => PageShape::PlainTable,
                }
            }
        }
    }
}

fn numerical_index() -> Locator {
    Locator::new("section").attr("id", "numerical-index")
}

/// Full statuses acceptable for a summary code
pub fn expected_statuses(code: &str) -> Option<&'static [&'static str]> {
    let statuses: &'static [&'static str] = match code {
        "A" => &["Active", "Accepted"],
        "D" => &["Deferred"],
        "F" => &["Final"],
        "P" => &["Provisional"],
        "R" => &["Rejected"],
        "S" => &["Superseded"],
        "W" => &["Withdrawn"],
        "" => &["Draft", "Active"],
        _ => return None,
    };
    Some(statuses)
}

/// Outcome of a failed cross-check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Code is valid but the PEP page declares a status outside its set
    Soft {
        /// Statuses the code allows
        expected: &'static [&'static str],
    },
    /// Code is unknown or malformed
    Hard(ValidationError),
}

/// Check a PEP page status against the index code.
///
/// A code longer than two chars is malformed: no status can match it. A
/// short code missing from the table is unknown. A known code whose page
/// declares another status is a soft mismatch.
pub fn cross_check(code: &str, status: &str, url: &str) -> std::result::Result<(), Mismatch> {
    if code.chars().count() > 2 {
        return Err(Mismatch::Hard(ValidationError::UnexpectedStatus {
            code: code.to_string(),
            status: status.to_string(),
            url: url.to_string(),
        }));
    }

    let Some(expected) = expected_statuses(code) else {
        return Err(Mismatch::Hard(ValidationError::UnknownStatusCode {
            code: code.to_string(),
            url: url.to_string(),
        }));
    };

    if expected.contains(&status) {
        Ok(())
    } else {
        Err(Mismatch::Soft { expected })
    }
}

/// Status code from an index cell such as `SF`: everything after the type letter
pub fn status_code(cell: &str) -> String {
    cell.trim().chars().skip(1).collect()
}

/// A row of the sectioned index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    /// Status code shown in the index
    pub code: String,
    /// Absolute URL of the PEP page
    pub detail_url: String,
}

/// Rows of the sectioned index
pub fn parse_indexed_rows(html: &str, base: &Url) -> Result<Vec<IndexRow>> {
    let document = Html::parse_document(html);
    let section = locate_in(&document, &numerical_index())?;
    let tbody = locate(section, &Locator::new("tbody"))?;

    let mut rows = Vec::new();
    for tr in locate_all(tbody, &Locator::new("tr")) {
        let code = status_code(&text_of(locate(tr, &Locator::new("td"))?));
        let anchor = locate(tr, &Locator::new("a").attr("class", "reference external"))?;
        let detail_url = base.join(attr_of(anchor, "href")?)?.to_string();
        rows.push(IndexRow { code, detail_url });
    }
    Ok(rows)
}

/// Status codes of the plain table layout, header row excluded
pub fn parse_plain_codes(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let table = locate_in(&document, &Locator::new("table"))?;
    let rows = locate_all(table, &Locator::new("tr"));

    let has_th = |tr: &ElementRef<'_>| find_first(*tr, &Locator::new("th")).is_some();
    let skip = usize::from(!rows.iter().any(has_th));

    Ok(rows
        .iter()
        .skip(skip)
        .filter(|tr| !has_th(*tr))
        .filter_map(|tr| find_first(*tr, &Locator::new("td")))
        .map(|td| status_code(&text_of(td)))
        .collect())
}

/// Status declared on a PEP page
pub fn parse_detail_status(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let fields = locate_in(&document, &Locator::new("dl").attr("class", "rfc2822"))?;
    let label = locate(fields, &Locator::new("dt").text("Status"))?;
    let value = label
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "dd")
        .ok_or_else(|| ExtractionError::ElementNotFound("<dd> after <dt> \"Status\"".to_string()))?;
    Ok(text_of(value).trim().to_string())
}

/// Tally codes of the plain table layout
pub fn tally_plain(html: &str) -> Result<StatusTally> {
    let mut tally = StatusTally::new();
    for code in parse_plain_codes(html)? {
        if code.is_empty() {
            continue;
        }
        tally.record(&code);
    }
    Ok(tally)
}

async fn tally_indexed(
    session: &Session,
    rows: Vec<IndexRow>,
    count_soft_mismatches: bool,
) -> Result<StatusTally> {
    let mut tally = StatusTally::new();
    let bar = page_bar(rows.len(), "PEP pages");
    for row in bar.wrap_iter(rows.into_iter()) {
        let Some(detail) = session.fetch(&row.detail_url).await else {
            warn!(url = %row.detail_url, "PEP page unavailable, not counted");
            continue;
        };
        let status = parse_detail_status(&detail.body)?;

        match cross_check(&row.code, &status, &row.detail_url) {
            Ok(()) => tally.record(&status),
            Err(Mismatch::Soft { expected }) => {
                info!(
                    url = %row.detail_url,
                    card_status = %status,
                    ?expected,
                    "Mismatched statuses"
                );
                if count_soft_mismatches {
                    tally.record(&status);
                }
            }
            Err(Mismatch::Hard(e)) => {
                warn!(error = %e, "Received an incorrect status");
            }
        }
    }
    bar.finish_and_clear();
    Ok(tally)
}

/// Count PEPs per status.
///
/// Labels depend on the page shape: the indexed layout tallies the full
/// status declared on each PEP page (`Final`, `Active`), the plain table
/// tallies the index code itself (`F`, `A`). Codes such as `A` stand for
/// more than one status, so they are not expanded.
#[instrument(skip_all)]
pub async fn pep(session: &Session, config: &ScraperConfig) -> Result<ResultSet> {
    let index = session
        .fetch(&config.pep_url)
        .await
        .ok_or_else(|| FetchError::NoResponse(config.pep_url.clone()))?;

    let shape = config.pep_layout.resolve(&index.body);
    debug!(?shape, "PEP index layout");

    let tally = match shape {
        PageShape::Indexed => {
            let rows = parse_indexed_rows(&index.body, &Url::parse(&index.url)?)?;
            info!(peps = rows.len(), "PEP index parsed");
            tally_indexed(session, rows, config.tally_soft_mismatches).await?
        }
        PageShape::PlainTable => tally_plain(&index.body)?,
    };

    tally.into_result_set(HEADER)
}
