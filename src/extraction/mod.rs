//! Page extraction
//!
//! One module per extraction mode, sharing the required-element locator and
//! the tabular result type. Each extractor parses pages in plain synchronous
//! functions and only awaits between pages, so no parsed document is held
//! across a fetch.

pub mod download;
pub mod locate;
pub mod pep;
mod progress;
pub mod table;
pub mod tally;
pub mod versions;
pub mod whats_new;

pub use download::{download, DownloadedArchive};
pub use locate::{locate, locate_all, locate_in, Locator};
pub use pep::{pep, PepLayout};
pub use table::ResultSet;
pub use tally::StatusTally;
pub use versions::latest_versions;
pub use whats_new::whats_new;
