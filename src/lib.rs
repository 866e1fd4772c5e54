//! Python documentation scraper
//!
//! Fetches pages from docs.python.org and peps.python.org, extracts tabular
//! data from them and presents it on the console, as CSV, or through a small
//! web front end.
//!
//! # Modes
//!
//! - **whats-new**: every release notes article with its title and editors
//! - **latest-versions**: documentation versions with their status
//! - **download**: the A4 PDF documentation archive, saved to disk
//! - **pep**: PEP count per status, cross-checked against the index codes
//!
//! # Architecture
//!
//! ```text
//! CLI (pydocs) ─────┐
//!                   ├──▶ run_mode ──▶ extraction ──▶ Session ──▶ Transport
//! Web (pydocs-web) ─┘        │             │            │
//!                            ▼             ▼            ▼
//!                     ┌────────────┐  ┌─────────┐  ┌───────────┐
//!                     │ Outcome    │  │ Locator │  │ HttpCache │
//!                     └─────┬──────┘  └─────────┘  └───────────┘
//!                           │
//!                           ▼
//!                 pretty / plain / CSV / HTML / JSON
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pydocs_scraper::{run_mode, Mode, Outcome, ScraperConfig, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ScraperConfig::default();
//!     let session = Session::from_config(&config)?;
//!
//!     if let Outcome::Table(results) = run_mode(Mode::Pep, &session, &config).await? {
//!         for row in results.rows() {
//!             println!("{}", row.join(" "));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod handlers;
pub mod mode;
pub mod output;
pub mod telemetry;

// Re-exports for convenience
pub use config::ScraperConfig;
pub use error::{Error, Result};
pub use extraction::ResultSet;
pub use fetch::Session;
pub use mode::{run_mode, Mode, Outcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
