//! Logging setup shared by both binaries
//!
//! Console output plus a daily-rolling `parser.log` under the log directory.
//! `RUST_LOG` overrides the level chosen by `--verbose`.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Log file name prefix
pub const LOG_FILE_PREFIX: &str = "parser";

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop; hold it for the
/// lifetime of `main`.
pub fn init(verbose: bool, log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .filename_suffix("log")
        .max_log_files(5)
        .build(log_dir)
        .map_err(|e| Error::generic(format!("Failed to open log directory: {e}")))?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| Error::generic(format!("Failed to install logger: {e}")))?;

    Ok(guard)
}
