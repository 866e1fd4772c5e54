//! Console and file rendering of result sets

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::info;

use crate::error::{OutputError, Result};
use crate::extraction::ResultSet;
use crate::mode::Mode;

/// Timestamp format used in export file names
pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// How the CLI presents a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table on stdout
    Pretty,
    /// CSV file under the results directory
    File,
    /// One space-separated line per row on stdout
    Plain,
}

/// Render a fixed-width table, header separated by a rule
pub fn render_pretty(results: &ResultSet) -> String {
    let mut widths = vec![0usize; results.width()];
    for row in results.all_rows() {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let rule: String = widths
        .iter()
        .map(|w| format!("+{}", "-".repeat(w + 2)))
        .chain(std::iter::once("+".to_string()))
        .collect();

    let line = |row: &[String]| -> String {
        let mut out = String::new();
        for (cell, width) in row.iter().zip(&widths) {
            let pad = width - cell.chars().count();
            out.push_str("| ");
            out.push_str(cell);
            out.push_str(&" ".repeat(pad + 1));
        }
        out.push('|');
        out
    };

    let mut out = Vec::with_capacity(results.len() + 4);
    out.push(rule.clone());
    out.push(line(results.header()));
    out.push(rule.clone());
    for row in results.rows() {
        out.push(line(row.as_slice()));
    }
    out.push(rule);
    out.join("\n")
}

/// Render each row, header included, as a space-separated line
pub fn render_plain(results: &ResultSet) -> String {
    results
        .all_rows()
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write header and rows as CSV
pub fn write_csv<W: Write>(w: W, results: &ResultSet) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(w);
    for row in results.all_rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Export file name for `mode` at `now`
pub fn csv_file_name(mode: Mode, now: DateTime<Local>) -> String {
    format!("{}_{}.csv", mode, now.format(DATETIME_FORMAT))
}

/// Write `results` to a timestamped CSV under `results_dir`
pub fn export_csv(results: &ResultSet, mode: Mode, results_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(results_dir)?;
    let path = results_dir.join(csv_file_name(mode, Local::now()));

    let write_failed = |message: String| OutputError::WriteFailed {
        path: path.display().to_string(),
        message,
    };
    let file = std::fs::File::create(&path).map_err(|e| write_failed(e.to_string()))?;
    write_csv(file, results).map_err(|e| write_failed(e.to_string()))?;

    info!(path = %path.display(), "Results saved");
    Ok(path)
}

/// Present `results` in the chosen format; `None` leaves them undisplayed
pub fn present(
    results: &ResultSet,
    format: Option<OutputFormat>,
    mode: Mode,
    results_dir: &Path,
) -> Result<()> {
    match format {
        Some(OutputFormat::Pretty) => println!("{}", render_pretty(results)),
        Some(OutputFormat::Plain) => println!("{}", render_plain(results)),
        Some(OutputFormat::File) => {
            export_csv(results, mode, results_dir)?;
        }
        None => info!(rows = results.len(), "Results not displayed"),
    }
    Ok(())
}
