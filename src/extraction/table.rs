//! Tabular extraction results

use serde::{Deserialize, Serialize};

use crate::error::{OutputError, Result};

/// Header plus rows, every row as wide as the header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResultSet {
    /// Empty result set with the given header
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row; its width must equal the header's
    pub fn push<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.header.len() {
            return Err(OutputError::ArityMismatch {
                expected: self.header.len(),
                actual: row.len(),
            }
            .into());
        }
        self.rows.push(row);
        Ok(())
    }

    /// Header row
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, header excluded
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header followed by every data row
    pub fn all_rows(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }
}
