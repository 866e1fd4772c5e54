//! Per-status counting

use std::collections::HashMap;

use super::table::ResultSet;
use crate::error::Result;

/// Label of the closing row
pub const TOTAL_LABEL: &str = "Total";

/// Occurrence counts per status label, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct StatusTally {
    counts: Vec<(String, u64)>,
    index: HashMap<String, usize>,
    total: u64,
}

impl StatusTally {
    /// Empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `label`
    pub fn record(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.counts.len());
                self.counts.push((label.to_string(), 1));
            }
        }
        self.total += 1;
    }

    /// Count for `label`, zero if never seen
    pub fn count(&self, label: &str) -> u64 {
        self.index
            .get(label)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    /// Number of recorded occurrences
    pub fn total(&self) -> u64 {
        self.total
    }

    /// `(label, count)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, n)| (label.as_str(), *n))
    }

    /// Render as rows under `header`, closed by a `(Total, N)` row
    pub fn into_result_set<I, S>(self, header: I) -> Result<ResultSet>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut results = ResultSet::new(header);
        for (label, count) in self.counts {
            results.push([label, count.to_string()])?;
        }
        results.push([TOTAL_LABEL.to_string(), self.total.to_string()])?;
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_seen_order_and_total() {
        let mut tally = StatusTally::new();
        for label in ["Final", "Active", "Final", "Draft", "Final"] {
            tally.record(label);
        }

        let pairs: Vec<_> = tally.iter().collect();
        assert_eq!(pairs, [("Final", 3), ("Active", 1), ("Draft", 1)]);
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.count("Rejected"), 0);
    }

    #[test]
    fn test_result_set_sums_to_total() {
        let mut tally = StatusTally::new();
        for label in ["A", "B", "A"] {
            tally.record(label);
        }

        let results = tally.into_result_set(["Status", "Count"]).unwrap();
        let (last, body) = results.rows().split_last().unwrap();
        let sum: u64 = body.iter().map(|row| row[1].parse::<u64>().unwrap()).sum();

        assert_eq!(last[0], TOTAL_LABEL);
        assert_eq!(last[1].parse::<u64>().unwrap(), sum);
    }

    #[test]
    fn test_empty_tally_still_has_total_row() {
        let results = StatusTally::new().into_result_set(["Status", "Count"]).unwrap();
        assert_eq!(results.rows(), [vec!["Total".to_string(), "0".to_string()]]);
    }
}
