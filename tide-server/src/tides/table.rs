//! Time-indexed tide table.

use std::collections::BTreeMap;

/// Tide levels indexed by timestamp, with one column per station.
///
/// Rows are ordered by timestamp string. A station with no reading at a
/// given timestamp has no cell there; absence is never reported as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TideTable {
    rows: BTreeMap<String, BTreeMap<String, f64>>,
}

impl TideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell at (`date_time`, `station`), replacing any earlier value.
    pub fn insert(&mut self, date_time: &str, station: &str, value: f64) {
        self.rows
            .entry(date_time.to_string())
            .or_default()
            .insert(station.to_string(), value);
    }

    /// The level recorded for `station` at `date_time`, if any.
    pub fn get(&self, date_time: &str, station: &str) -> Option<f64> {
        self.rows.get(date_time)?.get(station).copied()
    }

    /// Rows in timestamp order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, f64>)> {
        self.rows.iter().map(|(ts, cells)| (ts.as_str(), cells))
    }

    /// One station's levels keyed by timestamp.
    pub fn column(&self, station: &str) -> BTreeMap<String, f64> {
        self.rows
            .iter()
            .filter_map(|(ts, cells)| cells.get(station).map(|v| (ts.clone(), *v)))
            .collect()
    }

    /// Smallest and largest level in the table.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.rows
            .values()
            .flat_map(|cells| cells.values().copied())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of rows (distinct timestamps).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
