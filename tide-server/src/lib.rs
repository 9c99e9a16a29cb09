//! Tide gauge server.
//!
//! Serves tide readings and station metadata from flat CSV files: station
//! lookups, raw and aggregated readings over a time window, line graphs,
//! and appending new readings.

pub mod config;
pub mod domain;
pub mod stations;
pub mod tides;
pub mod web;
