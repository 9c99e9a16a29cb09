//! Tide readings table.
//!
//! Loads readings from `tideReadings.csv`, answers windowed and per-station
//! queries, appends new readings and flushes numeric rows back to disk.
//! Noise values stay in memory but never reach a query result or a
//! written file.

mod error;
mod graph;
mod store;
mod table;

pub use error::TideError;
pub use graph::{Graph, GraphStyle};
pub use store::{Extreme, TideStore};
pub use table::TideTable;
