//! Station directory and coordinate lookup.
//!
//! The directory is loaded once from `stations.csv` and never changes.
//! Coordinates are not stored locally; each station carries a URL that the
//! external geocoding service resolves on demand.

mod client;
mod directory;
mod error;

pub use client::{CoordinateClient, CoordinateClientConfig};
pub use directory::StationDirectory;
pub use error::StationError;
