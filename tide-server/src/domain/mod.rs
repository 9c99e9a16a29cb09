//! Domain types for the tide server.
//!
//! Readings, stations and time windows as loaded from the CSV tables.
//! Values that fail to parse are kept as noise rather than rejected, so
//! the raw table always round-trips what was on disk.

mod reading;
mod station;
mod timestamp;
mod window;

pub use reading::{TideReading, TideValue};
pub use station::{Coordinates, Station};
pub use timestamp::{InvalidTimestamp, Timestamp};
pub use window::TimeWindow;
