//! Station metadata.

use serde::{Deserialize, Serialize};

/// A tide-gauge station as listed in the stations table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Display name; multi-word names use `+` in place of spaces.
    pub station_name: String,

    /// Unique reference code, e.g. `E72639`.
    pub station_reference: String,

    /// Lookup handle for the external geocoding service.
    #[serde(rename = "stationURL")]
    pub station_url: String,
}

/// Geographic position of a station, as reported by the geocoding service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub northing: f64,
    pub easting: f64,
    pub latitude: f64,
    pub longitude: f64,
}
