//! Geocoding client for station coordinates.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinates;

use super::error::StationError;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Envelope of a station lookup response. Only `items` is read.
#[derive(Debug, Deserialize)]
struct StationResponse {
    items: StationItems,
}

/// The four numeric fields the server needs from a station lookup.
#[derive(Debug, Deserialize)]
struct StationItems {
    northing: f64,
    easting: f64,
    lat: f64,
    long: f64,
}

impl From<StationItems> for Coordinates {
    fn from(items: StationItems) -> Self {
        Coordinates {
            northing: items.northing,
            easting: items.easting,
            latitude: items.lat,
            longitude: items.long,
        }
    }
}

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct CoordinateClientConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Honour `HTTP_PROXY` and friends
    pub use_system_proxy: bool,
}

impl CoordinateClientConfig {
    pub fn new() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_system_proxy: true,
        }
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Connect directly, ignoring proxy environment variables.
    pub fn without_proxy(mut self) -> Self {
        self.use_system_proxy = false;
        self
    }
}

impl Default for CoordinateClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client that resolves a station URL to its coordinates.
///
/// Each station row carries its own absolute URL, so there is no base URL
/// here. One GET is made per lookup; nothing is cached or retried.
#[derive(Debug, Clone)]
pub struct CoordinateClient {
    http: reqwest::Client,
}

impl CoordinateClient {
    /// Create a new geocoding client.
    pub fn new(config: CoordinateClientConfig) -> Result<Self, StationError> {
        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self { http })
    }

    /// Fetch `url` and extract northing, easting, latitude and longitude.
    pub async fn resolve(&self, url: &str) -> Result<Coordinates, StationError> {
        debug!(url, "resolving station coordinates");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_coordinates(&body)
    }
}

/// Pull the coordinate fields out of a lookup response body.
fn parse_coordinates(body: &str) -> Result<Coordinates, StationError> {
    let response: StationResponse =
        serde_json::from_str(body).map_err(|e| StationError::Json {
            message: e.to_string(),
        })?;
    Ok(response.items.into())
}
