//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::domain::TimeWindow;
use crate::tides::GraphStyle;

/// Start of the window used when a request omits `t_from`.
pub const DEFAULT_FROM: &str = "2021-09-20T00:00:00Z";

/// End of the window used when a request omits `t_to`.
pub const DEFAULT_TO: &str = "2021-09-26T06:00:00Z";

/// Errors from reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} is not a whole number of seconds: {value}")]
    InvalidSecs { var: &'static str, value: String },
}

/// Runtime settings for the tide server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: SocketAddr,

    /// Station metadata, read once at startup
    pub stations_csv: PathBuf,

    /// Primary tide table; loaded at startup and rewritten by bulk writes
    pub readings_csv: PathBuf,

    /// Scratch output of the single-reading write endpoint
    pub scratch_csv: PathBuf,

    /// Timeout for geocoding lookups
    pub lookup_timeout_secs: u64,

    /// Window applied to requests that leave a bound out
    pub default_window: TimeWindow,

    pub graph: GraphStyle,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            stations_csv: PathBuf::from("stations.csv"),
            readings_csv: PathBuf::from("tideReadings.csv"),
            scratch_csv: PathBuf::from("new.csv"),
            lookup_timeout_secs: 30,
            default_window: TimeWindow::between(DEFAULT_FROM, DEFAULT_TO),
            graph: GraphStyle::default(),
        }
    }
}

impl ServerConfig {
    /// Read settings from `TIDES_*` environment variables, falling back to
    /// the defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = get("TIDES_BIND_ADDR") {
            config.bind_addr = value.parse().map_err(|_| ConfigError::InvalidAddr {
                var: "TIDES_BIND_ADDR",
                value,
            })?;
        }
        if let Some(value) = get("TIDES_STATIONS_CSV") {
            config.stations_csv = value.into();
        }
        if let Some(value) = get("TIDES_READINGS_CSV") {
            config.readings_csv = value.into();
        }
        if let Some(value) = get("TIDES_SCRATCH_CSV") {
            config.scratch_csv = value.into();
        }
        if let Some(value) = get("TIDES_LOOKUP_TIMEOUT_SECS") {
            config.lookup_timeout_secs =
                value.parse().map_err(|_| ConfigError::InvalidSecs {
                    var: "TIDES_LOOKUP_TIMEOUT_SECS",
                    value,
                })?;
        }
        if let Some(value) = get("TIDES_DEFAULT_FROM") {
            config.default_window.from = Some(value);
        }
        if let Some(value) = get("TIDES_DEFAULT_TO") {
            config.default_window.to = Some(value);
        }

        Ok(config)
    }

    pub fn with_stations_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.stations_csv = path.into();
        self
    }

    pub fn with_readings_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.readings_csv = path.into();
        self
    }

    pub fn with_scratch_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.scratch_csv = path.into();
        self
    }
}
