//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::stations::{CoordinateClient, StationDirectory};
use crate::tides::TideStore;

/// Shared application state.
///
/// The tide table is the only mutable piece; the station directory is
/// fixed after startup.
#[derive(Clone)]
pub struct AppState {
    /// Tide readings, appended to by the write endpoints
    pub tides: Arc<RwLock<TideStore>>,

    /// Station metadata
    pub stations: Arc<StationDirectory>,

    /// Geocoding client for station coordinates
    pub geocoder: CoordinateClient,

    /// Paths, default window and graph settings
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        tides: TideStore,
        stations: StationDirectory,
        geocoder: CoordinateClient,
        config: ServerConfig,
    ) -> Self {
        Self {
            tides: Arc::new(RwLock::new(tides)),
            stations: Arc::new(stations),
            geocoder,
            config: Arc::new(config),
        }
    }
}
