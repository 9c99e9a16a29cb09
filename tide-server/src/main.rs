use tide_server::config::ServerConfig;
use tide_server::stations::{CoordinateClient, CoordinateClientConfig, StationDirectory};
use tide_server::tides::TideStore;
use tide_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tide_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    // Both tables are loaded once; fail fast if either is missing
    let stations = StationDirectory::load(&config.stations_csv)?;
    let tides = TideStore::load(&config.readings_csv)?;

    let geocoder = CoordinateClient::new(
        CoordinateClientConfig::new().with_timeout(config.lookup_timeout_secs),
    )?;

    let addr = config.bind_addr;
    let state = AppState::new(tides, stations, geocoder, config);
    let app = create_router(state);

    info!("Tide server listening on http://{addr}");
    info!("  GET      /station/json    - Station metadata and coordinates");
    info!("  GET      /data/json       - Tide values or max/min/mean");
    info!("  POST     /data/json       - Append readings (?write=true)");
    info!("  GET|POST /data/json/write - Append one reading to the scratch file");
    info!("  GET|POST /data/html       - Tide values as an HTML table");
    info!("  GET      /data/graph      - Tide values as a PNG graph");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
