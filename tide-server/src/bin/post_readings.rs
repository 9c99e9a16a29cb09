//! Post a JSON file of tide readings to a running tide server.
//!
//! Run with: cargo run --bin post-readings -- post_data.json

use std::path::PathBuf;

use clap::Parser;
use tide_server::web::{ReadingBody, WrittenResponse};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "post-readings", about = "Append tide readings to a tide server")]
struct Args {
    /// JSON file holding an array of {stationName, dateTime, tideValue}
    file: PathBuf,

    /// Base URL of the server
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "post_readings=info".into()),
        )
        .init();

    let args = Args::parse();

    // Check the file against the write schema before sending anything
    let text = std::fs::read_to_string(&args.file)?;
    let readings: Vec<ReadingBody> = serde_json::from_str(&text)?;
    info!(count = readings.len(), file = %args.file.display(), "posting readings");

    let response = reqwest::Client::new()
        .post(format!("{}/data/json", args.url.trim_end_matches('/')))
        .query(&[("write", "true")])
        .json(&readings)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<WrittenResponse>(&body) {
        Ok(written) if status.is_success() => {
            info!(written = written.written, "server accepted readings");
            println!("true");
            Ok(())
        }
        _ => {
            error!(%status, %body, "server rejected readings");
            println!("false");
            Err(format!("server rejected readings: {body}").into())
        }
    }
}
