//! Station directory and geocoding error types.

/// Errors from loading stations or resolving their coordinates.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// The stations CSV could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Geocoding service returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response did not have the expected shape
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
