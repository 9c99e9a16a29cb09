//! Tide store error types.

/// Errors from loading, writing or plotting the tide table.
#[derive(Debug, thiserror::Error)]
pub enum TideError {
    /// The CSV file could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Drawing or encoding the graph failed
    #[error("graph error: {message}")]
    Graph { message: String },
}

impl TideError {
    pub(crate) fn graph(e: impl std::fmt::Display) -> Self {
        TideError::Graph {
            message: e.to_string(),
        }
    }
}
