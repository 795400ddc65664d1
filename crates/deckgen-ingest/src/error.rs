//! Error types for the ingestion layer.

use thiserror::Error;

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur while normalizing a source into a table.
///
/// All of these are fatal to the request: ingestion never returns a
/// partially-filled table.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Workbook could not be opened or parsed
    #[error("Failed to read workbook: {0}")]
    Workbook(String),

    /// CSV payload could not be parsed
    #[error("Failed to read CSV: {0}")]
    Csv(String),

    /// Source had no usable content
    #[error("Source '{0}' contains no data")]
    EmptySource(String),

    /// Page fetch failed
    #[error("Failed to fetch URL: {0}")]
    Http(#[from] reqwest::Error),

    /// Page fetch returned a non-success status
    #[error("URL returned status {status}: {url}")]
    HttpStatus { url: String, status: u16 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::XlsxError> for IngestError {
    fn from(err: calamine::XlsxError) -> Self {
        IngestError::Workbook(err.to_string())
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        IngestError::Csv(err.to_string())
    }
}
