//! Error types for PPTX generation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PptxError>;

#[derive(Error, Debug)]
pub enum PptxError {
    /// Image payload is not a decodable `data:` URL
    #[error("invalid image data URL: {reason}")]
    InvalidDataUrl { reason: String },

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
