//! Error types for PDF generation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PdfError>;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Typst compilation failed: {0}")]
    Compilation(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
