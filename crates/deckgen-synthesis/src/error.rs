//! Error types for outline synthesis.

use thiserror::Error;

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, SynthesisError>;

/// Errors that can occur while producing or repairing an outline.
///
/// Each of these is fatal to the synthesis call only; the caller's prior
/// deck state is never touched on failure.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Transport failure talking to the model endpoint
    #[error("Model call failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Model endpoint returned a non-success status
    #[error("Model endpoint returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Response carried no completion text
    #[error("Model response missing completion text: {0}")]
    MalformedResponse(String),

    /// No JSON could be recovered from the response after all strategies
    #[error("Could not recover JSON from model output: {0}")]
    Unrecoverable(String),

    /// Valid JSON of the wrong shape (no slide array, no slide object)
    #[error("Model returned JSON of the wrong shape: {0}")]
    WrongShape(String),

    /// Another synthesis call is already in flight for this deck
    #[error("A synthesis call is already in flight for this deck")]
    Busy,

    /// Slide index outside the deck
    #[error("Slide index {0} is out of bounds")]
    IndexOutOfBounds(usize),
}
