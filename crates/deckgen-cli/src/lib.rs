//! deckgen command-line interface.

pub mod app;

pub use app::run_cli;

/// Crate version string exposed for status output.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
