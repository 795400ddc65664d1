//! # deckgen-ingest
//!
//! Normalizes spreadsheets, pasted text, and web pages into the canonical
//! [`ParsedTable`] representation consumed by outline synthesis.
//!
//! ## Example
//!
//! ```rust
//! use deckgen_ingest::ingest_text;
//!
//! let table = ingest_text("north region\nsouth region", "regions").unwrap();
//! assert_eq!(table.sheets[0].rows.len(), 2);
//! ```
//!
//! [`ParsedTable`]: deckgen_schema::ParsedTable

pub mod error;
pub mod sources;

// Re-exports
pub use error::{IngestError, Result};
pub use sources::{
    extract_text, ingest_csv, ingest_csv_with_options, ingest_text, ingest_url, ingest_workbook,
    CsvOptions,
};

use std::path::Path;

use deckgen_schema::ParsedTable;

/// Ingest a file by extension: `.xlsx` as a workbook, `.csv`/`.tsv` as
/// delimited text, anything else as plain text.
pub fn ingest_path(path: impl AsRef<Path>) -> Result<ParsedTable> {
    let path = path.as_ref();
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let bytes = std::fs::read(path)?;

    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("xlsx") | Some("xlsm") => ingest_workbook(&bytes, &label),
        Some("csv") => ingest_csv(&bytes, &label),
        Some("tsv") => ingest_csv_with_options(&bytes, &label, CsvOptions::tsv()),
        _ => ingest_text(&String::from_utf8_lossy(&bytes), &label),
    }
}
