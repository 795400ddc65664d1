//! Source adapters: each normalizes one input kind into a [`ParsedTable`].
//!
//! [`ParsedTable`]: deckgen_schema::ParsedTable

pub mod csv;
pub mod excel;
pub mod text;
pub mod web;

pub use csv::{ingest_csv, ingest_csv_with_options, CsvOptions};
pub use excel::ingest_workbook;
pub use text::{ingest_text, TEXT_COLUMN};
pub use web::{extract_text, ingest_url};
