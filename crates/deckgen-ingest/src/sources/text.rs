//! Pasted-text ingestion.

use deckgen_schema::{CellValue, ParsedSheet, ParsedTable};

use crate::error::{IngestError, Result};

/// Column name of the synthetic single-column sheet.
pub const TEXT_COLUMN: &str = "content";

/// Turn free-form pasted text into a single-column table: each non-blank
/// line becomes one row.
pub fn ingest_text(text: &str, label: &str) -> Result<ParsedTable> {
    let mut sheet = ParsedSheet::new(label, vec![TEXT_COLUMN.to_string()]);

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        sheet.push_row(vec![CellValue::Text(line.to_string())]);
    }

    if sheet.rows.is_empty() {
        return Err(IngestError::EmptySource(label.to_string()));
    }

    Ok(ParsedTable::new(label, vec![sheet]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_become_rows() {
        let table = ingest_text("first\n\n  second  \nthird\n", "Pasted text").unwrap();

        let sheet = &table.sheets[0];
        assert_eq!(sheet.headers, vec![TEXT_COLUMN]);
        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(sheet.rows[1][TEXT_COLUMN], CellValue::Text("second".into()));
    }

    #[test]
    fn test_blank_text_fails() {
        let result = ingest_text("  \n\n  ", "Pasted text");
        assert!(matches!(result, Err(IngestError::EmptySource(_))));
    }

    #[test]
    fn test_summary_built() {
        let table = ingest_text("alpha\nbeta", "notes").unwrap();
        assert!(table.text_summary.contains("content: alpha"));
    }
}
