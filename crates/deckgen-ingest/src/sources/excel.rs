//! XLSX workbook ingestion using calamine.

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use deckgen_schema::{CellValue, ParsedSheet, ParsedTable};

use crate::error::{IngestError, Result};

/// Parse XLSX bytes into a canonical table.
///
/// Each physical sheet becomes one [`ParsedSheet`]; sheets without data
/// rows are dropped. The first row of each sheet is the header row.
pub fn ingest_workbook(bytes: &[u8], label: &str) -> Result<ParsedTable> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook: Xlsx<Cursor<Vec<u8>>> = open_workbook_from_rs(cursor)
        .map_err(|e: calamine::XlsxError| IngestError::Workbook(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::new();

    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| IngestError::Workbook(format!("{}: {}", name, e)))?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            log::debug!("sheet '{}' is empty, skipping", name);
            continue;
        };

        let headers = normalize_headers(header_row);
        let mut sheet = ParsedSheet::new(&name, headers);

        for row in rows {
            let values: Vec<CellValue> = row.iter().map(cell_value).collect();
            // Rows of nothing but blanks carry no information
            if values.iter().all(CellValue::is_null) {
                continue;
            }
            sheet.push_row(values);
        }

        sheets.push(sheet);
    }

    let table = ParsedTable::new(label, sheets);
    if table.sheets.is_empty() {
        return Err(IngestError::EmptySource(label.to_string()));
    }
    Ok(table)
}

/// Convert a calamine cell into a schema cell value.
///
/// Numbers and booleans keep their native type; everything else becomes a
/// string, and blanks become null.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => text_or_null(s),
        Data::DateTime(dt) => text_or_null(&dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_or_null(s),
        Data::Error(e) => CellValue::Text(format!("#ERROR: {:?}", e)),
    }
}

fn text_or_null(s: &str) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(trimmed.to_string())
    }
}

/// Stringify the header row, synthesizing names for blank cells and
/// de-duplicating repeats so column names stay unique.
fn normalize_headers(cells: &[Data]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(cells.len());

    for (i, cell) in cells.iter().enumerate() {
        let raw = match cell_value(cell) {
            CellValue::Null => String::new(),
            other => other.display(),
        };
        let base = if raw.is_empty() {
            format!("Column {}", i + 1)
        } else {
            raw
        };

        let mut name = base.clone();
        let mut n = 2;
        while headers.contains(&name) {
            name = format!("{} ({})", base, n);
            n += 1;
        }
        headers.push(name);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_mapping() {
        assert_eq!(cell_value(&Data::Empty), CellValue::Null);
        assert_eq!(cell_value(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(cell_value(&Data::Bool(true)), CellValue::Bool(true));
        assert_eq!(
            cell_value(&Data::String("  x ".to_string())),
            CellValue::Text("x".to_string())
        );
        assert_eq!(cell_value(&Data::String("   ".to_string())), CellValue::Null);
    }

    #[test]
    fn test_normalize_headers_blank_and_duplicate() {
        let cells = vec![
            Data::String("name".to_string()),
            Data::Empty,
            Data::String("name".to_string()),
        ];
        let headers = normalize_headers(&cells);
        assert_eq!(headers, vec!["name", "Column 2", "name (2)"]);
    }

    #[test]
    fn test_corrupt_bytes_fail_cleanly() {
        let result = ingest_workbook(b"this is not a zip archive", "bad.xlsx");
        assert!(matches!(result, Err(IngestError::Workbook(_))));
    }
}
