//! CSV ingestion.

use deckgen_schema::{CellValue, ParsedSheet, ParsedTable};

use crate::error::{IngestError, Result};

/// Options for CSV parsing
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: comma)
    pub delimiter: u8,
    /// Whether the first record is a header row
    pub has_header: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
        }
    }
}

impl CsvOptions {
    /// Options for tab-separated values
    pub fn tsv() -> Self {
        Self {
            delimiter: b'\t',
            ..Default::default()
        }
    }
}

/// Parse CSV bytes into a single-sheet table.
pub fn ingest_csv(bytes: &[u8], label: &str) -> Result<ParsedTable> {
    ingest_csv_with_options(bytes, label, CsvOptions::default())
}

/// Parse CSV bytes with explicit options.
pub fn ingest_csv_with_options(
    bytes: &[u8],
    label: &str,
    options: CsvOptions,
) -> Result<ParsedTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(false) // headers handled here
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }

    if records.is_empty() {
        return Err(IngestError::EmptySource(label.to_string()));
    }

    let headers = if options.has_header {
        let first = records.remove(0);
        first
            .into_iter()
            .enumerate()
            .map(|(i, h)| {
                if h.is_empty() {
                    format!("Column {}", i + 1)
                } else {
                    h
                }
            })
            .collect()
    } else {
        let width = records.iter().map(Vec::len).max().unwrap_or(0);
        (0..width).map(|i| format!("Column {}", i + 1)).collect()
    };

    let mut sheet = ParsedSheet::new(label, headers);
    for record in records {
        let values: Vec<CellValue> = record.iter().map(|f| coerce_field(f)).collect();
        if values.iter().all(CellValue::is_null) {
            continue;
        }
        sheet.push_row(values);
    }

    let table = ParsedTable::new(label, vec![sheet]);
    if table.sheets.is_empty() {
        return Err(IngestError::EmptySource(label.to_string()));
    }
    Ok(table)
}

/// Infer value types from a text field: numbers and booleans keep their
/// native type, blanks become null, everything else stays a string.
fn coerce_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Null;
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return CellValue::Number(n);
        }
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => CellValue::Bool(true),
        "false" => CellValue::Bool(false),
        _ => CellValue::Text(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_csv() {
        let data = b"region,sales\nNorth,120\nSouth,80\n";
        let table = ingest_csv(data, "sales.csv").unwrap();

        assert_eq!(table.sheets.len(), 1);
        let sheet = &table.sheets[0];
        assert_eq!(sheet.headers, vec!["region", "sales"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0]["sales"], CellValue::Number(120.0));
        assert!(sheet.rows_match_headers());
    }

    #[test]
    fn test_type_coercion() {
        assert_eq!(coerce_field("12.5"), CellValue::Number(12.5));
        assert_eq!(coerce_field("true"), CellValue::Bool(true));
        assert_eq!(coerce_field(""), CellValue::Null);
        assert_eq!(coerce_field("hello"), CellValue::Text("hello".to_string()));
    }

    #[test]
    fn test_empty_csv_fails() {
        let result = ingest_csv(b"", "empty.csv");
        assert!(matches!(result, Err(IngestError::EmptySource(_))));
    }

    #[test]
    fn test_header_only_csv_fails() {
        let result = ingest_csv(b"a,b,c\n", "header.csv");
        assert!(matches!(result, Err(IngestError::EmptySource(_))));
    }

    #[test]
    fn test_tsv_options() {
        let data = b"a\tb\n1\t2\n";
        let table = ingest_csv_with_options(data, "t.tsv", CsvOptions::tsv()).unwrap();
        assert_eq!(table.sheets[0].headers, vec!["a", "b"]);
    }
}
