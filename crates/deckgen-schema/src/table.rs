//! Canonical tabular representation produced by ingestion.
//!
//! Every ingested source (workbook, CSV, pasted text, fetched page) is
//! normalized into a [`ParsedTable`] before any synthesis or rendering
//! happens. The table also carries a flattened, row-capped text transcript
//! that is the only thing the generative model ever sees.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Maximum number of rows per sheet included in the text summary.
///
/// The summary is injected verbatim into a model prompt with a bounded
/// context budget, so it has to stay small.
pub const SUMMARY_ROW_CAP: usize = 50;

/// A single scalar cell value.
///
/// Numeric and boolean cells keep their native type; everything else is
/// coerced to a string or null by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Human-readable form used in summaries and split-mode bullets.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    n.to_string()
                }
            }
            CellValue::Text(s) => s.clone(),
        }
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// One sheet of an ingested source: an ordered header row plus data rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedSheet {
    /// Sheet name (workbook tab name, or a synthetic label)
    pub name: String,

    /// Ordered, unique column names
    pub headers: Vec<String>,

    /// Data rows; each row maps every header to a cell value
    pub rows: Vec<BTreeMap<String, CellValue>>,
}

impl ParsedSheet {
    /// Create an empty sheet with the given name and headers.
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row built from values in header order.
    ///
    /// Missing trailing values are filled with `Null` so the row key set
    /// always equals the header set.
    pub fn push_row(&mut self, values: Vec<CellValue>) {
        let mut row = BTreeMap::new();
        for (i, header) in self.headers.iter().enumerate() {
            let value = values.get(i).cloned().unwrap_or(CellValue::Null);
            row.insert(header.clone(), value);
        }
        self.rows.push(row);
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check the row/header key invariant for every row.
    pub fn rows_match_headers(&self) -> bool {
        let mut sorted: Vec<&String> = self.headers.iter().collect();
        sorted.sort();
        self.rows.iter().all(|row| {
            let keys: Vec<&String> = row.keys().collect();
            keys == sorted
        })
    }
}

/// One ingested source: a label, its sheets, and the flattened transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedTable {
    /// Source label (file name, URL, or "Pasted text")
    pub label: String,

    /// Sheets with at least one data row
    pub sheets: Vec<ParsedSheet>,

    /// Flattened, row-capped transcript for model prompts
    pub text_summary: String,
}

impl ParsedTable {
    /// Build a table from sheets, dropping empty sheets and computing the
    /// text summary with the default row cap.
    pub fn new(label: impl Into<String>, sheets: Vec<ParsedSheet>) -> Self {
        Self::with_row_cap(label, sheets, SUMMARY_ROW_CAP)
    }

    /// Build a table with an explicit summary row cap (used by tests).
    pub fn with_row_cap(
        label: impl Into<String>,
        sheets: Vec<ParsedSheet>,
        row_cap: usize,
    ) -> Self {
        let sheets: Vec<ParsedSheet> = sheets
            .into_iter()
            .filter(|s| !s.rows.is_empty())
            .collect();
        let label = label.into();
        let text_summary = build_summary(&sheets, row_cap);

        Self {
            label,
            sheets,
            text_summary,
        }
    }

    /// Total data rows across all sheets.
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }

    /// Iterate over every (sheet, row) pair in sheet order.
    pub fn all_rows(&self) -> impl Iterator<Item = (&ParsedSheet, &BTreeMap<String, CellValue>)> {
        self.sheets
            .iter()
            .flat_map(|s| s.rows.iter().map(move |r| (s, r)))
    }
}

/// Build the flattened transcript: for each non-empty sheet a header line,
/// up to `row_cap` rows of `"col: value | col: value"` pairs, and a
/// truncation note when rows were omitted.
fn build_summary(sheets: &[ParsedSheet], row_cap: usize) -> String {
    let mut out = String::new();

    for sheet in sheets {
        if sheet.rows.is_empty() {
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!(
            "Sheet \"{}\" ({} rows): {}\n",
            sheet.name,
            sheet.rows.len(),
            sheet.headers.join(", ")
        ));

        for row in sheet.rows.iter().take(row_cap) {
            let line: Vec<String> = sheet
                .headers
                .iter()
                .map(|h| {
                    let value = row.get(h).map(CellValue::display).unwrap_or_default();
                    format!("{}: {}", h, value)
                })
                .collect();
            out.push_str(&line.join(" | "));
            out.push('\n');
        }

        if sheet.rows.len() > row_cap {
            out.push_str(&format!(
                "... {} more rows omitted\n",
                sheet.rows.len() - row_cap
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sheet(name: &str, rows: usize) -> ParsedSheet {
        let mut sheet = ParsedSheet::new(
            name,
            vec!["region".to_string(), "sales".to_string(), "active".to_string()],
        );
        for i in 0..rows {
            sheet.push_row(vec![
                CellValue::Text(format!("Region {}", i)),
                CellValue::Number(100.0 + i as f64),
                CellValue::Bool(i % 2 == 0),
            ]);
        }
        sheet
    }

    #[test]
    fn test_row_keys_match_headers() {
        let sheet = sample_sheet("Sheet1", 10);
        assert!(sheet.rows_match_headers());
    }

    #[test]
    fn test_short_row_padded_with_null() {
        let mut sheet = ParsedSheet::new("S", vec!["a".to_string(), "b".to_string()]);
        sheet.push_row(vec![CellValue::Number(1.0)]);

        assert!(sheet.rows_match_headers());
        assert_eq!(sheet.rows[0]["b"], CellValue::Null);
    }

    #[test]
    fn test_empty_sheet_dropped() {
        let table = ParsedTable::new(
            "data.xlsx",
            vec![sample_sheet("Sheet1", 10), sample_sheet("Sheet2", 0)],
        );

        assert_eq!(table.sheets.len(), 1);
        assert_eq!(table.total_rows(), 10);
    }

    #[test]
    fn test_summary_contains_headers_and_rows() {
        let table = ParsedTable::new("data.xlsx", vec![sample_sheet("Sheet1", 3)]);

        assert!(table.text_summary.contains("Sheet \"Sheet1\" (3 rows)"));
        assert!(table.text_summary.contains("region, sales, active"));
        assert!(table.text_summary.contains("sales: 100"));
    }

    #[test]
    fn test_summary_truncation_note() {
        let table = ParsedTable::with_row_cap("x", vec![sample_sheet("S", 10)], 4);

        assert!(table.text_summary.contains("... 6 more rows omitted"));
        // Only the capped rows appear
        assert!(table.text_summary.contains("Region 3"));
        assert!(!table.text_summary.contains("Region 4 |"));
    }

    #[test]
    fn test_summary_no_note_when_under_cap() {
        let table = ParsedTable::with_row_cap("x", vec![sample_sheet("S", 4)], 10);
        assert!(!table.text_summary.contains("omitted"));
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Number(42.0).display(), "42");
        assert_eq!(CellValue::Number(3.5).display(), "3.5");
        assert_eq!(CellValue::Bool(true).display(), "true");
        assert_eq!(CellValue::Null.display(), "");
        assert_eq!(CellValue::Text("hi".into()).display(), "hi");
    }

    #[test]
    fn test_table_json_round_trip() {
        let table = ParsedTable::new("t", vec![sample_sheet("S", 2)]);
        let json = serde_json::to_string(&table).unwrap();
        let back: ParsedTable = serde_json::from_str(&json).unwrap();

        assert_eq!(back.label, table.label);
        assert_eq!(back.total_rows(), 2);
        assert!(back.sheets[0].rows_match_headers());
    }
}
