//! Tabular import: CSV and XLSX files into an [`ImportedTable`], then one
//! chosen column into barcode items.
//!
//! The file extension picks the reader before any byte is parsed. A table is
//! only produced when it has at least one header and one data row.

pub mod cell_ref;
pub mod csv;
pub mod xlsx;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{BarcodeGridError, Result};
use crate::types::{item_id, BarcodeItem};

/// Sample values shown per column in the column chooser.
pub const SAMPLE_COUNT: usize = 3;

/// Reader chosen from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Spreadsheet,
}

impl ImportFormat {
    /// Case-insensitive extension dispatch: `csv`, `xlsx` or `xls`.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xls" => Ok(Self::Spreadsheet),
            _ => Err(BarcodeGridError::UnsupportedFormat(if ext.is_empty() {
                name.to_string()
            } else {
                ext
            })),
        }
    }
}

/// Header row plus data rows, every row as wide as the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// One column as offered in the column chooser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub samples: Vec<String>,
    pub is_default: bool,
}

impl ImportedTable {
    /// Build a table, rejecting one without data rows or headers.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(BarcodeGridError::EmptyImport("no rows".into()));
        }
        if headers.is_empty() {
            return Err(BarcodeGridError::EmptyImport("no columns".into()));
        }
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell text at data row `row`, column `col`.
    pub fn value(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// First header named "location" or "locations" (any case), else the first header.
    pub fn default_column(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| {
                let lower = h.to_lowercase();
                lower == "location" || lower == "locations"
            })
            .or_else(|| self.headers.first())
            .map(String::as_str)
    }

    /// Non-empty values of a column, in row order.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.rows.iter().enumerate().filter_map(move |(idx, row)| {
            row.get(col)
                .map(String::as_str)
                .filter(|v| !v.trim().is_empty())
                .map(|v| (idx, v))
        })
    }

    /// Headers with up to [`SAMPLE_COUNT`] sample values each.
    pub fn column_summaries(&self) -> Vec<ColumnSummary> {
        let default = self.default_column();
        self.headers
            .iter()
            .enumerate()
            .map(|(col, name)| ColumnSummary {
                name: name.clone(),
                samples: self
                    .column_values(col)
                    .take(SAMPLE_COUNT)
                    .map(|(_, v)| v.to_string())
                    .collect(),
                is_default: default == Some(name.as_str()),
            })
            .collect()
    }

    /// Turn one column into items, skipping empty values.
    ///
    /// Item ids carry the source row index, so they stay unique within one import.
    pub fn items(&self, column: &str, timestamp_ms: u64) -> Result<Vec<BarcodeItem>> {
        let col = self.column_index(column).ok_or_else(|| {
            BarcodeGridError::InvalidInput(format!("no column named {column:?}"))
        })?;
        let items: Vec<BarcodeItem> = self
            .column_values(col)
            .map(|(row, value)| BarcodeItem::new(item_id(timestamp_ms, row), value))
            .collect();
        if items.is_empty() {
            warn!(column, "selected column has no values");
            return Err(BarcodeGridError::EmptyImport(format!(
                "column {column:?} has no values"
            )));
        }
        info!(column, count = items.len(), "column committed");
        Ok(items)
    }
}

/// Read `bytes` with the reader matching `file_name`'s extension.
pub fn import_bytes(file_name: &str, bytes: &[u8]) -> Result<ImportedTable> {
    let format = ImportFormat::from_file_name(file_name)?;
    info!(file = file_name, ?format, size = bytes.len(), "importing file");
    match format {
        ImportFormat::Csv => csv::parse_delimited(bytes),
        ImportFormat::Spreadsheet => xlsx::parse_xlsx(bytes),
    }
}

/// Read a file from disk.
#[cfg(not(target_arch = "wasm32"))]
pub fn import_path(path: &std::path::Path) -> Result<ImportedTable> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    // Reject before reading
    ImportFormat::from_file_name(name)?;
    let bytes = std::fs::read(path)?;
    import_bytes(name, &bytes)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn table(headers: &[&str], rows: &[&[&str]]) -> ImportedTable {
        ImportedTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test_case("labels.csv", Some(ImportFormat::Csv))]
    #[test_case("LABELS.CSV", Some(ImportFormat::Csv))]
    #[test_case("book.xlsx", Some(ImportFormat::Spreadsheet))]
    #[test_case("old.xls", Some(ImportFormat::Spreadsheet))]
    #[test_case("notes.txt", None)]
    #[test_case("README", None)]
    fn test_format_dispatch(name: &str, expected: Option<ImportFormat>) {
        assert_eq!(ImportFormat::from_file_name(name).ok(), expected);
    }

    #[test]
    fn test_unsupported_rejected_before_parse() {
        let err = import_bytes("scan.pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, BarcodeGridError::UnsupportedFormat(ref e) if e == "pdf"));
    }

    #[test_case(&["Name", "LOCATIONS", "Qty"], "LOCATIONS" ; "plural any case")]
    #[test_case(&["location", "Location"], "location" ; "first match")]
    #[test_case(&["Code", "Zone"], "Code" ; "fallback first")]
    fn test_default_column(headers: &[&str], expected: &str) {
        let row: Vec<&str> = headers.iter().map(|_| "x").collect();
        let t = table(headers, &[row.as_slice()]);
        assert_eq!(t.default_column(), Some(expected));
    }

    #[test]
    fn test_items_skip_empty_values() {
        let t = table(&["Location"], &[&["A-01"], &[" "], &["A-03"]]);
        let items = t.items("Location", 42).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "barcode-42-0");
        assert_eq!(items[1].id, "barcode-42-2");
        assert_eq!(items[1].display_text(), "A-03");
    }

    #[test]
    fn test_items_errors() {
        let t = table(&["Location", "Blank"], &[&["A-01", ""]]);
        assert!(matches!(
            t.items("Blank", 0),
            Err(BarcodeGridError::EmptyImport(_))
        ));
        assert!(matches!(
            t.items("Missing", 0),
            Err(BarcodeGridError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_summaries_limit_samples() {
        let t = table(
            &["Location", "Note"],
            &[&["A"], &["B"], &["C"], &["D"]],
        );
        let summaries = t.column_summaries();
        assert_eq!(summaries[0].samples, vec!["A", "B", "C"]);
        assert!(summaries[0].is_default);
        assert!(summaries[1].samples.is_empty());
        assert!(!summaries[1].is_default);
    }

    #[test]
    fn test_empty_table_errors() {
        let err = ImportedTable::new(vec!["a".into()], vec![]).unwrap_err();
        assert!(matches!(err, BarcodeGridError::EmptyImport(ref m) if m == "no rows"));
        let err = ImportedTable::new(vec![], vec![vec!["x".into()]]).unwrap_err();
        assert!(matches!(err, BarcodeGridError::EmptyImport(ref m) if m == "no columns"));
    }
}
