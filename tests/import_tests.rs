//! CSV and XLSX import through the public entry points.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

mod fixtures;

use barcodegrid::import::{import_bytes, import_path, ImportedTable};
use barcodegrid::{BarcodeGrid, BarcodeGridError};
use fixtures::{Cell, XlsxBuilder};
use test_case::test_case;

fn column(table: &ImportedTable, name: &str) -> Vec<String> {
    table
        .items(name, 1)
        .unwrap()
        .into_iter()
        .map(|item| item.value)
        .collect()
}

// ============================================================================
// CSV
// ============================================================================

#[test]
fn test_csv_location_column_is_default() {
    let csv = "Name,Location,Qty\nBolt,A-01,4\nNut,A-02,9\n";
    let table = import_bytes("stock.csv", csv.as_bytes()).unwrap();
    assert_eq!(table.headers(), ["Name", "Location", "Qty"]);
    assert_eq!(table.default_column(), Some("Location"));
    assert_eq!(column(&table, "Location"), ["A-01", "A-02"]);
}

#[test]
fn test_csv_quotes_bom_and_blank_lines() {
    let csv = "\u{feff}code,label\n\n\"A,1\",\"say \"\"hi\"\"\"\n  B-2  ,plain\n,\n";
    let table = import_bytes("codes.CSV", csv.as_bytes()).unwrap();
    assert_eq!(table.headers(), ["code", "label"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(column(&table, "code"), ["A,1", "B-2"]);
    assert_eq!(table.value(0, 1), Some("say \"hi\""));
}

#[test_case("a;b\n1;2\n", "b" ; "semicolon")]
#[test_case("a\tb\n1\t2\n", "b" ; "tab")]
fn test_csv_delimiter_detection(text: &str, second: &str) {
    let table = import_bytes("x.csv", text.as_bytes()).unwrap();
    assert_eq!(table.headers()[1], second);
    assert_eq!(table.value(0, 1), Some("2"));
}

#[test]
fn test_csv_headers_named_and_deduplicated() {
    let table = import_bytes("x.csv", b",code,code\n1,2,3\n").unwrap();
    assert_eq!(table.headers(), ["A", "code", "code_1"]);
}

#[test]
fn test_csv_skips_empty_values_but_keeps_row_ids() {
    let table = import_bytes("x.csv", b"loc,n\nA,1\n,2\nC,3\n").unwrap();
    let items = table.items("loc", 42).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, "barcode-42-0");
    assert_eq!(items[1].id, "barcode-42-2");
}

#[test_case("only,header\n" ; "header only")]
#[test_case("" ; "empty file")]
#[test_case("\n \n" ; "blank lines")]
fn test_csv_without_rows(text: &str) {
    let err = import_bytes("x.csv", text.as_bytes()).unwrap_err();
    assert!(matches!(err, BarcodeGridError::EmptyImport(_)), "{err:?}");
}

#[test]
fn test_column_summaries() {
    let table = import_bytes("x.csv", b"id,locations\n1,A\n2,\n3,C\n4,D\n5,E\n").unwrap();
    let summaries = table.column_summaries();
    assert_eq!(summaries.len(), 2);
    assert!(!summaries[0].is_default);
    assert!(summaries[1].is_default);
    assert_eq!(summaries[1].samples, ["A", "C", "D"]);
}

#[test]
fn test_unknown_column_is_error() {
    let table = import_bytes("x.csv", b"a\n1\n").unwrap();
    assert!(table.items("b", 0).is_err());
}

// ============================================================================
// Format dispatch
// ============================================================================

#[test_case("report.pdf" ; "pdf")]
#[test_case("noext" ; "no extension")]
#[test_case("data.json" ; "json")]
fn test_unsupported_extension(name: &str) {
    let err = import_bytes(name, b"a,b\n1,2\n").unwrap_err();
    assert!(matches!(err, BarcodeGridError::UnsupportedFormat(_)), "{err:?}");
}

#[test]
fn test_legacy_xls_bytes_are_import_error() {
    let err = import_bytes("old.xls", b"\xD0\xCF\x11\xE0not a zip").unwrap_err();
    assert!(matches!(err, BarcodeGridError::Import(_)), "{err:?}");
}

#[test]
fn test_import_path_reads_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bins.csv");
    std::fs::write(&path, "Location\nBIN-1\nBIN-2\n").unwrap();
    let table = import_path(&path).unwrap();
    assert_eq!(table.row_count(), 2);

    let missing = dir.path().join("nothing.pdf");
    assert!(matches!(
        import_path(&missing),
        Err(BarcodeGridError::UnsupportedFormat(_))
    ));
}

// ============================================================================
// XLSX
// ============================================================================

#[test]
fn test_xlsx_shared_inline_number_and_bool() {
    let xlsx = XlsxBuilder::new()
        .add_sheet("Stock")
        .add_row(&[Cell::shared("Location"), Cell::shared("Qty"), Cell::shared("Ok")])
        .add_row(&[Cell::shared("A-01"), Cell::Number(3.0), Cell::Bool(true)])
        .add_row(&[Cell::inline("A-02 "), Cell::Number(12.5), Cell::Bool(false)])
        .build();
    let table = import_bytes("stock.xlsx", &xlsx).unwrap();
    assert_eq!(table.headers(), ["Location", "Qty", "Ok"]);
    assert_eq!(column(&table, "Location"), ["A-01", "A-02"]);
    assert_eq!(column(&table, "Qty"), ["3", "12.5"]);
    assert_eq!(column(&table, "Ok"), ["true", "false"]);
}

#[test]
fn test_xlsx_empty_header_gets_column_letter() {
    let xlsx = XlsxBuilder::new()
        .add_row(&[Cell::shared("Code"), Cell::Empty, Cell::shared("Note")])
        .add_row(&[Cell::shared("X1"), Cell::shared("middle"), Cell::shared("n")])
        .build();
    let table = import_bytes("sheet.xlsx", &xlsx).unwrap();
    assert_eq!(table.headers(), ["Code", "B", "Note"]);
    assert_eq!(column(&table, "B"), ["middle"]);
}

#[test]
fn test_xlsx_skipped_rows_are_not_data() {
    let xlsx = XlsxBuilder::new()
        .add_row_at(2, &[Cell::shared("Location")])
        .add_row_at(5, &[Cell::shared("L-5")])
        .add_row_at(9, &[Cell::shared("L-9")])
        .build();
    let table = import_bytes("gaps.xlsx", &xlsx).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(column(&table, "Location"), ["L-5", "L-9"]);
}

#[test]
fn test_xlsx_reads_first_sheet_only() {
    let xlsx = XlsxBuilder::new()
        .add_sheet("First")
        .add_row(&[Cell::shared("Location")])
        .add_row(&[Cell::shared("F-1")])
        .add_sheet("Second")
        .add_row(&[Cell::shared("Location")])
        .add_row(&[Cell::shared("S-1")])
        .build();
    let table = import_bytes("two.xlsx", &xlsx).unwrap();
    assert_eq!(column(&table, "Location"), ["F-1"]);
}

#[test]
fn test_xlsx_header_only_is_empty_import() {
    let xlsx = XlsxBuilder::new()
        .add_row(&[Cell::shared("Location")])
        .build();
    let err = import_bytes("empty.xlsx", &xlsx).unwrap_err();
    assert!(matches!(err, BarcodeGridError::EmptyImport(_)), "{err:?}");
}

// ============================================================================
// Through the facade
// ============================================================================

#[test]
fn test_facade_import_commit_with_explicit_column() {
    let xlsx = XlsxBuilder::new()
        .add_row(&[Cell::shared("Sku"), Cell::shared("Bin")])
        .add_row(&[Cell::shared("S1"), Cell::shared("B1")])
        .add_row(&[Cell::shared("S2"), Cell::shared("B2")])
        .build();
    let mut grid = BarcodeGrid::new();
    grid.import_file("bins.xlsx", &xlsx).unwrap();
    assert_eq!(grid.commit_import(Some("Bin")).unwrap(), 2);
    let values: Vec<&str> = grid.editor().data().iter().map(|i| i.value.as_str()).collect();
    assert_eq!(values, ["B1", "B2"]);
    assert!(grid.pending_import().is_none());
}
