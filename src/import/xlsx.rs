//! First-sheet XLSX reader producing an [`ImportedTable`].
//!
//! Reads workbook relationships to locate the first worksheet and shared
//! strings, then collects cell text. Styles, formulas and number formats are
//! ignored: the stored value (or cached formula result) is used as-is.

use std::collections::{BTreeMap, HashMap};
use std::io::{BufReader, Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;
use zip::ZipArchive;

use super::cell_ref::{column_letter, parse_cell_ref};
use super::ImportedTable;
use crate::error::{BarcodeGridError, Result};

/// Cell type tag from the `t` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellTypeTag {
    Shared,
    Bool,
    Inline,
    Plain,
}

fn parse_cell_type_tag(raw: &[u8]) -> CellTypeTag {
    match raw {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Plain,
    }
}

/// Attribute value by local name (namespace prefix ignored).
fn attr_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| std::str::from_utf8(&attr.value).ok().map(str::to_string))
}

/// Parse XLSX bytes into a table built from the first worksheet.
pub fn parse_xlsx(data: &[u8]) -> Result<ImportedTable> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| {
        BarcodeGridError::Import(format!(
            "not a readable spreadsheet (legacy .xls files must be saved as .xlsx): {e}"
        ))
    })?;

    let rels = parse_workbook_relationships(&mut archive);
    let sheet_path = first_sheet_path(&mut archive, &rels.worksheets)?;
    let shared = parse_shared_strings(&mut archive, rels.shared_strings.as_deref());
    let cells = parse_sheet_cells(&mut archive, &sheet_path, &shared)?;
    debug!(
        sheet = %sheet_path,
        shared_strings = shared.len(),
        cells = cells.len(),
        "parsed worksheet"
    );

    table_from_cells(&cells)
}

#[derive(Default, Debug)]
struct WorkbookRelationships {
    /// rId -> full path, e.g. "rId1" -> "xl/worksheets/sheet1.xml"
    worksheets: HashMap<String, String>,
    shared_strings: Option<String>,
}

/// Parse workbook relationships from xl/_rels/workbook.xml.rels
fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> WorkbookRelationships {
    let mut rels = WorkbookRelationships::default();

    let Ok(file) = archive.by_name("xl/_rels/workbook.xml.rels") else {
        return rels; // Relationships file is optional
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_local(e, b"Id").unwrap_or_default();
                let target = attr_local(e, b"Target").unwrap_or_default();
                let rel_type = attr_local(e, b"Type").unwrap_or_default();

                // Resolve target path relative to xl/
                let full_path = target
                    .strip_prefix('/')
                    .map_or_else(|| format!("xl/{target}"), str::to_string);

                if rel_type.contains("worksheet") && !id.is_empty() && !target.is_empty() {
                    rels.worksheets.insert(id, full_path);
                } else if rel_type.contains("sharedStrings") {
                    rels.shared_strings = Some(full_path);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Path of the first `<sheet>` in xl/workbook.xml.
fn first_sheet_path<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    worksheets: &HashMap<String, String>,
) -> Result<String> {
    let file = archive.by_name("xl/workbook.xml")?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) if e.local_name().as_ref() == b"sheet" => {
                // r:id attribute (namespace prefixed)
                let path = attr_local(e, b"id")
                    .and_then(|r_id| worksheets.get(&r_id).cloned())
                    .unwrap_or_else(|| "xl/worksheets/sheet1.xml".to_string());
                return Ok(path);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Err(BarcodeGridError::EmptyImport("no worksheets".into()))
}

/// Parse shared strings, concatenating rich text runs.
fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Vec<String> {
    let sst_path = path.unwrap_or("xl/sharedStrings.xml");
    let Ok(file) = archive.by_name(sst_path) else {
        return Vec::new(); // SharedStrings is optional
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"t" if in_si => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    strings
}

/// Collect non-empty cell text keyed by `(row, col)`.
fn parse_sheet_cells<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
    shared: &[String],
) -> Result<BTreeMap<(u32, u32), String>> {
    let file = archive.by_name(path)?;
    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut cells = BTreeMap::new();
    let mut buf = Vec::new();

    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;
    // Current cell: position, type, captured text
    let mut cell: Option<((u32, u32), CellTypeTag)> = None;
    let mut text = String::new();
    let mut capturing = false;
    let mut in_inline = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = attr_local(e, b"r")
                        .and_then(|r| r.parse::<u32>().ok())
                        .map_or(current_row, |r| r.saturating_sub(1));
                    next_col = 0;
                }
                b"c" => {
                    let pos = attr_local(e, b"r")
                        .and_then(|r| parse_cell_ref(r.as_bytes()))
                        .map_or((current_row, next_col), |(c, r)| (r, c));
                    let tag = attr_local(e, b"t")
                        .map_or(CellTypeTag::Plain, |t| parse_cell_type_tag(t.as_bytes()));
                    next_col = pos.1.saturating_add(1);
                    cell = Some((pos, tag));
                    text.clear();
                }
                b"v" if cell.is_some() => capturing = true,
                b"is" if cell.is_some() => in_inline = true,
                b"t" if in_inline => capturing = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"c" => {
                let col = attr_local(e, b"r")
                    .and_then(|r| parse_cell_ref(r.as_bytes()))
                    .map_or(next_col, |(c, _)| c);
                next_col = col.saturating_add(1);
            }
            Ok(Event::Text(ref e)) if capturing => {
                if let Ok(unescaped) = e.unescape() {
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" | b"t" => capturing = false,
                b"is" => in_inline = false,
                b"c" => {
                    if let Some((pos, tag)) = cell.take() {
                        let value = resolve_cell_text(&text, tag, shared);
                        if !value.trim().is_empty() {
                            cells.insert(pos, value);
                        }
                    }
                    capturing = false;
                    in_inline = false;
                }
                b"row" => current_row = current_row.saturating_add(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
        buf.clear();
    }

    Ok(cells)
}

/// Text shown for a cell given its type tag.
fn resolve_cell_text(raw: &str, tag: CellTypeTag, shared: &[String]) -> String {
    match tag {
        CellTypeTag::Shared => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|idx| shared.get(idx))
            .cloned()
            .unwrap_or_default(),
        CellTypeTag::Bool => match raw.trim() {
            "1" => "true".to_string(),
            "0" => "false".to_string(),
            other => other.to_string(),
        },
        CellTypeTag::Inline | CellTypeTag::Plain => raw.to_string(),
    }
}

/// First populated row is the header row; later populated rows are data.
fn table_from_cells(cells: &BTreeMap<(u32, u32), String>) -> Result<ImportedTable> {
    let Some(&(header_row, _)) = cells.keys().next() else {
        return ImportedTable::new(Vec::new(), Vec::new());
    };
    let min_col = cells.keys().map(|&(_, c)| c).min().unwrap_or(0);
    let max_col = cells.keys().map(|&(_, c)| c).max().unwrap_or(0);

    let headers: Vec<String> = (min_col..=max_col)
        .map(|col| {
            cells
                .get(&(header_row, col))
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| column_letter(col))
        })
        .collect();

    let mut rows: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for (&(row, col), value) in cells.range((header_row.saturating_add(1), 0)..) {
        let fields = rows
            .entry(row)
            .or_insert_with(|| vec![String::new(); headers.len()]);
        if let Some(slot) = col
            .checked_sub(min_col)
            .and_then(|i| fields.get_mut(i as usize))
        {
            *slot = value.trim().to_string();
        }
    }

    ImportedTable::new(headers, rows.into_values().collect())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_cell_text() {
        let shared = vec!["A-01".to_string()];
        assert_eq!(resolve_cell_text("0", CellTypeTag::Shared, &shared), "A-01");
        assert_eq!(resolve_cell_text("7", CellTypeTag::Shared, &shared), "");
        assert_eq!(resolve_cell_text("1", CellTypeTag::Bool, &shared), "true");
        assert_eq!(resolve_cell_text("42", CellTypeTag::Plain, &shared), "42");
    }

    #[test]
    fn test_table_from_cells() {
        let mut cells = BTreeMap::new();
        cells.insert((1, 1), "Location".to_string());
        cells.insert((2, 1), "A-01".to_string());
        cells.insert((2, 2), "x".to_string());
        cells.insert((4, 2), "y".to_string());
        let table = table_from_cells(&cells).unwrap();
        assert_eq!(table.headers(), &["Location", "C"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(1, 0), Some(""));
        assert_eq!(table.value(1, 1), Some("y"));
    }

    #[test]
    fn test_not_a_zip() {
        let err = parse_xlsx(b"\xd0\xcf\x11\xe0legacy").unwrap_err();
        assert!(matches!(err, BarcodeGridError::Import(_)));
    }
}
