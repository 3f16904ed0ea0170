//! Test fixtures for generating import files in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{Cell, XlsxBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .add_sheet("Stock")
//!     .add_row(&[Cell::shared("Location")])
//!     .add_row(&[Cell::shared("A-01")])
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

use barcodegrid::import::cell_ref::column_letter;

/// One worksheet cell as written to the file.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Text stored in the shared string table.
    Shared(String),
    /// Text stored inline (`t="inlineStr"`).
    Inline(String),
    Number(f64),
    Bool(bool),
    /// No `<c>` element at all.
    Empty,
}

impl Cell {
    pub fn shared(text: &str) -> Self {
        Self::Shared(text.to_string())
    }

    pub fn inline(text: &str) -> Self {
        Self::Inline(text.to_string())
    }
}

#[derive(Debug, Clone, Default)]
struct Sheet {
    name: String,
    /// `(row number, cells)`; row numbers are 1-based and may skip.
    rows: Vec<(u32, Vec<Cell>)>,
}

/// Builder for minimal but valid XLSX packages.
#[derive(Debug, Clone, Default)]
pub struct XlsxBuilder {
    sheets: Vec<Sheet>,
}

impl XlsxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sheet(mut self, name: &str) -> Self {
        self.sheets.push(Sheet {
            name: name.to_string(),
            rows: Vec::new(),
        });
        self
    }

    /// Append a row directly after the last one.
    pub fn add_row(self, cells: &[Cell]) -> Self {
        let next = self
            .sheets
            .last()
            .and_then(|s| s.rows.last())
            .map_or(1, |(n, _)| n + 1);
        self.add_row_at(next, cells)
    }

    /// Add a row with an explicit 1-based row number.
    pub fn add_row_at(mut self, row: u32, cells: &[Cell]) -> Self {
        if self.sheets.is_empty() {
            self = self.add_sheet("Sheet1");
        }
        let sheet = self.sheets.last_mut().unwrap();
        sheet.rows.push((row, cells.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut shared: Vec<String> = Vec::new();
        let sheet_xml: Vec<String> = self
            .sheets
            .iter()
            .map(|sheet| worksheet_xml(sheet, &mut shared))
            .collect();

        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            let options = FileOptions::default();

            let mut content_types = String::from(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            );
            for i in 1..=self.sheets.len() {
                content_types.push_str(&format!(
                    r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
                ));
            }
            content_types.push_str("</Types>");
            zip.start_file("[Content_Types].xml", options).unwrap();
            zip.write_all(content_types.as_bytes()).unwrap();

            zip.start_file("_rels/.rels", options).unwrap();
            zip.write_all(br#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#).unwrap();

            let mut workbook = String::from(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
            );
            let mut rels = String::from(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            );
            for (i, sheet) in self.sheets.iter().enumerate() {
                let n = i + 1;
                workbook.push_str(&format!(
                    r#"<sheet name="{}" sheetId="{n}" r:id="rId{n}"/>"#,
                    sheet.name
                ));
                rels.push_str(&format!(
                    r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
                ));
            }
            workbook.push_str("</sheets></workbook>");
            rels.push_str(
                r#"<Relationship Id="rIdSst" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            );
            rels.push_str("</Relationships>");

            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(workbook.as_bytes()).unwrap();
            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(rels.as_bytes()).unwrap();

            for (i, xml) in sheet_xml.iter().enumerate() {
                zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                    .unwrap();
                zip.write_all(xml.as_bytes()).unwrap();
            }

            let mut sst = format!(
                r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
                shared.len()
            );
            for s in &shared {
                sst.push_str(&format!("<si><t>{}</t></si>", escape(s)));
            }
            sst.push_str("</sst>");
            zip.start_file("xl/sharedStrings.xml", options).unwrap();
            zip.write_all(sst.as_bytes()).unwrap();

            zip.finish().unwrap();
        }
        buf.into_inner()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn worksheet_xml(sheet: &Sheet, shared: &mut Vec<String>) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row, cells) in &sheet.rows {
        xml.push_str(&format!(r#"<row r="{row}">"#));
        for (col, cell) in cells.iter().enumerate() {
            let r = format!("{}{row}", column_letter(col as u32));
            match cell {
                Cell::Shared(text) => {
                    let idx = shared.iter().position(|s| s == text).unwrap_or_else(|| {
                        shared.push(text.clone());
                        shared.len() - 1
                    });
                    xml.push_str(&format!(r#"<c r="{r}" t="s"><v>{idx}</v></c>"#));
                }
                Cell::Inline(text) => xml.push_str(&format!(
                    r#"<c r="{r}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape(text)
                )),
                Cell::Number(n) => xml.push_str(&format!(r#"<c r="{r}"><v>{n}</v></c>"#)),
                Cell::Bool(b) => xml.push_str(&format!(
                    r#"<c r="{r}" t="b"><v>{}</v></c>"#,
                    u8::from(*b)
                )),
                Cell::Empty => {}
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}
