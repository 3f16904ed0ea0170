//! Minimal CSV/TSV reader producing an [`ImportedTable`].
//!
//! The first non-empty line is the header row. Fields may be quoted with `""`
//! escapes; quoted fields cannot span lines.

use tracing::debug;

use super::cell_ref::column_letter;
use super::ImportedTable;
use crate::error::Result;

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    pub const fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Tab => '\t',
        }
    }

    /// Comma unless the header line has none and uses `;` or tab instead.
    pub fn detect(header: &str) -> Self {
        if header.contains(',') {
            Self::Comma
        } else if header.contains(';') {
            Self::Semicolon
        } else if header.contains('\t') {
            Self::Tab
        } else {
            Self::Comma
        }
    }
}

/// Parse delimited text bytes (UTF-8, lossy) into a table.
pub fn parse_delimited(data: &[u8]) -> Result<ImportedTable> {
    let decoded = String::from_utf8_lossy(data);
    let text = decoded
        .strip_prefix('\u{feff}')
        .unwrap_or(decoded.as_ref());

    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return ImportedTable::new(Vec::new(), Vec::new());
    };
    let delim = Delimiter::detect(header_line);
    let sep = delim.as_char();

    let headers = unique_headers(
        split_csv_line(header_line, sep)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect(),
    );

    let rows: Vec<Vec<String>> = lines
        .map(|line| {
            let mut fields: Vec<String> = split_csv_line(line, sep)
                .into_iter()
                .map(|f| f.trim().to_string())
                .collect();
            fields.resize(headers.len(), String::new());
            fields
        })
        .filter(|fields| fields.iter().any(|f| !f.is_empty()))
        .collect();

    debug!(?delim, columns = headers.len(), rows = rows.len(), "parsed delimited text");
    ImportedTable::new(headers, rows)
}

/// Name empty headers by column letter and suffix repeats with `_1`, `_2`, ...
fn unique_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(raw.len());
    for (idx, header) in raw.into_iter().enumerate() {
        let base = if header.is_empty() {
            column_letter(u32::try_from(idx).unwrap_or(u32::MAX))
        } else {
            header
        };
        let mut name = base.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{base}_{n}");
            n += 1;
        }
        seen.push(name);
    }
    seen
}

/// Split a CSV line respecting quoted fields.
fn split_csv_line(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    // Escaped quote
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == sep {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::error::BarcodeGridError;

    #[test]
    fn test_parse_csv_basic() {
        let table = parse_delimited(b"Name,Location\nShelf,A-01\nBin,A-02\n").unwrap();
        assert_eq!(table.headers(), &["Name", "Location"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(1, 1), Some("A-02"));
    }

    #[test]
    fn test_semicolon_and_tab_detection() {
        let table = parse_delimited(b"code;zone\nX1;north").unwrap();
        assert_eq!(table.headers(), &["code", "zone"]);
        assert_eq!(table.value(0, 1), Some("north"));

        let table = parse_delimited(b"code\tzone\nX1\tnorth").unwrap();
        assert_eq!(table.value(0, 1), Some("north"));
    }

    #[test]
    fn test_quoted_csv() {
        let table =
            parse_delimited(b"a,b\n\"Hello, World\",42\n\"She said \"\"hi\"\"\",0").unwrap();
        assert_eq!(table.value(0, 0), Some("Hello, World"));
        assert_eq!(table.value(1, 0), Some("She said \"hi\""));
    }

    #[test]
    fn test_blank_lines_and_short_rows() {
        let table = parse_delimited(b"\xef\xbb\xbfa,b,c\n\n1\n ,,\n4,5,6,7\n").unwrap();
        assert_eq!(table.headers(), &["a", "b", "c"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(0, 2), Some(""));
        assert_eq!(table.value(1, 2), Some("6"));
    }

    #[test]
    fn test_header_names() {
        let table = parse_delimited(b"id,,id\n1,2,3").unwrap();
        assert_eq!(table.headers(), &["id", "B", "id_1"]);
    }

    #[test]
    fn test_empty_csv() {
        let err = parse_delimited(b"").unwrap_err();
        assert!(matches!(err, BarcodeGridError::EmptyImport(_)));
        let err = parse_delimited(b"location\n").unwrap_err();
        assert!(matches!(err, BarcodeGridError::EmptyImport(ref m) if m == "no rows"));
    }
}
