use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default cell background.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";
/// Default bar and text ink.
pub const DEFAULT_INK: &str = "#000000";

/// The three colors a cell is painted with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ColorSet {
    pub background_color: String,
    pub barcode_color: String,
    pub text_color: String,
}

impl ColorSet {
    pub fn new(
        background_color: impl Into<String>,
        barcode_color: impl Into<String>,
        text_color: impl Into<String>,
    ) -> Self {
        Self {
            background_color: background_color.into(),
            barcode_color: barcode_color.into(),
            text_color: text_color.into(),
        }
    }
}

impl Default for ColorSet {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND, DEFAULT_INK, DEFAULT_INK)
    }
}

/// Color override for one grid line (global row index).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LineColor {
    pub line_index: u32,
    #[serde(flatten)]
    pub colors: ColorSet,
}

/// Color override for one column.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnColor {
    pub column_index: u32,
    #[serde(flatten)]
    pub colors: ColorSet,
}

/// Color override for one cell.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CellColor {
    pub row: u32,
    pub col: u32,
    #[serde(flatten)]
    pub colors: ColorSet,
}

/// Cell coordinate, written `"row-col"` wherever a string key is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row: u32,
    pub col: u32,
}

impl CellKey {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

impl FromStr for CellKey {
    type Err = crate::error::BarcodeGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || crate::error::BarcodeGridError::InvalidInput(format!("bad cell key {s:?}"));
        let (row, col) = s.trim().split_once('-').ok_or_else(invalid)?;
        Ok(Self {
            row: row.parse().map_err(|_| invalid())?,
            col: col.parse().map_err(|_| invalid())?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_key_roundtrip() {
        let key: CellKey = "3-1".parse().unwrap();
        assert_eq!(key, CellKey::new(3, 1));
        assert_eq!(key.to_string(), "3-1");
        assert!("3".parse::<CellKey>().is_err());
        assert!("a-b".parse::<CellKey>().is_err());
    }

    #[test]
    fn test_override_records_flatten() {
        let line = LineColor {
            line_index: 2,
            colors: ColorSet::new("#eeeeee", "#111111", "#222222"),
        };
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["lineIndex"], 2);
        assert_eq!(json["backgroundColor"], "#eeeeee");
        assert_eq!(json["textColor"], "#222222");

        let cell: CellColor = serde_json::from_str(
            r##"{"row":1,"col":0,"backgroundColor":"#fff","barcodeColor":"#000","textColor":"#000"}"##,
        )
        .unwrap();
        assert_eq!(cell.row, 1);
        assert_eq!(cell.colors.background_color, "#fff");
    }
}
