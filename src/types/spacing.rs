use serde::{Deserialize, Serialize};

/// Gap, in pixels, used when no spacing override exists.
pub const DEFAULT_SPACING: f64 = 16.0;

/// Extra gap inserted after a grid line (global row index).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineSpacing {
    pub after_line_index: u32,
    pub spacing: f64,
}

/// Extra gap inserted after a column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpacing {
    pub after_column_index: u32,
    pub spacing: f64,
}
