use std::collections::HashMap;

use super::{
    BarcodeItem, CellColor, CellKey, ColorSet, ColumnColor, ColumnSpacing, GridConfig, LineColor,
    LineSpacing, DEFAULT_SPACING,
};

/// Keyed color and spacing overrides.
///
/// Iteration order of the maps carries no meaning; the record accessors sort
/// by key so serialized presets are stable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overrides {
    pub line_colors: HashMap<u32, ColorSet>,
    pub column_colors: HashMap<u32, ColorSet>,
    pub cell_colors: HashMap<CellKey, ColorSet>,
    pub line_spacing: HashMap<u32, f64>,
    pub column_spacing: HashMap<u32, f64>,
}

impl Overrides {
    /// Gap after a line, falling back to [`DEFAULT_SPACING`].
    pub fn spacing_after_line(&self, line: u32) -> f64 {
        self.line_spacing
            .get(&line)
            .copied()
            .unwrap_or(DEFAULT_SPACING)
    }

    /// Gap after a column, falling back to [`DEFAULT_SPACING`].
    pub fn spacing_after_column(&self, col: u32) -> f64 {
        self.column_spacing
            .get(&col)
            .copied()
            .unwrap_or(DEFAULT_SPACING)
    }

    pub fn has_colors(&self) -> bool {
        !self.line_colors.is_empty() || !self.column_colors.is_empty() || !self.cell_colors.is_empty()
    }

    pub fn line_color_records(&self) -> Vec<LineColor> {
        let mut records: Vec<LineColor> = self
            .line_colors
            .iter()
            .map(|(&line_index, colors)| LineColor {
                line_index,
                colors: colors.clone(),
            })
            .collect();
        records.sort_by_key(|r| r.line_index);
        records
    }

    pub fn column_color_records(&self) -> Vec<ColumnColor> {
        let mut records: Vec<ColumnColor> = self
            .column_colors
            .iter()
            .map(|(&column_index, colors)| ColumnColor {
                column_index,
                colors: colors.clone(),
            })
            .collect();
        records.sort_by_key(|r| r.column_index);
        records
    }

    pub fn cell_color_records(&self) -> Vec<CellColor> {
        let mut records: Vec<CellColor> = self
            .cell_colors
            .iter()
            .map(|(key, colors)| CellColor {
                row: key.row,
                col: key.col,
                colors: colors.clone(),
            })
            .collect();
        records.sort_by_key(|r| (r.row, r.col));
        records
    }

    pub fn line_spacing_records(&self) -> Vec<LineSpacing> {
        let mut records: Vec<LineSpacing> = self
            .line_spacing
            .iter()
            .map(|(&after_line_index, &spacing)| LineSpacing {
                after_line_index,
                spacing,
            })
            .collect();
        records.sort_by_key(|r| r.after_line_index);
        records
    }

    pub fn column_spacing_records(&self) -> Vec<ColumnSpacing> {
        let mut records: Vec<ColumnSpacing> = self
            .column_spacing
            .iter()
            .map(|(&after_column_index, &spacing)| ColumnSpacing {
                after_column_index,
                spacing,
            })
            .collect();
        records.sort_by_key(|r| r.after_column_index);
        records
    }

    /// Rebuild the maps from persisted records. Later records win on duplicate keys.
    pub fn from_records(
        line_colors: &[LineColor],
        column_colors: &[ColumnColor],
        cell_colors: &[CellColor],
        line_spacing: &[LineSpacing],
        column_spacing: &[ColumnSpacing],
    ) -> Self {
        Self {
            line_colors: line_colors
                .iter()
                .map(|r| (r.line_index, r.colors.clone()))
                .collect(),
            column_colors: column_colors
                .iter()
                .map(|r| (r.column_index, r.colors.clone()))
                .collect(),
            cell_colors: cell_colors
                .iter()
                .map(|r| (CellKey::new(r.row, r.col), r.colors.clone()))
                .collect(),
            line_spacing: line_spacing
                .iter()
                .map(|r| (r.after_line_index, r.spacing))
                .collect(),
            column_spacing: column_spacing
                .iter()
                .map(|r| (r.after_column_index, r.spacing))
                .collect(),
        }
    }
}

/// Everything a history snapshot captures: data, configuration and overrides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridState {
    pub data: Vec<BarcodeItem>,
    pub config: GridConfig,
    pub overrides: Overrides,
}

impl GridState {
    /// Number of grid lines needed for the current data, ignoring pagination.
    pub fn total_rows(&self) -> usize {
        self.data.len().div_ceil(self.config.effective_columns())
    }
}
