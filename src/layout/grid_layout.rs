//! Pre-computed geometry for every page, line and cell of a grid.
//!
//! Positions are in pixels relative to the page's content box (inside the
//! margins). Column positions are shared by every page; line positions depend
//! on the line spacing overrides, which are keyed by global line index.

use serde::Serialize;

use super::metrics::PageMetrics;
use super::page_range::PageSelection;
use super::paginate::{PageSlice, Pagination};
use crate::color::resolve_colors;
use crate::types::{CellKey, ColorSet, GridState, Overrides, PageFormat};

/// Complete layout of a grid state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridLayout {
    pub page_format: PageFormat,
    pub metrics: PageMetrics,
    pub columns: usize,
    pub rows_per_page: usize,
    pub item_count: usize,
    pub total_pages: usize,
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge),
    /// followed by the right edge of the last column.
    pub col_positions: Vec<f64>,
    pub col_width: f64,
    pub pages: Vec<PageLayout>,
}

/// One printed page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub index: usize,
    /// One-based page number.
    pub number: usize,
    pub lines: Vec<LineLayout>,
}

/// One grid line on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineLayout {
    /// Global line index.
    pub line: u32,
    /// Offset within the page.
    pub offset: usize,
    pub y: f64,
    pub height: f64,
    /// Gap below this line; zero for the last line on a page.
    pub spacing_after: f64,
    pub cells: Vec<CellLayout>,
}

/// One cell, filled or placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellLayout {
    pub row: u32,
    pub col: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Index into the item list, `None` for a placeholder.
    pub item_index: Option<usize>,
    pub colors: ColorSet,
}

impl CellLayout {
    pub fn key(&self) -> CellKey {
        CellKey::new(self.row, self.col)
    }

    pub fn is_placeholder(&self) -> bool {
        self.item_index.is_none()
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

fn index_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

impl GridLayout {
    /// Lay out every page of `state`.
    pub fn compute(state: &GridState) -> Self {
        let config = &state.config;
        let metrics = PageMetrics::compute(config);
        let pagination = Pagination::for_config(state.data.len(), config);
        let columns = pagination.columns();

        let (col_positions, col_width) =
            column_positions(columns, metrics.content_width_px, &state.overrides);

        let pages = pagination
            .pages()
            .map(|page| {
                layout_page(
                    &page,
                    &col_positions,
                    col_width,
                    metrics.row_height_px,
                    &state.overrides,
                )
            })
            .collect();

        Self {
            page_format: config.page_format,
            metrics,
            columns,
            rows_per_page: pagination.rows_per_page(),
            item_count: pagination.item_count(),
            total_pages: pagination.total_pages(),
            col_positions,
            col_width,
            pages,
        }
    }

    /// Page by one-based number.
    pub fn page(&self, number: usize) -> Option<&PageLayout> {
        self.pages.get(number.checked_sub(1)?)
    }

    /// Pages kept by a print selection; `None` keeps them all.
    pub fn selected_pages<'a>(
        &'a self,
        selection: Option<&'a PageSelection>,
    ) -> impl Iterator<Item = &'a PageLayout> + 'a {
        self.pages
            .iter()
            .filter(move |page| selection.map_or(true, |s| s.contains(page.number)))
    }

    /// Find column at x position (binary search). Gaps between columns hit nothing.
    pub fn col_at_x(&self, x: f64) -> Option<u32> {
        let after = self.col_positions.partition_point(|&pos| pos <= x);
        let col = after.checked_sub(1)?;
        if col >= self.columns {
            return None;
        }
        let left = self.col_positions.get(col).copied()?;
        (x < left + self.col_width).then(|| index_u32(col))
    }

    /// Cell under `(x, y)` on the page at `page_index`.
    pub fn cell_at(&self, page_index: usize, x: f64, y: f64) -> Option<&CellLayout> {
        let col = self.col_at_x(x)?;
        let line = self.pages.get(page_index)?.line_at_y(y)?;
        line.cells
            .get(col as usize)
            .filter(|cell| cell.contains(x, y))
    }

    /// Cell by global coordinates.
    pub fn cell(&self, key: CellKey) -> Option<&CellLayout> {
        let rows = self.rows_per_page;
        let line = key.row as usize;
        let page = self.pages.get(line / rows)?;
        page.lines.get(line % rows)?.cells.get(key.col as usize)
    }

    /// Every filled cell in reading order.
    pub fn filled_cells(&self) -> impl Iterator<Item = &CellLayout> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.lines.iter())
            .flat_map(|line| line.cells.iter())
            .filter(|cell| !cell.is_placeholder())
    }

    /// Total width of the column block.
    pub fn total_width(&self) -> f64 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }
}

impl PageLayout {
    /// Find the line at y position (binary search). Gaps between lines hit nothing.
    pub fn line_at_y(&self, y: f64) -> Option<&LineLayout> {
        let after = self.lines.partition_point(|line| line.y <= y);
        let line = self.lines.get(after.checked_sub(1)?)?;
        (y < line.y + line.height).then_some(line)
    }

    /// Height used by this page's lines and the gaps between them.
    pub fn used_height(&self) -> f64 {
        self.lines
            .last()
            .map_or(0.0, |line| line.y + line.height)
    }
}

/// Left edges of each column plus the final edge, and the shared column width.
fn column_positions(columns: usize, content_width: f64, overrides: &Overrides) -> (Vec<f64>, f64) {
    let gap = |col: usize| overrides.spacing_after_column(index_u32(col)).max(0.0);
    let total_gap: f64 = (0..columns.saturating_sub(1)).map(gap).sum();
    let width = ((content_width - total_gap) / columns.max(1) as f64).max(0.0);

    let mut positions = Vec::with_capacity(columns + 1);
    let mut x = 0.0;
    for col in 0..columns {
        positions.push(x);
        x += width;
        if col + 1 < columns {
            x += gap(col);
        }
    }
    positions.push(x); // Final edge
    (positions, width)
}

fn layout_page(
    page: &PageSlice,
    col_positions: &[f64],
    col_width: f64,
    row_height: f64,
    overrides: &Overrides,
) -> PageLayout {
    let mut y = 0.0;
    let lines = page
        .lines()
        .map(|slice| {
            let line = index_u32(slice.index);
            let spacing_after = if slice.offset + 1 < page.lines {
                overrides.spacing_after_line(line).max(0.0)
            } else {
                0.0
            };
            let cells = slice
                .cells()
                .map(|(col, item_index)| {
                    let col = index_u32(col);
                    CellLayout {
                        row: line,
                        col,
                        x: col_positions.get(col as usize).copied().unwrap_or(0.0),
                        y,
                        width: col_width,
                        height: row_height,
                        item_index,
                        colors: resolve_colors(CellKey::new(line, col), overrides),
                    }
                })
                .collect();
            let layout = LineLayout {
                line,
                offset: slice.offset,
                y,
                height: row_height,
                spacing_after,
                cells,
            };
            y += row_height + spacing_after;
            layout
        })
        .collect();

    PageLayout {
        index: page.index,
        number: page.number(),
        lines,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::types::{BarcodeItem, GridConfig};

    fn state(count: usize, columns: u32, rows: u32) -> GridState {
        GridState {
            data: (0..count)
                .map(|i| BarcodeItem::new(format!("id-{i}"), format!("V{i:04}")))
                .collect(),
            config: GridConfig {
                columns,
                rows,
                ..GridConfig::default()
            },
            overrides: Overrides::default(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_basic_layout() {
        let layout = GridLayout::compute(&state(10, 4, 2));
        assert_eq!(layout.total_pages, 2);
        assert_eq!(layout.pages[0].lines.len(), 2);
        assert_eq!(layout.pages[1].lines.len(), 1);
        let last = &layout.pages[1].lines[0];
        assert_eq!(last.line, 2);
        assert_eq!(last.cells[1].item_index, Some(9));
        assert!(last.cells[2].is_placeholder());
        assert_eq!(last.spacing_after, 0.0);
    }

    #[test]
    fn test_column_geometry_with_spacing() {
        let mut s = state(4, 4, 1);
        s.overrides.column_spacing.insert(1, 40.0);
        // Spacing after the last column never counts.
        s.overrides.column_spacing.insert(3, 500.0);
        let layout = GridLayout::compute(&s);
        let content = layout.metrics.content_width_px;
        let width = (content - 16.0 - 40.0 - 16.0) / 4.0;
        assert!(approx(layout.col_width, width));
        assert!(approx(layout.col_positions[1], width + 16.0));
        assert!(approx(layout.col_positions[2], 2.0 * width + 56.0));
        assert!(approx(layout.total_width(), content));
    }

    #[test]
    fn test_line_spacing_keyed_by_global_line() {
        let mut s = state(12, 2, 3);
        s.overrides.line_spacing.insert(3, 50.0);
        let layout = GridLayout::compute(&s);
        let page = &layout.pages[1];
        assert_eq!(page.lines[0].line, 3);
        assert_eq!(page.lines[0].spacing_after, 50.0);
        let h = layout.metrics.row_height_px;
        assert!(approx(page.lines[1].y, h + 50.0));
        assert!(approx(page.lines[2].y, 2.0 * h + 66.0));
        // First page untouched.
        assert_eq!(layout.pages[0].lines[0].spacing_after, 16.0);
    }

    #[test]
    fn test_cells_carry_resolved_colors() {
        let mut s = state(4, 2, 2);
        s.overrides
            .line_colors
            .insert(1, ColorSet::new("#fef3c7", "#000000", "#000000"));
        let layout = GridLayout::compute(&s);
        assert_eq!(
            layout.cell(CellKey::new(1, 0)).unwrap().colors.background_color,
            "#fef3c7"
        );
        assert_eq!(
            layout.cell(CellKey::new(0, 1)).unwrap().colors,
            ColorSet::default()
        );
    }

    #[test]
    fn test_hit_testing() {
        let layout = GridLayout::compute(&state(8, 4, 2));
        let w = layout.col_width;
        let h = layout.metrics.row_height_px;

        let cell = layout.cell_at(0, w + 16.0 + 1.0, 1.0).unwrap();
        assert_eq!((cell.row, cell.col), (0, 1));

        let cell = layout.cell_at(0, 1.0, h + 16.0 + 1.0).unwrap();
        assert_eq!((cell.row, cell.col), (1, 0));

        // Column gap and line gap.
        assert!(layout.cell_at(0, w + 8.0, 1.0).is_none());
        assert!(layout.cell_at(0, 1.0, h + 8.0).is_none());
        // Outside the grid.
        assert!(layout.cell_at(0, -1.0, 1.0).is_none());
        assert!(layout.cell_at(0, layout.total_width() + 1.0, 1.0).is_none());
        assert!(layout.cell_at(5, 1.0, 1.0).is_none());
    }

    #[test]
    fn test_empty_grid() {
        let layout = GridLayout::compute(&state(0, 4, 10));
        assert_eq!(layout.total_pages, 0);
        assert!(layout.pages.is_empty());
        assert_eq!(layout.filled_cells().count(), 0);
        assert!(layout.page(1).is_none());
    }

    #[test]
    fn test_filled_cells_in_reading_order() {
        let layout = GridLayout::compute(&state(7, 3, 2));
        let indices: Vec<_> = layout.filled_cells().filter_map(|c| c.item_index).collect();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
    }
}
