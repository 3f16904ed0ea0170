//! On-screen preview markup: the same geometry as print, plus the hooks the
//! browser needs for hit feedback (`data-row`/`data-col`, selection and
//! hover classes).

use std::collections::BTreeSet;

use super::{barcode_markup, cell_style, px, ColorMode};
use crate::layout::{CellLayout, GridLayout};
use crate::types::{CellKey, GridState};

/// Interaction state overlaid on the preview.
#[derive(Debug, Clone, Copy)]
pub struct PreviewOptions<'a> {
    pub selection: &'a BTreeSet<CellKey>,
    pub hovered: Option<CellKey>,
    pub color_mode: ColorMode,
}

/// Preview markup for every page. Empty data yields an empty string.
pub fn render_preview(state: &GridState, layout: &GridLayout, options: &PreviewOptions<'_>) -> String {
    let settings = &state.config.global_settings;
    let metrics = &layout.metrics;
    let mut out = String::with_capacity(state.data.len() * 512);

    for page in &layout.pages {
        out.push_str(&format!(
            "<div class=\"preview-page\" data-page=\"{}\" style=\"width:{}mm;min-height:{}mm;padding:{}mm;box-sizing:border-box\">\n",
            page.number, metrics.page_width_mm, metrics.page_height_mm, metrics.margin_mm
        ));
        for line in &page.lines {
            out.push_str(&format!(
                "<div class=\"preview-line\" data-line=\"{}\" style=\"display:flex;margin-bottom:{}\">",
                line.line,
                px(line.spacing_after)
            ));
            for cell in &line.cells {
                let colors = options.color_mode.apply(&cell.colors);
                out.push_str(&format!(
                    "<div class=\"{}\" data-row=\"{}\" data-col=\"{}\" style=\"{}\">",
                    cell_classes(cell, options),
                    cell.row,
                    cell.col,
                    cell_style(layout, cell, &colors, settings)
                ));
                if let Some(item) = cell.item_index.and_then(|i| state.data.get(i)) {
                    barcode_markup(
                        &mut out,
                        item,
                        &colors,
                        settings,
                        metrics.barcode_height_px,
                    );
                }
                out.push_str("</div>");
            }
            out.push_str("</div>\n");
        }
        out.push_str("</div>\n");
    }
    out
}

fn cell_classes(cell: &CellLayout, options: &PreviewOptions<'_>) -> String {
    let key = cell.key();
    let mut classes = String::from("barcode-cell");
    if cell.is_placeholder() {
        classes.push_str(" placeholder");
        return classes;
    }
    if options.selection.contains(&key) {
        classes.push_str(" selected");
    }
    if options.hovered == Some(key) {
        classes.push_str(" hovered");
    }
    classes
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{BarcodeItem, GridConfig};

    fn state(count: usize) -> GridState {
        GridState {
            data: (0..count)
                .map(|i| BarcodeItem::new(format!("id-{i}"), format!("V{i}")))
                .collect(),
            config: GridConfig {
                columns: 3,
                rows: 2,
                ..GridConfig::default()
            },
            ..GridState::default()
        }
    }

    #[test]
    fn test_cells_carry_coordinates_and_classes() {
        let state = state(7);
        let layout = GridLayout::compute(&state);
        let mut selection = BTreeSet::new();
        selection.insert(CellKey::new(0, 1));
        let html = render_preview(
            &state,
            &layout,
            &PreviewOptions {
                selection: &selection,
                hovered: Some(CellKey::new(2, 0)),
                color_mode: ColorMode::Color,
            },
        );
        assert_eq!(html.matches("class=\"preview-page\"").count(), 2);
        assert!(html.contains("class=\"barcode-cell selected\" data-row=\"0\" data-col=\"1\""));
        assert!(html.contains("class=\"barcode-cell hovered\" data-row=\"2\" data-col=\"0\""));
        // Row 2 holds one item; columns 1 and 2 are placeholders
        assert!(html.contains("class=\"barcode-cell placeholder\" data-row=\"2\" data-col=\"2\""));
        assert_eq!(html.matches("class=\"barcode\"").count(), 7);
    }

    #[test]
    fn test_empty_data_renders_nothing() {
        let state = GridState::default();
        let layout = GridLayout::compute(&state);
        let selection = BTreeSet::new();
        let html = render_preview(
            &state,
            &layout,
            &PreviewOptions {
                selection: &selection,
                hovered: None,
                color_mode: ColorMode::Color,
            },
        );
        assert!(html.is_empty());
    }
}
