//! Render adapters over a computed [`GridLayout`](crate::layout::GridLayout).
//!
//! Both adapters emit HTML. Barcodes themselves are left as `<svg class="barcode">`
//! placeholders whose `data-*` attributes carry everything a symbology
//! library needs to draw them.

pub mod preview;
pub mod print;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::color::grayscale_set;
use crate::layout::{CellLayout, GridLayout};
use crate::types::{BarcodeItem, ColorSet, GlobalSettings};

pub use preview::{render_preview, PreviewOptions};
pub use print::{print_document, PrintOptions};

/// Ink mode for printed and exported output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Color,
    /// Every resolved color is reduced to its gray by luminance.
    Bw,
}

impl ColorMode {
    /// Parse `"color"` / `"bw"`; anything else is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => Some(Self::Color),
            "bw" | "grayscale" | "greyscale" => Some(Self::Bw),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Bw => "bw",
        }
    }

    /// Colors as they should be painted in this mode.
    pub fn apply(self, colors: &ColorSet) -> Cow<'_, ColorSet> {
        match self {
            Self::Color => Cow::Borrowed(colors),
            Self::Bw => Cow::Owned(grayscale_set(colors)),
        }
    }
}

/// Escape text for element content and double-quoted attributes.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Non-negative length with at most two decimals and no trailing zeros.
pub(crate) fn length(value: f64) -> String {
    let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// [`length`] with a `px` unit.
pub(crate) fn px(value: f64) -> String {
    format!("{}px", length(value))
}

/// Gap to the right of column `col`; zero after the last column.
pub(crate) fn column_gap(layout: &GridLayout, col: u32) -> f64 {
    let col = col as usize;
    if col + 1 >= layout.columns {
        return 0.0;
    }
    match (layout.col_positions.get(col), layout.col_positions.get(col + 1)) {
        (Some(left), Some(next)) => (next - left - layout.col_width).max(0.0),
        _ => 0.0,
    }
}

/// The barcode placeholder plus its label for one filled cell.
pub(crate) fn barcode_markup(
    out: &mut String,
    item: &BarcodeItem,
    colors: &ColorSet,
    settings: &GlobalSettings,
    barcode_height: f64,
) {
    out.push_str(&format!(
        "<svg class=\"barcode\" data-value=\"{}\" data-height=\"{}\" data-bar-width=\"{}\" data-color=\"{}\" data-font-size=\"{}\" data-text-margin=\"{}\"></svg>",
        escape(&item.value),
        length(barcode_height),
        settings.bar_width,
        escape(&colors.barcode_color),
        settings.font_size,
        settings.text_margin,
    ));
    out.push_str(&format!(
        "<div class=\"barcode-text\" style=\"color:{};font-size:{}\">{}</div>",
        escape(&colors.text_color),
        px(settings.font_size),
        escape(item.display_text()),
    ));
}

/// Inline style shared by print and preview cells.
pub(crate) fn cell_style(
    layout: &GridLayout,
    cell: &CellLayout,
    colors: &ColorSet,
    settings: &GlobalSettings,
) -> String {
    let mut style = format!(
        "flex:0 0 {};min-height:{};margin-right:{}",
        px(cell.width),
        px(cell.height),
        px(column_gap(layout, cell.col)),
    );
    if !cell.is_placeholder() {
        style.push_str(&format!(
            ";background-color:{};padding:{}",
            escape(&colors.background_color),
            px(settings.cell_padding),
        ));
    }
    style
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::{GridConfig, GridState};

    #[test]
    fn test_color_mode_names() {
        assert_eq!(ColorMode::from_name("BW"), Some(ColorMode::Bw));
        assert_eq!(ColorMode::from_name("color"), Some(ColorMode::Color));
        assert_eq!(ColorMode::from_name("sepia"), None);
        assert_eq!(ColorMode::Bw.as_str(), "bw");
    }

    #[test]
    fn test_bw_mode_grays_every_field() {
        let colors = ColorSet::new("#ff0000", "#00ff00", "#0000ff");
        let gray = ColorMode::Bw.apply(&colors);
        for c in [&gray.background_color, &gray.barcode_color, &gray.text_color] {
            let rest = c.trim_start_matches('#');
            assert_eq!(&rest[0..2], &rest[2..4]);
            assert_eq!(&rest[2..4], &rest[4..6]);
        }
        assert_eq!(ColorMode::Color.apply(&colors).as_ref(), &colors);
    }

    #[test]
    fn test_px_formatting() {
        assert_eq!(px(16.0), "16px");
        assert_eq!(px(12.5), "12.5px");
        assert_eq!(px(1.0 / 3.0), "0.33px");
        assert_eq!(px(-4.0), "0px");
        assert_eq!(px(f64::NAN), "0px");
        assert_eq!(length(82.737), "82.74");
    }

    #[test]
    fn test_barcode_height_keeps_fraction() {
        let mut out = String::new();
        let item = BarcodeItem::new("barcode-0-0", "LOC-0001");
        let settings = GlobalSettings::default();
        barcode_markup(&mut out, &item, &ColorSet::default(), &settings, 48.256);
        assert!(out.contains("data-height=\"48.26\""), "{out}");

        out.clear();
        barcode_markup(&mut out, &item, &ColorSet::default(), &settings, 150.0);
        assert!(out.contains("data-height=\"150\""), "{out}");
    }

    #[test]
    fn test_column_gap_follows_overrides() {
        let mut state = GridState {
            data: (0..3)
                .map(|i| BarcodeItem::new(format!("{i}"), format!("{i}")))
                .collect(),
            config: GridConfig {
                columns: 3,
                ..GridConfig::default()
            },
            ..GridState::default()
        };
        state.overrides.column_spacing.insert(0, 40.0);
        let layout = GridLayout::compute(&state);
        assert!((column_gap(&layout, 0) - 40.0).abs() < 1e-9);
        assert!((column_gap(&layout, 1) - 16.0).abs() < 1e-9);
        assert!(column_gap(&layout, 2).abs() < 1e-9);
    }
}
