//! Color resolution for grid cells.
//!
//! Handles the cell > line > column > default override chain, hex parsing,
//! and the grayscale mapping used for black & white printing.

use crate::types::{CellKey, ColorSet, Overrides, DEFAULT_BACKGROUND, DEFAULT_INK};

/// Swatches offered next to every color picker.
pub const PRESET_COLORS: [&str; 10] = [
    "#3B82F6", // blue
    "#10B981", // green
    "#F59E0B", // amber
    "#EF4444", // red
    "#8B5CF6", // purple
    "#EC4899", // pink
    "#06B6D4", // cyan
    "#F97316", // orange
    "#14B8A6", // teal
    "#6366F1", // indigo
];

/// Background of even lines when zebra striping.
pub const ZEBRA_EVEN: &str = "#ffffff";
/// Background of odd lines when zebra striping.
pub const ZEBRA_ODD: &str = "#f3f4f6";

/// Zebra color set for a global line index.
pub fn zebra_colors(line: u32) -> ColorSet {
    ColorSet {
        background_color: if line % 2 == 0 { ZEBRA_EVEN } else { ZEBRA_ODD }.to_string(),
        barcode_color: DEFAULT_INK.to_string(),
        text_color: DEFAULT_INK.to_string(),
    }
}

/// Resolve the effective colors of a cell.
///
/// Each field is resolved on its own: cell, then line, then column, then the
/// fixed default. Empty strings count as unset.
pub fn resolve_colors(key: CellKey, overrides: &Overrides) -> ColorSet {
    let cell = overrides.cell_colors.get(&key);
    let line = overrides.line_colors.get(&key.row);
    let column = overrides.column_colors.get(&key.col);
    let tiers = [cell, line, column];

    ColorSet {
        background_color: pick(&tiers, |c| &c.background_color, DEFAULT_BACKGROUND),
        barcode_color: pick(&tiers, |c| &c.barcode_color, DEFAULT_INK),
        text_color: pick(&tiers, |c| &c.text_color, DEFAULT_INK),
    }
}

fn pick(
    tiers: &[Option<&ColorSet>],
    field: impl Fn(&ColorSet) -> &String,
    default: &str,
) -> String {
    tiers
        .iter()
        .flatten()
        .map(|set| field(set))
        .find(|value| !value.is_empty())
        .map_or_else(|| default.to_string(), Clone::clone)
}

/// RGB color with u8 components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#AARRGGBB` (with or without `#`).
    pub fn from_hex(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| -> Option<u8> {
                    let v = u8::from_str_radix(hex.get(i..=i)?, 16).ok()?;
                    Some(v * 17)
                };
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            }
            6 | 8 => {
                let offset = hex.len() - 6;
                let byte = |i: usize| u8::from_str_radix(hex.get(offset + i..offset + i + 2)?, 16).ok();
                Some(Self::new(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance in `[0, 1]` (0.299 R + 0.587 G + 0.114 B).
    pub fn luminance(self) -> f64 {
        let r = f64::from(self.r);
        let g = f64::from(self.g);
        let b = f64::from(self.b);
        (0.299 * r + 0.587 * g + 0.114 * b) / 255.0
    }

    /// Gray with the same luminance.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_grayscale(self) -> Self {
        let level = (self.luminance() * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::new(level, level, level)
    }
}

/// True for strings [`Rgb::from_hex`] accepts.
pub fn is_hex_color(s: &str) -> bool {
    Rgb::from_hex(s).is_some()
}

/// Grayscale version of a CSS color; anything that is not hex passes through.
pub fn grayscale(css: &str) -> String {
    Rgb::from_hex(css).map_or_else(|| css.to_string(), |rgb| rgb.to_grayscale().to_hex())
}

/// Grayscale every field of a color set.
pub fn grayscale_set(colors: &ColorSet) -> ColorSet {
    ColorSet {
        background_color: grayscale(&colors.background_color),
        barcode_color: grayscale(&colors.barcode_color),
        text_color: grayscale(&colors.text_color),
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

    fn set(bg: &str, bar: &str, text: &str) -> ColorSet {
        ColorSet {
            background_color: bg.into(),
            barcode_color: bar.into(),
            text_color: text.into(),
        }
    }

    #[test]
    fn test_no_overrides_yields_defaults() {
        let colors = resolve_colors(CellKey::new(3, 2), &Overrides::default());
        assert_eq!(colors, ColorSet::default());
    }

    #[test]
    fn test_cell_override_wins_everything() {
        let mut overrides = Overrides::default();
        overrides.line_colors.insert(1, set("#111111", "#222222", "#333333"));
        overrides.column_colors.insert(0, set("#444444", "#555555", "#666666"));
        overrides
            .cell_colors
            .insert(CellKey::new(1, 0), set("#aaaaaa", "#bbbbbb", "#cccccc"));
        let colors = resolve_colors(CellKey::new(1, 0), &overrides);
        assert_eq!(colors, set("#aaaaaa", "#bbbbbb", "#cccccc"));
    }

    #[test]
    fn test_line_beats_column() {
        let mut overrides = Overrides::default();
        overrides.line_colors.insert(2, set("#111111", "#222222", "#333333"));
        overrides.column_colors.insert(1, set("#444444", "#555555", "#666666"));
        assert_eq!(
            resolve_colors(CellKey::new(2, 1), &overrides).background_color,
            "#111111"
        );
        assert_eq!(
            resolve_colors(CellKey::new(3, 1), &overrides).background_color,
            "#444444"
        );
    }

    #[test]
    fn test_fields_resolve_independently() {
        let mut overrides = Overrides::default();
        overrides.line_colors.insert(0, set("#fef3c7", "", ""));
        overrides.column_colors.insert(0, set("#dbeafe", "#1d4ed8", ""));
        let colors = resolve_colors(CellKey::new(0, 0), &overrides);
        assert_eq!(colors, set("#fef3c7", "#1d4ed8", DEFAULT_INK));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("fff"), Some(Rgb::new(255, 255, 255)));
        assert_eq!(Rgb::from_hex("#80FF0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(Rgb::from_hex("#12"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
        assert!(!is_hex_color("transparent"));
    }

    #[test]
    fn test_grayscale() {
        assert_eq!(grayscale("#ffffff"), "#ffffff");
        assert_eq!(grayscale("#000000"), "#000000");
        // 0.299 * 255 = 76.2
        assert_eq!(grayscale("#ff0000"), "#4c4c4c");
        assert_eq!(grayscale("transparent"), "transparent");
    }

    #[test]
    fn test_zebra() {
        assert_eq!(zebra_colors(0).background_color, ZEBRA_EVEN);
        assert_eq!(zebra_colors(7).background_color, ZEBRA_ODD);
        assert_eq!(zebra_colors(7).text_color, DEFAULT_INK);
    }

    #[test]
    fn test_palette_is_valid() {
        assert!(PRESET_COLORS.iter().all(|c| is_hex_color(c)));
    }
}
