//! Page metrics: content box, row height and the barcode height that fits it.

use serde::Serialize;

use crate::types::{GlobalSettings, GridConfig, DEFAULT_SPACING, MM_TO_PX};

/// Smallest barcode height ever produced (px).
pub const MIN_BARCODE_HEIGHT: f64 = 30.0;
/// Largest barcode height ever produced (px).
pub const MAX_BARCODE_HEIGHT: f64 = 150.0;
/// Vertical slack reserved for borders and line height inside a cell (px).
pub const CELL_CHROME: f64 = 20.0;

/// Derived page dimensions for one grid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
    /// Printable width inside the margins.
    pub content_width_px: f64,
    /// Printable height inside the margins.
    pub content_height_px: f64,
    pub row_height_px: f64,
    pub barcode_height_px: f64,
}

impl PageMetrics {
    /// Compute the metrics for `config`.
    ///
    /// Rows per page below 1 count as 1. Inter-row gaps are budgeted at the
    /// default spacing regardless of per-line overrides.
    pub fn compute(config: &GridConfig) -> Self {
        let rows = config.effective_rows();
        let margin = config.effective_margin();
        let page_width_mm = config.page_format.width_mm();
        let page_height_mm = config.page_format.height_mm();

        let content_width_px = ((page_width_mm - margin * 2.0) * MM_TO_PX).max(0.0);
        let available_height = (page_height_mm - margin * 2.0) * MM_TO_PX;
        let total_spacing = DEFAULT_SPACING * rows.saturating_sub(1) as f64;
        let row_height_px = ((available_height - total_spacing) / rows as f64).max(0.0);

        Self {
            page_width_mm,
            page_height_mm,
            margin_mm: margin,
            content_width_px,
            content_height_px: available_height.max(0.0),
            row_height_px,
            barcode_height_px: optimal_barcode_height(row_height_px, &config.global_settings),
        }
    }
}

/// Barcode height that leaves room for padding, label and chrome in a row.
///
/// Always within [`MIN_BARCODE_HEIGHT`, `MAX_BARCODE_HEIGHT`].
pub fn optimal_barcode_height(row_height_px: f64, settings: &GlobalSettings) -> f64 {
    let raw = row_height_px
        - settings.cell_padding * 2.0
        - settings.font_size
        - settings.text_margin
        - CELL_CHROME;
    if raw.is_nan() {
        return MIN_BARCODE_HEIGHT;
    }
    raw.clamp(MIN_BARCODE_HEIGHT, MAX_BARCODE_HEIGHT)
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
    use crate::types::PageFormat;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_a4_metrics() {
        let metrics = PageMetrics::compute(&GridConfig::default());
        // (297 - 40) * 3.7795 = 971.3315; minus 9 gaps of 16 = 827.3315; / 10 rows
        assert!(approx(metrics.content_height_px, 971.3315));
        assert!(approx(metrics.row_height_px, 82.73315));
        // 82.73315 - 20 - 12 - 2 - 20 = 28.73 -> clamped to 30
        assert_eq!(metrics.barcode_height_px, MIN_BARCODE_HEIGHT);
        assert!(approx(metrics.content_width_px, 170.0 * MM_TO_PX));
    }

    #[test]
    fn test_sparse_grid_caps_height() {
        let config = GridConfig {
            rows: 1,
            page_format: PageFormat::A1,
            ..GridConfig::default()
        };
        let metrics = PageMetrics::compute(&config);
        assert_eq!(metrics.barcode_height_px, MAX_BARCODE_HEIGHT);
    }

    #[test]
    fn test_mid_range_height_unclamped() {
        let config = GridConfig {
            rows: 5,
            ..GridConfig::default()
        };
        let metrics = PageMetrics::compute(&config);
        let expected = metrics.row_height_px - 20.0 - 12.0 - 2.0 - 20.0;
        assert!(expected > MIN_BARCODE_HEIGHT && expected < MAX_BARCODE_HEIGHT);
        assert!(approx(metrics.barcode_height_px, expected));
    }

    #[test]
    fn test_zero_rows_treated_as_one() {
        let zero = GridConfig {
            rows: 0,
            ..GridConfig::default()
        };
        let one = GridConfig {
            rows: 1,
            ..GridConfig::default()
        };
        assert_eq!(PageMetrics::compute(&zero), PageMetrics::compute(&one));
    }

    #[test]
    fn test_extreme_settings_stay_in_range() {
        for padding in [-1e9, -500.0, 0.0, 500.0, 1e9, f64::NAN] {
            let settings = GlobalSettings {
                cell_padding: padding,
                font_size: -padding,
                ..GlobalSettings::default()
            };
            let h = optimal_barcode_height(100.0, &settings);
            assert!((MIN_BARCODE_HEIGHT..=MAX_BARCODE_HEIGHT).contains(&h));
        }
    }

    #[test]
    fn test_oversized_margin_collapses_content() {
        let config = GridConfig {
            margin: 200.0,
            ..GridConfig::default()
        };
        let metrics = PageMetrics::compute(&config);
        assert_eq!(metrics.content_width_px, 0.0);
        assert_eq!(metrics.row_height_px, 0.0);
        assert_eq!(metrics.barcode_height_px, MIN_BARCODE_HEIGHT);
    }
}
