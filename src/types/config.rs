use serde::{Deserialize, Serialize};

/// Pixels per millimetre used for every mm → px conversion (96 DPI).
pub const MM_TO_PX: f64 = 3.7795;

/// Supported paper formats.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum PageFormat {
    #[default]
    A4,
    A1,
}

impl PageFormat {
    /// Page width in millimetres (portrait).
    pub const fn width_mm(self) -> f64 {
        match self {
            Self::A4 => 210.0,
            Self::A1 => 594.0,
        }
    }

    /// Page height in millimetres (portrait).
    pub const fn height_mm(self) -> f64 {
        match self {
            Self::A4 => 297.0,
            Self::A1 => 841.0,
        }
    }

    /// Parse a format name, falling back to A4 for anything unknown.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("a1") {
            Self::A1
        } else {
            Self::A4
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A1 => "A1",
        }
    }
}

/// Symbol and typography settings shared by every cell (pixel units).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    #[serde(default = "default_barcode_width")]
    pub barcode_width: f64,
    pub barcode_height: f64,
    pub font_size: f64,
    pub bar_width: f64,
    pub text_margin: f64,
    pub cell_padding: f64,
}

fn default_barcode_width() -> f64 {
    2.0
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            barcode_width: 2.0,
            barcode_height: 50.0,
            font_size: 12.0,
            bar_width: 2.0,
            text_margin: 2.0,
            cell_padding: 10.0,
        }
    }
}

/// Grid configuration: dimensions, paper and global style.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    pub columns: u32,
    pub rows: u32,
    #[serde(default, deserialize_with = "lenient_page_format")]
    pub page_format: PageFormat,
    /// Page margin in millimetres.
    pub margin: f64,
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            rows: 10,
            page_format: PageFormat::A4,
            margin: 20.0,
            global_settings: GlobalSettings::default(),
        }
    }
}

/// Accepts any string for `pageFormat`; unknown names become A4.
pub(super) fn lenient_page_format<'de, D>(deserializer: D) -> Result<PageFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    Ok(PageFormat::from_name(&name))
}

/// Inclusive bounds accepted by [`GridConfig::validate`].
pub mod limits {
    use std::ops::RangeInclusive;

    pub const COLUMNS: RangeInclusive<u32> = 1..=10;
    pub const ROWS: RangeInclusive<u32> = 1..=50;
    pub const MARGIN_MM: RangeInclusive<f64> = 0.0..=50.0;
    pub const BARCODE_HEIGHT: RangeInclusive<f64> = 20.0..=150.0;
    pub const BAR_WIDTH: RangeInclusive<f64> = 1.0..=5.0;
    pub const FONT_SIZE: RangeInclusive<f64> = 8.0..=48.0;
    pub const TEXT_MARGIN: RangeInclusive<f64> = 0.0..=10.0;
    pub const CELL_PADDING: RangeInclusive<f64> = 0.0..=30.0;
    pub const SPACING_PX: RangeInclusive<f64> = 0.0..=100.0;
}

impl GridConfig {
    /// Effective column count (never below 1).
    pub fn effective_columns(&self) -> usize {
        self.columns.max(1) as usize
    }

    /// Effective rows per page (never below 1).
    pub fn effective_rows(&self) -> usize {
        self.rows.max(1) as usize
    }

    /// Effective page margin in millimetres (never negative).
    pub fn effective_margin(&self) -> f64 {
        self.margin.max(0.0)
    }

    /// Check every field against the ranges the controls allow.
    ///
    /// Returns one message per offending field.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !limits::COLUMNS.contains(&self.columns) {
            errors.push(format!(
                "columns must be between {} and {} (got {})",
                limits::COLUMNS.start(),
                limits::COLUMNS.end(),
                self.columns
            ));
        }
        if !limits::ROWS.contains(&self.rows) {
            errors.push(format!(
                "rows must be between {} and {} (got {})",
                limits::ROWS.start(),
                limits::ROWS.end(),
                self.rows
            ));
        }
        check_range(&mut errors, "margin", self.margin, &limits::MARGIN_MM);

        let gs = &self.global_settings;
        check_range(
            &mut errors,
            "barcodeHeight",
            gs.barcode_height,
            &limits::BARCODE_HEIGHT,
        );
        check_range(&mut errors, "barWidth", gs.bar_width, &limits::BAR_WIDTH);
        check_range(&mut errors, "fontSize", gs.font_size, &limits::FONT_SIZE);
        check_range(&mut errors, "textMargin", gs.text_margin, &limits::TEXT_MARGIN);
        check_range(
            &mut errors,
            "cellPadding",
            gs.cell_padding,
            &limits::CELL_PADDING,
        );
        errors
    }
}

fn check_range(
    errors: &mut Vec<String>,
    name: &str,
    value: f64,
    range: &std::ops::RangeInclusive<f64>,
) {
    if !range.contains(&value) {
        errors.push(format!(
            "{name} must be between {} and {} (got {value})",
            range.start(),
            range.end()
        ));
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

    #[test]
    fn test_defaults_are_valid() {
        assert!(GridConfig::default().validate().is_empty());
    }

    #[test]
    fn test_validate_reports_each_field() {
        let mut config = GridConfig {
            columns: 0,
            rows: 51,
            margin: -1.0,
            ..GridConfig::default()
        };
        config.global_settings.font_size = 100.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].starts_with("columns"));
        assert!(errors[3].starts_with("fontSize"));
    }

    #[test]
    fn test_effective_values_floor() {
        let config = GridConfig {
            columns: 0,
            rows: 0,
            margin: -5.0,
            ..GridConfig::default()
        };
        assert_eq!(config.effective_columns(), 1);
        assert_eq!(config.effective_rows(), 1);
        assert_eq!(config.effective_margin(), 0.0);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(GridConfig::default()).unwrap();
        assert_eq!(json["pageFormat"], "A4");
        assert_eq!(json["globalSettings"]["cellPadding"], 10.0);
        assert_eq!(json["globalSettings"]["barcodeWidth"], 2.0);
    }

    #[test]
    fn test_unknown_page_format_falls_back() {
        let json = r#"{"columns":2,"rows":3,"pageFormat":"Letter","margin":5}"#;
        let config: GridConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.page_format, PageFormat::A4);
        assert_eq!(config.global_settings, GlobalSettings::default());
    }
}
