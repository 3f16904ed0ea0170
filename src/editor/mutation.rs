//! Partial configuration updates.
//!
//! The controls send only the fields they changed; everything else keeps its
//! current value.

use serde::Deserialize;

use crate::error::{BarcodeGridError, Result};
use crate::types::{GlobalSettings, GridConfig, PageFormat};

/// Fields of [`GridConfig`] to overwrite. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigPatch {
    pub columns: Option<u32>,
    pub rows: Option<u32>,
    pub page_format: Option<String>,
    pub margin: Option<f64>,
    pub global_settings: Option<GlobalSettingsPatch>,
}

/// Fields of [`GlobalSettings`] to overwrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettingsPatch {
    pub barcode_width: Option<f64>,
    pub barcode_height: Option<f64>,
    pub font_size: Option<f64>,
    pub bar_width: Option<f64>,
    pub text_margin: Option<f64>,
    pub cell_padding: Option<f64>,
}

impl ConfigPatch {
    /// Apply on top of `base` without validating.
    pub fn apply(&self, base: &GridConfig) -> GridConfig {
        GridConfig {
            columns: self.columns.unwrap_or(base.columns),
            rows: self.rows.unwrap_or(base.rows),
            page_format: self
                .page_format
                .as_deref()
                .map_or(base.page_format, PageFormat::from_name),
            margin: self.margin.unwrap_or(base.margin),
            global_settings: self
                .global_settings
                .map_or(base.global_settings, |gs| gs.apply(&base.global_settings)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl GlobalSettingsPatch {
    pub fn apply(&self, base: &GlobalSettings) -> GlobalSettings {
        GlobalSettings {
            barcode_width: self.barcode_width.unwrap_or(base.barcode_width),
            barcode_height: self.barcode_height.unwrap_or(base.barcode_height),
            font_size: self.font_size.unwrap_or(base.font_size),
            bar_width: self.bar_width.unwrap_or(base.bar_width),
            text_margin: self.text_margin.unwrap_or(base.text_margin),
            cell_padding: self.cell_padding.unwrap_or(base.cell_padding),
        }
    }
}

/// Validate a full configuration, joining every problem into one error.
pub(crate) fn checked_config(config: GridConfig) -> Result<GridConfig> {
    let errors = config.validate();
    if errors.is_empty() {
        Ok(config)
    } else {
        Err(BarcodeGridError::Config(errors.join("; ")))
    }
}

/// Reject spacing outside the slider range or not a number.
pub(crate) fn checked_spacing(spacing: f64) -> Result<f64> {
    if crate::types::limits::SPACING_PX.contains(&spacing) {
        Ok(spacing)
    } else {
        Err(BarcodeGridError::InvalidInput(format!(
            "spacing must be between {} and {} px (got {spacing})",
            crate::types::limits::SPACING_PX.start(),
            crate::types::limits::SPACING_PX.end()
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_keeps_unset_fields() {
        let base = GridConfig::default();
        let patch: ConfigPatch =
            serde_json::from_str(r#"{"columns":6,"globalSettings":{"fontSize":16}}"#).unwrap();
        let next = patch.apply(&base);
        assert_eq!(next.columns, 6);
        assert_eq!(next.rows, base.rows);
        assert_eq!(next.global_settings.font_size, 16.0);
        assert_eq!(next.global_settings.cell_padding, base.global_settings.cell_padding);
    }

    #[test]
    fn test_patch_page_format() {
        let patch = ConfigPatch {
            page_format: Some("A1".into()),
            ..ConfigPatch::default()
        };
        assert_eq!(patch.apply(&GridConfig::default()).page_format, PageFormat::A1);
        assert!(ConfigPatch::default().is_empty());
    }

    #[test]
    fn test_checked_config() {
        assert!(checked_config(GridConfig::default()).is_ok());
        let bad = GridConfig {
            columns: 0,
            rows: 99,
            ..GridConfig::default()
        };
        let err = checked_config(bad).unwrap_err().to_string();
        assert!(err.contains("columns"));
        assert!(err.contains("rows"));
    }

    #[test]
    fn test_checked_spacing() {
        assert!(checked_spacing(0.0).is_ok());
        assert!(checked_spacing(100.0).is_ok());
        assert!(checked_spacing(-1.0).is_err());
        assert!(checked_spacing(f64::NAN).is_err());
    }
}
