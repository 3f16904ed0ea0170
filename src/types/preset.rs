use serde::{Deserialize, Serialize};

use super::{
    BarcodeItem, CellColor, ColumnColor, ColumnSpacing, GlobalSettings, GridConfig, LineColor,
    LineSpacing, Overrides, PageFormat,
};

/// Layout part of a preset: grid, colors, spacing and global settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetSettings {
    pub columns: u32,
    pub rows: u32,
    #[serde(default, deserialize_with = "super::config::lenient_page_format")]
    pub page_format: PageFormat,
    pub margin: f64,
    #[serde(default)]
    pub line_colors: Vec<LineColor>,
    #[serde(default)]
    pub column_colors: Vec<ColumnColor>,
    #[serde(default)]
    pub cell_colors: Vec<CellColor>,
    #[serde(default)]
    pub line_spacing: Vec<LineSpacing>,
    #[serde(default)]
    pub column_spacing: Vec<ColumnSpacing>,
    #[serde(default)]
    pub global_settings: GlobalSettings,
}

impl PresetSettings {
    /// Capture the current configuration and overrides.
    pub fn capture(config: &GridConfig, overrides: &Overrides) -> Self {
        Self {
            columns: config.columns,
            rows: config.rows,
            page_format: config.page_format,
            margin: config.margin,
            line_colors: overrides.line_color_records(),
            column_colors: overrides.column_color_records(),
            cell_colors: overrides.cell_color_records(),
            line_spacing: overrides.line_spacing_records(),
            column_spacing: overrides.column_spacing_records(),
            global_settings: config.global_settings,
        }
    }

    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            columns: self.columns,
            rows: self.rows,
            page_format: self.page_format,
            margin: self.margin,
            global_settings: self.global_settings,
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides::from_records(
            &self.line_colors,
            &self.column_colors,
            &self.cell_colors,
            &self.line_spacing,
            &self.column_spacing,
        )
    }
}

/// Settings plus the data they were saved with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresetConfig {
    #[serde(default)]
    pub data: Vec<BarcodeItem>,
    #[serde(flatten)]
    pub settings: PresetSettings,
}

/// Named snapshot including data (`barcode-presets`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub timestamp: u64,
    pub config: PresetConfig,
}

/// Named snapshot of layout settings only (`barcode-config-presets`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigPreset {
    pub id: String,
    pub name: String,
    pub timestamp: u64,
    pub config: PresetSettings,
}

/// Common view over both preset kinds.
pub trait NamedPreset {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl NamedPreset for Preset {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl NamedPreset for ConfigPreset {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn set_id(&mut self, id: String) {
        self.id = id;
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
    use crate::types::{CellKey, ColorSet};

    const ORIGINAL_JSON: &str = r##"{
        "id": "preset-1700000000000",
        "name": "Aisle 3",
        "timestamp": 1700000000000,
        "config": {
            "data": [{"id": "barcode-1-0", "value": "LOC-0001", "text": "LOC-0001"}],
            "columns": 3,
            "rows": 8,
            "pageFormat": "A4",
            "margin": 10,
            "lineColors": [{"lineIndex": 1, "backgroundColor": "#f3f4f6", "barcodeColor": "#000000", "textColor": "#000000"}],
            "columnColors": [],
            "cellColors": [{"row": 0, "col": 2, "backgroundColor": "#3B82F6", "barcodeColor": "#ffffff", "textColor": "#ffffff"}],
            "lineSpacing": [{"afterLineIndex": 0, "spacing": 24}],
            "columnSpacing": [],
            "globalSettings": {"barcodeWidth": 2, "barcodeHeight": 50, "fontSize": 12, "barWidth": 2, "textMargin": 2, "cellPadding": 10}
        }
    }"##;

    #[test]
    fn test_reads_persisted_shape() {
        let preset: Preset = serde_json::from_str(ORIGINAL_JSON).unwrap();
        assert_eq!(preset.config.data.len(), 1);
        assert_eq!(preset.config.settings.columns, 3);

        let overrides = preset.config.settings.overrides();
        assert_eq!(
            overrides.cell_colors.get(&CellKey::new(0, 2)),
            Some(&ColorSet::new("#3B82F6", "#ffffff", "#ffffff"))
        );
        assert_eq!(overrides.spacing_after_line(0), 24.0);
        assert_eq!(overrides.spacing_after_line(1), 16.0);
    }

    #[test]
    fn test_config_preset_ignores_data() {
        let preset: ConfigPreset = serde_json::from_str(ORIGINAL_JSON).unwrap();
        let json = serde_json::to_value(&preset).unwrap();
        assert!(json["config"].get("data").is_none());
        assert_eq!(json["config"]["rows"], 8);
    }

    #[test]
    fn test_preset_without_data_defaults_empty() {
        let json = r#"{"id":"x","name":"n","timestamp":1,"config":{"columns":1,"rows":1,"margin":0}}"#;
        let preset: Preset = serde_json::from_str(json).unwrap();
        assert!(preset.config.data.is_empty());
        assert_eq!(preset.config.settings.grid_config().page_format, PageFormat::A4);
    }
}
