//! `BarcodeGrid` - the primary entry point for the browser.
//!
//! This module provides the WASM-exported `BarcodeGrid` struct that handles:
//! - Importing CSV/XLSX files and committing the chosen column
//! - Generating sequential codes
//! - Every editor action (colors, spacing, selection, undo/redo)
//! - Preset persistence in `localStorage`
//! - Preview, print and export output
//!
//! The plain Rust API is available on every target; the JavaScript bindings
//! wrap it on wasm32.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;
use wasm_bindgen::prelude::*;

use crate::editor::Editor;
use crate::error::{BarcodeGridError, Result};
use crate::export::{ExportFormat, ExportPlan};
use crate::generate::Sequence;
use crate::import::{import_bytes, ImportedTable};
use crate::layout::{GridLayout, PageSelection};
use crate::presets::{PresetLibrary, PresetStorage};
use crate::render::{print_document, render_preview, ColorMode, PreviewOptions, PrintOptions};
use crate::time::now_ms;
use crate::types::GridState;
use crate::validation::{validate_grid, validate_items, ValidationReport};

#[cfg(target_arch = "wasm32")]
use crate::editor::ConfigPatch;
#[cfg(target_arch = "wasm32")]
use crate::types::{BarcodeItem, CellKey, ColorSet, ConfigPreset};

/// Undo steps kept by the browser facade.
pub const HISTORY_DEPTH: usize = 100;

/// The main struct exported to JavaScript.
#[wasm_bindgen]
pub struct BarcodeGrid {
    editor: Editor,
    presets: PresetLibrary,
    /// Parsed file waiting for the user to pick its data column.
    pending: Option<ImportedTable>,
    color_mode: ColorMode,
    #[cfg(target_arch = "wasm32")]
    change_callback: Rc<RefCell<Option<Function>>>,
}

impl std::fmt::Debug for BarcodeGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BarcodeGrid")
            .field("editor", &self.editor)
            .field("presets", &self.presets)
            .field("pending", &self.pending.is_some())
            .field("color_mode", &self.color_mode)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Rust API (all targets)
// ============================================================================

impl BarcodeGrid {
    /// Facade over an empty grid persisting presets to `storage`.
    pub fn with_storage(storage: Box<dyn PresetStorage>) -> Self {
        Self {
            editor: Editor::with_history_depth(GridState::default(), HISTORY_DEPTH),
            presets: PresetLibrary::new(storage),
            pending: None,
            color_mode: ColorMode::default(),
            #[cfg(target_arch = "wasm32")]
            change_callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn preset_library(&self) -> &PresetLibrary {
        &self.presets
    }

    pub fn preset_library_mut(&mut self) -> &mut PresetLibrary {
        &mut self.presets
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    /// Parse a file and hold it until [`commit_import`](Self::commit_import).
    ///
    /// A failed parse leaves both the grid and any earlier pending file as they were.
    pub fn import_file(&mut self, file_name: &str, bytes: &[u8]) -> Result<&ImportedTable> {
        let table = import_bytes(file_name, bytes)?;
        info!(
            file_name,
            rows = table.row_count(),
            columns = table.headers().len(),
            "file parsed"
        );
        Ok(self.pending.insert(table))
    }

    pub fn pending_import(&self) -> Option<&ImportedTable> {
        self.pending.as_ref()
    }

    /// Replace the grid data with one column of the pending file.
    ///
    /// `column` defaults to the detected location column. Returns the item count.
    pub fn commit_import(&mut self, column: Option<&str>) -> Result<usize> {
        let table = self
            .pending
            .as_ref()
            .ok_or_else(|| BarcodeGridError::Import("no file waiting to be imported".into()))?;
        let column = match column {
            Some(name) => name.to_string(),
            None => table
                .default_column()
                .map(ToString::to_string)
                .ok_or_else(|| BarcodeGridError::EmptyImport("no columns".into()))?,
        };
        let items = table.items(&column, now_ms())?;
        let count = items.len();
        self.editor.set_data(items);
        self.pending = None;
        Ok(count)
    }

    pub fn cancel_import(&mut self) {
        self.pending = None;
    }

    /// Replace the grid data with a generated sequence. Returns the item count.
    pub fn generate(&mut self, sequence: &Sequence) -> Result<usize> {
        let items = sequence.generate(now_ms())?;
        let count = items.len();
        self.editor.set_data(items);
        Ok(count)
    }

    /// Data and configuration checks combined.
    pub fn validate(&self) -> ValidationReport {
        let state = self.editor.state();
        validate_items(&state.data).merge(validate_grid(&state.config, state.data.len()))
    }

    pub fn layout(&self) -> GridLayout {
        self.editor.layout()
    }

    /// Print document for the pages matched by `pages` (e.g. `"1,3-4"`); all
    /// pages when `None` or when the expression selects nothing.
    pub fn print_html(&self, pages: Option<&str>) -> Result<String> {
        let layout = self.layout();
        let selection = pages.and_then(|expr| PageSelection::parse(expr, layout.total_pages));
        print_document(
            self.editor.state(),
            &layout,
            &PrintOptions {
                selection: selection.as_ref(),
                color_mode: self.color_mode,
            },
        )
    }

    pub fn preview_html(&self) -> String {
        render_preview(
            self.editor.state(),
            &self.layout(),
            &PreviewOptions {
                selection: self.editor.selection(),
                hovered: self.editor.hovered(),
                color_mode: self.color_mode,
            },
        )
    }

    /// Plan a raster export of a capture target measuring `width` x `height` CSS px.
    pub fn export_plan(
        &self,
        format: ExportFormat,
        width: f64,
        height: f64,
        file_name: Option<&str>,
    ) -> Result<ExportPlan> {
        if self.editor.data().is_empty() {
            return Err(BarcodeGridError::Export("no barcodes to export".into()));
        }
        ExportPlan::new(format, width, height, file_name)
    }

    /// Save the current state as a preset and return its id.
    pub fn save_preset(&mut self, name: &str) -> Result<String> {
        let preset = self.presets.save_preset(name, self.editor.state())?;
        Ok(preset.id.clone())
    }

    pub fn save_config_preset(&mut self, name: &str) -> Result<String> {
        let preset = self.presets.save_config_preset(name, self.editor.state())?;
        Ok(preset.id.clone())
    }

    pub fn load_preset(&mut self, id: &str) -> Result<()> {
        let preset = self
            .presets
            .find_preset(id)
            .ok_or_else(|| BarcodeGridError::Preset(format!("no preset with id {id:?}")))?;
        self.editor.load_preset(preset)
    }

    pub fn load_config_preset(&mut self, id: &str) -> Result<()> {
        let preset = self.presets.find_config_preset(id).ok_or_else(|| {
            BarcodeGridError::Preset(format!("no configuration preset with id {id:?}"))
        })?;
        self.editor.load_config_preset(preset)
    }
}

// ============================================================================
// WASM32 bindings
// ============================================================================

#[cfg(target_arch = "wasm32")]
fn to_js<T: Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

#[cfg(target_arch = "wasm32")]
fn from_js<T: DeserializeOwned>(value: JsValue) -> std::result::Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid argument: {e}")))
}

/// Fetch the default configurations linked from the listing at `base`
/// (defaults to `/configurations/`). Pass the result to `mergeDefaultConfigs`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = "fetchDefaultConfigs")]
pub async fn fetch_default_configs(base: Option<String>) -> std::result::Result<JsValue, JsValue> {
    let base = base.unwrap_or_else(|| crate::presets::defaults::DEFAULT_CONFIG_DIR.to_string());
    let presets = crate::presets::defaults::fetch_default_configs(&base).await;
    to_js(&presets)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl BarcodeGrid {
    /// Create a grid persisting presets to `localStorage` (in memory when unavailable).
    #[wasm_bindgen(constructor)]
    pub fn new() -> BarcodeGrid {
        console_error_panic_hook::set_once();
        let storage: Box<dyn PresetStorage> = match crate::presets::LocalStorage::new() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                tracing::warn!(error = %e, "presets will not persist");
                Box::new(crate::presets::MemoryStorage::new())
            }
        };
        let mut grid = Self::with_storage(storage);
        let callback = Rc::clone(&grid.change_callback);
        grid.editor.subscribe(move |change| {
            if let Some(f) = callback.borrow().as_ref() {
                let _ = f.call1(&JsValue::NULL, &JsValue::from_str(change.as_str()));
            }
        });
        grid
    }

    /// Register a JS callback receiving the kind of every change ("data", "colors", ...).
    #[wasm_bindgen(js_name = "setChangeCallback")]
    pub fn set_change_callback(&mut self, callback: Option<Function>) {
        *self.change_callback.borrow_mut() = callback;
    }

    // --- Data ---------------------------------------------------------------

    /// Parse a file and return its column summaries for the chooser.
    #[wasm_bindgen(js_name = "importFile")]
    pub fn import_file_js(&mut self, file_name: &str, bytes: &[u8]) -> std::result::Result<JsValue, JsValue> {
        let table = self.import_file(file_name, bytes)?;
        to_js(&table.column_summaries())
    }

    #[wasm_bindgen(js_name = "commitImport")]
    pub fn commit_import_js(&mut self, column: Option<String>) -> std::result::Result<usize, JsValue> {
        Ok(self.commit_import(column.as_deref())?)
    }

    #[wasm_bindgen(js_name = "cancelImport")]
    pub fn cancel_import_js(&mut self) {
        self.cancel_import();
    }

    /// Generate `prefix + zeroPad4(start + i)` codes.
    #[wasm_bindgen(js_name = "generate")]
    pub fn generate_js(&mut self, prefix: &str, start: i32, count: u32) -> std::result::Result<usize, JsValue> {
        Ok(self.generate(&Sequence::new(prefix, i64::from(start), count))?)
    }

    #[wasm_bindgen(js_name = "generatePreview")]
    pub fn generate_preview_js(prefix: &str, start: i32, count: u32) -> Vec<String> {
        Sequence::new(prefix, i64::from(start), count).preview(count.min(3))
    }

    #[wasm_bindgen(js_name = "setData")]
    pub fn set_data_js(&mut self, items: JsValue) -> std::result::Result<(), JsValue> {
        let items: Vec<BarcodeItem> = from_js(items)?;
        self.editor.set_data(items);
        Ok(())
    }

    #[wasm_bindgen(js_name = "data")]
    pub fn data_js(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.editor.data())
    }

    #[wasm_bindgen(js_name = "validate")]
    pub fn validate_js(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.validate())
    }

    // --- Configuration ------------------------------------------------------

    #[wasm_bindgen(js_name = "config")]
    pub fn config_js(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.editor.config())
    }

    /// Apply a partial configuration (`{columns?, rows?, pageFormat?, margin?, globalSettings?}`).
    #[wasm_bindgen(js_name = "updateConfig")]
    pub fn update_config_js(&mut self, patch: JsValue) -> std::result::Result<(), JsValue> {
        let patch: ConfigPatch = from_js(patch)?;
        Ok(self.editor.update_config(&patch)?)
    }

    // --- Colors -------------------------------------------------------------

    #[wasm_bindgen(js_name = "setLineColor")]
    pub fn set_line_color_js(&mut self, line: u32, colors: JsValue) -> std::result::Result<(), JsValue> {
        let colors: ColorSet = from_js(colors)?;
        self.editor.set_line_color(line, colors);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setColumnColor")]
    pub fn set_column_color_js(&mut self, column: u32, colors: JsValue) -> std::result::Result<(), JsValue> {
        let colors: ColorSet = from_js(colors)?;
        self.editor.set_column_color(column, colors);
        Ok(())
    }

    #[wasm_bindgen(js_name = "setCellColor")]
    pub fn set_cell_color_js(&mut self, row: u32, col: u32, colors: JsValue) -> std::result::Result<(), JsValue> {
        let colors: ColorSet = from_js(colors)?;
        self.editor.set_cell_color(CellKey::new(row, col), colors);
        Ok(())
    }

    #[wasm_bindgen(js_name = "clearLineColor")]
    pub fn clear_line_color_js(&mut self, line: u32) {
        self.editor.clear_line_color(line);
    }

    #[wasm_bindgen(js_name = "clearColumnColor")]
    pub fn clear_column_color_js(&mut self, column: u32) {
        self.editor.clear_column_color(column);
    }

    #[wasm_bindgen(js_name = "clearCellColor")]
    pub fn clear_cell_color_js(&mut self, row: u32, col: u32) {
        self.editor.clear_cell_color(CellKey::new(row, col));
    }

    /// Paint every selected cell; returns how many were painted.
    #[wasm_bindgen(js_name = "applyColorsToSelection")]
    pub fn apply_colors_to_selection_js(&mut self, colors: JsValue) -> std::result::Result<usize, JsValue> {
        let colors: ColorSet = from_js(colors)?;
        Ok(self.editor.apply_colors_to_selection(&colors)?)
    }

    #[wasm_bindgen(js_name = "applyLineColorToAllLines")]
    pub fn apply_line_color_to_all_lines_js(&mut self, colors: JsValue) -> std::result::Result<(), JsValue> {
        let colors: ColorSet = from_js(colors)?;
        self.editor.apply_line_color_to_all_lines(&colors);
        Ok(())
    }

    #[wasm_bindgen(js_name = "applyZebraStriping")]
    pub fn apply_zebra_striping_js(&mut self) {
        self.editor.apply_zebra_striping();
    }

    #[wasm_bindgen(js_name = "clearAllColors")]
    pub fn clear_all_colors_js(&mut self) {
        self.editor.clear_all_colors();
    }

    #[wasm_bindgen(js_name = "presetColors")]
    pub fn preset_colors_js() -> Vec<String> {
        crate::color::PRESET_COLORS.iter().map(ToString::to_string).collect()
    }

    // --- Spacing ------------------------------------------------------------

    #[wasm_bindgen(js_name = "setLineSpacing")]
    pub fn set_line_spacing_js(&mut self, line: u32, spacing: f64) -> std::result::Result<(), JsValue> {
        Ok(self.editor.set_line_spacing(line, spacing)?)
    }

    #[wasm_bindgen(js_name = "setColumnSpacing")]
    pub fn set_column_spacing_js(&mut self, column: u32, spacing: f64) -> std::result::Result<(), JsValue> {
        Ok(self.editor.set_column_spacing(column, spacing)?)
    }

    #[wasm_bindgen(js_name = "applyGlobalSpacing")]
    pub fn apply_global_spacing_js(&mut self, spacing: f64) -> std::result::Result<(), JsValue> {
        Ok(self.editor.apply_global_spacing(spacing)?)
    }

    #[wasm_bindgen(js_name = "resetAllSpacing")]
    pub fn reset_all_spacing_js(&mut self) {
        self.editor.reset_all_spacing();
    }

    // --- History ------------------------------------------------------------

    #[wasm_bindgen(js_name = "undo")]
    pub fn undo_js(&mut self) -> bool {
        self.editor.undo()
    }

    #[wasm_bindgen(js_name = "redo")]
    pub fn redo_js(&mut self) -> bool {
        self.editor.redo()
    }

    #[wasm_bindgen(js_name = "canUndo")]
    pub fn can_undo_js(&self) -> bool {
        self.editor.can_undo()
    }

    #[wasm_bindgen(js_name = "canRedo")]
    pub fn can_redo_js(&self) -> bool {
        self.editor.can_redo()
    }

    // --- Selection ----------------------------------------------------------

    /// Click on a cell: plain click selects only it, `additive` (ctrl/cmd) toggles it.
    #[wasm_bindgen(js_name = "clickCell")]
    pub fn click_cell_js(&mut self, row: u32, col: u32, additive: bool) -> bool {
        self.editor.click_cell(CellKey::new(row, col), additive)
    }

    #[wasm_bindgen(js_name = "toggleSelection")]
    pub fn toggle_selection_js(&mut self, row: u32, col: u32) -> bool {
        self.editor.toggle_selection(CellKey::new(row, col))
    }

    #[wasm_bindgen(js_name = "clearSelection")]
    pub fn clear_selection_js(&mut self) {
        self.editor.clear_selection();
    }

    /// Selected cell keys as `"row-col"` strings.
    #[wasm_bindgen(js_name = "selection")]
    pub fn selection_js(&self) -> Vec<String> {
        self.editor.selection().iter().map(ToString::to_string).collect()
    }

    /// Hover a cell; pass `undefined` for either coordinate to clear.
    #[wasm_bindgen(js_name = "setHovered")]
    pub fn set_hovered_js(&mut self, row: Option<u32>, col: Option<u32>) {
        let key = row.zip(col).map(|(row, col)| CellKey::new(row, col));
        self.editor.set_hovered(key);
    }

    /// Cell under a point of a page's content box, as `{row, col, ...}` or `null`.
    #[wasm_bindgen(js_name = "cellAt")]
    pub fn cell_at_js(&self, page_index: usize, x: f64, y: f64) -> std::result::Result<JsValue, JsValue> {
        let layout = self.layout();
        match layout.cell_at(page_index, x, y) {
            Some(cell) => to_js(cell),
            None => Ok(JsValue::NULL),
        }
    }

    // --- Output -------------------------------------------------------------

    #[wasm_bindgen(js_name = "layout")]
    pub fn layout_js(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.layout())
    }

    #[wasm_bindgen(js_name = "pageCount")]
    pub fn page_count_js(&self) -> usize {
        self.layout().total_pages
    }

    #[wasm_bindgen(js_name = "setColorMode")]
    pub fn set_color_mode_js(&mut self, mode: &str) -> std::result::Result<(), JsValue> {
        let mode = ColorMode::from_name(mode)
            .ok_or_else(|| BarcodeGridError::InvalidInput(format!("unknown color mode {mode:?}")))?;
        self.set_color_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(js_name = "previewHtml")]
    pub fn preview_html_js(&self) -> String {
        self.preview_html()
    }

    #[wasm_bindgen(js_name = "printHtml")]
    pub fn print_html_js(&self, pages: Option<String>) -> std::result::Result<String, JsValue> {
        Ok(self.print_html(pages.as_deref())?)
    }

    /// Capture scale, canvas size and PDF page offsets for `"pdf"` or `"png"`.
    #[wasm_bindgen(js_name = "exportPlan")]
    pub fn export_plan_js(
        &self,
        format: &str,
        width: f64,
        height: f64,
        file_name: Option<String>,
    ) -> std::result::Result<JsValue, JsValue> {
        let format = ExportFormat::from_name(format)?;
        to_js(&self.export_plan(format, width, height, file_name.as_deref())?)
    }

    // --- Presets ------------------------------------------------------------

    #[wasm_bindgen(js_name = "presets")]
    pub fn presets_js(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.presets.presets())
    }

    #[wasm_bindgen(js_name = "configPresets")]
    pub fn config_presets_js(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.presets.config_presets())
    }

    #[wasm_bindgen(js_name = "savePreset")]
    pub fn save_preset_js(&mut self, name: &str) -> std::result::Result<String, JsValue> {
        Ok(self.save_preset(name)?)
    }

    #[wasm_bindgen(js_name = "saveConfigPreset")]
    pub fn save_config_preset_js(&mut self, name: &str) -> std::result::Result<String, JsValue> {
        Ok(self.save_config_preset(name)?)
    }

    #[wasm_bindgen(js_name = "loadPreset")]
    pub fn load_preset_js(&mut self, id: &str) -> std::result::Result<(), JsValue> {
        Ok(self.load_preset(id)?)
    }

    #[wasm_bindgen(js_name = "loadConfigPreset")]
    pub fn load_config_preset_js(&mut self, id: &str) -> std::result::Result<(), JsValue> {
        Ok(self.load_config_preset(id)?)
    }

    #[wasm_bindgen(js_name = "deletePreset")]
    pub fn delete_preset_js(&mut self, id: &str) -> std::result::Result<bool, JsValue> {
        Ok(self.presets.delete_preset(id)?)
    }

    #[wasm_bindgen(js_name = "deleteConfigPreset")]
    pub fn delete_config_preset_js(&mut self, id: &str) -> std::result::Result<bool, JsValue> {
        Ok(self.presets.delete_config_preset(id)?)
    }

    /// Add a preset from an exported file; returns its new id.
    #[wasm_bindgen(js_name = "importPresetJson")]
    pub fn import_preset_json_js(&mut self, json: &str) -> std::result::Result<String, JsValue> {
        Ok(self.presets.import_preset_json(json)?.id.clone())
    }

    #[wasm_bindgen(js_name = "importConfigPresetJson")]
    pub fn import_config_preset_json_js(&mut self, json: &str) -> std::result::Result<String, JsValue> {
        Ok(self.presets.import_config_preset_json(json)?.id.clone())
    }

    #[wasm_bindgen(js_name = "exportPresetJson")]
    pub fn export_preset_json_js(&self, id: &str) -> std::result::Result<String, JsValue> {
        Ok(self.presets.export_preset_json(id)?)
    }

    #[wasm_bindgen(js_name = "exportConfigPresetJson")]
    pub fn export_config_preset_json_js(&self, id: &str) -> std::result::Result<String, JsValue> {
        Ok(self.presets.export_config_preset_json(id)?)
    }

    #[wasm_bindgen(js_name = "exportFileName")]
    pub fn export_file_name_js(name: &str) -> String {
        crate::presets::export_file_name(name)
    }

    /// Merge presets returned by `fetchDefaultConfigs`; existing ids win.
    #[wasm_bindgen(js_name = "mergeDefaultConfigs")]
    pub fn merge_default_configs_js(&mut self, presets: JsValue) -> std::result::Result<usize, JsValue> {
        let presets: Vec<ConfigPreset> = from_js(presets)?;
        Ok(self.presets.merge_default_config_presets(presets))
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for BarcodeGrid {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Non-WASM32 construction (CLI and tests)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl BarcodeGrid {
    /// Grid with in-memory presets.
    pub fn new() -> Self {
        Self::with_storage(Box::new(crate::presets::MemoryStorage::new()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for BarcodeGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"Name,Location\nshelf a,A-01\nshelf b,A-02\nshelf c,\nshelf d,A-04\n";

    #[test]
    fn test_import_then_commit_default_column() {
        let mut grid = BarcodeGrid::new();
        let table = grid.import_file("stock.csv", CSV).unwrap();
        assert_eq!(table.default_column(), Some("Location"));
        // Nothing changes until the column is committed
        assert!(grid.editor().data().is_empty());

        assert_eq!(grid.commit_import(None).unwrap(), 3);
        assert!(grid.pending_import().is_none());
        let values: Vec<_> = grid.editor().data().iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, ["A-01", "A-02", "A-04"]);
        assert!(grid.editor().can_undo());
    }

    #[test]
    fn test_failed_import_keeps_state() {
        let mut grid = BarcodeGrid::new();
        grid.generate(&Sequence::new("X-", 1, 3)).unwrap();
        assert!(grid.import_file("stock.pdf", CSV).is_err());
        assert!(grid.import_file("empty.csv", b"Location\n").is_err());
        assert_eq!(grid.editor().data().len(), 3);
        assert!(grid.commit_import(None).is_err());
    }

    #[test]
    fn test_print_and_export_need_data() {
        let mut grid = BarcodeGrid::new();
        assert!(grid.print_html(None).is_err());
        assert!(grid.export_plan(ExportFormat::Pdf, 800.0, 1000.0, None).is_err());

        grid.generate(&Sequence::new("LOC-", 1, 45)).unwrap();
        let html = grid.print_html(Some("2")).unwrap();
        assert!(html.contains("data-page=\"2\""));
        assert!(!html.contains("data-page=\"1\""));
        let plan = grid.export_plan(ExportFormat::Png, 800.0, 1000.0, None).unwrap();
        assert_eq!(plan.file_name, "barcodes.png");
    }

    #[test]
    fn test_preset_round_trip_through_facade() {
        let mut grid = BarcodeGrid::new();
        grid.generate(&Sequence::new("LOC-", 1, 5)).unwrap();
        grid.editor_mut().apply_zebra_striping();
        let id = grid.save_preset("zebra").unwrap();
        let saved = grid.editor().state().clone();

        grid.editor_mut().clear_all_colors();
        grid.generate(&Sequence::new("B-", 1, 2)).unwrap();
        grid.load_preset(&id).unwrap();
        assert_eq!(grid.editor().state(), &saved);
        assert!(grid.load_preset("missing").is_err());
    }

    #[test]
    fn test_validate_combines_reports() {
        let mut grid = BarcodeGrid::new();
        assert!(!grid.validate().is_valid);
        grid.generate(&Sequence::new("LOC-", 1, 41)).unwrap();
        let report = grid.validate();
        assert!(report.is_valid);
        // 41 items on a 4x10 grid need two pages
        assert_eq!(report.warnings.len(), 1);
    }
}
