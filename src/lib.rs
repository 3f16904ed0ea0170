//! barcodegrid - barcode label grids for the web
//!
//! Lays barcodes out on printable pages via WebAssembly:
//! - CSV and XLSX import, or sequential code generation
//! - Paginated grid layout for A4 and A1 paper
//! - Per-line, per-column and per-cell colors and spacing
//! - Undo/redo over full-state snapshots
//! - Named presets persisted as JSON
//! - Print documents and PDF/PNG export plans
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { BarcodeGrid } from 'barcodegrid';
//! await init();
//! const grid = new BarcodeGrid();
//! grid.importFile(file.name, new Uint8Array(await file.arrayBuffer()));
//! grid.commitImport();
//! preview.innerHTML = grid.previewHtml();
//! ```

// Model and geometry
pub mod color;
pub mod error;
pub mod layout;
pub mod types;

// Editing
pub mod editor;
pub mod generate;
pub mod import;
pub mod validation;

// Persistence and output
pub mod export;
pub mod presets;
pub mod render;
pub mod time;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use editor::{Change, Editor};
pub use error::{BarcodeGridError, Result};
pub use layout::GridLayout;
pub use presets::PresetLibrary;
pub use viewer::BarcodeGrid;

pub use types::*;

/// Compute the layout of a preset-shaped JSON state
/// (`{data, columns, rows, pageFormat, margin, lineColors, ...}`) and return it as JSON.
///
/// # Errors
/// Returns an error if the JSON does not describe a grid.
#[wasm_bindgen(js_name = "layoutJson")]
pub fn layout_json(config_json: &str) -> std::result::Result<String, JsValue> {
    let config: PresetConfig = serde_json::from_str(config_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid grid JSON: {e}")))?;
    let state = GridState {
        config: config.settings.grid_config(),
        overrides: config.settings.overrides(),
        data: config.data,
    };
    serde_json::to_string(&GridLayout::compute(&state))
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
