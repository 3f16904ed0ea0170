//! Browser-only checks for `localStorage` persistence.
//!
//! Run with: wasm-pack test --headless --chrome
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use barcodegrid::presets::{LocalStorage, PresetLibrary, PresetStorage, PRESETS_KEY};
use barcodegrid::{BarcodeItem, GridState};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn clear() {
    let mut storage = LocalStorage::new().unwrap();
    storage.write(PRESETS_KEY, "[]").unwrap();
}

#[wasm_bindgen_test]
fn test_local_storage_read_write() {
    clear();
    let mut storage = LocalStorage::new().unwrap();
    storage.write("barcodegrid-test", "{}").unwrap();
    assert_eq!(
        storage.read("barcodegrid-test").unwrap().as_deref(),
        Some("{}")
    );
}

#[wasm_bindgen_test]
fn test_presets_survive_new_library() {
    clear();
    let state = GridState {
        data: vec![BarcodeItem::new("barcode-1-0", "LOC-0001")],
        ..GridState::default()
    };
    let id = {
        let mut library = PresetLibrary::new(Box::new(LocalStorage::new().unwrap()));
        library.save_preset("Browser", &state).unwrap().id.clone()
    };
    let library = PresetLibrary::new(Box::new(LocalStorage::new().unwrap()));
    let preset = library.find_preset(&id).unwrap();
    assert_eq!(preset.config.data, state.data);
}
