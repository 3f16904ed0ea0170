//! Preset library: named snapshots of the grid, persisted as JSON.
//!
//! Two collections are kept: presets with data and configuration presets
//! without. Every change is written through to the storage backend before
//! the in-memory list is updated, so a failed write leaves both untouched.

pub mod defaults;
pub mod storage;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::editor::mutation::checked_config;
use crate::error::{BarcodeGridError, Result};
use crate::time::now_ms;
use crate::types::{ConfigPreset, GridState, NamedPreset, Preset, PresetConfig, PresetSettings};

pub use storage::{MemoryStorage, PresetStorage, CONFIG_PRESETS_KEY, PRESETS_KEY};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::DirectoryStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Both preset collections plus the backend they persist to.
pub struct PresetLibrary {
    storage: Box<dyn PresetStorage>,
    presets: Vec<Preset>,
    config_presets: Vec<ConfigPreset>,
}

impl std::fmt::Debug for PresetLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetLibrary")
            .field("presets", &self.presets.len())
            .field("config_presets", &self.config_presets.len())
            .finish_non_exhaustive()
    }
}

impl PresetLibrary {
    /// Library over `storage`, with both collections loaded from it.
    pub fn new(storage: Box<dyn PresetStorage>) -> Self {
        let mut library = Self {
            storage,
            presets: Vec::new(),
            config_presets: Vec::new(),
        };
        library.load_from_storage();
        library
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Reload both collections. Missing or corrupt data loads as empty.
    pub fn load_from_storage(&mut self) {
        self.presets = read_collection(self.storage.as_ref(), PRESETS_KEY);
        self.config_presets = read_collection(self.storage.as_ref(), CONFIG_PRESETS_KEY);
        info!(
            presets = self.presets.len(),
            config_presets = self.config_presets.len(),
            "presets loaded"
        );
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn config_presets(&self) -> &[ConfigPreset] {
        &self.config_presets
    }

    pub fn find_preset(&self, id: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn find_config_preset(&self, id: &str) -> Option<&ConfigPreset> {
        self.config_presets.iter().find(|p| p.id == id)
    }

    /// Snapshot data, configuration and overrides under `name`.
    pub fn save_preset(&mut self, name: &str, state: &GridState) -> Result<&Preset> {
        let name = checked_name(name)?;
        let timestamp = now_ms();
        let preset = Preset {
            id: unique_id("preset", timestamp, &self.presets),
            name,
            timestamp,
            config: PresetConfig {
                data: state.data.clone(),
                settings: PresetSettings::capture(&state.config, &state.overrides),
            },
        };
        info!(id = %preset.id, items = state.data.len(), "saving preset");
        push_persisted(self.storage.as_mut(), PRESETS_KEY, &mut self.presets, preset)
    }

    /// Snapshot configuration and overrides (no data) under `name`.
    pub fn save_config_preset(&mut self, name: &str, state: &GridState) -> Result<&ConfigPreset> {
        let name = checked_name(name)?;
        let timestamp = now_ms();
        let preset = ConfigPreset {
            id: unique_id("config-preset", timestamp, &self.config_presets),
            name,
            timestamp,
            config: PresetSettings::capture(&state.config, &state.overrides),
        };
        info!(id = %preset.id, "saving configuration preset");
        push_persisted(
            self.storage.as_mut(),
            CONFIG_PRESETS_KEY,
            &mut self.config_presets,
            preset,
        )
    }

    /// Remove a preset. Returns false when no preset has `id`.
    pub fn delete_preset(&mut self, id: &str) -> Result<bool> {
        remove_persisted(self.storage.as_mut(), PRESETS_KEY, &mut self.presets, id)
    }

    pub fn delete_config_preset(&mut self, id: &str) -> Result<bool> {
        remove_persisted(
            self.storage.as_mut(),
            CONFIG_PRESETS_KEY,
            &mut self.config_presets,
            id,
        )
    }

    /// Add a preset from exported JSON under a fresh id.
    pub fn import_preset_json(&mut self, json: &str) -> Result<&Preset> {
        let mut preset: Preset = serde_json::from_str(json)
            .map_err(|e| BarcodeGridError::Preset(format!("invalid preset file: {e}")))?;
        checked_settings(&preset.config.settings)?;
        preset.set_id(unique_id("preset", now_ms(), &self.presets));
        info!(id = %preset.id, name = %preset.name, "importing preset");
        push_persisted(self.storage.as_mut(), PRESETS_KEY, &mut self.presets, preset)
    }

    pub fn import_config_preset_json(&mut self, json: &str) -> Result<&ConfigPreset> {
        let mut preset: ConfigPreset = serde_json::from_str(json).map_err(|e| {
            BarcodeGridError::Preset(format!("invalid configuration preset file: {e}"))
        })?;
        checked_settings(&preset.config)?;
        preset.set_id(unique_id("config-preset", now_ms(), &self.config_presets));
        info!(id = %preset.id, name = %preset.name, "importing configuration preset");
        push_persisted(
            self.storage.as_mut(),
            CONFIG_PRESETS_KEY,
            &mut self.config_presets,
            preset,
        )
    }

    /// Pretty JSON for download.
    pub fn export_preset_json(&self, id: &str) -> Result<String> {
        let preset = self
            .find_preset(id)
            .ok_or_else(|| BarcodeGridError::Preset(format!("no preset with id {id:?}")))?;
        Ok(serde_json::to_string_pretty(preset)?)
    }

    pub fn export_config_preset_json(&self, id: &str) -> Result<String> {
        let preset = self.find_config_preset(id).ok_or_else(|| {
            BarcodeGridError::Preset(format!("no configuration preset with id {id:?}"))
        })?;
        Ok(serde_json::to_string_pretty(preset)?)
    }

    /// Append defaults whose id is not already present. Returns how many were added.
    ///
    /// Defaults are not written back to storage; out-of-range ones are skipped.
    pub fn merge_default_config_presets(&mut self, defaults: Vec<ConfigPreset>) -> usize {
        let before = self.config_presets.len();
        for preset in defaults {
            if let Err(e) = checked_settings(&preset.config) {
                warn!(id = %preset.id, error = %e, "skipping default configuration");
                continue;
            }
            if self.find_config_preset(&preset.id).is_none() {
                self.config_presets.push(preset);
            }
        }
        let added = self.config_presets.len() - before;
        info!(added, "default configurations merged");
        added
    }
}

/// Reject settings whose grid configuration is out of range.
fn checked_settings(settings: &PresetSettings) -> Result<()> {
    checked_config(settings.grid_config())
        .map(|_| ())
        .map_err(|e| BarcodeGridError::Preset(format!("invalid preset file: {e}")))
}

/// Download file name: whitespace runs become `-`, plus `.json`.
pub fn export_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 5);
    let mut in_space = false;
    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out.push_str(".json");
    out
}

fn checked_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(BarcodeGridError::InvalidInput(
            "preset name cannot be empty".into(),
        ));
    }
    Ok(name.to_string())
}

/// `<prefix>-<ms>`, suffixed with `-1`, `-2`, ... while taken.
fn unique_id<T: NamedPreset>(prefix: &str, timestamp: u64, existing: &[T]) -> String {
    let base = format!("{prefix}-{timestamp}");
    let taken = |id: &str| existing.iter().any(|p| p.id() == id);
    if !taken(&base) {
        return base;
    }
    (1u32..)
        .map(|n| format!("{base}-{n}"))
        .find(|id| !taken(id))
        .unwrap_or(base)
}

fn read_collection<T: DeserializeOwned>(storage: &dyn PresetStorage, key: &str) -> Vec<T> {
    match storage.read(key) {
        Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!(key, error = %e, "stored presets are corrupt, starting empty");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "cannot read stored presets");
            Vec::new()
        }
    }
}

fn write_collection<T: Serialize>(
    storage: &mut dyn PresetStorage,
    key: &str,
    items: &[T],
) -> Result<()> {
    let json = serde_json::to_string(items)?;
    storage.write(key, &json)
}

fn push_persisted<'a, T: Serialize + Clone>(
    storage: &mut dyn PresetStorage,
    key: &str,
    list: &'a mut Vec<T>,
    item: T,
) -> Result<&'a T> {
    let mut next = list.clone();
    next.push(item);
    write_collection(storage, key, &next)?;
    *list = next;
    list.last()
        .ok_or_else(|| BarcodeGridError::Preset("preset list empty after save".into()))
}

fn remove_persisted<T: Serialize + Clone + NamedPreset>(
    storage: &mut dyn PresetStorage,
    key: &str,
    list: &mut Vec<T>,
    id: &str,
) -> Result<bool> {
    let next: Vec<T> = list.iter().filter(|p| p.id() != id).cloned().collect();
    if next.len() == list.len() {
        return Ok(false);
    }
    write_collection(storage, key, &next)?;
    *list = next;
    info!(key, id, "preset deleted");
    Ok(true)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::types::{BarcodeItem, CellKey, ColorSet, GridConfig};

    fn sample_state() -> GridState {
        let mut state = GridState {
            data: vec![
                BarcodeItem::new("barcode-1-0", "A-01"),
                BarcodeItem::new("barcode-1-1", "A-02"),
            ],
            config: GridConfig {
                columns: 2,
                ..GridConfig::default()
            },
            ..GridState::default()
        };
        state
            .overrides
            .cell_colors
            .insert(CellKey::new(0, 1), ColorSet::new("#3B82F6", "#fff", "#fff"));
        state.overrides.line_spacing.insert(0, 30.0);
        state
    }

    /// Storage whose writes always fail.
    struct ReadOnly;

    impl PresetStorage for ReadOnly {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn write(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(BarcodeGridError::Storage("read-only".into()))
        }
    }

    #[test]
    fn test_save_and_reload() {
        let mut storage = MemoryStorage::new();
        let mut library = PresetLibrary::new(Box::new(storage.clone()));
        let id = library.save_preset("Aisle 3", &sample_state()).unwrap().id.clone();
        assert!(id.starts_with("preset-"));

        // Persisted JSON reloads into an equal preset.
        let json = library.storage.read(PRESETS_KEY).unwrap().unwrap();
        storage.write(PRESETS_KEY, &json).unwrap();
        let reloaded = PresetLibrary::new(Box::new(storage));
        assert_eq!(reloaded.presets(), library.presets());
    }

    #[test]
    fn test_ids_unique_within_a_millisecond() {
        let mut library = PresetLibrary::in_memory();
        let state = sample_state();
        for _ in 0..5 {
            library.save_config_preset("Same", &state).unwrap();
        }
        let mut ids: Vec<_> = library.config_presets().iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert!(ids.iter().all(|id| id.starts_with("config-preset-")));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut library = PresetLibrary::in_memory();
        assert!(library.save_preset("   ", &sample_state()).is_err());
        assert!(library.presets().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_list_untouched() {
        let mut library = PresetLibrary::new(Box::new(ReadOnly));
        assert!(library.save_preset("x", &sample_state()).is_err());
        assert!(library.presets().is_empty());
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        let mut storage = MemoryStorage::new();
        storage.write(PRESETS_KEY, "{not json").unwrap();
        storage.write(CONFIG_PRESETS_KEY, "[]").unwrap();
        let library = PresetLibrary::new(Box::new(storage));
        assert!(library.presets().is_empty());
        assert!(library.config_presets().is_empty());
    }

    #[test]
    fn test_export_import() {
        let mut library = PresetLibrary::in_memory();
        let id = library.save_preset("Aisle 3", &sample_state()).unwrap().id.clone();
        let json = library.export_preset_json(&id).unwrap();
        assert!(json.contains("\n  \"id\""));

        let imported = library.import_preset_json(&json).unwrap().clone();
        assert_ne!(imported.id, id);
        assert_eq!(imported.config, library.find_preset(&id).unwrap().config);
        assert_eq!(library.presets().len(), 2);

        assert!(matches!(
            library.import_preset_json("{oops"),
            Err(BarcodeGridError::Preset(_))
        ));
        assert_eq!(library.presets().len(), 2);
        assert!(library.export_preset_json("missing").is_err());
    }

    #[test]
    fn test_delete() {
        let mut library = PresetLibrary::in_memory();
        let id = library.save_config_preset("c", &sample_state()).unwrap().id.clone();
        assert!(library.delete_config_preset(&id).unwrap());
        assert!(!library.delete_config_preset(&id).unwrap());
        assert!(library.config_presets().is_empty());
    }

    #[test]
    fn test_merge_defaults_existing_wins() {
        let mut library = PresetLibrary::in_memory();
        let mine = library.save_config_preset("Mine", &sample_state()).unwrap().clone();
        let mut shadow = mine.clone();
        shadow.name = "Shipped".into();
        let fresh = ConfigPreset {
            id: "default-a1".into(),
            name: "A1 poster".into(),
            ..mine.clone()
        };
        assert_eq!(library.merge_default_config_presets(vec![shadow, fresh]), 1);
        assert_eq!(library.config_presets().len(), 2);
        assert_eq!(library.find_config_preset(&mine.id).unwrap().name, "Mine");
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Aisle 3  north"), "Aisle-3-north.json");
        assert_eq!(export_file_name("plain"), "plain.json");
    }
}
