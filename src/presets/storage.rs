//! Key-value backends holding the preset collections as JSON text.

use std::collections::HashMap;

use crate::error::Result;

/// Key of the presets-with-data collection.
pub const PRESETS_KEY: &str = "barcode-presets";
/// Key of the configuration-only collection.
pub const CONFIG_PRESETS_KEY: &str = "barcode-config-presets";

/// Where preset collections are persisted.
pub trait PresetStorage {
    /// Stored text for `key`, `None` when never written.
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Process-local storage, used by tests and as a fallback when no
/// persistent backend is available.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresetStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per collection inside a directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    dir: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirectoryStorage {
    /// Use `dir`, creating it if needed.
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> std::path::PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PresetStorage for DirectoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path(key), value)?;
        Ok(())
    }
}

/// Browser `localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Result<Self> {
        use crate::error::BarcodeGridError;

        let window = web_sys::window()
            .ok_or_else(|| BarcodeGridError::Storage("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| BarcodeGridError::Storage(format!("{e:?}")))?
            .ok_or_else(|| BarcodeGridError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl PresetStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| crate::error::BarcodeGridError::Storage(format!("{e:?}")))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| crate::error::BarcodeGridError::Storage(format!("{e:?}")))
    }
}
