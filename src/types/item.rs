use serde::{Deserialize, Serialize};

/// One barcode entry in the grid.
///
/// `value` is the encoded payload, `text` the optional label printed under
/// the symbol (falls back to `value`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BarcodeItem {
    pub id: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl BarcodeItem {
    /// Create an item whose label mirrors its value.
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            id: id.into(),
            text: Some(value.clone()),
            value,
        }
    }

    /// The label to print under the symbol.
    pub fn display_text(&self) -> &str {
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => &self.value,
        }
    }
}

/// Build the id of the `index`-th item produced by one import/generate action.
pub fn item_id(timestamp_ms: u64, index: usize) -> String {
    format!("barcode-{timestamp_ms}-{index}")
}
