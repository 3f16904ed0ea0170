//! Structured error types for barcodegrid.
//!
//! Every failure is terminal for the action that triggered it. Callers surface
//! the message to the user and leave the in-memory state untouched.

/// All errors that can occur while importing, laying out, persisting or exporting grids.
#[derive(Debug, thiserror::Error)]
pub enum BarcodeGridError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File extension not handled by any importer.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Import produced no usable rows or columns.
    #[error("Nothing to import: {0}")]
    EmptyImport(String),

    /// Import failed while reading the file contents.
    #[error("Import error: {0}")]
    Import(String),

    /// Argument outside its accepted range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Grid configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Preset lookup or decoding failure.
    #[error("Preset error: {0}")]
    Preset(String),

    /// Export or print target could not be produced.
    #[error("Export error: {0}")]
    Export(String),

    /// Persistent storage backend failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BarcodeGridError>;

#[cfg(target_arch = "wasm32")]
impl From<BarcodeGridError> for wasm_bindgen::JsValue {
    fn from(e: BarcodeGridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = BarcodeGridError::UnsupportedFormat("pdf".into());
        assert_eq!(err.to_string(), "Unsupported file format: pdf");

        let err = BarcodeGridError::EmptyImport("no rows".into());
        assert_eq!(err.to_string(), "Nothing to import: no rows");
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let err: BarcodeGridError = parse.unwrap_err().into();
        assert!(matches!(err, BarcodeGridError::Json(_)));
    }
}
