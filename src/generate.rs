//! Sequential code generation: `prefix` followed by a zero-padded counter.

use serde::Deserialize;
use tracing::info;

use crate::error::{BarcodeGridError, Result};
use crate::types::{item_id, BarcodeItem};

/// Largest number of codes one generation may produce.
pub const MAX_COUNT: u32 = 1000;
/// Minimum width of the counter, padded with leading zeros.
pub const COUNTER_WIDTH: usize = 4;

/// Generator inputs as entered in the form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sequence {
    pub prefix: String,
    pub start: i64,
    pub count: u32,
}

impl Default for Sequence {
    fn default() -> Self {
        Self {
            prefix: "LOC-".to_string(),
            start: 1,
            count: 10,
        }
    }
}

impl Sequence {
    pub fn new(prefix: impl Into<String>, start: i64, count: u32) -> Self {
        Self {
            prefix: prefix.into(),
            start,
            count,
        }
    }

    /// Value of the `offset`-th code.
    pub fn value_at(&self, offset: u32) -> String {
        let number = self.start.saturating_add(i64::from(offset));
        format!("{}{:0>width$}", self.prefix, number.to_string(), width = COUNTER_WIDTH)
    }

    /// The first `n` values, for the form preview.
    pub fn preview(&self, n: u32) -> Vec<String> {
        (0..n).map(|i| self.value_at(i)).collect()
    }

    /// Produce the items; `count` must be within `1..=MAX_COUNT`.
    pub fn generate(&self, timestamp_ms: u64) -> Result<Vec<BarcodeItem>> {
        if self.count == 0 || self.count > MAX_COUNT {
            return Err(BarcodeGridError::InvalidInput(format!(
                "count must be between 1 and {MAX_COUNT} (got {})",
                self.count
            )));
        }
        let items: Vec<BarcodeItem> = (0..self.count)
            .zip(0usize..)
            .map(|(offset, index)| BarcodeItem::new(item_id(timestamp_ms, index), self.value_at(offset)))
            .collect();
        info!(prefix = %self.prefix, start = self.start, count = items.len(), "generated codes");
        Ok(items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("LOC-", 1, 0, "LOC-0001")]
    #[test_case("LOC-", 1, 9, "LOC-0010")]
    #[test_case("A", 12345, 0, "A12345" ; "wider than pad")]
    #[test_case("", -5, 0, "00-5" ; "negative pads as text")]
    fn test_value_at(prefix: &str, start: i64, offset: u32, expected: &str) {
        assert_eq!(Sequence::new(prefix, start, 1).value_at(offset), expected);
    }

    #[test]
    fn test_generate() {
        let items = Sequence::new("R", 98, 3).generate(7).unwrap();
        let values: Vec<_> = items.iter().map(|i| i.value.as_str()).collect();
        assert_eq!(values, ["R0098", "R0099", "R0100"]);
        assert_eq!(items[2].id, "barcode-7-2");
        assert_eq!(items[2].text.as_deref(), Some("R0100"));
    }

    #[test_case(0 ; "zero")]
    #[test_case(1001 ; "over max")]
    fn test_count_bounds(count: u32) {
        let err = Sequence::new("X", 1, count).generate(0).unwrap_err();
        assert!(matches!(err, BarcodeGridError::InvalidInput(_)));
    }

    #[test]
    fn test_upper_bound_allowed() {
        assert_eq!(Sequence::new("X", 1, MAX_COUNT).generate(0).unwrap().len(), 1000);
    }

    #[test]
    fn test_defaults_and_preview() {
        let seq: Sequence = serde_json::from_str(r#"{"prefix":"BIN-"}"#).unwrap();
        assert_eq!(seq.start, 1);
        assert_eq!(seq.count, 10);
        assert_eq!(seq.preview(3), ["BIN-0001", "BIN-0002", "BIN-0003"]);
    }
}
