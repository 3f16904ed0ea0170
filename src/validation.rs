//! Data and grid configuration checks run before printing or exporting.
//!
//! Errors block the action; warnings are shown but do not.

use std::collections::HashMap;

use serde::Serialize;

use crate::layout::Pagination;
use crate::types::{BarcodeItem, GridConfig};

/// Values longer than this get a warning.
pub const MAX_VALUE_LEN: usize = 100;

/// Collected problems. Line numbers in messages are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn finish(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Combine two reports.
    pub fn merge(mut self, other: Self) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.is_valid = self.errors.is_empty();
        self
    }
}

/// Check every item value.
///
/// Errors: empty list, blank value, non-ASCII value.
/// Warnings: value longer than [`MAX_VALUE_LEN`], value appearing more than once.
pub fn validate_items(items: &[BarcodeItem]) -> ValidationReport {
    if items.is_empty() {
        return ValidationReport::finish(vec!["no data to validate".to_string()], Vec::new());
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item.value.as_str()).or_default() += 1;
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        let line = idx + 1;
        let value = item.value.as_str();
        if value.trim().is_empty() {
            errors.push(format!("line {line}: barcode value is empty"));
        }
        if !value.is_empty() && !value.is_ascii() {
            errors.push(format!("line {line}: barcode value contains non-ASCII characters"));
        }
        let len = value.chars().count();
        if len > MAX_VALUE_LEN {
            warnings.push(format!("line {line}: barcode value is very long ({len} characters)"));
        }
        if counts.get(value).copied().unwrap_or(0) > 1 {
            warnings.push(format!("line {line}: barcode value {value:?} is duplicated"));
        }
    }

    ValidationReport::finish(errors, warnings)
}

/// Check the configuration ranges and warn when data spills past one page.
pub fn validate_grid(config: &GridConfig, item_count: usize) -> ValidationReport {
    let errors = config.validate();
    let mut warnings = Vec::new();
    let pagination = Pagination::for_config(item_count, config);
    if pagination.total_pages() > 1 {
        warnings.push(format!(
            "{item_count} barcodes need {} pages of {} cells",
            pagination.total_pages(),
            pagination.items_per_page()
        ));
    }
    ValidationReport::finish(errors, warnings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn items(values: &[&str]) -> Vec<BarcodeItem> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| BarcodeItem::new(i.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_empty_list() {
        let report = validate_items(&[]);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_clean_data() {
        let report = validate_items(&items(&["A-01", "A-02"]));
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_errors() {
        let report = validate_items(&items(&["ok", "  ", "café"]));
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].starts_with("line 2:"));
        assert!(report.errors[1].starts_with("line 3:"));
    }

    #[test]
    fn test_warnings() {
        let long = "X".repeat(101);
        let report = validate_items(&items(&["dup", &long, "dup"]));
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 3);
        assert!(report.warnings.iter().any(|w| w.contains("101 characters")));
        assert_eq!(
            report.warnings.iter().filter(|w| w.contains("duplicated")).count(),
            2
        );
    }

    #[test]
    fn test_grid_report() {
        let config = GridConfig::default(); // 40 cells per page
        assert!(validate_grid(&config, 40).warnings.is_empty());
        let report = validate_grid(&config, 41);
        assert!(report.is_valid);
        assert!(report.warnings[0].contains("2 pages"));

        let bad = GridConfig {
            columns: 12,
            ..GridConfig::default()
        };
        let merged = validate_grid(&bad, 1).merge(validate_items(&items(&["a"])));
        assert!(!merged.is_valid);
    }
}
