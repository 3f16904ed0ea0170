//! Print page selection such as `"1,3-4"`.

use std::collections::BTreeSet;

/// Sorted, de-duplicated one-based page numbers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSelection(Vec<usize>);

impl PageSelection {
    /// Parse a comma separated list of page numbers and `a-b` ranges.
    ///
    /// Single numbers outside `[1, total_pages]` are dropped, ranges are
    /// normalized then cut to that interval, and unparsable parts are
    /// skipped. Returns `None` when the expression selects nothing, meaning
    /// "print every page".
    pub fn parse(expr: &str, total_pages: usize) -> Option<Self> {
        if expr.trim().is_empty() || total_pages == 0 {
            return None;
        }
        let page = |n: i64| usize::try_from(n).unwrap_or(usize::MAX);

        let mut pages = BTreeSet::new();
        for part in expr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.contains('-') {
                let mut bounds = part.split('-');
                let a = bounds.next().and_then(leading_int);
                let b = bounds.next().and_then(leading_int);
                if let (Some(a), Some(b)) = (a, b) {
                    let lo = page(a.min(b)).max(1);
                    let hi = page(a.max(b)).min(total_pages);
                    if lo <= hi {
                        pages.extend(lo..=hi);
                    }
                }
            } else if let Some(n) = leading_int(part).map(page) {
                if (1..=total_pages).contains(&n) {
                    pages.insert(n);
                }
            }
        }

        if pages.is_empty() {
            None
        } else {
            Some(Self(pages.into_iter().collect()))
        }
    }

    pub fn pages(&self) -> &[usize] {
        &self.0
    }

    pub fn contains(&self, page_number: usize) -> bool {
        self.0.binary_search(&page_number).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Leading decimal integer of `s` after whitespace, ignoring any trailing text.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    let digits = s.get(..end)?;
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<i64>().unwrap_or(i64::MAX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("1,3-4", 5, &[1, 3, 4] ; "list and range")]
    #[test_case("4-2", 5, &[2, 3, 4] ; "reversed range")]
    #[test_case("2, 2, 1-2", 5, &[1, 2] ; "duplicates")]
    #[test_case("0,2,9", 5, &[2] ; "out of range numbers dropped")]
    #[test_case("3-99", 4, &[3, 4] ; "range cut at last page")]
    #[test_case("0-2", 5, &[1, 2] ; "range cut at first page")]
    #[test_case("2a, x, 3", 5, &[2, 3] ; "trailing garbage")]
    fn test_parse(expr: &str, total: usize, expected: &[usize]) {
        let selection = PageSelection::parse(expr, total).unwrap();
        assert_eq!(selection.pages(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("abc" ; "garbage")]
    #[test_case("-3" ; "open range")]
    #[test_case("9" ; "past last page")]
    #[test_case("0" ; "page zero")]
    #[test_case("7-9" ; "range past last page")]
    #[test_case("0, 6, 8-12" ; "nothing in range")]
    fn test_selects_all(expr: &str) {
        assert!(PageSelection::parse(expr, 5).is_none());
    }

    #[test]
    fn test_contains() {
        let selection = PageSelection::parse("1,3-4", 5).unwrap();
        assert!(selection.contains(3));
        assert!(!selection.contains(2));
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_no_pages() {
        assert!(PageSelection::parse("1", 0).is_none());
    }
}
