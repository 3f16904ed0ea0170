//! Splitting a flat item list into pages, lines and cells.
//!
//! Items fill the grid row-major: page `k` holds items
//! `[k * C * R, (k + 1) * C * R)`, and within a page line `r` holds the next
//! `C` items. Only the final line of the final page may be short; its missing
//! cells are placeholders.

use std::ops::Range;

use crate::types::GridConfig;

/// Pagination of `item_count` items on a `columns` x `rows_per_page` grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    item_count: usize,
    columns: usize,
    rows_per_page: usize,
}

/// One page of a [`Pagination`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlice {
    /// Zero-based page index.
    pub index: usize,
    /// Global index of the first line on this page (`index * rows_per_page`).
    pub first_line: usize,
    /// Number of lines on this page, never zero.
    pub lines: usize,
    /// Index of the first item on this page.
    pub first_item: usize,
    columns: usize,
    item_count: usize,
}

/// One line of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSlice {
    /// Line offset within its page.
    pub offset: usize,
    /// Global line index, used for line colors and line spacing.
    pub index: usize,
    /// Index of the item in column 0.
    pub first_item: usize,
    columns: usize,
    item_count: usize,
}

/// Borrowed view of one page's items, split into lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub index: usize,
    pub lines: Vec<Line<'a, T>>,
}

/// Borrowed view of one line's items.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a, T> {
    /// Global line index.
    pub index: usize,
    pub items: &'a [T],
    /// Empty cells padding the line out to the column count.
    pub placeholders: usize,
}

impl Pagination {
    /// Columns and rows below 1 count as 1.
    pub fn new(item_count: usize, columns: usize, rows_per_page: usize) -> Self {
        Self {
            item_count,
            columns: columns.max(1),
            rows_per_page: rows_per_page.max(1),
        }
    }

    pub fn for_config(item_count: usize, config: &GridConfig) -> Self {
        Self::new(
            item_count,
            config.effective_columns(),
            config.effective_rows(),
        )
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn items_per_page(&self) -> usize {
        self.columns.saturating_mul(self.rows_per_page)
    }

    /// `ceil(N / (C * R))`; zero when there are no items.
    pub fn total_pages(&self) -> usize {
        self.item_count.div_ceil(self.items_per_page())
    }

    /// Lines needed for all items, ignoring page breaks.
    pub fn total_lines(&self) -> usize {
        self.item_count.div_ceil(self.columns)
    }

    /// The page at `index`, or `None` past the last page.
    pub fn page(&self, index: usize) -> Option<PageSlice> {
        let first_item = index.checked_mul(self.items_per_page())?;
        let remaining = self.item_count.checked_sub(first_item)?;
        let lines = remaining.div_ceil(self.columns).min(self.rows_per_page);
        if lines == 0 {
            return None;
        }
        Some(PageSlice {
            index,
            first_line: index.checked_mul(self.rows_per_page)?,
            lines,
            first_item,
            columns: self.columns,
            item_count: self.item_count,
        })
    }

    pub fn pages(&self) -> impl Iterator<Item = PageSlice> + '_ {
        (0..self.total_pages()).filter_map(|index| self.page(index))
    }

    /// Split `items` into borrowed pages and lines.
    ///
    /// `items` should have `item_count` elements; extra elements are ignored and
    /// missing ones become placeholders.
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<Page<'a, T>> {
        self.pages()
            .map(|page| Page {
                index: page.index,
                lines: page
                    .lines()
                    .map(|line| {
                        let range = line.item_range();
                        let start = range.start.min(items.len());
                        let end = range.end.min(items.len());
                        let slice = items.get(start..end).unwrap_or(&[]);
                        Line {
                            index: line.index,
                            items: slice,
                            placeholders: self.columns.saturating_sub(slice.len()),
                        }
                    })
                    .collect(),
            })
            .collect()
    }
}

impl PageSlice {
    /// One-based page number for display.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn item_range(&self) -> Range<usize> {
        let end = self
            .first_item
            .saturating_add(self.lines.saturating_mul(self.columns))
            .min(self.item_count);
        self.first_item..end
    }

    pub fn lines(&self) -> impl Iterator<Item = LineSlice> + '_ {
        (0..self.lines).map(move |offset| LineSlice {
            offset,
            index: self.first_line + offset,
            first_item: self.first_item + offset * self.columns,
            columns: self.columns,
            item_count: self.item_count,
        })
    }
}

impl LineSlice {
    pub fn item_range(&self) -> Range<usize> {
        let end = self
            .first_item
            .saturating_add(self.columns)
            .min(self.item_count);
        self.first_item..end
    }

    /// Item shown in column `col`, or `None` for a placeholder.
    pub fn item_index(&self, col: usize) -> Option<usize> {
        if col >= self.columns {
            return None;
        }
        let index = self.first_item + col;
        (index < self.item_count).then_some(index)
    }

    /// `(column, item)` pairs for every column, placeholders included.
    pub fn cells(&self) -> impl Iterator<Item = (usize, Option<usize>)> + '_ {
        (0..self.columns).map(move |col| (col, self.item_index(col)))
    }

    /// Number of real items on this line.
    pub fn len(&self) -> usize {
        self.item_range().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fill() {
        let p = Pagination::new(12, 3, 2);
        assert_eq!(p.items_per_page(), 6);
        assert_eq!(p.total_pages(), 2);
        let pages: Vec<_> = p.pages().collect();
        assert_eq!(pages[1].first_line, 2);
        assert_eq!(pages[1].lines, 2);
        assert_eq!(pages[1].item_range(), 6..12);
    }

    #[test]
    fn test_short_last_page() {
        let p = Pagination::new(10, 4, 10);
        assert_eq!(p.total_pages(), 1);
        let page = p.page(0).unwrap();
        assert_eq!(page.lines, 3);
        let last = page.lines().last().unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last.item_index(1), Some(9));
        assert_eq!(last.item_index(2), None);
        assert!(p.page(1).is_none());
    }

    #[test]
    fn test_empty_has_no_pages() {
        let p = Pagination::new(0, 4, 10);
        assert_eq!(p.total_pages(), 0);
        assert_eq!(p.pages().count(), 0);
        assert!(p.split::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_zero_dimensions_clamped() {
        let p = Pagination::new(3, 0, 0);
        assert_eq!(p.columns(), 1);
        assert_eq!(p.rows_per_page(), 1);
        assert_eq!(p.total_pages(), 3);
    }

    #[test]
    fn test_split_borrows_items() {
        let items: Vec<u32> = (0..7).collect();
        let pages = Pagination::new(items.len(), 3, 2).split(&items);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines[0].items, &[0, 1, 2]);
        assert_eq!(pages[0].lines[1].items, &[3, 4, 5]);
        assert_eq!(pages[1].lines.len(), 1);
        assert_eq!(pages[1].lines[0].index, 2);
        assert_eq!(pages[1].lines[0].items, &[6]);
        assert_eq!(pages[1].lines[0].placeholders, 2);
    }

    #[test]
    fn test_huge_page_index() {
        let p = Pagination::new(5, 2, 2);
        assert!(p.page(usize::MAX).is_none());
    }
}
