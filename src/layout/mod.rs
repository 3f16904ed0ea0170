//! Layout engine: page metrics, pagination and per-cell geometry.
//!
//! This module handles:
//! - Row height and barcode height for a page format and margin
//! - Splitting items into pages and lines, row-major
//! - Cumulative cell positions with spacing overrides and hit testing
//! - Print page selection expressions

mod grid_layout;
mod metrics;
mod page_range;
mod paginate;

pub use grid_layout::{CellLayout, GridLayout, LineLayout, PageLayout};
pub use metrics::{
    optimal_barcode_height, PageMetrics, CELL_CHROME, MAX_BARCODE_HEIGHT, MIN_BARCODE_HEIGHT,
};
pub use page_range::PageSelection;
pub use paginate::{Line, LineSlice, Page, PageSlice, Pagination};
