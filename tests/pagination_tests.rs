//! Pagination and layout properties.
//!
//! Every item lands on exactly one page, in order, row-major; every page but
//! the last is full; barcode heights stay within their clamp.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]

use barcodegrid::layout::{
    optimal_barcode_height, GridLayout, PageMetrics, Pagination, MAX_BARCODE_HEIGHT,
    MIN_BARCODE_HEIGHT,
};
use barcodegrid::{BarcodeItem, GlobalSettings, GridConfig, GridState};
use test_case::test_case;

fn items(n: usize) -> Vec<BarcodeItem> {
    (0..n)
        .map(|i| BarcodeItem::new(format!("barcode-0-{i}"), format!("LOC-{:04}", i + 1)))
        .collect()
}

#[test_case(0, 4, 10 ; "empty")]
#[test_case(1, 4, 10 ; "single item")]
#[test_case(10, 4, 2 ; "partial last page")]
#[test_case(40, 4, 10 ; "exactly one page")]
#[test_case(41, 4, 10 ; "one item over")]
#[test_case(97, 3, 7 ; "odd sizes")]
#[test_case(1000, 10, 50 ; "maximum generator run")]
#[test_case(5, 1, 1 ; "one cell per page")]
fn test_every_item_once_in_order(n: usize, columns: usize, rows: usize) {
    let data = items(n);
    let pagination = Pagination::new(n, columns, rows);
    let pages = pagination.split(&data);

    let flattened: Vec<&BarcodeItem> = pages
        .iter()
        .flat_map(|p| p.lines.iter())
        .flat_map(|l| l.items.iter())
        .collect();
    assert_eq!(flattened.len(), n);
    for (i, item) in flattened.iter().enumerate() {
        assert_eq!(item.id, data[i].id);
    }

    assert_eq!(pages.len(), pagination.total_pages());
    for (idx, page) in pages.iter().enumerate() {
        let is_last = idx + 1 == pages.len();
        if is_last {
            let remaining = n - idx * columns * rows;
            assert_eq!(page.lines.len(), remaining.div_ceil(columns));
            assert!(page.lines.len() <= rows);
        } else {
            assert_eq!(page.lines.len(), rows);
            assert!(page.lines.iter().all(|l| l.items.len() == columns));
        }
    }
}

#[test]
fn test_ten_items_four_columns_two_rows() {
    let data = items(10);
    let pages = Pagination::new(10, 4, 2).split(&data);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].lines.len(), 2);
    assert_eq!(pages[0].lines[1].items[3].value, "LOC-0008");
    assert_eq!(pages[1].lines.len(), 1);
    let last: Vec<&str> = pages[1].lines[0].items.iter().map(|i| i.value.as_str()).collect();
    assert_eq!(last, ["LOC-0009", "LOC-0010"]);
    assert_eq!(pages[1].lines[0].placeholders, 2);
    // Line indices keep counting across the page break
    assert_eq!(pages[1].lines[0].index, 2);
}

#[test_case(0.0, 0.0 ; "no padding")]
#[test_case(1.0e6, 1.0e6 ; "huge padding")]
#[test_case(-1.0e6, -1.0e6 ; "negative padding")]
#[test_case(f64::INFINITY, 12.0 ; "infinite padding")]
#[test_case(f64::NAN, 12.0 ; "nan padding")]
fn test_barcode_height_clamped(cell_padding: f64, font_size: f64) {
    let settings = GlobalSettings {
        cell_padding,
        font_size,
        ..GlobalSettings::default()
    };
    for rows in [1, 2, 10, 50, 1000] {
        let config = GridConfig {
            rows,
            global_settings: settings,
            ..GridConfig::default()
        };
        let h = PageMetrics::compute(&config).barcode_height_px;
        assert!((MIN_BARCODE_HEIGHT..=MAX_BARCODE_HEIGHT).contains(&h), "{h}");
    }
    let h = optimal_barcode_height(f64::NAN, &settings);
    assert!((MIN_BARCODE_HEIGHT..=MAX_BARCODE_HEIGHT).contains(&h));
}

#[test]
fn test_layout_cells_match_pagination() {
    let state = GridState {
        data: items(23),
        config: GridConfig {
            columns: 5,
            rows: 3,
            ..GridConfig::default()
        },
        ..GridState::default()
    };
    let layout = GridLayout::compute(&state);
    assert_eq!(layout.total_pages, 2);
    let indices: Vec<usize> = layout.filled_cells().filter_map(|c| c.item_index).collect();
    assert_eq!(indices, (0..23).collect::<Vec<_>>());

    let last_line = layout.pages[1].lines.last().unwrap();
    assert_eq!(last_line.line, 4);
    assert_eq!(last_line.cells.iter().filter(|c| c.is_placeholder()).count(), 2);
}

#[test]
fn test_hit_testing_round_trips_cell_centres() {
    let mut state = GridState {
        data: items(12),
        config: GridConfig {
            columns: 4,
            rows: 3,
            ..GridConfig::default()
        },
        ..GridState::default()
    };
    state.overrides.column_spacing.insert(1, 40.0);
    state.overrides.line_spacing.insert(0, 2.0);
    let layout = GridLayout::compute(&state);

    for cell in layout.pages[0].lines.iter().flat_map(|l| l.cells.iter()) {
        let hit = layout
            .cell_at(0, cell.x + cell.width / 2.0, cell.y + cell.height / 2.0)
            .unwrap();
        assert_eq!(hit.key(), cell.key());
    }
    // Inside the widened gap after column 1
    let gap_x = layout.col_positions[1] + layout.col_width + 20.0;
    assert_eq!(layout.col_at_x(gap_x), None);
}
