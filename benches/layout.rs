//! Benchmarks for layout, pagination and document rendering.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use barcodegrid::generate::Sequence;
use barcodegrid::layout::{GridLayout, Pagination};
use barcodegrid::render::{print_document, PrintOptions};
use barcodegrid::{CellKey, ColorSet, GridConfig, GridState};

/// Generated codes, zebra-like line colors and a few spacing overrides
fn state_with(count: u32) -> GridState {
    let mut state = GridState {
        data: Sequence::new("LOC-", 1, count)
            .generate(0)
            .expect("Failed to generate codes"),
        config: GridConfig {
            columns: 5,
            rows: 12,
            ..GridConfig::default()
        },
        ..GridState::default()
    };
    let rows = state.total_rows() as u32;
    for line in (0..rows).step_by(2) {
        state
            .overrides
            .line_colors
            .insert(line, ColorSet::new("#f3f4f6", "", ""));
    }
    state.overrides.column_spacing.insert(1, 32.0);
    state.overrides.line_spacing.insert(3, 4.0);
    state
        .overrides
        .cell_colors
        .insert(CellKey::new(0, 0), ColorSet::new("#fee2e2", "#991b1b", "#991b1b"));
    state
}

/// Pagination of the largest generator run
fn bench_pagination(c: &mut Criterion) {
    let state = state_with(1000);

    c.bench_function("paginate_1000", |b| {
        b.iter(|| Pagination::new(state.data.len(), 5, 12).split(black_box(&state.data)))
    });
}

/// Full geometry at increasing item counts
fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for count in [10u32, 100, 1000] {
        let state = state_with(count);
        group.throughput(Throughput::Elements(u64::from(count)));
        group.bench_with_input(BenchmarkId::from_parameter(count), &state, |b, state| {
            b.iter(|| GridLayout::compute(black_box(state)))
        });
    }
    group.finish();
}

/// Print document for every page of the largest run
fn bench_print_document(c: &mut Criterion) {
    let state = state_with(1000);
    let layout = GridLayout::compute(&state);

    c.bench_function("print_document_1000", |b| {
        b.iter(|| {
            print_document(black_box(&state), &layout, &PrintOptions::default())
                .expect("Failed to render")
        })
    });
}

criterion_group!(
    benches,
    bench_pagination,
    bench_layout,
    bench_print_document
);
criterion_main!(benches);
