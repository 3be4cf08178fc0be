// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::convert::Infallible;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use trellis_layout::{GridCell, GridSolver, TrackDefinition};

fn tracks(count: usize) -> Vec<TrackDefinition> {
    (0..count)
        .map(|i| match i % 3 {
            0 => TrackDefinition::pixels(40.0).expect("finite pixel size"),
            1 => TrackDefinition::AUTO,
            _ => TrackDefinition::star(1.0 + (i % 4) as f64).expect("positive weight"),
        })
        .collect()
}

/// One cell per (column, row), every seventh spanning two tracks each way.
fn cells(columns: usize, rows: usize) -> Vec<GridCell> {
    let mut cells = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        for column in 0..columns {
            let span = if (row * columns + column) % 7 == 0 { 2 } else { 1 };
            cells.push(GridCell::new(column, row).with_span(span, span));
        }
    }
    cells
}

fn desired(index: usize) -> Size {
    Size::new(10.0 + (index % 5) as f64 * 7.0, 8.0 + (index % 3) as f64 * 5.0)
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("trellis_layout_grid");

    for &n in &[4_usize, 16, 64] {
        let columns = tracks(n);
        let rows = tracks(n);
        let cells = cells(n, n);
        let available = Size::new(40.0 * n as f64, 30.0 * n as f64);

        group.bench_with_input(BenchmarkId::new("measure_arrange", n), &n, |b, _| {
            let mut solver = GridSolver::new();
            b.iter(|| {
                let measured = solver.measure(&rows, &columns, &cells, available, |index, _| {
                    Ok::<_, Infallible>(desired(index))
                });
                black_box(measured.ok());
                black_box(solver.arrange(available));
            });
        });

        group.bench_with_input(BenchmarkId::new("measure_unbounded", n), &n, |b, _| {
            let mut solver = GridSolver::new();
            b.iter(|| {
                let measured = solver.measure(
                    &rows,
                    &columns,
                    &cells,
                    Size::new(f64::INFINITY, f64::INFINITY),
                    |index, _| Ok::<_, Infallible>(desired(index)),
                );
                black_box(measured.ok());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
