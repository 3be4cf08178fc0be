// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full layout passes through the UI host on the headless platform.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Size;
use trellis::elements::{Grid, Rectangle, StackPanel};
use trellis::headless::HeadlessPlatform;
use trellis::{ElementId, Ui};
use trellis_layout::TrackDefinition;

/// An `n` × `n` grid of fixed-size rectangles inside a window.
fn grid_window(n: usize) -> (Ui, Vec<ElementId>) {
    let platform = HeadlessPlatform::with_window_size(Size::new(800.0, 600.0));
    let mut ui = Ui::new(Box::new(platform)).expect("platform");
    let p = *ui.props();
    let grid = ui.create(ui.kinds().grid, Grid::new()).expect("grid");
    let tracks = |count: usize| -> Vec<TrackDefinition> {
        (0..count)
            .map(|i| {
                if i % 2 == 0 {
                    TrackDefinition::AUTO
                } else {
                    TrackDefinition::STAR
                }
            })
            .collect()
    };
    ui.set_value(grid, p.column_definitions, tracks(n))
        .expect("columns");
    ui.set_value(grid, p.row_definitions, tracks(n))
        .expect("rows");

    let mut leaves = Vec::with_capacity(n * n);
    for row in 0..n {
        for column in 0..n {
            let leaf = ui.create(ui.kinds().rectangle, Rectangle).expect("leaf");
            ui.set_value(leaf, p.width, Some(10.0)).expect("width");
            ui.set_value(leaf, p.height, Some(8.0)).expect("height");
            ui.set_value(leaf, p.column, column).expect("column");
            ui.set_value(leaf, p.row, row).expect("row");
            ui.add_child(grid, leaf).expect("detached leaf");
            leaves.push(leaf);
        }
    }
    let window = ui.create_window(Some(grid)).expect("window");
    ui.show(window).expect("show");
    ui.run_pending().expect("initial pass");
    (ui, leaves)
}

fn stack_window(n: usize) -> (Ui, Vec<ElementId>) {
    let mut ui = Ui::new(Box::new(HeadlessPlatform::new())).expect("platform");
    let p = *ui.props();
    let panel = ui.create(ui.kinds().stack_panel, StackPanel).expect("panel");
    let leaves: Vec<ElementId> = (0..n)
        .map(|_| {
            let leaf = ui.create(ui.kinds().rectangle, Rectangle).expect("leaf");
            ui.set_value(leaf, p.height, Some(12.0)).expect("height");
            ui.add_child(panel, leaf).expect("detached leaf");
            leaf
        })
        .collect();
    let window = ui.create_window(Some(panel)).expect("window");
    ui.show(window).expect("show");
    ui.run_pending().expect("initial pass");
    (ui, leaves)
}

fn bench_layout_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("trellis_layout_pass");

    for &n in &[4_usize, 16] {
        group.bench_with_input(BenchmarkId::new("grid_one_leaf_dirty", n), &n, |b, &n| {
            let (mut ui, leaves) = grid_window(n);
            let p = *ui.props();
            let target = leaves[leaves.len() / 2];
            let mut width = 10.0;
            b.iter(|| {
                width = if width == 10.0 { 14.0 } else { 10.0 };
                ui.set_value(target, p.width, Some(width)).expect("width");
                black_box(ui.run_pending().ok());
            });
        });
    }

    for &n in &[16_usize, 256] {
        group.bench_with_input(BenchmarkId::new("stack_many_dirty", n), &n, |b, &n| {
            let (mut ui, leaves) = stack_window(n);
            let p = *ui.props();
            let mut height = 12.0;
            b.iter(|| {
                height = if height == 12.0 { 13.0 } else { 12.0 };
                for &leaf in &leaves {
                    ui.set_value(leaf, p.height, Some(height)).expect("height");
                }
                black_box(ui.run_pending().ok());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_layout_pass);
criterion_main!(benches);
