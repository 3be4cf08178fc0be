// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end behaviour of the grid solver.

use kurbo::{Rect, Size};
use trellis_layout::{GridCell, GridLength, GridSolver, GridUnit, TrackDefinition};

fn measure_fixed(
    solver: &mut GridSolver,
    rows: &[TrackDefinition],
    columns: &[TrackDefinition],
    cells: &[GridCell],
    constraint: Size,
    child: Size,
) -> Size {
    solver
        .measure(rows, columns, cells, constraint, |_, _| Ok::<_, ()>(child))
        .unwrap()
}

#[test]
fn no_definitions_match_one_star_row_and_column() {
    let cells = [GridCell::new(0, 0), GridCell::new(3, 2).with_span(2, 2)];
    let constraint = Size::new(400.0, 300.0);
    let child = Size::new(35.0, 25.0);

    let mut implicit = GridSolver::new();
    let implicit_desired = measure_fixed(&mut implicit, &[], &[], &cells, constraint, child);
    let implicit_arranged = implicit.arrange(constraint);

    let mut explicit = GridSolver::new();
    let star = [TrackDefinition::STAR];
    let explicit_desired = measure_fixed(&mut explicit, &star, &star, &cells, constraint, child);
    let explicit_arranged = explicit.arrange(constraint);

    assert_eq!(implicit_desired, explicit_desired);
    assert_eq!(implicit_arranged, explicit_arranged);
    assert_eq!(implicit.row_count(), 1);
    assert_eq!(implicit.column(0).map(|s| s.unit()), Some(GridUnit::Star));
    assert_eq!(
        implicit_arranged.cell_rect(1),
        Some(Rect::new(0.0, 0.0, 400.0, 300.0))
    );
}

#[test]
fn pixel_columns_keep_their_width_and_star_takes_the_rest() {
    let columns = [
        TrackDefinition::pixels(100.0).unwrap(),
        TrackDefinition::pixels(50.0).unwrap(),
        TrackDefinition::STAR,
    ];
    let mut solver = GridSolver::new();
    measure_fixed(
        &mut solver,
        &[],
        &columns,
        &[],
        Size::new(300.0, 100.0),
        Size::ZERO,
    );
    let arranged = solver.arrange(Size::new(300.0, 100.0));
    assert_eq!(arranged.columns(), &[100.0, 50.0, 150.0]);
}

#[test]
fn auto_auto_child_is_measured_once_unconstrained() {
    let rows = [TrackDefinition::AUTO];
    let columns = [TrackDefinition::AUTO];
    let mut calls = Vec::new();
    let mut solver = GridSolver::new();
    solver
        .measure(
            &rows,
            &columns,
            &[GridCell::new(0, 0)],
            Size::new(500.0, 500.0),
            |index, available| {
                calls.push((index, available));
                Ok::<_, ()>(Size::new(70.0, 20.0))
            },
        )
        .unwrap();

    assert_eq!(calls, [(0, Size::new(f64::INFINITY, f64::INFINITY))]);
    assert_eq!(solver.column(0).map(|s| s.desired()), Some(70.0));
    assert_eq!(solver.row(0).map(|s| s.desired()), Some(20.0));
}

#[test]
fn span_shortfall_goes_to_the_star_track() {
    let columns = [TrackDefinition::pixels(50.0).unwrap(), TrackDefinition::STAR];
    let mut solver = GridSolver::new();
    let desired = measure_fixed(
        &mut solver,
        &[],
        &columns,
        &[GridCell::new(0, 0).with_span(2, 1)],
        Size::new(500.0, 500.0),
        Size::new(200.0, 10.0),
    );

    assert_eq!(solver.column(0).map(|s| s.desired()), Some(50.0));
    assert_eq!(solver.column(1).map(|s| s.desired()), Some(150.0));
    assert_eq!(desired.width, 200.0);
}

#[test]
fn weighted_stars_share_remaining_space() {
    let columns = [
        TrackDefinition::AUTO,
        TrackDefinition::star(1.0).unwrap(),
        TrackDefinition::star(2.0).unwrap(),
    ];
    let rows = [TrackDefinition::AUTO];
    let mut solver = GridSolver::new();
    measure_fixed(
        &mut solver,
        &rows,
        &columns,
        &[GridCell::new(0, 0)],
        Size::new(400.0, 100.0),
        Size::new(100.0, 20.0),
    );
    let arranged = solver.arrange(Size::new(400.0, 20.0));
    assert_eq!(arranged.columns(), &[100.0, 100.0, 200.0]);
    assert_eq!(arranged.rows(), &[20.0]);
    assert_eq!(arranged.cell_rect(0), Some(Rect::new(0.0, 0.0, 100.0, 20.0)));
}

#[test]
fn star_tracks_honour_max_when_arranged() {
    let columns = [
        TrackDefinition::with_bounds(GridLength::STAR, 0.0, 60.0).unwrap(),
        TrackDefinition::STAR,
    ];
    let mut solver = GridSolver::new();
    measure_fixed(
        &mut solver,
        &[],
        &columns,
        &[],
        Size::new(200.0, 100.0),
        Size::ZERO,
    );
    let arranged = solver.arrange(Size::new(200.0, 100.0));
    assert_eq!(arranged.columns(), &[60.0, 140.0]);
}

#[test]
fn infinite_constraint_sizes_stars_to_content() {
    let mut solver = GridSolver::new();
    let desired = measure_fixed(
        &mut solver,
        &[],
        &[],
        &[GridCell::new(0, 0)],
        Size::new(f64::INFINITY, f64::INFINITY),
        Size::new(80.0, 60.0),
    );
    assert_eq!(desired, Size::new(80.0, 60.0));
    assert!(solver.column(0).is_some_and(|s| s.offered().is_finite()));
}

#[test]
fn cell_rects_are_running_sums() {
    let columns = [
        TrackDefinition::pixels(10.0).unwrap(),
        TrackDefinition::pixels(20.0).unwrap(),
        TrackDefinition::pixels(30.0).unwrap(),
    ];
    let rows = [
        TrackDefinition::pixels(5.0).unwrap(),
        TrackDefinition::pixels(15.0).unwrap(),
    ];
    let cells = [
        GridCell::new(1, 1).with_span(2, 1),
        // Out of range: clamped to the last column with a span of one.
        GridCell::new(9, 0).with_span(4, 1),
    ];
    let mut solver = GridSolver::new();
    measure_fixed(
        &mut solver,
        &rows,
        &columns,
        &cells,
        Size::new(100.0, 100.0),
        Size::ZERO,
    );
    let arranged = solver.arrange(Size::new(60.0, 20.0));
    assert_eq!(arranged.cell_rect(0), Some(Rect::new(10.0, 5.0, 60.0, 20.0)));
    assert_eq!(arranged.cell_rect(1), Some(Rect::new(30.0, 0.0, 60.0, 5.0)));
}
