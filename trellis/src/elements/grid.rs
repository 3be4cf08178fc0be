// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;
use trellis_layout::{GridArrangement, GridCell, GridSolver};
use trellis_visual::Renderer;

use crate::element::{DrawCtx, LayoutCx, Layoutable, Renderable};
use crate::elements::draw_background;
use crate::UiError;

/// Panel sizing its children into rows and columns.
///
/// Tracks come from `RowDefinitions`/`ColumnDefinitions`; an empty list
/// means a single star track. Children are placed with the attached
/// `Row`, `Column`, `RowSpan` and `ColumnSpan` properties, clamped into the
/// grid.
#[derive(Debug, Default)]
pub struct Grid {
    solver: GridSolver,
    arrangement: Option<GridArrangement>,
}

impl Grid {
    /// Creates a grid behaviour.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track sizes and cell rects from the last arrange.
    #[must_use]
    pub fn arrangement(&self) -> Option<&GridArrangement> {
        self.arrangement.as_ref()
    }

    /// Track solver state from the last measure.
    #[must_use]
    pub fn solver(&self) -> &GridSolver {
        &self.solver
    }
}

impl Layoutable for Grid {
    fn measure_core(&mut self, cx: &mut LayoutCx<'_>, constraint: Size) -> Result<Size, UiError> {
        let p = *cx.props();
        let rows = cx.get(p.row_definitions)?;
        let columns = cx.get(p.column_definitions)?;
        let children = cx.children();
        let cells = children
            .iter()
            .map(|&child| {
                Ok(
                    GridCell::new(cx.get_of(child, p.column)?, cx.get_of(child, p.row)?)
                        .with_span(
                            cx.get_of(child, p.column_span)?,
                            cx.get_of(child, p.row_span)?,
                        ),
                )
            })
            .collect::<Result<Vec<_>, UiError>>()?;

        self.solver
            .measure(&rows, &columns, &cells, constraint, |index, available| {
                cx.measure_child(children[index], available)
            })
    }

    fn arrange_core(&mut self, cx: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        let arrangement = self.solver.arrange(final_size);
        for (child, rect) in cx.children().into_iter().zip(arrangement.cell_rects()) {
            cx.arrange_child(child, *rect)?;
        }
        self.arrangement = Some(arrangement);
        Ok(final_size)
    }
}

impl Renderable for Grid {
    fn draw(&self, cx: &DrawCtx<'_>, renderer: &mut dyn Renderer) -> Result<(), UiError> {
        draw_background(cx, renderer)
    }
}
