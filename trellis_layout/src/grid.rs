// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grid track sizing with pixel, auto and star tracks and spanning cells.
//!
//! Each axis is modelled as an `N x N` matrix of [`Segment`]s. The diagonal
//! holds the tracks themselves; entry `[end][start]` below the diagonal holds
//! the size a cell spanning tracks `start..=end` requires.
//!
//! Measuring runs six passes over the cells so that auto tracks see sized
//! star tracks and the other way round:
//!
//! 1. auto rows × auto columns, measured unconstrained on both axes;
//! 2. star rows × auto columns, unconstrained width, and unconstrained height
//!    when some cell spans auto rows × star columns;
//! 3. auto rows × star columns, unconstrained height;
//! 4. star rows × auto columns again, unconstrained width only;
//! 5. cells touching no star track, unconstrained on their auto axes;
//! 6. everything else.
//!
//! Before every pass the star tracks are re-expanded into the space left by
//! the other tracks. After every pass the measured sizes are distributed
//! into the matrices, single-track requirements first.

use kurbo::{Rect, Size};

use crate::error::GridError;
use crate::slot::sanitize;

/// Sizing mode of a track.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GridUnit {
    /// A size in pixels, raised by content up to the track max.
    Pixel,
    /// Sized to content.
    Auto,
    /// A weighted share of the remaining space.
    Star,
}

/// Length of a grid track: a unit and a value (pixels or star weight).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLength {
    unit: GridUnit,
    value: f64,
}

impl GridLength {
    /// A content-sized track.
    pub const AUTO: Self = Self {
        unit: GridUnit::Auto,
        value: 1.0,
    };

    /// A star track of weight one.
    pub const STAR: Self = Self {
        unit: GridUnit::Star,
        value: 1.0,
    };

    /// A pixel-size track.
    ///
    /// The value is checked when the length is turned into a
    /// [`TrackDefinition`].
    #[must_use]
    pub const fn pixels(value: f64) -> Self {
        Self {
            unit: GridUnit::Pixel,
            value,
        }
    }

    /// A star track with the given weight.
    ///
    /// Weights must be finite and strictly positive.
    pub fn try_star(weight: f64) -> Result<Self, GridError> {
        Self {
            unit: GridUnit::Star,
            value: weight,
        }
        .validated()
    }

    /// Returns the unit.
    #[must_use]
    #[inline]
    pub const fn unit(self) -> GridUnit {
        self.unit
    }

    /// Returns the pixel size or star weight.
    #[must_use]
    #[inline]
    pub const fn value(self) -> f64 {
        self.value
    }

    fn validated(self) -> Result<Self, GridError> {
        match self.unit {
            GridUnit::Star if !(self.value.is_finite() && self.value > 0.0) => {
                Err(GridError::InvalidStarWeight(self.value))
            }
            GridUnit::Pixel if !(self.value.is_finite() && self.value >= 0.0) => {
                Err(GridError::InvalidPixelLength(self.value))
            }
            _ => Ok(self),
        }
    }
}

/// A row or column definition: a length and min/max clamps.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TrackDefinition {
    length: GridLength,
    min: f64,
    max: f64,
}

impl TrackDefinition {
    /// An unbounded star track of weight one.
    pub const STAR: Self = Self {
        length: GridLength::STAR,
        min: 0.0,
        max: f64::INFINITY,
    };

    /// An unbounded auto track.
    pub const AUTO: Self = Self {
        length: GridLength::AUTO,
        min: 0.0,
        max: f64::INFINITY,
    };

    /// Creates an unbounded track of the given length.
    pub fn new(length: GridLength) -> Result<Self, GridError> {
        Self::with_bounds(length, 0.0, f64::INFINITY)
    }

    /// Creates a pixel-size track.
    pub fn pixels(value: f64) -> Result<Self, GridError> {
        Self::new(GridLength::pixels(value))
    }

    /// Creates a star track with the given weight.
    pub fn star(weight: f64) -> Result<Self, GridError> {
        Self::new(GridLength::try_star(weight)?)
    }

    /// Creates a track clamped to `[min, max]`.
    ///
    /// `min` must be finite, `max` may be infinite, and `0 <= min <= max`.
    pub fn with_bounds(length: GridLength, min: f64, max: f64) -> Result<Self, GridError> {
        if !(min.is_finite() && min >= 0.0 && !max.is_nan() && min <= max) {
            return Err(GridError::InvalidBounds { min, max });
        }
        Ok(Self {
            length: length.validated()?,
            min,
            max,
        })
    }

    /// Returns the track length.
    #[must_use]
    #[inline]
    pub fn length(&self) -> GridLength {
        self.length
    }

    /// Returns the lower clamp.
    #[must_use]
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the upper clamp.
    #[must_use]
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Default for TrackDefinition {
    fn default() -> Self {
        Self::STAR
    }
}

/// Placement of a child in the grid.
///
/// Out-of-range placements are clamped into the grid when measured: the
/// start index to the last track and the span to `1..=remaining`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct GridCell {
    /// First column.
    pub column: usize,
    /// First row.
    pub row: usize,
    /// Number of columns spanned.
    pub column_span: usize,
    /// Number of rows spanned.
    pub row_span: usize,
}

impl GridCell {
    /// A single-track cell at the given position.
    #[must_use]
    pub const fn new(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            column_span: 1,
            row_span: 1,
        }
    }

    /// Returns the cell with the given spans.
    #[must_use]
    pub const fn with_span(mut self, column_span: usize, row_span: usize) -> Self {
        self.column_span = column_span;
        self.row_span = row_span;
        self
    }

    fn clamped(self, columns: usize, rows: usize) -> Self {
        let column = self.column.min(columns - 1);
        let row = self.row.min(rows - 1);
        Self {
            column,
            row,
            column_span: self.column_span.clamp(1, columns - column),
            row_span: self.row_span.clamp(1, rows - row),
        }
    }
}

impl Default for GridCell {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Solver state of one track, or of one span requirement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    min: f64,
    max: f64,
    offered: f64,
    desired: f64,
    stars: f64,
    unit: GridUnit,
    baseline: f64,
}

impl Default for Segment {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: f64::INFINITY,
            offered: 0.0,
            desired: 0.0,
            stars: 0.0,
            unit: GridUnit::Pixel,
            baseline: 0.0,
        }
    }
}

impl Segment {
    fn for_track(definition: &TrackDefinition) -> Self {
        let GridLength { unit, value } = definition.length;
        let mut segment = Self {
            min: definition.min,
            max: definition.max,
            unit,
            ..Self::default()
        };
        match unit {
            GridUnit::Pixel => {
                let size = value.clamp(definition.min, definition.max);
                segment.offered = size;
                segment.desired = size;
            }
            GridUnit::Auto => {
                segment.offered = definition.min;
                segment.desired = definition.min;
            }
            GridUnit::Star => segment.stars = value,
        }
        segment
    }

    fn implicit_star() -> Self {
        Self {
            unit: GridUnit::Star,
            stars: 1.0,
            ..Self::default()
        }
    }

    /// Lower clamp.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper clamp.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Size currently offered to children.
    #[must_use]
    pub fn offered(&self) -> f64 {
        self.offered
    }

    /// Size required by the content distributed so far.
    #[must_use]
    pub fn desired(&self) -> f64 {
        self.desired
    }

    /// Star weight; zero for non-star tracks.
    #[must_use]
    pub fn stars(&self) -> f64 {
        self.stars
    }

    /// Sizing mode.
    #[must_use]
    pub fn unit(&self) -> GridUnit {
        self.unit
    }

    /// Offered size saved at the end of the last measure.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    fn get(&self, field: Field) -> f64 {
        match field {
            Field::Offered => self.offered,
            Field::Desired => self.desired,
        }
    }

    fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::Offered => self.offered = value,
            Field::Desired => self.desired = value,
        }
    }

    fn accepts(&self, unit: GridUnit, field: Field) -> bool {
        self.unit == unit && self.get(field) < self.max
    }

    fn weight(&self, unit: GridUnit) -> f64 {
        if unit == GridUnit::Star { self.stars } else { 1.0 }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Field {
    Offered,
    Desired,
}

/// The segments of one axis.
#[derive(Clone, Debug, Default)]
struct SegmentMatrix {
    len: usize,
    segments: Vec<Segment>,
}

impl SegmentMatrix {
    fn new(definitions: &[TrackDefinition]) -> Self {
        let len = definitions.len().max(1);
        let mut matrix = Self {
            len,
            segments: vec![Segment::default(); len * len],
        };
        if definitions.is_empty() {
            *matrix.track_mut(0) = Segment::implicit_star();
        } else {
            for (i, definition) in definitions.iter().enumerate() {
                *matrix.track_mut(i) = Segment::for_track(definition);
            }
        }
        matrix
    }

    fn span(&self, end: usize, start: usize) -> &Segment {
        &self.segments[end * self.len + start]
    }

    fn span_mut(&mut self, end: usize, start: usize) -> &mut Segment {
        &mut self.segments[end * self.len + start]
    }

    fn track(&self, i: usize) -> &Segment {
        self.span(i, i)
    }

    fn track_mut(&mut self, i: usize) -> &mut Segment {
        self.span_mut(i, i)
    }

    fn tracks(&self) -> impl Iterator<Item = &Segment> + '_ {
        (0..self.len).map(|i| self.track(i))
    }

    fn offered_sum(&self, start: usize, count: usize) -> f64 {
        (start..start + count).map(|i| self.track(i).offered).sum()
    }

    fn total_desired(&self) -> f64 {
        self.tracks().map(|t| t.desired).sum()
    }

    /// Records that tracks `start..=end` need at least `size` in total.
    fn raise_requirement(&mut self, end: usize, start: usize, size: f64) {
        let segment = self.span_mut(end, start);
        let raised = segment.desired.max(size);
        segment.desired = if end == start {
            raised.min(segment.max)
        } else {
            raised
        };
    }

    /// Hands out `size` to the tracks of `unit` in `start..=end`, by weight,
    /// clamping at each track's max and redistributing the excess until every
    /// track either took its share or is saturated. Returns what is left.
    fn assign(&mut self, start: usize, end: usize, size: f64, unit: GridUnit, field: Field) -> f64 {
        if size == f64::INFINITY {
            for i in start..=end {
                let track = self.track_mut(i);
                if track.accepts(unit, field) {
                    track.set(field, track.max);
                }
            }
            return size;
        }

        let mut size = size;
        loop {
            let total_weight: f64 = (start..=end)
                .map(|i| self.track(i))
                .filter(|t| t.accepts(unit, field))
                .map(|t| t.weight(unit))
                .sum();
            if size.is_nan() || size <= 0.0 || total_weight <= 0.0 {
                break;
            }
            let contribution = size / total_weight;
            let mut clamped = false;
            for i in start..=end {
                let track = self.track_mut(i);
                if !track.accepts(unit, field) {
                    continue;
                }
                let current = track.get(field);
                let wanted = current + contribution * track.weight(unit);
                let next = wanted.min(track.max);
                clamped |= wanted > track.max;
                size -= next - current;
                track.set(field, next);
            }
            if !clamped {
                break;
            }
        }
        size
    }

    /// Resets star tracks and shares `available`, minus the space the other
    /// tracks already take, among them.
    fn expand_stars(&mut self, available: f64) {
        let mut available = available;
        for i in 0..self.len {
            let track = self.track_mut(i);
            if track.unit == GridUnit::Star {
                track.offered = 0.0;
            } else {
                available = (available - track.offered).max(0.0);
            }
        }
        if self.len > 0 {
            self.assign(0, self.len - 1, available, GridUnit::Star, Field::Offered);
        }
    }

    /// Grows track desired sizes until every span requirement is met, then
    /// offers each track its desired size.
    fn allocate_desired(&mut self) {
        for end in (0..self.len).rev() {
            for start in (0..=end).rev() {
                let required = self.span(end, start).desired;
                let allocated: f64 = (start..=end).map(|k| self.track(k).desired).sum();
                if allocated >= required {
                    continue;
                }
                let additional = required - allocated;
                let spans_star = (start..=end).any(|k| self.track(k).unit == GridUnit::Star);
                if spans_star {
                    self.assign(start, end, additional, GridUnit::Star, Field::Desired);
                } else {
                    let rest = self.assign(start, end, additional, GridUnit::Pixel, Field::Desired);
                    self.assign(start, end, rest, GridUnit::Auto, Field::Desired);
                }
            }
        }
        for i in 0..self.len {
            let track = self.track_mut(i);
            track.offered = track.desired;
        }
    }

    fn save_baseline(&mut self) {
        for segment in &mut self.segments {
            segment.baseline = segment.offered;
        }
    }

    fn restore_baseline(&mut self) {
        for segment in &mut self.segments {
            segment.offered = segment.baseline;
        }
    }

    /// Offers each track its desired size and returns the total.
    fn offer_desired(&mut self) -> f64 {
        let mut total = 0.0;
        for i in 0..self.len {
            let track = self.track_mut(i);
            track.offered = track.desired;
            total += track.offered;
        }
        total
    }
}

/// Which kinds of track a cell spans.
#[derive(Copy, Clone, Debug, Default)]
struct SpanKinds {
    star_row: bool,
    auto_row: bool,
    star_column: bool,
    auto_column: bool,
}

impl SpanKinds {
    fn of(cell: &GridCell, rows: &SegmentMatrix, columns: &SegmentMatrix) -> Self {
        let has = |matrix: &SegmentMatrix, start: usize, count: usize, unit: GridUnit| {
            (start..start + count).any(|i| matrix.track(i).unit == unit)
        };
        Self {
            star_row: has(rows, cell.row, cell.row_span, GridUnit::Star),
            auto_row: has(rows, cell.row, cell.row_span, GridUnit::Auto),
            star_column: has(columns, cell.column, cell.column_span, GridUnit::Star),
            auto_column: has(columns, cell.column, cell.column_span, GridUnit::Auto),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pass {
    AutoAuto,
    StarAuto,
    AutoStar,
    StarAutoAgain,
    NonStar,
    RemainingStar,
}

impl Pass {
    const ALL: [Self; 6] = [
        Self::AutoAuto,
        Self::StarAuto,
        Self::AutoStar,
        Self::StarAutoAgain,
        Self::NonStar,
        Self::RemainingStar,
    ];

    /// Returns the size added to the offered track sizes when measuring a
    /// cell in this pass, or `None` if the cell is not measured in this pass.
    fn base(self, kinds: SpanKinds, has_auto_star: bool) -> Option<Size> {
        const INF: f64 = f64::INFINITY;
        let SpanKinds {
            star_row,
            auto_row,
            star_column,
            auto_column,
        } = kinds;

        if auto_row && auto_column && !star_row && !star_column {
            (self == Self::AutoAuto).then_some(Size::new(INF, INF))
        } else if star_row && auto_column && !star_column {
            match self {
                Self::StarAuto if has_auto_star => Some(Size::new(INF, INF)),
                Self::StarAuto | Self::StarAutoAgain => Some(Size::new(INF, 0.0)),
                _ => None,
            }
        } else if auto_row && star_column && !star_row {
            (self == Self::AutoStar).then_some(Size::new(0.0, INF))
        } else if !(star_row || star_column) {
            (self == Self::NonStar).then(|| {
                Size::new(
                    if auto_column { INF } else { 0.0 },
                    if auto_row { INF } else { 0.0 },
                )
            })
        } else {
            (self == Self::RemainingStar).then_some(Size::ZERO)
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    Rows,
    Columns,
}

/// A measured size waiting to be distributed into one axis.
#[derive(Copy, Clone, Debug)]
struct Distribution {
    axis: Axis,
    end: usize,
    start: usize,
    size: f64,
}

/// Track sizes and child rects produced by [`GridSolver::arrange`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridArrangement {
    columns: Vec<f64>,
    rows: Vec<f64>,
    cells: Vec<Rect>,
}

impl GridArrangement {
    /// Actual column widths.
    #[must_use]
    pub fn columns(&self) -> &[f64] {
        &self.columns
    }

    /// Actual row heights.
    #[must_use]
    pub fn rows(&self) -> &[f64] {
        &self.rows
    }

    /// Rect of the cell at `index`, in grid coordinates.
    #[must_use]
    pub fn cell_rect(&self, index: usize) -> Option<Rect> {
        self.cells.get(index).copied()
    }

    /// Rects of all cells, in the order they were measured.
    #[must_use]
    pub fn cell_rects(&self) -> &[Rect] {
        &self.cells
    }
}

/// Grid track solver.
///
/// The solver keeps its segment matrices between [`measure`](Self::measure)
/// and [`arrange`](Self::arrange) so that arrange can start from the state
/// measure ended in.
///
/// ```rust
/// use kurbo::Size;
/// use trellis_layout::{GridCell, GridSolver, TrackDefinition};
///
/// let columns = [
///     TrackDefinition::pixels(100.0).unwrap(),
///     TrackDefinition::pixels(50.0).unwrap(),
///     TrackDefinition::STAR,
/// ];
/// let mut solver = GridSolver::new();
/// let desired = solver
///     .measure(&[], &columns, &[GridCell::new(0, 0)], Size::new(300.0, 100.0), |_, _| {
///         Ok::<_, ()>(Size::new(10.0, 10.0))
///     })
///     .unwrap();
/// assert_eq!(desired.width, 150.0);
///
/// let arrangement = solver.arrange(Size::new(300.0, 100.0));
/// assert_eq!(arrangement.columns(), &[100.0, 50.0, 150.0]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GridSolver {
    rows: SegmentMatrix,
    columns: SegmentMatrix,
    cells: Vec<GridCell>,
}

impl GridSolver {
    /// Creates an empty solver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of row tracks after the last measure.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len
    }

    /// Number of column tracks after the last measure.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len
    }

    /// Solver state of a row track.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&Segment> {
        (index < self.rows.len).then(|| self.rows.track(index))
    }

    /// Solver state of a column track.
    #[must_use]
    pub fn column(&self, index: usize) -> Option<&Segment> {
        (index < self.columns.len).then(|| self.columns.track(index))
    }

    /// Cell placements of the last measure, clamped into the grid.
    #[must_use]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Measures the grid.
    ///
    /// `measure_child(index, available)` measures the child placed at
    /// `cells[index]` and returns its desired size. Children may be measured
    /// more than once. Returns the sum of the tracks' desired sizes.
    pub fn measure<E, F>(
        &mut self,
        rows: &[TrackDefinition],
        columns: &[TrackDefinition],
        cells: &[GridCell],
        constraint: Size,
        mut measure_child: F,
    ) -> Result<Size, E>
    where
        F: FnMut(usize, Size) -> Result<Size, E>,
    {
        self.rows = SegmentMatrix::new(rows);
        self.columns = SegmentMatrix::new(columns);
        self.cells = cells
            .iter()
            .map(|cell| cell.clamped(self.columns.len, self.rows.len))
            .collect();

        let kinds: Vec<SpanKinds> = self
            .cells
            .iter()
            .map(|cell| SpanKinds::of(cell, &self.rows, &self.columns))
            .collect();
        let has_auto_star = kinds.iter().any(|k| k.auto_row && k.star_column);
        let has_children = !self.cells.is_empty();

        // Single-track sizes are applied in arrival order, spans afterwards
        // in reverse arrival order.
        let mut singles: Vec<Distribution> = Vec::new();
        let mut spans: Vec<Distribution> = Vec::new();

        for pass in Pass::ALL {
            if has_children {
                self.columns.expand_stars(constraint.width);
                self.rows.expand_stars(constraint.height);
            }

            for (index, (cell, span_kinds)) in self.cells.iter().zip(&kinds).enumerate() {
                let Some(base) = pass.base(*span_kinds, has_auto_star) else {
                    continue;
                };
                let available = Size::new(
                    base.width + self.columns.offered_sum(cell.column, cell.column_span),
                    base.height + self.rows.offered_sum(cell.row, cell.row_span),
                );
                let desired = sanitize(measure_child(index, available)?);

                let mut queue = |distribution: Distribution| {
                    if distribution.end == distribution.start {
                        singles.push(distribution);
                    } else {
                        spans.push(distribution);
                    }
                };
                if pass != Pass::StarAuto {
                    queue(Distribution {
                        axis: Axis::Rows,
                        end: cell.row + cell.row_span - 1,
                        start: cell.row,
                        size: desired.height,
                    });
                }
                queue(Distribution {
                    axis: Axis::Columns,
                    end: cell.column + cell.column_span - 1,
                    start: cell.column,
                    size: desired.width,
                });
            }

            for distribution in singles.drain(..).chain(spans.drain(..).rev()) {
                self.distribute(distribution);
            }
        }

        self.rows.save_baseline();
        self.columns.save_baseline();

        let desired = Size::new(self.columns.total_desired(), self.rows.total_desired());
        tracing::trace!(
            rows = self.rows.len,
            columns = self.columns.len,
            cells = self.cells.len(),
            width = desired.width,
            height = desired.height,
            "grid measured"
        );
        Ok(desired)
    }

    fn distribute(&mut self, distribution: Distribution) {
        let matrix = match distribution.axis {
            Axis::Rows => &mut self.rows,
            Axis::Columns => &mut self.columns,
        };
        matrix.raise_requirement(distribution.end, distribution.start, distribution.size);
        self.rows.allocate_desired();
        self.columns.allocate_desired();
    }

    /// Arranges the grid into `final_size`.
    ///
    /// Star tracks are re-expanded on any axis whose desired total differs
    /// from the final size.
    pub fn arrange(&mut self, final_size: Size) -> GridArrangement {
        self.rows.restore_baseline();
        self.columns.restore_baseline();

        let consumed_width = self.columns.offer_desired();
        let consumed_height = self.rows.offer_desired();
        if consumed_width != final_size.width {
            self.columns.expand_stars(final_size.width);
        }
        if consumed_height != final_size.height {
            self.rows.expand_stars(final_size.height);
        }

        let columns: Vec<f64> = self.columns.tracks().map(|t| t.offered).collect();
        let rows: Vec<f64> = self.rows.tracks().map(|t| t.offered).collect();
        let cells = self
            .cells
            .iter()
            .map(|cell| {
                let x: f64 = columns[..cell.column].iter().sum();
                let y: f64 = rows[..cell.row].iter().sum();
                let width: f64 = columns[cell.column..cell.column + cell.column_span]
                    .iter()
                    .sum();
                let height: f64 = rows[cell.row..cell.row + cell.row_span].iter().sum();
                Rect::new(x, y, x + width, y + height)
            })
            .collect();

        GridArrangement {
            columns,
            rows,
            cells,
        }
    }
}
