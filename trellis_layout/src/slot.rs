// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element layout state.
//!
//! A [`LayoutSlot`] tracks where an element is in the measure/arrange cycle
//! and caches the results of the last pass:
//!
//! ```text
//! Dirty -> Measuring -> Measured -> Arranging -> Arranged
//!   ^                      ^                        |
//!   |                      +---- invalidate_arrange-+
//!   +------------------ invalidate_measure ---------+
//! ```
//!
//! The desired size is cached against the single constraint it was measured
//! with; measuring again with the same constraint while clean is a no-op.

use kurbo::{Rect, Size};

use crate::error::LayoutError;

/// Position of an element in the measure/arrange cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum LayoutState {
    /// The desired size is stale.
    #[default]
    Dirty,
    /// A measure is in progress.
    Measuring,
    /// The desired size is current; the arrangement is not.
    Measured,
    /// An arrange is in progress.
    Arranging,
    /// Both the desired size and the arrangement are current.
    Arranged,
}

/// Layout state and cached results of one element.
#[derive(Clone, Debug, Default)]
pub struct LayoutSlot {
    state: LayoutState,
    constraint: Option<Size>,
    desired: Size,
    final_rect: Option<Rect>,
    render_size: Size,
}

impl LayoutSlot {
    /// Creates a dirty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    #[inline]
    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Returns the desired size from the last completed measure.
    #[must_use]
    #[inline]
    pub fn desired(&self) -> Size {
        self.desired
    }

    /// Returns the constraint the cached desired size was computed with.
    #[must_use]
    #[inline]
    pub fn constraint(&self) -> Option<Size> {
        self.constraint
    }

    /// Returns the rect from the last arrange, in parent-local coordinates.
    #[must_use]
    #[inline]
    pub fn final_rect(&self) -> Option<Rect> {
        self.final_rect
    }

    /// Returns the size produced by the last arrange.
    #[must_use]
    #[inline]
    pub fn render_size(&self) -> Size {
        self.render_size
    }

    /// Marks the desired size stale. Valid from any state.
    pub fn invalidate_measure(&mut self) {
        self.state = LayoutState::Dirty;
    }

    /// Marks the arrangement stale while keeping the desired size.
    ///
    /// A slot that was never measured stays dirty.
    pub fn invalidate_arrange(&mut self) {
        if matches!(self.state, LayoutState::Arranging | LayoutState::Arranged) {
            self.state = LayoutState::Measured;
        }
    }

    /// Returns `true` if measuring with `available` would do any work.
    #[must_use]
    pub fn needs_measure(&self, available: Size) -> bool {
        match self.state {
            LayoutState::Dirty | LayoutState::Measuring => true,
            _ => self.constraint != Some(available),
        }
    }

    /// Enters [`LayoutState::Measuring`].
    ///
    /// Widths and heights may be infinite but not negative or NaN.
    pub fn begin_measure(&mut self, available: Size) -> Result<(), LayoutError> {
        let valid = |v: f64| !v.is_nan() && v >= 0.0;
        if !(valid(available.width) && valid(available.height)) {
            return Err(LayoutError::InvalidConstraint {
                width: available.width,
                height: available.height,
            });
        }
        self.state = LayoutState::Measuring;
        self.constraint = Some(available);
        Ok(())
    }

    /// Stores the desired size and enters [`LayoutState::Measured`].
    ///
    /// Non-finite or negative components are replaced by zero. Returns `true`
    /// if the desired size differs from the previous one. A slot invalidated
    /// while measuring stays dirty.
    pub fn finish_measure(&mut self, desired: Size) -> bool {
        let desired = sanitize(desired);
        let changed = desired != self.desired;
        self.desired = desired;
        if self.state == LayoutState::Measuring {
            self.state = LayoutState::Measured;
        }
        if changed {
            self.final_rect = None;
        }
        changed
    }

    /// Returns `true` if arranging into `rect` would do any work.
    #[must_use]
    pub fn needs_arrange(&self, rect: Rect) -> bool {
        self.state != LayoutState::Arranged || self.final_rect != Some(rect)
    }

    /// Enters [`LayoutState::Arranging`].
    ///
    /// The rect must be finite with a non-negative size.
    pub fn begin_arrange(&mut self, rect: Rect) -> Result<(), LayoutError> {
        let size = rect.size();
        let finite = rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite();
        if !finite || size.width < 0.0 || size.height < 0.0 {
            return Err(LayoutError::InvalidConstraint {
                width: size.width,
                height: size.height,
            });
        }
        self.state = LayoutState::Arranging;
        self.final_rect = Some(rect);
        Ok(())
    }

    /// Stores the render size and enters [`LayoutState::Arranged`].
    ///
    /// A slot invalidated while arranging keeps its invalidated state.
    pub fn finish_arrange(&mut self, render_size: Size) {
        self.render_size = sanitize(render_size);
        if self.state == LayoutState::Arranging {
            self.state = LayoutState::Arranged;
        }
    }
}

/// Replaces non-finite and negative components with zero.
#[must_use]
pub fn sanitize(size: Size) -> Size {
    let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
    Size::new(fix(size.width), fix(size.height))
}
