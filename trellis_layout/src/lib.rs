// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Layout: measure/arrange bookkeeping and panel sizing solvers.
//!
//! - [`LayoutSlot`] is the per-element state machine with a single-slot
//!   desired-size cache.
//! - [`GridSolver`] sizes grid tracks (pixel, auto and star, with spans) and
//!   places cells.
//! - [`stack`] measures and arranges children stacked along one axis.
//! - [`geometry`] holds alignment and inset helpers.
//!
//! The solvers are independent of any element tree: children are measured
//! through callbacks that receive the child index and the available size.
//!
//! ```rust
//! use kurbo::Size;
//! use trellis_layout::{GridCell, GridSolver, TrackDefinition};
//!
//! let rows = [TrackDefinition::AUTO];
//! let columns = [TrackDefinition::AUTO];
//! let mut calls = Vec::new();
//! let mut solver = GridSolver::new();
//! let desired = solver
//!     .measure(&rows, &columns, &[GridCell::new(0, 0)], Size::new(500.0, 500.0), |_, available| {
//!         calls.push(available);
//!         Ok::<_, ()>(Size::new(40.0, 30.0))
//!     })
//!     .unwrap();
//!
//! assert_eq!(calls, [Size::new(f64::INFINITY, f64::INFINITY)]);
//! assert_eq!(desired, Size::new(40.0, 30.0));
//! ```

mod error;
pub mod geometry;
mod grid;
mod slot;
pub mod stack;

pub use error::{GridError, LayoutError};
pub use geometry::{Alignment, Orientation};
pub use grid::{
    GridArrangement, GridCell, GridLength, GridSolver, GridUnit, Segment, TrackDefinition,
};
pub use slot::{LayoutSlot, LayoutState, sanitize};
