// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis: a retained-mode UI core.
//!
//! A [`Ui`] owns a tree of elements. Each element has a kind, sparse
//! dependency-property storage from [`trellis_property`], a layout slot from
//! [`trellis_layout`], a node in a [`trellis_visual`] composition tree, and a
//! behaviour implementing [`Layoutable`] and [`Renderable`].
//!
//! Property writes that affect layout mark the element and its ancestors
//! dirty and request one deferred layout pass through the [`Dispatcher`].
//! [`Ui::run_pending`] runs queued passes, timer ticks and posted callbacks
//! in order. A pass measures and arranges every affected window at its
//! client size, then redraws it into the window's
//! [`PresentationSource`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Size;
//! use trellis::UiBuilder;
//! use trellis::elements::{Grid, Rectangle};
//! use trellis::headless::HeadlessPlatform;
//! use trellis_layout::TrackDefinition;
//!
//! let platform = HeadlessPlatform::with_window_size(Size::new(300.0, 100.0));
//! let mut ui = UiBuilder::new().platform(Box::new(platform)).build().unwrap();
//! let p = *ui.props();
//!
//! let grid = ui.create(ui.kinds().grid, Grid::new()).unwrap();
//! let columns = vec![
//!     TrackDefinition::pixels(100.0).unwrap(),
//!     TrackDefinition::AUTO,
//!     TrackDefinition::STAR,
//! ];
//! ui.set_value(grid, p.column_definitions, columns).unwrap();
//!
//! let cell = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
//! ui.set_value(cell, p.width, Some(50.0)).unwrap();
//! ui.set_value(cell, p.column, 1).unwrap();
//! ui.add_child(grid, cell).unwrap();
//!
//! let window = ui.create_window(Some(grid)).unwrap();
//! ui.show(window).unwrap();
//! ui.run_pending().unwrap();
//!
//! let tracks = ui.actual_track_sizes(grid).unwrap();
//! assert_eq!(tracks.columns(), &[100.0, 50.0, 150.0]);
//! assert_eq!(ui.get_value(cell, p.actual_width).unwrap(), 50.0);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` in the geometry and paint dependencies.

mod dispatcher;
mod element;
pub mod elements;
mod error;
pub mod headless;
mod id;
mod layout;
mod platform;
mod props;
mod scheduler;
mod template;
mod timer;
mod ui;
mod window;

pub use dispatcher::{Callback, Dispatcher};
pub use element::{DrawCtx, Element, LayoutCx, Layoutable, Renderable};
pub use error::UiError;
pub use id::{ElementId, TimerId, WindowId};
pub use platform::{Platform, PresentationSource, TimerHandle};
pub use props::{Kinds, Props};
pub use scheduler::LayoutScheduler;
pub use template::{Template, TemplateHandle};
pub use ui::{Ui, UiBuilder};
