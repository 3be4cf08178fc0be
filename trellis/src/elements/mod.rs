// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in element behaviours.
//!
//! Each behaviour is created together with its kind from
//! [`Kinds`](crate::Kinds):
//!
//! | Behaviour | Kind |
//! |-----------|------|
//! | [`Panel`] | `panel` |
//! | [`Grid`] | `grid` |
//! | [`StackPanel`] | `stack_panel` |
//! | [`Border`] | `border` |
//! | [`Rectangle`] | `rectangle` |
//! | [`ContentPresenter`] | `content_presenter` |
//! | [`Control`] | `control`, `window` |

mod border;
mod content_presenter;
mod control;
mod grid;
mod panel;
mod rectangle;
mod stack_panel;

pub use border::Border;
pub use content_presenter::ContentPresenter;
pub use control::Control;
pub use grid::Grid;
pub use panel::Panel;
pub use rectangle::Rectangle;
pub use stack_panel::StackPanel;

pub(crate) use panel::draw_background;
