// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Boundary to the windowing system.
//!
//! A [`Platform`] creates [`PresentationSource`]s (native windows with a
//! drawing surface) and timers. Events coming back from the platform (resize,
//! timer expiry) are fed to the [`Ui`](crate::Ui) by the host through
//! [`Ui::notify_resized`](crate::Ui::notify_resized) and
//! [`Ui::timer_elapsed`](crate::Ui::timer_elapsed).

use std::any::Any;
use std::time::Duration;

use kurbo::{Rect, Size};
use trellis_visual::Renderer;

/// Platform-issued timer identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Window and timer services supplied by the host.
pub trait Platform {
    /// Creates a hidden native window.
    fn create_presentation_source(&mut self) -> Box<dyn PresentationSource>;

    /// Starts a repeating timer.
    fn start_timer(&mut self, interval: Duration) -> TimerHandle;

    /// Stops a timer. Unknown handles are ignored.
    fn kill_timer(&mut self, handle: TimerHandle);
}

/// A native window with a drawing surface.
pub trait PresentationSource: Any {
    /// Size of the drawable area.
    fn client_size(&self) -> Size;

    /// Outer bounds of the window in screen coordinates.
    fn bounding_rect(&self) -> Rect;

    /// Moves or resizes the window.
    fn set_bounding_rect(&mut self, rect: Rect);

    /// Makes the window visible.
    fn show(&mut self);

    /// Hides the window.
    fn hide(&mut self);

    /// Destroys the native window.
    fn close(&mut self);

    /// Drawing surface used by the render walk.
    fn renderer(&mut self) -> &mut dyn Renderer;
}
