// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory platform for tests and offscreen hosts.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use hashbrown::HashMap;
use kurbo::{Rect, Size};
use trellis_visual::{RecordingRenderer, Renderer};

use crate::platform::{Platform, PresentationSource, TimerHandle};

#[derive(Debug, Default)]
struct Shared {
    next_timer: u64,
    timers: HashMap<TimerHandle, Duration>,
    windows_created: usize,
}

/// A [`Platform`] without a windowing system.
///
/// Windows record their draw calls in a [`RecordingRenderer`]; timers are
/// only bookkept and fire when the host calls
/// [`Ui::timer_elapsed`](crate::Ui::timer_elapsed).
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    shared: Rc<RefCell<Shared>>,
    window_size: Size,
}

impl Default for HeadlessPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessPlatform {
    /// Creates a platform whose windows start at 800 × 600.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window_size(Size::new(800.0, 600.0))
    }

    /// Creates a platform whose windows start at `size`.
    #[must_use]
    pub fn with_window_size(size: Size) -> Self {
        Self {
            shared: Rc::default(),
            window_size: size,
        }
    }

    /// Currently running timers and their intervals.
    ///
    /// Clones of the platform share this state, so a test can keep one
    /// clone after handing another to the [`Ui`](crate::Ui).
    #[must_use]
    pub fn active_timers(&self) -> Vec<(TimerHandle, Duration)> {
        let mut timers: Vec<_> = self
            .shared
            .borrow()
            .timers
            .iter()
            .map(|(h, d)| (*h, *d))
            .collect();
        timers.sort();
        timers
    }

    /// Number of presentation sources created so far.
    #[must_use]
    pub fn windows_created(&self) -> usize {
        self.shared.borrow().windows_created
    }
}

impl Platform for HeadlessPlatform {
    fn create_presentation_source(&mut self) -> Box<dyn PresentationSource> {
        self.shared.borrow_mut().windows_created += 1;
        Box::new(HeadlessSource::new(self.window_size))
    }

    fn start_timer(&mut self, interval: Duration) -> TimerHandle {
        let mut shared = self.shared.borrow_mut();
        shared.next_timer += 1;
        let handle = TimerHandle(shared.next_timer);
        shared.timers.insert(handle, interval);
        handle
    }

    fn kill_timer(&mut self, handle: TimerHandle) {
        self.shared.borrow_mut().timers.remove(&handle);
    }
}

/// Window of a [`HeadlessPlatform`].
#[derive(Debug)]
pub struct HeadlessSource {
    bounds: Rect,
    visible: bool,
    closed: bool,
    renderer: RecordingRenderer,
}

impl HeadlessSource {
    /// Creates a hidden window of `size` at the origin.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            bounds: size.to_rect(),
            visible: false,
            closed: false,
            renderer: RecordingRenderer::new(),
        }
    }

    /// Returns `true` between `show` and `hide`.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns `true` once closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Recorded draw calls.
    #[must_use]
    pub fn recorder(&self) -> &RecordingRenderer {
        &self.renderer
    }

    /// Mutable access to the recorder, for draining commands between frames.
    pub fn recorder_mut(&mut self) -> &mut RecordingRenderer {
        &mut self.renderer
    }
}

impl PresentationSource for HeadlessSource {
    fn client_size(&self) -> Size {
        self.bounds.size()
    }

    fn bounding_rect(&self) -> Rect {
        self.bounds
    }

    fn set_bounding_rect(&mut self, rect: Rect) {
        self.bounds = rect;
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn close(&mut self) {
        self.visible = false;
        self.closed = true;
    }

    fn renderer(&mut self) -> &mut dyn Renderer {
        &mut self.renderer
    }
}
