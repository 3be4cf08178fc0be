// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coalescing queue of elements awaiting a layout pass.

use hashbrown::HashSet;

use crate::ElementId;

/// Collects dirty elements and decides when a deferred pass must be posted.
///
/// At most one pass is scheduled at a time. Elements queued while a pass is
/// running are kept for exactly one follow-up pass, which is requested by
/// [`end_pass`](Self::end_pass) rather than posted from inside the pass.
///
/// ```rust
/// use trellis::LayoutScheduler;
/// # use trellis::{Ui, headless::HeadlessPlatform};
/// # use trellis::elements::Rectangle;
/// # let mut ui = Ui::new(Box::new(HeadlessPlatform::new())).unwrap();
/// # let kind = ui.kinds().rectangle;
/// # let a = ui.create(kind, Rectangle).unwrap();
/// # let b = ui.create(kind, Rectangle).unwrap();
///
/// let mut scheduler = LayoutScheduler::new();
/// assert!(scheduler.queue_measure(a));
/// assert!(!scheduler.queue_measure(b));
///
/// let entries = scheduler.begin_pass();
/// assert_eq!(entries, [a, b]);
/// assert!(!scheduler.queue_arrange(a));
/// assert!(scheduler.end_pass());
/// ```
#[derive(Debug, Default)]
pub struct LayoutScheduler {
    entries: Vec<ElementId>,
    queued: HashSet<ElementId>,
    scheduled: bool,
    in_progress: bool,
    follow_up: bool,
}

impl LayoutScheduler {
    /// Creates an idle scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` for the next pass.
    ///
    /// Returns `true` when the caller must post a deferred pass: nothing is
    /// scheduled yet and no pass is running.
    pub fn queue_measure(&mut self, id: ElementId) -> bool {
        if self.queued.insert(id) {
            self.entries.push(id);
        }
        if self.in_progress {
            self.follow_up = true;
            return false;
        }
        if self.scheduled {
            return false;
        }
        self.scheduled = true;
        true
    }

    /// Same as [`queue_measure`](Self::queue_measure): arrange always follows
    /// a measure of the owning window.
    pub fn queue_arrange(&mut self, id: ElementId) -> bool {
        self.queue_measure(id)
    }

    /// Takes the queued entries and marks a pass as running.
    pub fn begin_pass(&mut self) -> Vec<ElementId> {
        self.scheduled = false;
        self.in_progress = true;
        self.follow_up = false;
        self.queued.clear();
        core::mem::take(&mut self.entries)
    }

    /// Ends the running pass.
    ///
    /// Returns `true` if elements were queued during the pass; the follow-up
    /// pass then counts as scheduled and the caller must post it.
    pub fn end_pass(&mut self) -> bool {
        self.in_progress = false;
        if self.follow_up && !self.entries.is_empty() {
            self.follow_up = false;
            self.scheduled = true;
            return true;
        }
        self.follow_up = false;
        false
    }

    /// Forgets a destroyed element.
    pub fn prune(&mut self, id: ElementId) {
        if self.queued.remove(&id) {
            self.entries.retain(|&e| e != id);
        }
    }

    /// Returns `true` if a pass has been requested and not started.
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Returns `true` while a pass is running.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    /// Elements waiting for the next pass.
    #[must_use]
    pub fn pending(&self) -> &[ElementId] {
        &self.entries
    }
}
