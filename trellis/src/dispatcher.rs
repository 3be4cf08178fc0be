// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-threaded FIFO of deferred work.

use std::collections::VecDeque;
use std::fmt;

use crate::platform::TimerHandle;
use crate::{Ui, UiError};

/// A deferred closure run against the [`Ui`].
pub type Callback = Box<dyn FnOnce(&mut Ui) -> Result<(), UiError>>;

pub(crate) enum Task {
    LayoutPass,
    TimerTick(TimerHandle),
    Invoke(Callback),
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LayoutPass => f.write_str("LayoutPass"),
            Self::TimerTick(handle) => f.debug_tuple("TimerTick").field(handle).finish(),
            Self::Invoke(_) => f.write_str("Invoke"),
        }
    }
}

/// The UI task queue.
///
/// Everything that happens later (layout passes, timer ticks, posted
/// callbacks) goes through here and runs on the thread that owns the
/// [`Ui`], in posting order.
#[derive(Debug, Default)]
pub struct Dispatcher {
    queue: VecDeque<Task>,
}

impl Dispatcher {
    pub(crate) fn post(&mut self, task: Task) {
        self.queue.push_back(task);
    }

    pub(crate) fn pop(&mut self) -> Option<Task> {
        self.queue.pop_front()
    }

    /// Number of queued tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of queued layout passes.
    #[must_use]
    pub fn pending_layout_passes(&self) -> usize {
        self.queue
            .iter()
            .filter(|task| matches!(task, Task::LayoutPass))
            .count()
    }
}
