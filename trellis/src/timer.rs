// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repeating timers driven by the platform.

use std::time::Duration;

use crate::dispatcher::Task;
use crate::platform::TimerHandle;
use crate::{TimerId, Ui, UiError};

type TimerCallback = Box<dyn FnMut(&mut Ui) -> Result<(), UiError>>;

pub(crate) struct TimerEntry {
    handle: TimerHandle,
    interval: Duration,
    /// `None` while the callback runs.
    callback: Option<TimerCallback>,
}

impl Ui {
    /// Starts a repeating timer whose ticks run `callback` on the task queue.
    pub fn start_timer(
        &mut self,
        interval: Duration,
        callback: impl FnMut(&mut Self) -> Result<(), UiError> + 'static,
    ) -> TimerId {
        let handle = self.platform.start_timer(interval);
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.insert(
            id,
            TimerEntry {
                handle,
                interval,
                callback: Some(Box::new(callback)),
            },
        );
        self.timer_ids.insert(handle, id);
        tracing::debug!(?id, ?handle, ?interval, "timer started");
        id
    }

    /// Stops a timer. Returns `false` if it was not running.
    ///
    /// Ticks already queued for the timer are discarded when they run.
    pub fn stop_timer(&mut self, id: TimerId) -> bool {
        let Some(entry) = self.timers.remove(&id) else {
            return false;
        };
        self.timer_ids.remove(&entry.handle);
        self.platform.kill_timer(entry.handle);
        tracing::debug!(?id, "timer stopped");
        true
    }

    /// Returns `true` while the timer is running.
    #[must_use]
    pub fn is_timer_running(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Interval a running timer was started with.
    #[must_use]
    pub fn timer_interval(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(&id).map(|entry| entry.interval)
    }

    /// Platform notification that a timer fired. Queues a tick.
    pub fn timer_elapsed(&mut self, handle: TimerHandle) {
        self.dispatcher.post(Task::TimerTick(handle));
    }

    pub(crate) fn tick(&mut self, handle: TimerHandle) -> Result<(), UiError> {
        let Some(&id) = self.timer_ids.get(&handle) else {
            tracing::trace!(?handle, "tick for a stopped timer");
            return Ok(());
        };
        let Some(mut callback) = self
            .timers
            .get_mut(&id)
            .and_then(|entry| entry.callback.take())
        else {
            return Ok(());
        };
        tracing::trace!(?id, "timer tick");
        let result = callback(self);
        // The callback may have stopped its own timer.
        if let Some(entry) = self.timers.get_mut(&id) {
            entry.callback = Some(callback);
        }
        result
    }
}
