// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use trellis_visual::NodeId;

/// Handle of an element owned by a [`Ui`](crate::Ui).
///
/// Handles are generational: once the element is destroyed the handle stays
/// stale even if its storage is reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ElementId(pub(crate) NodeId);

impl ElementId {
    /// The visual tree node backing this element.
    #[must_use]
    pub fn node(self) -> NodeId {
        self.0
    }
}

/// Handle of a window created with [`Ui::create_window`](crate::Ui::create_window).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) u32);

/// Handle of a timer started with [`Ui::start_timer`](crate::Ui::start_timer).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub(crate) u32);
