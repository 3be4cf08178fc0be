// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use trellis_layout::LayoutError;
use trellis_property::PropertyError;
use trellis_visual::VisualError;

use crate::{ElementId, WindowId};

/// Errors surfaced by [`Ui`](crate::Ui) operations and deferred tasks.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum UiError {
    /// Property registration or value access failed.
    #[error(transparent)]
    Property(#[from] PropertyError),
    /// A measure or arrange was given an invalid constraint.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// A visual tree operation failed.
    #[error(transparent)]
    Visual(#[from] VisualError),
    /// The element was destroyed, or is in the middle of its own layout.
    #[error("element {0:?} is not available")]
    StaleElement(ElementId),
    /// The window was closed or never created.
    #[error("unknown window {0:?}")]
    UnknownWindow(WindowId),
    /// A template failed to build its visual tree.
    #[error("template for {owner:?} failed: {reason}")]
    Template {
        /// The templated control.
        owner: ElementId,
        /// What went wrong.
        reason: String,
    },
}
