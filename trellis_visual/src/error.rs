// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::NodeId;

/// Errors raised by [`VisualTree`](crate::VisualTree) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VisualError {
    /// A child index was outside `0..count`.
    #[error("child index {index} out of range for {count} children")]
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children of the parent.
        count: usize,
    },
    /// The handle refers to a removed node.
    #[error("stale node handle {0:?}")]
    StaleNode(NodeId),
    /// The node is not a child of the given parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent that was searched.
        parent: NodeId,
        /// Node that was expected among its children.
        child: NodeId,
    },
    /// The node already has a parent.
    #[error("node {0:?} already has a parent")]
    AlreadyParented(NodeId),
    /// Attaching the node would make it its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Intended parent.
        parent: NodeId,
        /// Node being attached.
        child: NodeId,
    },
}
