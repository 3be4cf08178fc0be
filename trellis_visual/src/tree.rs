// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot arena holding the visual composition tree.

use alloc::vec::Vec;

use kurbo::{Affine, Vec2};

use crate::VisualError;

/// Identifier for a node in a [`VisualTree`].
///
/// A slot index plus a generation counter. Removing a node frees its slot;
/// reusing the slot bumps the generation, so stale handles never alias a
/// different live node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(u32, u32);

impl NodeId {
    const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Generation of this handle.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-node flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree take part in the render walk.
        const VISIBLE = 0b0000_0001;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

#[derive(Debug)]
struct Node<T> {
    payload: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    offset: Vec2,
    flags: NodeFlags,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Ordered tree of payloads with parent-local offsets.
///
/// Every node has at most one parent and an ordered child list. Detached
/// nodes are roots of their own trees.
#[derive(Debug)]
pub struct VisualTree<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for VisualTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> VisualTree<T> {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a detached node and returns its handle.
    pub fn insert(&mut self, payload: T) -> NodeId {
        self.insert_with(|_| payload)
    }

    /// Inserts a detached node whose payload is built from its own handle.
    pub fn insert_with(&mut self, payload: impl FnOnce(NodeId) -> T) -> NodeId {
        let id = if let Some(&idx) = self.free.last() {
            NodeId::new(idx, self.slots[idx as usize].generation + 1)
        } else {
            assert!(self.slots.len() < u32::MAX as usize, "visual tree slot overflow");
            #[expect(clippy::cast_possible_truncation, reason = "checked above")]
            let idx = self.slots.len() as u32;
            NodeId::new(idx, 1)
        };
        let node = Node {
            payload: payload(id),
            parent: None,
            children: Vec::new(),
            offset: Vec2::ZERO,
            flags: NodeFlags::default(),
        };
        if id.idx() < self.slots.len() {
            self.free.pop();
            let slot = &mut self.slots[id.idx()];
            slot.generation = id.1;
            slot.node = Some(node);
        } else {
            self.slots.push(Slot {
                generation: id.1,
                node: Some(node),
            });
        }
        self.len += 1;
        id
    }

    /// Returns `true` if `id` refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots
            .get(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots
            .get_mut(id.idx())
            .filter(|slot| slot.generation == id.1)
            .and_then(|slot| slot.node.as_mut())
    }

    fn live(&self, id: NodeId) -> Result<&Node<T>, VisualError> {
        self.node(id).ok_or(VisualError::StaleNode(id))
    }

    fn live_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, VisualError> {
        self.node_mut(id).ok_or(VisualError::StaleNode(id))
    }

    /// Payload of a live node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).map(|node| &node.payload)
    }

    /// Mutable payload of a live node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.payload)
    }

    /// Appends `child` to the end of `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), VisualError> {
        let count = self.live(parent)?.children.len();
        self.insert_child(parent, count, child)
    }

    /// Inserts `child` at `index` in `parent`'s children.
    ///
    /// Fails with [`VisualError::AlreadyParented`] if `child` has a parent
    /// and with [`VisualError::Cycle`] if `child` is `parent` or one of its
    /// ancestors.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), VisualError> {
        let count = self.live(parent)?.children.len();
        if self.live(child)?.parent.is_some() {
            return Err(VisualError::AlreadyParented(child));
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            return Err(VisualError::Cycle { parent, child });
        }
        if index > count {
            return Err(VisualError::OutOfRange { index, count });
        }
        self.live_mut(parent)?.children.insert(index, child);
        self.live_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from `parent`, leaving it as a root.
    ///
    /// Fails with [`VisualError::NotAChild`] if a live `child` is not among
    /// `parent`'s children.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), VisualError> {
        self.live(child)?;
        let node = self.live_mut(parent)?;
        let Some(position) = node.children.iter().position(|&c| c == child) else {
            return Err(VisualError::NotAChild { parent, child });
        };
        node.children.remove(position);
        self.live_mut(child)?.parent = None;
        Ok(())
    }

    /// Removes `id` and its whole subtree, returning the payloads in pre-order.
    pub fn remove(&mut self, id: NodeId) -> Result<Vec<(NodeId, T)>, VisualError> {
        if let Some(parent) = self.live(id)?.parent {
            self.remove_child(parent, id)?;
        }
        let order = self.descendants(id);
        let mut removed = Vec::with_capacity(order.len());
        for node_id in order {
            if let Some(node) = self.slots[node_id.idx()].node.take() {
                self.free.push(node_id.0);
                self.len -= 1;
                removed.push((node_id, node.payload));
            }
        }
        Ok(removed)
    }

    /// Number of children of `id`; zero for a stale handle.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).map_or(0, |node| node.children.len())
    }

    /// Child of `parent` at `index`.
    pub fn child(&self, parent: NodeId, index: usize) -> Result<NodeId, VisualError> {
        let children = &self.live(parent)?.children;
        children
            .get(index)
            .copied()
            .ok_or(VisualError::OutOfRange {
                index,
                count: children.len(),
            })
    }

    /// Children of `id` in order; empty for a stale handle.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |node| &node.children)
    }

    /// Parent of `id`, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent(id);
        core::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }

    /// `id` followed by all of its descendants in pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.is_alive(id) {
            return out;
        }
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Topmost ancestor of `id` (or `id` itself when detached).
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Sets the parent-local offset of `id`.
    pub fn set_offset(&mut self, id: NodeId, offset: Vec2) -> Result<(), VisualError> {
        self.live_mut(id)?.offset = offset;
        Ok(())
    }

    /// Parent-local offset of `id`; zero for a stale handle.
    #[must_use]
    pub fn offset(&self, id: NodeId) -> Vec2 {
        self.node(id).map_or(Vec2::ZERO, |node| node.offset)
    }

    /// Flags of `id`.
    #[must_use]
    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.node(id).map_or(NodeFlags::empty(), |node| node.flags)
    }

    /// Replaces the flags of `id`.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) -> Result<(), VisualError> {
        self.live_mut(id)?.flags = flags;
        Ok(())
    }

    /// Composition of the offsets from the root down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Result<Affine, VisualError> {
        let local = self.live(id)?.offset;
        let total = self
            .ancestors(id)
            .fold(local, |acc, ancestor| acc + self.offset(ancestor));
        Ok(Affine::translate(total))
    }

    /// Iterates over all live nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            let node = slot.node.as_ref()?;
            let idx = u32::try_from(idx).ok()?;
            Some((NodeId::new(idx, slot.generation), &node.payload))
        })
    }
}
