// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Framework measure and arrange.
//!
//! Around every [`Layoutable`](crate::Layoutable) call the [`Ui`] applies the
//! element-level sizing rules:
//!
//! - `Margin` is removed from the available space and added back to the
//!   desired size.
//! - `Width`/`Height` pin the size; `Min*`/`Max*` clamp it, max winning.
//! - Non-stretch alignments arrange the content at its desired size and
//!   place it inside the slot.
//! - Hidden elements measure to zero and are not arranged.

use kurbo::{Insets, Rect, Size, Vec2};
use trellis_layout::geometry::{align_in, clamp_size, deflate, inflate, round_rect};
use trellis_layout::{Alignment, LayoutState, sanitize};
use trellis_property::DependencyObjectExt;

use crate::element::{Element, LayoutCx};
use crate::ui::resolve;
use crate::{ElementId, Ui, UiError};

#[derive(Copy, Clone, Debug)]
struct Frame {
    visible: bool,
    margin: Insets,
    min: Size,
    max: Size,
    horizontal: Alignment,
    vertical: Alignment,
}

/// Effective clamps of one axis given an optional explicit length.
fn axis_bounds(length: Option<f64>, min: f64, max: f64) -> (f64, f64) {
    let upper = length.unwrap_or(f64::INFINITY).min(max).max(min);
    let lower = upper.min(length.unwrap_or(0.0)).max(min);
    (lower, upper)
}

impl Ui {
    fn frame(&self, id: ElementId) -> Result<Frame, UiError> {
        let p = self.props;
        let (min_width, max_width) = axis_bounds(
            self.get_value(id, p.width)?,
            self.get_value(id, p.min_width)?,
            self.get_value(id, p.max_width)?,
        );
        let (min_height, max_height) = axis_bounds(
            self.get_value(id, p.height)?,
            self.get_value(id, p.min_height)?,
            self.get_value(id, p.max_height)?,
        );
        Ok(Frame {
            visible: self.get_value(id, p.is_visible)?,
            margin: self.get_value(id, p.margin)?,
            min: Size::new(min_width, min_height),
            max: Size::new(max_width, max_height),
            horizontal: self.get_value(id, p.horizontal_alignment)?,
            vertical: self.get_value(id, p.vertical_alignment)?,
        })
    }

    /// Measures `id` with `available` and returns its desired size.
    ///
    /// A clean element measured again with the same size returns its cached
    /// result without calling into its behaviour.
    pub fn measure(&mut self, id: ElementId, available: Size) -> Result<Size, UiError> {
        let node = self.node_mut(id)?;
        if !node.slot.needs_measure(available) {
            return Ok(node.slot.desired());
        }
        node.slot.begin_measure(available)?;
        let mut behavior = node.behavior.take().ok_or(UiError::StaleElement(id))?;
        let result = self.measure_framework(id, behavior.as_mut(), available);
        let node = self.node_mut(id)?;
        node.behavior = Some(behavior);
        node.slot.finish_measure(result?);
        Ok(node.slot.desired())
    }

    fn measure_framework(
        &mut self,
        id: ElementId,
        behavior: &mut dyn Element,
        available: Size,
    ) -> Result<Size, UiError> {
        let frame = self.frame(id)?;
        if !frame.visible {
            return Ok(Size::ZERO);
        }
        let constraint = clamp_size(deflate(available, frame.margin), frame.min, frame.max);
        let mut cx = LayoutCx { ui: self, id };
        let desired = behavior.measure_core(&mut cx, constraint)?;
        let desired = clamp_size(sanitize(desired), frame.min, frame.max);
        Ok(inflate(desired, frame.margin))
    }

    /// Arranges `id` into `rect`, given in its parent's coordinates.
    ///
    /// Sets the element's visual offset and its `ActualWidth`/`ActualHeight`.
    pub fn arrange(&mut self, id: ElementId, rect: Rect) -> Result<(), UiError> {
        let slot = &self.node(id)?.slot;
        if matches!(slot.state(), LayoutState::Dirty | LayoutState::Measuring) {
            // Invalidated since its parent measured it.
            let available = slot.constraint().unwrap_or_else(|| rect.size());
            self.measure(id, available)?;
        }
        let node = self.node_mut(id)?;
        if !node.slot.needs_arrange(rect) {
            return Ok(());
        }
        node.slot.begin_arrange(rect)?;
        let desired = node.slot.desired();
        let mut behavior = node.behavior.take().ok_or(UiError::StaleElement(id))?;
        let result = self.arrange_framework(id, behavior.as_mut(), rect, desired);
        let node = self.node_mut(id)?;
        node.behavior = Some(behavior);
        let placed = result?;
        node.slot.finish_arrange(placed.size());
        self.tree.set_offset(id.0, placed.origin().to_vec2())?;
        self.publish_actual_size(id, placed.size())
    }

    fn publish_actual_size(&mut self, id: ElementId, size: Size) -> Result<(), UiError> {
        let mut changes = Vec::with_capacity(2);
        for (key, value) in [
            (&self.keys.actual_width, size.width),
            (&self.keys.actual_height, size.height),
        ] {
            let previous = resolve(&self.tree, &self.registry, id, key.property())?;
            let node = self.tree.get_mut(id.0).ok_or(UiError::StaleElement(id))?;
            changes.push(node.set_read_only_value(key, value, previous, &self.registry)?);
        }
        for change in changes {
            self.apply_change(change)?;
        }
        Ok(())
    }

    fn arrange_framework(
        &mut self,
        id: ElementId,
        behavior: &mut dyn Element,
        rect: Rect,
        desired: Size,
    ) -> Result<Rect, UiError> {
        let frame = self.frame(id)?;
        if !frame.visible {
            return Ok(Rect::from_origin_size(rect.origin(), Size::ZERO));
        }
        let m = frame.margin;
        let slot = Rect::from_origin_size(
            rect.origin() + Vec2::new(m.x0, m.y0),
            deflate(rect.size(), m),
        );
        let content = deflate(desired, m);
        let mut size = slot.size();
        if frame.horizontal != Alignment::Stretch {
            size.width = content.width.min(size.width);
        }
        if frame.vertical != Alignment::Stretch {
            size.height = content.height.min(size.height);
        }
        let size = clamp_size(size, frame.min, frame.max);

        let mut cx = LayoutCx { ui: self, id };
        let render = sanitize(behavior.arrange_core(&mut cx, size)?);
        let origin = align_in(slot, render, frame.horizontal, frame.vertical).origin();
        let placed = Rect::from_origin_size(origin, render);
        Ok(if self.layout_rounding {
            round_rect(placed)
        } else {
            placed
        })
    }
}
