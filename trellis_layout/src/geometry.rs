// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small geometry helpers shared by the solvers and the framework.

use kurbo::{Insets, Point, Rect, Size};

/// Placement of an element inside a larger slot along one axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Fill the slot.
    #[default]
    Stretch,
    /// Align to the left or top edge.
    Start,
    /// Center inside the slot.
    Center,
    /// Align to the right or bottom edge.
    End,
}

impl Alignment {
    /// Returns the offset and extent of an item of `extent` inside `available`.
    ///
    /// Stretch fills the slot but never shrinks below the item.
    #[must_use]
    pub fn place(self, available: f64, extent: f64) -> (f64, f64) {
        match self {
            Self::Stretch => (0.0, available.max(extent)),
            Self::Start => (0.0, extent),
            Self::Center => ((available - extent) / 2.0, extent),
            Self::End => (available - extent, extent),
        }
    }
}

/// Stacking direction of a stack panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Children are stacked top to bottom.
    #[default]
    Vertical,
    /// Children are stacked left to right.
    Horizontal,
}

/// Shrinks `size` by `insets`, flooring at zero.
#[must_use]
pub fn deflate(size: Size, insets: Insets) -> Size {
    Size::new(
        (size.width - insets.x_value()).max(0.0),
        (size.height - insets.y_value()).max(0.0),
    )
}

/// Grows `size` by `insets`.
#[must_use]
pub fn inflate(size: Size, insets: Insets) -> Size {
    Size::new(size.width + insets.x_value(), size.height + insets.y_value())
}

/// Clamps each component of `size` into `[min, max]`; `max` wins over `min`.
#[must_use]
pub fn clamp_size(size: Size, min: Size, max: Size) -> Size {
    Size::new(
        size.width.max(min.width).min(max.width),
        size.height.max(min.height).min(max.height),
    )
}

/// Places a rect of `size` inside `slot` with the given alignments.
#[must_use]
pub fn align_in(slot: Rect, size: Size, horizontal: Alignment, vertical: Alignment) -> Rect {
    let (x, width) = horizontal.place(slot.width(), size.width);
    let (y, height) = vertical.place(slot.height(), size.height);
    Rect::from_origin_size(Point::new(slot.x0 + x, slot.y0 + y), Size::new(width, height))
}

/// Rounds a rect's origin and size to whole units.
#[must_use]
pub fn round_rect(rect: Rect) -> Rect {
    let origin = Point::new(rect.x0.round(), rect.y0.round());
    let size = Size::new(rect.width().round(), rect.height().round());
    Rect::from_origin_size(origin, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_places_items() {
        assert_eq!(Alignment::Stretch.place(100.0, 20.0), (0.0, 100.0));
        assert_eq!(Alignment::Start.place(100.0, 20.0), (0.0, 20.0));
        assert_eq!(Alignment::Center.place(100.0, 20.0), (40.0, 20.0));
        assert_eq!(Alignment::End.place(100.0, 20.0), (80.0, 20.0));
    }

    #[test]
    fn deflate_floors_at_zero() {
        let insets = Insets::uniform(10.0);
        assert_eq!(deflate(Size::new(50.0, 15.0), insets), Size::new(30.0, 0.0));
        assert_eq!(inflate(Size::new(30.0, 0.0), insets), Size::new(50.0, 20.0));
    }

    #[test]
    fn clamp_prefers_max() {
        let clamped = clamp_size(
            Size::new(5.0, 500.0),
            Size::new(10.0, 50.0),
            Size::new(8.0, 100.0),
        );
        assert_eq!(clamped, Size::new(8.0, 100.0));
    }

    #[test]
    fn align_in_offsets_by_slot_origin() {
        let slot = Rect::new(10.0, 20.0, 110.0, 70.0);
        let placed = align_in(slot, Size::new(20.0, 10.0), Alignment::End, Alignment::Center);
        assert_eq!(placed, Rect::new(90.0, 40.0, 110.0, 50.0));
    }

    #[test]
    fn rounding_snaps_to_whole_units() {
        let rect = round_rect(Rect::new(0.4, 1.6, 10.7, 5.2));
        assert_eq!(rect, Rect::new(0.0, 2.0, 10.0, 6.0));
    }
}
