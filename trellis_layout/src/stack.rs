// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack sizing: children placed one after another along an axis.

use kurbo::{Point, Rect, Size};

use crate::geometry::Orientation;
use crate::slot::sanitize;

/// Measures `count` children stacked along `orientation`.
///
/// Every child is measured with the full constraint. The result is the sum
/// of desired sizes along the stacking axis and their maximum across it.
pub fn measure<E, F>(
    orientation: Orientation,
    count: usize,
    constraint: Size,
    mut measure_child: F,
) -> Result<Size, E>
where
    F: FnMut(usize, Size) -> Result<Size, E>,
{
    let mut total = Size::ZERO;
    for index in 0..count {
        let desired = sanitize(measure_child(index, constraint)?);
        match orientation {
            Orientation::Vertical => {
                total.height += desired.height;
                total.width = total.width.max(desired.width);
            }
            Orientation::Horizontal => {
                total.width += desired.width;
                total.height = total.height.max(desired.height);
            }
        }
    }
    Ok(total)
}

/// Computes child rects for a stack arranged into `final_size`.
///
/// Each child gets its desired extent along the stacking axis and the full
/// final extent across it.
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use trellis_layout::{Orientation, stack};
///
/// let rects = stack::arrange(
///     Orientation::Vertical,
///     Size::new(100.0, 300.0),
///     [Size::new(40.0, 20.0), Size::new(60.0, 30.0)],
/// );
/// assert_eq!(rects, [Rect::new(0.0, 0.0, 100.0, 20.0), Rect::new(0.0, 20.0, 100.0, 50.0)]);
/// ```
pub fn arrange(
    orientation: Orientation,
    final_size: Size,
    desired: impl IntoIterator<Item = Size>,
) -> Vec<Rect> {
    let mut position = Point::ZERO;
    desired
        .into_iter()
        .map(|desired| {
            let size = match orientation {
                Orientation::Vertical => Size::new(final_size.width, desired.height),
                Orientation::Horizontal => Size::new(desired.width, final_size.height),
            };
            let rect = Rect::from_origin_size(position, size);
            match orientation {
                Orientation::Vertical => position.y += size.height,
                Orientation::Horizontal => position.x += size.width,
            }
            rect
        })
        .collect()
}
