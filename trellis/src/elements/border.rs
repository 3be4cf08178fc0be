// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Insets, Point, Rect, Size};
use trellis_layout::geometry::{deflate, inflate};
use trellis_visual::{Pen, Renderer};

use crate::element::{DrawCtx, LayoutCx, Layoutable, Renderable};
use crate::UiError;

/// Decorator drawing a background and a border around its first child.
///
/// The child is inset by `BorderThickness` plus `Padding`. The border
/// stroke uses the left thickness for all sides.
#[derive(Clone, Copy, Debug, Default)]
pub struct Border;

fn chrome(cx: &LayoutCx<'_>) -> Result<Insets, UiError> {
    let p = cx.props();
    let thickness = cx.get(p.border_thickness)?;
    let padding = cx.get(p.padding)?;
    Ok(Insets::new(
        thickness.x0 + padding.x0,
        thickness.y0 + padding.y0,
        thickness.x1 + padding.x1,
        thickness.y1 + padding.y1,
    ))
}

impl Layoutable for Border {
    fn measure_core(&mut self, cx: &mut LayoutCx<'_>, constraint: Size) -> Result<Size, UiError> {
        let chrome = chrome(cx)?;
        let content = match cx.children().first() {
            Some(&child) => cx.measure_child(child, deflate(constraint, chrome))?,
            None => Size::ZERO,
        };
        Ok(inflate(content, chrome))
    }

    fn arrange_core(&mut self, cx: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        let chrome = chrome(cx)?;
        if let Some(&child) = cx.children().first() {
            let rect = Rect::from_origin_size(
                Point::new(chrome.x0, chrome.y0),
                deflate(final_size, chrome),
            );
            cx.arrange_child(child, rect)?;
        }
        Ok(final_size)
    }
}

impl Renderable for Border {
    fn draw(&self, cx: &DrawCtx<'_>, renderer: &mut dyn Renderer) -> Result<(), UiError> {
        let p = cx.props();
        let fill = cx.get(p.background)?;
        let thickness = cx.get(p.border_thickness)?.x0;
        let pen = match cx.get(p.border_brush)? {
            Some(brush) if thickness > 0.0 => Some(Pen::new(brush, thickness)),
            _ => None,
        };
        if fill.is_none() && pen.is_none() {
            return Ok(());
        }
        let radius = cx.get(p.corner_radius)?;
        if radius > 0.0 {
            renderer.draw_rounded_rect(cx.bounds(), radius, radius, fill.as_ref(), pen.as_ref());
        } else {
            renderer.draw_rect(cx.bounds(), fill.as_ref(), pen.as_ref());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Insets, Rect, Size};

    use super::Border;
    use crate::UiBuilder;
    use crate::elements::Rectangle;

    #[test]
    fn child_is_inset_by_thickness_and_padding() {
        let mut ui = UiBuilder::new().build().unwrap();
        let p = *ui.props();
        let border = ui.create(ui.kinds().border, Border).unwrap();
        let child = ui.create(ui.kinds().rectangle, Rectangle).unwrap();
        ui.add_child(border, child).unwrap();
        ui.set_value(border, p.border_thickness, Insets::uniform(2.0)).unwrap();
        ui.set_value(border, p.padding, Insets::new(3.0, 0.0, 3.0, 0.0)).unwrap();
        ui.set_value(child, p.width, Some(10.0)).unwrap();
        ui.set_value(child, p.height, Some(10.0)).unwrap();

        let desired = ui.measure(border, Size::new(100.0, 100.0)).unwrap();
        assert_eq!(desired, Size::new(20.0, 14.0));

        ui.arrange(border, Rect::new(0.0, 0.0, 40.0, 30.0)).unwrap();
        assert_eq!(
            ui.final_rect(child).unwrap(),
            Some(Rect::new(5.0, 2.0, 35.0, 28.0))
        );
    }
}
