// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;
use trellis_visual::{Pen, Renderer};

use crate::element::{DrawCtx, LayoutCx, Layoutable, Renderable};
use crate::UiError;

/// Leaf drawing `Fill` and `Stroke` over its bounds.
///
/// A rectangle has no content size: give it `Width`/`Height` or let its
/// slot stretch it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rectangle;

impl Layoutable for Rectangle {
    fn measure_core(&mut self, _: &mut LayoutCx<'_>, _: Size) -> Result<Size, UiError> {
        Ok(Size::ZERO)
    }

    fn arrange_core(&mut self, _: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        Ok(final_size)
    }
}

impl Renderable for Rectangle {
    fn draw(&self, cx: &DrawCtx<'_>, renderer: &mut dyn Renderer) -> Result<(), UiError> {
        let p = cx.props();
        let fill = cx.get(p.fill)?;
        let pen = match cx.get(p.stroke)? {
            Some(brush) => Some(Pen::new(brush, cx.get(p.stroke_thickness)?)),
            None => None,
        };
        if fill.is_some() || pen.is_some() {
            renderer.draw_rect(cx.bounds(), fill.as_ref(), pen.as_ref());
        }
        Ok(())
    }
}
