// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;
use trellis_visual::Renderer;

use crate::element::{DrawCtx, LayoutCx, Layoutable, Renderable};
use crate::UiError;

/// Panel that overlays all children in its full bounds.
///
/// Desired size is the largest desired size among the children.
#[derive(Clone, Copy, Debug, Default)]
pub struct Panel;

impl Layoutable for Panel {
    fn measure_core(&mut self, cx: &mut LayoutCx<'_>, constraint: Size) -> Result<Size, UiError> {
        let mut desired = Size::ZERO;
        for child in cx.children() {
            let size = cx.measure_child(child, constraint)?;
            desired.width = desired.width.max(size.width);
            desired.height = desired.height.max(size.height);
        }
        Ok(desired)
    }

    fn arrange_core(&mut self, cx: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        for child in cx.children() {
            cx.arrange_child(child, final_size.to_rect())?;
        }
        Ok(final_size)
    }
}

impl Renderable for Panel {
    fn draw(&self, cx: &DrawCtx<'_>, renderer: &mut dyn Renderer) -> Result<(), UiError> {
        draw_background(cx, renderer)
    }
}

/// Fills the element bounds with its `Background`, if any.
pub(crate) fn draw_background(
    cx: &DrawCtx<'_>,
    renderer: &mut dyn Renderer,
) -> Result<(), UiError> {
    if let Some(brush) = cx.get(cx.props().background)? {
        renderer.draw_rect(cx.bounds(), Some(&brush), None);
    }
    Ok(())
}
