// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;
use trellis_layout::stack;
use trellis_visual::Renderer;

use crate::element::{DrawCtx, LayoutCx, Layoutable, Renderable};
use crate::elements::draw_background;
use crate::UiError;

/// Panel stacking its children along `Orientation`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StackPanel;

impl Layoutable for StackPanel {
    fn measure_core(&mut self, cx: &mut LayoutCx<'_>, constraint: Size) -> Result<Size, UiError> {
        let orientation = cx.get(cx.props().orientation)?;
        let children = cx.children();
        stack::measure(orientation, children.len(), constraint, |index, available| {
            cx.measure_child(children[index], available)
        })
    }

    fn arrange_core(&mut self, cx: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        let orientation = cx.get(cx.props().orientation)?;
        let children = cx.children();
        let desired: Vec<Size> = children.iter().map(|&c| cx.desired_size(c)).collect();
        for (child, rect) in children
            .into_iter()
            .zip(stack::arrange(orientation, final_size, desired))
        {
            cx.arrange_child(child, rect)?;
        }
        Ok(final_size)
    }
}

impl Renderable for StackPanel {
    fn draw(&self, cx: &DrawCtx<'_>, renderer: &mut dyn Renderer) -> Result<(), UiError> {
        draw_background(cx, renderer)
    }
}
