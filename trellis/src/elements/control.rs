// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;
use trellis_visual::Renderer;

use crate::element::{DrawCtx, LayoutCx, Layoutable, Renderable};
use crate::elements::draw_background;
use crate::template::TemplateHandle;
use crate::{ElementId, UiError};

/// Element whose visual children come from its `Template`.
///
/// The template is applied lazily on measure: the first time, and whenever
/// the `Template` value has changed since the last application. Re-applying
/// destroys the previous template tree after detaching the control's
/// `Content` from it, so the content survives.
#[derive(Debug, Default)]
pub struct Control {
    applied: Option<TemplateHandle>,
    root: Option<ElementId>,
    content: Option<ElementId>,
}

impl Control {
    /// Creates a control behaviour with no template applied yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Root of the applied template tree.
    #[must_use]
    pub fn template_root(&self) -> Option<ElementId> {
        self.root
    }

    fn apply_template(
        &mut self,
        cx: &mut LayoutCx<'_>,
        template: Option<TemplateHandle>,
    ) -> Result<(), UiError> {
        let owner = cx.id();
        if let Some(old) = self.root.take()
            && cx.ui().is_alive(old)
        {
            if let Some(content) = self.content
                && let Some(parent) = cx.ui().parent(content)
                && parent != owner
            {
                cx.ui_mut().detach(parent, content)?;
            }
            cx.destroy_child(old)?;
        }
        self.applied = template.clone();

        let Some(template) = template else {
            return Ok(());
        };
        let root = template.create_visual_tree(cx.ui_mut(), owner)?;
        if root == owner || cx.ui().parent(root).is_some() {
            return Err(UiError::Template {
                owner,
                reason: "template root must be a detached element".into(),
            });
        }
        cx.add_child(root)?;
        self.root = Some(root);
        tracing::debug!(?owner, ?root, "template applied");
        Ok(())
    }
}

impl Layoutable for Control {
    fn measure_core(&mut self, cx: &mut LayoutCx<'_>, constraint: Size) -> Result<Size, UiError> {
        let p = *cx.props();
        let template = cx.get(p.template)?;
        if template != self.applied {
            self.apply_template(cx, template)?;
        }
        let content = cx.get(p.content)?;
        if content != self.content {
            self.content = content;
            if let Some(root) = self.root {
                cx.ui.dirty_subtree(root);
            }
        }
        match self.root {
            Some(root) => cx.measure_child(root, constraint),
            None => Ok(Size::ZERO),
        }
    }

    fn arrange_core(&mut self, cx: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        if let Some(root) = self.root {
            cx.arrange_child(root, final_size.to_rect())?;
        }
        Ok(final_size)
    }
}

impl Renderable for Control {
    fn draw(&self, cx: &DrawCtx<'_>, renderer: &mut dyn Renderer) -> Result<(), UiError> {
        draw_background(cx, renderer)
    }
}
