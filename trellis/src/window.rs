// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-level windows.

use kurbo::{Rect, Size};
use trellis_visual::render_walk;

use crate::element::DrawCtx;
use crate::elements::{ContentPresenter, Control};
use crate::platform::PresentationSource;
use crate::template::TemplateHandle;
use crate::{ElementId, Ui, UiError, WindowId};

pub(crate) struct WindowEntry {
    source: Box<dyn PresentationSource>,
    root: ElementId,
    shown: bool,
}

/// Default window template: a presenter showing the window's content.
fn window_template(ui: &mut Ui, owner: ElementId) -> Result<ElementId, UiError> {
    ui.create(ui.kinds.content_presenter, ContentPresenter::bound_to(owner))
}

impl Ui {
    /// Creates a hidden window whose root element shows `content`.
    ///
    /// `content` must be detached.
    pub fn create_window(&mut self, content: Option<ElementId>) -> Result<WindowId, UiError> {
        if let Some(content) = content {
            if self.parent(content).is_some() {
                return Err(trellis_visual::VisualError::AlreadyParented(content.0).into());
            }
            self.node(content)?;
        }
        let source = self.platform.create_presentation_source();
        let root = self.create(self.kinds.window, Control::new())?;
        let props = self.props;
        self.set_value(root, props.template, Some(TemplateHandle::new(window_template)))?;
        self.set_value(root, props.content, content)?;

        let id = WindowId(self.next_window);
        self.next_window += 1;
        self.node_mut(root)?.window = Some(id);
        self.windows.insert(
            id,
            WindowEntry {
                source,
                root,
                shown: false,
            },
        );
        tracing::debug!(?id, "window created");
        Ok(id)
    }

    fn window(&self, id: WindowId) -> Result<&WindowEntry, UiError> {
        self.windows.get(&id).ok_or(UiError::UnknownWindow(id))
    }

    fn window_mut(&mut self, id: WindowId) -> Result<&mut WindowEntry, UiError> {
        self.windows.get_mut(&id).ok_or(UiError::UnknownWindow(id))
    }

    /// Root element of a window.
    pub fn window_root(&self, id: WindowId) -> Result<ElementId, UiError> {
        Ok(self.window(id)?.root)
    }

    /// The native window behind `id`.
    pub fn presentation_source(&self, id: WindowId) -> Result<&dyn PresentationSource, UiError> {
        Ok(self.window(id)?.source.as_ref())
    }

    /// Mutable access to the native window behind `id`.
    pub fn presentation_source_mut(
        &mut self,
        id: WindowId,
    ) -> Result<&mut dyn PresentationSource, UiError> {
        Ok(self.window_mut(id)?.source.as_mut())
    }

    /// Shows the window and lays it out.
    pub fn show(&mut self, id: WindowId) -> Result<(), UiError> {
        let window = self.window_mut(id)?;
        window.source.show();
        window.shown = true;
        self.layout_window(id)
    }

    /// Hides the window. Hidden windows skip layout passes.
    pub fn hide(&mut self, id: WindowId) -> Result<(), UiError> {
        let window = self.window_mut(id)?;
        window.source.hide();
        window.shown = false;
        Ok(())
    }

    /// Returns `true` between [`show`](Self::show) and [`hide`](Self::hide).
    pub fn is_shown(&self, id: WindowId) -> Result<bool, UiError> {
        Ok(self.window(id)?.shown)
    }

    /// Outer bounds of the window.
    pub fn bounding_rect(&self, id: WindowId) -> Result<Rect, UiError> {
        Ok(self.window(id)?.source.bounding_rect())
    }

    /// Moves or resizes the window.
    ///
    /// The platform reports the resulting resize through
    /// [`notify_resized`](Self::notify_resized).
    pub fn set_bounding_rect(&mut self, id: WindowId, rect: Rect) -> Result<(), UiError> {
        self.window_mut(id)?.source.set_bounding_rect(rect);
        Ok(())
    }

    /// Size of the drawable area.
    pub fn client_size(&self, id: WindowId) -> Result<Size, UiError> {
        Ok(self.window(id)?.source.client_size())
    }

    /// Platform notification that the window changed size.
    pub fn notify_resized(&mut self, id: WindowId) -> Result<(), UiError> {
        self.layout_window(id)
    }

    /// Closes the window and destroys its elements.
    pub fn close(&mut self, id: WindowId) -> Result<(), UiError> {
        let mut window = self.windows.remove(&id).ok_or(UiError::UnknownWindow(id))?;
        window.source.close();
        if self.is_alive(window.root) {
            self.destroy_quiet(window.root)?;
        }
        tracing::debug!(?id, "window closed");
        Ok(())
    }

    /// Measures, arranges and draws a shown window at its client size.
    pub(crate) fn layout_window(&mut self, id: WindowId) -> Result<(), UiError> {
        let window = self.window(id)?;
        if !window.shown {
            return Ok(());
        }
        let root = window.root;
        let size = window.source.client_size();
        self.measure(root, size)?;
        self.arrange(root, size.to_rect())?;
        self.render(id)
    }

    /// Draws a window's element tree into its presentation source.
    pub fn render(&mut self, id: WindowId) -> Result<(), UiError> {
        let Self {
            windows,
            tree,
            registry,
            props,
            ..
        } = self;
        let (tree, registry, props) = (&*tree, &*registry, &*props);
        let window = windows.get_mut(&id).ok_or(UiError::UnknownWindow(id))?;
        let root = window.root;
        let renderer = window.source.renderer();
        renderer.begin_frame();
        let result = render_walk(tree, root.0, renderer, |node_id, node, walk, renderer| {
            let Some(behavior) = node.behavior.as_deref() else {
                return Ok(());
            };
            let cx = DrawCtx {
                tree,
                registry,
                props,
                id: ElementId(node_id),
                render_size: node.slot.render_size(),
                walk,
            };
            behavior.draw(&cx, renderer)
        });
        renderer.end_frame();
        result
    }
}
