// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element capabilities and the contexts they run in.

use std::any::Any;

use kurbo::{Affine, Rect, Size};
use trellis_property::{Property, PropertyRegistry, PropertyValue};
use trellis_visual::{DrawCx, Renderer, VisualTree};

use crate::props::{Kinds, Props};
use crate::ui::{ElementNode, resolve};
use crate::{ElementId, Ui, UiError};

/// Sizing behaviour of an element.
///
/// The [`Ui`] wraps both calls with the framework rules (margin, explicit
/// size, min/max clamps, alignment); implementations only see the space
/// left for their content.
pub trait Layoutable {
    /// Returns the size the content wants within `constraint`.
    ///
    /// `constraint` is non-negative and may be infinite. Children must be
    /// measured through [`LayoutCx::measure_child`].
    fn measure_core(&mut self, cx: &mut LayoutCx<'_>, constraint: Size) -> Result<Size, UiError>;

    /// Positions the children inside `final_size` and returns the size used.
    fn arrange_core(&mut self, cx: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError>;
}

/// Drawing behaviour of an element.
pub trait Renderable {
    /// Draws the element in its local coordinate space.
    ///
    /// Children are drawn afterwards by the render walk.
    fn draw(&self, cx: &DrawCtx<'_>, renderer: &mut dyn Renderer) -> Result<(), UiError> {
        let _ = (cx, renderer);
        Ok(())
    }
}

/// Behaviour stored for every element: layout plus drawing.
pub trait Element: Layoutable + Renderable + Any {}

impl<T: Layoutable + Renderable + Any> Element for T {}

/// Access to the [`Ui`] during [`Layoutable`] calls.
pub struct LayoutCx<'a> {
    pub(crate) ui: &'a mut Ui,
    pub(crate) id: ElementId,
}

impl std::fmt::Debug for LayoutCx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutCx").field("id", &self.id).finish_non_exhaustive()
    }
}

impl LayoutCx<'_> {
    /// The element being laid out.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Built-in properties.
    #[must_use]
    pub fn props(&self) -> &Props {
        self.ui.props()
    }

    /// Built-in kinds.
    #[must_use]
    pub fn kinds(&self) -> &Kinds {
        self.ui.kinds()
    }

    /// Visual children of the element, in order.
    #[must_use]
    pub fn children(&self) -> Vec<ElementId> {
        self.ui.children(self.id)
    }

    /// Effective value of `property` on the element.
    pub fn get<T: PropertyValue>(&self, property: Property<T>) -> Result<T, UiError> {
        self.ui.get_value(self.id, property)
    }

    /// Effective value of `property` on another element, such as a child's
    /// attached property.
    pub fn get_of<T: PropertyValue>(
        &self,
        id: ElementId,
        property: Property<T>,
    ) -> Result<T, UiError> {
        self.ui.get_value(id, property)
    }

    /// Measures a child and returns its desired size.
    pub fn measure_child(&mut self, child: ElementId, available: Size) -> Result<Size, UiError> {
        self.ui.measure(child, available)
    }

    /// Arranges a child into `rect`, given in this element's coordinates.
    pub fn arrange_child(&mut self, child: ElementId, rect: Rect) -> Result<(), UiError> {
        self.ui.arrange(child, rect)
    }

    /// Desired size from the child's last measure.
    #[must_use]
    pub fn desired_size(&self, child: ElementId) -> Size {
        self.ui.desired_size(child).unwrap_or(Size::ZERO)
    }

    /// Appends a detached element as the last child without queueing a pass.
    pub fn add_child(&mut self, child: ElementId) -> Result<(), UiError> {
        self.ui.attach(self.id, child)
    }

    /// Detaches a child without queueing a pass.
    pub fn detach_child(&mut self, child: ElementId) -> Result<(), UiError> {
        self.ui.detach(self.id, child)
    }

    /// Destroys a child subtree without queueing a pass for this element.
    pub fn destroy_child(&mut self, child: ElementId) -> Result<(), UiError> {
        self.ui.destroy_quiet(child)
    }

    /// The whole [`Ui`], for work such as instantiating templates.
    pub fn ui_mut(&mut self) -> &mut Ui {
        self.ui
    }

    /// Shared access to the [`Ui`].
    #[must_use]
    pub fn ui(&self) -> &Ui {
        self.ui
    }
}

/// Read-only view handed to [`Renderable::draw`].
pub struct DrawCtx<'a> {
    pub(crate) tree: &'a VisualTree<ElementNode>,
    pub(crate) registry: &'a PropertyRegistry,
    pub(crate) props: &'a Props,
    pub(crate) id: ElementId,
    pub(crate) render_size: Size,
    pub(crate) walk: &'a DrawCx,
}

impl std::fmt::Debug for DrawCtx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawCtx")
            .field("id", &self.id)
            .field("render_size", &self.render_size)
            .field("walk", self.walk)
            .finish_non_exhaustive()
    }
}

impl DrawCtx<'_> {
    /// The element being drawn.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Built-in properties.
    #[must_use]
    pub fn props(&self) -> &Props {
        self.props
    }

    /// Effective value of `property` on the element.
    pub fn get<T: PropertyValue>(&self, property: Property<T>) -> Result<T, UiError> {
        resolve(self.tree, self.registry, self.id, property)
    }

    /// Size assigned by the last arrange.
    #[must_use]
    pub fn render_size(&self) -> Size {
        self.render_size
    }

    /// Local bounds: the render size at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.render_size.to_rect()
    }

    /// Transform from element to window coordinates.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.walk.transform()
    }

    /// Depth below the window root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.walk.depth()
    }
}
