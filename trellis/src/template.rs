// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control templates.

use std::fmt;
use std::rc::Rc;

use crate::{ElementId, Ui, UiError};

/// Builds the visual children of a templated control.
///
/// A [`Control`](crate::elements::Control) applies its template on its first
/// measure, and again after the `Template` property changes. The returned
/// element becomes the control's only visual child.
pub trait Template {
    /// Creates a detached element tree for `owner` and returns its root.
    fn create_visual_tree(&self, ui: &mut Ui, owner: ElementId) -> Result<ElementId, UiError>;
}

impl<F> Template for F
where
    F: Fn(&mut Ui, ElementId) -> Result<ElementId, UiError>,
{
    fn create_visual_tree(&self, ui: &mut Ui, owner: ElementId) -> Result<ElementId, UiError> {
        self(ui, owner)
    }
}

/// Shared, comparable reference to a [`Template`], storable in a property.
///
/// Two handles are equal when they point at the same template instance.
#[derive(Clone)]
pub struct TemplateHandle(Rc<dyn Template>);

impl TemplateHandle {
    /// Wraps a template.
    pub fn new(template: impl Template + 'static) -> Self {
        Self(Rc::new(template))
    }

    /// Builds the visual tree for `owner`.
    pub fn create_visual_tree(&self, ui: &mut Ui, owner: ElementId) -> Result<ElementId, UiError> {
        self.0.create_visual_tree(ui, owner)
    }
}

impl PartialEq for TemplateHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for TemplateHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TemplateHandle")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}
