// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Size;

use crate::element::{LayoutCx, Layoutable, Renderable};
use crate::{ElementId, UiError};

/// Hosts a single content element as its only child.
///
/// The content is the presenter's own `Content`, or, for a presenter bound
/// to an owner with [`bound_to`](Self::bound_to) and no local `Content`, the
/// owner's `Content`. Changing the content detaches the previous element
/// and attaches the new one on the next measure.
#[derive(Clone, Copy, Debug, Default)]
pub struct ContentPresenter {
    owner: Option<ElementId>,
    presented: Option<ElementId>,
}

impl ContentPresenter {
    /// Creates a presenter showing its own `Content`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a presenter showing the `Content` of `owner`, typically the
    /// control whose template created it.
    #[must_use]
    pub fn bound_to(owner: ElementId) -> Self {
        Self {
            owner: Some(owner),
            presented: None,
        }
    }

    /// Element currently attached as content.
    #[must_use]
    pub fn presented(&self) -> Option<ElementId> {
        self.presented
    }

    fn content(&self, cx: &LayoutCx<'_>) -> Result<Option<ElementId>, UiError> {
        let property = cx.props().content;
        let content = match self.owner {
            Some(owner) if !cx.ui().has_local_value(cx.id(), property)? => {
                cx.get_of(owner, property)?
            }
            _ => cx.get(property)?,
        };
        Ok(content.filter(|&c| cx.ui().is_alive(c)))
    }
}

impl Layoutable for ContentPresenter {
    fn measure_core(&mut self, cx: &mut LayoutCx<'_>, constraint: Size) -> Result<Size, UiError> {
        let content = self.content(cx)?;
        if content != self.presented {
            if let Some(old) = self.presented.take()
                && cx.ui().parent(old) == Some(cx.id())
            {
                cx.detach_child(old)?;
            }
            if let Some(new) = content
                && cx.ui().parent(new) != Some(cx.id())
            {
                cx.add_child(new)?;
            }
            self.presented = content;
        }
        match content {
            Some(child) => cx.measure_child(child, constraint),
            None => Ok(Size::ZERO),
        }
    }

    fn arrange_core(&mut self, cx: &mut LayoutCx<'_>, final_size: Size) -> Result<Size, UiError> {
        if let Some(child) = self.presented {
            cx.arrange_child(child, final_size.to_rect())?;
        }
        Ok(final_size)
    }
}

impl Renderable for ContentPresenter {}
