// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer boundary and the depth-first render walk.

use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Vec2};
use peniko::Brush;

use crate::{NodeFlags, NodeId, VisualError, VisualTree};

/// Stroke description: a brush and a line thickness.
#[derive(Clone, Debug, PartialEq)]
pub struct Pen {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in local units.
    pub thickness: f64,
}

impl Pen {
    /// Creates a pen.
    pub fn new(brush: impl Into<Brush>, thickness: f64) -> Self {
        Self {
            brush: brush.into(),
            thickness,
        }
    }
}

/// Drawing backend driven by [`render_walk`].
///
/// Transforms form a stack: every [`push_transform`](Self::push_transform)
/// is matched by one [`pop`](Self::pop), and the pushed transform composes
/// with the current one.
pub trait Renderer {
    /// Starts a frame.
    fn begin_frame(&mut self);

    /// Pushes `transform`, composed with the current transform.
    fn push_transform(&mut self, transform: Affine);

    /// Restores the transform in effect before the matching push.
    fn pop(&mut self);

    /// Fills and/or strokes a rectangle.
    fn draw_rect(&mut self, rect: Rect, fill: Option<&Brush>, pen: Option<&Pen>);

    /// Fills and/or strokes a rounded rectangle with radii `radius_x`/`radius_y`.
    fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        radius_x: f64,
        radius_y: f64,
        fill: Option<&Brush>,
        pen: Option<&Pen>,
    );

    /// Strokes a line segment.
    fn draw_line(&mut self, p0: Point, p1: Point, pen: &Pen);

    /// Finishes a frame.
    fn end_frame(&mut self);
}

/// Context handed to the draw callback of [`render_walk`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCx {
    transform: Affine,
    depth: usize,
}

impl DrawCx {
    /// Accumulated transform from the walk root to the current node.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.transform
    }

    /// Depth of the current node below the walk root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Walks the subtree at `root` in pre-order and draws every visible node.
///
/// For each node the walk pushes a translation when the node's offset is
/// non-zero, calls `draw`, recurses into the children in order, and pops.
/// Nodes without [`NodeFlags::VISIBLE`] are skipped with their subtree.
/// The first error returned by `draw` stops the walk; the renderer's
/// transform stack is unwound before it is returned.
///
/// ```rust
/// use kurbo::{Affine, Rect, Vec2};
/// use trellis_visual::{DrawCommand, RecordingRenderer, Renderer, VisualError, VisualTree, render_walk};
///
/// let mut tree = VisualTree::new();
/// let root = tree.insert(Rect::new(0.0, 0.0, 10.0, 10.0));
/// let child = tree.insert(Rect::new(0.0, 0.0, 4.0, 4.0));
/// tree.add_child(root, child).unwrap();
/// tree.set_offset(child, Vec2::new(3.0, 2.0)).unwrap();
///
/// let mut renderer = RecordingRenderer::new();
/// render_walk(&tree, root, &mut renderer, |_, rect, _, r| {
///     r.draw_rect(*rect, None, None);
///     Ok::<_, VisualError>(())
/// })
/// .unwrap();
///
/// let transforms: Vec<Affine> = renderer.commands().iter().filter_map(DrawCommand::transform).collect();
/// assert_eq!(transforms, [Affine::IDENTITY, Affine::translate((3.0, 2.0))]);
/// ```
pub fn render_walk<T, R, E, F>(
    tree: &VisualTree<T>,
    root: NodeId,
    renderer: &mut R,
    mut draw: F,
) -> Result<(), E>
where
    R: Renderer + ?Sized,
    E: From<VisualError>,
    F: FnMut(NodeId, &T, &DrawCx, &mut R) -> Result<(), E>,
{
    if !tree.is_alive(root) {
        return Err(VisualError::StaleNode(root).into());
    }
    walk(tree, root, Affine::IDENTITY, 0, renderer, &mut draw)
}

fn walk<T, R, E, F>(
    tree: &VisualTree<T>,
    id: NodeId,
    parent_transform: Affine,
    depth: usize,
    renderer: &mut R,
    draw: &mut F,
) -> Result<(), E>
where
    R: Renderer + ?Sized,
    F: FnMut(NodeId, &T, &DrawCx, &mut R) -> Result<(), E>,
{
    let Some(payload) = tree.get(id) else {
        return Ok(());
    };
    if !tree.flags(id).contains(NodeFlags::VISIBLE) {
        return Ok(());
    }
    let offset = tree.offset(id);
    let pushed = offset != Vec2::ZERO;
    let transform = if pushed {
        let local = Affine::translate(offset);
        renderer.push_transform(local);
        parent_transform * local
    } else {
        parent_transform
    };
    let cx = DrawCx { transform, depth };
    let mut result = draw(id, payload, &cx, renderer);
    if result.is_ok() {
        for &child in tree.children(id) {
            result = walk(tree, child, transform, depth + 1, renderer, draw);
            if result.is_err() {
                break;
            }
        }
    }
    if pushed {
        renderer.pop();
    }
    result
}

/// A single recorded renderer call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// [`Renderer::begin_frame`].
    BeginFrame,
    /// [`Renderer::end_frame`].
    EndFrame,
    /// [`Renderer::push_transform`] with the pushed local transform.
    PushTransform(Affine),
    /// [`Renderer::pop`].
    Pop,
    /// [`Renderer::draw_rect`].
    Rect {
        /// Transform in effect when the call was made.
        transform: Affine,
        /// Local rectangle.
        rect: Rect,
        /// Fill brush.
        fill: Option<Brush>,
        /// Stroke.
        pen: Option<Pen>,
    },
    /// [`Renderer::draw_rounded_rect`].
    RoundedRect {
        /// Transform in effect when the call was made.
        transform: Affine,
        /// Local rectangle.
        rect: Rect,
        /// Horizontal corner radius.
        radius_x: f64,
        /// Vertical corner radius.
        radius_y: f64,
        /// Fill brush.
        fill: Option<Brush>,
        /// Stroke.
        pen: Option<Pen>,
    },
    /// [`Renderer::draw_line`].
    Line {
        /// Transform in effect when the call was made.
        transform: Affine,
        /// Start point.
        p0: Point,
        /// End point.
        p1: Point,
        /// Stroke.
        pen: Pen,
    },
}

impl DrawCommand {
    /// World transform of a drawing command; `None` for frame and stack commands.
    #[must_use]
    pub fn transform(&self) -> Option<Affine> {
        match self {
            Self::Rect { transform, .. }
            | Self::RoundedRect { transform, .. }
            | Self::Line { transform, .. } => Some(*transform),
            _ => None,
        }
    }
}

/// Renderer that records every call along with the world transform.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    commands: Vec<DrawCommand>,
    stack: Vec<Affine>,
    frames: usize,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands since creation or the last [`take`](Self::take).
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        core::mem::take(&mut self.commands)
    }

    /// Number of frames begun.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Current transform stack depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Transform currently in effect.
    #[must_use]
    pub fn current_transform(&self) -> Affine {
        self.stack.last().copied().unwrap_or(Affine::IDENTITY)
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self) {
        self.frames += 1;
        self.commands.push(DrawCommand::BeginFrame);
    }

    fn push_transform(&mut self, transform: Affine) {
        let combined = self.current_transform() * transform;
        self.stack.push(combined);
        self.commands.push(DrawCommand::PushTransform(transform));
    }

    fn pop(&mut self) {
        self.stack.pop();
        self.commands.push(DrawCommand::Pop);
    }

    fn draw_rect(&mut self, rect: Rect, fill: Option<&Brush>, pen: Option<&Pen>) {
        self.commands.push(DrawCommand::Rect {
            transform: self.current_transform(),
            rect,
            fill: fill.cloned(),
            pen: pen.cloned(),
        });
    }

    fn draw_rounded_rect(
        &mut self,
        rect: Rect,
        radius_x: f64,
        radius_y: f64,
        fill: Option<&Brush>,
        pen: Option<&Pen>,
    ) {
        self.commands.push(DrawCommand::RoundedRect {
            transform: self.current_transform(),
            rect,
            radius_x,
            radius_y,
            fill: fill.cloned(),
            pen: pen.cloned(),
        });
    }

    fn draw_line(&mut self, p0: Point, p1: Point, pen: &Pen) {
        self.commands.push(DrawCommand::Line {
            transform: self.current_transform(),
            p0,
            p1,
            pen: pen.clone(),
        });
    }

    fn end_frame(&mut self) {
        self.commands.push(DrawCommand::EndFrame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use peniko::Color;

    #[derive(Debug, PartialEq)]
    struct Failed;

    impl From<VisualError> for Failed {
        fn from(_: VisualError) -> Self {
            Self
        }
    }

    fn sample() -> (VisualTree<u8>, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = VisualTree::new();
        let root = tree.insert(0);
        let a = tree.insert(1);
        let a1 = tree.insert(2);
        let b = tree.insert(3);
        tree.add_child(root, a).unwrap();
        tree.add_child(a, a1).unwrap();
        tree.add_child(root, b).unwrap();
        tree.set_offset(a, Vec2::new(10.0, 0.0)).unwrap();
        tree.set_offset(a1, Vec2::new(0.0, 5.0)).unwrap();
        tree.set_offset(b, Vec2::new(0.0, 20.0)).unwrap();
        (tree, root, a, a1, b)
    }

    #[test]
    fn walk_visits_pre_order_with_world_transforms() {
        let (tree, root, ..) = sample();
        let mut seen = Vec::new();
        let mut renderer = RecordingRenderer::new();
        render_walk(&tree, root, &mut renderer, |_, payload, cx, _| {
            seen.push((*payload, cx.transform(), cx.depth()));
            Ok::<_, VisualError>(())
        })
        .unwrap();

        assert_eq!(
            seen,
            vec![
                (0, Affine::IDENTITY, 0),
                (1, Affine::translate((10.0, 0.0)), 1),
                (2, Affine::translate((10.0, 5.0)), 2),
                (3, Affine::translate((0.0, 20.0)), 1),
            ]
        );
        assert_eq!(renderer.depth(), 0);
    }

    #[test]
    fn sibling_transforms_do_not_leak() {
        let (tree, root, ..) = sample();
        let mut renderer = RecordingRenderer::new();
        let pen = Pen::new(Color::BLACK, 1.0);
        render_walk(&tree, root, &mut renderer, |_, _, _, r| {
            r.draw_line(Point::ZERO, Point::new(1.0, 0.0), &pen);
            Ok::<_, VisualError>(())
        })
        .unwrap();

        let transforms: Vec<Affine> = renderer
            .commands()
            .iter()
            .filter_map(DrawCommand::transform)
            .collect();
        assert_eq!(transforms[3], Affine::translate((0.0, 20.0)));
        let pushes = renderer
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::PushTransform(_)))
            .count();
        let pops = renderer
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Pop))
            .count();
        assert_eq!(pushes, 3);
        assert_eq!(pops, 3);
    }

    #[test]
    fn hidden_subtrees_are_skipped() {
        let (mut tree, root, a, ..) = sample();
        tree.set_flags(a, NodeFlags::empty()).unwrap();
        let mut seen = Vec::new();
        render_walk(&tree, root, &mut RecordingRenderer::new(), |_, payload, _, _| {
            seen.push(*payload);
            Ok::<_, VisualError>(())
        })
        .unwrap();
        assert_eq!(seen, vec![0, 3]);
    }

    #[test]
    fn errors_stop_the_walk_and_unwind() {
        let (tree, root, _, a1, _) = sample();
        let mut renderer = RecordingRenderer::new();
        let mut visited = 0;
        let result = render_walk(&tree, root, &mut renderer, |id, _, _, _| {
            visited += 1;
            if id == a1 { Err(Failed) } else { Ok(()) }
        });
        assert_eq!(result, Err(Failed));
        assert_eq!(visited, 3);
        assert_eq!(renderer.depth(), 0);
    }

    #[test]
    fn stale_root_is_an_error() {
        let (mut tree, _, _, _, b) = sample();
        tree.remove(b).unwrap();
        let result = render_walk(&tree, b, &mut RecordingRenderer::new(), |_, _, _, _| {
            Ok::<_, VisualError>(())
        });
        assert_eq!(result, Err(VisualError::StaleNode(b)));
    }
}
