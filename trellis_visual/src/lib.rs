// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Visual: the visual composition tree and its render walk.
//!
//! - [`VisualTree`] is an ordered tree of payloads addressed by generational
//!   [`NodeId`] handles. Each node carries a parent-local offset.
//! - [`render_walk`] visits a subtree in pre-order, pushing one translation per
//!   offset node onto a [`Renderer`] and popping it after the children.
//! - [`RecordingRenderer`] records the calls with their world transforms.
//!
//! The tree is agnostic to what the payload is; the `trellis` crate stores
//! element handles in it.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod error;
mod render;
mod tree;

pub use error::VisualError;
pub use render::{DrawCommand, DrawCx, Pen, RecordingRenderer, Renderer, render_walk};
pub use tree::{NodeFlags, NodeId, VisualTree};
