// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout error types.

/// Errors raised while validating grid track definitions.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum GridError {
    /// Star weights must be finite and strictly positive.
    #[error("invalid star weight {0}")]
    InvalidStarWeight(f64),
    /// Pixel lengths must be finite and non-negative.
    #[error("invalid pixel length {0}")]
    InvalidPixelLength(f64),
    /// Track bounds must satisfy `0 <= min <= max`.
    #[error("invalid track bounds: min {min}, max {max}")]
    InvalidBounds {
        /// Requested minimum.
        min: f64,
        /// Requested maximum.
        max: f64,
    },
}

/// Errors raised by measure and arrange.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// A measure constraint was negative or NaN, or an arrange rect was
    /// negative, NaN or infinite.
    #[error("invalid layout constraint {width}x{height}")]
    InvalidConstraint {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },
    /// A grid definition was rejected.
    #[error(transparent)]
    Grid(#[from] GridError),
}
