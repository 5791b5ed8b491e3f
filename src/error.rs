// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use core::fmt;

/// A drawing error.
///
/// All errors surface synchronously at the entry point that triggered
/// them. A failed call leaves the surface and the clip mask untouched.
///
/// Degenerate geometry (zero radii, zero-length segments, fully clipped
/// spans, empty polygon lists) is never an error.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DrawError {
    /// Width or height is not a positive integer, a dimension exceeds
    /// 16384, or the total area exceeds 2^28 pixels.
    InvalidSurfaceDimensions,
    /// A matrix inverse was required, but the determinant magnitude
    /// is below 1e-10.
    NonInvertibleTransform,
    /// The operation needs a paint source that was not supplied.
    InvalidPaintSource,
    /// A draw primitive was invoked outside a `begin_op`/`end_op`
    /// bracket.
    MissingBeginOp,
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::InvalidSurfaceDimensions => {
                f.write_str("surface dimensions are out of range")
            }
            DrawError::NonInvertibleTransform => f.write_str("transform is not invertible"),
            DrawError::InvalidPaintSource => f.write_str("no valid paint source"),
            DrawError::MissingBeginOp => f.write_str("draw call outside begin_op/end_op"),
        }
    }
}

impl std::error::Error for DrawError {}
