// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use limner_path::Transform;

use crate::color::Color;

/// An externally evaluated paint, such as a gradient or a pattern.
///
/// The filler hands over device pixel coordinates and the transform the
/// geometry was rendered under; the server returns a non-premultiplied
/// color. Implementations typically invert the transform to get back
/// into paint space.
pub trait PaintServer {
    /// Evaluates the paint at a device pixel.
    fn evaluate(&self, x: f32, y: f32, transform: &Transform) -> Color;
}

/// A paint source.
///
/// The solid variant is detected eagerly so the opaque direct-rendering
/// path never makes a dynamic call in its inner loop.
#[derive(Copy, Clone)]
pub enum Paint<'a> {
    /// A solid color.
    Solid(Color),
    /// An external gradient evaluator.
    Gradient(&'a dyn PaintServer),
    /// An external pattern evaluator.
    Pattern(&'a dyn PaintServer),
}

impl<'a> Paint<'a> {
    /// Returns the color for a solid paint.
    #[inline]
    pub fn as_solid(&self) -> Option<Color> {
        match self {
            Paint::Solid(c) => Some(*c),
            _ => None,
        }
    }

    /// Checks that the paint is a solid color.
    #[inline]
    pub fn is_solid(&self) -> bool {
        matches!(self, Paint::Solid(_))
    }

    /// Evaluates the paint at a device pixel.
    #[inline]
    pub(crate) fn evaluate(&self, x: f32, y: f32, transform: &Transform) -> Color {
        match self {
            Paint::Solid(c) => *c,
            Paint::Gradient(server) | Paint::Pattern(server) => server.evaluate(x, y, transform),
        }
    }
}

impl core::fmt::Debug for Paint<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Paint::Solid(c) => f.debug_tuple("Solid").field(c).finish(),
            Paint::Gradient(_) => f.write_str("Gradient(..)"),
            Paint::Pattern(_) => f.write_str("Pattern(..)"),
        }
    }
}
