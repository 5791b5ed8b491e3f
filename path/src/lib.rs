// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/*!
A [limner](https://github.com/RazrFalcon/limner) path implementation.

Provides a path command recorder, a deterministic curve flattener,
a line dasher and a polygon-emitting stroke generator.

All types use single precision floats (`f32`).
*/

#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![allow(clippy::approx_constant)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::float_cmp)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::wrong_self_convention)]

mod dash;
mod flatten;
mod floating_point;
mod path;
mod path_builder;
mod scalar;
mod stroker;
mod transform;

pub use dash::StrokeDash;
pub use flatten::{flatten, Polygon, FLATTEN_TOLERANCE};
pub use floating_point::*;
pub use path::{Path, PathCommand};
pub use path_builder::PathBuilder;
pub use scalar::*;
pub use stroker::{stroke_polygons, LineCap, LineJoin, Stroke};
pub use transform::Transform;

/// A point.
///
/// Doesn't guarantee to be finite.
#[allow(missing_docs)]
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<(f32, f32)> for Point {
    #[inline]
    fn from(v: (f32, f32)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl Point {
    /// Creates a new `Point`.
    #[inline]
    pub fn from_xy(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Creates a point at 0x0 position.
    #[inline]
    pub fn zero() -> Self {
        Point { x: 0.0, y: 0.0 }
    }

    /// Returns true if x and y are both zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Returns true if both x and y are measurable values.
    ///
    /// Both values are other than infinities and NaN.
    pub fn is_finite(&self) -> bool {
        (self.x * self.y).is_finite()
    }

    /// Returns the Euclidean distance from origin.
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Returns the Euclidean distance to `other`.
    pub fn distance(&self, other: Point) -> f32 {
        (*self - other).length()
    }

    /// Returns the dot product of two points.
    pub fn dot(&self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Returns the cross product of two vectors.
    ///
    /// Both vectors are three-dimensional with a zero z-axis value;
    /// the returned value is the z-axis component of their cross product.
    pub fn cross(&self, other: Point) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Scales the point in-place.
    pub fn scale(&mut self, scale: f32) {
        self.x *= scale;
        self.y *= scale;
    }

    /// Returns a copy of the point scaled by `scale`.
    pub fn scaled(&self, scale: f32) -> Self {
        Point::from_xy(self.x * scale, self.y * scale)
    }

    /// Returns the vector rotated by 90 degrees counter-clockwise
    /// (in a Y-up coordinate system).
    pub fn left_normal(&self) -> Self {
        Point::from_xy(-self.y, self.x)
    }

    /// Scales the vector so that `length()` returns one,
    /// while preserving the ratio of x to y.
    ///
    /// If the prior length is shorter than 1e-10, sets the vector to (0, 0)
    /// and returns false; otherwise returns true.
    pub fn normalize(&mut self) -> bool {
        let mag = self.length();
        if !mag.is_finite() || mag < 1e-10 {
            *self = Point::zero();
            return false;
        }

        let inv = 1.0 / mag;
        self.x *= inv;
        self.y *= inv;
        true
    }

    /// Returns a normalized copy, or `None` when the length
    /// is shorter than 1e-10.
    pub fn normalized(&self) -> Option<Point> {
        let mut p = *self;
        if p.normalize() {
            Some(p)
        } else {
            None
        }
    }
}

impl core::ops::Neg for Point {
    type Output = Point;

    fn neg(self) -> Self::Output {
        Point {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl core::ops::Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Self::Output {
        Point::from_xy(self.x + other.x, self.y + other.y)
    }
}

impl core::ops::AddAssign for Point {
    fn add_assign(&mut self, other: Point) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl core::ops::Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Self::Output {
        Point::from_xy(self.x - other.x, self.y - other.y)
    }
}

impl core::ops::SubAssign for Point {
    fn sub_assign(&mut self, other: Point) {
        self.x -= other.x;
        self.y -= other.y;
    }
}
