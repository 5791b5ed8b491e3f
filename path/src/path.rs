// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::Point;

/// A path drawing command.
///
/// A path is an ordered command sequence. Subpaths are delimited by
/// `MoveTo` and terminated by `Close` or the next `MoveTo`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum PathCommand {
    /// Begins a new subpath at the given point.
    MoveTo(Point),
    /// Adds a line from the current point.
    LineTo(Point),
    /// Adds a quadratic Bezier curve: control point, end point.
    QuadTo(Point, Point),
    /// Adds a cubic Bezier curve: two control points, end point.
    CubicTo(Point, Point, Point),
    /// Closes the current subpath with a line back to its start.
    Close,
    /// Adds a circular arc.
    Arc {
        /// Arc center.
        center: Point,
        /// Arc radius. Non-positive radii produce no geometry.
        radius: f32,
        /// Start angle in radians.
        start_angle: f32,
        /// End angle in radians.
        end_angle: f32,
        /// Sweep direction: counter-clockwise when true.
        ccw: bool,
    },
    /// Adds an elliptical arc.
    Ellipse {
        /// Ellipse center.
        center: Point,
        /// Per-axis radii. A non-positive radius produces no geometry.
        radii: Point,
        /// Ellipse rotation in radians.
        rotation: f32,
        /// Start angle in radians.
        start_angle: f32,
        /// End angle in radians.
        end_angle: f32,
        /// Sweep direction: counter-clockwise when true.
        ccw: bool,
    },
    /// Adds an arc tangent to the lines current->p1 and p1->p2.
    ArcTo {
        /// Shared corner point of both tangent lines.
        p1: Point,
        /// End point of the outgoing tangent line.
        p2: Point,
        /// Arc radius. Degenerate inputs degrade to `LineTo(p1)`.
        radius: f32,
    },
    /// Adds a closed rectangle subpath.
    ///
    /// Negative sizes are allowed and simply reverse the winding.
    Rect {
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        w: f32,
        /// Height.
        h: f32,
    },
}

/// A recorded path.
///
/// Use [`PathBuilder`](crate::PathBuilder) to create one.
/// Guaranteed to be non-empty.
#[derive(Clone, PartialEq, Debug)]
pub struct Path {
    pub(crate) commands: Vec<PathCommand>,
}

impl Path {
    /// Returns the recorded command list.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Returns the number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Checks if the path is empty. Always false.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
