// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::path::{Path, PathCommand};
use crate::Point;

/// A path command recorder.
#[derive(Clone, Default, Debug)]
pub struct PathBuilder {
    commands: Vec<PathCommand>,
    last_move_to: Point,
    last_point: Point,
    move_to_required: bool,
}

impl PathBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        PathBuilder {
            commands: Vec::new(),
            last_move_to: Point::zero(),
            last_point: Point::zero(),
            move_to_required: true,
        }
    }

    /// Creates a new builder with a specified command capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        PathBuilder {
            commands: Vec::with_capacity(capacity),
            last_move_to: Point::zero(),
            last_point: Point::zero(),
            move_to_required: true,
        }
    }

    /// Creates a new `Path` from a rectangle.
    pub fn from_rect(x: f32, y: f32, w: f32, h: f32) -> Path {
        let mut b = PathBuilder::new();
        b.push_rect(x, y, w, h);
        // A rect recording is never empty.
        b.finish().unwrap()
    }

    /// Returns the current number of commands in the builder.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Checks if the builder has any commands added.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns the last recorded point if any.
    pub fn last_point(&self) -> Option<Point> {
        if self.commands.is_empty() {
            None
        } else {
            Some(self.last_point)
        }
    }

    /// Adds the beginning of a contour.
    ///
    /// Multiple continuous MoveTo commands are not allowed.
    /// If the previous command was also MoveTo,
    /// it will be overwritten with the current one.
    pub fn move_to(&mut self, x: f32, y: f32) {
        let p = Point::from_xy(x, y);
        if let Some(PathCommand::MoveTo(last)) = self.commands.last_mut() {
            *last = p;
        } else {
            self.commands.push(PathCommand::MoveTo(p));
        }

        self.last_move_to = p;
        self.last_point = p;
        self.move_to_required = false;
    }

    fn inject_move_to_if_needed(&mut self) {
        if self.move_to_required {
            if self.commands.is_empty() {
                self.move_to(0.0, 0.0);
            } else {
                let p = self.last_move_to;
                self.move_to(p.x, p.y);
            }
        }
    }

    /// Adds a line from the last point.
    ///
    /// - If the path is empty - adds Move(0, 0) first.
    /// - If the path ends with Close - adds Move(last_move_x, last_move_y) first.
    pub fn line_to(&mut self, x: f32, y: f32) {
        self.inject_move_to_if_needed();

        let p = Point::from_xy(x, y);
        self.commands.push(PathCommand::LineTo(p));
        self.last_point = p;
    }

    /// Adds a quadratic curve from the last point to `x`, `y`.
    ///
    /// Move injection rules are the same as for [`line_to`](Self::line_to).
    pub fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.inject_move_to_if_needed();

        let p = Point::from_xy(x, y);
        self.commands
            .push(PathCommand::QuadTo(Point::from_xy(x1, y1), p));
        self.last_point = p;
    }

    /// Adds a cubic curve from the last point to `x`, `y`.
    ///
    /// Move injection rules are the same as for [`line_to`](Self::line_to).
    pub fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.inject_move_to_if_needed();

        let p = Point::from_xy(x, y);
        self.commands.push(PathCommand::CubicTo(
            Point::from_xy(x1, y1),
            Point::from_xy(x2, y2),
            p,
        ));
        self.last_point = p;
    }

    /// Adds a circular arc around `(cx, cy)` between the two angles (radians).
    ///
    /// The arc starts its own subpath when the path is empty; otherwise the
    /// flattener connects the current point to the arc start.
    pub fn arc(&mut self, cx: f32, cy: f32, radius: f32, start_angle: f32, end_angle: f32, ccw: bool) {
        self.commands.push(PathCommand::Arc {
            center: Point::from_xy(cx, cy),
            radius,
            start_angle,
            end_angle,
            ccw,
        });
        self.last_point = Point::from_xy(
            cx + radius * end_angle.cos(),
            cy + radius * end_angle.sin(),
        );
        self.move_to_required = false;
    }

    /// Adds an elliptical arc.
    ///
    /// `rotation` is the ellipse rotation in radians.
    pub fn ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
        ccw: bool,
    ) {
        self.commands.push(PathCommand::Ellipse {
            center: Point::from_xy(cx, cy),
            radii: Point::from_xy(rx, ry),
            rotation,
            start_angle,
            end_angle,
            ccw,
        });

        let (rot_sin, rot_cos) = rotation.sin_cos();
        let px = rx * end_angle.cos();
        let py = ry * end_angle.sin();
        self.last_point = Point::from_xy(
            cx + px * rot_cos - py * rot_sin,
            cy + px * rot_sin + py * rot_cos,
        );
        self.move_to_required = false;
    }

    /// Adds an arc tangent to the two lines current->(x1,y1) and (x1,y1)->(x2,y2).
    ///
    /// Degenerate inputs degrade to a line to `(x1, y1)`.
    pub fn arc_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, radius: f32) {
        self.inject_move_to_if_needed();

        self.commands.push(PathCommand::ArcTo {
            p1: Point::from_xy(x1, y1),
            p2: Point::from_xy(x2, y2),
            radius,
        });
        // The exact tangent point is resolved during flattening;
        // the corner point is good enough for move injection.
        self.last_point = Point::from_xy(x1, y1);
    }

    /// Adds a closed rectangle subpath.
    ///
    /// The current point is left at `(x, y)` and a following command
    /// starts a new subpath from there.
    pub fn push_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.commands.push(PathCommand::Rect { x, y, w, h });
        self.last_move_to = Point::from_xy(x, y);
        self.last_point = self.last_move_to;
        self.move_to_required = false;
    }

    /// Adds a closed rounded-rectangle subpath: four edge runs joined
    /// by clockwise quarter arcs.
    ///
    /// The radius is clamped to half the shorter side. Does nothing
    /// when `w` or `h` is not positive.
    pub fn push_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        use core::f32::consts::{FRAC_PI_2, PI};

        if !(w > 0.0) || !(h > 0.0) {
            return;
        }

        let r = radius.min(w * 0.5).min(h * 0.5);
        if !(r > 0.0) {
            self.push_rect(x, y, w, h);
            return;
        }

        self.move_to(x + r, y);
        self.line_to(x + w - r, y);
        self.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0, false);
        self.line_to(x + w, y + h - r);
        self.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2, false);
        self.line_to(x + r, y + h);
        self.arc(x + r, y + h - r, r, FRAC_PI_2, PI, false);
        self.line_to(x, y + r);
        self.arc(x + r, y + r, r, PI, PI + FRAC_PI_2, false);
        self.close();
    }

    /// Closes the current contour.
    ///
    /// A closed contour connects the first and the last points
    /// with a line, forming a continuous loop.
    ///
    /// Does nothing when the path is empty or already closed.
    pub fn close(&mut self) {
        if !self.commands.is_empty() {
            if self.commands.last() != Some(&PathCommand::Close) {
                self.commands.push(PathCommand::Close);
            }
        }

        self.last_point = self.last_move_to;
        self.move_to_required = true;
    }

    /// Resets the builder.
    ///
    /// Memory is not deallocated.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.last_move_to = Point::zero();
        self.last_point = Point::zero();
        self.move_to_required = true;
    }

    /// Finishes the builder and returns a `Path`.
    ///
    /// Returns `None` when the recording is empty.
    pub fn finish(self) -> Option<Path> {
        if self.commands.is_empty() {
            return None;
        }

        Some(Path {
            commands: self.commands,
        })
    }
}
