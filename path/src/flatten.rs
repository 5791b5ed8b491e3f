// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use core::f32::consts::{FRAC_PI_2, PI};

use arrayref::array_ref;

use crate::path::{Path, PathCommand};
use crate::scalar::Scalar;
use crate::Point;

/// The fixed geometric tolerance used for curve and arc flattening,
/// in path-space units.
pub const FLATTEN_TOLERANCE: f32 = 0.25;

/// The stricter tolerance for tangent arcs, which show corners
/// more readily than free-standing arcs.
const ARC_TO_TOLERANCE: f32 = 0.1;

/// Maximum distance between the current point and an arc start
/// that is still treated as "connected". Beyond it a bridging
/// line is inserted.
const BRIDGE_THRESHOLD: f32 = 0.01;

/// Safety counter: a single curve never emits more vertices than this.
const CURVE_POINT_LIMIT: i32 = 1000;

/// Emission cap for arcs whose radii are far beyond any surface size.
const ARC_SEGMENT_LIMIT: usize = 4096;

/// A flattened subpath: an ordered vertex list.
///
/// Winding is derived from vertex order. Fill inputs treat the vertex
/// list as cyclic; open stroke inputs do not.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct Polygon {
    /// The vertices.
    pub points: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from a vertex list.
    pub fn from_points(points: Vec<Point>) -> Self {
        Polygon { points }
    }

    /// Returns the number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Checks if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Checks that the first and last vertices are within 1e-10
    /// of each other.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => {
                first.distance(*last) <= 1e-10
            }
            _ => false,
        }
    }
}

/// Converts a command sequence into a list of polygons.
///
/// Curves are subdivided down to [`FLATTEN_TOLERANCE`]. Degenerate
/// commands (zero radii, zero-length legs) produce no geometry and
/// are not errors. An empty result is valid.
pub fn flatten(path: &Path) -> Vec<Polygon> {
    let mut f = Flattener::default();
    for cmd in path.commands() {
        f.apply(*cmd);
    }
    f.finish()
}

#[derive(Default)]
struct Flattener {
    polygons: Vec<Polygon>,
    current: Vec<Point>,
    subpath_start: Point,
    last: Point,
}

impl Flattener {
    fn apply(&mut self, cmd: PathCommand) {
        match cmd {
            PathCommand::MoveTo(p) => self.move_to(p),
            PathCommand::LineTo(p) => self.line_to(p),
            PathCommand::QuadTo(cp, p) => self.quad_to(cp, p),
            PathCommand::CubicTo(cp1, cp2, p) => self.cubic_to(cp1, cp2, p),
            PathCommand::Close => self.close(),
            PathCommand::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                ccw,
            } => self.arc(center, radius, start_angle, end_angle, ccw),
            PathCommand::Ellipse {
                center,
                radii,
                rotation,
                start_angle,
                end_angle,
                ccw,
            } => self.ellipse(center, radii, rotation, start_angle, end_angle, ccw),
            PathCommand::ArcTo { p1, p2, radius } => self.arc_to(p1, p2, radius),
            PathCommand::Rect { x, y, w, h } => self.rect(x, y, w, h),
        }
    }

    fn finish(mut self) -> Vec<Polygon> {
        self.finish_current(true);
        self.polygons
    }

    // A single-vertex polygon is kept only when the path ends here;
    // mid-path it is just a skipped degenerate subpath.
    fn finish_current(&mut self, at_end: bool) {
        let min_len = if at_end { 1 } else { 2 };
        if self.current.len() >= min_len {
            let points = core::mem::take(&mut self.current);
            self.polygons.push(Polygon::from_points(points));
        } else {
            self.current.clear();
        }
    }

    // Guarantees the in-progress polygon carries its first vertex
    // before a segment endpoint is appended. Covers subpaths opened
    // implicitly after a Rect command.
    fn ensure_started(&mut self) {
        if self.current.is_empty() {
            self.subpath_start = self.last;
            self.current.push(self.last);
        }
    }

    fn push_point(&mut self, p: Point) {
        self.current.push(p);
        self.last = p;
    }

    fn move_to(&mut self, p: Point) {
        self.finish_current(false);
        self.subpath_start = p;
        self.last = p;
        self.current.push(p);
    }

    fn line_to(&mut self, p: Point) {
        self.ensure_started();
        self.push_point(p);
    }

    fn close(&mut self) {
        if !self.current.is_empty() {
            if self.last != self.subpath_start {
                self.current.push(self.subpath_start);
            }
            self.finish_current(false);
        }

        self.last = self.subpath_start;
    }

    fn quad_to(&mut self, cp: Point, p: Point) {
        self.ensure_started();
        let points = [self.last, cp, p];
        let mut limit = CURVE_POINT_LIMIT;
        self.flatten_quad(&points, &mut limit);
    }

    fn cubic_to(&mut self, cp1: Point, cp2: Point, p: Point) {
        self.ensure_started();
        let points = [self.last, cp1, cp2, p];
        let mut limit = CURVE_POINT_LIMIT;
        self.flatten_cubic(&points, &mut limit);
    }

    fn flatten_quad(&mut self, points: &[Point; 3], limit: &mut i32) {
        if *limit <= 0 {
            self.push_point(points[2]);
            return;
        }

        let flat = match chord_distance(points[0], points[2], points[1]) {
            Some(d) => d <= FLATTEN_TOLERANCE,
            None => true, // zero-length chord is terminal
        };

        if flat {
            *limit -= 1;
            self.push_point(points[2]);
        } else {
            let mut tmp = [Point::zero(); 5];
            chop_quad_at_half(points, &mut tmp);
            self.flatten_quad(array_ref![tmp, 0, 3], limit);
            self.flatten_quad(array_ref![tmp, 2, 3], limit);
        }
    }

    fn flatten_cubic(&mut self, points: &[Point; 4], limit: &mut i32) {
        if *limit <= 0 {
            self.push_point(points[3]);
            return;
        }

        let d1 = chord_distance(points[0], points[3], points[1]);
        let d2 = chord_distance(points[0], points[3], points[2]);
        let flat = match (d1, d2) {
            (Some(d1), Some(d2)) => d1 + d2 <= FLATTEN_TOLERANCE,
            _ => true,
        };

        if flat {
            *limit -= 1;
            self.push_point(points[3]);
        } else {
            let mut tmp = [Point::zero(); 7];
            chop_cubic_at_half(points, &mut tmp);
            self.flatten_cubic(array_ref![tmp, 0, 4], limit);
            self.flatten_cubic(array_ref![tmp, 3, 4], limit);
        }
    }

    // Connects the running subpath to an arc start point. The start
    // becomes the subpath start when the arc opens the subpath;
    // otherwise a bridging line is inserted unless the current point
    // is already within BRIDGE_THRESHOLD of it.
    fn begin_arc(&mut self, start: Point) {
        if self.current.is_empty() {
            self.subpath_start = start;
            self.current.push(start);
        } else if self.last.distance(start) > BRIDGE_THRESHOLD {
            self.current.push(start);
        }

        self.last = start;
    }

    fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32, ccw: bool) {
        if !(radius > 0.0) {
            return;
        }

        let (start, sweep) = normalize_sweep(start_angle, end_angle, ccw);
        let segments = arc_segment_count(sweep.abs(), radius, FLATTEN_TOLERANCE);

        self.begin_arc(arc_point(center, radius, start));
        for i in 1..=segments {
            let angle = start + sweep * (i as f32 / segments as f32);
            self.push_point(arc_point(center, radius, angle));
        }
    }

    fn ellipse(
        &mut self,
        center: Point,
        radii: Point,
        rotation: f32,
        start_angle: f32,
        end_angle: f32,
        ccw: bool,
    ) {
        if !(radii.x > 0.0) || !(radii.y > 0.0) {
            return;
        }

        let (start, sweep) = normalize_sweep(start_angle, end_angle, ccw);
        let segments = arc_segment_count(sweep.abs(), radii.x.min(radii.y), FLATTEN_TOLERANCE);
        let (rot_sin, rot_cos) = rotation.sin_cos();
        let eval = |angle: f32| {
            let px = radii.x * angle.cos();
            let py = radii.y * angle.sin();
            Point::from_xy(
                center.x + px * rot_cos - py * rot_sin,
                center.y + px * rot_sin + py * rot_cos,
            )
        };

        self.begin_arc(eval(start));
        for i in 1..=segments {
            self.push_point(eval(start + sweep * (i as f32 / segments as f32)));
        }
    }

    fn arc_to(&mut self, p1: Point, p2: Point, radius: f32) {
        let p0 = self.last;

        if self.current.is_empty() || !(radius > 0.0) {
            self.line_to(p1);
            return;
        }

        let (u1, u2) = match ((p0 - p1).normalized(), (p2 - p1).normalized()) {
            (Some(u1), Some(u2)) => (u1, u2),
            _ => {
                self.line_to(p1);
                return;
            }
        };

        let cross = u1.cross(u2);
        if cross.abs() < 1e-10 {
            // collinear corner
            self.line_to(p1);
            return;
        }

        let turn = u1.dot(u2).bound(-1.0, 1.0).acos();
        let tangent_offset = radius / (turn.half()).tan();
        let t1 = p1 + u1.scaled(tangent_offset);
        let t2 = p1 + u2.scaled(tangent_offset);

        let side = if cross > 0.0 { 1.0 } else { -1.0 };
        let center = t1 + u1.left_normal().scaled(side * radius);

        let a0 = (t1.y - center.y).atan2(t1.x - center.x);
        let a1 = (t2.y - center.y).atan2(t2.x - center.x);
        let (start, sweep) = normalize_sweep(a0, a1, cross > 0.0);

        let tolerance = ARC_TO_TOLERANCE.min(FLATTEN_TOLERANCE);
        let from_tolerance = arc_segment_count(sweep.abs(), radius, tolerance);
        let floor = (sweep.abs() / FRAC_PI_2 * 16.0).ceil() as usize;
        let segments = from_tolerance.max(floor).max(1);

        self.begin_arc(t1);
        for i in 1..=segments {
            let angle = start + sweep * (i as f32 / segments as f32);
            self.push_point(arc_point(center, radius, angle));
        }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.finish_current(false);

        self.polygons.push(Polygon::from_points(vec![
            Point::from_xy(x, y),
            Point::from_xy(x + w, y),
            Point::from_xy(x + w, y + h),
            Point::from_xy(x, y + h),
        ]));

        // A rect closes itself and reopens a subpath at its origin.
        self.subpath_start = Point::from_xy(x, y);
        self.last = self.subpath_start;
    }
}

fn arc_point(center: Point, radius: f32, angle: f32) -> Point {
    Point::from_xy(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

// Shifts one of the angles by a full turn so the sweep runs in the
// requested direction. Returns the start angle and the signed sweep.
fn normalize_sweep(start_angle: f32, end_angle: f32, ccw: bool) -> (f32, f32) {
    let mut start = start_angle;
    let mut end = end_angle;
    if !ccw && end < start {
        end += 2.0 * PI;
    }
    if ccw && start < end {
        start += 2.0 * PI;
    }

    (start, end - start)
}

fn arc_segment_count(sweep: f32, radius: f32, tolerance: f32) -> usize {
    let cos_half = (1.0 - tolerance / radius).max(0.0);
    let step = 2.0 * cos_half.acos();
    if !step.is_finite() || step < 1e-6 {
        return ARC_SEGMENT_LIMIT;
    }

    let count = (sweep / step).ceil();
    if count.is_finite() && count >= 1.0 {
        (count as usize).min(ARC_SEGMENT_LIMIT)
    } else {
        1
    }
}

// Perpendicular distance from `cp` to the chord. `None` for a
// zero-length chord.
fn chord_distance(p0: Point, p1: Point, cp: Point) -> Option<f32> {
    let chord = p1 - p0;
    let len = chord.length();
    if len == 0.0 {
        return None;
    }

    Some((chord.cross(cp - p0)).abs() / len)
}

fn chop_quad_at_half(src: &[Point; 3], dst: &mut [Point; 5]) {
    let ab = mid(src[0], src[1]);
    let bc = mid(src[1], src[2]);

    dst[0] = src[0];
    dst[1] = ab;
    dst[2] = mid(ab, bc);
    dst[3] = bc;
    dst[4] = src[2];
}

fn chop_cubic_at_half(src: &[Point; 4], dst: &mut [Point; 7]) {
    let ab = mid(src[0], src[1]);
    let bc = mid(src[1], src[2]);
    let cd = mid(src[2], src[3]);
    let abc = mid(ab, bc);
    let bcd = mid(bc, cd);

    dst[0] = src[0];
    dst[1] = ab;
    dst[2] = abc;
    dst[3] = mid(abc, bcd);
    dst[4] = bcd;
    dst[5] = cd;
    dst[6] = src[3];
}

fn mid(a: Point, b: Point) -> Point {
    Point::from_xy(a.x.ave(b.x), a.y.ave(b.y))
}
