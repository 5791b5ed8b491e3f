// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use core::f32::consts::PI;

use crate::dash::StrokeDash;
use crate::flatten::Polygon;
use crate::scalar::Scalar;
use crate::Point;

/// Draws at the beginning and end of an open path contour.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LineCap {
    /// No stroke extension.
    Butt,
    /// Adds a semicircle.
    Round,
    /// Adds a half-square extension.
    Square,
}

impl Default for LineCap {
    fn default() -> Self {
        LineCap::Butt
    }
}

/// Specifies how corners are drawn when a shape is stroked.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum LineJoin {
    /// Extends to the miter limit.
    Miter,
    /// Adds a circular sector.
    Round,
    /// Connects outside edges.
    Bevel,
}

impl Default for LineJoin {
    fn default() -> Self {
        LineJoin::Miter
    }
}

/// Stroke properties.
#[derive(Clone, PartialEq, Debug)]
pub struct Stroke {
    /// A stroke thickness.
    ///
    /// Must be > 0; anything else produces no stroke geometry.
    ///
    /// Default: 1.0
    pub width: f32,

    /// The limit at which a sharp corner is drawn beveled.
    ///
    /// Default: 4.0
    pub miter_limit: f32,

    /// A stroke line cap.
    ///
    /// Default: Butt
    pub line_cap: LineCap,

    /// A stroke line join.
    ///
    /// Default: Miter
    pub line_join: LineJoin,

    /// A stroke dashing pattern.
    ///
    /// Default: None
    pub dash: Option<StrokeDash>,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke {
            width: 1.0,
            miter_limit: 4.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::Miter,
            dash: None,
        }
    }
}

// Two tangents closer than this are treated as parallel and joined
// with a bevel.
const PARALLEL_EPSILON: f32 = 1e-10;

/// Converts flattened polylines into a list of filled polygons whose
/// union is the stroke: one quad per segment body, plus join and cap
/// geometry.
///
/// Returns an empty list when `stroke.width` is not positive.
pub fn stroke_polygons(polygons: &[Polygon], stroke: &Stroke) -> Vec<Polygon> {
    if !(stroke.width > 0.0) {
        return Vec::new();
    }

    let radius = stroke.width.half();
    let mut out = Vec::new();

    match stroke.dash {
        Some(ref dash) => {
            for polygon in polygons {
                for piece in dash.split(polygon) {
                    // Every dash is an open run with its own caps.
                    stroke_polyline(&piece.points, false, radius, stroke, &mut out);
                }
            }
        }
        None => {
            for polygon in polygons {
                stroke_polyline(&polygon.points, polygon.is_closed(), radius, stroke, &mut out);
            }
        }
    }

    out
}

#[derive(Copy, Clone)]
struct Segment {
    p1: Point,
    p2: Point,
    tangent: Point,
}

fn stroke_polyline(
    points: &[Point],
    closed: bool,
    radius: f32,
    stroke: &Stroke,
    out: &mut Vec<Polygon>,
) {
    let mut segments = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        if let Some(tangent) = (pair[1] - pair[0]).normalized() {
            segments.push(Segment {
                p1: pair[0],
                p2: pair[1],
                tangent,
            });
        }
    }

    if segments.is_empty() {
        return;
    }

    for segment in &segments {
        let normal = segment.tangent.left_normal().scaled(radius);
        push_part(out, vec![
            segment.p1 + normal,
            segment.p2 + normal,
            segment.p2 - normal,
            segment.p1 - normal,
        ]);
    }

    for pair in segments.windows(2) {
        add_join(out, pair[1].p1, pair[0].tangent, pair[1].tangent, radius, stroke);
    }

    if closed {
        let last = segments[segments.len() - 1];
        let first = segments[0];
        add_join(out, first.p1, last.tangent, first.tangent, radius, stroke);
    } else {
        let first = segments[0];
        let last = segments[segments.len() - 1];
        add_cap(out, first.p1, -first.tangent, radius, stroke.line_cap);
        add_cap(out, last.p2, last.tangent, radius, stroke.line_cap);
    }
}

// Joins the outer side of the corner at `p`. The concave side needs no
// geometry: the two segment bodies already overlap there.
fn add_join(
    out: &mut Vec<Polygon>,
    p: Point,
    t1: Point,
    t2: Point,
    radius: f32,
    stroke: &Stroke,
) {
    let cross = t1.cross(t2);
    let side = if cross > 0.0 { -1.0 } else { 1.0 };
    let n1 = t1.left_normal().scaled(side * radius);
    let n2 = t2.left_normal().scaled(side * radius);
    let outer1 = p + n1;
    let outer2 = p + n2;

    if cross.abs() < PARALLEL_EPSILON {
        // Parallel or antiparallel tangents: bevel. For a straight
        // continuation the triangle is empty; for a 180-degree turn it
        // degenerates to the shared edge.
        push_part(out, vec![outer1, outer2, p]);
        return;
    }

    match stroke.line_join {
        LineJoin::Bevel => {
            push_part(out, vec![outer1, outer2, p]);
        }
        LineJoin::Miter => {
            // Intersection of the two outer edges extended along the
            // tangents.
            let u = (outer2 - outer1).cross(t2) / cross;
            let miter = outer1 + t1.scaled(u);
            let miter_length = miter.distance(p);
            if miter_length / radius > stroke.miter_limit {
                push_part(out, vec![outer1, outer2, p]);
            } else {
                push_part(out, vec![outer1, miter, outer2, p]);
            }
        }
        LineJoin::Round => {
            let a1 = n1.y.atan2(n1.x);
            let a2 = n2.y.atan2(n2.x);
            let mut delta = a2 - a1;
            while delta > PI {
                delta -= 2.0 * PI;
            }
            while delta <= -PI {
                delta += 2.0 * PI;
            }

            let steps = ((delta.abs() / (PI / 4.0)).ceil() as usize).max(2);
            for i in 0..steps {
                let b0 = a1 + delta * (i as f32 / steps as f32);
                let b1 = a1 + delta * ((i + 1) as f32 / steps as f32);
                push_part(out, vec![
                    p,
                    p + Point::from_xy(b0.cos(), b0.sin()).scaled(radius),
                    p + Point::from_xy(b1.cos(), b1.sin()).scaled(radius),
                ]);
            }
        }
    }
}

// Stroke parts overlap (bodies through joins, joins through caps);
// the nonzero fill must see every part wound the same way or the
// overlaps would cancel. Reversal keeps the vertex set untouched.
fn push_part(out: &mut Vec<Polygon>, mut points: Vec<Point>) {
    if signed_area(&points) > 0.0 {
        points.reverse();
    }
    out.push(Polygon::from_points(points));
}

fn signed_area(points: &[Point]) -> f32 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        area += p1.x * p2.y - p2.x * p1.y;
    }
    area
}

fn add_cap(out: &mut Vec<Polygon>, end: Point, outward: Point, radius: f32, cap: LineCap) {
    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            let normal = outward.left_normal().scaled(radius);
            let ext = outward.scaled(radius);
            push_part(out, vec![
                end + normal,
                end + normal + ext,
                end - normal + ext,
                end - normal,
            ]);
        }
        LineCap::Round => {
            // A semicircle fanned into quarter-turn sectors, swept
            // through the outward direction.
            let normal = outward.left_normal();
            let start = normal.y.atan2(normal.x);
            let steps = 4;
            for i in 0..steps {
                let b0 = start - PI * (i as f32 / steps as f32);
                let b1 = start - PI * ((i + 1) as f32 / steps as f32);
                push_part(out, vec![
                    end,
                    end + Point::from_xy(b0.cos(), b0.sin()).scaled(radius),
                    end + Point::from_xy(b1.cos(), b1.sin()).scaled(radius),
                ]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> Point {
        Point::from_xy(x, y)
    }

    fn polyline(points: Vec<Point>) -> Vec<Polygon> {
        vec![Polygon::from_points(points)]
    }

    #[test]
    fn zero_width_produces_nothing() {
        let polygons = polyline(vec![pt(0.0, 0.0), pt(10.0, 0.0)]);
        let stroke = Stroke {
            width: 0.0,
            ..Stroke::default()
        };
        assert!(stroke_polygons(&polygons, &stroke).is_empty());

        let stroke = Stroke {
            width: -2.0,
            ..Stroke::default()
        };
        assert!(stroke_polygons(&polygons, &stroke).is_empty());
    }

    #[test]
    fn single_segment_body() {
        let polygons = polyline(vec![pt(0.0, 5.0), pt(10.0, 5.0)]);
        let stroke = Stroke {
            width: 4.0,
            ..Stroke::default()
        };
        let result = stroke_polygons(&polygons, &stroke);

        // One body, no joins, butt caps add nothing.
        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0].points,
            vec![pt(0.0, 7.0), pt(10.0, 7.0), pt(10.0, 3.0), pt(0.0, 3.0)]
        );
    }

    #[test]
    fn zero_length_segments_are_skipped() {
        let polygons = polyline(vec![pt(0.0, 0.0), pt(0.0, 0.0), pt(10.0, 0.0)]);
        let result = stroke_polygons(&polygons, &Stroke::default());
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn straight_ahead_join_is_degenerate() {
        let polygons = polyline(vec![pt(0.0, 0.0), pt(5.0, 0.0), pt(10.0, 0.0)]);
        let result = stroke_polygons(&polygons, &Stroke::default());

        // Two bodies plus one (degenerate) bevel.
        assert_eq!(result.len(), 3);
        assert_eq!(result[2].points.len(), 3);
    }

    #[test]
    fn reversal_turn_produces_bevel() {
        let polygons = polyline(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(0.0, 0.0)]);
        let stroke = Stroke {
            line_join: LineJoin::Miter,
            ..Stroke::default()
        };
        let result = stroke_polygons(&polygons, &stroke);

        // A 180-degree turn must not attempt a miter.
        assert_eq!(result.len(), 3);
        assert_eq!(result[2].points.len(), 3);
    }

    #[test]
    fn miter_join_emits_spike() {
        let polygons = polyline(vec![pt(0.0, 10.0), pt(10.0, 10.0), pt(10.0, 0.0)]);
        let stroke = Stroke {
            width: 2.0,
            line_join: LineJoin::Miter,
            miter_limit: 4.0,
            ..Stroke::default()
        };
        let result = stroke_polygons(&polygons, &stroke);

        assert_eq!(result.len(), 3);
        let join = &result[2].points;
        assert_eq!(join.len(), 4);
        // The spike reaches the outer corner.
        assert!(join.iter().any(|p| p.distance(pt(11.0, 11.0)) < 1e-4));
    }

    #[test]
    fn sharp_miter_degrades_to_bevel() {
        // A near-reversal: the miter would be far longer than
        // miter_limit * radius.
        let polygons = polyline(vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(0.0, 0.5)]);
        let stroke = Stroke {
            width: 2.0,
            line_join: LineJoin::Miter,
            miter_limit: 4.0,
            ..Stroke::default()
        };
        let result = stroke_polygons(&polygons, &stroke);

        assert_eq!(result.len(), 3);
        assert_eq!(result[2].points.len(), 3);
    }

    #[test]
    fn round_join_fans_triangles() {
        let polygons = polyline(vec![pt(0.0, 10.0), pt(10.0, 10.0), pt(10.0, 0.0)]);
        let stroke = Stroke {
            width: 2.0,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        let result = stroke_polygons(&polygons, &stroke);

        // 90 degree turn: two quarter-turn sectors.
        assert_eq!(result.len(), 4);
        for sector in &result[2..] {
            assert_eq!(sector.points.len(), 3);
            assert_eq!(sector.points[0], pt(10.0, 10.0));
        }
    }

    #[test]
    fn square_cap_extends_line() {
        let polygons = polyline(vec![pt(5.0, 5.0), pt(10.0, 5.0)]);
        let stroke = Stroke {
            width: 2.0,
            line_cap: LineCap::Square,
            ..Stroke::default()
        };
        let result = stroke_polygons(&polygons, &stroke);

        // Body plus two caps.
        assert_eq!(result.len(), 3);
        let start_cap = &result[1].points;
        assert!(start_cap.iter().any(|p| p.distance(pt(4.0, 4.0)) < 1e-4));
        assert!(start_cap.iter().any(|p| p.distance(pt(4.0, 6.0)) < 1e-4));
        let end_cap = &result[2].points;
        assert!(end_cap.iter().any(|p| p.distance(pt(11.0, 4.0)) < 1e-4));
        assert!(end_cap.iter().any(|p| p.distance(pt(11.0, 6.0)) < 1e-4));
    }

    #[test]
    fn round_cap_lies_outside_segment() {
        let polygons = polyline(vec![pt(5.0, 5.0), pt(10.0, 5.0)]);
        let stroke = Stroke {
            width: 2.0,
            line_cap: LineCap::Round,
            ..Stroke::default()
        };
        let result = stroke_polygons(&polygons, &stroke);

        // Body plus 4 sectors per cap.
        assert_eq!(result.len(), 9);
        // All start-cap vertices stay left of the start point,
        // all end-cap vertices stay right of the end point.
        for sector in &result[1..5] {
            for p in &sector.points {
                assert!(p.x <= 5.0 + 1e-4);
            }
        }
        for sector in &result[5..] {
            for p in &sector.points {
                assert!(p.x >= 10.0 - 1e-4);
            }
        }
    }

    #[test]
    fn closed_polygon_gets_wrap_join_and_no_caps() {
        let polygons = polyline(vec![
            pt(0.0, 0.0),
            pt(10.0, 0.0),
            pt(10.0, 10.0),
            pt(0.0, 10.0),
            pt(0.0, 0.0),
        ]);
        let stroke = Stroke {
            width: 2.0,
            line_cap: LineCap::Square,
            line_join: LineJoin::Bevel,
            ..Stroke::default()
        };
        let result = stroke_polygons(&polygons, &stroke);

        // Four bodies and four joins; square caps must not appear.
        assert_eq!(result.len(), 8);
    }
}
