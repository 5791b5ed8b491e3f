// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use limner_path::{Point, Polygon, SaturateRound, Transform};

use crate::blitter::Blitter;
use crate::scan::{span_range, FillRule};

// Edges flatter than this never contribute scanline intersections.
const HORIZONTAL_EPSILON: f32 = 1e-10;

/// Scanline-fills a polygon list under a fill rule.
///
/// Vertices are mapped to device space by `transform` once, up front;
/// everything downstream works on device polygons. Each device scanline
/// is sampled at `y + 0.5`, edge crossings follow the half-open
/// `[min_y, max_y)` rule so a vertex shared by two edges is counted
/// exactly once, and inside spans go to the blitter.
pub(crate) fn fill_polygons(
    polygons: &[Polygon],
    fill_rule: FillRule,
    transform: Transform,
    width: u32,
    height: u32,
    blitter: &mut dyn Blitter,
) {
    let mut device: Vec<Vec<Point>> = Vec::with_capacity(polygons.len());
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;

    for polygon in polygons {
        if polygon.points.len() < 2 {
            continue;
        }

        let mut points = polygon.points.clone();
        transform.map_points(&mut points);

        if points.iter().any(|p| !p.is_finite()) {
            log::warn!("skipping a polygon with non-finite device coordinates");
            continue;
        }

        for p in &points {
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }

        device.push(points);
    }

    if device.is_empty() {
        return;
    }

    let y0 = i32::saturate_floor(min_y).max(0);
    let y1 = i32::saturate_ceil(max_y).min(height as i32 - 1);

    let mut crossings: Vec<(f32, i32)> = Vec::new();
    for y in y0..=y1 {
        let sample = y as f32 + 0.5;

        crossings.clear();
        for points in &device {
            collect_crossings(points, sample, &mut crossings);
        }

        if crossings.len() < 2 {
            continue;
        }

        crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut winding = 0i32;
        for i in 0..crossings.len() - 1 {
            winding += crossings[i].1;
            let inside = match fill_rule {
                FillRule::Winding => winding != 0,
                FillRule::EvenOdd => winding & 1 == 1,
            };

            if inside {
                if let Some((x, len)) = span_range(crossings[i].0, crossings[i + 1].0, width) {
                    blitter.blit_h(x, y as u32, len);
                }
            }
        }
    }
}

// The vertex list is treated as cyclic: the edge from the last vertex
// back to the first participates too.
fn collect_crossings(points: &[Point], sample: f32, crossings: &mut Vec<(f32, i32)>) {
    let n = points.len();
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];

        let dy = p2.y - p1.y;
        if dy.abs() < HORIZONTAL_EPSILON {
            continue;
        }

        let (edge_min, edge_max) = if p1.y < p2.y { (p1.y, p2.y) } else { (p2.y, p1.y) };
        // Half-open at the top end.
        if sample < edge_min || sample >= edge_max {
            continue;
        }

        let t = (sample - p1.y) / dy;
        let x = p1.x + t * (p2.x - p1.x);
        let winding = if dy > 0.0 { 1 } else { -1 };
        crossings.push((x, winding));
    }
}

// The on-edge tolerance for hit testing.
const EDGE_EPSILON: f32 = 1e-6;

/// Point-in-polygon test over the same crossing engine as the filler.
///
/// The test is edge-inclusive: a point lying on any polygon edge is
/// inside, via a separate collinearity-and-parameter check.
pub fn hit_test(polygons: &[Polygon], x: f32, y: f32, fill_rule: FillRule) -> bool {
    let pt = Point::from_xy(x, y);

    for polygon in polygons {
        let points = &polygon.points;
        let n = points.len();
        if n < 2 {
            continue;
        }

        for i in 0..n {
            if on_segment(points[i], points[(i + 1) % n], pt) {
                return true;
            }
        }
    }

    let mut winding = 0i32;
    for polygon in polygons {
        let points = &polygon.points;
        let n = points.len();
        if n < 2 {
            continue;
        }

        // A horizontal ray towards +infinity, crossed under the same
        // half-open rule as the filler.
        for i in 0..n {
            let p1 = points[i];
            let p2 = points[(i + 1) % n];

            let dy = p2.y - p1.y;
            if dy.abs() < HORIZONTAL_EPSILON {
                continue;
            }

            let (edge_min, edge_max) = if p1.y < p2.y { (p1.y, p2.y) } else { (p2.y, p1.y) };
            if y < edge_min || y >= edge_max {
                continue;
            }

            let t = (y - p1.y) / dy;
            let ix = p1.x + t * (p2.x - p1.x);
            if ix > x {
                winding += if dy > 0.0 { 1 } else { -1 };
            }
        }
    }

    match fill_rule {
        FillRule::Winding => winding != 0,
        FillRule::EvenOdd => winding & 1 == 1,
    }
}

fn on_segment(p1: Point, p2: Point, pt: Point) -> bool {
    let edge = p2 - p1;
    let v = pt - p1;

    let len_sq = edge.dot(edge);
    if len_sq == 0.0 {
        return v.length() <= EDGE_EPSILON;
    }

    if edge.cross(v).abs() > EDGE_EPSILON * len_sq.sqrt() {
        return false;
    }

    let t = v.dot(edge) / len_sq;
    t >= 0.0 && t <= 1.0
}
