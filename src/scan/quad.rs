// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::HashSet;

use arrayvec::ArrayVec;
use limner_path::{Point, SaturateRound};

use crate::blitter::{Blitter, SurfaceBlitter};
use crate::scan::span_range;

// Same horizontal-edge threshold as the polygon filler.
const HORIZONTAL_EPSILON: f32 = 1e-10;

/// Scanline-fills a quadrilateral.
///
/// This is the dedicated rasterizer behind rotated rectangles and
/// thick lines: per scanline the four edges are intersected under the
/// shared half-open rule and the outermost two samples bound the span.
///
/// Opaque quads write spans through the 32-bit view; translucent ones
/// blend per pixel. Pass `seen` when the quad is one part of a
/// multi-part stroke, so shared pixels blend only once across parts.
pub fn fill_quad(
    blitter: &mut SurfaceBlitter,
    points: &[Point; 4],
    mut seen: Option<&mut HashSet<u32>>,
) {
    if points.iter().any(|p| !p.is_finite()) {
        log::warn!("skipping a quad with non-finite coordinates");
        return;
    }

    let mut min_y = points[0].y;
    let mut max_y = points[0].y;
    for p in &points[1..] {
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let y0 = i32::saturate_floor(min_y).max(0);
    let y1 = i32::saturate_ceil(max_y).min(blitter.height() as i32 - 1);

    for y in y0..=y1 {
        let sample = y as f32 + 0.5;

        let mut samples: ArrayVec<f32, 4> = ArrayVec::new();
        for i in 0..4 {
            let p1 = points[i];
            let p2 = points[(i + 1) % 4];

            let dy = p2.y - p1.y;
            if dy.abs() < HORIZONTAL_EPSILON {
                continue;
            }

            let (edge_min, edge_max) = if p1.y < p2.y { (p1.y, p2.y) } else { (p2.y, p1.y) };
            if sample < edge_min || sample >= edge_max {
                continue;
            }

            let t = (sample - p1.y) / dy;
            samples.push(p1.x + t * (p2.x - p1.x));
        }

        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for x in &samples {
            lo = lo.min(*x);
            hi = hi.max(*x);
        }

        if samples.is_empty() {
            continue;
        }

        let span = match span_range(lo, hi, blitter.width()) {
            Some(span) => span,
            None => continue,
        };

        if blitter.is_direct() && seen.is_none() {
            blitter.blit_h(span.0, y as u32, span.1);
        } else {
            let (x, len) = (span.0, span.1.get());
            match seen.as_deref_mut() {
                Some(seen) => {
                    for px in x..x + len {
                        blitter.pixel_once(px as i32, y, seen);
                    }
                }
                None => {
                    for px in x..x + len {
                        blitter.pixel(px as i32, y);
                    }
                }
            }
        }
    }
}

/// Converts a thick line into its quadrilateral.
///
/// A zero-length line becomes an axis-aligned square of side
/// `2 * half_width` centered on the endpoint.
pub fn thick_line_quad(p1: Point, p2: Point, half_width: f32) -> [Point; 4] {
    match (p2 - p1).normalized() {
        Some(tangent) => {
            let n = tangent.left_normal().scaled(half_width);
            [p1 + n, p2 + n, p2 - n, p1 - n]
        }
        None => [
            Point::from_xy(p1.x - half_width, p1.y - half_width),
            Point::from_xy(p1.x + half_width, p1.y - half_width),
            Point::from_xy(p1.x + half_width, p1.y + half_width),
            Point::from_xy(p1.x - half_width, p1.y + half_width),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::CompositeOp;
    use crate::color::Color;
    use crate::surface::Surface;

    fn pt(x: f32, y: f32) -> Point {
        Point::from_xy(x, y)
    }

    fn count_colored(surface: &Surface, color: Color) -> usize {
        let mut n = 0;
        for y in 0..surface.height() {
            for x in 0..surface.width() {
                if surface.pixel(x, y).unwrap() == color {
                    n += 1;
                }
            }
        }
        n
    }

    #[test]
    fn axis_aligned_quad_matches_span_rule() {
        let red = Color::from_rgba8(255, 0, 0, 255);
        let mut surface = Surface::new(10, 10).unwrap();
        {
            let mut blitter =
                SurfaceBlitter::from_color(&mut surface, None, None, red, CompositeOp::SourceOver);
            let quad = [pt(2.0, 3.0), pt(6.0, 3.0), pt(6.0, 5.0), pt(2.0, 5.0)];
            fill_quad(&mut blitter, &quad, None);
        }

        // Same coverage as the polygon filler: x 2..=5, y 3..=4.
        assert_eq!(count_colored(&surface, red), 4 * 2);
        assert_eq!(surface.pixel(2, 3).unwrap(), red);
        assert_eq!(surface.pixel(5, 4).unwrap(), red);
        assert_eq!(surface.pixel(6, 3).unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn diamond_quad() {
        let red = Color::from_rgba8(255, 0, 0, 255);
        let mut surface = Surface::new(11, 11).unwrap();
        {
            let mut blitter =
                SurfaceBlitter::from_color(&mut surface, None, None, red, CompositeOp::SourceOver);
            let quad = [pt(5.0, 0.0), pt(10.0, 5.0), pt(5.0, 10.0), pt(0.0, 5.0)];
            fill_quad(&mut blitter, &quad, None);
        }

        // Widest at the middle, narrowing towards the tips.
        assert_eq!(surface.pixel(5, 5).unwrap(), red);
        assert_eq!(surface.pixel(1, 5).unwrap(), red);
        assert_eq!(surface.pixel(0, 0).unwrap(), Color::TRANSPARENT);
        assert_eq!(surface.pixel(10, 0).unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn shared_seen_set_prevents_double_blend() {
        let c = Color::from_rgba8(0, 0, 0, 128);
        let mut surface = Surface::new(10, 10).unwrap();
        surface.fill(Color::WHITE);
        {
            let mut blitter =
                SurfaceBlitter::from_color(&mut surface, None, None, c, CompositeOp::SourceOver);
            let quad = [pt(1.0, 1.0), pt(8.0, 1.0), pt(8.0, 8.0), pt(1.0, 8.0)];
            let mut seen = HashSet::new();
            fill_quad(&mut blitter, &quad, Some(&mut seen));
            fill_quad(&mut blitter, &quad, Some(&mut seen));
        }

        let once = Color::from_rgba8(127, 127, 127, 255);
        assert!(count_colored(&surface, once) > 0);
        let twice = crate::blend::blend(CompositeOp::SourceOver, c, once);
        assert_eq!(count_colored(&surface, twice), 0);
    }

    #[test]
    fn zero_length_line_is_a_square() {
        let quad = thick_line_quad(pt(5.0, 5.0), pt(5.0, 5.0), 2.0);
        assert_eq!(
            quad,
            [pt(3.0, 3.0), pt(7.0, 3.0), pt(7.0, 7.0), pt(3.0, 7.0)]
        );
    }

    #[test]
    fn thick_line_quad_is_perpendicular() {
        let quad = thick_line_quad(pt(0.0, 0.0), pt(10.0, 0.0), 1.5);
        assert_eq!(
            quad,
            [pt(0.0, 1.5), pt(10.0, 1.5), pt(10.0, -1.5), pt(0.0, -1.5)]
        );
    }
}
