// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::HashSet;

use crate::blitter::SurfaceBlitter;
use crate::scan::circle::{ring, QUAD_BL, QUAD_BR, QUAD_TL, QUAD_TR};
use crate::scan::blit_hspan;

/// Integer footprint of an axis-aligned rectangle: `[x0, x1) x [y0, y1)`.
#[derive(Copy, Clone, PartialEq, Debug)]
pub(crate) struct RectExtents {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl RectExtents {
    fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

// Negative sizes flip around the anchor, the way Canvas rectangles do.
pub(crate) fn normalize(x: f32, y: f32, w: f32, h: f32) -> (f32, f32, f32, f32) {
    let (x, w) = if w < 0.0 { (x + w, -w) } else { (x, w) };
    let (y, h) = if h < 0.0 { (y + h, -h) } else { (y, h) };
    (x, y, w, h)
}

/// The fill footprint: `floor` on the leading edges, `ceil` on the
/// trailing ones, so every touched pixel is covered.
pub(crate) fn fill_extents(x: f32, y: f32, w: f32, h: f32) -> RectExtents {
    RectExtents {
        x0: x.floor() as i32,
        y0: y.floor() as i32,
        x1: (x + w).ceil() as i32,
        y1: (y + h).ceil() as i32,
    }
}

/// Axis-aligned rectangle fill.
pub fn fill_rect(blitter: &mut SurfaceBlitter, x: f32, y: f32, w: f32, h: f32) {
    let (x, y, w, h) = normalize(x, y, w, h);
    if !(w > 0.0) || !(h > 0.0) {
        return;
    }

    fill_extent_rows(blitter, fill_extents(x, y, w, h));
}

pub(crate) fn fill_extent_rows(blitter: &mut SurfaceBlitter, e: RectExtents) {
    for row in e.y0..e.y1 {
        blit_hspan(blitter, row, e.x0, e.x1);
    }
}

/// 1-pixel axis-aligned rectangle stroke.
///
/// The four edge runs share each corner pixel exactly once: the top and
/// bottom rows take the full horizontal extent, the side columns skip
/// the first and last rows.
pub fn stroke_rect(blitter: &mut SurfaceBlitter, x: f32, y: f32, w: f32, h: f32) {
    let (x, y, w, h) = normalize(x, y, w, h);
    if !(w > 0.0) || !(h > 0.0) {
        return;
    }

    let e = fill_extents(x, y, w, h);
    if e.is_empty() {
        return;
    }

    blit_hspan(blitter, e.y0, e.x0, e.x1);
    if e.y1 - 1 > e.y0 {
        blit_hspan(blitter, e.y1 - 1, e.x0, e.x1);
    }

    for row in e.y0 + 1..e.y1 - 1 {
        blit_hspan(blitter, row, e.x0, e.x0 + 1);
        if e.x1 - 1 > e.x0 {
            blit_hspan(blitter, row, e.x1 - 1, e.x1);
        }
    }
}

/// The outer and inner footprints of a thick rectangle stroke.
///
/// Floor-rounded on every boundary, so non-integer geometry lands on a
/// consistent pixel grid. `inner` is `None` when the band swallows the
/// whole rectangle.
pub(crate) fn stroke_band_extents(
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    line_width: f32,
) -> (RectExtents, Option<RectExtents>) {
    let hw = line_width * 0.5;
    let outer = RectExtents {
        x0: (x - hw).floor() as i32,
        y0: (y - hw).floor() as i32,
        x1: (x + w + hw).floor() as i32,
        y1: (y + h + hw).floor() as i32,
    };
    let inner = RectExtents {
        x0: (x + hw).floor() as i32,
        y0: (y + hw).floor() as i32,
        x1: (x + w - hw).floor() as i32,
        y1: (y + h - hw).floor() as i32,
    };

    if inner.is_empty() {
        (outer, None)
    } else {
        (outer, Some(inner))
    }
}

/// Thick axis-aligned rectangle stroke: the outer-to-inner band on each
/// side.
pub fn stroke_rect_thick(blitter: &mut SurfaceBlitter, x: f32, y: f32, w: f32, h: f32, line_width: f32) {
    let (x, y, w, h) = normalize(x, y, w, h);
    if !(w > 0.0) || !(h > 0.0) || !(line_width > 0.0) {
        return;
    }

    let (outer, inner) = stroke_band_extents(x, y, w, h, line_width);
    match inner {
        None => fill_extent_rows(blitter, outer),
        Some(inner) => {
            for row in outer.y0..inner.y0 {
                blit_hspan(blitter, row, outer.x0, outer.x1);
            }
            for row in inner.y0..inner.y1 {
                blit_hspan(blitter, row, outer.x0, inner.x0);
                blit_hspan(blitter, row, inner.x1, outer.x1);
            }
            for row in inner.y1..outer.y1 {
                blit_hspan(blitter, row, outer.x0, outer.x1);
            }
        }
    }
}

/// Rounded-rectangle fill: straight spans with square-root corner
/// insets.
pub fn fill_round_rect(blitter: &mut SurfaceBlitter, x: f32, y: f32, w: f32, h: f32, radius: f32) {
    let (x, y, w, h) = normalize(x, y, w, h);
    if !(w > 0.0) || !(h > 0.0) {
        return;
    }

    let radius = radius.min(w * 0.5).min(h * 0.5);
    if !(radius > 0.0) {
        fill_rect(blitter, x, y, w, h);
        return;
    }

    let y0 = y.floor() as i32;
    let y1 = (y + h).ceil() as i32;
    let top_center = y + radius;
    let bottom_center = y + h - radius;

    for row in y0..y1 {
        let yc = row as f32 + 0.5;
        let dy = if yc < top_center {
            top_center - yc
        } else if yc > bottom_center {
            yc - bottom_center
        } else {
            0.0
        };

        if dy > radius {
            continue;
        }

        let inset = radius - (radius * radius - dy * dy).sqrt();
        let xs = (x + inset).floor() as i32;
        let xe = (x + w - inset).ceil() as i32;
        blit_hspan(blitter, row, xs, xe);
    }
}

/// 1-pixel rounded-rectangle stroke: four straight runs joined by
/// quarter-circle Bresenham arcs.
///
/// Runs and arcs share pixels where they meet; translucent strokes
/// deduplicate across all parts so no pixel blends twice.
pub fn stroke_round_rect(blitter: &mut SurfaceBlitter, x: f32, y: f32, w: f32, h: f32, radius: f32) {
    let (x, y, w, h) = normalize(x, y, w, h);
    if !(w > 0.0) || !(h > 0.0) {
        return;
    }

    let radius = radius.min(w * 0.5).min(h * 0.5);
    if !(radius > 0.0) {
        stroke_rect(blitter, x, y, w, h);
        return;
    }

    let e = fill_extents(x, y, w, h);
    let run_x0 = (x + radius).floor() as i32;
    let run_x1 = (x + w - radius).ceil() as i32;
    let run_y0 = (y + radius).floor() as i32;
    let run_y1 = (y + h - radius).ceil() as i32;

    let corners = [
        (x + radius, y + radius, QUAD_TL),
        (x + w - radius, y + radius, QUAD_TR),
        (x + w - radius, y + h - radius, QUAD_BR),
        (x + radius, y + h - radius, QUAD_BL),
    ];

    if blitter.is_direct() {
        blit_hspan(blitter, e.y0, run_x0, run_x1);
        blit_hspan(blitter, e.y1 - 1, run_x0, run_x1);
        for row in run_y0..run_y1 {
            blit_hspan(blitter, row, e.x0, e.x0 + 1);
            blit_hspan(blitter, row, e.x1 - 1, e.x1);
        }
        for &(cx, cy, quad) in &corners {
            ring(cx, cy, radius, quad, &mut |px, py| blitter.pixel(px, py));
        }
    } else {
        let mut seen = HashSet::new();
        for col in run_x0..run_x1 {
            blitter.pixel_once(col, e.y0, &mut seen);
            blitter.pixel_once(col, e.y1 - 1, &mut seen);
        }
        for row in run_y0..run_y1 {
            blitter.pixel_once(e.x0, row, &mut seen);
            blitter.pixel_once(e.x1 - 1, row, &mut seen);
        }
        for &(cx, cy, quad) in &corners {
            ring(cx, cy, radius, quad, &mut |px, py| {
                blitter.pixel_once(px, py, &mut seen)
            });
        }
    }
}
