// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

pub mod circle;
pub mod polygon;
pub mod quad;
pub mod rect;

use limner_path::SaturateRound;

use crate::blitter::Blitter;
use crate::geom::LengthU32;

/// A path filling rule.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum FillRule {
    /// Specifies that "inside" is computed by a non-zero sum of
    /// signed edge crossings.
    Winding,
    /// Specifies that "inside" is computed by an odd number of edge
    /// crossings.
    EvenOdd,
}

impl Default for FillRule {
    #[inline]
    fn default() -> Self {
        FillRule::Winding
    }
}

/// Converts the float span `[x0, x1)` into a pixel run clamped to
/// `0..width`.
///
/// A pixel x is covered when `ceil(x0) <= x < x1`, which keeps
/// integral right edges exclusive so adjacent spans never double-paint
/// a column.
pub(crate) fn span_range(x0: f32, x1: f32, width: u32) -> Option<(u32, LengthU32)> {
    let start = i32::saturate_ceil(x0).max(0);
    let end = i32::saturate_ceil(x1).min(width as i32);
    if start >= end {
        return None;
    }

    Some((start as u32, LengthU32::new((end - start) as u32)?))
}

/// Clamps the integer span `[x0, x1)` to `0..width`.
pub(crate) fn clamp_span(x0: i32, x1: i32, width: u32) -> Option<(u32, LengthU32)> {
    let start = x0.max(0);
    let end = x1.min(width as i32);
    if start >= end {
        return None;
    }

    Some((start as u32, LengthU32::new((end - start) as u32)?))
}

/// Blits the integer pixel span `[x0, x1)` on `row`, clamped to the
/// blitter's target. Out-of-range rows are ignored.
pub(crate) fn blit_hspan(blitter: &mut crate::blitter::SurfaceBlitter, row: i32, x0: i32, x1: i32) {
    if row < 0 || row >= blitter.height() as i32 {
        return;
    }

    if let Some((x, len)) = clamp_span(x0, x1, blitter.width()) {
        blitter.blit_h(x, row as u32, len);
    }
}

/// Blits the float span `[x0, x1)` on `row` under the shared span rule.
pub(crate) fn blit_hspan_f(blitter: &mut crate::blitter::SurfaceBlitter, row: i32, x0: f32, x1: f32) {
    if row < 0 || row >= blitter.height() as i32 {
        return;
    }

    if let Some((x, len)) = span_range(x0, x1, blitter.width()) {
        blitter.blit_h(x, row as u32, len);
    }
}
