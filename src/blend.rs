// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use crate::color::Color;

/// A compositing operator.
///
/// The Porter-Duff set exposed by the Canvas API, applied in straight
/// (non-premultiplied) alpha.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CompositeOp {
    /// The source is placed over the destination.
    SourceOver,
    /// The destination is placed over the source.
    DestinationOver,
    /// The source that overlaps the destination replaces the destination.
    SourceAtop,
    /// The destination that overlaps the source replaces the source.
    DestinationAtop,
    /// The source that overlaps the destination is kept.
    SourceIn,
    /// The destination that overlaps the source is kept.
    DestinationIn,
    /// The source that does not overlap the destination is kept.
    SourceOut,
    /// The destination that does not overlap the source is kept.
    DestinationOut,
    /// Only the source is kept.
    Copy,
    /// The non-overlapping regions of source and destination are kept.
    Xor,
}

impl Default for CompositeOp {
    #[inline]
    fn default() -> Self {
        CompositeOp::SourceOver
    }
}

impl CompositeOp {
    /// Checks whether this operator can change destination pixels the
    /// source never covered.
    ///
    /// Such operators run canvas-wide: the filler records source
    /// coverage into a mask first, and the destination is composed
    /// afterwards, including pixels outside the coverage.
    pub fn is_canvas_wide(&self) -> bool {
        matches!(
            self,
            CompositeOp::SourceIn
                | CompositeOp::SourceOut
                | CompositeOp::DestinationIn
                | CompositeOp::DestinationAtop
                | CompositeOp::Copy
        )
    }

    // Porter-Duff factors (F_src, F_dst) given the two alphas.
    fn factors(&self, sa: f32, da: f32) -> (f32, f32) {
        match self {
            CompositeOp::SourceOver => (1.0, 1.0 - sa),
            CompositeOp::DestinationOver => (1.0 - da, 1.0),
            CompositeOp::SourceAtop => (da, 1.0 - sa),
            CompositeOp::DestinationAtop => (1.0 - da, sa),
            CompositeOp::SourceIn => (da, 0.0),
            CompositeOp::DestinationIn => (0.0, sa),
            CompositeOp::SourceOut => (1.0 - da, 0.0),
            CompositeOp::DestinationOut => (0.0, 1.0 - sa),
            CompositeOp::Copy => (1.0, 0.0),
            CompositeOp::Xor => (1.0 - da, 1.0 - sa),
        }
    }
}

/// Composes `src` onto `dst` under `op`.
///
/// Straight-alpha Porter-Duff: with s = src_a/255, d = dst_a/255 and
/// factors (Fs, Fd), the output alpha is `o = s*Fs + d*Fd` and each
/// output channel is `(src*s*Fs + dst*d*Fd) / o`. A zero output alpha
/// yields transparent black. Channels are rounded once, at the end.
pub fn blend(op: CompositeOp, src: Color, dst: Color) -> Color {
    let sa = f32::from(src.alpha()) / 255.0;
    let da = f32::from(dst.alpha()) / 255.0;
    let (fs, fd) = op.factors(sa, da);

    let oa = sa * fs + da * fd;
    if oa <= 0.0 {
        return Color::TRANSPARENT;
    }

    let ws = sa * fs;
    let wd = da * fd;
    let channel = |s: u8, d: u8| -> u8 {
        let v = (f32::from(s) * ws + f32::from(d) * wd) / oa;
        // The weights keep v within 0..=255; +0.5 rounds to nearest.
        (v + 0.5) as u8
    };

    Color::from_rgba8(
        channel(src.red(), dst.red()),
        channel(src.green(), dst.green()),
        channel(src.blue(), dst.blue()),
        (oa * 255.0 + 0.5) as u8,
    )
}
