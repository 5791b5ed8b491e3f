// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

/*!
`limner` is a deterministic, CPU-only 2D rasterizer with a Canvas-style
drawing model.

Paths are recorded as command lists, flattened into polygons, then
filled or stroked into an RGBA [`Surface`] through a scanline filler
with 1-bit stencil clipping and Porter-Duff compositing. Dedicated
rasterizers handle the shapes where crisp integer algorithms beat the
general pipeline: Bresenham circles, axis-aligned rectangles, rotated
quads and thick lines.

Determinism is the point: identical input produces bit-identical pixels
on every host. There is no anti-aliasing beyond coverage thresholding,
no SIMD, no threads.
*/

#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![allow(clippy::approx_constant)]
#![allow(clippy::collapsible_if)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::excessive_precision)]
#![allow(clippy::float_cmp)]
#![allow(clippy::identity_op)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]

mod blend;
mod blitter;
mod canvas;
mod color;
mod error;
mod geom;
mod mask;
mod paint;
mod raster;
mod scan;
mod surface;

pub use limner_path::*;

pub use blend::{blend, CompositeOp};
pub use canvas::Canvas;
pub use color::{AlphaU8, Color, PackedColor, ALPHA_U8_OPAQUE, ALPHA_U8_TRANSPARENT};
pub use error::DrawError;
pub use geom::IntSize;
pub use mask::{ClipMask, CoverageMask};
pub use paint::{Paint, PaintServer};
pub use raster::{DrawOp, Rasterizer};
pub use scan::polygon::hit_test;
pub use scan::FillRule;
pub use surface::{Surface, BYTES_PER_PIXEL, MAX_AREA, MAX_DIMENSION};
