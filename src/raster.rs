// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use std::collections::HashSet;

use limner_path::{
    flatten, stroke_polygons, NormalizedF32, Path, PathBuilder, Point, Polygon, Stroke, Transform,
};

use crate::blend::{blend, CompositeOp};
use crate::blitter::{fold_alpha, MaskBlitter, SurfaceBlitter};
use crate::color::Color;
use crate::error::DrawError;
use crate::mask::{ClipMask, CoverageMask};
use crate::paint::Paint;
use crate::scan::{self, FillRule};
use crate::surface::Surface;

/// Parameters of a single drawing operation.
#[derive(Clone, Copy, Debug)]
pub struct DrawOp<'a> {
    /// The compositing operator.
    pub composite: CompositeOp,
    /// Opacity applied on top of every paint's own alpha.
    pub global_alpha: NormalizedF32,
    /// Path-space to device-space transform.
    pub transform: Transform,
    /// The active clip, if any. Must match the surface dimensions.
    pub clip: Option<&'a ClipMask>,
    /// The paint used by `fill` operations.
    pub fill_paint: Option<Paint<'a>>,
    /// The paint used by `stroke` operations.
    pub stroke_paint: Option<Paint<'a>>,
}

impl Default for DrawOp<'_> {
    fn default() -> Self {
        DrawOp {
            composite: CompositeOp::default(),
            global_alpha: NormalizedF32::ONE,
            transform: Transform::identity(),
            clip: None,
            fill_paint: None,
            stroke_paint: None,
        }
    }
}

struct OpState<'a> {
    params: DrawOp<'a>,
    // Present while a canvas-wide operator collects source coverage.
    coverage: Option<CoverageMask>,
    // The paint (and its folded opacity) the composition pass will use.
    pending: Option<(Paint<'a>, f32)>,
}

/// The drawing facade over a [`Surface`].
///
/// Every drawing call is bracketed by [`begin_op`](Self::begin_op) and
/// [`end_op`](Self::end_op). For ordinary operators the draw happens
/// immediately; for canvas-wide operators the draw only records source
/// coverage and `end_op` runs the composition pass over the whole
/// surface.
#[allow(missing_debug_implementations)]
pub struct Rasterizer<'a> {
    surface: &'a mut Surface,
    op: Option<OpState<'a>>,
}

impl<'a> Rasterizer<'a> {
    /// Creates a rasterizer over a surface.
    pub fn new(surface: &'a mut Surface) -> Self {
        Rasterizer { surface, op: None }
    }

    /// Opens a drawing operation.
    ///
    /// An operation left open by a previous `begin_op` is discarded.
    pub fn begin_op(&mut self, params: DrawOp<'a>) -> Result<(), DrawError> {
        if let Some(clip) = params.clip {
            debug_assert!(
                clip.width() == self.surface.width() && clip.height() == self.surface.height()
            );
        }

        // Surface dimensions are already validated, so the coverage
        // allocation cannot fail.
        let coverage = if params.composite.is_canvas_wide() {
            CoverageMask::new(self.surface.width(), self.surface.height())
        } else {
            None
        };

        self.op = Some(OpState {
            params,
            coverage,
            pending: None,
        });
        Ok(())
    }

    /// Closes the current drawing operation.
    ///
    /// For canvas-wide operators this is where destination pixels are
    /// composed against the recorded coverage; the mask is read-only
    /// for the duration of the pass.
    pub fn end_op(&mut self) -> Result<(), DrawError> {
        let state = self.op.take().ok_or(DrawError::MissingBeginOp)?;

        if let (Some(coverage), Some((paint, alpha_scale))) = (state.coverage, state.pending) {
            self.compose_coverage(&coverage, paint, alpha_scale, &state.params);
        }

        Ok(())
    }

    fn params(&self) -> Result<DrawOp<'a>, DrawError> {
        self.op
            .as_ref()
            .map(|state| state.params)
            .ok_or(DrawError::MissingBeginOp)
    }

    // Gradients and patterns evaluate through the inverse transform,
    // so a draw with a non-solid paint under a degenerate transform
    // must fail up front.
    fn check_paint(&self, paint: &Paint) -> Result<(), DrawError> {
        if paint.is_solid() {
            return Ok(());
        }

        let params = self.params()?;
        if params.transform.invert().is_none() {
            return Err(DrawError::NonInvertibleTransform);
        }

        Ok(())
    }

    /// Fills a path under a fill rule with the op's fill paint.
    pub fn fill(&mut self, path: &Path, fill_rule: FillRule) -> Result<(), DrawError> {
        let paint = self
            .params()?
            .fill_paint
            .ok_or(DrawError::InvalidPaintSource)?;
        self.check_paint(&paint)?;

        let polygons = flatten(path);
        self.fill_polygons_with(&polygons, fill_rule, paint, 1.0);
        Ok(())
    }

    /// Fills pre-flattened polygons with the op's fill paint.
    pub fn fill_polygons(
        &mut self,
        polygons: &[Polygon],
        fill_rule: FillRule,
    ) -> Result<(), DrawError> {
        let paint = self
            .params()?
            .fill_paint
            .ok_or(DrawError::InvalidPaintSource)?;
        self.check_paint(&paint)?;

        self.fill_polygons_with(polygons, fill_rule, paint, 1.0);
        Ok(())
    }

    /// Strokes a path with the op's stroke paint.
    ///
    /// Widths below one pixel render at one pixel with the coverage
    /// folded into the alpha channel as sub-pixel opacity.
    pub fn stroke(&mut self, path: &Path, stroke: &Stroke) -> Result<(), DrawError> {
        let paint = self
            .params()?
            .stroke_paint
            .ok_or(DrawError::InvalidPaintSource)?;
        self.check_paint(&paint)?;

        if !(stroke.width > 0.0) {
            return Ok(());
        }

        let (effective, sub_pixel_opacity) = if stroke.width < 1.0 {
            let mut s = stroke.clone();
            s.width = 1.0;
            (s, stroke.width)
        } else {
            (stroke.clone(), 1.0)
        };

        let polygons = flatten(path);
        let stroke_polys = stroke_polygons(&polygons, &effective);
        self.fill_polygons_with(&stroke_polys, FillRule::Winding, paint, sub_pixel_opacity);
        Ok(())
    }

    fn fill_polygons_with(
        &mut self,
        polygons: &[Polygon],
        fill_rule: FillRule,
        paint: Paint<'a>,
        sub_pixel_opacity: f32,
    ) {
        if sub_pixel_opacity <= 0.0 {
            return;
        }

        let width = self.surface.width();
        let height = self.surface.height();
        let state = match self.op.as_mut() {
            Some(state) => state,
            None => return,
        };
        let params = state.params;
        let alpha_scale = params.global_alpha.get() * sub_pixel_opacity;

        if state.coverage.is_some() {
            state.pending = Some((paint, alpha_scale));
        }

        let mut blitter = SurfaceBlitter::from_paint(
            self.surface,
            params.clip,
            state.coverage.as_mut(),
            paint,
            params.transform,
            alpha_scale,
            params.composite,
        );
        scan::polygon::fill_polygons(
            polygons,
            fill_rule,
            params.transform,
            width,
            height,
            &mut blitter,
        );
    }

    // A solid-color blitter for the primitive rasterizers, with the
    // op's global alpha (and any sub-pixel opacity) folded in.
    fn color_blitter(
        &mut self,
        color: Color,
        sub_pixel_opacity: f32,
    ) -> Result<SurfaceBlitter<'_>, DrawError> {
        let state = self.op.as_mut().ok_or(DrawError::MissingBeginOp)?;
        let params = state.params;
        let alpha_scale = params.global_alpha.get() * sub_pixel_opacity;
        let color = fold_alpha(color, alpha_scale);

        if state.coverage.is_some() {
            state.pending = Some((Paint::Solid(color), 1.0));
        }

        Ok(SurfaceBlitter::from_color(
            self.surface,
            params.clip,
            state.coverage.as_mut(),
            color,
            params.composite,
        ))
    }

    /// Fills a rectangle with a color.
    ///
    /// Routed to the dedicated axis-aligned rasterizer when the
    /// transform preserves the axes and no clip is installed; otherwise
    /// the rectangle goes through the polygon filler.
    pub fn fill_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        let params = self.params()?;
        if !(w.abs() > 0.0) || !(h.abs() > 0.0) {
            return Ok(());
        }

        if params.transform.is_scale_translate() && params.clip.is_none() {
            let p0 = params.transform.map_point(Point::from_xy(x, y));
            let p1 = params.transform.map_point(Point::from_xy(x + w, y + h));
            let mut blitter = self.color_blitter(color, 1.0)?;
            scan::rect::fill_rect(&mut blitter, p0.x, p0.y, p1.x - p0.x, p1.y - p0.y);
        } else {
            let polygon = Polygon::from_points(vec![
                Point::from_xy(x, y),
                Point::from_xy(x + w, y),
                Point::from_xy(x + w, y + h),
                Point::from_xy(x, y + h),
            ]);
            self.fill_polygons_with(
                &[polygon],
                FillRule::Winding,
                Paint::Solid(color),
                1.0,
            );
        }

        Ok(())
    }

    /// Fills a circle (device-space center and radius).
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) -> Result<(), DrawError> {
        self.params()?;
        if !(r > 0.0) {
            return Ok(());
        }

        let mut blitter = self.color_blitter(color, 1.0)?;
        scan::circle::fill_circle(&mut blitter, cx, cy, r);
        Ok(())
    }

    /// Strokes a circle (device-space center and radius).
    ///
    /// Widths up to one pixel use the Bresenham ring; wider strokes
    /// rasterize the annulus.
    pub fn stroke_circle(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        line_width: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        if !(line_width > 0.0) || !(r > 0.0) {
            self.params()?;
            return Ok(());
        }

        if line_width <= 1.0 {
            let mut blitter = self.color_blitter(color, line_width.min(1.0))?;
            scan::circle::stroke_circle(&mut blitter, cx, cy, r);
        } else {
            let mut blitter = self.color_blitter(color, 1.0)?;
            scan::circle::stroke_circle_thick(&mut blitter, cx, cy, r, line_width);
        }

        Ok(())
    }

    /// Fills an axis-aligned rectangle (device space) through the
    /// dedicated rasterizer.
    pub fn fill_rect_aa(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        self.params()?;
        if !(w.abs() > 0.0) || !(h.abs() > 0.0) {
            return Ok(());
        }

        let mut blitter = self.color_blitter(color, 1.0)?;
        scan::rect::fill_rect(&mut blitter, x, y, w, h);
        Ok(())
    }

    /// Strokes an axis-aligned rectangle (device space).
    pub fn stroke_rect_aa(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        line_width: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        self.params()?;
        if !(line_width > 0.0) || !(w.abs() > 0.0) || !(h.abs() > 0.0) {
            return Ok(());
        }

        if line_width <= 1.0 {
            let mut blitter = self.color_blitter(color, line_width)?;
            scan::rect::stroke_rect(&mut blitter, x, y, w, h);
        } else {
            let mut blitter = self.color_blitter(color, 1.0)?;
            scan::rect::stroke_rect_thick(&mut blitter, x, y, w, h, line_width);
        }

        Ok(())
    }

    /// Fills and strokes an axis-aligned rectangle in one pass.
    ///
    /// With an opaque stroke the fill stops at the stroke band's inner
    /// edge, so the overlap is written exactly once. With a translucent
    /// stroke the fill runs to the full rectangle extent and the stroke
    /// blends over it, so no seam shows where fill meets stroke.
    pub fn fill_and_stroke_rect_aa(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        line_width: f32,
        fill_color: Color,
        stroke_color: Color,
    ) -> Result<(), DrawError> {
        let (x, y, w, h) = scan::rect::normalize(x, y, w, h);
        if !(line_width > 0.0) {
            return self.fill_rect_aa(x, y, w, h, fill_color);
        }

        let folded_stroke = {
            let params = self.params()?;
            fold_alpha(stroke_color, params.global_alpha.get())
        };

        if folded_stroke.is_opaque() {
            let (_, inner) = scan::rect::stroke_band_extents(x, y, w, h, line_width);
            if let Some(inner) = inner {
                let mut blitter = self.color_blitter(fill_color, 1.0)?;
                scan::rect::fill_extent_rows(&mut blitter, inner);
            }
        } else {
            self.fill_rect_aa(x, y, w, h, fill_color)?;
        }

        self.stroke_rect_aa(x, y, w, h, line_width, stroke_color)
    }

    /// Strokes a line of the given width under the op's transform.
    ///
    /// The thick-line quadrilateral is built in path space, so the
    /// stroke transforms with the geometry.
    pub fn stroke_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        line_width: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        let params = self.params()?;
        if !(line_width > 0.0) {
            return Ok(());
        }

        let (line_width, sub_pixel_opacity) = if line_width < 1.0 {
            (1.0, line_width)
        } else {
            (line_width, 1.0)
        };

        let mut quad = scan::quad::thick_line_quad(
            Point::from_xy(x1, y1),
            Point::from_xy(x2, y2),
            line_width * 0.5,
        );
        for p in &mut quad {
            *p = params.transform.map_point(*p);
        }

        let mut blitter = self.color_blitter(color, sub_pixel_opacity)?;
        scan::quad::fill_quad(&mut blitter, &quad, None);
        Ok(())
    }

    /// Strokes a rectangle under an arbitrary transform: four thick
    /// edge quads, each extended by the half-width so the corners stay
    /// covered.
    ///
    /// Translucent strokes share a dedup set across the quads, so the
    /// corner overlaps blend exactly once.
    pub fn stroke_rect_rotated(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        line_width: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        let params = self.params()?;
        if !(line_width > 0.0) {
            return Ok(());
        }

        let (line_width, sub_pixel_opacity) = if line_width < 1.0 {
            (1.0, line_width)
        } else {
            (line_width, 1.0)
        };
        let hw = line_width * 0.5;

        let corners = [
            Point::from_xy(x, y),
            Point::from_xy(x + w, y),
            Point::from_xy(x + w, y + h),
            Point::from_xy(x, y + h),
        ];

        let mut quads = Vec::with_capacity(4);
        for i in 0..4 {
            let p1 = corners[i];
            let p2 = corners[(i + 1) % 4];
            let tangent = match (p2 - p1).normalized() {
                Some(t) => t,
                None => continue,
            };

            let ext = tangent.scaled(hw);
            let mut quad =
                scan::quad::thick_line_quad(p1 - ext, p2 + ext, hw);
            for p in &mut quad {
                *p = params.transform.map_point(*p);
            }
            quads.push(quad);
        }

        let mut blitter = self.color_blitter(color, sub_pixel_opacity)?;
        if blitter.is_direct() {
            for quad in &quads {
                scan::quad::fill_quad(&mut blitter, quad, None);
            }
        } else {
            let mut seen = HashSet::new();
            for quad in &quads {
                scan::quad::fill_quad(&mut blitter, quad, Some(&mut seen));
            }
        }

        Ok(())
    }

    /// Fills a rounded rectangle (device space).
    pub fn fill_round_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        self.params()?;
        if !(w.abs() > 0.0) || !(h.abs() > 0.0) {
            return Ok(());
        }

        let mut blitter = self.color_blitter(color, 1.0)?;
        scan::rect::fill_round_rect(&mut blitter, x, y, w, h, radius);
        Ok(())
    }

    /// Strokes a rounded rectangle (device space).
    ///
    /// Hairline widths use the crisp edge-run plus quarter-ring
    /// rasterizer; wider strokes go through the stroke generator.
    pub fn stroke_round_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        line_width: f32,
        color: Color,
    ) -> Result<(), DrawError> {
        self.params()?;
        if !(line_width > 0.0) || !(w > 0.0) || !(h > 0.0) {
            return Ok(());
        }

        if line_width <= 1.0 {
            let mut blitter = self.color_blitter(color, line_width)?;
            scan::rect::stroke_round_rect(&mut blitter, x, y, w, h, radius);
            return Ok(());
        }

        let radius = radius.min(w * 0.5).min(h * 0.5);
        let path = round_rect_path(x, y, w, h, radius);
        let stroke = Stroke {
            width: line_width,
            ..Stroke::default()
        };
        let polygons = flatten(&path);
        let stroke_polys = stroke_polygons(&polygons, &stroke);
        self.fill_polygons_with(&stroke_polys, FillRule::Winding, Paint::Solid(color), 1.0);
        Ok(())
    }

    /// Writes transparent black over a rectangle, ignoring the op's
    /// compositing operator and paints.
    ///
    /// The clip still applies. This is the `clearRect` primitive: a
    /// plain erase, not a canvas-wide composition.
    pub fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) -> Result<(), DrawError> {
        let params = self.params()?;

        // A dedicated blitter: per-pixel Copy of transparent black.
        let mut blitter = SurfaceBlitter::from_color(
            self.surface,
            params.clip,
            None,
            Color::TRANSPARENT,
            CompositeOp::Copy,
        );

        if params.transform.is_scale_translate() {
            let p0 = params.transform.map_point(Point::from_xy(x, y));
            let p1 = params.transform.map_point(Point::from_xy(x + w, y + h));
            scan::rect::fill_rect(&mut blitter, p0.x, p0.y, p1.x - p0.x, p1.y - p0.y);
        } else {
            let mut quad = [
                Point::from_xy(x, y),
                Point::from_xy(x + w, y),
                Point::from_xy(x + w, y + h),
                Point::from_xy(x, y + h),
            ];
            for p in &mut quad {
                *p = params.transform.map_point(*p);
            }
            scan::quad::fill_quad(&mut blitter, &quad, None);
        }

        Ok(())
    }

    /// Intersects the current clip with a path region.
    ///
    /// The path is filled into a zeroed scratch stencil, which is then
    /// ANDed with the op's clip. The returned mask is always a subset
    /// of the previous one; the caller owns it.
    pub fn clip(&mut self, path: &Path, fill_rule: FillRule) -> Result<ClipMask, DrawError> {
        let params = self.params()?;
        let width = self.surface.width();
        let height = self.surface.height();

        // Surface dimensions are validated, so the mask always fits.
        let mut scratch =
            ClipMask::new_empty(width, height).ok_or(DrawError::InvalidSurfaceDimensions)?;

        let polygons = flatten(path);
        {
            let mut blitter = MaskBlitter::new(&mut scratch);
            scan::polygon::fill_polygons(
                &polygons,
                fill_rule,
                params.transform,
                width,
                height,
                &mut blitter,
            );
        }

        if let Some(prev) = params.clip {
            scratch.intersect(prev);
        }

        Ok(scratch)
    }

    // The composition pass for canvas-wide operators. Walks every
    // surface pixel: covered ones read the paint, uncovered ones read
    // transparent black, and the operator decides what survives.
    fn compose_coverage(
        &mut self,
        coverage: &CoverageMask,
        paint: Paint,
        alpha_scale: f32,
        params: &DrawOp,
    ) {
        for y in 0..self.surface.height() {
            for x in 0..self.surface.width() {
                if let Some(clip) = params.clip {
                    if !clip.test(x, y) {
                        continue;
                    }
                }

                let src = if coverage.get(x, y) {
                    fold_alpha(
                        paint.evaluate(x as f32, y as f32, &params.transform),
                        alpha_scale,
                    )
                } else {
                    Color::TRANSPARENT
                };

                let idx = self.surface.pixel_index(x, y);
                let dst = self.surface.get(idx);
                self.surface.set(idx, blend(params.composite, src, dst));
            }
        }
    }
}

fn round_rect_path(x: f32, y: f32, w: f32, h: f32, r: f32) -> Path {
    let mut pb = PathBuilder::new();
    pb.push_round_rect(x, y, w, h, r);
    // The recording is never empty: w, h and r are validated by the
    // caller.
    pb.finish().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_outside_op_fails() {
        let mut surface = Surface::new(8, 8).unwrap();
        let mut raster = Rasterizer::new(&mut surface);

        let err = raster.fill_rect(0.0, 0.0, 4.0, 4.0, Color::BLACK).unwrap_err();
        assert_eq!(err, DrawError::MissingBeginOp);
        assert_eq!(raster.end_op().unwrap_err(), DrawError::MissingBeginOp);
    }

    #[test]
    fn fill_without_fill_paint_fails() {
        let mut surface = Surface::new(8, 8).unwrap();
        let mut raster = Rasterizer::new(&mut surface);
        raster.begin_op(DrawOp::default()).unwrap();

        let path = PathBuilder::from_rect(1.0, 1.0, 4.0, 4.0);
        assert_eq!(
            raster.fill(&path, FillRule::Winding).unwrap_err(),
            DrawError::InvalidPaintSource
        );

        raster.end_op().unwrap();
        // The surface stays untouched after the failed call.
        assert!(surface.data().iter().all(|b| *b == 0));
    }

    struct FlatGreen;

    impl crate::paint::PaintServer for FlatGreen {
        fn evaluate(&self, _: f32, _: f32, _: &Transform) -> Color {
            Color::from_rgba8(0, 255, 0, 255)
        }
    }

    #[test]
    fn gradient_under_degenerate_transform_fails() {
        let mut surface = Surface::new(8, 8).unwrap();
        let mut raster = Rasterizer::new(&mut surface);

        let server = FlatGreen;
        raster
            .begin_op(DrawOp {
                transform: Transform::from_scale(0.0, 0.0),
                fill_paint: Some(Paint::Gradient(&server)),
                ..DrawOp::default()
            })
            .unwrap();

        let path = PathBuilder::from_rect(1.0, 1.0, 4.0, 4.0);
        assert_eq!(
            raster.fill(&path, FillRule::Winding).unwrap_err(),
            DrawError::NonInvertibleTransform
        );
    }

    #[test]
    fn clip_install_intersects() {
        let mut surface = Surface::new(20, 20).unwrap();

        let first = {
            let mut raster = Rasterizer::new(&mut surface);
            raster.begin_op(DrawOp::default()).unwrap();
            let mask = raster
                .clip(&PathBuilder::from_rect(2.0, 2.0, 10.0, 10.0), FillRule::Winding)
                .unwrap();
            raster.end_op().unwrap();
            mask
        };

        let second = {
            let mut raster = Rasterizer::new(&mut surface);
            raster
                .begin_op(DrawOp {
                    clip: Some(&first),
                    ..DrawOp::default()
                })
                .unwrap();
            let mask = raster
                .clip(&PathBuilder::from_rect(6.0, 6.0, 10.0, 10.0), FillRule::Winding)
                .unwrap();
            raster.end_op().unwrap();
            mask
        };

        for y in 0..20 {
            for x in 0..20 {
                let expect = x >= 6 && x < 12 && y >= 6 && y < 12;
                assert_eq!(second.test(x, y), expect, "pixel {},{}", x, y);
            }
        }
    }
}
