// Copyright 2025 Yevhenii Reizner
//
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

use limner_path::{
    flatten, NormalizedF32, Path, PathBuilder, Stroke, StrokeDash, Transform,
};

use crate::blend::CompositeOp;
use crate::color::Color;
use crate::error::DrawError;
use crate::mask::ClipMask;
use crate::paint::Paint;
use crate::raster::{DrawOp, Rasterizer};
use crate::scan::{self, FillRule};
use crate::surface::Surface;

#[derive(Clone, Debug)]
struct State {
    transform: Transform,
    clip: Option<ClipMask>,
    global_alpha: NormalizedF32,
    composite: CompositeOp,
    fill_color: Color,
    stroke_color: Color,
    stroke: Stroke,
    dash_intervals: Vec<f32>,
    dash_offset: f32,
}

impl Default for State {
    fn default() -> Self {
        State {
            transform: Transform::identity(),
            clip: None,
            global_alpha: NormalizedF32::ONE,
            composite: CompositeOp::SourceOver,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            stroke: Stroke {
                // The Canvas default, unlike the rasterizer-level 4.0.
                miter_limit: 10.0,
                ..Stroke::default()
            },
            dash_intervals: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

/// Provides a stateful, Canvas-style drawing API.
///
/// Unlike most other types, `Canvas` provides an unchecked API: a
/// drawing command is simply ignored in case of an error and the
/// caller has no way of checking it.
///
/// The drawing state (transform, clip, styles, stroke attributes) is
/// saved and restored as a stack; the clip mask is carried by value,
/// so `restore` brings back the exact stencil that was saved.
#[allow(missing_debug_implementations)]
#[derive(Clone)]
pub struct Canvas {
    /// A surface owned by the canvas.
    pub surface: Surface,

    state: State,
    saved: Vec<State>,
}

impl From<Surface> for Canvas {
    fn from(surface: Surface) -> Self {
        Canvas {
            surface,
            state: State::default(),
            saved: Vec::new(),
        }
    }
}

impl Canvas {
    /// Creates a new canvas with an owned surface.
    ///
    /// The surface is filled with transparent black.
    pub fn new(width: u32, height: u32) -> Result<Self, DrawError> {
        Ok(Canvas::from(Surface::new(width, height)?))
    }

    /// Returns canvas width.
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    /// Returns canvas height.
    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    /// Pushes a copy of the current drawing state.
    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    /// Pops the most recently saved state.
    ///
    /// Does nothing when the stack is empty.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    /// Translates the canvas.
    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.state.transform = self.state.transform.pre_translate(tx, ty);
    }

    /// Scales the canvas.
    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.state.transform = self.state.transform.pre_scale(sx, sy);
    }

    /// Rotates the canvas by an angle in radians.
    pub fn rotate(&mut self, rad: f32) {
        self.state.transform = self.state.transform.pre_rotate(rad);
    }

    /// Appends an arbitrary transform.
    pub fn transform(&mut self, sx: f32, ky: f32, kx: f32, sy: f32, tx: f32, ty: f32) {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_row(sx, ky, kx, sy, tx, ty));
    }

    /// Replaces the current transform.
    pub fn set_transform(&mut self, sx: f32, ky: f32, kx: f32, sy: f32, tx: f32, ty: f32) {
        self.state.transform = Transform::from_row(sx, ky, kx, sy, tx, ty);
    }

    /// Resets the current transform to identity.
    pub fn reset_transform(&mut self) {
        self.state.transform = Transform::identity();
    }

    /// Returns the current transform.
    pub fn get_transform(&self) -> Transform {
        self.state.transform
    }

    /// Sets the global alpha. Values outside 0..=1 are ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if let Some(alpha) = NormalizedF32::new(alpha) {
            self.state.global_alpha = alpha;
        }
    }

    /// Sets the compositing operator.
    pub fn set_composite_op(&mut self, op: CompositeOp) {
        self.state.composite = op;
    }

    /// Sets the fill color.
    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill_color = color;
    }

    /// Sets the stroke color.
    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke_color = color;
    }

    /// Sets the stroke width. Non-positive or non-finite values are
    /// ignored.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.stroke.width = width;
        }
    }

    /// Sets the stroke line cap.
    pub fn set_line_cap(&mut self, cap: limner_path::LineCap) {
        self.state.stroke.line_cap = cap;
    }

    /// Sets the stroke line join.
    pub fn set_line_join(&mut self, join: limner_path::LineJoin) {
        self.state.stroke.line_join = join;
    }

    /// Sets the miter limit. Non-positive or non-finite values are
    /// ignored.
    pub fn set_miter_limit(&mut self, limit: f32) {
        if limit.is_finite() && limit > 0.0 {
            self.state.stroke.miter_limit = limit;
        }
    }

    /// Sets the dash pattern. An empty list disables dashing;
    /// invalid lists are ignored.
    pub fn set_line_dash(&mut self, intervals: Vec<f32>) {
        if intervals.is_empty() {
            self.state.dash_intervals.clear();
            return;
        }

        if StrokeDash::new(intervals.clone(), self.state.dash_offset).is_some() {
            self.state.dash_intervals = intervals;
        }
    }

    /// Returns the current dash pattern.
    pub fn line_dash(&self) -> &[f32] {
        &self.state.dash_intervals
    }

    /// Sets the dash offset.
    pub fn set_line_dash_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.dash_offset = offset;
        }
    }

    fn build_stroke(&self) -> Stroke {
        let mut stroke = self.state.stroke.clone();
        stroke.dash = if self.state.dash_intervals.is_empty() {
            None
        } else {
            StrokeDash::new(self.state.dash_intervals.clone(), self.state.dash_offset)
        };
        stroke
    }

    // Opens an op around `f`; a failed call is dropped, leaving the
    // surface untouched.
    fn with_op(&mut self, f: impl FnOnce(&mut Rasterizer) -> Result<(), DrawError>) {
        let state = &self.state;
        let op = DrawOp {
            composite: state.composite,
            global_alpha: state.global_alpha,
            transform: state.transform,
            clip: state.clip.as_ref(),
            fill_paint: Some(Paint::Solid(state.fill_color)),
            stroke_paint: Some(Paint::Solid(state.stroke_color)),
        };

        let mut raster = Rasterizer::new(&mut self.surface);
        let result = raster
            .begin_op(op)
            .and_then(|_| f(&mut raster))
            .and_then(|_| raster.end_op());

        if let Err(err) = result {
            log::warn!("a canvas drawing call failed: {}", err);
        }
    }

    // Crisp primitives need the device grid to be a uniformly scaled,
    // unrotated copy of path space.
    fn uniform_scale(&self) -> Option<f32> {
        let ts = self.state.transform;
        if ts.is_scale_translate() && ts.sx == ts.sy && ts.sx > 0.0 {
            Some(ts.sx)
        } else {
            None
        }
    }

    /// Fills a rectangle with the current fill color.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let color = self.state.fill_color;
        self.with_op(|raster| raster.fill_rect(x, y, w, h, color));
    }

    /// Erases a rectangle to transparent black.
    pub fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.with_op(|raster| raster.clear_rect(x, y, w, h));
    }

    /// Strokes a rectangle outline with the current stroke style.
    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let color = self.state.stroke_color;
        let line_width = self.state.stroke.width;
        match self.uniform_scale() {
            Some(scale) => {
                let ts = self.state.transform;
                let (dx, dy) = (ts.tx + x * scale, ts.ty + y * scale);
                self.with_op(|raster| {
                    raster.stroke_rect_aa(dx, dy, w * scale, h * scale, line_width * scale, color)
                });
            }
            None => {
                self.with_op(|raster| raster.stroke_rect_rotated(x, y, w, h, line_width, color));
            }
        }
    }

    /// Fills and strokes a rectangle in a single pass.
    pub fn fill_and_stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let fill_color = self.state.fill_color;
        let stroke_color = self.state.stroke_color;
        let line_width = self.state.stroke.width;
        match self.uniform_scale() {
            Some(scale) => {
                let ts = self.state.transform;
                let (dx, dy) = (ts.tx + x * scale, ts.ty + y * scale);
                self.with_op(|raster| {
                    raster.fill_and_stroke_rect_aa(
                        dx,
                        dy,
                        w * scale,
                        h * scale,
                        line_width * scale,
                        fill_color,
                        stroke_color,
                    )
                });
            }
            None => {
                self.fill_rect(x, y, w, h);
                self.stroke_rect(x, y, w, h);
            }
        }
    }

    /// Strokes a single line segment with the current stroke style.
    pub fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let color = self.state.stroke_color;
        let line_width = self.state.stroke.width;
        self.with_op(|raster| raster.stroke_line(x1, y1, x2, y2, line_width, color));
    }

    /// Fills a circle with the current fill color.
    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32) {
        let color = self.state.fill_color;
        match self.uniform_scale() {
            Some(scale) => {
                let ts = self.state.transform;
                let (dx, dy) = (ts.tx + cx * scale, ts.ty + cy * scale);
                self.with_op(|raster| raster.fill_circle(dx, dy, r * scale, color));
            }
            None => {
                let mut pb = PathBuilder::new();
                pb.arc(cx, cy, r, 0.0, core::f32::consts::PI * 2.0, false);
                pb.close();
                if let Some(path) = pb.finish() {
                    self.fill_path(&path, FillRule::Winding);
                }
            }
        }
    }

    /// Strokes a circle with the current stroke style.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, r: f32) {
        let color = self.state.stroke_color;
        let line_width = self.state.stroke.width;
        match self.uniform_scale() {
            Some(scale) => {
                let ts = self.state.transform;
                let (dx, dy) = (ts.tx + cx * scale, ts.ty + cy * scale);
                self.with_op(|raster| {
                    raster.stroke_circle(dx, dy, r * scale, line_width * scale, color)
                });
            }
            None => {
                let mut pb = PathBuilder::new();
                pb.arc(cx, cy, r, 0.0, core::f32::consts::PI * 2.0, false);
                pb.close();
                if let Some(path) = pb.finish() {
                    self.stroke_path(&path);
                }
            }
        }
    }

    /// Fills a rounded rectangle with the current fill color.
    pub fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let color = self.state.fill_color;
        match self.uniform_scale() {
            Some(scale) => {
                let ts = self.state.transform;
                let (dx, dy) = (ts.tx + x * scale, ts.ty + y * scale);
                self.with_op(|raster| {
                    raster.fill_round_rect(dx, dy, w * scale, h * scale, radius * scale, color)
                });
            }
            None => {
                let mut pb = PathBuilder::new();
                pb.push_round_rect(x, y, w, h, radius);
                if let Some(path) = pb.finish() {
                    self.fill_path(&path, FillRule::Winding);
                }
            }
        }
    }

    /// Strokes a rounded rectangle with the current stroke style.
    pub fn stroke_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32) {
        let color = self.state.stroke_color;
        let line_width = self.state.stroke.width;
        match self.uniform_scale() {
            Some(scale) => {
                let ts = self.state.transform;
                let (dx, dy) = (ts.tx + x * scale, ts.ty + y * scale);
                self.with_op(|raster| {
                    raster.stroke_round_rect(
                        dx,
                        dy,
                        w * scale,
                        h * scale,
                        radius * scale,
                        line_width * scale,
                        color,
                    )
                });
            }
            None => {
                let mut pb = PathBuilder::new();
                pb.push_round_rect(x, y, w, h, radius);
                if let Some(path) = pb.finish() {
                    self.stroke_path(&path);
                }
            }
        }
    }

    /// Fills a path with the current fill color.
    pub fn fill_path(&mut self, path: &Path, fill_rule: FillRule) {
        self.with_op(|raster| raster.fill(path, fill_rule));
    }

    /// Fills a path with an explicit paint (gradient or pattern
    /// collaborators plug in here).
    pub fn fill_path_with(
        &mut self,
        path: &Path,
        paint: Paint,
        fill_rule: FillRule,
    ) -> Result<(), DrawError> {
        let state = &self.state;
        let op = DrawOp {
            composite: state.composite,
            global_alpha: state.global_alpha,
            transform: state.transform,
            clip: state.clip.as_ref(),
            fill_paint: Some(paint),
            stroke_paint: None,
        };

        let mut raster = Rasterizer::new(&mut self.surface);
        raster.begin_op(op)?;
        raster.fill(path, fill_rule)?;
        raster.end_op()
    }

    /// Strokes a path with the current stroke style.
    pub fn stroke_path(&mut self, path: &Path) {
        let stroke = self.build_stroke();
        self.with_op(|raster| raster.stroke(path, &stroke));
    }

    /// Intersects the current clip with a path region.
    ///
    /// The clip only ever shrinks within a save/restore scope.
    pub fn clip(&mut self, path: &Path, fill_rule: FillRule) {
        let state = &self.state;
        let op = DrawOp {
            composite: state.composite,
            global_alpha: state.global_alpha,
            transform: state.transform,
            clip: state.clip.as_ref(),
            fill_paint: None,
            stroke_paint: None,
        };

        let mut raster = Rasterizer::new(&mut self.surface);
        let mask = raster
            .begin_op(op)
            .and_then(|_| raster.clip(path, fill_rule))
            .and_then(|mask| raster.end_op().map(|_| mask));

        match mask {
            Ok(mask) => self.state.clip = Some(mask),
            Err(err) => log::warn!("a clip call failed: {}", err),
        }
    }

    /// Checks whether a device-space point is inside a path under the
    /// current transform.
    ///
    /// The test is edge-inclusive.
    pub fn is_point_in_path(&self, path: &Path, x: f32, y: f32, fill_rule: FillRule) -> bool {
        let mut polygons = flatten(path);
        for polygon in &mut polygons {
            self.state.transform.map_points(&mut polygon.points);
        }

        scan::polygon::hit_test(&polygons, x, y, fill_rule)
    }
}
