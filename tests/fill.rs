use limner::*;

fn assert_pixels<F: Fn(u32, u32) -> Color>(surface: &Surface, expected: F) {
    for y in 0..surface.height() {
        for x in 0..surface.width() {
            assert_eq!(
                surface.pixel(x, y).unwrap(),
                expected(x, y),
                "pixel {},{}",
                x,
                y
            );
        }
    }
}

#[test]
fn opaque_rect_fill() {
    // Scenario S1: surface 10x10, fill rect (2,3,4,2) with opaque red.
    let mut canvas = Canvas::new(10, 10).unwrap();
    let red = Color::from_rgba8(255, 0, 0, 255);
    canvas.set_fill_color(red);
    canvas.fill_rect(2.0, 3.0, 4.0, 2.0);

    assert_pixels(&canvas.surface, |x, y| {
        if (2..6).contains(&x) && (3..5).contains(&y) {
            red
        } else {
            Color::TRANSPARENT
        }
    });
}

#[test]
fn even_odd_donut() {
    // Scenario S2: outer rect + inner rect under the even-odd rule.
    let mut canvas = Canvas::new(20, 20).unwrap();
    canvas.surface.fill(Color::WHITE);

    let mut pb = PathBuilder::new();
    pb.push_rect(2.0, 2.0, 16.0, 16.0);
    pb.push_rect(6.0, 6.0, 8.0, 8.0);
    let path = pb.finish().unwrap();

    canvas.set_fill_color(Color::BLACK);
    canvas.fill_path(&path, FillRule::EvenOdd);

    assert_pixels(&canvas.surface, |x, y| {
        let in_outer = (2..18).contains(&x) && (2..18).contains(&y);
        let in_inner = (6..14).contains(&x) && (6..14).contains(&y);
        if in_outer && !in_inner {
            Color::BLACK
        } else {
            Color::WHITE
        }
    });
}

#[test]
fn winding_rule_sees_no_hole_in_same_direction_rings() {
    let mut canvas = Canvas::new(20, 20).unwrap();

    let mut pb = PathBuilder::new();
    pb.push_rect(2.0, 2.0, 16.0, 16.0);
    pb.push_rect(6.0, 6.0, 8.0, 8.0);
    let path = pb.finish().unwrap();

    canvas.set_fill_color(Color::BLACK);
    canvas.fill_path(&path, FillRule::Winding);

    // Both rects wind the same way, so nonzero keeps the middle.
    assert_eq!(canvas.surface.pixel(10, 10).unwrap(), Color::BLACK);
    assert_eq!(canvas.surface.pixel(2, 2).unwrap(), Color::BLACK);
    assert_eq!(canvas.surface.pixel(1, 1).unwrap(), Color::TRANSPARENT);
}

#[test]
fn horizontal_line_fills_nothing() {
    let mut canvas = Canvas::new(20, 20).unwrap();

    let mut pb = PathBuilder::new();
    pb.move_to(2.0, 10.0);
    pb.line_to(18.0, 10.0);
    pb.close();
    let path = pb.finish().unwrap();

    canvas.set_fill_color(Color::BLACK);
    canvas.fill_path(&path, FillRule::Winding);

    assert!(canvas.surface.data().iter().all(|b| *b == 0));
}

#[test]
fn collinear_vertex_on_edge_changes_nothing() {
    // A redundant vertex in the middle of the left edge must not
    // disturb the crossing parity on any scanline.
    let mut reference = Canvas::new(12, 12).unwrap();
    reference.set_fill_color(Color::BLACK);
    reference.fill_path(&PathBuilder::from_rect(2.0, 2.0, 6.0, 6.0), FillRule::Winding);

    let mut canvas = Canvas::new(12, 12).unwrap();
    let mut pb = PathBuilder::new();
    pb.move_to(2.0, 2.0);
    pb.line_to(8.0, 2.0);
    pb.line_to(8.0, 8.0);
    pb.line_to(2.0, 8.0);
    pb.line_to(2.0, 5.0);
    pb.close();
    canvas.set_fill_color(Color::BLACK);
    canvas.fill_path(&pb.finish().unwrap(), FillRule::Winding);

    assert_eq!(canvas.surface.data(), reference.surface.data());
}

#[test]
fn global_alpha_zero_is_invisible() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    canvas.surface.fill(Color::WHITE);
    canvas.set_global_alpha(0.0);
    canvas.set_fill_color(Color::BLACK);
    canvas.fill_rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill_path(&PathBuilder::from_rect(1.0, 1.0, 5.0, 5.0), FillRule::Winding);

    assert_pixels(&canvas.surface, |_, _| Color::WHITE);
}

#[test]
fn translucent_fill_blends_every_inside_pixel_once() {
    let mut canvas = Canvas::new(10, 10).unwrap();
    canvas.surface.fill(Color::WHITE);
    canvas.set_fill_color(Color::from_rgba8(255, 0, 0, 128));
    canvas.fill_rect(2.0, 2.0, 6.0, 6.0);

    let blended = Color::from_rgba8(255, 127, 127, 255);
    assert_pixels(&canvas.surface, |x, y| {
        if (2..8).contains(&x) && (2..8).contains(&y) {
            blended
        } else {
            Color::WHITE
        }
    });
}

#[test]
fn transformed_fill_goes_through_the_polygon_filler() {
    // Rotate a square by 90 degrees around its center: the pixel
    // footprint must be identical to the unrotated fill.
    let mut reference = Canvas::new(20, 20).unwrap();
    reference.set_fill_color(Color::BLACK);
    reference.fill_rect(5.0, 5.0, 10.0, 10.0);

    let mut canvas = Canvas::new(20, 20).unwrap();
    canvas.set_fill_color(Color::BLACK);
    // A full-canvas clip forces fill_rect off the dedicated
    // axis-aligned rasterizer and into the polygon filler.
    canvas.clip(&PathBuilder::from_rect(0.0, 0.0, 20.0, 20.0), FillRule::Winding);
    // A point reflection around (10, 10): exact in floats.
    canvas.set_transform(-1.0, 0.0, 0.0, -1.0, 20.0, 20.0);
    canvas.fill_rect(5.0, 5.0, 10.0, 10.0);

    assert_eq!(canvas.surface.data(), reference.surface.data());
}

struct ConstantPaint(Color);

impl PaintServer for ConstantPaint {
    fn evaluate(&self, _: f32, _: f32, _: &Transform) -> Color {
        self.0
    }
}

#[test]
fn shader_path_matches_direct_path() {
    // The same geometry through the pre-packed direct path and the
    // per-pixel shader path must produce byte-identical output.
    let red = Color::from_rgba8(255, 0, 0, 255);

    let mut direct = Canvas::new(30, 30).unwrap();
    direct.set_fill_color(red);
    direct.fill_path(&PathBuilder::from_rect(3.0, 4.0, 17.0, 11.0), FillRule::Winding);

    let mut shaded = Canvas::new(30, 30).unwrap();
    let server = ConstantPaint(red);
    shaded
        .fill_path_with(
            &PathBuilder::from_rect(3.0, 4.0, 17.0, 11.0),
            Paint::Gradient(&server),
            FillRule::Winding,
        )
        .unwrap();

    assert_eq!(direct.surface.data(), shaded.surface.data());
}

#[test]
fn gradient_paint_is_evaluated_per_pixel() {
    struct Ramp;
    impl PaintServer for Ramp {
        fn evaluate(&self, x: f32, _: f32, _: &Transform) -> Color {
            Color::from_rgba8((x as u8).wrapping_mul(10), 0, 0, 255)
        }
    }

    let mut canvas = Canvas::new(10, 10).unwrap();
    let server = Ramp;
    canvas
        .fill_path_with(
            &PathBuilder::from_rect(0.0, 0.0, 10.0, 1.0),
            Paint::Gradient(&server),
            FillRule::Winding,
        )
        .unwrap();

    assert_eq!(canvas.surface.pixel(0, 0).unwrap(), Color::from_rgba8(0, 0, 0, 255));
    assert_eq!(canvas.surface.pixel(3, 0).unwrap(), Color::from_rgba8(30, 0, 0, 255));
    assert_eq!(canvas.surface.pixel(9, 0).unwrap(), Color::from_rgba8(90, 0, 0, 255));
}
