use limner::*;

const WHITE: Color = Color::WHITE;

#[test]
fn sequential_blending_is_deterministic() {
    // Scenario S6: a half-alpha blue applied twice to a white pixel.
    let src = Color::from_rgba8(0, 0, 255, 128);

    let mut canvas = Canvas::new(1, 1).unwrap();
    canvas.surface.fill(WHITE);
    canvas.set_fill_color(src);
    canvas.fill_rect(0.0, 0.0, 1.0, 1.0);
    canvas.fill_rect(0.0, 0.0, 1.0, 1.0);

    let once = blend(CompositeOp::SourceOver, src, WHITE);
    let twice = blend(CompositeOp::SourceOver, src, once);
    assert_eq!(canvas.surface.pixel(0, 0).unwrap(), twice);

    // And the formula itself is stable.
    assert_eq!(once, Color::from_rgba8(127, 127, 255, 255));
    assert_eq!(twice, Color::from_rgba8(63, 63, 255, 255));
}

#[test]
fn destination_in_clears_uncovered_pixels() {
    // Canvas-wide semantics: destination survives only where the
    // source covered it.
    let mut canvas = Canvas::new(8, 8).unwrap();
    canvas.surface.fill(WHITE);
    canvas.set_composite_op(CompositeOp::DestinationIn);
    canvas.set_fill_color(Color::from_rgba8(255, 0, 0, 255));
    canvas.fill_rect(2.0, 2.0, 4.0, 4.0);

    for y in 0..8 {
        for x in 0..8 {
            let covered = (2..6).contains(&x) && (2..6).contains(&y);
            let expect = if covered { WHITE } else { Color::TRANSPARENT };
            assert_eq!(canvas.surface.pixel(x, y).unwrap(), expect, "pixel {},{}", x, y);
        }
    }
}

#[test]
fn copy_replaces_and_clears() {
    let src = Color::from_rgba8(10, 20, 30, 40);
    let mut canvas = Canvas::new(8, 8).unwrap();
    canvas.surface.fill(WHITE);
    canvas.set_composite_op(CompositeOp::Copy);
    canvas.set_fill_color(src);
    canvas.fill_rect(2.0, 2.0, 4.0, 4.0);

    for y in 0..8 {
        for x in 0..8 {
            let covered = (2..6).contains(&x) && (2..6).contains(&y);
            let expect = if covered { src } else { Color::TRANSPARENT };
            assert_eq!(canvas.surface.pixel(x, y).unwrap(), expect, "pixel {},{}", x, y);
        }
    }
}

#[test]
fn source_atop_keeps_destination_shape() {
    // Not canvas-wide: pixels outside the source are untouched.
    let mut canvas = Canvas::new(8, 8).unwrap();
    // Destination: an opaque square in the middle.
    canvas.set_fill_color(Color::from_rgba8(0, 255, 0, 255));
    canvas.fill_rect(2.0, 2.0, 4.0, 4.0);

    canvas.set_composite_op(CompositeOp::SourceAtop);
    canvas.set_fill_color(Color::from_rgba8(255, 0, 0, 255));
    canvas.fill_rect(0.0, 0.0, 4.0, 4.0);

    // Overlap: source atop destination.
    assert_eq!(canvas.surface.pixel(3, 3).unwrap(), Color::from_rgba8(255, 0, 0, 255));
    // Source over transparent destination: nothing appears.
    assert_eq!(canvas.surface.pixel(0, 0).unwrap(), Color::TRANSPARENT);
    // Destination outside the source is untouched.
    assert_eq!(canvas.surface.pixel(5, 5).unwrap(), Color::from_rgba8(0, 255, 0, 255));
}

#[test]
fn xor_of_opaque_shapes() {
    let green = Color::from_rgba8(0, 255, 0, 255);
    let red = Color::from_rgba8(255, 0, 0, 255);

    let mut canvas = Canvas::new(8, 8).unwrap();
    canvas.set_fill_color(green);
    canvas.fill_rect(2.0, 2.0, 4.0, 4.0);

    canvas.set_composite_op(CompositeOp::Xor);
    canvas.set_fill_color(red);
    canvas.fill_rect(0.0, 0.0, 4.0, 4.0);

    // Overlap cancels; exclusive regions keep their color.
    assert_eq!(canvas.surface.pixel(3, 3).unwrap(), Color::TRANSPARENT);
    assert_eq!(canvas.surface.pixel(0, 0).unwrap(), red);
    assert_eq!(canvas.surface.pixel(5, 5).unwrap(), green);
}

#[test]
fn canvas_wide_composite_respects_clip() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    canvas.surface.fill(WHITE);
    canvas.clip(&PathBuilder::from_rect(0.0, 0.0, 4.0, 8.0), FillRule::Winding);
    canvas.set_composite_op(CompositeOp::DestinationIn);
    canvas.set_fill_color(Color::from_rgba8(255, 0, 0, 255));
    canvas.fill_rect(2.0, 2.0, 4.0, 4.0);

    // Inside the clip: destination-in semantics. Outside: untouched.
    assert_eq!(canvas.surface.pixel(3, 3).unwrap(), WHITE);
    assert_eq!(canvas.surface.pixel(0, 0).unwrap(), Color::TRANSPARENT);
    assert_eq!(canvas.surface.pixel(6, 6).unwrap(), WHITE);
    // Covered but clipped out: the coverage never formed there.
    assert_eq!(canvas.surface.pixel(5, 3).unwrap(), WHITE);
}

#[test]
fn destination_over_fills_behind() {
    let mut canvas = Canvas::new(4, 4).unwrap();
    let half_red = Color::from_rgba8(255, 0, 0, 128);
    canvas.set_fill_color(half_red);
    canvas.fill_rect(0.0, 0.0, 4.0, 4.0);

    canvas.set_composite_op(CompositeOp::DestinationOver);
    canvas.set_fill_color(WHITE);
    canvas.fill_rect(0.0, 0.0, 4.0, 4.0);

    // White behind half-red == half-red over white.
    let expect = blend(CompositeOp::SourceOver, half_red, WHITE);
    assert_eq!(canvas.surface.pixel(1, 1).unwrap(), expect);
}

#[test]
fn destination_out_erases() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    canvas.surface.fill(WHITE);
    canvas.set_composite_op(CompositeOp::DestinationOut);
    canvas.set_fill_color(Color::from_rgba8(0, 0, 0, 255));
    canvas.fill_rect(2.0, 2.0, 4.0, 4.0);

    assert_eq!(canvas.surface.pixel(3, 3).unwrap(), Color::TRANSPARENT);
    assert_eq!(canvas.surface.pixel(0, 0).unwrap(), WHITE);
}

#[test]
fn clear_rect_erases_under_any_composite() {
    let mut canvas = Canvas::new(8, 8).unwrap();
    canvas.surface.fill(WHITE);
    canvas.set_composite_op(CompositeOp::DestinationOver);
    canvas.clear_rect(2.0, 2.0, 4.0, 4.0);

    assert_eq!(canvas.surface.pixel(3, 3).unwrap(), Color::TRANSPARENT);
    // Only the rect is erased; this is not a canvas-wide operation.
    assert_eq!(canvas.surface.pixel(0, 0).unwrap(), WHITE);
}
