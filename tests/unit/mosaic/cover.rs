use super::*;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> SourceImage {
    SourceImage::from_rgba_image(image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))).unwrap()
}

fn assert_near(actual: [u8; 4], expected: [u8; 4]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!(a.abs_diff(e) <= 2, "{actual:?} != {expected:?}");
    }
}

#[test]
fn placement_fills_and_centers() {
    let canvas = Canvas::new(100, 100).unwrap();
    let p = cover_placement(200, 100, canvas);
    assert_eq!(p.scale, 1.0);
    assert_eq!(p.offset_x, -50.0);
    assert_eq!(p.offset_y, 0.0);

    let p = cover_placement(10, 40, canvas);
    assert_eq!(p.scale, 10.0);
    assert_eq!(p.offset_x, 0.0);
    assert_eq!(p.offset_y, -150.0);
}

#[test]
fn background_depends_only_on_invert() {
    assert_eq!(cover_background(false), Rgb8::BLACK);
    assert_eq!(cover_background(true), Rgb8::WHITE);
}

#[test]
fn solid_source_covers_canvas() {
    let canvas = Canvas::new(16, 8).unwrap();
    let cover = build_cover(&solid(2, 2, [200, 40, 10, 255]), canvas, false).unwrap();
    assert_near(cover.pixel(8, 4), [200, 40, 10, 255]);
    assert_near(cover.pixel(1, 1), [200, 40, 10, 255]);
}

#[test]
fn invert_flips_colors() {
    let canvas = Canvas::new(8, 8).unwrap();
    let cover = build_cover(&solid(4, 4, [200, 40, 10, 255]), canvas, true).unwrap();
    assert_near(cover.pixel(4, 4), [55, 215, 245, 255]);
}

#[test]
fn transparent_source_shows_background() {
    let canvas = Canvas::new(8, 8).unwrap();
    let src = solid(4, 4, [0, 0, 0, 0]);
    assert_near(
        build_cover(&src, canvas, false).unwrap().pixel(4, 4),
        [0, 0, 0, 255],
    );
    assert_near(
        build_cover(&src, canvas, true).unwrap().pixel(4, 4),
        [255, 255, 255, 255],
    );
}
