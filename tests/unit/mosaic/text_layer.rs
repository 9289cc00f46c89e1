use super::*;
use crate::mosaic::grid::Cell;

fn cell(x: u32, y: u32, glyph: char, brightness: f32) -> Cell {
    Cell {
        x,
        y,
        glyph,
        brightness,
    }
}

#[test]
fn red_full_brightness_half_opacity() {
    let settings = Settings {
        text_color: "#ff0000".to_string(),
        text_opacity: 0.5,
        font_size: 10,
        ..Settings::default()
    };
    let p = glyph_paint(1.0, &settings, settings.text_rgb());
    assert_eq!(p.rgb, Rgb8::new(255, 0, 0));
    assert_eq!(p.alpha, 0.5);
    assert_eq!(p.size, 10.0);
}

#[test]
fn dim_cells_are_smaller_and_fainter() {
    let settings = Settings {
        text_opacity: 1.0,
        font_size: 20,
        ..Settings::default()
    };
    let p = glyph_paint(0.2, &settings, Rgb8::WHITE);
    assert!((p.size - 12.0).abs() < 1e-4);
    assert!((p.alpha - 0.3).abs() < 1e-6);
}

#[test]
fn malformed_text_color_paints_white() {
    let settings = Settings {
        text_color: "not-a-color".to_string(),
        ..Settings::default()
    };
    assert_eq!(glyph_paint(1.0, &settings, settings.text_rgb()).rgb, Rgb8::WHITE);
}

#[test]
fn glyph_svg_centers_and_escapes_markup() {
    let svg = glyph_svg('<', 7.5, 18, 9.5, "Courier \"New\"");
    assert!(svg.contains(r#"width="18" height="18""#));
    assert!(svg.contains(r#"x="9.5" y="9.5""#));
    assert!(svg.contains(r#"font-size="7.5""#));
    assert!(svg.contains(">&lt;</text>"));
    assert!(svg.contains("Courier &quot;New&quot;"));
}

#[test]
fn mask_box_fits_the_glyph_em() {
    assert_eq!(quantize_size(10.0), 40);
    assert_eq!(quantize_size(7.3), 29);
    assert_eq!(mask_side(40), 22);
    assert_eq!(mask_side(29), 18);
}

#[test]
fn render_without_fonts_is_background_only() {
    let grid = CharGrid::from_cells(vec![cell(0, 0, 'A', 1.0)], 4).unwrap();
    let settings = Settings {
        grid_size: 4,
        background_color: "#204060".to_string(),
        ..Settings::default()
    };
    let canvas = Canvas::new(8, 8).unwrap();
    let mut layer = TextLayer::build(&grid, &settings, canvas, FontBook::empty()).unwrap();
    assert_eq!(layer.regenerations(), 1);
    assert_eq!(layer.surface().pixel(7, 7), [0x20, 0x40, 0x60, 255]);
    assert_eq!(layer.surface().pixel(2, 2), [0x20, 0x40, 0x60, 255]);

    layer.regenerate(&grid, &settings).unwrap();
    assert_eq!(layer.regenerations(), 2);
}

#[test]
fn glyphs_are_rasterized_once_per_size() {
    let grid = CharGrid::from_cells(
        vec![
            cell(0, 0, 'A', 1.0),
            cell(10, 0, 'A', 1.0),
            cell(0, 10, 'B', 1.0),
            cell(10, 10, 'A', 0.2),
            cell(20, 10, ' ', 1.0),
        ],
        10,
    )
    .unwrap();
    let settings = Settings {
        grid_size: 10,
        ..Settings::default()
    };
    let canvas = Canvas::new(30, 20).unwrap();
    let mut layer = TextLayer::build(&grid, &settings, canvas, FontBook::empty()).unwrap();
    assert_eq!(layer.atlas().rasterized(), 3);
    assert_eq!(layer.atlas().len(), 3);

    layer.regenerate(&grid, &settings).unwrap();
    assert_eq!(layer.atlas().rasterized(), 3);
}

#[test]
fn family_change_drops_cached_masks() {
    let grid = CharGrid::from_cells(vec![cell(0, 0, 'A', 1.0)], 4).unwrap();
    let settings = Settings {
        grid_size: 4,
        ..Settings::default()
    };
    let canvas = Canvas::new(4, 4).unwrap();
    let mut layer = TextLayer::build(&grid, &settings, canvas, FontBook::empty()).unwrap();
    assert_eq!(layer.atlas().rasterized(), 1);

    let serif = Settings {
        font_family: "serif".to_string(),
        ..settings
    };
    layer.regenerate(&grid, &serif).unwrap();
    assert_eq!(layer.atlas().rasterized(), 2);
    assert_eq!(layer.atlas().len(), 1);
}
