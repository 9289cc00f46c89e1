use super::*;

fn checker_source(w: u32, h: u32) -> SourceImage {
    let img = image::RgbaImage::from_fn(w, h, |x, _| {
        if x < w / 2 {
            image::Rgba([0, 0, 0, 255])
        } else {
            image::Rgba([255, 255, 255, 255])
        }
    });
    SourceImage::from_rgba_image(img).unwrap()
}

fn opts(seed: u64) -> EngineOpts {
    EngineOpts {
        heat_resolution: heat::DEFAULT_RESOLUTION,
        seed: Some(seed),
        fonts: FontBook::empty(),
    }
}

fn engine(seed: u64) -> Engine {
    Engine::new(
        &checker_source(96, 96),
        Settings::default(),
        Canvas::new(96, 96).unwrap(),
        opts(seed),
    )
    .unwrap()
}

#[test]
fn scramble_count_floors() {
    assert_eq!(scramble_count(0), 0);
    assert_eq!(scramble_count(19), 0);
    assert_eq!(scramble_count(20), 1);
    assert_eq!(scramble_count(64), 3);
    assert_eq!(scramble_count(4489), 224);
}

#[test]
fn invalid_settings_are_rejected() {
    let bad = Settings {
        grid_size: 2,
        ..Settings::default()
    };
    let err = Engine::new(
        &checker_source(8, 8),
        bad,
        Canvas::new(8, 8).unwrap(),
        opts(0),
    );
    assert!(err.is_err());
}

#[test]
fn brightness_follows_cover() {
    let e = engine(1);
    let left = e.grid().cells()[0];
    let right = e.grid().cells()[7];
    assert_eq!(left.brightness, e.settings().min_brightness);
    assert_eq!(right.brightness, 1.0);
}

#[test]
fn scramble_regenerates_once_and_keeps_positions() {
    let mut e = engine(2);
    let before: Vec<(u32, u32)> = e.grid().cells().iter().map(|c| (c.x, c.y)).collect();
    let report = e.scramble().unwrap();
    assert_eq!(report.draws, 3);
    assert_eq!(e.text_layer().regenerations(), 2);
    let after: Vec<(u32, u32)> = e.grid().cells().iter().map(|c| (c.x, c.y)).collect();
    assert_eq!(before, after);
}

#[test]
fn scramble_tick_is_gated_by_heat_and_toggle() {
    let mut e = engine(3);
    e.inject_pointer(10.0, 10.0);
    assert_eq!(e.scramble_tick().unwrap(), None);

    let mut target = Surface::new(e.canvas()).unwrap();
    for _ in 0..500 {
        if !e.heat().is_active() {
            break;
        }
        e.compose(&mut target).unwrap();
    }
    assert!(!e.heat().is_active());
    e.set_scramble_enabled(false);
    assert_eq!(e.scramble_tick().unwrap(), None);

    e.set_scramble_enabled(true);
    assert!(e.scramble_tick().unwrap().is_some());
    assert_eq!(e.text_layer().regenerations(), 2);
}

#[test]
fn compose_without_heat_is_the_text_layer() {
    let mut e = engine(4);
    let mut target = Surface::new(e.canvas()).unwrap();
    let report = e.compose(&mut target).unwrap();
    assert!(!report.decayed);
    assert_eq!(report.revealed_cells, 0);
    assert_eq!(target.data(), e.text_layer().surface().data());
}

#[test]
fn compose_reveals_cover_under_pointer() {
    let mut e = engine(5);
    e.inject_pointer(84.0, 48.0);
    let mut target = Surface::new(e.canvas()).unwrap();
    let report = e.compose(&mut target).unwrap();
    assert!(report.decayed);
    assert!(report.revealed_cells > 0);
    // Cell (84, 48) sits on the white half of the cover.
    let px = target.pixel(86, 50);
    assert!(px[0] >= 250 && px[3] == 255, "{px:?}");
    // Far corner stays on the text background.
    assert_eq!(target.pixel(2, 2), [0x11, 0x11, 0x11, 255]);
}
