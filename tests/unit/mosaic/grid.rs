use rand::{SeedableRng, rngs::SmallRng};

use super::*;

fn gray_surface(w: u32, h: u32, v: u8) -> Surface {
    let mut s = Surface::new(Canvas::new(w, h).unwrap()).unwrap();
    s.fill([v, v, v, 255]);
    s
}

#[test]
fn dims_round_up_partial_steps() {
    let c = Canvas::new(96, 96).unwrap();
    assert_eq!(grid_dims(c, 12), (8, 8));
    let c = Canvas::new(100, 30).unwrap();
    assert_eq!(grid_dims(c, 12), (9, 3));
}

#[test]
fn luma_weights() {
    assert_eq!(luma(0, 0, 0), 0.0);
    assert!((luma(255, 255, 255) - 1.0).abs() < 1e-6);
    assert!((luma(255, 0, 0) - 0.299).abs() < 1e-6);
}

#[test]
fn contrast_stays_in_range() {
    for i in 0..=20 {
        let gray = i as f32 / 20.0;
        for contrast in [0.5, 1.0, 1.2, 3.0] {
            for min in [0.0, 0.15, 0.9, 1.0] {
                let out = apply_contrast(gray, contrast, min);
                assert!((min..=1.0).contains(&out), "{gray} {contrast} {min} -> {out}");
            }
        }
    }
    assert_eq!(apply_contrast(0.5, 3.0, 0.0), 0.5);
}

#[test]
fn sample_is_row_major_on_the_pitch() {
    let cover = gray_surface(30, 20, 128);
    let settings = Settings {
        grid_size: 12,
        characters: "ab".to_string(),
        ..Settings::default()
    };
    let mut rng = SmallRng::seed_from_u64(7);
    let grid = sample_grid(&cover, &settings, &settings.glyphs(), &mut rng).unwrap();

    let coords: Vec<(u32, u32)> = grid.cells().iter().map(|c| (c.x, c.y)).collect();
    assert_eq!(
        coords,
        vec![(0, 0), (12, 0), (24, 0), (0, 12), (12, 12), (24, 12)]
    );
    assert!(grid.glyphs().all(|g| g == 'a' || g == 'b'));
}

#[test]
fn same_seed_same_glyphs() {
    let cover = gray_surface(48, 48, 10);
    let settings = Settings::default();
    let glyphs = settings.glyphs();
    let a = sample_grid(&cover, &settings, &glyphs, &mut SmallRng::seed_from_u64(3)).unwrap();
    let b = sample_grid(&cover, &settings, &glyphs, &mut SmallRng::seed_from_u64(3)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn dark_cover_floors_at_min_brightness() {
    let cover = gray_surface(24, 24, 0);
    let settings = Settings::default();
    let grid = sample_grid(&cover, &settings, &settings.glyphs(), &mut SmallRng::seed_from_u64(1))
        .unwrap();
    assert!(grid.cells().iter().all(|c| c.brightness == settings.min_brightness));
}

#[test]
fn empty_alphabet_is_rejected() {
    let mut rng = SmallRng::seed_from_u64(0);
    assert!(random_glyph(&[], &mut rng).is_err());
}
