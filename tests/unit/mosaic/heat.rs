use super::*;

fn ticks_to_zero_bound(v: f32) -> u32 {
    ((SNAP / v).ln() / DECAY.ln()).ceil() as u32
}

#[test]
fn injection_center_and_radius() {
    let mut h = HeatField::new(96).unwrap();
    h.inject_field(48, 48);
    assert_eq!(h.value_at(48, 48), 0.5);
    assert_eq!(h.value_at(56, 48), 0.0);
    assert_eq!(h.value_at(48, 40), 0.0);
    assert!(h.value_at(55, 48) > 0.0);
    assert!(h.is_active());
    assert_eq!(h.max_value(), 0.5);
}

#[test]
fn pixel_injection_maps_into_field_space() {
    let canvas = Canvas::new(96, 96).unwrap();
    let mut h = HeatField::new(96).unwrap();
    h.inject(48.0, 48.0, canvas);
    assert_eq!(h.value_for_pixel(48, 48, canvas), 0.5);

    let canvas = Canvas::new(800, 800).unwrap();
    let mut h = HeatField::new(96).unwrap();
    h.inject(400.0, 400.0, canvas);
    assert_eq!(h.value_at(48, 48), 0.5);
}

#[test]
fn values_cap_at_one() {
    let mut h = HeatField::new(16).unwrap();
    for _ in 0..5 {
        h.inject_field(8, 8);
    }
    assert_eq!(h.value_at(8, 8), 1.0);
    assert!(h.values().iter().all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn edge_injection_clips_to_field() {
    let mut h = HeatField::new(16).unwrap();
    h.inject_field(-3, 0);
    assert!(h.value_at(0, 0) > 0.0);
    assert_eq!(h.value_at(-1, 0), 0.0);
    h.inject_field(1000, 1000);
    assert!(h.is_active());
}

#[test]
fn decay_reaches_zero_within_bound() {
    let mut h = HeatField::new(96).unwrap();
    h.inject_field(48, 48);
    let bound = ticks_to_zero_bound(0.5);
    assert_eq!(bound, 77);

    let mut ticks = 0;
    while h.max_value() > 0.0 {
        assert!(h.is_active());
        h.decay();
        ticks += 1;
        assert!(ticks <= bound);
    }
    assert_eq!(ticks, bound);
    assert!(!h.is_active());
    assert!(h.values().iter().all(|&v| v == 0.0));
}

#[test]
fn saturated_cell_decays_within_bound() {
    let mut h = HeatField::new(16).unwrap();
    for _ in 0..4 {
        h.inject_field(8, 8);
    }
    let bound = ticks_to_zero_bound(1.0);
    let mut ticks = 0;
    while h.is_active() {
        h.decay();
        ticks += 1;
    }
    assert!(ticks <= bound);
    assert_eq!(h.max_value(), 0.0);
}

#[test]
fn idle_decay_skips_scan() {
    let mut h = HeatField::new(8).unwrap();
    assert!(!h.decay());
    h.inject_field(4, 4);
    assert!(h.decay());
}

#[test]
fn reveal_gate_is_strict() {
    assert!(!reveals(0.0));
    assert!(!reveals(REVEAL_THRESHOLD));
    assert!(reveals(0.1001));
}

#[test]
fn zero_resolution_rejected() {
    assert!(HeatField::new(0).is_err());
}
