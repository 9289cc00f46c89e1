use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn mask_over_blends_by_coverage_and_clips() {
    // 2x2 black surface, 2x2 mask hanging off the top-left corner.
    let mut dst = [0, 0, 0, 255].repeat(4);
    let mask = [255, 255, 0, 128];
    over_mask_in_place(&mut dst, 2, &mask, 2, (-1, -1), [255, 0, 0, 255]).unwrap();

    assert_eq!(&dst[0..4], &[128, 0, 0, 255]);
    assert_eq!(&dst[4..8], &[0, 0, 0, 255]);
    assert_eq!(&dst[8..12], &[0, 0, 0, 255]);
    assert_eq!(&dst[12..16], &[0, 0, 0, 255]);
}

#[test]
fn mask_over_full_coverage_replaces_with_opaque_color() {
    let mut dst = [10, 20, 30, 255].repeat(2);
    over_mask_in_place(&mut dst, 2, &[255, 0], 2, (0, 0), [40, 50, 60, 255]).unwrap();
    assert_eq!(&dst[0..4], &[40, 50, 60, 255]);
    assert_eq!(&dst[4..8], &[10, 20, 30, 255]);
}

#[test]
fn mask_over_rejects_ragged_inputs() {
    let mut dst = vec![0u8; 12];
    assert!(over_mask_in_place(&mut dst, 2, &[255], 1, (0, 0), [0, 0, 0, 255]).is_err());
    let mut dst = vec![0u8; 16];
    assert!(over_mask_in_place(&mut dst, 2, &[255; 3], 2, (0, 0), [0, 0, 0, 255]).is_err());
}

#[test]
fn rect_over_touches_only_the_clip() {
    // 3x2 surface, dst black, src white.
    let mut dst = [0, 0, 0, 255].repeat(6);
    let src = [255, 255, 255, 255].repeat(6);
    let clip = PixelRect {
        x0: 1,
        y0: 1,
        x1: 3,
        y1: 2,
    };
    over_rect_in_place(&mut dst, &src, 3, clip).unwrap();

    let white: Vec<usize> = dst
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[0] == 255)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(white, vec![4, 5]);
}

#[test]
fn rect_over_rejects_out_of_bounds_clip() {
    let mut dst = vec![0u8; 16];
    let src = vec![0u8; 16];
    let clip = PixelRect {
        x0: 0,
        y0: 0,
        x1: 3,
        y1: 1,
    };
    assert!(over_rect_in_place(&mut dst, &src, 2, clip).is_err());
}

#[test]
fn unpremultiply_restores_straight_color() {
    assert_eq!(unpremultiply([128, 0, 0, 128]), [255, 0, 0, 128]);
    assert_eq!(unpremultiply([0, 0, 0, 0]), [0, 0, 0, 0]);
    assert_eq!(unpremultiply([10, 20, 30, 255]), [10, 20, 30, 255]);
}
