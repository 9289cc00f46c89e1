use crate::foundation::{
    core::PixelRect,
    error::{MosaicError, MosaicResult},
};

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Source-over restricted to `clip`. Both buffers are `width` pixels wide.
pub fn over_rect_in_place(
    dst: &mut [u8],
    src: &[u8],
    width: u32,
    clip: PixelRect,
) -> MosaicResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MosaicError::render(
            "over_rect_in_place expects equal-length rgba8 buffers",
        ));
    }
    let stride = width as usize * 4;
    if stride == 0 || clip.is_empty() {
        return Ok(());
    }
    let rows = dst.len() / stride;
    if clip.x1 > width || clip.y1 as usize > rows {
        return Err(MosaicError::render("clip rect exceeds surface bounds"));
    }

    let x0 = clip.x0 as usize * 4;
    let x1 = clip.x1 as usize * 4;
    for y in clip.y0 as usize..clip.y1 as usize {
        let row = y * stride;
        let d = &mut dst[row + x0..row + x1];
        let s = &src[row + x0..row + x1];
        for (dp, sp) in d.chunks_exact_mut(4).zip(s.chunks_exact(4)) {
            if sp[3] == 255 {
                dp.copy_from_slice(sp);
                continue;
            }
            let out = over([dp[0], dp[1], dp[2], dp[3]], [sp[0], sp[1], sp[2], sp[3]], 1.0);
            dp.copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Source-over of `color` through a coverage `mask` whose top-left lands at `origin` in a buffer
/// `width` pixels wide. Mask pixels outside the buffer are dropped.
pub fn over_mask_in_place(
    dst: &mut [u8],
    width: u32,
    mask: &[u8],
    mask_width: u32,
    origin: (i64, i64),
    color: PremulRgba8,
) -> MosaicResult<()> {
    let stride = width as usize * 4;
    if stride == 0 || !dst.len().is_multiple_of(stride) {
        return Err(MosaicError::render(
            "over_mask_in_place expects whole rgba8 rows",
        ));
    }
    if mask_width == 0 || !mask.len().is_multiple_of(mask_width as usize) {
        return Err(MosaicError::render("coverage mask is not rectangular"));
    }

    let rows = (dst.len() / stride) as i64;
    let (ox, oy) = origin;
    for (my, mask_row) in mask.chunks_exact(mask_width as usize).enumerate() {
        let y = oy + my as i64;
        if y < 0 || y >= rows {
            continue;
        }
        let row = y as usize * stride;
        for (mx, &c) in mask_row.iter().enumerate() {
            let x = ox + mx as i64;
            if c == 0 || x < 0 || x >= i64::from(width) {
                continue;
            }
            let c = u16::from(c);
            let src = [
                mul_div255(u16::from(color[0]), c),
                mul_div255(u16::from(color[1]), c),
                mul_div255(u16::from(color[2]), c),
                mul_div255(u16::from(color[3]), c),
            ];
            let i = row + x as usize * 4;
            let out = over([dst[i], dst[i + 1], dst[i + 2], dst[i + 3]], src, 1.0);
            dst[i..i + 4].copy_from_slice(&out);
        }
    }
    Ok(())
}

/// Premultiplied to straight alpha, for encoders.
pub fn unpremultiply(px: PremulRgba8) -> PremulRgba8 {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 {
        ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
    };
    [un(px[0]), un(px[1]), un(px[2]), a]
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
