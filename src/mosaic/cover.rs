use std::sync::Arc;

use crate::{
    assets::decode::SourceImage,
    foundation::{
        core::{Canvas, Rgb8},
        error::{MosaicError, MosaicResult},
    },
    render::surface::{Surface, pixmap_dims},
};

/// Where the source lands on the canvas under aspect-fill.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverPlacement {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Scale so the image covers the whole canvas, centered; overflow is cropped.
pub fn cover_placement(src_w: u32, src_h: u32, canvas: Canvas) -> CoverPlacement {
    let cw = f64::from(canvas.width);
    let ch = f64::from(canvas.height);
    let iw = f64::from(src_w.max(1));
    let ih = f64::from(src_h.max(1));
    let scale = (cw / iw).max(ch / ih);
    CoverPlacement {
        scale,
        offset_x: (cw - iw * scale) / 2.0,
        offset_y: (ch - ih * scale) / 2.0,
    }
}

/// Opaque fill under the image. Depends only on `invert`, not on the configured background.
pub fn cover_background(invert: bool) -> Rgb8 {
    if invert { Rgb8::WHITE } else { Rgb8::BLACK }
}

/// Rasterize the aspect-filled (and optionally inverted) source into an opaque surface.
#[tracing::instrument(skip(source), fields(src_w = source.width, src_h = source.height))]
pub fn build_cover(source: &SourceImage, canvas: Canvas, invert: bool) -> MosaicResult<Surface> {
    let mut surface = Surface::new(canvas)?;
    let (w, h) = pixmap_dims(canvas)?;

    let paint = source_paint(source, invert)?;
    let placement = cover_placement(source.width, source.height, canvas);
    let bg = cover_background(invert);

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(bg.r, bg.g, bg.b, 255));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(w),
        f64::from(h),
    ));

    ctx.set_transform(
        vello_cpu::kurbo::Affine::translate((placement.offset_x, placement.offset_y))
            * vello_cpu::kurbo::Affine::scale(placement.scale),
    );
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(source.width),
        f64::from(source.height),
    ));
    ctx.flush();
    ctx.render_to_pixmap(surface.pixmap_mut());

    Ok(surface)
}

fn source_paint(source: &SourceImage, invert: bool) -> MosaicResult<vello_cpu::Image> {
    let w = u16::try_from(source.width)
        .map_err(|_| MosaicError::render("source image width exceeds u16"))?;
    let h = u16::try_from(source.height)
        .map_err(|_| MosaicError::render("source image height exceeds u16"))?;
    if source.rgba8_premul.len() != source.width as usize * source.height as usize * 4 {
        return Err(MosaicError::render("source image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(source.width as usize * source.height as usize);
    for px in source.rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        // Premultiplied inversion: c' = a - c keeps transparent pixels transparent.
        let [r, g, b] = if invert {
            [a - px[0].min(a), a - px[1].min(a), a - px[2].min(a)]
        } else {
            [px[0], px[1], px[2]]
        };
        pixels.push(vello_cpu::peniko::color::PremulRgba8 { r, g, b, a });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/mosaic/cover.rs"]
mod tests;
