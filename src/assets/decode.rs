use std::{io::Cursor, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{MosaicError, MosaicResult};

/// Decoded source image.
///
/// Keeps the original encoded bytes next to the premultiplied pixels so exporters can embed the
/// source verbatim.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
    pub format: image::ImageFormat,
    pub encoded: Arc<Vec<u8>>,
}

impl SourceImage {
    /// MIME type of the encoded bytes, for `data:` URIs.
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Wrap an in-memory RGBA image, encoding it as PNG for embedding.
    pub fn from_rgba_image(img: image::RgbaImage) -> MosaicResult<Self> {
        let mut encoded = Vec::new();
        img.write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
            .context("encode source image as png")?;
        let img = fit_pixmap_limits(img);
        let (width, height) = img.dimensions();
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            format: image::ImageFormat::Png,
            encoded: Arc::new(encoded),
        })
    }
}

/// Identify raster image bytes by their magic number.
pub fn sniff_image_format(bytes: &[u8]) -> Option<image::ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decode source bytes.
///
/// Bytes that do not look like an image are rejected with `Ok(None)`; bytes that claim to be an
/// image but fail to decode are an error.
pub fn decode_source(bytes: &[u8]) -> MosaicResult<Option<SourceImage>> {
    let Some(format) = sniff_image_format(bytes) else {
        return Ok(None);
    };

    let dyn_img = image::load_from_memory_with_format(bytes, format)
        .context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(MosaicError::validation("source image has no pixels"));
    }
    let rgba = fit_pixmap_limits(rgba);
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Some(SourceImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
        format,
        encoded: Arc::new(bytes.to_vec()),
    }))
}

/// Shrink, keeping aspect, until both sides fit a `u16` pixmap. The encoded bytes stay untouched.
fn fit_pixmap_limits(img: image::RgbaImage) -> image::RgbaImage {
    let limit = u32::from(u16::MAX);
    let (w, h) = img.dimensions();
    if w <= limit && h <= limit {
        return img;
    }
    let scale = f64::from(limit) / f64::from(w.max(h));
    let nw = ((f64::from(w) * scale).round() as u32).clamp(1, limit);
    let nh = ((f64::from(h) * scale).round() as u32).clamp(1, limit);
    tracing::debug!(w, h, nw, nh, "shrinking source to pixmap limits");
    image::imageops::resize(&img, nw, nh, image::imageops::FilterType::Triangle)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
