use std::{io::Cursor, path::Path};

use anyhow::Context as _;

use crate::{
    foundation::error::{MosaicError, MosaicResult},
    render::surface::{FrameRGBA, Surface},
};

/// PNG bytes of a frame, straight alpha.
pub fn encode_png_frame(frame: &FrameRGBA) -> MosaicResult<Vec<u8>> {
    let straight = frame.clone().into_straight();
    let img = image::RgbaImage::from_raw(straight.width, straight.height, straight.data)
        .ok_or_else(|| MosaicError::export("frame buffer does not match its dimensions"))?;

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

/// Snapshot of the surface as it is now.
pub fn encode_png(surface: &Surface) -> MosaicResult<Vec<u8>> {
    encode_png_frame(&surface.to_frame())
}

pub fn write_png(frame: &FrameRGBA, path: &Path) -> MosaicResult<()> {
    let bytes = encode_png_frame(frame)?;
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}
