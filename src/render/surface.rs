use crate::{
    foundation::{
        core::{Canvas, PixelRect},
        error::{MosaicError, MosaicResult},
    },
    render::composite::{over_rect_in_place, unpremultiply},
};

/// Owned frame pixels handed to sinks and encoders.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy, ready for `image` encoders.
    pub fn into_straight(self) -> FrameRGBA {
        if !self.premultiplied {
            return self;
        }
        let mut data = self.data;
        for px in data.chunks_exact_mut(4) {
            let out = unpremultiply([px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
        }
        FrameRGBA {
            width: self.width,
            height: self.height,
            data,
            premultiplied: false,
        }
    }
}

/// Offscreen premultiplied RGBA8 buffer backed by a `vello_cpu` pixmap.
pub struct Surface {
    canvas: Canvas,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.canvas.width)
            .field("height", &self.canvas.height)
            .finish()
    }
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(canvas: Canvas) -> MosaicResult<Self> {
        let (w, h) = pixmap_dims(canvas)?;
        Ok(Self {
            canvas,
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Adopt premultiplied bytes produced by another rasterizer.
    pub fn from_premul_rgba8(canvas: Canvas, bytes: &[u8]) -> MosaicResult<Self> {
        let mut surface = Self::new(canvas)?;
        if bytes.len() != surface.data().len() {
            return Err(MosaicError::render(format!(
                "expected {} bytes for {}x{} surface, got {}",
                surface.data().len(),
                canvas.width,
                canvas.height,
                bytes.len()
            )));
        }
        surface.data_mut().copy_from_slice(bytes);
        surface.pixmap.recompute_may_have_opacities();
        Ok(surface)
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Premultiplied RGBA8, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut vello_cpu::Pixmap {
        &mut self.pixmap
    }

    /// Overwrite every pixel with one premultiplied color.
    pub fn fill(&mut self, rgba_premul: [u8; 4]) {
        for px in self.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba_premul);
        }
    }

    /// Premultiplied pixel at `(x, y)`; transparent outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.canvas.width || y >= self.canvas.height {
            return [0, 0, 0, 0];
        }
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        let d = self.data();
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }

    /// Replace this surface's pixels with `src`'s.
    pub fn copy_from(&mut self, src: &Surface) -> MosaicResult<()> {
        self.check_same_size(src)?;
        self.data_mut().copy_from_slice(src.data());
        Ok(())
    }

    /// Draw `src` source-over, limited to `clip`.
    pub fn draw_clipped(&mut self, src: &Surface, clip: PixelRect) -> MosaicResult<()> {
        self.check_same_size(src)?;
        let width = self.canvas.width;
        over_rect_in_place(self.data_mut(), src.data(), width, clip)
    }

    pub fn to_frame(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data().to_vec(),
            premultiplied: true,
        }
    }

    fn check_same_size(&self, other: &Surface) -> MosaicResult<()> {
        if self.canvas != other.canvas {
            return Err(MosaicError::render(format!(
                "surface size mismatch: {}x{} vs {}x{}",
                self.canvas.width, self.canvas.height, other.canvas.width, other.canvas.height
            )));
        }
        Ok(())
    }
}

pub(crate) fn pixmap_dims(canvas: Canvas) -> MosaicResult<(u16, u16)> {
    let w = u16::try_from(canvas.width)
        .map_err(|_| MosaicError::render("surface width exceeds u16"))?;
    let h = u16::try_from(canvas.height)
        .map_err(|_| MosaicError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(MosaicError::render("surface width/height must be > 0"));
    }
    Ok((w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
