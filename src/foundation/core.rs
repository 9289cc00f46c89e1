use serde::{Deserialize, Serialize};

use crate::foundation::error::{MosaicError, MosaicResult};

/// Visible surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Size of the preview surface the interactive tool draws into.
    pub const DEFAULT: Canvas = Canvas {
        width: 800,
        height: 800,
    };

    /// Create a validated canvas.
    ///
    /// Surfaces are backed by `vello_cpu` pixmaps, which address pixels with `u16`.
    pub fn new(width: u32, height: u32) -> MosaicResult<Self> {
        if width == 0 || height == 0 {
            return Err(MosaicError::validation("canvas width/height must be > 0"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(MosaicError::validation(format!(
                "canvas {width}x{height} exceeds {}x{}",
                u16::MAX,
                u16::MAX
            )));
        }
        Ok(Self { width, height })
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white.
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);
    /// Pure black.
    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Premultiplied RGBA8 bytes with the given straight alpha in `0..=1`.
    pub fn to_premul_rgba8(self, alpha: f32) -> [u8; 4] {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u16;
        let premul = |c: u8| -> u8 { ((u16::from(c) * a + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), a as u8]
    }

    /// `#rrggbb` in lowercase.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Axis-aligned pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Inclusive left edge.
    pub x0: u32,
    /// Inclusive top edge.
    pub y0: u32,
    /// Exclusive right edge.
    pub x1: u32,
    /// Exclusive bottom edge.
    pub y1: u32,
}

impl PixelRect {
    /// Rectangle of `size` pixels at `(x, y)`, clipped to `canvas`.
    pub fn square_clipped(x: u32, y: u32, size: u32, canvas: Canvas) -> Self {
        Self {
            x0: x.min(canvas.width),
            y0: y.min(canvas.height),
            x1: x.saturating_add(size).min(canvas.width),
            y1: y.saturating_add(size).min(canvas.height),
        }
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Width in pixels.
    pub fn width(self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Height in pixels.
    pub fn height(self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
