use rand::Rng;

use crate::{
    foundation::{
        core::Canvas,
        error::{MosaicError, MosaicResult},
    },
    render::surface::Surface,
    settings::Settings,
};

/// One sampled glyph position on the pitch grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Top-left pixel of the pitch cell.
    pub x: u32,
    pub y: u32,
    pub glyph: char,
    /// Contrast-adjusted brightness in `[minBrightness, 1]`.
    pub brightness: f32,
}

/// Cells in row-major scan order.
#[derive(Clone, Debug, PartialEq)]
pub struct CharGrid {
    cells: Vec<Cell>,
    grid_size: u32,
}

impl CharGrid {
    /// Wrap externally produced cells. Order is kept as given.
    pub fn from_cells(cells: Vec<Cell>, grid_size: u32) -> MosaicResult<Self> {
        if grid_size == 0 {
            return Err(MosaicError::validation("grid size must be > 0"));
        }
        Ok(Self { cells, grid_size })
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Replace the glyph of the cell at `index`. Out-of-range indices are ignored.
    pub fn set_glyph(&mut self, index: usize, glyph: char) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.glyph = glyph;
        }
    }

    /// Glyphs only, in scan order.
    pub fn glyphs(&self) -> impl Iterator<Item = char> + '_ {
        self.cells.iter().map(|c| c.glyph)
    }
}

/// `(columns, rows)` of pitch steps starting at the origin.
pub fn grid_dims(canvas: Canvas, grid_size: u32) -> (u32, u32) {
    let g = grid_size.max(1);
    (canvas.width.div_ceil(g), canvas.height.div_ceil(g))
}

/// Rec. 601 luma of 8-bit RGB, normalized to `[0, 1]`.
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    (f32::from(r) * 0.299 + f32::from(g) * 0.587 + f32::from(b) * 0.114) / 255.0
}

/// Contrast around mid-gray, floored at `min_brightness` and capped at 1.
pub fn apply_contrast(gray: f32, contrast: f32, min_brightness: f32) -> f32 {
    ((gray - 0.5) * contrast + 0.5).min(1.0).max(min_brightness)
}

pub fn random_glyph<R: Rng>(glyphs: &[char], rng: &mut R) -> MosaicResult<char> {
    if glyphs.is_empty() {
        return Err(MosaicError::validation("glyph alphabet is empty"));
    }
    Ok(glyphs[rng.random_range(0..glyphs.len())])
}

/// Point-sample `cover` every `gridSize` pixels and draw a glyph for each sample.
pub fn sample_grid<R: Rng>(
    cover: &Surface,
    settings: &Settings,
    glyphs: &[char],
    rng: &mut R,
) -> MosaicResult<CharGrid> {
    let g = settings.grid_size;
    if g == 0 {
        return Err(MosaicError::validation("gridSize must be > 0"));
    }
    let (cols, rows) = grid_dims(cover.canvas(), g);
    let mut cells = Vec::with_capacity(cols as usize * rows as usize);

    for row in 0..rows {
        let y = row * g;
        for col in 0..cols {
            let x = col * g;
            let [r, gr, b, _] = cover.pixel(x, y);
            let brightness =
                apply_contrast(luma(r, gr, b), settings.contrast, settings.min_brightness);
            cells.push(Cell {
                x,
                y,
                glyph: random_glyph(glyphs, rng)?,
                brightness,
            });
        }
    }

    Ok(CharGrid { cells, grid_size: g })
}

#[cfg(test)]
#[path = "../../tests/unit/mosaic/grid.rs"]
mod tests;
