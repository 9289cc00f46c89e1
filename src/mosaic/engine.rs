use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    assets::{decode::SourceImage, fonts::FontBook},
    foundation::{
        core::{Canvas, PixelRect},
        error::MosaicResult,
    },
    mosaic::{
        cover::build_cover,
        grid::{CharGrid, random_glyph, sample_grid},
        heat::{self, HeatField},
        text_layer::TextLayer,
    },
    render::surface::Surface,
    settings::Settings,
};

/// Share of the grid redrawn per scramble tick.
pub const SCRAMBLE_FRACTION: f64 = 0.05;

/// Construction options that are not part of [`Settings`].
#[derive(Clone, Debug)]
pub struct EngineOpts {
    pub heat_resolution: usize,
    /// Fixed seed for glyph selection; `None` draws from the OS.
    pub seed: Option<u64>,
    pub fonts: Arc<FontBook>,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            heat_resolution: heat::DEFAULT_RESOLUTION,
            seed: None,
            fonts: FontBook::system(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrambleReport {
    /// Index draws performed (duplicates included).
    pub draws: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Whether the heat field was scanned this frame.
    pub decayed: bool,
    pub revealed_cells: usize,
}

/// Number of index draws per scramble for a grid of `len` cells.
pub fn scramble_count(len: usize) -> usize {
    (len as f64 * SCRAMBLE_FRACTION).floor() as usize
}

/// One mosaic for one image, canvas and settings snapshot.
///
/// Owns the cover, the glyph grid, the text layer cache and the heat field. Settings changes are
/// handled by building a new engine.
#[derive(Debug)]
pub struct Engine {
    settings: Settings,
    canvas: Canvas,
    glyphs: Vec<char>,
    cover: Surface,
    grid: CharGrid,
    text: TextLayer,
    heat: HeatField,
    rng: SmallRng,
    scramble_enabled: bool,
}

impl Engine {
    #[tracing::instrument(
        skip_all,
        fields(w = canvas.width, h = canvas.height, grid = settings.grid_size)
    )]
    pub fn new(
        source: &SourceImage,
        settings: Settings,
        canvas: Canvas,
        opts: EngineOpts,
    ) -> MosaicResult<Self> {
        settings.validate()?;
        let mut rng = match opts.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let glyphs = settings.glyphs();

        let cover = build_cover(source, canvas, settings.invert)?;
        let grid = sample_grid(&cover, &settings, &glyphs, &mut rng)?;
        let text = TextLayer::build(&grid, &settings, canvas, opts.fonts)?;
        let heat = HeatField::new(opts.heat_resolution)?;

        tracing::debug!(cells = grid.len(), "engine initialized");
        Ok(Self {
            settings,
            canvas,
            glyphs,
            cover,
            grid,
            text,
            heat,
            rng,
            scramble_enabled: true,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn grid(&self) -> &CharGrid {
        &self.grid
    }

    pub fn cover(&self) -> &Surface {
        &self.cover
    }

    pub fn text_layer(&self) -> &TextLayer {
        &self.text
    }

    pub fn heat(&self) -> &HeatField {
        &self.heat
    }

    pub fn scramble_enabled(&self) -> bool {
        self.scramble_enabled
    }

    pub fn set_scramble_enabled(&mut self, enabled: bool) {
        self.scramble_enabled = enabled;
    }

    /// Pointer position in canvas pixels.
    pub fn inject_pointer(&mut self, x: f32, y: f32) {
        self.heat.inject(x, y, self.canvas);
    }

    /// Redraw glyphs at `⌊0.05·len⌋` random indices and rebuild the text layer once.
    pub fn scramble(&mut self) -> MosaicResult<ScrambleReport> {
        let draws = scramble_count(self.grid.len());
        for _ in 0..draws {
            let idx = self.rng.random_range(0..self.grid.len());
            let glyph = random_glyph(&self.glyphs, &mut self.rng)?;
            self.grid.set_glyph(idx, glyph);
        }
        self.text.regenerate(&self.grid, &self.settings)?;
        tracing::trace!(draws, "scrambled");
        Ok(ScrambleReport { draws })
    }

    /// Timer entry point: scrambles only while enabled and no pointer heat is live.
    pub fn scramble_tick(&mut self) -> MosaicResult<Option<ScrambleReport>> {
        if !self.scramble_enabled || self.heat.is_active() {
            return Ok(None);
        }
        self.scramble().map(Some)
    }

    /// Decay heat, then draw the text layer and the revealed cover cells into `target`.
    pub fn compose(&mut self, target: &mut Surface) -> MosaicResult<FrameReport> {
        let decayed = self.heat.decay();
        target.copy_from(self.text.surface())?;

        let mut revealed_cells = 0;
        if self.heat.max_value() > 0.0 {
            let g = self.grid.grid_size();
            for cell in self.grid.cells() {
                if !heat::reveals(self.heat.value_for_pixel(cell.x, cell.y, self.canvas)) {
                    continue;
                }
                let clip = PixelRect::square_clipped(cell.x, cell.y, g, self.canvas);
                target.draw_clipped(&self.cover, clip)?;
                revealed_cells += 1;
            }
        }

        tracing::trace!(decayed, revealed_cells, "composed frame");
        Ok(FrameReport {
            decayed,
            revealed_cells,
        })
    }

    /// Indices of cells the reveal gate currently opens, without advancing decay.
    pub fn revealed_cells(&self) -> Vec<usize> {
        if self.heat.max_value() <= 0.0 {
            return Vec::new();
        }
        self.grid
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| heat::reveals(self.heat.value_for_pixel(c.x, c.y, self.canvas)))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mosaic/engine.rs"]
mod tests;
