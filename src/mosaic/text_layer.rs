use std::{collections::HashMap, sync::Arc};

use crate::{
    assets::fonts::FontBook,
    foundation::{
        core::{Canvas, Rgb8},
        error::{MosaicError, MosaicResult},
    },
    mosaic::grid::CharGrid,
    render::{composite::over_mask_in_place, surface::Surface},
    settings::Settings,
};

/// Resolved drawing parameters for one glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphPaint {
    /// Font size in pixels.
    pub size: f32,
    pub rgb: Rgb8,
    /// Straight alpha in `[0, 1]`.
    pub alpha: f32,
}

/// Brighter cells get bigger, more opaque glyphs.
pub fn glyph_paint(brightness: f32, settings: &Settings, rgb: Rgb8) -> GlyphPaint {
    GlyphPaint {
        size: settings.font_size as f32 * (0.5 + 0.5 * brightness),
        rgb,
        alpha: (brightness * 1.5).clamp(0.0, 1.0) * settings.text_opacity,
    }
}

/// Glyph sizes are cached in quarter-pixel steps.
const SIZE_STEPS_PER_PX: f32 = 4.0;

fn quantize_size(size: f32) -> u32 {
    (size * SIZE_STEPS_PER_PX).round().max(1.0) as u32
}

/// Square coverage mask of one glyph, centered in its box.
#[derive(Clone, Debug)]
struct GlyphMask {
    side: u32,
    coverage: Vec<u8>,
}

/// Rasterized glyph masks keyed by `(glyph, quantized size)`.
///
/// Every mask is drawn for one font family and one sub-pixel cell center; a change to either drops
/// the cache.
#[derive(Debug, Default)]
pub struct GlyphAtlas {
    family: String,
    center_frac: f32,
    /// `None` marks glyphs the font book cannot draw.
    masks: HashMap<(char, u32), Option<GlyphMask>>,
    rasterized: u64,
}

impl GlyphAtlas {
    /// Number of distinct masks currently cached.
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Glyph rasterizations performed over the atlas lifetime.
    pub fn rasterized(&self) -> u64 {
        self.rasterized
    }

    fn prepare(&mut self, family: &str, center_frac: f32) {
        if self.family != family || self.center_frac != center_frac {
            self.masks.clear();
            self.family = family.to_string();
            self.center_frac = center_frac;
        }
    }

    fn mask(
        &mut self,
        glyph: char,
        size_q: u32,
        opts: &usvg::Options<'static>,
    ) -> MosaicResult<Option<&GlyphMask>> {
        if !self.masks.contains_key(&(glyph, size_q)) {
            let mask = rasterize_glyph(glyph, size_q, &self.family, self.center_frac, opts)?;
            self.rasterized += 1;
            self.masks.insert((glyph, size_q), mask);
        }
        Ok(self.masks.get(&(glyph, size_q)).and_then(Option::as_ref))
    }
}

/// Box side for a glyph of `size_q` quarter pixels. Even, so the center is a whole pixel.
fn mask_side(size_q: u32) -> u32 {
    2 * size_q.div_ceil(SIZE_STEPS_PER_PX as u32) + 2
}

/// SVG for one white glyph centered at `(center, center)` in a `side` x `side` box.
fn glyph_svg(glyph: char, size: f32, side: u32, center: f32, family: &str) -> String {
    let mut buf = [0u8; 4];
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{side}" height="{side}" viewBox="0 0 {side} {side}"><text x="{center}" y="{center}" font-family="{}" font-size="{size}" fill="#ffffff" text-anchor="middle" dominant-baseline="central">{}</text></svg>"##,
        xml_escape(family),
        xml_escape(glyph.encode_utf8(&mut buf)),
    )
}

fn rasterize_glyph(
    glyph: char,
    size_q: u32,
    family: &str,
    center_frac: f32,
    opts: &usvg::Options<'static>,
) -> MosaicResult<Option<GlyphMask>> {
    let side = mask_side(size_q);
    let center = (side / 2) as f32 + center_frac;
    let svg = glyph_svg(glyph, size_q as f32 / SIZE_STEPS_PER_PX, side, center, family);
    let tree = usvg::Tree::from_data(svg.as_bytes(), opts)
        .map_err(|e| MosaicError::render(format!("glyph svg: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(side, side)
        .ok_or_else(|| MosaicError::render("failed to allocate glyph pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );

    // White fill: the premultiplied alpha channel is the coverage.
    let coverage: Vec<u8> = pixmap.data().chunks_exact(4).map(|px| px[3]).collect();
    if coverage.iter().all(|&c| c == 0) {
        return Ok(None);
    }
    Ok(Some(GlyphMask { side, coverage }))
}

/// Paint the glyph layer for `grid` into `surface`: background fill, then one centered glyph per
/// cell in grid order.
#[tracing::instrument(skip_all, fields(cells = grid.len()))]
pub fn render_text_layer(
    surface: &mut Surface,
    grid: &CharGrid,
    settings: &Settings,
    fonts: &FontBook,
    atlas: &mut GlyphAtlas,
) -> MosaicResult<()> {
    let canvas = surface.canvas();
    let half = grid.grid_size() as f32 / 2.0;
    let half_px = half.floor();
    atlas.prepare(&settings.font_family, half - half_px);

    surface.fill(settings.background_rgb().to_premul_rgba8(1.0));
    let rgb = settings.text_rgb();
    let opts = fonts.svg_options();

    for cell in grid.cells() {
        if cell.glyph.is_whitespace() || cell.glyph.is_control() {
            continue;
        }
        let paint = glyph_paint(cell.brightness, settings, rgb);
        let color = paint.rgb.to_premul_rgba8(paint.alpha);
        if color[3] == 0 {
            continue;
        }
        let Some(mask) = atlas.mask(cell.glyph, quantize_size(paint.size), &opts)? else {
            continue;
        };
        let offset = i64::from(mask.side / 2);
        let x = i64::from(cell.x) + half_px as i64 - offset;
        let y = i64::from(cell.y) + half_px as i64 - offset;
        over_mask_in_place(
            surface.data_mut(),
            canvas.width,
            &mask.coverage,
            mask.side,
            (x, y),
            color,
        )?;
    }
    Ok(())
}

/// Text layer cache. Repainted only when the grid changes.
#[derive(Debug)]
pub struct TextLayer {
    surface: Surface,
    atlas: GlyphAtlas,
    fonts: Arc<FontBook>,
    regenerations: u64,
}

impl TextLayer {
    pub fn build(
        grid: &CharGrid,
        settings: &Settings,
        canvas: Canvas,
        fonts: Arc<FontBook>,
    ) -> MosaicResult<Self> {
        let mut layer = Self {
            surface: Surface::new(canvas)?,
            atlas: GlyphAtlas::default(),
            fonts,
            regenerations: 0,
        };
        layer.regenerate(grid, settings)?;
        Ok(layer)
    }

    pub fn regenerate(&mut self, grid: &CharGrid, settings: &Settings) -> MosaicResult<()> {
        render_text_layer(
            &mut self.surface,
            grid,
            settings,
            &self.fonts,
            &mut self.atlas,
        )?;
        self.regenerations += 1;
        Ok(())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Number of repaints since the layer was created, including the first.
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/mosaic/text_layer.rs"]
mod tests;
