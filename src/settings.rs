use std::{fs::File, io::BufReader, ops::RangeInclusive, path::Path, str::FromStr};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    assets::color::{parse_hex_rgb, parse_hex_rgb_or},
    foundation::core::Rgb8,
    foundation::error::{MosaicError, MosaicResult},
};

pub const GRID_SIZE_RANGE: RangeInclusive<u32> = 4..=32;
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 6..=48;
pub const CONTRAST_RANGE: RangeInclusive<f32> = 0.5..=3.0;

/// Font families offered by the settings panel. Any other family name is accepted as free text.
pub const FONT_FAMILIES: [&str; 6] = [
    "monospace",
    "Courier New",
    "Consolas",
    "Lucida Console",
    "Menlo",
    "Monaco",
];

pub const DEFAULT_TEXT_COLOR: Rgb8 = Rgb8::new(0xff, 0xff, 0xff);
pub const DEFAULT_BACKGROUND_COLOR: Rgb8 = Rgb8::new(0x11, 0x11, 0x11);

/// Immutable engine configuration snapshot.
///
/// Serialized with camelCase keys; this is also the literal embedded in standalone documents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Pitch between sampled cells, in pixels.
    pub grid_size: u32,
    /// Glyph size at full brightness, in pixels.
    pub font_size: u32,
    /// Glyph alphabet; every cell draws uniformly from it.
    pub characters: String,
    pub contrast: f32,
    pub min_brightness: f32,
    pub text_opacity: f32,
    pub invert: bool,
    pub font_family: String,
    pub text_color: String,
    pub background_color: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_size: 12,
            font_size: 10,
            characters: CharPreset::Standard.characters().to_string(),
            contrast: 1.2,
            min_brightness: 0.15,
            text_opacity: 0.55,
            invert: false,
            font_family: "monospace".to_string(),
            text_color: DEFAULT_TEXT_COLOR.to_hex(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_hex(),
        }
    }
}

impl Settings {
    /// Read settings from a JSON file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> MosaicResult<Self> {
        let f = File::open(path).with_context(|| format!("open settings '{}'", path.display()))?;
        let settings: Settings = serde_json::from_reader(BufReader::new(f))?;
        Ok(settings)
    }

    pub fn validate(&self) -> MosaicResult<()> {
        if !GRID_SIZE_RANGE.contains(&self.grid_size) {
            return Err(MosaicError::validation(format!(
                "gridSize must be in {GRID_SIZE_RANGE:?}, got {}",
                self.grid_size
            )));
        }
        if !FONT_SIZE_RANGE.contains(&self.font_size) {
            return Err(MosaicError::validation(format!(
                "fontSize must be in {FONT_SIZE_RANGE:?}, got {}",
                self.font_size
            )));
        }
        if !CONTRAST_RANGE.contains(&self.contrast) {
            return Err(MosaicError::validation(format!(
                "contrast must be in {CONTRAST_RANGE:?}, got {}",
                self.contrast
            )));
        }
        unit_interval("minBrightness", self.min_brightness)?;
        unit_interval("textOpacity", self.text_opacity)?;
        if self.characters.is_empty() {
            return Err(MosaicError::validation("characters must be non-empty"));
        }
        if self.font_family.trim().is_empty() {
            return Err(MosaicError::validation("fontFamily must be non-empty"));
        }
        Ok(())
    }

    /// Glyph alphabet split into individual characters.
    pub fn glyphs(&self) -> Vec<char> {
        self.characters.chars().collect()
    }

    /// Glyph fill color. Malformed hex falls back to white.
    pub fn text_rgb(&self) -> Rgb8 {
        parse_hex_rgb(&self.text_color)
    }

    /// Text layer background. Malformed hex falls back to the default background.
    pub fn background_rgb(&self) -> Rgb8 {
        parse_hex_rgb_or(&self.background_color, DEFAULT_BACKGROUND_COLOR)
    }
}

fn unit_interval(name: &str, v: f32) -> MosaicResult<()> {
    if !(0.0..=1.0).contains(&v) {
        return Err(MosaicError::validation(format!(
            "{name} must be in [0, 1], got {v}"
        )));
    }
    Ok(())
}

/// Named glyph alphabets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharPreset {
    Standard,
    Simple,
    Blocks,
    Matrix,
    Minimal,
}

impl CharPreset {
    pub const ALL: [CharPreset; 5] = [
        CharPreset::Standard,
        CharPreset::Simple,
        CharPreset::Blocks,
        CharPreset::Matrix,
        CharPreset::Minimal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CharPreset::Standard => "standard",
            CharPreset::Simple => "simple",
            CharPreset::Blocks => "blocks",
            CharPreset::Matrix => "matrix",
            CharPreset::Minimal => "minimal",
        }
    }

    pub fn characters(self) -> &'static str {
        match self {
            CharPreset::Standard => "✦❍QWERTYUIOPASDFGHJKLZXCVBNM*+",
            CharPreset::Simple => "@%#*+=-:. ",
            CharPreset::Blocks => "█▓▒░ ",
            CharPreset::Matrix => "01",
            CharPreset::Minimal => " .:-=+*#%@",
        }
    }
}

impl FromStr for CharPreset {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MosaicError::validation(format!("unknown character preset '{s}'")))
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
