//! ascii-mosaic turns a raster image into an animated, pointer-interactive ASCII mosaic.
//!
//! - Build an [`Engine`] from a decoded [`SourceImage`] and a [`Settings`] snapshot
//! - Host it in a [`Preview`], which schedules frames and glyph scrambles off an injectable
//!   [`Clock`]
//! - Export the grid as plain text, the visible frame as PNG, or a standalone HTML page
#![forbid(unsafe_code)]

pub mod assets;
pub mod encode;
pub mod export;
pub mod foundation;
pub mod mosaic;
pub mod render;
pub mod session;
pub mod settings;

pub use crate::assets::decode::{SourceImage, decode_source};
pub use crate::assets::fonts::FontBook;
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::export::plain_text::to_plain_text;
pub use crate::export::raster::encode_png;
pub use crate::export::standalone::{StandaloneDocument, generate_standalone_html};
pub use crate::foundation::core::{Canvas, Rgb8};
pub use crate::foundation::error::{MosaicError, MosaicResult};
pub use crate::mosaic::engine::{Engine, EngineOpts};
pub use crate::mosaic::grid::{Cell, CharGrid};
pub use crate::mosaic::heat::HeatField;
pub use crate::render::surface::{FrameRGBA, Surface};
pub use crate::session::clock::{Clock, ManualClock, SystemClock};
pub use crate::session::player::{Player, PlayerOpts};
pub use crate::session::preview::{Event, Preview, PreviewOpts};
pub use crate::settings::{CharPreset, Settings};
