use std::{
    path::Path,
    sync::{Arc, OnceLock},
};

/// Environment variable naming an extra directory of `.ttf`/`.otf`/`.ttc` files.
pub const FONT_DIR_ENV: &str = "ASCII_MOSAIC_FONT_DIR";

/// Font database used to resolve `fontFamily` when rasterizing glyphs.
pub struct FontBook {
    db: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.face_count())
            .finish()
    }
}

impl FontBook {
    /// System fonts plus [`FONT_DIR_ENV`], loaded once per process.
    pub fn system() -> Arc<FontBook> {
        static SYSTEM: OnceLock<Arc<FontBook>> = OnceLock::new();
        SYSTEM
            .get_or_init(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                if let Some(dir) = std::env::var_os(FONT_DIR_ENV) {
                    load_fonts_from_dir(&mut db, Path::new(&dir));
                }
                tracing::debug!(faces = db.len(), "loaded font database");
                Arc::new(FontBook { db: Arc::new(db) })
            })
            .clone()
    }

    /// No faces at all: text nodes render nothing. Used where glyph pixels do not matter.
    pub fn empty() -> Arc<FontBook> {
        Arc::new(FontBook {
            db: Arc::new(usvg::fontdb::Database::new()),
        })
    }

    /// Fonts from the given directories only.
    pub fn from_dirs(dirs: &[&Path]) -> Arc<FontBook> {
        let mut db = usvg::fontdb::Database::new();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        Arc::new(FontBook { db: Arc::new(db) })
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub(crate) fn svg_options(&self) -> usvg::Options<'static> {
        usvg::Options {
            fontdb: self.db.clone(),
            font_resolver: make_font_resolver(),
            ..Default::default()
        }
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        if matches!(
            ext.to_ascii_lowercase().as_str(),
            "ttf" | "otf" | "ttc" | "otc"
        ) && let Err(err) = db.load_font_file(&path)
        {
            tracing::warn!(path = %path.display(), %err, "skipping unreadable font file");
        }
    }
}

/// Requested families first, then a monospace fallback chain, then any face at all.
fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }

            families.push(usvg::fontdb::Family::Monospace);
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Serif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}
