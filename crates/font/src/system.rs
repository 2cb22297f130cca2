//! System font discovery through fontdb.
//!
//! Only compiled with the `system-fonts` feature; WASM and embedded callers
//! use an injected [`FontProvider`] instead.

use galley_style::{FontStyle, FontWeight};
use galley_traits::{FontError, FontProvider, FontQuery, SharedFontData};
use std::sync::{Arc, RwLock};

/// A [`FontProvider`] backed by the platform font database.
pub struct SystemFontProvider {
    db: RwLock<fontdb::Database>,
}

impl std::fmt::Debug for SystemFontProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces = self.db.read().map(|db| db.faces().count()).unwrap_or(0);
        f.debug_struct("SystemFontProvider")
            .field("faces", &faces)
            .finish()
    }
}

impl Default for SystemFontProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemFontProvider {
    /// Creates an empty provider. Call [`load_system_fonts`](Self::load_system_fonts)
    /// or [`add_font_data`](Self::add_font_data) to populate it.
    pub fn new() -> Self {
        Self {
            db: RwLock::new(fontdb::Database::new()),
        }
    }

    /// Scans the platform font directories.
    pub fn load_system_fonts(self) -> Self {
        if let Ok(mut db) = self.db.write() {
            db.load_system_fonts();
            log::debug!("loaded {} system font face(s)", db.faces().count());
        }
        self
    }

    /// Adds an in-memory font file to the database.
    pub fn add_font_data(&self, data: Vec<u8>) {
        if let Ok(mut db) = self.db.write() {
            db.load_font_data(data);
        }
    }

    fn run_query(&self, query: &FontQuery<'_>) -> Result<SharedFontData, FontError> {
        let weight = map_weight(&query.weight);
        let style = map_style(&query.style);

        let mut families: Vec<fontdb::Family<'_>> = Vec::with_capacity(query.fallbacks.len() + 2);
        families.push(fontdb::Family::Name(query.family));
        for fallback in query.fallbacks {
            families.push(fontdb::Family::Name(fallback));
        }
        families.push(fontdb::Family::SansSerif);

        let db = self.db.read().map_err(|_| FontError::LoadFailed {
            path: query.family.to_string(),
            message: "fontdb lock poisoned".to_string(),
        })?;

        let id = db
            .query(&fontdb::Query {
                families: &families,
                weight,
                stretch: fontdb::Stretch::Normal,
                style,
            })
            .ok_or_else(|| FontError::NotFound {
                family: query.family.to_string(),
                weight: query.weight.clone(),
                style: query.style.clone(),
            })?;

        let face = db.face(id).ok_or_else(|| FontError::NotFound {
            family: query.family.to_string(),
            weight: query.weight.clone(),
            style: query.style.clone(),
        })?;

        log::debug!(
            "system font match for '{}': {}",
            query.family,
            face.post_script_name
        );

        match &face.source {
            fontdb::Source::Binary(data) => Ok(Arc::new(data.as_ref().as_ref().to_vec())),
            fontdb::Source::File(path) => {
                std::fs::read(path)
                    .map(Arc::new)
                    .map_err(|e| FontError::LoadFailed {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })
            }
            _ => Err(FontError::InvalidData(
                "unsupported font source type".to_string(),
            )),
        }
    }
}

impl FontProvider for SystemFontProvider {
    fn load_font(&self, query: &FontQuery<'_>) -> Result<SharedFontData, FontError> {
        self.run_query(query)
    }

    fn has_font(&self, query: &FontQuery<'_>) -> bool {
        self.run_query(query).is_ok()
    }

    fn list_families(&self) -> Vec<String> {
        let db = match self.db.read() {
            Ok(db) => db,
            Err(_) => return Vec::new(),
        };
        let mut families: Vec<String> = db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();
        families.sort();
        families.dedup();
        families
    }

    fn name(&self) -> &'static str {
        "SystemFontProvider"
    }
}

fn map_weight(w: &FontWeight) -> fontdb::Weight {
    match w {
        FontWeight::Thin => fontdb::Weight::THIN,
        FontWeight::Light => fontdb::Weight::LIGHT,
        FontWeight::Regular => fontdb::Weight::NORMAL,
        FontWeight::Medium => fontdb::Weight::MEDIUM,
        FontWeight::Bold => fontdb::Weight::BOLD,
        FontWeight::Black => fontdb::Weight::BLACK,
        FontWeight::Numeric(n) => fontdb::Weight(*n),
    }
}

fn map_style(s: &FontStyle) -> fontdb::Style {
    match s {
        FontStyle::Normal => fontdb::Style::Normal,
        FontStyle::Italic => fontdb::Style::Italic,
        FontStyle::Oblique => fontdb::Style::Oblique,
    }
}
