//! FontProvider trait for abstracting font loading and discovery.
//!
//! This trait lets the font manager obtain raw font data without being tied
//! to system font discovery or filesystem access. Providers return bytes;
//! parsing and metrics live behind the metrics-provider capability in the
//! font crate.

use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;

use galley_style::{FontStyle, FontWeight};

/// Error type for font loading operations.
///
/// These errors never escape the font manager: resolution always bottoms out
/// in a guaranteed fallback, so `FontError` is an internal signal between a
/// provider and the manager's fallback chain.
#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Font not found: {family} (weight: {weight:?}, style: {style:?})")]
    NotFound {
        family: String,
        weight: FontWeight,
        style: FontStyle,
    },

    #[error("Failed to load font '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid font data: {0}")]
    InvalidData(String),

    #[error("Font parsing error: {0}")]
    ParseError(String),
}

/// Shared font data type (reference-counted bytes).
pub type SharedFontData = Arc<Vec<u8>>;

/// Descriptor for a font face available in a provider.
#[derive(Debug, Clone)]
pub struct FontDescriptor {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
}

/// A query for finding a font face.
#[derive(Debug, Clone)]
pub struct FontQuery<'a> {
    /// Primary family name to search for
    pub family: &'a str,
    /// Fallback families to try if the primary is not found
    pub fallbacks: &'a [&'a str],
    pub weight: FontWeight,
    pub style: FontStyle,
}

impl<'a> FontQuery<'a> {
    pub fn new(family: &'a str) -> Self {
        Self {
            family,
            fallbacks: &[],
            weight: FontWeight::Regular,
            style: FontStyle::Normal,
        }
    }

    pub fn with_fallbacks(mut self, fallbacks: &'a [&'a str]) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}

/// A trait for loading and discovering font faces.
///
/// Implementations may back onto system font directories, in-memory stores,
/// or embedded resources. The provider performs family-level matching; the
/// font manager above it adds caching, eviction, and the guaranteed-default
/// fallback.
pub trait FontProvider: Send + Sync + Debug {
    /// Load a font matching the given query, trying fallback families if the
    /// primary family has no match.
    fn load_font(&self, query: &FontQuery<'_>) -> Result<SharedFontData, FontError>;

    /// Check if a font matching the query is available.
    fn has_font(&self, query: &FontQuery<'_>) -> bool;

    /// List all available font family names.
    fn list_families(&self) -> Vec<String>;

    /// Human-readable provider name for logging.
    fn name(&self) -> &'static str;
}

/// An in-memory font provider.
///
/// Fonts are stored in memory and must be pre-populated before use. Works in
/// any environment, and is what the test suites use.
#[derive(Debug, Default)]
pub struct InMemoryFontProvider {
    fonts: std::sync::RwLock<Vec<(FontDescriptor, SharedFontData)>>,
}

impl InMemoryFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a font face to the store.
    ///
    /// # Errors
    ///
    /// Returns `FontError::LoadFailed` if the internal lock is poisoned.
    pub fn add_font(
        &self,
        family: impl Into<String>,
        weight: FontWeight,
        style: FontStyle,
        data: Vec<u8>,
    ) -> Result<(), FontError> {
        self.add_font_shared(family, weight, style, Arc::new(data))
    }

    /// Add a font face with already-shared data.
    ///
    /// # Errors
    ///
    /// Returns `FontError::LoadFailed` if the internal lock is poisoned.
    pub fn add_font_shared(
        &self,
        family: impl Into<String>,
        weight: FontWeight,
        style: FontStyle,
        data: SharedFontData,
    ) -> Result<(), FontError> {
        let family = family.into();
        let descriptor = FontDescriptor {
            family: family.clone(),
            weight,
            style,
        };
        let mut fonts = self.fonts.write().map_err(|_| FontError::LoadFailed {
            path: family,
            message: "font store lock poisoned".to_string(),
        })?;
        fonts.push((descriptor, data));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fonts.read().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.read().map(|f| f.is_empty()).unwrap_or(true)
    }

    /// Find the best matching face for a query.
    ///
    /// Preference order within a family: exact (weight, style) match, then
    /// nearest numeric weight at the same style, then a style-compatible face
    /// (italic substitutes oblique and vice versa), then any face.
    fn find_match(&self, query: &FontQuery<'_>) -> Option<SharedFontData> {
        let fonts = self.fonts.read().ok()?;

        if let Some(data) = Self::find_in_family(&fonts, query.family, &query.weight, &query.style)
        {
            return Some(data);
        }

        for fallback in query.fallbacks {
            if let Some(data) = Self::find_in_family(&fonts, fallback, &query.weight, &query.style)
            {
                return Some(data);
            }
        }

        None
    }

    fn find_in_family(
        fonts: &[(FontDescriptor, SharedFontData)],
        family: &str,
        weight: &FontWeight,
        style: &FontStyle,
    ) -> Option<SharedFontData> {
        // Exact match
        for (descriptor, data) in fonts {
            if descriptor.family.eq_ignore_ascii_case(family)
                && &descriptor.weight == weight
                && &descriptor.style == style
            {
                return Some(data.clone());
            }
        }

        // Same style, closest numeric weight
        let target = weight.numeric_value() as i32;
        if let Some((_, data)) = fonts
            .iter()
            .filter(|(d, _)| d.family.eq_ignore_ascii_case(family) && &d.style == style)
            .min_by_key(|(d, _)| (d.weight.numeric_value() as i32 - target).abs())
        {
            return Some(data.clone());
        }

        // Style-compatible face (italic may stand in for oblique), closest weight
        if let Some((_, data)) = fonts
            .iter()
            .filter(|(d, _)| {
                d.family.eq_ignore_ascii_case(family) && style.is_compatible(&d.style)
            })
            .min_by_key(|(d, _)| (d.weight.numeric_value() as i32 - target).abs())
        {
            return Some(data.clone());
        }

        // Any face in the family
        fonts
            .iter()
            .find(|(d, _)| d.family.eq_ignore_ascii_case(family))
            .map(|(_, data)| data.clone())
    }
}

impl FontProvider for InMemoryFontProvider {
    fn load_font(&self, query: &FontQuery<'_>) -> Result<SharedFontData, FontError> {
        self.find_match(query).ok_or_else(|| FontError::NotFound {
            family: query.family.to_string(),
            weight: query.weight.clone(),
            style: query.style.clone(),
        })
    }

    fn has_font(&self, query: &FontQuery<'_>) -> bool {
        self.find_match(query).is_some()
    }

    fn list_families(&self) -> Vec<String> {
        let fonts = match self.fonts.read() {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };
        let mut families: Vec<_> = fonts.iter().map(|(d, _)| d.family.clone()).collect();
        families.sort();
        families.dedup();
        families
    }

    fn name(&self) -> &'static str {
        "InMemoryFontProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_font(name: &str) -> Vec<u8> {
        name.as_bytes().to_vec()
    }

    #[test]
    fn test_add_and_load() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("TestFont", FontWeight::Regular, FontStyle::Normal, fake_font("test"))
            .unwrap();

        let data = provider.load_font(&FontQuery::new("TestFont")).unwrap();
        assert_eq!(&*data, b"test");
    }

    #[test]
    fn test_not_found() {
        let provider = InMemoryFontProvider::new();
        let result = provider.load_font(&FontQuery::new("Nope"));
        assert!(matches!(result, Err(FontError::NotFound { .. })));
    }

    #[test]
    fn test_case_insensitive_family() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("TestFont", FontWeight::Regular, FontStyle::Normal, fake_font("test"))
            .unwrap();

        assert!(provider.has_font(&FontQuery::new("testfont")));
        assert!(provider.has_font(&FontQuery::new("TESTFONT")));
    }

    #[test]
    fn test_fallback_families() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("Third", FontWeight::Regular, FontStyle::Normal, fake_font("third"))
            .unwrap();

        let query = FontQuery::new("Primary").with_fallbacks(&["Second", "Third"]);
        let data = provider.load_font(&query).unwrap();
        assert_eq!(&*data, b"third");
    }

    #[test]
    fn test_nearest_weight() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("TestFont", FontWeight::Regular, FontStyle::Normal, fake_font("regular"))
            .unwrap();
        provider
            .add_font("TestFont", FontWeight::Bold, FontStyle::Normal, fake_font("bold"))
            .unwrap();

        // Medium (500) is closer to Regular (400) than to Bold (700).
        let query = FontQuery::new("TestFont").with_weight(FontWeight::Medium);
        let data = provider.load_font(&query).unwrap();
        assert_eq!(&*data, b"regular");

        let query = FontQuery::new("TestFont").with_weight(FontWeight::Black);
        let data = provider.load_font(&query).unwrap();
        assert_eq!(&*data, b"bold");
    }

    #[test]
    fn test_style_compatibility_substitution() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("TestFont", FontWeight::Regular, FontStyle::Italic, fake_font("italic"))
            .unwrap();

        // Oblique was requested; the italic face is an accepted substitute.
        let query = FontQuery::new("TestFont").with_style(FontStyle::Oblique);
        let data = provider.load_font(&query).unwrap();
        assert_eq!(&*data, b"italic");
    }

    #[test]
    fn test_exact_style_preferred() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("TestFont", FontWeight::Regular, FontStyle::Normal, fake_font("normal"))
            .unwrap();
        provider
            .add_font("TestFont", FontWeight::Regular, FontStyle::Italic, fake_font("italic"))
            .unwrap();

        let data = provider
            .load_font(&FontQuery::new("TestFont").with_style(FontStyle::Italic))
            .unwrap();
        assert_eq!(&*data, b"italic");

        let data = provider
            .load_font(&FontQuery::new("TestFont").with_style(FontStyle::Normal))
            .unwrap();
        assert_eq!(&*data, b"normal");
    }

    #[test]
    fn test_list_families() {
        let provider = InMemoryFontProvider::new();
        provider
            .add_font("Arial", FontWeight::Regular, FontStyle::Normal, fake_font("a"))
            .unwrap();
        provider
            .add_font("Arial", FontWeight::Bold, FontStyle::Normal, fake_font("ab"))
            .unwrap();
        provider
            .add_font("Helvetica", FontWeight::Regular, FontStyle::Normal, fake_font("h"))
            .unwrap();

        let families = provider.list_families();
        assert_eq!(families, vec!["Arial".to_string(), "Helvetica".to_string()]);
    }
}
