//! The baseline text shaper.
//!
//! Positions one glyph per codepoint with advances from the font's metrics
//! provider. This satisfies the shaping contract the layout engines consume
//! — glyph ids, monotone pen positions, cluster map, break opportunities —
//! without an OpenType substitution engine behind it. Runs in scripts that
//! need contextual shaping are flagged so quality-sensitive consumers can
//! route them to a full backend.

use crate::result::{ShapedGlyph, TextShapeResult, PENALTY_NO_BREAK};
use crate::script::{detect_direction, detect_script, needs_complex_shaping, Script};
use galley_font::{Font, LruCache};
use std::sync::{Arc, RwLock};

/// Default capacity of the shape cache.
const DEFAULT_MAX_RESULTS: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ShapeCacheKey {
    font_id: u64,
    text: String,
}

/// Shapes text runs and memoizes the results.
///
/// Identical (font, text) inputs hit the cache and share one immutable
/// result. One shaper per engine instance; nothing here is global.
pub struct TextShaper {
    cache: RwLock<LruCache<ShapeCacheKey, Arc<TextShapeResult>>>,
}

impl std::fmt::Debug for TextShaper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.cache.read().map(|c| c.len()).unwrap_or(0);
        f.debug_struct("TextShaper").field("cached", &len).finish()
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_RESULTS)
    }

    pub fn with_capacity(max_results: usize) -> Self {
        Self {
            cache: RwLock::new(LruCache::new(max_results)),
        }
    }

    /// Number of memoized results.
    pub fn cached_results(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// Shapes `text` with `font`.
    ///
    /// Returns a retained shared result; a cache hit performs no
    /// recomputation.
    pub fn shape(&self, font: &Arc<Font>, text: &str) -> Arc<TextShapeResult> {
        let key = ShapeCacheKey {
            font_id: font.id(),
            text: text.to_string(),
        };

        if let Ok(mut cache) = self.cache.write() {
            if let Some(result) = cache.get(&key) {
                log::debug!("shape cache hit: font {} {:?}", font.id(), text);
                return result.clone();
            }
        }

        let result = Arc::new(shape_run(font, text));

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, result.clone());
            cache.evict_over_capacity(|_| true);
        }

        result
    }
}

fn shape_run(font: &Arc<Font>, text: &str) -> TextShapeResult {
    let script = detect_script(text);
    let direction = detect_direction(text);
    let complex = needs_complex_shaping(text);
    if complex {
        log::debug!(
            "complex script run ({:?}); baseline per-codepoint shaping applied",
            script
        );
    }

    let mut glyphs = Vec::with_capacity(text.chars().count());
    let mut penalties = Vec::with_capacity(glyphs.capacity());
    let mut pen_x = 0.0_f64;

    for (byte_offset, c) in text.char_indices() {
        let advance = font.advance(c);
        glyphs.push(ShapedGlyph {
            glyph_id: font.glyph_index(c),
            codepoint: c,
            advance,
            x: pen_x,
            y: 0.0,
            cluster: byte_offset,
        });
        penalties.push(if c.is_whitespace() { 0 } else { PENALTY_NO_BREAK });
        pen_x += advance;
    }

    let metrics = font.metrics();
    TextShapeResult::new(
        text.to_string(),
        font.id(),
        glyphs,
        penalties,
        pen_x,
        metrics.ascent,
        metrics.descent,
        metrics.line_height,
        script,
        direction,
        complex,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Direction;
    use galley_font::FontManager;
    use galley_style::{FontStyle, FontWeight};
    use galley_traits::InMemoryFontProvider;

    fn test_font(size: f64) -> Arc<Font> {
        let manager = FontManager::new(Arc::new(InMemoryFontProvider::new()));
        manager.get_font("Test", size, &FontWeight::Regular, &FontStyle::Normal)
    }

    #[test]
    fn test_hello_shapes_five_glyphs() {
        let shaper = TextShaper::new();
        let font = test_font(12.0);
        let result = shaper.shape(&font, "Hello");

        assert_eq!(result.glyph_count(), 5);

        // Strictly non-decreasing pen positions...
        let glyphs = result.glyphs();
        for pair in glyphs.windows(2) {
            assert!(pair[1].x >= pair[0].x);
        }
        // ...and the last position plus its advance is the total width.
        let last = glyphs.last().unwrap();
        assert!((last.x + last.advance - result.total_width()).abs() < 1e-9);
        // Fixed metrics: 5 glyphs at 600/1000 * 12pt
        assert!((result.total_width() - 5.0 * 7.2).abs() < 1e-9);
    }

    #[test]
    fn test_cluster_map_is_byte_offsets() {
        let shaper = TextShaper::new();
        let font = test_font(12.0);
        // Multi-byte codepoints: é is 2 bytes in UTF-8
        let result = shaper.shape(&font, "aé b");

        let clusters: Vec<usize> = (0..result.glyph_count())
            .map(|i| result.cluster(i).unwrap())
            .collect();
        assert_eq!(clusters, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_break_opportunities_after_whitespace() {
        let shaper = TextShaper::new();
        let font = test_font(12.0);
        let result = shaper.shape(&font, "a b\tc");

        assert!(!result.is_break_opportunity(0)); // a
        assert!(result.is_break_opportunity(1)); // space
        assert!(!result.is_break_opportunity(2)); // b
        assert!(result.is_break_opportunity(3)); // tab
        assert!(!result.is_break_opportunity(4)); // c
    }

    #[test]
    fn test_cache_returns_shared_result() {
        let shaper = TextShaper::new();
        let font = test_font(12.0);

        let first = shaper.shape(&font, "cached");
        let second = shaper.shape(&font, "cached");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(shaper.cached_results(), 1);
    }

    #[test]
    fn test_cache_distinguishes_fonts() {
        let shaper = TextShaper::new();
        let at_12 = test_font(12.0);
        let at_24 = test_font(24.0);

        let small = shaper.shape(&at_12, "same text");
        let large = shaper.shape(&at_24, "same text");
        assert!(!Arc::ptr_eq(&small, &large));
        assert!(large.total_width() > small.total_width());
    }

    #[test]
    fn test_empty_text() {
        let shaper = TextShaper::new();
        let font = test_font(12.0);
        let result = shaper.shape(&font, "");

        assert_eq!(result.glyph_count(), 0);
        assert_eq!(result.total_width(), 0.0);
        assert_eq!(result.script(), Script::Latin);
        assert_eq!(result.direction(), Direction::LeftToRight);
    }

    #[test]
    fn test_arabic_run_flags_complex() {
        let shaper = TextShaper::new();
        let font = test_font(12.0);
        let result = shaper.shape(&font, "\u{0645}\u{0646}\u{0647}");

        assert_eq!(result.script(), Script::Arabic);
        assert_eq!(result.direction(), Direction::RightToLeft);
        assert!(result.is_complex_script());
        // Positions are still usable left-to-right pen coordinates.
        assert_eq!(result.glyph_count(), 3);
        assert!(result.total_width() > 0.0);
    }

    #[test]
    fn test_aggregate_metrics_from_font() {
        let shaper = TextShaper::new();
        let font = test_font(12.0);
        let result = shaper.shape(&font, "x");

        let metrics = font.metrics();
        assert_eq!(result.ascent(), metrics.ascent);
        assert_eq!(result.descent(), metrics.descent);
        assert_eq!(result.line_height(), metrics.line_height);
        assert!((result.height() - (metrics.ascent + metrics.descent)).abs() < 1e-9);
    }
}
