//! The shared font handle.

use crate::metrics::{FontMetrics, FontMetricsProvider};
use galley_style::{FontStretch, FontStyle, FontWeight};
use galley_traits::SharedFontData;
use std::sync::{Arc, OnceLock};

/// Cache key for a font request.
///
/// A pure function of (family, size, weight, style, stretch): the family is
/// case-folded and the size fixed-pointed at 1/64pt so equal requests always
/// collide and distinct ones only collide as an accepted hash property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    family: String,
    size_1_64: u64,
    weight: u16,
    style: FontStyle,
    stretch: FontStretch,
}

impl FontKey {
    pub fn new(
        family: &str,
        size: f64,
        weight: &FontWeight,
        style: &FontStyle,
        stretch: &FontStretch,
    ) -> Self {
        Self {
            family: family.to_lowercase(),
            size_1_64: (size * 64.0).round() as u64,
            weight: weight.numeric_value(),
            style: style.clone(),
            stretch: stretch.clone(),
        }
    }
}

/// A loaded font at a specific size.
///
/// Shared by reference count (`Arc<Font>`): the manager's cache holds one
/// reference, every caller another. Dropped when the last owner releases it
/// after cache eviction. The metrics record is computed lazily, once —
/// requesting the family at another size yields a separate `Font`, so a
/// computed record can never go stale.
pub struct Font {
    id: u64,
    family: String,
    size: f64,
    weight: FontWeight,
    style: FontStyle,
    stretch: FontStretch,
    data: Option<SharedFontData>,
    provider: Arc<dyn FontMetricsProvider>,
    metrics: OnceLock<FontMetrics>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("id", &self.id)
            .field("family", &self.family)
            .field("size", &self.size)
            .field("weight", &self.weight)
            .field("style", &self.style)
            .finish()
    }
}

impl Font {
    pub(crate) fn new(
        id: u64,
        family: String,
        size: f64,
        weight: FontWeight,
        style: FontStyle,
        stretch: FontStretch,
        data: Option<SharedFontData>,
        provider: Arc<dyn FontMetricsProvider>,
    ) -> Self {
        Self {
            id,
            family,
            size,
            weight,
            style,
            stretch,
            data,
            provider,
            metrics: OnceLock::new(),
        }
    }

    /// Process-unique instance identity, usable as a cache-key component by
    /// downstream memoizers (the shape cache keys on this).
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn weight(&self) -> &FontWeight {
        &self.weight
    }

    pub fn style(&self) -> &FontStyle {
        &self.style
    }

    pub fn stretch(&self) -> &FontStretch {
        &self.stretch
    }

    /// The raw font bytes, absent only for the synthesized last-resort font.
    pub fn data(&self) -> Option<&SharedFontData> {
        self.data.as_ref()
    }

    pub fn metrics_provider(&self) -> &Arc<dyn FontMetricsProvider> {
        &self.provider
    }

    /// Scaled metrics for this font's size, computed on first use.
    pub fn metrics(&self) -> &FontMetrics {
        self.metrics
            .get_or_init(|| FontMetrics::compute(self.provider.as_ref(), self.size))
    }

    /// Glyph id for a codepoint; 0 (.notdef) when unmapped.
    pub fn glyph_index(&self, c: char) -> u32 {
        self.provider.glyph_index(c).unwrap_or(0)
    }

    /// Scaled advance of a codepoint in points. Unmapped codepoints fall
    /// back to the average advance so positions stay monotone.
    pub fn advance(&self, c: char) -> f64 {
        let upem = self.provider.units_per_em().max(1) as f64;
        let raw = self
            .provider
            .glyph_index(c)
            .and_then(|g| self.provider.advance(g))
            .unwrap_or_else(|| self.provider.average_advance());
        raw * self.size / upem
    }
}
