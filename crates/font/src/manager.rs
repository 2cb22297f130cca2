//! Font resolution and caching.
//!
//! `FontManager` turns (family, size, weight, style) requests into shared
//! `Font` handles. Resolution never fails: the requested family is tried
//! first, then the configured fallback families, then the default family,
//! and if no provider can supply bytes at all a synthesized font with fixed
//! metrics is returned so layout can always proceed.

use crate::cache::LruCache;
use crate::font::{Font, FontKey};
use crate::metrics::FontMetricsProvider;
use crate::providers::{FixedMetricsProvider, TtfMetricsProvider};
use galley_style::{FontStretch, FontStyle, FontWeight};
use galley_traits::{FontProvider, FontQuery};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Default capacity of the font cache.
const DEFAULT_MAX_FONTS: usize = 32;

pub struct FontManager {
    provider: Arc<dyn FontProvider>,
    cache: RwLock<LruCache<FontKey, Arc<Font>>>,
    fallback_families: Vec<String>,
    default_family: String,
    next_font_id: AtomicU64,
}

impl std::fmt::Debug for FontManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontManager")
            .field("provider", &self.provider.name())
            .field("default_family", &self.default_family)
            .finish()
    }
}

impl FontManager {
    pub fn new(provider: Arc<dyn FontProvider>) -> Self {
        Self {
            provider,
            cache: RwLock::new(LruCache::new(DEFAULT_MAX_FONTS)),
            fallback_families: vec!["Helvetica".to_string(), "Arial".to_string()],
            default_family: "Helvetica".to_string(),
            next_font_id: AtomicU64::new(1),
        }
    }

    /// Replaces the ordered fallback family list.
    pub fn with_fallbacks(mut self, families: &[&str]) -> Self {
        self.fallback_families = families.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Sets the family of last resort.
    pub fn with_default_family(mut self, family: impl Into<String>) -> Self {
        self.default_family = family.into();
        self
    }

    /// Sets the maximum number of cached fonts.
    pub fn with_capacity(self, max_entries: usize) -> Self {
        if let Ok(mut cache) = self.cache.write() {
            *cache = LruCache::new(max_entries);
        }
        self
    }

    pub fn default_family(&self) -> &str {
        &self.default_family
    }

    /// Number of fonts currently cached.
    pub fn cached_fonts(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Resolves a font handle, from cache when possible.
    ///
    /// This function always returns a usable font; resolution failures are
    /// absorbed by the fallback chain and logged, never surfaced.
    pub fn get_font(
        &self,
        family: &str,
        size: f64,
        weight: &FontWeight,
        style: &FontStyle,
    ) -> Arc<Font> {
        self.get_font_stretched(family, size, weight, style, &FontStretch::Normal)
    }

    /// As [`get_font`](Self::get_font) with an explicit stretch axis.
    pub fn get_font_stretched(
        &self,
        family: &str,
        size: f64,
        weight: &FontWeight,
        style: &FontStyle,
        stretch: &FontStretch,
    ) -> Arc<Font> {
        let key = FontKey::new(family, size, weight, style, stretch);

        if let Ok(mut cache) = self.cache.write() {
            if let Some(font) = cache.get(&key) {
                log::debug!("font cache hit: {} {}pt", family, size);
                return font.clone();
            }
        }

        let font = Arc::new(self.load_font(family, size, weight, style, stretch));

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, font.clone());
            // Fonts still referenced outside the cache are not evictable:
            // the cache's own reference plus the handle being returned.
            let evicted = cache.evict_over_capacity(|f| Arc::strong_count(f) <= 1);
            if evicted > 0 {
                log::debug!("evicted {} least-recently-used font(s)", evicted);
            }
        }

        font
    }

    fn load_font(
        &self,
        family: &str,
        size: f64,
        weight: &FontWeight,
        style: &FontStyle,
        stretch: &FontStretch,
    ) -> Font {
        let fallbacks: Vec<&str> = self
            .fallback_families
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.default_family.as_str()))
            .collect();
        let query = FontQuery::new(family)
            .with_fallbacks(&fallbacks)
            .with_weight(weight.clone())
            .with_style(style.clone());

        match self.provider.load_font(&query) {
            Ok(data) => match TtfMetricsProvider::new(data.clone()) {
                Ok(metrics) => self.make_font(
                    family,
                    size,
                    weight,
                    style,
                    stretch,
                    Some(data),
                    Arc::new(metrics),
                ),
                Err(e) => {
                    log::warn!("font data for '{}' unparseable ({}), using fixed metrics", family, e);
                    self.make_font(
                        family,
                        size,
                        weight,
                        style,
                        stretch,
                        Some(data),
                        Arc::new(FixedMetricsProvider::default()),
                    )
                }
            },
            Err(e) => {
                log::warn!(
                    "no provider match for '{}' (or any fallback): {}; synthesizing last-resort font",
                    family,
                    e
                );
                self.make_font(
                    &self.default_family,
                    size,
                    weight,
                    style,
                    stretch,
                    None,
                    Arc::new(FixedMetricsProvider::default()),
                )
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn make_font(
        &self,
        family: &str,
        size: f64,
        weight: &FontWeight,
        style: &FontStyle,
        stretch: &FontStretch,
        data: Option<galley_traits::SharedFontData>,
        provider: Arc<dyn FontMetricsProvider>,
    ) -> Font {
        Font::new(
            self.next_font_id.fetch_add(1, Ordering::Relaxed),
            family.to_string(),
            size,
            weight.clone(),
            style.clone(),
            stretch.clone(),
            data,
            provider,
        )
    }
}
