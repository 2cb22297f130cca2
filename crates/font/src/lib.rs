//! Font resolution, metrics, and caching.
//!
//! The font manager resolves (family, size, weight, style) requests into
//! shared [`Font`] handles through a [`FontProvider`](galley_traits::FontProvider),
//! caches them with LRU eviction, and never fails to return a usable font.
//! Metrics flow through the [`FontMetricsProvider`] capability so the rest
//! of the engine stays independent of font-file parsing.

pub mod cache;
pub mod font;
pub mod manager;
pub mod metrics;
pub mod providers;

#[cfg(feature = "system-fonts")]
pub mod system;

pub use cache::LruCache;
pub use font::{Font, FontKey};
pub use manager::FontManager;
pub use metrics::{FontMetrics, FontMetricsProvider, SCRIPT_SCALE};
pub use providers::{FixedMetricsProvider, TtfMetricsProvider};

#[cfg(feature = "system-fonts")]
pub use system::SystemFontProvider;
