//! Font metrics: the provider capability and the scaled per-size record.
//!
//! Metrics are obtained through [`FontMetricsProvider`], an abstraction over
//! "something that can answer questions about a font file" — the real
//! implementation re-parses a `ttf_parser::Face` on demand, the fixed one
//! returns deterministic constants for tests and the last-resort fallback.
//! All raw values are in font units; [`FontMetrics::compute`] applies the
//! `raw * size / units_per_em` scaling once per (font, size).

use std::fmt::Debug;

/// Scale factor applied to superscript and subscript font sizes.
pub const SCRIPT_SCALE: f64 = 0.7;

/// Raw metrics capability of a loaded font.
///
/// All lengths are in unscaled font units; `descent` is a positive magnitude
/// below the baseline. Implementations must be deterministic: the same
/// provider always reports the same values.
pub trait FontMetricsProvider: Send + Sync + Debug {
    fn units_per_em(&self) -> u16;
    fn raw_ascent(&self) -> f64;
    fn raw_descent(&self) -> f64;
    fn raw_line_gap(&self) -> f64;
    /// 0.0 when the font does not report an x-height.
    fn raw_x_height(&self) -> f64;
    /// 0.0 when the font does not report a cap height.
    fn raw_cap_height(&self) -> f64;

    /// Glyph id for a codepoint; `None` when unmapped.
    fn glyph_index(&self, c: char) -> Option<u32>;

    /// Horizontal advance of a glyph in font units.
    fn advance(&self, glyph: u32) -> Option<f64>;

    /// Advance of the space glyph in font units, with a conventional
    /// quarter-em fallback for fonts that do not map U+0020.
    fn space_advance(&self) -> f64 {
        self.glyph_index(' ')
            .and_then(|g| self.advance(g))
            .unwrap_or(self.units_per_em() as f64 / 4.0)
    }

    /// A representative advance in font units, used for average-width
    /// estimates. Defaults to the advance of 'x', then half an em.
    fn average_advance(&self) -> f64 {
        self.glyph_index('x')
            .and_then(|g| self.advance(g))
            .unwrap_or(self.units_per_em() as f64 / 2.0)
    }
}

/// Scaled measurements for one (font, size) pair, in points.
///
/// Invalid until computed; the owning `Font` computes it lazily and a font
/// requested at a different size is a different instance, so a stored record
/// never goes stale.
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    pub ascent: f64,
    pub descent: f64,
    pub line_height: f64,
    pub x_height: f64,
    pub cap_height: f64,
    pub average_width: f64,
    pub space_width: f64,
    pub em_width: f64,
    pub en_width: f64,

    // Math positioning values. These are the fixed, testable contract; a
    // font's native MATH table would only ever replace the raw inputs above.
    /// Height of the centering axis above the baseline.
    pub axis_height: f64,
    /// Upward baseline shift for superscripts.
    pub superscript_offset: f64,
    /// Downward baseline shift for subscripts.
    pub subscript_offset: f64,
    /// Font-size multiplier for superscripts.
    pub superscript_scale: f64,
    /// Font-size multiplier for subscripts.
    pub subscript_scale: f64,
}

impl FontMetrics {
    /// Derives scaled metrics from a provider at `size` points.
    ///
    /// Scaling rule: `scaled = raw_font_units * (size / units_per_em)`.
    /// Fonts that report no x-height get half the ascent, no cap height gets
    /// the ascent; both keep every downstream value finite and positive.
    pub fn compute(provider: &dyn FontMetricsProvider, size: f64) -> Self {
        let upem = provider.units_per_em().max(1) as f64;
        let scale = size / upem;

        let ascent = provider.raw_ascent() * scale;
        let descent = provider.raw_descent() * scale;
        let line_height =
            (provider.raw_ascent() + provider.raw_descent() + provider.raw_line_gap()) * scale;

        let raw_x_height = if provider.raw_x_height() > 0.0 {
            provider.raw_x_height()
        } else {
            provider.raw_ascent() * 0.5
        };
        let raw_cap_height = if provider.raw_cap_height() > 0.0 {
            provider.raw_cap_height()
        } else {
            provider.raw_ascent()
        };
        let x_height = raw_x_height * scale;
        let cap_height = raw_cap_height * scale;

        Self {
            ascent,
            descent,
            line_height,
            x_height,
            cap_height,
            average_width: provider.average_advance() * scale,
            space_width: provider.space_advance() * scale,
            em_width: size,
            en_width: size / 2.0,
            axis_height: x_height * 0.5,
            superscript_offset: ascent * 0.6,
            subscript_offset: descent * 0.4,
            superscript_scale: SCRIPT_SCALE,
            subscript_scale: SCRIPT_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::FixedMetricsProvider;

    #[test]
    fn test_scaling_rule() {
        let provider = FixedMetricsProvider::default();
        let metrics = FontMetrics::compute(&provider, 12.0);

        // upem 1000, ascent 800, descent 200, x-height 500
        assert!((metrics.ascent - 9.6).abs() < 1e-9);
        assert!((metrics.descent - 2.4).abs() < 1e-9);
        assert!((metrics.x_height - 6.0).abs() < 1e-9);
        assert!((metrics.line_height - 12.0).abs() < 1e-9);
        assert_eq!(metrics.em_width, 12.0);
        assert_eq!(metrics.en_width, 6.0);
    }

    #[test]
    fn test_math_heuristics() {
        let provider = FixedMetricsProvider::default();
        let metrics = FontMetrics::compute(&provider, 12.0);

        assert!((metrics.axis_height - 3.0).abs() < 1e-9);
        assert!((metrics.superscript_offset - 9.6 * 0.6).abs() < 1e-9);
        assert!((metrics.subscript_offset - 2.4 * 0.4).abs() < 1e-9);
        assert_eq!(metrics.superscript_scale, 0.7);
        assert_eq!(metrics.subscript_scale, 0.7);
    }

    #[test]
    fn test_size_proportionality() {
        let provider = FixedMetricsProvider::default();
        let at_12 = FontMetrics::compute(&provider, 12.0);
        let at_24 = FontMetrics::compute(&provider, 24.0);

        assert!((at_24.ascent - 2.0 * at_12.ascent).abs() < 1e-9);
        assert!((at_24.axis_height - 2.0 * at_12.axis_height).abs() < 1e-9);
        // Scale factors are size-independent.
        assert_eq!(at_12.superscript_scale, at_24.superscript_scale);
    }

    #[test]
    fn test_missing_x_height_fallback() {
        let provider = FixedMetricsProvider {
            x_height: 0.0,
            ..FixedMetricsProvider::default()
        };
        let metrics = FontMetrics::compute(&provider, 10.0);
        // Falls back to half the ascent: 800 * 0.5 * 10/1000 = 4.0
        assert!((metrics.x_height - 4.0).abs() < 1e-9);
    }
}
