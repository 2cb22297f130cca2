//! Metrics provider implementations.

use crate::metrics::FontMetricsProvider;
use galley_traits::{FontError, SharedFontData};

/// Metrics provider backed by `ttf-parser` over shared font bytes.
///
/// The face is re-parsed on each call rather than stored: parsing is a cheap
/// header read and a borrowed `Face` inside the struct would make it
/// self-referential.
pub struct TtfMetricsProvider {
    data: SharedFontData,
    face_index: u32,
    units_per_em: u16,
}

impl std::fmt::Debug for TtfMetricsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfMetricsProvider")
            .field("data_len", &self.data.len())
            .field("face_index", &self.face_index)
            .finish()
    }
}

impl TtfMetricsProvider {
    /// Validates the font data and captures the em size.
    ///
    /// # Errors
    ///
    /// Returns `FontError::ParseError` if the bytes are not a parseable face.
    pub fn new(data: SharedFontData) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| FontError::ParseError(e.to_string()))?;
        let units_per_em = face.units_per_em();
        Ok(Self {
            data,
            face_index: 0,
            units_per_em,
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.face_index).ok()
    }
}

impl FontMetricsProvider for TtfMetricsProvider {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn raw_ascent(&self) -> f64 {
        self.face().map(|f| f.ascender() as f64).unwrap_or(0.0)
    }

    fn raw_descent(&self) -> f64 {
        // ttf descender is negative below the baseline
        self.face().map(|f| -f.descender() as f64).unwrap_or(0.0)
    }

    fn raw_line_gap(&self) -> f64 {
        self.face().map(|f| f.line_gap() as f64).unwrap_or(0.0)
    }

    fn raw_x_height(&self) -> f64 {
        self.face()
            .and_then(|f| f.x_height())
            .map(|h| h as f64)
            .unwrap_or(0.0)
    }

    fn raw_cap_height(&self) -> f64 {
        self.face()
            .and_then(|f| f.capital_height())
            .map(|h| h as f64)
            .unwrap_or(0.0)
    }

    fn glyph_index(&self, c: char) -> Option<u32> {
        self.face()
            .and_then(|f| f.glyph_index(c))
            .map(|g| g.0 as u32)
    }

    fn advance(&self, glyph: u32) -> Option<f64> {
        let id = u16::try_from(glyph).ok()?;
        self.face()
            .and_then(|f| f.glyph_hor_advance(ttf_parser::GlyphId(id)))
            .map(|a| a as f64)
    }
}

/// Deterministic metrics with no font file behind them.
///
/// Used by tests and as the last-resort font when no provider can supply
/// data. Glyph ids are the codepoint values themselves, so shaping stays
/// well-defined.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedMetricsProvider {
    pub units_per_em: u16,
    pub ascent: f64,
    pub descent: f64,
    pub line_gap: f64,
    pub x_height: f64,
    pub cap_height: f64,
    /// Advance of every non-space glyph, in font units.
    pub advance: f64,
    /// Advance of the space glyph, in font units.
    pub space: f64,
}

impl Default for FixedMetricsProvider {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            ascent: 800.0,
            descent: 200.0,
            line_gap: 0.0,
            x_height: 500.0,
            cap_height: 700.0,
            advance: 600.0,
            space: 250.0,
        }
    }
}

impl FontMetricsProvider for FixedMetricsProvider {
    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn raw_ascent(&self) -> f64 {
        self.ascent
    }

    fn raw_descent(&self) -> f64 {
        self.descent
    }

    fn raw_line_gap(&self) -> f64 {
        self.line_gap
    }

    fn raw_x_height(&self) -> f64 {
        self.x_height
    }

    fn raw_cap_height(&self) -> f64 {
        self.cap_height
    }

    fn glyph_index(&self, c: char) -> Option<u32> {
        Some(c as u32)
    }

    fn advance(&self, glyph: u32) -> Option<f64> {
        if glyph == ' ' as u32 || glyph == '\t' as u32 {
            Some(self.space)
        } else {
            Some(self.advance)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_provider_glyphs() {
        let provider = FixedMetricsProvider::default();
        assert_eq!(provider.glyph_index('A'), Some(65));
        assert_eq!(provider.advance('A' as u32), Some(600.0));
        assert_eq!(provider.advance(' ' as u32), Some(250.0));
        assert_eq!(provider.space_advance(), 250.0);
    }

    #[test]
    fn test_ttf_provider_rejects_garbage() {
        let data = std::sync::Arc::new(vec![0u8, 1, 2, 3]);
        assert!(matches!(
            TtfMetricsProvider::new(data),
            Err(FontError::ParseError(_))
        ));
    }
}
