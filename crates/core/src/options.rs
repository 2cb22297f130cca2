//! Typesetting option records.
//!
//! Plain serde-friendly structs with documented defaults; every field is
//! optional in serialized form and falls back to the default value.

use galley_math::MathStyle;
use galley_types::{Margins, Size};
use serde::{Deserialize, Serialize};

/// Document-level typesetting options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypesetOptions {
    /// Page size in points. Defaults to A4 (595.276 × 841.89).
    pub page_size: Size,
    /// Page margins in points. Defaults to 2cm on every side.
    pub margins: Margins,
    /// Family used for body text. Defaults to "Helvetica".
    pub default_font_family: String,
    /// Body font size in points. Defaults to 12.
    pub default_font_size: f64,
    /// Line height as a multiple of the font size. Defaults to 1.2.
    pub line_height: f64,
    /// Global scale applied to all mathematics. Defaults to 1.0.
    pub math_scale: f64,
}

impl Default for TypesetOptions {
    fn default() -> Self {
        Self {
            page_size: Size::new(595.276, 841.89),
            margins: Margins::default(),
            default_font_family: "Helvetica".to_string(),
            default_font_size: 12.0,
            line_height: 1.2,
            math_scale: 1.0,
        }
    }
}

/// Options for typesetting a single math expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MathTypesetOptions {
    /// Layout style the expression starts in. Defaults to text style.
    pub style: MathStyle,
    /// Additional scale on top of the document math scale. Defaults to 1.0.
    pub math_scale: f64,
    /// Forces display style regardless of `style`. Defaults to false.
    pub force_display: bool,
    /// Family used for math symbols. Defaults to "STIX Two Math".
    pub math_font_family: String,
    /// Baseline-to-baseline distance for stacked math lines, in points.
    /// Defaults to 14.4 (1.2 × the 12pt default font).
    pub baseline_skip: f64,
    /// Horizontal padding around inline math, in points. Defaults to 3.
    pub inline_surround: f64,
}

impl Default for MathTypesetOptions {
    fn default() -> Self {
        Self {
            style: MathStyle::Text,
            math_scale: 1.0,
            force_display: false,
            math_font_family: "STIX Two Math".to_string(),
            baseline_skip: 14.4,
            inline_surround: 3.0,
        }
    }
}

impl MathTypesetOptions {
    /// The style actually used, honoring `force_display`.
    pub fn effective_style(&self) -> MathStyle {
        if self.force_display {
            MathStyle::Display
        } else {
            self.style
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = TypesetOptions::default();
        assert!((options.page_size.width - 595.276).abs() < 1e-9);
        assert!((options.page_size.height - 841.89).abs() < 1e-9);
        assert_eq!(options.default_font_family, "Helvetica");
        assert_eq!(options.default_font_size, 12.0);
        assert_eq!(options.line_height, 1.2);
        assert_eq!(options.math_scale, 1.0);
    }

    #[test]
    fn test_math_defaults() {
        let options = MathTypesetOptions::default();
        assert_eq!(options.style, MathStyle::Text);
        assert!(!options.force_display);
        assert_eq!(options.effective_style(), MathStyle::Text);

        let forced = MathTypesetOptions {
            force_display: true,
            ..MathTypesetOptions::default()
        };
        assert_eq!(forced.effective_style(), MathStyle::Display);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let options: TypesetOptions =
            serde_json::from_str(r#"{"defaultFontSize": 10.0}"#).unwrap();
        assert_eq!(options.default_font_size, 10.0);
        assert_eq!(options.default_font_family, "Helvetica");

        let math: MathTypesetOptions =
            serde_json::from_str(r#"{"style": "display", "mathScale": 1.5}"#).unwrap();
        assert_eq!(math.style, MathStyle::Display);
        assert_eq!(math.math_scale, 1.5);
        assert_eq!(math.math_font_family, "STIX Two Math");
    }
}
