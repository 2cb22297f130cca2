use crate::font::{FontStretch, FontStyle, FontWeight};
use galley_types::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

/// The resolved text-styling record attached to view nodes.
///
/// This is a snapshot, not a cascade: by the time a node is created every
/// value has been resolved to a concrete quantity in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSnapshot {
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub font_stretch: FontStretch,
    pub line_height: f64,
    pub color: Color,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
}

impl Default for StyleSnapshot {
    fn default() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::Normal,
            font_stretch: FontStretch::Normal,
            line_height: 14.4,
            color: Color::default(),
            text_align: TextAlign::Left,
            text_decoration: TextDecoration::None,
        }
    }
}

impl StyleSnapshot {
    /// Returns a copy with a different font size, scaling line height
    /// proportionally.
    pub fn with_font_size(&self, size: f64) -> Self {
        let ratio = if self.font_size > 0.0 {
            self.line_height / self.font_size
        } else {
            1.2
        };
        Self {
            font_size: size,
            line_height: size * ratio,
            ..self.clone()
        }
    }
}
