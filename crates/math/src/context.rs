//! The layout context threaded down the math recursion.

use galley_font::Font;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The four TeX-style layout levels. Descending a script or a fraction
/// child steps one level toward `ScriptScript`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MathStyle {
    ScriptScript,
    Script,
    Text,
    Display,
}

impl MathStyle {
    /// One level smaller, saturating at `ScriptScript`.
    pub fn smaller(self) -> Self {
        match self {
            MathStyle::Display => MathStyle::Text,
            MathStyle::Text => MathStyle::Script,
            MathStyle::Script | MathStyle::ScriptScript => MathStyle::ScriptScript,
        }
    }

    /// Script and scriptscript styles suppress inter-atom spacing.
    pub fn is_script(self) -> bool {
        self <= MathStyle::Script
    }
}

/// Per-subtree layout state, passed by value down the recursion.
#[derive(Debug, Clone)]
pub struct MathContext {
    pub style: MathStyle,
    /// Cramped layout suppresses the extra superscript raise; used for
    /// denominators, subscripts, and radicands.
    pub cramped: bool,
    pub font_size: f64,
    pub math_font: Arc<Font>,
    pub text_font: Arc<Font>,
}

impl MathContext {
    pub fn new(style: MathStyle, font_size: f64, math_font: Arc<Font>, text_font: Arc<Font>) -> Self {
        Self {
            style,
            cramped: false,
            font_size,
            math_font,
            text_font,
        }
    }

    /// Same context with cramping on.
    pub fn cramped(&self) -> Self {
        Self {
            cramped: true,
            ..self.clone()
        }
    }

    /// Context for a fraction numerator: one level down, uncramped.
    pub fn numerator(&self) -> Self {
        Self {
            style: self.style.smaller(),
            cramped: false,
            ..self.clone()
        }
    }

    /// Context for a fraction denominator: one level down, cramped.
    pub fn denominator(&self) -> Self {
        Self {
            style: self.style.smaller(),
            cramped: true,
            ..self.clone()
        }
    }
}
