//! The math element tree.
//!
//! Built by the content bridge (or directly by embedders) and consumed by
//! the layout engine. Required children are `Option`s so that malformed
//! input can be represented, detected by [`validate_math_tree`], and
//! degraded gracefully instead of crashing; the checked constructors reject
//! missing children up front.

use crate::error::MathError;

/// What an atom's text is, which picks the font it is shaped with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomKind {
    /// A mathematical symbol or identifier, shaped with the math font.
    Symbol,
    /// Digits, shaped with the math font.
    Number,
    /// Ordinary words (e.g. "if", "otherwise"), shaped with the text font.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptPlacement {
    Superscript,
    Subscript,
}

/// One node of a math expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum MathElement {
    Atom {
        kind: AtomKind,
        text: String,
    },
    /// Horizontal juxtaposition with class-based inter-atom spacing.
    Row(Vec<MathElement>),
    Fraction {
        numerator: Option<Box<MathElement>>,
        denominator: Option<Box<MathElement>>,
    },
    Script {
        base: Option<Box<MathElement>>,
        script: Option<Box<MathElement>>,
        placement: ScriptPlacement,
    },
    Radical {
        radicand: Option<Box<MathElement>>,
        index: Option<Box<MathElement>>,
    },
    Operator {
        name: String,
        lower: Option<Box<MathElement>>,
        upper: Option<Box<MathElement>>,
    },
    Matrix {
        rows: Vec<Vec<MathElement>>,
    },
    Accent {
        base: Option<Box<MathElement>>,
        accent: char,
    },
}

impl MathElement {
    pub fn symbol(text: impl Into<String>) -> Self {
        MathElement::Atom {
            kind: AtomKind::Symbol,
            text: text.into(),
        }
    }

    pub fn number(text: impl Into<String>) -> Self {
        MathElement::Atom {
            kind: AtomKind::Number,
            text: text.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        MathElement::Atom {
            kind: AtomKind::Text,
            text: text.into(),
        }
    }

    /// A fraction from known-present children.
    pub fn fraction(numerator: MathElement, denominator: MathElement) -> Self {
        MathElement::Fraction {
            numerator: Some(Box::new(numerator)),
            denominator: Some(Box::new(denominator)),
        }
    }

    /// Checked fraction construction: fails with a structural error when
    /// either child is absent.
    pub fn try_fraction(
        numerator: Option<MathElement>,
        denominator: Option<MathElement>,
    ) -> Result<Self, MathError> {
        match (numerator, denominator) {
            (Some(n), Some(d)) => Ok(MathElement::fraction(n, d)),
            (None, _) => Err(MathError::structural("fraction", "numerator")),
            (_, None) => Err(MathError::structural("fraction", "denominator")),
        }
    }

    pub fn superscript(base: MathElement, script: MathElement) -> Self {
        MathElement::Script {
            base: Some(Box::new(base)),
            script: Some(Box::new(script)),
            placement: ScriptPlacement::Superscript,
        }
    }

    pub fn subscript(base: MathElement, script: MathElement) -> Self {
        MathElement::Script {
            base: Some(Box::new(base)),
            script: Some(Box::new(script)),
            placement: ScriptPlacement::Subscript,
        }
    }

    /// Checked script construction.
    pub fn try_script(
        base: Option<MathElement>,
        script: Option<MathElement>,
        placement: ScriptPlacement,
    ) -> Result<Self, MathError> {
        match (base, script) {
            (Some(b), Some(s)) => Ok(MathElement::Script {
                base: Some(Box::new(b)),
                script: Some(Box::new(s)),
                placement,
            }),
            (None, _) => Err(MathError::structural("script", "base")),
            (_, None) => Err(MathError::structural("script", "script")),
        }
    }

    pub fn radical(radicand: MathElement, index: Option<MathElement>) -> Self {
        MathElement::Radical {
            radicand: Some(Box::new(radicand)),
            index: index.map(Box::new),
        }
    }

    /// Checked radical construction.
    pub fn try_radical(
        radicand: Option<MathElement>,
        index: Option<MathElement>,
    ) -> Result<Self, MathError> {
        match radicand {
            Some(r) => Ok(MathElement::radical(r, index)),
            None => Err(MathError::structural("radical", "radicand")),
        }
    }

    pub fn operator(name: impl Into<String>) -> Self {
        MathElement::Operator {
            name: name.into(),
            lower: None,
            upper: None,
        }
    }

    pub fn operator_with_limits(
        name: impl Into<String>,
        lower: Option<MathElement>,
        upper: Option<MathElement>,
    ) -> Self {
        MathElement::Operator {
            name: name.into(),
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
        }
    }

    /// A string identifier for the element kind, for logging and roles.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MathElement::Atom { .. } => "atom",
            MathElement::Row(_) => "row",
            MathElement::Fraction { .. } => "fraction",
            MathElement::Script { placement, .. } => match placement {
                ScriptPlacement::Superscript => "superscript",
                ScriptPlacement::Subscript => "subscript",
            },
            MathElement::Radical { .. } => "radical",
            MathElement::Operator { .. } => "operator",
            MathElement::Matrix { .. } => "matrix",
            MathElement::Accent { .. } => "accent",
        }
    }
}

/// Recursively checks the required-children invariants: fractions carry
/// both numerator and denominator, scripts both base and script, radicals a
/// radicand, accents a base. Returns false on the first violation and never
/// panics.
pub fn validate_math_tree(element: &MathElement) -> bool {
    match element {
        MathElement::Atom { .. } => true,
        MathElement::Row(children) => children.iter().all(validate_math_tree),
        MathElement::Fraction {
            numerator,
            denominator,
        } => match (numerator, denominator) {
            (Some(n), Some(d)) => validate_math_tree(n) && validate_math_tree(d),
            _ => false,
        },
        MathElement::Script { base, script, .. } => match (base, script) {
            (Some(b), Some(s)) => validate_math_tree(b) && validate_math_tree(s),
            _ => false,
        },
        MathElement::Radical { radicand, index } => match radicand {
            Some(r) => {
                validate_math_tree(r)
                    && index.as_deref().map(validate_math_tree).unwrap_or(true)
            }
            None => false,
        },
        MathElement::Operator { lower, upper, .. } => {
            lower.as_deref().map(validate_math_tree).unwrap_or(true)
                && upper.as_deref().map(validate_math_tree).unwrap_or(true)
        }
        MathElement::Matrix { rows } => rows
            .iter()
            .all(|row| row.iter().all(validate_math_tree)),
        MathElement::Accent { base, .. } => match base {
            Some(b) => validate_math_tree(b),
            None => false,
        },
    }
}
