//! Mathematical layout.
//!
//! Positions a math-element tree (fractions, scripts, radicals, operators,
//! matrices, accents) into view-tree nodes, aligning constructs on the text
//! baseline and the math axis using scaled font metrics and shaped atoms.

pub mod context;
pub mod element;
pub mod engine;
pub mod error;
pub mod symbols;

pub use context::{MathContext, MathStyle};
pub use element::{validate_math_tree, AtomKind, MathElement, ScriptPlacement};
pub use engine::{MathBox, MathLayoutEngine, MathLayoutOptions};
pub use error::MathError;
pub use symbols::{
    atom_space_em, classify_atom, classify_char, resolve_accent, resolve_operator, AtomClass,
    OperatorSymbol,
};

#[cfg(test)]
mod engine_test;
