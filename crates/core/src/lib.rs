//! # galley-core
//!
//! Integration layer of the galley layout engine: the typesetting facade,
//! the option records, and the bridge from abstract content trees to the
//! math element model.
//!
//! This crate has no platform dependencies: no filesystem access, no system
//! font discovery, no threads. Platform capabilities arrive through the
//! traits in `galley-traits`.

pub mod bridge;
pub mod error;
pub mod options;
pub mod typesetter;

pub use bridge::math_from_content;
pub use error::TypesetError;
pub use options::{MathTypesetOptions, TypesetOptions};
pub use typesetter::Typesetter;

// Re-export commonly used types from the member crates
pub use galley_math::{MathContext, MathElement, MathLayoutEngine, MathStyle};
pub use galley_text::{TextShapeResult, TextShaper};
pub use galley_types::{DocumentMeta, Margins, Point, Rect, Size};
pub use galley_viewtree::{NodeId, NodeKind, ViewNode, ViewTree};
