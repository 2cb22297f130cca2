//! # galley
//!
//! A device-independent document layout engine. Galley converts abstract
//! content trees into positioned, styled view trees in absolute
//! typographical coordinates, ready for rendering to arbitrary output
//! formats.
//!
//! The workspace splits into foundation crates (geometry, styles, the view
//! tree, platform traits), algorithm crates (font management and metrics,
//! text shaping, math layout), and this facade, which re-exports the public
//! surface.
//!
//! ```no_run
//! use galley::{ContentValue, MathTypesetOptions, Typesetter};
//! use galley::traits::InMemoryFontProvider;
//! use std::sync::Arc;
//!
//! let typesetter = Typesetter::new(Arc::new(InMemoryFontProvider::new()));
//! let expression = ContentValue::element(
//!     "frac",
//!     vec![ContentValue::text("x"), ContentValue::Number(2.0)],
//! );
//! let tree = typesetter
//!     .typeset_math(&expression, &MathTypesetOptions::default())
//!     .unwrap();
//! assert!(tree.root().is_some());
//! ```

// Re-export member crates under stable names
pub use galley_core as core;
pub use galley_font as font;
pub use galley_math as math;
pub use galley_style as style;
pub use galley_text as text;
pub use galley_traits as traits;
pub use galley_types as types;
pub use galley_viewtree as viewtree;

// The common surface, flattened for convenience
pub use galley_core::{
    math_from_content, MathTypesetOptions, TypesetError, TypesetOptions, Typesetter,
};
pub use galley_font::{FontManager, FontMetrics, FontMetricsProvider};
pub use galley_math::{validate_math_tree, MathContext, MathElement, MathLayoutEngine, MathStyle};
pub use galley_style::{FontStretch, FontStyle, FontWeight, StyleSnapshot};
pub use galley_text::{Direction, Script, TextShapeResult, TextShaper};
pub use galley_traits::{ContentItem, ContentValue, FontProvider, InMemoryFontProvider};
pub use galley_types::{Color, DocumentMeta, Margins, Point, Rect, Size};
pub use galley_viewtree::{NodeId, NodeKind, TreeError, ViewNode, ViewTree};
