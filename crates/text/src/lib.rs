//! Text shaping.
//!
//! Turns (font, text) into positioned glyph runs with script/direction
//! classification, a cluster map back to source bytes, and line-break
//! opportunities. Results are immutable, reference-counted, and memoized.

pub mod result;
pub mod script;
pub mod shaper;

pub use result::{ShapedGlyph, TextShapeResult, PENALTY_NO_BREAK};
pub use script::{detect_direction, detect_script, needs_complex_shaping, Direction, Script};
pub use shaper::TextShaper;
