pub mod color;
pub mod document;
pub mod geometry;

pub use color::Color;
pub use document::DocumentMeta;
pub use geometry::{Margins, Point, Rect, Size};
