//! Device-independent view tree.
//!
//! This crate defines the node/tree data model every layout producer in the
//! workspace emits and every renderer consumes: positioned, styled nodes in
//! absolute typographical coordinates, owned by a single arena per tree.

mod error;
mod node;
mod tree;

pub use error::TreeError;
pub use node::{
    ClipContent, GlyphContent, LineContent, NodeId, NodeKind, PathCommand, PathContent,
    PositionedGlyph, TextRunContent, TransformContent, ViewNode,
};
pub use tree::{Descendants, ViewTree};
