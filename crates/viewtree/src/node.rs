//! View node variants and their content payloads.

use galley_style::StyleSnapshot;
use galley_types::{Point, Rect};
use std::sync::Arc;

/// A stable handle to a node in a [`ViewTree`](crate::ViewTree) arena.
///
/// Ids are only ever handed out for live slots and become invalid when the
/// subtree owning the node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single positioned glyph inside a text run, in coordinates relative to
/// the run's origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedGlyph {
    pub glyph_id: u32,
    pub codepoint: char,
    pub x: f64,
    pub y: f64,
    pub advance: f64,
}

/// Content payload for a `TextRun` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRunContent {
    /// The original text of the run.
    pub text: String,
    /// Resolved font family the glyphs were shaped with.
    pub font_family: String,
    pub font_size: f64,
    /// Positioned glyphs relative to the run origin.
    pub glyphs: Vec<PositionedGlyph>,
    /// Baseline y, measured down from the run's top edge.
    pub baseline: f64,
}

/// Content payload for a single `Glyph` node (used for stretched or
/// stand-alone symbols like radical signs).
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphContent {
    pub glyph_id: u32,
    pub codepoint: char,
    pub font_size: f64,
}

/// A straight line segment, e.g. a fraction rule or radical overbar.
/// Endpoints are relative to the node's bounds origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LineContent {
    pub from: Point,
    pub to: Point,
    pub thickness: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    Close,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathContent {
    pub commands: Vec<PathCommand>,
}

/// A 2D affine transform in column-major [a b c d e f] form, applied to all
/// descendants of the node.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformContent {
    pub matrix: [f64; 6],
}

impl Default for TransformContent {
    fn default() -> Self {
        Self {
            matrix: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        }
    }
}

/// Clips all descendants to a rectangle in absolute coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipContent {
    pub rect: Rect,
}

/// The tagged node variant. Container variants carry no payload of their
/// own; leaf variants carry the data renderers draw from.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    Page,
    Block,
    Inline,
    TextRun(TextRunContent),
    MathElement,
    Glyph(GlyphContent),
    Line(LineContent),
    Rectangle,
    Path(PathContent),
    Group,
    Transform(TransformContent),
    Clip(ClipContent),
}

impl NodeKind {
    /// A string identifier for the node variant, for logging and debugging.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Page => "page",
            NodeKind::Block => "block",
            NodeKind::Inline => "inline",
            NodeKind::TextRun(_) => "text-run",
            NodeKind::MathElement => "math-element",
            NodeKind::Glyph(_) => "glyph",
            NodeKind::Line(_) => "line",
            NodeKind::Rectangle => "rectangle",
            NodeKind::Path(_) => "path",
            NodeKind::Group => "group",
            NodeKind::Transform(_) => "transform",
            NodeKind::Clip(_) => "clip",
        }
    }
}

/// One node in the view tree: a variant tag with payload, absolute bounds,
/// an optional resolved style, and exclusively-owned children.
#[derive(Debug, Clone)]
pub struct ViewNode {
    pub kind: NodeKind,
    /// Absolute bounds in points. Mutable while the producing layout pass
    /// runs; once the tree is shared (wrapped in `Arc`) it is read-only.
    pub bounds: Rect,
    pub style: Option<Arc<StyleSnapshot>>,
    /// Semantic role assigned by the producer (e.g. "numerator").
    pub role: Option<String>,
    /// Document-unique identifier, if the producer assigned one.
    pub id: Option<String>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl ViewNode {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            bounds: Rect::default(),
            style: None,
            role: None,
            id: None,
            children: Vec::new(),
            parent: None,
        }
    }

    /// Child ids in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}
