//! The input boundary: an abstract content tree produced by parsers.
//!
//! The layout engines never see a parser's concrete AST. They query content
//! through [`ContentItem`], a read-only view over a labeled tree of elements,
//! lists, and scalars. [`ContentValue`] is a ready-made owned implementation
//! for embedders (and tests) that have no AST of their own.

/// A read-only view of one node in an abstract content tree.
///
/// An item is one of: an element (operator name, ordered children,
/// string-keyed attributes), a list, a string, a number, a boolean, or null.
pub trait ContentItem {
    /// The operator name if this item is an element, `None` otherwise.
    fn operator_name(&self) -> Option<&str>;

    /// Number of ordered children (elements and lists; 0 for scalars).
    fn child_count(&self) -> usize;

    /// The child at `index`, or `None` if out of range.
    fn child(&self, index: usize) -> Option<&dyn ContentItem>;

    /// The named attribute of an element, or `None`.
    fn attribute(&self, name: &str) -> Option<&dyn ContentItem>;

    /// The string payload if this item is a string.
    fn as_str(&self) -> Option<&str>;

    /// The numeric payload if this item is a number.
    fn as_number(&self) -> Option<f64>;

    fn is_string(&self) -> bool {
        self.as_str().is_some()
    }

    fn is_element(&self) -> bool {
        self.operator_name().is_some()
    }

    fn is_list(&self) -> bool;
}

/// An owned content-tree value implementing [`ContentItem`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContentValue {
    Element {
        name: String,
        children: Vec<ContentValue>,
        attributes: Vec<(String, ContentValue)>,
    },
    List(Vec<ContentValue>),
    Str(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl ContentValue {
    /// Shorthand for an element with children and no attributes.
    pub fn element(name: impl Into<String>, children: Vec<ContentValue>) -> Self {
        ContentValue::Element {
            name: name.into(),
            children,
            attributes: Vec::new(),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        ContentValue::Str(s.into())
    }

    /// Adds or replaces an attribute, returning the modified element.
    /// No-op on non-elements.
    pub fn with_attribute(mut self, name: impl Into<String>, value: ContentValue) -> Self {
        if let ContentValue::Element { attributes, .. } = &mut self {
            let name = name.into();
            attributes.retain(|(n, _)| n != &name);
            attributes.push((name, value));
        }
        self
    }
}

impl ContentItem for ContentValue {
    fn operator_name(&self) -> Option<&str> {
        match self {
            ContentValue::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    fn child_count(&self) -> usize {
        match self {
            ContentValue::Element { children, .. } => children.len(),
            ContentValue::List(items) => items.len(),
            _ => 0,
        }
    }

    fn child(&self, index: usize) -> Option<&dyn ContentItem> {
        match self {
            ContentValue::Element { children, .. } => {
                children.get(index).map(|c| c as &dyn ContentItem)
            }
            ContentValue::List(items) => items.get(index).map(|c| c as &dyn ContentItem),
            _ => None,
        }
    }

    fn attribute(&self, name: &str) -> Option<&dyn ContentItem> {
        match self {
            ContentValue::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v as &dyn ContentItem),
            _ => None,
        }
    }

    fn as_str(&self) -> Option<&str> {
        match self {
            ContentValue::Str(s) => Some(s),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            ContentValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn is_list(&self) -> bool {
        matches!(self, ContentValue::List(_))
    }
}
