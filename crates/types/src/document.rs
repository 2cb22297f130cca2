use serde::{Deserialize, Serialize};

/// Document-level metadata carried on a view tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// The document title, if known.
    pub title: Option<String>,
    /// The document author, if known.
    pub author: Option<String>,
}
