//! Shared fixtures for the integration suite.

use galley::{ContentValue, Typesetter};
use galley::traits::InMemoryFontProvider;
use serde_json::Value;
use std::sync::Arc;

/// A typesetter over an empty in-memory provider: every font resolves to
/// the synthesized fallback with deterministic fixed metrics (upem 1000,
/// ascent 800, descent 200, x-height 500, advance 600, space 250).
pub fn typesetter() -> Typesetter {
    Typesetter::new(Arc::new(InMemoryFontProvider::new()))
}

/// Builds a content tree from a JSON description.
///
/// Objects are elements: `{"op": "frac", "children": [...], "attrs": {...}}`.
/// Strings, numbers, booleans, null, and arrays map to their content
/// counterparts.
pub fn content_from_json(value: &Value) -> ContentValue {
    match value {
        Value::Null => ContentValue::Null,
        Value::Bool(b) => ContentValue::Bool(*b),
        Value::Number(n) => ContentValue::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => ContentValue::text(s.clone()),
        Value::Array(items) => {
            ContentValue::List(items.iter().map(content_from_json).collect())
        }
        Value::Object(map) => {
            let name = map
                .get("op")
                .and_then(Value::as_str)
                .unwrap_or("row")
                .to_string();
            let children = map
                .get("children")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(content_from_json).collect())
                .unwrap_or_default();
            let mut element = ContentValue::element(name, children);
            if let Some(Value::Object(attrs)) = map.get("attrs") {
                for (key, attr) in attrs {
                    element = element.with_attribute(key.clone(), content_from_json(attr));
                }
            }
            element
        }
    }
}
