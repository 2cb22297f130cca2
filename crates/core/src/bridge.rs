//! Bridges abstract content trees onto math elements.
//!
//! The bridge is deliberately forgiving: elements with missing children
//! produce structurally incomplete math nodes, which the layout engine
//! detects and degrades per its error policy instead of the bridge guessing
//! repairs.

use galley_math::{resolve_accent, MathElement, ScriptPlacement};
use galley_traits::ContentItem;

/// Builds a math element tree from a content item.
pub fn math_from_content(item: &dyn ContentItem) -> MathElement {
    if let Some(s) = item.as_str() {
        return atom_from_text(s);
    }
    if let Some(n) = item.as_number() {
        return MathElement::number(format_number(n));
    }
    if item.is_list() {
        return MathElement::Row(bridged_children(item));
    }

    let Some(name) = item.operator_name() else {
        // Booleans and nulls have no mathematical content.
        return MathElement::Row(Vec::new());
    };

    match name {
        "frac" | "fraction" => MathElement::Fraction {
            numerator: boxed_child(item, 0),
            denominator: boxed_child(item, 1),
        },
        "sqrt" => MathElement::Radical {
            radicand: boxed_child(item, 0),
            index: None,
        },
        "root" => MathElement::Radical {
            radicand: boxed_child(item, 0),
            index: boxed_child(item, 1),
        },
        "sup" | "superscript" => MathElement::Script {
            base: boxed_child(item, 0),
            script: boxed_child(item, 1),
            placement: ScriptPlacement::Superscript,
        },
        "sub" | "subscript" => MathElement::Script {
            base: boxed_child(item, 0),
            script: boxed_child(item, 1),
            placement: ScriptPlacement::Subscript,
        },
        "row" => MathElement::Row(bridged_children(item)),
        "matrix" => MathElement::Matrix {
            rows: matrix_rows(item),
        },
        "accent" => MathElement::Accent {
            base: boxed_child(item, 0),
            accent: accent_mark(item),
        },
        "text" => MathElement::text(concatenated_text(item)),
        _ => {
            // Named operator: attributes carry optional limits. Names the
            // symbol table does not know still render as words.
            let lower = item.attribute("lower").map(|c| Box::new(math_from_content(c)));
            let upper = item.attribute("upper").map(|c| Box::new(math_from_content(c)));
            let operator = MathElement::Operator {
                name: name.to_string(),
                lower,
                upper,
            };
            if item.child_count() > 0 {
                let mut children = vec![operator];
                children.extend(bridged_children(item));
                MathElement::Row(children)
            } else {
                operator
            }
        }
    }
}

fn bridged_children(item: &dyn ContentItem) -> Vec<MathElement> {
    (0..item.child_count())
        .filter_map(|i| item.child(i))
        .map(math_from_content)
        .collect()
}

fn boxed_child(item: &dyn ContentItem, index: usize) -> Option<Box<MathElement>> {
    item.child(index).map(|c| Box::new(math_from_content(c)))
}

fn matrix_rows(item: &dyn ContentItem) -> Vec<Vec<MathElement>> {
    (0..item.child_count())
        .filter_map(|i| item.child(i))
        .map(|row| {
            if row.is_list() || row.operator_name() == Some("row") {
                (0..row.child_count())
                    .filter_map(|j| row.child(j))
                    .map(math_from_content)
                    .collect()
            } else {
                vec![math_from_content(row)]
            }
        })
        .collect()
}

fn accent_mark(item: &dyn ContentItem) -> char {
    item.attribute("mark")
        .and_then(|m| m.as_str())
        .and_then(|s| resolve_accent(s).or_else(|| s.chars().next()))
        .unwrap_or('\u{0302}')
}

fn concatenated_text(item: &dyn ContentItem) -> String {
    let mut out = String::new();
    for i in 0..item.child_count() {
        if let Some(s) = item.child(i).and_then(|c| c.as_str()) {
            out.push_str(s);
        }
    }
    out
}

fn atom_from_text(s: &str) -> MathElement {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        MathElement::number(s)
    } else {
        MathElement::symbol(s)
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
