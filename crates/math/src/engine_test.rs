//! Geometry tests for the math layout engine, driven by the deterministic
//! fixed metrics (upem 1000, ascent 800, descent 200, x-height 500, advance
//! 600, space 250).

use crate::context::{MathContext, MathStyle};
use crate::element::{MathElement, ScriptPlacement};
use crate::engine::MathLayoutEngine;
use crate::error::MathError;
use galley_font::FontManager;
use galley_style::{FontStyle, FontWeight};
use galley_traits::InMemoryFontProvider;
use galley_viewtree::{NodeId, NodeKind, ViewTree};
use std::sync::Arc;

const EPS: f64 = 1e-9;

fn engine() -> (MathLayoutEngine, Arc<FontManager>) {
    let fonts = Arc::new(FontManager::new(Arc::new(InMemoryFontProvider::new())));
    let shaper = Arc::new(galley_text::TextShaper::new());
    (MathLayoutEngine::new(fonts.clone(), shaper), fonts)
}

fn context(fonts: &Arc<FontManager>, style: MathStyle, size: f64) -> MathContext {
    let math_font = fonts.get_font("Math", size, &FontWeight::Regular, &FontStyle::Normal);
    let text_font = fonts.get_font("Body", size, &FontWeight::Regular, &FontStyle::Normal);
    MathContext::new(style, size, math_font, text_font)
}

fn layout_rooted(element: &MathElement) -> (ViewTree, NodeId) {
    let (engine, fonts) = engine();
    let ctx = context(&fonts, MathStyle::Text, 12.0);
    let mut tree = ViewTree::new();
    let root = engine.layout(element, &ctx, &mut tree).unwrap();
    tree.set_root(root).unwrap();
    (tree, root)
}

fn font_size_of(tree: &ViewTree, id: NodeId) -> Option<f64> {
    match &tree.node(id)?.kind {
        NodeKind::TextRun(run) => Some(run.font_size),
        _ => None,
    }
}

#[test]
fn test_atom_bounds_match_shaped_text() {
    let (tree, root) = layout_rooted(&MathElement::symbol("x"));
    let bounds = tree.node(root).unwrap().bounds;
    // One glyph at 600/1000 * 12pt; height is ascent + descent.
    assert!((bounds.width - 7.2).abs() < EPS);
    assert!((bounds.height - 12.0).abs() < EPS);
}

#[test]
fn test_fraction_stacks_about_the_axis() {
    let element = MathElement::fraction(MathElement::symbol("x"), MathElement::number("2"));
    let (tree, root) = layout_rooted(&element);

    // rule thickness 0.04 * 12 = 0.48, gap 3 * 0.48 = 1.44, child height 12
    let bounds = tree.node(root).unwrap().bounds;
    assert!((bounds.height - (12.0 + 1.44 + 12.0)).abs() < EPS);
    assert!((bounds.width - 7.2).abs() < EPS);

    let num = tree.find_by_role("numerator").unwrap();
    let den = tree.find_by_role("denominator").unwrap();
    let rule = tree.find_by_role("rule").unwrap();

    let num_bounds = tree.node(num).unwrap().bounds;
    let den_bounds = tree.node(den).unwrap().bounds;
    let rule_bounds = tree.node(rule).unwrap().bounds;

    // Numerator above the rule, denominator below it.
    let rule_center = rule_bounds.y + rule_bounds.height / 2.0;
    assert!(num_bounds.bottom() <= rule_bounds.y + EPS);
    assert!(den_bounds.y >= rule_bounds.bottom() - EPS);
    assert!((rule_center - (12.0 + 1.44 / 2.0)).abs() < EPS);

    // The rule sits on the math axis: axis height above the baseline, with
    // fixed metrics x-height 6pt at 12pt so axis = 3pt.
    let ascent = 12.0 + 1.44 / 2.0 + 3.0;
    assert!((ascent - rule_center - 3.0).abs() < EPS);
}

#[test]
fn test_fraction_width_is_max_of_children() {
    let element = MathElement::fraction(
        MathElement::symbol("xyz"),
        MathElement::number("2"),
    );
    let (tree, root) = layout_rooted(&element);
    let bounds = tree.node(root).unwrap().bounds;
    assert!((bounds.width - 3.0 * 7.2).abs() < EPS);

    // The narrower child is centered.
    let den = tree.find_by_role("denominator").unwrap();
    let den_bounds = tree.node(den).unwrap().bounds;
    assert!((den_bounds.x - (21.6 - 7.2) / 2.0).abs() < EPS);
}

#[test]
fn test_fraction_missing_child_is_structural_error() {
    let (engine, fonts) = engine();
    let ctx = context(&fonts, MathStyle::Text, 12.0);
    let mut tree = ViewTree::new();

    let element = MathElement::Fraction {
        numerator: None,
        denominator: Some(Box::new(MathElement::number("2"))),
    };
    let result = engine.layout(&element, &ctx, &mut tree);
    assert!(matches!(
        result,
        Err(MathError::Structural {
            construct: "fraction",
            missing: "numerator"
        })
    ));
}

#[test]
fn test_superscript_offset_and_scale() {
    let element = MathElement::superscript(MathElement::symbol("x"), MathElement::number("2"));
    let (tree, root) = layout_rooted(&element);

    let base = tree.find_by_role("base").unwrap();
    let script = tree.find_by_role("script").unwrap();

    // Script font size scales by 0.7.
    assert!((font_size_of(&tree, script).unwrap() - 8.4).abs() < EPS);

    // The script baseline sits scaled_ascent(12) * 0.6 = 5.76pt above the
    // base baseline. Baselines are top + ascent of each run.
    let base_bounds = tree.node(base).unwrap().bounds;
    let script_bounds = tree.node(script).unwrap().bounds;
    let base_baseline = base_bounds.y + 9.6;
    let script_baseline = script_bounds.y + 9.6 * 0.7;
    assert!((base_baseline - script_baseline - 5.76).abs() < EPS);

    // Script is placed after the base.
    assert!((script_bounds.x - base_bounds.right()).abs() < EPS);

    let bounds = tree.node(root).unwrap().bounds;
    assert!((bounds.width - (7.2 + 7.2 * 0.7)).abs() < EPS);
}

#[test]
fn test_subscript_drops_below_baseline() {
    let element = MathElement::subscript(MathElement::symbol("x"), MathElement::symbol("i"));
    let (tree, _) = layout_rooted(&element);

    let base = tree.find_by_role("base").unwrap();
    let script = tree.find_by_role("script").unwrap();

    let base_baseline = tree.node(base).unwrap().bounds.y + 9.6;
    let script_baseline = tree.node(script).unwrap().bounds.y + 9.6 * 0.7;
    // subscript_offset = scaled_descent(12) * 0.4 = 0.96 below the baseline
    assert!((script_baseline - base_baseline - 0.96).abs() < EPS);
}

#[test]
fn test_script_missing_children_are_structural_errors() {
    let (engine, fonts) = engine();
    let ctx = context(&fonts, MathStyle::Text, 12.0);
    let mut tree = ViewTree::new();

    let no_base = MathElement::Script {
        base: None,
        script: Some(Box::new(MathElement::number("2"))),
        placement: ScriptPlacement::Superscript,
    };
    assert!(matches!(
        engine.layout(&no_base, &ctx, &mut tree),
        Err(MathError::Structural { missing: "base", .. })
    ));

    let no_script = MathElement::Script {
        base: Some(Box::new(MathElement::symbol("x"))),
        script: None,
        placement: ScriptPlacement::Subscript,
    };
    assert!(matches!(
        engine.layout(&no_script, &ctx, &mut tree),
        Err(MathError::Structural { missing: "script", .. })
    ));
}

#[test]
fn test_radical_sign_stretches_to_radicand() {
    let element = MathElement::radical(MathElement::symbol("x"), None);
    let (tree, root) = layout_rooted(&element);

    let sign = tree.find_by_role("radical-sign").unwrap();
    let sign_bounds = tree.node(sign).unwrap().bounds;
    // thickness 0.48, clearance 0.96, radicand height 12
    assert!((sign_bounds.height - (12.0 + 0.96 + 0.48)).abs() < EPS);

    let radicand = tree.find_by_role("radicand").unwrap();
    let rad_bounds = tree.node(radicand).unwrap().bounds;
    assert!(rad_bounds.x >= sign_bounds.right() - EPS);

    let overbar = tree.find_by_role("overbar").unwrap();
    let bar_bounds = tree.node(overbar).unwrap().bounds;
    assert!(bar_bounds.y < rad_bounds.y);
    assert!((bar_bounds.width - rad_bounds.width).abs() < EPS);

    assert!(tree.node(root).unwrap().bounds.width > 0.0);
}

#[test]
fn test_radical_index_is_upper_left_and_small() {
    let element = MathElement::radical(
        MathElement::symbol("x"),
        Some(MathElement::number("3")),
    );
    let (tree, _) = layout_rooted(&element);

    let index = tree.find_by_role("index").unwrap();
    let sign = tree.find_by_role("radical-sign").unwrap();
    let index_bounds = tree.node(index).unwrap().bounds;
    let sign_bounds = tree.node(sign).unwrap().bounds;

    assert!(index_bounds.x < sign_bounds.x);
    // Second-order script scale: 12 * 0.7 * 0.7
    assert!((font_size_of(&tree, index).unwrap() - 12.0 * 0.49).abs() < EPS);
}

#[test]
fn test_radical_missing_radicand_is_structural_error() {
    let (engine, fonts) = engine();
    let ctx = context(&fonts, MathStyle::Text, 12.0);
    let mut tree = ViewTree::new();

    let element = MathElement::Radical {
        radicand: None,
        index: None,
    };
    assert!(matches!(
        engine.layout(&element, &ctx, &mut tree),
        Err(MathError::Structural { construct: "radical", .. })
    ));
}

#[test]
fn test_large_operator_stacks_limits() {
    let element = MathElement::operator_with_limits(
        "sum",
        Some(MathElement::symbol("i")),
        Some(MathElement::symbol("n")),
    );
    let (tree, _) = layout_rooted(&element);

    assert!(tree.find_by_role("operator-limits").is_some());
    let upper = tree.find_by_role("upper-limit").unwrap();
    let op = tree.find_by_role("operator").unwrap();
    let lower = tree.find_by_role("lower-limit").unwrap();

    let upper_bounds = tree.node(upper).unwrap().bounds;
    let op_bounds = tree.node(op).unwrap().bounds;
    let lower_bounds = tree.node(lower).unwrap().bounds;

    // Vertically stacked: upper above the glyph, lower below.
    assert!(upper_bounds.bottom() <= op_bounds.y + EPS);
    assert!(lower_bounds.y >= op_bounds.bottom() - EPS);

    // Limits shrink to script scale.
    assert!((font_size_of(&tree, upper).unwrap() - 8.4).abs() < EPS);
}

#[test]
fn test_display_style_grows_large_operator() {
    let (engine, fonts) = engine();
    let mut tree = ViewTree::new();

    let display_ctx = context(&fonts, MathStyle::Display, 12.0);
    let op = engine
        .layout(&MathElement::operator("sum"), &display_ctx, &mut tree)
        .unwrap();
    tree.set_root(op).unwrap();
    let id = tree.find_by_role("operator").unwrap();
    assert!((font_size_of(&tree, id).unwrap() - 12.0 * 1.4).abs() < EPS);
}

#[test]
fn test_small_operator_attaches_side_scripts() {
    let element = MathElement::operator_with_limits(
        "times",
        Some(MathElement::symbol("a")),
        Some(MathElement::symbol("b")),
    );
    let (tree, _) = layout_rooted(&element);

    assert!(tree.find_by_role("operator-scripts").is_some());
    let op = tree.find_by_role("operator").unwrap();
    let sup = tree.find_by_role("superscript").unwrap();
    let op_bounds = tree.node(op).unwrap().bounds;
    let sup_bounds = tree.node(sup).unwrap().bounds;
    // Scripts attach after the glyph, not above it.
    assert!((sup_bounds.x - op_bounds.right()).abs() < EPS);
}

#[test]
fn test_unknown_operator_renders_its_name() {
    let element = MathElement::operator("lim");
    let (tree, root) = layout_rooted(&element);
    let bounds = tree.node(root).unwrap().bounds;
    // Three shaped codepoints at 7.2pt each.
    assert!((bounds.width - 3.0 * 7.2).abs() < EPS);
}

#[test]
fn test_row_inserts_class_spacing() {
    let element = MathElement::Row(vec![
        MathElement::symbol("x"),
        MathElement::symbol("+"),
        MathElement::number("2"),
    ]);
    let (tree, root) = layout_rooted(&element);
    let width = tree.node(root).unwrap().bounds.width;

    // Medium spacing (4/18 em) on both sides of the binary operator.
    let expected = 3.0 * 7.2 + 2.0 * (4.0 / 18.0) * 12.0;
    assert!((width - expected).abs() < EPS);
}

#[test]
fn test_row_skips_malformed_child() {
    let element = MathElement::Row(vec![
        MathElement::symbol("x"),
        MathElement::Fraction {
            numerator: None,
            denominator: None,
        },
    ]);
    let (tree, root) = layout_rooted(&element);
    // The malformed fraction degrades to nothing; the row still lays out.
    assert!((tree.node(root).unwrap().bounds.width - 7.2).abs() < EPS);
}

#[test]
fn test_matrix_grid_and_cells() {
    let element = MathElement::Matrix {
        rows: vec![
            vec![MathElement::number("1"), MathElement::number("0")],
            vec![MathElement::number("0"), MathElement::number("1")],
        ],
    };
    let (tree, root) = layout_rooted(&element);

    let cells: Vec<_> = tree
        .descendants(root)
        .filter(|&id| tree.node(id).unwrap().role.as_deref() == Some("cell"))
        .collect();
    assert_eq!(cells.len(), 4);

    // columns: 2 * 7.2 + gap 0.5em; rows: 2 * 12 + gap 0.4em
    let bounds = tree.node(root).unwrap().bounds;
    assert!((bounds.width - (2.0 * 7.2 + 6.0)).abs() < EPS);
    assert!((bounds.height - (2.0 * 12.0 + 4.8)).abs() < EPS);
}

#[test]
fn test_accent_sits_above_base() {
    let element = MathElement::Accent {
        base: Some(Box::new(MathElement::symbol("x"))),
        accent: '\u{0302}',
    };
    let (tree, _) = layout_rooted(&element);

    let base = tree.find_by_role("base").unwrap();
    let mark = tree.find_by_role("accent-mark").unwrap();
    let base_bounds = tree.node(base).unwrap().bounds;
    let mark_bounds = tree.node(mark).unwrap().bounds;
    assert!(mark_bounds.y <= base_bounds.y);
}

#[test]
fn test_all_bounds_are_non_negative() {
    // A compound expression exercising every construct.
    let element = MathElement::Row(vec![
        MathElement::fraction(
            MathElement::superscript(MathElement::symbol("x"), MathElement::number("2")),
            MathElement::radical(MathElement::symbol("y"), Some(MathElement::number("3"))),
        ),
        MathElement::symbol("+"),
        MathElement::operator_with_limits(
            "sum",
            Some(MathElement::subscript(
                MathElement::symbol("i"),
                MathElement::number("0"),
            )),
            Some(MathElement::symbol("n")),
        ),
        MathElement::Matrix {
            rows: vec![vec![MathElement::number("1")]],
        },
    ]);
    let (tree, root) = layout_rooted(&element);

    for id in tree.descendants(root) {
        let bounds = tree.node(id).unwrap().bounds;
        assert!(
            bounds.width >= 0.0 && bounds.height >= 0.0,
            "negative bounds on {}: {:?}",
            id,
            bounds
        );
    }
}

#[test]
fn test_shared_fonts_are_reused_across_layouts() {
    let (engine, fonts) = engine();
    let ctx = context(&fonts, MathStyle::Text, 12.0);
    let mut tree = ViewTree::new();

    let element = MathElement::superscript(MathElement::symbol("x"), MathElement::number("2"));
    engine.layout(&element, &ctx, &mut tree).unwrap();
    let after_first = fonts.cached_fonts();
    engine.layout(&element, &ctx, &mut tree).unwrap();
    // The second layout resolves the same (family, size) keys from cache.
    assert_eq!(fonts.cached_fonts(), after_first);
}
