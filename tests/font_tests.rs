//! Font manager behavior over the facade.

mod common;

use common::typesetter;
use galley::style::{FontStyle, FontWeight};
use std::sync::Arc;

#[test]
fn test_identical_requests_share_one_font() {
    let ts = typesetter();
    let a = ts
        .fonts()
        .get_font("Body", 12.0, &FontWeight::Bold, &FontStyle::Normal);
    let b = ts
        .fonts()
        .get_font("Body", 12.0, &FontWeight::Bold, &FontStyle::Normal);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_resolution_always_returns_a_font() {
    let ts = typesetter();
    // Nothing is registered in the provider; the fallback chain bottoms
    // out in a synthesized font rather than an error.
    let font = ts
        .fonts()
        .get_font("No Such Family", 9.0, &FontWeight::Black, &FontStyle::Italic);
    assert_eq!(font.size(), 9.0);
    assert!(font.metrics().ascent > 0.0);
}

#[test]
fn test_metrics_follow_the_scaling_rule() {
    let ts = typesetter();
    let font = ts
        .fonts()
        .get_font("Body", 12.0, &FontWeight::Regular, &FontStyle::Normal);
    let metrics = font.metrics();

    // Fixed provider: upem 1000, ascent 800, descent 200, x-height 500.
    assert!((metrics.ascent - 9.6).abs() < 1e-9);
    assert!((metrics.descent - 2.4).abs() < 1e-9);
    assert!((metrics.x_height - 6.0).abs() < 1e-9);
    assert!((metrics.axis_height - 3.0).abs() < 1e-9);
    assert!((metrics.superscript_offset - 5.76).abs() < 1e-9);
    assert!((metrics.subscript_offset - 0.96).abs() < 1e-9);
    assert_eq!(metrics.superscript_scale, 0.7);
    assert_eq!(metrics.subscript_scale, 0.7);
}
