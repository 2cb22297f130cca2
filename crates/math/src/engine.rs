//! Recursive math layout.
//!
//! `MathLayoutEngine` walks a [`MathElement`] tree and emits positioned view
//! nodes. Each construct is laid out in its own local frame with the origin
//! at the top-left, then translated into place by its parent; the engine
//! tracks width/ascent/descent per subtree so baselines and the math axis
//! line up across constructs.

use crate::context::{MathContext, MathStyle};
use crate::element::{AtomKind, MathElement, ScriptPlacement};
use crate::error::MathError;
use crate::symbols::{atom_space_em, classify_atom, classify_char, resolve_operator, AtomClass};
use galley_font::{Font, FontManager, SCRIPT_SCALE};
use galley_text::{TextShapeResult, TextShaper};
use galley_types::{Point, Rect};
use galley_viewtree::{
    GlyphContent, LineContent, NodeId, NodeKind, PositionedGlyph, TextRunContent, ViewTree,
};
use std::sync::Arc;

/// Raise reduction applied to superscripts in cramped contexts.
const CRAMPED_RAISE_FACTOR: f64 = 0.8;

/// Tunable spacing constants, all relative to the current font size.
#[derive(Debug, Clone, PartialEq)]
pub struct MathLayoutOptions {
    /// Fraction rule and radical overbar thickness, as a fraction of font
    /// size.
    pub rule_thickness_factor: f64,
    /// Height of the gap region around a fraction rule, in rule
    /// thicknesses. The rule is centered inside the gap.
    pub rule_gap_to_thickness: f64,
    /// Clearance between a large operator and its stacked limits, in em.
    pub limit_gap_em: f64,
    /// Vertical gap between matrix rows, in em.
    pub row_gap_em: f64,
    /// Horizontal gap between matrix columns, in em.
    pub column_gap_em: f64,
    /// Clearance between a base and its accent, in em.
    pub accent_gap_em: f64,
    /// Font-size multiplier for large operators in display style.
    pub display_operator_scale: f64,
}

impl Default for MathLayoutOptions {
    fn default() -> Self {
        Self {
            rule_thickness_factor: 0.04,
            rule_gap_to_thickness: 3.0,
            limit_gap_em: 0.15,
            row_gap_em: 0.4,
            column_gap_em: 0.5,
            accent_gap_em: 0.05,
            display_operator_scale: 1.4,
        }
    }
}

/// A laid-out subtree with its baseline bookkeeping: the node's bounds are
/// `width` × (`ascent` + `descent`) at the local origin, with the baseline
/// `ascent` below the top edge.
#[derive(Debug, Clone, Copy)]
pub struct MathBox {
    pub node: NodeId,
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl MathBox {
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

pub struct MathLayoutEngine {
    fonts: Arc<FontManager>,
    shaper: Arc<TextShaper>,
    options: MathLayoutOptions,
}

impl MathLayoutEngine {
    pub fn new(fonts: Arc<FontManager>, shaper: Arc<TextShaper>) -> Self {
        Self {
            fonts,
            shaper,
            options: MathLayoutOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MathLayoutOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &MathLayoutOptions {
        &self.options
    }

    /// Lays out `element` into `tree` and returns the subtree root.
    ///
    /// The returned node sits at the local origin; the caller positions it
    /// with [`ViewTree::translate_subtree`]. A structural error leaves any
    /// partially built nodes detached in the arena, where they are freed
    /// with the tree.
    pub fn layout(
        &self,
        element: &MathElement,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<NodeId, MathError> {
        self.layout_box(element, ctx, tree).map(|b| b.node)
    }

    /// As [`layout`](Self::layout), returning baseline bookkeeping.
    pub fn layout_box(
        &self,
        element: &MathElement,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        match element {
            MathElement::Atom { kind, text } => self.layout_atom(*kind, text, ctx, tree),
            MathElement::Row(children) => self.layout_row(children, ctx, tree),
            MathElement::Fraction {
                numerator,
                denominator,
            } => self.layout_fraction(numerator.as_deref(), denominator.as_deref(), ctx, tree),
            MathElement::Script {
                base,
                script,
                placement,
            } => self.layout_script(base.as_deref(), script.as_deref(), *placement, ctx, tree),
            MathElement::Radical { radicand, index } => {
                self.layout_radical(radicand.as_deref(), index.as_deref(), ctx, tree)
            }
            MathElement::Operator { name, lower, upper } => {
                self.layout_operator(name, lower.as_deref(), upper.as_deref(), ctx, tree)
            }
            MathElement::Matrix { rows } => self.layout_matrix(rows, ctx, tree),
            MathElement::Accent { base, accent } => {
                self.layout_accent(base.as_deref(), *accent, ctx, tree)
            }
        }
    }

    // --- Atoms and rows ---

    fn layout_atom(
        &self,
        kind: AtomKind,
        text: &str,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let font = match kind {
            AtomKind::Text => ctx.text_font.clone(),
            AtomKind::Symbol | AtomKind::Number => ctx.math_font.clone(),
        };
        let shaped = self.shaper.shape(&font, text);
        Ok(self.text_run_box(&font, &shaped, tree))
    }

    fn text_run_box(
        &self,
        font: &Arc<Font>,
        shaped: &Arc<TextShapeResult>,
        tree: &mut ViewTree,
    ) -> MathBox {
        let glyphs = shaped
            .glyphs()
            .iter()
            .map(|g| PositionedGlyph {
                glyph_id: g.glyph_id,
                codepoint: g.codepoint,
                x: g.x,
                y: g.y,
                advance: g.advance,
            })
            .collect();
        let content = TextRunContent {
            text: shaped.text().to_string(),
            font_family: font.family().to_string(),
            font_size: font.size(),
            glyphs,
            baseline: shaped.ascent(),
        };
        let node = tree.new_node(NodeKind::TextRun(content));
        let width = shaped.total_width();
        let ascent = shaped.ascent();
        let descent = shaped.descent();
        set_bounds(tree, node, Rect::new(0.0, 0.0, width, ascent + descent));
        MathBox {
            node,
            width,
            ascent,
            descent,
        }
    }

    fn layout_row(
        &self,
        children: &[MathElement],
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let container = tree.new_node(NodeKind::MathElement);
        set_role(tree, container, "row");

        let mut boxes: Vec<(MathBox, AtomClass)> = Vec::with_capacity(children.len());
        for child in children {
            match self.layout_box(child, ctx, tree) {
                Ok(b) => boxes.push((b, element_class(child))),
                // A malformed sub-expression degrades only itself.
                Err(MathError::Structural { construct, missing }) => {
                    log::warn!(
                        "skipping malformed {} (missing {}) in row",
                        construct,
                        missing
                    );
                }
                Err(e) => return Err(e),
            }
        }

        let ascent = boxes.iter().map(|(b, _)| b.ascent).fold(0.0, f64::max);
        let descent = boxes.iter().map(|(b, _)| b.descent).fold(0.0, f64::max);

        let mut x = 0.0;
        let mut prev_class: Option<AtomClass> = None;
        for (b, class) in &boxes {
            if let Some(prev) = prev_class {
                // Script styles suppress inter-atom spacing.
                if !ctx.style.is_script() {
                    x += atom_space_em(prev, *class) * ctx.font_size;
                }
            }
            self.place(tree, container, b, x, ascent - b.ascent)?;
            x += b.width;
            prev_class = Some(*class);
        }

        set_bounds(tree, container, Rect::new(0.0, 0.0, x, ascent + descent));
        Ok(MathBox {
            node: container,
            width: x,
            ascent,
            descent,
        })
    }

    // --- Fractions ---

    fn layout_fraction(
        &self,
        numerator: Option<&MathElement>,
        denominator: Option<&MathElement>,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let numerator =
            numerator.ok_or_else(|| MathError::structural("fraction", "numerator"))?;
        let denominator =
            denominator.ok_or_else(|| MathError::structural("fraction", "denominator"))?;

        let num_box = self.layout_box(numerator, &ctx.numerator(), tree)?;
        let den_box = self.layout_box(denominator, &ctx.denominator(), tree)?;
        set_role(tree, num_box.node, "numerator");
        set_role(tree, den_box.node, "denominator");

        let axis = ctx.math_font.metrics().axis_height;
        let thickness = self.options.rule_thickness_factor * ctx.font_size;
        let rule_gap = self.options.rule_gap_to_thickness * thickness;
        let width = num_box.width.max(den_box.width);

        let container = tree.new_node(NodeKind::MathElement);
        set_role(tree, container, "fraction");

        // Numerator above the gap, rule centered inside it, denominator
        // below; the rule line lands on the math axis.
        self.place(tree, container, &num_box, (width - num_box.width) / 2.0, 0.0)?;

        let rule_center = num_box.height() + rule_gap / 2.0;
        let rule = tree.new_node(NodeKind::Line(LineContent {
            from: Point::new(0.0, thickness / 2.0),
            to: Point::new(width, thickness / 2.0),
            thickness,
        }));
        set_role(tree, rule, "rule");
        set_bounds(
            tree,
            rule,
            Rect::new(0.0, rule_center - thickness / 2.0, width, thickness),
        );
        tree.add_child(container, rule)?;

        self.place(
            tree,
            container,
            &den_box,
            (width - den_box.width) / 2.0,
            num_box.height() + rule_gap,
        )?;

        let total_height = num_box.height() + rule_gap + den_box.height();
        let ascent = num_box.height() + rule_gap / 2.0 + axis;
        set_bounds(tree, container, Rect::new(0.0, 0.0, width, total_height));
        Ok(MathBox {
            node: container,
            width,
            ascent,
            descent: total_height - ascent,
        })
    }

    // --- Scripts ---

    fn layout_script(
        &self,
        base: Option<&MathElement>,
        script: Option<&MathElement>,
        placement: ScriptPlacement,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let base = base.ok_or_else(|| MathError::structural("script", "base"))?;
        let script = script.ok_or_else(|| MathError::structural("script", "script"))?;

        let base_box = self.layout_box(base, ctx, tree)?;
        set_role(tree, base_box.node, "base");

        let metrics = ctx.math_font.metrics();
        let (scale, offset, script_cramped, role) = match placement {
            ScriptPlacement::Superscript => (
                metrics.superscript_scale,
                superscript_raise(ctx, metrics.superscript_offset),
                ctx.cramped,
                "superscript",
            ),
            ScriptPlacement::Subscript => (
                metrics.subscript_scale,
                metrics.subscript_offset,
                true,
                "subscript",
            ),
        };

        let script_ctx = self.derived_context(
            ctx,
            ctx.style.smaller(),
            ctx.font_size * scale,
            script_cramped,
        );
        let script_box = self.layout_box(script, &script_ctx, tree)?;
        set_role(tree, script_box.node, "script");

        let container = tree.new_node(NodeKind::MathElement);
        set_role(tree, container, role);

        let (ascent, descent, script_top) = match placement {
            ScriptPlacement::Superscript => {
                let ascent = base_box.ascent.max(offset + script_box.ascent);
                let descent = base_box.descent.max(script_box.descent - offset);
                (ascent, descent, ascent - offset - script_box.ascent)
            }
            ScriptPlacement::Subscript => {
                let ascent = base_box.ascent.max(script_box.ascent - offset);
                let descent = base_box.descent.max(offset + script_box.descent);
                (ascent, descent, ascent + offset - script_box.ascent)
            }
        };

        self.place(tree, container, &base_box, 0.0, ascent - base_box.ascent)?;
        self.place(tree, container, &script_box, base_box.width, script_top)?;

        let width = base_box.width + script_box.width;
        set_bounds(tree, container, Rect::new(0.0, 0.0, width, ascent + descent));
        Ok(MathBox {
            node: container,
            width,
            ascent,
            descent,
        })
    }

    // --- Radicals ---

    fn layout_radical(
        &self,
        radicand: Option<&MathElement>,
        index: Option<&MathElement>,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let radicand = radicand.ok_or_else(|| MathError::structural("radical", "radicand"))?;

        let rad_box = self.layout_box(radicand, &ctx.cramped(), tree)?;
        set_role(tree, rad_box.node, "radicand");

        let thickness = self.options.rule_thickness_factor * ctx.font_size;
        let clearance = 2.0 * thickness;
        let content_height = rad_box.height() + clearance + thickness;

        let index_box = match index {
            Some(index_el) => {
                let index_ctx = self.derived_context(
                    ctx,
                    MathStyle::ScriptScript,
                    ctx.font_size * SCRIPT_SCALE * SCRIPT_SCALE,
                    false,
                );
                let b = self.layout_box(index_el, &index_ctx, tree)?;
                set_role(tree, b.node, "index");
                Some(b)
            }
            None => None,
        };

        let container = tree.new_node(NodeKind::MathElement);
        set_role(tree, container, "radical");

        // The index sits to the upper left; if it is taller than the slot
        // above the sign's midpoint, the whole radical body shifts down.
        let index_width = index_box.map(|b| b.width).unwrap_or(0.0);
        let index_slot = 0.4 * content_height;
        let body_shift = index_box
            .map(|b| (b.height() - index_slot).max(0.0))
            .unwrap_or(0.0);

        if let Some(b) = index_box {
            self.place(tree, container, &b, 0.0, body_shift + index_slot - b.height())?;
        }

        // Radical sign stretched to the radicand's height.
        let sign_width = ctx.math_font.advance('\u{221A}');
        let sign = tree.new_node(NodeKind::Glyph(GlyphContent {
            glyph_id: ctx.math_font.glyph_index('\u{221A}'),
            codepoint: '\u{221A}',
            font_size: ctx.font_size,
        }));
        set_role(tree, sign, "radical-sign");
        set_bounds(
            tree,
            sign,
            Rect::new(index_width, body_shift, sign_width, content_height),
        );
        tree.add_child(container, sign)?;

        let overbar = tree.new_node(NodeKind::Line(LineContent {
            from: Point::new(0.0, thickness / 2.0),
            to: Point::new(rad_box.width, thickness / 2.0),
            thickness,
        }));
        set_role(tree, overbar, "overbar");
        set_bounds(
            tree,
            overbar,
            Rect::new(index_width + sign_width, body_shift, rad_box.width, thickness),
        );
        tree.add_child(container, overbar)?;

        self.place(
            tree,
            container,
            &rad_box,
            index_width + sign_width,
            body_shift + thickness + clearance,
        )?;

        let width = index_width + sign_width + rad_box.width;
        let ascent = body_shift + thickness + clearance + rad_box.ascent;
        let descent = rad_box.descent;
        set_bounds(tree, container, Rect::new(0.0, 0.0, width, ascent + descent));
        Ok(MathBox {
            node: container,
            width,
            ascent,
            descent,
        })
    }

    // --- Operators ---

    fn layout_operator(
        &self,
        name: &str,
        lower: Option<&MathElement>,
        upper: Option<&MathElement>,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let symbol = resolve_operator(name);

        let (op_box, is_large) = match symbol {
            Some(sym) => {
                // Large operators grow in display style and center on the
                // math axis.
                let size = if sym.is_large && ctx.style == MathStyle::Display {
                    ctx.font_size * self.options.display_operator_scale
                } else {
                    ctx.font_size
                };
                let font = if size == ctx.font_size {
                    ctx.math_font.clone()
                } else {
                    self.fonts.get_font(
                        ctx.math_font.family(),
                        size,
                        ctx.math_font.weight(),
                        ctx.math_font.style(),
                    )
                };
                let shaped = self.shaper.shape(&font, &sym.codepoint.to_string());
                let mut b = self.text_run_box(&font, &shaped, tree);
                if sym.is_large {
                    let axis = ctx.math_font.metrics().axis_height;
                    let half = b.height() / 2.0;
                    b.ascent = half + axis;
                    b.descent = half - axis;
                }
                (b, sym.is_large)
            }
            None => {
                // Named operators outside the table (lim, max, …) render
                // their name in the text font.
                log::debug!("operator '{}' not in symbol table; shaping name", name);
                (self.layout_atom(AtomKind::Text, name, ctx, tree)?, false)
            }
        };
        set_role(tree, op_box.node, "operator");

        if lower.is_none() && upper.is_none() {
            return Ok(op_box);
        }

        if is_large {
            self.stack_limits(op_box, lower, upper, ctx, tree)
        } else {
            self.attach_side_limits(op_box, lower, upper, ctx, tree)
        }
    }

    /// Limits of a large operator: centered above and below the glyph.
    fn stack_limits(
        &self,
        op_box: MathBox,
        lower: Option<&MathElement>,
        upper: Option<&MathElement>,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let limit_ctx = |cramped| {
            self.derived_context(
                ctx,
                ctx.style.smaller(),
                ctx.font_size * SCRIPT_SCALE,
                cramped,
            )
        };
        let upper_box = match upper {
            Some(el) => {
                let b = self.layout_box(el, &limit_ctx(false), tree)?;
                set_role(tree, b.node, "upper-limit");
                Some(b)
            }
            None => None,
        };
        let lower_box = match lower {
            Some(el) => {
                let b = self.layout_box(el, &limit_ctx(true), tree)?;
                set_role(tree, b.node, "lower-limit");
                Some(b)
            }
            None => None,
        };

        let gap = self.options.limit_gap_em * ctx.font_size;
        let width = op_box
            .width
            .max(upper_box.map(|b| b.width).unwrap_or(0.0))
            .max(lower_box.map(|b| b.width).unwrap_or(0.0));

        let container = tree.new_node(NodeKind::MathElement);
        set_role(tree, container, "operator-limits");

        let upper_height = upper_box.map(|b| b.height() + gap).unwrap_or(0.0);
        let ascent = op_box.ascent + upper_height;
        let descent = op_box.descent + lower_box.map(|b| b.height() + gap).unwrap_or(0.0);

        if let Some(b) = upper_box {
            self.place(tree, container, &b, (width - b.width) / 2.0, 0.0)?;
        }
        self.place(
            tree,
            container,
            &op_box,
            (width - op_box.width) / 2.0,
            upper_height,
        )?;
        if let Some(b) = lower_box {
            self.place(
                tree,
                container,
                &b,
                (width - b.width) / 2.0,
                ascent + op_box.descent + gap,
            )?;
        }

        set_bounds(tree, container, Rect::new(0.0, 0.0, width, ascent + descent));
        Ok(MathBox {
            node: container,
            width,
            ascent,
            descent,
        })
    }

    /// Limits of a small operator: ordinary side scripts sharing one column
    /// after the glyph.
    fn attach_side_limits(
        &self,
        op_box: MathBox,
        lower: Option<&MathElement>,
        upper: Option<&MathElement>,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let metrics = ctx.math_font.metrics();
        let sup_offset = superscript_raise(ctx, metrics.superscript_offset);
        let sub_offset = metrics.subscript_offset;

        let upper_box = match upper {
            Some(el) => {
                let sup_ctx = self.derived_context(
                    ctx,
                    ctx.style.smaller(),
                    ctx.font_size * metrics.superscript_scale,
                    ctx.cramped,
                );
                let b = self.layout_box(el, &sup_ctx, tree)?;
                set_role(tree, b.node, "superscript");
                Some(b)
            }
            None => None,
        };
        let lower_box = match lower {
            Some(el) => {
                let sub_ctx = self.derived_context(
                    ctx,
                    ctx.style.smaller(),
                    ctx.font_size * metrics.subscript_scale,
                    true,
                );
                let b = self.layout_box(el, &sub_ctx, tree)?;
                set_role(tree, b.node, "subscript");
                Some(b)
            }
            None => None,
        };

        let container = tree.new_node(NodeKind::MathElement);
        set_role(tree, container, "operator-scripts");

        let ascent = op_box
            .ascent
            .max(upper_box.map(|b| sup_offset + b.ascent).unwrap_or(0.0));
        let descent = op_box
            .descent
            .max(lower_box.map(|b| sub_offset + b.descent).unwrap_or(0.0));

        self.place(tree, container, &op_box, 0.0, ascent - op_box.ascent)?;
        let mut width = op_box.width;
        if let Some(b) = upper_box {
            self.place(
                tree,
                container,
                &b,
                op_box.width,
                ascent - sup_offset - b.ascent,
            )?;
            width = width.max(op_box.width + b.width);
        }
        if let Some(b) = lower_box {
            self.place(
                tree,
                container,
                &b,
                op_box.width,
                ascent + sub_offset - b.ascent,
            )?;
            width = width.max(op_box.width + b.width);
        }

        set_bounds(tree, container, Rect::new(0.0, 0.0, width, ascent + descent));
        Ok(MathBox {
            node: container,
            width,
            ascent,
            descent,
        })
    }

    // --- Matrices ---

    fn layout_matrix(
        &self,
        rows: &[Vec<MathElement>],
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let container = tree.new_node(NodeKind::MathElement);
        set_role(tree, container, "matrix");

        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut cells: Vec<Vec<MathBox>> = Vec::with_capacity(rows.len());
        for row in rows {
            let mut boxed_row = Vec::with_capacity(row.len());
            for cell in row {
                let b = match self.layout_box(cell, ctx, tree) {
                    Ok(b) => b,
                    Err(MathError::Structural { construct, missing }) => {
                        log::warn!(
                            "substituting empty cell for malformed {} (missing {})",
                            construct,
                            missing
                        );
                        self.empty_box(tree)
                    }
                    Err(e) => return Err(e),
                };
                set_role(tree, b.node, "cell");
                boxed_row.push(b);
            }
            cells.push(boxed_row);
        }

        let mut column_widths = vec![0.0_f64; column_count];
        for row in &cells {
            for (col, b) in row.iter().enumerate() {
                column_widths[col] = column_widths[col].max(b.width);
            }
        }
        let row_ascents: Vec<f64> = cells
            .iter()
            .map(|row| row.iter().map(|b| b.ascent).fold(0.0, f64::max))
            .collect();
        let row_descents: Vec<f64> = cells
            .iter()
            .map(|row| row.iter().map(|b| b.descent).fold(0.0, f64::max))
            .collect();

        let column_gap = self.options.column_gap_em * ctx.font_size;
        let row_gap = self.options.row_gap_em * ctx.font_size;

        let total_width = column_widths.iter().sum::<f64>()
            + column_gap * column_count.saturating_sub(1) as f64;
        let total_height = row_ascents
            .iter()
            .zip(&row_descents)
            .map(|(a, d)| a + d)
            .sum::<f64>()
            + row_gap * rows.len().saturating_sub(1) as f64;

        // Cells sit on a regular baseline grid, each centered in its column.
        let mut y = 0.0;
        for (i, row) in cells.iter().enumerate() {
            let baseline = y + row_ascents[i];
            let mut x = 0.0;
            for (col, b) in row.iter().enumerate() {
                let cell_x = x + (column_widths[col] - b.width) / 2.0;
                self.place(tree, container, b, cell_x, baseline - b.ascent)?;
                x += column_widths[col] + column_gap;
            }
            y += row_ascents[i] + row_descents[i] + row_gap;
        }

        // The matrix as a whole centers on the math axis.
        let axis = ctx.math_font.metrics().axis_height;
        let ascent = total_height / 2.0 + axis;
        set_bounds(
            tree,
            container,
            Rect::new(0.0, 0.0, total_width, total_height),
        );
        Ok(MathBox {
            node: container,
            width: total_width,
            ascent,
            descent: total_height - ascent,
        })
    }

    // --- Accents ---

    fn layout_accent(
        &self,
        base: Option<&MathElement>,
        accent: char,
        ctx: &MathContext,
        tree: &mut ViewTree,
    ) -> Result<MathBox, MathError> {
        let base = base.ok_or_else(|| MathError::structural("accent", "base"))?;
        let base_box = self.layout_box(base, &ctx.cramped(), tree)?;
        set_role(tree, base_box.node, "base");

        let shaped = self.shaper.shape(&ctx.math_font, &accent.to_string());
        let accent_box = self.text_run_box(&ctx.math_font, &shaped, tree);
        set_role(tree, accent_box.node, "accent-mark");

        // Combining marks may shape to zero advance; give the mark a
        // nominal quarter-em so it stays visible and bounded.
        let accent_width = if accent_box.width > 0.0 {
            accent_box.width
        } else {
            ctx.font_size / 4.0
        };
        let accent_height = accent_box.height().min(0.5 * ctx.font_size);
        let gap = self.options.accent_gap_em * ctx.font_size;

        let container = tree.new_node(NodeKind::MathElement);
        set_role(tree, container, "accent");

        let width = base_box.width.max(accent_width);
        self.place(
            tree,
            container,
            &accent_box,
            (width - accent_width) / 2.0,
            0.0,
        )?;
        self.place(
            tree,
            container,
            &base_box,
            (width - base_box.width) / 2.0,
            accent_height + gap,
        )?;

        let ascent = accent_height + gap + base_box.ascent;
        let descent = base_box.descent;
        set_bounds(tree, container, Rect::new(0.0, 0.0, width, ascent + descent));
        Ok(MathBox {
            node: container,
            width,
            ascent,
            descent,
        })
    }

    // --- Helpers ---

    /// Translates a laid-out subtree to (x, top_y) inside `parent`'s local
    /// frame and attaches it.
    fn place(
        &self,
        tree: &mut ViewTree,
        parent: NodeId,
        child: &MathBox,
        x: f64,
        top_y: f64,
    ) -> Result<(), MathError> {
        tree.translate_subtree(child.node, x, top_y);
        tree.add_child(parent, child.node)?;
        Ok(())
    }

    fn empty_box(&self, tree: &mut ViewTree) -> MathBox {
        let node = tree.new_node(NodeKind::Group);
        MathBox {
            node,
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
        }
    }

    /// A context at a new style/size; fonts are re-resolved through the
    /// manager only when the size actually changes.
    fn derived_context(
        &self,
        ctx: &MathContext,
        style: MathStyle,
        font_size: f64,
        cramped: bool,
    ) -> MathContext {
        if (font_size - ctx.font_size).abs() < f64::EPSILON {
            return MathContext {
                style,
                cramped,
                ..ctx.clone()
            };
        }
        let math_font = self.fonts.get_font(
            ctx.math_font.family(),
            font_size,
            ctx.math_font.weight(),
            ctx.math_font.style(),
        );
        let text_font = self.fonts.get_font(
            ctx.text_font.family(),
            font_size,
            ctx.text_font.weight(),
            ctx.text_font.style(),
        );
        MathContext {
            style,
            cramped,
            font_size,
            math_font,
            text_font,
        }
    }
}

/// Superscript raise for the current context; cramped layout reduces it.
fn superscript_raise(ctx: &MathContext, offset: f64) -> f64 {
    if ctx.cramped {
        offset * CRAMPED_RAISE_FACTOR
    } else {
        offset
    }
}

/// Spacing class of a whole element, for row layout.
fn element_class(element: &MathElement) -> AtomClass {
    match element {
        MathElement::Atom { text, .. } => classify_atom(text),
        MathElement::Operator { name, .. } => match resolve_operator(name) {
            Some(sym) if sym.is_large => AtomClass::Operator,
            Some(sym) => classify_char(sym.codepoint),
            None => AtomClass::Ordinary,
        },
        _ => AtomClass::Ordinary,
    }
}

fn set_bounds(tree: &mut ViewTree, id: NodeId, bounds: Rect) {
    if let Some(node) = tree.node_mut(id) {
        node.bounds = bounds;
    }
}

fn set_role(tree: &mut ViewTree, id: NodeId, role: &str) {
    if let Some(node) = tree.node_mut(id) {
        node.role = Some(role.to_string());
    }
}
