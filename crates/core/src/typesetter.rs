//! The typesetting facade.
//!
//! A `Typesetter` owns one font manager and one text shaper and drives the
//! layout engines against them. One typesetter per job; independent jobs on
//! separate threads each get their own instance and never share caches.

use crate::bridge::math_from_content;
use crate::error::TypesetError;
use crate::options::{MathTypesetOptions, TypesetOptions};
use galley_font::FontManager;
use galley_math::{validate_math_tree, MathContext, MathElement, MathLayoutEngine};
use galley_style::{FontStyle, FontWeight};
use galley_text::TextShaper;
use galley_traits::{ContentItem, FontProvider};
use galley_types::DocumentMeta;
use galley_viewtree::{NodeKind, ViewTree};
use std::sync::Arc;

pub struct Typesetter {
    fonts: Arc<FontManager>,
    shaper: Arc<TextShaper>,
    math_engine: MathLayoutEngine,
    options: TypesetOptions,
}

impl Typesetter {
    pub fn new(provider: Arc<dyn FontProvider>) -> Self {
        Self::with_options(provider, TypesetOptions::default())
    }

    pub fn with_options(provider: Arc<dyn FontProvider>, options: TypesetOptions) -> Self {
        let fonts = Arc::new(
            FontManager::new(provider).with_default_family(options.default_font_family.clone()),
        );
        let shaper = Arc::new(TextShaper::new());
        let math_engine = MathLayoutEngine::new(fonts.clone(), shaper.clone());
        Self {
            fonts,
            shaper,
            math_engine,
            options,
        }
    }

    pub fn options(&self) -> &TypesetOptions {
        &self.options
    }

    pub fn fonts(&self) -> &Arc<FontManager> {
        &self.fonts
    }

    pub fn shaper(&self) -> &Arc<TextShaper> {
        &self.shaper
    }

    /// Builds the initial math context for an expression.
    pub fn math_context(&self, math_options: &MathTypesetOptions) -> MathContext {
        let font_size =
            self.options.default_font_size * self.options.math_scale * math_options.math_scale;
        let math_font = self.fonts.get_font(
            &math_options.math_font_family,
            font_size,
            &FontWeight::Regular,
            &FontStyle::Normal,
        );
        let text_font = self.fonts.get_font(
            &self.options.default_font_family,
            font_size,
            &FontWeight::Regular,
            &FontStyle::Normal,
        );
        MathContext::new(
            math_options.effective_style(),
            font_size,
            math_font,
            text_font,
        )
    }

    /// Typesets a math content tree into a single-page view tree.
    ///
    /// The expression is positioned at the page's top-left content corner
    /// with the configured inline surround. A structurally invalid root
    /// expression is an error; invalid sub-expressions inside rows and
    /// matrices degrade to skipped subtrees during layout.
    pub fn typeset_math(
        &self,
        item: &dyn ContentItem,
        math_options: &MathTypesetOptions,
    ) -> Result<ViewTree, TypesetError> {
        let element = math_from_content(item);
        if !validate_math_tree(&element) {
            log::warn!("math content tree failed validation; laying out with degradation");
        }
        self.typeset_math_element(&element, math_options)
    }

    /// Typesets an already-built math element tree.
    pub fn typeset_math_element(
        &self,
        element: &MathElement,
        math_options: &MathTypesetOptions,
    ) -> Result<ViewTree, TypesetError> {
        let ctx = self.math_context(math_options);
        let mut tree = ViewTree::with_meta(DocumentMeta::default());

        let math_root = self.math_engine.layout(element, &ctx, &mut tree)?;

        let page_size = self.options.page_size;
        let root = tree.new_node(NodeKind::Document);
        let page = tree.new_node(NodeKind::Page);
        if let Some(node) = tree.node_mut(root) {
            node.bounds = galley_types::Rect::from_size(page_size);
        }
        if let Some(node) = tree.node_mut(page) {
            node.bounds = galley_types::Rect::from_size(page_size);
        }

        tree.translate_subtree(
            math_root,
            self.options.margins.left + math_options.inline_surround,
            self.options.margins.top,
        );
        tree.add_child(page, math_root)?;
        tree.add_child(root, page)?;
        tree.set_root(root)?;
        tree.add_page(page)?;
        tree.set_size(page_size);

        Ok(tree)
    }
}
