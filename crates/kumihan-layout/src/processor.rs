//! Document layout.
//!
//! [§ 11.3.1 Region Layout and Presentation](https://www.w3.org/TR/ttml2/#semantics-region-layout-step-1)
//!
//! The whole root container is one positioned region. The `body` lays out
//! into it as a stack of blocks: each `div` a block of its children, each
//! paragraph of a `p` a block of lines. Once everything is stacked the
//! region's display alignment places the stack.

use kumihan_area::{AreaError, AreaId, AreaTree, Expansion};
use kumihan_common::{Dimension, Extent, Point};
use kumihan_dom::{DomTree, NodeId};
use kumihan_fonts::FontRegistry;
use kumihan_text::{ParagraphCollector, Phrase, StyleResolver};

use crate::align;
use crate::line::{Consume, LineLayout};

/// Lays out a document into an area tree.
pub struct LayoutProcessor<'a> {
    doc: &'a DomTree,
    resolver: &'a dyn StyleResolver,
    registry: &'a FontRegistry,
    extent: Extent,
}

impl<'a> LayoutProcessor<'a> {
    /// A processor for `doc` in a root container of `extent`.
    #[must_use]
    pub fn new(
        doc: &'a DomTree,
        resolver: &'a dyn StyleResolver,
        registry: &'a FontRegistry,
        extent: Extent,
    ) -> Self {
        Self {
            doc,
            resolver,
            registry,
            extent,
        }
    }

    /// Lay out the document. The tree's root is the region; a document
    /// without a `body` gives an empty region.
    ///
    /// # Errors
    ///
    /// Propagates [`AreaError`] from tree operations.
    pub fn layout(&self) -> Result<AreaTree, AreaError> {
        let defaults = self.resolver.defaults();
        let writing_mode = defaults.writing_mode;
        let level = writing_mode.default_bidi_level();

        let mut tree = AreaTree::new();
        let region = tree.positioned_block(None, writing_mode, Point::ZERO, self.extent, level);
        tree.set_root(region)?;

        let Some(body) = self.doc.tt_elements("body").first().copied() else {
            return Ok(tree);
        };
        let block = self.layout_container(&mut tree, body, region)?;
        tree.add_child(region, block, Expansion::NONE)?;

        // displayAlign is not inherited, so the body's own value is the
        // region's.
        let styles = Phrase::new(Some(body), "", self.resolver.paragraph_styles(self.doc, body));
        align::align_blocks(&mut tree, region, styles.block_alignment(None, defaults))?;
        Ok(tree)
    }

    /// A block holding the laid out children of `element`.
    fn layout_container(&self, tree: &mut AreaTree, element: NodeId, region: AreaId) -> Result<AreaId, AreaError> {
        let geometry = &tree.get(region)?.geometry;
        let (writing_mode, ipd, level) = (geometry.writing_mode, geometry.ipd, geometry.bidi_level);
        let block = tree.block(Some(element), writing_mode, ipd, 0.0, level);
        for child in self.doc.child_elements(element) {
            if self.doc.is_tt_element(child, "p") {
                self.layout_paragraphs(tree, child, block, region)?;
            } else if self.doc.is_tt_element(child, "div") {
                let nested = self.layout_container(tree, child, region)?;
                tree.add_child(block, nested, Expansion::EXPAND_LINE)?;
            }
        }
        Ok(block)
    }

    /// Add a block per paragraph of `element` to `parent`.
    fn layout_paragraphs(
        &self,
        tree: &mut AreaTree,
        element: NodeId,
        parent: AreaId,
        region: AreaId,
    ) -> Result<(), AreaError> {
        let defaults = self.resolver.defaults();
        let geometry = &tree.get(region)?.geometry;
        let (writing_mode, ipd, bpd, level) = (
            geometry.writing_mode,
            geometry.size(Dimension::Ipd),
            geometry.size(Dimension::Bpd),
            geometry.bidi_level,
        );
        for paragraph in ParagraphCollector::new(self.doc, self.resolver).collect(element) {
            let layout = LineLayout::new(paragraph.content(), self.registry, defaults);
            let lines = layout.layout(tree, ipd, Consume::Max)?;
            layout.reserve_annotation_space(tree, &lines)?;

            let block = tree.block(Some(element), writing_mode, ipd, 0.0, level);
            for line in lines {
                tree.add_child(block, line, Expansion::EXPAND_LINE)?;
            }
            align::justify_lines(tree, block, bpd, paragraph.block_alignment(None, defaults))?;
            tree.add_child(parent, block, Expansion::EXPAND_LINE)?;
        }
        Ok(())
    }
}
