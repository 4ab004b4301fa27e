//! Arena-allocated area tree.
//!
//! Areas live in one `Vec` and refer to each other by [`AreaId`], the same
//! way document nodes do. Slot 0 holds a detached default block that
//! [`AreaTree::containing_block`] answers when a line has no block
//! ancestor.

use std::fmt;

use kumihan_common::{Extent, Point, WritingMode};
use kumihan_dom::NodeId;
use kumihan_fonts::Font;
use kumihan_text::style::{AnnotationPosition, ReservePosition};
use serde::Serialize;

use crate::area::{Area, AreaKind};
use crate::error::AreaError;
use crate::expansion::{Expansion, expand};
use crate::geometry::{self, Geometry, Insets, ReferenceRectangle};

/// Index of an area in its [`AreaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct AreaId(pub usize);

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The areas produced by one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AreaTree {
    areas: Vec<Area>,
    root: Option<AreaId>,
}

impl Default for AreaTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AreaTree {
    /// The detached default block.
    pub const DETACHED: AreaId = AreaId(0);

    /// A tree holding only the detached default block.
    #[must_use]
    pub fn new() -> Self {
        Self {
            areas: vec![Area::new(AreaKind::Block, Geometry::default(), None)],
            root: None,
        }
    }

    /// Number of areas, not counting the detached default block.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len() - 1
    }

    /// True when no area was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store `area` detached and return its id.
    pub fn add(&mut self, area: Area) -> AreaId {
        let id = AreaId(self.areas.len());
        self.areas.push(area);
        id
    }

    /// A block of the given content size.
    pub fn block(&mut self, element: Option<NodeId>, writing_mode: WritingMode, ipd: f64, bpd: f64, level: u8) -> AreaId {
        self.add(Area::new(
            AreaKind::Block,
            Geometry::new(writing_mode, ipd, bpd, level),
            element,
        ))
    }

    /// A block with a fixed allocation `extent`.
    pub fn bounded_block(
        &mut self,
        element: Option<NodeId>,
        writing_mode: WritingMode,
        extent: Extent,
        level: u8,
    ) -> AreaId {
        self.add(Area::new(
            AreaKind::BoundedBlock { extent },
            Geometry::with_extent(writing_mode, extent, level),
            element,
        ))
    }

    /// A block with a fixed allocation `extent` at `origin`.
    pub fn positioned_block(
        &mut self,
        element: Option<NodeId>,
        writing_mode: WritingMode,
        origin: Point,
        extent: Extent,
        level: u8,
    ) -> AreaId {
        self.add(Area::new(
            AreaKind::PositionedBlock { extent, origin },
            Geometry::with_extent(writing_mode, extent, level),
            element,
        ))
    }

    /// The root handed to renderers.
    #[must_use]
    pub const fn root(&self) -> Option<AreaId> {
        self.root
    }

    /// Make `id` the root.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] when `id` is not in the tree.
    pub fn set_root(&mut self, id: AreaId) -> Result<(), AreaError> {
        let _ = self.get(id)?;
        self.root = Some(id);
        Ok(())
    }

    /// The area `id`.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] when `id` is not in the tree.
    pub fn get(&self, id: AreaId) -> Result<&Area, AreaError> {
        self.areas.get(id.0).ok_or(AreaError::UnknownArea(id))
    }

    /// The area `id`, mutably.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] when `id` is not in the tree.
    pub fn get_mut(&mut self, id: AreaId) -> Result<&mut Area, AreaError> {
        self.areas.get_mut(id.0).ok_or(AreaError::UnknownArea(id))
    }

    /// Children of `id`; empty for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: AreaId) -> &[AreaId] {
        self.areas.get(id.0).map_or(&[], |a| a.children.as_slice())
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: AreaId) -> Option<AreaId> {
        self.areas.get(id.0).and_then(Area::parent)
    }

    /// First child of `id`.
    #[must_use]
    pub fn first_child(&self, id: AreaId) -> Option<AreaId> {
        self.children(id).first().copied()
    }

    /// Append `child` to `parent`, growing `parent` per `expansion`.
    ///
    /// # Errors
    ///
    /// See [`AreaTree::insert_child`].
    pub fn add_child(&mut self, parent: AreaId, child: AreaId, expansion: Expansion) -> Result<(), AreaError> {
        self.insert_child(parent, child, None, expansion)
    }

    /// Insert `child` into `parent` before `before`, or at the end when
    /// `before` is `None`, growing `parent` per `expansion`.
    ///
    /// An annotation added to a line does not grow it; it raises the line's
    /// reserve on its side instead, AUTO meaning before on the first line
    /// and after on the others.
    ///
    /// # Errors
    ///
    /// - [`AreaError::UnknownArea`] for an id not in the tree
    /// - [`AreaError::NotAContainer`] when `parent` is a leaf
    /// - [`AreaError::NotInline`] when `parent` is a line and `child` is
    ///   not inline
    /// - [`AreaError::NotAChild`] when `before` is not a child of `parent`
    /// - [`AreaError::Cycle`] when `child` is `parent` or one of its
    ///   ancestors
    pub fn insert_child(
        &mut self,
        parent: AreaId,
        child: AreaId,
        before: Option<AreaId>,
        expansion: Expansion,
    ) -> Result<(), AreaError> {
        let child_area = self.get(child)?;
        let child_kind = child_area.kind.name();
        let child_inline = child_area.kind.is_inline();
        let parent_area = self.get(parent)?;
        if !parent_area.kind.is_container() {
            return Err(AreaError::NotAContainer(parent));
        }
        if parent_area.kind.line().is_some() && !child_inline {
            return Err(AreaError::NotInline {
                line: parent,
                child,
                kind: child_kind,
            });
        }
        if let Some(b) = before.filter(|&b| b == child || !parent_area.children.contains(&b)) {
            return Err(AreaError::NotAChild { parent, before: b });
        }
        if std::iter::successors(Some(parent), |&a| self.parent(a)).any(|a| a == child) {
            return Err(AreaError::Cycle { parent, child });
        }

        self.detach(child);
        let children = &mut self.areas[parent.0].children;
        let index = before
            .and_then(|b| children.iter().position(|&c| c == b))
            .unwrap_or(children.len());
        children.insert(index, child);
        self.areas[child.0].parent = Some(parent);

        let annotation = if self.areas[parent.0].kind.line().is_some() {
            self.place_annotation(parent, child)
        } else {
            None
        };
        if let (Some((position, bpd)), Some(line)) = (annotation, self.areas[parent.0].kind.line_mut()) {
            line.reserve(position, bpd);
            return Ok(());
        }
        let (ipd, bpd) = {
            let c = &self.areas[child.0];
            (c.allocation_ipd(), c.allocation_bpd())
        };
        expand(&mut self.areas[parent.0].geometry, ipd, bpd, expansion);
        Ok(())
    }

    /// Resolve the side of an annotation child; `None` when `child` is not
    /// an annotation.
    fn place_annotation(&mut self, line: AreaId, child: AreaId) -> Option<(AnnotationPosition, f64)> {
        let first = self.areas[line.0].kind.line().is_some_and(|l| l.is_first());
        let area = &mut self.areas[child.0];
        let bpd = area.bpd();
        let AreaKind::Annotation(annotation) = &mut area.kind else {
            return None;
        };
        if annotation.position == AnnotationPosition::Auto {
            annotation.position = if first {
                AnnotationPosition::Before
            } else {
                AnnotationPosition::After
            };
        }
        Some((annotation.position, bpd))
    }

    fn detach(&mut self, child: AreaId) {
        if let Some(old) = self.areas[child.0].parent.take() {
            self.areas[old.0].children.retain(|&c| c != child);
        }
    }

    /// Put the children of `parent` in `order`, which must be a permutation
    /// of the current children. Extents are unchanged.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] for an unknown parent, or
    /// [`AreaError::NotAChild`] naming an id of `order` that is not a
    /// child, or a child missing from `order`.
    pub fn reorder_children(&mut self, parent: AreaId, order: &[AreaId]) -> Result<(), AreaError> {
        let children = &self.get(parent)?.children;
        if let Some(&stray) = order.iter().find(|c| !children.contains(c)) {
            return Err(AreaError::NotAChild { parent, before: stray });
        }
        if let Some(&missing) = children.iter().find(|c| !order.contains(c)) {
            return Err(AreaError::NotAChild { parent, before: missing });
        }
        if order.len() != children.len() {
            return Err(AreaError::NotAChild {
                parent,
                before: order.first().copied().unwrap_or(parent),
            });
        }
        self.areas[parent.0].children = order.to_vec();
        Ok(())
    }

    /// Replace the border of `id`, keeping its allocation extent.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] when `id` is not in the tree.
    pub fn set_border(&mut self, id: AreaId, border: Insets) -> Result<(), AreaError> {
        geometry::set_border(&mut self.get_mut(id)?.geometry, border);
        Ok(())
    }

    /// Replace the padding of `id`, keeping its allocation extent.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] when `id` is not in the tree.
    pub fn set_padding(&mut self, id: AreaId, padding: Insets) -> Result<(), AreaError> {
        geometry::set_padding(&mut self.get_mut(id)?.geometry, padding);
        Ok(())
    }

    /// Physical extent of `rectangle` of `id`.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`], or [`AreaError::UnsupportedRectangle`]
    /// for [`ReferenceRectangle::Container`].
    pub fn extent(&self, id: AreaId, rectangle: ReferenceRectangle) -> Result<Extent, AreaError> {
        let area = self.get(id)?;
        let (ipd, bpd) = geometry::relative_extent(&area.geometry, area.ipd(), area.bpd(), rectangle)?;
        Ok(geometry::physical_extent(area.geometry.writing_mode, ipd, bpd))
    }

    /// Physical origin of `rectangle` of `id`. Only positioned blocks have
    /// an allocation origin of their own; other areas answer relative to
    /// their allocation origin at zero.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`], or [`AreaError::UnsupportedRectangle`]
    /// for [`ReferenceRectangle::Container`].
    pub fn origin(&self, id: AreaId, rectangle: ReferenceRectangle) -> Result<Point, AreaError> {
        let area = self.get(id)?;
        let base = match area.kind {
            AreaKind::PositionedBlock { origin, .. } => origin,
            _ => Point::ZERO,
        };
        let offset = geometry::rectangle_offset(&area.geometry, rectangle)?;
        Ok(base.offset(offset.x, offset.y))
    }

    /// Count one more reversal of `id`.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] when `id` is not in the tree.
    pub fn reverse(&mut self, id: AreaId) -> Result<(), AreaError> {
        geometry::reverse(&mut self.get_mut(id)?.geometry);
        Ok(())
    }

    /// True after an odd number of reversals of `id`.
    #[must_use]
    pub fn needs_reversing(&self, id: AreaId) -> bool {
        self.get(id).is_ok_and(|a| geometry::needs_reversing(&a.geometry))
    }

    /// Number of lines directly under `id`.
    #[must_use]
    pub fn line_count(&self, id: AreaId) -> usize {
        self.children(id)
            .iter()
            .filter(|&&c| self.is_line(c))
            .count()
    }

    /// All lines under `id` in document order, through nested blocks.
    #[must_use]
    pub fn lines(&self, id: AreaId) -> Vec<AreaId> {
        let mut lines = Vec::new();
        self.collect_lines(id, &mut lines);
        lines
    }

    fn collect_lines(&self, id: AreaId, lines: &mut Vec<AreaId>) {
        for &c in self.children(id) {
            if self.is_line(c) {
                lines.push(c);
            } else if self.get(c).is_ok_and(|a| a.kind.is_block()) {
                self.collect_lines(c, lines);
            }
        }
    }

    /// The first line under `id`.
    #[must_use]
    pub fn first_line(&self, id: AreaId) -> Option<AreaId> {
        self.lines(id).first().copied()
    }

    /// The last line under `id`.
    #[must_use]
    pub fn last_line(&self, id: AreaId) -> Option<AreaId> {
        self.lines(id).last().copied()
    }

    fn is_line(&self, id: AreaId) -> bool {
        self.get(id).is_ok_and(|a| matches!(a.kind, AreaKind::Line(_)))
    }

    /// Reserve BPD for annotations on a line. Lines of embedded paragraphs
    /// and annotation lines are left alone; BOTH reserves on both sides.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] when `line` is not in the tree.
    pub fn add_annotation_reserve(
        &mut self,
        line: AreaId,
        position: ReservePosition,
        amount: f64,
    ) -> Result<(), AreaError> {
        let AreaKind::Line(l) = &mut self.get_mut(line)?.kind else {
            return Ok(());
        };
        if l.embedding {
            return Ok(());
        }
        match position {
            ReservePosition::Before => l.reserve(AnnotationPosition::Before, amount),
            ReservePosition::After => l.reserve(AnnotationPosition::After, amount),
            ReservePosition::Both => {
                l.reserve(AnnotationPosition::Before, amount);
                l.reserve(AnnotationPosition::After, amount);
            }
            ReservePosition::None | ReservePosition::Auto | ReservePosition::Outside => {}
        }
        Ok(())
    }

    /// Glyphs of `line` that take part in letter spacing.
    #[must_use]
    pub fn spacing_glyphs_count(&self, line: AreaId) -> usize {
        self.children(line)
            .iter()
            .filter_map(|&c| match self.get(c).map(|a| &a.kind) {
                Ok(AreaKind::Glyph(g)) => Some(g.spacing_glyphs_count()),
                _ => None,
            })
            .sum()
    }

    /// The nearest block ancestor of `id`, or [`AreaTree::DETACHED`].
    #[must_use]
    pub fn containing_block(&self, id: AreaId) -> AreaId {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if self.get(p).is_ok_and(|a| a.kind.is_block()) {
                return p;
            }
            current = self.parent(p);
        }
        Self::DETACHED
    }

    /// Reverse the glyphs of a glyph area after an odd number of
    /// reversals, mirroring them when `mirror` is set and the area's bidi
    /// level is odd.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] when `id` is not in the tree.
    pub fn maybe_reverse_glyphs(&mut self, id: AreaId, mirror: bool) -> Result<(), AreaError> {
        let area = self.get_mut(id)?;
        let reverse = geometry::needs_reversing(&area.geometry);
        let mirror = mirror && area.geometry.is_right_to_left();
        if let AreaKind::Glyph(glyph) = &mut area.kind {
            Font::maybe_reverse(&mut glyph.mapping, reverse, mirror);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use kumihan_text::style::{Color, InlineAlignment};

    use super::*;
    use crate::area::LineArea;

    fn line(tree: &mut AreaTree, number: usize) -> AreaId {
        tree.add(Area::new(
            AreaKind::Line(LineArea::new(number, InlineAlignment::Start, Color::WHITE, None)),
            Geometry::new(WritingMode::Lrtb, 0.0, 10.0, 0),
            None,
        ))
    }

    #[test]
    fn test_detached_sentinel() {
        let mut tree = AreaTree::new();
        assert!(tree.is_empty());
        let l = line(&mut tree, 1);
        assert_eq!(tree.containing_block(l), AreaTree::DETACHED);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_readding_moves_child() {
        let mut tree = AreaTree::new();
        let a = tree.block(None, WritingMode::Lrtb, 0.0, 0.0, 0);
        let b = tree.block(None, WritingMode::Lrtb, 0.0, 0.0, 0);
        let l = line(&mut tree, 1);
        tree.add_child(a, l, Expansion::NONE).expect("add");
        tree.add_child(b, l, Expansion::NONE).expect("move");
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[l]);
        assert_eq!(tree.parent(l), Some(b));
    }
}
