//! Area kinds and their kind-specific data.

use std::ops::Range;

use kumihan_common::characters::{is_non_spacing, is_whitespace};
use kumihan_common::{Dimension, Extent, Point};
use kumihan_dom::NodeId;
use kumihan_fonts::{Font, GlyphMapping};
use kumihan_text::style::{AnnotationPosition, Color, InlineAlignment, Outline};
use serde::Serialize;

use crate::geometry::Geometry;
use crate::tree::AreaId;

/// A styling decoration over a character range of a glyph area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decoration {
    /// Characters covered, relative to the glyph area's text.
    pub range: Range<usize>,
    /// What is applied.
    pub kind: DecorationKind,
}

/// The decoration applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "value")]
pub enum DecorationKind {
    /// Fill color.
    Color(Color),
    /// Outline.
    Outline(Outline),
}

impl Decoration {
    /// A decoration over `range`.
    #[must_use]
    pub const fn new(range: Range<usize>, kind: DecorationKind) -> Self {
        Self { range, kind }
    }

    /// True when the decoration overlaps `range`.
    #[must_use]
    pub const fn intersects(&self, range: &Range<usize>) -> bool {
        self.range.start < range.end && range.start < self.range.end
    }

    /// This decoration clipped to `range` and rebased to its start.
    #[must_use]
    pub fn clip(&self, range: &Range<usize>) -> Self {
        let start = self.range.start.max(range.start) - range.start;
        let end = self.range.end.min(range.end) - range.start;
        Self::new(start..end, self.kind)
    }
}

/// A line of inline areas.
#[derive(Debug, Clone, PartialEq)]
pub struct LineArea {
    /// 1 for the first line of its block.
    pub number: usize,
    /// Inline alignment used to place the children.
    pub alignment: InlineAlignment,
    /// Text color.
    pub color: Color,
    /// Reference font for ascent, descent and leading.
    pub font: Option<Font>,
    /// Set for lines of an embedded paragraph.
    pub embedding: bool,
    /// BPD reserved for annotations before the line.
    pub before_reserve: f64,
    /// BPD reserved for annotations after the line.
    pub after_reserve: f64,
}

impl LineArea {
    /// A line without reserves.
    #[must_use]
    pub const fn new(number: usize, alignment: InlineAlignment, color: Color, font: Option<Font>) -> Self {
        Self {
            number,
            alignment,
            color,
            font,
            embedding: false,
            before_reserve: 0.0,
            after_reserve: 0.0,
        }
    }

    /// True for the first line of its block.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.number == 1
    }

    /// Before plus after reserve.
    #[must_use]
    pub fn annotation_bpd(&self) -> f64 {
        self.before_reserve + self.after_reserve
    }

    /// Raise the reserve at `position` to at least `amount`. Only BEFORE
    /// and AFTER carry a reserve.
    pub fn reserve(&mut self, position: AnnotationPosition, amount: f64) {
        match position {
            AnnotationPosition::Before => self.before_reserve = self.before_reserve.max(amount),
            AnnotationPosition::After => self.after_reserve = self.after_reserve.max(amount),
            AnnotationPosition::Auto | AnnotationPosition::Outside | AnnotationPosition::Both => {}
        }
    }

    /// Font ascent, 0 without a font.
    #[must_use]
    pub fn ascent(&self) -> f64 {
        self.font.as_ref().map_or(0.0, Font::ascent)
    }

    /// Font descent, 0 without a font.
    #[must_use]
    pub fn descent(&self) -> f64 {
        self.font.as_ref().map_or(0.0, Font::descent)
    }

    /// Half the font leading, placed before the line.
    #[must_use]
    pub fn leading_before(&self) -> f64 {
        self.font.as_ref().map_or(0.0, |f| f.leading() / 2.0)
    }

    /// Half the font leading, placed after the line.
    #[must_use]
    pub fn leading_after(&self) -> f64 {
        self.leading_before()
    }
}

/// Ruby text or emphasis marks: a line placed beside a base line.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationArea {
    /// The annotation's own line data.
    pub line: LineArea,
    /// Distance from the base line.
    pub offset: f64,
    /// Side of the base line.
    pub position: AnnotationPosition,
}

/// Shaped text.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphArea {
    /// Font the glyphs come from.
    pub font: Font,
    /// Glyphs and advances.
    pub mapping: GlyphMapping,
    /// Color and outline ranges.
    pub decorations: Vec<Decoration>,
}

impl GlyphArea {
    /// Characters that take part in letter spacing: not whitespace and
    /// not a non-spacing mark.
    #[must_use]
    pub fn spacing_glyphs_count(&self) -> usize {
        self.mapping
            .text
            .chars()
            .filter(|&c| !is_whitespace(c) && !is_non_spacing(c))
            .count()
    }
}

/// Whitespace kept inside a line.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceArea {
    /// The whitespace characters.
    pub text: String,
    /// Font measured against.
    pub font: Option<Font>,
}

/// An external image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageArea {
    /// Image locator.
    pub source: String,
}

/// What an area is.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaKind {
    /// A stack of blocks or lines.
    Block,
    /// A block with a fixed allocation extent.
    BoundedBlock {
        /// Allocation extent.
        extent: Extent,
    },
    /// A bounded block with a fixed allocation origin.
    PositionedBlock {
        /// Allocation extent.
        extent: Extent,
        /// Allocation origin.
        origin: Point,
    },
    /// A line.
    Line(LineArea),
    /// An annotation line, child of a line.
    Annotation(AnnotationArea),
    /// Shaped text.
    Glyph(GlyphArea),
    /// Whitespace.
    Space(SpaceArea),
    /// Inline alignment padding.
    InlineFiller,
    /// Block alignment padding.
    BlockFiller,
    /// A paragraph set inside a line.
    InlineBlock,
    /// An image inside a line.
    InlineImage(ImageArea),
    /// An image stacked with blocks.
    BlockImage(ImageArea),
}

impl AreaKind {
    /// Short lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::BoundedBlock { .. } => "bounded-block",
            Self::PositionedBlock { .. } => "positioned-block",
            Self::Line(_) => "line",
            Self::Annotation(_) => "annotation",
            Self::Glyph(_) => "glyph",
            Self::Space(_) => "space",
            Self::InlineFiller => "inline-filler",
            Self::BlockFiller => "block-filler",
            Self::InlineBlock => "inline-block",
            Self::InlineImage(_) => "inline-image",
            Self::BlockImage(_) => "block-image",
        }
    }

    /// True for areas that may be placed in a line.
    #[must_use]
    pub const fn is_inline(&self) -> bool {
        matches!(
            self,
            Self::Annotation(_)
                | Self::Glyph(_)
                | Self::Space(_)
                | Self::InlineFiller
                | Self::InlineBlock
                | Self::InlineImage(_)
        )
    }

    /// True for areas that take children.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Block
                | Self::BoundedBlock { .. }
                | Self::PositionedBlock { .. }
                | Self::Line(_)
                | Self::Annotation(_)
                | Self::InlineBlock
        )
    }

    /// True for block areas, lines included.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Block | Self::BoundedBlock { .. } | Self::PositionedBlock { .. } | Self::Line(_) | Self::Annotation(_)
        )
    }

    /// Line data of a line or annotation.
    #[must_use]
    pub const fn line(&self) -> Option<&LineArea> {
        match self {
            Self::Line(l) | Self::Annotation(AnnotationArea { line: l, .. }) => Some(l),
            _ => None,
        }
    }

    /// Mutable line data of a line or annotation.
    pub fn line_mut(&mut self) -> Option<&mut LineArea> {
        match self {
            Self::Line(l) | Self::Annotation(AnnotationArea { line: l, .. }) => Some(l),
            _ => None,
        }
    }
}

/// A node of the area tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    /// What the area is.
    pub kind: AreaKind,
    /// Size, insets and bidi state.
    pub geometry: Geometry,
    /// The document element that generated the area.
    pub element: Option<NodeId>,
    pub(crate) parent: Option<AreaId>,
    pub(crate) children: Vec<AreaId>,
}

impl Area {
    /// A detached area.
    #[must_use]
    pub const fn new(kind: AreaKind, geometry: Geometry, element: Option<NodeId>) -> Self {
        Self {
            kind,
            geometry,
            element,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The parent, if attached.
    #[must_use]
    pub const fn parent(&self) -> Option<AreaId> {
        self.parent
    }

    /// Children in order.
    #[must_use]
    pub fn children(&self) -> &[AreaId] {
        &self.children
    }

    /// Content BPD; for lines this includes the annotation reserves.
    #[must_use]
    pub fn bpd(&self) -> f64 {
        self.geometry.bpd + self.kind.line().map_or(0.0, LineArea::annotation_bpd)
    }

    /// Content IPD.
    #[must_use]
    pub const fn ipd(&self) -> f64 {
        self.geometry.ipd
    }

    /// Allocation BPD.
    #[must_use]
    pub fn allocation_bpd(&self) -> f64 {
        self.bpd()
            + self.geometry.border.sum(Dimension::Bpd)
            + self.geometry.padding.sum(Dimension::Bpd)
    }

    /// Allocation IPD.
    #[must_use]
    pub fn allocation_ipd(&self) -> f64 {
        self.geometry.allocation(Dimension::Ipd)
    }
}
