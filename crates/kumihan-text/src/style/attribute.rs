//! Style attributes, their values, and the intervals they apply over.

use std::ops::Range;

use kumihan_fonts::{Combination, Font, Orientation};
use strum_macros::Display;

use super::color::Color;
use super::values::{
    AnnotationOverflow, AnnotationOverhang, AnnotationOverhangClass, AnnotationPosition, AnnotationReserve,
    BlockAlignment, Emphasis, InlineAlignment, Outline, Whitespace, Wrap,
};
use crate::phrase::{Paragraph, Phrase};

/// Every attribute a phrase can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleAttribute {
    /// Annotation phrases attached to a base.
    Annotations,
    /// Alignment of annotations against their base.
    AnnotationAlignment,
    /// Distance between an annotation and its base.
    AnnotationOffset,
    /// Annotation overflow handling.
    AnnotationOverflow,
    /// Annotation overhang handling.
    AnnotationOverhang,
    /// Character class annotations may overhang.
    AnnotationOverhangClass,
    /// Annotation placement.
    AnnotationPosition,
    /// Space reserved for annotations on every line.
    AnnotationReserve,
    /// Resolved bidi embedding level.
    Bidi,
    /// Line stacking alignment.
    BlockAlignment,
    /// Explicit block progression dimension.
    Bpd,
    /// Text color.
    Color,
    /// Horizontal-in-vertical combination.
    Combination,
    /// Embedded paragraph carried by an object replacement character.
    Embedding,
    /// Emphasis marks.
    Emphasis,
    /// Resolved font.
    Font,
    /// Text alignment.
    InlineAlignment,
    /// Explicit inline progression dimension.
    Ipd,
    /// Language tag.
    Language,
    /// Extra advance after each character.
    LetterSpacing,
    /// Line height.
    LineHeight,
    /// Glyph orientation.
    Orientation,
    /// Text outline.
    Outline,
    /// Script tag.
    Script,
    /// Whitespace handling.
    Whitespace,
    /// Wrapping.
    Wrap,
}

/// The value of a [`StyleAttribute`].
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// See [`StyleAttribute::Annotations`].
    Annotations(Vec<Phrase>),
    /// Inline or annotation alignment.
    Alignment(InlineAlignment),
    /// Any length: offsets, line height, letter spacing, ipd, bpd.
    Length(f64),
    /// See [`StyleAttribute::AnnotationOverflow`].
    Overflow(AnnotationOverflow),
    /// See [`StyleAttribute::AnnotationOverhang`].
    Overhang(AnnotationOverhang),
    /// See [`StyleAttribute::AnnotationOverhangClass`].
    OverhangClass(AnnotationOverhangClass),
    /// See [`StyleAttribute::AnnotationPosition`].
    Position(AnnotationPosition),
    /// See [`StyleAttribute::AnnotationReserve`].
    Reserve(AnnotationReserve),
    /// Bidi embedding level.
    Level(u8),
    /// See [`StyleAttribute::BlockAlignment`].
    BlockAlignment(BlockAlignment),
    /// See [`StyleAttribute::Color`].
    Color(Color),
    /// See [`StyleAttribute::Combination`].
    Combination(Combination),
    /// See [`StyleAttribute::Embedding`].
    Embedding(Box<Paragraph>),
    /// See [`StyleAttribute::Emphasis`].
    Emphasis(Emphasis),
    /// See [`StyleAttribute::Font`].
    Font(Font),
    /// Language or script tag.
    Text(String),
    /// See [`StyleAttribute::Orientation`].
    Orientation(Orientation),
    /// See [`StyleAttribute::Outline`].
    Outline(Outline),
    /// See [`StyleAttribute::Whitespace`].
    Whitespace(Whitespace),
    /// See [`StyleAttribute::Wrap`].
    Wrap(Wrap),
}

/// An attribute applying to a character range, or to a whole phrase when
/// the range is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleAttributeInterval {
    /// The attribute.
    pub attribute: StyleAttribute,
    /// Its value.
    pub value: StyleValue,
    /// Half-open character range; `None` is outer scope.
    pub range: Option<Range<usize>>,
}

impl StyleAttributeInterval {
    /// An interval over `range`.
    #[must_use]
    pub const fn new(attribute: StyleAttribute, value: StyleValue, range: Range<usize>) -> Self {
        Self {
            attribute,
            value,
            range: Some(range),
        }
    }

    /// An outer scope (whole phrase) attribute.
    #[must_use]
    pub const fn outer(attribute: StyleAttribute, value: StyleValue) -> Self {
        Self {
            attribute,
            value,
            range: None,
        }
    }

    /// True for whole phrase scope.
    #[must_use]
    pub const fn is_outer_scope(&self) -> bool {
        self.range.is_none()
    }

    /// True when the interval covers `index`. Outer scope covers everything.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.range.as_ref().is_none_or(|r| r.contains(&index))
    }

    /// The same attribute moved onto `range`.
    #[must_use]
    pub fn with_range(mut self, range: Range<usize>) -> Self {
        self.range = Some(range);
        self
    }

    /// The interval shifted right by `offset`; outer scope is unchanged.
    #[must_use]
    pub fn shifted(mut self, offset: usize) -> Self {
        if let Some(r) = &mut self.range {
            *r = r.start + offset..r.end + offset;
        }
        self
    }
}
