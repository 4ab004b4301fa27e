//! Attributed text runs.
//!
//! A [`Phrase`] is text plus style attributes. An attribute applies either
//! to the whole run (outer scope) or to a half-open character interval.
//! Lookups at an index take the last added interval covering it, then the
//! whole-run value, then the [`Defaults`].
//!
//! ```text
//!   "ABCD"          whole-run: FONT=f
//!    [1,3) COLOR=red
//!
//!   color(Some(1)) -> red      color(Some(0)) -> defaults.color
//!   font(Some(0))  -> f        font(None)     -> f
//! ```
//!
//! Indices count `char`s, not bytes.

use std::collections::BTreeMap;
use std::ops::{Deref, Range};

use kumihan_common::characters::{OBJECT, is_whitespace};
use kumihan_dom::NodeId;
use kumihan_fonts::{Combination, Font, Orientation};

use crate::style::{
    AnnotationOverflow, AnnotationOverhang, AnnotationOverhangClass, AnnotationPosition, AnnotationReserve,
    BlockAlignment, Color, Defaults, Emphasis, InlineAlignment, Outline, StyleAttribute, StyleAttributeInterval,
    StyleValue, Whitespace, Wrap,
};

/// What produced a phrase.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PhraseKind {
    /// Plain text.
    #[default]
    Text,
    /// Ruby or emphasis: the concatenation of `bases`, each carrying its
    /// annotations as an [`StyleAttribute::Annotations`] interval.
    Annotated {
        /// The base phrases in order.
        bases: Vec<Phrase>,
    },
    /// A single object replacement character carrying an embedded
    /// paragraph.
    Embedding,
    /// Marks a paragraph boundary; has no text.
    ParagraphBreak,
}

/// An attributed text run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Phrase {
    element: Option<NodeId>,
    kind: PhraseKind,
    text: String,
    length: usize,
    attributes: BTreeMap<StyleAttribute, StyleValue>,
    intervals: Vec<StyleAttributeInterval>,
}

macro_rules! copy_accessor {
    ($(#[$meta:meta])* $name:ident, $attribute:ident, $variant:ident, $ty:ty, $default:ident) => {
        $(#[$meta])*
        #[must_use]
        pub fn $name(&self, index: Option<usize>, defaults: &Defaults) -> $ty {
            match self.value(StyleAttribute::$attribute, index) {
                Some(StyleValue::$variant(v)) => *v,
                _ => defaults.$default,
            }
        }
    };
}

impl Phrase {
    /// A phrase over `text`. Intervals reaching past the end are clipped;
    /// empty ones are dropped.
    #[must_use]
    pub fn new(element: Option<NodeId>, text: &str, attributes: Vec<StyleAttributeInterval>) -> Self {
        let mut phrase = Self {
            element,
            text: text.to_string(),
            length: text.chars().count(),
            ..Self::default()
        };
        phrase.add_all(attributes);
        phrase
    }

    /// The concatenation of `phrases`, then `attributes`.
    ///
    /// Each part's whole-run attributes become an interval over the part's
    /// range, followed by the part's own intervals, so part intervals still
    /// override part whole-run values.
    #[must_use]
    pub fn concat(element: Option<NodeId>, phrases: &[Self], attributes: Vec<StyleAttributeInterval>) -> Self {
        let mut phrase = Self {
            element,
            ..Self::default()
        };
        for p in phrases {
            phrase.append(p);
        }
        phrase.add_all(attributes);
        phrase
    }

    /// An annotated phrase over `bases`.
    #[must_use]
    pub fn annotated(element: Option<NodeId>, bases: Vec<Self>, attributes: Vec<StyleAttributeInterval>) -> Self {
        let mut phrase = Self::concat(element, &bases, attributes);
        phrase.kind = PhraseKind::Annotated { bases };
        phrase
    }

    /// A phrase embedding `paragraph` as one object replacement character.
    #[must_use]
    pub fn embedding(element: Option<NodeId>, paragraph: Paragraph) -> Self {
        let mut phrase = Self::new(element, &OBJECT.to_string(), Vec::new());
        phrase.kind = PhraseKind::Embedding;
        phrase.add_range(StyleAttribute::Embedding, StyleValue::Embedding(Box::new(paragraph)), 0..1);
        phrase
    }

    /// A paragraph break marker.
    #[must_use]
    pub fn paragraph_break(element: Option<NodeId>) -> Self {
        Self {
            element,
            kind: PhraseKind::ParagraphBreak,
            ..Self::default()
        }
    }

    /// Append `other`'s text and attributes.
    pub fn append(&mut self, other: &Self) {
        let offset = self.length;
        self.text.push_str(&other.text);
        self.length += other.length;
        if other.length == 0 {
            return;
        }
        let range = offset..self.length;
        for (attribute, value) in &other.attributes {
            self.intervals
                .push(StyleAttributeInterval::new(*attribute, value.clone(), range.clone()));
        }
        self.intervals
            .extend(other.intervals.iter().cloned().map(|i| i.shifted(offset)));
    }

    /// Add attributes in order.
    pub fn add_all(&mut self, attributes: impl IntoIterator<Item = StyleAttributeInterval>) {
        for a in attributes {
            self.add(a);
        }
    }

    /// Add one attribute, whole-run or interval.
    pub fn add(&mut self, interval: StyleAttributeInterval) {
        match interval.range.clone() {
            None => {
                let _ = self.attributes.insert(interval.attribute, interval.value);
            }
            Some(r) => {
                let end = r.end.min(self.length);
                if r.start < end {
                    self.intervals.push(interval.with_range(r.start..end));
                }
            }
        }
    }

    /// Set a whole-run attribute.
    pub fn add_outer(&mut self, attribute: StyleAttribute, value: StyleValue) {
        self.add(StyleAttributeInterval::outer(attribute, value));
    }

    /// Add an interval attribute.
    pub fn add_range(&mut self, attribute: StyleAttribute, value: StyleValue, range: Range<usize>) {
        self.add(StyleAttributeInterval::new(attribute, value, range));
    }

    /// The element that generated this phrase.
    #[must_use]
    pub const fn element(&self) -> Option<NodeId> {
        self.element
    }

    /// What produced this phrase.
    #[must_use]
    pub const fn kind(&self) -> &PhraseKind {
        &self.kind
    }

    /// The text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The characters of the text.
    #[must_use]
    pub fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    /// The text of a character range.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> String {
        self.text
            .chars()
            .skip(range.start)
            .take(range.end.saturating_sub(range.start))
            .collect()
    }

    /// Length in characters.
    #[must_use]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// True when there is no text.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// True when every character is whitespace (vacuously for empty text).
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.text.chars().all(is_whitespace)
    }

    /// True when the text is exactly one object replacement character.
    #[must_use]
    pub fn is_embedding(&self) -> bool {
        self.length == 1 && self.text.starts_with(OBJECT)
    }

    /// True for a paragraph break marker.
    #[must_use]
    pub const fn is_paragraph_break(&self) -> bool {
        matches!(self.kind, PhraseKind::ParagraphBreak)
    }

    /// Whole-run attributes.
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<StyleAttribute, StyleValue> {
        &self.attributes
    }

    /// Interval attributes in the order added.
    #[must_use]
    pub fn intervals(&self) -> &[StyleAttributeInterval] {
        &self.intervals
    }

    /// The last added interval for `attribute` covering `index`.
    #[must_use]
    pub fn interval_at(&self, attribute: StyleAttribute, index: usize) -> Option<&StyleAttributeInterval> {
        self.intervals
            .iter()
            .rev()
            .find(|i| i.attribute == attribute && i.contains(index))
    }

    /// The value of `attribute` at `index` (interval, then whole-run), or
    /// the whole-run value when `index` is `None`.
    #[must_use]
    pub fn value(&self, attribute: StyleAttribute, index: Option<usize>) -> Option<&StyleValue> {
        index
            .and_then(|i| self.interval_at(attribute, i))
            .map(|i| &i.value)
            .or_else(|| self.attributes.get(&attribute))
    }

    /// End of the run starting at `begin` over which the interval winning
    /// each of `attributes` stays the same. Adjacent intervals with equal
    /// values remain separate runs.
    #[must_use]
    pub fn run_limit(&self, begin: usize, attributes: &[StyleAttribute]) -> usize {
        let winners = |i: usize| -> Vec<Option<usize>> {
            attributes
                .iter()
                .map(|a| {
                    self.intervals
                        .iter()
                        .rposition(|iv| iv.attribute == *a && iv.contains(i))
                })
                .collect()
        };
        let first = winners(begin);
        (begin + 1..self.length)
            .find(|&i| winners(i) != first)
            .unwrap_or(self.length)
    }

    copy_accessor!(
        /// Annotation alignment.
        annotation_align, AnnotationAlignment, Alignment, InlineAlignment, annotation_align
    );
    copy_accessor!(
        /// Annotation offset.
        annotation_offset, AnnotationOffset, Length, f64, annotation_offset
    );
    copy_accessor!(
        /// Annotation overflow.
        annotation_overflow, AnnotationOverflow, Overflow, AnnotationOverflow, annotation_overflow
    );
    copy_accessor!(
        /// Annotation overhang.
        annotation_overhang, AnnotationOverhang, Overhang, AnnotationOverhang, annotation_overhang
    );
    copy_accessor!(
        /// Annotation overhang class.
        annotation_overhang_class, AnnotationOverhangClass, OverhangClass, AnnotationOverhangClass,
        annotation_overhang_class
    );
    copy_accessor!(
        /// Annotation position.
        annotation_position, AnnotationPosition, Position, AnnotationPosition, annotation_position
    );
    copy_accessor!(
        /// Annotation reserve.
        annotation_reserve, AnnotationReserve, Reserve, AnnotationReserve, annotation_reserve
    );
    copy_accessor!(
        /// Text color.
        color, Color, Color, Color, color
    );
    copy_accessor!(
        /// Horizontal-in-vertical combination.
        combination, Combination, Combination, Combination, combination
    );
    copy_accessor!(
        /// Line stacking alignment.
        block_alignment, BlockAlignment, BlockAlignment, BlockAlignment, display_align
    );
    copy_accessor!(
        /// Glyph orientation.
        orientation, Orientation, Orientation, Orientation, orientation
    );
    copy_accessor!(
        /// Text outline.
        outline, Outline, Outline, Outline, outline
    );
    copy_accessor!(
        /// Text alignment.
        text_align, InlineAlignment, Alignment, InlineAlignment, text_align
    );
    copy_accessor!(
        /// Whitespace handling.
        whitespace, Whitespace, Whitespace, Whitespace, whitespace
    );
    copy_accessor!(
        /// Wrapping.
        wrap, Wrap, Wrap, Wrap, wrap
    );

    /// Annotation phrases of the base covering `index`.
    #[must_use]
    pub fn annotations(&self, index: Option<usize>) -> Option<&[Self]> {
        match self.value(StyleAttribute::Annotations, index) {
            Some(StyleValue::Annotations(a)) => Some(a),
            _ => None,
        }
    }

    /// The paragraph carried by an embedding.
    #[must_use]
    pub fn embedded(&self, index: Option<usize>) -> Option<&Paragraph> {
        match self.value(StyleAttribute::Embedding, index) {
            Some(StyleValue::Embedding(p)) => Some(p),
            _ => None,
        }
    }

    /// Emphasis; there is no default.
    #[must_use]
    pub fn emphasis(&self, index: Option<usize>) -> Option<&Emphasis> {
        match self.value(StyleAttribute::Emphasis, index) {
            Some(StyleValue::Emphasis(e)) => Some(e),
            _ => None,
        }
    }

    /// Font; there is no default.
    #[must_use]
    pub fn font(&self, index: Option<usize>) -> Option<&Font> {
        match self.value(StyleAttribute::Font, index) {
            Some(StyleValue::Font(f)) => Some(f),
            _ => None,
        }
    }

    /// Language tag.
    #[must_use]
    pub fn language<'a>(&'a self, index: Option<usize>, defaults: &'a Defaults) -> &'a str {
        match self.value(StyleAttribute::Language, index) {
            Some(StyleValue::Text(s)) => s,
            _ => &defaults.language,
        }
    }

    /// Script tag.
    #[must_use]
    pub fn script<'a>(&'a self, index: Option<usize>, defaults: &'a Defaults) -> &'a str {
        match self.value(StyleAttribute::Script, index) {
            Some(StyleValue::Text(s)) => s,
            _ => &defaults.script,
        }
    }

    /// Line height, falling back to `font`'s default line height and then
    /// to the defaults.
    #[must_use]
    pub fn line_height(&self, index: Option<usize>, defaults: &Defaults, font: Option<&Font>) -> f64 {
        match self.value(StyleAttribute::LineHeight, index) {
            Some(StyleValue::Length(v)) => *v,
            _ => font.map_or(defaults.line_height, Font::default_line_height),
        }
    }

    /// Bidi level, else `default`.
    #[must_use]
    pub fn bidi_level(&self, index: Option<usize>, default: u8) -> u8 {
        match self.value(StyleAttribute::Bidi, index) {
            Some(StyleValue::Level(l)) => *l,
            _ => default,
        }
    }

    /// Letter spacing, else zero.
    #[must_use]
    pub fn letter_spacing(&self, index: Option<usize>) -> f64 {
        self.length_value(StyleAttribute::LetterSpacing, index)
            .unwrap_or_default()
    }

    /// Explicit inline progression dimension.
    #[must_use]
    pub fn ipd(&self, index: Option<usize>) -> Option<f64> {
        self.length_value(StyleAttribute::Ipd, index)
    }

    /// Explicit block progression dimension.
    #[must_use]
    pub fn bpd(&self, index: Option<usize>) -> Option<f64> {
        self.length_value(StyleAttribute::Bpd, index)
    }

    fn length_value(&self, attribute: StyleAttribute, index: Option<usize>) -> Option<f64> {
        match self.value(attribute, index) {
            Some(StyleValue::Length(v)) => Some(*v),
            _ => None,
        }
    }
}

/// A paragraph: the concatenation of its phrases, with paragraph styles
/// as whole-run attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    content: Phrase,
}

impl Paragraph {
    /// Concatenate `phrases` under `attributes`.
    #[must_use]
    pub fn new(element: Option<NodeId>, phrases: &[Phrase], attributes: Vec<StyleAttributeInterval>) -> Self {
        Self {
            content: Phrase::concat(element, phrases, attributes),
        }
    }

    /// The content as a phrase.
    #[must_use]
    pub const fn content(&self) -> &Phrase {
        &self.content
    }

    /// Unwrap the content.
    #[must_use]
    pub fn into_content(self) -> Phrase {
        self.content
    }
}

impl Deref for Paragraph {
    type Target = Phrase;

    fn deref(&self) -> &Phrase {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> StyleValue {
        StyleValue::Color(Color::rgb(255, 0, 0))
    }

    #[test]
    fn test_lookup_order() {
        let defaults = Defaults::default();
        let mut p = Phrase::new(None, "ABCD", vec![StyleAttributeInterval::new(StyleAttribute::Color, red(), 1..3)]);
        assert_eq!(p.color(Some(1), &defaults), Color::rgb(255, 0, 0));
        assert_eq!(p.color(Some(0), &defaults), Color::YELLOW);
        assert_eq!(p.color(None, &defaults), Color::YELLOW);

        p.add_outer(StyleAttribute::Color, StyleValue::Color(Color::WHITE));
        assert_eq!(p.color(Some(0), &defaults), Color::WHITE);
        assert_eq!(p.color(Some(2), &defaults), Color::rgb(255, 0, 0));

        p.add_range(StyleAttribute::Color, StyleValue::Color(Color::BLACK), 2..10);
        assert_eq!(p.color(Some(2), &defaults), Color::BLACK);
        assert_eq!(p.intervals().last().and_then(|i| i.range.clone()), Some(2..4));
    }

    #[test]
    fn test_run_limit_keeps_equal_neighbours_apart() {
        let mut p = Phrase::new(None, "abcd", Vec::new());
        p.add_range(StyleAttribute::Color, red(), 0..2);
        p.add_range(StyleAttribute::Color, red(), 2..4);
        assert_eq!(p.run_limit(0, &[StyleAttribute::Color]), 2);
        assert_eq!(p.run_limit(2, &[StyleAttribute::Color]), 4);
        assert_eq!(p.run_limit(0, &[StyleAttribute::Font]), 4);
    }

    #[test]
    fn test_embedding() {
        let inner = Paragraph::new(None, &[Phrase::new(None, "x", Vec::new())], Vec::new());
        let e = Phrase::embedding(None, inner.clone());
        assert!(e.is_embedding());
        assert_eq!(e.embedded(Some(0)), Some(&inner));
        assert_eq!(e.embedded(None), None);
    }

    #[test]
    fn test_line_height_fallbacks() {
        let defaults = Defaults::default();
        let p = Phrase::new(None, "a", Vec::new());
        assert_eq!(p.line_height(Some(0), &defaults, None), 30.0);
        let mut q = p.clone();
        q.add_outer(StyleAttribute::LineHeight, StyleValue::Length(40.0));
        assert_eq!(q.line_height(Some(0), &defaults, None), 40.0);
    }
}
