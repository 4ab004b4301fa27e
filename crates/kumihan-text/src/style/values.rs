//! Keyword and compound style values.

use kumihan_common::Axis;
use kumihan_common::characters::{FILLED_DOT, SESAME_DOT};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::color::Color;

/// [§ 10.2.41 tts:textAlign](https://www.w3.org/TR/ttml2/#style-attribute-textAlign),
/// [§ 10.2.34 tts:rubyAlign](https://www.w3.org/TR/ttml2/#style-attribute-rubyAlign)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum InlineAlignment {
    /// Start edge of the line.
    #[default]
    Start,
    /// End edge of the line.
    End,
    /// Physical left.
    Left,
    /// Physical right.
    Right,
    /// Centered.
    Center,
    /// Stretched to fill the line.
    Justify,
    /// Context dependent.
    Auto,
    /// Space distributed around each item.
    SpaceAround,
    /// Space distributed between items.
    SpaceBetween,
    /// Aligned like the base.
    WithBase,
}

/// [§ 10.2.15 tts:displayAlign](https://www.w3.org/TR/ttml2/#style-attribute-displayAlign)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum BlockAlignment {
    /// Stacked from the before edge.
    #[default]
    Before,
    /// Centered in the block progression dimension.
    Center,
    /// Stacked against the after edge.
    After,
    /// Space distributed between and around lines.
    Justify,
    /// Space distributed around each line.
    SpaceAround,
    /// Space distributed between lines.
    SpaceBetween,
}

/// [§ 10.2.36 tts:rubyOverflow](https://www.w3.org/TR/ttml2/#style-attribute-rubyOverflow)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationOverflow {
    /// Shift the annotation to stay inside the line.
    #[default]
    ShiftRuby,
    /// Let the annotation spill past the line edges.
    SpillRuby,
}

/// [§ 10.2.37 tts:rubyOverhang](https://www.w3.org/TR/ttml2/#style-attribute-rubyOverhang)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationOverhang {
    /// Annotations may overhang adjacent bases.
    #[default]
    Allow,
    /// Annotations stay over their own base.
    None,
}

/// [§ 10.2.38 tts:rubyOverhangClass](https://www.w3.org/TR/ttml2/#style-attribute-rubyOverhangClass)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationOverhangClass {
    /// Overhang onto characters of any class.
    #[default]
    Auto,
    /// Never overhang.
    Empty,
}

/// [§ 10.2.35 tts:rubyPosition](https://www.w3.org/TR/ttml2/#style-attribute-rubyPosition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum AnnotationPosition {
    /// Before on the first line, after otherwise.
    #[default]
    Auto,
    /// Before edge of the line.
    Before,
    /// After edge of the line.
    After,
    /// Outer edge of a two line block.
    Outside,
    /// Both edges.
    Both,
}

/// Position component of an [`AnnotationReserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum ReservePosition {
    /// No reserve.
    #[default]
    None,
    /// Before, or outside for two lines.
    Auto,
    /// Before edge.
    Before,
    /// After edge.
    After,
    /// Before on all but the last line, which reserves after.
    Outside,
    /// Both edges.
    Both,
}

/// [§ 10.2.39 tts:rubyReserve](https://www.w3.org/TR/ttml2/#style-attribute-rubyReserve)
///
/// Space set aside for annotations on every line of a paragraph whether or
/// not the line carries any.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnotationReserve {
    /// Where the space is reserved.
    pub position: ReservePosition,
    /// Amount; `None` means half the line's font size.
    pub reserve: Option<f64>,
}

impl AnnotationReserve {
    /// No reserve.
    pub const NONE: Self = Self {
        position: ReservePosition::None,
        reserve: None,
    };

    /// A reserve at `position`.
    #[must_use]
    pub const fn new(position: ReservePosition, reserve: Option<f64>) -> Self {
        Self { position, reserve }
    }

    /// True when nothing is reserved.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self.position, ReservePosition::None)
    }

    /// The concrete position for a line of a block of `line_count` lines.
    ///
    /// AUTO becomes OUTSIDE for exactly two lines, else BEFORE; OUTSIDE
    /// becomes AFTER on the last line, else BEFORE.
    #[must_use]
    pub const fn resolve_position(&self, line_count: usize, last_line: bool) -> ReservePosition {
        let mut p = self.position;
        if matches!(p, ReservePosition::Auto) {
            p = if line_count == 2 {
                ReservePosition::Outside
            } else {
                ReservePosition::Before
            };
        }
        if matches!(p, ReservePosition::Outside) {
            p = if last_line {
                ReservePosition::After
            } else {
                ReservePosition::Before
            };
        }
        p
    }
}

/// Mark shape of an [`Emphasis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisStyle {
    /// No emphasis.
    #[default]
    None,
    /// Dot chosen by writing axis.
    Auto,
    /// Author supplied text.
    Text,
}

/// Placement of an [`Emphasis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum EmphasisPosition {
    /// Before, or outside for two lines.
    #[default]
    Auto,
    /// Before edge.
    Before,
    /// After edge.
    After,
    /// Before on the first line, after otherwise.
    Outside,
}

/// [§ 10.2.44 tts:textEmphasis](https://www.w3.org/TR/ttml2/#style-attribute-textEmphasis)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Emphasis {
    /// Mark shape.
    pub style: EmphasisStyle,
    /// Mark text for [`EmphasisStyle::Text`].
    pub text: String,
    /// Placement.
    pub position: EmphasisPosition,
    /// Mark color; `None` follows the base text.
    pub color: Option<Color>,
}

impl Emphasis {
    /// No emphasis.
    pub const NONE: Self = Self {
        style: EmphasisStyle::None,
        text: String::new(),
        position: EmphasisPosition::Auto,
        color: None,
    };

    /// True when no mark is drawn.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.style == EmphasisStyle::None || (self.style == EmphasisStyle::Text && self.text.is_empty())
    }

    /// The mark character on `axis`.
    #[must_use]
    pub fn resolve_mark(&self, axis: Axis) -> Option<char> {
        match self.style {
            EmphasisStyle::None => None,
            EmphasisStyle::Text => self.text.chars().next(),
            EmphasisStyle::Auto => Some(if axis.is_vertical() { FILLED_DOT } else { SESAME_DOT }),
        }
    }

    /// The concrete position for a line of a block of `line_count` lines.
    #[must_use]
    pub const fn resolve_position(&self, line_count: usize, first_line: bool) -> EmphasisPosition {
        let mut p = self.position;
        if matches!(p, EmphasisPosition::Auto) {
            p = if line_count == 2 {
                EmphasisPosition::Outside
            } else {
                EmphasisPosition::Before
            };
        }
        if matches!(p, EmphasisPosition::Outside) {
            p = if first_line {
                EmphasisPosition::Before
            } else {
                EmphasisPosition::After
            };
        }
        p
    }

    /// The annotation position a synthesized mark is placed at.
    #[must_use]
    pub const fn annotation_position(&self) -> AnnotationPosition {
        match self.position {
            EmphasisPosition::Before => AnnotationPosition::Before,
            EmphasisPosition::After => AnnotationPosition::After,
            EmphasisPosition::Auto | EmphasisPosition::Outside => AnnotationPosition::Auto,
        }
    }
}

/// [§ 10.2.45 tts:textOutline](https://www.w3.org/TR/ttml2/#style-attribute-textOutline)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Outline {
    /// Outline color; `None` follows the text color.
    pub color: Option<Color>,
    /// Outline thickness.
    pub thickness: f64,
    /// Blur radius.
    pub blur: f64,
}

impl Outline {
    /// No outline.
    pub const NONE: Self = Self {
        color: None,
        thickness: 0.0,
        blur: 0.0,
    };

    /// True when the thickness is zero.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.thickness == 0.0
    }
}

/// [§ 10.2.59 tts:wrapOption](https://www.w3.org/TR/ttml2/#style-attribute-wrapOption)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum Wrap {
    /// Lines break at the measure.
    #[default]
    Wrap,
    /// Lines only break at explicit breaks.
    NoWrap,
}

/// [§ 10.4 xml:space](https://www.w3.org/TR/ttml2/#content-attribute-space)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Whitespace {
    /// Whitespace collapses.
    #[default]
    Default,
    /// Whitespace is kept.
    Preserve,
}

/// [§ 10.2.33 tts:ruby](https://www.w3.org/TR/ttml2/#style-attribute-ruby)
///
/// The role an element plays in an annotated (ruby) structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
#[serde(rename_all = "camelCase")]
pub enum Annotation {
    /// The whole ruby structure.
    Container,
    /// Groups bases.
    BaseContainer,
    /// Groups annotation texts.
    TextContainer,
    /// Base text.
    Base,
    /// Annotation text.
    Text,
    /// Fallback delimiter, never rendered.
    Delimiter,
    /// Emphasized text; marks are synthesized per character.
    Emphasis,
}
