//! Fallback style values used when neither an interval nor a whole-run
//! attribute applies.

use kumihan_common::{Extent, WritingMode};
use kumihan_fonts::{Combination, FontKerning, FontKey, FontStyle, FontWeight, Orientation};
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::values::{
    AnnotationOverflow, AnnotationOverhang, AnnotationOverhangClass, AnnotationPosition, AnnotationReserve,
    BlockAlignment, Emphasis, InlineAlignment, Outline, Whitespace, Wrap,
};

/// Style defaults. Every field may be overridden from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Annotation alignment.
    pub annotation_align: InlineAlignment,
    /// Annotation offset.
    pub annotation_offset: f64,
    /// Annotation overflow.
    pub annotation_overflow: AnnotationOverflow,
    /// Annotation overhang.
    pub annotation_overhang: AnnotationOverhang,
    /// Annotation overhang class.
    pub annotation_overhang_class: AnnotationOverhangClass,
    /// Annotation position.
    pub annotation_position: AnnotationPosition,
    /// Annotation reserve.
    pub annotation_reserve: AnnotationReserve,
    /// Text color.
    pub color: Color,
    /// Combination.
    pub combination: Combination,
    /// Line stacking alignment.
    pub display_align: BlockAlignment,
    /// Emphasis.
    pub emphasis: Emphasis,
    /// Font family preference list.
    pub font_families: Vec<String>,
    /// Kerning.
    pub font_kerning: FontKerning,
    /// Font em size.
    pub font_size: Extent,
    /// Font style.
    pub font_style: FontStyle,
    /// Font weight.
    pub font_weight: FontWeight,
    /// Language tag.
    pub language: String,
    /// Line height.
    pub line_height: f64,
    /// Glyph orientation.
    pub orientation: Orientation,
    /// Text outline.
    pub outline: Outline,
    /// Script tag.
    pub script: String,
    /// Text alignment.
    pub text_align: InlineAlignment,
    /// Whitespace handling.
    pub whitespace: Whitespace,
    /// Writing mode.
    pub writing_mode: WritingMode,
    /// Wrapping.
    pub wrap: Wrap,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            annotation_align: InlineAlignment::Auto,
            annotation_offset: 0.0,
            annotation_overflow: AnnotationOverflow::ShiftRuby,
            annotation_overhang: AnnotationOverhang::Allow,
            annotation_overhang_class: AnnotationOverhangClass::Auto,
            annotation_position: AnnotationPosition::Auto,
            annotation_reserve: AnnotationReserve::NONE,
            color: Color::YELLOW,
            combination: Combination::NONE,
            display_align: BlockAlignment::Before,
            emphasis: Emphasis::NONE,
            font_families: vec![FontKey::DEFAULT_FAMILY.to_string()],
            font_kerning: FontKerning::Normal,
            font_size: FontKey::DEFAULT_SIZE,
            font_style: FontStyle::Normal,
            font_weight: FontWeight::Normal,
            language: String::new(),
            line_height: FontKey::DEFAULT_SIZE.height * 1.25,
            orientation: Orientation::Rotate000,
            outline: Outline::NONE,
            script: "auto".to_string(),
            text_align: InlineAlignment::Start,
            whitespace: Whitespace::Default,
            writing_mode: WritingMode::Lrtb,
            wrap: Wrap::Wrap,
        }
    }
}
