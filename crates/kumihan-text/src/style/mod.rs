//! The style model: attributes, values, defaults.

pub mod attribute;
pub mod color;
pub mod defaults;
pub mod length;
pub mod values;

pub use attribute::{StyleAttribute, StyleAttributeInterval, StyleValue};
pub use color::{Color, ParseColorError};
pub use defaults::Defaults;
pub use length::{Length, LengthUnit};
pub use values::{
    Annotation, AnnotationOverflow, AnnotationOverhang, AnnotationOverhangClass, AnnotationPosition,
    AnnotationReserve, BlockAlignment, Emphasis, EmphasisPosition, EmphasisStyle, InlineAlignment, Outline,
    ReservePosition, Whitespace, Wrap,
};
