//! The area tree: the resolved output of layout.
//!
//! [§ 11.3 Layout Semantics](https://www.w3.org/TR/ttml2/#semantics-region-layout)
//!
//! ```text
//!   PositionedBlock (region)
//!   └── Block (paragraph)
//!       ├── Line ──┬── Glyph "雪は"
//!       │          ├── Annotation ── Glyph "ゆき"
//!       │          └── InlineFiller
//!       └── Line ──── Glyph ...
//! ```
//!
//! All areas share one [`Geometry`] record; the [`AreaKind`] carries what
//! differs. Areas are owned by an [`AreaTree`] arena and addressed by
//! [`AreaId`].

mod area;
mod error;
mod expansion;
pub mod geometry;
mod json;
mod tree;

pub use area::{
    AnnotationArea, Area, AreaKind, Decoration, DecorationKind, GlyphArea, ImageArea, LineArea, SpaceArea,
};
pub use error::AreaError;
pub use expansion::{Expansion, expand};
pub use geometry::{Geometry, Insets, ReferenceRectangle, Visibility};
pub use tree::{AreaId, AreaTree};
