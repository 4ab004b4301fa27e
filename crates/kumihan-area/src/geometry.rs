//! Writing-mode relative box geometry shared by every area.
//!
//! [§ 11.3.1 Area Model](https://www.w3.org/TR/ttml2/#semantics-area-model)
//!
//! Every area stores the IPD and BPD of its content rectangle together
//! with border and padding insets on its four relative sides:
//!
//! ```text
//!   ┌──────────────── allocation = border rectangle ────────────────┐
//!   │                         border.before                         │
//!   │   ┌──────────────────── padding rectangle ────────────────┐   │
//!   │   │                     padding.before                    │   │
//!   │ s │ s ┌───────────────── content ─────────────────┐     e │ e │
//!   │ t │ t │                                           │     n │ n │
//!   │ a │ a │            ipd x bpd (stored)             │     d │ d │
//!   │ r │ r └───────────────────────────────────────────┘       │   │
//!   │ t │ t                   padding.after                     │   │
//!   │   └───────────────────────────────────────────────────────┘   │
//!   │                         border.after                          │
//!   └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Areas have no margins, so the allocation rectangle is the border
//! rectangle. Reassigning border or padding shrinks or grows the stored
//! content extent so that the allocation extent stays where it was.

use kumihan_common::{Dimension, Direction, Extent, Point, WritingMode};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::AreaError;

/// Inset changes smaller than this leave the content extent alone.
pub const EPSILON: f64 = 1e-6;

/// Insets on the four writing-mode relative sides.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Insets {
    /// Before edge (first line side).
    pub before: f64,
    /// End edge of the inline progression.
    pub end: f64,
    /// After edge (last line side).
    pub after: f64,
    /// Start edge of the inline progression.
    pub start: f64,
}

impl Insets {
    /// No insets.
    pub const ZERO: Self = Self::uniform(0.0);

    /// The same inset on every side.
    #[must_use]
    pub const fn uniform(v: f64) -> Self {
        Self {
            before: v,
            end: v,
            after: v,
            start: v,
        }
    }

    /// Create insets in before, end, after, start order.
    #[must_use]
    pub const fn new(before: f64, end: f64, after: f64, start: f64) -> Self {
        Self {
            before,
            end,
            after,
            start,
        }
    }

    /// Total inset along `dimension`.
    #[must_use]
    pub fn sum(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Ipd => self.start + self.end,
            Dimension::Bpd => self.before + self.after,
        }
    }

    /// Project onto physical sides for `writing_mode`.
    #[must_use]
    pub fn physical(&self, writing_mode: WritingMode) -> Sides {
        let mut sides = Sides::default();
        for (value, dimension, leading) in [
            (self.before, Dimension::Bpd, true),
            (self.after, Dimension::Bpd, false),
            (self.start, Dimension::Ipd, true),
            (self.end, Dimension::Ipd, false),
        ] {
            let side = match (writing_mode.direction(dimension), leading) {
                (Direction::Lr, true) | (Direction::Rl, false) => &mut sides.left,
                (Direction::Rl, true) | (Direction::Lr, false) => &mut sides.right,
                (Direction::Tb, true) | (Direction::Bt, false) => &mut sides.top,
                (Direction::Bt, true) | (Direction::Tb, false) => &mut sides.bottom,
            };
            *side = value;
        }
        sides
    }
}

/// Physical side values.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sides {
    /// Top side.
    pub top: f64,
    /// Right side.
    pub right: f64,
    /// Bottom side.
    pub bottom: f64,
    /// Left side.
    pub left: f64,
}

/// Which of an area's nested rectangles a query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceRectangle {
    /// The whole space allocated to the area.
    Allocation,
    /// Outside of the border.
    Border,
    /// Outside of the padding.
    Padding,
    /// The content itself.
    Content,
    /// The containing block; needs context an area does not have.
    Container,
}

/// [§ 10.2.58 tts:visibility](https://www.w3.org/TR/ttml2/#style-attribute-visibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Rendered.
    #[default]
    Visible,
    /// Occupies space but is not rendered.
    Hidden,
}

/// The record every area carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    /// Writing mode the relative sides are interpreted in.
    pub writing_mode: WritingMode,
    /// Bidi embedding level.
    pub bidi_level: u8,
    /// Content IPD.
    pub ipd: f64,
    /// Content BPD.
    pub bpd: f64,
    /// Border insets.
    pub border: Insets,
    /// Padding insets.
    pub padding: Insets,
    /// Visibility.
    pub visibility: Visibility,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// How much the children overflow the content along the progression.
    pub overflow: f64,
    /// Number of times the child order was reversed.
    pub reversals: u32,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(WritingMode::default(), 0.0, 0.0, 0)
    }
}

impl Geometry {
    /// A geometry without insets.
    #[must_use]
    pub const fn new(writing_mode: WritingMode, ipd: f64, bpd: f64, bidi_level: u8) -> Self {
        Self {
            writing_mode,
            bidi_level,
            ipd,
            bpd,
            border: Insets::ZERO,
            padding: Insets::ZERO,
            visibility: Visibility::Visible,
            opacity: 1.0,
            overflow: 0.0,
            reversals: 0,
        }
    }

    /// A geometry whose allocation is the physical `extent`.
    #[must_use]
    pub const fn with_extent(writing_mode: WritingMode, extent: Extent, bidi_level: u8) -> Self {
        let (ipd, bpd) = if writing_mode.is_horizontal() {
            (extent.width, extent.height)
        } else {
            (extent.height, extent.width)
        };
        Self::new(writing_mode, ipd, bpd, bidi_level)
    }

    /// Content size along `dimension`.
    #[must_use]
    pub const fn size(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Ipd => self.ipd,
            Dimension::Bpd => self.bpd,
        }
    }

    /// Allocation size along `dimension`.
    #[must_use]
    pub fn allocation(&self, dimension: Dimension) -> f64 {
        self.size(dimension) + self.padding.sum(dimension) + self.border.sum(dimension)
    }

    /// True when the bidi level is odd.
    #[must_use]
    pub const fn is_right_to_left(&self) -> bool {
        self.bidi_level & 1 == 1
    }
}

/// Replace the border, keeping the allocation extent.
pub fn set_border(geometry: &mut Geometry, border: Insets) {
    let old = geometry.border;
    adjust_content(geometry, &old, &border);
    geometry.border = border;
}

/// Replace the padding, keeping the allocation extent.
pub fn set_padding(geometry: &mut Geometry, padding: Insets) {
    let old = geometry.padding;
    adjust_content(geometry, &old, &padding);
    geometry.padding = padding;
}

fn adjust_content(geometry: &mut Geometry, old: &Insets, new: &Insets) {
    for dimension in [Dimension::Ipd, Dimension::Bpd] {
        let delta = new.sum(dimension) - old.sum(dimension);
        if delta.abs() < EPSILON {
            continue;
        }
        match dimension {
            Dimension::Ipd => geometry.ipd -= delta,
            Dimension::Bpd => geometry.bpd -= delta,
        }
    }
}

/// Relative `(ipd, bpd)` of `rectangle`, given the content size.
///
/// # Errors
///
/// [`AreaError::UnsupportedRectangle`] for [`ReferenceRectangle::Container`].
pub fn relative_extent(
    geometry: &Geometry,
    ipd: f64,
    bpd: f64,
    rectangle: ReferenceRectangle,
) -> Result<(f64, f64), AreaError> {
    let inset = |insets: &[&Insets], dimension: Dimension| insets.iter().map(|i| i.sum(dimension)).sum::<f64>();
    let layers: &[&Insets] = match rectangle {
        ReferenceRectangle::Allocation | ReferenceRectangle::Border => &[&geometry.border, &geometry.padding],
        ReferenceRectangle::Padding => &[&geometry.padding],
        ReferenceRectangle::Content => &[],
        ReferenceRectangle::Container => return Err(AreaError::UnsupportedRectangle(rectangle)),
    };
    Ok((ipd + inset(layers, Dimension::Ipd), bpd + inset(layers, Dimension::Bpd)))
}

/// Project a relative `(ipd, bpd)` onto a physical extent.
#[must_use]
pub const fn physical_extent(writing_mode: WritingMode, ipd: f64, bpd: f64) -> Extent {
    if writing_mode.is_horizontal() {
        Extent::new(ipd, bpd)
    } else {
        Extent::new(bpd, ipd)
    }
}

/// Offset of `rectangle`'s top-left corner from the allocation origin.
///
/// # Errors
///
/// [`AreaError::UnsupportedRectangle`] for [`ReferenceRectangle::Container`].
pub fn rectangle_offset(geometry: &Geometry, rectangle: ReferenceRectangle) -> Result<Point, AreaError> {
    let border = geometry.border.physical(geometry.writing_mode);
    let padding = geometry.padding.physical(geometry.writing_mode);
    match rectangle {
        ReferenceRectangle::Allocation | ReferenceRectangle::Border => Ok(Point::ZERO),
        ReferenceRectangle::Padding => Ok(Point::new(border.left, border.top)),
        ReferenceRectangle::Content => Ok(Point::new(border.left + padding.left, border.top + padding.top)),
        ReferenceRectangle::Container => Err(AreaError::UnsupportedRectangle(rectangle)),
    }
}

/// Count one more reversal of the child order.
pub const fn reverse(geometry: &mut Geometry) {
    geometry.reversals += 1;
}

/// True after an odd number of reversals.
#[must_use]
pub const fn needs_reversing(geometry: &Geometry) -> bool {
    geometry.reversals % 2 == 1
}
