//! Writing-mode relative geometry primitives.
//!
//! [§ 10.2.60 tts:writingMode](https://www.w3.org/TR/ttml2/#style-attribute-writingMode)
//!
//! Layout works in two writing-mode neutral dimensions:
//!
//! ```text
//!   IPD (inline progression dimension)  - the direction glyphs advance
//!   BPD (block progression dimension)   - the direction lines stack
//!
//!   lrtb:  IPD ──▶           tbrl:  BPD ◀──
//!          BPD │                    IPD │
//!              ▼                        ▼
//! ```
//!
//! A [`WritingMode`] projects those dimensions onto physical axes and
//! directions.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A physical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Left/right.
    Horizontal,
    /// Top/bottom.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// This axis, or its perpendicular when `cross` is set.
    #[must_use]
    pub const fn cross(self, cross: bool) -> Self {
        if cross { self.opposite() } else { self }
    }

    /// True for [`Axis::Vertical`].
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Vertical)
    }
}

/// A writing-mode relative dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Dimension {
    /// Inline progression dimension.
    #[strum(serialize = "ipd")]
    Ipd,
    /// Block progression dimension.
    #[strum(serialize = "bpd")]
    Bpd,
}

/// A physical progression direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Direction {
    /// Left to right.
    #[strum(serialize = "lr")]
    Lr,
    /// Right to left.
    #[strum(serialize = "rl")]
    Rl,
    /// Top to bottom.
    #[strum(serialize = "tb")]
    Tb,
    /// Bottom to top.
    #[strum(serialize = "bt")]
    Bt,
}

/// [§ 10.2.60 tts:writingMode](https://www.w3.org/TR/ttml2/#style-attribute-writingMode)
///
/// "The `tts:writingMode` attribute is used to specify the block and inline
/// progression directions."
///
/// | Writing Mode | IPD direction | BPD direction |
/// |--------------|---------------|---------------|
/// | lrtb         | lr            | tb            |
/// | rltb         | rl            | tb            |
/// | tbrl         | tb            | rl            |
/// | tblr         | tb            | lr            |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum WritingMode {
    /// Left to right inline, top to bottom lines.
    #[default]
    #[strum(serialize = "lrtb", serialize = "lr")]
    Lrtb,
    /// Right to left inline, top to bottom lines.
    #[strum(serialize = "rltb", serialize = "rl")]
    Rltb,
    /// Top to bottom inline, right to left lines.
    #[strum(serialize = "tbrl", serialize = "tb")]
    Tbrl,
    /// Top to bottom inline, left to right lines.
    #[strum(serialize = "tblr")]
    Tblr,
}

impl WritingMode {
    /// True for the two horizontal modes.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Lrtb | Self::Rltb)
    }

    /// True for the two vertical modes.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// The physical axis carrying `dimension`.
    #[must_use]
    pub const fn axis(self, dimension: Dimension) -> Axis {
        match (self.is_horizontal(), dimension) {
            (true, Dimension::Ipd) | (false, Dimension::Bpd) => Axis::Horizontal,
            (true, Dimension::Bpd) | (false, Dimension::Ipd) => Axis::Vertical,
        }
    }

    /// The physical direction in which `dimension` progresses.
    #[must_use]
    pub const fn direction(self, dimension: Dimension) -> Direction {
        match dimension {
            Dimension::Ipd => match self {
                Self::Lrtb => Direction::Lr,
                Self::Rltb => Direction::Rl,
                Self::Tbrl | Self::Tblr => Direction::Tb,
            },
            Dimension::Bpd => match self {
                Self::Tblr => Direction::Lr,
                Self::Tbrl => Direction::Rl,
                Self::Lrtb | Self::Rltb => Direction::Tb,
            },
        }
    }

    /// The paragraph embedding level implied by the inline direction.
    #[must_use]
    pub const fn default_bidi_level(self) -> u8 {
        match self.direction(Dimension::Ipd) {
            Direction::Rl => 1,
            _ => 0,
        }
    }
}

/// A physical (width, height) extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    /// Horizontal size.
    pub width: f64,
    /// Vertical size.
    pub height: f64,
}

impl Extent {
    /// The zero extent.
    pub const EMPTY: Self = Self { width: 0.0, height: 0.0 };

    /// The 1x1 extent.
    pub const UNIT: Self = Self { width: 1.0, height: 1.0 };

    /// Create an extent.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The size along `axis`.
    #[must_use]
    pub const fn dimension(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Both sizes multiplied by `scale`.
    #[must_use]
    pub fn scaled(&self, scale: f64) -> Self {
        Self::new(self.width * scale, self.height * scale)
    }

    /// True when width and height differ.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_anamorphic(&self) -> bool {
        self.width != self.height
    }
}

/// A physical (x, y) point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}
