//! Glyph mappings: the result of mapping a text run through a font.

use kumihan_common::characters::mirror;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// [§ 10.2.46 tts:textOrientation](https://www.w3.org/TR/ttml2/#style-attribute-textOrientation)
///
/// Glyph rotation relative to the inline progression direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Upright.
    #[default]
    #[strum(serialize = "rotate000")]
    Rotate000,
    /// Quarter turn clockwise (sideways in vertical text).
    #[strum(serialize = "rotate090")]
    Rotate090,
    /// Half turn.
    #[strum(serialize = "rotate180")]
    Rotate180,
    /// Quarter turn counter-clockwise.
    #[strum(serialize = "rotate270")]
    Rotate270,
}

impl Orientation {
    /// True when the glyph axis crosses the line axis.
    #[must_use]
    pub const fn is_rotated(self) -> bool {
        matches!(self, Self::Rotate090 | Self::Rotate270)
    }
}

/// [§ 10.2.43 tts:textCombine](https://www.w3.org/TR/ttml2/#style-attribute-textCombine)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CombinationStyle {
    /// No combination.
    #[default]
    None,
    /// Combine the whole run.
    All,
    /// Combine runs of up to `count` digits.
    Digits,
}

/// Horizontal-in-vertical combination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Combination {
    /// Combination style.
    pub style: CombinationStyle,
    /// Maximum run length for [`CombinationStyle::Digits`].
    pub count: usize,
}

impl Combination {
    /// No combination.
    pub const NONE: Self = Self {
        style: CombinationStyle::None,
        count: 0,
    };

    /// Combine everything.
    pub const ALL: Self = Self {
        style: CombinationStyle::All,
        count: 0,
    };

    /// True unless the style is [`CombinationStyle::None`].
    #[must_use]
    pub const fn is_combining(&self) -> bool {
        !matches!(self.style, CombinationStyle::None)
    }
}

/// A text run mapped to glyphs.
///
/// `glyphs` and `advances` are parallel to the characters of `text`. An
/// advance is already scaled to the font size along the advance axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GlyphMapping {
    /// Source characters, in display order once reversed.
    pub text: String,
    /// Glyph identifiers, 0 for unmapped characters.
    pub glyphs: Vec<u16>,
    /// Scaled advance per glyph.
    pub advances: Vec<f64>,
    /// Set after an odd number of reversals.
    pub reversed: bool,
    /// Script tag the run was mapped for.
    pub script: String,
    /// Language tag the run was mapped for.
    pub language: String,
    /// Orientation applied to each glyph.
    pub orientation: Orientation,
    /// Combination applied to the run.
    pub combination: Combination,
}

impl GlyphMapping {
    /// Sum of all advances.
    #[must_use]
    pub fn advance(&self) -> f64 {
        self.advances.iter().sum()
    }

    /// Number of glyphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// True when there are no glyphs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Reverse glyph order, optionally applying bidi mirroring to each
    /// character.
    pub fn reverse(&mut self, mirrored: bool) {
        let text: String = self
            .text
            .chars()
            .rev()
            .map(|c| if mirrored { mirror(c).unwrap_or(c) } else { c })
            .collect();
        self.text = text;
        self.glyphs.reverse();
        self.advances.reverse();
        self.reversed = !self.reversed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(text: &str) -> GlyphMapping {
        GlyphMapping {
            text: text.to_string(),
            glyphs: (1..=text.chars().count() as u16).collect(),
            advances: text.chars().map(|c| if c == ' ' { 5.0 } else { 10.0 }).collect(),
            ..GlyphMapping::default()
        }
    }

    #[test]
    fn test_reverse_reorders_everything() {
        let mut m = mapping("a b");
        m.reverse(false);
        assert_eq!(m.text, "b a");
        assert_eq!(m.glyphs, vec![3, 2, 1]);
        assert_eq!(m.advances, vec![10.0, 5.0, 10.0]);
        assert!(m.reversed);
        assert_eq!(m.advance(), 25.0);
    }

    #[test]
    fn test_reverse_mirrors_brackets() {
        let mut m = mapping("(x]");
        m.reverse(true);
        assert_eq!(m.text, "[x)");
    }

    #[test]
    fn test_orientation_rotation() {
        assert!(Orientation::Rotate090.is_rotated());
        assert!(!Orientation::Rotate180.is_rotated());
        assert_eq!("ROTATE270".parse::<Orientation>().unwrap(), Orientation::Rotate270);
    }
}
