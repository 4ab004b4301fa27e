//! Font request keys and their components.
//!
//! [§ 10.2.21 tts:fontFamily](https://www.w3.org/TR/ttml2/#style-attribute-fontFamily),
//! [§ 10.2.25 tts:fontStyle](https://www.w3.org/TR/ttml2/#style-attribute-fontStyle),
//! [§ 10.2.26 tts:fontWeight](https://www.w3.org/TR/ttml2/#style-attribute-fontWeight)

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use kumihan_common::{Axis, Extent};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// [§ 10.2.25 tts:fontStyle](https://www.w3.org/TR/ttml2/#style-attribute-fontStyle)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic design.
    Italic,
    /// Slanted roman.
    Oblique,
}

/// [§ 10.2.26 tts:fontWeight](https://www.w3.org/TR/ttml2/#style-attribute-fontWeight)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

/// [§ 10.2.22 tts:fontKerning](https://www.w3.org/TR/ttml2/#style-attribute-fontKerning)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontKerning {
    /// Kerning applied.
    #[default]
    Normal,
    /// Kerning disabled.
    None,
}

/// The argument carried by a [`FontFeature`].
#[derive(Debug, Clone, Copy, Serialize)]
pub enum FeatureValue {
    /// The feature is simply on.
    Enabled,
    /// `kern` setting.
    Kerning(FontKerning),
    /// `oblq` shear as a fraction of a right angle.
    Shear(f64),
}

impl FeatureValue {
    const fn rank(&self) -> u8 {
        match self {
            Self::Enabled => 0,
            Self::Kerning(_) => 1,
            Self::Shear(_) => 2,
        }
    }
}

impl PartialEq for FeatureValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FeatureValue {}

impl PartialOrd for FeatureValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FeatureValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Kerning(a), Self::Kerning(b)) => a.cmp(b),
            (Self::Shear(a), Self::Shear(b)) => a.total_cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for FeatureValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Enabled => {}
            Self::Kerning(k) => k.hash(state),
            Self::Shear(s) => s.to_bits().hash(state),
        }
    }
}

/// An OpenType-style feature request, ordered by tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FontFeature {
    /// Four letter feature tag (`kern`, `oblq`, `vrot`, ...).
    pub tag: String,
    /// Feature argument.
    pub value: FeatureValue,
}

impl FontFeature {
    /// Vertical rotation, implied by every vertical font key.
    pub const VROT: &'static str = "vrot";
    /// Kerning control.
    pub const KERN: &'static str = "kern";
    /// Synthetic oblique shear.
    pub const OBLQ: &'static str = "oblq";

    /// A feature with no argument.
    #[must_use]
    pub fn enabled(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            value: FeatureValue::Enabled,
        }
    }

    /// The `kern` feature.
    #[must_use]
    pub fn kerning(kerning: FontKerning) -> Self {
        Self {
            tag: Self::KERN.to_string(),
            value: FeatureValue::Kerning(kerning),
        }
    }

    /// The `oblq` feature, `shear` being a fraction of 90 degrees.
    #[must_use]
    pub fn shear(shear: f64) -> Self {
        Self {
            tag: Self::OBLQ.to_string(),
            value: FeatureValue::Shear(shear),
        }
    }
}

impl fmt::Display for FontFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            FeatureValue::Enabled => write!(f, "{}", self.tag),
            FeatureValue::Kerning(k) => write!(f, "{}({k})", self.tag),
            FeatureValue::Shear(s) => write!(f, "{}({s})", self.tag),
        }
    }
}

/// The cache key of a resolved font.
///
/// Family and language are case folded on construction so that requests
/// differing only by case share one cache entry.
#[derive(Debug, Clone, Serialize)]
pub struct FontKey {
    /// Lower-cased family name.
    pub family: String,
    /// Requested style.
    pub style: FontStyle,
    /// Requested weight.
    pub weight: FontWeight,
    /// Lower-cased language tag, empty when unspecified.
    pub language: String,
    /// Inline progression axis the font is set on.
    pub axis: Axis,
    /// Requested em size along each axis.
    pub size: Extent,
    /// Requested features in tag order.
    pub features: BTreeSet<FontFeature>,
}

impl FontKey {
    /// Family used when nothing else is requested or matches.
    pub const DEFAULT_FAMILY: &'static str = "Noto Sans";

    /// Default em size.
    pub const DEFAULT_SIZE: Extent = Extent::new(24.0, 24.0);

    /// Create a key, folding case and adding `vrot` on the vertical axis.
    #[must_use]
    pub fn new(
        family: &str,
        style: FontStyle,
        weight: FontWeight,
        language: &str,
        axis: Axis,
        size: Extent,
        features: impl IntoIterator<Item = FontFeature>,
    ) -> Self {
        let mut features: BTreeSet<FontFeature> = features.into_iter().collect();
        if axis.is_vertical() {
            let _ = features.insert(FontFeature::enabled(FontFeature::VROT));
        }
        Self {
            family: family.to_lowercase(),
            style,
            weight,
            language: language.to_lowercase(),
            axis,
            size,
            features,
        }
    }

    /// The default key for `axis` at `size`.
    #[must_use]
    pub fn default_for(axis: Axis, size: Extent) -> Self {
        Self::new(
            Self::DEFAULT_FAMILY,
            FontStyle::Normal,
            FontWeight::Normal,
            "",
            axis,
            size,
            [],
        )
    }

    /// Default horizontal key.
    #[must_use]
    pub fn default_horizontal() -> Self {
        Self::default_for(Axis::Horizontal, Self::DEFAULT_SIZE)
    }

    /// Default vertical key.
    #[must_use]
    pub fn default_vertical() -> Self {
        Self::default_for(Axis::Vertical, Self::DEFAULT_SIZE)
    }

    /// This key with its size multiplied by `scale`.
    #[must_use]
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            size: self.size.scaled(scale),
            ..self.clone()
        }
    }

    /// The feature with `tag`, if requested.
    #[must_use]
    pub fn feature(&self, tag: &str) -> Option<&FontFeature> {
        self.features.iter().find(|f| f.tag == tag)
    }

    /// Kerning is on unless a `kern` feature turns it off.
    #[must_use]
    pub fn is_kerning_enabled(&self) -> bool {
        !matches!(
            self.feature(FontFeature::KERN).map(|f| f.value),
            Some(FeatureValue::Kerning(FontKerning::None))
        )
    }

    /// Shear from the `oblq` feature, 0 when absent.
    #[must_use]
    pub fn shear(&self) -> f64 {
        match self.feature(FontFeature::OBLQ).map(|f| f.value) {
            Some(FeatureValue::Shear(s)) => s,
            _ => 0.0,
        }
    }
}

impl PartialEq for FontKey {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.style == other.style
            && self.weight == other.weight
            && self.language == other.language
            && self.axis == other.axis
            && self.size.width.to_bits() == other.size.width.to_bits()
            && self.size.height.to_bits() == other.size.height.to_bits()
            && self.features == other.features
    }
}

impl Eq for FontKey {}

impl Hash for FontKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.style.hash(state);
        self.weight.hash(state);
        self.language.hash(state);
        self.axis.hash(state);
        self.size.width.to_bits().hash(state);
        self.size.height.to_bits().hash(state);
        self.features.hash(state);
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{},{},{},{},{}x{}",
            self.family,
            self.style,
            self.weight,
            if self.language.is_empty() { "*" } else { &self.language },
            self.axis,
            self.size.width,
            self.size.height
        )?;
        for feature in &self.features {
            write!(f, ",{feature}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertical_key_has_vrot() {
        let key = FontKey::default_vertical();
        assert!(key.feature(FontFeature::VROT).is_some());
        assert!(FontKey::default_horizontal().feature(FontFeature::VROT).is_none());
    }

    #[test]
    fn test_kerning_and_shear() {
        let key = FontKey::new(
            "A",
            FontStyle::Normal,
            FontWeight::Bold,
            "",
            Axis::Horizontal,
            FontKey::DEFAULT_SIZE,
            [FontFeature::kerning(FontKerning::None), FontFeature::shear(0.25)],
        );
        assert!(!key.is_kerning_enabled());
        assert_eq!(key.shear(), 0.25);
        assert!(FontKey::default_horizontal().is_kerning_enabled());
    }

    #[test]
    fn test_scaled_changes_only_size() {
        let key = FontKey::default_horizontal();
        let scaled = key.scaled(2.0);
        assert_eq!(scaled.size, Extent::new(48.0, 48.0));
        assert_eq!(scaled.family, key.family);
        assert_ne!(scaled, key);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FontKey::default_horizontal().to_string(),
            "[noto sans,normal,normal,*,horizontal,24x24]"
        );
    }
}
