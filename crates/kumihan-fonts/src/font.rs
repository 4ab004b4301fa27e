//! Resolved font handles.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kumihan_common::characters::{REPLACEMENT, is_bidi_control, is_line_separator};
use kumihan_common::{Axis, Extent};

use crate::key::{FontKey, FontStyle, FontWeight};
use crate::mapping::{Combination, GlyphMapping, Orientation};
use crate::metrics::{FontMetrics, MetricsStore};

/// A font handle: a [`FontKey`] bound to an optional metrics source.
///
/// Metrics are loaded on first query through the shared [`MetricsStore`].
/// A font without a source, or whose source failed to load, answers zero
/// for every metric.
#[derive(Clone)]
pub struct Font {
    key: FontKey,
    source: Option<PathBuf>,
    store: Arc<MetricsStore>,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("key", &self.key.to_string())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Font {}

/// Characters that never advance the pen.
fn is_zero_advance(c: char) -> bool {
    is_bidi_control(c) || is_line_separator(c) || matches!(c, '\u{200B}'..='\u{200F}')
}

impl Font {
    /// Create a font bound to `source`.
    #[must_use]
    pub const fn new(key: FontKey, source: Option<PathBuf>, store: Arc<MetricsStore>) -> Self {
        Self { key, source, store }
    }

    /// The identifying key.
    #[must_use]
    pub const fn key(&self) -> &FontKey {
        &self.key
    }

    /// The metrics source, if the key resolved to one.
    #[must_use]
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn metrics(&self) -> Option<Arc<dyn FontMetrics>> {
        self.source.as_deref().and_then(|s| self.store.metrics(s))
    }

    /// True once metrics have loaded (attempting the load if needed).
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.metrics().is_some()
    }

    /// Requested style.
    #[must_use]
    pub const fn style(&self) -> FontStyle {
        self.key.style
    }

    /// Requested weight.
    #[must_use]
    pub const fn weight(&self) -> FontWeight {
        self.key.weight
    }

    /// Inline progression axis.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.key.axis
    }

    /// True on the vertical axis.
    #[must_use]
    pub const fn is_vertical(&self) -> bool {
        self.key.axis.is_vertical()
    }

    /// Requested em size.
    #[must_use]
    pub const fn size(&self) -> Extent {
        self.key.size
    }

    /// Em size along `axis`.
    #[must_use]
    pub const fn size_on(&self, axis: Axis) -> f64 {
        self.key.size.dimension(axis)
    }

    /// Width and height differ.
    #[must_use]
    pub fn is_anamorphic(&self) -> bool {
        self.key.size.is_anamorphic()
    }

    /// See [`FontKey::is_kerning_enabled`].
    #[must_use]
    pub fn is_kerning_enabled(&self) -> bool {
        self.key.is_kerning_enabled()
    }

    /// See [`FontKey::shear`].
    #[must_use]
    pub fn shear(&self) -> f64 {
        self.key.shear()
    }

    /// True when a non-zero shear is requested.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_sheared(&self) -> bool {
        self.shear() != 0.0
    }

    /// Extra advance consumed by shearing along `axis`: the em size across
    /// the axis times the shear slope.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn shear_advance(&self, rotated: bool) -> f64 {
        let shear = self.shear();
        if shear == 0.0 {
            return 0.0;
        }
        let slope = (shear * std::f64::consts::FRAC_PI_2).tan().abs();
        self.size_on(self.key.axis.cross(!rotated)) * slope
    }

    /// [§ 10.2.27 tts:lineHeight](https://www.w3.org/TR/ttml2/#style-attribute-lineHeight)
    ///
    /// "normal" resolves to 1.25 times the em size along the font's axis.
    #[must_use]
    pub fn default_line_height(&self) -> f64 {
        self.size_on(self.key.axis) * 1.25
    }

    fn scale(&self, metrics: &dyn FontMetrics, v: f64, axis: Axis) -> f64 {
        v / metrics.units_per_em() * self.size_on(axis)
    }

    /// Line gap, or the Windows metrics excess over the em when the gap is
    /// zero.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn leading(&self) -> f64 {
        let Some(m) = self.metrics() else {
            return 0.0;
        };
        let mut units = m.line_gap();
        if units == 0.0 {
            let excess = m.win_ascent() + m.win_descent() - m.units_per_em();
            if excess > 0.0 {
                units = excess;
            }
        }
        self.scale(m.as_ref(), units, self.key.axis)
    }

    /// Scaled typographic ascender.
    #[must_use]
    pub fn ascent(&self) -> f64 {
        self.metrics()
            .map_or(0.0, |m| self.scale(m.as_ref(), m.ascent(), self.key.axis))
    }

    /// Scaled typographic descender, as a positive depth.
    #[must_use]
    pub fn descent(&self) -> f64 {
        self.metrics()
            .map_or(0.0, |m| self.scale(m.as_ref(), m.descent(), self.key.axis))
    }

    /// Ascent plus descent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ascent() + self.descent()
    }

    /// Family name reported by the font, else the requested family.
    #[must_use]
    pub fn preferred_family_name(&self) -> String {
        self.metrics()
            .and_then(|m| m.family_name())
            .unwrap_or_else(|| self.key.family.clone())
    }

    fn advance_axis(&self, rotated: bool) -> Axis {
        self.key.axis.cross(rotated)
    }

    /// Scaled advance of each character of `text`.
    ///
    /// On the vertical axis a `rotated` run advances by horizontal metrics
    /// measured against the width.
    #[must_use]
    pub fn advances(&self, text: &str, rotated: bool) -> Vec<f64> {
        let Some(m) = self.metrics() else {
            return vec![0.0; text.chars().count()];
        };
        let axis = self.advance_axis(rotated);
        let raw = m.advances(text, axis.is_vertical(), self.is_kerning_enabled());
        text.chars()
            .zip(raw)
            .map(|(c, v)| {
                if is_zero_advance(c) {
                    0.0
                } else {
                    self.scale(m.as_ref(), v, axis)
                }
            })
            .collect()
    }

    /// Total scaled advance of `text`.
    #[must_use]
    pub fn advance(&self, text: &str) -> f64 {
        self.advances(text, false).iter().sum()
    }

    /// Total scaled advance of `text` set sideways.
    #[must_use]
    pub fn rotated_advance(&self, text: &str) -> f64 {
        self.advances(text, true).iter().sum()
    }

    /// Advance of UTF-16 `units`: surrogate pairs fold into one code point,
    /// an unpaired surrogate measures as U+FFFD.
    #[must_use]
    pub fn advance_utf16(&self, units: &[u16]) -> f64 {
        let text: String = char::decode_utf16(units.iter().copied())
            .map(|r| r.unwrap_or(REPLACEMENT))
            .collect();
        self.advance(&text)
    }

    /// Map `text` to glyphs with the given run properties.
    #[must_use]
    pub fn glyph_mapping(
        &self,
        text: &str,
        script: &str,
        language: &str,
        orientation: Orientation,
        combination: Combination,
    ) -> GlyphMapping {
        let glyphs = match self.metrics() {
            Some(m) => text.chars().map(|c| m.glyph(c)).collect(),
            None => vec![0; text.chars().count()],
        };
        GlyphMapping {
            text: text.to_string(),
            glyphs,
            advances: self.advances(text, orientation.is_rotated()),
            reversed: false,
            script: script.to_string(),
            language: language.to_string(),
            orientation,
            combination,
        }
    }

    /// Reverse `mapping` when `reverse` is set, mirroring when `mirror` is
    /// also set.
    pub fn maybe_reverse(mapping: &mut GlyphMapping, reverse: bool, mirror: bool) {
        if reverse {
            mapping.reverse(mirror);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FontError;
    use crate::metrics::MetricsProvider;

    #[derive(Debug)]
    struct Square;

    impl FontMetrics for Square {
        fn units_per_em(&self) -> f64 {
            1000.0
        }
        fn ascent(&self) -> f64 {
            880.0
        }
        fn descent(&self) -> f64 {
            120.0
        }
        fn line_gap(&self) -> f64 {
            0.0
        }
        fn win_ascent(&self) -> f64 {
            1100.0
        }
        fn win_descent(&self) -> f64 {
            300.0
        }
        fn glyph(&self, c: char) -> u16 {
            u16::from(c.is_ascii_alphabetic())
        }
        fn advance(&self, _c: char, vertical: bool) -> f64 {
            if vertical { 1000.0 } else { 500.0 }
        }
    }

    struct SquareProvider;

    impl MetricsProvider for SquareProvider {
        fn load(&self, _source: &Path) -> Result<Arc<dyn FontMetrics>, FontError> {
            Ok(Arc::new(Square))
        }
    }

    fn font(axis: Axis) -> Font {
        let store = Arc::new(MetricsStore::new(Arc::new(SquareProvider)));
        Font::new(
            FontKey::default_for(axis, Extent::new(20.0, 40.0)),
            Some(PathBuf::from("square.ttf")),
            store,
        )
    }

    #[test]
    fn test_scaling_uses_axis_size() {
        let h = font(Axis::Horizontal);
        assert_eq!(h.ascent(), 880.0 / 1000.0 * 20.0);
        assert_eq!(h.advance("ab"), 20.0);
        assert_eq!(h.default_line_height(), 25.0);
        // 1100 + 300 - 1000
        assert_eq!(h.leading(), 400.0 / 1000.0 * 20.0);

        let v = font(Axis::Vertical);
        assert_eq!(v.advance("ab"), 80.0);
        assert_eq!(v.rotated_advance("ab"), 20.0);
    }

    #[test]
    fn test_controls_do_not_advance() {
        let h = font(Axis::Horizontal);
        assert_eq!(h.advances("a\u{202B}\u{2028}b", false), vec![10.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn test_utf16_folds_pairs() {
        let h = font(Axis::Horizontal);
        let units: Vec<u16> = "a\u{20BB7}".encode_utf16().collect();
        assert_eq!(units.len(), 3);
        assert_eq!(h.advance_utf16(&units), 20.0);
        assert_eq!(h.advance_utf16(&[0xD800, 0x61]), 20.0);
    }

    #[test]
    fn test_unbound_font_is_zero() {
        let store = Arc::new(MetricsStore::new(Arc::new(SquareProvider)));
        let f = Font::new(FontKey::default_horizontal(), None, store);
        assert_eq!(f.advance("abc"), 0.0);
        assert_eq!(f.ascent(), 0.0);
        assert_eq!(f.preferred_family_name(), "noto sans");
        assert!(!f.is_loaded());
    }

    #[test]
    fn test_glyph_mapping_reverse() {
        let h = font(Axis::Horizontal);
        let mut m = h.glyph_mapping("a(", "latn", "en", Orientation::Rotate000, Combination::NONE);
        assert_eq!(m.glyphs, vec![1, 0]);
        Font::maybe_reverse(&mut m, true, true);
        assert_eq!(m.text, ")a");
        Font::maybe_reverse(&mut m, false, true);
        assert_eq!(m.text, ")a");
    }
}
