//! Metrics providers and the per-source load state.
//!
//! A [`MetricsProvider`] turns a font source into [`FontMetrics`]. Values
//! are reported in font design units; [`crate::Font`] scales them by
//! `v / units_per_em * size`.
//!
//! The [`MetricsStore`] remembers the outcome of each source load:
//!
//! ```text
//!   Unresolved ──load ok──▶ Loaded(metrics)
//!        │
//!        └──load err──▶ Failed   (sticky, warned once)
//! ```

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use kumihan_common::warning::warn_once;
use ttf_parser::GlyphId;

use crate::FontError;

/// Design-unit metrics of one loaded font source.
pub trait FontMetrics: Send + Sync + fmt::Debug {
    /// Units per em, never zero.
    fn units_per_em(&self) -> f64;

    /// Typographic ascender.
    fn ascent(&self) -> f64;

    /// Typographic descender as a positive depth below the baseline.
    fn descent(&self) -> f64;

    /// Typographic line gap.
    fn line_gap(&self) -> f64;

    /// Windows ascent, used when the line gap is zero.
    fn win_ascent(&self) -> f64 {
        0.0
    }

    /// Windows descent as a positive depth.
    fn win_descent(&self) -> f64 {
        0.0
    }

    /// Glyph identifier for `c`, 0 when unmapped.
    fn glyph(&self, c: char) -> u16;

    /// Advance of `c` along the horizontal or vertical axis.
    fn advance(&self, c: char, vertical: bool) -> f64;

    /// Pair kerning adjustment between `left` and `right`.
    fn kerning(&self, _left: char, _right: char) -> f64 {
        0.0
    }

    /// Advances for every character of `text`, kerning adjustments folded
    /// into the left glyph of each pair.
    fn advances(&self, text: &str, vertical: bool, kerning: bool) -> Vec<f64> {
        let chars: Vec<char> = text.chars().collect();
        chars
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let k = match chars.get(i + 1) {
                    Some(&next) if kerning && !vertical => self.kerning(c, next),
                    _ => 0.0,
                };
                self.advance(c, vertical) + k
            })
            .collect()
    }

    /// Typographic family name, then family name, from the font itself.
    fn family_name(&self) -> Option<String> {
        None
    }
}

/// Loads metrics for a font source.
pub trait MetricsProvider: Send + Sync {
    /// Load the metrics found at `source`.
    ///
    /// # Errors
    ///
    /// Returns a [`FontError`] when the source cannot be read or parsed.
    fn load(&self, source: &Path) -> Result<Arc<dyn FontMetrics>, FontError>;
}

/// Per-source load outcome.
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Not attempted yet.
    Unresolved,
    /// Loaded successfully.
    Loaded(Arc<dyn FontMetrics>),
    /// Failed; never retried until the store is cleared.
    Failed,
}

/// Shared load state for every source the registry has handed out.
pub struct MetricsStore {
    provider: Arc<dyn MetricsProvider>,
    states: Mutex<HashMap<PathBuf, LoadState>>,
}

impl fmt::Debug for MetricsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("MetricsStore")
            .field("sources", &states.len())
            .finish_non_exhaustive()
    }
}

impl MetricsStore {
    /// Create an empty store around `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn MetricsProvider>) -> Self {
        Self {
            provider,
            states: Mutex::new(HashMap::new()),
        }
    }

    /// Metrics for `source`, loading on first request.
    ///
    /// The lock is held across the load so concurrent callers wait for the
    /// single attempt instead of starting their own.
    #[must_use]
    pub fn metrics(&self, source: &Path) -> Option<Arc<dyn FontMetrics>> {
        let mut states = self.states.lock().unwrap_or_else(PoisonError::into_inner);
        let state = states
            .entry(source.to_path_buf())
            .or_insert(LoadState::Unresolved);
        if matches!(state, LoadState::Unresolved) {
            *state = match self.provider.load(source) {
                Ok(metrics) => LoadState::Loaded(metrics),
                Err(err) => {
                    warn_once("Fonts", &err.to_string());
                    LoadState::Failed
                }
            };
        }
        match state {
            LoadState::Loaded(metrics) => Some(Arc::clone(metrics)),
            LoadState::Unresolved | LoadState::Failed => None,
        }
    }

    /// The recorded state for `source`.
    #[must_use]
    pub fn state(&self, source: &Path) -> LoadState {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(source)
            .cloned()
            .unwrap_or(LoadState::Unresolved)
    }

    /// Forget every load outcome.
    pub fn clear(&self) {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

/// Reads TrueType and OpenType files with `ttf-parser`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueTypeProvider;

impl MetricsProvider for TrueTypeProvider {
    fn load(&self, source: &Path) -> Result<Arc<dyn FontMetrics>, FontError> {
        let data = fs::read(source).map_err(|err| FontError::Io {
            path: source.to_path_buf(),
            source: err,
        })?;
        Ok(Arc::new(TrueTypeMetrics::from_data(source, data)?))
    }
}

/// Metrics of a parsed font file.
///
/// Table level values are extracted once; per-glyph queries re-parse the
/// face over the retained file data, which only reads headers.
pub struct TrueTypeMetrics {
    data: Vec<u8>,
    units_per_em: f64,
    ascent: f64,
    descent: f64,
    line_gap: f64,
    win_ascent: f64,
    win_descent: f64,
    family: Option<String>,
}

impl fmt::Debug for TrueTypeMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrueTypeMetrics")
            .field("units_per_em", &self.units_per_em)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl TrueTypeMetrics {
    /// Parse `data`, read from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Face`] when the tables cannot be parsed.
    pub fn from_data(path: &Path, data: Vec<u8>) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|err| FontError::Face {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let units_per_em = f64::from(face.units_per_em().max(1));
        let (ascent, descent, line_gap, win_ascent, win_descent) = match face.tables().os2 {
            Some(os2) => (
                f64::from(os2.typographic_ascender()),
                f64::from(os2.typographic_descender()).abs(),
                f64::from(os2.typographic_line_gap()),
                f64::from(os2.windows_ascender()),
                f64::from(os2.windows_descender()).abs(),
            ),
            None => (
                f64::from(face.ascender()),
                f64::from(face.descender()).abs(),
                f64::from(face.line_gap()),
                0.0,
                0.0,
            ),
        };
        let family = preferred_family(&face);

        Ok(Self {
            units_per_em,
            ascent,
            descent,
            line_gap,
            win_ascent,
            win_descent,
            family,
            data,
        })
    }

    fn face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, 0).ok()
    }
}

fn preferred_family(face: &ttf_parser::Face<'_>) -> Option<String> {
    use ttf_parser::name::name_id;

    let mut typographic = None;
    let mut family = None;
    for entry in face.names() {
        let Some(name) = entry.to_string() else {
            continue;
        };
        match entry.name_id {
            name_id::TYPOGRAPHIC_FAMILY if typographic.is_none() => typographic = Some(name),
            name_id::FAMILY if family.is_none() => family = Some(name),
            _ => {}
        }
    }
    typographic.or(family)
}

fn glyph_advance(face: &ttf_parser::Face<'_>, glyph: GlyphId, vertical: bool, upem: f64) -> f64 {
    if vertical {
        face.glyph_ver_advance(glyph).map_or(upem, f64::from)
    } else {
        face.glyph_hor_advance(glyph).map_or(0.0, f64::from)
    }
}

fn glyph_kerning(face: &ttf_parser::Face<'_>, left: GlyphId, right: GlyphId) -> f64 {
    let Some(kern) = face.tables().kern else {
        return 0.0;
    };
    kern.subtables
        .into_iter()
        .filter(|s| s.horizontal && !s.variable)
        .find_map(|s| s.glyphs_kerning(left, right))
        .map_or(0.0, f64::from)
}

impl FontMetrics for TrueTypeMetrics {
    fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    fn ascent(&self) -> f64 {
        self.ascent
    }

    fn descent(&self) -> f64 {
        self.descent
    }

    fn line_gap(&self) -> f64 {
        self.line_gap
    }

    fn win_ascent(&self) -> f64 {
        self.win_ascent
    }

    fn win_descent(&self) -> f64 {
        self.win_descent
    }

    fn glyph(&self, c: char) -> u16 {
        self.face()
            .and_then(|face| face.glyph_index(c))
            .map_or(0, |g| g.0)
    }

    fn advance(&self, c: char, vertical: bool) -> f64 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        face.glyph_index(c)
            .map_or(0.0, |g| glyph_advance(&face, g, vertical, self.units_per_em))
    }

    fn kerning(&self, left: char, right: char) -> f64 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        match (face.glyph_index(left), face.glyph_index(right)) {
            (Some(l), Some(r)) => glyph_kerning(&face, l, r),
            _ => 0.0,
        }
    }

    fn advances(&self, text: &str, vertical: bool, kerning: bool) -> Vec<f64> {
        let Some(face) = self.face() else {
            return vec![0.0; text.chars().count()];
        };
        let glyphs: Vec<Option<GlyphId>> = text.chars().map(|c| face.glyph_index(c)).collect();
        glyphs
            .iter()
            .enumerate()
            .map(|(i, glyph)| {
                let Some(g) = *glyph else {
                    return 0.0;
                };
                let k = match glyphs.get(i + 1) {
                    Some(Some(next)) if kerning && !vertical => glyph_kerning(&face, g, *next),
                    _ => 0.0,
                };
                glyph_advance(&face, g, vertical, self.units_per_em) + k
            })
            .collect()
    }

    fn family_name(&self) -> Option<String> {
        self.family.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Fixed;

    impl FontMetrics for Fixed {
        fn units_per_em(&self) -> f64 {
            1000.0
        }
        fn ascent(&self) -> f64 {
            800.0
        }
        fn descent(&self) -> f64 {
            200.0
        }
        fn line_gap(&self) -> f64 {
            0.0
        }
        fn glyph(&self, c: char) -> u16 {
            c as u16
        }
        fn advance(&self, _c: char, _vertical: bool) -> f64 {
            500.0
        }
        fn kerning(&self, left: char, right: char) -> f64 {
            if (left, right) == ('A', 'V') { -50.0 } else { 0.0 }
        }
    }

    struct Counting(AtomicUsize);

    impl MetricsProvider for Counting {
        fn load(&self, source: &Path) -> Result<Arc<dyn FontMetrics>, FontError> {
            let _ = self.0.fetch_add(1, Ordering::SeqCst);
            if source.ends_with("bad.ttf") {
                Err(FontError::Unavailable(source.to_path_buf()))
            } else {
                Ok(Arc::new(Fixed))
            }
        }
    }

    #[test]
    fn test_default_advances_apply_kerning() {
        assert_eq!(Fixed.advances("AVA", false, true), vec![450.0, 500.0, 500.0]);
        assert_eq!(Fixed.advances("AVA", false, false), vec![500.0, 500.0, 500.0]);
        assert_eq!(Fixed.advances("AV", true, true), vec![500.0, 500.0]);
    }

    #[test]
    fn test_failed_load_is_sticky() {
        let provider = Arc::new(Counting(AtomicUsize::new(0)));
        let store = MetricsStore::new(provider.clone());
        assert!(store.metrics(Path::new("bad.ttf")).is_none());
        assert!(store.metrics(Path::new("bad.ttf")).is_none());
        assert!(matches!(store.state(Path::new("bad.ttf")), LoadState::Failed));
        assert!(store.metrics(Path::new("good.ttf")).is_some());
        assert!(store.metrics(Path::new("good.ttf")).is_some());
        assert_eq!(provider.0.load(Ordering::SeqCst), 2);

        store.clear();
        assert!(matches!(store.state(Path::new("good.ttf")), LoadState::Unresolved));
    }

    #[test]
    fn test_truetype_rejects_garbage() {
        let err = TrueTypeMetrics::from_data(Path::new("x.ttf"), vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, FontError::Face { .. }));
    }
}
