//! The font registry: catalog loading, font matching and the font cache.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kumihan_common::warning::warn_once;
use kumihan_common::{Axis, Extent};
use serde::{Deserialize, Serialize};

use crate::font::Font;
use crate::key::{FontFeature, FontKey, FontStyle, FontWeight};
use crate::metrics::{MetricsProvider, MetricsStore, TrueTypeProvider};
use crate::specification::FontSpecification;

/// Where the registry finds its catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory scanned for `*.xml` catalogs.
    pub font_directory: Option<PathBuf>,
    /// Additional catalog files.
    pub catalog_files: Vec<PathBuf>,
}

struct RegistryState {
    /// `None` until the catalogs have been read.
    specifications: Option<Vec<FontSpecification>>,
    fonts: HashMap<FontKey, Font>,
}

struct RegistryInner {
    config: RegistryConfig,
    /// In-memory specifications placed ahead of any catalog file.
    seed: Vec<FontSpecification>,
    store: Arc<MetricsStore>,
    state: Mutex<RegistryState>,
}

/// Resolves font requests to cached [`Font`] handles.
///
/// Cloning is cheap; clones share catalogs, fonts and metrics load state.
#[derive(Clone)]
pub struct FontRegistry {
    inner: Arc<RegistryInner>,
}

impl fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontRegistry")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl FontRegistry {
    /// A registry reading TrueType/OpenType sources from disk.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self::with_provider(config, Arc::new(TrueTypeProvider))
    }

    /// A registry loading metrics through `provider`.
    #[must_use]
    pub fn with_provider(config: RegistryConfig, provider: Arc<dyn MetricsProvider>) -> Self {
        Self::build(config, provider, Vec::new())
    }

    /// A registry over an in-memory catalog; no files are scanned.
    #[must_use]
    pub fn with_specifications(
        specifications: Vec<FontSpecification>,
        provider: Arc<dyn MetricsProvider>,
    ) -> Self {
        Self::build(RegistryConfig::default(), provider, specifications)
    }

    fn build(
        config: RegistryConfig,
        provider: Arc<dyn MetricsProvider>,
        seed: Vec<FontSpecification>,
    ) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                config,
                seed,
                store: Arc::new(MetricsStore::new(provider)),
                state: Mutex::new(RegistryState {
                    specifications: None,
                    fonts: HashMap::new(),
                }),
            }),
        }
    }

    /// Lock the state, reading catalogs first if that has not happened.
    fn loaded(&self) -> MutexGuard<'_, RegistryState> {
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.specifications.is_none() {
            let specifications = self.load_catalogs();
            if specifications.is_empty() {
                warn_once("Fonts", "no font specifications found; text will not be measured");
            }
            state.specifications = Some(specifications);
        }
        state
    }

    fn catalog_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = &self.inner.config.font_directory {
            match fs::read_dir(dir) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .filter_map(Result::ok)
                        .map(|e| e.path())
                        .filter(|p| p.is_file() && p.extension().is_some_and(|x| x == "xml"))
                        .collect();
                    found.sort();
                    paths.extend(found);
                }
                Err(err) => {
                    warn_once(
                        "Fonts",
                        &format!("unable to scan font directory '{}': {err}", dir.display()),
                    );
                }
            }
        }
        paths.extend(self.inner.config.catalog_files.iter().cloned());
        paths
    }

    fn load_catalogs(&self) -> Vec<FontSpecification> {
        let mut specifications = self.inner.seed.clone();
        for path in self.catalog_paths() {
            match FontSpecification::load_catalog(&path) {
                Ok(found) => specifications.extend(found),
                Err(err) => {
                    warn_once("Fonts", &err.to_string());
                }
            }
        }
        specifications
    }

    /// Every known specification, reading catalogs if needed.
    #[must_use]
    pub fn specifications(&self) -> Vec<FontSpecification> {
        self.loaded().specifications.clone().unwrap_or_default()
    }

    /// The cached font for `key`, created on first request.
    ///
    /// A key no specification matches yields a font without a source, whose
    /// metrics are all zero.
    #[must_use]
    pub fn get(&self, key: &FontKey) -> Font {
        let mut state = self.loaded();
        if let Some(font) = state.fonts.get(key) {
            return font.clone();
        }
        let source = state
            .specifications
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|s| s.matches(key))
            .map(|s| s.source.clone());
        let font = Font::new(key.clone(), source, Arc::clone(&self.inner.store));
        let _ = state.fonts.insert(key.clone(), font.clone());
        font
    }

    /// The default font for `axis` at `size`.
    #[must_use]
    pub fn default_font(&self, axis: Axis, size: Extent) -> Font {
        self.get(&FontKey::default_for(axis, size))
    }

    /// `font` with its size multiplied by `scale`.
    #[must_use]
    pub fn scaled_font(&self, font: &Font, scale: f64) -> Font {
        self.get(&font.key().scaled(scale))
    }

    /// Resolve a request over a family preference list.
    ///
    /// An exact match on family, style, weight and language wins, taking
    /// families in order. Otherwise candidates are narrowed by family, then
    /// language, then style, then weight, and the first candidate of the
    /// deepest non-empty step is used. With no family match at all the
    /// default family's specification is used; `None` means not even that
    /// exists.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn map_font(
        &self,
        families: &[String],
        style: FontStyle,
        weight: FontWeight,
        language: &str,
        axis: Axis,
        size: Extent,
        features: &[FontFeature],
    ) -> Option<Font> {
        let specification = {
            let state = self.loaded();
            let specifications = state.specifications.as_deref().unwrap_or_default();
            exact_match(specifications, families, style, weight, language)
                .or_else(|| best_match(specifications, families, style, weight, language))
                .or_else(|| {
                    let fallback = FontKey::default_for(axis, size);
                    specifications.iter().find(|s| s.matches(&fallback))
                })
                .cloned()
        }?;
        let key = FontKey::new(
            &specification.family,
            specification.style,
            specification.weight,
            &specification.language,
            axis,
            size,
            features.iter().cloned(),
        );
        Some(self.get(&key))
    }

    /// Evict every font and load state and force the catalogs to be read
    /// again on next use.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.fonts.clear();
        state.specifications = None;
        self.inner.store.clear();
    }
}

fn exact_match<'a>(
    specifications: &'a [FontSpecification],
    families: &[String],
    style: FontStyle,
    weight: FontWeight,
    language: &str,
) -> Option<&'a FontSpecification> {
    let language = language.to_lowercase();
    families.iter().find_map(|family| {
        let family = family.to_lowercase();
        specifications.iter().find(|s| {
            s.family == family
                && s.style == style
                && s.weight == weight
                && (language.is_empty() || s.language == language)
        })
    })
}

fn best_match<'a>(
    specifications: &'a [FontSpecification],
    families: &[String],
    style: FontStyle,
    weight: FontWeight,
    language: &str,
) -> Option<&'a FontSpecification> {
    let families: Vec<String> = families.iter().map(|f| f.to_lowercase()).collect();
    let language = language.to_lowercase();

    let by_family: Vec<&FontSpecification> = specifications
        .iter()
        .filter(|s| families.contains(&s.family))
        .collect();
    let by_language: Vec<&FontSpecification> = by_family
        .iter()
        .copied()
        .filter(|s| language.is_empty() || s.language == language)
        .collect();
    let by_style: Vec<&FontSpecification> = by_language
        .iter()
        .copied()
        .filter(|s| s.style == style)
        .collect();
    let by_weight: Vec<&FontSpecification> = by_style
        .iter()
        .copied()
        .filter(|s| s.weight == weight)
        .collect();

    [by_weight, by_style, by_language, by_family]
        .into_iter()
        .find_map(|step| step.first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(family: &str, style: FontStyle, weight: FontWeight, language: &str) -> FontSpecification {
        FontSpecification::new(family, style, weight, language, format!("{family}-{style}-{weight}-{language}"))
    }

    #[test]
    fn test_best_match_narrows_in_order() {
        let specs = vec![
            spec("Serif", FontStyle::Normal, FontWeight::Normal, "en"),
            spec("Serif", FontStyle::Italic, FontWeight::Normal, "ja"),
            spec("Serif", FontStyle::Italic, FontWeight::Bold, "ja"),
        ];
        let families = vec!["SERIF".to_string()];

        let m = best_match(&specs, &families, FontStyle::Italic, FontWeight::Bold, "ja").unwrap();
        assert_eq!(m, &specs[2]);

        // weight step empty, style step wins
        let m = best_match(&specs, &families, FontStyle::Italic, FontWeight::Bold, "").unwrap();
        assert_eq!(m, &specs[2]);
        let m = best_match(&specs, &families, FontStyle::Oblique, FontWeight::Bold, "ja").unwrap();
        assert_eq!(m, &specs[1]);

        // language step empty, family step wins
        let m = best_match(&specs, &families, FontStyle::Italic, FontWeight::Bold, "fr").unwrap();
        assert_eq!(m, &specs[0]);

        assert!(best_match(&specs, &["Sans".to_string()], FontStyle::Normal, FontWeight::Normal, "").is_none());
    }

    #[test]
    fn test_exact_match_respects_family_order() {
        let specs = vec![
            spec("B", FontStyle::Normal, FontWeight::Normal, ""),
            spec("A", FontStyle::Normal, FontWeight::Normal, ""),
        ];
        let families = vec!["a".to_string(), "b".to_string()];
        let m = exact_match(&specs, &families, FontStyle::Normal, FontWeight::Normal, "").unwrap();
        assert_eq!(m.family, "a");
    }
}
