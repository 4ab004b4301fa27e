//! Tests for font keys, catalog loading, matching and lazy metrics.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use kumihan_common::{Axis, Extent};
use kumihan_fonts::{
    FontError, FontFeature, FontKerning, FontKey, FontMetrics, FontRegistry, FontSpecification, FontStyle,
    FontWeight, MetricsProvider, RegistryConfig,
};
use quickcheck_macros::quickcheck;

/// Every glyph advances half an em; "missing" sources fail to load.
#[derive(Debug)]
struct HalfEm;

impl FontMetrics for HalfEm {
    fn units_per_em(&self) -> f64 {
        2048.0
    }
    fn ascent(&self) -> f64 {
        1536.0
    }
    fn descent(&self) -> f64 {
        512.0
    }
    fn line_gap(&self) -> f64 {
        256.0
    }
    fn glyph(&self, c: char) -> u16 {
        c as u16
    }
    fn advance(&self, _c: char, _vertical: bool) -> f64 {
        1024.0
    }
    fn kerning(&self, left: char, right: char) -> f64 {
        if (left, right) == ('T', 'o') { -256.0 } else { 0.0 }
    }
    fn family_name(&self) -> Option<String> {
        Some("Half Em Sans".to_string())
    }
}

#[derive(Default)]
struct FakeProvider {
    loads: AtomicUsize,
}

impl MetricsProvider for FakeProvider {
    fn load(&self, source: &Path) -> Result<Arc<dyn FontMetrics>, FontError> {
        let _ = self.loads.fetch_add(1, Ordering::SeqCst);
        if source.to_string_lossy().contains("missing") {
            Err(FontError::Unavailable(source.to_path_buf()))
        } else {
            Ok(Arc::new(HalfEm))
        }
    }
}

fn spec(family: &str, style: FontStyle, weight: FontWeight, language: &str, source: &str) -> FontSpecification {
    FontSpecification::new(family, style, weight, language, source)
}

fn registry(specs: Vec<FontSpecification>) -> (FontRegistry, Arc<FakeProvider>) {
    let provider = Arc::new(FakeProvider::default());
    let registry = FontRegistry::with_specifications(specs, provider.clone());
    (registry, provider)
}

fn hash_of(key: &FontKey) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

fn key(family: &str, language: &str) -> FontKey {
    FontKey::new(
        family,
        FontStyle::Normal,
        FontWeight::Normal,
        language,
        Axis::Horizontal,
        FontKey::DEFAULT_SIZE,
        [],
    )
}

// ========== font keys ==========

#[quickcheck]
fn prop_key_case_folding(family: String, language: String) -> bool {
    let upper = key(&family.to_ascii_uppercase(), &language.to_ascii_uppercase());
    let lower = key(&family.to_ascii_lowercase(), &language.to_ascii_lowercase());
    upper == lower && hash_of(&upper) == hash_of(&lower)
}

#[test]
fn test_key_features_are_ordered_and_deduplicated() {
    let k = FontKey::new(
        "x",
        FontStyle::Normal,
        FontWeight::Normal,
        "",
        Axis::Vertical,
        FontKey::DEFAULT_SIZE,
        [
            FontFeature::shear(0.1),
            FontFeature::kerning(FontKerning::Normal),
            FontFeature::enabled(FontFeature::VROT),
        ],
    );
    let tags: Vec<&str> = k.features.iter().map(|f| f.tag.as_str()).collect();
    assert_eq!(tags, vec!["kern", "oblq", "vrot"]);
}

// ========== fonts and metrics ==========

#[test]
fn test_missing_source_measures_zero() {
    let (registry, provider) = registry(vec![spec("Noto Sans", FontStyle::Normal, FontWeight::Normal, "", "missing.ttf")]);
    let font = registry.default_font(Axis::Horizontal, FontKey::DEFAULT_SIZE);
    assert_eq!(font.advance("hello"), 0.0);
    assert_eq!(font.ascent(), 0.0);
    assert_eq!(font.leading(), 0.0);
    assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unresolvable_key_measures_zero() {
    let (registry, provider) = registry(vec![]);
    let font = registry.get(&key("Nothing", ""));
    assert!(font.source().is_none());
    assert_eq!(font.advance("abc"), 0.0);
    assert_eq!(provider.loads.load(Ordering::SeqCst), 0);
}

#[test]
fn test_loaded_font_scales_metrics() {
    let (registry, _) = registry(vec![spec("Noto Sans", FontStyle::Normal, FontWeight::Normal, "", "ok.ttf")]);
    let font = registry.default_font(Axis::Horizontal, FontKey::DEFAULT_SIZE);
    assert_eq!(font.advance("ab"), 24.0);
    assert_eq!(font.advance("To"), 9.0 + 12.0);
    assert_eq!(font.leading(), 3.0);
    assert_eq!(font.ascent(), 18.0);
    assert_eq!(font.descent(), 6.0);
    assert_eq!(font.preferred_family_name(), "Half Em Sans");

    let scaled = registry.scaled_font(&font, 2.0);
    assert_eq!(scaled.size(), Extent::new(48.0, 48.0));
    assert_eq!(scaled.advance("ab"), 48.0);
}

#[test]
fn test_kerning_can_be_disabled() {
    let (registry, _) = registry(vec![spec("Noto Sans", FontStyle::Normal, FontWeight::Normal, "", "ok.ttf")]);
    let font = registry.get(&FontKey::new(
        "Noto Sans",
        FontStyle::Normal,
        FontWeight::Normal,
        "",
        Axis::Horizontal,
        FontKey::DEFAULT_SIZE,
        [FontFeature::kerning(FontKerning::None)],
    ));
    assert_eq!(font.advance("To"), 24.0);
}

#[test]
fn test_get_is_cached() {
    let (registry, provider) = registry(vec![spec("Noto Sans", FontStyle::Normal, FontWeight::Normal, "", "ok.ttf")]);
    let a = registry.get(&FontKey::default_horizontal());
    let b = registry.get(&FontKey::default_horizontal());
    assert_eq!(a, b);
    let _ = a.advance("x");
    let _ = b.advance("y");
    assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_gets_load_once() {
    let (registry, provider) = registry(vec![spec("Noto Sans", FontStyle::Normal, FontWeight::Normal, "", "ok.ttf")]);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || registry.default_font(Axis::Vertical, FontKey::DEFAULT_SIZE).advance("縦書き"))
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 36.0);
    }
    assert_eq!(provider.loads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_forgets_load_state() {
    let (registry, provider) = registry(vec![spec("Noto Sans", FontStyle::Normal, FontWeight::Normal, "", "missing.ttf")]);
    let font = registry.default_font(Axis::Horizontal, FontKey::DEFAULT_SIZE);
    let _ = font.advance("a");
    let _ = font.advance("b");
    assert_eq!(provider.loads.load(Ordering::SeqCst), 1);

    registry.clear();
    assert_eq!(registry.specifications().len(), 1);
    let font = registry.default_font(Axis::Horizontal, FontKey::DEFAULT_SIZE);
    assert_eq!(font.advance("a"), 0.0);
    assert_eq!(provider.loads.load(Ordering::SeqCst), 2);
}

// ========== matching ==========

fn catalog() -> Vec<FontSpecification> {
    vec![
        spec("Noto Sans", FontStyle::Normal, FontWeight::Normal, "", "sans.ttf"),
        spec("Noto Serif", FontStyle::Normal, FontWeight::Normal, "en", "serif-en.ttf"),
        spec("Noto Serif", FontStyle::Normal, FontWeight::Bold, "ja", "serif-ja-bold.ttf"),
        spec("Noto Serif", FontStyle::Italic, FontWeight::Normal, "ja", "serif-ja-italic.ttf"),
    ]
}

fn map(registry: &FontRegistry, families: &[&str], style: FontStyle, weight: FontWeight, language: &str) -> Option<PathBuf> {
    let families: Vec<String> = families.iter().map(ToString::to_string).collect();
    registry
        .map_font(&families, style, weight, language, Axis::Horizontal, FontKey::DEFAULT_SIZE, &[])
        .and_then(|f| f.source().map(Path::to_path_buf))
}

#[test]
fn test_map_font_exact_match() {
    let (registry, _) = registry(catalog());
    assert_eq!(
        map(&registry, &["Missing", "noto serif"], FontStyle::Normal, FontWeight::Bold, "JA"),
        Some(PathBuf::from("serif-ja-bold.ttf"))
    );
}

#[test]
fn test_map_font_best_match() {
    let (registry, _) = registry(catalog());
    // no italic bold japanese: the style step survives
    assert_eq!(
        map(&registry, &["Noto Serif"], FontStyle::Italic, FontWeight::Bold, "ja"),
        Some(PathBuf::from("serif-ja-italic.ttf"))
    );
    // no korean at all: the family step survives
    assert_eq!(
        map(&registry, &["Noto Serif"], FontStyle::Normal, FontWeight::Normal, "ko"),
        Some(PathBuf::from("serif-en.ttf"))
    );
}

#[test]
fn test_map_font_falls_back_to_default() {
    let (registry, _) = registry(catalog());
    assert_eq!(
        map(&registry, &["Comic"], FontStyle::Normal, FontWeight::Normal, ""),
        Some(PathBuf::from("sans.ttf"))
    );

    let (empty, _) = registry_without_default();
    assert_eq!(map(&empty, &["Comic"], FontStyle::Normal, FontWeight::Normal, ""), None);
}

fn registry_without_default() -> (FontRegistry, Arc<FakeProvider>) {
    registry(vec![spec("Other", FontStyle::Normal, FontWeight::Normal, "", "other.ttf")])
}

// ========== catalogs on disk ==========

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kumihan-fonts-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_directory_catalogs_are_merged() {
    let dir = scratch_dir("merge");
    fs::write(
        dir.join("a.xml"),
        r#"<fonts><font><param name="family">Noto Sans</param><param name="source">a.ttf</param></font></fonts>"#,
    )
    .unwrap();
    fs::write(dir.join("broken.xml"), "<fonts><font>").unwrap();
    fs::write(dir.join("notes.txt"), "not a catalog").unwrap();
    let extra = dir.join("extra.cat");
    fs::write(
        &extra,
        r#"<fonts><font><param name="family">Extra</param><param name="source">/abs/extra.ttf</param></font></fonts>"#,
    )
    .unwrap();

    let registry = FontRegistry::with_provider(
        RegistryConfig {
            font_directory: Some(dir.clone()),
            catalog_files: vec![extra],
        },
        Arc::new(FakeProvider::default()),
    );
    let specs = registry.specifications();
    assert_eq!(specs.len(), 2);
    assert_eq!(specs[0].source, dir.join("a.ttf"));
    assert_eq!(specs[1].family, "extra");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_registry_config_deserializes() {
    let config: RegistryConfig = serde_json::from_str(r#"{"font_directory": "/fonts"}"#).unwrap();
    assert_eq!(config.font_directory, Some(PathBuf::from("/fonts")));
    assert!(config.catalog_files.is_empty());
}
