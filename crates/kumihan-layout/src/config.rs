//! Layout configuration.

use std::fs;
use std::path::Path;

use anyhow::Context;
use kumihan_common::{Extent, WritingMode};
use kumihan_fonts::RegistryConfig;
use kumihan_text::Defaults;
use kumihan_text::style::Wrap;
use serde::{Deserialize, Serialize};

/// Root container extent used when none is configured.
pub const DEFAULT_EXTENT: Extent = Extent::new(1280.0, 720.0);

/// Everything a layout pass needs besides the document.
///
/// Every field is optional in JSON:
///
/// ```json
/// {
///   "extent": { "width": 1920, "height": 1080 },
///   "writing_mode": "tbrl",
///   "wrap": "noWrap",
///   "defaults": { "line_height": 40 },
///   "fonts": { "font_directory": "fonts" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Extent of the root container.
    pub extent: Extent,
    /// Overrides the writing mode of `defaults`.
    pub writing_mode: Option<WritingMode>,
    /// Overrides the wrap option of `defaults`.
    pub wrap: Option<Wrap>,
    /// Style fallbacks.
    pub defaults: Defaults,
    /// Where fonts come from.
    pub fonts: RegistryConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            extent: DEFAULT_EXTENT,
            writing_mode: None,
            wrap: None,
            defaults: Defaults::default(),
            fonts: RegistryConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Parse a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed input.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Read a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&source).with_context(|| format!("parsing {}", path.display()))
    }

    /// `defaults` with the overrides applied.
    #[must_use]
    pub fn effective_defaults(&self) -> Defaults {
        let mut defaults = self.defaults.clone();
        if let Some(writing_mode) = self.writing_mode {
            defaults.writing_mode = writing_mode;
        }
        if let Some(wrap) = self.wrap {
            defaults.wrap = wrap;
        }
        defaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(LayoutConfig::from_json("{}").expect("parses"), LayoutConfig::default());
    }

    #[test]
    fn test_overrides_win() {
        let config = LayoutConfig::from_json(
            r#"{ "extent": { "width": 640, "height": 360 }, "writing_mode": "tbrl", "wrap": "noWrap" }"#,
        )
        .expect("parses");
        assert_eq!(config.extent, Extent::new(640.0, 360.0));
        let defaults = config.effective_defaults();
        assert_eq!(defaults.writing_mode, WritingMode::Tbrl);
        assert_eq!(defaults.wrap, Wrap::NoWrap);
        assert_eq!(config.defaults.writing_mode, WritingMode::Lrtb);
    }

    #[test]
    fn test_unknown_keyword_is_an_error() {
        assert!(LayoutConfig::from_json(r#"{ "writing_mode": "sideways" }"#).is_err());
    }
}
