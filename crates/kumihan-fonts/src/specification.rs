//! Font catalog entries and the XML catalog format.
//!
//! A catalog lists the fonts available to the registry:
//!
//! ```xml
//! <fonts>
//!   <font>
//!     <param name="family">Noto Sans CJK JP</param>
//!     <param name="style">normal</param>
//!     <param name="weight">bold</param>
//!     <param name="language">ja</param>
//!     <param name="source">NotoSansCJKjp-Bold.otf</param>
//!   </font>
//! </fonts>
//! ```
//!
//! Relative sources resolve against the catalog's directory. Entries without
//! a family or a source are skipped.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use kumihan_common::warning::warn_once;
use serde::Serialize;

use crate::FontError;
use crate::key::{FontKey, FontStyle, FontWeight};

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontSpecification {
    /// Lower-cased family name.
    pub family: String,
    /// Style the source implements.
    pub style: FontStyle,
    /// Weight the source implements.
    pub weight: FontWeight,
    /// Lower-cased language tag, empty for language neutral fonts.
    pub language: String,
    /// Font file locator.
    pub source: PathBuf,
}

impl FontSpecification {
    /// Create a specification, folding family and language case.
    #[must_use]
    pub fn new(
        family: &str,
        style: FontStyle,
        weight: FontWeight,
        language: &str,
        source: impl Into<PathBuf>,
    ) -> Self {
        Self {
            family: family.to_lowercase(),
            style,
            weight,
            language: language.to_lowercase(),
            source: source.into(),
        }
    }

    /// Family, style and weight are equal, and either the key carries no
    /// language or the languages agree.
    #[must_use]
    pub fn matches(&self, key: &FontKey) -> bool {
        self.family == key.family
            && self.style == key.style
            && self.weight == key.weight
            && (key.language.is_empty() || self.language == key.language)
    }

    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::Io`] when the file cannot be read and
    /// [`FontError::Catalog`] when it is not well-formed.
    pub fn load_catalog(path: &Path) -> Result<Vec<Self>, FontError> {
        let text = fs::read_to_string(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        parse_catalog(&text, base).map_err(|source| FontError::Catalog {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Parse catalog text, resolving relative sources against `base`.
///
/// # Errors
///
/// Returns the XML error when `text` is not well-formed.
pub fn parse_catalog(text: &str, base: &Path) -> Result<Vec<FontSpecification>, roxmltree::Error> {
    let document = roxmltree::Document::parse(text)?;
    let specifications = document
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "font")
        .filter_map(|font| parse_font(font, base))
        .collect();
    Ok(specifications)
}

fn parse_font(font: roxmltree::Node<'_, '_>, base: &Path) -> Option<FontSpecification> {
    let mut family = None;
    let mut style = FontStyle::Normal;
    let mut weight = FontWeight::Normal;
    let mut language = String::new();
    let mut source = None;

    for param in font
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "param")
    {
        let Some(name) = param.attribute("name") else {
            continue;
        };
        let value: String = param
            .descendants()
            .filter(roxmltree::Node::is_text)
            .filter_map(|t| t.text())
            .collect();
        let value = value.trim();
        match name {
            "family" => family = Some(value.to_string()),
            "style" => match FontStyle::from_str(value) {
                Ok(s) => style = s,
                Err(_) => {
                    warn_once("Fonts", &format!("unknown font style '{value}' in catalog"));
                }
            },
            "weight" => match FontWeight::from_str(value) {
                Ok(w) => weight = w,
                Err(_) => {
                    warn_once("Fonts", &format!("unknown font weight '{value}' in catalog"));
                }
            },
            "language" => language = value.to_string(),
            "source" => source = Some(resolve_source(value, base)),
            _ => {}
        }
    }

    Some(FontSpecification::new(&family?, style, weight, &language, source?))
}

fn resolve_source(value: &str, base: &Path) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
