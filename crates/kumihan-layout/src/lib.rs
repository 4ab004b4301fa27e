//! Layout of TTML documents into area trees for kumihan.
//!
//! # Scope
//!
//! This crate provides:
//! - **Line breaking** - greedy filling of lines from styled phrases
//! - **Annotations** - ruby and emphasis laid out over their bases
//! - **Alignment** - inline and block alignment with filler areas
//! - **Bidi reordering** - visual order of the areas of each line
//! - **Document layout** - `body`, `div` and `p` stacked in one region
//!
//! ```text
//!   TTML ──▶ DomTree ──▶ ParagraphCollector ──▶ [Paragraph]
//!                                                    │
//!                                       LineLayout ◀─┘
//!                                           │
//!              region ◀── block ◀── [Line] ◀┘ ──▶ AreaTree::to_json()
//! ```
//!
//! # Not Yet Implemented
//!
//! - Multiple regions and timing
//! - Annotation overhang

mod align;
mod bidi;
mod config;
mod line;
mod processor;

use anyhow::Context;
use kumihan_area::AreaTree;
use kumihan_dom::{DomTree, parse_xml};
use kumihan_fonts::FontRegistry;
use kumihan_text::AttributeStyleResolver;

pub use bidi::visual_order;
pub use config::{DEFAULT_EXTENT, LayoutConfig};
pub use line::{Consume, LineLayout};
pub use processor::LayoutProcessor;

/// A configured layout pipeline. Fonts loaded by one document stay loaded
/// for the next.
#[derive(Debug, Clone)]
pub struct Typesetter {
    config: LayoutConfig,
    registry: FontRegistry,
}

impl Typesetter {
    /// A typesetter reading fonts as `config` says.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        let registry = FontRegistry::new(config.fonts.clone());
        Self { config, registry }
    }

    /// A typesetter using an existing registry; `config.fonts` is ignored.
    #[must_use]
    pub const fn with_registry(config: LayoutConfig, registry: FontRegistry) -> Self {
        Self { config, registry }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out `doc`.
    ///
    /// # Errors
    ///
    /// Fails when the area tree is misused during layout.
    pub fn typeset(&self, doc: &DomTree) -> anyhow::Result<AreaTree> {
        let resolver = AttributeStyleResolver::new(self.registry.clone(), self.config.effective_defaults())
            .with_extent(self.config.extent);
        LayoutProcessor::new(doc, &resolver, &self.registry, self.config.extent)
            .layout()
            .context("laying out document")
    }

    /// Parse `source` as XML and lay it out.
    ///
    /// # Errors
    ///
    /// Fails on malformed XML, and as [`typeset`](Self::typeset) does.
    pub fn typeset_str(&self, source: &str) -> anyhow::Result<AreaTree> {
        let doc = parse_xml(source).context("parsing document")?;
        self.typeset(&doc)
    }
}

/// Lay out `doc` with `config`.
///
/// # Errors
///
/// See [`Typesetter::typeset`].
pub fn typeset(doc: &DomTree, config: &LayoutConfig) -> anyhow::Result<AreaTree> {
    Typesetter::new(config.clone()).typeset(doc)
}

/// Parse and lay out `source` with `config`.
///
/// # Errors
///
/// See [`Typesetter::typeset_str`].
pub fn typeset_str(source: &str, config: &LayoutConfig) -> anyhow::Result<AreaTree> {
    Typesetter::new(config.clone()).typeset_str(source)
}
