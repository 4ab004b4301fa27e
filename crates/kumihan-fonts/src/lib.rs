//! Font catalogs, font matching and lazily loaded metrics.
//!
//! ```text
//!   catalog *.xml ──▶ FontSpecification ─┐
//!                                        ├─▶ FontRegistry::get(FontKey) ──▶ Font
//!   FontKey (family, style, weight, ...) ┘                                   │
//!                                                     MetricsStore ◀── load on first query
//! ```
//!
//! Metrics are never required: a font whose source is missing or broken
//! measures everything as zero and a warning is printed once.

mod error;
mod font;
mod key;
mod mapping;
mod metrics;
mod registry;
mod specification;

pub use error::FontError;
pub use font::Font;
pub use key::{FeatureValue, FontFeature, FontKerning, FontKey, FontStyle, FontWeight};
pub use mapping::{Combination, CombinationStyle, GlyphMapping, Orientation};
pub use metrics::{FontMetrics, LoadState, MetricsProvider, MetricsStore, TrueTypeMetrics, TrueTypeProvider};
pub use registry::{FontRegistry, RegistryConfig};
pub use specification::{FontSpecification, parse_catalog};
