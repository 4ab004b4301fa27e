//! Styled text for kumihan.
//!
//! Inline content of a document is flattened into [`Phrase`]s: text runs
//! carrying style attributes over character intervals. Collectors walk the
//! document and consult a [`StyleResolver`] for styles; ruby and emphasis
//! become annotated phrases whose bases carry their annotation phrases.
//!
//! ```text
//!   <p> ──▶ ParagraphCollector ──▶ PhraseCollector ──▶ [Phrase] ──▶ [Paragraph]
//!                                       │
//!                                       └─ ruby / emphasis ──▶ AnnotationCollector
//! ```

pub mod collector;
pub mod phrase;
pub mod resolver;
pub mod style;

pub use collector::{AnnotationCollector, ParagraphCollector, PhraseCollector};
pub use phrase::{Paragraph, Phrase, PhraseKind};
pub use resolver::{AttributeStyleResolver, StyleResolver};
pub use style::{Defaults, StyleAttribute, StyleAttributeInterval, StyleValue};
