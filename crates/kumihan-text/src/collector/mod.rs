//! Document walkers producing phrases and paragraphs.

mod annotation;
mod paragraph;
mod phrase;

pub use annotation::AnnotationCollector;
pub use paragraph::ParagraphCollector;
pub use phrase::PhraseCollector;
