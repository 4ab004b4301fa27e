use kumihan_dom::{DomTree, NodeId};

use super::PhraseCollector;
use crate::phrase::{Paragraph, Phrase};
use crate::resolver::StyleResolver;

/// Groups the phrases of a `p` (or of an inline-block span) into
/// paragraphs, sealing one at each paragraph separator and at the end.
/// Paragraphs without phrases are skipped.
pub struct ParagraphCollector<'a> {
    doc: &'a DomTree,
    resolver: &'a dyn StyleResolver,
    embedded: bool,
}

impl<'a> ParagraphCollector<'a> {
    /// A collector for top level paragraphs.
    #[must_use]
    pub fn new(doc: &'a DomTree, resolver: &'a dyn StyleResolver) -> Self {
        Self {
            doc,
            resolver,
            embedded: false,
        }
    }

    /// A collector for a paragraph nested inside a line.
    pub(crate) fn embedded(doc: &'a DomTree, resolver: &'a dyn StyleResolver) -> Self {
        Self {
            doc,
            resolver,
            embedded: true,
        }
    }

    /// Collect the paragraphs of `element`.
    #[must_use]
    pub fn collect(&self, element: NodeId) -> Vec<Paragraph> {
        let styles = self.resolver.paragraph_styles(self.doc, element);
        let phrases = PhraseCollector::for_paragraph(self.doc, self.resolver, self.embedded).collect(element);

        let mut paragraphs = Vec::new();
        let mut current: Vec<Phrase> = Vec::new();
        for phrase in phrases {
            if phrase.is_paragraph_break() {
                if !current.is_empty() {
                    paragraphs.push(Paragraph::new(Some(element), &current, styles.clone()));
                    current.clear();
                }
            } else {
                current.push(phrase);
            }
        }
        if !current.is_empty() {
            paragraphs.push(Paragraph::new(Some(element), &current, styles));
        }
        paragraphs
    }
}
