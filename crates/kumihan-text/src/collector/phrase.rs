use kumihan_common::characters::{LINE_SEPARATOR, PARAGRAPH_SEPARATOR};
use kumihan_dom::{DomTree, NodeId};

use super::{AnnotationCollector, ParagraphCollector};
use crate::phrase::Phrase;
use crate::resolver::StyleResolver;
use crate::style::StyleAttributeInterval;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Phrases,
    Paragraph,
    Embedded,
}

/// A span whose end tag has not been reached yet.
#[derive(Debug, Clone, Copy)]
struct OpenSpan {
    element: NodeId,
    /// Start offset in the current buffer.
    begin: usize,
    /// Where the span's intervals go in `pending`, ahead of its children's.
    mark: usize,
}

/// Flattens inline content into phrases.
///
/// Text accumulates in one buffer across spans; a span's styles land on
/// exactly the range it covers, inner spans overriding outer ones. A phrase
/// is emitted at each `br` (after appending U+2028), at each U+2029 (which
/// is dropped and followed by a paragraph-break marker) and at the end.
pub struct PhraseCollector<'a> {
    doc: &'a DomTree,
    resolver: &'a dyn StyleResolver,
    mode: Mode,
    root: Option<NodeId>,
    text: String,
    length: usize,
    pending: Vec<StyleAttributeInterval>,
    spans: Vec<OpenSpan>,
    phrases: Vec<Phrase>,
}

impl<'a> PhraseCollector<'a> {
    /// A collector treating every span as inline text.
    #[must_use]
    pub fn new(doc: &'a DomTree, resolver: &'a dyn StyleResolver) -> Self {
        Self::with_mode(doc, resolver, Mode::Phrases)
    }

    /// A collector that also routes ruby and emphasis to the annotation
    /// collector and, unless `embedded`, collects inline blocks as nested
    /// paragraphs.
    pub(crate) fn for_paragraph(doc: &'a DomTree, resolver: &'a dyn StyleResolver, embedded: bool) -> Self {
        Self::with_mode(doc, resolver, if embedded { Mode::Embedded } else { Mode::Paragraph })
    }

    const fn with_mode(doc: &'a DomTree, resolver: &'a dyn StyleResolver, mode: Mode) -> Self {
        Self {
            doc,
            resolver,
            mode,
            root: None,
            text: String::new(),
            length: 0,
            pending: Vec::new(),
            spans: Vec::new(),
            phrases: Vec::new(),
        }
    }

    /// Collect the phrases of `element`.
    ///
    /// A `p` (or the element of an embedded paragraph) contributes only its
    /// content; its own styles belong to the paragraph. A `span` also
    /// contributes its styles.
    pub fn collect(&mut self, element: NodeId) -> Vec<Phrase> {
        self.clear();
        self.root = Some(element);
        if self.doc.is_tt_element(element, "p") || self.mode == Mode::Embedded {
            self.collect_root(element);
        } else if self.doc.is_tt_element(element, "span") {
            self.collect_span(element);
        } else {
            self.collect_children(element);
        }
        self.emit();
        std::mem::take(&mut self.phrases)
    }

    fn clear(&mut self) {
        self.root = None;
        self.text.clear();
        self.length = 0;
        self.pending.clear();
        self.spans.clear();
        self.phrases.clear();
    }

    fn collect_root(&mut self, element: NodeId) {
        let controls = self.resolver.bidi_controls(self.doc, element);
        if let Some((open, _)) = controls {
            self.push_char(open);
        }
        self.collect_children(element);
        if let Some((_, close)) = controls {
            self.push_char(close);
        }
    }

    fn collect_children(&mut self, element: NodeId) {
        for &child in self.doc.children(element) {
            if let Some(text) = self.doc.as_text(child) {
                self.collect_text(text);
            } else if self.doc.is_tt_element(child, "span") {
                self.collect_span_child(child);
            } else if self.doc.is_tt_element(child, "br") {
                self.push_char(LINE_SEPARATOR);
                self.emit();
            }
        }
    }

    fn collect_text(&mut self, text: &str) {
        let mut pieces = text.split(PARAGRAPH_SEPARATOR);
        if let Some(first) = pieces.next() {
            self.push_str(first);
        }
        for piece in pieces {
            self.emit();
            self.phrases.push(Phrase::paragraph_break(self.root));
            self.push_str(piece);
        }
    }

    fn collect_span_child(&mut self, element: NodeId) {
        if self.mode == Mode::Phrases {
            self.collect_span(element);
        } else if self.resolver.generates_annotation_block(self.doc, element) {
            self.emit();
            let annotated = AnnotationCollector::new(self.doc, self.resolver).collect(element);
            self.phrases.extend(annotated);
        } else if self.mode == Mode::Paragraph && self.resolver.generates_inline_block(self.doc, element) {
            self.emit();
            for paragraph in ParagraphCollector::embedded(self.doc, self.resolver).collect(element) {
                self.phrases.push(Phrase::embedding(Some(element), paragraph));
            }
        } else {
            self.collect_span(element);
        }
    }

    fn collect_span(&mut self, element: NodeId) {
        self.spans.push(OpenSpan {
            element,
            begin: self.length,
            mark: self.pending.len(),
        });
        let controls = self.resolver.bidi_controls(self.doc, element);
        if let Some((open, _)) = controls {
            self.push_char(open);
        }
        self.collect_children(element);
        if let Some((_, close)) = controls {
            self.push_char(close);
        }
        if let Some(span) = self.spans.pop() {
            let styles = self
                .resolver
                .span_styles(self.doc, span.element, Some(span.begin..self.length));
            let _ = self.pending.splice(span.mark..span.mark, styles);
        }
    }

    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
        self.length += s.chars().count();
    }

    fn push_char(&mut self, c: char) {
        self.text.push(c);
        self.length += 1;
    }

    fn emit(&mut self) {
        if self.length > 0 {
            let element = self.spans.last().map(|s| s.element).or(self.root);
            let mut intervals = Vec::new();
            for span in &self.spans {
                intervals.extend(
                    self.resolver
                        .span_styles(self.doc, span.element, Some(span.begin..self.length)),
                );
            }
            intervals.append(&mut self.pending);
            if let Some(e) = element {
                intervals.extend(self.resolver.content_styles(self.doc, e, &self.text));
            }
            self.phrases.push(Phrase::new(element, &self.text, intervals));
        }
        self.text.clear();
        self.length = 0;
        self.pending.clear();
        for span in &mut self.spans {
            span.begin = 0;
            span.mark = 0;
        }
    }
}
