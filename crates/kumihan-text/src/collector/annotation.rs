use kumihan_common::Dimension;
use kumihan_dom::{DomTree, NodeId};

use crate::phrase::Phrase;
use crate::resolver::StyleResolver;
use crate::style::{Annotation, StyleAttribute, StyleValue};

/// Collects a ruby container or an emphasized span into one annotated
/// phrase.
///
/// [§ 10.2.34 tts:ruby](https://www.w3.org/TR/ttml2/#style-attribute-ruby)
///
/// Text spans pair with bases through a cursor: it resumes from the latest
/// base start, moves one base per text span and is reset at the end of each
/// text container. Text spans past the last base are dropped.
pub struct AnnotationCollector<'a> {
    doc: &'a DomTree,
    resolver: &'a dyn StyleResolver,
    bases: Vec<Phrase>,
    /// Annotations of `bases[i]`.
    annotations: Vec<Vec<Phrase>>,
    base_starts: Vec<usize>,
    current_base: Option<usize>,
}

impl<'a> AnnotationCollector<'a> {
    /// An empty collector.
    #[must_use]
    pub fn new(doc: &'a DomTree, resolver: &'a dyn StyleResolver) -> Self {
        Self {
            doc,
            resolver,
            bases: Vec::new(),
            annotations: Vec::new(),
            base_starts: Vec::new(),
            current_base: None,
        }
    }

    /// Collect `element`: at most one annotated phrase, none when no base
    /// was found.
    pub fn collect(&mut self, element: NodeId) -> Vec<Phrase> {
        self.bases.clear();
        self.annotations.clear();
        self.base_starts.clear();
        self.current_base = None;
        if self.resolver.annotation(self.doc, element) == Some(Annotation::Emphasis) {
            self.collect_emphasis(element);
        } else {
            self.collect_container(element);
        }
        self.emit(element)
    }

    fn emit(&mut self, element: NodeId) -> Vec<Phrase> {
        if self.bases.is_empty() {
            return Vec::new();
        }
        let mut bases = std::mem::take(&mut self.bases);
        for (base, annotations) in bases.iter_mut().zip(self.annotations.drain(..)) {
            if !annotations.is_empty() {
                let length = base.length();
                base.add_range(StyleAttribute::Annotations, StyleValue::Annotations(annotations), 0..length);
            }
        }
        vec![Phrase::annotated(Some(element), bases, Vec::new())]
    }

    /// [§ 10.2.43 tts:textEmphasis](https://www.w3.org/TR/ttml2/#style-attribute-textEmphasis)
    fn collect_emphasis(&mut self, element: NodeId) {
        let text = self.doc.direct_text(element);
        for c in text.chars() {
            self.add_base_start();
            self.add_base(element, &c.to_string());
        }
        let defaults = self.resolver.defaults();
        let fallback_axis = defaults.writing_mode.axis(Dimension::Ipd);
        for (base, annotations) in self.bases.iter().zip(self.annotations.iter_mut()) {
            if base.is_empty() || base.is_whitespace() {
                continue;
            }
            let Some(emphasis) = base.emphasis(None).filter(|e| !e.is_none()) else {
                continue;
            };
            let axis = base.font(None).map_or(fallback_axis, kumihan_fonts::Font::axis);
            let Some(mark) = emphasis.resolve_mark(axis) else {
                continue;
            };
            let text: String = std::iter::repeat_n(mark, base.length()).collect();
            let styles = self.resolver.emphasis_styles(base, emphasis);
            annotations.push(Phrase::new(Some(element), &text, styles));
        }
    }

    fn collect_container(&mut self, element: NodeId) {
        let children: Vec<NodeId> = self.doc.child_elements(element).collect();
        for child in children {
            match self.role(child) {
                Some(Annotation::BaseContainer) => {
                    self.add_base_start();
                    self.collect_base_container(child);
                }
                Some(Annotation::TextContainer) if !self.base_starts.is_empty() => {
                    self.collect_text_container(child);
                }
                Some(Annotation::Base) => {
                    self.add_base_start();
                    self.collect_base(child);
                }
                Some(Annotation::Text) if !self.base_starts.is_empty() => self.collect_text(child),
                // delimiters, nested containers and unmarked spans contribute nothing
                _ => {}
            }
        }
    }

    fn role(&self, element: NodeId) -> Option<Annotation> {
        if self.doc.is_tt_element(element, "span") {
            self.resolver.annotation(self.doc, element)
        } else {
            None
        }
    }

    fn collect_base_container(&mut self, element: NodeId) {
        let children: Vec<NodeId> = self.doc.child_elements(element).collect();
        for child in children {
            if self.role(child) == Some(Annotation::Base) {
                self.collect_base(child);
            }
        }
    }

    fn collect_text_container(&mut self, element: NodeId) {
        self.resume();
        let children: Vec<NodeId> = self.doc.child_elements(element).collect();
        for child in children {
            if self.role(child) == Some(Annotation::Text) {
                self.collect_text(child);
            }
        }
        self.current_base = None;
    }

    fn collect_base(&mut self, element: NodeId) {
        let text = self.doc.direct_text(element);
        self.add_base(element, &text);
    }

    fn collect_text(&mut self, element: NodeId) {
        self.resume();
        let Some(index) = self.current_base else {
            return;
        };
        let Some(base) = self.bases.get(index) else {
            return;
        };
        let text = self.doc.direct_text(element);
        let mut styles = self.resolver.annotation_styles(self.doc, element, base.element());
        styles.extend(self.resolver.content_styles(self.doc, element, &text));
        self.annotations[index].push(Phrase::new(Some(element), &text, styles));
        self.current_base = Some(index + 1);
    }

    /// Point the cursor at the latest base start unless it is already set.
    fn resume(&mut self) {
        if self.current_base.is_none() {
            self.current_base = self.base_starts.last().copied();
        }
    }

    fn add_base_start(&mut self) {
        self.base_starts.push(self.bases.len());
    }

    fn add_base(&mut self, element: NodeId, text: &str) {
        let mut styles = self.resolver.span_styles(self.doc, element, None);
        styles.extend(self.resolver.content_styles(self.doc, element, text));
        self.bases.push(Phrase::new(Some(element), text, styles));
        self.annotations.push(Vec::new());
    }
}
