//! Line breaking of a phrase into line areas.
//!
//! [§ 11.3.1.3 Inline Areas](https://www.w3.org/TR/ttml2/#semantics-area-model)
//!
//! Content is cut into text runs wherever whitespace starts or stops, at
//! embedded paragraphs, and wherever annotations, bidi level, combination
//! or orientation change. Runs are cut further into unbreakable segments:
//! a soft break follows breaking whitespace and surrounds CJK ideographs, a
//! hard break follows U+2028. Segments fill lines greedily.

use std::collections::VecDeque;
use std::ops::Range;

use kumihan_area::{
    AnnotationArea, Area, AreaError, AreaId, AreaKind, AreaTree, Decoration, DecorationKind, Expansion, Geometry,
    GlyphArea, LineArea, SpaceArea,
};
use kumihan_common::characters::{
    OBJECT, is_breaking_whitespace, is_cjk_ideograph, is_line_separator, is_non_spacing, is_whitespace,
};
use kumihan_common::{Dimension, WritingMode};
use kumihan_fonts::{Font, FontRegistry};
use kumihan_text::style::{AnnotationPosition, Color, InlineAlignment, Whitespace, Wrap};
use kumihan_text::{Defaults, Paragraph, Phrase, StyleAttribute};

use crate::{align, bidi};

/// Attributes whose changes end a text run.
const RUN_BOUNDARIES: [StyleAttribute; 4] = [
    StyleAttribute::Annotations,
    StyleAttribute::Bidi,
    StyleAttribute::Combination,
    StyleAttribute::Orientation,
];

/// How much of the measure a line takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consume {
    /// The advance of its content.
    Fit,
    /// The whole measure, when it is finite.
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Text,
    Space,
    HardBreak,
    Embedding(AreaId),
}

/// An unbreakable piece of a run.
#[derive(Debug, Clone)]
struct Segment {
    range: Range<usize>,
    kind: SegmentKind,
    advance: f64,
    /// Index of the run the segment was cut from.
    run: usize,
}

#[derive(Debug, Clone, Copy)]
struct AnnotationPlacement {
    offset: f64,
    position: AnnotationPosition,
}

/// Lays out one phrase as a sequence of lines.
pub struct LineLayout<'a> {
    content: &'a Phrase,
    chars: Vec<char>,
    registry: &'a FontRegistry,
    defaults: &'a Defaults,
    writing_mode: WritingMode,
    level: u8,
    font: Font,
    line_height: f64,
    alignment: InlineAlignment,
    color: Color,
    wrap: Wrap,
    whitespace: Whitespace,
    embedding: bool,
    annotation: Option<AnnotationPlacement>,
}

impl<'a> LineLayout<'a> {
    /// A layout of the paragraph `content`. Whole-run styles of `content`
    /// set the line font, height, alignment, color, wrap and whitespace
    /// handling.
    #[must_use]
    pub fn new(content: &'a Phrase, registry: &'a FontRegistry, defaults: &'a Defaults) -> Self {
        let writing_mode = defaults.writing_mode;
        let level = writing_mode.default_bidi_level();
        let font = content
            .font(None)
            .cloned()
            .unwrap_or_else(|| registry.default_font(writing_mode.axis(Dimension::Ipd), defaults.font_size));
        Self {
            chars: content.chars(),
            line_height: content.line_height(None, defaults, Some(&font)),
            alignment: align::relativize(content.text_align(None, defaults), writing_mode, level),
            color: content.color(None, defaults),
            wrap: content.wrap(None, defaults),
            whitespace: content.whitespace(None, defaults),
            content,
            registry,
            defaults,
            writing_mode,
            level,
            font,
            embedding: false,
            annotation: None,
        }
    }

    /// Mark the lines as belonging to a paragraph embedded in a line.
    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.embedding = true;
        self
    }

    /// A layout of annotation text whose base is set in `base_font`.
    fn for_annotation(
        annotation: &'a Phrase,
        base_font: &Font,
        registry: &'a FontRegistry,
        defaults: &'a Defaults,
        level: u8,
    ) -> Self {
        let mut layout = Self::new(annotation, registry, defaults);
        if annotation.font(None).is_none() {
            layout.font = registry.scaled_font(base_font, 0.5);
            layout.line_height = annotation.line_height(None, defaults, Some(&layout.font));
        }
        layout.level = level;
        layout.alignment = annotation.annotation_align(None, defaults);
        layout.wrap = Wrap::NoWrap;
        layout.annotation = Some(AnnotationPlacement {
            offset: annotation.annotation_offset(None, defaults),
            position: annotation.annotation_position(None, defaults),
        });
        layout
    }

    /// Break the content into lines of at most `measure`, added to `tree`
    /// but not attached. Paragraph lines come back aligned to the widest
    /// line and in visual order.
    ///
    /// # Errors
    ///
    /// Propagates [`AreaError`] from tree operations.
    pub fn layout(&self, tree: &mut AreaTree, measure: f64, consume: Consume) -> Result<Vec<AreaId>, AreaError> {
        let segments = self.segments(tree)?;
        let lines = self.break_lines(tree, segments, measure, consume)?;
        if self.annotation.is_none() {
            align::align_lines(tree, &lines, self.alignment)?;
            for &line in &lines {
                bidi::reorder(tree, line)?;
            }
        }
        Ok(lines)
    }

    /// Reserve room for annotations on each of `lines` per the paragraph's
    /// annotation reserve; an unspecified amount is half the font size.
    ///
    /// # Errors
    ///
    /// [`AreaError::UnknownArea`] for a line not in `tree`.
    pub fn reserve_annotation_space(&self, tree: &mut AreaTree, lines: &[AreaId]) -> Result<(), AreaError> {
        let reserve = self.content.annotation_reserve(None, self.defaults);
        if reserve.is_none() {
            return Ok(());
        }
        let amount = reserve
            .reserve
            .unwrap_or_else(|| self.font.size_on(self.font.axis()) / 2.0);
        let count = lines.len();
        for (k, &line) in lines.iter().enumerate() {
            tree.add_annotation_reserve(line, reserve.resolve_position(count, k + 1 == count), amount)?;
        }
        Ok(())
    }

    // ========== segmentation ==========

    fn segments(&self, tree: &mut AreaTree) -> Result<Vec<Segment>, AreaError> {
        let mut segments = Vec::new();
        let mut start = 0;
        let mut run = 0;
        while start < self.chars.len() {
            let embedded = if self.chars[start] == OBJECT {
                self.content.embedded(Some(start))
            } else {
                None
            };
            if let Some(paragraph) = embedded {
                let area = self.layout_embedding(tree, paragraph)?;
                segments.push(Segment {
                    range: start..start + 1,
                    kind: SegmentKind::Embedding(area),
                    advance: tree.get(area)?.allocation_ipd(),
                    run,
                });
                start += 1;
            } else {
                let limit = self.content.run_limit(start, &RUN_BOUNDARIES);
                let space = is_breaking_whitespace(self.chars[start]);
                let end = (start + 1..limit)
                    .find(|&i| is_breaking_whitespace(self.chars[i]) != space || self.chars[i] == OBJECT)
                    .unwrap_or(limit);
                if space {
                    let collapsed = self.whitespace == Whitespace::Default
                        && segments.last().is_some_and(|s| s.kind == SegmentKind::Space);
                    let range = if collapsed {
                        // a space run already ends the previous run
                        (start..end)
                            .find(|&i| is_line_separator(self.chars[i]))
                            .map_or(end..end, |i| i..end)
                    } else {
                        start..end
                    };
                    self.split_space(range, run, &mut segments);
                } else {
                    self.split_text(start..end, run, &mut segments);
                }
                start = end;
            }
            run += 1;
        }
        Ok(segments)
    }

    fn split_space(&self, range: Range<usize>, run: usize, segments: &mut Vec<Segment>) {
        let mut start = range.start;
        for i in range.clone() {
            if is_line_separator(self.chars[i]) {
                if start < i {
                    segments.push(self.segment(start..i, SegmentKind::Space, run));
                }
                segments.push(Segment {
                    range: i..i + 1,
                    kind: SegmentKind::HardBreak,
                    advance: 0.0,
                    run,
                });
                start = i + 1;
            }
        }
        if start < range.end {
            segments.push(self.segment(start..range.end, SegmentKind::Space, run));
        }
    }

    fn split_text(&self, range: Range<usize>, run: usize, segments: &mut Vec<Segment>) {
        if self.is_combined(range.start) {
            segments.push(self.segment(range, SegmentKind::Text, run));
            return;
        }
        let mut start = range.start;
        for i in range.start + 1..range.end {
            if is_cjk_ideograph(self.chars[i - 1]) || is_cjk_ideograph(self.chars[i]) {
                segments.push(self.segment(start..i, SegmentKind::Text, run));
                start = i;
            }
        }
        segments.push(self.segment(start..range.end, SegmentKind::Text, run));
    }

    fn segment(&self, range: Range<usize>, kind: SegmentKind, run: usize) -> Segment {
        Segment {
            advance: if kind == SegmentKind::Space {
                self.measure_space(range.clone())
            } else {
                self.measure(range.clone())
            },
            range,
            kind,
            run,
        }
    }

    /// Advance of `range` along the line. Combined text takes one em.
    fn measure(&self, range: Range<usize>) -> f64 {
        if range.is_empty() {
            return 0.0;
        }
        if self.is_combined(range.start) {
            let font = self.font_at(range.start);
            return font.size_on(font.axis());
        }
        self.font_runs(range.clone())
            .iter()
            .map(|(r, font)| {
                font.advances(&self.content.slice(r.clone()), self.is_rotated(r.start))
                    .iter()
                    .sum::<f64>()
            })
            .sum::<f64>()
            + self.letter_spacing(range)
    }

    /// Letter spacing following each spacing character of `range`.
    fn letter_spacing(&self, range: Range<usize>) -> f64 {
        range
            .filter(|&i| !is_whitespace(self.chars[i]) && !is_non_spacing(self.chars[i]))
            .map(|i| self.content.letter_spacing(Some(i)))
            .sum()
    }

    /// The whitespace of `range` as set: under default handling line feeds
    /// become spaces and each run of spaces becomes one.
    fn space_text(&self, range: Range<usize>) -> String {
        let text = self.content.slice(range);
        if self.whitespace != Whitespace::Default {
            return text;
        }
        let mut collapsed = String::with_capacity(text.len());
        for c in text.chars().map(|c| if c == '\n' { ' ' } else { c }) {
            if !(c == ' ' && collapsed.ends_with(' ')) {
                collapsed.push(c);
            }
        }
        collapsed
    }

    fn measure_space(&self, range: Range<usize>) -> f64 {
        if range.is_empty() {
            return 0.0;
        }
        let rotated = self.is_rotated(range.start);
        let font = self.font_at(range.start);
        font.advances(&self.space_text(range), rotated).iter().sum()
    }

    fn is_combined(&self, index: usize) -> bool {
        self.writing_mode.is_vertical()
            && self
                .content
                .combination(Some(index), self.defaults)
                .is_combining()
    }

    fn is_rotated(&self, index: usize) -> bool {
        self.content
            .orientation(Some(index), self.defaults)
            .is_rotated()
    }

    fn font_at(&self, index: usize) -> &Font {
        self.content.font(Some(index)).unwrap_or(&self.font)
    }

    fn font_runs(&self, range: Range<usize>) -> Vec<(Range<usize>, Font)> {
        runs_by(range, |i| self.font_at(i))
            .into_iter()
            .map(|(r, f)| (r, f.clone()))
            .collect()
    }

    // ========== breaking ==========

    fn break_lines(
        &self,
        tree: &mut AreaTree,
        segments: Vec<Segment>,
        measure: f64,
        consume: Consume,
    ) -> Result<Vec<AreaId>, AreaError> {
        let wrap = self.wrap == Wrap::Wrap;
        let mut lines = Vec::new();
        let mut current: Vec<Segment> = Vec::new();
        let mut consumed = 0.0;
        let mut queue: VecDeque<Segment> = segments.into();

        while let Some(segment) = queue.pop_front() {
            match segment.kind {
                SegmentKind::HardBreak => {
                    let number = lines.len() + 1;
                    lines.push(self.emit(tree, &mut current, number, measure, consume)?);
                    consumed = 0.0;
                    continue;
                }
                // leading whitespace never starts a line
                SegmentKind::Space if current.is_empty() && self.whitespace == Whitespace::Default => continue,
                // trailing whitespace may hang past the measure
                SegmentKind::Space => {}
                SegmentKind::Text | SegmentKind::Embedding(_) => {
                    if wrap && consumed + segment.advance > measure {
                        if current.iter().any(|s| s.kind != SegmentKind::Space) {
                            let number = lines.len() + 1;
                            lines.push(self.emit(tree, &mut current, number, measure, consume)?);
                            consumed = 0.0;
                            queue.push_front(segment);
                            continue;
                        }
                        // nothing to break before: break between characters
                        if segment.kind == SegmentKind::Text
                            && segment.range.len() > 1
                            && !self.is_combined(segment.range.start)
                        {
                            let (head, tail) = self.split_to_fit(&segment, measure - consumed);
                            queue.push_front(tail);
                            queue.push_front(head);
                            continue;
                        }
                    }
                }
            }
            consumed += segment.advance;
            current.push(segment);
        }
        if !current.is_empty() {
            let number = lines.len() + 1;
            lines.push(self.emit(tree, &mut current, number, measure, consume)?);
        }
        Ok(lines)
    }

    /// The longest prefix of `segment` within `available`, never less than
    /// one character, and the rest.
    fn split_to_fit(&self, segment: &Segment, available: f64) -> (Segment, Segment) {
        let (start, end) = (segment.range.start, segment.range.end);
        let mut split = start + 1;
        while split < end - 1 && self.measure(start..split + 1) <= available {
            split += 1;
        }
        (
            self.segment(start..split, SegmentKind::Text, segment.run),
            self.segment(split..end, SegmentKind::Text, segment.run),
        )
    }

    fn emit(
        &self,
        tree: &mut AreaTree,
        current: &mut Vec<Segment>,
        number: usize,
        measure: f64,
        consume: Consume,
    ) -> Result<AreaId, AreaError> {
        let mut segments = std::mem::take(current);
        if self.whitespace == Whitespace::Default {
            while segments.last().is_some_and(|s| s.kind == SegmentKind::Space) {
                let _ = segments.pop();
            }
        }
        let consumed: f64 = segments.iter().map(|s| s.advance).sum();
        let ipd = match consume {
            Consume::Max if measure.is_finite() => measure,
            Consume::Max | Consume::Fit => consumed,
        };

        let mut line = LineArea::new(number, self.alignment, self.color, Some(self.font.clone()));
        line.embedding = self.embedding;
        let kind = match self.annotation {
            Some(placement) => AreaKind::Annotation(AnnotationArea {
                line,
                offset: placement.offset,
                position: placement.position,
            }),
            None => AreaKind::Line(line),
        };
        let id = tree.add(Area::new(
            kind,
            Geometry::new(self.writing_mode, ipd, self.line_height, self.level),
            self.content.element(),
        ));
        self.add_text_areas(tree, id, &segments)?;
        // overflowing children must not stretch the line
        tree.get_mut(id)?.geometry.ipd = ipd;
        Ok(id)
    }

    // ========== areas ==========

    /// Consecutive segments of a run share one area, except in annotation
    /// lines where every segment is aligned to its base on its own.
    fn add_text_areas(&self, tree: &mut AreaTree, line: AreaId, segments: &[Segment]) -> Result<(), AreaError> {
        let mut i = 0;
        while i < segments.len() {
            let first = &segments[i];
            let mut j = i + 1;
            if self.annotation.is_none() && matches!(first.kind, SegmentKind::Text | SegmentKind::Space) {
                while j < segments.len() && segments[j].run == first.run && segments[j].kind == first.kind {
                    j += 1;
                }
            }
            let range = first.range.start..segments[j - 1].range.end;
            match first.kind {
                SegmentKind::Space => self.add_space(tree, line, range)?,
                SegmentKind::Text => {
                    if self.annotation.is_none() {
                        self.add_annotations(tree, line, range.clone())?;
                    }
                    self.add_glyphs(tree, line, range)?;
                }
                SegmentKind::Embedding(area) => tree.add_child(line, area, Expansion::ENCLOSE_ALL)?,
                SegmentKind::HardBreak => {}
            }
            i = j;
        }
        Ok(())
    }

    fn add_space(&self, tree: &mut AreaTree, line: AreaId, range: Range<usize>) -> Result<(), AreaError> {
        let advance = self.measure_space(range.clone());
        if advance <= 0.0 {
            return Ok(());
        }
        let level = self.content.bidi_level(Some(range.start), self.level);
        let font = self.font_at(range.start).clone();
        let space = SpaceArea {
            text: self.space_text(range),
            font: Some(font),
        };
        let area = tree.add(Area::new(
            AreaKind::Space(space),
            Geometry::new(self.writing_mode, advance, self.line_height, level),
            None,
        ));
        tree.add_child(line, area, Expansion::ENCLOSE_ALL)
    }

    /// One glyph area per font interval of `range`.
    fn add_glyphs(&self, tree: &mut AreaTree, line: AreaId, range: Range<usize>) -> Result<(), AreaError> {
        let start = range.start;
        let level = self.content.bidi_level(Some(start), self.level);
        let orientation = self.content.orientation(Some(start), self.defaults);
        let combination = self.content.combination(Some(start), self.defaults);
        let combined = self.is_combined(start);
        for (run, font) in self.font_runs(range) {
            let mapping = font.glyph_mapping(
                &self.content.slice(run.clone()),
                self.content.script(Some(run.start), self.defaults),
                self.content.language(Some(run.start), self.defaults),
                orientation,
                combination,
            );
            // combined text is set across the line
            let (bpd, expansion) = if combined {
                (font.size_on(font.axis()), Expansion::ENCLOSE_ALL_CROSS)
            } else {
                (self.line_height, Expansion::ENCLOSE_ALL)
            };
            let ipd = if combined {
                mapping.advance()
            } else {
                mapping.advance() + self.letter_spacing(run.clone())
            };
            let glyphs = GlyphArea {
                decorations: self.decorations(run),
                font,
                mapping,
            };
            let area = tree.add(Area::new(
                AreaKind::Glyph(glyphs),
                Geometry::new(self.writing_mode, ipd, bpd, level),
                None,
            ));
            tree.add_child(line, area, expansion)?;
        }
        Ok(())
    }

    fn decorations(&self, range: Range<usize>) -> Vec<Decoration> {
        let base = range.start;
        let local = |r: Range<usize>| r.start - base..r.end - base;
        let mut decorations: Vec<Decoration> = runs_by(range.clone(), |i| self.content.color(Some(i), self.defaults))
            .into_iter()
            .map(|(r, color)| Decoration::new(local(r), DecorationKind::Color(color)))
            .collect();
        decorations.extend(
            runs_by(range, |i| self.content.outline(Some(i), self.defaults))
                .into_iter()
                .filter(|(_, outline)| !outline.is_none())
                .map(|(r, outline)| Decoration::new(local(r), DecorationKind::Outline(outline))),
        );
        decorations
    }

    /// Lay out the annotations of the base starting at `range` on an
    /// unbounded measure, align them to the base and attach them ahead of
    /// it.
    fn add_annotations(&self, tree: &mut AreaTree, line: AreaId, range: Range<usize>) -> Result<(), AreaError> {
        let starts_base =
            range.start == 0 || self.content.run_limit(range.start - 1, &[StyleAttribute::Annotations]) == range.start;
        let Some(annotations) = self.content.annotations(Some(range.start)).filter(|_| starts_base) else {
            return Ok(());
        };
        let base_font = self.font_at(range.start).clone();
        let base_advances: Vec<f64> = range.clone().map(|i| self.measure(i..i + 1)).collect();
        let base_advance = self.measure(range);
        for annotation in annotations {
            let layout = Self::for_annotation(annotation, &base_font, self.registry, self.defaults, self.level);
            for area in layout.layout(tree, f64::INFINITY, Consume::Fit)? {
                align::align_annotation(tree, area, base_advance, &base_advances)?;
                bidi::reorder(tree, area)?;
                tree.add_child(line, area, Expansion::ENCLOSE_ALL)?;
            }
        }
        Ok(())
    }

    /// An inline block holding the lines of `paragraph`, as wide as its
    /// explicit IPD or else its widest line.
    fn layout_embedding(&self, tree: &mut AreaTree, paragraph: &'a Paragraph) -> Result<AreaId, AreaError> {
        let measure = paragraph.ipd(None);
        let layout = LineLayout::new(paragraph.content(), self.registry, self.defaults).embedded();
        let lines = layout.layout(tree, measure.unwrap_or(f64::INFINITY), Consume::Max)?;
        let block = tree.add(Area::new(
            AreaKind::InlineBlock,
            Geometry::new(self.writing_mode, measure.unwrap_or(0.0), 0.0, self.level),
            paragraph.element(),
        ));
        for line in lines {
            tree.add_child(block, line, Expansion::EXPAND_LINE)?;
        }
        if let Some(bpd) = paragraph.bpd(None) {
            tree.get_mut(block)?.geometry.bpd = bpd;
        }
        Ok(block)
    }
}

/// Maximal runs of `range` over which `key` is unchanged.
fn runs_by<T: PartialEq>(range: Range<usize>, key: impl Fn(usize) -> T) -> Vec<(Range<usize>, T)> {
    let mut runs: Vec<(Range<usize>, T)> = Vec::new();
    for i in range {
        let k = key(i);
        match runs.last_mut() {
            Some((r, last)) if *last == k => r.end = i + 1,
            _ => runs.push((i..i + 1, k)),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_by() {
        let values = [1, 1, 2, 2, 2, 1];
        let runs = runs_by(0..6, |i| values[i]);
        assert_eq!(runs, vec![(0..2, 1), (2..5, 2), (5..6, 1)]);
        assert_eq!(runs_by(3..5, |i| values[i]), vec![(3..5, 2)]);
        assert!(runs_by(0..0, |i| values[i]).is_empty());
    }
}
