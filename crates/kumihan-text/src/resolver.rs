//! Style extraction from document elements.
//!
//! Collectors never read attributes themselves; they ask a
//! [`StyleResolver`]. [`AttributeStyleResolver`] reads TTML styling
//! attributes directly off the tree.
//!
//! Styles of a span embedded in surrounding text are its *specified*
//! styles: the enclosing spans contribute their own intervals underneath.
//! Styles of a standalone phrase (paragraph, ruby base, ruby text) are
//! *computed*: inherited values are looked up through the ancestors.

use std::ops::Range;
use std::str::FromStr;

use kumihan_common::characters::{LRE, LRO, PDF, RLE, RLO, is_upright_in_vertical};
use kumihan_common::warning::warn_once;
use kumihan_common::{Dimension, Extent};
use kumihan_dom::{DomTree, NodeId, TTS_NAMESPACE, XML_NAMESPACE};
use kumihan_fonts::{Combination, CombinationStyle, Font, FontFeature, FontKerning, FontRegistry, FontStyle, FontWeight, Orientation};
use unicode_bidi::{BidiInfo, Level};

use crate::phrase::Phrase;
use crate::style::{
    Annotation, AnnotationOverflow, AnnotationOverhang, AnnotationOverhangClass, AnnotationPosition,
    AnnotationReserve, BlockAlignment, Color, Defaults, Emphasis, EmphasisPosition, EmphasisStyle,
    InlineAlignment, Length, LengthUnit, Outline, ReservePosition, StyleAttribute, StyleAttributeInterval, StyleValue,
    Whitespace, Wrap,
};

/// The seam between collectors and the styling vocabulary.
pub trait StyleResolver {
    /// Fallback values.
    fn defaults(&self) -> &Defaults;

    /// The ruby role of `element`, or emphasis.
    fn annotation(&self, doc: &DomTree, element: NodeId) -> Option<Annotation>;

    /// True when `element` is collected as a whole annotated phrase.
    fn generates_annotation_block(&self, doc: &DomTree, element: NodeId) -> bool {
        matches!(
            self.annotation(doc, element),
            Some(Annotation::Container | Annotation::Emphasis)
        )
    }

    /// True when `element` lays out as its own nested paragraph.
    fn generates_inline_block(&self, doc: &DomTree, element: NodeId) -> bool;

    /// Bidi control characters to place around `element`'s content.
    fn bidi_controls(&self, doc: &DomTree, element: NodeId) -> Option<(char, char)>;

    /// Whole-run styles of a paragraph.
    fn paragraph_styles(&self, doc: &DomTree, element: NodeId) -> Vec<StyleAttributeInterval>;

    /// Styles of a span over `range` of the text being collected, or of a
    /// standalone phrase when `range` is `None`.
    fn span_styles(&self, doc: &DomTree, element: NodeId, range: Option<Range<usize>>)
    -> Vec<StyleAttributeInterval>;

    /// Whole-run styles of an annotation text annotating `base`.
    fn annotation_styles(
        &self,
        doc: &DomTree,
        element: NodeId,
        base: Option<NodeId>,
    ) -> Vec<StyleAttributeInterval> {
        let _ = base;
        self.span_styles(doc, element, None)
    }

    /// Whole-run styles of an emphasis mark synthesized over `base`.
    fn emphasis_styles(&self, base: &Phrase, emphasis: &Emphasis) -> Vec<StyleAttributeInterval>;

    /// Styles derived from the characters of `text`: bidi levels and
    /// glyph orientation.
    fn content_styles(&self, doc: &DomTree, element: NodeId, text: &str) -> Vec<StyleAttributeInterval>;
}

const FONT_ATTRIBUTES: [&str; 6] = [
    "fontFamily",
    "fontSize",
    "fontStyle",
    "fontWeight",
    "fontKerning",
    "fontShear",
];

/// Rows in the default cell resolution.
const CELL_ROWS: f64 = 15.0;

/// Reads `tts:*`, `xml:lang` and `xml:space` attributes.
#[derive(Debug, Clone)]
pub struct AttributeStyleResolver {
    registry: FontRegistry,
    defaults: Defaults,
    cell: f64,
}

impl AttributeStyleResolver {
    /// A resolver mapping fonts through `registry`. Cell units resolve
    /// against a 720 pixel high root container until
    /// [`with_extent`](Self::with_extent) says otherwise.
    #[must_use]
    pub fn new(registry: FontRegistry, defaults: Defaults) -> Self {
        Self {
            registry,
            defaults,
            cell: 720.0 / CELL_ROWS,
        }
    }

    /// Resolve cell units against a root container of `extent`.
    #[must_use]
    pub fn with_extent(mut self, extent: Extent) -> Self {
        self.cell = extent.height / CELL_ROWS;
        self
    }

    /// The registry fonts are mapped through.
    #[must_use]
    pub const fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    fn lookup<'d>(doc: &'d DomTree, element: NodeId, name: &str, computed: bool) -> Option<&'d str> {
        if computed {
            doc.inherited_attribute(element, Some(TTS_NAMESPACE), name)
        } else {
            doc.attribute(element, Some(TTS_NAMESPACE), name)
        }
    }

    fn keyword<T: FromStr>(doc: &DomTree, element: NodeId, name: &str, computed: bool) -> Option<T> {
        let value = Self::lookup(doc, element, name, computed)?;
        let parsed = value.trim().parse().ok();
        if parsed.is_none() {
            warn_unknown(name, value);
        }
        parsed
    }

    fn language(doc: &DomTree, element: NodeId, computed: bool) -> Option<&str> {
        if computed {
            doc.inherited_attribute(element, Some(XML_NAMESPACE), "lang")
        } else {
            doc.attribute(element, Some(XML_NAMESPACE), "lang")
        }
    }

    /// Computed font size: specified sizes resolve against the parent's.
    fn font_size(&self, doc: &DomTree, element: NodeId) -> Extent {
        let parent = doc
            .ancestors(element)
            .find(|&a| doc.as_element(a).is_some());
        let Some(value) = doc.attribute(element, Some(TTS_NAMESPACE), "fontSize") else {
            return parent.map_or(self.defaults.font_size, |p| self.font_size(doc, p));
        };
        let reference = parent.map_or(self.defaults.font_size, |p| self.font_size(doc, p));
        match Length::parse_list(value).as_deref() {
            Some([size]) => {
                let h = size.resolve(reference.height, self.cell);
                Extent::new(h, h)
            }
            Some([w, h]) => Extent::new(
                w.resolve(reference.width, self.cell),
                h.resolve(reference.height, self.cell),
            ),
            _ => {
                warn_unknown("fontSize", value);
                reference
            }
        }
    }

    fn font_families(&self, doc: &DomTree, element: NodeId) -> Vec<String> {
        let Some(value) = Self::lookup(doc, element, "fontFamily", true) else {
            return self.defaults.font_families.clone();
        };
        let mut families = Vec::new();
        for family in split_outside(value, ',') {
            let family = family.trim().trim_matches(|c| c == '"' || c == '\'').trim();
            if family.is_empty() {
                continue;
            }
            if family.eq_ignore_ascii_case("default") {
                families.extend(self.defaults.font_families.iter().cloned());
            } else {
                families.push(family.to_string());
            }
        }
        if families.is_empty() {
            self.defaults.font_families.clone()
        } else {
            families
        }
    }

    /// The computed font of `element`, sized `size` when given.
    #[allow(clippy::float_cmp)]
    fn font(&self, doc: &DomTree, element: NodeId, size: Option<Extent>) -> Font {
        let families = self.font_families(doc, element);
        let style = Self::keyword(doc, element, "fontStyle", true).unwrap_or(self.defaults.font_style);
        let weight = Self::keyword(doc, element, "fontWeight", true).unwrap_or(self.defaults.font_weight);
        let size = size.unwrap_or_else(|| self.font_size(doc, element));
        let language = Self::language(doc, element, true).unwrap_or(&self.defaults.language);

        let mut features = Vec::new();
        let kerning: FontKerning =
            Self::keyword(doc, element, "fontKerning", true).unwrap_or(self.defaults.font_kerning);
        if kerning != FontKerning::Normal {
            features.push(FontFeature::kerning(kerning));
        }
        if let Some(shear) = Self::lookup(doc, element, "fontShear", true) {
            match Length::parse(shear) {
                Some(l) if l.unit == LengthUnit::Percentage => {
                    if l.value != 0.0 {
                        features.push(FontFeature::shear(l.value / 100.0));
                    }
                }
                _ => warn_unknown("fontShear", shear),
            }
        }
        self.map_font(&families, style, weight, language, size, &features)
    }

    fn map_font(
        &self,
        families: &[String],
        style: FontStyle,
        weight: FontWeight,
        language: &str,
        size: Extent,
        features: &[FontFeature],
    ) -> Font {
        let axis = self.defaults.writing_mode.axis(Dimension::Ipd);
        self.registry
            .map_font(families, style, weight, language, axis, size, features)
            .unwrap_or_else(|| self.registry.default_font(axis, size))
    }

    /// Styles shared by spans, paragraphs and annotations.
    fn common_styles(
        &self,
        doc: &DomTree,
        element: NodeId,
        computed: bool,
        font_size: Option<Extent>,
    ) -> Vec<(StyleAttribute, StyleValue)> {
        let mut styles = Vec::new();

        if let Some(value) = Self::lookup(doc, element, "color", computed) {
            match Color::from_str(value) {
                Ok(c) => styles.push((StyleAttribute::Color, StyleValue::Color(c))),
                Err(_) => warn_unknown("color", value),
            }
        }

        let specifies_font = font_size.is_some()
            || FONT_ATTRIBUTES
                .iter()
                .any(|a| doc.attribute(element, Some(TTS_NAMESPACE), a).is_some());
        let font = (computed || specifies_font).then(|| self.font(doc, element, font_size));
        let em = font.as_ref().map_or_else(|| self.font_size(doc, element).height, |f| f.size().height);

        if let Some(value) = Self::lookup(doc, element, "lineHeight", computed) {
            let line_height = if value.trim() == "normal" {
                Some(self.font_size(doc, element).height * 1.25)
            } else {
                Length::parse(value).map(|l| l.resolve(em, self.cell))
            };
            match line_height {
                Some(v) => styles.push((StyleAttribute::LineHeight, StyleValue::Length(v))),
                None => warn_unknown("lineHeight", value),
            }
        }
        if let Some(font) = font {
            styles.push((StyleAttribute::Font, StyleValue::Font(font)));
        }

        if let Some(v) = Self::keyword::<InlineAlignment>(doc, element, "textAlign", computed) {
            styles.push((StyleAttribute::InlineAlignment, StyleValue::Alignment(v)));
        }
        if let Some(value) = Self::lookup(doc, element, "textCombine", computed) {
            match parse_combination(value) {
                Some(c) => styles.push((StyleAttribute::Combination, StyleValue::Combination(c))),
                None => warn_unknown("textCombine", value),
            }
        }
        if let Some(value) = Self::lookup(doc, element, "textEmphasis", computed) {
            match parse_emphasis(value) {
                Some(e) => styles.push((StyleAttribute::Emphasis, StyleValue::Emphasis(e))),
                None => warn_unknown("textEmphasis", value),
            }
        }
        if let Some(value) = Self::lookup(doc, element, "textOutline", computed) {
            match parse_outline(value, em, self.cell) {
                Some(o) => styles.push((StyleAttribute::Outline, StyleValue::Outline(o))),
                None => warn_unknown("textOutline", value),
            }
        }
        if let Some(v) = Self::keyword::<Wrap>(doc, element, "wrapOption", computed) {
            styles.push((StyleAttribute::Wrap, StyleValue::Wrap(v)));
        }
        if let Some(lang) = Self::language(doc, element, computed) {
            styles.push((StyleAttribute::Language, StyleValue::Text(lang.to_string())));
        }
        let space = if computed {
            doc.inherited_attribute(element, Some(XML_NAMESPACE), "space")
        } else {
            doc.attribute(element, Some(XML_NAMESPACE), "space")
        };
        if let Some(value) = space {
            match Whitespace::from_str(value) {
                Ok(w) => styles.push((StyleAttribute::Whitespace, StyleValue::Whitespace(w))),
                Err(_) => warn_unknown("space", value),
            }
        }

        // ruby styling inherits
        if let Some(v) = Self::keyword::<InlineAlignment>(doc, element, "rubyAlign", computed) {
            styles.push((StyleAttribute::AnnotationAlignment, StyleValue::Alignment(v)));
        }
        if let Some(value) = Self::lookup(doc, element, "rubyOffset", computed) {
            let offset = if value.trim() == "auto" {
                Some(0.0)
            } else {
                Length::parse(value).map(|l| l.resolve(em, self.cell))
            };
            match offset {
                Some(v) => styles.push((StyleAttribute::AnnotationOffset, StyleValue::Length(v))),
                None => warn_unknown("rubyOffset", value),
            }
        }
        if let Some(v) = Self::keyword::<AnnotationOverflow>(doc, element, "rubyOverflow", computed) {
            styles.push((StyleAttribute::AnnotationOverflow, StyleValue::Overflow(v)));
        }
        if let Some(v) = Self::keyword::<AnnotationOverhang>(doc, element, "rubyOverhang", computed) {
            styles.push((StyleAttribute::AnnotationOverhang, StyleValue::Overhang(v)));
        }
        if let Some(v) = Self::keyword::<AnnotationOverhangClass>(doc, element, "rubyOverhangClass", computed) {
            styles.push((StyleAttribute::AnnotationOverhangClass, StyleValue::OverhangClass(v)));
        }
        if let Some(v) = Self::keyword::<AnnotationPosition>(doc, element, "rubyPosition", computed) {
            styles.push((StyleAttribute::AnnotationPosition, StyleValue::Position(v)));
        }

        if let Some(value) = Self::lookup(doc, element, "letterSpacing", computed).filter(|v| v.trim() != "normal") {
            match Length::parse(value) {
                Some(l) => styles.push((StyleAttribute::LetterSpacing, StyleValue::Length(l.resolve(em, self.cell)))),
                None => warn_unknown("letterSpacing", value),
            }
        }

        // never inherited
        for (name, attribute) in [("ipd", StyleAttribute::Ipd), ("bpd", StyleAttribute::Bpd)] {
            if let Some(value) = Self::lookup(doc, element, name, false) {
                if value.trim() == "auto" {
                    continue;
                }
                match Length::parse(value) {
                    Some(l) => styles.push((attribute, StyleValue::Length(l.resolve(em, self.cell)))),
                    None => warn_unknown(name, value),
                }
            }
        }
        styles
    }

    fn direction(doc: &DomTree, element: NodeId) -> Option<bool> {
        match Self::lookup(doc, element, "direction", true)?.trim() {
            "rtl" => Some(true),
            "ltr" => Some(false),
            other => {
                warn_unknown("direction", other);
                None
            }
        }
    }
}

impl StyleResolver for AttributeStyleResolver {
    fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    fn annotation(&self, doc: &DomTree, element: NodeId) -> Option<Annotation> {
        if !doc.is_tt_element(element, "span") {
            return None;
        }
        if let Some(value) = doc.attribute(element, Some(TTS_NAMESPACE), "ruby") {
            return match value.trim() {
                "none" => None,
                v => match Annotation::from_str(v) {
                    Ok(Annotation::Emphasis) | Err(_) => {
                        warn_unknown("ruby", value);
                        None
                    }
                    Ok(a) => Some(a),
                },
            };
        }
        doc.attribute(element, Some(TTS_NAMESPACE), "textEmphasis")
            .and_then(parse_emphasis)
            .filter(|e| !e.is_none())
            .map(|_| Annotation::Emphasis)
    }

    fn generates_inline_block(&self, doc: &DomTree, element: NodeId) -> bool {
        doc.is_tt_element(element, "span")
            && ["textAlign", "ipd", "bpd"]
                .iter()
                .any(|a| doc.attribute(element, Some(TTS_NAMESPACE), a).is_some())
    }

    fn bidi_controls(&self, doc: &DomTree, element: NodeId) -> Option<(char, char)> {
        let bidi = doc.attribute(element, Some(TTS_NAMESPACE), "unicodeBidi")?.trim();
        let rtl = Self::direction(doc, element)?;
        let open = match (bidi, rtl) {
            ("embed", false) => LRE,
            ("embed", true) => RLE,
            ("bidiOverride", false) => LRO,
            ("bidiOverride", true) => RLO,
            _ => return None,
        };
        Some((open, PDF))
    }

    fn paragraph_styles(&self, doc: &DomTree, element: NodeId) -> Vec<StyleAttributeInterval> {
        let mut styles = self.common_styles(doc, element, true, None);
        if let Some(value) = Self::lookup(doc, element, "rubyReserve", true) {
            let em = self.font_size(doc, element).height;
            match parse_reserve(value, em, self.cell) {
                Some(r) => styles.push((StyleAttribute::AnnotationReserve, StyleValue::Reserve(r))),
                None => warn_unknown("rubyReserve", value),
            }
        }
        if let Some(v) = Self::keyword::<BlockAlignment>(doc, element, "displayAlign", false) {
            styles.push((StyleAttribute::BlockAlignment, StyleValue::BlockAlignment(v)));
        }
        styles
            .into_iter()
            .map(|(a, v)| StyleAttributeInterval::outer(a, v))
            .collect()
    }

    fn span_styles(
        &self,
        doc: &DomTree,
        element: NodeId,
        range: Option<Range<usize>>,
    ) -> Vec<StyleAttributeInterval> {
        let computed = range.is_none();
        self.common_styles(doc, element, computed, None)
            .into_iter()
            .map(|(a, v)| StyleAttributeInterval {
                attribute: a,
                value: v,
                range: range.clone(),
            })
            .collect()
    }

    fn annotation_styles(
        &self,
        doc: &DomTree,
        element: NodeId,
        base: Option<NodeId>,
    ) -> Vec<StyleAttributeInterval> {
        let size = match base {
            Some(b) if doc.attribute(element, Some(TTS_NAMESPACE), "fontSize").is_none() => {
                Some(self.font_size(doc, b).scaled(0.5))
            }
            _ => None,
        };
        self.common_styles(doc, element, true, size)
            .into_iter()
            .map(|(a, v)| StyleAttributeInterval::outer(a, v))
            .collect()
    }

    fn emphasis_styles(&self, base: &Phrase, emphasis: &Emphasis) -> Vec<StyleAttributeInterval> {
        let defaults = &self.defaults;
        let mut styles = vec![
            StyleAttributeInterval::outer(
                StyleAttribute::AnnotationPosition,
                StyleValue::Position(emphasis.annotation_position()),
            ),
            StyleAttributeInterval::outer(
                StyleAttribute::Color,
                StyleValue::Color(emphasis.color.unwrap_or_else(|| base.color(None, defaults))),
            ),
        ];
        let outline = base.outline(None, defaults);
        if !outline.is_none() {
            styles.push(StyleAttributeInterval::outer(StyleAttribute::Outline, StyleValue::Outline(outline)));
        }
        if let Some(font) = base.font(None) {
            styles.push(StyleAttributeInterval::outer(
                StyleAttribute::Font,
                StyleValue::Font(self.registry.scaled_font(font, 0.5)),
            ));
        }
        styles
    }

    fn content_styles(&self, doc: &DomTree, element: NodeId, text: &str) -> Vec<StyleAttributeInterval> {
        let mut styles = Vec::new();
        let writing_mode = self.defaults.writing_mode;

        if writing_mode.is_vertical() {
            let rotated: Vec<bool> = text.chars().map(|c| !is_upright_in_vertical(c)).collect();
            for run in runs(&rotated) {
                if rotated[run.start] {
                    styles.push(StyleAttributeInterval::new(
                        StyleAttribute::Orientation,
                        StyleValue::Orientation(Orientation::Rotate090),
                        run,
                    ));
                }
            }
        }

        let base_level = if writing_mode.is_vertical() {
            0
        } else {
            match Self::direction(doc, element) {
                Some(rtl) => u8::from(rtl),
                None => writing_mode.default_bidi_level(),
            }
        };
        let info = BidiInfo::new(text, Some(if base_level == 1 { Level::rtl() } else { Level::ltr() }));
        let levels: Vec<u8> = text
            .char_indices()
            .map(|(i, _)| info.levels.get(i).map_or(base_level, |l| l.number()))
            .collect();
        if levels.iter().any(|&l| l > 0) {
            for run in runs(&levels) {
                styles.push(StyleAttributeInterval::new(
                    StyleAttribute::Bidi,
                    StyleValue::Level(levels[run.start]),
                    run,
                ));
            }
        }
        styles
    }
}

fn warn_unknown(name: &str, value: &str) {
    warn_once("Style", &format!("ignoring invalid value '{value}' for '{name}'"));
}

/// Maximal runs of equal values.
fn runs<T: PartialEq>(values: &[T]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = 0;
    for i in 1..=values.len() {
        if i == values.len() || values[i] != values[start] {
            if start < i {
                out.push(start..i);
            }
            start = i;
        }
    }
    out
}

/// Split on `separator` outside quotes and parentheses.
fn split_outside(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && (c == separator || (separator == ' ' && c.is_whitespace())) => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts.retain(|p| !p.trim().is_empty() || separator != ' ');
    parts
}

fn tokens(s: &str) -> Vec<&str> {
    split_outside(s.trim(), ' ')
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// `none | all | digits [<integer>]`
fn parse_combination(value: &str) -> Option<Combination> {
    match tokens(value).as_slice() {
        ["none"] => Some(Combination::NONE),
        ["all"] => Some(Combination::ALL),
        ["digits"] => Some(Combination {
            style: CombinationStyle::Digits,
            count: 2,
        }),
        ["digits", n] => n.parse().ok().map(|count| Combination {
            style: CombinationStyle::Digits,
            count,
        }),
        _ => None,
    }
}

/// `none | [<style> || <color> || <position>]` where a style is `auto`,
/// a shape keyword pair, or a quoted string.
fn parse_emphasis(value: &str) -> Option<Emphasis> {
    let tokens = tokens(value);
    if tokens == ["none"] {
        return Some(Emphasis::NONE);
    }
    let mut emphasis = Emphasis {
        style: EmphasisStyle::Auto,
        ..Emphasis::NONE
    };
    for token in tokens {
        if let Some(text) = token
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .or_else(|| token.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')))
        {
            emphasis.style = EmphasisStyle::Text;
            emphasis.text = text.to_string();
        } else if let Ok(position) = EmphasisPosition::from_str(token) {
            emphasis.position = position;
        } else if matches!(token, "filled" | "open" | "circle" | "dot" | "sesame") {
            emphasis.style = EmphasisStyle::Auto;
        } else if token == "current" {
            emphasis.color = None;
        } else {
            emphasis.color = Some(Color::from_str(token).ok()?);
        }
    }
    Some(emphasis)
}

/// `none | [<color>] <thickness> [<blur>]`
fn parse_outline(value: &str, em: f64, cell: f64) -> Option<Outline> {
    let tokens = tokens(value);
    if tokens == ["none"] {
        return Some(Outline::NONE);
    }
    let (color, lengths) = match tokens.split_first() {
        Some((first, rest)) if Length::parse(first).is_none() => (Some(Color::from_str(first).ok()?), rest),
        _ => (None, tokens.as_slice()),
    };
    let lengths: Vec<f64> = lengths
        .iter()
        .map(|t| Length::parse(t).map(|l| l.resolve(em, cell)))
        .collect::<Option<_>>()?;
    match lengths.as_slice() {
        [thickness] => Some(Outline {
            color,
            thickness: *thickness,
            blur: 0.0,
        }),
        [thickness, blur] => Some(Outline {
            color,
            thickness: *thickness,
            blur: *blur,
        }),
        _ => None,
    }
}

/// `none | <position> [<length>]`
fn parse_reserve(value: &str, em: f64, cell: f64) -> Option<AnnotationReserve> {
    match tokens(value).as_slice() {
        ["none"] => Some(AnnotationReserve::NONE),
        [position] => Some(AnnotationReserve::new(ReservePosition::from_str(position).ok()?, None)),
        [position, length] => Some(AnnotationReserve::new(
            ReservePosition::from_str(position).ok()?,
            Some(Length::parse(length)?.resolve(em, cell)),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs() {
        assert_eq!(runs(&[0, 0, 1, 1, 0]), vec![0..2, 2..4, 4..5]);
        assert!(runs::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_tokens_keep_functions_together() {
        assert_eq!(tokens(" rgb(1, 2, 3)  2px "), vec!["rgb(1, 2, 3)", "2px"]);
        assert_eq!(split_outside("'A, B', C", ','), vec!["'A, B'", " C"]);
    }

    #[test]
    fn test_parse_emphasis() {
        let e = parse_emphasis("'※' red after").unwrap();
        assert_eq!(e.style, EmphasisStyle::Text);
        assert_eq!(e.text, "※");
        assert_eq!(e.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(e.position, EmphasisPosition::After);
        assert!(parse_emphasis("none").unwrap().is_none());
        assert_eq!(parse_emphasis("filled circle").map(|e| e.style), Some(EmphasisStyle::Auto));
        assert!(parse_emphasis("bogus").is_none());
    }

    #[test]
    fn test_parse_outline_and_reserve() {
        let o = parse_outline("black 2px 1px", 24.0, 48.0).unwrap();
        assert_eq!(o.color, Some(Color::BLACK));
        assert_eq!((o.thickness, o.blur), (2.0, 1.0));
        assert_eq!(parse_outline("0.1em", 20.0, 48.0).map(|o| o.thickness), Some(2.0));
        assert!(parse_outline("none", 24.0, 48.0).unwrap().is_none());

        let r = parse_reserve("outside 10px", 24.0, 48.0).unwrap();
        assert_eq!(r, AnnotationReserve::new(ReservePosition::Outside, Some(10.0)));
        assert_eq!(parse_reserve("both", 24.0, 48.0).map(|r| r.reserve), Some(None));
        assert!(parse_reserve("sideways", 24.0, 48.0).is_none());
    }

    #[test]
    fn test_parse_combination() {
        assert_eq!(parse_combination("all"), Some(Combination::ALL));
        assert_eq!(parse_combination("digits 3").map(|c| c.count), Some(3));
        assert_eq!(parse_combination("some"), None);
    }
}
