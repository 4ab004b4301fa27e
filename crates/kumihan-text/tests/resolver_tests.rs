//! Tests for reading styles off TTML attributes.

use std::path::Path;
use std::sync::Arc;

use kumihan_common::Extent;
use kumihan_dom::{DomTree, NodeId, parse_xml};
use kumihan_fonts::{FontError, FontMetrics, FontRegistry, FontSpecification, FontStyle, FontWeight, MetricsProvider};
use kumihan_text::style::{
    Annotation, AnnotationReserve, BlockAlignment, Color, InlineAlignment, ReservePosition, Whitespace, Wrap,
};
use kumihan_text::{AttributeStyleResolver, Defaults, Phrase, StyleAttribute, StyleResolver, StyleValue};

#[derive(Debug)]
struct Unit;

impl FontMetrics for Unit {
    fn units_per_em(&self) -> f64 {
        1000.0
    }
    fn ascent(&self) -> f64 {
        800.0
    }
    fn descent(&self) -> f64 {
        200.0
    }
    fn line_gap(&self) -> f64 {
        0.0
    }
    fn glyph(&self, c: char) -> u16 {
        c as u16
    }
    fn advance(&self, _c: char, _vertical: bool) -> f64 {
        1000.0
    }
}

struct UnitProvider;

impl MetricsProvider for UnitProvider {
    fn load(&self, _source: &Path) -> Result<Arc<dyn FontMetrics>, FontError> {
        Ok(Arc::new(Unit))
    }
}

fn registry() -> FontRegistry {
    FontRegistry::with_specifications(
        vec![
            FontSpecification::new("Noto Sans", FontStyle::Normal, FontWeight::Normal, "", "sans.ttf"),
            FontSpecification::new("Noto Sans", FontStyle::Normal, FontWeight::Bold, "", "sans-bold.ttf"),
            FontSpecification::new("Serif", FontStyle::Italic, FontWeight::Normal, "", "serif-italic.ttf"),
        ],
        Arc::new(UnitProvider),
    )
}

fn resolver() -> AttributeStyleResolver {
    AttributeStyleResolver::new(registry(), Defaults::default())
}

fn document(content: &str) -> DomTree {
    parse_xml(&format!(
        "<tt xmlns=\"http://www.w3.org/ns/ttml\" xmlns:tts=\"http://www.w3.org/ns/ttml#styling\">\
         <body><div>{content}</div></body></tt>"
    ))
    .expect("well-formed document")
}

fn span(doc: &DomTree) -> NodeId {
    doc.tt_elements("p")
        .first()
        .and_then(|&p| doc.child_elements(p).next())
        .expect("a span")
}

/// Computed span styles gathered into a phrase for typed lookups.
fn computed(doc: &DomTree, element: NodeId) -> Phrase {
    Phrase::new(None, "x", resolver().span_styles(doc, element, None))
}

// ========== classification ==========

#[test]
fn test_annotation_roles() {
    let doc = document(
        "<p><span tts:ruby=\"container\"/><span tts:ruby=\"baseContainer\"/>\
         <span tts:textEmphasis=\"auto\"/><span tts:textEmphasis=\"none\"/><span tts:ruby=\"bogus\"/></p>",
    );
    let r = resolver();
    let p = doc.tt_elements("p")[0];
    let roles: Vec<Option<Annotation>> = doc.child_elements(p).map(|s| r.annotation(&doc, s)).collect();
    assert_eq!(
        roles,
        vec![
            Some(Annotation::Container),
            Some(Annotation::BaseContainer),
            Some(Annotation::Emphasis),
            None,
            None,
        ]
    );
    assert_eq!(r.annotation(&doc, p), None);
}

#[test]
fn test_annotation_and_inline_block_predicates() {
    let doc = document("<p><span tts:ruby=\"base\"/><span tts:ipd=\"10px\"/><span/></p>");
    let r = resolver();
    let p = doc.tt_elements("p")[0];
    let spans: Vec<NodeId> = doc.child_elements(p).collect();
    assert!(!r.generates_annotation_block(&doc, spans[0]));
    assert!(r.generates_inline_block(&doc, spans[1]));
    assert!(!r.generates_inline_block(&doc, spans[2]));
}

// ========== fonts ==========

#[test]
fn test_font_family_list_and_weight() {
    let doc = document("<p><span tts:fontFamily=\"'Missing', default\" tts:fontWeight=\"bold\">a</span></p>");
    let phrase = computed(&doc, span(&doc));
    let font = phrase.font(None).expect("computed font");
    assert_eq!(font.key().family, "noto sans");
    assert_eq!(font.weight(), FontWeight::Bold);
    assert_eq!(font.source(), Some(Path::new("sans-bold.ttf")));
}

#[test]
fn test_font_style_best_match() {
    let doc = document("<p><span tts:fontFamily=\"Serif\" tts:fontStyle=\"italic\">a</span></p>");
    let phrase = computed(&doc, span(&doc));
    assert_eq!(phrase.font(None).map(|f| f.style()), Some(FontStyle::Italic));
}

#[test]
fn test_anamorphic_font_size_and_language() {
    let doc = document("<p xml:lang=\"ja\"><span tts:fontSize=\"20px 30px\">a</span></p>");
    let phrase = computed(&doc, span(&doc));
    let font = phrase.font(None).expect("computed font");
    assert_eq!(font.size(), Extent::new(20.0, 30.0));
    assert_eq!(phrase.language(None, &Defaults::default()), "ja");
}

#[test]
fn test_specified_styles_omit_inherited_values() {
    let doc = document("<p tts:color=\"white\"><span tts:wrapOption=\"noWrap\">a</span></p>");
    let r = resolver();
    let styles = r.span_styles(&doc, span(&doc), Some(0..1));
    let attributes: Vec<StyleAttribute> = styles.iter().map(|s| s.attribute).collect();
    assert_eq!(attributes, vec![StyleAttribute::Wrap]);

    let phrase = computed(&doc, span(&doc));
    let defaults = Defaults::default();
    assert_eq!(phrase.color(None, &defaults), Color::WHITE);
    assert_eq!(phrase.wrap(None, &defaults), Wrap::NoWrap);
}

// ========== values ==========

#[test]
fn test_line_height_and_outline() {
    let doc = document(
        "<p><span tts:fontSize=\"40px\" tts:lineHeight=\"normal\" tts:textOutline=\"black 10%\">a</span></p>",
    );
    let phrase = computed(&doc, span(&doc));
    let defaults = Defaults::default();
    assert_eq!(phrase.line_height(None, &defaults, None), 50.0);
    let outline = phrase.outline(None, &defaults);
    assert_eq!(outline.color, Some(Color::BLACK));
    assert_eq!(outline.thickness, 4.0);
}

#[test]
fn test_paragraph_only_styles() {
    let doc = document("<p tts:rubyReserve=\"both 6px\" tts:displayAlign=\"center\" tts:textAlign=\"end\">a</p>");
    let r = resolver();
    let p = doc.tt_elements("p")[0];
    let phrase = Phrase::new(None, "a", r.paragraph_styles(&doc, p));
    let defaults = Defaults::default();
    assert_eq!(
        phrase.annotation_reserve(None, &defaults),
        AnnotationReserve::new(ReservePosition::Both, Some(6.0))
    );
    assert_eq!(phrase.block_alignment(None, &defaults), BlockAlignment::Center);
    assert_eq!(phrase.text_align(None, &defaults), InlineAlignment::End);
}

#[test]
fn test_invalid_values_are_ignored() {
    let doc = document("<p><span tts:color=\"nope\" tts:lineHeight=\"tall\" tts:textAlign=\"middle\">a</span></p>");
    let r = resolver();
    let styles = r.span_styles(&doc, span(&doc), Some(0..1));
    assert!(styles.is_empty());
}

#[test]
fn test_emphasis_styles_follow_base() {
    let doc = document("<p><span tts:color=\"red\" tts:textOutline=\"2px\">a</span></p>");
    let r = resolver();
    let base = computed(&doc, span(&doc));
    let emphasis = kumihan_text::style::Emphasis {
        style: kumihan_text::style::EmphasisStyle::Auto,
        ..kumihan_text::style::Emphasis::NONE
    };
    let styles = r.emphasis_styles(&base, &emphasis);
    let mark = Phrase::new(None, "x", styles);
    let defaults = Defaults::default();
    assert_eq!(mark.color(None, &defaults), Color::rgb(255, 0, 0));
    assert_eq!(mark.outline(None, &defaults).thickness, 2.0);
    assert_eq!(mark.font(None).map(|f| f.size().height), Some(12.0));
    assert!(matches!(
        mark.value(StyleAttribute::AnnotationPosition, None),
        Some(StyleValue::Position(_))
    ));
}

// ========== configuration ==========

#[test]
fn test_defaults_read_from_configuration() {
    let defaults: Defaults =
        serde_json::from_str(r#"{"wrap": "noWrap", "whitespace": "preserve", "line_height": 40.0}"#)
            .expect("valid defaults");
    assert_eq!(defaults.wrap, Wrap::NoWrap);
    assert_eq!(defaults.whitespace, Whitespace::Preserve);
    assert_eq!(defaults.line_height, 40.0);
    assert_eq!(defaults.text_align, Defaults::default().text_align);
    assert_eq!(defaults.font_families, Defaults::default().font_families);
}
