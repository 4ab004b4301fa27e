//! Tests for phrase, annotation and paragraph collection.

use kumihan_common::WritingMode;
use kumihan_common::characters::{LINE_SEPARATOR, OBJECT, PDF, RLO, SESAME_DOT};
use kumihan_dom::{DomTree, NodeId, parse_xml};
use kumihan_fonts::{FontRegistry, Orientation};
use kumihan_text::style::{AnnotationPosition, Color, InlineAlignment};
use kumihan_text::{
    AnnotationCollector, AttributeStyleResolver, Defaults, ParagraphCollector, PhraseCollector, PhraseKind,
    StyleAttribute,
};

fn document(content: &str) -> DomTree {
    parse_xml(&format!(
        "<tt xmlns=\"http://www.w3.org/ns/ttml\" xmlns:tts=\"http://www.w3.org/ns/ttml#styling\">\
         <body><div>{content}</div></body></tt>"
    ))
    .expect("well-formed document")
}

fn resolver() -> AttributeStyleResolver {
    AttributeStyleResolver::new(FontRegistry::default(), Defaults::default())
}

fn vertical_resolver() -> AttributeStyleResolver {
    let defaults = Defaults {
        writing_mode: WritingMode::Tbrl,
        ..Defaults::default()
    };
    AttributeStyleResolver::new(FontRegistry::default(), defaults)
}

fn first(doc: &DomTree, name: &str) -> NodeId {
    doc.tt_elements(name)[0]
}

const RED: Color = Color::rgb(255, 0, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

// ========== phrases ==========

#[test]
fn test_span_styles_land_on_span_range() {
    let doc = document("<p>A<span tts:color=\"red\">BC</span>D</p>");
    let r = resolver();
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));

    assert_eq!(phrases.len(), 1);
    let p = &phrases[0];
    assert_eq!(p.text(), "ABCD");
    let defaults = Defaults::default();
    assert_eq!(p.color(Some(1), &defaults), RED);
    assert_eq!(p.color(Some(2), &defaults), RED);
    assert_eq!(p.color(Some(0), &defaults), defaults.color);
    assert_eq!(p.color(Some(3), &defaults), defaults.color);
    assert_eq!(
        p.interval_at(StyleAttribute::Color, 1).and_then(|i| i.range.clone()),
        Some(1..3)
    );
}

#[test]
fn test_inner_span_overrides_outer() {
    let doc = document("<p><span tts:color=\"red\">a<span tts:color=\"blue\">b</span>c</span></p>");
    let r = resolver();
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));
    let defaults = Defaults::default();

    assert_eq!(phrases.len(), 1);
    let colors: Vec<Color> = (0..3).map(|i| phrases[0].color(Some(i), &defaults)).collect();
    assert_eq!(colors, vec![RED, BLUE, RED]);
}

#[test]
fn test_break_emits_and_open_span_continues() {
    let doc = document("<p><span tts:color=\"red\">a<br/>b</span>c</p>");
    let r = resolver();
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));
    let defaults = Defaults::default();

    assert_eq!(phrases.len(), 2);
    assert_eq!(phrases[0].text(), format!("a{LINE_SEPARATOR}"));
    assert_eq!(phrases[1].text(), "bc");
    assert_eq!(phrases[0].color(Some(1), &defaults), RED);
    assert_eq!(phrases[1].color(Some(0), &defaults), RED);
    assert_eq!(phrases[1].color(Some(1), &defaults), defaults.color);
}

#[test]
fn test_unicode_bidi_override_wraps_span() {
    let doc = document("<p>x<span tts:unicodeBidi=\"bidiOverride\" tts:direction=\"rtl\">ab</span></p>");
    let r = resolver();
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));
    assert_eq!(phrases[0].text(), format!("x{RLO}ab{PDF}"));
}

#[test]
fn test_bidi_levels() {
    let doc = document("<p>ab \u{05E9}\u{05DC}\u{05D5}\u{05DD}</p>");
    let r = resolver();
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));
    let p = &phrases[0];
    assert_eq!(p.bidi_level(Some(0), 0), 0);
    assert_eq!(p.bidi_level(Some(4), 0), 1);

    let doc = document("<p>abc</p>");
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));
    assert!(phrases[0].interval_at(StyleAttribute::Bidi, 0).is_none());

    let doc = document("<p tts:direction=\"rtl\">abc</p>");
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));
    assert_eq!(phrases[0].bidi_level(Some(1), 0), 2);
}

#[test]
fn test_vertical_orientation() {
    let doc = document("<p>漢a</p>");
    let r = vertical_resolver();
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));
    let defaults = Defaults::default();
    assert_eq!(phrases[0].orientation(Some(0), &defaults), Orientation::Rotate000);
    assert_eq!(phrases[0].orientation(Some(1), &defaults), Orientation::Rotate090);
}

#[test]
fn test_span_font_size_is_relative_to_parent() {
    let doc = document("<p tts:fontSize=\"32px\">a<span tts:fontSize=\"50%\">b</span></p>");
    let r = resolver();
    let phrases = PhraseCollector::new(&doc, &r).collect(first(&doc, "p"));
    let p = &phrases[0];
    assert!(p.font(Some(0)).is_none());
    assert_eq!(p.font(Some(1)).map(|f| f.size().height), Some(16.0));
}

// ========== annotations ==========

fn ruby(content: &str) -> DomTree {
    document(&format!("<p><span tts:ruby=\"container\">{content}</span></p>"))
}

#[test]
fn test_ruby_pairs_text_with_base_and_drops_excess() {
    let doc = ruby(
        "<span tts:ruby=\"base\">雪</span>\
         <span tts:ruby=\"text\">yuki</span>\
         <span tts:ruby=\"text\">extra</span>",
    );
    let r = resolver();
    let container = doc.tt_elements("span")[0];
    let phrases = AnnotationCollector::new(&doc, &r).collect(container);

    assert_eq!(phrases.len(), 1);
    let PhraseKind::Annotated { bases } = phrases[0].kind() else {
        panic!("expected an annotated phrase");
    };
    assert_eq!(bases.len(), 1);
    assert_eq!(bases[0].text(), "雪");
    let annotations = bases[0].annotations(Some(0)).expect("base is annotated");
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0].text(), "yuki");
}

#[test]
fn test_ruby_containers() {
    let doc = ruby(
        "<span tts:ruby=\"baseContainer\">\
           <span tts:ruby=\"base\">東</span><span tts:ruby=\"base\">京</span>\
         </span>\
         <span tts:ruby=\"textContainer\">\
           <span tts:ruby=\"text\">とう</span><span tts:ruby=\"text\">きょう</span>\
         </span>",
    );
    let r = resolver();
    let phrases = AnnotationCollector::new(&doc, &r).collect(doc.tt_elements("span")[0]);
    let PhraseKind::Annotated { bases } = phrases[0].kind() else {
        panic!("expected an annotated phrase");
    };
    let texts: Vec<&str> = bases
        .iter()
        .map(|b| b.annotations(Some(0)).map_or("", |a| a[0].text()))
        .collect();
    assert_eq!(texts, vec!["とう", "きょう"]);
    assert_eq!(phrases[0].text(), "東京");
}

#[test]
fn test_text_before_any_base_is_dropped() {
    let doc = ruby("<span tts:ruby=\"text\">lost</span><span tts:ruby=\"base\">b</span>");
    let r = resolver();
    let phrases = AnnotationCollector::new(&doc, &r).collect(doc.tt_elements("span")[0]);
    let PhraseKind::Annotated { bases } = phrases[0].kind() else {
        panic!("expected an annotated phrase");
    };
    assert!(bases[0].annotations(Some(0)).is_none());
}

#[test]
fn test_ruby_text_font_is_half_the_base() {
    let doc = ruby("<span tts:ruby=\"base\">雪</span><span tts:ruby=\"text\">yuki</span>");
    let r = resolver();
    let phrases = AnnotationCollector::new(&doc, &r).collect(doc.tt_elements("span")[0]);
    let PhraseKind::Annotated { bases } = phrases[0].kind() else {
        panic!("expected an annotated phrase");
    };
    let annotation = &bases[0].annotations(Some(0)).expect("annotated")[0];
    assert_eq!(annotation.font(None).map(|f| f.size().height), Some(12.0));
}

#[test]
fn test_emphasis_marks_every_non_space_character() {
    let doc = document("<p><span tts:textEmphasis=\"auto after\" tts:color=\"red\">強 調</span></p>");
    let r = resolver();
    let phrases = AnnotationCollector::new(&doc, &r).collect(first(&doc, "span"));
    let PhraseKind::Annotated { bases } = phrases[0].kind() else {
        panic!("expected an annotated phrase");
    };
    assert_eq!(bases.len(), 3);
    assert!(bases[1].annotations(Some(0)).is_none());

    let defaults = Defaults::default();
    let mark = &bases[0].annotations(Some(0)).expect("emphasized")[0];
    assert_eq!(mark.text(), SESAME_DOT.to_string());
    assert_eq!(mark.color(None, &defaults), RED);
    assert_eq!(mark.annotation_position(None, &defaults), AnnotationPosition::After);
}

#[test]
fn test_custom_emphasis_mark() {
    let doc = document("<p><span tts:textEmphasis=\"'※' blue\">ab</span></p>");
    let r = resolver();
    let phrases = AnnotationCollector::new(&doc, &r).collect(first(&doc, "span"));
    let PhraseKind::Annotated { bases } = phrases[0].kind() else {
        panic!("expected an annotated phrase");
    };
    let defaults = Defaults::default();
    let mark = &bases[1].annotations(Some(0)).expect("emphasized")[0];
    assert_eq!(mark.text(), "※");
    assert_eq!(mark.color(None, &defaults), BLUE);
}

// ========== paragraphs ==========

#[test]
fn test_paragraph_separator_splits_paragraphs() {
    let doc = document("<p>one\u{2029}two\u{2029}</p>");
    let r = resolver();
    let paragraphs = ParagraphCollector::new(&doc, &r).collect(first(&doc, "p"));
    let texts: Vec<&str> = paragraphs.iter().map(|p| p.text()).collect();
    assert_eq!(texts, vec!["one", "two"]);
}

#[test]
fn test_paragraph_keeps_ruby_in_order() {
    let doc = document(
        "<p>a<span tts:ruby=\"container\">\
         <span tts:ruby=\"base\">雪</span><span tts:ruby=\"text\">yuki</span>\
         </span>b</p>",
    );
    let r = resolver();
    let paragraphs = ParagraphCollector::new(&doc, &r).collect(first(&doc, "p"));
    assert_eq!(paragraphs.len(), 1);
    let p = &paragraphs[0];
    assert_eq!(p.text(), "a雪b");
    assert!(p.annotations(Some(0)).is_none());
    assert_eq!(p.annotations(Some(1)).map(|a| a[0].text()), Some("yuki"));
    assert!(p.annotations(Some(2)).is_none());
}

#[test]
fn test_inline_block_becomes_embedding() {
    let doc = document("<p>x<span tts:textAlign=\"center\">y</span>z</p>");
    let r = resolver();
    let paragraphs = ParagraphCollector::new(&doc, &r).collect(first(&doc, "p"));
    let p = &paragraphs[0];
    assert_eq!(p.text(), format!("x{OBJECT}z"));

    let defaults = Defaults::default();
    let embedded = p.embedded(Some(1)).expect("embedded paragraph");
    assert_eq!(embedded.text(), "y");
    assert_eq!(embedded.text_align(None, &defaults), InlineAlignment::Center);
    assert!(p.embedded(Some(0)).is_none());
}

#[test]
fn test_paragraph_styles_are_whole_run() {
    let doc = document("<p tts:color=\"blue\" tts:lineHeight=\"40px\">ab</p>");
    let r = resolver();
    let paragraphs = ParagraphCollector::new(&doc, &r).collect(first(&doc, "p"));
    let defaults = Defaults::default();
    let p = &paragraphs[0];
    assert_eq!(p.color(None, &defaults), BLUE);
    assert_eq!(p.line_height(Some(1), &defaults, None), 40.0);
    assert!(p.font(None).is_some());
}

#[test]
fn test_empty_paragraph_is_skipped() {
    let doc = document("<p></p>");
    let r = resolver();
    assert!(ParagraphCollector::new(&doc, &r).collect(first(&doc, "p")).is_empty());
}
