//! Tests for XML loading and namespaced attribute lookup.

use kumihan_dom::{DomTree, ElementData, NodeId, TT_NAMESPACE, TTS_NAMESPACE, XML_NAMESPACE, parse_xml};

const SAMPLE: &str = r#"<tt xmlns="http://www.w3.org/ns/ttml"
    xmlns:tts="http://www.w3.org/ns/ttml#styling" xml:lang="ja">
  <body><div>
    <p tts:color="white">A<span tts:color="red">BC</span>D<br/>E</p>
  </div></body>
</tt>"#;

// ========== parsing ==========

#[test]
fn test_parse_keeps_namespaces() {
    let tree = parse_xml(SAMPLE).unwrap();
    let tt = tree.document_element().unwrap();
    let data = tree.as_element(tt).unwrap();
    assert_eq!(data.local_name, "tt");
    assert_eq!(data.namespace.as_deref(), Some(TT_NAMESPACE));
    assert_eq!(tree.attribute(tt, Some(XML_NAMESPACE), "lang"), Some("ja"));
}

#[test]
fn test_parse_finds_paragraphs() {
    let tree = parse_xml(SAMPLE).unwrap();
    let paragraphs = tree.tt_elements("p");
    assert_eq!(paragraphs.len(), 1);
    let p = paragraphs[0];
    assert_eq!(tree.attribute(p, Some(TTS_NAMESPACE), "color"), Some("white"));
    assert_eq!(tree.text_content(p), "ABCDE");
}

#[test]
fn test_span_is_child_of_paragraph() {
    let tree = parse_xml(SAMPLE).unwrap();
    let p = tree.tt_elements("p")[0];
    let elements: Vec<NodeId> = tree.child_elements(p).collect();
    assert_eq!(elements.len(), 2);
    assert!(tree.is_tt_element(elements[0], "span"));
    assert!(tree.is_tt_element(elements[1], "br"));
    assert_eq!(tree.direct_text(elements[0]), "BC");
}

#[test]
fn test_malformed_xml_is_an_error() {
    assert!(parse_xml("<tt><p></tt>").is_err());
}

// ========== hand-built trees ==========

#[test]
fn test_inherited_attribute_walks_ancestors() {
    let mut tree = DomTree::new();
    let p = tree.append_element(
        NodeId::ROOT,
        ElementData::new(None, "p").with_attribute(Some(TTS_NAMESPACE), "fontSize", "32px"),
    );
    let span = tree.append_element(p, ElementData::new(None, "span"));
    let _ = tree.append_text(span, "x");

    assert_eq!(
        tree.inherited_attribute(span, Some(TTS_NAMESPACE), "fontSize"),
        Some("32px")
    );
    assert_eq!(tree.attribute(span, Some(TTS_NAMESPACE), "fontSize"), None);
    assert_eq!(tree.ancestors(span).collect::<Vec<_>>(), vec![p, NodeId::ROOT]);
}

#[test]
fn test_set_attribute_replaces_value() {
    let mut data = ElementData::new(Some(TT_NAMESPACE), "span");
    data.set_attribute(Some(TTS_NAMESPACE), "ruby", "base");
    data.set_attribute(Some(TTS_NAMESPACE), "ruby", "text");
    assert_eq!(data.attrs.len(), 1);
    assert_eq!(data.attribute(Some(TTS_NAMESPACE), "ruby"), Some("text"));
    assert!(data.is_tt("span"));
}
