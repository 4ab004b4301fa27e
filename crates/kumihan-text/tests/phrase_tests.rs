//! Tests for phrase concatenation and attribute lookup.

use kumihan_text::style::Color;
use kumihan_text::{Defaults, Phrase, StyleAttribute, StyleAttributeInterval, StyleValue};
use quickcheck_macros::quickcheck;

fn colored(text: &str, shade: u8) -> Phrase {
    Phrase::new(
        None,
        text,
        vec![StyleAttributeInterval::outer(
            StyleAttribute::Color,
            StyleValue::Color(Color::rgb(shade, 0, 0)),
        )],
    )
}

// ========== concatenation ==========

#[quickcheck]
fn prop_concat_length_is_sum(parts: Vec<(String, u8)>) -> bool {
    let phrases: Vec<Phrase> = parts.iter().map(|(t, s)| colored(t, *s)).collect();
    let joined = Phrase::concat(None, &phrases, Vec::new());
    joined.length() == phrases.iter().map(Phrase::length).sum::<usize>()
        && joined.text() == parts.iter().map(|(t, _)| t.as_str()).collect::<String>()
}

#[quickcheck]
fn prop_concat_keeps_part_attributes(parts: Vec<(String, u8)>) -> bool {
    let defaults = Defaults::default();
    let phrases: Vec<Phrase> = parts.iter().map(|(t, s)| colored(t, *s)).collect();
    let joined = Phrase::concat(None, &phrases, Vec::new());
    let mut offset = 0;
    for (text, shade) in &parts {
        let n = text.chars().count();
        for i in offset..offset + n {
            if joined.color(Some(i), &defaults) != Color::rgb(*shade, 0, 0) {
                return false;
            }
        }
        offset += n;
    }
    true
}

#[test]
fn test_concat_part_intervals_override_part_whole_run() {
    let defaults = Defaults::default();
    let mut first = colored("ab", 1);
    first.add_range(StyleAttribute::Color, StyleValue::Color(Color::WHITE), 1..2);
    let second = colored("cd", 2);
    let joined = Phrase::concat(None, &[first, second], Vec::new());

    assert_eq!(joined.text(), "abcd");
    assert_eq!(joined.color(Some(0), &defaults), Color::rgb(1, 0, 0));
    assert_eq!(joined.color(Some(1), &defaults), Color::WHITE);
    assert_eq!(joined.color(Some(2), &defaults), Color::rgb(2, 0, 0));
    assert_eq!(joined.color(None, &defaults), Color::YELLOW);
}

#[test]
fn test_concat_outer_attributes_stay_whole_run() {
    let defaults = Defaults::default();
    let joined = Phrase::concat(
        None,
        &[colored("a", 9)],
        vec![StyleAttributeInterval::outer(
            StyleAttribute::Color,
            StyleValue::Color(Color::BLACK),
        )],
    );
    assert_eq!(joined.color(None, &defaults), Color::BLACK);
    assert_eq!(joined.color(Some(0), &defaults), Color::rgb(9, 0, 0));
}

// ========== lookup ==========

#[test]
fn test_indices_count_chars() {
    let defaults = Defaults::default();
    let p = Phrase::new(
        None,
        "雪は白い",
        vec![StyleAttributeInterval::new(
            StyleAttribute::Color,
            StyleValue::Color(Color::WHITE),
            2..4,
        )],
    );
    assert_eq!(p.length(), 4);
    assert_eq!(p.slice(2..4), "白い");
    assert_eq!(p.color(Some(3), &defaults), Color::WHITE);
    assert_eq!(p.color(Some(1), &defaults), Color::YELLOW);
}

#[test]
fn test_empty_intervals_are_dropped() {
    let p = Phrase::new(
        None,
        "ab",
        vec![
            StyleAttributeInterval::new(StyleAttribute::Color, StyleValue::Color(Color::WHITE), 1..1),
            StyleAttributeInterval::new(StyleAttribute::Color, StyleValue::Color(Color::WHITE), 5..9),
        ],
    );
    assert!(p.intervals().is_empty());
}

#[test]
fn test_no_default_for_font_and_emphasis() {
    let p = Phrase::new(None, "a", Vec::new());
    assert!(p.font(Some(0)).is_none());
    assert!(p.emphasis(None).is_none());
    assert!(p.annotations(Some(0)).is_none());
}
