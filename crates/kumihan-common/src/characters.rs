//! Code point classes used by phrase collection and line layout.
//!
//! [Unicode Standard Annex #9](https://www.unicode.org/reports/tr9/) for the
//! bidi formatting characters, [Unicode § 7.9 Combining Marks](https://www.unicode.org/versions/latest/)
//! for the non-spacing ranges.

/// LINE SEPARATOR, inserted for `br` elements.
pub const LINE_SEPARATOR: char = '\u{2028}';

/// PARAGRAPH SEPARATOR, splits text into distinct phrases and paragraphs.
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';

/// LEFT-TO-RIGHT EMBEDDING
pub const LRE: char = '\u{202A}';

/// RIGHT-TO-LEFT EMBEDDING
pub const RLE: char = '\u{202B}';

/// POP DIRECTIONAL FORMATTING
pub const PDF: char = '\u{202C}';

/// LEFT-TO-RIGHT OVERRIDE
pub const LRO: char = '\u{202D}';

/// RIGHT-TO-LEFT OVERRIDE
pub const RLO: char = '\u{202E}';

/// OBJECT REPLACEMENT CHARACTER, stands in for an embedded inline block.
pub const OBJECT: char = '\u{FFFC}';

/// REPLACEMENT CHARACTER, substituted for unpaired surrogates.
pub const REPLACEMENT: char = '\u{FFFD}';

/// BULLET, the vertical automatic emphasis mark.
pub const FILLED_DOT: char = '\u{2022}';

/// PRESENTATION FORM FOR VERTICAL SESAME DOT, the horizontal automatic
/// emphasis mark.
pub const SESAME_DOT: char = '\u{FE45}';

/// Whitespace as understood by phrase and glyph classification.
///
/// Covers ASCII whitespace, the line and paragraph separators and the
/// general-punctuation space block.
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}' | '\u{00A0}' | '\u{3000}')
        || ('\u{2000}'..='\u{200B}').contains(&c)
        || c == LINE_SEPARATOR
        || c == PARAGRAPH_SEPARATOR
}

/// Whitespace that offers a soft line break opportunity.
///
/// NO-BREAK SPACE is whitespace but never breaks.
#[must_use]
pub fn is_breaking_whitespace(c: char) -> bool {
    is_whitespace(c) && c != '\u{00A0}'
}

/// True for the line separator inserted by `br`.
#[must_use]
pub const fn is_line_separator(c: char) -> bool {
    c == LINE_SEPARATOR
}

/// True for the bidi embedding/override controls and PDF.
#[must_use]
pub fn is_bidi_control(c: char) -> bool {
    (LRE..=RLO).contains(&c)
}

/// Characters that occupy no advance of their own: combining marks,
/// Hebrew and Arabic points, and invisible formatting characters.
#[must_use]
pub fn is_non_spacing(c: char) -> bool {
    match c {
        '\u{0300}'..='\u{036F}' => true,
        '\u{0590}'..='\u{05CF}' => !matches!(c, '\u{05C0}' | '\u{05C6}'),
        '\u{0610}'..='\u{061A}' | '\u{061C}' => true,
        '\u{064B}'..='\u{065F}' => true,
        '\u{06D6}'..='\u{06ED}' => !matches!(c, '\u{06E5}' | '\u{06E6}' | '\u{06E9}'),
        '\u{1AB0}'..='\u{1AFF}' => true,
        '\u{1DC0}'..='\u{1DFF}' => true,
        '\u{2000}'..='\u{200F}' => true,
        '\u{2028}'..='\u{202F}' => true,
        '\u{205F}'..='\u{206F}' => true,
        _ => false,
    }
}

/// CJK ideographs (and kana), after which a soft line break is allowed.
#[must_use]
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2FA1F}')
}

/// Characters set upright in vertical text; everything else is rotated.
#[must_use]
pub fn is_upright_in_vertical(c: char) -> bool {
    is_cjk_ideograph(c)
        || matches!(c,
            '\u{1100}'..='\u{11FF}'
            | '\u{2E80}'..='\u{303F}'
            | '\u{3100}'..='\u{31FF}'
            | '\u{AC00}'..='\u{D7AF}'
            | '\u{FE30}'..='\u{FE4F}'
            | '\u{FF00}'..='\u{FF60}')
}

/// Bidi mirrored counterpart for the paired ASCII brackets.
#[must_use]
pub const fn mirror(c: char) -> Option<char> {
    match c {
        '(' => Some(')'),
        ')' => Some('('),
        '[' => Some(']'),
        ']' => Some('['),
        '{' => Some('}'),
        '}' => Some('{'),
        '<' => Some('>'),
        '>' => Some('<'),
        '\u{00AB}' => Some('\u{00BB}'),
        '\u{00BB}' => Some('\u{00AB}'),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separators_are_whitespace() {
        assert!(is_whitespace(LINE_SEPARATOR));
        assert!(is_whitespace(PARAGRAPH_SEPARATOR));
        assert!(is_whitespace(' '));
        assert!(!is_whitespace('A'));
    }

    #[test]
    fn test_no_break_space_does_not_break() {
        assert!(is_whitespace('\u{00A0}'));
        assert!(!is_breaking_whitespace('\u{00A0}'));
    }

    #[test]
    fn test_non_spacing_exclusions() {
        assert!(is_non_spacing('\u{0301}'));
        assert!(is_non_spacing('\u{05B0}'));
        assert!(!is_non_spacing('\u{05C0}'));
        assert!(!is_non_spacing('\u{05C6}'));
        assert!(!is_non_spacing('\u{06E5}'));
        assert!(is_non_spacing('\u{06D6}'));
        assert!(is_non_spacing('\u{200D}'));
        assert!(!is_non_spacing('a'));
    }

    #[test]
    fn test_bidi_controls() {
        for c in [LRE, RLE, PDF, LRO, RLO] {
            assert!(is_bidi_control(c));
        }
        assert!(!is_bidi_control('\u{2029}'));
    }

    #[test]
    fn test_cjk_and_mirror() {
        assert!(is_cjk_ideograph('雪'));
        assert!(is_cjk_ideograph('ゆ'));
        assert!(!is_cjk_ideograph('y'));
        assert_eq!(mirror('('), Some(')'));
        assert_eq!(mirror('a'), None);
    }
}
