//! Static Unicode block classification with the wrapping override table.
//!
//! Script groups are derived from each character's block. The override
//! table is baked in: CJK sub-blocks collapse to `chinese` / `japanese` /
//! `korean`; Latin blocks, mixed-script symbol blocks and emoji never
//! trigger a wrap; digits, punctuation and whitespace are connectors;
//! combining-mark blocks inherit their base character.

/// How a single character participates in script segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Belongs to a wrappable script group.
    Script(&'static str),
    /// Digit, punctuation or whitespace: appended to an adjacent run,
    /// never starts one.
    Connector,
    /// Combining mark: inherits the script of its base character.
    Combining,
    /// Symbol conventionally used in mathematics.
    Math,
    /// Never wrapped (Latin, mixed symbol blocks, emoji, unassigned).
    Ignored,
}

use CharClass::{Combining, Connector, Ignored, Math, Script};

/// Block table, sorted by start codepoint. Gaps classify as `Ignored`.
const BLOCKS: &[(u32, u32, CharClass)] = &[
    (0x00A0, 0x00BF, Connector), // Latin-1 punctuation and signs
    (0x00C0, 0x024F, Ignored),   // Latin-1 letters, Latin Extended-A/B
    (0x0250, 0x02FF, Ignored),   // IPA, Spacing Modifier Letters
    (0x0300, 0x036F, Combining), // Combining Diacritical Marks
    (0x0370, 0x03FF, Script("greek")),
    (0x0400, 0x052F, Script("cyrillic")),
    (0x0530, 0x058F, Script("armenian")),
    (0x0590, 0x05FF, Script("hebrew")),
    (0x0600, 0x06FF, Script("arabic")),
    (0x0700, 0x074F, Script("syriac")),
    (0x0750, 0x077F, Script("arabic")), // Arabic Supplement
    (0x0900, 0x097F, Script("devanagari")),
    (0x0980, 0x09FF, Script("bengali")),
    (0x0A00, 0x0A7F, Script("gurmukhi")),
    (0x0A80, 0x0AFF, Script("gujarati")),
    (0x0B00, 0x0B7F, Script("oriya")),
    (0x0B80, 0x0BFF, Script("tamil")),
    (0x0C00, 0x0C7F, Script("telugu")),
    (0x0C80, 0x0CFF, Script("kannada")),
    (0x0D00, 0x0D7F, Script("malayalam")),
    (0x0D80, 0x0DFF, Script("sinhala")),
    (0x0E00, 0x0E7F, Script("thai")),
    (0x0E80, 0x0EFF, Script("lao")),
    (0x0F00, 0x0FFF, Script("tibetan")),
    (0x1000, 0x109F, Script("myanmar")),
    (0x10A0, 0x10FF, Script("georgian")),
    (0x1100, 0x11FF, Script("korean")), // Hangul Jamo
    (0x1200, 0x137F, Script("ethiopic")),
    (0x13A0, 0x13FF, Script("cherokee")),
    (0x1680, 0x169F, Script("ogham")),
    (0x16A0, 0x16FF, Script("runic")),
    (0x1780, 0x17FF, Script("khmer")),
    (0x1800, 0x18AF, Script("mongolian")),
    (0x1AB0, 0x1AFF, Combining), // Combining Diacritical Marks Extended
    (0x1DC0, 0x1DFF, Combining), // Combining Diacritical Marks Supplement
    (0x1E00, 0x1EFF, Ignored),   // Latin Extended Additional
    (0x1F00, 0x1FFF, Script("greek")), // Greek Extended
    (0x2000, 0x206F, Connector), // General Punctuation
    (0x2070, 0x209F, Ignored),   // Superscripts and Subscripts
    (0x20A0, 0x20CF, Connector), // Currency Symbols
    (0x20D0, 0x20FF, Combining), // Combining Marks for Symbols
    (0x2100, 0x214F, Math),      // Letterlike Symbols
    (0x2150, 0x218F, Ignored),   // Number Forms
    (0x2190, 0x23FF, Ignored),   // Arrows, Technical (operators carved out in classify)
    (0x2460, 0x27BF, Ignored),   // Enclosed, shapes, dingbats
    (0x2E80, 0x2FDF, Script("chinese")), // CJK Radicals, Kangxi Radicals
    (0x3000, 0x303F, Connector), // CJK Symbols and Punctuation
    (0x3040, 0x30FF, Script("japanese")), // Hiragana, Katakana
    (0x3100, 0x312F, Script("chinese")),  // Bopomofo
    (0x3130, 0x318F, Script("korean")),   // Hangul Compatibility Jamo
    (0x31F0, 0x31FF, Script("japanese")), // Katakana Phonetic Extensions
    (0x3400, 0x4DBF, Script("chinese")),  // CJK Extension A
    (0x4E00, 0x9FFF, Script("chinese")),  // CJK Unified Ideographs
    (0xA640, 0xA69F, Script("cyrillic")), // Cyrillic Extended-B
    (0xAC00, 0xD7AF, Script("korean")),   // Hangul Syllables
    (0xF900, 0xFAFF, Script("chinese")),  // CJK Compatibility Ideographs
    (0xFB1D, 0xFB4F, Script("hebrew")),   // Hebrew presentation forms
    (0xFB50, 0xFDFF, Script("arabic")),   // Arabic Presentation Forms-A
    (0xFE20, 0xFE2F, Combining),
    (0xFE70, 0xFEFF, Script("arabic")), // Arabic Presentation Forms-B
    (0xFF00, 0xFF60, Connector),        // Fullwidth forms
    (0xFF61, 0xFF9F, Script("japanese")), // Halfwidth Katakana
    (0x1D400, 0x1D7FF, Math),           // Mathematical Alphanumeric Symbols
    (0x1F300, 0x1FAFF, Ignored),        // Emoji blocks
    (0x20000, 0x2A6DF, Script("chinese")), // CJK Extension B
    (0x2F800, 0x2FA1F, Script("chinese")), // CJK Compatibility Supplement
];

/// Classify one character for segmentation.
pub fn classify(ch: char) -> CharClass {
    let cp = ch as u32;
    if cp < 0x80 {
        // The base font stack renders all of ASCII; letters never wrap and
        // everything else glues to adjacent runs.
        return if ch.is_ascii_alphabetic() { Ignored } else { Connector };
    }
    if ch.is_whitespace() {
        return Connector;
    }
    // Mathematical Operators sit inside the ignored Arrows..Technical span
    // in the table; they take precedence.
    if (0x2200..=0x22FF).contains(&cp) {
        return Math;
    }
    let idx = BLOCKS.partition_point(|&(start, _, _)| start <= cp);
    match BLOCKS[..idx].last() {
        Some(&(_, end, class)) if cp <= end => class,
        _ => Ignored,
    }
}

/// Whether the character is a candidate for isolated math-symbol routing:
/// a Greek letter or a symbol from the mathematical blocks.
pub fn is_math_symbol(ch: char) -> bool {
    let cp = ch as u32;
    matches!(classify(ch), Math)
        || (0x0370..=0x03FF).contains(&cp)
        || (0x1D400..=0x1D7FF).contains(&cp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii() {
        assert_eq!(classify('a'), Ignored);
        assert_eq!(classify('Z'), Ignored);
        assert_eq!(classify('7'), Connector);
        assert_eq!(classify('.'), Connector);
        assert_eq!(classify(' '), Connector);
        assert_eq!(classify('\n'), Connector);
    }

    #[test]
    fn test_scripts() {
        assert_eq!(classify('ا'), Script("arabic"));
        assert_eq!(classify('ש'), Script("hebrew"));
        assert_eq!(classify('你'), Script("chinese"));
        assert_eq!(classify('ひ'), Script("japanese"));
        assert_eq!(classify('한'), Script("korean"));
        assert_eq!(classify('ไ'), Script("thai"));
        assert_eq!(classify('Ω'), Script("greek"));
    }

    #[test]
    fn test_cjk_collapse() {
        // Ideographs always collapse to chinese, kana to japanese.
        assert_eq!(classify('漢'), Script("chinese"));
        assert_eq!(classify('カ'), Script("japanese"));
        assert_eq!(classify('ﾒ'), Script("japanese"));
    }

    #[test]
    fn test_ignored_blocks() {
        assert_eq!(classify('é'), Ignored); // Latin-1 letter
        assert_eq!(classify('ŵ'), Ignored); // Latin Extended
        assert_eq!(classify('→'), Ignored); // Arrows
        assert_eq!(classify('😀'), Ignored); // Emoji
    }

    #[test]
    fn test_connectors() {
        assert_eq!(classify('。'), Connector); // CJK full stop
        assert_eq!(classify('—'), Connector); // General Punctuation
        assert_eq!(classify('€'), Connector); // Currency
    }

    #[test]
    fn test_combining() {
        assert_eq!(classify('\u{0301}'), Combining);
        assert_eq!(classify('\u{FE20}'), Combining);
    }

    #[test]
    fn test_math() {
        assert_eq!(classify('∀'), Math);
        assert_eq!(classify('ℝ'), Math);
        assert!(is_math_symbol('Ω'));
        assert!(is_math_symbol('∈'));
        assert!(!is_math_symbol('你'));
    }
}
