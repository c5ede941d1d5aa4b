//! Answer normalization for free-text grading.
//!
//! Students type answers on phones and tablets with Japanese IMEs, so the same
//! answer can arrive in full-width or half-width forms, with stray punctuation,
//! or with thousands separators. Comparison must be lenient on those while
//! still telling different words apart.

use unicode_normalization::UnicodeNormalization;

/// Normalize a string for answer comparison.
///
/// Applies the following transformations in order:
/// 1. Unicode NFKC, folding full-width ASCII and half-width kana
/// 2. Lowercase
/// 3. Ligature expansion (`ß` -> `ss`, `æ` -> `ae`, `œ` -> `oe`)
/// 4. Drop punctuation and symbols, keeping letters, digits and marks
/// 5. Collapse and trim whitespace
///
/// Combining marks are kept: `じょうほう` and `しょうほう` stay different.
pub fn normalize_for_comparison(s: &str) -> String {
    s.nfkc()
        .collect::<String>()
        .to_lowercase()
        .replace('ß', "ss")
        .replace('æ', "ae")
        .replace('œ', "oe")
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || is_voicing_mark(*c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Only the ASCII digits of `s` after NFKC (`"１，０００円"` -> `"1000"`)
pub fn digits_only(s: &str) -> String {
    s.nfkc().filter(char::is_ascii_digit).collect()
}

/// Kana voicing marks that NFKC leaves uncomposed
fn is_voicing_mark(c: char) -> bool {
    matches!(c, '\u{3099}' | '\u{309A}')
}
