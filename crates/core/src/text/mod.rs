//! Text cleanup shared by the normalizer and the formula matcher.

mod normalizer;

pub use normalizer::TextNormalizer;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use unicode_normalization::UnicodeNormalization;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Remove markup tags such as the `<b>` highlights the search API inserts.
pub fn strip_markup(text: &str) -> String {
    MARKUP.replace_all(text, "").into_owned()
}

/// Collapse runs of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip markup, collapse whitespace, trim, and compose to NFC.
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    collapse_whitespace(&strip_markup(text)).nfc().collect()
}
