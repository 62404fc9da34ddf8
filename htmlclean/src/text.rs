//! Text normalization shared by the sanitizer and the plain-text projector.
//!
//! Whitespace here means ASCII whitespace as HTML defines it (space, tab, LF,
//! CR, FF) plus vertical tab. Non-breaking spaces are content, not layout, and
//! are left alone.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\n\r\x0B\x0C]+").expect("whitespace pattern compiles"));

/// Collapses every run of whitespace into a single space.
///
/// Leading and trailing runs are collapsed too, not trimmed.
pub fn collapse_whitespace(text: &str) -> Cow<'_, str> {
    WHITESPACE_RUN.replace_all(text, " ")
}

/// Encodes `&`, `<` and `>` for use in element content.
pub fn encode_text(text: &str) -> Cow<'_, str> {
    html_escape::encode_text(text)
}

/// Encodes `&`, `<`, `>` and `"` for use inside a double-quoted attribute.
pub fn encode_attribute(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Decodes named and numeric character references.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}
