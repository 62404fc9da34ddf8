//! Plain-text projection of sanitized markup.
//!
//! This works on tag tokens, not on a tree, so it is only meaningful for
//! output of [`crate::clean_html`] or [`crate::Sanitizer`]. Raw untrusted
//! markup must be sanitized first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::text::{decode_entities, encode_text};

static LIST_ITEM_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<li(?:\s[^>]*)?>").expect("list item pattern compiles"));

static BLOCK_CLOSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(?:p|h[1-6])\s*>").expect("block close pattern compiles"));

static LINE_CLOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</(?:ul|ol|li)\s*>|<br\s*/?>").expect("line close pattern compiles")
});

static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<.*?>").expect("tag pattern compiles"));

static URL_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:https?://|www\.)\S+").expect("url pattern compiles"));

static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("blank line pattern compiles"));

/// Converts sanitized HTML to a plain-text approximation.
///
/// List items become ` * ` bullets, paragraphs and headings end with a blank
/// line, list ends and `<br>` end a line, and every other tag is removed.
/// With `strip_urls`, `http://…`, `https://…` and `www.…` runs are removed.
/// With `html_format`, the text is re-encoded, line breaks become `<br>` and
/// the whole is wrapped in one `<p>`.
///
/// ```
/// use htmlclean::convert_to_plain_text;
///
/// assert_eq!(convert_to_plain_text("<p>a</p><p>b</p>", false, false), "a\n\nb");
/// ```
#[must_use]
pub fn convert_to_plain_text(html: &str, strip_urls: bool, html_format: bool) -> String {
    let text = LIST_ITEM_OPEN.replace_all(html, " * ");
    let text = BLOCK_CLOSE.replace_all(&text, "\n\n");
    let text = LINE_CLOSE.replace_all(&text, "\n");
    let mut text = ANY_TAG.replace_all(&text, "").into_owned();
    if strip_urls {
        text = URL_LIKE.replace_all(&text, "").into_owned();
    }
    let decoded = decode_entities(&text);
    let folded = BLANK_RUN.replace_all(&decoded, "\n\n");
    let plain = folded.trim();

    if !html_format {
        return plain.to_string();
    }
    if plain.is_empty() {
        return String::new();
    }
    format!("<p>{}</p>", encode_text(plain).replace('\n', "<br>"))
}
