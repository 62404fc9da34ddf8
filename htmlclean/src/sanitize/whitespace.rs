//! Whitespace and line-break normalization run before parsing and again on
//! the rendered output.
//!
//! Line breaks next to a tag boundary are decoration rather than content, so
//! a `<br>` right after an opening tag or right before a closing tag goes
//! away, and runs of breaks fold into one.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::text::collapse_whitespace;

use super::render::is_void;

static BREAK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:<br\s*/?>\s*){2,}").expect("break run pattern compiles"));

static BREAK_BEFORE_CLOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>\s*(</[a-z][a-z0-9]*\s*>)").expect("closing break pattern compiles")
});

static BREAK_AFTER_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(<([a-z][a-z0-9]*)(?:\s[^<>]*)?>)\s*<br\s*/?>"#)
        .expect("opening break pattern compiles")
});

/// Runs every normalization step in order.
pub(crate) fn normalize(html: &str) -> String {
    let collapsed = collapse_whitespace(html);
    let tight = collapsed.replace("> <", "><");
    let single = BREAK_RUN.replace_all(&tight, "<br>");
    let before_close = BREAK_BEFORE_CLOSE.replace_all(&single, "$1");
    drop_break_after_open(&before_close).into_owned()
}

fn drop_break_after_open(html: &str) -> Cow<'_, str> {
    BREAK_AFTER_OPEN.replace_all(html, |caps: &Captures<'_>| {
        let tag = caps[2].to_ascii_lowercase();
        if is_void(&tag) {
            caps[0].to_string()
        } else {
            caps[1].to_string()
        }
    })
}
