//! URL classification and the insecure-URL rewrite table.
//!
//! None of this parses URLs in general. Classification only has to answer two
//! questions for `href`/`src` values: does the value carry a scheme, and if so
//! which one. Browsers drop tab, CR and LF anywhere in a URL and skip leading
//! control characters and spaces before looking for the scheme, so the same is
//! done here; otherwise `java&#9;script:` would look relative.

use std::{borrow::Cow, fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::{NoExpand, Regex, RegexBuilder};

/// Shape of a link target as far as the attribute filter cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LinkType {
    /// Has a scheme (`https://…`, `mailto:…`, `javascript:…`).
    Absolute,
    /// No scheme and not a fragment reference.
    Relative,
    /// Starts with `#`.
    Anchor,
}

impl LinkType {
    /// Every link type.
    pub const ALL: [LinkType; 3] = [LinkType::Absolute, LinkType::Relative, LinkType::Anchor];

    /// Classifies an attribute value.
    ///
    /// `allow_anchor` is true for `href`; a `src` starting with `#` is relative.
    #[must_use]
    pub fn classify(value: &str, allow_anchor: bool) -> Self {
        let cleaned = strip_ignored(value);
        if allow_anchor && cleaned.starts_with('#') {
            LinkType::Anchor
        } else if scheme_end(&cleaned).is_some() {
            LinkType::Absolute
        } else {
            LinkType::Relative
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::Absolute => "absolute",
            LinkType::Relative => "relative",
            LinkType::Anchor => "anchor",
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LinkType {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        LinkType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| format!("unknown link type \"{name}\""))
    }
}

/// Returns the lower-cased scheme of an absolute URL, or `None` for relative
/// values and fragment references.
#[must_use]
pub fn scheme(value: &str) -> Option<String> {
    let cleaned = strip_ignored(value);
    scheme_end(&cleaned).map(|end| cleaned[..end].to_ascii_lowercase())
}

/// Removes what browsers ignore before scheme detection.
fn strip_ignored(value: &str) -> Cow<'_, str> {
    let leading = value.trim_start_matches(|c: char| c <= ' ');
    if leading.contains(['\t', '\n', '\r']) {
        Cow::Owned(
            leading
                .chars()
                .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
                .collect(),
        )
    } else {
        Cow::Borrowed(leading)
    }
}

/// Byte offset of the `:` ending the scheme, if one comes before any path,
/// query or fragment delimiter.
fn scheme_end(value: &str) -> Option<usize> {
    let end = value.find([':', '/', '?', '#'])?;
    (end > 0 && value[end..].starts_with(':')).then_some(end)
}

/// Literal prefixes of known hosts that also serve over TLS.
const INSECURE_DEFAULTS: &[(&str, &str)] = &[
    ("http://fonts.googleapis.com", "https://fonts.googleapis.com"),
    ("http://fonts.gstatic.com", "https://fonts.gstatic.com"),
    ("http://ajax.googleapis.com", "https://ajax.googleapis.com"),
    ("http://maps.googleapis.com", "https://maps.googleapis.com"),
    ("http://www.youtube.com/embed/", "https://www.youtube.com/embed/"),
    ("http://i.ytimg.com", "https://i.ytimg.com"),
    ("http://player.vimeo.com", "https://player.vimeo.com"),
    ("http://cdn.jsdelivr.net", "https://cdn.jsdelivr.net"),
    ("http://cdnjs.cloudflare.com", "https://cdnjs.cloudflare.com"),
    ("http://www.gravatar.com", "https://www.gravatar.com"),
    ("http://unpkg.com", "https://unpkg.com"),
];

static DEFAULT_REWRITES: Lazy<UrlRewrites> = Lazy::new(|| {
    INSECURE_DEFAULTS
        .iter()
        .fold(UrlRewrites::none(), |table, (from, to)| table.with(*from, *to))
});

#[derive(Clone, Debug)]
struct Rewrite {
    pattern: Regex,
    replacement: String,
}

/// Fixed table of literal substring rewrites applied to sanitized output.
///
/// Matching is literal and case-insensitive under Unicode simple case
/// folding, so `HTTP://` matches `http://` and U+212A KELVIN SIGN matches
/// `k`. A `from` of `http://cdn.example.com` never behaves like a pattern.
/// Replacements are inserted verbatim. Entries apply in insertion order.
#[derive(Clone, Debug, Default)]
pub struct UrlRewrites {
    entries: Vec<Rewrite>,
}

impl UrlRewrites {
    /// A table that rewrites nothing.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Rewrites for well-known CDN and embed hosts from `http://` to `https://`.
    #[must_use]
    pub fn insecure_defaults() -> Self {
        DEFAULT_REWRITES.clone()
    }

    /// Adds a rewrite. Empty `from` values are ignored.
    #[must_use]
    pub fn with<F, T>(mut self, from: F, to: T) -> Self
    where
        F: AsRef<str>,
        T: Into<String>,
    {
        let from = from.as_ref();
        if from.is_empty() {
            return self;
        }
        // An escaped literal always compiles.
        if let Ok(pattern) = RegexBuilder::new(&regex::escape(from))
            .case_insensitive(true)
            .build()
        {
            self.entries.push(Rewrite {
                pattern,
                replacement: to.into(),
            });
        }
        self
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Applies every rewrite and returns the result with the number of
    /// replacements made.
    #[must_use]
    pub fn apply<'a>(&self, input: &'a str) -> (Cow<'a, str>, usize) {
        let mut output = Cow::Borrowed(input);
        let mut count = 0;
        for rewrite in &self.entries {
            let hits = rewrite.pattern.find_iter(&output).count();
            if hits == 0 {
                continue;
            }
            count += hits;
            let replaced = rewrite
                .pattern
                .replace_all(&output, NoExpand(&rewrite.replacement))
                .into_owned();
            output = Cow::Owned(replaced);
        }
        (output, count)
    }
}

#[cfg(test)]
mod tests {
    use super::{scheme, LinkType, UrlRewrites};

    #[test]
    fn classifies_link_shapes() {
        assert_eq!(
            LinkType::classify("https://example.com", true),
            LinkType::Absolute
        );
        assert_eq!(LinkType::classify("mailto:a@b.c", true), LinkType::Absolute);
        assert_eq!(LinkType::classify("/docs/a:b", true), LinkType::Relative);
        assert_eq!(LinkType::classify("page?x=a:b", true), LinkType::Relative);
        assert_eq!(LinkType::classify("//cdn.example.com/a.js", true), LinkType::Relative);
        assert_eq!(LinkType::classify("#top", true), LinkType::Anchor);
        assert_eq!(LinkType::classify("#top", false), LinkType::Relative);
        assert_eq!(LinkType::classify(":foo", true), LinkType::Relative);
    }

    #[test]
    fn scheme_is_lowercased() {
        assert_eq!(scheme("HTTPS://example.com").as_deref(), Some("https"));
        assert_eq!(scheme("relative/path"), None);
    }

    #[test]
    fn scheme_detection_sees_through_browser_ignored_characters() {
        assert_eq!(scheme("  java\tscript:alert(1)").as_deref(), Some("javascript"));
        assert_eq!(scheme("\u{1}jav\nascript:x").as_deref(), Some("javascript"));
    }

    #[test]
    fn link_type_names_round_trip() {
        for kind in LinkType::ALL {
            assert_eq!(kind.as_str().parse::<LinkType>(), Ok(kind));
        }
        assert!("external".parse::<LinkType>().is_err());
    }

    #[test]
    fn rewrites_are_case_insensitive_literals() {
        let table = UrlRewrites::none().with("http://cdn.example.com", "https://cdn.example.com");
        let (out, hits) = table.apply(r#"<img src="HTTP://CDN.example.com/a.png">"#);
        assert_eq!(out, r#"<img src="https://cdn.example.com/a.png">"#);
        assert_eq!(hits, 1);
    }

    #[test]
    fn rewrites_fold_case_beyond_ascii() {
        let table = UrlRewrites::none().with("http://k.test", "https://k.test");
        let (out, hits) = table.apply("http://\u{212A}.test/a");
        assert_eq!(out, "https://k.test/a");
        assert_eq!(hits, 1);
    }

    #[test]
    fn rewrite_source_is_not_a_pattern() {
        let table = UrlRewrites::none().with("http://a.b", "https://a.b");
        let (out, hits) = table.apply("http://axb");
        assert_eq!(out, "http://axb");
        assert_eq!(hits, 0);
    }

    #[test]
    fn replacement_is_inserted_verbatim() {
        let table = UrlRewrites::none().with("http://x.test", "$1//x.test");
        let (out, _) = table.apply("http://x.test/");
        assert_eq!(out, "$1//x.test/");
    }

    #[test]
    fn defaults_upgrade_known_hosts_only() {
        let table = UrlRewrites::insecure_defaults();
        assert!(!table.is_empty());
        let (out, hits) = table.apply("http://fonts.googleapis.com/css http://example.com/");
        assert_eq!(out, "https://fonts.googleapis.com/css http://example.com/");
        assert_eq!(hits, 1);
    }
}
