//! Attribute whitelist and value checks for a single element.

use html5ever::Attribute;
use slog::trace;

use crate::{
    text::encode_attribute,
    url::{scheme, LinkType},
};

use super::{render::Context, report::Report};

/// Class prefixes left behind by word processors and mail clients.
pub const DEFAULT_CLASS_PREFIXES: &[&str] = &["Mso", "Apple-", "WordSection", "gmail_", "ydp"];

/// Why an attribute was removed; only used for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    NotAllowed,
    Namespaced,
    EditorClasses,
    Scheme,
    LinkType,
}

impl Rejection {
    fn as_str(self) -> &'static str {
        match self {
            Rejection::NotAllowed => "not allowed",
            Rejection::Namespaced => "namespaced",
            Rejection::EditorClasses => "only editor classes",
            Rejection::Scheme => "scheme not allowed",
            Rejection::LinkType => "link type not allowed",
        }
    }
}

/// Filters `attrs` for `tag` and serializes the survivors.
///
/// Returns `""` or a fragment with one leading space, e.g. ` href="/a" title="x"`,
/// ready to splice after the tag name. Source order is preserved.
pub(crate) fn filter_attributes(
    tag: &str,
    attrs: &[Attribute],
    context: &Context<'_>,
    report: &mut Report,
) -> String {
    let mut out = String::new();
    for attr in attrs {
        let name = (*attr.name.local).to_ascii_lowercase();
        match check(tag, &name, attr, context) {
            Ok(value) => {
                out.push(' ');
                out.push_str(&encode_attribute(&name));
                out.push_str("=\"");
                out.push_str(&encode_attribute(&value));
                out.push('"');
            }
            Err(reason) => {
                report.removed_attributes += 1;
                trace!(context.logger, "removed attribute";
                    "tag" => tag, "attribute" => &name, "reason" => reason.as_str());
            }
        }
    }
    out
}

/// Returns the value to emit, or why the attribute goes.
fn check(
    tag: &str,
    name: &str,
    attr: &Attribute,
    context: &Context<'_>,
) -> Result<String, Rejection> {
    if attr.name.prefix.is_some() {
        return Err(Rejection::Namespaced);
    }
    if !context.policy.allows_attribute(tag, name) {
        return Err(Rejection::NotAllowed);
    }
    let value = attr.value.trim();
    match name {
        "class" => {
            let kept: Vec<&str> = value
                .split_ascii_whitespace()
                .filter(|token| {
                    !context
                        .class_prefixes
                        .iter()
                        .any(|prefix| token.starts_with(prefix.as_ref()))
                })
                .collect();
            if kept.is_empty() {
                Err(Rejection::EditorClasses)
            } else {
                Ok(kept.join(" "))
            }
        }
        "href" | "src" => {
            let is_href = name == "href";
            let link_type = LinkType::classify(value, is_href);
            if link_type == LinkType::Absolute
                && !scheme(value).is_some_and(|scheme| context.policy.allows_scheme(&scheme))
            {
                return Err(Rejection::Scheme);
            }
            if is_href && !context.policy.allows_href_type(link_type) {
                return Err(Rejection::LinkType);
            }
            Ok(value.to_string())
        }
        _ => Ok(value.to_string()),
    }
}
