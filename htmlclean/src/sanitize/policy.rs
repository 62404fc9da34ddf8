//! Tag and attribute policies.
//!
//! Policies are plain data. They do not walk trees or decide what to do with a
//! node; the renderer asks them yes/no questions. Built-in policies are
//! assembled from static layers, one per filter set, following the inheritance
//! declared by [`FilterSet::inherits`]. Resolution only ever takes unions, so a
//! filter set can never lose a rule granted by a base it builds on.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;

use crate::{
    error::Result,
    filter_set::{FilterSet, Inherit},
    url::LinkType,
};

/// Tags whose whole subtree is discarded in every built-in filter set.
const DROPPED_TAGS: &[&str] = &[
    "applet", "base", "button", "canvas", "embed", "form", "frame", "frameset", "head", "iframe",
    "link", "math", "meta", "noscript", "object", "script", "select", "style", "svg", "template",
    "textarea", "title",
];

/// Rules a filter set contributes on its own.
struct Layer {
    allowed_tags: &'static [&'static str],
    dropped_tags: &'static [&'static str],
    global_attributes: &'static [&'static str],
    attributes: &'static [(&'static str, &'static [&'static str])],
    schemes: &'static [&'static str],
    href_types: &'static [LinkType],
}

const STRICT: Layer = Layer {
    allowed_tags: &[
        "p", "br", "b", "strong", "i", "em", "u", "s", "sub", "sup", "ul", "ol", "li",
    ],
    dropped_tags: DROPPED_TAGS,
    global_attributes: &[],
    attributes: &[],
    schemes: &[],
    href_types: &[],
};

const BASIC: Layer = Layer {
    allowed_tags: &[
        "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre", "code", "hr", "div", "span",
        "table", "thead", "tbody", "tfoot", "tr", "th", "td", "caption", "dl", "dt", "dd", "abbr",
        "cite", "q", "small",
    ],
    dropped_tags: &[],
    global_attributes: &["class", "title"],
    attributes: &[
        ("td", &["colspan", "rowspan"]),
        ("th", &["colspan", "rowspan"]),
        ("ol", &["start", "type"]),
    ],
    schemes: &[],
    href_types: &[],
};

const LINK: Layer = Layer {
    allowed_tags: &["a"],
    dropped_tags: &[],
    global_attributes: &[],
    attributes: &[("a", &["href", "name", "title", "target", "rel"])],
    schemes: &["http", "https", "mailto", "ftp"],
    href_types: &[LinkType::Absolute, LinkType::Relative, LinkType::Anchor],
};

const MEDIA: Layer = Layer {
    allowed_tags: &["img", "figure", "figcaption", "picture"],
    dropped_tags: &[],
    global_attributes: &[],
    attributes: &[("img", &["src", "alt", "width", "height"])],
    schemes: &["http", "https"],
    href_types: &[],
};

const LIMITED: Layer = Layer {
    allowed_tags: &["p", "br", "ul", "ol", "li"],
    dropped_tags: DROPPED_TAGS,
    global_attributes: &[],
    attributes: &[],
    schemes: &[],
    href_types: &[],
};

fn layer(filter_set: FilterSet) -> &'static Layer {
    match filter_set {
        FilterSet::Strict => &STRICT,
        FilterSet::Basic => &BASIC,
        FilterSet::Limited => &LIMITED,
        FilterSet::Link => &LINK,
        FilterSet::Media => &MEDIA,
    }
}

/// Attribute whitelist: per-tag names plus the reserved `*` entries.
///
/// With the `serde` feature this serializes as a single map using the
/// reserved keys `"*"`, `"*.schemes"` and `"*.types-href"` next to one key
/// per tag.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttributeRules {
    /// Attribute names allowed on every tag.
    #[cfg_attr(feature = "serde", serde(rename = "*", default))]
    pub global: BTreeSet<String>,
    /// Schemes allowed for absolute `href`/`src` values.
    #[cfg_attr(feature = "serde", serde(rename = "*.schemes", default))]
    pub schemes: BTreeSet<String>,
    /// Link types allowed for `href`.
    #[cfg_attr(feature = "serde", serde(rename = "*.types-href", default))]
    pub href_types: BTreeSet<LinkType>,
    /// Attribute names allowed on specific tags.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub per_tag: BTreeMap<String, BTreeSet<String>>,
}

impl AttributeRules {
    fn merge(&mut self, other: &AttributeRules) {
        self.global.extend(other.global.iter().cloned());
        self.schemes.extend(other.schemes.iter().cloned());
        self.href_types.extend(other.href_types.iter().copied());
        for (tag, names) in &other.per_tag {
            self.per_tag
                .entry(tag.clone())
                .or_default()
                .extend(names.iter().cloned());
        }
    }
}

/// A fully resolved tag/attribute whitelist.
///
/// All names are stored lower-cased. Build custom policies with
/// [`Policy::empty`] and the `allow_*`/`drop_*` methods, or start from a
/// built-in one with [`resolve_policy`] and clone it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Policy {
    /// Tags kept in the output.
    #[cfg_attr(feature = "serde", serde(default))]
    pub allowed_tags: BTreeSet<String>,
    /// Tags removed together with everything inside them.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dropped_tags: BTreeSet<String>,
    /// Attribute whitelist.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: AttributeRules,
}

fn lowered<I, S>(names: I) -> impl Iterator<Item = String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|name| name.as_ref().to_ascii_lowercase())
}

impl Policy {
    /// A policy that allows nothing and drops nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds tags to the allowed set.
    #[must_use]
    pub fn allow_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_tags.extend(lowered(tags));
        self
    }

    /// Adds tags to the dropped set.
    #[must_use]
    pub fn drop_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dropped_tags.extend(lowered(tags));
        self
    }

    /// Allows attributes on one tag.
    #[must_use]
    pub fn allow_attributes<I, S>(mut self, tag: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.attributes
            .per_tag
            .entry(tag.to_ascii_lowercase())
            .or_default()
            .extend(lowered(names));
        self
    }

    /// Allows attributes on every tag.
    #[must_use]
    pub fn allow_global_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.attributes.global.extend(lowered(names));
        self
    }

    /// Allows URI schemes for absolute `href`/`src` values.
    #[must_use]
    pub fn allow_schemes<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.attributes.schemes.extend(lowered(schemes));
        self
    }

    /// Allows link types for `href`.
    #[must_use]
    pub fn allow_href_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = LinkType>,
    {
        self.attributes.href_types.extend(types);
        self
    }

    /// Unions `other` into `self`.
    pub fn merge(&mut self, other: &Policy) {
        self.allowed_tags.extend(other.allowed_tags.iter().cloned());
        self.dropped_tags.extend(other.dropped_tags.iter().cloned());
        self.attributes.merge(&other.attributes);
    }

    fn merge_layer(&mut self, layer: &Layer) {
        let mut own = Policy::empty()
            .allow_tags(layer.allowed_tags)
            .drop_tags(layer.dropped_tags)
            .allow_global_attributes(layer.global_attributes)
            .allow_schemes(layer.schemes)
            .allow_href_types(layer.href_types.iter().copied());
        for (tag, names) in layer.attributes {
            own = own.allow_attributes(tag, *names);
        }
        self.merge(&own);
    }

    /// Whether elements named `tag` are kept.
    #[must_use]
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.contains(tag)
    }

    /// Whether elements named `tag` are removed with their content.
    #[must_use]
    pub fn drops_tag(&self, tag: &str) -> bool {
        self.dropped_tags.contains(tag)
    }

    /// Whether `name` may appear on `tag`, either by a tag rule or by `*`.
    #[must_use]
    pub fn allows_attribute(&self, tag: &str, name: &str) -> bool {
        self.attributes.global.contains(name)
            || self
                .attributes
                .per_tag
                .get(tag)
                .is_some_and(|names| names.contains(name))
    }

    /// Whether an absolute URL with this (lower-cased) scheme is accepted.
    #[must_use]
    pub fn allows_scheme(&self, scheme: &str) -> bool {
        self.attributes.schemes.contains(scheme)
    }

    /// Whether an `href` of this shape is accepted.
    #[must_use]
    pub fn allows_href_type(&self, link_type: LinkType) -> bool {
        self.attributes.href_types.contains(&link_type)
    }
}

fn build(filter_set: FilterSet) -> Policy {
    let mut policy = Policy::empty();
    for base in filter_set.inherits() {
        match *base {
            Inherit::Extends(parent) => policy.merge(&build(parent)),
            Inherit::Borrows(parent) => policy.merge_layer(layer(parent)),
        }
    }
    policy.merge_layer(layer(filter_set));
    policy
}

static RESOLVED: Lazy<[Policy; 5]> = Lazy::new(|| FilterSet::ALL.map(build));

/// Returns the merged policy for a filter set.
///
/// Policies are built once on first use and shared afterwards.
#[must_use]
pub fn resolve_policy(filter_set: FilterSet) -> &'static Policy {
    let index = FilterSet::ALL
        .iter()
        .position(|set| *set == filter_set)
        .unwrap_or_default();
    &RESOLVED[index]
}

/// Resolves a policy by filter-set name.
///
/// Unknown names fail with [`crate::Error::InvalidFilterSet`]; no fallback
/// policy is substituted.
pub fn policy_for_name(name: &str) -> Result<&'static Policy> {
    Ok(resolve_policy(name.parse()?))
}

impl FilterSet {
    /// The merged policy for this filter set.
    #[must_use]
    pub fn policy(self) -> &'static Policy {
        resolve_policy(self)
    }
}
