//! Named filter sets: "which policy applies to this input?"
//!
//! A filter set is only a name. The rules it stands for live in
//! `crate::sanitize::policy`; this module records how the sets build on one
//! another so that resolution can be a plain union.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// One of the five built-in policy bundles.
///
/// The main chain grows strictly: `strict` ⊂ `basic` ⊂ `link` ⊂ `media`.
/// `limited` sits outside that chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FilterSet {
    /// Inline formatting, paragraphs and lists.
    Strict,
    /// `strict` plus headings, block quotes, tables and `class`/`title`.
    Basic,
    /// Paragraph and list tags plus the media layer, nothing else.
    Limited,
    /// `basic` plus anchors with scheme and link-type checks.
    Link,
    /// `link` plus images and figures.
    #[default]
    Media,
}

/// How a filter set picks up rules from another one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inherit {
    /// Union with the fully resolved policy of the base, including its own bases.
    Extends(FilterSet),
    /// Union with only the rules the base declares itself.
    Borrows(FilterSet),
}

impl FilterSet {
    /// Every filter set, in declaration order.
    pub const ALL: [FilterSet; 5] = [
        FilterSet::Strict,
        FilterSet::Basic,
        FilterSet::Limited,
        FilterSet::Link,
        FilterSet::Media,
    ];

    /// Canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FilterSet::Strict => "strict",
            FilterSet::Basic => "basic",
            FilterSet::Limited => "limited",
            FilterSet::Link => "link",
            FilterSet::Media => "media",
        }
    }

    /// The bases this set is built from, applied before its own layer.
    ///
    /// `limited` borrows only the media layer and does not extend the main chain.
    #[must_use]
    pub fn inherits(self) -> &'static [Inherit] {
        match self {
            FilterSet::Strict => &[],
            FilterSet::Basic => &[Inherit::Extends(FilterSet::Strict)],
            FilterSet::Link => &[Inherit::Extends(FilterSet::Basic)],
            FilterSet::Media => &[Inherit::Extends(FilterSet::Link)],
            FilterSet::Limited => &[Inherit::Borrows(FilterSet::Media)],
        }
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterSet {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        FilterSet::ALL
            .into_iter()
            .find(|set| set.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidFilterSet(name.to_string()))
    }
}
