//! Per-call counters describing what the sanitizer removed or changed.

/// What one sanitize call did to its input.
///
/// Counters only; the report never holds any of the removed content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    /// Elements removed together with their subtree.
    pub dropped_subtrees: usize,
    /// Elements whose markup was removed but whose content was kept.
    pub stripped_tags: usize,
    /// `a`/`img` elements reduced to their content for lack of attributes.
    pub demoted_elements: usize,
    /// Allowed elements removed because they had no content.
    pub removed_empty: usize,
    /// Comment nodes removed.
    pub removed_comments: usize,
    /// Attributes removed by the whitelist or by value checks.
    pub removed_attributes: usize,
    /// Substitutions made by the URL rewrite table.
    pub rewritten_urls: usize,
    /// Errors the parser recovered from.
    pub parse_errors: usize,
    /// Subtrees flattened to text because they were nested too deeply.
    pub depth_limited: usize,
}

impl Report {
    /// True when nothing was removed, demoted or rewritten.
    ///
    /// Parse errors do not count: recovered markup can still come out intact.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        let Report {
            dropped_subtrees,
            stripped_tags,
            demoted_elements,
            removed_empty,
            removed_comments,
            removed_attributes,
            rewritten_urls,
            parse_errors: _,
            depth_limited,
        } = *self;
        [
            dropped_subtrees,
            stripped_tags,
            demoted_elements,
            removed_empty,
            removed_comments,
            removed_attributes,
            rewritten_urls,
            depth_limited,
        ]
        .iter()
        .all(|count| *count == 0)
    }
}

/// Output of [`crate::Sanitizer::clean_with_report`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sanitized {
    /// The sanitized markup.
    pub html: String,
    /// What was changed to produce it.
    pub report: Report,
}
