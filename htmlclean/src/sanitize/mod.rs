//! The sanitizer: normalization, parsing, rendering and the post-passes.
//!
//! - **`policy`**: what is allowed (`Policy`, `resolve_policy`)
//! - **`render`**: the recursive tree walk
//! - **`attributes`**: per-element attribute filtering
//! - **`whitespace`**: the normalization run before and after rendering
//! - **`report`**: counters describing a call

mod attributes;
pub(crate) mod policy;
mod render;
mod report;
mod whitespace;

use std::borrow::Cow;

use html5ever::{parse_fragment, tendril::TendrilSink, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use slog::{debug, o, Discard, Logger};

use crate::{
    error::{Error, ParseDiagnostic, Result},
    filter_set::FilterSet,
    url::UrlRewrites,
};

pub use attributes::DEFAULT_CLASS_PREFIXES;
pub use policy::{policy_for_name, resolve_policy, AttributeRules, Policy};
pub use render::VOID_TAGS;
pub use report::{Report, Sanitized};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Nesting depth past which subtrees are flattened to text.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A configured sanitizer.
///
/// Cheap to share: it holds no per-call state, and every call builds and owns
/// its own tree.
///
/// ```
/// use htmlclean::{FilterSet, Sanitizer};
///
/// let sanitizer = Sanitizer::new(FilterSet::Link);
/// let html = sanitizer.clean(r#"<a href="javascript:alert(1)">x</a>"#).unwrap();
/// assert_eq!(html, "x");
/// ```
#[derive(Clone, Debug)]
pub struct Sanitizer {
    filter_set: Option<FilterSet>,
    policy: Cow<'static, Policy>,
    rewrites: UrlRewrites,
    class_prefixes: Vec<Cow<'static, str>>,
    max_depth: usize,
    logger: Logger,
}

impl Sanitizer {
    /// Sanitizer for a built-in filter set, with the default URL rewrites and
    /// editor class prefixes, logging nowhere.
    #[must_use]
    pub fn new(filter_set: FilterSet) -> Self {
        Self::build(Some(filter_set), Cow::Borrowed(resolve_policy(filter_set)))
    }

    /// Sanitizer for a custom policy.
    #[must_use]
    pub fn with_policy(policy: Policy) -> Self {
        Self::build(None, Cow::Owned(policy))
    }

    fn build(filter_set: Option<FilterSet>, policy: Cow<'static, Policy>) -> Self {
        Self {
            filter_set,
            policy,
            rewrites: UrlRewrites::insecure_defaults(),
            class_prefixes: DEFAULT_CLASS_PREFIXES
                .iter()
                .map(|prefix| Cow::Borrowed(*prefix))
                .collect(),
            max_depth: DEFAULT_MAX_DEPTH,
            logger: Logger::root(Discard, o!()),
        }
    }

    /// Replaces the URL rewrite table.
    #[must_use]
    pub fn url_rewrites(mut self, rewrites: UrlRewrites) -> Self {
        self.rewrites = rewrites;
        self
    }

    /// Replaces the class prefixes treated as editor artifacts.
    #[must_use]
    pub fn class_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.class_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the nesting depth past which subtrees are flattened to text.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sends decisions to `logger`: a debug record per call and trace records
    /// per removed element or attribute.
    #[must_use]
    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// The filter set this sanitizer was built from, if it was.
    #[must_use]
    pub fn filter_set(&self) -> Option<FilterSet> {
        self.filter_set
    }

    /// The active policy.
    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Sanitizes `html` and returns the filtered markup.
    pub fn clean(&self, html: &str) -> Result<String> {
        self.clean_with_report(html).map(|sanitized| sanitized.html)
    }

    /// Sanitizes `html` and reports what was removed.
    pub fn clean_with_report(&self, html: &str) -> Result<Sanitized> {
        let normalized = whitespace::normalize(html);
        let dom = parse_fragment(
            RcDom::default(),
            ParseOpts::default(),
            QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body")),
            Vec::new(),
        )
        .one(normalized.as_str());
        let root = fragment_root(&dom)?;

        if let Some(first) = dom.errors.first() {
            debug!(self.logger, "parser recovered from errors";
                "count" => dom.errors.len(), "first" => %first);
        }

        let context = render::Context::new(
            &self.policy,
            &self.class_prefixes,
            self.max_depth,
            &self.logger,
        );
        let mut renderer = render::Renderer::new(context);
        let rendered = renderer.render_children(&root, 0);
        let mut report = renderer.finish();
        report.parse_errors = dom.errors.len();

        let renormalized = whitespace::normalize(&rendered);
        let (rewritten, hits) = self.rewrites.apply(&renormalized);
        report.rewritten_urls = hits;

        let trimmed = rewritten.trim();
        let html_out = if trimmed == "<br>" {
            String::new()
        } else {
            trimmed.to_string()
        };

        debug!(self.logger, "sanitized html";
            "filter_set" => self.filter_set.map_or("custom", FilterSet::as_str),
            "input_len" => html.len(),
            "output_len" => html_out.len(),
            "dropped_subtrees" => report.dropped_subtrees,
            "stripped_tags" => report.stripped_tags,
            "removed_attributes" => report.removed_attributes,
            "rewritten_urls" => report.rewritten_urls);

        Ok(Sanitized {
            html: html_out,
            report,
        })
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(FilterSet::default())
    }
}

/// The `<html>` element the fragment parser hangs parsed content under.
fn fragment_root(dom: &RcDom) -> Result<Handle> {
    let root = dom
        .document
        .children
        .borrow()
        .iter()
        .find(|child| matches!(child.data, NodeData::Element { .. }))
        .cloned();
    root.ok_or_else(|| {
        let diagnostic = dom
            .errors
            .first()
            .map_or_else(ParseDiagnostic::generic, |message| {
                ParseDiagnostic::new(message.to_string(), None)
            });
        Error::MalformedHtml(diagnostic)
    })
}

/// Sanitizes `html` with a built-in filter set.
///
/// `FilterSet::default()` is [`FilterSet::Media`].
///
/// ```
/// use htmlclean::{clean_html, FilterSet};
///
/// assert_eq!(clean_html("<script>alert(1)</script>hello", FilterSet::Strict).unwrap(), "hello");
/// assert_eq!(clean_html("<span>hello</span>", FilterSet::Strict).unwrap(), "hello");
/// ```
pub fn clean_html(html: &str, filter_set: FilterSet) -> Result<String> {
    Sanitizer::new(filter_set).clean(html)
}

#[cfg(test)]
mod tests {
    use html5ever::{tendril::TendrilSink, LocalName, Namespace, ParseOpts, QualName};
    use markup5ever_rcdom::RcDom;

    use super::{fragment_root, HTML_NAMESPACE};
    use crate::error::{Error, ParseDiagnostic};

    #[test]
    fn fragment_root_is_found_for_parsed_input() {
        let dom = html5ever::parse_fragment(
            RcDom::default(),
            ParseOpts::default(),
            QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body")),
            Vec::new(),
        )
        .one("<p>x</p>");
        assert!(fragment_root(&dom).is_ok());
    }

    #[test]
    fn missing_tree_is_malformed_html() {
        let dom = RcDom::default();
        assert_eq!(
            fragment_root(&dom).err(),
            Some(Error::MalformedHtml(ParseDiagnostic::generic()))
        );
    }
}
