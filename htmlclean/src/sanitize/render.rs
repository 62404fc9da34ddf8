//! Recursive renderer: walks the parsed tree and rebuilds filtered markup.
//!
//! Every node reduces to a string. Comments and dropped tags reduce to nothing;
//! disallowed tags reduce to their rendered content; allowed tags are rebuilt
//! with their filtered attributes. The source tree is only read.

use std::borrow::Cow;

use markup5ever_rcdom::{Handle, NodeData};
use slog::{trace, Logger};

use crate::text::{collapse_whitespace, encode_text};

use super::{attributes::filter_attributes, policy::Policy, report::Report};

/// Elements written without content or a closing tag.
pub const VOID_TAGS: &[&str] = &["br", "hr", "input", "img"];

/// Whether `tag` (lower-case) is a void element.
pub(crate) fn is_void(tag: &str) -> bool {
    VOID_TAGS.contains(&tag)
}

/// Read-only settings shared by the renderer and the attribute filter.
pub(crate) struct Context<'a> {
    pub(crate) policy: &'a Policy,
    pub(crate) class_prefixes: &'a [Cow<'static, str>],
    pub(crate) max_depth: usize,
    pub(crate) logger: &'a Logger,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        policy: &'a Policy,
        class_prefixes: &'a [Cow<'static, str>],
        max_depth: usize,
        logger: &'a Logger,
    ) -> Self {
        Self {
            policy,
            class_prefixes,
            max_depth,
            logger,
        }
    }
}

pub(crate) struct Renderer<'a> {
    context: Context<'a>,
    report: Report,
}

impl<'a> Renderer<'a> {
    pub(crate) fn new(context: Context<'a>) -> Self {
        Self {
            context,
            report: Report::default(),
        }
    }

    /// Consumes the renderer and returns what it counted.
    pub(crate) fn finish(self) -> Report {
        self.report
    }

    /// Renders the children of `node` in document order.
    pub(crate) fn render_children(&mut self, node: &Handle, depth: usize) -> String {
        let mut out = String::new();
        for child in node.children.borrow().iter() {
            out.push_str(&self.render(child, depth));
        }
        out
    }

    fn render(&mut self, node: &Handle, depth: usize) -> String {
        match &node.data {
            NodeData::Document => self.render_children(node, depth),
            NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => String::new(),
            NodeData::Comment { .. } => {
                self.report.removed_comments += 1;
                String::new()
            }
            NodeData::Text { contents } => {
                encode_text(&collapse_whitespace(&contents.borrow())).into_owned()
            }
            NodeData::Element { name, attrs, .. } => {
                let tag = (*name.local).to_ascii_lowercase();
                self.render_element(node, &tag, &attrs.borrow(), depth)
            }
        }
    }

    fn render_element(
        &mut self,
        node: &Handle,
        tag: &str,
        attrs: &[html5ever::Attribute],
        depth: usize,
    ) -> String {
        if self.context.policy.drops_tag(tag) {
            self.report.dropped_subtrees += 1;
            trace!(self.context.logger, "dropped subtree"; "tag" => tag);
            return String::new();
        }
        if depth >= self.context.max_depth {
            self.report.depth_limited += 1;
            trace!(self.context.logger, "flattened deep subtree"; "tag" => tag, "depth" => depth);
            return self.flatten(node);
        }

        let inner = self.render_children(node, depth + 1);

        if !self.context.policy.allows_tag(tag) {
            self.report.stripped_tags += 1;
            trace!(self.context.logger, "stripped tag"; "tag" => tag);
            return inner;
        }

        let attrs = filter_attributes(tag, attrs, &self.context, &mut self.report);
        if attrs.is_empty() && matches!(tag, "a" | "img") {
            self.report.demoted_elements += 1;
            trace!(self.context.logger, "demoted element"; "tag" => tag);
            return inner;
        }
        if is_void(tag) {
            return format!("<{tag}{attrs}>");
        }
        let inner = trim_edge_breaks(&inner);
        if inner.trim().is_empty() && tag != "a" {
            self.report.removed_empty += 1;
            return String::new();
        }
        format!("<{tag}{attrs}>{inner}</{tag}>")
    }

    /// Text content of a subtree with all markup removed, skipping comments
    /// and dropped tags. Iterative so that depth does not matter here.
    fn flatten(&self, node: &Handle) -> String {
        let mut text = String::new();
        let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();
        while let Some(current) = stack.pop() {
            match &current.data {
                NodeData::Text { contents } => text.push_str(&contents.borrow()),
                NodeData::Element { name, .. }
                    if self
                        .context
                        .policy
                        .drops_tag(&(*name.local).to_ascii_lowercase()) => {}
                NodeData::Element { .. } => {
                    stack.extend(current.children.borrow().iter().rev().cloned());
                }
                NodeData::Document
                | NodeData::Doctype { .. }
                | NodeData::Comment { .. }
                | NodeData::ProcessingInstruction { .. } => {}
            }
        }
        encode_text(&collapse_whitespace(&text)).into_owned()
    }
}

/// Strips `<br>` at either edge of element content, with the whitespace
/// between it and the edge. The output normalization removes these anyway,
/// and an element left with nothing else must count as empty here.
fn trim_edge_breaks(inner: &str) -> &str {
    let mut content = inner;
    while let Some(rest) = content.trim_start().strip_prefix("<br>") {
        content = rest;
    }
    while let Some(rest) = content.trim_end().strip_suffix("<br>") {
        content = rest;
    }
    content
}
