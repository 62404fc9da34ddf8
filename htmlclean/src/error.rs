//! Error types returned by the sanitizer.
//!
//! Only two conditions are errors: asking for a filter set that does not exist
//! and markup the parser could not turn into any tree at all. Everything else
//! (unknown tags, disallowed attributes, unsupported schemes) is handled by the
//! policy and never reaches the caller.

use std::fmt;

/// Message used when the parser produced no tree and gave no diagnostic.
pub(crate) const GENERIC_PARSE_FAILURE: &str = "no document tree could be built";

/// Parser diagnostic attached to [`Error::MalformedHtml`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseDiagnostic {
    message: String,
    line: Option<u64>,
}

impl ParseDiagnostic {
    /// Creates a diagnostic from a parser message and an optional line number.
    #[must_use]
    pub fn new<M>(message: M, line: Option<u64>) -> Self
    where
        M: Into<String>,
    {
        Self {
            message: message.into(),
            line,
        }
    }

    /// Diagnostic used when the parser did not report anything useful.
    #[must_use]
    pub fn generic() -> Self {
        Self::new(GENERIC_PARSE_FAILURE, None)
    }

    /// The parser's message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Line the parser was on when it gave up, if known.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        self.line
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {line})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors produced by policy resolution and sanitization.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The requested filter-set name is not one of the known filter sets.
    #[error("invalid filter set \"{0}\"")]
    InvalidFilterSet(String),
    /// The parser could not build a tree from the input.
    #[error("malformed HTML: {0}")]
    MalformedHtml(ParseDiagnostic),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::{Error, ParseDiagnostic, GENERIC_PARSE_FAILURE};

    #[test]
    fn invalid_filter_set_names_the_input() {
        let err = Error::InvalidFilterSet("loose".into());
        assert_eq!(err.to_string(), "invalid filter set \"loose\"");
    }

    #[test]
    fn malformed_html_includes_line_when_known() {
        let err = Error::MalformedHtml(ParseDiagnostic::new("Unexpected token", Some(3)));
        assert_eq!(err.to_string(), "malformed HTML: Unexpected token (line 3)");
    }

    #[test]
    fn malformed_html_falls_back_to_generic_message() {
        let err = Error::MalformedHtml(ParseDiagnostic::generic());
        assert_eq!(
            err.to_string(),
            format!("malformed HTML: {GENERIC_PARSE_FAILURE}")
        );
    }
}
