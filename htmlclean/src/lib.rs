//! Whitelist HTML sanitization with named filter-set policies.
//!
//! This crate separates:
//! - **Filter sets**: which named bundle of rules applies (`strict`, `basic`,
//!   `limited`, `link`, `media`).
//! - **Policies**: what those rules are (allowed tags, dropped tags, allowed
//!   attributes, schemes and link types).
//!
//! The sanitizer parses input with html5ever, walks the tree and rebuilds the
//! markup from scratch, so nothing reaches the output unless the policy lets it.
//!
//! Key rules:
//! - Dropped tags (`script`, `style`, `iframe`, ...) lose their whole subtree.
//! - Tags that are merely not allowed are stripped; their content stays.
//! - `a` and `img` left without any permitted attribute are reduced to their
//!   content.
//! - Allowed elements with no content are removed, except `a`.
//! - Comments are always removed.
//!
//! What this crate does:
//! - resolves filter sets to merged policies ([`resolve_policy`])
//! - sanitizes markup ([`clean_html`], [`Sanitizer`])
//! - projects sanitized markup to plain text ([`convert_to_plain_text`], with
//!   the default `plaintext` feature)
//! - provides `slog` adapters for its types ([`slog`])
//!
//! What it does not do:
//! - parse HTML itself (html5ever does)
//! - transliterate charsets
//! - perform I/O
//!
//! ```
//! use htmlclean::{clean_html, FilterSet};
//!
//! let html = clean_html(r#"<p class="MsoNormal lead" onclick="x()">Hi</p>"#, FilterSet::Basic)?;
//! assert_eq!(html, r#"<p class="lead">Hi</p>"#);
//! # Ok::<(), htmlclean::Error>(())
//! ```

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::fn_params_excessive_bools
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
mod error;
mod filter_set;
#[cfg(feature = "plaintext")]
mod plaintext;
mod sanitize;
pub mod slog;
pub mod text;
pub mod url;

// Re-exports
pub use error::{Error, ParseDiagnostic, Result};
pub use filter_set::{FilterSet, Inherit};
#[cfg(feature = "plaintext")]
pub use plaintext::convert_to_plain_text;
pub use sanitize::{
    clean_html, policy_for_name, resolve_policy, AttributeRules, Policy, Report, Sanitized,
    Sanitizer, DEFAULT_CLASS_PREFIXES, DEFAULT_MAX_DEPTH, VOID_TAGS,
};
pub use url::{LinkType, UrlRewrites};
