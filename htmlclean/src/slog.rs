//! Adapters for logging sanitizer types through `slog`.
//!
//! This module provides:
//! - `slog::Value` for [`FilterSet`] and [`LinkType`], emitted as their
//!   canonical names,
//! - `slog::KV` for [`Report`], one key per counter,
//! - with the `serde` feature, [`PolicyJson`], which emits a policy as
//!   structured JSON via `slog`'s nested-value support.
//!
//! It does not configure `slog`. The sanitizer itself logs through the
//! `Logger` given to [`crate::Sanitizer::logger`].

use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue, KV};

use crate::{filter_set::FilterSet, sanitize::Report, url::LinkType};

impl SlogValue for FilterSet {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.as_str())
    }
}

impl SlogValue for LinkType {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, self.as_str())
    }
}

impl KV for Report {
    fn serialize(&self, _record: &Record<'_>, serializer: &mut dyn Serializer) -> SlogResult {
        serializer.emit_usize("dropped_subtrees", self.dropped_subtrees)?;
        serializer.emit_usize("stripped_tags", self.stripped_tags)?;
        serializer.emit_usize("demoted_elements", self.demoted_elements)?;
        serializer.emit_usize("removed_empty", self.removed_empty)?;
        serializer.emit_usize("removed_comments", self.removed_comments)?;
        serializer.emit_usize("removed_attributes", self.removed_attributes)?;
        serializer.emit_usize("rewritten_urls", self.rewritten_urls)?;
        serializer.emit_usize("parse_errors", self.parse_errors)?;
        serializer.emit_usize("depth_limited", self.depth_limited)
    }
}

#[cfg(feature = "serde")]
pub use self::json::PolicyJson;

#[cfg(feature = "serde")]
mod json {
    use serde_json::Value as JsonValue;
    use slog::{Key, Record, Result as SlogResult, Serializer, Value as SlogValue};

    use crate::sanitize::Policy;

    /// A `slog::Value` that emits a policy as structured JSON.
    ///
    /// If the policy cannot be converted into a JSON value, a JSON string
    /// placeholder is emitted instead of failing the log call.
    pub struct PolicyJson {
        value: JsonValue,
    }

    impl SlogValue for PolicyJson {
        fn serialize(
            &self,
            record: &Record<'_>,
            key: Key,
            serializer: &mut dyn Serializer,
        ) -> SlogResult {
            let nested = slog::Serde(self.value.clone());
            SlogValue::serialize(&nested, record, key, serializer)
        }
    }

    impl Policy {
        /// Captures the policy for structured logging.
        ///
        /// ```ignore
        /// debug!(logger, "policy"; "policy" => FilterSet::Link.policy().log_json());
        /// ```
        #[must_use]
        pub fn log_json(&self) -> PolicyJson {
            let value = serde_json::to_value(self).unwrap_or_else(|_| {
                JsonValue::String("Failed to serialize policy".to_string())
            });
            PolicyJson { value }
        }
    }
}
