//! Read-or-default accessors over `serde_json::Value`.
//!
//! Every field read in the normalizer goes through these helpers instead of
//! direct indexing, so a missing key, a `null`, or a wrong JSON type resolves
//! to the field's default rather than a panic or an error. This module is
//! `pub(crate)` so [`crate::normalize`] and future sibling modules share the
//! same primitives.

use serde_json::Value;

/// String field: present, a JSON string, and non-empty. Empty strings count
/// as absent — the CMS serializes cleared fields as `""`.
pub(crate) fn non_empty_str<'a>(fields: &'a Value, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Owned variant of [`non_empty_str`], for `Option<String>` model fields.
pub(crate) fn opt_string(fields: &Value, key: &str) -> Option<String> {
    non_empty_str(fields, key).map(ToOwned::to_owned)
}

/// String field with a default for the absent/empty/mis-typed cases.
pub(crate) fn string_or(fields: &Value, key: &str, default: &str) -> String {
    non_empty_str(fields, key).unwrap_or(default).to_owned()
}

/// Integer field, defaulting when absent or not an integer.
pub(crate) fn i64_or(fields: &Value, key: &str, default: i64) -> i64 {
    fields.get(key).and_then(Value::as_i64).unwrap_or(default)
}

/// Array field, empty when absent or not an array.
pub(crate) fn array<'a>(fields: &'a Value, key: &str) -> &'a [Value] {
    fields
        .get(key)
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

/// Unwraps one level of `{"attributes": {...}}` wrapping when present and
/// non-empty; otherwise returns the record itself. Shape detection is per
/// record — payloads may mix flat and wrapped records.
pub(crate) fn unwrap_attributes(record: &Value) -> &Value {
    match record.get("attributes") {
        Some(attrs @ Value::Object(map)) if !map.is_empty() => attrs,
        _ => record,
    }
}
