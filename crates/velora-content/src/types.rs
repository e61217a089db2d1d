//! Content API payload shapes.
//!
//! ## Observed shapes from the CMS
//!
//! ### Envelope
//! Depending on CMS version the services endpoint returns either an envelope
//! `{"data": [...], "meta": {"pagination": {...}}}` or a bare JSON array of
//! records. [`extract_records`] accepts both.
//!
//! ### Record shape: flat vs. wrapped
//! Newer CMS versions return flat records with the service fields at the top
//! level (plus a `documentId` string). Older versions wrap the fields in an
//! `attributes` object next to a top-level `id`:
//!
//! ```json
//! { "id": 3, "attributes": { "title": "...", "slug": "..." } }
//! ```
//!
//! A single payload may mix both shapes (e.g., mid-migration), so shape
//! detection happens per record in the normalizer, never per batch.
//!
//! ### Field types
//! Every field is loosely enforced upstream: strings may be `null` or empty,
//! arrays may be missing or replaced by a scalar, rich-text fields are typed
//! `any` in the CMS schema. Records therefore stay `serde_json::Value` until
//! the normalizer applies read-or-default access per field; no typed
//! deserialization of whole records.

use serde_json::Value;

/// Extracts the record sequence from a services payload.
///
/// Accepts the enveloped shape (`{"data": [...]}`) and a bare array. Anything
/// else — including a `data` key holding a non-array — yields an empty slice,
/// which downstream treats as "no services published".
#[must_use]
pub fn extract_records(payload: &Value) -> &[Value] {
    if let Some(records) = payload.as_array() {
        return records;
    }
    payload
        .get("data")
        .and_then(Value::as_array)
        .map_or(&[], Vec::as_slice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_from_envelope() {
        let payload = json!({ "data": [{ "id": 1 }, { "id": 2 }], "meta": {} });
        assert_eq!(extract_records(&payload).len(), 2);
    }

    #[test]
    fn extracts_from_bare_array() {
        let payload = json!([{ "id": 1 }]);
        assert_eq!(extract_records(&payload).len(), 1);
    }

    #[test]
    fn empty_for_scalar_payload() {
        assert!(extract_records(&json!("oops")).is_empty());
    }

    #[test]
    fn empty_for_non_array_data_key() {
        assert!(extract_records(&json!({ "data": { "id": 1 } })).is_empty());
    }

    #[test]
    fn empty_for_missing_data_key() {
        assert!(extract_records(&json!({ "meta": {} })).is_empty());
    }
}
