//! Catalog projections over normalized services.
//!
//! Two views feed the page layer: the flat grid list (input order, untouched)
//! and the alphabetical index grouping services by the first letter of their
//! title.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::services::Service;

/// Group key for services without a real title.
pub const UNTITLED_GROUP_KEY: &str = "#";

/// One letter bucket of the alphabetical index.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceGroup {
    /// A single uppercase character, or [`UNTITLED_GROUP_KEY`].
    pub key: String,
    pub members: Vec<Service>,
}

/// Flat grid projection: the input sequence, unmodified. Exposed for symmetry
/// with [`group_by_first_letter`]; no hidden sorting.
#[must_use]
pub fn as_list(services: Vec<Service>) -> Vec<Service> {
    services
}

/// Groups services by the first letter of their title.
///
/// Every service lands in exactly one group; insertion order within a group
/// follows the input order. Groups are sorted ascending by codepoint order of
/// their key, which places [`UNTITLED_GROUP_KEY`] before all letters and
/// Latin before Cyrillic.
#[must_use]
pub fn group_by_first_letter(services: Vec<Service>) -> Vec<ServiceGroup> {
    let mut buckets: BTreeMap<String, Vec<Service>> = BTreeMap::new();
    for service in services {
        let key = letter_key(&service);
        buckets.entry(key).or_default().push(service);
    }

    buckets
        .into_iter()
        .map(|(key, members)| ServiceGroup { key, members })
        .collect()
}

/// Index key for one service: the first character of its title upper-cased
/// with the Unicode case mapping (Cyrillic titles map correctly), or the
/// sentinel for untitled services.
#[must_use]
pub fn letter_key(service: &Service) -> String {
    if service.is_untitled() {
        return UNTITLED_GROUP_KEY.to_owned();
    }
    service.title.chars().next().map_or_else(
        || UNTITLED_GROUP_KEY.to_owned(),
        |first| first.to_uppercase().collect(),
    )
}
