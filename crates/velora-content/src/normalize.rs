//! Normalization from raw content-API records to [`velora_core::Service`].
//!
//! The input is the loosely-typed record sequence from [`crate::types`]; the
//! output is the canonical model the page layer renders without branching on
//! absence. This is a total function: every record yields exactly one
//! `Service`, with unreadable fields resolving to their documented defaults
//! rather than aborting the batch.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use velora_core::{
    slug_for_id, ImageAsset, ImageVariant, PriceListEntry, ProcedureDetails, RichTextBlock,
    Service, TITLE_PLACEHOLDER,
};

use crate::fields::{array, i64_or, non_empty_str, opt_string, string_or, unwrap_attributes};

/// Normalizes a raw record batch into canonical [`Service`]s.
///
/// Slugs are unique across the returned batch: the first record to claim an
/// explicit slug keeps it, later records with the same explicit slug fall
/// back to their id-derived slug and the collision is logged.
#[must_use]
pub fn normalize_services(records: &[Value]) -> Vec<Service> {
    let mut seen_slugs: HashSet<String> = HashSet::new();

    records
        .iter()
        .map(|record| {
            let mut service = normalize_service(record);
            if !seen_slugs.insert(service.slug.clone()) {
                let fallback = slug_for_id(service.id);
                tracing::warn!(
                    id = service.id,
                    slug = %service.slug,
                    fallback = %fallback,
                    "duplicate slug in content batch — keeping first occurrence, \
                     falling back to id-derived slug"
                );
                service.slug = fallback;
                seen_slugs.insert(service.slug.clone());
            }
            service
        })
        .collect()
}

/// Normalizes a single raw record, flat or wrapped.
#[must_use]
pub fn normalize_service(record: &Value) -> Service {
    let fields = unwrap_attributes(record);

    // `id` lives next to the wrapper in the wrapped shape; check the record
    // itself first, then the unwrapped fields.
    let id = match record.get("id").and_then(Value::as_i64) {
        Some(id) => id,
        None => i64_or(fields, "id", 0),
    };

    let slug = match non_empty_str(fields, "slug") {
        Some(slug) => slug.to_owned(),
        None => slug_for_id(id),
    };

    Service {
        id,
        document_id: opt_string(fields, "documentId"),
        title: string_or(fields, "title", TITLE_PLACEHOLDER),
        description: string_or(fields, "description", ""),
        slug,
        images: normalize_images(fields),
        price_list: normalize_price_list(fields),
        procedure_details: normalize_procedure_details(fields),
        indications: rich_text(fields, "indications"),
        effect_description: rich_text(fields, "effectDescription"),
        contraindications: rich_text(fields, "contraindications"),
        note: opt_string(fields, "note"),
    }
}

/// Decodes the image gallery.
///
/// The array may sit at `images` directly or under `images.data`, and each
/// entry may itself be `attributes`-wrapped. Entries without a usable base
/// `url` are dropped — without one the variant-fallback invariant cannot
/// hold.
fn normalize_images(fields: &Value) -> Vec<ImageAsset> {
    let images = fields.get("images").unwrap_or(&Value::Null);
    let records = match images.as_array() {
        Some(records) => records.as_slice(),
        None => images
            .get("data")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
    };

    records.iter().filter_map(normalize_image).collect()
}

fn normalize_image(record: &Value) -> Option<ImageAsset> {
    let fields = unwrap_attributes(record);
    let url = non_empty_str(fields, "url")?.to_owned();

    let mut formats: BTreeMap<ImageVariant, String> = BTreeMap::new();
    if let Some(raw_formats) = fields.get("formats").and_then(Value::as_object) {
        for (name, value) in raw_formats {
            let Some(variant) = parse_variant(name) else {
                continue; // unknown size names are not part of the closed set
            };
            // Variant values are either `{"url": "..."}` objects or plain
            // URL strings, depending on source version.
            let variant_url = value
                .as_str()
                .or_else(|| value.get("url").and_then(Value::as_str))
                .filter(|s| !s.is_empty());
            if let Some(variant_url) = variant_url {
                formats.insert(variant, variant_url.to_owned());
            }
        }
    }

    Some(ImageAsset { url, formats })
}

fn parse_variant(name: &str) -> Option<ImageVariant> {
    match name {
        "thumbnail" => Some(ImageVariant::Thumbnail),
        "small" => Some(ImageVariant::Small),
        "medium" => Some(ImageVariant::Medium),
        "large" => Some(ImageVariant::Large),
        _ => None,
    }
}

fn normalize_price_list(fields: &Value) -> Vec<PriceListEntry> {
    array(fields, "priceList")
        .iter()
        .map(|entry| PriceListEntry {
            id: i64_or(entry, "id", 0),
            name: opt_string(entry, "name"),
            description: opt_string(entry, "description"),
            unit: opt_string(entry, "unit"),
            duration: opt_string(entry, "duration"),
        })
        .collect()
}

/// A present `procedureDetails` object maps to `Some`, even when every
/// sub-field is empty; anything else (missing, `null`, scalar) is absent and
/// renders nothing.
fn normalize_procedure_details(fields: &Value) -> Option<ProcedureDetails> {
    let details = fields.get("procedureDetails")?;
    details.as_object()?;

    Some(ProcedureDetails {
        duration: opt_string(details, "duration"),
        frequency: opt_string(details, "frequency"),
        preparation: opt_string(details, "preparation"),
        anesthesia: opt_string(details, "anesthesia"),
        course: opt_string(details, "course"),
        effect: opt_string(details, "effect"),
    })
}

/// Decodes a rich-text field into blocks, absent unless the value is an
/// array. Each block decodes independently; a block that cannot be read
/// (unknown tag, malformed children) becomes [`RichTextBlock::Unsupported`]
/// and renders to nothing.
fn rich_text(fields: &Value, key: &str) -> Option<Vec<RichTextBlock>> {
    let blocks = fields.get(key)?.as_array()?;
    Some(
        blocks
            .iter()
            .map(|block| {
                serde_json::from_value(block.clone()).unwrap_or(RichTextBlock::Unsupported)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use velora_core::{group_by_first_letter, PRICE_CELL_PLACEHOLDER};

    // -----------------------------------------------------------------------
    // normalize_service — field defaults
    // -----------------------------------------------------------------------

    #[test]
    fn flat_record_normalizes_all_fields() {
        let record = json!({
            "id": 3,
            "documentId": "doc-abc",
            "title": "Лазерная эпиляция",
            "description": "Диодный лазер",
            "slug": "lazernaya-epilyaciya",
            "images": [{ "url": "/uploads/laser.jpg" }],
            "priceList": [{ "id": 1, "name": "Голень", "unit": "зона" }],
            "procedureDetails": { "duration": "30 мин" },
            "note": "Запись за день"
        });

        let service = normalize_service(&record);
        assert_eq!(service.id, 3);
        assert_eq!(service.document_id.as_deref(), Some("doc-abc"));
        assert_eq!(service.title, "Лазерная эпиляция");
        assert_eq!(service.slug, "lazernaya-epilyaciya");
        assert_eq!(service.images.len(), 1);
        assert_eq!(service.price_list.len(), 1);
        assert_eq!(
            service.procedure_details.as_ref().unwrap().duration.as_deref(),
            Some("30 мин")
        );
        assert_eq!(service.note.as_deref(), Some("Запись за день"));
    }

    #[test]
    fn wrapped_record_reads_fields_from_attributes() {
        let record = json!({
            "id": 9,
            "attributes": {
                "title": "Массаж лица",
                "slug": "massazh-lica"
            }
        });

        let service = normalize_service(&record);
        assert_eq!(service.id, 9);
        assert_eq!(service.title, "Массаж лица");
        assert_eq!(service.slug, "massazh-lica");
    }

    #[test]
    fn missing_title_becomes_placeholder() {
        let service = normalize_service(&json!({ "id": 1 }));
        assert_eq!(service.title, TITLE_PLACEHOLDER);
    }

    #[test]
    fn empty_title_becomes_placeholder() {
        let service = normalize_service(&json!({ "id": 1, "title": "" }));
        assert_eq!(service.title, TITLE_PLACEHOLDER);
    }

    #[test]
    fn null_title_becomes_placeholder() {
        let service = normalize_service(&json!({ "id": 1, "title": null }));
        assert_eq!(service.title, TITLE_PLACEHOLDER);
    }

    #[test]
    fn missing_slug_derives_from_id() {
        let service = normalize_service(&json!({ "id": 41 }));
        assert_eq!(service.slug, "service-41");
    }

    #[test]
    fn missing_description_becomes_empty_string() {
        let service = normalize_service(&json!({ "id": 1 }));
        assert_eq!(service.description, "");
    }

    #[test]
    fn missing_optional_sections_stay_absent() {
        let service = normalize_service(&json!({ "id": 1 }));
        assert!(service.procedure_details.is_none());
        assert!(service.indications.is_none());
        assert!(service.effect_description.is_none());
        assert!(service.contraindications.is_none());
        assert!(service.note.is_none());
        assert!(service.images.is_empty());
        assert!(service.price_list.is_empty());
    }

    #[test]
    fn malformed_collections_resolve_to_empty() {
        let record = json!({
            "id": 1,
            "images": "not-an-array",
            "priceList": 17,
            "indications": { "oops": true }
        });
        let service = normalize_service(&record);
        assert!(service.images.is_empty());
        assert!(service.price_list.is_empty());
        assert!(service.indications.is_none());
    }

    #[test]
    fn present_but_empty_procedure_details_is_some() {
        let service = normalize_service(&json!({ "id": 1, "procedureDetails": {} }));
        let details = service.procedure_details.expect("present section");
        assert!(details.is_empty());
    }

    #[test]
    fn null_procedure_details_is_absent() {
        let service = normalize_service(&json!({ "id": 1, "procedureDetails": null }));
        assert!(service.procedure_details.is_none());
    }

    // -----------------------------------------------------------------------
    // images
    // -----------------------------------------------------------------------

    #[test]
    fn image_formats_decode_from_url_objects() {
        let record = json!({
            "id": 1,
            "images": [{
                "url": "/uploads/peeling.jpg",
                "formats": {
                    "thumbnail": { "url": "/uploads/thumb_peeling.jpg" },
                    "medium": { "url": "/uploads/medium_peeling.jpg" },
                    "banner": { "url": "/uploads/banner.jpg" }
                }
            }]
        });
        let service = normalize_service(&record);
        let image = &service.images[0];
        assert_eq!(
            image.variant_url(ImageVariant::Thumbnail),
            "/uploads/thumb_peeling.jpg"
        );
        // Unknown size names are outside the closed variant set.
        assert_eq!(image.formats.len(), 2);
    }

    #[test]
    fn image_formats_decode_from_plain_strings() {
        let record = json!({
            "id": 1,
            "images": [{
                "url": "/uploads/a.jpg",
                "formats": { "small": "/uploads/small_a.jpg" }
            }]
        });
        let service = normalize_service(&record);
        assert_eq!(
            service.images[0].variant_url(ImageVariant::Small),
            "/uploads/small_a.jpg"
        );
    }

    #[test]
    fn images_under_data_key_are_unwrapped() {
        let record = json!({
            "id": 1,
            "images": { "data": [
                { "id": 7, "attributes": { "url": "/uploads/wrapped.jpg" } }
            ]}
        });
        let service = normalize_service(&record);
        assert_eq!(service.images[0].url, "/uploads/wrapped.jpg");
    }

    #[test]
    fn images_without_base_url_are_dropped() {
        let record = json!({
            "id": 1,
            "images": [
                { "formats": { "medium": "/uploads/m.jpg" } },
                { "url": "/uploads/kept.jpg" }
            ]
        });
        let service = normalize_service(&record);
        assert_eq!(service.images.len(), 1);
        assert_eq!(service.images[0].url, "/uploads/kept.jpg");
    }

    // -----------------------------------------------------------------------
    // price list
    // -----------------------------------------------------------------------

    #[test]
    fn price_entries_keep_absent_fields_as_none() {
        let record = json!({
            "id": 1,
            "priceList": [
                { "id": 10, "name": "Зона бикини", "unit": "" },
                { "id": 11, "duration": "45 мин" }
            ]
        });
        let service = normalize_service(&record);
        assert_eq!(service.price_list.len(), 2);
        assert!(service.price_list[0].unit.is_none());
        assert_eq!(service.price_list[0].unit_cell(), PRICE_CELL_PLACEHOLDER);
        assert!(service.price_list[1].name.is_none());
        assert_eq!(service.price_list[1].duration_cell(), "45 мин");
    }

    // -----------------------------------------------------------------------
    // rich text
    // -----------------------------------------------------------------------

    #[test]
    fn rich_text_decodes_paragraphs_and_keeps_unknown_blocks_inert() {
        let record = json!({
            "id": 1,
            "indications": [
                { "type": "paragraph", "children": [{ "text": "Показания", "bold": true }] },
                { "type": "heading", "level": 2 }
            ]
        });
        let service = normalize_service(&record);
        let blocks = service.indications.expect("present rich text");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], RichTextBlock::Paragraph { .. }));
        assert_eq!(blocks[1], RichTextBlock::Unsupported);
    }

    #[test]
    fn malformed_rich_text_block_becomes_unsupported() {
        let record = json!({
            "id": 1,
            "contraindications": [
                { "type": "paragraph", "children": "not-an-array" }
            ]
        });
        let service = normalize_service(&record);
        let blocks = service.contraindications.expect("present rich text");
        assert_eq!(blocks, vec![RichTextBlock::Unsupported]);
    }

    // -----------------------------------------------------------------------
    // normalize_services — batch behavior
    // -----------------------------------------------------------------------

    #[test]
    fn empty_batch_yields_empty_output() {
        assert!(normalize_services(&[]).is_empty());
    }

    #[test]
    fn batch_tolerates_mixed_shapes() {
        let records = [
            json!({ "id": 1, "title": "Flat" }),
            json!({ "id": 2, "attributes": { "title": "Wrapped" } }),
        ];
        let services = normalize_services(&records);
        assert_eq!(services[0].title, "Flat");
        assert_eq!(services[1].title, "Wrapped");
    }

    #[test]
    fn duplicate_explicit_slugs_fall_back_to_id_derived() {
        let records = [
            json!({ "id": 1, "slug": "peeling" }),
            json!({ "id": 2, "slug": "peeling" }),
        ];
        let services = normalize_services(&records);
        // First occurrence wins; the later collider stays addressable.
        assert_eq!(services[0].slug, "peeling");
        assert_eq!(services[1].slug, "service-2");
    }

    #[test]
    fn missing_slugs_are_unique_when_ids_are_unique() {
        let records = [json!({ "id": 1 }), json!({ "id": 2 }), json!({ "id": 3 })];
        let services = normalize_services(&records);
        let slugs: HashSet<&str> = services.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs.len(), 3);
    }

    #[test]
    fn titleless_records_group_under_sentinel_after_normalization() {
        let records = [json!({ "id": 1 }), json!({ "id": 2, "title": "Банан" })];
        let services = normalize_services(&records);
        assert_eq!(services[0].title, TITLE_PLACEHOLDER);

        let groups = group_by_first_letter(services);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["#", "Б"]);
    }

    #[test]
    fn normalization_is_idempotent_on_canonical_records() {
        let record = json!({
            "id": 5,
            "documentId": "doc-5",
            "title": "Чистка лица",
            "description": "Ультразвуковая чистка",
            "slug": "chistka-lica",
            "images": [{
                "url": "/uploads/c.jpg",
                "formats": { "thumbnail": "/uploads/thumb_c.jpg" }
            }],
            "priceList": [{
                "id": 2,
                "name": "Комплекс",
                "description": "Чистка + уход",
                "unit": "процедура",
                "duration": "90 мин"
            }],
            "procedureDetails": {
                "duration": "90 мин",
                "frequency": "раз в месяц",
                "preparation": "не требуется",
                "anesthesia": "не требуется",
                "course": "4 процедуры",
                "effect": "чистая кожа"
            },
            "indications": [
                { "type": "paragraph", "children": [{ "text": "Акне", "bold": false, "italic": false }] }
            ],
            "effectDescription": [
                { "type": "paragraph", "children": [{ "text": "Сразу", "bold": true, "italic": false }] }
            ],
            "contraindications": [
                { "type": "paragraph", "children": [{ "text": "Купероз", "bold": false, "italic": true }] }
            ],
            "note": "Курс со скидкой"
        });

        let first = normalize_service(&record);
        let reserialized = serde_json::to_value(&first).expect("canonical record serializes");
        let second = normalize_service(&reserialized);
        assert_eq!(first, second);
    }
}
