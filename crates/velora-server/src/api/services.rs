//! Page-data handlers: service grid, service detail, alphabetical catalog.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;

use velora_core::{
    as_list, render_blocks, ImageAsset, ImageVariant, Paragraph, ProcedureDetails, Service,
};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Card projection for the services grid.
#[derive(Debug, Serialize)]
pub(super) struct ServiceSummary {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
    /// Medium-variant URL of the cover image (base URL when the variant is
    /// absent), or `null` for services without images.
    pub image: Option<String>,
}

impl ServiceSummary {
    fn from_service(service: &Service, image_base: &str) -> Self {
        Self {
            id: service.id,
            title: service.title.clone(),
            slug: service.slug.clone(),
            description: service.description.clone(),
            image: service
                .cover_image()
                .map(|image| resolve_url(image_base, image.variant_url(ImageVariant::Medium))),
        }
    }
}

/// Resolves a content-source URL against the configured image base.
///
/// The normalizer passes image URLs through as given (usually relative to the
/// CMS origin); prefixing is a presentation concern and happens here. Absolute
/// URLs and an empty base pass through unchanged.
fn resolve_url(base: &str, url: &str) -> String {
    if base.is_empty() || url.starts_with("http://") || url.starts_with("https://") {
        return url.to_owned();
    }
    let base = base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}

fn resolve_image(base: &str, image: &ImageAsset) -> ImageAsset {
    ImageAsset {
        url: resolve_url(base, &image.url),
        formats: image
            .formats
            .iter()
            .map(|(variant, url)| (*variant, resolve_url(base, url)))
            .collect(),
    }
}

/// One price-table row with placeholder dashes already applied, so templates
/// print cells verbatim.
#[derive(Debug, Serialize)]
pub(super) struct PriceRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub unit: String,
    pub duration: String,
}

/// Full detail payload for a service page, rich text already rendered into
/// display trees.
#[derive(Debug, Serialize)]
pub(super) struct ServiceDetail {
    pub id: i64,
    pub document_id: Option<String>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub images: Vec<ImageAsset>,
    pub price_list: Vec<PriceRow>,
    pub procedure_details: Option<ProcedureDetails>,
    pub indications: Vec<Paragraph>,
    pub effect_description: Vec<Paragraph>,
    pub contraindications: Vec<Paragraph>,
    pub note: Option<String>,
}

impl ServiceDetail {
    fn from_service(service: &Service, image_base: &str) -> Self {
        Self {
            id: service.id,
            document_id: service.document_id.clone(),
            title: service.title.clone(),
            slug: service.slug.clone(),
            description: service.description.clone(),
            images: service
                .images
                .iter()
                .map(|image| resolve_image(image_base, image))
                .collect(),
            price_list: service
                .price_list
                .iter()
                .map(|entry| PriceRow {
                    id: entry.id,
                    name: entry.name_cell().to_owned(),
                    description: entry.description_cell().to_owned(),
                    unit: entry.unit_cell().to_owned(),
                    duration: entry.duration_cell().to_owned(),
                })
                .collect(),
            procedure_details: service.procedure_details.clone(),
            indications: render_blocks(service.indications.as_deref()),
            effect_description: render_blocks(service.effect_description.as_deref()),
            contraindications: render_blocks(service.contraindications.as_deref()),
            note: service.note.clone(),
        }
    }
}

/// One bucket of the alphabetical index, members projected to cards.
#[derive(Debug, Serialize)]
pub(super) struct CatalogGroup {
    pub key: String,
    pub members: Vec<ServiceSummary>,
}

pub(super) async fn list_services(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ServiceSummary>>>, ApiError> {
    let Some(snapshot) = state.content.snapshot().await else {
        return Err(ApiError::content_unavailable(req_id.0));
    };

    let services: Vec<Service> = snapshot.services.as_ref().clone();
    let data = as_list(services)
        .iter()
        .map(|service| ServiceSummary::from_service(service, &state.image_base_url))
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_service(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<ServiceDetail>>, ApiError> {
    let Some(snapshot) = state.content.snapshot().await else {
        return Err(ApiError::content_unavailable(req_id.0));
    };

    let Some(service) = snapshot.services.iter().find(|s| s.slug == slug) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no service with slug '{slug}'"),
        ));
    };

    Ok(Json(ApiResponse {
        data: ServiceDetail::from_service(service, &state.image_base_url),
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<CatalogGroup>>>, ApiError> {
    let Some(snapshot) = state.content.snapshot().await else {
        return Err(ApiError::content_unavailable(req_id.0));
    };

    let data = snapshot
        .groups
        .iter()
        .map(|group| CatalogGroup {
            key: group.key.clone(),
            members: group
                .members
                .iter()
                .map(|service| ServiceSummary::from_service(service, &state.image_base_url))
                .collect(),
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use velora_core::{PriceListEntry, RichTextBlock, TextRun};

    fn base_service() -> Service {
        Service {
            id: 4,
            document_id: Some("doc-4".to_owned()),
            title: "Мезотерапия".to_owned(),
            description: "Инъекционная процедура".to_owned(),
            slug: "mezoterapiya".to_owned(),
            images: vec![],
            price_list: vec![],
            procedure_details: None,
            indications: None,
            effect_description: None,
            contraindications: None,
            note: None,
        }
    }

    #[test]
    fn summary_image_is_none_without_images() {
        let summary = ServiceSummary::from_service(&base_service(), "");
        assert!(summary.image.is_none());
    }

    #[test]
    fn summary_image_prefers_medium_variant() {
        let mut service = base_service();
        service.images = vec![ImageAsset {
            url: "/uploads/m.jpg".to_owned(),
            formats: BTreeMap::from([(ImageVariant::Medium, "/uploads/medium_m.jpg".to_owned())]),
        }];
        let summary = ServiceSummary::from_service(&service, "");
        assert_eq!(summary.image.as_deref(), Some("/uploads/medium_m.jpg"));
    }

    #[test]
    fn summary_image_falls_back_to_base_url() {
        let mut service = base_service();
        service.images = vec![ImageAsset {
            url: "/uploads/m.jpg".to_owned(),
            formats: BTreeMap::new(),
        }];
        let summary = ServiceSummary::from_service(&service, "");
        assert_eq!(summary.image.as_deref(), Some("/uploads/m.jpg"));
    }

    #[test]
    fn resolve_url_prefixes_relative_urls_only() {
        assert_eq!(
            resolve_url("https://cms.example.com", "/uploads/a.jpg"),
            "https://cms.example.com/uploads/a.jpg"
        );
        assert_eq!(
            resolve_url("https://cms.example.com/", "uploads/a.jpg"),
            "https://cms.example.com/uploads/a.jpg"
        );
        assert_eq!(
            resolve_url("https://cms.example.com", "https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(resolve_url("", "/uploads/a.jpg"), "/uploads/a.jpg");
    }

    #[test]
    fn detail_resolves_image_variants_against_the_base() {
        let mut service = base_service();
        service.images = vec![ImageAsset {
            url: "/uploads/m.jpg".to_owned(),
            formats: BTreeMap::from([(ImageVariant::Thumbnail, "/uploads/thumb_m.jpg".to_owned())]),
        }];
        let detail = ServiceDetail::from_service(&service, "https://cms.example.com");
        assert_eq!(detail.images[0].url, "https://cms.example.com/uploads/m.jpg");
        assert_eq!(
            detail.images[0].variant_url(ImageVariant::Thumbnail),
            "https://cms.example.com/uploads/thumb_m.jpg"
        );
    }

    #[test]
    fn detail_applies_placeholder_dashes_to_price_rows() {
        let mut service = base_service();
        service.price_list = vec![PriceListEntry {
            id: 1,
            name: Some("Лицо".to_owned()),
            description: None,
            unit: None,
            duration: None,
        }];
        let detail = ServiceDetail::from_service(&service, "");
        assert_eq!(detail.price_list[0].name, "Лицо");
        assert_eq!(detail.price_list[0].unit, "—");
        assert_eq!(detail.price_list[0].duration, "—");
    }

    #[test]
    fn detail_renders_rich_text_and_skips_unknown_blocks() {
        let mut service = base_service();
        service.indications = Some(vec![
            RichTextBlock::Paragraph {
                children: vec![TextRun {
                    text: "Сухость кожи".to_owned(),
                    bold: false,
                    italic: false,
                }],
            },
            RichTextBlock::Unsupported,
        ]);
        let detail = ServiceDetail::from_service(&service, "");
        assert_eq!(detail.indications.len(), 1);
        // Absent rich-text fields render as empty trees, not errors.
        assert!(detail.contraindications.is_empty());
    }

    #[test]
    fn detail_is_serializable() {
        let detail = ServiceDetail::from_service(&base_service(), "");
        let json = serde_json::to_string(&detail).expect("serialize");
        assert!(json.contains("\"slug\":\"mezoterapiya\""));
    }
}
