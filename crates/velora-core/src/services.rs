//! Canonical service records, normalized for rendering.
//!
//! Everything here is post-normalization: required fields are always present
//! (defaults already substituted), optional sections are `Option` so templates
//! can skip them without branching on partially-filled sub-records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Placeholder title substituted when the content source omits one.
pub const TITLE_PLACEHOLDER: &str = "Без названия";

/// Placeholder rendered in price-table cells for absent values, keeping
/// column alignment intact.
pub const PRICE_CELL_PLACEHOLDER: &str = "—";

/// Fallback slug for a service whose source record carries no usable slug.
///
/// Ids are unique per content source, so id-derived slugs never collide with
/// each other.
#[must_use]
pub fn slug_for_id(id: i64) -> String {
    format!("service-{id}")
}

/// A cosmetology service, normalized for rendering.
///
/// Serializes with the same camelCase keys the content source uses, so a
/// canonical record normalizes back to an equal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Numeric identifier assigned by the content source.
    pub id: i64,
    /// Opaque string identifier from newer content-source versions.
    /// Display only — never used as a join key.
    pub document_id: Option<String>,
    /// Display title. Never empty; [`TITLE_PLACEHOLDER`] when the source
    /// omitted one.
    pub title: String,
    /// Short description for list views. Empty string when missing.
    pub description: String,
    /// URL slug, unique within a normalized batch. `service-<id>` when the
    /// source omitted one.
    pub slug: String,
    pub images: Vec<ImageAsset>,
    pub price_list: Vec<PriceListEntry>,
    /// Procedure fact sheet. `None` means the section is absent entirely and
    /// renders nothing — distinct from a present sheet with empty fields.
    pub procedure_details: Option<ProcedureDetails>,
    pub indications: Option<Vec<RichTextBlock>>,
    pub effect_description: Option<Vec<RichTextBlock>>,
    pub contraindications: Option<Vec<RichTextBlock>>,
    pub note: Option<String>,
}

impl Service {
    /// Returns `true` when the service has no real title — either an empty
    /// string or the placeholder the normalizer substitutes for missing ones.
    #[must_use]
    pub fn is_untitled(&self) -> bool {
        self.title.is_empty() || self.title == TITLE_PLACEHOLDER
    }

    /// First image, used as the card/cover image in list views.
    #[must_use]
    pub fn cover_image(&self) -> Option<&ImageAsset> {
        self.images.first()
    }
}

/// Pre-sized renditions of an [`ImageAsset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageVariant {
    Thumbnail,
    Small,
    Medium,
    Large,
}

/// An image with an always-present base URL and optional sized variants.
///
/// URLs are stored exactly as the content source returns them (usually
/// relative); prefixing with the configured image base URL is a rendering
/// concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub url: String,
    #[serde(default)]
    pub formats: BTreeMap<ImageVariant, String>,
}

impl ImageAsset {
    /// Resolves the display URL for `variant`, falling back to the base URL
    /// when the variant is absent. Never returns an unresolvable URL.
    #[must_use]
    pub fn variant_url(&self, variant: ImageVariant) -> &str {
        self.formats
            .get(&variant)
            .map_or(self.url.as_str(), String::as_str)
    }
}

/// One row of a service's price table.
///
/// Every text field is independently optional; the `*_cell` accessors render
/// absent values as [`PRICE_CELL_PLACEHOLDER`] so table columns stay aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListEntry {
    pub id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub duration: Option<String>,
}

impl PriceListEntry {
    #[must_use]
    pub fn name_cell(&self) -> &str {
        cell(self.name.as_deref())
    }

    #[must_use]
    pub fn description_cell(&self) -> &str {
        cell(self.description.as_deref())
    }

    #[must_use]
    pub fn unit_cell(&self) -> &str {
        cell(self.unit.as_deref())
    }

    #[must_use]
    pub fn duration_cell(&self) -> &str {
        cell(self.duration.as_deref())
    }
}

fn cell(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PRICE_CELL_PLACEHOLDER,
    }
}

/// Free-text procedure fact sheet shown on a service detail page.
///
/// Any subset of fields may be absent; each renders independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcedureDetails {
    pub duration: Option<String>,
    pub frequency: Option<String>,
    pub preparation: Option<String>,
    pub anesthesia: Option<String>,
    pub course: Option<String>,
    pub effect: Option<String>,
}

impl ProcedureDetails {
    /// `true` when every field is absent. A present-but-empty sheet is still
    /// distinct from an absent one on [`Service::procedure`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.duration.is_none()
            && self.frequency.is_none()
            && self.preparation.is_none()
            && self.anesthesia.is_none()
            && self.course.is_none()
            && self.effect.is_none()
    }
}

/// A structured rich-text block, tagged by `type` on the wire.
///
/// Only `paragraph` is recognized; any other tag decodes to [`Unsupported`]
/// and renders to nothing. This is a closed-world policy: unknown block types
/// are a designed no-op, not an error.
///
/// [`Unsupported`]: RichTextBlock::Unsupported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RichTextBlock {
    Paragraph {
        #[serde(default)]
        children: Vec<TextRun>,
    },
    #[serde(other)]
    Unsupported,
}

/// A run of text inside a paragraph block. `bold` and `italic` are
/// independent; both may be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}
