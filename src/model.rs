use std::collections::BTreeMap;

use crate::error::{PaperdollError, PaperdollResult};

/// One record of a `data.json` file, exactly as authored on disk.
///
/// `path` is an image filename for static traits and a folder name for
/// animated ones. Every field except identity defaults when absent so that
/// hand-authored files stay terse.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTrait {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub chance: Option<f64>,
    #[serde(default)]
    pub blocked_by: Vec<String>,
    #[serde(default)]
    pub require: Vec<String>,
    #[serde(default)]
    pub multi_trait: Vec<String>,
    #[serde(default)]
    pub is_animated: bool,
    #[serde(default)]
    pub is_image: bool,
    #[serde(default, rename = "training_tags")]
    pub training_tags: Option<String>,
}

/// One numbered frame of an animated trait. `index` is the integer filename
/// stem; frames are listed in ascending numeric order.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub index: u32,
    pub image_url: String,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_tags: Option<Vec<String>>,
}

impl TraitMeta {
    pub fn is_empty(&self) -> bool {
        self.chance.is_none() && self.training_tags.is_none()
    }
}

/// Client-facing trait record. `image_url` is always serialized (null for
/// animated and placeholder traits); `frames` only exists for animated
/// traits; `meta` is omitted entirely when it would be empty.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitItem {
    pub id: String,
    pub name: String,
    pub is_animated: bool,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<Frame>>,
    pub blocked_by: Vec<String>,
    pub require: Vec<String>,
    pub multi_trait: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<TraitMeta>,
}

/// Resolved category metadata. `order` controls listing order, `z_index`
/// compositing depth (lower renders first). `default_trait_id` is always
/// serialized so clients can distinguish "no default" explicitly.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMeta {
    pub id: String,
    pub name: String,
    pub order: i32,
    pub z_index: i32,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    pub default_trait_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_behavior: Option<String>,
}

/// One entry of a `categories.json` override map. Every field is optional;
/// absent fields keep their discovery-derived defaults. `hidden` is only
/// honored for variant sub-categories.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryOverride {
    pub name: Option<String>,
    pub order: Option<i32>,
    pub z_index: Option<i32>,
    pub required: Option<bool>,
    pub icon_url: Option<String>,
    pub animation: Option<String>,
    pub animation_behavior: Option<String>,
    pub hidden: Option<bool>,
}

/// A base's `defaults.json`: preselected trait per category, plus an
/// optional preselected variant and its sub-category traits.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseDefaults {
    #[serde(default)]
    pub traits: BTreeMap<String, String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub variant_traits: BTreeMap<String, String>,
}

impl BaseDefaults {
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty() && self.variant.is_none() && self.variant_traits.is_empty()
    }
}

/// A project's `manifest.json`.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestFile {
    #[serde(default)]
    pub default_base: Option<String>,
}

/// Resolved variant sub-category metadata, before items are attached.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSubCategoryMeta {
    pub id: String,
    pub name: String,
    pub order: i32,
    pub z_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSubCategory {
    pub id: String,
    pub name: String,
    pub order: i32,
    pub z_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    pub items: Vec<TraitItem>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDetail {
    pub id: String,
    pub name: String,
    pub sub_categories: Vec<VariantSubCategory>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremadeItem {
    pub id: String,
    pub name: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<TraitMeta>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    pub name: String,
    pub bases: Vec<String>,
    pub has_premades: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_base: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseDetail {
    pub id: String,
    pub name: String,
    pub categories: Vec<CategoryMeta>,
    pub defaults: BaseDefaults,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    pub category: CategoryMeta,
    pub base: String,
    pub project: String,
    pub items: Vec<TraitItem>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitTreeCategory {
    pub category: CategoryMeta,
    pub items: Vec<TraitItem>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitTree {
    pub base: String,
    pub project: String,
    pub categories: Vec<TraitTreeCategory>,
}

/// Compositing depth of one resolved layer. Regular traits sit at
/// `(category z, 0)`; a variant sub-trait sits at `(variant category z,
/// sub-category z)`, which nests every variant sub-layer between its
/// variant's depth and the next whole category depth. Comparison is
/// lexicographic via the derived `Ord`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct LayerDepth {
    pub z: i32,
    pub sub: i32,
}

impl LayerDepth {
    pub fn category(z: i32) -> Self {
        Self { z, sub: 0 }
    }

    pub fn variant(z: i32, sub: i32) -> Self {
        Self { z, sub }
    }
}

pub const DEFAULT_RENDER_DIMENSION: u32 = 1600;
pub const MAX_RENDER_DIMENSION: u32 = 4096;

fn default_dimension() -> u32 {
    DEFAULT_RENDER_DIMENSION
}

/// One render invocation: a base, the selected regular trait IDs, and an
/// optional variant with its selected sub-trait IDs.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub base: String,
    pub traits: Vec<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub variant_traits: Vec<String>,
    #[serde(default = "default_dimension")]
    pub width: u32,
    #[serde(default = "default_dimension")]
    pub height: u32,
}

impl RenderRequest {
    /// Check the request shape without touching the filesystem.
    pub fn validate(&self) -> PaperdollResult<()> {
        if self.base.trim().is_empty() {
            return Err(PaperdollError::validation("missing required field: base"));
        }
        if self.traits.is_empty() {
            return Err(PaperdollError::validation(
                "missing required field: traits (non-empty array)",
            ));
        }
        if self.traits.iter().any(|t| t.trim().is_empty()) {
            return Err(PaperdollError::validation("trait ids must be non-empty"));
        }
        if let Some(variant) = &self.variant
            && variant.trim().is_empty()
        {
            return Err(PaperdollError::validation("variant must be non-empty"));
        }
        if self.variant_traits.iter().any(|t| t.trim().is_empty()) {
            return Err(PaperdollError::validation(
                "variant trait ids must be non-empty",
            ));
        }
        if self.width < 1 || self.width > MAX_RENDER_DIMENSION {
            return Err(PaperdollError::validation(format!(
                "width must be between 1 and {MAX_RENDER_DIMENSION}"
            )));
        }
        if self.height < 1 || self.height > MAX_RENDER_DIMENSION {
            return Err(PaperdollError::validation(format!(
                "height must be between 1 and {MAX_RENDER_DIMENSION}"
            )));
        }
        Ok(())
    }
}
