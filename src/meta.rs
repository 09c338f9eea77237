use std::collections::BTreeMap;
use std::path::Path;

use crate::config::CatalogConfig;
use crate::error::{PaperdollError, PaperdollResult};
use crate::model::{BaseDefaults, CategoryMeta, CategoryOverride, ManifestFile, VariantSubCategoryMeta};
use crate::scan;

/// Capitalize the first character, leaving the rest untouched.
pub(crate) fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Parse an optional `categories.json` override map. A missing file is not
/// an error; a present-but-unparsable one is a catalog authoring fault and
/// propagates, never gets silently ignored.
fn read_override_map(path: &Path) -> PaperdollResult<BTreeMap<String, CategoryOverride>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let raw = std::fs::read_to_string(path).map_err(|e| {
        PaperdollError::override_file(format!("read override '{}': {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        PaperdollError::override_file(format!("parse override '{}': {e}", path.display()))
    })
}

fn read_json_or_default<T: serde::de::DeserializeOwned + Default>(
    path: &Path,
) -> PaperdollResult<T> {
    if !path.exists() {
        return Ok(T::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|e| {
        PaperdollError::override_file(format!("read '{}': {e}", path.display()))
    })?;
    serde_json::from_str(&raw)
        .map_err(|e| PaperdollError::override_file(format!("parse '{}': {e}", path.display())))
}

/// A base's `defaults.json`, or empty defaults when the file is absent.
pub fn load_base_defaults(
    config: &CatalogConfig,
    project: &str,
    base: &str,
) -> PaperdollResult<BaseDefaults> {
    read_json_or_default(&scan::base_defaults_path(config, project, base))
}

/// A project's `manifest.json`, or an empty manifest when the file is absent.
pub fn load_manifest_file(config: &CatalogConfig, project: &str) -> PaperdollResult<ManifestFile> {
    read_json_or_default(&scan::manifest_path(config, project))
}

/// Resolve the ordered category list for one base.
///
/// Discovered directories are authoritative: an override entry can reshape
/// a category's metadata but never introduce or hide one. IDs absent from
/// the override map fall back to positional defaults (capitalized name,
/// `order`/`z_index` = discovery index). When the project has a background
/// folder and no `background` directory was discovered, a background
/// category is synthesized beneath everything at depth -1. Every category
/// is stamped with its default trait from `defaults.json` before the list
/// is sorted ascending by `order`.
#[tracing::instrument(skip(config))]
pub fn load_category_meta(
    config: &CatalogConfig,
    project: &str,
    base: &str,
) -> PaperdollResult<Vec<CategoryMeta>> {
    let ids = scan::discover_category_ids(config, project, base);
    let overrides = read_override_map(&scan::category_overrides_path(config, project, base))?;
    let defaults = load_base_defaults(config, project, base)?;

    let mut categories: Vec<CategoryMeta> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let ov = overrides.get(id).cloned().unwrap_or_default();
            CategoryMeta {
                id: id.clone(),
                name: ov.name.unwrap_or_else(|| title_case(id)),
                order: ov.order.unwrap_or(i as i32),
                z_index: ov.z_index.unwrap_or(i as i32),
                required: ov.required.unwrap_or(false),
                icon_url: ov.icon_url,
                default_trait_id: defaults.traits.get(id).cloned(),
                animation: ov.animation,
                animation_behavior: ov.animation_behavior,
            }
        })
        .collect();

    if scan::has_background(config, project) && !ids.iter().any(|id| id == "background") {
        let ov = overrides.get("background").cloned().unwrap_or_default();
        categories.push(CategoryMeta {
            id: "background".to_string(),
            name: ov.name.unwrap_or_else(|| "Background".to_string()),
            order: ov.order.unwrap_or(-1),
            z_index: ov.z_index.unwrap_or(-1),
            required: ov.required.unwrap_or(false),
            icon_url: ov.icon_url,
            default_trait_id: defaults.traits.get("background").cloned(),
            animation: Some(ov.animation.unwrap_or_else(|| "fade".to_string())),
            animation_behavior: Some(
                ov.animation_behavior.unwrap_or_else(|| "stack".to_string()),
            ),
        });
    }

    categories.sort_by_key(|c| c.order);
    Ok(categories)
}

/// Resolve the ordered sub-category list for one variant, following the
/// same override pattern as `load_category_meta` scoped to the variant
/// folder. Unlike top-level categories, a sub-category marked `hidden` in
/// the override map is dropped from the result.
pub fn load_variant_sub_category_meta(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant: &str,
) -> PaperdollResult<Vec<VariantSubCategoryMeta>> {
    let ids = scan::discover_variant_subdirs(config, project, base, variant);
    let overrides =
        read_override_map(&scan::variant_overrides_path(config, project, base, variant))?;

    let mut sub_categories: Vec<VariantSubCategoryMeta> = ids
        .iter()
        .enumerate()
        .filter_map(|(i, id)| {
            let ov = overrides.get(id).cloned().unwrap_or_default();
            if ov.hidden == Some(true) {
                return None;
            }
            Some(VariantSubCategoryMeta {
                id: id.clone(),
                name: ov.name.unwrap_or_else(|| title_case(id)),
                order: ov.order.unwrap_or(i as i32),
                z_index: ov.z_index.unwrap_or(i as i32),
                icon_url: ov.icon_url,
                animation: ov.animation,
            })
        })
        .collect();

    sub_categories.sort_by_key(|sc| sc.order);
    Ok(sub_categories)
}
