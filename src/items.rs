use std::path::Path;

use crate::config::CatalogConfig;
use crate::error::{PaperdollError, PaperdollResult};
use crate::meta;
use crate::model::{
    BaseDetail, CategoryDetail, Frame, PremadeItem, ProjectManifest, RawTrait, TraitItem,
    TraitMeta, TraitTree, TraitTreeCategory, VariantDetail, VariantSubCategory,
};
use crate::scan;
use crate::urls;

/// Read one `data.json`. A missing file, an empty/whitespace-only file and
/// a literal `[]` all mean "no traits"; anything else must parse.
pub fn read_data_json(path: &Path) -> PaperdollResult<Vec<RawTrait>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path).map_err(|e| {
        PaperdollError::override_file(format!("read '{}': {e}", path.display()))
    })?;
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed)
        .map_err(|e| PaperdollError::override_file(format!("parse '{}': {e}", path.display())))
}

fn split_training_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn build_meta(raw: &RawTrait) -> Option<TraitMeta> {
    let meta = TraitMeta {
        chance: raw.chance,
        training_tags: raw
            .training_tags
            .as_deref()
            .filter(|tags| !tags.is_empty())
            .map(split_training_tags),
    };
    (!meta.is_empty()).then_some(meta)
}

fn base_item(raw: &RawTrait) -> TraitItem {
    TraitItem {
        id: raw.id.clone(),
        name: raw.name.clone(),
        is_animated: raw.is_animated,
        image_url: None,
        frames: None,
        blocked_by: raw.blocked_by.clone(),
        require: raw.require.clone(),
        multi_trait: raw.multi_trait.clone(),
        meta: build_meta(raw),
    }
}

fn raw_to_trait_item(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category: &str,
    raw: &RawTrait,
) -> TraitItem {
    let mut item = base_item(raw);
    if raw.is_animated {
        let dir = scan::animated_trait_dir(config, project, base, category, &raw.path);
        item.frames = Some(
            scan::discover_animated_frames(&dir)
                .into_iter()
                .filter_map(|file| {
                    let index = scan::frame_index(&file)?;
                    Some(Frame {
                        index,
                        image_url: urls::frame_url(config, project, base, category, &raw.path, &file),
                    })
                })
                .collect(),
        );
    } else if raw.is_image {
        item.image_url = Some(urls::trait_image_url(config, project, base, category, &raw.path));
    }
    item
}

fn raw_to_background_item(config: &CatalogConfig, project: &str, raw: &RawTrait) -> TraitItem {
    let mut item = base_item(raw);
    if raw.is_animated {
        let dir = scan::background_animated_dir(config, project, &raw.path);
        item.frames = Some(
            scan::discover_animated_frames(&dir)
                .into_iter()
                .filter_map(|file| {
                    let index = scan::frame_index(&file)?;
                    Some(Frame {
                        index,
                        image_url: urls::background_frame_url(config, project, &raw.path, &file),
                    })
                })
                .collect(),
        );
    } else if raw.is_image {
        item.image_url = Some(urls::background_image_url(config, project, &raw.path));
    }
    item
}

/// Variant sub-traits never carry frame sequences; only plain images get a
/// URL.
fn raw_to_variant_sub_item(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant: &str,
    subdir: &str,
    raw: &RawTrait,
) -> TraitItem {
    let mut item = base_item(raw);
    if raw.is_image {
        item.image_url = Some(urls::variant_image_url(
            config, project, base, variant, subdir, &raw.path,
        ));
    }
    item
}

fn load_background_items(config: &CatalogConfig, project: &str) -> PaperdollResult<Vec<TraitItem>> {
    let raw_items = read_data_json(&scan::background_data_path(config, project))?;
    Ok(raw_items
        .iter()
        .map(|raw| raw_to_background_item(config, project, raw))
        .collect())
}

/// Items of one category. The `background` category reads the project-level
/// background data file; everything else reads the base-scoped one.
pub fn load_category_items(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category_id: &str,
) -> PaperdollResult<Vec<TraitItem>> {
    if category_id == "background" {
        return load_background_items(config, project);
    }
    let raw_items = read_data_json(&scan::trait_data_path(config, project, base, category_id))?;
    Ok(raw_items
        .iter()
        .map(|raw| raw_to_trait_item(config, project, base, category_id, raw))
        .collect())
}

pub fn load_category_detail(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category_id: &str,
) -> PaperdollResult<CategoryDetail> {
    let all_meta = meta::load_category_meta(config, project, base)?;
    let category = all_meta
        .into_iter()
        .find(|c| c.id == category_id)
        .ok_or_else(|| {
            PaperdollError::not_found(format!(
                "category '{category_id}' not found for base '{base}'"
            ))
        })?;
    let items = load_category_items(config, project, base, category_id)?;
    Ok(CategoryDetail {
        category,
        base: base.to_string(),
        project: project.to_string(),
        items,
    })
}

pub fn load_single_trait(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category_id: &str,
    trait_id: &str,
) -> PaperdollResult<TraitItem> {
    let items = load_category_items(config, project, base, category_id)?;
    items
        .into_iter()
        .find(|item| item.id == trait_id)
        .ok_or_else(|| {
            PaperdollError::not_found(format!(
                "trait '{trait_id}' not found in '{category_id}'"
            ))
        })
}

/// Every category of a base with its items attached, in listing order.
pub fn load_trait_tree(
    config: &CatalogConfig,
    project: &str,
    base: &str,
) -> PaperdollResult<TraitTree> {
    let cat_metas = meta::load_category_meta(config, project, base)?;
    if cat_metas.is_empty() {
        return Err(PaperdollError::not_found(format!(
            "base '{base}' not found in project '{project}'"
        )));
    }
    let mut categories = Vec::with_capacity(cat_metas.len());
    for cat in cat_metas {
        let items = load_category_items(config, project, base, &cat.id)?;
        categories.push(TraitTreeCategory { category: cat, items });
    }
    Ok(TraitTree {
        base: base.to_string(),
        project: project.to_string(),
        categories,
    })
}

/// All variants of a base with their nested sub-categories and items. Each
/// record of the base's `variant/data.json` names a variant; its `path` is
/// the variant's folder name.
pub fn load_variants(
    config: &CatalogConfig,
    project: &str,
    base: &str,
) -> PaperdollResult<Vec<VariantDetail>> {
    let raw_variants = read_data_json(&scan::trait_data_path(config, project, base, "variant"))?;

    let mut variants = Vec::with_capacity(raw_variants.len());
    for raw in &raw_variants {
        let sub_meta = meta::load_variant_sub_category_meta(config, project, base, &raw.path)?;
        let mut sub_categories = Vec::with_capacity(sub_meta.len());
        for sc in sub_meta {
            let data_path =
                scan::variant_subdir_data_path(config, project, base, &raw.path, &sc.id);
            let sub_items = read_data_json(&data_path)?;
            sub_categories.push(VariantSubCategory {
                items: sub_items
                    .iter()
                    .map(|s| raw_to_variant_sub_item(config, project, base, &raw.path, &sc.id, s))
                    .collect(),
                id: sc.id,
                name: sc.name,
                order: sc.order,
                z_index: sc.z_index,
                icon_url: sc.icon_url,
                animation: sc.animation,
            });
        }
        variants.push(VariantDetail {
            id: raw.id.clone(),
            name: raw.name.clone(),
            sub_categories,
        });
    }
    Ok(variants)
}

/// Case-insensitive lookup of one variant by name.
pub fn load_single_variant(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant_name: &str,
) -> PaperdollResult<VariantDetail> {
    let variants = load_variants(config, project, base)?;
    let wanted = variant_name.to_lowercase();
    variants
        .into_iter()
        .find(|v| v.name.to_lowercase() == wanted)
        .ok_or_else(|| PaperdollError::not_found(format!("variant '{variant_name}' not found")))
}

/// Premade avatars: a flat list with no category nesting. Premade metadata
/// carries training tags only.
pub fn load_premades(config: &CatalogConfig, project: &str) -> PaperdollResult<Vec<PremadeItem>> {
    let raw_items = read_data_json(&scan::premades_data_path(config, project))?;
    Ok(raw_items
        .iter()
        .map(|raw| {
            let meta = raw
                .training_tags
                .as_deref()
                .filter(|tags| !tags.is_empty())
                .map(|tags| TraitMeta {
                    chance: None,
                    training_tags: Some(split_training_tags(tags)),
                });
            PremadeItem {
                id: raw.id.clone(),
                name: raw.name.clone(),
                image_url: urls::premade_image_url(config, project, &raw.path),
                meta,
            }
        })
        .collect())
}

pub fn list_bases(config: &CatalogConfig, project: &str) -> PaperdollResult<Vec<String>> {
    let manifest = meta::load_manifest_file(config, project)?;
    Ok(scan::discover_bases(
        config,
        project,
        manifest.default_base.as_deref(),
    ))
}

pub fn project_manifest(config: &CatalogConfig, project: &str) -> PaperdollResult<ProjectManifest> {
    let manifest = meta::load_manifest_file(config, project)?;
    let bases = scan::discover_bases(config, project, manifest.default_base.as_deref());
    if bases.is_empty() {
        return Err(PaperdollError::not_found(format!(
            "project '{project}' not found"
        )));
    }
    Ok(ProjectManifest {
        name: project.to_string(),
        bases,
        has_premades: scan::has_premades(config, project),
        default_base: manifest.default_base,
    })
}

pub fn base_detail(config: &CatalogConfig, project: &str, base: &str) -> PaperdollResult<BaseDetail> {
    let categories = meta::load_category_meta(config, project, base)?;
    if categories.is_empty() {
        return Err(PaperdollError::not_found(format!(
            "base '{base}' not found in project '{project}'"
        )));
    }
    let defaults = meta::load_base_defaults(config, project, base)?;
    Ok(BaseDetail {
        id: base.to_string(),
        name: meta::title_case(base),
        categories,
        defaults,
    })
}
