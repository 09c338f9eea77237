use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::config::CatalogConfig;
use crate::error::{PaperdollError, PaperdollResult};
use crate::items::read_data_json;
use crate::meta;
use crate::model::{CategoryMeta, LayerDepth, RenderRequest};
use crate::scan;

/// Where one trait ID lives: its owning category, that category's
/// compositing depth, and the source image path.
#[derive(Clone, Debug)]
pub struct IndexedTrait {
    pub category: String,
    pub z_index: i32,
    pub file_path: PathBuf,
}

/// Reverse index from trait ID to source image, built once per
/// `(project, base)` by reading every non-variant category data file a
/// single time. Only renderable records (plain images, not animated) are
/// indexed. When the same ID appears in several categories, the first
/// category in scan order wins; project-level background traits fill in
/// last, beneath everything at the background's resolved depth.
pub struct TraitIndex {
    entries: HashMap<String, IndexedTrait>,
}

impl TraitIndex {
    #[tracing::instrument(skip(config, categories))]
    pub fn build(
        config: &CatalogConfig,
        project: &str,
        base: &str,
        categories: &[CategoryMeta],
    ) -> PaperdollResult<Self> {
        let depth_of: HashMap<&str, i32> = categories
            .iter()
            .map(|c| (c.id.as_str(), c.z_index))
            .collect();

        let mut entries = HashMap::new();
        for category in scan::discover_category_ids(config, project, base) {
            if category == "variant" {
                continue;
            }
            let raw = read_data_json(&scan::trait_data_path(config, project, base, &category))?;
            let z_index = depth_of.get(category.as_str()).copied().unwrap_or(0);
            for record in &raw {
                if !record.is_image || record.is_animated {
                    continue;
                }
                if entries.contains_key(&record.id) {
                    continue;
                }
                entries.insert(
                    record.id.clone(),
                    IndexedTrait {
                        category: category.clone(),
                        z_index,
                        file_path: scan::trait_image_path(
                            config, project, base, &category, &record.path,
                        ),
                    },
                );
            }
        }

        let background = read_data_json(&scan::background_data_path(config, project))?;
        if !background.is_empty() {
            let z_index = depth_of.get("background").copied().unwrap_or(-1);
            for record in &background {
                if !record.is_image || record.is_animated {
                    continue;
                }
                if entries.contains_key(&record.id) {
                    continue;
                }
                entries.insert(
                    record.id.clone(),
                    IndexedTrait {
                        category: "background".to_string(),
                        z_index,
                        file_path: scan::background_image_path(config, project, &record.path),
                    },
                );
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, trait_id: &str) -> Option<&IndexedTrait> {
        self.entries.get(trait_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Find a variant sub-trait by ID across all of the variant's
/// sub-directories, returning its image path and the sub-directory that
/// declared it. Sub-directories hidden from listings still participate.
pub fn resolve_variant_image(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant: &str,
    trait_id: &str,
) -> PaperdollResult<Option<(PathBuf, String)>> {
    for subdir in scan::discover_variant_subdirs(config, project, base, variant) {
        let data_path = scan::variant_subdir_data_path(config, project, base, variant, &subdir);
        let raw = read_data_json(&data_path)?;
        if let Some(record) = raw.iter().find(|t| t.id == trait_id && t.is_image) {
            let file_path =
                scan::variant_image_path(config, project, base, variant, &subdir, &record.path);
            return Ok(Some((file_path, subdir)));
        }
    }
    Ok(None)
}

/// One layer of a composition: a source image and its depth.
#[derive(Clone, Debug)]
pub struct ResolvedLayer {
    pub file_path: PathBuf,
    pub depth: LayerDepth,
}

fn decode_layer(path: &Path) -> PaperdollResult<RgbaImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| PaperdollError::render(format!("read layer '{}': {e}", path.display())))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| PaperdollError::render(format!("decode layer '{}': {e}", path.display())))?;
    Ok(img.to_rgba8())
}

fn encode_png(img: RgbaImage) -> PaperdollResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PaperdollError::render(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Flatten layers into one PNG. Layers are stable-sorted ascending by
/// depth, so equal depths keep their given order. The lowest layer becomes
/// the working canvas and every further layer is alpha-composited over it,
/// centre-aligned, at native resolution; the composited image is resized
/// exactly once at the end if its dimensions differ from the requested
/// ones. No layers at all produce a fully transparent canvas of the
/// requested size.
pub fn compose_layers(
    mut layers: Vec<ResolvedLayer>,
    width: u32,
    height: u32,
) -> PaperdollResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(PaperdollError::validation(
            "render dimensions must be at least 1x1",
        ));
    }

    layers.sort_by_key(|layer| layer.depth);

    if layers.is_empty() {
        return encode_png(RgbaImage::new(width, height));
    }

    let mut canvas = decode_layer(&layers[0].file_path)?;
    for layer in &layers[1..] {
        let top = decode_layer(&layer.file_path)?;
        let x = (i64::from(canvas.width()) - i64::from(top.width())) / 2;
        let y = (i64::from(canvas.height()) - i64::from(top.height())) / 2;
        image::imageops::overlay(&mut canvas, &top, x, y);
    }

    if canvas.width() != width || canvas.height() != height {
        canvas = image::imageops::resize(
            &canvas,
            width,
            height,
            image::imageops::FilterType::Lanczos3,
        );
    }

    encode_png(canvas)
}

/// Resolve a trait selection against the catalog and flatten it to a PNG.
///
/// Validation happens before any file access. Variant sub-traits (when a
/// variant is given alongside a non-empty selection) resolve first at
/// `(variant category depth, sub-category depth)`; regular traits resolve
/// through the trait index at `(category depth, 0)`. Any selection entry
/// without a match, or whose image file is missing, aborts the whole
/// render; no partial image is ever produced.
#[tracing::instrument(skip(config))]
pub fn composite_avatar(
    config: &CatalogConfig,
    project: &str,
    request: &RenderRequest,
) -> PaperdollResult<Vec<u8>> {
    request.validate()?;

    let categories = meta::load_category_meta(config, project, &request.base)?;
    if categories.is_empty() {
        return Err(PaperdollError::not_found(format!(
            "base '{}' not found in project '{project}'",
            request.base
        )));
    }

    let mut layers = Vec::new();

    if let Some(variant) = request.variant.as_deref()
        && !request.variant_traits.is_empty()
    {
        let variant_z = categories
            .iter()
            .find(|c| c.id == "variant")
            .map(|c| c.z_index)
            .unwrap_or(0);
        let sub_meta =
            meta::load_variant_sub_category_meta(config, project, &request.base, variant)?;
        let sub_depth: HashMap<&str, i32> = sub_meta
            .iter()
            .map(|sc| (sc.id.as_str(), sc.z_index))
            .collect();

        for trait_id in &request.variant_traits {
            let resolved =
                resolve_variant_image(config, project, &request.base, variant, trait_id)?;
            let Some((file_path, subdir)) = resolved else {
                return Err(PaperdollError::resolution(format!(
                    "variant trait not found: {trait_id}"
                )));
            };
            if !file_path.exists() {
                return Err(PaperdollError::resolution(format!(
                    "variant trait image file missing: {trait_id}"
                )));
            }
            let sub_z = sub_depth.get(subdir.as_str()).copied().unwrap_or(0);
            layers.push(ResolvedLayer {
                file_path,
                depth: LayerDepth::variant(variant_z, sub_z),
            });
        }
    }

    let index = TraitIndex::build(config, project, &request.base, &categories)?;
    for trait_id in &request.traits {
        let Some(entry) = index.get(trait_id) else {
            return Err(PaperdollError::resolution(format!(
                "trait not found: {trait_id}"
            )));
        };
        if !entry.file_path.exists() {
            return Err(PaperdollError::resolution(format!(
                "trait image file missing: {trait_id}"
            )));
        }
        layers.push(ResolvedLayer {
            file_path: entry.file_path.clone(),
            depth: LayerDepth::category(entry.z_index),
        });
    }

    compose_layers(layers, request.width, request.height)
}
