use std::path::{Path, PathBuf};

use crate::config::CatalogConfig;

/// Reserved folder under a project's shape directory holding premade
/// avatars; never listed as a base.
pub const PREMADES_DIR: &str = "Legends";

/// List immediate subdirectory names, sorted lexicographically so that
/// discovery indices are stable across runs and platforms. An absent or
/// unreadable directory yields an empty list; missing assets are a normal
/// state, not an error.
fn list_dirs(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn discover_projects(config: &CatalogConfig) -> Vec<String> {
    list_dirs(&config.avatars_root())
}

/// Bases of a project: subdirectories of its shape folder, minus the
/// reserved premades folder. The configured default base (if any, and if it
/// exists) is sorted first; the rest stay alphabetical.
pub fn discover_bases(
    config: &CatalogConfig,
    project: &str,
    default_base: Option<&str>,
) -> Vec<String> {
    let mut bases: Vec<String> = list_dirs(&shape_dir(config, project))
        .into_iter()
        .filter(|name| name != PREMADES_DIR)
        .collect();
    if let Some(default) = default_base
        && let Some(pos) = bases.iter().position(|b| b == default)
    {
        let default = bases.remove(pos);
        bases.insert(0, default);
    }
    bases
}

pub fn discover_category_ids(config: &CatalogConfig, project: &str, base: &str) -> Vec<String> {
    list_dirs(&base_dir(config, project, base))
}

/// Sub-categories of one variant folder. Every subdirectory counts; there
/// is no allow-list.
pub fn discover_variant_subdirs(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant: &str,
) -> Vec<String> {
    list_dirs(&variant_dir(config, project, base, variant))
}

/// Frame files of an animated trait folder: names with an all-digit stem
/// and a `.png` extension (any case), sorted by the numeric value of the
/// stem, then by name. `"10.png"` sorts after `"2.png"`.
pub fn discover_animated_frames(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut frames: Vec<(u32, String)> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            frame_index(&name).map(|index| (index, name))
        })
        .collect();
    frames.sort();
    frames.into_iter().map(|(_, name)| name).collect()
}

/// Numeric stem of a frame filename, or `None` when the name is not an
/// all-digit `.png`.
pub fn frame_index(name: &str) -> Option<u32> {
    let (stem, ext) = name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case("png") {
        return None;
    }
    if stem.is_empty() || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

pub fn has_premades(config: &CatalogConfig, project: &str) -> bool {
    shape_dir(config, project).join(PREMADES_DIR).is_dir()
}

pub fn has_background(config: &CatalogConfig, project: &str) -> bool {
    background_dir(config, project).is_dir()
}

/// Name of the project's base-default image when one is present.
pub fn default_image_filename(config: &CatalogConfig, project: &str) -> Option<&'static str> {
    shape_dir(config, project)
        .join("default.png")
        .is_file()
        .then_some("default.png")
}

fn traits_dir(config: &CatalogConfig, project: &str) -> PathBuf {
    config.avatars_root().join(project).join("traits")
}

fn shape_dir(config: &CatalogConfig, project: &str) -> PathBuf {
    traits_dir(config, project).join("shape")
}

fn base_dir(config: &CatalogConfig, project: &str, base: &str) -> PathBuf {
    shape_dir(config, project).join(base)
}

fn variant_dir(config: &CatalogConfig, project: &str, base: &str, variant: &str) -> PathBuf {
    base_dir(config, project, base).join("variant").join(variant)
}

fn background_dir(config: &CatalogConfig, project: &str) -> PathBuf {
    traits_dir(config, project).join("background")
}

pub fn trait_data_path(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category: &str,
) -> PathBuf {
    base_dir(config, project, base).join(category).join("data.json")
}

pub fn variant_subdir_data_path(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant: &str,
    subdir: &str,
) -> PathBuf {
    variant_dir(config, project, base, variant)
        .join(subdir)
        .join("data.json")
}

pub fn premades_data_path(config: &CatalogConfig, project: &str) -> PathBuf {
    shape_dir(config, project).join(PREMADES_DIR).join("data.json")
}

pub fn background_data_path(config: &CatalogConfig, project: &str) -> PathBuf {
    background_dir(config, project).join("data.json")
}

pub fn category_overrides_path(
    config: &CatalogConfig,
    project: &str,
    base: &str,
) -> PathBuf {
    base_dir(config, project, base).join("categories.json")
}

pub fn variant_overrides_path(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant: &str,
) -> PathBuf {
    variant_dir(config, project, base, variant).join("categories.json")
}

pub fn base_defaults_path(config: &CatalogConfig, project: &str, base: &str) -> PathBuf {
    base_dir(config, project, base).join("defaults.json")
}

pub fn manifest_path(config: &CatalogConfig, project: &str) -> PathBuf {
    config.avatars_root().join(project).join("manifest.json")
}

pub fn animated_trait_dir(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category: &str,
    trait_folder: &str,
) -> PathBuf {
    base_dir(config, project, base).join(category).join(trait_folder)
}

pub fn background_animated_dir(
    config: &CatalogConfig,
    project: &str,
    trait_folder: &str,
) -> PathBuf {
    background_dir(config, project).join(trait_folder)
}

pub fn trait_image_path(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category: &str,
    filename: &str,
) -> PathBuf {
    base_dir(config, project, base).join(category).join(filename)
}

pub fn variant_image_path(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant: &str,
    subdir: &str,
    filename: &str,
) -> PathBuf {
    variant_dir(config, project, base, variant)
        .join(subdir)
        .join(filename)
}

pub fn background_image_path(
    config: &CatalogConfig,
    project: &str,
    filename: &str,
) -> PathBuf {
    background_dir(config, project).join(filename)
}
