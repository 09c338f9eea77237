use crate::config::CatalogConfig;
use crate::scan::PREMADES_DIR;

/// Category icon names a catalog UI is expected to have artwork for.
pub const CATEGORY_ICONS: [&str; 14] = [
    "background",
    "variant",
    "ears",
    "top",
    "chain",
    "nose",
    "mouth",
    "eyes",
    "faceart",
    "glasses",
    "headgear",
    "suits",
    "pattern",
    "arms",
];

pub const UTILITY_ICONS: [&str; 4] = ["eye", "save", "close", "template"];

pub fn trait_image_url(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category: &str,
    filename: &str,
) -> String {
    format!(
        "{}/avatars/{project}/traits/shape/{base}/{category}/{filename}",
        config.image_base_url()
    )
}

pub fn frame_url(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    category: &str,
    trait_folder: &str,
    frame_filename: &str,
) -> String {
    format!(
        "{}/avatars/{project}/traits/shape/{base}/{category}/{trait_folder}/{frame_filename}",
        config.image_base_url()
    )
}

pub fn premade_image_url(config: &CatalogConfig, project: &str, filename: &str) -> String {
    format!(
        "{}/avatars/{project}/traits/shape/{PREMADES_DIR}/{filename}",
        config.image_base_url()
    )
}

pub fn default_image_url(config: &CatalogConfig, project: &str, filename: &str) -> String {
    format!(
        "{}/avatars/{project}/traits/shape/{filename}",
        config.image_base_url()
    )
}

pub fn background_image_url(config: &CatalogConfig, project: &str, filename: &str) -> String {
    format!(
        "{}/avatars/{project}/traits/background/{filename}",
        config.image_base_url()
    )
}

pub fn background_frame_url(
    config: &CatalogConfig,
    project: &str,
    trait_folder: &str,
    frame_filename: &str,
) -> String {
    format!(
        "{}/avatars/{project}/traits/background/{trait_folder}/{frame_filename}",
        config.image_base_url()
    )
}

pub fn variant_image_url(
    config: &CatalogConfig,
    project: &str,
    base: &str,
    variant: &str,
    subdir: &str,
    filename: &str,
) -> String {
    format!(
        "{}/avatars/{project}/traits/shape/{base}/variant/{variant}/{subdir}/{filename}",
        config.image_base_url()
    )
}

pub fn category_icon_url(config: &CatalogConfig, icon_name: &str) -> String {
    format!("{}/icons/categories/{icon_name}.svg", config.image_base_url())
}

pub fn utility_icon_url(config: &CatalogConfig, icon_name: &str) -> String {
    format!("{}/icons/utility/{icon_name}.svg", config.image_base_url())
}
