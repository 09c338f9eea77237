#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod error;
pub mod items;
pub mod meta;
pub mod model;
pub mod render;
pub mod scan;
pub mod urls;

pub use cache::TtlCache;
pub use config::{CatalogConfig, ImageServing, ServingMode};
pub use error::{PaperdollError, PaperdollResult};
pub use model::{
    BaseDefaults, BaseDetail, CategoryDetail, CategoryMeta, CategoryOverride, Frame, LayerDepth,
    ManifestFile, PremadeItem, ProjectManifest, RawTrait, RenderRequest, TraitItem, TraitMeta,
    TraitTree, TraitTreeCategory, VariantDetail, VariantSubCategory,
};
pub use render::{TraitIndex, composite_avatar, compose_layers};
