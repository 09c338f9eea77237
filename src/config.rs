use std::path::{Path, PathBuf};

use crate::error::{PaperdollError, PaperdollResult};

/// How composed image URLs are rooted: a locally served static mount or a CDN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingMode {
    Local,
    Cdn,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageServing {
    pub mode: ServingMode,
    pub local_base_url: String,
    pub cdn_base_url: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

/// Catalog configuration, normally read from a `config.json` next to the
/// deployment. Environment variables override individual fields after load.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    pub assets_base_path: PathBuf,
    pub image_serving: ImageServing,
    pub cache: CacheConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            assets_base_path: PathBuf::from("./assets"),
            image_serving: ImageServing {
                mode: ServingMode::Local,
                local_base_url: "http://localhost:3000/static".to_string(),
                cdn_base_url: String::new(),
            },
            cache: CacheConfig { ttl_seconds: 300 },
        }
    }
}

impl CatalogConfig {
    /// Read configuration from a JSON file and apply environment overrides.
    pub fn load(path: &Path) -> PaperdollResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PaperdollError::validation(format!("read config '{}': {e}", path.display()))
        })?;
        let mut config: CatalogConfig = serde_json::from_str(&raw).map_err(|e| {
            PaperdollError::validation(format!("parse config '{}': {e}", path.display()))
        })?;
        config.apply_env();
        Ok(config)
    }

    /// Apply `PAPERDOLL_ASSETS_ROOT`, `PAPERDOLL_IMAGE_MODE` and
    /// `PAPERDOLL_CDN_BASE_URL` on top of the loaded values. Unknown
    /// `PAPERDOLL_IMAGE_MODE` values are rejected later by `validate`.
    pub fn apply_env(&mut self) {
        if let Ok(root) = std::env::var("PAPERDOLL_ASSETS_ROOT")
            && !root.is_empty()
        {
            self.assets_base_path = PathBuf::from(root);
        }
        if let Ok(mode) = std::env::var("PAPERDOLL_IMAGE_MODE") {
            match mode.as_str() {
                "local" => self.image_serving.mode = ServingMode::Local,
                "cdn" => self.image_serving.mode = ServingMode::Cdn,
                _ => {}
            }
        }
        if let Ok(url) = std::env::var("PAPERDOLL_CDN_BASE_URL")
            && !url.is_empty()
        {
            self.image_serving.cdn_base_url = url;
        }
    }

    pub fn validate(&self) -> PaperdollResult<()> {
        if self.assets_base_path.as_os_str().is_empty() {
            return Err(PaperdollError::validation("assetsBasePath must be set"));
        }
        match self.image_serving.mode {
            ServingMode::Local if self.image_serving.local_base_url.trim().is_empty() => Err(
                PaperdollError::validation("localBaseUrl must be set in local mode"),
            ),
            ServingMode::Cdn if self.image_serving.cdn_base_url.trim().is_empty() => Err(
                PaperdollError::validation("cdnBaseUrl must be set in cdn mode"),
            ),
            _ => Ok(()),
        }
    }

    /// Base URL that public image paths are appended to.
    pub fn image_base_url(&self) -> &str {
        match self.image_serving.mode {
            ServingMode::Cdn => &self.image_serving.cdn_base_url,
            ServingMode::Local => &self.image_serving.local_base_url,
        }
    }

    /// Root directory of the avatar asset tree.
    pub fn avatars_root(&self) -> PathBuf {
        self.assets_base_path.join("avatars")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_matches_wire_names() {
        let s = r#"{
            "assetsBasePath": "/srv/assets",
            "imageServing": { "mode": "cdn", "localBaseUrl": "http://localhost:3000/static", "cdnBaseUrl": "https://cdn.example.com" },
            "cache": { "ttlSeconds": 60 }
        }"#;
        let config: CatalogConfig = serde_json::from_str(s).unwrap();
        assert_eq!(config.assets_base_path, PathBuf::from("/srv/assets"));
        assert_eq!(config.image_serving.mode, ServingMode::Cdn);
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.image_base_url(), "https://cdn.example.com");
    }

    #[test]
    fn default_serves_locally() {
        let config = CatalogConfig::default();
        config.validate().unwrap();
        assert_eq!(config.image_serving.mode, ServingMode::Local);
        assert_eq!(config.image_base_url(), "http://localhost:3000/static");
    }

    #[test]
    fn cdn_mode_requires_cdn_url() {
        let mut config = CatalogConfig::default();
        config.image_serving.mode = ServingMode::Cdn;
        assert!(config.validate().is_err());
        config.image_serving.cdn_base_url = "https://cdn.example.com".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn load_missing_file_is_validation_error() {
        let err = CatalogConfig::load(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, PaperdollError::Validation(_)));
    }

    #[test]
    fn load_malformed_file_is_validation_error() {
        let dir = std::env::temp_dir().join(format!(
            "paperdoll_config_{}_{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let err = CatalogConfig::load(&path).unwrap_err();
        assert!(matches!(err, PaperdollError::Validation(_)));
        assert!(err.to_string().contains("config.json"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
