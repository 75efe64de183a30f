//! Configuration management.

use crate::error::StoreError;
use crate::persistence::{default_cache_dir, default_config_path, default_data_dir};
use locker_core::Rarity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default public catalog host.
pub const DEFAULT_CATALOG_BASE_URL: &str = "https://fortnite-api.com";

/// Default third footer line.
pub const DEFAULT_WATERMARK: &str = "locker";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Downloaded artwork, one `{id}.png` per item.
    #[serde(default = "default_cache_root")]
    pub cache_dir: PathBuf,
    /// Rendered group images.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Font, placeholder, logo and rarity backgrounds.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Third footer line.
    #[serde(default = "default_watermark")]
    pub watermark: String,
    /// Public cosmetic catalog host.
    #[serde(default = "default_catalog_base_url")]
    pub catalog_base_url: String,
    /// Worker threads composing tiles.
    #[serde(default = "default_tile_workers")]
    pub tile_workers: usize,
    /// Groups rendered by `check` when none are named.
    #[serde(default = "default_groups")]
    pub default_groups: Vec<String>,
}

fn default_cache_root() -> PathBuf {
    default_cache_dir().join("cosmetics")
}

fn default_output_dir() -> PathBuf {
    default_data_dir().join("output")
}

fn default_assets_dir() -> PathBuf {
    default_data_dir().join("assets")
}

fn default_watermark() -> String {
    DEFAULT_WATERMARK.to_string()
}

fn default_catalog_base_url() -> String {
    DEFAULT_CATALOG_BASE_URL.to_string()
}

fn default_tile_workers() -> usize {
    4
}

fn default_groups() -> Vec<String> {
    vec!["Skins".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_root(),
            output_dir: default_output_dir(),
            assets_dir: default_assets_dir(),
            watermark: default_watermark(),
            catalog_base_url: default_catalog_base_url(),
            tile_workers: default_tile_workers(),
            default_groups: default_groups(),
        }
    }
}

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path())
    }

    /// Saves configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.tile_workers == 0 {
            return Err(StoreError::Config("tile_workers must be at least 1".into()));
        }
        if !(self.catalog_base_url.starts_with("https://")
            || self.catalog_base_url.starts_with("http://"))
        {
            return Err(StoreError::Config(format!(
                "catalog_base_url is not an http(s) URL: {}",
                self.catalog_base_url
            )));
        }
        for group in &self.default_groups {
            locker_core::Group::parse(group)?;
        }
        Ok(())
    }

    /// Bundled asset locations under [`Config::assets_dir`].
    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths::new(&self.assets_dir)
    }
}

// ============================================================================
// Asset Paths
// ============================================================================

/// Conventional files under the assets directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    /// Label and footer font.
    pub font: PathBuf,
    /// Artwork used when an item's art is unavailable.
    pub placeholder: PathBuf,
    /// Footer logo.
    pub logo: PathBuf,
    /// One background per rarity tier.
    pub backgrounds_dir: PathBuf,
}

impl AssetPaths {
    /// Paths rooted at `assets_dir`.
    pub fn new(assets_dir: &Path) -> Self {
        Self {
            font: assets_dir.join("fonts").join("font.ttf"),
            placeholder: assets_dir.join("placeholder.png"),
            logo: assets_dir.join("logo.png"),
            backgrounds_dir: assets_dir.join("backgrounds"),
        }
    }

    /// Background tile for a rarity.
    pub fn background(&self, rarity: &Rarity) -> PathBuf {
        self.backgrounds_dir.join(rarity.background_file())
    }

    /// Background files that are expected but absent.
    pub fn missing_backgrounds(&self) -> Vec<PathBuf> {
        Rarity::all()
            .iter()
            .map(|rarity| self.background(rarity))
            .filter(|path| !path.exists())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tile_workers, 4);
        assert_eq!(config.catalog_base_url, DEFAULT_CATALOG_BASE_URL);
        assert_eq!(config.default_groups, vec!["Skins".to_string()]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "watermark": "discord.gg/x", "tile_workers": 8 }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.watermark, "discord.gg/x");
        assert_eq!(config.tile_workers, 8);
        assert_eq!(config.catalog_base_url, DEFAULT_CATALOG_BASE_URL);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            assets_dir: dir.path().join("assets"),
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "tile_workers": 0 }"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(StoreError::Config(_))));

        std::fs::write(&path, r#"{ "default_groups": ["Hats"] }"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(StoreError::Core(_))));
    }

    #[test]
    fn test_asset_paths() {
        let paths = AssetPaths::new(Path::new("/srv/assets"));
        assert_eq!(paths.logo, Path::new("/srv/assets/logo.png"));
        assert_eq!(
            paths.background(&Rarity::MarvelSeries),
            Path::new("/srv/assets/backgrounds/marvel.png")
        );
        assert_eq!(paths.missing_backgrounds().len(), 16);
    }
}
