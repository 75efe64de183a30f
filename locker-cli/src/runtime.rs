//! Wiring from configuration to the pipeline.

use anyhow::{Context, Result};
use locker_core::{CosmeticOrder, ItemId, RankTables, parse_item_ids};
use locker_fetch::http::DEFAULT_ALLOWED_DOMAINS;
use locker_fetch::{
    AssetCache, FortniteApiCatalog, HttpAssetTransport, HttpClient, RarityResolver, RetryStrategy,
};
use locker_render::{Compositor, GroupPipeline, RenderSettings};
use locker_store::Config;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::Cli;

/// Loads the configuration named on the command line, or the default one.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Domains the HTTP client may reach: the game services plus the configured catalog host.
pub fn allowed_domains(config: &Config) -> Result<Vec<String>> {
    let mut domains: Vec<String> = DEFAULT_ALLOWED_DOMAINS.iter().map(|d| (*d).to_string()).collect();
    let url = url::Url::parse(&config.catalog_base_url)
        .with_context(|| format!("invalid catalog_base_url: {}", config.catalog_base_url))?;
    if let Some(host) = url.host_str() {
        let host = host.to_lowercase();
        if !domains.iter().any(|d| host == *d || host.ends_with(&format!(".{d}"))) {
            domains.push(host);
        }
    }
    Ok(domains)
}

/// Shared HTTP client for every network call in one run.
pub fn http_client(config: &Config) -> Result<HttpClient> {
    let http = HttpClient::new()?
        .with_allowed_domains(allowed_domains(config)?)
        .with_retry_strategy(RetryStrategy::new(3).with_exponential_backoff(true));
    Ok(http)
}

/// Compositor settings derived from the configuration.
pub fn render_settings(config: &Config) -> RenderSettings {
    let assets = config.asset_paths();
    RenderSettings {
        cache_dir: config.cache_dir.clone(),
        output_dir: config.output_dir.clone(),
        backgrounds_dir: assets.backgrounds_dir,
        placeholder: assets.placeholder,
        logo: assets.logo,
        font: Some(assets.font),
        watermark: config.watermark.clone(),
        tile_workers: config.tile_workers,
    }
}

/// Everything one run needs to resolve and render.
pub struct Services {
    pub catalog: Arc<FortniteApiCatalog>,
    pub pipeline: GroupPipeline,
}

impl Services {
    /// Builds the catalog, artwork cache, resolver and compositor.
    pub fn build(config: &Config, http: &HttpClient) -> Result<Self> {
        let missing = config.asset_paths().missing_backgrounds();
        if !missing.is_empty() {
            debug!(count = missing.len(), "Some rarity backgrounds are missing");
        }

        let catalog = Arc::new(FortniteApiCatalog::with_base_url(
            http.clone(),
            config.catalog_base_url.clone(),
        ));
        let assets = AssetCache::new(
            config.cache_dir.clone(),
            config.asset_paths().placeholder,
            Arc::new(HttpAssetTransport::new(http.clone())),
        )
        .with_image_base_url(config.catalog_base_url.clone());
        let resolver = RarityResolver::new(catalog.clone(), CosmeticOrder::new(RankTables::default()));
        let compositor = Compositor::new(render_settings(config))?;

        Ok(Self {
            catalog,
            pipeline: GroupPipeline::new(assets, resolver, compositor),
        })
    }
}

/// Reads an id list file: one id per line, blanks and `#` comments skipped.
pub fn read_id_file(path: &Path) -> Result<Vec<ItemId>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read id list {}", path.display()))?;
    Ok(parse_ids(&content))
}

/// Parses id list text.
pub fn parse_ids(content: &str) -> Vec<ItemId> {
    parse_item_ids(
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.starts_with('#')),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_skips_blanks_and_comments() {
        let ids = parse_ids("CID_028_Athena_Commando_F\n\n# emotes\neid_floss\n   \n");
        let raw: Vec<&str> = ids.iter().map(ItemId::as_str).collect();
        assert_eq!(raw, vec!["cid_028_athena_commando_f", "eid_floss"]);
    }

    #[test]
    fn test_allowed_domains_adds_custom_host() {
        let config = Config {
            catalog_base_url: "https://mirror.example.org/api".into(),
            ..Config::default()
        };
        let domains = allowed_domains(&config).unwrap();
        assert!(domains.contains(&"mirror.example.org".to_string()));
        assert!(domains.contains(&"epicgames.com".to_string()));

        let default_domains = allowed_domains(&Config::default()).unwrap();
        assert_eq!(default_domains.len(), DEFAULT_ALLOWED_DOMAINS.len());
    }

    #[test]
    fn test_render_settings_follow_config() {
        let config = Config {
            assets_dir: "/srv/assets".into(),
            watermark: "discord.gg/locker".into(),
            tile_workers: 2,
            ..Config::default()
        };
        let settings = render_settings(&config);
        assert_eq!(settings.logo, Path::new("/srv/assets/logo.png"));
        assert_eq!(settings.backgrounds_dir, Path::new("/srv/assets/backgrounds"));
        assert_eq!(settings.font.as_deref(), Some(Path::new("/srv/assets/fonts/font.ttf")));
        assert_eq!(settings.watermark, "discord.gg/locker");
        assert_eq!(settings.tile_workers, 2);
    }
}
