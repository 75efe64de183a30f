//! Group image compositing.

use chrono::Local;
use image::ImageFormat;
use locker_core::{CosmeticInfo, Rarity, group_file_stem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::error::RenderError;
use crate::font::FontSource;
use crate::footer::{FooterText, draw_footer};
use crate::grid::{GridLayout, assemble};
use crate::pool::{DEFAULT_TILE_WORKERS, TilePool};
use crate::tile::TileJob;

/// Footer timestamp format.
const CHECKED_AT_FORMAT: &str = "%d/%m/%y - %H:%M";

// ============================================================================
// Settings
// ============================================================================

/// Files and knobs the compositor reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Cached artwork, `{id}.png`.
    pub cache_dir: PathBuf,
    /// Where group images are written.
    pub output_dir: PathBuf,
    /// Rarity backgrounds, named by [`Rarity::background_file`].
    pub backgrounds_dir: PathBuf,
    /// Artwork used when an item's art cannot be decoded.
    pub placeholder: PathBuf,
    /// Footer logo.
    pub logo: PathBuf,
    /// Custom label font; system fonts are tried when absent or unreadable.
    pub font: Option<PathBuf>,
    /// Third footer line.
    pub watermark: String,
    /// Tile worker count.
    pub tile_workers: usize,
}

impl RenderSettings {
    /// Settings rooted at one assets directory, with the conventional file names.
    pub fn from_assets_dir(
        assets_dir: &Path,
        cache_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            output_dir: output_dir.into(),
            backgrounds_dir: assets_dir.join("backgrounds"),
            placeholder: assets_dir.join("placeholder.png"),
            logo: assets_dir.join("logo.png"),
            font: Some(assets_dir.join("fonts").join("font.ttf")),
            watermark: String::new(),
            tile_workers: DEFAULT_TILE_WORKERS,
        }
    }

    /// Background for a rarity.
    pub fn background_for(&self, rarity: &Rarity) -> PathBuf {
        self.backgrounds_dir.join(rarity.background_file())
    }

    /// Output path for a group label: lowercase, spaces as underscores.
    pub fn output_path(&self, group_label: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.png", group_file_stem(group_label)))
    }
}

// ============================================================================
// Compositor
// ============================================================================

/// Renders resolved items into one group image.
#[derive(Debug, Clone)]
pub struct Compositor {
    settings: Arc<RenderSettings>,
    font: FontSource,
    pool: Arc<TilePool>,
}

impl Compositor {
    /// Creates a compositor, loading the font and starting the tile pool.
    pub fn new(settings: RenderSettings) -> Result<Self, RenderError> {
        let font = FontSource::load(settings.font.as_deref());
        let pool = TilePool::new(settings.tile_workers)?;
        Ok(Self {
            settings: Arc::new(settings),
            font,
            pool: Arc::new(pool),
        })
    }

    /// Replaces the font source.
    pub fn with_font(mut self, font: FontSource) -> Self {
        self.font = font;
        self
    }

    /// Active settings.
    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Tile jobs for the renderable items, in the given order.
    pub fn jobs(&self, infos: &[CosmeticInfo]) -> Vec<TileJob> {
        infos
            .iter()
            .filter(|info| !info.is_unknown())
            .map(|info| TileJob {
                name: info.name.clone(),
                rarity: info.rarity.clone(),
                is_banner: info.id.is_banner(),
                icon_path: self.settings.cache_dir.join(info.id.file_name()),
                background_path: self.settings.background_for(&info.rarity),
                placeholder_path: self.settings.placeholder.clone(),
            })
            .collect()
    }

    /// Renders synchronously. Call from a blocking context.
    ///
    /// Returns `None` when nothing is renderable: an empty list, or only Unknown items.
    #[instrument(skip(self, infos, username), fields(items = infos.len()))]
    pub fn render_blocking(
        &self,
        infos: &[CosmeticInfo],
        username: &str,
        group_label: &str,
    ) -> Result<Option<PathBuf>, RenderError> {
        let jobs = self.jobs(infos);
        if jobs.is_empty() {
            debug!("Nothing to render");
            return Ok(None);
        }

        let tiles = self.pool.compose_all(&jobs, &self.font);
        let layout = GridLayout::for_count(tiles.len());
        let mut canvas = assemble(&tiles, &layout);

        let checked_at = Local::now().format(CHECKED_AT_FORMAT).to_string();
        let footer = FooterText::new(jobs.len(), username, &checked_at, &self.settings.watermark);
        draw_footer(&mut canvas, &layout, &self.settings.logo, &self.font, &footer);

        std::fs::create_dir_all(&self.settings.output_dir)?;
        let path = self.settings.output_path(group_label);
        canvas.save_with_format(&path, ImageFormat::Png)?;

        info!(
            path = %path.display(),
            tiles = jobs.len(),
            columns = layout.columns,
            rows = layout.rows,
            "Group image written"
        );
        Ok(Some(path))
    }

    /// Renders on the blocking thread pool.
    pub async fn render(
        &self,
        infos: Vec<CosmeticInfo>,
        username: &str,
        group_label: &str,
    ) -> Result<Option<PathBuf>, RenderError> {
        let this = self.clone();
        let username = username.to_string();
        let group_label = group_label.to_string();
        tokio::task::spawn_blocking(move || this.render_blocking(&infos, &username, &group_label))
            .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use locker_core::ItemId;
    use tempfile::TempDir;

    fn settings(dir: &Path) -> RenderSettings {
        let mut settings =
            RenderSettings::from_assets_dir(&dir.join("assets"), dir.join("cache"), dir.join("out"));
        settings.font = None;
        settings.tile_workers = 2;
        settings
    }

    fn info(id: &str, name: &str, rarity: Rarity) -> CosmeticInfo {
        CosmeticInfo::new(ItemId::new(id).unwrap(), name, rarity)
    }

    #[test]
    fn test_paths() {
        let settings = settings(Path::new("/data"));
        assert_eq!(
            settings.background_for(&Rarity::StarWarsSeries),
            Path::new("/data/assets/backgrounds/starwars.png")
        );
        assert_eq!(
            settings.output_path("All Cosmetics"),
            Path::new("/data/out/all_cosmetics.png")
        );
    }

    #[test]
    fn test_empty_renders_nothing() {
        let dir = TempDir::new().unwrap();
        let compositor = Compositor::new(settings(dir.path())).unwrap().with_font(FontSource::none());

        assert!(compositor.render_blocking(&[], "u", "Skins").unwrap().is_none());
        assert!(!dir.path().join("out").exists());
    }

    #[test]
    fn test_all_unknown_renders_nothing() {
        let dir = TempDir::new().unwrap();
        let compositor = Compositor::new(settings(dir.path())).unwrap().with_font(FontSource::none());
        let infos = vec![
            CosmeticInfo::unknown(ItemId::new("cid_a").unwrap()),
            info("cid_b", " unknown ", Rarity::Epic),
        ];

        assert!(compositor.render_blocking(&infos, "u", "Skins").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_render_writes_grid() {
        let dir = TempDir::new().unwrap();
        let settings = settings(dir.path());
        std::fs::create_dir_all(&settings.cache_dir).unwrap();
        RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]))
            .save_with_format(settings.cache_dir.join("cid_a.png"), ImageFormat::Png)
            .unwrap();

        let compositor = Compositor::new(settings).unwrap().with_font(FontSource::none());
        let infos = vec![
            info("cid_a", "Alpha", Rarity::Rare),
            info("cid_missing", "Beta", Rarity::Epic),
            CosmeticInfo::unknown(ItemId::new("cid_dropped").unwrap()),
        ];

        let path = compositor
            .render(infos, "Jonesy", "Back Blings")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(path, dir.path().join("out").join("back_blings.png"));

        let image = image::open(&path).unwrap().to_rgba8();
        // Two tiles: six columns, one row, plus a footer row.
        assert_eq!(image.dimensions(), (1848, 616));
        assert_eq!(*image.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
        // Unused cells stay black.
        assert_eq!(*image.get_pixel(1000, 10), Rgba([0, 0, 0, 255]));
    }
}
