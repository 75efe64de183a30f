//! Fixed-size worker pool for tile composition.

use image::RgbaImage;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::error::RenderError;
use crate::font::FontSource;
use crate::tile::{TileJob, compose_tile};

/// Default number of tile workers.
pub const DEFAULT_TILE_WORKERS: usize = 4;

/// Composes tiles on a dedicated pool so the async runtime is never blocked by pixel work.
pub struct TilePool {
    pool: ThreadPool,
    workers: usize,
}

impl std::fmt::Debug for TilePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TilePool").field("workers", &self.workers).finish()
    }
}

impl TilePool {
    /// Starts a pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> Result<Self, RenderError> {
        let workers = workers.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("locker-tile-{i}"))
            .build()?;
        Ok(Self { pool, workers })
    }

    /// Worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Composes every job, returning tiles in job order once all are done.
    pub fn compose_all(&self, jobs: &[TileJob], font: &FontSource) -> Vec<RgbaImage> {
        debug!(jobs = jobs.len(), workers = self.workers, "Composing tiles");
        self.pool
            .install(|| jobs.par_iter().map(|job| compose_tile(job, font)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use locker_core::Rarity;
    use tempfile::TempDir;

    #[test]
    fn test_pool_has_at_least_one_worker() {
        assert_eq!(TilePool::new(0).unwrap().workers(), 1);
        assert_eq!(TilePool::new(DEFAULT_TILE_WORKERS).unwrap().workers(), 4);
    }

    #[test]
    fn test_compose_all_keeps_job_order() {
        let dir = TempDir::new().unwrap();
        let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0], [0, 255, 255]];
        let background = dir.path().join("bg.png");
        RgbaImage::from_pixel(16, 16, Rgba([0, 0, 0, 255]))
            .save_with_format(&background, ImageFormat::Png)
            .unwrap();

        let jobs: Vec<TileJob> = colors
            .iter()
            .enumerate()
            .map(|(i, [r, g, b])| {
                let icon = dir.path().join(format!("icon{i}.png"));
                RgbaImage::from_pixel(4, 4, Rgba([*r, *g, *b, 255]))
                    .save_with_format(&icon, ImageFormat::Png)
                    .unwrap();
                TileJob {
                    name: format!("item {i}"),
                    rarity: Rarity::Common,
                    is_banner: false,
                    icon_path: icon,
                    background_path: background.clone(),
                    placeholder_path: dir.path().join("placeholder.png"),
                }
            })
            .collect();

        let tiles = TilePool::new(2).unwrap().compose_all(&jobs, &FontSource::none());
        assert_eq!(tiles.len(), colors.len());
        for (tile, [r, g, b]) in tiles.iter().zip(colors) {
            assert_eq!(*tile.get_pixel(1, 1), Rgba([r, g, b, 255]));
        }
    }
}
