//! Single-item tiles.
//!
//! A tile is the rarity background with the item artwork composited on top and
//! a translucent name bar across the bottom fifth.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use locker_core::Rarity;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::font::{FontSource, fit_font_size};

/// Size of the transparent background used when the rarity background is missing.
pub const FALLBACK_BACKGROUND_SIZE: u32 = 512;

/// Banner artwork is drawn at this size instead of filling the tile.
pub const BANNER_ICON_SIZE: u32 = 192;

/// Offset of banner artwork within the tile.
pub const BANNER_ICON_OFFSET: (i64, i64) = (32, 12);

/// Label font budget for collaboration series.
pub const SPECIAL_LABEL_FONT_SIZE: u32 = 80;

/// Label font budget for everything else.
pub const LABEL_FONT_SIZE: u32 = 40;

/// Smallest label font.
pub const MIN_LABEL_FONT_SIZE: u32 = 10;

/// Horizontal room kept free around the label.
const LABEL_PADDING: u32 = 20;

/// Name bar opacity, 70% of full.
const BAR_ALPHA: u8 = 178;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

// ============================================================================
// Tile Job
// ============================================================================

/// Everything needed to draw one tile. Plain data, safe to hand to any worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileJob {
    /// Display name; drawn uppercased.
    pub name: String,
    /// Rarity tier, which picks the label font budget.
    pub rarity: Rarity,
    /// Whether the artwork is a banner.
    pub is_banner: bool,
    /// Cached artwork.
    pub icon_path: PathBuf,
    /// Rarity background.
    pub background_path: PathBuf,
    /// Artwork used when `icon_path` cannot be decoded.
    pub placeholder_path: PathBuf,
}

/// Label font budget for a rarity.
pub fn label_font_budget(rarity: &Rarity) -> u32 {
    if rarity.is_special_series() {
        SPECIAL_LABEL_FONT_SIZE
    } else {
        LABEL_FONT_SIZE
    }
}

// ============================================================================
// Loading
// ============================================================================

fn open_rgba(path: &Path) -> Option<RgbaImage> {
    image::open(path).ok().map(|img| img.to_rgba8())
}

/// Loads the artwork, falling back to the placeholder for undecodable or 1×1 files.
fn load_icon(job: &TileJob, fallback_size: (u32, u32)) -> RgbaImage {
    if let Some(icon) = open_rgba(&job.icon_path).filter(|img| img.dimensions() != (1, 1)) {
        return icon;
    }
    warn!(path = %job.icon_path.display(), "Artwork unreadable, using placeholder");

    open_rgba(&job.placeholder_path).unwrap_or_else(|| {
        warn!(path = %job.placeholder_path.display(), "Placeholder unreadable");
        RgbaImage::from_pixel(fallback_size.0, fallback_size.1, TRANSPARENT)
    })
}

fn load_background(path: &Path) -> RgbaImage {
    open_rgba(path).unwrap_or_else(|| {
        warn!(path = %path.display(), "Background missing, using transparent tile");
        RgbaImage::from_pixel(FALLBACK_BACKGROUND_SIZE, FALLBACK_BACKGROUND_SIZE, TRANSPARENT)
    })
}

// ============================================================================
// Composition
// ============================================================================

/// Composes one tile. Never fails; every missing input has a fallback.
pub fn compose_tile(job: &TileJob, font: &FontSource) -> RgbaImage {
    let mut tile = load_background(&job.background_path);
    let (width, height) = tile.dimensions();
    let icon = load_icon(job, (width, height));

    if job.is_banner {
        let icon = imageops::resize(&icon, BANNER_ICON_SIZE, BANNER_ICON_SIZE, FilterType::Lanczos3);
        imageops::overlay(&mut tile, &icon, BANNER_ICON_OFFSET.0, BANNER_ICON_OFFSET.1);
    } else {
        let icon = imageops::resize(&icon, width, height, FilterType::Lanczos3);
        imageops::overlay(&mut tile, &icon, 0, 0);
    }

    draw_name_bar(&mut tile, &job.name, &job.rarity, font);
    tile
}

/// Darkens the bottom 20% and centers the uppercased name in it.
fn draw_name_bar(tile: &mut RgbaImage, name: &str, rarity: &Rarity, font: &FontSource) {
    let (width, height) = tile.dimensions();
    let bar_y = height * 4 / 5;
    let bar_height = height - bar_y;
    if bar_height == 0 || width == 0 {
        return;
    }

    let bar = RgbaImage::from_pixel(width, bar_height, Rgba([0, 0, 0, BAR_ALPHA]));
    imageops::overlay(tile, &bar, 0, i64::from(bar_y));

    if !font.is_available() {
        return;
    }

    let label = name.to_uppercase();
    let max_width = width.saturating_sub(LABEL_PADDING);
    let size = fit_font_size(label_font_budget(rarity), MIN_LABEL_FONT_SIZE, max_width, |s| {
        font.measure(&label, s).map_or(0, |(w, _)| w)
    });
    let (text_width, text_height) = font.measure(&label, size).unwrap_or((0, 0));

    let x = (i64::from(width) - i64::from(text_width)) / 2;
    let y = i64::from(bar_y) + (i64::from(bar_height) - i64::from(text_height)) / 2;
    font.draw(
        tile,
        WHITE,
        i32::try_from(x).unwrap_or(0),
        i32::try_from(y).unwrap_or(0),
        size,
        &label,
    );
}
