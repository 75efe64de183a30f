//! Grid layout and assembly.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Widest grid, in pixels.
pub const MAX_GRID_WIDTH: u32 = 1848;

/// Tallest grid, in pixels, not counting the footer.
pub const MAX_GRID_HEIGHT: u32 = 2048;

/// Columns used before the grid starts widening.
pub const MIN_COLUMNS: u32 = 6;

const CANVAS: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Grid shape for a given tile count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Tiles per row.
    pub columns: u32,
    /// Rows of tiles.
    pub rows: u32,
    /// Edge of every (square) tile.
    pub tile_size: u32,
}

impl GridLayout {
    /// Starts at six columns and widens while there are more rows than columns.
    pub fn for_count(count: usize) -> Self {
        let count = u32::try_from(count).unwrap_or(u32::MAX).max(1);
        let mut columns = MIN_COLUMNS;
        let mut rows = count.div_ceil(columns);
        while rows > columns {
            columns += 1;
            rows = count.div_ceil(columns);
        }

        let tile_size = (MAX_GRID_WIDTH / columns)
            .min(MAX_GRID_HEIGHT / rows)
            .max(1);
        Self {
            columns,
            rows,
            tile_size,
        }
    }

    /// Width of the whole image.
    pub fn width(&self) -> u32 {
        self.columns * self.tile_size
    }

    /// Height of the tile area.
    pub fn grid_height(&self) -> u32 {
        self.rows * self.tile_size
    }

    /// Height of the footer band, one tile tall.
    pub fn footer_height(&self) -> u32 {
        self.tile_size
    }

    /// Height of the whole image.
    pub fn height(&self) -> u32 {
        self.grid_height() + self.footer_height()
    }

    /// Top-left corner of the tile at `index`, row-major.
    pub fn position(&self, index: usize) -> (i64, i64) {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let col = index % self.columns;
        let row = index / self.columns;
        (
            i64::from(col * self.tile_size),
            i64::from(row * self.tile_size),
        )
    }
}

/// Pastes tiles row-major onto an opaque black canvas with room for the footer.
pub fn assemble(tiles: &[RgbaImage], layout: &GridLayout) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(layout.width(), layout.height(), CANVAS);
    for (index, tile) in tiles.iter().enumerate() {
        let resized = imageops::resize(tile, layout.tile_size, layout.tile_size, FilterType::Lanczos3);
        let (x, y) = layout.position(index);
        imageops::overlay(&mut canvas, &resized, x, y);
    }
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_small() {
        let layout = GridLayout::for_count(3);
        assert_eq!(layout, GridLayout { columns: 6, rows: 1, tile_size: 308 });
        assert_eq!((layout.width(), layout.height()), (1848, 616));
    }

    #[test]
    fn test_layout_square_limit() {
        assert_eq!(
            GridLayout::for_count(36),
            GridLayout { columns: 6, rows: 6, tile_size: 308 }
        );
        assert_eq!(
            GridLayout::for_count(37),
            GridLayout { columns: 7, rows: 6, tile_size: 264 }
        );
    }

    #[test]
    fn test_layout_large() {
        let layout = GridLayout::for_count(500);
        assert!(layout.rows <= layout.columns);
        assert!(layout.columns * layout.rows >= 500);
        assert!(layout.width() <= MAX_GRID_WIDTH);
        assert!(layout.grid_height() <= MAX_GRID_HEIGHT);
    }

    #[test]
    fn test_positions_are_row_major() {
        let layout = GridLayout::for_count(8);
        assert_eq!(layout.position(0), (0, 0));
        assert_eq!(layout.position(5), (5 * 308, 0));
        assert_eq!(layout.position(6), (0, 308));
    }

    #[test]
    fn test_assemble_fills_cells() {
        let layout = GridLayout {
            columns: 2,
            rows: 1,
            tile_size: 4,
        };
        let red = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        let canvas = assemble(&[red], &layout);

        assert_eq!(canvas.dimensions(), (8, 8));
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(6, 1), CANVAS);
        assert_eq!(*canvas.get_pixel(1, 6), CANVAS);
    }
}
