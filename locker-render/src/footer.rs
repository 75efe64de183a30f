//! Branded footer band.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

use crate::font::{FontSource, fit_font_size};
use crate::grid::GridLayout;

/// Smallest footer font.
pub const MIN_FOOTER_FONT_SIZE: u32 = 8;

/// Edge of the square used when the logo is missing.
const FALLBACK_LOGO_SIZE: u32 = 100;

/// Left margin of the logo, and the gap between logo and text.
const MARGIN: u32 = 10;

/// Vertical gap between text lines.
const LINE_GAP: u32 = 5;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The three footer lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterText {
    /// `Total items: N`
    pub total: String,
    /// `Checked by {username} ({timestamp})`
    pub checked_by: String,
    /// Watermark.
    pub watermark: String,
}

impl FooterText {
    /// Builds the footer lines.
    pub fn new(item_count: usize, username: &str, checked_at: &str, watermark: &str) -> Self {
        Self {
            total: format!("Total items: {item_count}"),
            checked_by: format!("Checked by {username} ({checked_at})"),
            watermark: watermark.to_string(),
        }
    }

    fn lines(&self) -> [&str; 3] {
        [&self.total, &self.checked_by, &self.watermark]
    }
}

fn load_logo(path: &Path) -> RgbaImage {
    image::open(path).map(|img| img.to_rgba8()).unwrap_or_else(|_| {
        debug!(path = %path.display(), "Logo missing, using white square");
        RgbaImage::from_pixel(FALLBACK_LOGO_SIZE, FALLBACK_LOGO_SIZE, WHITE)
    })
}

/// Draws the logo and text into the footer band of an assembled grid.
pub fn draw_footer(
    canvas: &mut RgbaImage,
    layout: &GridLayout,
    logo_path: &Path,
    font: &FontSource,
    text: &FooterText,
) {
    let band_top = layout.grid_height();
    let band_height = layout.footer_height();

    let logo = load_logo(logo_path);
    let logo_height = band_height * 3 / 5;
    let logo_width = if logo.height() == 0 {
        0
    } else {
        u32::try_from(u64::from(logo_height) * u64::from(logo.width()) / u64::from(logo.height()))
            .unwrap_or(u32::MAX)
    };

    if logo_width > 0 && logo_height > 0 {
        let logo = imageops::resize(&logo, logo_width, logo_height, FilterType::Lanczos3);
        let y = band_top + (band_height - logo_height) / 2;
        imageops::overlay(canvas, &logo, i64::from(MARGIN), i64::from(y));
    }

    if !font.is_available() {
        return;
    }

    let text_x = MARGIN + logo_width + MARGIN;
    let max_width = layout.width().saturating_sub(MARGIN + logo_width + 2 * MARGIN);
    let lines = text.lines();
    let widest = |size: u32| {
        lines
            .iter()
            .filter_map(|line| font.measure(line, size))
            .map(|(w, _)| w)
            .max()
            .unwrap_or(0)
    };
    let size = fit_font_size(logo_height / 3, MIN_FOOTER_FONT_SIZE, max_width, widest);

    let heights: Vec<u32> = lines
        .iter()
        .map(|line| font.measure(line, size).map_or(0, |(_, h)| h))
        .collect();
    let block_height: u32 = heights.iter().sum::<u32>() + 2 * LINE_GAP;
    let mut y = i64::from(band_top) + (i64::from(band_height) - i64::from(block_height)) / 2;

    for (line, height) in lines.iter().zip(heights) {
        font.draw(
            canvas,
            WHITE,
            i32::try_from(text_x).unwrap_or(i32::MAX),
            i32::try_from(y).unwrap_or(0),
            size,
            line,
        );
        y += i64::from(height + LINE_GAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footer_text() {
        let text = FooterText::new(42, "Jonesy", "01/02/24 - 13:37", "locker.gg");
        assert_eq!(text.total, "Total items: 42");
        assert_eq!(text.checked_by, "Checked by Jonesy (01/02/24 - 13:37)");
        assert_eq!(text.watermark, "locker.gg");
    }

    #[test]
    fn test_missing_logo_draws_white_square() {
        let layout = GridLayout::for_count(1);
        let mut canvas = RgbaImage::from_pixel(layout.width(), layout.height(), Rgba([0, 0, 0, 255]));
        let text = FooterText::new(1, "u", "t", "w");

        draw_footer(&mut canvas, &layout, Path::new("/nonexistent/logo.png"), &FontSource::none(), &text);

        let logo_height = layout.footer_height() * 3 / 5;
        let center_y = layout.grid_height() + layout.footer_height() / 2;
        assert_eq!(*canvas.get_pixel(MARGIN + logo_height / 2, center_y), WHITE);
        // The tile area is untouched.
        assert_eq!(*canvas.get_pixel(MARGIN + 1, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_footer_text_sits_between_logo_and_right_margin() {
        let font = FontSource::load_first(crate::font::SYSTEM_FONT_PATHS.iter().map(Path::new));
        if !font.is_available() {
            return;
        }

        let layout = GridLayout::for_count(1);
        let mut canvas = RgbaImage::from_pixel(layout.width(), layout.height(), Rgba([0, 0, 0, 255]));
        let text = FooterText::new(1, "Jonesy", "01/02/24 - 13:37", "locker.gg");
        draw_footer(&mut canvas, &layout, Path::new("/nonexistent/logo.png"), &font, &text);

        let logo_width = layout.footer_height() * 3 / 5;
        let text_x = MARGIN + logo_width + MARGIN;
        let text_pixels: Vec<u32> = canvas
            .enumerate_pixels()
            .filter(|(x, y, p)| *y >= layout.grid_height() && *x >= text_x && p[0] > 128)
            .map(|(x, _, _)| x)
            .collect();

        assert!(!text_pixels.is_empty());
        let right = text_pixels.iter().max().copied().unwrap_or(0);
        assert!(right <= layout.width() - MARGIN, "text ends at {right}");
    }
}
