//! Font loading, measuring and drawing.

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Common system fonts, tried in order when no custom font is configured or loadable.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// The font used for every label, or none at all.
///
/// Without a font, text is skipped and everything else still renders.
#[derive(Clone, Default)]
pub struct FontSource {
    font: Option<FontArc>,
    origin: Option<PathBuf>,
}

impl std::fmt::Debug for FontSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSource")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl FontSource {
    /// Loads `custom` if given and readable, else the first loadable system font.
    pub fn load(custom: Option<&Path>) -> Self {
        let system = SYSTEM_FONT_PATHS.iter().map(Path::new);
        Self::load_first(custom.into_iter().chain(system))
    }

    /// Loads the first candidate that parses as a font.
    pub fn load_first<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Self {
        for path in candidates {
            match std::fs::read(path) {
                Ok(bytes) => match FontArc::try_from_vec(bytes) {
                    Ok(font) => {
                        debug!(path = %path.display(), "Font loaded");
                        return Self {
                            font: Some(font),
                            origin: Some(path.to_path_buf()),
                        };
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "Not a usable font"),
                },
                Err(_) => debug!(path = %path.display(), "Font not found"),
            }
        }
        warn!("No font could be loaded, labels will be skipped");
        Self::none()
    }

    /// A source without a font.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether text can be drawn.
    pub fn is_available(&self) -> bool {
        self.font.is_some()
    }

    /// Path the font came from.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Pixel size of `text` at `size`, or `None` without a font.
    pub fn measure(&self, text: &str, size: u32) -> Option<(u32, u32)> {
        let font = self.font.as_ref()?;
        #[allow(clippy::cast_precision_loss)]
        let scale = PxScale::from(size as f32);
        Some(imageproc::drawing::text_size(scale, font, text))
    }

    /// Draws `text` with its top-left corner at `(x, y)`. No-op without a font.
    pub fn draw(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, size: u32, text: &str) {
        let Some(font) = self.font.as_ref() else {
            return;
        };
        #[allow(clippy::cast_precision_loss)]
        let scale = PxScale::from(size as f32);
        imageproc::drawing::draw_text_mut(canvas, color, x, y, scale, font, text);
    }
}

/// Largest size in `floor..=start` whose measured width fits `max_width`.
///
/// Shrinks one pixel at a time from `start` and stops at `floor` even if the
/// text still overflows there.
pub fn fit_font_size<F>(start: u32, floor: u32, max_width: u32, measure: F) -> u32
where
    F: Fn(u32) -> u32,
{
    let mut size = start.max(floor);
    while size > floor && measure(size) > max_width {
        size -= 1;
    }
    size
}
