// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Locker Render
//!
//! Turns resolved items into group images.
//!
//! ## Stages
//!
//! - [`tile::compose_tile`] - Background, artwork and name bar for one item
//! - [`pool::TilePool`] - Fixed worker pool composing tiles in parallel
//! - [`grid::GridLayout`] - Column/row/tile-size selection and assembly
//! - [`footer::draw_footer`] - Logo, item count, checker line and watermark
//! - [`compositor::Compositor`] - Runs the stages and writes the PNG
//! - [`pipeline::GroupPipeline`] - Artwork, resolution, ordering, then compositing
//!
//! Missing artwork, backgrounds, logo or font never fail a render; each has a
//! fallback and a warning in the log.

pub mod compositor;
pub mod error;
pub mod font;
pub mod footer;
pub mod grid;
pub mod pipeline;
pub mod pool;
pub mod tile;

pub use compositor::{Compositor, RenderSettings};
pub use error::RenderError;
pub use font::{FontSource, SYSTEM_FONT_PATHS};
pub use grid::GridLayout;
pub use pipeline::{GroupImage, GroupPipeline};
pub use pool::{DEFAULT_TILE_WORKERS, TilePool};
pub use tile::TileJob;
