//! Domain models for Locker.
//!
//! ## Submodules
//!
//! - [`item`] - Item identifiers and resolved cosmetic records
//! - [`category`] - Categories and render groups
//! - [`rarity`] - Rarity tiers
//! - [`inventory`] - Per-account item buckets

mod category;
mod inventory;
mod item;
mod rarity;

pub use category::{ALL_COSMETICS, Category, DISPLAY_ORDER, Group, group_file_stem};
pub use inventory::Inventory;
pub use item::{BANNER_PREFIX, CosmeticInfo, ItemId, UNKNOWN_NAME, parse_item_ids};
pub use rarity::Rarity;
