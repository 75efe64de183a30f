// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Locker Core
//!
//! Core types and pure algorithms shared by every Locker crate:
//!
//! - Domain models (item ids, categories, rarities, resolved records)
//! - Identifier classification
//! - Rank tables and display ordering
//! - Error types
//!
//! ## Key Types
//!
//! ### Items
//! - [`ItemId`] - Normalized item identifier
//! - [`CosmeticInfo`] - Resolved name and rarity for one item
//! - [`Rarity`] - Rarity tier (16 known tiers plus a carrier for others)
//!
//! ### Grouping
//! - [`Category`] - Coarse item type derived from the id
//! - [`Group`] - A render request: one category or all of them
//! - [`DISPLAY_ORDER`] - Category order used for rendering
//! - [`Inventory`] - Owned items bucketed by category
//!
//! ### Ranking
//! - [`RankTables`] - Rarity ranks, sub-order and mythic overrides
//! - [`CosmeticOrder`] - Stable display ordering over resolved items
//! - [`classify`] - Identifier to category

pub mod classify;
pub mod error;
pub mod models;
pub mod order;
pub mod tables;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Items
    BANNER_PREFIX,
    CosmeticInfo,
    ItemId,
    Rarity,
    UNKNOWN_NAME,
    parse_item_ids,
    // Grouping
    ALL_COSMETICS,
    Category,
    DISPLAY_ORDER,
    Group,
    Inventory,
    group_file_stem,
};

// Re-export algorithms
pub use classify::classify;
pub use order::{CosmeticOrder, SortKey};
pub use tables::{RankTables, UNRANKED_RARITY, UNRANKED_SUB_ORDER};
