//! Display ordering.
//!
//! Items sort ascending by `(category position, rarity rank, sub-rank)`.
//! The sort is stable, so equal keys keep their input order, and nothing
//! depends on hash iteration order.

use crate::classify::classify;
use crate::models::{Category, CosmeticInfo, ItemId};
use crate::tables::RankTables;

/// Sort key for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    /// Position of the item's category in the requested order.
    pub category: usize,
    /// Rarity rank from the tables.
    pub rarity: u32,
    /// Manual sub-rank from the tables.
    pub sub_rank: u32,
}

/// Orders resolved items for display.
#[derive(Debug, Clone, Default)]
pub struct CosmeticOrder {
    tables: RankTables,
}

impl CosmeticOrder {
    /// Creates an orderer over the given tables.
    pub fn new(tables: RankTables) -> Self {
        Self { tables }
    }

    /// Returns the tables this orderer ranks with.
    pub fn tables(&self) -> &RankTables {
        &self.tables
    }

    /// Computes the sort key of one item.
    ///
    /// Categories missing from `category_order` sort after every listed one.
    pub fn sort_key(&self, info: &CosmeticInfo, category_order: &[Category]) -> SortKey {
        let category = classify(info.id.as_str());
        SortKey {
            category: category_order
                .iter()
                .position(|c| *c == category)
                .unwrap_or(category_order.len()),
            rarity: self.tables.rarity_rank(&info.rarity),
            sub_rank: self.tables.sub_rank(&info.id),
        }
    }

    /// Sorts resolved records in place.
    pub fn sort_infos(&self, infos: &mut [CosmeticInfo], category_order: &[Category]) {
        infos.sort_by_cached_key(|info| self.sort_key(info, category_order));
    }

    /// Returns the ids of `infos` in display order.
    pub fn order(&self, infos: &[CosmeticInfo], category_order: &[Category]) -> Vec<ItemId> {
        let mut sorted = infos.to_vec();
        self.sort_infos(&mut sorted, category_order);
        sorted.into_iter().map(|info| info.id).collect()
    }
}
