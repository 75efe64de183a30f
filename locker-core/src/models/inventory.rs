//! Per-account item buckets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::{Category, Group};
use super::item::ItemId;

/// Owned items bucketed by category, in discovery order within each bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    buckets: BTreeMap<Category, Vec<ItemId>>,
}

impl Inventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item to a bucket.
    pub fn push(&mut self, category: Category, id: ItemId) {
        self.buckets.entry(category).or_default().push(id);
    }

    /// Appends several items to a bucket.
    pub fn extend(&mut self, category: Category, ids: impl IntoIterator<Item = ItemId>) {
        self.buckets.entry(category).or_default().extend(ids);
    }

    /// Items in one bucket.
    pub fn bucket(&self, category: Category) -> &[ItemId] {
        self.buckets.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Items making up a render group.
    ///
    /// The combined group concatenates the display categories in order.
    pub fn ids_for_group(&self, group: Group) -> Vec<ItemId> {
        group
            .categories()
            .into_iter()
            .flat_map(|category| self.bucket(category).iter().cloned())
            .collect()
    }

    /// Total item count across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// True when no bucket holds anything.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates non-empty buckets in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[ItemId])> {
        self.buckets
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(category, ids)| (*category, ids.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    #[test]
    fn test_all_cosmetics_concatenates_in_display_order() {
        let mut inventory = Inventory::new();
        inventory.push(Category::Banners, id("banner_a"));
        inventory.push(Category::Emotes, id("eid_floss"));
        inventory.push(Category::Skins, id("cid_2"));
        inventory.push(Category::Skins, id("cid_1"));
        inventory.push(Category::Wraps, id("wrap_1"));

        let ids = inventory.ids_for_group(Group::AllCosmetics);
        assert_eq!(
            ids,
            vec![id("cid_2"), id("cid_1"), id("eid_floss"), id("banner_a")]
        );
        assert_eq!(inventory.len(), 5);
    }

    #[test]
    fn test_single_category_group() {
        let mut inventory = Inventory::new();
        inventory.extend(Category::Emotes, [id("eid_a"), id("eid_b")]);
        assert_eq!(
            inventory.ids_for_group(Group::Category(Category::Emotes)),
            vec![id("eid_a"), id("eid_b")]
        );
        assert!(inventory.ids_for_group(Group::Category(Category::Skins)).is_empty());
    }
}
