//! End-to-end group rendering: artwork, resolution, ordering, compositing.

use locker_core::{DISPLAY_ORDER, Group, Inventory, ItemId};
use locker_fetch::{AssetCache, BannerNameMap, RarityResolver};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

use crate::compositor::Compositor;
use crate::error::RenderError;

/// A rendered group image and what was degraded to produce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupImage {
    /// Group label.
    pub group: String,
    /// Written image.
    pub path: PathBuf,
    /// Number of tiles drawn.
    pub item_count: usize,
    /// Items drawn with placeholder artwork.
    pub placeholders: Vec<ItemId>,
    /// Items left out because the catalog could not name them.
    pub dropped: Vec<ItemId>,
}

/// Runs the full pipeline for one group.
#[derive(Debug, Clone)]
pub struct GroupPipeline {
    assets: AssetCache,
    resolver: RarityResolver,
    compositor: Compositor,
}

impl GroupPipeline {
    /// Creates a pipeline.
    pub fn new(assets: AssetCache, resolver: RarityResolver, compositor: Compositor) -> Self {
        Self {
            assets,
            resolver,
            compositor,
        }
    }

    /// Artwork cache.
    pub fn assets(&self) -> &AssetCache {
        &self.assets
    }

    /// Rarity resolver.
    pub fn resolver(&self) -> &RarityResolver {
        &self.resolver
    }

    /// Builds the image for `group_label` from raw ids.
    ///
    /// Artwork is ensured, every id resolved and ordered by category, rarity and
    /// sub-order, Unknown items dropped, and the rest composited. Returns `None`
    /// when nothing is left to draw.
    #[instrument(skip(self, raw_ids, banners), fields(ids = raw_ids.len()))]
    pub async fn build_group_image(
        &self,
        group_label: &str,
        raw_ids: &[ItemId],
        username: &str,
        banners: &BannerNameMap,
    ) -> Result<Option<GroupImage>, RenderError> {
        if raw_ids.is_empty() {
            return Ok(None);
        }

        let report = self.assets.ensure_all(raw_ids).await?;

        let mut infos = self.resolver.resolve_all(raw_ids, banners).await;
        self.resolver.order().sort_infos(&mut infos, &DISPLAY_ORDER);

        let (unknown, renderable): (Vec<_>, Vec<_>) =
            infos.into_iter().partition(|info| info.is_unknown());
        let dropped: Vec<ItemId> = unknown.into_iter().map(|info| info.id).collect();
        if !dropped.is_empty() {
            warn!(count = dropped.len(), "Dropping items the catalog could not name");
        }

        let placeholders: Vec<ItemId> = report
            .placeholders()
            .into_iter()
            .filter(|id| renderable.iter().any(|info| &info.id == id))
            .collect();
        let item_count = renderable.len();

        let Some(path) = self
            .compositor
            .render(renderable, username, group_label)
            .await?
        else {
            return Ok(None);
        };

        info!(group = %group_label, items = item_count, "Group rendered");
        Ok(Some(GroupImage {
            group: group_label.to_string(),
            path,
            item_count,
            placeholders,
            dropped,
        }))
    }

    /// Builds a group from an inventory; All Cosmetics concatenates the display buckets.
    pub async fn build_for_inventory(
        &self,
        group: Group,
        inventory: &Inventory,
        username: &str,
        banners: &BannerNameMap,
    ) -> Result<Option<GroupImage>, RenderError> {
        let ids = inventory.ids_for_group(group);
        self.build_group_image(group.label(), &ids, username, banners)
            .await
    }
}
