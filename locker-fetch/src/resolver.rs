//! Rarity and name resolution.

use futures::future::join_all;
use locker_core::{Category, CosmeticInfo, CosmeticOrder, ItemId, Rarity, UNKNOWN_NAME};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::banners::BannerNameMap;
use crate::catalog::CosmeticCatalog;

/// Resolves item ids to display records and orders them.
///
/// Banners never reach the catalog: their names come from the session's
/// [`BannerNameMap`]. Everything else is looked up, with the mythic table
/// overriding whatever tier the catalog reports.
#[derive(Clone)]
pub struct RarityResolver {
    catalog: Arc<dyn CosmeticCatalog>,
    order: CosmeticOrder,
}

impl std::fmt::Debug for RarityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RarityResolver").finish_non_exhaustive()
    }
}

impl RarityResolver {
    /// Creates a resolver over a catalog and ordering tables.
    pub fn new(catalog: Arc<dyn CosmeticCatalog>, order: CosmeticOrder) -> Self {
        Self { catalog, order }
    }

    /// The ordering this resolver sorts with.
    pub fn order(&self) -> &CosmeticOrder {
        &self.order
    }

    /// Resolves one item. Never fails; lookups that go wrong yield the Unknown record.
    #[instrument(skip(self, banners), fields(id = %id))]
    pub async fn resolve(&self, id: &ItemId, banners: &BannerNameMap) -> CosmeticInfo {
        let mythic = self.order.tables().is_mythic(id);

        if id.is_banner() {
            let name = banners
                .name(id)
                .map_or_else(|| format!("Banner {id}"), str::to_string);
            let rarity = if mythic { Rarity::Mythic } else { Rarity::Uncommon };
            return CosmeticInfo::new(id.clone(), name, rarity);
        }

        let record = match self.catalog.lookup(id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("Catalog has no record");
                return CosmeticInfo::unknown(id.clone());
            }
            Err(e) => {
                warn!(error = %e, "Catalog lookup failed");
                return CosmeticInfo::unknown(id.clone());
            }
        };

        let rarity = if mythic { Rarity::Mythic } else { record.rarity };
        let name = if record.name == UNKNOWN_NAME {
            id.to_string()
        } else {
            record.name
        };
        CosmeticInfo::new(id.clone(), name, rarity)
    }

    /// Resolves every id concurrently, preserving input order.
    pub async fn resolve_all(&self, ids: &[ItemId], banners: &BannerNameMap) -> Vec<CosmeticInfo> {
        join_all(ids.iter().map(|id| self.resolve(id, banners))).await
    }

    /// Resolves and orders ids for display.
    pub async fn sort_ids(
        &self,
        ids: &[ItemId],
        banners: &BannerNameMap,
        category_order: &[Category],
    ) -> Vec<ItemId> {
        let infos = self.resolve_all(ids, banners).await;
        self.order.order(&infos, category_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BannerRecord, CatalogRecord};
    use crate::error::FetchError;
    use async_trait::async_trait;
    use locker_core::{DISPLAY_ORDER, RankTables};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockCatalog {
        records: HashMap<String, CatalogRecord>,
        failing: Vec<String>,
        calls: AtomicUsize,
    }

    impl MockCatalog {
        fn new(records: &[(&str, &str, Rarity)]) -> Self {
            Self {
                records: records
                    .iter()
                    .map(|(id, name, rarity)| {
                        (
                            (*id).to_string(),
                            CatalogRecord {
                                name: (*name).to_string(),
                                rarity: rarity.clone(),
                            },
                        )
                    })
                    .collect(),
                failing: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CosmeticCatalog for MockCatalog {
        async fn lookup(&self, id: &ItemId) -> Result<Option<CatalogRecord>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|f| f == id.as_str()) {
                return Err(FetchError::InvalidResponse("timeout".into()));
            }
            Ok(self.records.get(id.as_str()).cloned())
        }

        async fn banners(&self) -> Result<Vec<BannerRecord>, FetchError> {
            Ok(Vec::new())
        }
    }

    fn id(raw: &str) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    fn resolver(catalog: Arc<MockCatalog>, mythic: &[&str]) -> RarityResolver {
        let defaults = RankTables::default();
        let tables = RankTables::new(
            Rarity::all()
                .iter()
                .map(|r| (r.clone(), defaults.rarity_rank(r)))
                .collect::<Vec<_>>(),
            Vec::<(String, u32)>::new(),
            mythic.iter().map(|m| (*m).to_string()).collect::<Vec<_>>(),
        );
        RarityResolver::new(catalog, CosmeticOrder::new(tables))
    }

    #[tokio::test]
    async fn test_catalog_record_used() {
        let catalog = Arc::new(MockCatalog::new(&[("cid_028", "Renegade Raider", Rarity::Rare)]));
        let resolver = resolver(catalog, &[]);

        let info = resolver.resolve(&id("cid_028"), &BannerNameMap::new()).await;
        assert_eq!(info.name, "Renegade Raider");
        assert_eq!(info.rarity, Rarity::Rare);
    }

    #[tokio::test]
    async fn test_mythic_override_wins() {
        let catalog = Arc::new(MockCatalog::new(&[("cid_017", "Aerial Assault Trooper", Rarity::Uncommon)]));
        let resolver = resolver(catalog, &["CID_017"]);

        let info = resolver.resolve(&id("cid_017"), &BannerNameMap::new()).await;
        assert_eq!(info.rarity, Rarity::Mythic);
    }

    #[tokio::test]
    async fn test_failures_yield_unknown() {
        let mut catalog = MockCatalog::new(&[]);
        catalog.failing.push("cid_down".to_string());
        let resolver = resolver(Arc::new(catalog), &[]);
        let banners = BannerNameMap::new();

        let missing = resolver.resolve(&id("cid_missing"), &banners).await;
        let down = resolver.resolve(&id("cid_down"), &banners).await;
        for info in [missing, down] {
            assert!(info.is_unknown());
            assert_eq!(info.rarity, Rarity::Common);
        }
    }

    #[tokio::test]
    async fn test_unknown_name_replaced_by_id() {
        let catalog = Arc::new(MockCatalog::new(&[("eid_odd", UNKNOWN_NAME, Rarity::Epic)]));
        let resolver = resolver(catalog, &[]);

        let info = resolver.resolve(&id("eid_odd"), &BannerNameMap::new()).await;
        assert_eq!(info.name, "eid_odd");
        assert!(!info.is_unknown());
    }

    #[tokio::test]
    async fn test_banners_skip_catalog() {
        let catalog = Arc::new(MockCatalog::new(&[]));
        let resolver = resolver(catalog.clone(), &["banner_ot1banner"]);
        let mut banners = BannerNameMap::new();
        banners.insert("ot1banner", "Overtime").unwrap();

        let named = resolver.resolve(&id("banner_ot1banner"), &banners).await;
        assert_eq!(named.name, "Overtime");
        assert_eq!(named.rarity, Rarity::Mythic);

        let plain = resolver.resolve(&id("banner_std7"), &banners).await;
        assert_eq!(plain.name, "Banner banner_std7");
        assert_eq!(plain.rarity, Rarity::Uncommon);

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sort_ids_end_to_end() {
        let catalog = Arc::new(MockCatalog::new(&[
            ("eid_floss", "Floss", Rarity::Rare),
            ("cid_017", "Aerial Assault Trooper", Rarity::Uncommon),
        ]));
        let resolver = resolver(catalog, &["cid_017"]);

        let sorted = resolver
            .sort_ids(
                &[id("banner_abc123"), id("eid_floss"), id("cid_017")],
                &BannerNameMap::new(),
                &DISPLAY_ORDER,
            )
            .await;
        assert_eq!(sorted, vec![id("cid_017"), id("eid_floss"), id("banner_abc123")]);
    }
}
