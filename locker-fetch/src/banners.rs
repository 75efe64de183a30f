//! Banner names and artwork.

use locker_core::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, warn};

use crate::assets::AssetCache;
use crate::catalog::{BannerRecord, CosmeticCatalog};
use crate::error::FetchError;

// ============================================================================
// Banner Name Map
// ============================================================================

/// Display names of the banners discovered for one account, keyed by `banner_<id>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerNameMap {
    names: BTreeMap<ItemId, String>,
}

impl BannerNameMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a name. `id` may be given with or without the `banner_` prefix.
    pub fn insert(&mut self, id: &str, name: impl Into<String>) -> Result<(), FetchError> {
        self.names.insert(ItemId::for_banner(id)?, name.into());
        Ok(())
    }

    /// Name recorded for a banner item.
    pub fn name(&self, id: &ItemId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Number of named banners.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing has been discovered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// Discovery
// ============================================================================

/// Matches owned banners against the catalog, naming them and caching their art.
pub struct BannerDiscovery<'a> {
    catalog: &'a dyn CosmeticCatalog,
    assets: &'a AssetCache,
}

impl<'a> BannerDiscovery<'a> {
    /// Creates a discovery pass.
    pub fn new(catalog: &'a dyn CosmeticCatalog, assets: &'a AssetCache) -> Self {
        Self { catalog, assets }
    }

    /// Discovers the given owned banner ids.
    ///
    /// Every owned banner the catalog knows is named in `names`; the returned
    /// items are those whose artwork is available locally. A catalog failure
    /// yields no banners rather than an error.
    #[instrument(skip(self, owned, names), fields(owned = owned.len()))]
    pub async fn discover(&self, owned: &[String], names: &mut BannerNameMap) -> Vec<ItemId> {
        if owned.is_empty() {
            return Vec::new();
        }

        let catalog: HashMap<String, BannerRecord> = match self.catalog.banners().await {
            Ok(records) => records
                .into_iter()
                .map(|r| (r.id.to_lowercase(), r))
                .collect(),
            Err(e) => {
                warn!(error = %e, "Banner catalog unavailable");
                return Vec::new();
            }
        };

        let mut available = Vec::new();
        for raw in owned {
            let key = raw.trim().to_lowercase();
            let Some(record) = catalog.get(&key) else {
                debug!(banner = %key, "Banner not in catalog");
                continue;
            };
            let Ok(id) = ItemId::for_banner(&key) else {
                continue;
            };

            let name = record
                .dev_name
                .clone()
                .unwrap_or_else(|| format!("Banner {id}"));
            names.names.insert(id.clone(), name);

            let Some(icon) = record.images.icon.as_deref() else {
                continue;
            };
            match self.assets.store_from_url(&id, icon).await {
                Ok(true) => available.push(id),
                Ok(false) => debug!(banner = %id, "Banner artwork unavailable"),
                Err(e) => warn!(banner = %id, error = %e, "Could not cache banner artwork"),
            }
        }

        debug!(available = available.len(), named = names.len(), "Banner discovery done");
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetTransport;
    use crate::catalog::{BannerImages, CatalogRecord};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct MockCatalog {
        banners: Vec<BannerRecord>,
    }

    #[async_trait]
    impl CosmeticCatalog for MockCatalog {
        async fn lookup(&self, _id: &ItemId) -> Result<Option<CatalogRecord>, FetchError> {
            Ok(None)
        }

        async fn banners(&self) -> Result<Vec<BannerRecord>, FetchError> {
            Ok(self.banners.clone())
        }
    }

    struct CountingTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AssetTransport for CountingTransport {
        async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((!url.contains("missing")).then(|| b"banner".to_vec()))
        }
    }

    fn record(id: &str, name: Option<&str>, icon: Option<&str>) -> BannerRecord {
        BannerRecord {
            id: id.to_string(),
            dev_name: name.map(str::to_string),
            images: BannerImages {
                icon: icon.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_name_map_normalizes_prefix() {
        let mut names = BannerNameMap::new();
        names.insert("OT1Banner", "Overtime").unwrap();
        let id = ItemId::new("banner_ot1banner").unwrap();
        assert_eq!(names.name(&id), Some("Overtime"));
    }

    #[tokio::test]
    async fn test_discover() {
        let dir = TempDir::new().unwrap();
        let transport = Arc::new(CountingTransport {
            calls: AtomicUsize::new(0),
        });
        let assets = AssetCache::new(dir.path(), dir.path().join("p.png"), transport.clone());
        let catalog = MockCatalog {
            banners: vec![
                record("OT1Banner", Some("Overtime Banner"), Some("https://x/ot1.png")),
                record("NoArt", None, None),
                record("Broken", Some("Broken"), Some("https://x/missing.png")),
                record("NotOwned", Some("Other"), Some("https://x/other.png")),
            ],
        };
        let owned = vec![
            "ot1banner".to_string(),
            "noart".to_string(),
            "broken".to_string(),
            "absent".to_string(),
        ];

        let mut names = BannerNameMap::new();
        let discovery = BannerDiscovery::new(&catalog, &assets);
        let available = discovery.discover(&owned, &mut names).await;

        assert_eq!(available, vec![ItemId::new("banner_ot1banner").unwrap()]);
        assert_eq!(names.len(), 3);
        assert_eq!(
            names.name(&ItemId::new("banner_noart").unwrap()),
            Some("Banner banner_noart")
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);

        // Second pass hits the cache for the stored banner.
        let again = discovery.discover(&owned, &mut names).await;
        assert_eq!(again, available);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    }
}
