//! Resolution and caching through the public API, with in-memory collaborators.

use async_trait::async_trait;
use locker_core::{CosmeticOrder, DISPLAY_ORDER, ItemId, Rarity};
use locker_fetch::{
    AssetCache, AssetStatus, AssetTransport, BannerDiscovery, BannerNameMap, BannerRecord,
    CatalogRecord, CosmeticCatalog, FetchError, RarityResolver,
    catalog::BannerImages,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

struct StaticCatalog;

#[async_trait]
impl CosmeticCatalog for StaticCatalog {
    async fn lookup(&self, id: &ItemId) -> Result<Option<CatalogRecord>, FetchError> {
        let record = |name: &str, rarity: Rarity| CatalogRecord {
            name: name.to_string(),
            rarity,
        };
        Ok(match id.as_str() {
            "cid_028_athena_commando_f" => Some(record("Renegade Raider", Rarity::Rare)),
            "bid_004_blackknight" => Some(record("Black Shield", Rarity::Legendary)),
            "eid_floss" => Some(record("Floss", Rarity::Rare)),
            _ => None,
        })
    }

    async fn banners(&self) -> Result<Vec<BannerRecord>, FetchError> {
        Ok(vec![BannerRecord {
            id: "OT1Banner".to_string(),
            dev_name: Some("Overtime".to_string()),
            images: BannerImages {
                icon: Some("https://fortnite-api.com/images/banners/ot1banner/icon.png".to_string()),
            },
        }])
    }
}

struct CountingTransport {
    calls: AtomicUsize,
}

#[async_trait]
impl AssetTransport for CountingTransport {
    async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((!url.contains("cid_gone")).then(|| url.as_bytes().to_vec()))
    }
}

fn ids(raw: &[&str]) -> Vec<ItemId> {
    raw.iter().map(|r| ItemId::new(r).unwrap()).collect()
}

#[tokio::test]
async fn test_session_flow_orders_and_caches() {
    let dir = TempDir::new().unwrap();
    let placeholder = dir.path().join("placeholder.png");
    std::fs::write(&placeholder, b"ph").unwrap();

    let transport = Arc::new(CountingTransport {
        calls: AtomicUsize::new(0),
    });
    let assets = AssetCache::new(dir.path().join("cache"), &placeholder, transport.clone());
    let catalog = Arc::new(StaticCatalog);

    let mut names = BannerNameMap::new();
    let banners = BannerDiscovery::new(catalog.as_ref(), &assets)
        .discover(&["ot1banner".to_string()], &mut names)
        .await;
    assert_eq!(banners, ids(&["banner_ot1banner"]));

    let mut requested = ids(&[
        "eid_floss",
        "cid_gone",
        "bid_004_blackknight",
        "cid_028_athena_commando_f",
    ]);
    requested.extend(banners);

    let report = assets.ensure_all(&requested).await.unwrap();
    assert_eq!(report.status(&ItemId::new("banner_ot1banner").unwrap()), Some(AssetStatus::Skipped));
    assert_eq!(report.placeholders(), ids(&["cid_gone"]));
    let calls_after_first = transport.calls.load(Ordering::SeqCst);

    // Warm cache: a second batch makes no network calls.
    let report = assets.ensure_all(&requested).await.unwrap();
    assert_eq!(report.count(AssetStatus::Cached), 4);
    assert_eq!(transport.calls.load(Ordering::SeqCst), calls_after_first);

    let resolver = RarityResolver::new(catalog, CosmeticOrder::default());
    let ordered = resolver.sort_ids(&requested, &names, &DISPLAY_ORDER).await;
    assert_eq!(
        ordered,
        ids(&[
            "cid_028_athena_commando_f",
            "cid_gone",
            "bid_004_blackknight",
            "eid_floss",
            "banner_ot1banner",
        ])
    );
}
