//! Session manifest round trip through the persistence helpers.

use locker_core::{Category, Inventory, ItemId};
use locker_fetch::BannerNameMap;
use locker_store::{SessionManifest, SessionStore, UserSession, load_json};

#[tokio::test]
async fn test_manifest_lists_remembered_images() {
    let dir = tempfile::tempdir().unwrap();
    let mut items = Inventory::new();
    items.push(Category::Skins, ItemId::new("cid_028_athena_commando_f").unwrap());
    items.push(Category::Pickaxes, ItemId::new("pickaxe_id_001").unwrap());

    let store = SessionStore::new();
    store
        .start("u1", UserSession::new("Jonesy", items, BannerNameMap::new()))
        .await;
    let image = dir.path().join("skins.png");
    std::fs::write(&image, b"png").unwrap();
    store.remember("u1", "Skins", image.clone()).await.unwrap();

    let manifest_path = dir.path().join("out").join("manifest.json");
    store.save_manifest("u1", &manifest_path).await.unwrap();

    let manifest: SessionManifest = load_json(&manifest_path).await.unwrap();
    assert_eq!(manifest.username, "Jonesy");
    assert_eq!(manifest.item_count, 2);
    assert_eq!(manifest.images.get("Skins"), Some(&image));
}
