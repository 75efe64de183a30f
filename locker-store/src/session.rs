//! Per-user session state.
//!
//! A session lives from a successful login until it is ended. It holds the
//! user's bucketed inventory, the banner names discovered for it, and the
//! group images already produced so repeat requests reuse them.

use locker_core::{Group, Inventory, ItemId};
use locker_fetch::BannerNameMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::save_json;

/// State kept for one logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Display name shown in image footers.
    pub username: String,
    /// Owned items bucketed by category.
    pub items: Inventory,
    /// Banner display names for this account.
    pub banners: BannerNameMap,
    /// Produced images by group label.
    pub image_paths: BTreeMap<String, PathBuf>,
}

impl UserSession {
    /// Creates a session with no produced images.
    pub fn new(username: impl Into<String>, items: Inventory, banners: BannerNameMap) -> Self {
        Self {
            username: username.into(),
            items,
            banners,
            image_paths: BTreeMap::new(),
        }
    }
}

/// Image list written next to the rendered files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionManifest {
    /// Display name.
    pub username: String,
    /// Total owned items.
    pub item_count: usize,
    /// Produced images by group label.
    pub images: BTreeMap<String, PathBuf>,
}

/// Sessions keyed by user.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, UserSession>>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or replaces) the session for `user`.
    pub async fn start(&self, user: &str, session: UserSession) {
        debug!(user, items = session.items.len(), "Starting session");
        self.sessions.write().await.insert(user.to_string(), session);
    }

    /// Returns a copy of the session for `user`.
    pub async fn get(&self, user: &str) -> Option<UserSession> {
        self.sessions.read().await.get(user).cloned()
    }

    /// True when `user` has a session.
    pub async fn contains(&self, user: &str) -> bool {
        self.sessions.read().await.contains_key(user)
    }

    /// Number of open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True when no session is open.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Ids making up `group` for `user`.
    pub async fn ids_for_group(&self, user: &str, group: Group) -> Result<Vec<ItemId>, StoreError> {
        let sessions = self.sessions.read().await;
        let session = sessions
            .get(user)
            .ok_or_else(|| StoreError::SessionNotFound(user.to_string()))?;
        Ok(session.items.ids_for_group(group))
    }

    /// Previously produced image for a group, if its file still exists.
    pub async fn cached_image(&self, user: &str, group_label: &str) -> Option<PathBuf> {
        let sessions = self.sessions.read().await;
        let path = sessions.get(user)?.image_paths.get(group_label)?;
        if tokio::fs::metadata(path).await.is_ok() {
            Some(path.clone())
        } else {
            debug!(user, group = group_label, "Cached image vanished");
            None
        }
    }

    /// Records the image produced for a group.
    pub async fn remember(
        &self,
        user: &str,
        group_label: &str,
        path: PathBuf,
    ) -> Result<(), StoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(user)
            .ok_or_else(|| StoreError::SessionNotFound(user.to_string()))?;
        session.image_paths.insert(group_label.to_string(), path);
        Ok(())
    }

    /// Writes the session's image list as JSON.
    pub async fn save_manifest(&self, user: &str, path: &Path) -> Result<(), StoreError> {
        let manifest = {
            let sessions = self.sessions.read().await;
            let session = sessions
                .get(user)
                .ok_or_else(|| StoreError::SessionNotFound(user.to_string()))?;
            SessionManifest {
                username: session.username.clone(),
                item_count: session.items.len(),
                images: session.image_paths.clone(),
            }
        };
        save_json(path, &manifest).await
    }

    /// Ends the session, deleting every image it produced.
    ///
    /// Returns the number of files removed. Files already gone are skipped.
    pub async fn end_session(&self, user: &str) -> Result<usize, StoreError> {
        let session = self
            .sessions
            .write()
            .await
            .remove(user)
            .ok_or_else(|| StoreError::SessionNotFound(user.to_string()))?;

        let mut removed = 0;
        for (group, path) in &session.image_paths {
            match tokio::fs::remove_file(path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(group = %group, path = %path.display(), error = %e, "Failed to delete image");
                }
            }
        }

        info!(user, removed, "Session ended");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use locker_core::Category;

    fn id(raw: &str) -> ItemId {
        ItemId::new(raw).unwrap()
    }

    fn session() -> UserSession {
        let mut items = Inventory::new();
        items.push(Category::Skins, id("cid_017_athena_commando_m"));
        items.push(Category::Emotes, id("eid_floss"));
        items.push(Category::Banners, id("banner_abc123"));
        let mut banners = BannerNameMap::new();
        banners.insert("abc123", "Llama").unwrap();
        UserSession::new("Jonesy", items, banners)
    }

    #[tokio::test]
    async fn test_ids_for_group() {
        let store = SessionStore::new();
        store.start("u1", session()).await;

        let all = store.ids_for_group("u1", Group::AllCosmetics).await.unwrap();
        assert_eq!(all, vec![id("cid_017_athena_commando_m"), id("eid_floss"), id("banner_abc123")]);

        let skins = store
            .ids_for_group("u1", Group::Category(Category::Skins))
            .await
            .unwrap();
        assert_eq!(skins, vec![id("cid_017_athena_commando_m")]);

        assert!(matches!(
            store.ids_for_group("nobody", Group::AllCosmetics).await,
            Err(StoreError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_cached_image_requires_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new();
        store.start("u1", session()).await;

        let path = dir.path().join("skins.png");
        store.remember("u1", "Skins", path.clone()).await.unwrap();
        assert!(store.cached_image("u1", "Skins").await.is_none());

        std::fs::write(&path, b"png").unwrap();
        assert_eq!(store.cached_image("u1", "Skins").await, Some(path));
        assert!(store.cached_image("u1", "Emotes").await.is_none());
    }

    #[tokio::test]
    async fn test_end_session_deletes_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new();
        store.start("u1", session()).await;

        let skins = dir.path().join("skins.png");
        let emotes = dir.path().join("emotes.png");
        std::fs::write(&skins, b"png").unwrap();
        store.remember("u1", "Skins", skins.clone()).await.unwrap();
        store.remember("u1", "Emotes", emotes).await.unwrap();

        assert_eq!(store.end_session("u1").await.unwrap(), 1);
        assert!(!skins.exists());
        assert!(!store.contains("u1").await);
        assert!(matches!(
            store.end_session("u1").await,
            Err(StoreError::SessionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_remember_without_session() {
        let store = SessionStore::new();
        assert!(store.remember("ghost", "Skins", PathBuf::from("x.png")).await.is_err());
        assert!(store.is_empty().await);
    }
}
