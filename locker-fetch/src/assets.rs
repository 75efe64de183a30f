//! Local artwork cache.
//!
//! Every item owns one file, `{cache_dir}/{id}.png`. A non-empty file is a hit;
//! anything else triggers a download from the catalog's image host, falling
//! back to a copy of the bundled placeholder. Writes land in a unique temp
//! file that is renamed into place, so readers never see partial artwork.

use async_trait::async_trait;
use futures::future::join_all;
use locker_core::ItemId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, instrument, warn};

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::error::{AssetError, FetchError};
use crate::http::HttpClient;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

// ============================================================================
// Transport
// ============================================================================

/// Fetches raw artwork bytes.
#[async_trait]
pub trait AssetTransport: Send + Sync {
    /// Returns the body of a 200 response, `None` for any other status.
    async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>, FetchError>;
}

/// Transport over [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpAssetTransport {
    http: HttpClient,
}

impl HttpAssetTransport {
    /// Creates a transport.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AssetTransport for HttpAssetTransport {
    async fn fetch(&self, url: &str) -> Result<Option<Vec<u8>>, FetchError> {
        let response = self.http.get(url).await?;
        if response.status() != reqwest::StatusCode::OK {
            debug!(url = %url, status = %response.status(), "No artwork at URL");
            return Ok(None);
        }
        Ok(Some(response.bytes().await?.to_vec()))
    }
}

// ============================================================================
// Report
// ============================================================================

/// How an item's artwork became available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// A non-empty file was already cached.
    Cached,
    /// Downloaded from the image host.
    Downloaded,
    /// No download succeeded; the placeholder was copied.
    Placeholder,
    /// Banner artwork, which comes from banner discovery.
    Skipped,
    /// Nothing could be written; the tile falls back to the placeholder at render time.
    Failed,
}

/// Outcome of a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetReport {
    statuses: BTreeMap<ItemId, AssetStatus>,
}

impl AssetReport {
    /// Status of one item.
    pub fn status(&self, id: &ItemId) -> Option<AssetStatus> {
        self.statuses.get(id).copied()
    }

    /// Items that will be drawn with placeholder art.
    pub fn placeholders(&self) -> Vec<ItemId> {
        self.statuses
            .iter()
            .filter(|(_, s)| matches!(s, AssetStatus::Placeholder | AssetStatus::Failed))
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Number of distinct items in the batch.
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// True for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Count of items with the given status.
    pub fn count(&self, status: AssetStatus) -> usize {
        self.statuses.values().filter(|s| **s == status).count()
    }
}

// ============================================================================
// Cache
// ============================================================================

/// Content-addressed artwork cache.
#[derive(Clone)]
pub struct AssetCache {
    cache_dir: PathBuf,
    placeholder: PathBuf,
    image_base_url: String,
    transport: Arc<dyn AssetTransport>,
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("cache_dir", &self.cache_dir)
            .field("placeholder", &self.placeholder)
            .field("image_base_url", &self.image_base_url)
            .finish_non_exhaustive()
    }
}

impl AssetCache {
    /// Creates a cache downloading from [`DEFAULT_CATALOG_URL`].
    pub fn new(
        cache_dir: impl Into<PathBuf>,
        placeholder: impl Into<PathBuf>,
        transport: Arc<dyn AssetTransport>,
    ) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            placeholder: placeholder.into(),
            image_base_url: DEFAULT_CATALOG_URL.to_string(),
            transport,
        }
    }

    /// Downloads from another image host.
    pub fn with_image_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.image_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Cache directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Placeholder image path.
    pub fn placeholder(&self) -> &Path {
        &self.placeholder
    }

    /// Path of an item's cached artwork.
    pub fn path_for(&self, id: &ItemId) -> PathBuf {
        self.cache_dir.join(id.file_name())
    }

    /// Candidate URLs for an item, tried in order.
    pub fn icon_urls(&self, id: &ItemId) -> [String; 2] {
        let base = format!("{}/images/cosmetics/br/{id}", self.image_base_url);
        [format!("{base}/icon.png"), format!("{base}/smallicon.png")]
    }

    /// Ensures an item's artwork exists locally.
    ///
    /// Download failures degrade to the placeholder; only a missing placeholder is an error.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn ensure_local(&self, id: &ItemId) -> Result<AssetStatus, AssetError> {
        if id.is_banner() {
            return Ok(AssetStatus::Skipped);
        }

        let path = self.path_for(id);
        if is_cached(&path).await {
            return Ok(AssetStatus::Cached);
        }

        for url in self.icon_urls(id) {
            match self.transport.fetch(&url).await {
                Ok(Some(bytes)) if !bytes.is_empty() => {
                    write_atomic(&path, &bytes).await?;
                    debug!(url = %url, bytes = bytes.len(), "Artwork downloaded");
                    return Ok(AssetStatus::Downloaded);
                }
                Ok(_) => {}
                Err(e) => warn!(url = %url, error = %e, "Artwork download failed"),
            }
        }

        let bytes = match tokio::fs::read(&self.placeholder).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssetError::PlaceholderMissing(self.placeholder.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        write_atomic(&path, &bytes).await?;
        warn!("No artwork available, using placeholder");
        Ok(AssetStatus::Placeholder)
    }

    /// Ensures artwork for every id concurrently; duplicates are fetched once.
    ///
    /// A per-item failure is recorded as [`AssetStatus::Failed`] and the batch
    /// carries on. Only a missing placeholder aborts it.
    pub async fn ensure_all(&self, ids: &[ItemId]) -> Result<AssetReport, AssetError> {
        let unique: BTreeSet<&ItemId> = ids.iter().collect();
        debug!(requested = ids.len(), unique = unique.len(), "Ensuring artwork");

        let results = join_all(unique.iter().map(|id| self.ensure_local(id))).await;

        let mut report = AssetReport::default();
        for (id, result) in unique.into_iter().zip(results) {
            let status = match result {
                Ok(status) => status,
                Err(e @ AssetError::PlaceholderMissing(_)) => return Err(e),
                Err(e) => {
                    warn!(id = %id, error = %e, "Artwork could not be cached");
                    AssetStatus::Failed
                }
            };
            report.statuses.insert(id.clone(), status);
        }
        Ok(report)
    }

    /// Stores artwork for `id` from an explicit URL unless already cached.
    ///
    /// Returns whether the artwork is available afterwards. Used for banners.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn store_from_url(&self, id: &ItemId, url: &str) -> Result<bool, AssetError> {
        let path = self.path_for(id);
        if is_cached(&path).await {
            return Ok(true);
        }

        match self.transport.fetch(url).await {
            Ok(Some(bytes)) if !bytes.is_empty() => {
                write_atomic(&path, &bytes).await?;
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) => {
                warn!(url = %url, error = %e, "Artwork download failed");
                Ok(false)
            }
        }
    }
}

/// A cache hit is a non-empty regular file.
async fn is_cached(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|m| m.is_file() && m.len() > 0)
}

/// Writes `bytes` to a unique sibling temp file, then renames it over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), AssetError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(dir).await?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = dir.join(format!(
        ".{file_name}.{}.{}.tmp",
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    tokio::fs::write(&temp, bytes).await?;
    if let Err(e) = tokio::fs::rename(&temp, path).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(e.into());
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
