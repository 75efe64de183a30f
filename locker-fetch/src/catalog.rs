//! Public cosmetic catalog.

use async_trait::async_trait;
use locker_core::{ItemId, Rarity, UNKNOWN_NAME};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::FetchError;
use crate::http::HttpClient;

/// Base URL of the public catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://fortnite-api.com";

// ============================================================================
// Records
// ============================================================================

/// Catalog entry for one cosmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Display name; `Unknown` when the catalog omits it.
    #[serde(default = "unknown_name")]
    pub name: String,
    /// Rarity tier; Common when the catalog omits it.
    #[serde(default, with = "rarity_display")]
    pub rarity: Rarity,
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

/// The catalog nests the tier as `{"value": "...", "displayValue": "..."}`.
mod rarity_display {
    use locker_core::Rarity;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Tier {
        #[serde(rename = "displayValue", default)]
        display_value: Option<String>,
    }

    pub fn serialize<S: Serializer>(rarity: &Rarity, serializer: S) -> Result<S::Ok, S::Error> {
        Tier {
            display_value: Some(rarity.display_value().to_string()),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rarity, D::Error> {
        let tier = Option::<Tier>::deserialize(deserializer)?;
        Ok(tier
            .and_then(|t| t.display_value)
            .map(Rarity::from)
            .unwrap_or_default())
    }
}

/// Catalog entry for one profile banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerRecord {
    /// Banner id, without the `banner_` prefix.
    pub id: String,
    /// Internal name, used as the display name.
    #[serde(rename = "devName", default)]
    pub dev_name: Option<String>,
    /// Artwork URLs.
    #[serde(default)]
    pub images: BannerImages,
}

/// Artwork URLs of a banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerImages {
    /// Icon URL.
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

// ============================================================================
// Catalog Trait
// ============================================================================

/// Source of per-item display metadata.
#[async_trait]
pub trait CosmeticCatalog: Send + Sync {
    /// Looks up one cosmetic. `Ok(None)` means the catalog does not know it.
    async fn lookup(&self, id: &ItemId) -> Result<Option<CatalogRecord>, FetchError>;

    /// Lists every banner the catalog knows.
    async fn banners(&self) -> Result<Vec<BannerRecord>, FetchError>;
}

// ============================================================================
// HTTP Catalog
// ============================================================================

/// Catalog backed by the public cosmetics API.
#[derive(Debug, Clone)]
pub struct FortniteApiCatalog {
    http: HttpClient,
    base_url: String,
}

impl FortniteApiCatalog {
    /// Creates a catalog client against [`DEFAULT_CATALOG_URL`].
    pub fn new(http: HttpClient) -> Self {
        Self::with_base_url(http, DEFAULT_CATALOG_URL)
    }

    /// Creates a catalog client against another deployment.
    pub fn with_base_url(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of a cosmetic's catalog entry.
    pub fn cosmetic_url(&self, id: &ItemId) -> String {
        format!("{}/v2/cosmetics/br/{id}", self.base_url)
    }
}

#[async_trait]
impl CosmeticCatalog for FortniteApiCatalog {
    #[instrument(skip(self), fields(id = %id))]
    async fn lookup(&self, id: &ItemId) -> Result<Option<CatalogRecord>, FetchError> {
        let url = self.cosmetic_url(id);
        let response = self.http.get(&url).await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("Not in catalog");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let envelope: Envelope<CatalogRecord> = response.json().await?;
        Ok(Some(envelope.data))
    }

    #[instrument(skip(self))]
    async fn banners(&self) -> Result<Vec<BannerRecord>, FetchError> {
        let url = format!("{}/v1/banners", self.base_url);
        let response = self.http.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let envelope: Envelope<Vec<BannerRecord>> = response.json().await?;
        debug!(count = envelope.data.len(), "Banner catalog loaded");
        Ok(envelope.data)
    }
}
