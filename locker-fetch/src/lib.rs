// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Locker Fetch
//!
//! Everything that talks to the network for Locker:
//!
//! ## Login and Account
//!
//! - [`auth::DeviceAuthFlow`] - Device-code login producing an [`EpicSession`]
//! - [`account::ProfileClient`] - Profile queries, inventory parsing, account summary
//!
//! ## Catalog and Resolution
//!
//! - [`catalog::CosmeticCatalog`] - Trait for per-item metadata lookups
//! - [`catalog::FortniteApiCatalog`] - Public catalog over HTTP
//! - [`resolver::RarityResolver`] - Name/rarity resolution with mythic overrides
//! - [`banners::BannerDiscovery`] - Banner naming and artwork
//!
//! ## Assets
//!
//! - [`assets::AssetCache`] - Download-or-placeholder artwork cache
//! - [`assets::AssetTransport`] - Trait for fetching artwork bytes
//!
//! ## Example
//!
//! ```ignore
//! use locker_fetch::{AssetCache, BannerNameMap, FortniteApiCatalog, HttpClient, RarityResolver};
//!
//! let http = HttpClient::for_game_services()?;
//! let catalog = Arc::new(FortniteApiCatalog::new(http.clone()));
//! let resolver = RarityResolver::new(catalog, CosmeticOrder::default());
//!
//! let ordered = resolver.sort_ids(&ids, &BannerNameMap::new(), &DISPLAY_ORDER).await;
//! ```

pub mod account;
pub mod assets;
pub mod auth;
pub mod banners;
pub mod catalog;
pub mod error;
pub mod http;
pub mod resolver;
pub mod retry;

// Errors
pub use error::{AssetError, AuthError, FetchError, HttpError};

// Transport
pub use http::HttpClient;
pub use retry::RetryStrategy;

// Login & account
pub use account::{AccountStats, AccountSummary, ProfileClient, ProfileId};
pub use auth::{ClientCredentials, DeviceAuthFlow, DeviceAuthorization, DevicePoll, EpicSession};

// Catalog & resolution
pub use banners::{BannerDiscovery, BannerNameMap};
pub use catalog::{BannerRecord, CatalogRecord, CosmeticCatalog, FortniteApiCatalog};
pub use resolver::RarityResolver;

// Assets
pub use assets::{AssetCache, AssetReport, AssetStatus, AssetTransport, HttpAssetTransport};
