// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Locker Store
//!
//! Configuration and session state for Locker.
//!
//! This crate provides:
//!
//! - **Config**: JSON configuration with defaults for every field
//! - **AssetPaths**: Conventional font, logo, placeholder and background files
//! - **SessionStore**: Per-user inventory, banner names and produced images
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use locker_store::{Config, SessionStore, UserSession};
//!
//! let config = Config::load()?;
//! let sessions = SessionStore::new();
//! sessions.start("user", UserSession::new("Jonesy", inventory, banners)).await;
//! let ids = sessions.ids_for_group("user", Group::AllCosmetics).await?;
//! ```

pub mod config;
pub mod error;
pub mod persistence;
pub mod session;

pub use config::{AssetPaths, Config, DEFAULT_CATALOG_BASE_URL, DEFAULT_WATERMARK};
pub use error::StoreError;
pub use persistence::{
    default_cache_dir, default_config_dir, default_config_path, default_data_dir, ensure_dir,
    load_json, load_json_or_default, save_json,
};
pub use session::{SessionManifest, SessionStore, UserSession};
