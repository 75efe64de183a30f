//! Fetch error types.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP layer error.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// Unexpected status from an upstream service.
    #[error("Unexpected status {status} from {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Request URL.
        url: String,
    },

    /// Invalid response body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] locker_core::CoreError),

    /// Login error.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Asset cache error.
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(HttpError::Request(err))
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Rate limited after exhausting retries.
    #[error("Rate limited, retry after {retry_after:?} seconds")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after: Option<u64>,
    },
}

// ============================================================================
// Auth Error
// ============================================================================

/// Error type for the device-code login flow.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A client credential is not configured.
    #[error("Missing client credential: set {0}")]
    MissingCredentials(&'static str),

    /// The identity service rejected a request.
    #[error("Request rejected with HTTP {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The device code expired before the user approved it.
    #[error("Device code expired before authorization")]
    Expired,

    /// Unexpected response body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP layer error.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Http(HttpError::Request(err))
    }
}

// ============================================================================
// Asset Error
// ============================================================================

/// Error type for the asset cache.
///
/// Download failures never surface here; they degrade to the placeholder.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The bundled placeholder image is missing, so the fallback cannot hold.
    #[error("Placeholder image not found: {0}")]
    PlaceholderMissing(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
