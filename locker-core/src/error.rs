//! Core error types for Locker.

use thiserror::Error;

/// Core error type for Locker operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An item identifier was empty after normalization.
    #[error("Empty item identifier")]
    EmptyItemId,

    /// An item identifier contained characters that cannot name a cache file.
    #[error("Invalid item identifier: {0:?}")]
    InvalidItemId(String),

    /// A group label did not name a category or the combined group.
    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data from a catalog or profile response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
