//! Render error types.

use thiserror::Error;

/// Error type for compositing.
///
/// Missing or undecodable artwork is never an error here; it degrades to
/// fallbacks. These variants cover failures that leave no image to return.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Encoding or decoding failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The tile worker pool could not be started.
    #[error("Worker pool error: {0}")]
    Pool(String),

    /// A blocking render task panicked or was cancelled.
    #[error("Render task failed: {0}")]
    Join(String),

    /// Artwork could not be prepared.
    #[error("Asset error: {0}")]
    Asset(#[from] locker_fetch::AssetError),
}

impl From<rayon::ThreadPoolBuildError> for RenderError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        RenderError::Pool(err.to_string())
    }
}

impl From<tokio::task::JoinError> for RenderError {
    fn from(err: tokio::task::JoinError) -> Self {
        RenderError::Join(err.to_string())
    }
}
