//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while composing, exporting or ingesting images.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The composition could not be serialized.
    #[error("Composition error: {0}")]
    Composition(String),

    /// Rasterization failed.
    #[error("Rasterization failed: {0}")]
    Rasterize(String),

    /// Image encoding failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// The file is not an image the editor accepts.
    #[error("Unsupported media: {0}")]
    UnsupportedMedia(String),

    /// Image decoding failed.
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
