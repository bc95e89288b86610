//! Error types for editor operations.
//!
//! The reducer itself never fails. These errors only surface at the
//! edges: parsing actions from JSON, looking up presets by name, and
//! driving the editor with inputs that reference overlays or handles
//! that do not exist.

use thiserror::Error;

use crate::overlay::OverlayKey;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur at the editor boundary.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Action or document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No preset with the given name exists.
    #[error("Unknown {kind} preset: {name}")]
    UnknownPreset {
        /// Preset family (shadow, frame, gradient, text shadow).
        kind: &'static str,
        /// The name that was looked up.
        name: String,
    },

    /// Corner handle name could not be parsed.
    #[error("Invalid resize handle: {0}")]
    InvalidHandle(String),

    /// The overlay does not exist in the current document.
    #[error("Overlay not found: {0}")]
    OverlayNotFound(OverlayKey),
}
