//! Ephemeral overlay selection.
//!
//! At most one emoji or gif overlay is selected at a time. Selection lives
//! beside the document, never inside it, and is not exported. Text
//! overlays are never selected.

use crate::document::Document;
use crate::overlay::{OverlayKey, OverlayKind};

/// The currently selected overlay, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<OverlayKey>,
}

impl Selection {
    /// Nothing selected.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected overlay.
    #[must_use]
    pub fn selected(&self) -> Option<OverlayKey> {
        self.selected
    }

    /// Whether `key` is the selected overlay.
    #[must_use]
    pub fn is_selected(&self, key: OverlayKey) -> bool {
        self.selected == Some(key)
    }

    /// Toggle `key`: deselect it if selected, otherwise select it and drop
    /// any other selection. Text keys are ignored.
    pub fn toggle(&mut self, key: OverlayKey) {
        if key.kind == OverlayKind::Text {
            return;
        }
        self.selected = if self.is_selected(key) { None } else { Some(key) };
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Drop the selection if its overlay is gone from `document`.
    pub fn retain_existing(&mut self, document: &Document) {
        if let Some(key) = self.selected {
            if !document.contains(key) {
                tracing::debug!(%key, "selected overlay removed");
                self.selected = None;
            }
        }
    }
}
