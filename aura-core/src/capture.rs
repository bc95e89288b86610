//! Scoped pointer capture.
//!
//! While an overlay is being dragged or resized it receives every pointer
//! move and release, wherever the pointer is. A manipulator acquires a
//! [`CaptureGuard`] on entering an interaction; dropping the guard
//! releases the capture, so no exit path (release, teardown of the
//! manipulator, removal of the overlay) leaves a stale registration.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

use crate::overlay::OverlayKey;

type Registry = RefCell<BTreeSet<OverlayKey>>;

/// Registry of overlays currently capturing the pointer.
#[derive(Debug, Clone, Default)]
pub struct PointerCaptures {
    active: Rc<Registry>,
}

impl PointerCaptures {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key` for global pointer events until the guard drops.
    #[must_use = "the capture is released as soon as the guard is dropped"]
    pub fn acquire(&self, key: OverlayKey) -> CaptureGuard {
        self.active.borrow_mut().insert(key);
        tracing::trace!(%key, "pointer captured");
        CaptureGuard {
            registry: Rc::downgrade(&self.active),
            key,
        }
    }

    /// Whether `key` currently captures the pointer.
    #[must_use]
    pub fn is_captured(&self, key: OverlayKey) -> bool {
        self.active.borrow().contains(&key)
    }

    /// All capturing overlays.
    #[must_use]
    pub fn active(&self) -> Vec<OverlayKey> {
        self.active.borrow().iter().copied().collect()
    }

    /// Number of live captures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.borrow().len()
    }

    /// Whether no overlay captures the pointer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.borrow().is_empty()
    }
}

/// Live pointer capture for one overlay.
#[derive(Debug)]
pub struct CaptureGuard {
    registry: Weak<Registry>,
    key: OverlayKey,
}

impl CaptureGuard {
    /// The capturing overlay.
    #[must_use]
    pub fn key(&self) -> OverlayKey {
        self.key
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().remove(&self.key);
            tracing::trace!(key = %self.key, "pointer released");
        }
    }
}
