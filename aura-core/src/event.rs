//! Pointer input routed to the editor.

use serde::{Deserialize, Serialize};

use crate::geometry::{Corner, Point, Size};
use crate::overlay::OverlayKey;

/// What the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PointerTarget {
    /// Empty canvas area.
    Canvas,
    /// The body of an overlay.
    Body {
        /// Overlay hit.
        overlay: OverlayKey,
    },
    /// A corner resize handle of an overlay.
    Handle {
        /// Overlay owning the handle.
        overlay: OverlayKey,
        /// Which corner.
        corner: Corner,
        /// Rendered size of the overlay at press time, if the host
        /// measured it.
        #[serde(default)]
        measured: Option<Size>,
    },
}

/// All pointer events the editor can receive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        /// Pointer position in document space.
        position: Point,
        /// Hit target.
        target: PointerTarget,
    },
    /// Pointer moved anywhere on the input surface.
    Move {
        /// Pointer position in document space.
        position: Point,
    },
    /// Button released anywhere on the input surface.
    Up {
        /// Pointer position in document space.
        position: Point,
    },
}

impl PointerEvent {
    /// Pointer position carried by the event.
    #[must_use]
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position } => *position,
        }
    }
}
