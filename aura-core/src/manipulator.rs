//! Direct manipulation of overlays.
//!
//! One [`Manipulator`] exists per overlay. It is generic over the overlay
//! type through [`Manipulable`], and each overlay kind supplies a
//! [`ManipulationPolicy`] saying whether dragging needs a selection, which
//! corner handles exist and how small a resize may go.
//!
//! ```text
//!              press body                      press handle
//!   Dragging <──────────── Idle ─────────────────────────> Resizing
//!      │  move: pos = start + Δ        move: aspect-locked corner resize
//!      └──────── release ──> Idle <── release ───────────────┘
//!                   (commit Update if moved and still present)
//! ```
//!
//! Intermediate geometry lives in a local snapshot so moves never touch
//! the document. On release the snapshot is merged into the latest
//! committed record and returned as an update action.

use crate::action::Action;
use crate::capture::{CaptureGuard, PointerCaptures};
use crate::document::Document;
use crate::geometry::{corner_resize, drag_position, Corner, Point, Size};
use crate::overlay::{EmojiOverlay, GifOverlay, OverlayId, OverlayKey, OverlayKind, TextOverlay};

/// Per-kind manipulation rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManipulationPolicy {
    /// Smallest width a resize may produce. Smaller results are rejected.
    /// Applies to width only; a wide gif may still shrink to a few pixels tall.
    pub min_width: f32,
    /// Corner handles offered when selected.
    pub handles: &'static [Corner],
    /// Whether body drags require the overlay to be selected.
    pub selection_gated: bool,
}

impl ManipulationPolicy {
    /// Whether `corner` is offered by this policy.
    #[must_use]
    pub fn has_handle(&self, corner: Corner) -> bool {
        self.handles.contains(&corner)
    }
}

/// Text drags freely and has no handles.
pub const TEXT_POLICY: ManipulationPolicy = ManipulationPolicy {
    min_width: 0.0,
    handles: &[],
    selection_gated: false,
};

/// Emoji drag when selected and resize from any corner down to 20px.
pub const EMOJI_POLICY: ManipulationPolicy = ManipulationPolicy {
    min_width: 20.0,
    handles: &Corner::ALL,
    selection_gated: true,
};

/// Gifs drag when selected and resize from any corner down to 50px.
pub const GIF_POLICY: ManipulationPolicy = ManipulationPolicy {
    min_width: 50.0,
    handles: &Corner::ALL,
    selection_gated: true,
};

/// An overlay a [`Manipulator`] can drive.
pub trait Manipulable: Clone + PartialEq {
    /// Collection this overlay type lives in.
    const KIND: OverlayKind;
    /// Manipulation rules for this overlay type.
    const POLICY: ManipulationPolicy;

    /// The overlay id.
    fn id(&self) -> OverlayId;
    /// Top-left position.
    fn position(&self) -> Point;
    /// Move the overlay.
    fn set_position(&mut self, position: Point);
    /// The resizable extent (emoji size, gif width), if any.
    fn extent(&self) -> Option<f32> {
        None
    }
    /// Apply a resized extent.
    fn set_extent(&mut self, _extent: f32) {}
    /// Rendered size when it can be known without measuring.
    fn natural_size(&self) -> Option<Size> {
        None
    }
    /// Latest committed record with this overlay's id.
    fn find(document: &Document, id: OverlayId) -> Option<&Self>;
    /// The update action committing this record.
    fn into_update(self) -> Action;

    /// Key across all collections.
    fn key(&self) -> OverlayKey {
        OverlayKey::new(Self::KIND, self.id())
    }
}

impl Manipulable for TextOverlay {
    const KIND: OverlayKind = OverlayKind::Text;
    const POLICY: ManipulationPolicy = TEXT_POLICY;

    fn id(&self) -> OverlayId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn find(document: &Document, id: OverlayId) -> Option<&Self> {
        document.text(id)
    }

    fn into_update(self) -> Action {
        Action::UpdateTextOverlay(self)
    }
}

impl Manipulable for EmojiOverlay {
    const KIND: OverlayKind = OverlayKind::Emoji;
    const POLICY: ManipulationPolicy = EMOJI_POLICY;

    fn id(&self) -> OverlayId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn extent(&self) -> Option<f32> {
        Some(self.size)
    }

    fn set_extent(&mut self, extent: f32) {
        self.size = extent;
    }

    fn natural_size(&self) -> Option<Size> {
        Some(Size::new(self.size, self.size))
    }

    fn find(document: &Document, id: OverlayId) -> Option<&Self> {
        document.emoji(id)
    }

    fn into_update(self) -> Action {
        Action::UpdateEmojiOverlay(self)
    }
}

impl Manipulable for GifOverlay {
    const KIND: OverlayKind = OverlayKind::Gif;
    const POLICY: ManipulationPolicy = GIF_POLICY;

    fn id(&self) -> OverlayId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn extent(&self) -> Option<f32> {
        Some(self.width)
    }

    fn set_extent(&mut self, extent: f32) {
        self.width = extent;
    }

    fn find(document: &Document, id: OverlayId) -> Option<&Self> {
        document.gif(id)
    }

    fn into_update(self) -> Action {
        Action::UpdateGifOverlay(self)
    }
}

/// Interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ManipulatorState {
    /// No interaction in progress.
    Idle,
    /// Moving the overlay.
    Dragging {
        /// Pointer position at press.
        start_pointer: Point,
        /// Overlay position at press.
        start_position: Point,
    },
    /// Resizing from a corner.
    Resizing {
        /// Handle being dragged.
        corner: Corner,
        /// Pointer position at press.
        start_pointer: Point,
        /// Overlay position at press.
        start_position: Point,
        /// Overlay size at press; its aspect ratio is locked.
        start_size: Size,
        /// Size after the last accepted move.
        current_size: Size,
    },
}

/// Outcome of releasing the pointer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Release {
    /// Update to dispatch, if the interaction changed geometry and the
    /// overlay still exists.
    pub commit: Option<Action>,
    /// Whether the pointer moved during the interaction.
    pub moved: bool,
}

/// Drag/resize state machine for one overlay.
#[derive(Debug)]
pub struct Manipulator<O: Manipulable> {
    committed: O,
    local: O,
    state: ManipulatorState,
    moved: bool,
    capture: Option<CaptureGuard>,
}

impl<O: Manipulable> Manipulator<O> {
    /// A manipulator at rest over `committed`.
    #[must_use]
    pub fn new(committed: O) -> Self {
        Self {
            local: committed.clone(),
            committed,
            state: ManipulatorState::Idle,
            moved: false,
            capture: None,
        }
    }

    /// Key of the manipulated overlay.
    #[must_use]
    pub fn key(&self) -> OverlayKey {
        self.committed.key()
    }

    /// Current interaction state.
    #[must_use]
    pub fn state(&self) -> ManipulatorState {
        self.state
    }

    /// Whether a drag or resize is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != ManipulatorState::Idle
    }

    /// Local snapshot, including uncommitted geometry.
    #[must_use]
    pub fn local(&self) -> &O {
        &self.local
    }

    /// Last committed record seen.
    #[must_use]
    pub fn committed(&self) -> &O {
        &self.committed
    }

    /// Size after the last accepted resize step, while resizing.
    #[must_use]
    pub fn live_size(&self) -> Option<Size> {
        match self.state {
            ManipulatorState::Resizing { current_size, .. } => Some(current_size),
            _ => None,
        }
    }

    /// Take in the latest committed record. The local snapshot follows it
    /// only while idle, so an interaction in progress is not disturbed.
    pub fn sync(&mut self, committed: &O) {
        if &self.committed == committed {
            return;
        }
        self.committed = committed.clone();
        if !self.is_active() {
            self.local = committed.clone();
        }
    }

    /// Pointer pressed on the overlay body. Returns `true` if a drag began.
    pub fn press_body(&mut self, pointer: Point, selected: bool, captures: &PointerCaptures) -> bool {
        if self.is_active() || (O::POLICY.selection_gated && !selected) {
            return false;
        }
        self.state = ManipulatorState::Dragging {
            start_pointer: pointer,
            start_position: self.local.position(),
        };
        self.begin(captures);
        true
    }

    /// Pointer pressed on a corner handle. Returns `true` if a resize
    /// began. Handles only respond while the overlay is selected.
    pub fn press_handle(
        &mut self,
        corner: Corner,
        pointer: Point,
        measured: Option<Size>,
        selected: bool,
        captures: &PointerCaptures,
    ) -> bool {
        if self.is_active() || !selected || !O::POLICY.has_handle(corner) {
            return false;
        }
        let Some(start_size) = measured.or_else(|| self.local.natural_size()) else {
            tracing::debug!(key = %self.key(), "resize without a measured size ignored");
            return false;
        };
        if start_size.aspect_ratio().is_none() {
            return false;
        }
        self.state = ManipulatorState::Resizing {
            corner,
            start_pointer: pointer,
            start_position: self.local.position(),
            start_size,
            current_size: start_size,
        };
        self.begin(captures);
        true
    }

    /// Pointer moved while captured.
    pub fn pointer_move(&mut self, pointer: Point) {
        match &mut self.state {
            ManipulatorState::Idle => {}
            ManipulatorState::Dragging {
                start_pointer,
                start_position,
            } => {
                let position = drag_position(*start_position, *start_pointer, pointer);
                if position != self.local.position() {
                    self.moved = true;
                }
                self.local.set_position(position);
            }
            ManipulatorState::Resizing {
                corner,
                start_pointer,
                start_position,
                start_size,
                current_size,
            } => {
                let delta = pointer - *start_pointer;
                if delta != Point::ZERO {
                    self.moved = true;
                }
                let Some(outcome) = corner_resize(*corner, *start_position, *start_size, delta)
                else {
                    return;
                };
                if outcome.size.width < O::POLICY.min_width {
                    return;
                }
                *current_size = outcome.size;
                self.local.set_position(outcome.position);
                self.local.set_extent(outcome.size.width);
            }
        }
    }

    /// Pointer released. Ends the interaction, releases the capture and
    /// produces the commit for the caller to dispatch.
    ///
    /// Nothing is committed if the pointer never moved or the overlay
    /// has disappeared from `document` in the meantime.
    pub fn release(&mut self, document: &Document) -> Release {
        if !self.is_active() {
            return Release::default();
        }
        let moved = std::mem::take(&mut self.moved);
        self.state = ManipulatorState::Idle;
        self.capture = None;

        if !moved {
            return Release { commit: None, moved };
        }

        let Some(latest) = O::find(document, self.committed.id()) else {
            tracing::debug!(key = %self.key(), "overlay vanished mid-interaction; dropping commit");
            self.local = self.committed.clone();
            return Release { commit: None, moved };
        };

        let mut merged = latest.clone();
        merged.set_position(self.local.position());
        if let Some(extent) = self.local.extent() {
            merged.set_extent(extent);
        }
        self.local = merged.clone();
        Release {
            commit: Some(merged.into_update()),
            moved,
        }
    }

    fn begin(&mut self, captures: &PointerCaptures) {
        self.moved = false;
        self.capture = Some(captures.acquire(self.key()));
        tracing::debug!(key = %self.key(), state = ?self.state, "interaction started");
    }
}
