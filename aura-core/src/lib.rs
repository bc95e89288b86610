//! # SnapAura Core
//!
//! Editor logic for styling screenshots: the document model, its
//! transition function, and direct manipulation of overlays.
//! Compiles to WASM for browser hosts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├─────────────────────────────────────────────┤
//! │  Store           │  Interaction             │
//! │  - Document      │  - Manipulator per       │
//! │  - Actions       │    overlay               │
//! │  - reduce()      │  - Pointer capture       │
//! │                  │  - Selection             │
//! ├─────────────────────────────────────────────┤
//! │  Geometry: drag delta, aspect-locked resize │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod background;
pub mod capture;
pub mod document;
pub mod editor;
pub mod emoji;
pub mod error;
pub mod event;
pub mod geometry;
pub mod manipulator;
pub mod overlay;
pub mod presets;
pub mod reducer;
pub mod selection;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use action::Action;
pub use background::{Background, BackgroundKind, Gradient};
pub use capture::{CaptureGuard, PointerCaptures};
pub use document::{Document, ImageDimensions, User};
pub use editor::{Editor, TextEdit};
pub use emoji::{search_emoji, EmojiEntry, EMOJI_CATALOG};
pub use error::{EditorError, EditorResult};
pub use event::{PointerEvent, PointerTarget};
pub use geometry::{corner_resize, drag_position, Corner, Point, ResizeOutcome, Size};
pub use manipulator::{
    Manipulable, ManipulationPolicy, Manipulator, ManipulatorState, Release, EMOJI_POLICY,
    GIF_POLICY, TEXT_POLICY,
};
pub use overlay::{
    EmojiOverlay, FontStyle, FontWeight, GifOverlay, IdGenerator, OverlayId, OverlayKey,
    OverlayKind, TextAlign, TextOverlay,
};
pub use presets::{BrowserFrame, NamedPreset, GRADIENT_PRESETS, SHADOW_PRESETS, TEXT_SHADOW_PRESETS};
pub use reducer::reduce;
pub use selection::Selection;
pub use store::{Dispatch, Store};

/// Core crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
