//! Overlay entities layered above the screenshot.
//!
//! Text, emoji and gif overlays are structurally parallel: each carries a
//! unique [`OverlayId`], a position in document space, and kind-specific
//! styling. Field names serialize in camelCase so documents round-trip
//! with browser hosts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Default content of a freshly added text overlay.
pub const DEFAULT_TEXT: &str = "Editable Text";
/// Default text colour.
pub const DEFAULT_TEXT_COLOR: &str = "#FFFFFF";
/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 48.0;
/// Default text shadow token.
pub const DEFAULT_TEXT_SHADOW: &str = "0 1px 2px rgba(0,0,0,0.5)";
/// Default emoji size in pixels.
pub const DEFAULT_EMOJI_SIZE: f32 = 80.0;
/// Default gif width in pixels.
pub const DEFAULT_GIF_WIDTH: f32 = 150.0;

/// Unique identifier of an overlay within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic source of overlay ids.
///
/// Owned by the document. Never rewinds, so an id handed out once is
/// never handed out again in the same session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdGenerator {
    next: u64,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdGenerator {
    /// Hand out the next id.
    pub fn next_id(&mut self) -> OverlayId {
        let id = OverlayId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// The id that will be handed out next, without consuming it.
    #[must_use]
    pub fn peek(&self) -> OverlayId {
        OverlayId(self.next)
    }

    /// Move the counter past `id` if it has not got there yet. Never rewinds.
    pub fn advance_past(&mut self, id: OverlayId) {
        self.next = self.next.max(id.0.saturating_add(1));
    }
}

/// The three overlay collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    /// Text overlay.
    Text,
    /// Emoji overlay.
    Emoji,
    /// Gif or sticker overlay.
    Gif,
}

impl OverlayKind {
    /// Lowercase kind name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OverlayKind::Text => "text",
            OverlayKind::Emoji => "emoji",
            OverlayKind::Gif => "gif",
        }
    }
}

/// Identifies an overlay across all collections.
///
/// Ids are only unique per collection, so selection and pointer capture
/// key on kind and id together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OverlayKey {
    /// Collection the overlay lives in.
    pub kind: OverlayKind,
    /// Id within that collection.
    pub id: OverlayId,
}

impl OverlayKey {
    /// Create a new key.
    #[must_use]
    pub const fn new(kind: OverlayKind, id: OverlayId) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for OverlayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind.as_str(), self.id)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// The other weight.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            FontWeight::Normal => FontWeight::Bold,
            FontWeight::Bold => FontWeight::Normal,
        }
    }
}

/// Font style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

impl FontStyle {
    /// The other style.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            FontStyle::Normal => FontStyle::Italic,
            FontStyle::Italic => FontStyle::Normal,
        }
    }
}

/// A user-editable text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOverlay {
    /// Unique id within the text collection.
    pub id: OverlayId,
    /// Text content.
    pub text: String,
    /// CSS colour.
    pub color: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Top-left position.
    pub position: Point,
    /// Alignment.
    pub text_align: TextAlign,
    /// Weight.
    pub font_weight: FontWeight,
    /// Style.
    pub font_style: FontStyle,
    /// CSS text-shadow token.
    pub text_shadow: String,
}

impl TextOverlay {
    /// A text overlay with the default content and styling.
    #[must_use]
    pub fn new(id: OverlayId) -> Self {
        Self {
            id,
            text: DEFAULT_TEXT.to_string(),
            color: DEFAULT_TEXT_COLOR.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            position: Point::new(100.0, 100.0),
            text_align: TextAlign::Left,
            font_weight: FontWeight::Bold,
            font_style: FontStyle::Normal,
            text_shadow: DEFAULT_TEXT_SHADOW.to_string(),
        }
    }
}

/// An emoji glyph rendered at a uniform size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmojiOverlay {
    /// Unique id within the emoji collection.
    pub id: OverlayId,
    /// The glyph.
    pub emoji: String,
    /// Box size and font size in pixels.
    pub size: f32,
    /// Top-left position.
    pub position: Point,
}

impl EmojiOverlay {
    /// An emoji overlay at the default size and position.
    #[must_use]
    pub fn new(id: OverlayId, emoji: impl Into<String>) -> Self {
        Self {
            id,
            emoji: emoji.into(),
            size: DEFAULT_EMOJI_SIZE,
            position: Point::new(150.0, 150.0),
        }
    }
}

/// An animated gif or sticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GifOverlay {
    /// Unique id within the gif collection.
    pub id: OverlayId,
    /// Source URL.
    pub url: String,
    /// Width in pixels; height follows the intrinsic aspect ratio.
    pub width: f32,
    /// Top-left position.
    pub position: Point,
}

impl GifOverlay {
    /// A gif overlay at the default width and position.
    #[must_use]
    pub fn new(id: OverlayId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            width: DEFAULT_GIF_WIDTH,
            position: Point::new(150.0, 150.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generator_is_monotonic() {
        let mut ids = IdGenerator::default();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(b > a);
        assert_eq!(ids.peek(), OverlayId(3));
    }

    #[test]
    fn test_advance_past_never_rewinds() {
        let mut ids = IdGenerator::default();
        ids.advance_past(OverlayId(7));
        assert_eq!(ids.peek(), OverlayId(8));
        ids.advance_past(OverlayId(2));
        assert_eq!(ids.next_id(), OverlayId(8));
    }

    #[test]
    fn test_text_defaults() {
        let t = TextOverlay::new(OverlayId(1));
        assert_eq!(t.text, "Editable Text");
        assert_eq!(t.color, "#FFFFFF");
        assert!((t.font_size - 48.0).abs() < f32::EPSILON);
        assert_eq!(t.position, Point::new(100.0, 100.0));
        assert_eq!(t.text_align, TextAlign::Left);
        assert_eq!(t.font_weight, FontWeight::Bold);
        assert_eq!(t.font_style, FontStyle::Normal);
    }

    #[test]
    fn test_text_overlay_camel_case_json() {
        let json = serde_json::to_value(TextOverlay::new(OverlayId(5))).expect("serialize");
        assert_eq!(json["id"], 5);
        assert_eq!(json["fontSize"], 48.0);
        assert_eq!(json["textAlign"], "left");
        assert_eq!(json["fontWeight"], "bold");
        assert_eq!(json["position"]["x"], 100.0);
    }

    #[test]
    fn test_toggles() {
        assert_eq!(FontWeight::Bold.toggled(), FontWeight::Normal);
        assert_eq!(FontStyle::Normal.toggled(), FontStyle::Italic);
    }

    #[test]
    fn test_overlay_key_display() {
        let key = OverlayKey::new(OverlayKind::Gif, OverlayId(42));
        assert_eq!(key.to_string(), "gif#42");
    }
}
