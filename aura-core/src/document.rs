//! The editable document.
//!
//! A [`Document`] is a plain value. It is only ever replaced wholesale by
//! [`crate::reducer::reduce`]; nothing outside the reducer patches fields.

use serde::{Deserialize, Serialize};

use crate::background::Background;
use crate::overlay::{EmojiOverlay, GifOverlay, IdGenerator, OverlayId, OverlayKey, OverlayKind, TextOverlay};
use crate::presets::{BrowserFrame, GRADIENT_PRESETS, SHADOW_PRESETS};

/// Upper bound of the padding control.
pub const MAX_PADDING: u32 = 200;
/// Upper bound of the corner radius control.
pub const MAX_CORNER_RADIUS: u32 = 100;
/// Padding of a fresh document.
pub const DEFAULT_PADDING: u32 = 64;
/// Corner radius of a fresh document.
pub const DEFAULT_CORNER_RADIUS: u32 = 12;

/// Natural pixel size of the screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub picture: String,
}

/// Complete editable state of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Primary image as a data URI or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    /// Natural size of the primary image, once probed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_dimensions: Option<ImageDimensions>,
    /// Background layer.
    pub background: Background,
    /// Padding around the screenshot, 0..=200.
    pub padding: u32,
    /// Screenshot corner radius, 0..=100.
    pub corner_radius: u32,
    /// Drop-shadow filter token.
    pub shadow: String,
    /// Text overlays in paint order.
    pub text_overlays: Vec<TextOverlay>,
    /// Emoji overlays in paint order.
    pub emoji_overlays: Vec<EmojiOverlay>,
    /// Gif overlays in paint order.
    pub gif_overlays: Vec<GifOverlay>,
    /// Browser chrome.
    pub frame: BrowserFrame,
    /// Signed-in identity.
    #[serde(default)]
    pub user: Option<User>,
    /// Overlay id source.
    #[serde(default, rename = "nextId")]
    pub ids: IdGenerator,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            screenshot: None,
            image_dimensions: None,
            background: Background::Gradient(GRADIENT_PRESETS[0].gradient()),
            padding: DEFAULT_PADDING,
            corner_radius: DEFAULT_CORNER_RADIUS,
            shadow: SHADOW_PRESETS[2].value.to_string(),
            text_overlays: Vec::new(),
            emoji_overlays: Vec::new(),
            gif_overlays: Vec::new(),
            frame: BrowserFrame::none(),
            user: None,
            ids: IdGenerator::default(),
        }
    }
}

impl Document {
    /// Find a text overlay by id.
    #[must_use]
    pub fn text(&self, id: OverlayId) -> Option<&TextOverlay> {
        self.text_overlays.iter().find(|t| t.id == id)
    }

    /// Find an emoji overlay by id.
    #[must_use]
    pub fn emoji(&self, id: OverlayId) -> Option<&EmojiOverlay> {
        self.emoji_overlays.iter().find(|e| e.id == id)
    }

    /// Find a gif overlay by id.
    #[must_use]
    pub fn gif(&self, id: OverlayId) -> Option<&GifOverlay> {
        self.gif_overlays.iter().find(|g| g.id == id)
    }

    /// Whether the overlay identified by `key` is present.
    #[must_use]
    pub fn contains(&self, key: OverlayKey) -> bool {
        match key.kind {
            OverlayKind::Text => self.text(key.id).is_some(),
            OverlayKind::Emoji => self.emoji(key.id).is_some(),
            OverlayKind::Gif => self.gif(key.id).is_some(),
        }
    }

    /// Whether any overlay exists.
    #[must_use]
    pub fn has_overlays(&self) -> bool {
        !(self.text_overlays.is_empty()
            && self.emoji_overlays.is_empty()
            && self.gif_overlays.is_empty())
    }

    /// Highest id held by any overlay, if there are overlays.
    #[must_use]
    pub fn max_overlay_id(&self) -> Option<OverlayId> {
        self.overlay_keys().into_iter().map(|key| key.id).max()
    }

    /// Bring the id counter above every id already in use.
    ///
    /// Documents read from JSON without `nextId` start the counter at 1
    /// even when they carry overlays.
    pub fn sync_ids(&mut self) {
        if let Some(max) = self.max_overlay_id() {
            self.ids.advance_past(max);
        }
    }

    /// Allocate a fresh overlay id, unique across all three collections.
    pub fn allocate_id(&mut self) -> OverlayId {
        self.sync_ids();
        self.ids.next_id()
    }

    /// Keys of every overlay in paint order: text, then emoji, then gif,
    /// each in insertion order.
    #[must_use]
    pub fn overlay_keys(&self) -> Vec<OverlayKey> {
        let texts = self
            .text_overlays
            .iter()
            .map(|t| OverlayKey::new(OverlayKind::Text, t.id));
        let emojis = self
            .emoji_overlays
            .iter()
            .map(|e| OverlayKey::new(OverlayKind::Emoji, e.id));
        let gifs = self
            .gif_overlays
            .iter()
            .map(|g| OverlayKey::new(OverlayKind::Gif, g.id));
        texts.chain(emojis).chain(gifs).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::BackgroundKind;

    #[test]
    fn test_default_document() {
        let doc = Document::default();
        assert_eq!(doc.background.kind(), BackgroundKind::Gradient);
        assert_eq!(doc.padding, DEFAULT_PADDING);
        assert!(!doc.frame.is_active());
        assert!(!doc.has_overlays());
        assert!(doc.user.is_none());
    }

    #[test]
    fn test_paint_order_keys() {
        let mut doc = Document::default();
        doc.gif_overlays.push(GifOverlay::new(OverlayId(1), "a.gif"));
        doc.text_overlays.push(TextOverlay::new(OverlayId(2)));
        doc.emoji_overlays.push(EmojiOverlay::new(OverlayId(3), "🔥"));
        let kinds: Vec<_> = doc.overlay_keys().iter().map(|k| k.kind).collect();
        assert_eq!(kinds, vec![OverlayKind::Text, OverlayKind::Emoji, OverlayKind::Gif]);
    }

    #[test]
    fn test_document_json_round_trip() {
        let mut doc = Document::default();
        doc.screenshot = Some("data:image/png;base64,AAAA".to_string());
        doc.image_dimensions = Some(ImageDimensions::new(800, 600));
        doc.text_overlays.push(TextOverlay::new(doc.ids.next_id()));

        let json = serde_json::to_string(&doc).expect("serialize");
        assert!(json.contains("\"imageDimensions\""));
        assert!(json.contains("\"nextId\":2"));
        let parsed: Document = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_allocate_id_skips_ids_in_use_without_next_id() {
        let mut doc = Document::default();
        doc.emoji_overlays.push(EmojiOverlay::new(doc.ids.next_id(), "🔥"));
        doc.gif_overlays.push(GifOverlay::new(doc.ids.next_id(), "a.gif"));

        let mut value = serde_json::to_value(&doc).expect("serialize");
        value.as_object_mut().expect("object").remove("nextId");
        let mut parsed: Document = serde_json::from_value(value).expect("parse");
        assert_eq!(parsed.ids.peek(), OverlayId(1));

        assert_eq!(parsed.max_overlay_id(), Some(OverlayId(2)));
        assert_eq!(parsed.allocate_id(), OverlayId(3));
    }
}
