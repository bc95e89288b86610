//! The document transition function.
//!
//! [`reduce`] is total: every action, including ones naming overlays that
//! no longer exist, yields a complete document. Updates and removals with
//! an absent id leave the collection untouched, since ids routinely go
//! stale across asynchronous boundaries.

use crate::action::Action;
use crate::document::{Document, MAX_CORNER_RADIUS, MAX_PADDING};
use crate::overlay::{EmojiOverlay, GifOverlay, OverlayId, TextOverlay};

/// Apply `action` to `document`, producing the next document.
#[must_use]
pub fn reduce(document: &Document, action: &Action) -> Document {
    let mut next = document.clone();

    match action {
        Action::SetScreenshot(value) => next.screenshot = Some(value.clone()),
        Action::SetImageDimensions(dimensions) => next.image_dimensions = Some(*dimensions),
        Action::SetBackground(background) => next.background = background.clone(),
        Action::SetPadding(padding) => next.padding = clamp_to(*padding, MAX_PADDING),
        Action::SetCornerRadius(radius) => next.corner_radius = clamp_to(*radius, MAX_CORNER_RADIUS),
        Action::SetShadow(token) => next.shadow = token.clone(),
        Action::SetFrame(frame) => next.frame = frame.clone(),

        Action::AddTextOverlay => {
            let id = next.allocate_id();
            next.text_overlays.push(TextOverlay::new(id));
        }
        Action::UpdateTextOverlay(overlay) => {
            replace_by_id(&mut next.text_overlays, overlay, |t| t.id);
        }
        Action::RemoveTextOverlay(id) => next.text_overlays.retain(|t| t.id != *id),

        Action::AddEmojiOverlay(glyph) => {
            let id = next.allocate_id();
            next.emoji_overlays.push(EmojiOverlay::new(id, glyph.clone()));
        }
        Action::UpdateEmojiOverlay(overlay) => {
            replace_by_id(&mut next.emoji_overlays, overlay, |e| e.id);
        }
        Action::RemoveEmojiOverlay(id) => next.emoji_overlays.retain(|e| e.id != *id),

        Action::AddGifOverlay(url) => {
            let id = next.allocate_id();
            next.gif_overlays.push(GifOverlay::new(id, url.clone()));
        }
        Action::UpdateGifOverlay(overlay) => {
            replace_by_id(&mut next.gif_overlays, overlay, |g| g.id);
        }
        Action::RemoveGifOverlay(id) => next.gif_overlays.retain(|g| g.id != *id),

        Action::ResetState => {
            next = Document {
                screenshot: document.screenshot.clone(),
                image_dimensions: document.image_dimensions,
                user: document.user.clone(),
                ids: document.ids.clone(),
                ..Document::default()
            };
        }

        Action::Login(user) => next.user = Some(user.clone()),
        Action::Logout => next.user = None,

        Action::Unrecognized => {}
    }

    next
}

fn clamp_to(value: i64, max: u32) -> u32 {
    u32::try_from(value.clamp(0, i64::from(max))).unwrap_or(0)
}

fn replace_by_id<T: Clone>(items: &mut [T], replacement: &T, id_of: impl Fn(&T) -> OverlayId) {
    let id = id_of(replacement);
    if let Some(slot) = items.iter_mut().find(|item| id_of(item) == id) {
        *slot = replacement.clone();
    }
}
