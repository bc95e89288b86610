//! Document transitions.
//!
//! Actions travel as `{"type": "SET_PADDING", "payload": 50}`. A tag the
//! editor does not know parses to [`Action::Unrecognized`], which the
//! reducer ignores.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::background::Background;
use crate::document::{ImageDimensions, User};
use crate::error::EditorResult;
use crate::overlay::{EmojiOverlay, GifOverlay, OverlayId, TextOverlay};
use crate::presets::BrowserFrame;

/// A request to transition the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Replace the primary image.
    SetScreenshot(String),
    /// Record the probed size of the primary image.
    SetImageDimensions(ImageDimensions),
    /// Replace the background.
    SetBackground(Background),
    /// Set padding; out-of-range values are clamped.
    SetPadding(i64),
    /// Set corner radius; out-of-range values are clamped.
    SetCornerRadius(i64),
    /// Set the drop-shadow token.
    SetShadow(String),
    /// Set the browser frame.
    SetFrame(BrowserFrame),
    /// Append a default text overlay.
    AddTextOverlay,
    /// Replace the text overlay with the same id.
    UpdateTextOverlay(TextOverlay),
    /// Remove a text overlay.
    RemoveTextOverlay(OverlayId),
    /// Append an emoji overlay with the given glyph.
    AddEmojiOverlay(String),
    /// Replace the emoji overlay with the same id.
    UpdateEmojiOverlay(EmojiOverlay),
    /// Remove an emoji overlay.
    RemoveEmojiOverlay(OverlayId),
    /// Append a gif overlay with the given URL.
    AddGifOverlay(String),
    /// Replace the gif overlay with the same id.
    UpdateGifOverlay(GifOverlay),
    /// Remove a gif overlay.
    RemoveGifOverlay(OverlayId),
    /// Restore defaults, keeping the screenshot, its dimensions and the user.
    ResetState,
    /// Sign in.
    Login(User),
    /// Sign out.
    Logout,
    /// Any tag this editor does not understand.
    Unrecognized,
}

impl Action {
    /// Wire tags of every action the reducer handles.
    pub const KNOWN_TYPES: [&'static str; 19] = [
        "SET_SCREENSHOT",
        "SET_IMAGE_DIMENSIONS",
        "SET_BACKGROUND",
        "SET_PADDING",
        "SET_CORNER_RADIUS",
        "SET_SHADOW",
        "SET_FRAME",
        "ADD_TEXT_OVERLAY",
        "UPDATE_TEXT_OVERLAY",
        "REMOVE_TEXT_OVERLAY",
        "ADD_EMOJI_OVERLAY",
        "UPDATE_EMOJI_OVERLAY",
        "REMOVE_EMOJI_OVERLAY",
        "ADD_GIF_OVERLAY",
        "UPDATE_GIF_OVERLAY",
        "REMOVE_GIF_OVERLAY",
        "RESET_STATE",
        "LOGIN",
        "LOGOUT",
    ];

    /// Parse an action from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON, or if a known action
    /// carries a payload of the wrong shape.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse an action from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if a known action carries a payload of the wrong
    /// shape. Unknown tags are not an error.
    pub fn from_value(value: Value) -> EditorResult<Self> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match serde_json::from_value::<Action>(value) {
            Ok(action) => Ok(action),
            Err(err) => match tag {
                Some(tag) if !Self::KNOWN_TYPES.contains(&tag.as_str()) => {
                    tracing::debug!(%tag, "ignoring unrecognized action");
                    Ok(Action::Unrecognized)
                }
                _ => Err(err.into()),
            },
        }
    }

    /// Wire tag of this action.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetScreenshot(_) => "SET_SCREENSHOT",
            Action::SetImageDimensions(_) => "SET_IMAGE_DIMENSIONS",
            Action::SetBackground(_) => "SET_BACKGROUND",
            Action::SetPadding(_) => "SET_PADDING",
            Action::SetCornerRadius(_) => "SET_CORNER_RADIUS",
            Action::SetShadow(_) => "SET_SHADOW",
            Action::SetFrame(_) => "SET_FRAME",
            Action::AddTextOverlay => "ADD_TEXT_OVERLAY",
            Action::UpdateTextOverlay(_) => "UPDATE_TEXT_OVERLAY",
            Action::RemoveTextOverlay(_) => "REMOVE_TEXT_OVERLAY",
            Action::AddEmojiOverlay(_) => "ADD_EMOJI_OVERLAY",
            Action::UpdateEmojiOverlay(_) => "UPDATE_EMOJI_OVERLAY",
            Action::RemoveEmojiOverlay(_) => "REMOVE_EMOJI_OVERLAY",
            Action::AddGifOverlay(_) => "ADD_GIF_OVERLAY",
            Action::UpdateGifOverlay(_) => "UPDATE_GIF_OVERLAY",
            Action::RemoveGifOverlay(_) => "REMOVE_GIF_OVERLAY",
            Action::ResetState => "RESET_STATE",
            Action::Login(_) => "LOGIN",
            Action::Logout => "LOGOUT",
            Action::Unrecognized => "UNRECOGNIZED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(Action::SetPadding(50)).expect("serialize");
        assert_eq!(json["type"], "SET_PADDING");
        assert_eq!(json["payload"], 50);

        let json = serde_json::to_value(Action::AddTextOverlay).expect("serialize");
        assert_eq!(json["type"], "ADD_TEXT_OVERLAY");
        assert!(json.get("payload").is_none());
    }

    #[test]
    fn test_parse_known_actions() {
        let action = Action::from_json(r#"{"type":"ADD_EMOJI_OVERLAY","payload":"🎉"}"#)
            .expect("parse");
        assert_eq!(action, Action::AddEmojiOverlay("🎉".to_string()));

        let action = Action::from_json(r#"{"type":"RESET_STATE"}"#).expect("parse");
        assert_eq!(action, Action::ResetState);

        let action = Action::from_json(r#"{"type":"REMOVE_GIF_OVERLAY","payload":12}"#)
            .expect("parse");
        assert_eq!(action, Action::RemoveGifOverlay(OverlayId(12)));
    }

    #[test]
    fn test_unknown_type_is_unrecognized() {
        let action = Action::from_json(r#"{"type":"SPIN_CANVAS","payload":{"deg":90}}"#)
            .expect("parse");
        assert_eq!(action, Action::Unrecognized);

        let action = Action::from_json(r#"{"type":"UNDO"}"#).expect("parse");
        assert_eq!(action, Action::Unrecognized);
    }

    #[test]
    fn test_known_type_with_bad_payload_is_error() {
        assert!(Action::from_json(r#"{"type":"SET_PADDING","payload":"wide"}"#).is_err());
        assert!(Action::from_json("not json").is_err());
    }

    #[test]
    fn test_names_match_known_types() {
        let samples = [
            Action::AddTextOverlay,
            Action::ResetState,
            Action::Logout,
            Action::SetPadding(1),
            Action::RemoveEmojiOverlay(OverlayId(1)),
        ];
        for action in &samples {
            assert!(Action::KNOWN_TYPES.contains(&action.name()));
        }
    }
}
