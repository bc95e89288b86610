//! Editing session: store, selection and per-overlay manipulators.
//!
//! The [`Editor`] is what a host drives. It owns the [`Store`], keeps one
//! [`Manipulator`] per overlay in step with the document after every
//! dispatch, routes pointer events, and turns emoji/gif clicks into
//! selection changes.

use std::collections::BTreeMap;

use crate::action::Action;
use crate::capture::PointerCaptures;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::event::{PointerEvent, PointerTarget};
use crate::geometry::{Corner, Point, Size};
use crate::manipulator::{Manipulable, Manipulator, Release};
use crate::overlay::{
    EmojiOverlay, GifOverlay, OverlayId, OverlayKey, OverlayKind, TextAlign, TextOverlay,
};
use crate::selection::Selection;
use crate::store::{Dispatch, Store};

/// A single edit from the floating text toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum TextEdit {
    /// Replace the text content.
    Content(String),
    /// Set the colour.
    Color(String),
    /// Set the font size; non-finite values are ignored, others floored at 1px.
    FontSize(f32),
    /// Set the alignment.
    Align(TextAlign),
    /// Flip between normal and bold.
    ToggleBold,
    /// Flip between normal and italic.
    ToggleItalic,
    /// Set the text-shadow token.
    Shadow(String),
}

impl TextEdit {
    fn apply(&self, overlay: &mut TextOverlay) {
        match self {
            TextEdit::Content(text) => overlay.text.clone_from(text),
            TextEdit::Color(color) => overlay.color.clone_from(color),
            TextEdit::FontSize(size) => {
                if size.is_finite() {
                    overlay.font_size = size.max(1.0);
                }
            }
            TextEdit::Align(align) => overlay.text_align = *align,
            TextEdit::ToggleBold => overlay.font_weight = overlay.font_weight.toggled(),
            TextEdit::ToggleItalic => overlay.font_style = overlay.font_style.toggled(),
            TextEdit::Shadow(shadow) => overlay.text_shadow.clone_from(shadow),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Press {
    key: OverlayKey,
    origin: Point,
    moved: bool,
}

/// One editing session.
#[derive(Debug, Default)]
pub struct Editor {
    store: Store,
    selection: Selection,
    captures: PointerCaptures,
    texts: BTreeMap<OverlayId, Manipulator<TextOverlay>>,
    emojis: BTreeMap<OverlayId, Manipulator<EmojiOverlay>>,
    gifs: BTreeMap<OverlayId, Manipulator<GifOverlay>>,
    press: Option<Press>,
}

impl Editor {
    /// A session over the default document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session over an existing document.
    #[must_use]
    pub fn with_document(document: Document) -> Self {
        let mut editor = Self {
            store: Store::with_document(document),
            ..Self::default()
        };
        editor.reconcile();
        editor
    }

    /// The committed document.
    #[must_use]
    pub fn document(&self) -> &Document {
        self.store.document()
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Live pointer captures.
    #[must_use]
    pub fn captures(&self) -> &PointerCaptures {
        &self.captures
    }

    /// Whether the "No objects added yet" hint applies.
    #[must_use]
    pub fn has_overlays(&self) -> bool {
        self.document().has_overlays()
    }

    /// Parse and dispatch a JSON action.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed; nothing changes then.
    pub fn dispatch_json(&mut self, json: &str) -> EditorResult<()> {
        let action = Action::from_json(json)?;
        self.dispatch(action);
        Ok(())
    }

    /// Route one pointer event. Returns the commits it dispatched.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<Action> {
        match event {
            PointerEvent::Down { position, target } => {
                self.pointer_down(target, position);
                Vec::new()
            }
            PointerEvent::Move { position } => {
                self.pointer_move(position);
                Vec::new()
            }
            PointerEvent::Up { position } => self.pointer_up(position),
        }
    }

    /// Pointer pressed on `target`.
    pub fn pointer_down(&mut self, target: PointerTarget, position: Point) {
        match target {
            PointerTarget::Canvas => {
                self.press = None;
                self.selection.clear();
            }
            PointerTarget::Body { overlay } => {
                self.press = Some(Press {
                    key: overlay,
                    origin: position,
                    moved: false,
                });
                let selected = self.selection.is_selected(overlay);
                let captures = self.captures.clone();
                match overlay.kind {
                    OverlayKind::Text => {
                        press_body(&mut self.texts, overlay.id, position, selected, &captures);
                    }
                    OverlayKind::Emoji => {
                        press_body(&mut self.emojis, overlay.id, position, selected, &captures);
                    }
                    OverlayKind::Gif => {
                        press_body(&mut self.gifs, overlay.id, position, selected, &captures);
                    }
                }
            }
            PointerTarget::Handle {
                overlay,
                corner,
                measured,
            } => {
                self.press = None;
                let selected = self.selection.is_selected(overlay);
                let captures = self.captures.clone();
                let grip = Grip {
                    corner,
                    pointer: position,
                    measured,
                    selected,
                };
                match overlay.kind {
                    OverlayKind::Text => press_handle(&mut self.texts, overlay.id, grip, &captures),
                    OverlayKind::Emoji => {
                        press_handle(&mut self.emojis, overlay.id, grip, &captures);
                    }
                    OverlayKind::Gif => press_handle(&mut self.gifs, overlay.id, grip, &captures),
                }
            }
        }
    }

    /// Pointer moved anywhere on the input surface.
    pub fn pointer_move(&mut self, position: Point) {
        if let Some(press) = self.press.as_mut() {
            if position != press.origin {
                press.moved = true;
            }
        }
        for key in self.captures.active() {
            match key.kind {
                OverlayKind::Text => move_captured(&mut self.texts, key.id, position),
                OverlayKind::Emoji => move_captured(&mut self.emojis, key.id, position),
                OverlayKind::Gif => move_captured(&mut self.gifs, key.id, position),
            }
        }
    }

    /// Pointer released. Commits every captured interaction, then treats an
    /// emoji/gif press without movement as a selection click.
    pub fn pointer_up(&mut self, position: Point) -> Vec<Action> {
        self.pointer_move(position);

        let mut commits = Vec::new();
        for key in self.captures.active() {
            let release = match key.kind {
                OverlayKind::Text => release_captured(&mut self.texts, key.id, self.store.document()),
                OverlayKind::Emoji => {
                    release_captured(&mut self.emojis, key.id, self.store.document())
                }
                OverlayKind::Gif => release_captured(&mut self.gifs, key.id, self.store.document()),
            };
            commits.extend(release.commit);
        }

        if let Some(press) = self.press.take() {
            if !press.moved {
                self.selection.toggle(press.key);
            }
        }

        for action in &commits {
            self.dispatch(action.clone());
        }
        commits
    }

    /// Apply a toolbar edit to a text overlay.
    ///
    /// The edit is applied to the latest committed record, never to a
    /// snapshot taken earlier, so it cannot roll back a position committed
    /// in between.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::OverlayNotFound`] if the overlay is gone.
    pub fn edit_text(&mut self, id: OverlayId, edit: &TextEdit) -> EditorResult<()> {
        let mut overlay = self
            .document()
            .text(id)
            .cloned()
            .ok_or(EditorError::OverlayNotFound(OverlayKey::new(OverlayKind::Text, id)))?;
        edit.apply(&mut overlay);
        self.dispatch(Action::UpdateTextOverlay(overlay));
        Ok(())
    }

    /// Delete a text overlay from its toolbar.
    pub fn delete_text(&mut self, id: OverlayId) {
        self.dispatch(Action::RemoveTextOverlay(id));
    }

    /// Manipulator-facing size of an overlay in the middle of a resize.
    #[must_use]
    pub fn live_size(&self, key: OverlayKey) -> Option<Size> {
        match key.kind {
            OverlayKind::Text => self.texts.get(&key.id).and_then(Manipulator::live_size),
            OverlayKind::Emoji => self.emojis.get(&key.id).and_then(Manipulator::live_size),
            OverlayKind::Gif => self.gifs.get(&key.id).and_then(Manipulator::live_size),
        }
    }

    /// The document as it should be drawn right now: committed state with
    /// every in-flight drag or resize applied. Paint order is unchanged.
    #[must_use]
    pub fn preview_document(&self) -> Document {
        let mut preview = self.document().clone();
        overlay_locals(&mut preview.text_overlays, &self.texts);
        overlay_locals(&mut preview.emoji_overlays, &self.emojis);
        overlay_locals(&mut preview.gif_overlays, &self.gifs);
        preview
    }

    fn reconcile(&mut self) {
        let document = self.store.document();
        reconcile_kind(&mut self.texts, &document.text_overlays);
        reconcile_kind(&mut self.emojis, &document.emoji_overlays);
        reconcile_kind(&mut self.gifs, &document.gif_overlays);
        self.selection.retain_existing(document);
        if let Some(press) = self.press {
            if !document.contains(press.key) {
                self.press = None;
            }
        }
    }
}

impl Dispatch for Editor {
    fn dispatch(&mut self, action: Action) {
        self.store.apply(&action);
        self.reconcile();
    }
}

struct Grip {
    corner: Corner,
    pointer: Point,
    measured: Option<Size>,
    selected: bool,
}

fn press_body<O: Manipulable>(
    manipulators: &mut BTreeMap<OverlayId, Manipulator<O>>,
    id: OverlayId,
    pointer: Point,
    selected: bool,
    captures: &PointerCaptures,
) {
    if let Some(m) = manipulators.get_mut(&id) {
        m.press_body(pointer, selected, captures);
    }
}

fn press_handle<O: Manipulable>(
    manipulators: &mut BTreeMap<OverlayId, Manipulator<O>>,
    id: OverlayId,
    grip: Grip,
    captures: &PointerCaptures,
) {
    if let Some(m) = manipulators.get_mut(&id) {
        m.press_handle(grip.corner, grip.pointer, grip.measured, grip.selected, captures);
    }
}

fn move_captured<O: Manipulable>(
    manipulators: &mut BTreeMap<OverlayId, Manipulator<O>>,
    id: OverlayId,
    pointer: Point,
) {
    if let Some(m) = manipulators.get_mut(&id) {
        m.pointer_move(pointer);
    }
}

fn release_captured<O: Manipulable>(
    manipulators: &mut BTreeMap<OverlayId, Manipulator<O>>,
    id: OverlayId,
    document: &Document,
) -> Release {
    manipulators
        .get_mut(&id)
        .map(|m| m.release(document))
        .unwrap_or_default()
}

fn reconcile_kind<O: Manipulable>(
    manipulators: &mut BTreeMap<OverlayId, Manipulator<O>>,
    overlays: &[O],
) {
    manipulators.retain(|id, _| overlays.iter().any(|o| o.id() == *id));
    for overlay in overlays {
        manipulators
            .entry(overlay.id())
            .and_modify(|m| m.sync(overlay))
            .or_insert_with(|| Manipulator::new(overlay.clone()));
    }
}

fn overlay_locals<O: Manipulable>(
    overlays: &mut [O],
    manipulators: &BTreeMap<OverlayId, Manipulator<O>>,
) {
    for overlay in overlays.iter_mut() {
        if let Some(m) = manipulators.get(&overlay.id()) {
            if m.is_active() {
                *overlay = m.local().clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{FontStyle, FontWeight};

    fn body(key: OverlayKey) -> PointerTarget {
        PointerTarget::Body { overlay: key }
    }

    fn emoji_key(editor: &Editor, index: usize) -> OverlayKey {
        OverlayKey::new(OverlayKind::Emoji, editor.document().emoji_overlays[index].id)
    }

    #[test]
    fn test_click_toggles_emoji_selection() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddEmojiOverlay("🙂".into()));
        let key = emoji_key(&editor, 0);

        editor.pointer_down(body(key), Point::new(160.0, 160.0));
        let commits = editor.pointer_up(Point::new(160.0, 160.0));
        assert!(commits.is_empty());
        assert!(editor.selection().is_selected(key));

        editor.pointer_down(body(key), Point::new(160.0, 160.0));
        editor.pointer_up(Point::new(160.0, 160.0));
        assert_eq!(editor.selection().selected(), None);
    }

    #[test]
    fn test_drag_selected_emoji_keeps_selection() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddEmojiOverlay("🙂".into()));
        let key = emoji_key(&editor, 0);
        editor.pointer_down(body(key), Point::ZERO);
        editor.pointer_up(Point::ZERO);

        editor.pointer_down(body(key), Point::new(160.0, 160.0));
        editor.pointer_move(Point::new(170.0, 180.0));
        let commits = editor.pointer_up(Point::new(170.0, 180.0));

        assert_eq!(commits.len(), 1);
        assert!(editor.selection().is_selected(key));
        assert_eq!(editor.document().emoji_overlays[0].position, Point::new(160.0, 170.0));
    }

    #[test]
    fn test_unselected_emoji_does_not_drag() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddEmojiOverlay("🙂".into()));
        let key = emoji_key(&editor, 0);
        editor.pointer_down(body(key), Point::ZERO);
        editor.pointer_move(Point::new(50.0, 50.0));
        let commits = editor.pointer_up(Point::new(50.0, 50.0));
        assert!(commits.is_empty());
        assert_eq!(editor.document().emoji_overlays[0].position, Point::new(150.0, 150.0));
        assert!(!editor.selection().is_selected(key));
    }

    #[test]
    fn test_canvas_click_clears_selection() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddGifOverlay("a.gif".into()));
        let key = OverlayKey::new(OverlayKind::Gif, editor.document().gif_overlays[0].id);
        editor.pointer_down(body(key), Point::ZERO);
        editor.pointer_up(Point::ZERO);
        assert!(editor.selection().is_selected(key));

        editor.pointer_down(PointerTarget::Canvas, Point::ZERO);
        editor.pointer_up(Point::ZERO);
        assert_eq!(editor.selection().selected(), None);
    }

    #[test]
    fn test_preview_shows_in_flight_drag() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddTextOverlay);
        let key = OverlayKey::new(OverlayKind::Text, editor.document().text_overlays[0].id);
        editor.pointer_down(body(key), Point::ZERO);
        editor.pointer_move(Point::new(5.0, 5.0));

        assert_eq!(editor.preview_document().text_overlays[0].position, Point::new(105.0, 105.0));
        assert_eq!(editor.document().text_overlays[0].position, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_removing_overlay_mid_drag_releases_capture() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddTextOverlay);
        let id = editor.document().text_overlays[0].id;
        editor.pointer_down(body(OverlayKey::new(OverlayKind::Text, id)), Point::ZERO);
        assert_eq!(editor.captures().len(), 1);

        editor.delete_text(id);
        assert!(editor.captures().is_empty());
        assert!(editor.pointer_up(Point::new(40.0, 40.0)).is_empty());
    }

    #[test]
    fn test_edit_text_uses_latest_position() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddTextOverlay);
        let id = editor.document().text_overlays[0].id;
        let key = OverlayKey::new(OverlayKind::Text, id);

        editor.pointer_down(body(key), Point::ZERO);
        editor.pointer_up(Point::new(30.0, 0.0));
        editor.edit_text(id, &TextEdit::Color("#FF0000".into())).expect("edit");
        editor.edit_text(id, &TextEdit::ToggleItalic).expect("edit");

        let text = editor.document().text(id).expect("text");
        assert_eq!(text.position, Point::new(130.0, 100.0));
        assert_eq!(text.color, "#FF0000");
        assert_eq!(text.font_style, FontStyle::Italic);
        assert_eq!(text.font_weight, FontWeight::Bold);
    }

    #[test]
    fn test_edit_missing_text_errors() {
        let mut editor = Editor::new();
        assert!(editor.edit_text(OverlayId(77), &TextEdit::FontSize(20.0)).is_err());
    }

    #[test]
    fn test_font_size_edit_ignores_nan() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddTextOverlay);
        let id = editor.document().text_overlays[0].id;
        editor.edit_text(id, &TextEdit::FontSize(f32::NAN)).expect("edit");
        assert!((editor.document().text_overlays[0].font_size - 48.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resize_through_handle() {
        let mut editor = Editor::new();
        editor.dispatch(Action::AddGifOverlay("a.gif".into()));
        let key = OverlayKey::new(OverlayKind::Gif, editor.document().gif_overlays[0].id);
        editor.pointer_down(body(key), Point::ZERO);
        editor.pointer_up(Point::ZERO);

        editor.pointer_down(
            PointerTarget::Handle {
                overlay: key,
                corner: Corner::Br,
                measured: Some(Size::new(150.0, 150.0)),
            },
            Point::new(300.0, 300.0),
        );
        editor.pointer_move(Point::new(350.0, 310.0));
        assert!(editor.live_size(key).is_some());
        editor.pointer_up(Point::new(350.0, 310.0));

        assert!((editor.document().gif_overlays[0].width - 200.0).abs() < 1e-4);
        assert!(editor.live_size(key).is_none());
    }

    #[test]
    fn test_adopted_document_without_next_id_gets_fresh_ids() {
        let mut original = Editor::new();
        original.dispatch(Action::AddEmojiOverlay("🙂".into()));
        let mut value = serde_json::to_value(original.document()).expect("serialize");
        value.as_object_mut().expect("object").remove("nextId");
        let document: Document = serde_json::from_value(value).expect("parse");

        let mut editor = Editor::with_document(document);
        editor.dispatch(Action::AddEmojiOverlay("🚀".into()));

        let ids: Vec<_> = editor.document().emoji_overlays.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![OverlayId(1), OverlayId(2)]);
        assert_eq!(editor.document().ids.peek(), OverlayId(3));
    }

    #[test]
    fn test_dispatch_json() {
        let mut editor = Editor::new();
        editor
            .dispatch_json(r#"{"type":"ADD_GIF_OVERLAY","payload":"https://media/x.gif"}"#)
            .expect("dispatch");
        assert!(editor.has_overlays());
    }
}
