//! WebAssembly bindings for aura-core.
//!
//! The browser host forwards actions and pointer events as JSON and reads
//! the document back as JSON after each change.

use wasm_bindgen::prelude::*;

use crate::{search_emoji, Dispatch, Editor, OverlayId, PointerEvent, TextEdit};

/// Initialize the editor WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Editor instance for WASM.
#[wasm_bindgen]
pub struct WasmEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl WasmEditor {
    /// Create a new editor over the default document.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            editor: Editor::new(),
        }
    }

    /// Get the committed document as JSON.
    #[wasm_bindgen(js_name = getDocumentJson)]
    #[must_use]
    pub fn get_document_json(&self) -> String {
        serde_json::to_string(self.editor.document()).unwrap_or_default()
    }

    /// Get the document with in-flight drags applied, for drawing.
    #[wasm_bindgen(js_name = getPreviewJson)]
    #[must_use]
    pub fn get_preview_json(&self) -> String {
        serde_json::to_string(&self.editor.preview_document()).unwrap_or_default()
    }

    /// Dispatch an action given as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if the action payload is malformed.
    pub fn dispatch(&mut self, json: &str) -> Result<(), String> {
        self.editor.dispatch_json(json).map_err(|e| {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
            e.to_string()
        })
    }

    /// Forward a pointer event given as JSON. Returns the number of
    /// overlay updates it committed.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event cannot be parsed.
    #[wasm_bindgen(js_name = pointerEvent)]
    pub fn pointer_event(&mut self, json: &str) -> Result<usize, String> {
        let event: PointerEvent = serde_json::from_str(json).map_err(|e| e.to_string())?;
        Ok(self.editor.handle_pointer(event).len())
    }

    /// Id of the selected overlay as `"<kind>#<id>"`, if any.
    #[wasm_bindgen(js_name = selectedOverlay)]
    #[must_use]
    pub fn selected_overlay(&self) -> Option<String> {
        self.editor.selection().selected().map(|key| key.to_string())
    }

    /// Set the colour of a text overlay.
    ///
    /// # Errors
    ///
    /// Returns an error string if the overlay no longer exists.
    #[wasm_bindgen(js_name = setTextColor)]
    pub fn set_text_color(&mut self, id: u64, color: &str) -> Result<(), String> {
        self.editor
            .edit_text(OverlayId(id), &TextEdit::Color(color.to_string()))
            .map_err(|e| e.to_string())
    }

    /// Set the font size of a text overlay.
    ///
    /// # Errors
    ///
    /// Returns an error string if the overlay no longer exists.
    #[wasm_bindgen(js_name = setTextFontSize)]
    pub fn set_text_font_size(&mut self, id: u64, size: f32) -> Result<(), String> {
        self.editor
            .edit_text(OverlayId(id), &TextEdit::FontSize(size))
            .map_err(|e| e.to_string())
    }

    /// Emoji glyphs matching a search query.
    #[wasm_bindgen(js_name = searchEmoji)]
    #[must_use]
    pub fn search_emoji(&self, query: &str) -> js_sys::Array {
        search_emoji(query)
            .into_iter()
            .map(|entry| JsValue::from_str(entry.emoji))
            .collect()
    }

    /// Restore defaults, keeping the screenshot and user.
    pub fn reset(&mut self) {
        self.editor.dispatch(crate::Action::ResetState);
    }

    /// Whether the canvas holds any overlay.
    #[wasm_bindgen(js_name = hasOverlays)]
    #[must_use]
    pub fn has_overlays(&self) -> bool {
        self.editor.has_overlays()
    }
}

impl Default for WasmEditor {
    fn default() -> Self {
        Self::new()
    }
}
