//! Single-writer document store.
//!
//! [`Store`] owns the current [`Document`] and applies actions strictly
//! in the order they are dispatched. Asynchronous collaborators never
//! touch the document directly; they hand follow-up actions to whoever
//! owns the store through the [`Dispatch`] seam.
//!
//! # Example
//!
//! ```
//! use aura_core::{Action, Dispatch, Store};
//!
//! let mut store = Store::new();
//! store.dispatch(Action::AddTextOverlay);
//! store.dispatch(Action::SetPadding(32));
//!
//! assert_eq!(store.document().text_overlays.len(), 1);
//! assert_eq!(store.revision(), 2);
//! ```

use crate::action::Action;
use crate::document::Document;
use crate::error::EditorResult;
use crate::reducer::reduce;

/// Something that accepts document transitions.
pub trait Dispatch {
    /// Apply one action.
    fn dispatch(&mut self, action: Action);
}

/// Owns the document and its transition history counter.
#[derive(Debug, Clone, Default)]
pub struct Store {
    document: Document,
    revision: u64,
}

impl Store {
    /// A store holding the default document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store starting from an existing document. The id counter is moved
    /// past any overlay ids the document already holds.
    #[must_use]
    pub fn with_document(mut document: Document) -> Self {
        document.sync_ids();
        Self {
            document,
            revision: 0,
        }
    }

    /// The current document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of actions applied so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply an action and return the new document.
    pub fn apply(&mut self, action: &Action) -> &Document {
        tracing::debug!(action = action.name(), revision = self.revision, "dispatch");
        self.document = reduce(&self.document, action);
        self.revision += 1;
        &self.document
    }

    /// Parse an action from JSON and apply it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed. The document is left
    /// untouched in that case.
    pub fn dispatch_json(&mut self, json: &str) -> EditorResult<&Document> {
        let action = Action::from_json(json).map_err(|err| {
            tracing::warn!(error = %err, "rejected action payload");
            err
        })?;
        Ok(self.apply(&action))
    }

    /// Serialize the current document as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(&self.document)?)
    }
}

impl Dispatch for Store {
    fn dispatch(&mut self, action: Action) {
        self.apply(&action);
    }
}
