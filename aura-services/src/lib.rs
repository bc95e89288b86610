//! # SnapAura Services
//!
//! Async collaborators of the editor. None of them touch the document
//! directly: results come back as [`aura_core::Action`]s over an
//! [`ActionSender`] and are applied by whoever owns the store.
//!
//! ```text
//! ┌──────────────┐  query   ┌──────────────┐  HTTP  ┌────────┐
//! │ SearchDriver │────────▶│ GifSearch    │──────▶│ Giphy  │
//! └──────┬───────┘          └──────────────┘        └────────┘
//!        │ PanelState (watch)
//!        ▼
//! ┌──────────────┐  Action  ┌──────────────┐
//! │ UI / CLI     │────────▶│ Store        │◀──── ActionReceiver
//! └──────────────┘          └──────────────┘          ▲
//!                                                     │ Login / Logout
//!                                    GoogleSignIn, AuthSession
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod channel;
pub mod config;
pub mod error;
pub mod giphy;
pub mod identity;
pub mod search;

pub use channel::{action_channel, ActionReceiver, ActionSender};
pub use config::ServiceConfig;
pub use error::{ServiceError, ServiceResult};
pub use giphy::{GifResult, GifSearch, GiphyClient, MediaKind, SearchRequest};
pub use identity::{
    AuthBackend, AuthSession, AuthState, AuthUser, FileTokenStore, GoogleSignIn,
    IdentityScript, IdentityToolkitClient, MemoryTokenStore, SignInAvailability, TokenStore,
};
pub use search::{PanelState, SearchDriver, SEARCH_DEBOUNCE};
