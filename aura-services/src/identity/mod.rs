//! Sign-in flows.
//!
//! Two interchangeable variants feed the same `Login`/`Logout` transitions:
//! [`google`] drives the hosted Google identity script, [`session`] runs an
//! email/password session against an [`AuthBackend`].

pub mod google;
pub mod session;
pub mod token;
pub mod toolkit;

pub use google::{decode_credential, GoogleSignIn, IdentityScript, SignInAvailability};
pub use session::{AuthSession, AuthState};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
pub use toolkit::{AuthBackend, AuthUser, IdentityToolkitClient};
