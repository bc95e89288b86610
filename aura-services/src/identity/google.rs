//! Google sign-in through the hosted identity script.
//!
//! The host page loads the script asynchronously; [`GoogleSignIn::start`]
//! waits for it, then initializes it with the client id. Credentials the
//! script hands back are JWTs whose payload carries the profile.

use std::time::Duration;

use aura_core::{Action, User};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

use crate::channel::ActionSender;
use crate::error::{ServiceError, ServiceResult};

/// Client id shipped in templates; treated as unset.
pub const PLACEHOLDER_CLIENT_ID: &str = "YOUR_GOOGLE_CLIENT_ID";
/// How often script readiness is checked.
pub const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);
/// How long to wait for the script before giving up.
pub const READY_TIMEOUT: Duration = Duration::from_secs(10);

/// The identity script as seen from the editor.
pub trait IdentityScript: Send + Sync {
    /// Whether the script has loaded.
    fn is_ready(&self) -> bool;
    /// Initialize the script for `client_id`.
    fn initialize(&self, client_id: &str);
    /// Stop the script from silently signing the user back in.
    fn disable_auto_select(&self);
}

/// Whether sign-in can be offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInAvailability {
    /// Configured with a usable client id.
    Available {
        /// Client id.
        client_id: String,
    },
    /// Sign-in is disabled.
    Disabled {
        /// Why.
        reason: String,
    },
}

impl SignInAvailability {
    /// Judge a configured client id. Missing ids and the template
    /// placeholder disable sign-in.
    #[must_use]
    pub fn from_client_id(client_id: Option<&str>) -> Self {
        match client_id.map(str::trim) {
            Some(id) if !id.is_empty() && !id.contains(PLACEHOLDER_CLIENT_ID) => {
                Self::Available {
                    client_id: id.to_string(),
                }
            }
            _ => {
                let reason = "Google client id is not configured; sign-in is disabled.".to_string();
                tracing::warn!("{reason}");
                Self::Disabled { reason }
            }
        }
    }

    /// Whether sign-in can be offered.
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

#[derive(Debug, Deserialize)]
struct CredentialClaims {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    picture: String,
}

/// Decode the profile carried in a sign-in credential (a JWT).
///
/// The signature is not verified; the profile is only used for display.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidCredential`] if the token has no decodable
/// payload segment.
pub fn decode_credential(credential: &str) -> ServiceResult<User> {
    let payload = credential
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| ServiceError::InvalidCredential("missing payload segment".to_string()))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ServiceError::InvalidCredential(e.to_string()))?;
    let claims: CredentialClaims = serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::InvalidCredential(e.to_string()))?;
    Ok(User {
        name: claims.name,
        email: claims.email,
        picture: claims.picture,
    })
}

/// Poll `script` until it is ready.
///
/// # Errors
///
/// Returns [`ServiceError::Timeout`] if it is not ready within
/// [`READY_TIMEOUT`].
pub async fn wait_until_ready(script: &dyn IdentityScript) -> ServiceResult<()> {
    let poll = async {
        while !script.is_ready() {
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    };
    tokio::time::timeout(READY_TIMEOUT, poll)
        .await
        .map_err(|_| {
            tracing::error!("Google Identity Services failed to load");
            ServiceError::Timeout("Google Identity Services did not load".to_string())
        })
}

/// Google sign-in flow delivering `Login`/`Logout` transitions.
pub struct GoogleSignIn<S> {
    script: S,
    availability: SignInAvailability,
    actions: ActionSender,
}

impl<S: IdentityScript> GoogleSignIn<S> {
    /// Create the flow for a configured client id.
    pub fn new(script: S, client_id: Option<&str>, actions: ActionSender) -> Self {
        Self {
            script,
            availability: SignInAvailability::from_client_id(client_id),
            actions,
        }
    }

    /// Whether sign-in can be offered.
    #[must_use]
    pub fn availability(&self) -> &SignInAvailability {
        &self.availability
    }

    /// Wait for the script and initialize it.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unavailable`] when sign-in is disabled and
    /// [`ServiceError::Timeout`] when the script never loads. A timeout
    /// disables sign-in for the rest of the session.
    pub async fn start(&mut self) -> ServiceResult<()> {
        let client_id = match &self.availability {
            SignInAvailability::Available { client_id } => client_id.clone(),
            SignInAvailability::Disabled { reason } => {
                return Err(ServiceError::Unavailable(reason.clone()))
            }
        };
        if let Err(err) = wait_until_ready(&self.script).await {
            self.availability = SignInAvailability::Disabled {
                reason: "Google Identity Services did not load; sign-in is disabled.".to_string(),
            };
            return Err(err);
        }
        self.script.initialize(&client_id);
        tracing::info!("Google sign-in ready");
        Ok(())
    }

    /// Handle a credential returned by the script.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential cannot be decoded; no transition
    /// is sent in that case.
    pub fn handle_credential(&self, credential: &str) -> ServiceResult<User> {
        let user = decode_credential(credential)?;
        tracing::info!(email = %user.email, "Signed in");
        self.actions.send(Action::Login(user.clone()));
        Ok(user)
    }

    /// Sign out and disable automatic re-selection.
    pub fn sign_out(&self) {
        self.script.disable_auto_select();
        self.actions.send(Action::Logout);
    }
}
