//! Email/password session on top of an [`AuthBackend`].
//!
//! A successful sign-in stores the id token under [`TOKEN_KEY`] and sends a
//! `Login` transition; sign-out removes it and sends `Logout`. Every
//! operation toggles `loading` around the request and records the failure
//! message in `error`.

use std::future::Future;

use aura_core::Action;

use crate::channel::ActionSender;
use crate::error::ServiceResult;
use crate::identity::token::{TokenStore, TOKEN_KEY};
use crate::identity::toolkit::{AuthBackend, AuthUser};

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Signed-in account.
    pub current_user: Option<AuthUser>,
    /// An operation is in flight.
    pub loading: bool,
    /// Message of the last failed operation.
    pub error: Option<String>,
}

/// Authentication session.
pub struct AuthSession<B, S> {
    backend: B,
    store: S,
    actions: ActionSender,
    state: AuthState,
}

impl<B, S> std::fmt::Debug for AuthSession<B, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<B: AuthBackend, S: TokenStore> AuthSession<B, S> {
    /// Create a signed-out session.
    pub fn new(backend: B, store: S, actions: ActionSender) -> Self {
        Self {
            backend,
            store,
            actions,
            state: AuthState::default(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Signed-in account, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<&AuthUser> {
        self.state.current_user.as_ref()
    }

    /// Resume a session from a stored token.
    ///
    /// A token the backend no longer accepts is discarded and the session
    /// stays signed out.
    ///
    /// # Errors
    ///
    /// Returns an error only if the token store cannot be read or cleared.
    pub async fn restore(&mut self) -> ServiceResult<Option<AuthUser>> {
        let Some(token) = self.store.load(TOKEN_KEY)? else {
            return Ok(None);
        };
        self.state.loading = true;
        let outcome = self.backend.lookup(&token).await;
        self.state.loading = false;
        match outcome {
            Ok(user) => {
                tracing::info!(email = %user.email, "Session restored");
                self.established(user.clone())?;
                Ok(Some(user))
            }
            Err(err) => {
                tracing::warn!(error = %err, "Stored session rejected");
                self.store.remove(TOKEN_KEY)?;
                Ok(None)
            }
        }
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the message is also kept in the state.
    pub async fn sign_up(&mut self, email: &str, password: &str) -> ServiceResult<AuthUser> {
        let user = track(&mut self.state, self.backend.sign_up(email, password)).await?;
        self.established(user.clone())?;
        Ok(user)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the message is also kept in the state.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> ServiceResult<AuthUser> {
        let user = track(&mut self.state, self.backend.sign_in(email, password)).await?;
        self.established(user.clone())?;
        Ok(user)
    }

    /// Sign in with a Google id token.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the message is also kept in the state.
    pub async fn sign_in_with_google(&mut self, google_id_token: &str) -> ServiceResult<AuthUser> {
        let user = track(
            &mut self.state,
            self.backend.sign_in_with_google(google_id_token),
        )
        .await?;
        self.established(user.clone())?;
        Ok(user)
    }

    /// Sign out. Signing out while signed out is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the backend error or a token store failure.
    pub async fn sign_out(&mut self) -> ServiceResult<()> {
        let Some(user) = self.state.current_user.clone() else {
            return Ok(());
        };
        track(&mut self.state, self.backend.sign_out(&user)).await?;
        self.store.remove(TOKEN_KEY)?;
        self.state.current_user = None;
        self.actions.send(Action::Logout);
        tracing::info!("Signed out");
        Ok(())
    }

    /// Email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the message is also kept in the state.
    pub async fn reset_password(&mut self, email: &str) -> ServiceResult<()> {
        track(&mut self.state, self.backend.send_password_reset(email)).await
    }

    /// Email a verification link to the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ServiceError::Unavailable`] when signed out, or the
    /// backend error.
    pub async fn verify_email(&mut self) -> ServiceResult<()> {
        let token = self.signed_in_token()?;
        track(&mut self.state, self.backend.send_email_verification(&token)).await
    }

    /// Change the signed-in account's password.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ServiceError::Unavailable`] when signed out, or the
    /// backend error.
    pub async fn update_password(&mut self, new_password: &str) -> ServiceResult<()> {
        let token = self.signed_in_token()?;
        let user = track(
            &mut self.state,
            self.backend.update_password(&token, new_password),
        )
        .await?;
        self.established(user)
    }

    fn signed_in_token(&self) -> ServiceResult<String> {
        self.state
            .current_user
            .as_ref()
            .map(|user| user.id_token.clone())
            .ok_or_else(|| crate::ServiceError::Unavailable("Not signed in.".to_string()))
    }

    fn established(&mut self, user: AuthUser) -> ServiceResult<()> {
        self.store.save(TOKEN_KEY, &user.id_token)?;
        self.actions.send(Action::Login(user.profile()));
        self.state.current_user = Some(user);
        Ok(())
    }
}

async fn track<T>(
    state: &mut AuthState,
    operation: impl Future<Output = ServiceResult<T>>,
) -> ServiceResult<T> {
    state.loading = true;
    state.error = None;
    let outcome = operation.await;
    state.loading = false;
    if let Err(err) = &outcome {
        tracing::warn!(error = %err, "Auth operation failed");
        state.error = Some(err.to_string());
    }
    outcome
}
