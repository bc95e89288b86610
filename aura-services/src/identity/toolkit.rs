//! Hosted email/password and Google account backend.
//!
//! [`IdentityToolkitClient`] speaks the Identity Toolkit REST surface
//! (`v1/accounts:*`), the API behind hosted auth providers.

use std::sync::Arc;

use async_trait::async_trait;
use aura_core::User;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    /// Provider user id.
    pub uid: String,
    /// Account email.
    pub email: String,
    /// Display name, if set.
    pub display_name: Option<String>,
    /// Avatar URL, if set.
    pub photo_url: Option<String>,
    /// Whether the email address is verified.
    pub email_verified: bool,
    /// Current id token.
    pub id_token: String,
    /// Refresh token, if issued.
    pub refresh_token: Option<String>,
}

impl AuthUser {
    /// Profile stored in the document on login.
    #[must_use]
    pub fn profile(&self) -> User {
        User {
            name: self
                .display_name
                .clone()
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| self.email.clone()),
            email: self.email.clone(),
            picture: self.photo_url.clone().unwrap_or_default(),
        }
    }
}

/// Account operations of a hosted auth provider.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    async fn sign_up(&self, email: &str, password: &str) -> ServiceResult<AuthUser>;

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected.
    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<AuthUser>;

    /// Sign in with a Google id token.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the token.
    async fn sign_in_with_google(&self, google_id_token: &str) -> ServiceResult<AuthUser>;

    /// End the provider session. Tokens are stateless, so the default does
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    async fn sign_out(&self, _user: &AuthUser) -> ServiceResult<()> {
        Ok(())
    }

    /// Email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    async fn send_password_reset(&self, email: &str) -> ServiceResult<()>;

    /// Email a verification link to the signed-in account.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    async fn send_email_verification(&self, id_token: &str) -> ServiceResult<()>;

    /// Change the signed-in account's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    async fn update_password(&self, id_token: &str, new_password: &str)
        -> ServiceResult<AuthUser>;

    /// Resolve a stored id token back to its account.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is no longer valid.
    async fn lookup(&self, id_token: &str) -> ServiceResult<AuthUser>;
}

/// Identity Toolkit REST client.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    base: Url,
    api_key: String,
}

impl std::fmt::Debug for IdentityToolkitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityToolkitClient")
            .field("base", &self.inner.base.as_str())
            .finish_non_exhaustive()
    }
}

impl IdentityToolkitClient {
    /// Create a client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingApiKey`] for an empty key,
    /// [`ServiceError::InvalidUrl`] if the URL is malformed and
    /// [`ServiceError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: &str, api_key: &str) -> ServiceResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ServiceError::MissingApiKey { service: "Auth" });
        }
        let mut base =
            Url::parse(base_url).map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .user_agent(concat!("snapaura/", env!("CARGO_PKG_VERSION")))
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                base,
                api_key: api_key.to_string(),
            }),
        })
    }

    /// Create a client from service configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingApiKey`] when no auth key is configured.
    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        let key = config
            .auth_api_key
            .as_deref()
            .ok_or(ServiceError::MissingApiKey { service: "Auth" })?;
        Self::new(&config.auth_base_url, key)
    }

    fn endpoint(&self, method: &str) -> ServiceResult<Url> {
        let mut url = self
            .inner
            .base
            .join(&format!("v1/accounts:{method}"))
            .map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut().append_pair("key", &self.inner.api_key);
        Ok(url)
    }

    async fn post(&self, method: &str, body: &Value) -> ServiceResult<AccountResponse> {
        let response = self
            .inner
            .http
            .post(self.endpoint(method)?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let envelope: ErrorEnvelope = response.json().await.unwrap_or_default();
            let code = envelope.error.message;
            tracing::warn!(method, status = status.as_u16(), %code, "Auth request rejected");
            return Err(ServiceError::Auth {
                message: friendly_message(&code),
                code,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl AuthBackend for IdentityToolkitClient {
    async fn sign_up(&self, email: &str, password: &str) -> ServiceResult<AuthUser> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        self.post("signUp", &body).await?.into_user(None)
    }

    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<AuthUser> {
        let body = json!({ "email": email, "password": password, "returnSecureToken": true });
        self.post("signInWithPassword", &body).await?.into_user(None)
    }

    async fn sign_in_with_google(&self, google_id_token: &str) -> ServiceResult<AuthUser> {
        let post_body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("id_token", google_id_token)
            .append_pair("providerId", "google.com")
            .finish();
        let body = json!({
            "postBody": post_body,
            "requestUri": "http://localhost",
            "returnIdpCredential": true,
            "returnSecureToken": true
        });
        self.post("signInWithIdp", &body).await?.into_user(None)
    }

    async fn send_password_reset(&self, email: &str) -> ServiceResult<()> {
        let body = json!({ "requestType": "PASSWORD_RESET", "email": email });
        self.post("sendOobCode", &body).await?;
        Ok(())
    }

    async fn send_email_verification(&self, id_token: &str) -> ServiceResult<()> {
        let body = json!({ "requestType": "VERIFY_EMAIL", "idToken": id_token });
        self.post("sendOobCode", &body).await?;
        Ok(())
    }

    async fn update_password(
        &self,
        id_token: &str,
        new_password: &str,
    ) -> ServiceResult<AuthUser> {
        let body = json!({
            "idToken": id_token,
            "password": new_password,
            "returnSecureToken": true
        });
        self.post("update", &body).await?.into_user(Some(id_token))
    }

    async fn lookup(&self, id_token: &str) -> ServiceResult<AuthUser> {
        let body = json!({ "idToken": id_token });
        let response = self.post("lookup", &body).await?;
        let account = response.users.into_iter().next().ok_or_else(|| ServiceError::Auth {
            code: "USER_NOT_FOUND".to_string(),
            message: friendly_message("USER_NOT_FOUND"),
        })?;
        account.into_user(Some(id_token))
    }
}

/// Map provider error codes (`EMAIL_EXISTS`, `WEAK_PASSWORD : ...`) to text
/// shown to the user.
fn friendly_message(code: &str) -> String {
    let head = code.split(" : ").next().unwrap_or(code).trim();
    let message = match head {
        "EMAIL_EXISTS" => "An account with this email already exists.",
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password."
        }
        "USER_DISABLED" => "This account has been disabled.",
        "USER_NOT_FOUND" | "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" => {
            "Your session has expired. Please sign in again."
        }
        "WEAK_PASSWORD" => "Password should be at least 6 characters.",
        "INVALID_EMAIL" => "Please enter a valid email address.",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Please try again later.",
        "" => "Authentication failed.",
        other => other,
    };
    message.to_string()
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct AccountResponse {
    local_id: String,
    email: String,
    display_name: Option<String>,
    photo_url: Option<String>,
    email_verified: bool,
    id_token: Option<String>,
    refresh_token: Option<String>,
    users: Vec<AccountResponse>,
}

impl AccountResponse {
    fn into_user(self, fallback_token: Option<&str>) -> ServiceResult<AuthUser> {
        let id_token = self
            .id_token
            .filter(|token| !token.is_empty())
            .or_else(|| fallback_token.map(ToString::to_string))
            .ok_or_else(|| ServiceError::Auth {
                code: "MISSING_ID_TOKEN".to_string(),
                message: "Authentication failed.".to_string(),
            })?;
        Ok(AuthUser {
            uid: self.local_id,
            email: self.email,
            display_name: self.display_name,
            photo_url: self.photo_url,
            email_verified: self.email_verified,
            id_token,
            refresh_token: self.refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> IdentityToolkitClient {
        IdentityToolkitClient::new(&server.uri(), "auth-key").expect("client")
    }

    #[test]
    fn test_friendly_messages() {
        assert_eq!(
            friendly_message("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password should be at least 6 characters."
        );
        assert_eq!(
            friendly_message("INVALID_LOGIN_CREDENTIALS"),
            "Invalid email or password."
        );
        assert_eq!(friendly_message("SOMETHING_NEW"), "SOMETHING_NEW");
    }

    #[test]
    fn test_profile_falls_back_to_email() {
        let user = AuthUser {
            uid: "u1".into(),
            email: "ada@example.com".into(),
            display_name: None,
            photo_url: None,
            email_verified: false,
            id_token: "t".into(),
            refresh_token: None,
        };
        let profile = user.profile();
        assert_eq!(profile.name, "ada@example.com");
        assert_eq!(profile.picture, "");
    }

    #[test]
    fn test_empty_key_rejected() {
        let err = IdentityToolkitClient::new("https://identitytoolkit.googleapis.com", " ")
            .expect_err("missing key");
        assert!(matches!(err, ServiceError::MissingApiKey { .. }));
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn sign_in_returns_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithPassword"))
            .and(query_param("key", "auth-key"))
            .and(body_partial_json(json!({ "email": "ada@example.com" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "u1",
                "email": "ada@example.com",
                "displayName": "Ada",
                "idToken": "id-1",
                "refreshToken": "r-1",
                "registered": true
            })))
            .mount(&server)
            .await;

        let user = client(&server)
            .sign_in("ada@example.com", "hunter22")
            .await
            .expect("user");
        assert_eq!(user.uid, "u1");
        assert_eq!(user.id_token, "id-1");
        assert_eq!(user.profile().name, "Ada");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn sign_up_conflict_maps_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signUp"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "EMAIL_EXISTS" }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .sign_up("ada@example.com", "hunter22")
            .await
            .expect_err("conflict");
        match err {
            ServiceError::Auth { code, message } => {
                assert_eq!(code, "EMAIL_EXISTS");
                assert_eq!(message, "An account with this email already exists.");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn oob_requests_carry_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:sendOobCode"))
            .and(body_partial_json(json!({ "requestType": "PASSWORD_RESET" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "ada@example.com" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:sendOobCode"))
            .and(body_partial_json(json!({ "requestType": "VERIFY_EMAIL", "idToken": "id-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "email": "ada@example.com" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        client
            .send_password_reset("ada@example.com")
            .await
            .expect("reset");
        client.send_email_verification("id-1").await.expect("verify");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn lookup_resolves_stored_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:lookup"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{
                    "localId": "u1",
                    "email": "ada@example.com",
                    "photoUrl": "https://example.com/ada.png",
                    "emailVerified": true
                }]
            })))
            .mount(&server)
            .await;

        let user = client(&server).lookup("stored").await.expect("user");
        assert_eq!(user.id_token, "stored");
        assert!(user.email_verified);
        assert_eq!(user.profile().picture, "https://example.com/ada.png");
    }

    #[tokio::test]
    #[cfg_attr(
        target_os = "macos",
        ignore = "wiremock/reqwest system-configuration issue on macOS"
    )]
    async fn google_sign_in_posts_idp_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/accounts:signInWithIdp"))
            .and(body_partial_json(json!({
                "postBody": "id_token=google-jwt&providerId=google.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "g1",
                "email": "ada@gmail.com",
                "idToken": "id-g"
            })))
            .mount(&server)
            .await;

        let user = client(&server)
            .sign_in_with_google("google-jwt")
            .await
            .expect("user");
        assert_eq!(user.uid, "g1");
    }
}
