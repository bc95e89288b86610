//! Service configuration.

/// Default Giphy API origin.
pub const GIPHY_BASE_URL: &str = "https://api.giphy.com";
/// Default Identity Toolkit API origin.
pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";

/// Keys and endpoints for the external services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Giphy API key (`GIPHY_API_KEY`).
    pub giphy_api_key: Option<String>,
    /// Giphy API origin.
    pub giphy_base_url: String,
    /// Google sign-in client id (`GOOGLE_CLIENT_ID`).
    pub google_client_id: Option<String>,
    /// Hosted auth API key (`SNAPAURA_AUTH_API_KEY`).
    pub auth_api_key: Option<String>,
    /// Hosted auth API origin.
    pub auth_base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            giphy_api_key: None,
            giphy_base_url: GIPHY_BASE_URL.to_string(),
            google_client_id: None,
            auth_api_key: None,
            auth_base_url: IDENTITY_TOOLKIT_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            giphy_api_key: get("GIPHY_API_KEY"),
            giphy_base_url: get("SNAPAURA_GIPHY_URL").unwrap_or(defaults.giphy_base_url),
            google_client_id: get("GOOGLE_CLIENT_ID"),
            auth_api_key: get("SNAPAURA_AUTH_API_KEY"),
            auth_base_url: get("SNAPAURA_AUTH_URL").unwrap_or(defaults.auth_base_url),
        }
    }
}
