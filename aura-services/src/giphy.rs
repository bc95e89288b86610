//! Giphy search client.
//!
//! Gif searches feed the background panel; sticker searches feed the
//! overlay panel. An empty sticker query shows trending stickers, an empty
//! gif query clears results without a request.

use std::sync::Arc;

use async_trait::async_trait;
use aura_core::{Action, Background};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};

/// What a search returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Animated gifs, used as backgrounds.
    Gif,
    /// Transparent stickers, used as overlays.
    Sticker,
}

impl MediaKind {
    /// Giphy path segment.
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            MediaKind::Gif => "gifs",
            MediaKind::Sticker => "stickers",
        }
    }

    /// Page size used by the panels.
    #[must_use]
    pub fn default_limit(self) -> u32 {
        match self {
            MediaKind::Gif => 12,
            MediaKind::Sticker => 24,
        }
    }

    /// Query a panel shows before the user types.
    #[must_use]
    pub fn initial_query(self) -> &'static str {
        match self {
            MediaKind::Gif => "trending gifs",
            MediaKind::Sticker => "",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            MediaKind::Gif => "Failed to fetch GIFs from Giphy.",
            MediaKind::Sticker => "Failed to fetch from Giphy.",
        }
    }
}

/// A search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search terms.
    pub query: String,
    /// Gifs or stickers.
    pub kind: MediaKind,
    /// Maximum results.
    pub limit: u32,
    /// Content rating.
    pub rating: String,
}

impl SearchRequest {
    /// Gif search with panel defaults.
    #[must_use]
    pub fn gifs(query: impl Into<String>) -> Self {
        Self::new(MediaKind::Gif, query)
    }

    /// Sticker search with panel defaults.
    #[must_use]
    pub fn stickers(query: impl Into<String>) -> Self {
        Self::new(MediaKind::Sticker, query)
    }

    /// Search of `kind` with the default limit and a `g` rating.
    #[must_use]
    pub fn new(kind: MediaKind, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            kind,
            limit: kind.default_limit(),
            rating: "g".to_string(),
        }
    }
}

/// A search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifResult {
    /// Giphy id.
    pub id: String,
    /// Small preview for the result grid.
    pub preview_url: String,
    /// URL stored in the document when selected.
    pub full_url: String,
}

impl GifResult {
    /// The transition selecting this result performs.
    #[must_use]
    pub fn selection_action(&self, kind: MediaKind) -> Action {
        match kind {
            MediaKind::Gif => Action::SetBackground(Background::Gif(self.full_url.clone())),
            MediaKind::Sticker => Action::AddGifOverlay(self.full_url.clone()),
        }
    }
}

/// Anything that can answer a [`SearchRequest`].
#[async_trait]
pub trait GifSearch: Send + Sync {
    /// Run a search.
    ///
    /// # Errors
    ///
    /// Returns an error if the search cannot be performed.
    async fn search(&self, request: &SearchRequest) -> ServiceResult<Vec<GifResult>>;
}

/// Giphy REST client.
#[derive(Clone)]
pub struct GiphyClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    base: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for GiphyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiphyClient")
            .field("base", &self.inner.base.as_str())
            .field("has_key", &self.inner.api_key.is_some())
            .finish()
    }
}

impl GiphyClient {
    /// Create a client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidUrl`] if the URL is malformed.
    /// Returns [`ServiceError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: &str, api_key: Option<String>) -> ServiceResult<Self> {
        let base = Url::parse(base_url).map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;
        let http = Client::builder()
            .user_agent(concat!("snapaura/", env!("CARGO_PKG_VERSION")))
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                base,
                api_key: api_key.filter(|key| !key.trim().is_empty()),
            }),
        })
    }

    /// Create a client from service configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured URL is invalid.
    pub fn from_config(config: &ServiceConfig) -> ServiceResult<Self> {
        Self::new(&config.giphy_base_url, config.giphy_api_key.clone())
    }

    /// URL a request would hit, or `None` when no request is needed.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingApiKey`] when no key is configured.
    pub fn endpoint(&self, request: &SearchRequest) -> ServiceResult<Option<Url>> {
        let query = request.query.trim();
        if query.is_empty() && request.kind == MediaKind::Gif {
            return Ok(None);
        }
        let api_key = self
            .inner
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingApiKey { service: "Giphy" })?;

        let mode = if query.is_empty() { "trending" } else { "search" };
        let mut url = self
            .inner
            .base
            .join(&format!("v1/{}/{mode}", request.kind.path_segment()))
            .map_err(|e| ServiceError::InvalidUrl(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", api_key);
            if !query.is_empty() {
                pairs.append_pair("q", query);
            }
            pairs
                .append_pair("limit", &request.limit.to_string())
                .append_pair("offset", "0")
                .append_pair("rating", &request.rating)
                .append_pair("lang", "en");
        }
        Ok(Some(url))
    }
}

#[async_trait]
impl GifSearch for GiphyClient {
    async fn search(&self, request: &SearchRequest) -> ServiceResult<Vec<GifResult>> {
        let Some(url) = self.endpoint(request)? else {
            return Ok(Vec::new());
        };

        tracing::debug!(kind = ?request.kind, query = %request.query, "Searching Giphy");
        let response = self.inner.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Giphy request failed");
            return Err(ServiceError::Upstream {
                status: status.as_u16(),
                message: request.kind.failure_message().to_string(),
            });
        }

        let body: GiphyResponse = response.json().await?;
        Ok(body.data.into_iter().map(GifResult::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct GiphyResponse {
    #[serde(default)]
    data: Vec<GiphyItem>,
}

#[derive(Debug, Deserialize)]
struct GiphyItem {
    id: String,
    images: GiphyImages,
}

#[derive(Debug, Deserialize)]
struct GiphyImages {
    fixed_width: Rendition,
}

#[derive(Debug, Deserialize)]
struct Rendition {
    url: String,
    #[serde(default)]
    webp: Option<String>,
}

impl From<GiphyItem> for GifResult {
    fn from(item: GiphyItem) -> Self {
        let Rendition { url, webp } = item.images.fixed_width;
        let preview_url = webp.filter(|w| !w.is_empty()).unwrap_or_else(|| url.clone());
        Self {
            id: item.id,
            preview_url,
            full_url: url,
        }
    }
}
