//! # SnapAura CLI
//!
//! Headless front end for the SnapAura editor.
//!
//! ## Usage
//!
//! ```bash
//! snapaura render shot.png --gradient Sunset --frame macos-dark --text "Release 2.0"
//! snapaura search "party parrot" --stickers
//! snapaura emoji party
//! snapaura account sign-in ada@example.com
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap, keys fall back to env
//! - `RenderConfig` - Styling for one headless render, built from `RenderArgs`
//! - `build_document` - Drives a `Store` with the same actions the editor UI emits
//! - `render` - Composes the document and exports it through a `Rasterizer`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use aura_core::presets::{frame_by_kind, gradient_by_name, shadow_by_name, text_shadow_by_name};
use aura_core::{search_emoji, Action, Background, Document, Point, Size, Store};
use aura_renderer::intake;
use aura_renderer::{
    compose, ExportOptions, ExportedImage, Exporter, FileDownload, MediaSizes, PresentationTree,
    Rasterizer,
};
use aura_services::identity::{decode_credential, SignInAvailability};
use aura_services::{
    action_channel, AuthSession, FileTokenStore, GifResult, GifSearch, GiphyClient,
    IdentityToolkitClient, MediaKind, SearchRequest, ServiceConfig,
};
use clap::{Args, Parser, Subcommand};

/// Vertical distance between stacked text overlays.
const TEXT_SPACING: f32 = 60.0;
/// Horizontal distance between emoji and sticker overlays.
const OVERLAY_SPACING: f32 = 90.0;

/// Command-line arguments for snapaura.
#[derive(Debug, Clone, Parser)]
#[command(name = "snapaura")]
#[command(about = "Style screenshots and export them as PNG")]
#[command(version)]
pub struct CliArgs {
    /// Giphy API key for gif and sticker search
    #[arg(long, env = "GIPHY_API_KEY", global = true, hide_env_values = true)]
    pub giphy_api_key: Option<String>,

    /// Google OAuth client id for Google sign-in
    #[arg(long, env = "GOOGLE_CLIENT_ID", global = true)]
    pub google_client_id: Option<String>,

    /// API key of the hosted auth backend
    #[arg(long, env = "SNAPAURA_AUTH_API_KEY", global = true, hide_env_values = true)]
    pub auth_api_key: Option<String>,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// Service configuration: flags override the environment defaults.
    #[must_use]
    pub fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::from_env();
        if let Some(key) = &self.giphy_api_key {
            config.giphy_api_key = Some(key.clone());
        }
        if let Some(id) = &self.google_client_id {
            config.google_client_id = Some(id.clone());
        }
        if let Some(key) = &self.auth_api_key {
            config.auth_api_key = Some(key.clone());
        }
        config
    }
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Style a screenshot and export it as PNG
    Render(RenderArgs),
    /// Search Giphy for gifs or stickers
    Search(SearchArgs),
    /// Search the built-in emoji catalog
    Emoji {
        /// Glyph, name or keyword; lists everything when omitted
        query: Option<String>,
    },
    /// List the named styling presets
    Presets,
    /// Manage the signed-in account
    Account(AccountArgs),
}

/// Arguments of `snapaura render`.
#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// Screenshot to style; a placeholder is drawn when omitted
    pub screenshot: Option<PathBuf>,

    /// Directory the PNG is written to
    #[arg(long, short, env = "SNAPAURA_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Gradient preset by name
    #[arg(long, conflicts_with_all = ["color", "background_image"])]
    pub gradient: Option<String>,

    /// Solid CSS background colour
    #[arg(long, conflicts_with = "background_image")]
    pub color: Option<String>,

    /// Background image file
    #[arg(long)]
    pub background_image: Option<PathBuf>,

    /// Padding around the screenshot in pixels (0-200)
    #[arg(long, default_value_t = 64)]
    pub padding: i64,

    /// Corner radius in pixels (0-100)
    #[arg(long, default_value_t = 12)]
    pub radius: i64,

    /// Drop shadow preset by name
    #[arg(long, default_value = "Medium")]
    pub shadow: String,

    /// Browser frame kind, e.g. macos-dark
    #[arg(long, default_value = "none")]
    pub frame: String,

    /// Text overlay; repeat for several lines
    #[arg(long = "text")]
    pub texts: Vec<String>,

    /// CSS colour of the text overlays
    #[arg(long)]
    pub text_color: Option<String>,

    /// Text shadow preset by name
    #[arg(long)]
    pub text_shadow: Option<String>,

    /// Emoji overlay by glyph or name; repeatable
    #[arg(long = "emoji")]
    pub emojis: Vec<String>,

    /// Sticker image file placed as a gif overlay; repeatable
    #[arg(long = "sticker")]
    pub stickers: Vec<PathBuf>,

    /// Output scale factor
    #[arg(long, default_value_t = 2.0)]
    pub scale: f32,

    /// Fill uncovered pixels with white instead of leaving them transparent
    #[arg(long)]
    pub opaque: bool,
}

/// Where the background comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundChoice {
    /// Keep the document default.
    Default,
    /// Named gradient preset.
    Gradient(String),
    /// Solid CSS colour.
    Color(String),
    /// Image file.
    Image(PathBuf),
}

/// Styling for one headless render.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Screenshot file.
    pub screenshot: Option<PathBuf>,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Background source.
    pub background: BackgroundChoice,
    /// Padding in pixels.
    pub padding: i64,
    /// Corner radius in pixels.
    pub corner_radius: i64,
    /// Shadow preset name.
    pub shadow: String,
    /// Frame kind.
    pub frame: String,
    /// Text overlay contents.
    pub texts: Vec<String>,
    /// Text colour override.
    pub text_color: Option<String>,
    /// Text shadow preset name.
    pub text_shadow: Option<String>,
    /// Emoji glyphs or names.
    pub emojis: Vec<String>,
    /// Sticker files.
    pub stickers: Vec<PathBuf>,
    /// Export options.
    pub export: ExportOptions,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screenshot: None,
            output_dir: PathBuf::from("."),
            background: BackgroundChoice::Default,
            padding: 64,
            corner_radius: 12,
            shadow: "Medium".to_string(),
            frame: "none".to_string(),
            texts: Vec::new(),
            text_color: None,
            text_shadow: None,
            emojis: Vec::new(),
            stickers: Vec::new(),
            export: ExportOptions::default(),
        }
    }
}

impl From<RenderArgs> for RenderConfig {
    fn from(args: RenderArgs) -> Self {
        let background = if let Some(name) = args.gradient {
            BackgroundChoice::Gradient(name)
        } else if let Some(color) = args.color {
            BackgroundChoice::Color(color)
        } else if let Some(path) = args.background_image {
            BackgroundChoice::Image(path)
        } else {
            BackgroundChoice::Default
        };

        Self {
            screenshot: args.screenshot,
            output_dir: args.output_dir,
            background,
            padding: args.padding,
            corner_radius: args.radius,
            shadow: args.shadow,
            frame: args.frame,
            texts: args.texts,
            text_color: args.text_color,
            text_shadow: args.text_shadow,
            emojis: args.emojis,
            stickers: args.stickers,
            export: ExportOptions {
                scale: args.scale,
                transparent: !args.opaque,
                ..ExportOptions::default()
            },
        }
    }
}

/// Build the document described by `config`, along with the intrinsic
/// sizes of any stickers.
///
/// # Errors
///
/// Returns an error if a file cannot be loaded or a preset name is unknown.
#[allow(clippy::cast_precision_loss)]
pub fn build_document(config: &RenderConfig) -> anyhow::Result<(Document, MediaSizes)> {
    let mut store = Store::new();
    let mut media = MediaSizes::new();

    if let Some(path) = &config.screenshot {
        let actions = intake::load_file(path)
            .with_context(|| format!("failed to load screenshot {}", path.display()))?;
        for action in &actions {
            store.apply(action);
        }
    }

    match &config.background {
        BackgroundChoice::Default => {}
        BackgroundChoice::Gradient(name) => {
            store.apply(&Action::SetBackground(Background::Gradient(gradient_by_name(
                name,
            )?)));
        }
        BackgroundChoice::Color(color) => {
            store.apply(&Action::SetBackground(Background::Color(color.clone())));
        }
        BackgroundChoice::Image(path) => {
            let (uri, _) = load(path)?;
            store.apply(&Action::SetBackground(Background::Image(uri)));
        }
    }

    store.apply(&Action::SetPadding(config.padding));
    store.apply(&Action::SetCornerRadius(config.corner_radius));
    store.apply(&Action::SetShadow(shadow_by_name(&config.shadow)?.to_string()));
    store.apply(&Action::SetFrame(frame_by_kind(&config.frame)?));

    let text_shadow = config
        .text_shadow
        .as_deref()
        .map(text_shadow_by_name)
        .transpose()?;
    for (index, content) in config.texts.iter().enumerate() {
        store.apply(&Action::AddTextOverlay);
        let mut overlay = store
            .document()
            .text_overlays
            .last()
            .cloned()
            .ok_or_else(|| anyhow!("text overlay was not added"))?;
        overlay.text.clone_from(content);
        overlay.position.y += TEXT_SPACING * index as f32;
        if let Some(color) = &config.text_color {
            overlay.color.clone_from(color);
        }
        if let Some(shadow) = text_shadow {
            overlay.text_shadow = shadow.to_string();
        }
        store.apply(&Action::UpdateTextOverlay(overlay));
    }

    for (index, query) in config.emojis.iter().enumerate() {
        store.apply(&Action::AddEmojiOverlay(resolve_emoji(query)?));
        let mut overlay = store
            .document()
            .emoji_overlays
            .last()
            .cloned()
            .ok_or_else(|| anyhow!("emoji overlay was not added"))?;
        overlay.position.x += OVERLAY_SPACING * index as f32;
        store.apply(&Action::UpdateEmojiOverlay(overlay));
    }

    for (index, path) in config.stickers.iter().enumerate() {
        let (uri, dimensions) = load(path)?;
        media.insert(
            uri.clone(),
            Size::new(dimensions.width as f32, dimensions.height as f32),
        );
        store.apply(&Action::AddGifOverlay(uri));
        let mut overlay = store
            .document()
            .gif_overlays
            .last()
            .cloned()
            .ok_or_else(|| anyhow!("sticker overlay was not added"))?;
        overlay.position = Point::new(
            overlay.position.x + OVERLAY_SPACING * index as f32,
            overlay.position.y + OVERLAY_SPACING,
        );
        store.apply(&Action::UpdateGifOverlay(overlay));
    }

    tracing::debug!(revision = store.revision(), "Document built");
    Ok((store.document().clone(), media))
}

fn load(path: &Path) -> anyhow::Result<(String, aura_core::ImageDimensions)> {
    intake::load_media(path).with_context(|| format!("failed to load {}", path.display()))
}

/// Map an emoji argument to a glyph: glyphs pass through, words are looked
/// up in the catalog.
///
/// # Errors
///
/// Returns an error if a word matches nothing in the catalog.
pub fn resolve_emoji(query: &str) -> anyhow::Result<String> {
    if !query.chars().any(char::is_alphabetic) {
        return Ok(query.to_string());
    }
    search_emoji(query)
        .first()
        .map(|entry| entry.emoji.to_string())
        .ok_or_else(|| anyhow!("no emoji matches \"{query}\""))
}

/// Render `config` to a PNG in its output directory.
///
/// Returns the exported image, or `None` if nothing was mounted.
///
/// # Errors
///
/// Returns an error if the document cannot be built or export fails.
pub fn render(
    config: &RenderConfig,
    rasterizer: &dyn Rasterizer,
) -> anyhow::Result<Option<ExportedImage>> {
    let (document, media) = build_document(config)?;

    let mut tree = PresentationTree::new();
    tree.mount(compose(&document, &media));

    let mut sink = FileDownload::new(&config.output_dir);
    let exported = Exporter::new(config.export.clone())
        .export(&mut tree, rasterizer, &mut sink)
        .context("export failed")?;
    Ok(exported)
}

/// Arguments of `snapaura search`.
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Search terms; trending results when omitted
    pub query: Option<String>,

    /// Search stickers instead of gifs
    #[arg(long)]
    pub stickers: bool,

    /// Maximum number of results
    #[arg(long)]
    pub limit: Option<u32>,
}

/// Run a one-shot Giphy search.
///
/// # Errors
///
/// Returns an error if the key is missing or the request fails.
pub async fn search(config: &ServiceConfig, args: &SearchArgs) -> anyhow::Result<Vec<GifResult>> {
    let kind = if args.stickers {
        MediaKind::Sticker
    } else {
        MediaKind::Gif
    };
    let query = args
        .query
        .clone()
        .unwrap_or_else(|| kind.initial_query().to_string());
    let mut request = SearchRequest::new(kind, query);
    if let Some(limit) = args.limit {
        request.limit = limit;
    }

    let client = GiphyClient::from_config(config)?;
    Ok(client.search(&request).await?)
}

/// Arguments of `snapaura account`.
#[derive(Debug, Clone, Args)]
pub struct AccountArgs {
    /// File the session token is kept in
    #[arg(long, env = "SNAPAURA_SESSION_FILE", default_value = ".snapaura/session.json")]
    pub session_file: PathBuf,

    /// Account password
    #[arg(long, env = "SNAPAURA_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Account operation
    #[command(subcommand)]
    pub command: AccountCommand,
}

/// Account operations.
#[derive(Debug, Clone, Subcommand)]
pub enum AccountCommand {
    /// Show the stored session and which sign-in methods are available
    Status,
    /// Create an account
    SignUp {
        /// Account email
        email: String,
    },
    /// Sign in with email and password
    SignIn {
        /// Account email
        email: String,
    },
    /// Sign in with a Google credential (JWT)
    SignInGoogle {
        /// Credential returned by Google
        credential: String,
    },
    /// Sign out and forget the stored session
    SignOut,
    /// Email a password reset link
    ResetPassword {
        /// Account email
        email: String,
    },
    /// Email a verification link to the signed-in account
    VerifyEmail,
    /// Change the password of the signed-in account to `--password`
    UpdatePassword,
}

/// Run an account operation. Returns the line to print.
///
/// # Errors
///
/// Returns an error if the backend is not configured, a password is
/// required but missing, or the provider rejects the request.
pub async fn account(config: &ServiceConfig, args: AccountArgs) -> anyhow::Result<String> {
    let google = SignInAvailability::from_client_id(config.google_client_id.as_deref());
    let backend = IdentityToolkitClient::from_config(config)?;
    let (tx, mut rx) = action_channel();
    let mut session = AuthSession::new(backend, FileTokenStore::new(&args.session_file), tx);
    session.restore().await?;

    let password = || {
        args.password
            .clone()
            .ok_or_else(|| anyhow!("a password is required (--password or SNAPAURA_PASSWORD)"))
    };

    let message = match args.command {
        AccountCommand::Status => {
            let google = if google.is_available() {
                "available"
            } else {
                "disabled"
            };
            match session.current_user() {
                Some(user) => format!("Signed in as {} (Google sign-in {google})", user.email),
                None => format!("Signed out (Google sign-in {google})"),
            }
        }
        AccountCommand::SignUp { email } => {
            let user = session.sign_up(&email, &password()?).await?;
            format!("Created account {}", user.email)
        }
        AccountCommand::SignIn { email } => {
            session.sign_in(&email, &password()?).await?;
            String::new()
        }
        AccountCommand::SignInGoogle { credential } => {
            if !google.is_available() {
                return Err(anyhow!("Google sign-in is disabled: set GOOGLE_CLIENT_ID"));
            }
            let profile = decode_credential(&credential)?;
            tracing::debug!(email = %profile.email, "Decoded Google credential");
            session.sign_in_with_google(&credential).await?;
            String::new()
        }
        AccountCommand::SignOut => {
            session.sign_out().await?;
            String::new()
        }
        AccountCommand::ResetPassword { email } => {
            session.reset_password(&email).await?;
            format!("Password reset email sent to {email}")
        }
        AccountCommand::VerifyEmail => {
            session.verify_email().await?;
            "Verification email sent".to_string()
        }
        AccountCommand::UpdatePassword => {
            session.update_password(&password()?).await?;
            "Password updated".to_string()
        }
    };

    if !message.is_empty() {
        return Ok(message);
    }

    // Sign-in and sign-out report through the same transitions the editor sees.
    let mut store = Store::new();
    rx.drain_into(&mut store);
    Ok(match &store.document().user {
        Some(user) => format!("Signed in as {} <{}>", user.name, user.email),
        None => "Signed out".to_string(),
    })
}
