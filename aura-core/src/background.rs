//! Canvas backgrounds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A two-stop linear gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    /// Start colour.
    pub start: String,
    /// End colour.
    pub end: String,
    /// Angle in degrees, CSS convention (0 = to top, 90 = to right).
    pub angle: f32,
}

impl Gradient {
    /// Create a gradient.
    #[must_use]
    pub fn new(start: impl Into<String>, end: impl Into<String>, angle: f32) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            angle,
        }
    }

    /// CSS `linear-gradient(...)` expression.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("linear-gradient({}deg, {}, {})", self.angle, self.start, self.end)
    }
}

/// What sits behind the screenshot. One variant per kind, each with only
/// the payload that kind needs.
///
/// Serializes as `{"type": "<kind>", "value": <payload>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Background {
    /// Linear gradient.
    Gradient(Gradient),
    /// Still image URL, cover-fitted.
    Image(String),
    /// Animated gif URL, cover-fitted.
    Gif(String),
    /// Looping muted video URL, cover-fitted.
    Video(String),
    /// Solid CSS colour.
    Color(String),
}

/// Discriminant of [`Background`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundKind {
    /// Gradient.
    Gradient,
    /// Image.
    Image,
    /// Gif.
    Gif,
    /// Video.
    Video,
    /// Colour.
    Color,
}

impl fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackgroundKind::Gradient => "gradient",
            BackgroundKind::Image => "image",
            BackgroundKind::Gif => "gif",
            BackgroundKind::Video => "video",
            BackgroundKind::Color => "color",
        };
        f.write_str(name)
    }
}

impl Background {
    /// The background's kind.
    #[must_use]
    pub fn kind(&self) -> BackgroundKind {
        match self {
            Background::Gradient(_) => BackgroundKind::Gradient,
            Background::Image(_) => BackgroundKind::Image,
            Background::Gif(_) => BackgroundKind::Gif,
            Background::Video(_) => BackgroundKind::Video,
            Background::Color(_) => BackgroundKind::Color,
        }
    }

    /// Media URL for image, gif and video backgrounds.
    ///
    /// Empty URLs count as absent; such backgrounds render nothing.
    #[must_use]
    pub fn media_url(&self) -> Option<&str> {
        match self {
            Background::Image(url) | Background::Gif(url) | Background::Video(url)
                if !url.is_empty() =>
            {
                Some(url)
            }
            _ => None,
        }
    }
}
