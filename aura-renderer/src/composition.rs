//! Presentation tree for a document.
//!
//! [`compose`] lays a [`Document`] out as a tree of [`Node`]s in paint order:
//! background, optional frame chrome, screenshot (or placeholder), watermark,
//! then text, emoji and gif overlays in insertion order. All bounds are
//! absolute, in document units, relative to the composition root.

use std::collections::HashMap;

use aura_core::presets::{FRAME_HEADER_HEIGHT, NO_SHADOW};
use aura_core::{Background, Document, FontStyle, FontWeight, Gradient, Point, Size, TextAlign};

/// Id of the composition root.
pub const ROOT_ID: &str = "canvas-wrapper";
/// Id of the frame chrome wrapper, present only when a frame is active.
pub const FRAME_ID: &str = "frame-export-wrapper";
/// Id of the padded content area overlays are positioned in.
pub const PREVIEW_ID: &str = "canvas-preview";

/// Largest box the screenshot is fitted into.
pub const MAX_SCREENSHOT_SIZE: Size = Size::new(550.0, 400.0);
/// Size of the upload placeholder shown without a screenshot.
pub const PLACEHOLDER_SIZE: Size = Size::new(550.0, 380.0);
/// Watermark drawn at the bottom-right of the screenshot.
pub const WATERMARK: &str = "Designed in SnapAura";

const TRAFFIC_LIGHTS: [&str; 3] = ["#EF4444", "#EAB308", "#22C55E"];
const DOT_SIZE: f32 = 12.0;
const DOT_GAP: f32 = 6.0;
const TEXT_PADDING: f32 = 8.0;
const EMOJI_SHADOW: &str = "0 4px 8px rgba(0,0,0,0.3)";

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Bounds {
    /// Create bounds from an origin and a size.
    #[must_use]
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Bottom-right corner.
    #[must_use]
    pub fn far_corner(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }
}

/// Fill paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// Any CSS colour.
    Solid(String),
    /// Linear gradient with a CSS angle.
    Linear(Gradient),
}

/// How media fills its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Scale to cover, cropping overflow.
    Cover,
    /// Scale to fit entirely.
    Contain,
    /// Stretch to the bounds.
    Fill,
}

/// Kind of media a [`NodeKind::Media`] node shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Animated gif; only its first frame is rasterized.
    Gif,
    /// Video; has no still frame and rasterizes as a dark fill.
    Video,
}

/// Text run styling.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Font size in px.
    pub font_size: f32,
    /// CSS colour.
    pub color: String,
    /// Horizontal anchor.
    pub align: TextAlign,
    /// Weight.
    pub weight: FontWeight,
    /// Style.
    pub style: FontStyle,
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Container with no paint of its own.
    Group,
    /// Filled rectangle with rounded corners.
    Fill {
        /// Paint.
        paint: Paint,
        /// Corner radius.
        radius: f32,
    },
    /// Image, gif or video.
    Media {
        /// URL or data URI.
        href: String,
        /// Media kind.
        media: MediaKind,
        /// Fit mode.
        fit: Fit,
        /// Corner radius.
        radius: f32,
    },
    /// Single line of text.
    Text {
        /// Text content.
        content: String,
        /// Styling.
        style: TextStyle,
    },
}

/// Presentation node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Lookup id for well-known nodes.
    pub id: Option<String>,
    /// What the node draws.
    pub kind: NodeKind,
    /// Absolute bounds.
    pub bounds: Bounds,
    /// Filter token (CSS drop-shadow or text-shadow) applied to the node and its children.
    pub filter: Option<String>,
    /// Clip children to the bounds with this corner radius.
    pub clip_radius: Option<f32>,
    /// Children in paint order.
    pub children: Vec<Node>,
}

impl Node {
    /// Create a node without id, filter or children.
    #[must_use]
    pub fn new(kind: NodeKind, bounds: Bounds) -> Self {
        Self {
            id: None,
            kind,
            bounds,
            filter: None,
            clip_radius: None,
            children: Vec::new(),
        }
    }

    /// Create an empty group.
    #[must_use]
    pub fn group(bounds: Bounds) -> Self {
        Self::new(NodeKind::Group, bounds)
    }

    /// Set the lookup id.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Set the filter token. `"none"` and empty tokens clear it.
    #[must_use]
    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = effective_filter(filter);
        self
    }

    /// Find a node by id in this subtree.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Find a node by id in this subtree, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Visit the subtree depth-first in paint order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

fn effective_filter(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() || token == NO_SHADOW {
        None
    } else {
        Some(token.to_string())
    }
}

/// Intrinsic sizes of media referenced by the document, keyed by URL.
///
/// Gif overlays take their height from here; unknown media is treated as
/// square.
#[derive(Debug, Clone, Default)]
pub struct MediaSizes {
    sizes: HashMap<String, Size>,
}

impl MediaSizes {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the intrinsic size of a URL.
    pub fn insert(&mut self, url: impl Into<String>, size: Size) {
        self.sizes.insert(url.into(), size);
    }

    /// Intrinsic size of a URL, if known.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Size> {
        self.sizes.get(url).copied()
    }

    /// Height of media shown at `width`, preserving its aspect ratio.
    #[must_use]
    pub fn height_for(&self, url: &str, width: f32) -> f32 {
        self.get(url)
            .and_then(|size| size.aspect_ratio())
            .map_or(width, |ratio| width / ratio)
    }
}

/// Size the screenshot is drawn at: its dimensions scaled down to fit
/// [`MAX_SCREENSHOT_SIZE`], never up.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn screenshot_size(document: &Document) -> Size {
    let Some(dims) = document.image_dimensions.filter(|d| d.width > 0 && d.height > 0) else {
        return MAX_SCREENSHOT_SIZE;
    };
    let (w, h) = (dims.width as f32, dims.height as f32);
    let scale = (MAX_SCREENSHOT_SIZE.width / w)
        .min(MAX_SCREENSHOT_SIZE.height / h)
        .min(1.0);
    Size::new(w * scale, h * scale)
}

/// Size of the padded content area.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn preview_size(document: &Document) -> Size {
    let content = if document.screenshot.is_some() {
        screenshot_size(document)
    } else {
        PLACEHOLDER_SIZE
    };
    let padding = document.padding as f32;
    Size::new(content.width + 2.0 * padding, content.height + 2.0 * padding)
}

/// Lay the document out as a presentation tree rooted at [`ROOT_ID`].
#[must_use]
pub fn compose(document: &Document, media: &MediaSizes) -> Node {
    let preview = preview_size(document);
    let framed = document.frame.is_active();
    let header = if framed { FRAME_HEADER_HEIGHT } else { 0.0 };
    let total = Size::new(preview.width, preview.height + header);

    let preview_origin = Point::new(0.0, header);
    let preview_node = compose_preview(document, media, Bounds::new(preview_origin, preview));

    let mut root = Node::group(Bounds::new(Point::ZERO, total)).with_id(ROOT_ID);
    if framed {
        let bounds = Bounds::new(Point::ZERO, total);
        let mut frame = Node::group(bounds)
            .with_id(FRAME_ID)
            .with_filter(&document.shadow);
        frame.clip_radius = Some(8.0);
        frame.children = frame_chrome(document, bounds);
        frame.children.push(preview_node);
        root.children.push(frame);
    } else {
        // Unframed, the root is the export boundary and carries the shadow.
        root = root.with_filter(&document.shadow);
        root.children.push(preview_node);
    }
    root
}

fn frame_chrome(document: &Document, bounds: Bounds) -> Vec<Node> {
    let frame = &document.frame;
    let mut nodes = vec![
        Node::new(
            NodeKind::Fill {
                paint: Paint::Solid(frame.header_color.clone()),
                radius: 0.0,
            },
            Bounds::new(bounds.origin(), Size::new(bounds.width, FRAME_HEADER_HEIGHT)),
        ),
        Node::new(
            NodeKind::Fill {
                paint: Paint::Solid(frame.body_color.clone()),
                radius: 0.0,
            },
            Bounds::new(
                Point::new(bounds.x, bounds.y + FRAME_HEADER_HEIGHT),
                Size::new(bounds.width, bounds.height - FRAME_HEADER_HEIGHT),
            ),
        ),
    ];
    let dot_y = bounds.y + (FRAME_HEADER_HEIGHT - DOT_SIZE) / 2.0;
    let mut dot_x = bounds.x + 12.0;
    for color in TRAFFIC_LIGHTS {
        nodes.push(Node::new(
            NodeKind::Fill {
                paint: Paint::Solid(color.to_string()),
                radius: DOT_SIZE / 2.0,
            },
            Bounds::new(Point::new(dot_x, dot_y), Size::new(DOT_SIZE, DOT_SIZE)),
        ));
        dot_x += DOT_SIZE + DOT_GAP;
    }
    nodes
}

#[allow(clippy::cast_precision_loss)]
fn compose_preview(document: &Document, media: &MediaSizes, bounds: Bounds) -> Node {
    let mut preview = Node::group(bounds).with_id(PREVIEW_ID);
    preview.clip_radius = Some(0.0);
    preview.children.push(background_node(&document.background, bounds));

    let padding = document.padding as f32;
    let content_origin = Point::new(bounds.x + padding, bounds.y + padding);
    let radius = document.corner_radius as f32;

    if let Some(screenshot) = &document.screenshot {
        let image = Bounds::new(content_origin, screenshot_size(document));
        preview.children.push(Node::new(
            NodeKind::Media {
                href: screenshot.clone(),
                media: MediaKind::Image,
                fit: Fit::Contain,
                radius,
            },
            image,
        ));
        preview.children.push(watermark(image));
    } else {
        preview.children.push(Node::new(
            NodeKind::Fill {
                paint: Paint::Solid("rgba(17,24,39,0.5)".to_string()),
                radius: 16.0,
            },
            Bounds::new(content_origin, PLACEHOLDER_SIZE),
        ));
    }

    let origin = bounds.origin();
    for text in &document.text_overlays {
        let style = TextStyle {
            font_size: text.font_size,
            color: text.color.clone(),
            align: text.text_align,
            weight: text.font_weight,
            style: text.font_style,
        };
        let size = estimate_text_size(&text.text, text.font_size);
        preview.children.push(
            Node::new(
                NodeKind::Text {
                    content: text.text.clone(),
                    style,
                },
                Bounds::new(origin + text.position, size),
            )
            .with_filter(&text.text_shadow),
        );
    }

    for emoji in &document.emoji_overlays {
        let style = TextStyle {
            font_size: emoji.size,
            color: "#000000".to_string(),
            align: TextAlign::Center,
            weight: FontWeight::Normal,
            style: FontStyle::Normal,
        };
        preview.children.push(
            Node::new(
                NodeKind::Text {
                    content: emoji.emoji.clone(),
                    style,
                },
                Bounds::new(origin + emoji.position, Size::new(emoji.size, emoji.size)),
            )
            .with_filter(EMOJI_SHADOW),
        );
    }

    for gif in &document.gif_overlays {
        let height = media.height_for(&gif.url, gif.width);
        preview.children.push(Node::new(
            NodeKind::Media {
                href: gif.url.clone(),
                media: MediaKind::Gif,
                fit: Fit::Fill,
                radius: 0.0,
            },
            Bounds::new(origin + gif.position, Size::new(gif.width, height)),
        ));
    }

    preview
}

fn background_node(background: &Background, bounds: Bounds) -> Node {
    let media = |href: &str, media: MediaKind| NodeKind::Media {
        href: href.to_string(),
        media,
        fit: Fit::Cover,
        radius: 0.0,
    };
    let kind = match background {
        Background::Gradient(gradient) => NodeKind::Fill {
            paint: Paint::Linear(gradient.clone()),
            radius: 0.0,
        },
        Background::Color(color) => NodeKind::Fill {
            paint: Paint::Solid(color.clone()),
            radius: 0.0,
        },
        Background::Image(url) if !url.is_empty() => media(url, MediaKind::Image),
        Background::Gif(url) if !url.is_empty() => media(url, MediaKind::Gif),
        Background::Video(url) if !url.is_empty() => media(url, MediaKind::Video),
        Background::Image(_) | Background::Gif(_) | Background::Video(_) => NodeKind::Group,
    };
    Node::new(kind, bounds)
}

fn watermark(image: Bounds) -> Node {
    let corner = image.far_corner();
    let size = Size::new(estimate_text_size(WATERMARK, 12.0).width, 20.0);
    Node::new(
        NodeKind::Text {
            content: WATERMARK.to_string(),
            style: TextStyle {
                font_size: 12.0,
                color: "rgba(255,255,255,0.4)".to_string(),
                align: TextAlign::Right,
                weight: FontWeight::Bold,
                style: FontStyle::Normal,
            },
        },
        Bounds::new(
            Point::new(corner.x - size.width - 12.0, corner.y - size.height - 8.0),
            size,
        ),
    )
}

/// Rough box a single line of text occupies, including its padding.
#[allow(clippy::cast_precision_loss)]
fn estimate_text_size(text: &str, font_size: f32) -> Size {
    let chars = text.chars().count().max(1) as f32;
    Size::new(
        chars * font_size * 0.6 + 2.0 * TEXT_PADDING,
        font_size * 1.2 + 2.0 * TEXT_PADDING,
    )
}
