//! SVG serialization of a presentation tree.
//!
//! The SVG is the intermediate the rasterizer consumes: the `viewBox` is in
//! document units and the pixel size is the document size times the export
//! scale. CSS shadow tokens become `<feDropShadow>` filters.

use std::fmt::Write;

use aura_core::{FontStyle, FontWeight, Gradient, TextAlign};

use crate::composition::{Bounds, Fit, MediaKind, Node, NodeKind, Paint, TextStyle};

const TEXT_INSET: f32 = 8.0;
const VIDEO_FILL: &str = "#111827";

/// A parsed CSS shadow: `drop-shadow(dx dy blur colour)` or a bare
/// `dx dy blur colour` text-shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    /// Horizontal offset.
    pub dx: f32,
    /// Vertical offset.
    pub dy: f32,
    /// Blur radius.
    pub blur: f32,
    /// Opaque colour.
    pub color: String,
    /// Colour alpha, 0 to 1.
    pub opacity: f32,
}

/// Parse a shadow token. Returns `None` for `"none"` and anything without at
/// least two lengths.
#[must_use]
pub fn parse_shadow(token: &str) -> Option<Shadow> {
    let token = token.trim();
    let inner = token
        .strip_prefix("drop-shadow(")
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(token)
        .trim();

    let mut lengths = Vec::with_capacity(3);
    let mut rest = inner;
    while lengths.len() < 3 {
        let (head, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match parse_length(head) {
            Some(value) => {
                lengths.push(value);
                rest = tail.trim_start();
            }
            None => break,
        }
    }
    if lengths.len() < 2 {
        return None;
    }

    let (color, opacity) = split_alpha(rest.trim());
    Some(Shadow {
        dx: lengths[0],
        dy: lengths[1],
        blur: lengths.get(2).copied().unwrap_or(0.0),
        color,
        opacity,
    })
}

fn parse_length(token: &str) -> Option<f32> {
    if token.is_empty() {
        return None;
    }
    token.strip_suffix("px").unwrap_or(token).parse().ok()
}

/// Split `rgba(r,g,b,a)` into `rgb(r,g,b)` and `a`. Other colours are opaque.
fn split_alpha(color: &str) -> (String, f32) {
    if color.is_empty() {
        return ("black".to_string(), 1.0);
    }
    let Some(inner) = color
        .strip_prefix("rgba(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return (color.to_string(), 1.0);
    };
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [r, g, b, a] => {
            let alpha = a.parse::<f32>().map_or(1.0, |v| v.clamp(0.0, 1.0));
            (format!("rgb({r},{g},{b})"), alpha)
        }
        _ => (color.to_string(), 1.0),
    }
}

/// Serialize the subtree rooted at `boundary` to an SVG document.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_svg(boundary: &Node, scale: f32) -> String {
    let bounds = boundary.bounds;
    let out_w = ((bounds.width * scale).round() as u32).max(1);
    let out_h = ((bounds.height * scale).round() as u32).max(1);

    let mut writer = SvgWriter::default();
    let _ = write!(
        writer.out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"{} {} {} {}\">",
        bounds.x, bounds.y, bounds.width, bounds.height,
    );
    writer.node(boundary);
    writer.out.push_str("</svg>");
    writer.out
}

#[derive(Default)]
struct SvgWriter {
    out: String,
    next_def: usize,
}

impl SvgWriter {
    fn def_id(&mut self, prefix: &str) -> String {
        self.next_def += 1;
        format!("{prefix}{}", self.next_def)
    }

    fn node(&mut self, node: &Node) {
        let mut open_groups = 0;

        if let Some(shadow) = node.filter.as_deref().and_then(parse_shadow) {
            let id = self.def_id("shadow");
            let _ = write!(
                self.out,
                "<defs><filter id=\"{id}\" x=\"-50%\" y=\"-50%\" width=\"200%\" height=\"200%\"><feDropShadow dx=\"{}\" dy=\"{}\" stdDeviation=\"{}\" flood-color=\"{}\" flood-opacity=\"{}\"/></filter></defs><g filter=\"url(#{id})\">",
                shadow.dx,
                shadow.dy,
                shadow.blur / 2.0,
                escape_xml(&shadow.color),
                shadow.opacity,
            );
            open_groups += 1;
        }

        if let Some(radius) = node.clip_radius {
            let id = self.clip_path(node.bounds, radius);
            let _ = write!(self.out, "<g clip-path=\"url(#{id})\">");
            open_groups += 1;
        }

        self.paint(node);
        for child in &node.children {
            self.node(child);
        }

        for _ in 0..open_groups {
            self.out.push_str("</g>");
        }
    }

    fn clip_path(&mut self, bounds: Bounds, radius: f32) -> String {
        let id = self.def_id("clip");
        let _ = write!(
            self.out,
            "<defs><clipPath id=\"{id}\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{radius}\"/></clipPath></defs>",
            bounds.x, bounds.y, bounds.width, bounds.height,
        );
        id
    }

    fn paint(&mut self, node: &Node) {
        let b = node.bounds;
        match &node.kind {
            NodeKind::Group => {}

            NodeKind::Fill { paint, radius } => {
                let fill = match paint {
                    Paint::Solid(color) if color.trim() == "transparent" => return,
                    Paint::Solid(color) => escape_xml(color),
                    Paint::Linear(gradient) => {
                        let id = self.linear_gradient(gradient);
                        format!("url(#{id})")
                    }
                };
                self.rect(b, *radius, &fill);
            }

            NodeKind::Media {
                media: MediaKind::Video,
                radius,
                ..
            } => self.rect(b, *radius, VIDEO_FILL),

            NodeKind::Media {
                href, fit, radius, ..
            } => {
                let aspect = match fit {
                    Fit::Cover => "xMidYMid slice",
                    Fit::Contain => "xMidYMid meet",
                    Fit::Fill => "none",
                };
                let clip = (*radius > 0.0).then(|| self.clip_path(b, *radius));
                if let Some(id) = &clip {
                    let _ = write!(self.out, "<g clip-path=\"url(#{id})\">");
                }
                let _ = write!(
                    self.out,
                    "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"{aspect}\" href=\"{}\"/>",
                    b.x,
                    b.y,
                    b.width,
                    b.height,
                    escape_xml(href),
                );
                if clip.is_some() {
                    self.out.push_str("</g>");
                }
            }

            NodeKind::Text { content, style } => self.text(b, content, style),
        }
    }

    fn rect(&mut self, b: Bounds, radius: f32, fill: &str) {
        let _ = write!(
            self.out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{radius}\" fill=\"{fill}\"/>",
            b.x, b.y, b.width, b.height,
        );
    }

    fn linear_gradient(&mut self, gradient: &Gradient) -> String {
        let id = self.def_id("gradient");
        let radians = gradient.angle.to_radians();
        let (dx, dy) = (radians.sin() / 2.0, -radians.cos() / 2.0);
        let _ = write!(
            self.out,
            "<defs><linearGradient id=\"{id}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"><stop offset=\"0\" stop-color=\"{}\"/><stop offset=\"1\" stop-color=\"{}\"/></linearGradient></defs>",
            0.5 - dx,
            0.5 - dy,
            0.5 + dx,
            0.5 + dy,
            escape_xml(&gradient.start),
            escape_xml(&gradient.end),
        );
        id
    }

    fn text(&mut self, b: Bounds, content: &str, style: &TextStyle) {
        let (x, anchor) = match style.align {
            TextAlign::Left => (b.x + TEXT_INSET, "start"),
            TextAlign::Center => (b.x + b.width / 2.0, "middle"),
            TextAlign::Right => (b.x + b.width - TEXT_INSET, "end"),
        };
        let baseline = b.y + (b.height + style.font_size * 0.7) / 2.0;
        let weight = match style.weight {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        };
        let font_style = match style.style {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        };
        let _ = write!(
            self.out,
            "<text x=\"{x}\" y=\"{baseline}\" font-size=\"{}\" font-weight=\"{weight}\" font-style=\"{font_style}\" fill=\"{}\" text-anchor=\"{anchor}\" font-family=\"sans-serif\">{}</text>",
            style.font_size,
            escape_xml(&style.color),
            escape_xml(content),
        );
    }
}

/// Escape special XML characters.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
