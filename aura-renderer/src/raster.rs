//! resvg-backed [`Rasterizer`].
//!
//! Serializes the boundary to SVG, parses it with usvg, renders into a
//! tiny-skia pixmap and demultiplies to straight RGBA.

use std::sync::Arc;

use crate::composition::{Node, NodeKind};
use crate::error::{RenderError, RenderResult};
use crate::export::{ExportOptions, RasterImage, Rasterizer};
use crate::svg::render_svg;

/// Rasterizer built on resvg and tiny-skia.
#[derive(Clone)]
pub struct ResvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRasterizer {
    /// Create a rasterizer with the system fonts loaded.
    #[must_use]
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(faces = fontdb.len(), "Loaded system fonts");
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Create a rasterizer without fonts. Text renders as nothing.
    #[must_use]
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(usvg::fontdb::Database::new()),
        }
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ResvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Rasterizer for ResvgRasterizer {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, boundary: &Node, options: &ExportOptions) -> RenderResult<RasterImage> {
        if !options.allow_taint {
            if let Some(href) = first_remote_media(boundary) {
                return Err(RenderError::Rasterize(format!(
                    "cross-origin media not allowed: {href}"
                )));
            }
        }

        let svg = render_svg(boundary, options.scale);
        let opt = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opt)
            .map_err(|e| RenderError::Rasterize(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width().round() as u32;
        let px_h = tree.size().height().round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Rasterize("Failed to create pixmap".to_string()))?;
        if !options.transparent {
            pixmap.fill(tiny_skia::Color::WHITE);
        }

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }

        Ok(RasterImage {
            width: pixmap.width(),
            height: pixmap.height(),
            rgba,
        })
    }
}

fn first_remote_media(node: &Node) -> Option<String> {
    let mut found = None;
    node.walk(&mut |n| {
        if found.is_some() {
            return;
        }
        if let NodeKind::Media { href, .. } = &n.kind {
            if href.starts_with("http://") || href.starts_with("https://") {
                found = Some(href.clone());
            }
        }
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{compose, MediaSizes};
    use aura_core::{reduce, Action, Document};

    #[test]
    fn test_rasterize_default_composition() {
        let root = compose(&Document::default(), &MediaSizes::new());
        let image = ResvgRasterizer::without_fonts()
            .rasterize(&root, &ExportOptions::default())
            .expect("rasterize");

        assert_eq!(image.width, 1356);
        assert_eq!(image.height, 1016);
        assert_eq!(image.rgba.len(), (1356 * 1016 * 4) as usize);
        // Gradient background covers the centre.
        let centre = ((508 * 1356 + 678) * 4) as usize;
        assert_eq!(image.rgba[centre + 3], 255);
    }

    #[test]
    fn test_opaque_background_when_not_transparent() {
        let mut node = compose(&Document::default(), &MediaSizes::new());
        node.children.clear();
        let options = ExportOptions {
            scale: 1.0,
            transparent: false,
            ..ExportOptions::default()
        };
        let image = ResvgRasterizer::without_fonts()
            .rasterize(&node, &options)
            .expect("rasterize");
        assert_eq!(&image.rgba[0..4], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_taint_rejected_when_disallowed() {
        let doc = reduce(
            &Document::default(),
            &Action::AddGifOverlay("https://media.example/cat.gif".to_string()),
        );
        let root = compose(&doc, &MediaSizes::new());
        let options = ExportOptions {
            allow_taint: false,
            ..ExportOptions::default()
        };
        let result = ResvgRasterizer::without_fonts().rasterize(&root, &options);
        assert!(matches!(result, Err(RenderError::Rasterize(_))));
    }
}
