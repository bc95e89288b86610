//! Export of the composition to a PNG download.
//!
//! The [`Exporter`] looks up the composition root in a [`PresentationTree`],
//! picks the export boundary (the frame chrome when a frame is active,
//! otherwise the root), rasterizes it with its own filter cleared, encodes
//! PNG and hands the bytes to a [`DownloadSink`].

use std::path::{Path, PathBuf};

use image::ImageEncoder;

use crate::composition::{Node, FRAME_ID, ROOT_ID};
use crate::error::{RenderError, RenderResult};

/// File name offered for exported images.
pub const EXPORT_FILE_NAME: &str = "snapaura-screenshot.png";

/// Configuration for export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Scale factor (2.0 for retina output).
    pub scale: f32,
    /// Leave uncovered pixels transparent instead of white.
    pub transparent: bool,
    /// Rasterize cross-origin media instead of failing on it.
    pub allow_taint: bool,
    /// Name the download is offered under.
    pub file_name: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            transparent: true,
            allow_taint: true,
            file_name: EXPORT_FILE_NAME.to_string(),
        }
    }
}

/// Straight (non-premultiplied) RGBA8 pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA bytes.
    pub rgba: Vec<u8>,
}

impl RasterImage {
    /// Encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixel buffer does not match the dimensions or
    /// encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let expected = u64::from(self.width) * u64::from(self.height) * 4;
        if self.rgba.len() as u64 != expected {
            return Err(RenderError::Export(format!(
                "pixel buffer holds {} bytes, expected {expected}",
                self.rgba.len()
            )));
        }
        let mut buf = std::io::Cursor::new(Vec::new());
        image::codecs::png::PngEncoder::new(&mut buf)
            .write_image(
                &self.rgba,
                self.width,
                self.height,
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))?;
        Ok(buf.into_inner())
    }
}

/// Turns a presentation subtree into pixels.
pub trait Rasterizer {
    /// Rasterize `boundary` and everything beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtree cannot be rasterized.
    fn rasterize(&self, boundary: &Node, options: &ExportOptions) -> RenderResult<RasterImage>;
}

/// Receives finished exports.
pub trait DownloadSink {
    /// Offer `bytes` to the user under `file_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be delivered.
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> RenderResult<()>;
}

/// Download sink that writes into a directory.
#[derive(Debug, Clone)]
pub struct FileDownload {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl FileDownload {
    /// Create a sink writing into `dir`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            saved: Vec::new(),
        }
    }

    /// Target directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths written so far, oldest first.
    #[must_use]
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl DownloadSink for FileDownload {
    fn offer(&mut self, file_name: &str, bytes: &[u8]) -> RenderResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved export");
        self.saved.push(path);
        Ok(())
    }
}

/// Presentation trees currently mounted, looked up by node id.
#[derive(Debug, Clone, Default)]
pub struct PresentationTree {
    roots: Vec<Node>,
}

impl PresentationTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a subtree, replacing any mounted subtree with the same root id.
    pub fn mount(&mut self, node: Node) {
        if let Some(id) = node.id.clone() {
            self.roots.retain(|root| root.id.as_deref() != Some(id.as_str()));
        }
        self.roots.push(node);
    }

    /// Remove the subtree whose root has `id`.
    pub fn unmount(&mut self, id: &str) -> Option<Node> {
        let index = self
            .roots
            .iter()
            .position(|root| root.id.as_deref() == Some(id))?;
        Some(self.roots.remove(index))
    }

    /// Find a node by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Find a node by id, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.roots.iter_mut().find_map(|root| root.find_mut(id))
    }
}

/// Clears a node's filter while alive and restores it on drop, whether the
/// export succeeded or not.
pub struct FilterGuard<'a> {
    node: &'a mut Node,
    saved: Option<String>,
}

impl<'a> FilterGuard<'a> {
    /// Clear the filter of `node`.
    pub fn clear(node: &'a mut Node) -> Self {
        let saved = node.filter.take();
        Self { node, saved }
    }

    /// The node with its filter cleared.
    #[must_use]
    pub fn node(&self) -> &Node {
        self.node
    }
}

impl Drop for FilterGuard<'_> {
    fn drop(&mut self) {
        self.node.filter = self.saved.take();
    }
}

/// Summary of a completed export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    /// Name the file was offered under.
    pub file_name: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Encoded PNG size in bytes.
    pub byte_len: usize,
}

/// Exports the composition to PNG.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    /// Create a new exporter with the given options.
    #[must_use]
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Create an exporter with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportOptions::default())
    }

    /// Export options.
    #[must_use]
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Export the mounted composition.
    ///
    /// Returns `Ok(None)` without producing a file when no composition root
    /// is mounted.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization, encoding or delivery fails. The
    /// boundary's filter is restored in every case.
    pub fn export<R, D>(
        &self,
        tree: &mut PresentationTree,
        rasterizer: &R,
        sink: &mut D,
    ) -> RenderResult<Option<ExportedImage>>
    where
        R: Rasterizer + ?Sized,
        D: DownloadSink + ?Sized,
    {
        let Some(root) = tree.find_mut(ROOT_ID) else {
            tracing::debug!("No composition root mounted, skipping export");
            return Ok(None);
        };

        let framed = root.find(FRAME_ID).is_some();
        let boundary = if framed {
            root.find_mut(FRAME_ID)
                .ok_or_else(|| RenderError::Composition("frame wrapper vanished".to_string()))?
        } else {
            root
        };

        let raster = {
            let guard = FilterGuard::clear(boundary);
            rasterizer.rasterize(guard.node(), &self.options)
        }?;

        let png = raster.encode_png()?;
        sink.offer(&self.options.file_name, &png)?;
        tracing::info!(
            width = raster.width,
            height = raster.height,
            framed,
            "Exported composition"
        );

        Ok(Some(ExportedImage {
            file_name: self.options.file_name.clone(),
            width: raster.width,
            height: raster.height,
            byte_len: png.len(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::composition::{compose, MediaSizes};
    use aura_core::{reduce, Action, Document};

    /// Records what it was asked to rasterize and returns a solid image.
    #[derive(Default)]
    struct RecordingRasterizer {
        seen: RefCell<Vec<(Option<String>, Option<String>)>>,
        active_filters: RefCell<Vec<String>>,
        fail: bool,
    }

    impl Rasterizer for RecordingRasterizer {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        fn rasterize(&self, boundary: &Node, options: &ExportOptions) -> RenderResult<RasterImage> {
            self.seen
                .borrow_mut()
                .push((boundary.id.clone(), boundary.filter.clone()));
            boundary.walk(&mut |node| {
                if let Some(filter) = &node.filter {
                    self.active_filters.borrow_mut().push(filter.clone());
                }
            });
            if self.fail {
                return Err(RenderError::Rasterize("boom".to_string()));
            }
            let width = (boundary.bounds.width * options.scale) as u32;
            let height = (boundary.bounds.height * options.scale) as u32;
            Ok(RasterImage {
                width,
                height,
                rgba: vec![0; (width * height * 4) as usize],
            })
        }
    }

    #[derive(Default)]
    struct MemorySink {
        files: Vec<(String, Vec<u8>)>,
    }

    impl DownloadSink for MemorySink {
        fn offer(&mut self, file_name: &str, bytes: &[u8]) -> RenderResult<()> {
            self.files.push((file_name.to_string(), bytes.to_vec()));
            Ok(())
        }
    }

    fn mounted(actions: &[Action]) -> PresentationTree {
        let doc = actions
            .iter()
            .fold(Document::default(), |doc, action| reduce(&doc, action));
        let mut tree = PresentationTree::new();
        tree.mount(compose(&doc, &MediaSizes::new()));
        tree
    }

    #[test]
    fn test_missing_root_aborts_silently() {
        let mut tree = PresentationTree::new();
        let mut sink = MemorySink::default();
        let rasterizer = RecordingRasterizer::default();

        let result = Exporter::with_defaults()
            .export(&mut tree, &rasterizer, &mut sink)
            .expect("export");

        assert!(result.is_none());
        assert!(sink.files.is_empty());
        assert!(rasterizer.seen.borrow().is_empty());
    }

    #[test]
    fn test_export_without_frame_uses_root() {
        let mut tree = mounted(&[]);
        let before = tree.find(ROOT_ID).and_then(|n| n.filter.clone());
        assert!(before.as_deref().is_some_and(|f| f.starts_with("drop-shadow(")));
        let mut sink = MemorySink::default();
        let rasterizer = RecordingRasterizer::default();

        let exported = Exporter::with_defaults()
            .export(&mut tree, &rasterizer, &mut sink)
            .expect("export")
            .expect("image");

        assert_eq!(exported.file_name, EXPORT_FILE_NAME);
        assert_eq!(exported.width, 678 * 2);
        assert_eq!(rasterizer.seen.borrow()[0].0.as_deref(), Some(ROOT_ID));
        assert!(
            rasterizer.active_filters.borrow().is_empty(),
            "shadow active during unframed export: {:?}",
            rasterizer.active_filters.borrow()
        );
        assert_eq!(tree.find(ROOT_ID).and_then(|n| n.filter.clone()), before);
        assert_eq!(sink.files.len(), 1);
        assert_eq!(&sink.files[0].1[0..4], &[137, 80, 78, 71]);
    }

    #[test]
    fn test_frame_boundary_filter_cleared_then_restored() {
        let frame = aura_core::presets::frame_by_kind("macos-dark").expect("frame");
        let mut tree = mounted(&[Action::SetFrame(frame)]);
        let before = tree.find(FRAME_ID).and_then(|n| n.filter.clone());
        assert!(before.is_some());

        let rasterizer = RecordingRasterizer::default();
        Exporter::with_defaults()
            .export(&mut tree, &rasterizer, &mut MemorySink::default())
            .expect("export");

        let seen = rasterizer.seen.borrow();
        assert_eq!(seen[0].0.as_deref(), Some(FRAME_ID));
        assert_eq!(seen[0].1, None);
        assert_eq!(tree.find(FRAME_ID).and_then(|n| n.filter.clone()), before);
    }

    #[test]
    fn test_filter_restored_on_failure() {
        let frame = aura_core::presets::frame_by_kind("windows").expect("frame");
        let mut tree = mounted(&[Action::SetFrame(frame)]);
        let before = tree.find(FRAME_ID).and_then(|n| n.filter.clone());

        let rasterizer = RecordingRasterizer {
            fail: true,
            ..RecordingRasterizer::default()
        };
        let mut sink = MemorySink::default();
        let result = Exporter::with_defaults().export(&mut tree, &rasterizer, &mut sink);

        assert!(matches!(result, Err(RenderError::Rasterize(_))));
        assert!(sink.files.is_empty());
        assert_eq!(tree.find(FRAME_ID).and_then(|n| n.filter.clone()), before);
    }

    #[test]
    fn test_mount_replaces_same_root() {
        let mut tree = mounted(&[]);
        tree.mount(compose(&Document::default(), &MediaSizes::new()));
        assert!(tree.unmount(ROOT_ID).is_some());
        assert!(tree.find(ROOT_ID).is_none());
    }

    #[test]
    fn test_file_download_writes_into_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut sink = FileDownload::new(dir.path().join("out"));
        sink.offer(EXPORT_FILE_NAME, b"png").expect("offer");

        let path = dir.path().join("out").join(EXPORT_FILE_NAME);
        assert_eq!(std::fs::read(&path).expect("read"), b"png");
        assert_eq!(sink.saved(), &[path]);
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        let image = RasterImage {
            width: 4,
            height: 4,
            rgba: vec![0; 8],
        };
        assert!(image.encode_png().is_err());
    }
}
