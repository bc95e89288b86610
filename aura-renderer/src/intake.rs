//! Screenshot intake.
//!
//! Turns uploaded bytes into the two transitions the editor expects: the
//! screenshot as a base64 data URI, then its pixel dimensions once probed.

use std::io::Cursor;
use std::path::Path;

use aura_core::{Action, ImageDimensions};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{RenderError, RenderResult};

/// Encode bytes as a `data:` URI.
#[must_use]
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Decode a base64 `data:` URI into its MIME type and bytes.
///
/// # Errors
///
/// Returns an error if the URI is not a base64 data URI.
pub fn from_data_uri(uri: &str) -> RenderResult<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::UnsupportedMedia("not a data URI".to_string()))?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| RenderError::UnsupportedMedia("data URI is not base64".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| RenderError::UnsupportedMedia(format!("invalid base64: {e}")))?;
    Ok((mime.to_string(), bytes))
}

/// Read uploaded bytes as the screenshot.
///
/// # Errors
///
/// Returns [`RenderError::UnsupportedMedia`] if `mime` is not `image/*`.
pub fn read_screenshot(bytes: &[u8], mime: &str) -> RenderResult<Action> {
    if !mime.starts_with("image/") {
        return Err(RenderError::UnsupportedMedia(format!(
            "expected an image, got {mime}"
        )));
    }
    tracing::debug!(mime, bytes = bytes.len(), "Read screenshot");
    Ok(Action::SetScreenshot(to_data_uri(mime, bytes)))
}

/// Probe the pixel dimensions of encoded image bytes.
///
/// # Errors
///
/// Returns an error if the format is unknown or the header cannot be read.
pub fn probe_dimensions(bytes: &[u8]) -> RenderResult<ImageDimensions> {
    let format = image::guess_format(bytes)?;
    let (width, height) =
        image::ImageReader::with_format(Cursor::new(bytes), format).into_dimensions()?;
    Ok(ImageDimensions::new(width, height))
}

/// Probe dimensions and wrap them as a transition.
///
/// # Errors
///
/// Returns an error if the dimensions cannot be read.
pub fn probe(bytes: &[u8]) -> RenderResult<Action> {
    Ok(Action::SetImageDimensions(probe_dimensions(bytes)?))
}

/// Load a screenshot from disk, inferring its MIME type from the decoded
/// format. Returns the screenshot transition followed by the dimensions.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a supported image.
pub fn load_file(path: &Path) -> RenderResult<[Action; 2]> {
    let (uri, dimensions) = load_media(path)?;
    tracing::info!(path = %path.display(), ?dimensions, "Loaded screenshot");
    Ok([
        Action::SetScreenshot(uri),
        Action::SetImageDimensions(dimensions),
    ])
}

/// Read an image file into a data URI plus its natural size.
///
/// Used for screenshots, background images and stickers alike.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a supported image.
pub fn load_media(path: &Path) -> RenderResult<(String, ImageDimensions)> {
    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)
        .map_err(|_| RenderError::UnsupportedMedia(path.display().to_string()))?;
    let dimensions = probe_dimensions(&bytes)?;
    Ok((to_data_uri(format.to_mime_type(), &bytes), dimensions))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::RasterImage;

    fn tiny_png(width: u32, height: u32) -> Vec<u8> {
        RasterImage {
            width,
            height,
            rgba: vec![255; (width * height * 4) as usize],
        }
        .encode_png()
        .expect("png")
    }

    #[test]
    fn test_data_uri_round_trip() {
        let uri = to_data_uri("image/png", b"\x89PNG");
        assert_eq!(uri, "data:image/png;base64,iVBORw==");
        let (mime, bytes) = from_data_uri(&uri).expect("decode");
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"\x89PNG");
    }

    #[test]
    fn test_non_image_rejected() {
        let result = read_screenshot(b"%PDF-1.7", "application/pdf");
        assert!(matches!(result, Err(RenderError::UnsupportedMedia(_))));
    }

    #[test]
    fn test_probe_png_dimensions() {
        let png = tiny_png(8, 3);
        assert_eq!(probe_dimensions(&png).expect("probe"), ImageDimensions::new(8, 3));
        match probe(&png).expect("probe") {
            Action::SetImageDimensions(d) => assert_eq!(d, ImageDimensions::new(8, 3)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_probe_garbage_fails() {
        assert!(probe_dimensions(b"not an image").is_err());
    }

    #[test]
    fn test_load_file_infers_mime() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("shot.bin");
        std::fs::write(&path, tiny_png(4, 2)).expect("write");

        let [screenshot, dimensions] = load_file(&path).expect("load");
        match screenshot {
            Action::SetScreenshot(uri) => assert!(uri.starts_with("data:image/png;base64,")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(dimensions, Action::SetImageDimensions(ImageDimensions::new(4, 2)));
    }

    #[test]
    fn test_load_file_rejects_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").expect("write");
        assert!(matches!(
            load_file(&path),
            Err(RenderError::UnsupportedMedia(_))
        ));
    }
}
