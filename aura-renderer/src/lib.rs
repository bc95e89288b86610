//! # SnapAura Renderer
//!
//! Lays a document out as a presentation tree and exports it to PNG through
//! an SVG intermediate.
//!
//! ## Export Pipeline
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌─────┐   ┌────────────┐   ┌──────────────┐
//! │ Document │──▶│ compose()   │──▶│ SVG │──▶│ Rasterizer │──▶│ DownloadSink │
//! │          │   │ (Node tree) │   │     │   │ (resvg)    │   │ (PNG file)   │
//! └──────────┘   └─────────────┘   └─────┘   └────────────┘   └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod composition;
pub mod error;
pub mod export;
pub mod intake;
#[cfg(feature = "export")]
pub mod raster;
pub mod svg;

pub use composition::{compose, MediaSizes, Node, NodeKind, FRAME_ID, PREVIEW_ID, ROOT_ID};
pub use error::{RenderError, RenderResult};
pub use export::{
    DownloadSink, ExportOptions, ExportedImage, Exporter, FileDownload, FilterGuard,
    PresentationTree, RasterImage, Rasterizer, EXPORT_FILE_NAME,
};
#[cfg(feature = "export")]
pub use raster::ResvgRasterizer;
