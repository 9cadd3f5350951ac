//! Screentone renders multi-color halftone separations of a source image.
//!
//! Each selected palette color becomes one layer: a sampling grid rotated by
//! the color's screen angle walks the image, pixels inside the layer's color
//! tolerance band emit luminance-sized dots, and the per-layer dot streams
//! drive both a raster composite and an SVG mirror with identical geometry.
#![forbid(unsafe_code)]

pub mod composite;
pub mod engine;
pub mod error;
pub mod naming;
pub mod palette;
pub mod params;
pub mod raster;
pub mod render;
pub mod source;
pub mod vector;

pub use engine::{DotPrimitive, manhattan_distance, separate};
pub use error::{ScreentoneError, ScreentoneResult};
pub use palette::{Lang, Palette, PaletteColor};
pub use params::{HalftoneParams, Layer, ResolvedLayer, SessionDefaults, ToleranceBand};
pub use raster::RasterRGBA;
pub use render::{
    ExportResult, LayerRender, RenderRequest, RenderResult, render_export, render_preview,
};
pub use source::{SourceImage, luminance};
pub use vector::{CircleShape, VectorDocument, VectorGroup};
