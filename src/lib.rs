//! Easel is a chainable, async image editor on top of a CPU rasterizer.
//!
//! - Start from a [`Canvas`], a file, bytes, a URL or another [`Editor`]
//! - Chain operations (`resize`, `rotate`, `blur`, `blend`, `paste`, shapes, text); each one
//!   runs on the tokio blocking pool and returns the editor
//! - Export with [`Editor::save`] or [`Editor::image_bytes`]
//!
//! Stencils are built with [`Mask`], fonts come from files or the bundled catalog ([`Font`]).
#![forbid(unsafe_code)]

mod foundation;

pub mod blur;
pub mod canvas;
pub mod color;
pub(crate) mod composite;
pub mod config;
pub mod editor;
pub mod font;
pub(crate) mod geometry;
pub mod mask;
pub mod offload;
pub mod remote;
pub(crate) mod render;
pub mod source;
pub mod text;

pub use crate::foundation::core::{Affine, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{EditError, EditResult};

pub use crate::blur::BlurMode;
pub use crate::canvas::{Canvas, CanvasBuilder};
pub use crate::color::Color;
pub use crate::config::{Settings, settings};
pub use crate::editor::{Editor, ExportOptions, ShapeStyle};
pub use crate::font::{Font, FontFamily, FontOptions, FontVariant};
pub use crate::mask::{Mask, MaskBuilder};
pub use crate::offload::offload;
pub use crate::source::ImageSource;
pub use crate::text::{Align, MulticolorStyle, Text, TextStyle, measure, multicolor_origin};

pub use image::ImageFormat;

/// Crate version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
