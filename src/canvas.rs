use std::sync::Arc;

use image::RgbaImage;

use crate::{
    color::Color,
    foundation::core::{Size, resolve_size},
    foundation::error::EditResult,
};

/// A freshly allocated surface of a given size and fill color.
#[derive(Clone, Debug)]
pub struct Canvas {
    size: Size,
    color: Option<Color>,
    surface: Arc<RgbaImage>,
}

impl Canvas {
    /// Allocate a `size` canvas filled with `color` (transparent when `None`).
    pub fn new(size: impl Into<Size>, color: Option<Color>) -> EditResult<Self> {
        Self::builder().size(size).maybe_color(color).build()
    }

    pub fn builder() -> CanvasBuilder {
        CanvasBuilder::default()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub(crate) fn shared_surface(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.surface)
    }
}

#[derive(Clone, Debug, Default)]
pub struct CanvasBuilder {
    size: Option<Size>,
    width: Option<u32>,
    height: Option<u32>,
    color: Option<Color>,
}

impl CanvasBuilder {
    pub fn size(mut self, size: impl Into<Size>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn maybe_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    /// Fails with a configuration error when neither `size` nor `width`+`height` resolve.
    pub fn build(self) -> EditResult<Canvas> {
        let size = resolve_size(self.size, self.width, self.height)?;
        let fill = self.color.unwrap_or(Color::TRANSPARENT).to_rgba_pixel();
        let surface = RgbaImage::from_pixel(size.width, size.height, fill);
        Ok(Canvas {
            size,
            color: self.color,
            surface: Arc::new(surface),
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/canvas.rs"]
mod tests;
