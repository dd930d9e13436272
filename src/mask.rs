use std::{path::PathBuf, sync::Arc};

use image::{RgbaImage, imageops::FilterType};

use crate::{
    color::Color,
    composite::paste_into,
    editor::{Editor, ShapeStyle, show_surface},
    foundation::core::{Point, Size, resolve_size},
    foundation::error::{EditError, EditResult},
    offload::offload,
    source::ImageSource,
};

pub const DEFAULT_ANTIALIAS: u32 = 4;

/// Transparent stencil whose painted regions select what [`Mask::use_on_image`] keeps.
///
/// Shapes are painted at `antialias` times the mask size and filtered down.
#[derive(Clone, Debug)]
pub struct Mask {
    size: Size,
    antialias: u32,
    hires: Editor,
    surface: Arc<RgbaImage>,
}

#[derive(Clone, Debug)]
pub struct MaskBuilder {
    size: Option<Size>,
    width: Option<u32>,
    height: Option<u32>,
    antialias: u32,
}

impl Default for MaskBuilder {
    fn default() -> Self {
        Self {
            size: None,
            width: None,
            height: None,
            antialias: DEFAULT_ANTIALIAS,
        }
    }
}

impl MaskBuilder {
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

    pub fn antialias(mut self, factor: u32) -> Self {
        self.antialias = factor;
        self
    }

    pub fn build(self) -> EditResult<Mask> {
        let size = resolve_size(self.size, self.width, self.height)?;
        if self.antialias == 0 {
            return Err(EditError::validation("mask antialias factor must be >= 1"));
        }
        let scaled = |v: u32| {
            v.checked_mul(self.antialias)
                .ok_or_else(|| EditError::validation("antialiased mask size overflows"))
        };
        let hires = Editor::new(RgbaImage::new(scaled(size.width)?, scaled(size.height)?))?;
        Ok(Mask {
            size,
            antialias: self.antialias,
            hires,
            surface: Arc::new(RgbaImage::new(size.width, size.height)),
        })
    }
}

impl Mask {
    pub fn new(size: impl Into<Size>) -> EditResult<Self> {
        Self::builder().size(size).build()
    }

    pub fn builder() -> MaskBuilder {
        MaskBuilder::default()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn antialias(&self) -> u32 {
        self.antialias
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub(crate) fn shared_surface(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.surface)
    }

    /// Paint an opaque white ellipse, optionally outlined, into the mask.
    #[tracing::instrument(level = "debug", skip_all, fields(width = width, height = height))]
    pub async fn ellipse(
        &mut self,
        position: impl Into<Point>,
        width: f64,
        height: f64,
        outline: Option<Color>,
        stroke_width: f64,
    ) -> EditResult<&mut Self> {
        let k = f64::from(self.antialias);
        let p = position.into();
        let mut style = ShapeStyle::default()
            .fill(Color::WHITE)
            .stroke_width(stroke_width * k);
        style.outline = outline;
        self.hires
            .ellipse((p.x * k, p.y * k), width * k, height * k, style)
            .await?;
        self.downsample().await?;
        Ok(self)
    }

    async fn downsample(&mut self) -> EditResult<()> {
        let hires = self.hires.shared_surface();
        let size = self.size;
        let antialias = self.antialias;
        self.surface = offload(move || {
            Ok(Arc::new(if antialias == 1 {
                (*hires).clone()
            } else {
                image::imageops::resize(&*hires, size.width, size.height, FilterType::Triangle)
            }))
        })
        .await?;
        Ok(())
    }

    /// Keep `image` where the mask is painted, transparent elsewhere. Neither input changes.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn use_on_image(&self, image: impl Into<ImageSource>) -> EditResult<Editor> {
        let image = image.into();
        let mask = Arc::clone(&self.surface);
        let out = offload(move || {
            let image = image.into_surface()?;
            if image.dimensions() != mask.dimensions() {
                return Err(EditError::validation(format!(
                    "mask size {:?} does not match image size {:?}",
                    mask.dimensions(),
                    image.dimensions()
                )));
            }
            let mut layer = RgbaImage::new(mask.width(), mask.height());
            paste_into(&mut layer, &image, 0, 0, Some(mask.as_ref()))?;
            Ok(layer)
        })
        .await?;
        Editor::new(out)
    }

    pub async fn show(&self) -> EditResult<PathBuf> {
        show_surface(Arc::clone(&self.surface)).await
    }
}

#[cfg(test)]
#[path = "../tests/unit/mask.rs"]
mod tests;
