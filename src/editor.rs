use std::{
    fs::File,
    io::{BufWriter, Cursor, Seek, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use image::{ImageFormat, RgbaImage, imageops::FilterType};

use crate::{
    blur::{BlurMode, blur_image},
    color::Color,
    composite::{alpha_composite, lerp, mask_through, paste_into},
    font::Font,
    foundation::core::{Affine, Point, Rect, Size},
    foundation::error::{EditError, EditResult},
    geometry::{bar_width, crop_box_for_aspect, normalize_arc, progress_arc, rotated_bounds},
    offload::offload,
    remote,
    render::{
        DrawContext, arc_path, coverage, draw_over, ellipse_path, fill_shape, inset_rect,
        polygon_path, rect_path, stroke_shape, transform_image,
    },
    source::ImageSource,
    text::{MulticolorStyle, Text, TextStyle, draw_multicolor, draw_text},
};

/// Fill, outline and corner styling shared by the shape operations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeStyle {
    pub fill: Option<Color>,
    /// Alias of `fill`; wins when both are set.
    pub color: Option<Color>,
    pub outline: Option<Color>,
    pub stroke_width: f64,
    pub radius: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: None,
            color: None,
            outline: None,
            stroke_width: 1.0,
            radius: 0.0,
        }
    }
}

impl ShapeStyle {
    pub fn fill(mut self, color: impl Into<Color>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn color(mut self, color: impl Into<Color>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn outline(mut self, color: impl Into<Color>) -> Self {
        self.outline = Some(color.into());
        self
    }

    pub fn stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Effective fill after resolving the `color` alias.
    pub fn fill_color(&self) -> Option<Color> {
        self.color.or(self.fill)
    }

    fn validate(&self) -> EditResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(EditError::validation("stroke width must be finite and >= 0"));
        }
        if !self.radius.is_finite() {
            return Err(EditError::validation("corner radius must be finite"));
        }
        Ok(())
    }
}

/// Encoder selection for [`Editor::save`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Inferred from the file extension when `None`.
    pub format: Option<ImageFormat>,
    /// JPEG quality, 1..=100.
    pub quality: Option<u8>,
}

impl ExportOptions {
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }
}

const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Chainable editor over one RGBA surface.
///
/// Every operation runs on the blocking pool via [`offload`], replaces the owned surface with its
/// result and hands back `&mut Self`:
///
/// ```no_run
/// # async fn demo() -> easel::EditResult<()> {
/// use easel::{Canvas, Color, Editor, ShapeStyle};
///
/// let canvas = Canvas::new((200, 100), Some(Color::RED))?;
/// let mut editor = Editor::new(&canvas)?;
/// editor
///     .rectangle((10.0, 10.0), 50.0, 20.0, ShapeStyle::default().color(Color::BLUE))
///     .await?
///     .blur(easel::BlurMode::Gaussian, 1.0)
///     .await?;
/// editor.save("card.png", Default::default()).await?;
/// # Ok(())
/// # }
/// ```
///
/// Surfaces taken from a [`crate::Canvas`] or another editor are shared until the first
/// operation; the source is never written to.
#[derive(Clone, Debug)]
pub struct Editor {
    surface: Arc<RgbaImage>,
}

impl Editor {
    /// Build an editor, decoding on the calling thread.
    pub fn new(source: impl Into<ImageSource>) -> EditResult<Self> {
        Ok(Self {
            surface: source.into().into_surface()?,
        })
    }

    /// Build an editor, decoding on the blocking pool.
    pub async fn load(source: impl Into<ImageSource>) -> EditResult<Self> {
        let source = source.into();
        let surface = offload(move || source.into_surface()).await?;
        Ok(Self { surface })
    }

    pub async fn from_url(url: &str) -> EditResult<Self> {
        let image = remote::load_image(url).await?;
        Ok(Self {
            surface: Arc::new(image),
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.surface.width(), self.surface.height())
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn into_surface(self) -> RgbaImage {
        Arc::unwrap_or_clone(self.surface)
    }

    pub(crate) fn shared_surface(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.surface)
    }

    /// PNG encoding of the current surface, positioned at the start.
    pub fn image_bytes(&self) -> EditResult<Cursor<Vec<u8>>> {
        let mut out = Cursor::new(Vec::new());
        encode_to(&self.surface, &mut out, ImageFormat::Png, None)
            .map_err(|e| EditError::export(format!("encode png: {e}")))?;
        out.set_position(0);
        Ok(out)
    }

    async fn apply<F>(&mut self, f: F) -> EditResult<&mut Self>
    where
        F: FnOnce(&RgbaImage) -> EditResult<RgbaImage> + Send + 'static,
    {
        let src = Arc::clone(&self.surface);
        let out = offload(move || f(&src)).await?;
        self.surface = Arc::new(out);
        Ok(self)
    }

    async fn draw<F>(&mut self, f: F) -> EditResult<&mut Self>
    where
        F: FnOnce(&mut DrawContext) -> EditResult<()> + Send + 'static,
    {
        self.apply(move |src| draw_over(src, f)).await
    }

    /// Scale to exactly `size`. With `crop`, first trim the source symmetrically to the target
    /// aspect ratio so nothing is distorted.
    #[tracing::instrument(level = "debug", skip_all, fields(crop = crop))]
    pub async fn resize(&mut self, size: impl Into<Size>, crop: bool) -> EditResult<&mut Self> {
        let size = size.into();
        tracing::debug!(width = size.width, height = size.height, "resize");
        self.apply(move |src| resize_surface(src, size, crop)).await
    }

    /// Clear the corners outside a rounded rectangle inset by `offset`.
    #[tracing::instrument(level = "debug", skip_all, fields(radius = radius, offset = offset))]
    pub async fn rounded_corners(&mut self, radius: f64, offset: f64) -> EditResult<&mut Self> {
        if !radius.is_finite() || !offset.is_finite() {
            return Err(EditError::validation("rounded corner radius/offset must be finite"));
        }
        self.apply(move |src| {
            let (w, h) = src.dimensions();
            let full = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
            let shape = rect_path(inset_rect(full, offset.max(0.0)), radius);
            let cov = coverage(w, h, |ctx| {
                fill_shape(ctx, &shape, Color::WHITE);
                Ok(())
            })?;
            mask_through(src, &cov)
        })
        .await
    }

    /// Keep only the ellipse inscribed in the surface bounds.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn circle_image(&mut self) -> EditResult<&mut Self> {
        self.apply(|src| {
            let (w, h) = src.dimensions();
            let shape = ellipse_path(Rect::new(0.0, 0.0, f64::from(w), f64::from(h)));
            let cov = coverage(w, h, |ctx| {
                fill_shape(ctx, &shape, Color::WHITE);
                Ok(())
            })?;
            mask_through(src, &cov)
        })
        .await
    }

    /// Rotate counter-clockwise about the center. `expand` grows the surface to the rotated bounds.
    #[tracing::instrument(level = "debug", skip_all, fields(degrees = degrees, expand = expand))]
    pub async fn rotate(&mut self, degrees: f64, expand: bool) -> EditResult<&mut Self> {
        if !degrees.is_finite() {
            return Err(EditError::validation("rotation must be finite"));
        }
        self.apply(move |src| rotate_surface(src, degrees, expand)).await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(mode = ?mode, amount = amount))]
    pub async fn blur(&mut self, mode: BlurMode, amount: f32) -> EditResult<&mut Self> {
        self.apply(move |src| blur_image(src, mode, amount)).await
    }

    /// Linear blend with `other`, resized with crop when sizes differ.
    ///
    /// With `on_top == false` the result runs from `other` (`alpha = 0`) to this surface
    /// (`alpha = 1`); `on_top == true` swaps the two.
    #[tracing::instrument(level = "debug", skip_all, fields(alpha = alpha, on_top = on_top))]
    pub async fn blend(
        &mut self,
        other: impl Into<ImageSource>,
        alpha: f32,
        on_top: bool,
    ) -> EditResult<&mut Self> {
        let other = other.into();
        self.apply(move |src| {
            let other = other.into_surface()?;
            let resized;
            let other: &RgbaImage = if other.dimensions() == src.dimensions() {
                &other
            } else {
                resized = resize_surface(&other, Size::new(src.width(), src.height()), true)?;
                &resized
            };
            if on_top {
                lerp(src, other, alpha)
            } else {
                lerp(other, src, alpha)
            }
        })
        .await
    }

    /// Alpha-composite `image` with its top-left at `position`.
    #[tracing::instrument(level = "debug", skip_all, fields(x = position.0, y = position.1))]
    pub async fn paste(
        &mut self,
        image: impl Into<ImageSource>,
        position: (i64, i64),
    ) -> EditResult<&mut Self> {
        let image = image.into();
        self.apply(move |src| paste_surface(src, image, position, None)).await
    }

    /// Like [`Editor::paste`], with `mask`'s alpha scaling each pasted pixel.
    #[tracing::instrument(level = "debug", skip_all, fields(x = position.0, y = position.1))]
    pub async fn paste_with_mask(
        &mut self,
        image: impl Into<ImageSource>,
        position: (i64, i64),
        mask: impl Into<ImageSource>,
    ) -> EditResult<&mut Self> {
        let image = image.into();
        let mask = mask.into();
        self.apply(move |src| paste_surface(src, image, position, Some(mask))).await
    }

    /// Draw one run of text whose top edge sits at `position.y`.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(len = text.len(), align = ?style.align)
    )]
    pub async fn text(
        &mut self,
        position: impl Into<Point>,
        text: &str,
        font: &Font,
        style: TextStyle,
    ) -> EditResult<&mut Self> {
        let position = position.into();
        let text = text.to_owned();
        let font = font.clone();
        self.draw(move |ctx| draw_text(ctx, position, &text, &font, &style)).await
    }

    /// Draw consecutive differently styled segments on one line.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(segments = texts.len(), align = ?style.align)
    )]
    pub async fn multicolor_text(
        &mut self,
        position: impl Into<Point>,
        texts: &[Text],
        style: MulticolorStyle,
    ) -> EditResult<&mut Self> {
        let position = position.into();
        let texts = texts.to_vec();
        self.draw(move |ctx| draw_multicolor(ctx, position, &texts, &style)).await
    }

    /// Rectangle from `position` to `position + (width, height)`; rounded when `style.radius > 0`.
    #[tracing::instrument(level = "debug", skip_all, fields(width = width, height = height))]
    pub async fn rectangle(
        &mut self,
        position: impl Into<Point>,
        width: f64,
        height: f64,
        style: ShapeStyle,
    ) -> EditResult<&mut Self> {
        style.validate()?;
        let rect = Rect::from_origin_size(position.into(), (width, height));
        self.draw(move |ctx| {
            draw_box(ctx, rect, &style);
            Ok(())
        })
        .await
    }

    /// Progress bar `max_width * percentage / 100` wide.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(max_width = max_width, percentage = percentage)
    )]
    pub async fn bar(
        &mut self,
        position: impl Into<Point>,
        max_width: f64,
        height: f64,
        percentage: f64,
        style: ShapeStyle,
    ) -> EditResult<&mut Self> {
        style.validate()?;
        let width = bar_width(max_width, percentage);
        let rect = Rect::from_origin_size(position.into(), (width, height));
        self.draw(move |ctx| {
            if width > 0.0 {
                draw_box(ctx, rect, &style);
            }
            Ok(())
        })
        .await
    }

    /// Circular progress: an arc from twelve o'clock sweeping `percentage * 3.6` degrees.
    #[tracing::instrument(level = "debug", skip_all, fields(percentage = percentage))]
    pub async fn rounded_bar(
        &mut self,
        position: impl Into<Point>,
        width: f64,
        height: f64,
        percentage: f64,
        style: ShapeStyle,
    ) -> EditResult<&mut Self> {
        style.validate()?;
        let (start, end) = progress_arc(percentage);
        let rect = Rect::from_origin_size(position.into(), (width, height));
        self.draw(move |ctx| {
            draw_arc(ctx, rect, start, end, &style);
            Ok(())
        })
        .await
    }

    #[tracing::instrument(level = "debug", skip_all, fields(width = width, height = height))]
    pub async fn ellipse(
        &mut self,
        position: impl Into<Point>,
        width: f64,
        height: f64,
        style: ShapeStyle,
    ) -> EditResult<&mut Self> {
        style.validate()?;
        let rect = Rect::from_origin_size(position.into(), (width, height));
        self.draw(move |ctx| {
            draw_ellipse(ctx, rect, &style);
            Ok(())
        })
        .await
    }

    /// Closed polygon through `points`, outline centered on the edges.
    #[tracing::instrument(level = "debug", skip_all, fields(points = points.len()))]
    pub async fn polygon(&mut self, points: &[Point], style: ShapeStyle) -> EditResult<&mut Self> {
        style.validate()?;
        let path = polygon_path(points);
        self.draw(move |ctx| {
            if let Some(fill) = style.fill_color() {
                fill_shape(ctx, &path, fill);
            }
            if let Some(outline) = style.outline {
                stroke_shape(ctx, &path, style.stroke_width, outline);
            }
            Ok(())
        })
        .await
    }

    /// Arc inscribed in the box, from `start` to `rotation` degrees with zero at twelve o'clock.
    #[tracing::instrument(level = "debug", skip_all, fields(start = start, rotation = rotation))]
    pub async fn arc(
        &mut self,
        position: impl Into<Point>,
        width: f64,
        height: f64,
        start: f64,
        rotation: f64,
        style: ShapeStyle,
    ) -> EditResult<&mut Self> {
        style.validate()?;
        if !start.is_finite() || !rotation.is_finite() {
            return Err(EditError::validation("arc angles must be finite"));
        }
        let rect = Rect::from_origin_size(position.into(), (width, height));
        self.draw(move |ctx| {
            draw_arc(ctx, rect, start - 90.0, rotation - 90.0, &style);
            Ok(())
        })
        .await
    }

    /// Write the surface to `path`; the format comes from `options` or the extension.
    #[tracing::instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn save(&self, path: impl AsRef<Path>, options: ExportOptions) -> EditResult<()> {
        let path = path.as_ref().to_path_buf();
        let surface = Arc::clone(&self.surface);
        offload(move || export(&surface, &path, options)).await
    }

    /// Write a PNG to the temp directory and hand it to the platform viewer.
    pub async fn show(&self) -> EditResult<PathBuf> {
        show_surface(Arc::clone(&self.surface)).await
    }
}

pub(crate) fn resize_surface(src: &RgbaImage, size: Size, crop: bool) -> EditResult<RgbaImage> {
    if size.width == 0 || size.height == 0 {
        return Err(EditError::validation("resize target must be non-zero"));
    }
    let src_size = Size::new(src.width(), src.height());
    if crop && let Some(b) = crop_box_for_aspect(src_size, size) {
        let view = image::imageops::crop_imm(src, b.x, b.y, b.width, b.height).to_image();
        return Ok(image::imageops::resize(
            &view,
            size.width,
            size.height,
            FilterType::Lanczos3,
        ));
    }
    Ok(image::imageops::resize(
        src,
        size.width,
        size.height,
        FilterType::Lanczos3,
    ))
}

fn rotate_surface(src: &RgbaImage, degrees: f64, expand: bool) -> EditResult<RgbaImage> {
    let turn = degrees.rem_euclid(360.0);
    let quarter_ok = expand || src.width() == src.height();
    if turn == 0.0 {
        return Ok(src.clone());
    } else if turn == 180.0 {
        return Ok(image::imageops::rotate180(src));
    } else if turn == 90.0 && quarter_ok {
        return Ok(image::imageops::rotate270(src));
    } else if turn == 270.0 && quarter_ok {
        return Ok(image::imageops::rotate90(src));
    }

    let (w, h) = (f64::from(src.width()), f64::from(src.height()));
    let out = if expand {
        rotated_bounds(Size::new(src.width(), src.height()), degrees)
    } else {
        Size::new(src.width(), src.height())
    };
    let transform = Affine::translate((f64::from(out.width) / 2.0, f64::from(out.height) / 2.0))
        * Affine::rotate(-degrees.to_radians())
        * Affine::translate((-w / 2.0, -h / 2.0));
    transform_image(src, transform, out.width, out.height)
}

fn paste_surface(
    src: &RgbaImage,
    image: ImageSource,
    (x, y): (i64, i64),
    mask: Option<ImageSource>,
) -> EditResult<RgbaImage> {
    let image = image.into_surface()?;
    let mask = mask.map(ImageSource::into_surface).transpose()?;
    let mut layer = RgbaImage::new(src.width(), src.height());
    paste_into(&mut layer, &image, x, y, mask.as_deref())?;
    let mut out = src.clone();
    alpha_composite(&mut out, &layer)?;
    Ok(out)
}

/// Fill and inside outline of a plain or rounded box.
fn draw_box(ctx: &mut DrawContext, rect: Rect, style: &ShapeStyle) {
    let rect = rect.abs();
    if let Some(fill) = style.fill_color() {
        fill_shape(ctx, &rect_path(rect, style.radius), fill);
    }
    if let Some(outline) = style.outline {
        let half = style.stroke_width / 2.0;
        let inner = rect_path(inset_rect(rect, half), (style.radius - half).max(0.0));
        stroke_shape(ctx, &inner, style.stroke_width, outline);
    }
}

fn draw_ellipse(ctx: &mut DrawContext, rect: Rect, style: &ShapeStyle) {
    let rect = rect.abs();
    if let Some(fill) = style.fill_color() {
        fill_shape(ctx, &ellipse_path(rect), fill);
    }
    if let Some(outline) = style.outline {
        let inner = ellipse_path(inset_rect(rect, style.stroke_width / 2.0));
        stroke_shape(ctx, &inner, style.stroke_width, outline);
    }
}

/// Arc ink is the fill color, then the outline color, then black.
fn draw_arc(ctx: &mut DrawContext, rect: Rect, start: f64, end: f64, style: &ShapeStyle) {
    let (start, sweep) = normalize_arc(start, end);
    if sweep <= 0.0 {
        return;
    }
    let ink = style.fill_color().or(style.outline).unwrap_or(Color::BLACK);
    let inner = inset_rect(rect.abs(), style.stroke_width / 2.0);
    stroke_shape(ctx, &arc_path(inner, start, sweep), style.stroke_width, ink);
}

pub(crate) fn export(surface: &RgbaImage, path: &Path, options: ExportOptions) -> EditResult<()> {
    let format = match options.format {
        Some(f) => f,
        None => ImageFormat::from_path(path).map_err(|e| {
            EditError::export(format!("unknown image format for \"{}\": {e}", path.display()))
        })?,
    };
    let file = File::create(path)
        .map_err(|e| EditError::export(format!("create \"{}\": {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    encode_to(surface, &mut writer, format, options.quality)
        .map_err(|e| EditError::export(format!("encode {format:?} \"{}\": {e}", path.display())))?;
    writer
        .flush()
        .map_err(|e| EditError::export(format!("flush \"{}\": {e}", path.display())))?;
    tracing::debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}

fn encode_to<W: Write + Seek>(
    surface: &RgbaImage,
    writer: &mut W,
    format: ImageFormat,
    quality: Option<u8>,
) -> image::ImageResult<()> {
    match format {
        ImageFormat::Jpeg => {
            let rgb = image::DynamicImage::ImageRgba8(surface.clone()).into_rgb8();
            let quality = quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100);
            image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality).encode_image(&rgb)
        }
        _ => surface.write_to(writer, format),
    }
}

pub(crate) async fn show_surface(surface: Arc<RgbaImage>) -> EditResult<PathBuf> {
    offload(move || {
        let path = std::env::temp_dir().join(format!(
            "easel-{}-{}.png",
            std::process::id(),
            SHOW_COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
        ));
        export(&surface, &path, ExportOptions::default().format(ImageFormat::Png))?;

        let opener = if cfg!(target_os = "macos") {
            std::process::Command::new("open").arg(&path).spawn()
        } else if cfg!(target_os = "windows") {
            std::process::Command::new("cmd")
                .args(["/C", "start", ""])
                .arg(&path)
                .spawn()
        } else {
            std::process::Command::new("xdg-open").arg(&path).spawn()
        };
        if let Err(err) = opener {
            tracing::warn!(path = %path.display(), %err, "no image viewer available");
        }
        Ok(path)
    })
    .await
}

static SHOW_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

#[cfg(test)]
#[path = "../tests/unit/editor.rs"]
mod tests;
