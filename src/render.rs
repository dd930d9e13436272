//! Bridge between `image` surfaces and the `vello_cpu` rasterizer.
//!
//! Marks are rendered into a fresh transparent layer and then composited over a copy of the
//! target surface, so the rasterizer never samples the surface it draws onto.

use std::sync::Arc;

use image::RgbaImage;
use kurbo::{BezPath, Shape};

use crate::{
    color::Color,
    composite::{composite_premul_layer, premultiply_in_place, unpremultiply_in_place},
    foundation::core::{Affine, Point, Rect},
    foundation::error::{EditError, EditResult},
};

const PATH_TOLERANCE: f64 = 0.1;

pub(crate) type DrawContext = vello_cpu::RenderContext;

/// Rasterizer dimensions are 16-bit.
pub(crate) fn layer_dims(width: u32, height: u32) -> EditResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| EditError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| EditError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

/// Run `draw` against a transparent `width`x`height` layer and return its premultiplied RGBA8.
pub(crate) fn render_layer(
    width: u32,
    height: u32,
    draw: impl FnOnce(&mut DrawContext) -> EditResult<()>,
) -> EditResult<Vec<u8>> {
    let (w, h) = layer_dims(width, height)?;
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    draw(&mut ctx)?;
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

/// Draw marks on top of `surface`, returning the composited copy.
pub(crate) fn draw_over(
    surface: &RgbaImage,
    draw: impl FnOnce(&mut DrawContext) -> EditResult<()>,
) -> EditResult<RgbaImage> {
    let layer = render_layer(surface.width(), surface.height(), draw)?;
    let mut out = surface.clone();
    composite_premul_layer(&mut out, &layer)?;
    Ok(out)
}

/// Per-pixel coverage (0..=255) of whatever `draw` paints.
pub(crate) fn coverage(
    width: u32,
    height: u32,
    draw: impl FnOnce(&mut DrawContext) -> EditResult<()>,
) -> EditResult<Vec<u8>> {
    let layer = render_layer(width, height, draw)?;
    Ok(layer.chunks_exact(4).map(|px| px[3]).collect())
}

/// Premultiplied layer bytes to a straight-alpha surface.
pub(crate) fn layer_to_image(mut layer: Vec<u8>, width: u32, height: u32) -> EditResult<RgbaImage> {
    unpremultiply_in_place(&mut layer);
    RgbaImage::from_raw(width, height, layer)
        .ok_or_else(|| EditError::render("layer byte length mismatch"))
}

/// Straight-alpha surface to a rasterizer image paint.
pub(crate) fn image_paint(img: &RgbaImage) -> EditResult<vello_cpu::Image> {
    let (w, h) = layer_dims(img.width(), img.height())?;
    let mut premul = img.as_raw().clone();
    premultiply_in_place(&mut premul);

    let mut may_have_opacities = false;
    let pixels = premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect::<Vec<_>>();

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Paint `img` through `transform` into a transparent `width`x`height` surface.
pub(crate) fn transform_image(
    img: &RgbaImage,
    transform: Affine,
    width: u32,
    height: u32,
) -> EditResult<RgbaImage> {
    let paint = image_paint(img)?;
    let (iw, ih) = (f64::from(img.width()), f64::from(img.height()));
    let layer = render_layer(width, height, |ctx| {
        ctx.set_transform(affine_to_cpu(transform));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, iw, ih));
        Ok(())
    })?;
    layer_to_image(layer, width, height)
}

pub(crate) fn fill_shape(ctx: &mut DrawContext, shape: &impl Shape, color: Color) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color.to_paint());
    ctx.fill_path(&shape_to_cpu(shape));
}

pub(crate) fn stroke_shape(ctx: &mut DrawContext, shape: &impl Shape, width: f64, color: Color) {
    if width <= 0.0 {
        return;
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(color.to_paint());
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
    ctx.stroke_path(&shape_to_cpu(shape));
}

/// Axis-aligned box shrunk by `inset` on every side, never inverted.
pub(crate) fn inset_rect(rect: Rect, inset: f64) -> Rect {
    let r = rect.abs();
    let dx = inset.min(r.width() / 2.0);
    let dy = inset.min(r.height() / 2.0);
    Rect::new(r.x0 + dx, r.y0 + dy, r.x1 - dx, r.y1 - dy)
}

/// Plain or rounded rectangle path depending on `radius`.
pub(crate) fn rect_path(rect: Rect, radius: f64) -> BezPath {
    if radius > 0.0 {
        let r = radius.min(rect.width().min(rect.height()) / 2.0).max(0.0);
        kurbo::RoundedRect::from_rect(rect, r).to_path(PATH_TOLERANCE)
    } else {
        rect.to_path(PATH_TOLERANCE)
    }
}

/// Ellipse inscribed in `rect`.
pub(crate) fn ellipse_path(rect: Rect) -> BezPath {
    kurbo::Ellipse::from_rect(rect).to_path(PATH_TOLERANCE)
}

/// Open elliptical arc inscribed in `rect`; angles in degrees, clockwise from three o'clock.
///
/// A full-turn sweep produces the same closed path as [`ellipse_path`].
pub(crate) fn arc_path(rect: Rect, start_deg: f64, sweep_deg: f64) -> BezPath {
    if sweep_deg >= 360.0 {
        return ellipse_path(rect);
    }
    let arc = kurbo::Arc::new(
        rect.center(),
        (rect.width() / 2.0, rect.height() / 2.0),
        start_deg.to_radians(),
        sweep_deg.to_radians(),
        0.0,
    );
    let mut path = BezPath::new();
    for el in arc.path_elements(PATH_TOLERANCE) {
        path.push(el);
    }
    path
}

/// Closed polygon through `points`. Fewer than two points yields an empty path.
pub(crate) fn polygon_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let [first, rest @ ..] = points else {
        return path;
    };
    if rest.is_empty() {
        return path;
    }
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path.close_path();
    path
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    let mut path = BezPath::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        path.push(el);
    }
    bezpath_to_cpu(&path)
}

pub(crate) fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
