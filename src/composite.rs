use image::RgbaImage;

use crate::foundation::error::{EditError, EditResult};

pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels, with an extra opacity multiplier on `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Alpha-composite a straight-alpha `top` over a straight-alpha `base` of equal size.
pub fn alpha_composite(base: &mut RgbaImage, top: &RgbaImage) -> EditResult<()> {
    if base.dimensions() != top.dimensions() {
        return Err(EditError::validation(format!(
            "alpha_composite size mismatch: {:?} vs {:?}",
            base.dimensions(),
            top.dimensions()
        )));
    }
    let mut top_premul = top.as_raw().clone();
    premultiply_in_place(&mut top_premul);
    composite_premul_layer(base, &top_premul)
}

/// Composite a premultiplied layer buffer over a straight-alpha surface.
///
/// Pixels where the layer is fully transparent are left bit-exact.
pub fn composite_premul_layer(base: &mut RgbaImage, layer_premul: &[u8]) -> EditResult<()> {
    let dst: &mut [u8] = base;
    if dst.len() != layer_premul.len() {
        return Err(EditError::render("composite expects equal-length rgba8 buffers"));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(layer_premul.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let mut px = [d[0], d[1], d[2], d[3]];
        premultiply_px(&mut px);
        let mut out = over(px, [s[0], s[1], s[2], s[3]], 1.0);
        unpremultiply_px(&mut out);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Per-channel linear interpolation `a + (b - a) * t` of two equal-size surfaces.
///
/// `t = 0` yields `a`, `t = 1` yields `b`.
pub fn lerp(a: &RgbaImage, b: &RgbaImage, t: f32) -> EditResult<RgbaImage> {
    if a.dimensions() != b.dimensions() {
        return Err(EditError::validation(format!(
            "blend size mismatch: {:?} vs {:?}",
            a.dimensions(),
            b.dimensions()
        )));
    }
    if !t.is_finite() {
        return Err(EditError::validation("blend alpha must be finite"));
    }
    let (w, h) = a.dimensions();
    let out: Vec<u8> = a
        .as_raw()
        .iter()
        .zip(b.as_raw().iter())
        .map(|(&x, &y)| {
            let v = f32::from(x) + (f32::from(y) - f32::from(x)) * t;
            v.round().clamp(0.0, 255.0) as u8
        })
        .collect();
    RgbaImage::from_raw(w, h, out).ok_or_else(|| EditError::render("blend buffer size mismatch"))
}

/// Keep `src` where `coverage` is opaque and fade it to transparent where it is not.
///
/// `coverage` holds one 0..=255 value per pixel, row-major.
pub fn mask_through(src: &RgbaImage, coverage: &[u8]) -> EditResult<RgbaImage> {
    let (w, h) = src.dimensions();
    if coverage.len() != (w as usize) * (h as usize) {
        return Err(EditError::validation(
            "mask coverage must have one value per pixel",
        ));
    }
    let mut out = src.clone();
    for (px, &m) in out.pixels_mut().zip(coverage) {
        let a = mul_div255(u16::from(px.0[3]), u16::from(m));
        px.0 = if a == 0 { [0, 0, 0, 0] } else { [px.0[0], px.0[1], px.0[2], a] };
    }
    Ok(out)
}

/// Copy `image` into `layer` with its top-left at `(x, y)`, clipping at the layer bounds.
///
/// With a `mask` (same size as `image`), each copied pixel's alpha is scaled by the mask's alpha.
pub fn paste_into(
    layer: &mut RgbaImage,
    image: &RgbaImage,
    x: i64,
    y: i64,
    mask: Option<&RgbaImage>,
) -> EditResult<()> {
    if let Some(m) = mask
        && m.dimensions() != image.dimensions()
    {
        return Err(EditError::validation(format!(
            "paste mask size {:?} does not match image size {:?}",
            m.dimensions(),
            image.dimensions()
        )));
    }
    let (lw, lh) = (i64::from(layer.width()), i64::from(layer.height()));
    let (iw, ih) = (i64::from(image.width()), i64::from(image.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + iw).min(lw);
    let y1 = (y + ih).min(lh);
    if x0 >= x1 || y0 >= y1 {
        return Ok(());
    }

    for ly in y0..y1 {
        for lx in x0..x1 {
            let (sx, sy) = ((lx - x) as u32, (ly - y) as u32);
            let mut px = *image.get_pixel(sx, sy);
            if let Some(m) = mask {
                px.0[3] = mul_div255(u16::from(px.0[3]), u16::from(m.get_pixel(sx, sy).0[3]));
            }
            layer.put_pixel(lx as u32, ly as u32, px);
        }
    }
    Ok(())
}

pub fn premultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        premultiply_px(px);
    }
}

pub fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        unpremultiply_px(px);
    }
}

fn premultiply_px(px: &mut [u8]) {
    let a = u16::from(px[3]);
    if a == 0 {
        px[..3].fill(0);
        return;
    }
    for c in &mut px[..3] {
        *c = ((u16::from(*c) * a + 127) / 255) as u8;
    }
}

fn unpremultiply_px(px: &mut [u8]) {
    let a = u32::from(px[3]);
    match a {
        0 => px[..3].fill(0),
        255 => {}
        _ => {
            for c in &mut px[..3] {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../tests/unit/composite.rs"]
mod tests;
