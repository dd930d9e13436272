use std::str::FromStr;

use image::RgbaImage;

use crate::{
    composite::{premultiply_in_place, unpremultiply_in_place},
    foundation::error::{EditError, EditResult},
};

/// Convolution kernel used by [`crate::Editor::blur`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlurMode {
    Box,
    #[default]
    Gaussian,
}

impl FromStr for BlurMode {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "box" => Ok(Self::Box),
            "gaussian" => Ok(Self::Gaussian),
            other => Err(EditError::validation(format!("unknown blur mode \"{other}\""))),
        }
    }
}

/// Blur a straight-alpha surface. `amount` is the box radius or the gaussian standard deviation.
pub fn blur_image(src: &RgbaImage, mode: BlurMode, amount: f32) -> EditResult<RgbaImage> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(EditError::validation("blur amount must be finite and >= 0"));
    }
    let kernel = match mode {
        BlurMode::Box => box_kernel_q16(amount)?,
        BlurMode::Gaussian => {
            let radius = (amount * 3.0).ceil() as u32;
            gaussian_kernel_q16(radius, amount)?
        }
    };

    let (width, height) = src.dimensions();
    let mut premul = src.as_raw().clone();
    premultiply_in_place(&mut premul);
    let mut out = blur_rgba8_premul_q16(&premul, width, height, &kernel)?;
    unpremultiply_in_place(&mut out);
    RgbaImage::from_raw(width, height, out)
        .ok_or_else(|| EditError::render("blur buffer size mismatch"))
}

pub fn blur_rgba8_premul_q16(
    src: &[u8],
    width: u32,
    height: u32,
    kernel_q16: &[u32],
) -> EditResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| EditError::render("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(EditError::render(
            "blur expects src matching width*height*4",
        ));
    }
    if kernel_q16.len() <= 1 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];
    horizontal_pass(src, &mut tmp, width, height, kernel_q16);
    vertical_pass(&tmp, &mut out, width, height, kernel_q16);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> EditResult<Vec<u32>> {
    if radius == 0 || sigma == 0.0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(EditError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = i as f64;
            (-x * x / denom).exp()
        })
        .collect();
    quantize_q16(&weights_f)
}

/// Normalized box of `radius` taps each side; a fractional radius weights the outermost taps.
fn box_kernel_q16(radius: f32) -> EditResult<Vec<u32>> {
    if radius <= 0.0 {
        return Ok(vec![1 << 16]);
    }
    let whole = radius.floor() as i32;
    let frac = f64::from(radius - radius.floor());
    let r = if frac > 0.0 { whole + 1 } else { whole };
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| if i.abs() <= whole { 1.0 } else { frac })
        .collect();
    quantize_q16(&weights_f)
}

fn quantize_q16(weights_f: &[f64]) -> EditResult<Vec<u32>> {
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(EditError::render("blur kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let target: i64 = 65536;
    let delta = target - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        let new_mid = (mid_val + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../tests/unit/blur.rs"]
mod tests;
