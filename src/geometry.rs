//! Pure dimension and angle math shared by the editor operations.

use crate::foundation::core::Size;

/// Integer crop region inside a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Centered crop of `src` that has the aspect ratio of `target`.
///
/// Returns `None` when the aspect ratios already match, so callers can skip the crop and the
/// result is identical to a plain resize.
pub fn crop_box_for_aspect(src: Size, target: Size) -> Option<CropBox> {
    let (w, h) = (u64::from(src.width), u64::from(src.height));
    let (tw, th) = (u64::from(target.width), u64::from(target.height));
    if w == 0 || h == 0 || tw == 0 || th == 0 {
        return None;
    }

    let lhs = w * th;
    let rhs = tw * h;
    if lhs == rhs {
        return None;
    }

    if lhs > rhs {
        // Wider than the target: trim left and right.
        let new_w = ((h * tw) / th).max(1);
        let offset = (w - new_w) / 2;
        Some(CropBox {
            x: offset as u32,
            y: 0,
            width: new_w as u32,
            height: src.height,
        })
    } else {
        let new_h = ((w * th) / tw).max(1);
        let offset = (h - new_h) / 2;
        Some(CropBox {
            x: 0,
            y: offset as u32,
            width: src.width,
            height: new_h as u32,
        })
    }
}

/// Bounding size of `size` rotated by `degrees`.
pub fn rotated_bounds(size: Size, degrees: f64) -> Size {
    let rad = degrees.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let w = f64::from(size.width);
    let h = f64::from(size.height);
    let snap = |v: f64| ((v - 1e-6).ceil().max(1.0)) as u32;
    Size::new(snap(w * cos + h * sin), snap(w * sin + h * cos))
}

/// Normalize an arc given as `start..end` degrees into `(start, sweep)`.
///
/// Angles run clockwise in image space. An `end` below `start` wraps once; any span of a full
/// turn or more yields a sweep of exactly 360.
pub fn normalize_arc(start: f64, end: f64) -> (f64, f64) {
    if end - start >= 360.0 {
        return (start.rem_euclid(360.0), 360.0);
    }
    let s = start.rem_euclid(360.0);
    let mut e = end.rem_euclid(360.0);
    if e < s {
        e += 360.0;
    }
    (s, e - s)
}

/// Arc angles of a circular progress indicator: 0% at twelve o'clock, 100% a full turn.
pub fn progress_arc(percentage: f64) -> (f64, f64) {
    (-90.0, percentage * 3.6 - 90.0)
}

/// Filled width of a horizontal progress bar.
pub fn bar_width(max_width: f64, percentage: f64) -> f64 {
    max_width / 100.0 * percentage
}

#[cfg(test)]
#[path = "../tests/unit/geometry.rs"]
mod tests;
