use crate::foundation::error::{EditError, EditResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel dimensions of a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a size without validation.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl From<Size> for (u32, u32) {
    fn from(s: Size) -> Self {
        (s.width, s.height)
    }
}

/// Resolve a surface size from either an explicit `width`/`height` pair or a `size` tuple.
///
/// A complete `width`/`height` pair takes precedence over `size`. Missing or zero dimensions
/// are configuration errors.
pub fn resolve_size(
    size: Option<Size>,
    width: Option<u32>,
    height: Option<u32>,
) -> EditResult<Size> {
    let resolved = match (width, height, size) {
        (Some(w), Some(h), _) => Size::new(w, h),
        (_, _, Some(s)) => s,
        _ => {
            return Err(EditError::configuration(
                "size, or both width and height, must be provided",
            ));
        }
    };
    if resolved.width == 0 || resolved.height == 0 {
        return Err(EditError::configuration(format!(
            "surface dimensions must be positive, got {}x{}",
            resolved.width, resolved.height
        )));
    }
    Ok(resolved)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
