use std::{
    io::Cursor,
    path::{Path, PathBuf},
    sync::Arc,
};

use image::{DynamicImage, RgbaImage};

use crate::{
    canvas::Canvas,
    editor::Editor,
    foundation::error::{EditError, EditResult},
    mask::Mask,
};

/// Anything an [`Editor`] can be built from or composite with.
///
/// Surfaces are shared, not copied. Paths and bytes are decoded by [`ImageSource::into_surface`],
/// which is blocking and is called from inside offloaded work.
#[derive(Clone, Debug)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    Surface(Arc<RgbaImage>),
}

impl ImageSource {
    /// Normalize into an RGBA surface.
    pub fn into_surface(self) -> EditResult<Arc<RgbaImage>> {
        match self {
            ImageSource::Surface(s) => Ok(s),
            ImageSource::Bytes(bytes) => decode_rgba(&bytes).map(Arc::new),
            ImageSource::Path(path) => {
                let bytes = std::fs::read(&path)?;
                decode_rgba(&bytes)
                    .map_err(|e| EditError::decode(format!("{}: {e}", path.display())))
                    .map(Arc::new)
            }
        }
    }
}

/// Decode encoded image bytes and convert them to RGBA8.
pub fn decode_rgba(bytes: &[u8]) -> EditResult<RgbaImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| EditError::decode(format!("decode image from memory: {e}")))?;
    Ok(dyn_img.into_rgba8())
}

impl From<&str> for ImageSource {
    fn from(p: &str) -> Self {
        Self::Path(PathBuf::from(p))
    }
}

impl From<String> for ImageSource {
    fn from(p: String) -> Self {
        Self::Path(PathBuf::from(p))
    }
}

impl From<&Path> for ImageSource {
    fn from(p: &Path) -> Self {
        Self::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(p: PathBuf) -> Self {
        Self::Path(p)
    }
}

impl From<&PathBuf> for ImageSource {
    fn from(p: &PathBuf) -> Self {
        Self::Path(p.clone())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<Cursor<Vec<u8>>> for ImageSource {
    fn from(c: Cursor<Vec<u8>>) -> Self {
        Self::Bytes(c.into_inner())
    }
}

impl From<RgbaImage> for ImageSource {
    fn from(img: RgbaImage) -> Self {
        Self::Surface(Arc::new(img))
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        Self::Surface(Arc::new(img.into_rgba8()))
    }
}

impl From<Arc<RgbaImage>> for ImageSource {
    fn from(img: Arc<RgbaImage>) -> Self {
        Self::Surface(img)
    }
}

impl From<&Canvas> for ImageSource {
    fn from(c: &Canvas) -> Self {
        Self::Surface(c.shared_surface())
    }
}

impl From<Canvas> for ImageSource {
    fn from(c: Canvas) -> Self {
        Self::Surface(c.shared_surface())
    }
}

impl From<&Editor> for ImageSource {
    fn from(e: &Editor) -> Self {
        Self::Surface(e.shared_surface())
    }
}

impl From<&mut Editor> for ImageSource {
    fn from(e: &mut Editor) -> Self {
        Self::Surface(e.shared_surface())
    }
}

impl From<Editor> for ImageSource {
    fn from(e: Editor) -> Self {
        Self::Surface(e.shared_surface())
    }
}

impl From<&Mask> for ImageSource {
    fn from(m: &Mask) -> Self {
        Self::Surface(m.shared_surface())
    }
}

#[cfg(test)]
#[path = "../tests/unit/source.rs"]
mod tests;
