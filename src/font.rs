use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};

use crate::{
    config::settings,
    foundation::error::{EditError, EditResult},
};

/// Point size used when a caller does not pick one.
pub const DEFAULT_SIZE: u32 = 10;

/// Extra loading options for font files that hold more than one face.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FontOptions {
    /// Face index inside a font collection.
    pub index: u32,
}

/// A loaded font face at a fixed point size.
///
/// Cloning is cheap; the font bytes are shared.
#[derive(Clone)]
pub struct Font {
    data: Arc<Vec<u8>>,
    index: u32,
    size: u32,
    family_name: String,
    layout_blob: parley::fontique::Blob<u8>,
    glyph_font: vello_cpu::peniko::FontData,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("family_name", &self.family_name)
            .field("index", &self.index)
            .field("size", &self.size)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl Font {
    /// Load the first face of the font file at `path`.
    pub fn new(path: impl AsRef<Path>, size: u32) -> EditResult<Self> {
        Self::with_options(path, size, FontOptions::default())
    }

    pub fn with_options(
        path: impl AsRef<Path>,
        size: u32,
        options: FontOptions,
    ) -> EditResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| EditError::font_load(format!("read \"{}\": {e}", path.display())))?;
        Self::from_bytes_with_options(bytes, size, options)
            .map_err(|e| match e {
                EditError::FontLoad(msg) => {
                    EditError::font_load(format!("\"{}\": {msg}", path.display()))
                }
                other => other,
            })
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>, size: u32) -> EditResult<Self> {
        Self::from_bytes_with_options(bytes, size, FontOptions::default())
    }

    pub fn from_bytes_with_options(
        bytes: impl Into<Vec<u8>>,
        size: u32,
        options: FontOptions,
    ) -> EditResult<Self> {
        if size == 0 {
            return Err(EditError::validation("font size must be > 0"));
        }
        let data: Arc<Vec<u8>> = Arc::new(bytes.into());
        let layout_blob = parley::fontique::Blob::new(Arc::clone(&data) as _);
        let family_name = probe_family_name(&layout_blob, options.index)?;
        let glyph_font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::new(Arc::clone(&data) as _),
            options.index,
        );
        Ok(Self {
            data,
            index: options.index,
            size,
            family_name,
            layout_blob,
            glyph_font,
        })
    }

    /// Load a face from the bundled catalog.
    pub fn family(family: FontFamily, variant: FontVariant, size: u32) -> EditResult<Self> {
        Self::new(family.path_in(&settings().font_dir, variant), size)
    }

    pub fn dejavu_sans(variant: FontVariant, size: u32) -> EditResult<Self> {
        Self::family(FontFamily::DejaVuSans, variant, size)
    }

    pub fn dejavu_serif(variant: FontVariant, size: u32) -> EditResult<Self> {
        Self::family(FontFamily::DejaVuSerif, variant, size)
    }

    pub fn dejavu_sans_mono(variant: FontVariant, size: u32) -> EditResult<Self> {
        Self::family(FontFamily::DejaVuSansMono, variant, size)
    }

    /// Same face at another size.
    pub fn resized(&self, size: u32) -> EditResult<Self> {
        if size == 0 {
            return Err(EditError::validation("font size must be > 0"));
        }
        Ok(Self {
            size,
            ..self.clone()
        })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle over the font bytes for parley registration.
    pub(crate) fn layout_blob(&self) -> &parley::fontique::Blob<u8> {
        &self.layout_blob
    }

    pub(crate) fn glyph_font(&self) -> &vello_cpu::peniko::FontData {
        &self.glyph_font
    }
}

/// Name of the family that owns face `index` in `blob`, or a font-load error if there is none.
pub(crate) fn probe_family_name(
    blob: &parley::fontique::Blob<u8>,
    index: u32,
) -> EditResult<String> {
    let mut font_ctx = parley::FontContext::default();
    let families = font_ctx.collection.register_fonts(blob.clone(), None);
    let family_id = families
        .iter()
        .find(|(_, faces)| faces.iter().any(|f| f.index() == index))
        .map(|(id, _)| *id)
        .ok_or_else(|| {
            if families.is_empty() {
                EditError::font_load("no usable font face in data")
            } else {
                EditError::font_load(format!("no font face at index {index}"))
            }
        })?;

    font_ctx
        .collection
        .family_name(family_id)
        .map(str::to_owned)
        .ok_or_else(|| EditError::font_load("registered font family has no name"))
}

/// Families shipped under the catalog directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    DejaVuSans,
    DejaVuSerif,
    DejaVuSansMono,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Italic,
    Light,
}

impl FontFamily {
    pub const ALL: [FontFamily; 3] = [
        FontFamily::DejaVuSans,
        FontFamily::DejaVuSerif,
        FontFamily::DejaVuSansMono,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            FontFamily::DejaVuSans => "dejavu-sans",
            FontFamily::DejaVuSerif => "dejavu-serif",
            FontFamily::DejaVuSansMono => "dejavu-sans-mono",
        }
    }

    /// Variants with their own file; anything else resolves to regular.
    pub fn variants(self) -> &'static [FontVariant] {
        match self {
            FontFamily::DejaVuSans => &[
                FontVariant::Regular,
                FontVariant::Bold,
                FontVariant::Italic,
                FontVariant::Light,
            ],
            FontFamily::DejaVuSerif | FontFamily::DejaVuSansMono => {
                &[FontVariant::Regular, FontVariant::Bold, FontVariant::Italic]
            }
        }
    }

    pub fn path_in(self, root: &Path, variant: FontVariant) -> PathBuf {
        let variant = if self.variants().contains(&variant) {
            variant
        } else {
            FontVariant::Regular
        };
        root.join(self.dir_name())
            .join(format!("{}.ttf", variant.as_str()))
    }
}

impl FontVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            FontVariant::Regular => "regular",
            FontVariant::Bold => "bold",
            FontVariant::Italic => "italic",
            FontVariant::Light => "light",
        }
    }
}

impl FromStr for FontFamily {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        FontFamily::ALL
            .into_iter()
            .find(|f| f.dir_name() == key)
            .ok_or_else(|| EditError::lookup(format!("unknown font family \"{s}\"")))
    }
}

impl FromStr for FontVariant {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            "light" => Ok(Self::Light),
            _ => Err(EditError::lookup(format!("unknown font variant \"{s}\""))),
        }
    }
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../tests/unit/font.rs"]
mod tests;
