//! Font loading and text measurement.
//!
//! A [`Font`] is a parsed TTF/OTF plus a pixel size. When no path is given
//! the DejaVu Sans font bundled with this crate is used.

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{Font as _, FontArc, PxScale, ScaleFont};
use tracing::debug;

use crate::error::VisError;

/// Default font size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 30.0;

const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// A font face at a fixed pixel size.
#[derive(Clone)]
pub struct Font {
    face: FontArc,
    size: f32,
    path: Option<PathBuf>,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("size", &self.size)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Font {
    /// Load a font from `path`, or the bundled default when `path` is `None`.
    ///
    /// A path that cannot be read is an error; there is no silent fallback.
    pub fn load(path: Option<&Path>, size: f32) -> Result<Self, VisError> {
        let Some(path) = path else {
            return Self::bundled(size);
        };

        let data = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => VisError::FontNotFound {
                path: path.to_path_buf(),
            },
            _ => VisError::Io(e),
        })?;
        let face = FontArc::try_from_vec(data).map_err(|_| VisError::InvalidFont)?;
        debug!(path = %path.display(), size, "Loaded font");

        Ok(Self {
            face,
            size,
            path: Some(path.to_path_buf()),
        })
    }

    /// The bundled default font.
    pub fn bundled(size: f32) -> Result<Self, VisError> {
        let face = FontArc::try_from_slice(BUNDLED_FONT).map_err(|_| VisError::InvalidFont)?;
        Ok(Self {
            face,
            size,
            path: None,
        })
    }

    /// Same face at a different size.
    pub fn with_size(&self, size: f32) -> Self {
        Self {
            face: self.face.clone(),
            size,
            path: self.path.clone(),
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn scale(&self) -> PxScale {
        PxScale::from(self.size)
    }

    pub(crate) fn face(&self) -> &FontArc {
        &self.face
    }

    pub fn ascent(&self) -> f32 {
        self.face.as_scaled(self.scale()).ascent()
    }

    /// Height of the line box, ascender to descender.
    pub fn text_height(&self) -> u32 {
        let scaled = self.face.as_scaled(self.scale());
        (scaled.ascent() - scaled.descent()).ceil() as u32
    }

    /// Line advance including the font's line gap.
    pub fn line_height(&self) -> u32 {
        let scaled = self.face.as_scaled(self.scale());
        (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
    }

    /// Pixel width of a single line of text.
    pub fn text_width(&self, text: &str) -> u32 {
        let scaled = self.face.as_scaled(self.scale());
        let mut width = 0.0f32;
        let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

        for ch in text.chars() {
            let glyph_id = scaled.glyph_id(ch);
            if let Some(prev) = prev_glyph {
                width += scaled.kern(prev, glyph_id);
            }
            width += scaled.h_advance(glyph_id);
            prev_glyph = Some(glyph_id);
        }

        width.ceil() as u32
    }

    /// `(width, height)` of the rendered line box.
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        (self.text_width(text), self.text_height())
    }

    /// First visible character the font has no glyph for.
    pub fn missing_glyph(&self, text: &str) -> Option<char> {
        text.chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .find(|&c| self.face.glyph_id(c).0 == 0)
    }
}
