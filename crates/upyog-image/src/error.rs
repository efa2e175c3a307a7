//! Error type shared by all drawing and composition operations.

use std::path::PathBuf;

/// Errors that can occur while loading, drawing or composing images.
#[derive(Debug, thiserror::Error)]
pub enum VisError {
    #[error("Font file not found: {}", path.display())]
    FontNotFound { path: PathBuf },

    #[error("Invalid font data (only TTF/OTF supported)")]
    InvalidFont,

    #[error("Invalid text position: {0}")]
    InvalidPosition(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Glyph missing from font for character {0:?}")]
    MissingGlyph(char),

    #[error("Text does not fit within box ({ratio:.2}x too large at minimum font size)")]
    TextDoesNotFit { ratio: f32 },

    #[error("Expected {points} fill colors, got {fills}")]
    FillCountMismatch { points: usize, fills: usize },

    #[error("No images given")]
    EmptyInput,

    #[error("Number of grid columns must be at least 1")]
    InvalidColumns,

    #[error("Degenerate canvas: {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("Truncated image (no end-of-image marker): {}", path.display())]
    TruncatedImage { path: PathBuf },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
