//! Loading, encoding and saving images.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::{debug, warn};

use crate::error::VisError;

/// File extensions treated as images when listing folders.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tif", "tiff"];

const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Color mode to convert loaded images to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    Luma,
}

/// How images are decoded from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Convert to this mode after decoding; `None` keeps the decoded mode.
    pub mode: Option<ColorMode>,
    /// Accept JPEG streams cut off before their end-of-image marker, keeping
    /// whatever the decoder salvages. When unset such files are rejected.
    pub tolerate_truncated: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            mode: Some(ColorMode::Rgb),
            tolerate_truncated: false,
        }
    }
}

/// Load an image from disk.
pub fn load_image(path: &Path, opts: &LoadOptions) -> Result<DynamicImage, VisError> {
    let data = std::fs::read(path)?;
    if is_jpeg(&data) && !has_end_marker(&data) {
        if !opts.tolerate_truncated {
            return Err(VisError::TruncatedImage {
                path: path.to_path_buf(),
            });
        }
        warn!(path = %path.display(), bytes = data.len(), "Decoding truncated JPEG");
    }

    let img = decode(&data)?;
    debug!(
        path = %path.display(),
        w = img.width(),
        h = img.height(),
        color = ?img.color(),
        "Loaded image"
    );

    Ok(match opts.mode {
        Some(ColorMode::Rgb) => DynamicImage::ImageRgb8(img.to_rgb8()),
        Some(ColorMode::Rgba) => DynamicImage::ImageRgba8(img.to_rgba8()),
        Some(ColorMode::Luma) => DynamicImage::ImageLuma8(img.to_luma8()),
        None => img,
    })
}

fn decode(data: &[u8]) -> image::ImageResult<DynamicImage> {
    ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()
}

fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8])
}

/// Whether the stream ends with an EOI marker, ignoring trailing zero padding.
fn has_end_marker(data: &[u8]) -> bool {
    let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    data[..end].ends_with(&JPEG_EOI)
}

/// Encode as a JPEG `data:` URL.
pub fn to_base64_jpeg(img: &DynamicImage) -> Result<String, VisError> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut buf, ImageFormat::Jpeg)?;
    let encoded = STANDARD.encode(buf.into_inner());
    Ok(format!("data:image/jpeg;base64,{encoded}"))
}

/// Save as JPEG with the given quality (1-100).
pub fn save_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), VisError> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100));
    encoder.encode_image(&img.to_rgb8())?;
    writer.flush()?;
    debug!(path = %path.display(), quality, "Saved JPEG");
    Ok(())
}

/// Recursively list image files under `dir`, sorted by path.
///
/// Hidden files and directories (names starting with `.`) are skipped.
pub fn image_files(dir: &Path) -> Result<Vec<PathBuf>, VisError> {
    let mut files = Vec::new();
    collect_image_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_image_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), VisError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            collect_image_files(&path, files)?;
        } else if has_image_extension(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
