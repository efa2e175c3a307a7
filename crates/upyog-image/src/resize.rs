//! Aspect-preserving resizes and letterboxing (Lanczos3).

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

use crate::color::Color;

/// Where the resized image sits inside the padded canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PadLocation {
    #[default]
    Center,
    /// Pinned to the top-left corner.
    Top,
}

/// Letterbox options for [`resize_pad`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PadOptions {
    pub location: PadLocation,
    pub fill: Color,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            location: PadLocation::Center,
            fill: Color::BLACK,
        }
    }
}

/// Scale to `width`, keeping the aspect ratio. A no-op at the target width.
pub fn resize_to_width(img: &DynamicImage, width: u32) -> DynamicImage {
    if img.width() == width {
        return img.clone();
    }
    let height = scaled_side(img.height(), width, img.width());
    debug!(from_w = img.width(), from_h = img.height(), width, height, "Fitting image width");
    resize_exact(img, (width, height))
}

/// Scale to `height`, keeping the aspect ratio. A no-op at the target height.
pub fn resize_to_height(img: &DynamicImage, height: u32) -> DynamicImage {
    if img.height() == height {
        return img.clone();
    }
    let width = scaled_side(img.width(), height, img.height());
    debug!(from_w = img.width(), from_h = img.height(), width, height, "Fitting image height");
    resize_exact(img, (width, height))
}

/// `side * target / reference`, rounded, never zero.
fn scaled_side(side: u32, target: u32, reference: u32) -> u32 {
    let scaled = f64::from(side) * f64::from(target) / f64::from(reference.max(1));
    (scaled.round() as u32).max(1)
}

/// Resize to exactly `(width, height)`, ignoring aspect ratio.
pub fn resize_exact(img: &DynamicImage, (width, height): (u32, u32)) -> DynamicImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }
    img.resize_exact(width.max(1), height.max(1), FilterType::Lanczos3)
}

/// Letterbox: scale to fit inside `(width, height)` keeping aspect ratio, then
/// pad the remaining space with `opts.fill`.
///
/// The output has exactly the target size and the source's color mode.
pub fn resize_pad(img: &DynamicImage, (to_w, to_h): (u32, u32), opts: PadOptions) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    let ratio = (f64::from(to_h) / f64::from(h)).min(f64::from(to_w) / f64::from(w));
    let new_w = ((ratio * f64::from(w)) as u32).clamp(1, to_w.max(1));
    let new_h = ((ratio * f64::from(h)) as u32).clamp(1, to_h.max(1));

    let (x, y) = match opts.location {
        PadLocation::Top => (0, 0),
        PadLocation::Center => (to_w.saturating_sub(new_w) / 2, to_h.saturating_sub(new_h) / 2),
    };
    debug!(w, h, to_w, to_h, new_w, new_h, x, y, "Letterbox resize");

    let resized = resize_exact(img, (new_w, new_h));
    let mut canvas = blank_like(img, to_w, to_h, opts.fill);
    imageops::replace(&mut canvas, &resized, i64::from(x), i64::from(y));
    canvas
}

/// A `width x height` image in the same color mode as `like`, filled with `fill`.
pub(crate) fn blank_like(
    like: &DynamicImage,
    width: u32,
    height: u32,
    fill: Color,
) -> DynamicImage {
    let rgba = RgbaImage::from_pixel(width, height, Rgba([fill.0, fill.1, fill.2, 255]));
    crate::draw::restore_mode(rgba, like.color())
}
