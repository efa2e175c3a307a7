//! Image composition: joins, grids and the rule-of-thirds overlay.

use image::{DynamicImage, imageops};
use tracing::{debug, info};

use crate::color::Color;
use crate::draw::{Span, draw_horizontal_bars, draw_vertical_bars};
use crate::error::VisError;
use crate::resize::{PadOptions, blank_like, resize_exact, resize_pad};

/// Options for [`make_img_grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    pub num_columns: usize,
    /// Size every tile is normalized to; `None` keeps the inputs as-is.
    pub target_size: Option<(u32, u32)>,
    /// Letterbox to `target_size` instead of stretching.
    pub pad: bool,
    /// Log per-row progress at info level.
    pub verbose: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            num_columns: 3,
            target_size: Some((640, 384)),
            pad: true,
            verbose: false,
        }
    }
}

/// Place `b` to the right of `a`.
///
/// The shorter image is letterboxed to the taller one's height.
pub fn join_horizontal(a: &DynamicImage, b: &DynamicImage) -> DynamicImage {
    let height = a.height().max(b.height());
    let a = pad_to(a, a.width(), height);
    let b = pad_to(b, b.width(), height);

    let mut canvas = blank_like(&a, a.width() + b.width(), height, Color::BLACK);
    imageops::replace(&mut canvas, &a, 0, 0);
    imageops::replace(&mut canvas, &b, i64::from(a.width()), 0);
    canvas
}

/// Place `b` below `a`.
///
/// The narrower image is letterboxed to the wider one's width.
pub fn join_vertical(a: &DynamicImage, b: &DynamicImage) -> DynamicImage {
    let width = a.width().max(b.width());
    let a = pad_to(a, width, a.height());
    let b = pad_to(b, width, b.height());

    let mut canvas = blank_like(&a, width, a.height() + b.height(), Color::BLACK);
    imageops::replace(&mut canvas, &a, 0, 0);
    imageops::replace(&mut canvas, &b, 0, i64::from(a.height()));
    canvas
}

fn pad_to(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }
    resize_pad(img, (width, height), PadOptions::default())
}

/// Join images left to right.
pub fn img_join_horizontal(images: &[DynamicImage]) -> Result<DynamicImage, VisError> {
    let (first, rest) = images.split_first().ok_or(VisError::EmptyInput)?;
    Ok(rest
        .iter()
        .fold(first.clone(), |acc, img| join_horizontal(&acc, img)))
}

/// Join images top to bottom.
pub fn img_join_vertical(images: &[DynamicImage]) -> Result<DynamicImage, VisError> {
    let (first, rest) = images.split_first().ok_or(VisError::EmptyInput)?;
    Ok(rest
        .iter()
        .fold(first.clone(), |acc, img| join_vertical(&acc, img)))
}

/// Normalize every image to `target_size` (letterboxed or stretched).
pub fn normalize_tiles(
    images: &[DynamicImage],
    target_size: (u32, u32),
    pad: bool,
) -> Vec<DynamicImage> {
    images
        .iter()
        .map(|img| {
            if pad {
                resize_pad(img, target_size, PadOptions::default())
            } else {
                resize_exact(img, target_size)
            }
        })
        .collect()
}

/// Tile images into rows of `num_columns`, then stack the rows.
///
/// The last row may be shorter than `num_columns`.
pub fn make_img_grid(
    images: &[DynamicImage],
    opts: &GridOptions,
) -> Result<DynamicImage, VisError> {
    if opts.num_columns == 0 {
        return Err(VisError::InvalidColumns);
    }
    if images.is_empty() {
        return Err(VisError::EmptyInput);
    }

    let tiles = match opts.target_size {
        Some(size) => normalize_tiles(images, size, opts.pad),
        None => images.to_vec(),
    };

    if opts.num_columns == 1 {
        return img_join_vertical(&tiles);
    }

    let total_rows = tiles.len().div_ceil(opts.num_columns);
    let mut rows = Vec::with_capacity(total_rows);
    for (i, row) in tiles.chunks(opts.num_columns).enumerate() {
        rows.push(img_join_horizontal(row)?);
        if opts.verbose {
            info!(row = i + 1, total_rows, "Concatenated grid row");
        } else {
            debug!(row = i + 1, total_rows, "Concatenated grid row");
        }
    }

    let grid = img_join_vertical(&rows)?;
    debug!(width = grid.width(), height = grid.height(), "Assembled image grid");
    Ok(grid)
}

/// Overlay two vertical and two horizontal guide bars at the thirds.
///
/// Vertical bars are drawn first, horizontal bars on top.
pub fn draw_rule_of_thirds(img: &DynamicImage, thickness: u32, opacity: f32) -> DynamicImage {
    let thirds = [Span::At(1.0 / 3.0), Span::At(2.0 / 3.0)];
    let img = draw_vertical_bars(img, &thirds, Color::WHITE, thickness, opacity);
    draw_horizontal_bars(&img, &thirds, Color::WHITE, thickness, opacity)
}
