//! Text layout and rendering.
//!
//! Provides anchored single- and multi-line text, greedy word wrapping,
//! poor-man's outlined text, and labels fitted inside a bounding box.

use image::{DynamicImage, RgbaImage};
use imageproc::drawing::draw_text_mut;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bbox::BBox;
use crate::color::Color;
use crate::draw::{draw_rectangle, restore_mode};
use crate::error::VisError;
use crate::font::Font;
use crate::position::{HAlign, Position, VAnchor};

/// Smallest font size tried when fitting a label into a box.
pub const MIN_FONT_SIZE: f32 = 6.0;

/// Unit offsets used to stamp the outline of bordered text.
const BORDER_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Text to draw: one unwrapped line, or lines that are wrapped to fit.
#[derive(Debug, Clone, Copy)]
pub enum TextBlock<'a> {
    Line(&'a str),
    Lines(&'a [String]),
}

impl<'a> From<&'a str> for TextBlock<'a> {
    fn from(s: &'a str) -> Self {
        Self::Line(s)
    }
}

impl<'a> From<&'a [String]> for TextBlock<'a> {
    fn from(lines: &'a [String]) -> Self {
        Self::Lines(lines)
    }
}

impl<'a> From<&'a Vec<String>> for TextBlock<'a> {
    fn from(lines: &'a Vec<String>) -> Self {
        Self::Lines(lines)
    }
}

/// Options for [`draw_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    pub position: Position,
    pub color: Color,
    /// Outline the glyphs with `border_color`.
    pub bordered: bool,
    pub border_color: Color,
    /// Fraction of the image width available to the text, centered.
    pub width_constraint: f64,
    /// Fraction of the image height available to the text, centered.
    pub height_constraint: f64,
    /// Multiplier on the line height when advancing between lines.
    pub line_spacing: f32,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            position: Position::TopLeft,
            color: Color::WHITE,
            bordered: false,
            border_color: Color::BLACK,
            width_constraint: 1.0,
            height_constraint: 1.0,
            line_spacing: 1.0,
        }
    }
}

/// Which edge of the box a label is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLocation {
    Top,
    #[default]
    Bottom,
}

/// Options for [`draw_text_within_xyxy`].
#[derive(Debug, Clone, PartialEq)]
pub struct LabelOptions {
    /// Padding inside the box, as a fraction of its shorter side.
    pub pad: f64,
    pub color: Color,
    pub location: LabelLocation,
    pub bordered: bool,
    pub background: bool,
    pub background_color: Color,
    pub background_opacity: f32,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            pad: 0.03,
            color: Color::WHITE,
            location: LabelLocation::Bottom,
            bordered: false,
            background: true,
            background_color: Color::BLACK,
            background_opacity: 0.15,
        }
    }
}

/// A label sized and placed inside a box.
#[derive(Debug, Clone)]
pub struct FittedLabel {
    pub font: Font,
    /// Where the label's line box is drawn.
    pub rect: BBox,
    /// Padding in pixels derived from the box size.
    pub pad: f64,
}

/// Wrap text so every line fits within `max_width` pixels.
///
/// Words are packed greedily. A word wider than `max_width` is put on its own
/// line. Text that already fits is returned as a single line untouched.
pub fn text_wrap(text: &str, font: &Font, max_width: u32) -> Vec<String> {
    if font.text_width(text) <= max_width {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        let candidate = if current_line.is_empty() {
            word.to_string()
        } else {
            format!("{current_line} {word}")
        };

        if font.text_width(&candidate) <= max_width {
            current_line = candidate;
        } else {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            current_line = word.to_string();
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Draw text anchored at a compass position of the (constrained) image area.
///
/// A single line uses the anchor of its position directly. Lines are each
/// wrapped to the area width and laid out as one block: top positions start
/// at the top edge, center positions are centered on the middle, bottom
/// positions end at the bottom edge. Lines containing characters the font
/// cannot render are skipped with a warning.
pub fn draw_text<'a>(
    img: &DynamicImage,
    text: impl Into<TextBlock<'a>>,
    font: &Font,
    opts: &TextOptions,
) -> DynamicImage {
    let region = constrained_region(img.width(), img.height(), opts);
    let border = opts.bordered.then_some(opts.border_color);
    let mut canvas = img.to_rgba8();

    match text.into() {
        TextBlock::Line(line) => {
            let origin = anchored_origin(font, line, region[opts.position], opts.position);
            if let Err(e) = stamp(&mut canvas, font, origin, line, opts.color, border) {
                warn!(error = %e, line, "Skipping text");
            }
        }
        TextBlock::Lines(lines) => {
            let max_width = region.width().max(0.0) as u32;
            let wrapped: Vec<String> = lines
                .iter()
                .flat_map(|line| text_wrap(line, font, max_width))
                .collect();

            let advance = f64::from(font.line_height() as f32 * opts.line_spacing);
            let total = advance * wrapped.len() as f64;
            let y_start = if opts.position.is_top() {
                region.y1()
            } else if opts.position.is_bottom() {
                region.y2() - total
            } else {
                region.center().1 - total / 2.0
            };
            debug!(lines = wrapped.len(), total, y_start, "Laying out text block");

            for (i, line) in wrapped.iter().enumerate() {
                let w = f64::from(font.text_width(line));
                let x = match opts.position.h_align() {
                    HAlign::Left => region.x1(),
                    HAlign::Center => region.center().0 - w / 2.0,
                    HAlign::Right => region.x2() - w,
                };
                let y = y_start + advance * i as f64;
                let origin = (x.round() as i32, y.round() as i32);
                if let Err(e) = stamp(&mut canvas, font, origin, line, opts.color, border) {
                    warn!(error = %e, line = line.as_str(), "Skipping text line");
                }
            }
        }
    }

    restore_mode(canvas, img.color())
}

/// The centered sub-rectangle of the image that text is laid out in.
fn constrained_region(width: u32, height: u32, opts: &TextOptions) -> BBox {
    let (w, h) = (f64::from(width), f64::from(height));
    let (cw, ch) = (w * opts.width_constraint, h * opts.height_constraint);
    BBox::from_xywh((w - cw) / 2.0, (h - ch) / 2.0, cw, ch)
}

/// Top-left drawing origin for a line placed at `point` with the anchor of `position`.
fn anchored_origin(
    font: &Font,
    text: &str,
    (px, py): (f64, f64),
    position: Position,
) -> (i32, i32) {
    let Some(anchor) = position.anchor() else {
        return (px.round() as i32, py.round() as i32);
    };

    let w = f64::from(font.text_width(text));
    let x = match anchor.h {
        HAlign::Left => px,
        HAlign::Center => px - w / 2.0,
        HAlign::Right => px - w,
    };
    let y = match anchor.v {
        VAnchor::Top => py,
        VAnchor::Middle => py - f64::from(font.text_height()) / 2.0,
        VAnchor::Baseline => py - f64::from(font.ascent()),
    };
    (x.round() as i32, y.round() as i32)
}

/// Draw one line with its top-left at `(x, y)`, outlined when `border` is set.
fn stamp(
    canvas: &mut RgbaImage,
    font: &Font,
    (x, y): (i32, i32),
    text: &str,
    color: Color,
    border: Option<Color>,
) -> Result<(), VisError> {
    if let Some(ch) = font.missing_glyph(text) {
        return Err(VisError::MissingGlyph(ch));
    }

    if let Some(border) = border {
        for (dx, dy) in BORDER_OFFSETS {
            draw_text_mut(
                canvas,
                border.to_rgba(),
                x + dx,
                y + dy,
                font.scale(),
                font.face(),
                text,
            );
        }
    }
    draw_text_mut(canvas, color.to_rgba(), x, y, font.scale(), font.face(), text);
    Ok(())
}

/// Find the largest font size, starting at `font.size()`, for which `label`
/// fits inside `bbox` shrunk by its padding, and place it at the top or
/// bottom edge center.
pub fn fit_label(
    bbox: &BBox,
    label: &str,
    font: &Font,
    pad: f64,
    location: LabelLocation,
) -> Result<FittedLabel, VisError> {
    let pad_px = (pad * bbox.width().min(bbox.height())).max(0.0);
    let mut target = bbox.clone();
    target.shrink(pad_px);
    let (target_w, target_h) = (target.width(), target.height());

    let mut size = font.size();
    let candidate = loop {
        let candidate = font.with_size(size);
        let (tw, th) = candidate.text_size(label);
        let (tw, th) = (f64::from(tw), f64::from(th));

        if tw <= target_w && th <= target_h {
            break candidate;
        }
        if size - 1.0 < MIN_FONT_SIZE {
            let ratio = (tw / target_w).max(th / target_h) as f32;
            return Err(VisError::TextDoesNotFit { ratio });
        }
        size -= 1.0;
    };

    let (tw, th) = candidate.text_size(label);
    let (tw, th) = (f64::from(tw), f64::from(th));
    let x = target.center().0 - tw / 2.0;
    let y = match location {
        LabelLocation::Top => target.y1(),
        LabelLocation::Bottom => target.y2() - th,
    };
    debug!(label, size, base = font.size(), x, y, "Fitted label");

    Ok(FittedLabel {
        font: candidate,
        rect: BBox::from_xywh(x, y, tw, th),
        pad: pad_px,
    })
}

/// Panel behind a label: the text box grown by `pad`, clipped to `bbox`.
pub fn background_panel(text_rect: &BBox, bbox: &BBox, pad: f64) -> BBox {
    BBox::new(
        (text_rect.x1() - pad).max(bbox.x1()),
        (text_rect.y1() - pad).max(bbox.y1()),
        (text_rect.x2() + pad).min(bbox.x2()),
        (text_rect.y2() + pad).min(bbox.y2()),
    )
}

/// Render `label` inside `bbox`, shrinking the font until it fits.
///
/// Never fails: problems are logged and the image is returned in whatever
/// state it reached (e.g. with the background panel already drawn).
pub fn draw_text_within_xyxy(
    img: &DynamicImage,
    bbox: &BBox,
    label: &str,
    font: &Font,
    opts: &LabelOptions,
) -> DynamicImage {
    let fitted = match fit_label(bbox, label, font, opts.pad, opts.location) {
        Ok(fitted) => fitted,
        Err(e) => {
            warn!(error = %e, label, ?bbox, "Could not fit label in box");
            return img.clone();
        }
    };

    let out = if opts.background {
        let panel = background_panel(&fitted.rect, bbox, fitted.pad);
        draw_rectangle(img, &panel, opts.background_color, opts.background_opacity, None)
    } else {
        img.clone()
    };

    let mut canvas = out.to_rgba8();
    let origin = (fitted.rect.x1().round() as i32, fitted.rect.y1().round() as i32);
    let border = opts.bordered.then_some(Color::BLACK);
    match stamp(&mut canvas, &fitted.font, origin, label, opts.color, border) {
        Ok(()) => restore_mode(canvas, img.color()),
        Err(e) => {
            warn!(error = %e, label, "Could not draw label");
            out
        }
    }
}

/// A bordered caption along the bottom of the whole image.
pub fn caption(img: &DynamicImage, text: &str, font: &Font, color: Color) -> DynamicImage {
    let bbox = BBox::from_size(img.width(), img.height());
    let opts = LabelOptions {
        pad: 0.05,
        color,
        location: LabelLocation::Bottom,
        bordered: true,
        background: false,
        ..LabelOptions::default()
    };
    draw_text_within_xyxy(img, &bbox, text, font, &opts)
}
