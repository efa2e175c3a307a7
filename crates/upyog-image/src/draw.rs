//! Alpha-blended shape drawing.
//!
//! Every function takes the source image by reference and returns a new
//! image of the same size and color mode. Shapes are rasterized onto a fully
//! transparent overlay which is then alpha-composited over a copy of the
//! source.

use image::{ColorType, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_ellipse_mut, draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use tiny_skia::{LineCap, Paint, PathBuilder, Pixmap, Stroke, Transform};
use tracing::debug;

use crate::bbox::BBox;
use crate::color::{Color, alpha_from_opacity};
use crate::error::VisError;

/// Default fill opacity for rectangles.
pub const RECT_OPACITY: f32 = 0.25;

/// Default fill opacity for ellipses, circles and keypoints.
pub const SHAPE_OPACITY: f32 = 0.8;

/// Default guide bar thickness in pixels.
pub const BAR_THICKNESS: u32 = 5;

/// Default guide bar opacity.
pub const BAR_OPACITY: f32 = 0.4;

/// Fill colors for [`draw_keypoints`].
#[derive(Debug, Clone, Copy)]
pub enum KeypointFill<'a> {
    /// One color for every point.
    All(Color),
    /// One color per point; must match the number of points.
    Each(&'a [Color]),
}

/// A guide bar location, as a fraction of the image width or height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Span {
    /// A bar of the given thickness centered on this fraction.
    At(f64),
    /// A bar covering `start..end`.
    Range(f64, f64),
}

/// Draw a rectangle.
///
/// With `outline_width = None` the rectangle is filled; otherwise only an
/// outline of that many pixels is drawn, growing inward. Coordinates are
/// inclusive of `x2` and `y2`.
pub fn draw_rectangle(
    img: &DynamicImage,
    bbox: &BBox,
    fill: Color,
    opacity: f32,
    outline_width: Option<u32>,
) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    // An inward outline wider than the canvas covers it anyway.
    let outline_width = outline_width.map(|ow| ow.min(w.max(h)));
    let margin = i64::from(outline_width.unwrap_or(0)) + 1;
    let (x1, y1, x2, y2) = clamp_to_canvas(bbox.to_pixels(), (w, h), margin);
    let color = fill.with_opacity(opacity);
    debug!(x1, y1, x2, y2, alpha = color[3], ?outline_width, "Drawing rectangle");

    composite_overlay(img, |overlay| match outline_width {
        None => {
            if let Some(rect) = inclusive_rect(x1, y1, x2, y2) {
                draw_filled_rect_mut(overlay, rect, color);
            }
        }
        Some(width) => {
            for i in 0..i64::from(width) {
                if let Some(rect) = inclusive_rect(x1 + i, y1 + i, x2 - i, y2 - i) {
                    draw_hollow_rect_mut(overlay, rect, color);
                }
            }
        }
    })
}

/// Clamp pixel corners to the canvas grown by `margin` on every side.
///
/// Edges clamped to the margin stay off-canvas, so clipping never adds a
/// visible edge that the unclamped box would not have.
fn clamp_to_canvas(
    (x1, y1, x2, y2): (i32, i32, i32, i32),
    (w, h): (u32, u32),
    margin: i64,
) -> (i64, i64, i64, i64) {
    let cx = |v: i32| i64::from(v).clamp(-margin, i64::from(w) - 1 + margin);
    let cy = |v: i32| i64::from(v).clamp(-margin, i64::from(h) - 1 + margin);
    (cx(x1), cy(y1), cx(x2), cy(y2))
}

/// Draw each box in turn, every draw building on the previous result.
pub fn draw_rectangles(
    img: &DynamicImage,
    bboxes: &[BBox],
    fill: Color,
    opacity: f32,
    outline_width: Option<u32>,
) -> DynamicImage {
    bboxes.iter().fold(img.clone(), |acc, bbox| {
        draw_rectangle(&acc, bbox, fill, opacity, outline_width)
    })
}

/// Stroke a rectangle with rounded corners.
///
/// The path is four edges inset by `radius / 2` joined by quarter arcs
/// inscribed in `radius x radius` corner boxes.
pub fn draw_rounded_rectangle(
    img: &DynamicImage,
    bbox: &BBox,
    radius: f64,
    color: Color,
    opacity: f32,
    width: f32,
) -> Result<DynamicImage, VisError> {
    let (w, h) = (img.width(), img.height());
    let mut pixmap = Pixmap::new(w, h).ok_or(VisError::InvalidCanvas {
        width: w,
        height: h,
    })?;

    let Some(path) = rounded_rect_path(bbox, radius) else {
        debug!(?bbox, radius, "Degenerate rounded rectangle, nothing drawn");
        return Ok(img.clone());
    };

    let mut paint = Paint::default();
    paint.set_color_rgba8(color.0, color.1, color.2, alpha_from_opacity(opacity));
    paint.anti_alias = true;
    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    debug!(?bbox, radius, width, "Drew rounded rectangle");

    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let overlay = RgbaImage::from_raw(w, h, data).ok_or(VisError::InvalidCanvas {
        width: w,
        height: h,
    })?;

    let mut base = img.to_rgba8();
    alpha_composite(&mut base, &overlay);
    Ok(restore_mode(base, img.color()))
}

/// Stroke several rounded rectangles in turn.
pub fn draw_rounded_rectangles(
    img: &DynamicImage,
    bboxes: &[BBox],
    radius: f64,
    color: Color,
    opacity: f32,
    width: f32,
) -> Result<DynamicImage, VisError> {
    bboxes.iter().try_fold(img.clone(), |acc, bbox| {
        draw_rounded_rectangle(&acc, bbox, radius, color, opacity, width)
    })
}

/// Build the outline of a rounded rectangle as separate edge and arc segments.
fn rounded_rect_path(bbox: &BBox, radius: f64) -> Option<tiny_skia::Path> {
    let (x1, y1, x2, y2) = (bbox.x1(), bbox.y1(), bbox.x2(), bbox.y2());
    let r = radius;
    let half = r / 2.0;

    let edges = [
        ((x1 + half, y1), (x2 - half, y1)),
        ((x2, y1 + half), (x2, y2 - half)),
        ((x1 + half, y2), (x2 - half, y2)),
        ((x1, y1 + half), (x1, y2 - half)),
    ];
    // Corner boxes with start/end angles, counter-clockwise from 3 o'clock.
    let arcs = [
        ([x2 - r, y1, x2, y1 + r], 0.0, 90.0),
        ([x1, y1, x1 + r, y1 + r], 90.0, 180.0),
        ([x1, y2 - r, x1 + r, y2], 180.0, 270.0),
        ([x2 - r, y2 - r, x2, y2], 270.0, 360.0),
    ];

    let mut pb = PathBuilder::new();
    for ((sx, sy), (ex, ey)) in edges {
        pb.move_to(sx as f32, sy as f32);
        pb.line_to(ex as f32, ey as f32);
    }
    for (corner, start, end) in arcs {
        let [p0, p1, p2, p3] = arc_bezier(corner, start, end);
        pb.move_to(p0.0 as f32, p0.1 as f32);
        pb.cubic_to(
            p1.0 as f32,
            p1.1 as f32,
            p2.0 as f32,
            p2.1 as f32,
            p3.0 as f32,
            p3.1 as f32,
        );
    }
    pb.finish()
}

/// Cubic Bezier control points approximating an elliptical arc of at most 90
/// degrees inscribed in `[x1, y1, x2, y2]`. Angles grow counter-clockwise on
/// screen (y axis pointing down).
fn arc_bezier([x1, y1, x2, y2]: [f64; 4], start_deg: f64, end_deg: f64) -> [(f64, f64); 4] {
    let (cx, cy) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    let (rx, ry) = ((x2 - x1) / 2.0, (y2 - y1) / 2.0);
    let (t0, t1) = (start_deg.to_radians(), end_deg.to_radians());
    let k = 4.0 / 3.0 * ((t1 - t0) / 4.0).tan();

    let point = |t: f64| (cx + rx * t.cos(), cy - ry * t.sin());
    let tangent = |t: f64| (-rx * t.sin(), -ry * t.cos());

    let p0 = point(t0);
    let p3 = point(t1);
    let d0 = tangent(t0);
    let d1 = tangent(t1);
    [
        p0,
        (p0.0 + k * d0.0, p0.1 + k * d0.1),
        (p3.0 - k * d1.0, p3.1 - k * d1.1),
        p3,
    ]
}

/// Draw a filled ellipse inscribed in `bbox`.
pub fn draw_ellipse(img: &DynamicImage, bbox: &BBox, fill: Color, opacity: f32) -> DynamicImage {
    let (cx, cy) = bbox.center();
    let center = (cx.round() as i32, cy.round() as i32);
    let rx = (bbox.width() / 2.0).round() as i32;
    let ry = (bbox.height() / 2.0).round() as i32;
    let color = fill.with_opacity(opacity);

    composite_overlay(img, |overlay| {
        draw_filled_ellipse_mut(overlay, center, rx, ry, color);
    })
}

/// Draw a filled circle centered at `(x, y)`.
pub fn draw_circle(
    img: &DynamicImage,
    (x, y): (f64, f64),
    radius: f64,
    fill: Color,
    opacity: f32,
) -> DynamicImage {
    let bbox = BBox::new(x - radius, y - radius, x + radius, y + radius);
    draw_ellipse(img, &bbox, fill, opacity)
}

/// Keypoint radius scaled sub-linearly with the image area.
pub fn get_dynamic_radius(width: u32, height: u32) -> u32 {
    let area = f64::from(width) * f64::from(height);
    let radius = (0.018_675_99 * area.powf(0.442_204_5)).round() as u32;
    radius.max(1)
}

/// Draw one keypoint; `radius = None` uses [`get_dynamic_radius`].
pub fn draw_keypoint(
    img: &DynamicImage,
    xy: (f64, f64),
    fill: Color,
    opacity: f32,
    radius: Option<u32>,
) -> DynamicImage {
    let radius = radius.unwrap_or_else(|| get_dynamic_radius(img.width(), img.height()));
    draw_circle(img, xy, f64::from(radius), fill, opacity)
}

/// Draw several keypoints in order.
pub fn draw_keypoints(
    img: &DynamicImage,
    xys: &[(f64, f64)],
    fill: KeypointFill<'_>,
    opacity: f32,
    radius: Option<u32>,
) -> Result<DynamicImage, VisError> {
    if let KeypointFill::Each(fills) = fill {
        if fills.len() != xys.len() {
            return Err(VisError::FillCountMismatch {
                points: xys.len(),
                fills: fills.len(),
            });
        }
    }

    let radius = radius.unwrap_or_else(|| get_dynamic_radius(img.width(), img.height()));
    debug!(count = xys.len(), radius, "Drawing keypoints");

    let out = xys.iter().enumerate().fold(img.clone(), |acc, (i, &xy)| {
        let color = match fill {
            KeypointFill::All(c) => c,
            KeypointFill::Each(fills) => fills[i],
        };
        draw_keypoint(&acc, xy, color, opacity, Some(radius))
    });
    Ok(out)
}

/// Draw full-height bars at fractions of the image width.
pub fn draw_vertical_bars(
    img: &DynamicImage,
    spans: &[Span],
    fill: Color,
    thickness: u32,
    opacity: f32,
) -> DynamicImage {
    let (w, h) = (f64::from(img.width()), f64::from(img.height()));
    let off = f64::from(bar_offset(thickness));

    let boxes: Vec<BBox> = spans
        .iter()
        .map(|span| match *span {
            Span::At(f) => BBox::new(w * f - off, 0.0, w * f + off, h),
            Span::Range(start, end) => BBox::new(w * start, 0.0, w * end, h),
        })
        .collect();
    draw_rectangles(img, &boxes, fill, opacity, None)
}

/// Draw full-width bars at fractions of the image height.
pub fn draw_horizontal_bars(
    img: &DynamicImage,
    spans: &[Span],
    fill: Color,
    thickness: u32,
    opacity: f32,
) -> DynamicImage {
    let (w, h) = (f64::from(img.width()), f64::from(img.height()));
    let off = f64::from(bar_offset(thickness));

    let boxes: Vec<BBox> = spans
        .iter()
        .map(|span| match *span {
            Span::At(f) => BBox::new(0.0, h * f - off, w, h * f + off),
            Span::Range(start, end) => BBox::new(0.0, h * start, w, h * end),
        })
        .collect();
    draw_rectangles(img, &boxes, fill, opacity, None)
}

/// Half-width of a guide bar: `floor((thickness - 1) / 2)`.
pub fn bar_offset(thickness: u32) -> u32 {
    thickness.saturating_sub(1) / 2
}

fn inclusive_rect(x1: i64, y1: i64, x2: i64, y2: i64) -> Option<Rect> {
    if x2 < x1 || y2 < y1 {
        return None;
    }
    let x = i32::try_from(x1).ok()?;
    let y = i32::try_from(y1).ok()?;
    let width = u32::try_from(x2 - x1 + 1).ok()?;
    let height = u32::try_from(y2 - y1 + 1).ok()?;
    Some(Rect::at(x, y).of_size(width, height))
}

/// Paint onto a transparent overlay and composite it over a copy of `img`.
pub(crate) fn composite_overlay(
    img: &DynamicImage,
    paint: impl FnOnce(&mut RgbaImage),
) -> DynamicImage {
    let mut overlay = RgbaImage::new(img.width(), img.height());
    paint(&mut overlay);

    let mut base = img.to_rgba8();
    alpha_composite(&mut base, &overlay);
    restore_mode(base, img.color())
}

/// Porter-Duff "over": composite `top` onto `base` in place.
///
/// Both images must have the same dimensions; extra pixels are ignored.
pub fn alpha_composite(base: &mut RgbaImage, top: &RgbaImage) {
    for (x, y, pixel) in top.enumerate_pixels() {
        if pixel[3] == 0 || x >= base.width() || y >= base.height() {
            continue;
        }
        let bg = base.get_pixel(x, y);
        let blended = blend_pixel(bg, pixel);
        base.put_pixel(x, y, blended);
    }
}

fn blend_pixel(bg: &Rgba<u8>, fg: &Rgba<u8>) -> Rgba<u8> {
    let sa = f32::from(fg[3]) / 255.0;
    let da = f32::from(bg[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (f32::from(fg[i]) * sa + f32::from(bg[i]) * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round() as u8,
    ])
}

/// Convert an RGBA buffer back to the given color mode.
pub(crate) fn restore_mode(rgba: RgbaImage, color: ColorType) -> DynamicImage {
    let img = DynamicImage::ImageRgba8(rgba);
    match color {
        ColorType::L8 => DynamicImage::ImageLuma8(img.to_luma8()),
        ColorType::La8 => DynamicImage::ImageLumaA8(img.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(img.to_rgb8()),
        ColorType::L16 => DynamicImage::ImageLuma16(img.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(img.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(img.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(img.to_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(img.to_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(img.to_rgba32f()),
        _ => img,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    fn create_test_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([0, 0, 0])))
    }

    fn rgb_at(img: &DynamicImage, x: u32, y: u32) -> [u8; 3] {
        img.to_rgb8().get_pixel(x, y).0
    }

    #[test]
    fn rectangle_keeps_size_and_mode() {
        let img = create_test_image(40, 30);
        let out = draw_rectangle(&img, &BBox::new(5.0, 5.0, 20.0, 20.0), Color::WHITE, 0.5, None);
        assert_eq!(out.dimensions(), (40, 30));
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn rectangle_does_not_mutate_source() {
        let img = create_test_image(20, 20);
        let _ = draw_rectangle(&img, &BBox::new(0.0, 0.0, 19.0, 19.0), Color::WHITE, 1.0, None);
        assert_eq!(rgb_at(&img, 10, 10), [0, 0, 0]);
    }

    #[test]
    fn rectangle_blends_with_opacity() {
        let img = create_test_image(20, 20);
        let out = draw_rectangle(&img, &BBox::new(2.0, 2.0, 10.0, 10.0), Color::WHITE, 0.25, None);
        // alpha = 63 -> 63/255 of white over black
        assert_eq!(rgb_at(&out, 5, 5), [63, 63, 63]);
        assert_eq!(rgb_at(&out, 10, 10), [63, 63, 63], "x2/y2 are inclusive");
        assert_eq!(rgb_at(&out, 11, 11), [0, 0, 0]);
    }

    #[test]
    fn rectangle_outline_leaves_interior() {
        let img = create_test_image(30, 30);
        let bbox = BBox::new(5.0, 5.0, 25.0, 25.0);
        let out = draw_rectangle(&img, &bbox, Color::WHITE, 1.0, Some(2));
        assert_eq!(rgb_at(&out, 5, 15), [255, 255, 255]);
        assert_eq!(rgb_at(&out, 6, 15), [255, 255, 255]);
        assert_eq!(rgb_at(&out, 7, 15), [0, 0, 0]);
        assert_eq!(rgb_at(&out, 15, 15), [0, 0, 0]);
    }

    #[test]
    fn huge_rectangle_is_clipped_to_canvas() {
        let img = create_test_image(20, 20);
        let bbox = BBox::new(-3.0e9, 0.0, 3.0e9, 10.0);
        let out = draw_rectangle(&img, &bbox, Color::WHITE, 1.0, None);
        assert_eq!(rgb_at(&out, 0, 5), [255, 255, 255]);
        assert_eq!(rgb_at(&out, 19, 10), [255, 255, 255]);
        assert_eq!(rgb_at(&out, 10, 11), [0, 0, 0]);
    }

    #[test]
    fn clipped_outline_hides_offscreen_edges() {
        let img = create_test_image(20, 20);
        let bbox = BBox::new(-1.0e10, 5.0, 1.0e10, 15.0);
        let out = draw_rectangle(&img, &bbox, Color::WHITE, 1.0, Some(2));
        // Top and bottom edges are visible, the far-away sides are not
        assert_eq!(rgb_at(&out, 10, 5), [255, 255, 255]);
        assert_eq!(rgb_at(&out, 10, 15), [255, 255, 255]);
        assert_eq!(rgb_at(&out, 0, 10), [0, 0, 0]);
        assert_eq!(rgb_at(&out, 19, 10), [0, 0, 0]);
    }

    #[test]
    fn huge_bars_do_not_overflow() {
        let img = create_test_image(30, 30);
        let out = draw_vertical_bars(&img, &[Span::Range(-1.0e9, 1.0e9)], Color::WHITE, 5, 1.0);
        assert_eq!(rgb_at(&out, 15, 15), [255, 255, 255]);
    }

    #[test]
    fn rectangles_fold_sequentially() {
        let img = create_test_image(20, 20);
        let boxes = [BBox::new(0.0, 0.0, 9.0, 9.0), BBox::new(0.0, 0.0, 9.0, 9.0)];
        let out = draw_rectangles(&img, &boxes, Color::WHITE, 0.5, None);
        let once = draw_rectangle(&img, &boxes[0], Color::WHITE, 0.5, None);
        assert!(rgb_at(&out, 4, 4)[0] > rgb_at(&once, 4, 4)[0]);
    }

    #[test]
    fn rounded_rectangle_strokes_edges_not_interior() {
        let img = create_test_image(100, 100);
        let bbox = BBox::new(10.0, 10.0, 90.0, 90.0);
        let out = draw_rounded_rectangle(&img, &bbox, 20.0, Color::WHITE, 1.0, 3.0).unwrap();
        assert_eq!(out.dimensions(), (100, 100));
        // Middle of the top edge is painted
        assert!(rgb_at(&out, 50, 10)[0] > 200);
        // Interior and the sharp corner stay untouched
        assert_eq!(rgb_at(&out, 50, 50), [0, 0, 0]);
        assert_eq!(rgb_at(&out, 10, 10), [0, 0, 0]);
    }

    #[test]
    fn arc_bezier_endpoints_follow_angle_convention() {
        // Top-right corner box: 0 deg is the right midpoint, 90 deg the top midpoint
        let [p0, _, _, p3] = arc_bezier([80.0, 10.0, 100.0, 30.0], 0.0, 90.0);
        assert!((p0.0 - 100.0).abs() < 1e-9 && (p0.1 - 20.0).abs() < 1e-9);
        assert!((p3.0 - 90.0).abs() < 1e-9 && (p3.1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn circle_fills_center() {
        let img = create_test_image(50, 50);
        let out = draw_circle(&img, (25.0, 25.0), 5.0, Color::WHITE, 1.0);
        assert_eq!(rgb_at(&out, 25, 25), [255, 255, 255]);
        assert_eq!(rgb_at(&out, 0, 0), [0, 0, 0]);
    }

    #[test]
    fn dynamic_radius_power_law() {
        assert_eq!(get_dynamic_radius(1000, 1000), 8);
        assert_eq!(get_dynamic_radius(640, 480), 5);
        assert_eq!(get_dynamic_radius(100, 100), 1);
        assert_eq!(get_dynamic_radius(1, 1), 1);
    }

    #[test]
    fn keypoints_reject_mismatched_fills() {
        let img = create_test_image(50, 50);
        let points = [(10.0, 10.0), (20.0, 20.0)];
        let err = draw_keypoints(&img, &points, KeypointFill::Each(&[Color::RED]), 1.0, None)
            .unwrap_err();
        assert!(matches!(err, VisError::FillCountMismatch { points: 2, fills: 1 }));
    }

    #[test]
    fn keypoints_use_per_point_colors() {
        let img = create_test_image(50, 50);
        let points = [(10.0, 10.0), (40.0, 40.0)];
        let fills = [Color::RED, Color::BLUE];
        let out = draw_keypoints(&img, &points, KeypointFill::Each(&fills), 1.0, Some(3)).unwrap();
        assert_eq!(rgb_at(&out, 10, 10), [255, 0, 0]);
        assert_eq!(rgb_at(&out, 40, 40), [0, 0, 255]);
    }

    #[test]
    fn bar_offset_floors() {
        assert_eq!(bar_offset(5), 2);
        assert_eq!(bar_offset(4), 1);
        assert_eq!(bar_offset(1), 0);
        assert_eq!(bar_offset(0), 0);
    }

    #[test]
    fn range_bars_cover_span() {
        let img = create_test_image(100, 10);
        let out = draw_vertical_bars(&img, &[Span::Range(0.1, 0.2)], Color::WHITE, 5, 1.0);
        assert_eq!(rgb_at(&out, 15, 5), [255, 255, 255]);
        assert_eq!(rgb_at(&out, 25, 5), [0, 0, 0]);
    }

    #[test]
    fn composite_over_transparent_base() {
        let mut base = RgbaImage::new(1, 1);
        let top = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        alpha_composite(&mut base, &top);
        assert_eq!(base.get_pixel(0, 0), &Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn restore_mode_round_trips_luma() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([10, 10, 10, 255]));
        let out = restore_mode(rgba, ColorType::L8);
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
    }
}
