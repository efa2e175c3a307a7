//! A chainable drawing facade that owns one image and a default font.

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bbox::BBox;
use crate::color::Color;
use crate::compose;
use crate::draw::{self, KeypointFill, Span};
use crate::error::VisError;
use crate::font::Font;
use crate::text::{self, LabelLocation, LabelOptions, TextBlock, TextOptions};

/// Outline style for [`Visualiser::draw_bbox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxStyle {
    #[default]
    Rounded,
    Sharp,
}

/// Options for [`Visualiser::draw_bbox`].
#[derive(Debug, Clone, PartialEq)]
pub struct BBoxOptions {
    pub uppercase_label: bool,
    pub label_location: LabelLocation,
    pub style: BoxStyle,
    /// Only used by [`BoxStyle::Rounded`].
    pub corner_radius: f64,
    pub box_color: Color,
    pub font_color: Color,
    pub font_bordered: bool,
    pub font_background: bool,
    pub font_background_opacity: f32,
    pub font_pad: f64,
    pub border_opacity: f32,
    pub border_width: u32,
}

impl Default for BBoxOptions {
    fn default() -> Self {
        Self {
            uppercase_label: true,
            label_location: LabelLocation::Bottom,
            style: BoxStyle::Rounded,
            corner_radius: 10.0,
            box_color: Color::WHITE,
            font_color: Color::WHITE,
            font_bordered: false,
            font_background: true,
            font_background_opacity: 0.15,
            font_pad: 0.03,
            border_opacity: 1.0,
            border_width: 3,
        }
    }
}

/// Owns an image; every drawing method replaces it with the drawn result.
#[derive(Debug, Clone)]
pub struct Visualiser {
    img: DynamicImage,
    font: Font,
}

impl Visualiser {
    /// Wrap `img`, loading the font at `font_path` (bundled font when `None`).
    pub fn new(
        img: DynamicImage,
        font_path: Option<&Path>,
        font_size: f32,
    ) -> Result<Self, VisError> {
        let font = Font::load(font_path, font_size)?;
        Ok(Self::with_font(img, font))
    }

    pub fn with_font(img: DynamicImage, font: Font) -> Self {
        Self { img, font }
    }

    pub fn image(&self) -> &DynamicImage {
        &self.img
    }

    pub fn into_image(self) -> DynamicImage {
        self.img
    }

    pub fn size(&self) -> (u32, u32) {
        (self.img.width(), self.img.height())
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn draw_rectangle(
        &mut self,
        bbox: &BBox,
        fill: Color,
        opacity: f32,
        outline_width: Option<u32>,
    ) -> &mut Self {
        self.img = draw::draw_rectangle(&self.img, bbox, fill, opacity, outline_width);
        self
    }

    pub fn draw_rectangles(
        &mut self,
        bboxes: &[BBox],
        fill: Color,
        opacity: f32,
        outline_width: Option<u32>,
    ) -> &mut Self {
        self.img = draw::draw_rectangles(&self.img, bboxes, fill, opacity, outline_width);
        self
    }

    pub fn draw_ellipse(&mut self, bbox: &BBox, fill: Color, opacity: f32) -> &mut Self {
        self.img = draw::draw_ellipse(&self.img, bbox, fill, opacity);
        self
    }

    pub fn draw_circle(
        &mut self,
        xy: (f64, f64),
        radius: f64,
        fill: Color,
        opacity: f32,
    ) -> &mut Self {
        self.img = draw::draw_circle(&self.img, xy, radius, fill, opacity);
        self
    }

    /// `radius = None` scales the marker with the image area.
    pub fn draw_keypoints(
        &mut self,
        xys: &[(f64, f64)],
        fill: KeypointFill<'_>,
        opacity: f32,
        radius: Option<u32>,
    ) -> Result<&mut Self, VisError> {
        self.img = draw::draw_keypoints(&self.img, xys, fill, opacity, radius)?;
        Ok(self)
    }

    pub fn draw_rounded_rectangle(
        &mut self,
        bbox: &BBox,
        radius: f64,
        color: Color,
        opacity: f32,
        width: f32,
    ) -> Result<&mut Self, VisError> {
        self.img = draw::draw_rounded_rectangle(&self.img, bbox, radius, color, opacity, width)?;
        Ok(self)
    }

    pub fn draw_rounded_rectangles(
        &mut self,
        bboxes: &[BBox],
        radius: f64,
        color: Color,
        opacity: f32,
        width: f32,
    ) -> Result<&mut Self, VisError> {
        self.img = draw::draw_rounded_rectangles(&self.img, bboxes, radius, color, opacity, width)?;
        Ok(self)
    }

    pub fn draw_vertical_bars(
        &mut self,
        spans: &[Span],
        fill: Color,
        thickness: u32,
        opacity: f32,
    ) -> &mut Self {
        self.img = draw::draw_vertical_bars(&self.img, spans, fill, thickness, opacity);
        self
    }

    pub fn draw_horizontal_bars(
        &mut self,
        spans: &[Span],
        fill: Color,
        thickness: u32,
        opacity: f32,
    ) -> &mut Self {
        self.img = draw::draw_horizontal_bars(&self.img, spans, fill, thickness, opacity);
        self
    }

    pub fn draw_rule_of_thirds(&mut self, thickness: u32, opacity: f32) -> &mut Self {
        self.img = compose::draw_rule_of_thirds(&self.img, thickness, opacity);
        self
    }

    /// Draw text with the default font.
    pub fn draw_text<'a>(
        &mut self,
        text: impl Into<TextBlock<'a>>,
        opts: &TextOptions,
    ) -> &mut Self {
        self.img = text::draw_text(&self.img, text, &self.font, opts);
        self
    }

    /// Fit `label` inside `bbox`, starting from the default font size.
    pub fn draw_text_within_xyxy(
        &mut self,
        bbox: &BBox,
        label: &str,
        opts: &LabelOptions,
    ) -> &mut Self {
        self.img = text::draw_text_within_xyxy(&self.img, bbox, label, &self.font, opts);
        self
    }

    /// A bordered caption along the bottom edge.
    pub fn caption(&mut self, text: &str, color: Color) -> &mut Self {
        self.img = text::caption(&self.img, text, &self.font, color);
        self
    }

    /// Draw a detection box with an optional `"{label}: {confidence}%"` label.
    ///
    /// `confidence` is a fraction in `0.0..=1.0`.
    pub fn draw_bbox(
        &mut self,
        bbox: &BBox,
        label: Option<&str>,
        confidence: Option<f32>,
        opts: &BBoxOptions,
    ) -> Result<&mut Self, VisError> {
        match opts.style {
            BoxStyle::Sharp => {
                self.draw_rectangle(
                    bbox,
                    opts.box_color,
                    opts.border_opacity,
                    Some(opts.border_width),
                );
            }
            BoxStyle::Rounded => {
                self.draw_rounded_rectangle(
                    bbox,
                    opts.corner_radius,
                    opts.box_color,
                    opts.border_opacity,
                    opts.border_width as f32,
                )?;
            }
        }

        if let Some(text) = format_label(label, confidence, opts.uppercase_label) {
            debug!(label = text.as_str(), ?bbox, "Labelling box");
            let label_opts = LabelOptions {
                pad: opts.font_pad,
                color: opts.font_color,
                location: opts.label_location,
                bordered: opts.font_bordered,
                background: opts.font_background,
                background_opacity: opts.font_background_opacity,
                ..LabelOptions::default()
            };
            self.draw_text_within_xyxy(bbox, &text, &label_opts);
        }
        Ok(self)
    }
}

/// Build a box label from an optional name and confidence fraction.
pub fn format_label(
    label: Option<&str>,
    confidence: Option<f32>,
    uppercase: bool,
) -> Option<String> {
    let label = label.map(|l| if uppercase { l.to_uppercase() } else { l.to_string() });
    let confidence = confidence.map(|c| format!("{:.1}%", c * 100.0));
    match (label, confidence) {
        (Some(l), Some(c)) => Some(format!("{l}: {c}")),
        (None, Some(c)) => Some(c),
        (Some(l), None) => Some(l),
        (None, None) => None,
    }
}
