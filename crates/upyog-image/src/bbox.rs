//! Axis-aligned bounding box with eagerly derived points.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::position::Position;

/// One of the four box coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    X1,
    Y1,
    X2,
    Y2,
}

/// A rectangle in `xyxy` form.
///
/// `x1 <= x2` and `y1 <= y2` are expected but not enforced. All derived
/// attributes are recomputed on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BBox {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: f64,
    height: f64,
    area: f64,
    /// Points indexed in `Position::ALL` order.
    points: [(f64, f64); 9],
}

impl BBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut b = Self {
            x1,
            y1,
            x2,
            y2,
            width: 0.0,
            height: 0.0,
            area: 0.0,
            points: [(0.0, 0.0); 9],
        };
        b.recompute();
        b
    }

    /// Build from `(x, y, width, height)`.
    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }

    /// Full-image box for an image of the given size.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, f64::from(width), f64::from(height))
    }

    fn recompute(&mut self) {
        self.width = self.x2 - self.x1;
        self.height = self.y2 - self.y1;
        self.area = self.width * self.height;

        let (cx, cy) = (self.x1 + self.width / 2.0, self.y1 + self.height / 2.0);
        self.points = [
            (self.x1, self.y1),
            (cx, self.y1),
            (self.x2, self.y1),
            (self.x1, cy),
            (cx, cy),
            (self.x2, cy),
            (self.x1, self.y2),
            (cx, self.y2),
            (self.x2, self.y2),
        ];
    }

    pub fn x1(&self) -> f64 {
        self.x1
    }

    pub fn y1(&self) -> f64 {
        self.y1
    }

    pub fn x2(&self) -> f64 {
        self.x2
    }

    pub fn y2(&self) -> f64 {
        self.y2
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn center(&self) -> (f64, f64) {
        self[Position::Center]
    }

    pub fn xyxy(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    pub fn xywh(&self) -> [f64; 4] {
        [self.x1, self.y1, self.width, self.height]
    }

    /// Shift one edge by `amount` (added to that coordinate).
    pub fn adjust(&mut self, edge: Edge, amount: f64) -> &mut Self {
        match edge {
            Edge::X1 => self.x1 += amount,
            Edge::Y1 => self.y1 += amount,
            Edge::X2 => self.x2 += amount,
            Edge::Y2 => self.y2 += amount,
        }
        self.recompute();
        self
    }

    /// Move all four edges inward by `amount`.
    pub fn shrink(&mut self, amount: f64) -> &mut Self {
        self.x1 += amount;
        self.y1 += amount;
        self.x2 -= amount;
        self.y2 -= amount;
        self.recompute();
        self
    }

    /// Move all four edges outward by `amount`.
    pub fn expand(&mut self, amount: f64) -> &mut Self {
        self.shrink(-amount)
    }

    /// Coordinates rounded to the pixel grid.
    pub(crate) fn to_pixels(&self) -> (i32, i32, i32, i32) {
        (
            self.x1.round() as i32,
            self.y1.round() as i32,
            self.x2.round() as i32,
            self.y2.round() as i32,
        )
    }
}

impl Index<Position> for BBox {
    type Output = (f64, f64);

    fn index(&self, pos: Position) -> &Self::Output {
        &self.points[pos as usize]
    }
}

impl From<[f64; 4]> for BBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<(f64, f64, f64, f64)> for BBox {
    fn from((x1, y1, x2, y2): (f64, f64, f64, f64)) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<(u32, u32, u32, u32)> for BBox {
    fn from((x1, y1, x2, y2): (u32, u32, u32, u32)) -> Self {
        Self::new(f64::from(x1), f64::from(y1), f64::from(x2), f64::from(y2))
    }
}

impl From<BBox> for [f64; 4] {
    fn from(b: BBox) -> Self {
        b.xyxy()
    }
}

/// Convert `xyxy` to `xywh`.
pub fn xyxy_to_xywh([x1, y1, x2, y2]: [f64; 4]) -> [f64; 4] {
    [x1, y1, x2 - x1, y2 - y1]
}

/// Convert `xywh` to `xyxy`.
pub fn xywh_to_xyxy([x, y, w, h]: [f64; 4]) -> [f64; 4] {
    [x, y, x + w, y + h]
}
