//! The 9-point compass grid used for text anchoring and box points.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VisError;

/// A symbolic position on a 3x3 compass grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Horizontal alignment of a text line relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical reference line of a text line placed on its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAnchor {
    /// Top of the line box (ascender).
    Top,
    /// Halfway between ascender and descender.
    Middle,
    /// Text baseline.
    Baseline,
}

/// How a text line is placed relative to a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub h: HAlign,
    pub v: VAnchor,
}

impl Position {
    pub const ALL: [Self; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::CenterLeft,
        Self::Center,
        Self::CenterRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Text anchor for a single line drawn at this position.
    ///
    /// `TopLeft` returns `None`: the raw top-left origin is used.
    pub fn anchor(self) -> Option<Anchor> {
        use HAlign::*;
        use VAnchor::*;
        let (h, v) = match self {
            Self::TopLeft => return None,
            Self::TopCenter => (Center, Top),
            Self::TopRight => (Right, Top),
            Self::CenterLeft => (Left, Middle),
            Self::Center => (Center, Middle),
            Self::CenterRight => (Right, Middle),
            Self::BottomLeft => (Left, Baseline),
            Self::BottomCenter => (Center, Baseline),
            Self::BottomRight => (Right, Baseline),
        };
        Some(Anchor { h, v })
    }

    pub fn h_align(self) -> HAlign {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => HAlign::Left,
            Self::TopCenter | Self::Center | Self::BottomCenter => HAlign::Center,
            Self::TopRight | Self::CenterRight | Self::BottomRight => HAlign::Right,
        }
    }

    pub fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopCenter | Self::TopRight)
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::BottomCenter | Self::BottomRight)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top_left",
            Self::TopCenter => "top_center",
            Self::TopRight => "top_right",
            Self::CenterLeft => "center_left",
            Self::Center => "center",
            Self::CenterRight => "center_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomCenter => "bottom_center",
            Self::BottomRight => "bottom_right",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = VisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| VisError::InvalidPosition(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_names() {
        for p in Position::ALL {
            assert_eq!(p.as_str().parse::<Position>().unwrap(), p);
        }
    }

    #[test]
    fn rejects_unknown_name() {
        let err = "middle".parse::<Position>().unwrap_err();
        assert!(matches!(err, VisError::InvalidPosition(s) if s == "middle"));
    }

    #[test]
    fn anchor_table() {
        assert_eq!(Position::TopLeft.anchor(), None);
        assert_eq!(
            Position::TopCenter.anchor(),
            Some(Anchor { h: HAlign::Center, v: VAnchor::Top })
        );
        assert_eq!(
            Position::CenterRight.anchor(),
            Some(Anchor { h: HAlign::Right, v: VAnchor::Middle })
        );
        assert_eq!(
            Position::BottomLeft.anchor(),
            Some(Anchor { h: HAlign::Left, v: VAnchor::Baseline })
        );
        assert_eq!(
            Position::BottomCenter.anchor(),
            Some(Anchor { h: HAlign::Center, v: VAnchor::Baseline })
        );
    }

    #[test]
    fn serde_uses_snake_case() {
        let p: Position = serde_json::from_str("\"bottom_right\"").unwrap();
        assert_eq!(p, Position::BottomRight);
    }
}
