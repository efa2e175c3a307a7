//! Detection records read from JSON files.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use upyog_image::BBox;

/// One detected object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub xyxy: BBox,
    #[serde(default)]
    pub label: Option<String>,
    /// Fraction in `0.0..=1.0`.
    #[serde(default)]
    pub confidence: Option<f32>,
}

/// Read a JSON array of detections.
pub fn read_detections(path: &Path) -> anyhow::Result<Vec<Detection>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read detections from {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("invalid detections file {}", path.display()))
}
