//! Runtime configuration loaded from `.env` + `UPYOG_*` environment variables.

use std::path::PathBuf;

use upyog_image::font::DEFAULT_FONT_SIZE;

use crate::args::Args;

/// Runtime configuration; command-line flags are applied on top.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `None` uses the bundled font.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub export_quality: u8,
    pub tolerate_truncated: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            export_quality: 85,
            tolerate_truncated: false,
        }
    }
}

impl AppConfig {
    /// Load `.env` (if any), then read configuration from the environment.
    pub fn load() -> Self {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from a key lookup; missing or unparsable values keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let g = |key: &str| -> String { lookup(key).unwrap_or_default() };
        let defaults = Self::default();

        Self {
            font_path: {
                let p = g("UPYOG_FONT_PATH");
                if p.is_empty() { None } else { Some(PathBuf::from(p)) }
            },
            font_size: parse_f32(&g("UPYOG_FONT_SIZE"), defaults.font_size),
            export_quality: parse_u8(&g("UPYOG_EXPORT_QUALITY"), defaults.export_quality),
            tolerate_truncated: g("UPYOG_TOLERATE_TRUNCATED") == "true",
        }
    }

    /// Apply global command-line overrides.
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(font) = &args.font {
            self.font_path = Some(font.clone());
        }
        if let Some(size) = args.font_size {
            self.font_size = size;
        }
        if let Some(quality) = args.quality {
            self.export_quality = quality;
        }
        self
    }
}

/// Load .env from candidate paths.
fn load_dotenv() {
    let candidates = [".env", "../.env"];
    for path in &candidates {
        if dotenvy::from_filename(path).is_ok() {
            tracing::debug!("Loaded .env from: {path}");
            return;
        }
    }
}

fn parse_f32(s: &str, default: f32) -> f32 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

fn parse_u8(s: &str, default: u8) -> u8 {
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}
