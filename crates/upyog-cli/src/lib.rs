//! Library side of the `upyog` command-line tool.

pub mod args;
pub mod config;
pub mod detection;
pub mod download;
pub mod grid;

use std::path::Path;

use anyhow::Context;
use image::DynamicImage;
use tracing::{debug, info};
use upyog_image::io::save_jpeg;
use upyog_image::visualiser::BBoxOptions;
use upyog_image::{Color, LoadOptions, Visualiser, draw_rule_of_thirds, load_image};

pub use args::{Args, Command};
pub use config::AppConfig;

/// Run the command described by `args`.
pub fn run(args: &Args) -> anyhow::Result<()> {
    let config = AppConfig::load().with_args(args);
    debug!(?config, "Loaded configuration");

    match &args.command {
        Command::Grid(grid_args) => {
            let written = grid::run_grid(grid_args, &config)?;
            info!(count = written.len(), "Wrote grids");
        }
        Command::Download(d) => {
            let results = download::run_download(d, &config)?;
            let ok = results.iter().filter(|r| r.success).count();
            info!(ok, total = results.len(), "Finished downloads");
        }
        Command::Annotate(a) => annotate(a, &config)?,
        Command::Thirds(t) => thirds(t, &config)?,
    }
    Ok(())
}

/// Draw every detection from the JSON file onto the image.
pub fn annotate(args: &args::AnnotateArgs, config: &AppConfig) -> anyhow::Result<()> {
    let img = open(&args.image, config)?;
    let detections = detection::read_detections(&args.detections)?;

    let mut vis = Visualiser::new(img, config.font_path.as_deref(), config.font_size)?;
    let opts = BBoxOptions {
        style: args.style.into(),
        label_location: args.label_location.into(),
        ..BBoxOptions::default()
    };
    for det in &detections {
        vis.draw_bbox(&det.xyxy, det.label.as_deref(), det.confidence, &opts)?;
    }
    if let Some(text) = &args.caption {
        vis.caption(text, Color::WHITE);
    }
    info!(count = detections.len(), output = %args.output.display(), "Annotated image");

    save_output(vis.image(), &args.output, config.export_quality)
}

/// Overlay rule-of-thirds guides.
pub fn thirds(args: &args::ThirdsArgs, config: &AppConfig) -> anyhow::Result<()> {
    let img = open(&args.image, config)?;
    let out = draw_rule_of_thirds(&img, args.thickness, args.opacity);
    save_output(&out, &args.output, config.export_quality)
}

fn open(path: &Path, config: &AppConfig) -> anyhow::Result<DynamicImage> {
    let opts = LoadOptions {
        tolerate_truncated: config.tolerate_truncated,
        ..LoadOptions::default()
    };
    load_image(path, &opts).with_context(|| format!("failed to load {}", path.display()))
}

/// Save as JPEG for `.jpg`/`.jpeg` paths, otherwise by extension.
fn save_output(img: &DynamicImage, path: &Path, quality: u8) -> anyhow::Result<()> {
    let is_jpeg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "jpg" | "jpeg"));
    if is_jpeg {
        save_jpeg(img, path, quality)?;
    } else {
        img.save(path)
            .with_context(|| format!("failed to save {}", path.display()))?;
    }
    Ok(())
}
