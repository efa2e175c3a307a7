//! Command-line argument definitions for the `upyog` tool.
//!
//! Global flags (`--font`, `--font-size`, `--quality`) override values
//! loaded into [`AppConfig`](crate::config::AppConfig).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use upyog_image::text::LabelLocation;
use upyog_image::visualiser::BoxStyle;

/// Image grids, detection annotation and composition guides
#[derive(Parser, Debug)]
#[command(name = "upyog", author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Font file used for labels and captions (bundled font if omitted)
    #[arg(long, global = true)]
    pub font: Option<PathBuf>,

    /// Starting font size in pixels
    #[arg(long, global = true)]
    pub font_size: Option<f32>,

    /// JPEG export quality (1-100)
    #[arg(long, global = true)]
    pub quality: Option<u8>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build image grids from one or more folders
    Grid(GridArgs),
    /// Draw detection boxes and labels onto an image
    Annotate(AnnotateArgs),
    /// Overlay rule-of-thirds guides
    Thirds(ThirdsArgs),
    /// Download images listed in `*.url.txt` files
    Download(DownloadArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct GridArgs {
    /// Input folders
    #[arg(short = 'i', long = "input", num_args = 1.., required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output folder (created if it doesn't exist)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Width of each tile
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Height of each tile
    #[arg(long, default_value_t = 384)]
    pub height: u32,

    #[arg(long, default_value_t = 3)]
    pub num_columns: usize,

    /// Randomly sample this many files
    #[arg(long)]
    pub sample: Option<usize>,

    /// Shuffle the order of files
    #[arg(long)]
    pub shuffle: bool,

    /// Write one grid per input folder instead of a combined grid
    #[arg(long)]
    pub foreach: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct AnnotateArgs {
    pub image: PathBuf,

    /// JSON list of `{ "xyxy": [..], "label": .., "confidence": .. }`
    pub detections: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, value_enum, default_value_t = StyleArg::Rounded)]
    pub style: StyleArg,

    #[arg(long, value_enum, default_value_t = LocationArg::Bottom)]
    pub label_location: LocationArg,

    /// Caption drawn along the bottom of the image
    #[arg(long)]
    pub caption: Option<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ThirdsArgs {
    pub image: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,

    #[arg(long, default_value_t = upyog_image::draw::BAR_THICKNESS)]
    pub thickness: u32,

    #[arg(long, default_value_t = upyog_image::draw::BAR_OPACITY)]
    pub opacity: f32,
}

#[derive(clap::Args, Debug, Clone)]
pub struct DownloadArgs {
    /// Folder containing `*.url.txt` files, one URL each
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output folder for the JPEGs and `download_results.csv`
    #[arg(short, long)]
    pub output: PathBuf,

    /// Concurrent downloads (defaults to the number of CPUs)
    #[arg(long)]
    pub max_concurrent: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    Rounded,
    Sharp,
}

impl From<StyleArg> for BoxStyle {
    fn from(s: StyleArg) -> Self {
        match s {
            StyleArg::Rounded => BoxStyle::Rounded,
            StyleArg::Sharp => BoxStyle::Sharp,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationArg {
    Top,
    Bottom,
}

impl From<LocationArg> for LabelLocation {
    fn from(l: LocationArg) -> Self {
        match l {
            LocationArg::Top => LabelLocation::Top,
            LocationArg::Bottom => LabelLocation::Bottom,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grid_with_multiple_inputs() {
        let args = Args::try_parse_from([
            "upyog", "grid", "-i", "a", "b", "-o", "out", "--num-columns", "2", "--shuffle",
        ])
        .unwrap();
        let Command::Grid(grid) = args.command else {
            panic!("expected grid command");
        };
        assert_eq!(grid.inputs, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(grid.num_columns, 2);
        assert_eq!((grid.width, grid.height), (640, 384));
        assert!(grid.shuffle);
        assert!(!grid.foreach);
    }

    #[test]
    fn parses_annotate_options_and_global_flags() {
        let args = Args::try_parse_from([
            "upyog",
            "annotate",
            "img.jpg",
            "dets.json",
            "-o",
            "out.png",
            "--style",
            "sharp",
            "--label-location",
            "top",
            "--quality",
            "70",
        ])
        .unwrap();
        assert_eq!(args.quality, Some(70));
        let Command::Annotate(a) = args.command else {
            panic!("expected annotate command");
        };
        assert_eq!(BoxStyle::from(a.style), BoxStyle::Sharp);
        assert_eq!(LabelLocation::from(a.label_location), LabelLocation::Top);
        assert!(a.caption.is_none());
    }

    #[test]
    fn thirds_defaults() {
        let args = Args::try_parse_from(["upyog", "thirds", "img.jpg", "-o", "out.jpg"]).unwrap();
        let Command::Thirds(t) = args.command else {
            panic!("expected thirds command");
        };
        assert_eq!(t.thickness, 5);
        assert!((t.opacity - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn parses_download() {
        let args = Args::try_parse_from([
            "upyog", "download", "-i", "urls", "-o", "imgs", "--max-concurrent", "3",
        ])
        .unwrap();
        let Command::Download(d) = args.command else {
            panic!("expected download command");
        };
        assert_eq!(d.input, PathBuf::from("urls"));
        assert_eq!(d.output, PathBuf::from("imgs"));
        assert_eq!(d.max_concurrent, Some(3));
    }

    #[test]
    fn grid_requires_input() {
        assert!(Args::try_parse_from(["upyog", "grid", "-o", "out"]).is_err());
    }
}
