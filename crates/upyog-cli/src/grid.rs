//! The `grid` subcommand: build image grids from folders.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{info, warn};
use upyog_image::io::{ColorMode, image_files, save_jpeg};
use upyog_image::{GridOptions, LoadOptions, load_image, make_img_grid};

use crate::args::GridArgs;
use crate::config::AppConfig;

/// File name of the combined grid.
pub const COMBINED_GRID_NAME: &str = "Image-Grid.jpg";

/// Build the grid(s) and return the written paths.
pub fn run_grid(args: &GridArgs, config: &AppConfig) -> anyhow::Result<Vec<PathBuf>> {
    run_grid_with_rng(args, config, &mut rand::thread_rng())
}

pub fn run_grid_with_rng<R: Rng + ?Sized>(
    args: &GridArgs,
    config: &AppConfig,
    rng: &mut R,
) -> anyhow::Result<Vec<PathBuf>> {
    for input in &args.inputs {
        if !input.is_dir() {
            bail!("input '{}' is not a folder", input.display());
        }
    }
    if args.output.extension().is_some() {
        bail!(
            "expected a folder path for output, got a file path: {}",
            args.output.display()
        );
    }
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut written = Vec::new();
    if args.foreach {
        for input in &args.inputs {
            let files = image_files(input)?;
            let name = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "grid".to_string());
            let out = args.output.join(format!("{name}.jpg"));
            write_grid(files, &out, args, config, rng)?;
            written.push(out);
        }
    } else {
        let mut files = Vec::new();
        for input in &args.inputs {
            files.extend(image_files(input)?);
        }
        let out = args.output.join(COMBINED_GRID_NAME);
        write_grid(files, &out, args, config, rng)?;
        written.push(out);
    }
    Ok(written)
}

fn write_grid<R: Rng + ?Sized>(
    files: Vec<PathBuf>,
    out: &Path,
    args: &GridArgs,
    config: &AppConfig,
    rng: &mut R,
) -> anyhow::Result<()> {
    let files = select_files(files, args.sample, args.shuffle, rng);
    info!(count = files.len(), output = %out.display(), "Building image grid");

    let load_opts = LoadOptions {
        mode: Some(ColorMode::Rgb),
        tolerate_truncated: config.tolerate_truncated,
    };
    let images = files
        .iter()
        .map(|f| {
            load_image(f, &load_opts).with_context(|| format!("failed to load {}", f.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let opts = GridOptions {
        num_columns: args.num_columns,
        target_size: Some((args.width, args.height)),
        pad: true,
        verbose: true,
    };
    let grid = make_img_grid(&images, &opts)
        .with_context(|| format!("failed to build grid for {}", out.display()))?;
    save_jpeg(&grid, out, config.export_quality)?;
    info!(w = grid.width(), h = grid.height(), output = %out.display(), "Saved image grid");
    Ok(())
}

/// Optionally sample `n` files, then optionally shuffle them.
pub fn select_files<R: Rng + ?Sized>(
    mut files: Vec<PathBuf>,
    sample: Option<usize>,
    shuffle: bool,
    rng: &mut R,
) -> Vec<PathBuf> {
    if let Some(n) = sample {
        if n > files.len() {
            warn!(
                requested = n,
                available = files.len(),
                "Sample larger than file count, using all files"
            );
        } else {
            files = files.choose_multiple(rng, n).cloned().collect();
        }
    }
    if shuffle {
        files.shuffle(rng);
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn write_test_image(path: &Path, width: u32, height: u32) {
        RgbImage::from_pixel(width, height, Rgb([120, 60, 30])).save(path).unwrap();
    }

    fn grid_args(inputs: Vec<PathBuf>, output: PathBuf) -> GridArgs {
        GridArgs {
            inputs,
            output,
            width: 40,
            height: 20,
            num_columns: 2,
            sample: None,
            shuffle: false,
            foreach: false,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn combined_grid_from_two_folders() {
        let tmp = tempfile::tempdir().unwrap();
        let (a, b) = (tmp.path().join("a"), tmp.path().join("b"));
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        write_test_image(&a.join("1.png"), 30, 30);
        write_test_image(&a.join("2.png"), 60, 10);
        write_test_image(&b.join("3.jpg"), 10, 50);

        let out_dir = tmp.path().join("out");
        let args = grid_args(vec![a, b], out_dir.clone());
        let written = run_grid_with_rng(&args, &AppConfig::default(), &mut rng()).unwrap();

        assert_eq!(written, vec![out_dir.join(COMBINED_GRID_NAME)]);
        let grid = image::open(&written[0]).unwrap();
        assert_eq!(grid.dimensions(), (80, 40));
    }

    #[test]
    fn foreach_writes_one_grid_per_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let (a, b) = (tmp.path().join("cats"), tmp.path().join("dogs"));
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        write_test_image(&a.join("1.png"), 30, 30);
        write_test_image(&b.join("1.png"), 30, 30);

        let out_dir = tmp.path().join("out");
        let mut args = grid_args(vec![a, b], out_dir.clone());
        args.foreach = true;
        let written = run_grid_with_rng(&args, &AppConfig::default(), &mut rng()).unwrap();

        assert_eq!(written, vec![out_dir.join("cats.jpg"), out_dir.join("dogs.jpg")]);
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn hidden_junk_files_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        std::fs::create_dir_all(a.join(".thumbs")).unwrap();
        write_test_image(&a.join("a.png"), 30, 30);
        std::fs::write(a.join("._a.png"), b"\x00\x05\x16\x07 resource fork").unwrap();
        std::fs::write(a.join(".thumbs").join("t.png"), b"not a png").unwrap();

        let out_dir = tmp.path().join("out");
        let args = grid_args(vec![a], out_dir.clone());
        let written = run_grid_with_rng(&args, &AppConfig::default(), &mut rng()).unwrap();

        let grid = image::open(&written[0]).unwrap();
        assert_eq!(grid.dimensions(), (40, 20));
    }

    #[test]
    fn rejects_file_like_output() {
        let tmp = tempfile::tempdir().unwrap();
        let args = grid_args(vec![tmp.path().to_path_buf()], tmp.path().join("grid.jpg"));
        let err = run_grid_with_rng(&args, &AppConfig::default(), &mut rng()).unwrap_err();
        assert!(err.to_string().contains("expected a folder path"));
    }

    #[test]
    fn rejects_non_folder_input() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("x.png");
        write_test_image(&file, 4, 4);
        let args = grid_args(vec![file], tmp.path().join("out"));
        let err = run_grid_with_rng(&args, &AppConfig::default(), &mut rng()).unwrap_err();
        assert!(err.to_string().contains("is not a folder"));
    }

    #[test]
    fn empty_folder_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("empty");
        std::fs::create_dir_all(&input).unwrap();
        let args = grid_args(vec![input], tmp.path().join("out"));
        assert!(run_grid_with_rng(&args, &AppConfig::default(), &mut rng()).is_err());
    }

    #[test]
    fn sample_picks_subset() {
        let files: Vec<PathBuf> = (0..10).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();
        let picked = select_files(files.clone(), Some(3), false, &mut rng());
        assert_eq!(picked.len(), 3);
        assert!(picked.iter().all(|p| files.contains(p)));
    }

    #[test]
    fn oversized_sample_keeps_all() {
        let files: Vec<PathBuf> = (0..4).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();
        let picked = select_files(files.clone(), Some(10), false, &mut rng());
        assert_eq!(picked, files);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let files: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("{i}.jpg"))).collect();
        let mut shuffled = select_files(files.clone(), None, true, &mut rng());
        shuffled.sort();
        let mut sorted = files;
        sorted.sort();
        assert_eq!(shuffled, sorted);
    }

    #[test]
    fn tiles_are_letterboxed() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("in");
        std::fs::create_dir_all(&input).unwrap();
        // 20x20 into a 40x20 tile leaves black bars left and right
        write_test_image(&input.join("sq.png"), 20, 20);

        let mut args = grid_args(vec![input], tmp.path().join("out"));
        args.num_columns = 1;
        let written = run_grid_with_rng(&args, &AppConfig::default(), &mut rng()).unwrap();
        let grid: DynamicImage = image::open(&written[0]).unwrap();
        let rgb = grid.to_rgb8();
        assert_eq!(grid.dimensions(), (40, 20));
        assert!(rgb.get_pixel(1, 10)[0] < 20);
        assert!(rgb.get_pixel(20, 10)[0] > 90);
    }
}
