//! The `download` subcommand: fetch images listed in `*.url.txt` files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use reqwest::Client;
use tracing::{debug, info, warn};
use upyog_image::io::save_jpeg;

use crate::args::DownloadArgs;
use crate::config::AppConfig;

/// Suffix of files holding one image URL each.
pub const URL_FILE_SUFFIX: &str = ".url.txt";

/// Report written into the output folder.
pub const RESULTS_FILE: &str = "download_results.csv";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome for one URL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadResult {
    pub url_file: PathBuf,
    pub success: bool,
    pub reason: Option<String>,
}

/// Blocking entry point used by the CLI.
pub fn run_download(
    args: &DownloadArgs,
    config: &AppConfig,
) -> anyhow::Result<Vec<DownloadResult>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(download_all(args, config))
}

/// Download every URL file in `args.input` and write the CSV report.
pub async fn download_all(
    args: &DownloadArgs,
    config: &AppConfig,
) -> anyhow::Result<Vec<DownloadResult>> {
    if !args.input.is_dir() {
        bail!("input '{}' is not a folder", args.input.display());
    }
    let url_files = url_files(&args.input)?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
    let max_concurrent = args.max_concurrent.unwrap_or_else(default_concurrency).max(1);
    let total = url_files.len();
    info!(total, max_concurrent, "Downloading images");

    let futs = url_files.into_iter().map(|url_file| {
        let client = &client;
        let output = args.output.as_path();
        async move { download_one(client, url_file, output, config.export_quality).await }
    });
    let mut results: Vec<DownloadResult> = stream::iter(futs)
        .buffer_unordered(max_concurrent)
        .collect()
        .await;
    results.sort_by(|a, b| a.url_file.cmp(&b.url_file));

    let ok = results.iter().filter(|r| r.success).count();
    let rate = if total == 0 { 0.0 } else { ok as f64 / total as f64 * 100.0 };
    info!(ok, total, rate = format!("{rate:.2}%"), "Downloaded images");

    let report = args.output.join(RESULTS_FILE);
    std::fs::write(&report, to_csv(&results))
        .with_context(|| format!("failed to write {}", report.display()))?;
    info!(report = %report.display(), "Saved download results");
    Ok(results)
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism().map_or(4, |n| n.get())
}

/// `*.url.txt` files directly inside `dir`, sorted.
pub fn url_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !name.ends_with(URL_FILE_SUFFIX) {
            continue;
        }
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// `cat.url.txt` -> `cat.jpg` inside `output`.
fn output_path(url_file: &Path, output: &Path) -> PathBuf {
    let name = url_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = name.strip_suffix(URL_FILE_SUFFIX).unwrap_or(&name);
    output.join(format!("{stem}.jpg"))
}

async fn download_one(
    client: &Client,
    url_file: PathBuf,
    output: &Path,
    quality: u8,
) -> DownloadResult {
    match fetch_and_save(client, &url_file, output, quality).await {
        Ok(saved) => {
            debug!(
                url_file = %url_file.display(),
                saved = %saved.display(),
                "Downloaded image"
            );
            DownloadResult {
                url_file,
                success: true,
                reason: None,
            }
        }
        Err(e) => {
            warn!(url_file = %url_file.display(), error = %e, "Download failed");
            DownloadResult {
                url_file,
                success: false,
                reason: Some(format!("{e:#}")),
            }
        }
    }
}

async fn fetch_and_save(
    client: &Client,
    url_file: &Path,
    output: &Path,
    quality: u8,
) -> anyhow::Result<PathBuf> {
    let url = tokio::fs::read_to_string(url_file).await?.trim().to_string();
    let bytes = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;
    let img = image::load_from_memory(&bytes).map_err(|_| anyhow!("Invalid image data"))?;
    let img = DynamicImage::ImageRgb8(img.to_rgb8());

    let out = output_path(url_file, output);
    let target = out.clone();
    tokio::task::spawn_blocking(move || save_jpeg(&img, &target, quality)).await??;
    Ok(out)
}

/// Render results as `url_file,success,reason` CSV.
pub fn to_csv(results: &[DownloadResult]) -> String {
    let mut csv = String::from("url_file,success,reason\n");
    for r in results {
        let reason = r.reason.as_deref().unwrap_or("");
        csv.push_str(&format!(
            "{},{},{}\n",
            csv_field(&r.url_file.to_string_lossy()),
            r.success,
            csv_field(reason)
        ));
    }
    csv
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::header;
    use axum::routing::get;
    use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        RgbaImage::from_pixel(12, 8, Rgba([10, 200, 30, 255]))
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    /// Serve a PNG at `/cat.png` and plain text at `/text`; returns the base URL.
    async fn serve_fixtures() -> String {
        let png = png_bytes();
        let app = Router::new()
            .route(
                "/cat.png",
                get(move || {
                    let png = png.clone();
                    async move { ([(header::CONTENT_TYPE, "image/png")], png) }
                }),
            )
            .route("/text", get(|| async { "not an image" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        format!("http://{addr}")
    }

    fn download_args(input: PathBuf, output: PathBuf) -> DownloadArgs {
        DownloadArgs {
            input,
            output,
            max_concurrent: Some(2),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn downloads_images_and_reports_failures() {
        let base = serve_fixtures().await;
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().join("urls");
        let output = tmp.path().join("images");
        std::fs::create_dir_all(&input).unwrap();
        std::fs::write(input.join("cat.url.txt"), format!("{base}/cat.png\n")).unwrap();
        std::fs::write(input.join("text.url.txt"), format!("{base}/text")).unwrap();
        std::fs::write(input.join("gone.url.txt"), format!("{base}/missing.png")).unwrap();
        std::fs::write(input.join("notes.txt"), "ignored").unwrap();

        let args = download_args(input.clone(), output.clone());
        let results = download_all(&args, &AppConfig::default()).await.unwrap();

        assert_eq!(results.len(), 3);
        let by_name = |name: &str| {
            results
                .iter()
                .find(|r| r.url_file == input.join(name))
                .unwrap()
        };
        assert!(by_name("cat.url.txt").success);
        assert_eq!(
            by_name("text.url.txt").reason.as_deref(),
            Some("Invalid image data")
        );
        assert!(by_name("gone.url.txt").reason.as_deref().unwrap().contains("404"));

        let saved = image::open(output.join("cat.jpg")).unwrap();
        assert_eq!(saved.dimensions(), (12, 8));
        assert!(!output.join("text.jpg").exists());

        let report = std::fs::read_to_string(output.join(RESULTS_FILE)).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "url_file,success,reason");
        assert_eq!(lines.len(), 4);
        assert_eq!(report.matches(",true,").count(), 1);
    }

    #[tokio::test]
    async fn rejects_missing_input_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let args = download_args(tmp.path().join("nope"), tmp.path().join("out"));
        let err = download_all(&args, &AppConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("is not a folder"));
    }

    #[test]
    fn lists_only_visible_url_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path();
        std::fs::write(dir.join("b.url.txt"), "x").unwrap();
        std::fs::write(dir.join("a.url.txt"), "x").unwrap();
        std::fs::write(dir.join("._a.url.txt"), "x").unwrap();
        std::fs::write(dir.join("c.txt"), "x").unwrap();

        let files = url_files(dir).unwrap();
        assert_eq!(files, vec![dir.join("a.url.txt"), dir.join("b.url.txt")]);
    }

    #[test]
    fn output_name_drops_url_suffix() {
        let out = output_path(Path::new("/in/photo.v2.url.txt"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/photo.v2.jpg"));
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        let results = vec![
            DownloadResult {
                url_file: PathBuf::from("a.url.txt"),
                success: true,
                reason: None,
            },
            DownloadResult {
                url_file: PathBuf::from("b.url.txt"),
                success: false,
                reason: Some("bad \"gateway\", retry".into()),
            },
        ];
        let csv = to_csv(&results);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[1], "a.url.txt,true,");
        assert_eq!(lines[2], r#"b.url.txt,false,"bad ""gateway"", retry""#);
    }
}
