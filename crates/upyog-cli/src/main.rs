//! `upyog` entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use upyog_cli::Args;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    tracing::debug!(?args, "Parsed arguments");

    upyog_cli::run(&args)
}
