mod app;
mod bucket;
mod config;
mod util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::bucket::JsonBucketStore;
use crate::config::LabelStrategy;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Bucket JSON document with `bucketId`, `sources` and `connections`.
    #[arg(long, default_value = "bucket.json")]
    bucket: PathBuf,

    /// Bucket to show; defaults to the one stored in the document.
    #[arg(long)]
    bucket_id: Option<String>,

    /// Graph config file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// `light` or `dark`.
    #[arg(long, default_value = "dark")]
    theme: String,

    /// Label wrapping strategy, overrides the config file.
    #[arg(long, value_enum)]
    labels: Option<LabelStrategy>,

    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("bucket_graph=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = config::load(args.config.as_deref()).context("failed to load graph config")?;
    if let Some(strategy) = args.labels {
        config.labels.strategy = strategy;
    }

    let store = JsonBucketStore::new(&args.bucket);
    let bucket_id = match args.bucket_id {
        Some(bucket_id) => bucket_id,
        None => store.bucket_id()?,
    };
    tracing::info!(path = %store.path().display(), bucket_id = %bucket_id, "opening bucket");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 820.0]),
        ..Default::default()
    };
    let store = Arc::new(store);
    let theme = args.theme;

    eframe::run_native(
        "bucket-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::BucketGraphApp::new(
                cc, store, bucket_id, config, &theme,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the graph window: {error}"))
}
