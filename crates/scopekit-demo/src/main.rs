//! Scopekit Demo: renders live scopes for a still image or test pattern.
//!
//! A simulated capture task republishes the source frame at a fixed rate
//! into the latest-frame slot while the scheduler analyzes it at the scope
//! cadence. After the requested number of cycles the last set of scope
//! images is written to the output directory as PNG files.
//!
//! ```text
//! scopekit-demo [IMAGE]
//! RUST_LOG=debug SCOPEKIT_CROP=0.25,0.25,0.5,0.5 scopekit-demo clip.png
//! ```

mod config;
mod image_loader;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use scopekit_core::{ConfigError, OwnedFrame, ScopeConfig, ScopeImages};
use scopekit_runtime::{LatestFrameSlot, RuntimeError, ScopePipeline, ScopeScheduler, SharedControls};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use config::DemoConfig;
use image_loader::ImageLoadError;

/// Size of the generated test pattern.
const PATTERN_SIZE: (u32, u32) = (1280, 720);

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Image(#[from] ImageLoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("scheduler stopped before producing any scopes")]
    NoOutput,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(DemoConfig::default()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(demo: DemoConfig) -> Result<(), DemoError> {
    let scope_config = match &demo.scope_config {
        Some(path) => ScopeConfig::load(path)?,
        None => ScopeConfig::default(),
    }
    .with_env_overrides();
    if let Ok(json) = serde_json::to_string(&scope_config) {
        tracing::debug!("scope config: {json}");
    }

    let frame = match &demo.input {
        Some(path) => image_loader::load_frame(path)?,
        None => {
            tracing::info!("no input image, using {}x{} test pattern", PATTERN_SIZE.0, PATTERN_SIZE.1);
            image_loader::test_pattern(PATTERN_SIZE.0, PATTERN_SIZE.1)
        }
    };

    let controls = SharedControls::new(scope_config.visibility);
    if let Some(crop) = demo.crop {
        tracing::info!("cropping analysis to {crop:?}");
        controls.set_crop(crop);
    }

    let slot = Arc::new(LatestFrameSlot::new());
    let producer = tokio::spawn(simulate_capture(Arc::clone(&slot), frame, demo.source_fps));

    let (tx, mut rx) = mpsc::unbounded_channel::<ScopeImages>();
    let handle = ScopeScheduler::spawn(
        Arc::clone(&slot),
        move |images: ScopeImages| {
            // The receiver closes once enough cycles have been collected.
            let _ = tx.send(images);
        },
        controls,
        ScopePipeline::new(scope_config),
    );

    let mut last = None;
    for _ in 0..demo.cycles {
        match rx.recv().await {
            Some(images) => last = Some(images),
            None => break,
        }
    }
    rx.close();

    let pipeline = handle.shutdown().await?;
    producer.abort();
    tracing::info!(
        "source published {} frames, {} never analyzed; {} cycles, {} skipped",
        slot.published(),
        slot.dropped(),
        pipeline.stats().cycles,
        pipeline.stats().skipped
    );

    let images = last.ok_or(DemoError::NoOutput)?;
    write_images(&images, &demo.output_dir)
}

/// Republish the same frame at `fps`, standing in for a live capture.
async fn simulate_capture(slot: Arc<LatestFrameSlot>, frame: OwnedFrame, fps: u32) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1) / fps.max(1));
    loop {
        ticker.tick().await;
        slot.publish(frame.clone());
    }
}

fn write_images(images: &ScopeImages, dir: &std::path::Path) -> Result<(), DemoError> {
    std::fs::create_dir_all(dir).map_err(|source| DemoError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    for (kind, raster) in images.iter() {
        let path = dir.join(format!("{}.png", kind.id()));
        raster
            .as_image()
            .save(&path)
            .map_err(|source| DemoError::Save {
                path: path.clone(),
                source,
            })?;
        tracing::info!("wrote {} ({}x{})", path.display(), raster.width(), raster.height());
    }
    Ok(())
}
