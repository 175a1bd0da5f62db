//! Scrubline - headless scrubbing demo
//!
//! Drives a `TimeSelector` through a scripted drag, scroll and programmatic
//! seek, printing every selection event and the thumbnails that land.
//!
//! Without a video a synthetic colour-bar extractor is used. With one,
//! frames come from `ffmpeg` on the PATH; `--duration` must then match the
//! video's length.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use scrubline_core::RationalTime;
use scrubline_media::{AssetInfo, FfmpegExtractor, FrameExtractor, TestPatternExtractor};
use scrubline_select::{
    DragEvent, GestureSource, PreviewStrip, SelectionEvent, SelectorConfig, TimeSelector,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SelectorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SelectorConfig::default(),
    };

    // RUST_LOG wins over the configured filter.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Scrubline starting...");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to start runtime")?;

    let duration = RationalTime::from_seconds_f64(args.duration);
    let extractor: Arc<dyn FrameExtractor> = match &args.video {
        Some(path) => {
            let asset = AssetInfo::open(path, duration)
                .with_context(|| format!("cannot open {}", path.display()))?;
            info!(path = %path.display(), "Extracting frames with ffmpeg");
            Arc::new(FfmpegExtractor::new(asset))
        }
        None => {
            let asset = AssetInfo::new("colour-bars", duration, 1920, 1080);
            Arc::new(TestPatternExtractor::new(asset).with_latency(Duration::from_millis(15)))
        }
    };

    let mut selector = TimeSelector::new(
        PreviewStrip::new(args.width),
        config,
        extractor,
        runtime.handle().clone(),
    )?;
    selector.subscribe(|event| match event {
        SelectionEvent::Changed(time) => println!("changed  {time}"),
        SelectionEvent::Ended(time) => println!("ended    {time}"),
    });

    selector.on_asset_changed(duration)?;
    settle(&mut selector);

    // Touch the track a third of the way in, then drag right.
    let touch = args.width / 3.0;
    selector.handle_drag(&DragEvent::begin(GestureSource::Track, touch));
    for step in 1..=8 {
        selector.handle_drag(&DragEvent::change(GestureSource::Track, step as f64 * 25.0));
        selector.pump();
    }
    selector.handle_drag(&DragEvent::end(GestureSource::Track, 200.0));
    settle(&mut selector);

    // Grab the thumb and overshoot the right edge.
    selector.handle_drag(&DragEvent::begin(GestureSource::Thumb, touch + 200.0));
    selector.handle_drag(&DragEvent::change(GestureSource::Thumb, args.width));
    selector.handle_drag(&DragEvent::end(GestureSource::Thumb, args.width));
    settle(&mut selector);

    selector.host_mut().set_scroll_offset(-40.0);
    selector.on_scroll_changed();
    settle(&mut selector);

    let midpoint = duration.scale(0.5);
    info!(%midpoint, "Seeking programmatically");
    selector.set_time(midpoint);
    settle(&mut selector);

    let stats = selector.coordinator().stats();
    info!(
        requested = stats.requested,
        delivered = stats.delivered,
        cancelled = stats.cancelled,
        superseded = stats.superseded,
        failed = stats.failed,
        "Done"
    );
    Ok(())
}

/// Wait for the outstanding thumbnail and report what is on screen.
fn settle(selector: &mut TimeSelector<PreviewStrip>) {
    match selector.wait_for_thumbnail(FETCH_TIMEOUT) {
        Some(outcome) => info!(?outcome, "Thumbnail fetch settled"),
        None => warn!("No thumbnail fetch settled"),
    }
    if let Some(thumbnail) = selector.displayed_thumbnail() {
        println!(
            "showing  {} ({}x{})",
            thumbnail.time, thumbnail.width, thumbnail.height
        );
    }
}
