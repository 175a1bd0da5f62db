//! Integration tests for thumbnail fetching.
//!
//! Exercises the ordering guarantees of scrubline-select's coordinator with
//! extractors from scrubline-media and a gated test extractor.

use parking_lot::Mutex;
use scrubline_core::{RationalTime, Result, ScrubError, Thumbnail};
use scrubline_media::{AssetInfo, FetchCancel, FrameExtractor, TestPatternExtractor, ThumbnailSize};
use scrubline_select::{
    DragEvent, FetchOutcome, FetchPhase, GestureSource, PreviewStrip, SelectorConfig,
    TimeSelector,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;

const WAIT: Duration = Duration::from_secs(5);

// ── Helpers ────────────────────────────────────────────────────

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

fn config() -> SelectorConfig {
    SelectorConfig {
        thumb_width: 100.0,
        thumbnail_width: 32,
        thumbnail_height: 18,
        ..Default::default()
    }
}

fn selector(rt: &Runtime, extractor: Arc<dyn FrameExtractor>) -> TimeSelector<PreviewStrip> {
    TimeSelector::new(PreviewStrip::new(1000.0), config(), extractor, rt.handle().clone())
        .unwrap()
}

fn bars(duration: RationalTime) -> Arc<TestPatternExtractor> {
    Arc::new(TestPatternExtractor::new(AssetInfo::new(
        "media/test.mp4",
        duration,
        1920,
        1080,
    )))
}

/// Extractor whose calls for gated instants block until released, ignoring
/// cancellation so that stale results really do arrive late.
#[derive(Default)]
struct GatedExtractor {
    gates: Mutex<HashMap<RationalTime, crossbeam_channel::Receiver<()>>>,
    started: Mutex<Vec<RationalTime>>,
}

impl GatedExtractor {
    fn gate(&self, time: RationalTime) -> crossbeam_channel::Sender<()> {
        let (tx, rx) = crossbeam_channel::bounded(1);
        self.gates.lock().insert(time, rx);
        tx
    }

    fn wait_started(&self, time: RationalTime) {
        let deadline = Instant::now() + WAIT;
        while !self.started.lock().contains(&time) && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

impl FrameExtractor for GatedExtractor {
    fn extract(
        &self,
        time: RationalTime,
        size: ThumbnailSize,
        _cancel: &FetchCancel,
    ) -> Result<Thumbnail> {
        self.started.lock().push(time);
        let gate = self.gates.lock().get(&time).cloned();
        if let Some(gate) = gate {
            let _ = gate.recv_timeout(WAIT);
        }
        Ok(Thumbnail::test_pattern(size.width, size.height, 0.5, time))
    }
}

/// Always fails, as a missing or corrupt source would.
struct BrokenExtractor;

impl FrameExtractor for BrokenExtractor {
    fn extract(&self, _: RationalTime, _: ThumbnailSize, _: &FetchCancel) -> Result<Thumbnail> {
        Err(ScrubError::Extraction("decoder unavailable".into()))
    }
}

// ── Ordering ───────────────────────────────────────────────────

#[test]
fn late_older_fetch_is_never_shown() {
    let rt = runtime();
    let gated = Arc::new(GatedExtractor::default());
    let mut selector = selector(&rt, gated.clone());
    let duration = RationalTime::from_secs(100);
    let t1 = RationalTime::from_secs(20);
    let t2 = RationalTime::from_secs(60);
    let release_t1 = gated.gate(t1);

    selector.on_asset_changed(duration).unwrap();
    selector.wait_for_thumbnail(WAIT);

    let g1 = selector.set_time(t1).unwrap().generation;
    gated.wait_started(t1);
    let g2 = selector.set_time(t2).unwrap().generation;
    assert!(g1 < g2);

    assert_eq!(selector.wait_for_thumbnail(WAIT), Some(FetchOutcome::Delivered));
    assert_eq!(selector.displayed_thumbnail().unwrap().time, t2);

    release_t1.send(()).unwrap();
    let deadline = Instant::now() + WAIT;
    while selector.coordinator().stats().superseded == 0 && Instant::now() < deadline {
        selector.pump();
        std::thread::sleep(Duration::from_millis(1));
    }

    assert_eq!(selector.coordinator().stats().superseded, 1);
    assert_eq!(selector.displayed_thumbnail().unwrap().time, t2);
}

#[test]
fn rapid_drag_shows_final_position() {
    let rt = runtime();
    let duration = RationalTime::from_secs(100);
    let extractor = Arc::new(
        TestPatternExtractor::new(AssetInfo::new("media/test.mp4", duration, 1920, 1080))
            .with_latency(Duration::from_millis(5)),
    );
    let mut selector = selector(&rt, extractor);
    selector.on_asset_changed(duration).unwrap();

    selector.handle_drag(&DragEvent::begin(GestureSource::Track, 100.0));
    for step in 1..=20 {
        selector.handle_drag(&DragEvent::change(GestureSource::Track, step as f64 * 10.0));
    }
    selector.handle_drag(&DragEvent::end(GestureSource::Track, 200.0));

    assert_eq!(selector.wait_for_thumbnail(WAIT), Some(FetchOutcome::Delivered));
    let shown = selector.displayed_thumbnail().unwrap();
    assert_eq!(Some(shown.time), selector.selected_time());
    assert!(selector.coordinator().stats().cancelled >= 20);
}

// ── Fetch range ────────────────────────────────────────────────

#[test]
fn fetch_past_end_is_pinned_to_duration() {
    let rt = runtime();
    let duration = RationalTime::from_secs(100);
    let mut selector = selector(&rt, bars(duration));
    selector.on_asset_changed(duration).unwrap();

    selector.handle_drag(&DragEvent::begin(GestureSource::Thumb, 50.0));
    selector.handle_drag(&DragEvent::end(GestureSource::Thumb, 2000.0));
    assert!(selector.selected_time().unwrap() > duration);

    assert_eq!(selector.wait_for_thumbnail(WAIT), Some(FetchOutcome::Delivered));
    assert_eq!(selector.displayed_thumbnail().unwrap().time, duration);
}

#[test]
fn negative_scroll_fetch_is_pinned_to_zero() {
    let rt = runtime();
    let duration = RationalTime::from_secs(100);
    let mut selector = selector(&rt, bars(duration));
    selector.on_asset_changed(duration).unwrap();
    selector.wait_for_thumbnail(WAIT);

    // Rubber-band overscroll past the leading edge.
    selector.host_mut().set_scroll_offset(-200.0);
    let reported = selector.on_scroll_changed().unwrap();
    assert!(reported.is_negative());

    selector.wait_for_thumbnail(WAIT);
    assert_eq!(selector.displayed_thumbnail().unwrap().time, RationalTime::ZERO);
}

// ── Failure and lifecycle ──────────────────────────────────────

#[test]
fn failed_fetch_keeps_previous_thumbnail() {
    let rt = runtime();
    // The extractor only knows the first half of what the strip shows.
    let mut selector = selector(&rt, bars(RationalTime::from_secs(50)));
    selector.on_asset_changed(RationalTime::from_secs(100)).unwrap();
    selector.set_time(RationalTime::from_secs(30));
    assert_eq!(selector.wait_for_thumbnail(WAIT), Some(FetchOutcome::Delivered));

    selector.set_time(RationalTime::from_secs(80));
    assert_eq!(selector.wait_for_thumbnail(WAIT), Some(FetchOutcome::Failed));
    assert_eq!(
        selector.displayed_thumbnail().unwrap().time,
        RationalTime::from_secs(30)
    );
    assert_eq!(selector.coordinator().stats().failed, 1);
}

#[test]
fn swapping_extractor_clears_display() {
    let rt = runtime();
    let duration = RationalTime::from_secs(100);
    let mut selector = selector(&rt, bars(duration));
    selector.on_asset_changed(duration).unwrap();
    assert_eq!(selector.wait_for_thumbnail(WAIT), Some(FetchOutcome::Delivered));

    selector.set_extractor(Arc::new(BrokenExtractor));
    assert!(selector.displayed_thumbnail().is_none());

    selector.set_time(RationalTime::from_secs(10));
    assert_eq!(selector.wait_for_thumbnail(WAIT), Some(FetchOutcome::Failed));
    assert!(selector.displayed_thumbnail().is_none());
}

#[test]
fn displayed_handle_reads_from_another_thread() {
    let rt = runtime();
    let duration = RationalTime::from_secs(100);
    let mut selector = selector(&rt, bars(duration));
    let handle = selector.displayed_handle();

    selector.on_asset_changed(duration).unwrap();
    selector.set_time(RationalTime::from_secs(25));
    selector.wait_for_thumbnail(WAIT);

    let seen = std::thread::spawn(move || handle.get().map(|thumb| thumb.time))
        .join()
        .unwrap();
    assert_eq!(seen, Some(RationalTime::from_secs(25)));
}

#[test]
fn clearing_asset_abandons_fetch() {
    let rt = runtime();
    let gated = Arc::new(GatedExtractor::default());
    let release = gated.gate(RationalTime::ZERO);
    let mut selector = selector(&rt, gated.clone());

    selector.on_asset_changed(RationalTime::from_secs(100)).unwrap();
    assert!(matches!(selector.fetch_phase(), FetchPhase::Fetching { .. }));

    selector.clear_asset();
    assert_eq!(selector.fetch_phase(), FetchPhase::Idle);
    assert_eq!(selector.selected_time(), None);

    let _ = release.send(());
    assert_eq!(selector.wait_for_thumbnail(Duration::from_millis(20)), None);
    assert!(selector.displayed_thumbnail().is_none());
}
