//! Integration tests for drag selection.
//!
//! Exercises scrubline-select's `TimeSelector` against a `PreviewStrip` host
//! and the synthetic extractor from scrubline-media.

use crossbeam_channel::Receiver;
use scrubline_core::{RationalTime, Timeline};
use scrubline_media::{AssetInfo, TestPatternExtractor};
use scrubline_select::{
    time_from_offset, DragEvent, GestureSource, PreviewStrip, SelectionEvent, SelectorConfig,
    TimeSelector,
};
use std::sync::Arc;
use tokio::runtime::Runtime;

// ── Helpers ────────────────────────────────────────────────────

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

/// 100 s asset on a 1000 px strip with a 100 px thumb.
fn reference_selector(rt: &Runtime) -> (TimeSelector<PreviewStrip>, Receiver<SelectionEvent>) {
    selector_with(rt, 1000.0, 100.0)
}

fn selector_with(
    rt: &Runtime,
    track_width: f64,
    thumb_width: f64,
) -> (TimeSelector<PreviewStrip>, Receiver<SelectionEvent>) {
    let duration = RationalTime::from_secs(100);
    let extractor = Arc::new(TestPatternExtractor::new(AssetInfo::new(
        "media/test.mp4",
        duration,
        1920,
        1080,
    )));
    let config = SelectorConfig {
        thumb_width,
        thumbnail_width: 32,
        thumbnail_height: 18,
        ..Default::default()
    };
    let mut selector = TimeSelector::new(
        PreviewStrip::new(track_width),
        config,
        extractor,
        rt.handle().clone(),
    )
    .unwrap();
    selector.on_asset_changed(duration).unwrap();
    let (_, events) = selector.subscribe_channel();
    (selector, events)
}

fn drain(events: &Receiver<SelectionEvent>) -> Vec<SelectionEvent> {
    events.try_iter().collect()
}

// ── Mapping through the control ────────────────────────────────

#[test]
fn thumb_at_450_selects_about_55_56s() {
    let rt = runtime();
    let (mut selector, _events) = reference_selector(&rt);

    selector.handle_drag(&DragEvent::begin(GestureSource::Thumb, 50.0));
    selector.handle_drag(&DragEvent::end(GestureSource::Thumb, 450.0));

    assert_eq!(selector.thumb_offset(), 450.0);
    let time = selector.selected_time().unwrap();
    assert!((time.to_seconds_f64() - 55.5556).abs() < 0.001);
}

#[test]
fn thumb_wider_than_track_has_no_selection() {
    let rt = runtime();
    let (mut selector, events) = selector_with(&rt, 50.0, 100.0);

    assert_eq!(selector.selected_time(), None);
    selector.handle_drag(&DragEvent::begin(GestureSource::Track, 25.0));
    selector.handle_drag(&DragEvent::end(GestureSource::Track, 10.0));
    assert!(drain(&events).is_empty());
    assert_eq!(selector.selected_time(), None);
}

// ── Gestures ───────────────────────────────────────────────────

#[test]
fn track_begin_centers_thumb_under_touch() {
    let rt = runtime();
    let (mut selector, events) = reference_selector(&rt);

    selector.handle_drag(&DragEvent::begin(GestureSource::Track, 120.0));
    assert_eq!(selector.gestures().state().drag_origin, 70.0);
    assert_eq!(selector.thumb_offset(), 70.0);

    let received = drain(&events);
    assert_eq!(received.len(), 1);
    assert!(matches!(received[0], SelectionEvent::Changed(_)));
}

#[test]
fn ended_time_matches_final_offset() {
    let rt = runtime();
    let (mut selector, events) = reference_selector(&rt);
    let timeline = *selector.timeline().unwrap();

    selector.handle_drag(&DragEvent::begin(GestureSource::Track, 200.0));
    for dx in [40.0, 90.0, 310.0] {
        selector.handle_drag(&DragEvent::change(GestureSource::Track, dx));
    }
    selector.handle_drag(&DragEvent::end(GestureSource::Track, 310.0));

    let received = drain(&events);
    let ended: Vec<_> = received
        .iter()
        .filter(|e| matches!(e, SelectionEvent::Ended(_)))
        .collect();
    assert_eq!(ended.len(), 1);
    assert_eq!(received.last(), ended.first().copied());

    let expected = time_from_offset(selector.thumb_offset(), &timeline, 0.0).unwrap();
    assert_eq!(ended[0].time(), expected);
}

#[test]
fn every_change_is_published_in_order() {
    let rt = runtime();
    let (mut selector, events) = reference_selector(&rt);

    selector.handle_drag(&DragEvent::begin(GestureSource::Thumb, 50.0));
    selector.handle_drag(&DragEvent::change(GestureSource::Thumb, 100.0));
    selector.handle_drag(&DragEvent::change(GestureSource::Thumb, 200.0));
    selector.handle_drag(&DragEvent::change(GestureSource::Thumb, 300.0));

    let times: Vec<_> = drain(&events).iter().map(|e| e.time()).collect();
    assert_eq!(times.len(), 4);
    assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn cancel_keeps_far_dragged_offset() {
    let rt = runtime();
    let (mut selector, events) = reference_selector(&rt);

    selector.handle_drag(&DragEvent::begin(GestureSource::Thumb, 50.0));
    selector.handle_drag(&DragEvent::change(GestureSource::Thumb, 600.0));
    selector.handle_drag(&DragEvent::cancel(GestureSource::Thumb, 600.0));

    assert_eq!(selector.thumb_offset(), 600.0);
    assert!(drain(&events)
        .iter()
        .all(|e| matches!(e, SelectionEvent::Changed(_))));
}

#[test]
fn drag_past_right_edge_is_clamped() {
    let rt = runtime();
    let (mut selector, _events) = reference_selector(&rt);

    selector.handle_drag(&DragEvent::begin(GestureSource::Thumb, 50.0));
    selector.handle_drag(&DragEvent::end(GestureSource::Thumb, 5000.0));
    assert_eq!(selector.thumb_offset(), 900.0);

    // The rightmost offset reports slightly past the end of the asset.
    let time = selector.selected_time().unwrap();
    assert!(time > RationalTime::from_secs(100));
}

#[test]
fn late_begin_from_other_source_takes_over() {
    let rt = runtime();
    let (mut selector, events) = reference_selector(&rt);

    selector.handle_drag(&DragEvent::begin(GestureSource::Thumb, 50.0));
    selector.handle_drag(&DragEvent::begin(GestureSource::Track, 520.0));
    // Thumb updates no longer move the selection.
    selector.handle_drag(&DragEvent::change(GestureSource::Thumb, 10.0));
    assert_eq!(selector.thumb_offset(), 470.0);

    selector.handle_drag(&DragEvent::end(GestureSource::Track, 30.0));
    assert_eq!(selector.thumb_offset(), 500.0);
    assert_eq!(drain(&events).len(), 4);
}

// ── Host notifications and external selection ──────────────────

#[test]
fn scrolling_emits_changed() {
    let rt = runtime();
    let (mut selector, events) = reference_selector(&rt);
    let before = selector.selected_time().unwrap();

    selector.host_mut().set_scroll_offset(90.0);
    let after = selector.on_scroll_changed().unwrap();

    assert!(after > before);
    assert_eq!(drain(&events), vec![SelectionEvent::Changed(after)]);
}

#[test]
fn set_time_is_silent_and_round_trips() {
    let rt = runtime();
    let (mut selector, events) = reference_selector(&rt);

    let target = RationalTime::from_secs(40);
    selector.set_time(target);

    assert!(drain(&events).is_empty());
    let selected = selector.selected_time().unwrap();
    assert!((selected.to_seconds_f64() - target.to_seconds_f64()).abs() < 0.001);
}

#[test]
fn reloading_asset_resets_to_start() {
    let rt = runtime();
    let (mut selector, _events) = reference_selector(&rt);
    selector.set_time(RationalTime::from_secs(70));
    assert!(selector.thumb_offset() > 0.0);

    selector.on_asset_changed(RationalTime::from_secs(30)).unwrap();
    assert_eq!(selector.thumb_offset(), 0.0);
    assert_eq!(
        selector.timeline().map(Timeline::duration),
        Some(RationalTime::from_secs(30))
    );
}

#[test]
fn narrowing_the_strip_pulls_the_thumb_in() {
    let rt = runtime();
    let (mut selector, events) = reference_selector(&rt);
    selector.set_time(RationalTime::from_secs(90));

    selector.host_mut().set_track_width(400.0);
    let time = selector.on_layout_changed().unwrap().unwrap();

    assert_eq!(selector.thumb_offset(), 300.0);
    assert_eq!(drain(&events), vec![SelectionEvent::Changed(time)]);
}
