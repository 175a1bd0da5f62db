//! The time-selection control.
//!
//! `TimeSelector` owns the gesture controller, the thumbnail coordinator and
//! the observer registry, and reads track width and scroll position from its
//! host. All methods are meant to be called from a single interaction thread.

use crate::clamp::clamp;
use crate::config::SelectorConfig;
use crate::coordinator::{
    DisplayedThumbnail, FetchOutcome, FetchPhase, FetchRequest, ThumbnailRequestCoordinator,
};
use crate::gesture::{DragEvent, GestureEmit, SelectionGestureController};
use crate::host::TimelineHost;
use crate::mapper::{offset_from_time, time_from_offset};
use crate::notifier::{DelegateNotifier, ObserverId, SelectionEvent};
use crossbeam_channel::Receiver;
use scrubline_core::{RationalTime, Result, SharedThumbnail, Timeline};
use scrubline_media::FrameExtractor;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info};

/// Drag-to-select control over an asset's timeline.
pub struct TimeSelector<H: TimelineHost> {
    host: H,
    config: SelectorConfig,
    timeline: Option<Timeline>,
    gestures: SelectionGestureController,
    coordinator: ThumbnailRequestCoordinator,
    notifier: DelegateNotifier,
}

impl<H: TimelineHost> TimeSelector<H> {
    /// Create a control with no asset loaded.
    pub fn new(
        host: H,
        config: SelectorConfig,
        extractor: Arc<dyn FrameExtractor>,
        runtime: Handle,
    ) -> Result<Self> {
        config.validate()?;
        let coordinator =
            ThumbnailRequestCoordinator::new(runtime, extractor, config.thumbnail_size());
        Ok(Self {
            host,
            config,
            timeline: None,
            gestures: SelectionGestureController::new(),
            coordinator,
            notifier: DelegateNotifier::new(),
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access. Follow scroll or size changes with
    /// [`on_scroll_changed`](Self::on_scroll_changed) or
    /// [`on_layout_changed`](Self::on_layout_changed).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    pub fn thumb_offset(&self) -> f64 {
        self.gestures.thumb_offset()
    }

    pub fn gestures(&self) -> &SelectionGestureController {
        &self.gestures
    }

    pub fn coordinator(&self) -> &ThumbnailRequestCoordinator {
        &self.coordinator
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ObserverId
    where
        F: FnMut(SelectionEvent) + Send + 'static,
    {
        self.notifier.subscribe(callback)
    }

    pub fn subscribe_channel(&mut self) -> (ObserverId, Receiver<SelectionEvent>) {
        self.notifier.channel()
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Use a different extractor, typically alongside a new asset.
    pub fn set_extractor(&mut self, extractor: Arc<dyn FrameExtractor>) {
        self.coordinator.set_extractor(extractor);
    }

    /// A new asset was assigned to the host.
    ///
    /// Rebuilds the timeline from the host's current width, moves the thumb
    /// back to the start and fetches the thumbnail for time zero. Returns the
    /// issued request, or `None` if the new timeline is degenerate.
    pub fn on_asset_changed(&mut self, duration: RationalTime) -> Result<Option<FetchRequest>> {
        let timeline = Timeline::new(duration, self.host.track_width(), self.config.thumb_width)?;
        info!(
            %duration,
            track_width = timeline.track_width(),
            thumb_width = timeline.thumb_width(),
            "Asset loaded"
        );
        self.timeline = Some(timeline);
        self.gestures.reset();
        Ok(self.set_time(RationalTime::ZERO))
    }

    /// The asset was removed: no selection until the next load.
    pub fn clear_asset(&mut self) {
        self.timeline = None;
        self.gestures.reset();
        self.coordinator.cancel();
    }

    /// The host scrolled; the thumb now covers a different instant.
    pub fn on_scroll_changed(&mut self) -> Option<RationalTime> {
        self.publish_changed()
    }

    /// The host's track width changed. Keeps the duration, re-clamps the thumb.
    pub fn on_layout_changed(&mut self) -> Result<Option<RationalTime>> {
        let Some(previous) = self.timeline else {
            return Ok(None);
        };
        let timeline = Timeline::new(
            previous.duration(),
            self.host.track_width(),
            previous.thumb_width(),
        )?;
        self.timeline = Some(timeline);
        let offset = self.gestures.thumb_offset();
        self.gestures.set_thumb_offset(offset, &timeline);
        debug!(track_width = timeline.track_width(), "Layout changed");
        Ok(self.publish_changed())
    }

    /// Feed one event from either gesture recogniser.
    pub fn handle_drag(&mut self, event: &DragEvent) {
        let Some(timeline) = self.timeline else {
            debug!(phase = ?event.phase, "Drag with no asset loaded");
            return;
        };

        for emit in self.gestures.handle(event, &timeline) {
            let scroll = self.host.scroll_offset();
            match emit {
                GestureEmit::Changed(offset) => {
                    if let Some(time) = time_from_offset(offset, &timeline, scroll) {
                        self.notifier.changed(time);
                        self.request_thumbnail(time, &timeline);
                    }
                }
                GestureEmit::Ended(offset) => {
                    if let Some(time) = time_from_offset(offset, &timeline, scroll) {
                        debug!(%time, "Selection committed");
                        self.notifier.ended(time);
                    }
                }
            }
        }
    }

    /// Instant under the thumb, derived from the current offset and scroll.
    ///
    /// `None` with no asset loaded or on a degenerate timeline.
    pub fn selected_time(&self) -> Option<RationalTime> {
        let timeline = self.timeline.as_ref()?;
        time_from_offset(self.gestures.thumb_offset(), timeline, self.host.scroll_offset())
    }

    /// Select `time` programmatically and refresh the thumbnail.
    ///
    /// Not a user gesture: observers are not notified. Returns `None` (and
    /// does nothing) when no selection is possible.
    pub fn set_time(&mut self, time: RationalTime) -> Option<FetchRequest> {
        let timeline = self.timeline?;
        let offset = offset_from_time(time, &timeline, self.host.scroll_offset())?;
        self.gestures.set_thumb_offset(clamp(offset, &timeline), &timeline);
        Some(self.request_thumbnail(time, &timeline))
    }

    /// Apply finished thumbnail fetches. Call regularly on the interaction
    /// thread (e.g. once per frame).
    pub fn pump(&mut self) -> Option<SharedThumbnail> {
        self.coordinator.pump()
    }

    /// Block until the outstanding fetch settles.
    pub fn wait_for_thumbnail(&mut self, timeout: Duration) -> Option<FetchOutcome> {
        self.coordinator.wait_for_delivery(timeout)
    }

    pub fn displayed_thumbnail(&self) -> Option<SharedThumbnail> {
        self.coordinator.displayed()
    }

    pub fn displayed_handle(&self) -> DisplayedThumbnail {
        self.coordinator.displayed_handle()
    }

    pub fn fetch_phase(&self) -> FetchPhase {
        self.coordinator.phase()
    }

    fn publish_changed(&mut self) -> Option<RationalTime> {
        let timeline = self.timeline?;
        let time = self.selected_time()?;
        self.notifier.changed(time);
        self.request_thumbnail(time, &timeline);
        Some(time)
    }

    /// The extractor only has frames inside the asset, so the fetched instant
    /// is pinned to `[0, duration]` even when the reported one is not.
    fn request_thumbnail(&mut self, time: RationalTime, timeline: &Timeline) -> FetchRequest {
        let fetch_time = time.clamp_to(RationalTime::ZERO, timeline.duration());
        self.coordinator.request(fetch_time)
    }
}

impl<H: TimelineHost + std::fmt::Debug> std::fmt::Debug for TimeSelector<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeSelector")
            .field("host", &self.host)
            .field("timeline", &self.timeline)
            .field("selection", self.gestures.state())
            .field("coordinator", &self.coordinator)
            .finish()
    }
}
