//! Drag gesture state machine.
//!
//! Two independent recognisers feed this controller: one on the background
//! track and one on the thumb. Each reports a phase and a translation relative
//! to where its gesture began. The controller turns those into settled thumb
//! offsets; mapping offsets to time is left to the caller.

use crate::clamp::clamp;
use glam::DVec2;
use scrubline_core::Timeline;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use tracing::debug;

/// Which recogniser produced a drag event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureSource {
    /// Drag that started on the background strip.
    Track,
    /// Drag that started on the thumb itself.
    Thumb,
}

/// Gesture recogniser phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GesturePhase {
    Begin,
    Change,
    End,
    Cancel,
    Fail,
}

impl GesturePhase {
    /// Whether the gesture is over after this phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::End | Self::Cancel | Self::Fail)
    }
}

/// One raw drag update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    pub source: GestureSource,
    pub phase: GesturePhase,
    /// Touch-down point in control coordinates.
    pub location: DVec2,
    /// Movement since the gesture began.
    pub translation: DVec2,
}

impl DragEvent {
    pub fn new(
        source: GestureSource,
        phase: GesturePhase,
        location: DVec2,
        translation: DVec2,
    ) -> Self {
        Self {
            source,
            phase,
            location,
            translation,
        }
    }

    /// Gesture start at `x` with no movement yet.
    pub fn begin(source: GestureSource, x: f64) -> Self {
        Self::new(source, GesturePhase::Begin, DVec2::new(x, 0.0), DVec2::ZERO)
    }

    /// Movement of `dx` since the gesture started.
    pub fn change(source: GestureSource, dx: f64) -> Self {
        Self::new(source, GesturePhase::Change, DVec2::ZERO, DVec2::new(dx, 0.0))
    }

    /// Release after moving `dx` in total.
    pub fn end(source: GestureSource, dx: f64) -> Self {
        Self::new(source, GesturePhase::End, DVec2::ZERO, DVec2::new(dx, 0.0))
    }

    /// Gesture cancelled by the system after moving `dx`.
    pub fn cancel(source: GestureSource, dx: f64) -> Self {
        Self::new(source, GesturePhase::Cancel, DVec2::ZERO, DVec2::new(dx, 0.0))
    }
}

/// What the controller asks its owner to publish, as settled offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEmit {
    /// Thumb settled at this offset.
    Changed(f64),
    /// Gesture completed with the thumb at this offset.
    Ended(f64),
}

/// Emissions from one event; at most `Changed` followed by `Ended`.
pub type GestureEmits = SmallVec<[GestureEmit; 2]>;

/// Mutable selection state of one control.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionState {
    /// Settled thumb offset, always within `[0, span]`.
    pub thumb_offset: f64,
    /// Offset the active gesture's translation is applied to.
    pub drag_origin: f64,
    /// Recogniser that owns the current gesture, if any.
    pub active_source: Option<GestureSource>,
}

/// Turns drag events into settled thumb offsets.
#[derive(Debug, Default)]
pub struct SelectionGestureController {
    state: SelectionState,
}

impl SelectionGestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn thumb_offset(&self) -> f64 {
        self.state.thumb_offset
    }

    pub fn active_source(&self) -> Option<GestureSource> {
        self.state.active_source
    }

    /// Back to the start of the track with no gesture in progress.
    pub fn reset(&mut self) {
        self.state = SelectionState::default();
    }

    /// Place the thumb directly, clamped. Used for external selection.
    pub fn set_thumb_offset(&mut self, offset: f64, timeline: &Timeline) -> f64 {
        self.state.thumb_offset = clamp(offset, timeline);
        self.state.thumb_offset
    }

    /// Process one drag event.
    ///
    /// A `Begin` from either source takes over the gesture (last Begin wins);
    /// other phases from a source that does not own the gesture are ignored.
    /// `Cancel` and `Fail` leave the thumb where the drag last put it rather
    /// than restoring the pre-gesture offset.
    pub fn handle(&mut self, event: &DragEvent, timeline: &Timeline) -> GestureEmits {
        match event.phase {
            GesturePhase::Begin => {
                if let Some(previous) = self.state.active_source {
                    debug!(?previous, source = ?event.source, "Drag superseded by new gesture");
                }
                self.state.active_source = Some(event.source);
                self.state.drag_origin = match event.source {
                    GestureSource::Track => {
                        (event.location.x - timeline.thumb_width() / 2.0).max(0.0)
                    }
                    GestureSource::Thumb => self.state.thumb_offset,
                };
                let offset = self.follow(event.translation.x, timeline);
                smallvec![GestureEmit::Changed(offset)]
            }
            phase => {
                if self.state.active_source != Some(event.source) {
                    debug!(
                        source = ?event.source,
                        active = ?self.state.active_source,
                        ?phase,
                        "Ignoring drag event from inactive source"
                    );
                    return GestureEmits::new();
                }

                let offset = self.follow(event.translation.x, timeline);
                let mut emits: GestureEmits = smallvec![GestureEmit::Changed(offset)];
                if phase == GesturePhase::End {
                    emits.push(GestureEmit::Ended(offset));
                }
                if phase.is_terminal() {
                    self.state.active_source = None;
                }
                emits
            }
        }
    }

    fn follow(&mut self, dx: f64, timeline: &Timeline) -> f64 {
        self.state.thumb_offset = clamp(self.state.drag_origin + dx, timeline);
        self.state.thumb_offset
    }
}
