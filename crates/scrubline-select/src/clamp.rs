//! Keeps a proposed thumb offset on the track.

use scrubline_core::Timeline;

/// Clamp `candidate` into `[0, track_width - thumb_width]`.
///
/// On a degenerate timeline both bounds collapse to 0. NaN clamps to 0.
pub fn clamp(candidate: f64, timeline: &Timeline) -> f64 {
    if candidate.is_nan() {
        return 0.0;
    }
    let max = timeline.span().max(0.0);
    candidate.min(max).max(0.0)
}
