//! Conversion between thumb offsets and timeline instants.
//!
//! The selected instant is the one under the thumb's horizontal center,
//! measured in content coordinates (offset plus scroll). The center is mapped
//! linearly onto `[0, duration]` over the same span `track_width - thumb_width`
//! that clamping uses, so both agree on the valid range. The result is not
//! clamped to the duration: the rightmost offset maps slightly past the end.

use scrubline_core::{RationalTime, Timeline};

/// Instant under the thumb's center, or `None` when the span is degenerate.
pub fn time_from_offset(
    offset: f64,
    timeline: &Timeline,
    scroll_offset: f64,
) -> Option<RationalTime> {
    if timeline.is_degenerate() {
        return None;
    }
    let center = offset + timeline.thumb_width() / 2.0 + scroll_offset;
    Some(timeline.duration().scale(center / timeline.span()))
}

/// Offset whose center maps back to `time`.
///
/// `None` on a degenerate span, or when the duration is zero and every
/// offset maps to the same instant.
pub fn offset_from_time(
    time: RationalTime,
    timeline: &Timeline,
    scroll_offset: f64,
) -> Option<f64> {
    if timeline.is_degenerate() {
        return None;
    }
    let ratio = time.ratio_of(timeline.duration())?;
    Some(ratio * timeline.span() - timeline.thumb_width() / 2.0 - scroll_offset)
}
