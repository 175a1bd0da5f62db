//! Geometry of a loaded asset's scrub strip.

use crate::error::{Result, ScrubError};
use crate::time::RationalTime;
use serde::{Deserialize, Serialize};

/// Duration and pixel extents of the strip the thumb slides over.
///
/// Fixed for the lifetime of one asset load (and one layout pass). A thumb
/// wider than the track is representable; such a timeline is degenerate and
/// every mapping query on it reports no selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    duration: RationalTime,
    track_width: f64,
    thumb_width: f64,
}

impl Timeline {
    /// Create a timeline, validating the extents.
    pub fn new(duration: RationalTime, track_width: f64, thumb_width: f64) -> Result<Self> {
        if duration.is_negative() {
            return Err(ScrubError::InvalidParameter(format!(
                "duration must be non-negative, got {duration}"
            )));
        }
        if !track_width.is_finite() || track_width < 0.0 {
            return Err(ScrubError::InvalidParameter(format!(
                "track width must be a finite value >= 0, got {track_width}"
            )));
        }
        if !thumb_width.is_finite() || thumb_width <= 0.0 {
            return Err(ScrubError::InvalidParameter(format!(
                "thumb width must be a finite value > 0, got {thumb_width}"
            )));
        }
        Ok(Self {
            duration,
            track_width,
            thumb_width,
        })
    }

    /// Asset duration.
    #[inline]
    pub fn duration(&self) -> RationalTime {
        self.duration
    }

    /// Pixel width of the scrollable content.
    #[inline]
    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    /// Pixel width of the selection window.
    #[inline]
    pub fn thumb_width(&self) -> f64 {
        self.thumb_width
    }

    /// Travel available to the thumb: `track_width - thumb_width`.
    ///
    /// Shared by clamping and time mapping so both agree on the range.
    #[inline]
    pub fn span(&self) -> f64 {
        self.track_width - self.thumb_width
    }

    /// True when the thumb has no room to move.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.span() <= 0.0
    }
}
