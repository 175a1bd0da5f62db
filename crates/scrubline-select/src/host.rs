//! The scrollable preview strip the control sits on.

/// Capabilities the selection control needs from the strip that renders the
/// asset and owns its scrolling.
///
/// The host calls back into `TimeSelector` when the asset, scroll position or
/// layout changes.
pub trait TimelineHost {
    /// Pixel width of the scrollable content.
    fn track_width(&self) -> f64;

    /// Current horizontal scroll offset in pixels.
    fn scroll_offset(&self) -> f64;
}

/// Plain-data host: a strip of known width scrolled to a known offset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PreviewStrip {
    track_width: f64,
    scroll_offset: f64,
}

impl PreviewStrip {
    pub fn new(track_width: f64) -> Self {
        Self {
            track_width,
            scroll_offset: 0.0,
        }
    }

    pub fn set_track_width(&mut self, track_width: f64) {
        self.track_width = track_width;
    }

    pub fn set_scroll_offset(&mut self, scroll_offset: f64) {
        self.scroll_offset = scroll_offset;
    }
}

impl TimelineHost for PreviewStrip {
    fn track_width(&self) -> f64 {
        self.track_width
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }
}
