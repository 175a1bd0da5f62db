//! Scrubline Core - Foundation types for timeline scrubbing
//!
//! This crate provides the types shared by the scrubber crates:
//! - Time representation (RationalTime)
//! - Scrub strip geometry (Timeline)
//! - Preview images (Thumbnail)
//! - Errors

pub mod error;
pub mod thumbnail;
pub mod time;
pub mod timeline;

pub use error::{Result, ScrubError};
pub use thumbnail::{SharedThumbnail, Thumbnail};
pub use time::RationalTime;
pub use timeline::Timeline;

/// Defaults shared by the control and its collaborators.
pub mod defaults {
    /// Width of the selection window in pixels.
    pub const THUMB_WIDTH: f64 = 60.0;

    /// Size of the preview image requested from the extractor.
    pub const THUMBNAIL_WIDTH: u32 = 160;
    pub const THUMBNAIL_HEIGHT: u32 = 90;
}
