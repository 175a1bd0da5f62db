//! The frame-extraction seam.

use scrubline_core::{RationalTime, Result, Thumbnail};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Requested output size of an extracted still.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        Self::new(
            scrubline_core::defaults::THUMBNAIL_WIDTH,
            scrubline_core::defaults::THUMBNAIL_HEIGHT,
        )
    }
}

/// Decodes a still image of the current asset at a given instant.
///
/// Called from worker threads. Implementations should poll `cancel` between
/// expensive steps and return `ScrubError::Cancelled` once it is set, but
/// callers never rely on that for correctness.
pub trait FrameExtractor: Send + Sync {
    /// Extract the frame at `time`, scaled to `size`.
    fn extract(
        &self,
        time: RationalTime,
        size: ThumbnailSize,
        cancel: &FetchCancel,
    ) -> Result<Thumbnail>;
}

impl<T: FrameExtractor + ?Sized> FrameExtractor for Arc<T> {
    fn extract(
        &self,
        time: RationalTime,
        size: ThumbnailSize,
        cancel: &FetchCancel,
    ) -> Result<Thumbnail> {
        (**self).extract(time, size, cancel)
    }
}

/// Handle for abandoning an in-flight extraction.
#[derive(Debug, Clone)]
pub struct FetchCancel(Arc<AtomicBool>);

impl FetchCancel {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for FetchCancel {
    fn default() -> Self {
        Self::new()
    }
}
