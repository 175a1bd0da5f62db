//! Synthetic extractor producing colour bars.

use crate::asset::AssetInfo;
use crate::extractor::{FetchCancel, FrameExtractor, ThumbnailSize};
use scrubline_core::{RationalTime, Result, ScrubError, Thumbnail};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Granularity at which simulated latency checks for cancellation.
const CANCEL_POLL: Duration = Duration::from_millis(2);

/// Extractor that renders a test pattern instead of decoding.
///
/// The pattern darkens as `time` approaches the end of the asset so that
/// thumbnails for different instants are distinguishable. Instants outside
/// the asset fail with `OutOfRange`.
pub struct TestPatternExtractor {
    asset: AssetInfo,
    latency: Duration,
}

impl TestPatternExtractor {
    /// Create an extractor for `asset` that answers immediately.
    pub fn new(asset: AssetInfo) -> Self {
        Self {
            asset,
            latency: Duration::ZERO,
        }
    }

    /// Simulate decode time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The asset this extractor serves.
    pub fn asset(&self) -> &AssetInfo {
        &self.asset
    }

    fn wait(&self, cancel: &FetchCancel) -> Result<()> {
        let deadline = Instant::now() + self.latency;
        while Instant::now() < deadline {
            if cancel.is_cancelled() {
                return Err(ScrubError::Cancelled);
            }
            thread::sleep(CANCEL_POLL.min(deadline.saturating_duration_since(Instant::now())));
        }
        Ok(())
    }
}

impl FrameExtractor for TestPatternExtractor {
    fn extract(
        &self,
        time: RationalTime,
        size: ThumbnailSize,
        cancel: &FetchCancel,
    ) -> Result<Thumbnail> {
        if !self.asset.contains(time) {
            return Err(ScrubError::OutOfRange {
                time,
                duration: self.asset.duration,
            });
        }

        self.wait(cancel)?;
        if cancel.is_cancelled() {
            return Err(ScrubError::Cancelled);
        }

        let shade = time.ratio_of(self.asset.duration).unwrap_or(0.0);
        debug!(%time, shade, "Rendering test pattern thumbnail");
        Ok(Thumbnail::test_pattern(size.width, size.height, shade, time))
    }
}
