//! Still extraction through an FFmpeg subprocess.
//!
//! Each request seeks the input and pipes exactly one raw RGBA frame back on
//! stdout. The pipe is drained on a helper thread while the caller polls for
//! cancellation; a cancelled or failed child is killed and reaped.

use crate::asset::AssetInfo;
use crate::extractor::{FetchCancel, FrameExtractor, ThumbnailSize};
use scrubline_core::{RationalTime, Result, ScrubError, Thumbnail};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// How often a running decode checks for cancellation.
const CANCEL_POLL: Duration = Duration::from_millis(2);

/// Extractor that shells out to `ffmpeg`.
pub struct FfmpegExtractor {
    asset: AssetInfo,
    binary: String,
}

impl FfmpegExtractor {
    /// Extract from `asset` using the `ffmpeg` found on `PATH`.
    pub fn new(asset: AssetInfo) -> Self {
        Self {
            asset,
            binary: "ffmpeg".into(),
        }
    }

    /// Use a specific FFmpeg executable.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Build the FFmpeg command arguments for one still.
    pub fn ffmpeg_args(&self, time: RationalTime, size: ThumbnailSize) -> Vec<String> {
        vec![
            "-v".into(),
            "error".into(),
            // Input-side seek: fast, lands on the nearest preceding keyframe
            "-ss".into(),
            format!("{:.6}", time.to_seconds_f64()),
            "-i".into(),
            self.asset.path.to_string_lossy().into_owned(),
            "-frames:v".into(),
            "1".into(),
            "-f".into(),
            "rawvideo".into(),
            "-pix_fmt".into(),
            "rgba".into(),
            "-s".into(),
            format!("{}x{}", size.width, size.height),
            "pipe:1".into(),
        ]
    }

    /// Wait for the child to exit, bailing out as soon as `cancel` is set.
    fn wait_for_exit(child: &mut Child, cancel: &FetchCancel) -> Result<ExitStatus> {
        loop {
            if cancel.is_cancelled() {
                debug!("Killing cancelled ffmpeg extraction");
                return Err(ScrubError::Cancelled);
            }
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            thread::sleep(CANCEL_POLL);
        }
    }

    /// Kill and reap the child. The reader thread ends once the pipe closes.
    fn abort(child: &mut Child) {
        if let Err(e) = child.kill() {
            debug!(error = %e, "ffmpeg already exited");
        }
        let _ = child.wait();
    }
}

impl FrameExtractor for FfmpegExtractor {
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

        let mut child = Command::new(&self.binary)
            .args(self.ffmpeg_args(time, size))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ScrubError::Extraction(format!("Failed to spawn ffmpeg: {e}")))?;

        let Some(mut stdout) = child.stdout.take() else {
            Self::abort(&mut child);
            return Err(ScrubError::Extraction("Failed to open ffmpeg stdout".into()));
        };

        let expected = size.width as usize * size.height as usize * 4;
        // Drained off-thread so the decode can be killed while a read blocks.
        let reader = thread::spawn(move || -> std::io::Result<Vec<u8>> {
            let mut data = Vec::with_capacity(expected);
            stdout.read_to_end(&mut data)?;
            Ok(data)
        });

        let status = match Self::wait_for_exit(&mut child, cancel) {
            Ok(status) => status,
            Err(e) => {
                Self::abort(&mut child);
                return Err(e);
            }
        };

        let mut data = reader
            .join()
            .map_err(|_| ScrubError::Internal("ffmpeg reader thread panicked".into()))??;

        if !status.success() {
            warn!(%time, %status, "ffmpeg frame extraction failed");
            return Err(ScrubError::Extraction(format!(
                "ffmpeg exited with status: {status}"
            )));
        }

        data.truncate(expected);
        Thumbnail::from_rgba(size.width, size.height, data, time)
    }
}
