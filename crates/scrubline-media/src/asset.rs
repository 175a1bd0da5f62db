//! Metadata about the asset being scrubbed.

use scrubline_core::{RationalTime, Result, ScrubError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Information about a loaded media asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    /// File path
    pub path: PathBuf,
    /// Duration
    pub duration: RationalTime,
    /// Native frame width
    pub width: u32,
    /// Native frame height
    pub height: u32,
}

impl AssetInfo {
    /// Describe an asset on disk. Fails if the file does not exist.
    pub fn open<P: AsRef<Path>>(path: P, duration: RationalTime) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScrubError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )));
        }
        Ok(Self::new(path, duration, 0, 0))
    }

    /// Describe an asset without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>, duration: RationalTime, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            duration,
            width,
            height,
        }
    }

    /// Whether `time` falls inside the asset.
    pub fn contains(&self, time: RationalTime) -> bool {
        !time.is_negative() && time <= self.duration
    }
}
