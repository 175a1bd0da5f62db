//! Selector configuration.

use scrubline_core::{defaults, Result, ScrubError};
use scrubline_media::ThumbnailSize;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for a `TimeSelector`, loadable from JSON.
///
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Width of the selection window in pixels.
    pub thumb_width: f64,
    /// Width of the preview image requested from the extractor.
    pub thumbnail_width: u32,
    /// Height of the preview image requested from the extractor.
    pub thumbnail_height: u32,
    /// `tracing` filter directive used by binaries (e.g. `"info"`,
    /// `"scrubline_select=debug"`).
    pub log_filter: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            thumb_width: defaults::THUMB_WIDTH,
            thumbnail_width: defaults::THUMBNAIL_WIDTH,
            thumbnail_height: defaults::THUMBNAIL_HEIGHT,
            log_filter: "info".into(),
        }
    }
}

impl SelectorConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ScrubError::Config(format!("invalid selector config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ScrubError::Config(format!("failed to serialize config: {e}")))
    }

    /// Reject sizes the control cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.thumb_width.is_finite() || self.thumb_width <= 0.0 {
            return Err(ScrubError::Config(format!(
                "thumb_width must be > 0, got {}",
                self.thumb_width
            )));
        }
        if self.thumbnail_width == 0 || self.thumbnail_height == 0 {
            return Err(ScrubError::Config(format!(
                "thumbnail size must be non-zero, got {}x{}",
                self.thumbnail_width, self.thumbnail_height
            )));
        }
        Ok(())
    }

    pub fn thumbnail_size(&self) -> ThumbnailSize {
        ThumbnailSize::new(self.thumbnail_width, self.thumbnail_height)
    }
}
