//! Preview images extracted for a selected instant.

use crate::error::{Result, ScrubError};
use crate::time::RationalTime;
use std::sync::Arc;

/// Bytes per RGBA8 pixel.
const BYTES_PER_PIXEL: usize = 4;

/// An RGBA8 still decoded at `time`.
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per row
    pub stride: usize,
    /// Pixel data, `stride * height` bytes
    pub data: Vec<u8>,
    /// Instant this image was extracted for
    pub time: RationalTime,
}

impl Thumbnail {
    /// Allocate a blank thumbnail.
    pub fn new(width: u32, height: u32, time: RationalTime) -> Self {
        let stride = width as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            stride,
            data: vec![0u8; stride * height as usize],
            time,
        }
    }

    /// Wrap tightly packed RGBA8 bytes, as produced by a raw video pipe.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>, time: RationalTime) -> Result<Self> {
        let stride = width as usize * BYTES_PER_PIXEL;
        let expected = stride * height as usize;
        if data.len() != expected {
            return Err(ScrubError::Extraction(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            data,
            time,
        })
    }

    /// Pixels of row `y`.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Mutable pixels of row `y`.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * BYTES_PER_PIXEL;
        &mut self.data[start..end]
    }

    /// Colour bars darkened by `shade` (0.0 = full brightness, 1.0 = black).
    ///
    /// Stand-in frames for tests and for running without a decoder.
    pub fn test_pattern(width: u32, height: u32, shade: f64, time: RationalTime) -> Self {
        const BARS: [[u8; 3]; 8] = [
            [255, 255, 255], // White
            [255, 255, 0],   // Yellow
            [0, 255, 255],   // Cyan
            [0, 255, 0],     // Green
            [255, 0, 255],   // Magenta
            [255, 0, 0],     // Red
            [0, 0, 255],     // Blue
            [0, 0, 0],       // Black
        ];

        let mut thumb = Self::new(width, height, time);
        let gain = 1.0 - shade.clamp(0.0, 1.0);

        for y in 0..height {
            let row = thumb.row_mut(y);
            for x in 0..width {
                let i = x as usize * BYTES_PER_PIXEL;
                let bar = BARS[(x as u64 * 8 / width.max(1) as u64) as usize];
                for (channel, value) in bar.iter().enumerate() {
                    row[i + channel] = (*value as f64 * gain).round() as u8;
                }
                row[i + 3] = 255;
            }
        }

        thumb
    }
}

/// Arc-wrapped thumbnail shared between the fetch worker and the renderer.
pub type SharedThumbnail = Arc<Thumbnail>;
