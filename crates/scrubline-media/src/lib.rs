//! Scrubline Media - still-frame extraction for scrub previews
//!
//! This crate handles:
//! - The `FrameExtractor` seam the selection control fetches through
//! - Best-effort cancellation of in-flight extractions
//! - Asset metadata
//! - A synthetic extractor and an FFmpeg-backed one

pub mod asset;
pub mod extractor;
pub mod ffmpeg;
pub mod test_pattern;

pub use asset::AssetInfo;
pub use extractor::{FetchCancel, FrameExtractor, ThumbnailSize};
pub use ffmpeg::FfmpegExtractor;
pub use test_pattern::TestPatternExtractor;
