use clap::Parser;
use std::path::PathBuf;

/// Headless scrubbing demo for the Scrubline time selector
#[derive(Parser, Debug)]
#[command(name = "scrubline", version, about, long_about = None)]
pub struct Args {
    /// Video to extract thumbnails from with ffmpeg (colour bars if omitted)
    #[arg(value_name = "VIDEO")]
    pub video: Option<PathBuf>,

    /// Selector config JSON file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Asset duration in seconds; must match VIDEO when one is given
    #[arg(short, long, value_name = "SECS", default_value_t = 120.0)]
    pub duration: f64,

    /// Width of the preview strip in pixels
    #[arg(short, long, value_name = "PX", default_value_t = 1280.0)]
    pub width: f64,
}
