//! Error types for Scrubline.

use crate::time::RationalTime;
use thiserror::Error;

/// Main error type for Scrubline operations.
#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Frame extraction failed: {0}")]
    Extraction(String),

    #[error("Time {time} is outside the asset duration {duration}")]
    OutOfRange {
        time: RationalTime,
        duration: RationalTime,
    },

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Scrubline operations.
pub type Result<T> = std::result::Result<T, ScrubError>;
