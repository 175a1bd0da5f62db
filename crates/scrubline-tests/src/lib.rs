//! Integration test crate for Scrubline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives `TimeSelector` end to end over the media extractors.

#[cfg(test)]
mod selection;

#[cfg(test)]
mod thumbnails;
