//! Frame Resize Utilities
//!
//! Decodes image files into RGB frames and shapes them to a fixed
//! `(height, width)` under one of three resize policies:
//! - Stretch: plain resize, aspect ratio ignored
//! - Fit: aspect-preserving scale, letterboxed on black
//! - Cut: aspect-preserving scale to cover, centre crop

pub mod decode;
pub mod frame;

pub use decode::{FsImageDecoder, ImageDecoder};
pub use frame::{resize_frame, Frame};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frame error types
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid frame shape: {0}")]
    InvalidShape(String),

    #[error("Pixel buffer of {len} bytes does not match {width}x{height} RGB")]
    Buffer { len: usize, width: u32, height: u32 },
}

/// Resize policy applied when a frame does not match the target shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameMode {
    /// Resize both axes independently
    #[default]
    Stretch,
    /// Scale to fit inside the target and pad the rest with black
    Fit,
    /// Scale to cover the target and crop the overflow around the centre
    Cut,
}
