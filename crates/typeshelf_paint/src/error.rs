//! Paint error types

use thiserror::Error;

use crate::BitmapKey;

/// Graphics backend errors
#[derive(Error, Debug)]
pub enum PaintError {
    /// Bitmaps must be at least 1x1
    #[error("Invalid bitmap size: {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    /// The bitmap was destroyed or never existed
    #[error("Unknown bitmap: {0:?}")]
    UnknownBitmap(BitmapKey),

    /// A sub-region view does not fit inside its parent
    #[error("Region {x},{y} {width}x{height} is outside its {parent_width}x{parent_height} bitmap")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        parent_width: u32,
        parent_height: u32,
    },

    /// Frame export failed
    #[cfg(feature = "png")]
    #[error("Image export failed: {0}")]
    Image(#[from] image::ImageError),

    /// Frame buffer does not match its declared size
    #[error("Frame data is {actual} bytes, expected {expected}")]
    FrameSize { expected: usize, actual: usize },
}

/// Result type for paint operations
pub type Result<T> = std::result::Result<T, PaintError>;
