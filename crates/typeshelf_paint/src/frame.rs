//! Captured pixel data and PNG export

#[cfg(feature = "png")]
use std::path::Path;

/// RGBA8 pixels copied out of a canvas target or bitmap.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Raw pixel data (RGBA8)
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Get the number of pixels.
    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Get a pixel at (x, y) as RGBA.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4) as usize;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.data.chunks(4).all(|px| px[3] == 0)
    }

    /// Compare with another frame, returning the number of different pixels.
    pub fn diff_pixel_count(&self, other: &Frame) -> usize {
        if self.width != other.width || self.height != other.height {
            return self.pixel_count().max(other.pixel_count());
        }

        self.data
            .chunks(4)
            .zip(other.data.chunks(4))
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Export as PNG.
    #[cfg(feature = "png")]
    pub fn save_png(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let expected = self.pixel_count() * 4;
        if self.data.len() != expected {
            return Err(crate::PaintError::FrameSize {
                expected,
                actual: self.data.len(),
            });
        }
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.data,
            self.width,
            self.height,
            image::ExtendedColorType::Rgba8,
        )?;
        tracing::debug!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}
