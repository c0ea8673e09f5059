//! Graphics backend seam
//!
//! Text rendering never touches pixel memory directly. It asks a [`Canvas`]
//! for bitmaps, carves [`Region`] views out of them, writes pixels only
//! through a [`LockedRegion`] and composites regions with
//! [`Canvas::draw_region`].

use crate::error::Result;
use crate::Color;

slotmap::new_key_type! {
    /// Handle to a backend-owned RGBA8 bitmap
    pub struct BitmapKey;
}

/// A rectangular view into a bitmap
///
/// Regions do not own pixels. A region stays valid exactly as long as the
/// bitmap it was carved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Parent bitmap
    pub bitmap: BitmapKey,
    /// Left edge inside the parent
    pub x: u32,
    /// Top edge inside the parent
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Region {
    /// Right edge (exclusive) inside the parent
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive) inside the parent
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether two regions share at least one pixel
    pub fn overlaps(&self, other: &Region) -> bool {
        self.bitmap == other.bitmap
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Write access to the pixels of one region
///
/// Coordinates are local to the region. Writes outside the region are
/// dropped. The lock is released when this value is dropped.
pub struct LockedRegion<'a> {
    pixels: &'a mut [u8],
    stride: usize,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl<'a> LockedRegion<'a> {
    /// Wrap the RGBA8 pixel buffer of a parent bitmap `stride` pixels wide
    pub fn new(pixels: &'a mut [u8], stride: u32, region: &Region) -> Self {
        Self {
            pixels,
            stride: stride as usize,
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        }
    }

    /// Write one RGBA8 pixel
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((self.y + y) as usize * self.stride + (self.x + x) as usize) * 4;
        if let Some(px) = self.pixels.get_mut(idx..idx + 4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Fill the whole region with one color
    pub fn clear(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for y in 0..self.height {
            for x in 0..self.width {
                self.put_pixel(x, y, rgba);
            }
        }
    }
}

/// A graphics backend that owns bitmaps and can draw them
pub trait Canvas {
    /// Create a fully transparent bitmap
    fn create_bitmap(&mut self, width: u32, height: u32) -> Result<BitmapKey>;

    /// Destroy a bitmap, invalidating every region carved from it
    fn destroy_bitmap(&mut self, bitmap: BitmapKey);

    /// Size of a live bitmap
    fn bitmap_size(&self, bitmap: BitmapKey) -> Option<(u32, u32)>;

    /// Create a view of part of a bitmap
    fn sub_region(
        &self,
        bitmap: BitmapKey,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Region>;

    /// Lock a region for pixel writes
    fn lock_region(&mut self, region: &Region) -> Result<LockedRegion<'_>>;

    /// Composite a region onto the current target at `(x, y)`, multiplied by `tint`
    fn draw_region(&mut self, region: &Region, x: i32, y: i32, tint: Color);
}
