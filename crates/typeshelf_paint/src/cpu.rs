//! Software canvas
//!
//! Keeps every bitmap in CPU memory as RGBA8 and composites onto a fixed-size
//! render target with straight-alpha source-over blending.

use slotmap::SlotMap;

use crate::canvas::{BitmapKey, Canvas, LockedRegion, Region};
use crate::error::{PaintError, Result};
use crate::{Color, Frame};

struct CpuBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl CpuBitmap {
    fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PaintError::InvalidSize { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        })
    }

    fn to_frame(&self) -> Frame {
        Frame::new(self.pixels.clone(), self.width, self.height)
    }
}

/// In-memory [`Canvas`] implementation
pub struct CpuCanvas {
    bitmaps: SlotMap<BitmapKey, CpuBitmap>,
    target: CpuBitmap,
}

impl CpuCanvas {
    /// Create a canvas whose render target is `width` x `height`
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            bitmaps: SlotMap::with_key(),
            target: CpuBitmap::new(width, height)?,
        })
    }

    /// Number of live bitmaps (the target is not counted)
    pub fn bitmap_count(&self) -> usize {
        self.bitmaps.len()
    }

    /// Render target dimensions
    pub fn target_size(&self) -> (u32, u32) {
        (self.target.width, self.target.height)
    }

    /// Fill the render target with one color
    pub fn clear_target(&mut self, color: Color) {
        let rgba = color.to_rgba8();
        for px in self.target.pixels.chunks_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Copy the render target out
    pub fn capture(&self) -> Frame {
        self.target.to_frame()
    }

    /// Copy a bitmap out
    pub fn capture_bitmap(&self, bitmap: BitmapKey) -> Option<Frame> {
        self.bitmaps.get(bitmap).map(CpuBitmap::to_frame)
    }
}

/// Straight-alpha source-over
fn blend(dst: &mut [u8], src: [f32; 4]) {
    let sa = src[3];
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    for c in 0..3 {
        let dc = dst[c] as f32 / 255.0;
        let out = (src[c] * sa + dc * da * (1.0 - sa)) / out_a;
        dst[c] = (out.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    dst[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
}

impl Canvas for CpuCanvas {
    fn create_bitmap(&mut self, width: u32, height: u32) -> Result<BitmapKey> {
        let bitmap = CpuBitmap::new(width, height)?;
        let key = self.bitmaps.insert(bitmap);
        tracing::trace!("Created {}x{} bitmap {:?}", width, height, key);
        Ok(key)
    }

    fn destroy_bitmap(&mut self, bitmap: BitmapKey) {
        if self.bitmaps.remove(bitmap).is_none() {
            tracing::warn!("Destroying unknown bitmap {:?}", bitmap);
        }
    }

    fn bitmap_size(&self, bitmap: BitmapKey) -> Option<(u32, u32)> {
        self.bitmaps.get(bitmap).map(|b| (b.width, b.height))
    }

    fn sub_region(
        &self,
        bitmap: BitmapKey,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Region> {
        let parent = self
            .bitmaps
            .get(bitmap)
            .ok_or(PaintError::UnknownBitmap(bitmap))?;
        if width == 0 || height == 0 {
            return Err(PaintError::InvalidSize { width, height });
        }
        let fits = x
            .checked_add(width)
            .is_some_and(|right| right <= parent.width)
            && y
                .checked_add(height)
                .is_some_and(|bottom| bottom <= parent.height);
        if !fits {
            return Err(PaintError::RegionOutOfBounds {
                x,
                y,
                width,
                height,
                parent_width: parent.width,
                parent_height: parent.height,
            });
        }
        Ok(Region {
            bitmap,
            x,
            y,
            width,
            height,
        })
    }

    fn lock_region(&mut self, region: &Region) -> Result<LockedRegion<'_>> {
        let parent = self
            .bitmaps
            .get_mut(region.bitmap)
            .ok_or(PaintError::UnknownBitmap(region.bitmap))?;
        Ok(LockedRegion::new(&mut parent.pixels, parent.width, region))
    }

    fn draw_region(&mut self, region: &Region, x: i32, y: i32, tint: Color) {
        let Some(source) = self.bitmaps.get(region.bitmap) else {
            tracing::warn!("Drawing region of unknown bitmap {:?}", region.bitmap);
            return;
        };
        let target = &mut self.target;

        for ry in 0..region.height {
            let ty = y + ry as i32;
            if ty < 0 || ty >= target.height as i32 {
                continue;
            }
            for rx in 0..region.width {
                let tx = x + rx as i32;
                if tx < 0 || tx >= target.width as i32 {
                    continue;
                }
                let si = (((region.y + ry) * source.width + region.x + rx) * 4) as usize;
                let Some(px) = source.pixels.get(si..si + 4) else {
                    continue;
                };
                let src = [
                    px[0] as f32 / 255.0 * tint.r,
                    px[1] as f32 / 255.0 * tint.g,
                    px[2] as f32 / 255.0 * tint.b,
                    px[3] as f32 / 255.0 * tint.a,
                ];
                let di = ((ty as u32 * target.width + tx as u32) * 4) as usize;
                blend(&mut target.pixels[di..di + 4], src);
            }
        }
    }
}
