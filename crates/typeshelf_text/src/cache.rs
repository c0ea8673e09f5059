//! Per-font glyph cache
//!
//! A dense array indexed by glyph index. A slot is filled the first time its
//! glyph is drawn and is never replaced or cleared afterwards. Measurement
//! only reads the cache ([`GlyphCache::get`]); rasterization happens solely
//! in [`GlyphCache::get_or_create`], which needs a canvas, so scanning text
//! for its width cannot put glyphs into an atlas.

use typeshelf_paint::{Canvas, Color, Region};

use crate::atlas::AtlasSet;
use crate::raster::{GlyphIndex, RasterFace};
use crate::Result;

/// A glyph bitmap resident in an atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachedGlyph {
    /// Atlas sub-region holding the white-on-alpha bitmap
    pub region: Region,
    /// Horizontal draw offset from the pen position
    pub offset_x: i32,
    /// Vertical draw offset from the top of the line
    pub offset_y: i32,
}

/// Glyph index to cached bitmap mapping
#[derive(Debug, Default)]
pub struct GlyphCache {
    slots: Vec<Option<CachedGlyph>>,
}

impl GlyphCache {
    /// Create an empty cache with slots for glyphs `0..=bound`
    pub fn new(bound: GlyphIndex) -> Self {
        Self {
            slots: vec![None; bound as usize + 1],
        }
    }

    /// Number of slots (cached or not)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of glyphs that have a bitmap
    pub fn cached_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Look a glyph up without rasterizing
    pub fn get(&self, glyph: GlyphIndex) -> Option<&CachedGlyph> {
        self.slots.get(glyph as usize).and_then(Option::as_ref)
    }

    /// Return the cached bitmap for `glyph`, rasterizing and packing it on
    /// first use.
    ///
    /// Coverage byte `c` is written as `(255, 255, 255, c)` so the bitmap can
    /// be tinted freely at draw time.
    pub fn get_or_create<F, C>(
        &mut self,
        glyph: GlyphIndex,
        face: &F,
        atlas: &mut AtlasSet,
        canvas: &mut C,
        font_height: i32,
    ) -> Result<CachedGlyph>
    where
        F: RasterFace + ?Sized,
        C: Canvas + ?Sized,
    {
        if let Some(cached) = self.get(glyph) {
            return Ok(*cached);
        }

        let raster = face.rasterize(glyph);
        let region = atlas.allocate(canvas, raster.width, raster.rows)?;
        {
            let mut lock = canvas.lock_region(&region)?;
            lock.clear(Color::TRANSPARENT);
            for y in 0..raster.rows {
                for x in 0..raster.width {
                    lock.put_pixel(x, y, [255, 255, 255, raster.coverage_at(x, y)]);
                }
            }
        }

        let cached = CachedGlyph {
            region,
            offset_x: raster.left,
            offset_y: font_height - raster.top,
        };

        let index = glyph as usize;
        if index >= self.slots.len() {
            tracing::debug!(
                "Glyph {} beyond cache bound {}, growing",
                glyph,
                self.slots.len()
            );
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(cached);

        tracing::trace!(
            "Cached glyph {} ({}x{}) at {},{}",
            glyph,
            region.width,
            region.height,
            region.x,
            region.y
        );

        Ok(cached)
    }
}
