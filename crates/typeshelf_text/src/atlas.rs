//! Glyph atlases
//!
//! Glyph bitmaps are packed into a growing sequence of fixed-size atlas
//! bitmaps with a shelf (row) allocator. Placement runs left to right along
//! the current row; when a glyph does not fit horizontally a new row is
//! opened below, and when no row fits a new atlas is appended. Atlases are
//! never compacted or reclaimed until the owning font is destroyed.

use typeshelf_paint::{BitmapKey, Canvas, Region};

use crate::{Result, TextError};

/// Width and height of every atlas bitmap
pub const ATLAS_SIZE: u32 = 256;

/// Empty pixels left after each glyph on both axes, so texture filtering
/// never samples a neighbor
pub const GLYPH_PADDING: u32 = 2;

/// Shelf allocator over an append-only sequence of atlas bitmaps
#[derive(Debug)]
pub struct AtlasSet {
    atlases: Vec<BitmapKey>,
    cursor_x: u32,
    cursor_y: u32,
    /// Nominal row height (the font's pixel height)
    row_height: u32,
    /// Tallest glyph placed in the current row
    row_extent: u32,
}

impl AtlasSet {
    /// Create an empty set whose rows are `row_height` pixels tall
    pub fn new(row_height: u32) -> Self {
        Self {
            atlases: Vec::new(),
            cursor_x: 0,
            cursor_y: 0,
            row_height,
            row_extent: 0,
        }
    }

    /// Atlas bitmaps in creation order
    pub fn atlases(&self) -> &[BitmapKey] {
        &self.atlases
    }

    pub fn len(&self) -> usize {
        self.atlases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atlases.is_empty()
    }

    /// Packing cursor inside the last atlas
    pub fn cursor(&self) -> (u32, u32) {
        (self.cursor_x, self.cursor_y)
    }

    /// Reserve a `width` x `height` region.
    ///
    /// Zero dimensions are treated as 1. Tries the current row, then a new
    /// row, then a fresh atlas, and never appends more than one atlas per
    /// call. Glyphs larger than an atlas are rejected with
    /// [`TextError::GlyphTooLarge`].
    pub fn allocate<C: Canvas + ?Sized>(
        &mut self,
        canvas: &mut C,
        width: u32,
        height: u32,
    ) -> Result<Region> {
        let width = width.max(1);
        let height = height.max(1);

        if width > ATLAS_SIZE || height > ATLAS_SIZE {
            tracing::warn!(
                "Glyph of {}x{} cannot fit a {}px atlas",
                width,
                height,
                ATLAS_SIZE
            );
            return Err(TextError::GlyphTooLarge {
                width,
                height,
                atlas: ATLAS_SIZE,
            });
        }

        let current = self.atlases.last().copied();
        let atlas = match current {
            Some(atlas) => {
                if self.cursor_x + width > ATLAS_SIZE {
                    let next_row = self.cursor_y.saturating_add(self.row_advance());
                    if next_row.saturating_add(height) <= ATLAS_SIZE {
                        self.cursor_x = 0;
                        self.cursor_y = next_row;
                        self.row_extent = 0;
                        atlas
                    } else {
                        self.push_atlas(canvas)?
                    }
                } else if self.cursor_y + height > ATLAS_SIZE {
                    self.push_atlas(canvas)?
                } else {
                    atlas
                }
            }
            None => self.push_atlas(canvas)?,
        };

        let region = canvas.sub_region(atlas, self.cursor_x, self.cursor_y, width, height)?;
        self.cursor_x += width + GLYPH_PADDING;
        self.row_extent = self.row_extent.max(height);
        Ok(region)
    }

    /// Vertical distance from the current row to the next one
    fn row_advance(&self) -> u32 {
        self.row_height
            .max(self.row_extent)
            .saturating_add(GLYPH_PADDING)
    }

    fn push_atlas<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> Result<BitmapKey> {
        let atlas = canvas.create_bitmap(ATLAS_SIZE, ATLAS_SIZE)?;
        self.atlases.push(atlas);
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.row_extent = 0;
        tracing::debug!("Appended glyph atlas #{}", self.atlases.len());
        Ok(atlas)
    }

    /// Destroy every atlas bitmap, newest first
    pub fn destroy<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        while let Some(atlas) = self.atlases.pop() {
            canvas.destroy_bitmap(atlas);
        }
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.row_extent = 0;
    }
}
