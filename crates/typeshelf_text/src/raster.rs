//! Rasterization facade
//!
//! The glyph cache never parses font data itself. Everything it needs from a
//! font goes through [`RasterFace`]: codepoint to glyph mapping, metrics in
//! 26.6 fixed point, pairwise kerning and coverage bitmaps.

/// Font-internal glyph index (distinct from the codepoint)
pub type GlyphIndex = u32;

/// Glyph used for codepoints the face does not cover
pub const NOTDEF: GlyphIndex = 0;

/// Convert a 26.6 fixed-point value to whole pixels.
///
/// Arithmetic shift, so negative values floor toward negative infinity.
#[inline]
pub fn to_pixels(fixed: i32) -> i32 {
    fixed >> 6
}

/// Convert whole pixels to 26.6 fixed point, saturating at the `i32` range
#[inline]
pub fn from_pixels(px: i32) -> i32 {
    px.saturating_mul(64)
}

/// Largest pixel size whose 26.6 value still fits an `i32`
pub const MAX_PIXEL_SIZE: u32 = (i32::MAX >> 6) as u32;

/// Accept pixel sizes in `1..=MAX_PIXEL_SIZE`
pub fn check_pixel_size(pixel_size: u32) -> crate::Result<u32> {
    if pixel_size == 0 || pixel_size > MAX_PIXEL_SIZE {
        return Err(crate::TextError::InvalidPixelSize(pixel_size));
    }
    Ok(pixel_size)
}

/// Greyscale coverage bitmap for one glyph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RasterizedGlyph {
    /// One coverage byte per pixel, rows `pitch` bytes apart
    pub coverage: Vec<u8>,
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub rows: u32,
    /// Bytes between the starts of consecutive rows
    pub pitch: usize,
    /// Distance from the pen position to the left edge of the bitmap
    pub left: i32,
    /// Distance from the baseline up to the top row of the bitmap
    pub top: i32,
    /// Horizontal advance (26.6)
    pub advance: i32,
}

impl RasterizedGlyph {
    /// Coverage at `(x, y)`, zero outside the bitmap
    pub fn coverage_at(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.rows {
            return 0;
        }
        self.coverage
            .get(y as usize * self.pitch + x as usize)
            .copied()
            .unwrap_or(0)
    }
}

/// A font face opened at a fixed pixel size
pub trait RasterFace {
    /// Map a codepoint to a glyph, [`NOTDEF`] when the face has no mapping
    fn glyph_index(&self, ch: char) -> GlyphIndex;

    /// Largest glyph index reachable from the face's codepoint coverage
    fn glyph_index_bound(&self) -> GlyphIndex;

    /// Horizontal advance in 26.6
    fn advance(&self, glyph: GlyphIndex) -> i32;

    /// Signed horizontal kerning between two glyphs in 26.6
    fn kerning(&self, left: GlyphIndex, right: GlyphIndex) -> i32;

    /// Render a glyph into a coverage bitmap
    fn rasterize(&self, glyph: GlyphIndex) -> RasterizedGlyph;
}
