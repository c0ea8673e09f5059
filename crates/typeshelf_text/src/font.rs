//! Font lifecycle
//!
//! A [`Font`] owns its face, its glyph cache and its atlas sequence. Loading
//! touches no graphics resources; atlases are created lazily by the first
//! draw. Atlas bitmaps live in the canvas, so a font must be handed back to
//! the canvas that drew it with [`FontBackend::destroy`].

use std::ops::{BitOr, BitOrAssign};
use std::path::Path;

use typeshelf_paint::{Canvas, Color};

use crate::atlas::AtlasSet;
use crate::cache::{CachedGlyph, GlyphCache};
use crate::pipeline::{Draw, TextPipeline};
use crate::raster::{check_pixel_size, GlyphIndex, RasterFace};
use crate::ttf::TtfFace;
use crate::Result;

/// Options recognized by [`load_font`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LoadFlags(u32);

impl LoadFlags {
    pub const NONE: LoadFlags = LoadFlags(0);
    /// Ignore pairwise kerning
    pub const NO_KERNING: LoadFlags = LoadFlags(1);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn contains(self, other: LoadFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for LoadFlags {
    type Output = LoadFlags;

    fn bitor(self, rhs: LoadFlags) -> LoadFlags {
        LoadFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for LoadFlags {
    fn bitor_assign(&mut self, rhs: LoadFlags) {
        self.0 |= rhs.0;
    }
}

/// Operations every font backend provides
pub trait FontBackend {
    /// Line height in pixels
    fn height(&self) -> i32;

    /// Advance of a single codepoint
    fn measure_char(&self, ch: char) -> i32;

    /// Advance of the first `count` codepoints of `text`, kerning included
    fn measure_text(&self, text: &str, count: usize) -> i32;

    /// Draw one codepoint with its top-left at `(x, y)`, returning its advance
    fn draw_char(
        &mut self,
        canvas: &mut dyn Canvas,
        ch: char,
        x: i32,
        y: i32,
        tint: Color,
    ) -> Result<i32>;

    /// Draw the first `count` codepoints of `text`, returning the total advance
    fn draw_text(
        &mut self,
        canvas: &mut dyn Canvas,
        text: &str,
        count: usize,
        x: i32,
        y: i32,
        tint: Color,
    ) -> Result<i32>;

    /// Release every resource the font owns
    fn destroy(self, canvas: &mut dyn Canvas)
    where
        Self: Sized;
}

/// A font opened at one pixel size
pub struct Font<F: RasterFace = TtfFace> {
    face: F,
    height: i32,
    flags: LoadFlags,
    cache: GlyphCache,
    atlas: AtlasSet,
}

/// Load the first face of a font file.
///
/// Fails with [`crate::TextError::FontLoad`] or
/// [`crate::TextError::FontParse`]; nothing is allocated on failure.
pub fn load_font(path: impl AsRef<Path>, pixel_size: u32, flags: LoadFlags) -> Result<Font> {
    let path = path.as_ref();
    let face = TtfFace::open(path, pixel_size)?;
    tracing::debug!("Loaded font {} at {}px", path.display(), pixel_size);
    Font::with_face(face, pixel_size, flags)
}

/// Load a font from data already in memory
pub fn load_font_from_memory(data: Vec<u8>, pixel_size: u32, flags: LoadFlags) -> Result<Font> {
    let face = TtfFace::from_bytes(data, 0, pixel_size)?;
    Font::with_face(face, pixel_size, flags)
}

impl<F: RasterFace> Font<F> {
    /// Wrap an opened face.
    ///
    /// Fails with [`crate::TextError::InvalidPixelSize`] unless `pixel_size`
    /// is in `1..=MAX_PIXEL_SIZE`.
    pub fn with_face(face: F, pixel_size: u32, flags: LoadFlags) -> Result<Self> {
        let pixel_size = check_pixel_size(pixel_size)?;
        let bound = face.glyph_index_bound();
        tracing::debug!("Preparing cache for {} glyphs", bound);
        Ok(Self {
            face,
            height: pixel_size as i32,
            flags,
            cache: GlyphCache::new(bound),
            atlas: AtlasSet::new(pixel_size),
        })
    }

    pub fn face(&self) -> &F {
        &self.face
    }

    pub fn flags(&self) -> LoadFlags {
        self.flags
    }

    pub fn kerning_enabled(&self) -> bool {
        !self.flags.contains(LoadFlags::NO_KERNING)
    }

    pub fn glyph_index(&self, ch: char) -> GlyphIndex {
        self.face.glyph_index(ch)
    }

    /// Cached bitmap for a glyph, if it has been drawn
    pub fn cached_glyph(&self, glyph: GlyphIndex) -> Option<&CachedGlyph> {
        self.cache.get(glyph)
    }

    /// Number of glyphs with a cached bitmap
    pub fn cached_glyph_count(&self) -> usize {
        self.cache.cached_count()
    }

    /// Number of atlas bitmaps created so far
    pub fn atlas_count(&self) -> usize {
        self.atlas.len()
    }

    pub fn atlases(&self) -> &[typeshelf_paint::BitmapKey] {
        self.atlas.atlases()
    }

    fn pipeline(&self) -> TextPipeline<'_, F> {
        TextPipeline::new(&self.face, self.kerning_enabled())
    }
}

impl<F: RasterFace> FontBackend for Font<F> {
    fn height(&self) -> i32 {
        self.height
    }

    fn measure_char(&self, ch: char) -> i32 {
        self.pipeline().measure_char(ch)
    }

    fn measure_text(&self, text: &str, count: usize) -> i32 {
        self.pipeline().measure(text, count)
    }

    fn draw_char(
        &mut self,
        canvas: &mut dyn Canvas,
        ch: char,
        x: i32,
        y: i32,
        tint: Color,
    ) -> Result<i32> {
        let pipeline = TextPipeline::new(&self.face, self.kerning_enabled());
        let mut sink = Draw {
            face: &self.face,
            cache: &mut self.cache,
            atlas: &mut self.atlas,
            canvas,
            font_height: self.height,
            tint,
        };
        pipeline.render_glyph(None, ch, x, y, &mut sink)
    }

    fn draw_text(
        &mut self,
        canvas: &mut dyn Canvas,
        text: &str,
        count: usize,
        x: i32,
        y: i32,
        tint: Color,
    ) -> Result<i32> {
        let pipeline = TextPipeline::new(&self.face, self.kerning_enabled());
        let mut sink = Draw {
            face: &self.face,
            cache: &mut self.cache,
            atlas: &mut self.atlas,
            canvas,
            font_height: self.height,
            tint,
        };
        pipeline.process(text, count, x, y, &mut sink)
    }

    fn destroy(mut self, canvas: &mut dyn Canvas) {
        tracing::debug!(
            "Destroying font: {} cached glyphs in {} atlases",
            self.cache.cached_count(),
            self.atlas.len()
        );
        self.atlas.destroy(canvas);
    }
}

impl<F: RasterFace> Drop for Font<F> {
    fn drop(&mut self) {
        if !self.atlas.is_empty() {
            tracing::warn!(
                "Font dropped without destroy, leaking {} atlas bitmaps",
                self.atlas.len()
            );
        }
    }
}

impl<F: RasterFace> std::fmt::Debug for Font<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("height", &self.height)
            .field("flags", &self.flags)
            .field("cached_glyphs", &self.cache.cached_count())
            .field("atlases", &self.atlas.len())
            .finish()
    }
}
