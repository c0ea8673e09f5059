//! TrueType/OpenType faces
//!
//! Uses ttf-parser for character mapping, metrics and the legacy `kern`
//! table, and swash for outline rasterization. Metrics are scaled to the
//! pixel size and grid-fitted to whole pixels before being handed out in
//! 26.6, the way a hinting rasterizer reports them.

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;

use swash::scale::{Render, Source};
use swash::zeno::Format;
use ttf_parser::{GlyphId, Tag};

use crate::library::Library;
use crate::raster::{
    check_pixel_size, from_pixels, GlyphIndex, RasterFace, RasterizedGlyph, NOTDEF,
};
use crate::{Result, TextError};

/// A font face loaded from TrueType/OpenType data at a fixed pixel size
///
/// Character mapping and advances are read once at load time. Kerning reads
/// pairs straight out of the `kern` table bytes, located at load time.
pub struct TtfFace {
    data: Vec<u8>,
    face_index: u32,
    pixel_size: u32,
    units_per_em: u16,
    glyph_index_bound: GlyphIndex,
    /// Codepoint to glyph index, from the Unicode cmap subtables
    cmap: HashMap<u32, GlyphIndex>,
    /// Grid-fitted advance per glyph (26.6)
    advances: Vec<i32>,
    /// Location of the `kern` table inside `data`
    kern: Option<Range<usize>>,
}

impl std::fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFace")
            .field("bytes", &self.data.len())
            .field("face_index", &self.face_index)
            .field("pixel_size", &self.pixel_size)
            .field("units_per_em", &self.units_per_em)
            .field("glyph_index_bound", &self.glyph_index_bound)
            .field("mapped_codepoints", &self.cmap.len())
            .field("kern", &self.kern.is_some())
            .finish()
    }
}

impl TtfFace {
    /// Open the first face of a font file
    pub fn open(path: impl AsRef<Path>, pixel_size: u32) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| {
            TextError::FontLoad(format!("Failed to read font file {:?}: {}", path, e))
        })?;
        Self::from_bytes(data, 0, pixel_size)
    }

    /// Parse a face out of font data already in memory
    pub fn from_bytes(data: Vec<u8>, face_index: u32, pixel_size: u32) -> Result<Self> {
        let pixel_size = check_pixel_size(pixel_size)?;

        Library::get();

        let face = ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParse(e.to_string()))?;
        if swash::FontRef::from_index(&data, face_index as usize).is_none() {
            return Err(TextError::FontParse(
                "Face is not readable by the rasterizer".to_string(),
            ));
        }

        let units_per_em = face.units_per_em();
        let cmap = scan_cmap(&face);
        let glyph_index_bound = cmap.values().copied().max().unwrap_or_else(|| {
            let count = face.number_of_glyphs() as GlyphIndex;
            tracing::debug!("No Unicode cmap, sizing cache from glyph count {}", count);
            count.saturating_sub(1)
        });
        let kern = face
            .raw_face()
            .table(Tag::from_bytes(b"kern"))
            .map(|table| {
                let start = table.as_ptr() as usize - data.as_ptr() as usize;
                start..start + table.len()
            });
        let advances = (0..face.number_of_glyphs())
            .map(|id| {
                let units = face.glyph_hor_advance(GlyphId(id)).unwrap_or(0);
                grid_fit(units as i32, pixel_size, units_per_em)
            })
            .collect();
        drop(face);

        Ok(Self {
            data,
            face_index,
            pixel_size,
            units_per_em,
            glyph_index_bound,
            cmap,
            advances,
            kern,
        })
    }

    fn kern_table(&self) -> Option<ttf_parser::kern::Table<'_>> {
        let range = self.kern.clone()?;
        ttf_parser::kern::Table::parse(self.data.get(range)?)
    }

    fn empty_glyph(&self, glyph: GlyphIndex) -> RasterizedGlyph {
        RasterizedGlyph {
            advance: self.advance(glyph),
            ..Default::default()
        }
    }
}

/// Scale font units to whole pixels, expressed in 26.6
fn grid_fit(units: i32, pixel_size: u32, units_per_em: u16) -> i32 {
    let scaled = units as f64 * pixel_size as f64 / units_per_em.max(1) as f64;
    // float to int casts saturate
    from_pixels(scaled.round() as i32)
}

/// Map every codepoint of the Unicode cmap subtables. Earlier subtables win,
/// matching `ttf_parser::Face::glyph_index`.
fn scan_cmap(face: &ttf_parser::Face<'_>) -> HashMap<u32, GlyphIndex> {
    let mut map = HashMap::new();
    if let Some(cmap) = face.tables().cmap {
        for subtable in cmap.subtables.into_iter().filter(|s| s.is_unicode()) {
            subtable.codepoints(|cp| {
                if let Some(id) = subtable.glyph_index(cp) {
                    map.entry(cp).or_insert(id.0 as GlyphIndex);
                }
            });
        }
    }
    map
}

impl RasterFace for TtfFace {
    fn glyph_index(&self, ch: char) -> GlyphIndex {
        self.cmap.get(&(ch as u32)).copied().unwrap_or(NOTDEF)
    }

    fn glyph_index_bound(&self) -> GlyphIndex {
        self.glyph_index_bound
    }

    fn advance(&self, glyph: GlyphIndex) -> i32 {
        self.advances.get(glyph as usize).copied().unwrap_or(0)
    }

    fn kerning(&self, left: GlyphIndex, right: GlyphIndex) -> i32 {
        let (Ok(left), Ok(right)) = (u16::try_from(left), u16::try_from(right)) else {
            return 0;
        };
        let Some(kern) = self.kern_table() else {
            return 0;
        };

        let units: i32 = kern
            .subtables
            .into_iter()
            .filter(|s| s.horizontal && !s.variable && !s.has_cross_stream)
            .filter_map(|s| s.glyphs_kerning(GlyphId(left), GlyphId(right)))
            .map(i32::from)
            .sum();
        grid_fit(units, self.pixel_size, self.units_per_em)
    }

    fn rasterize(&self, glyph: GlyphIndex) -> RasterizedGlyph {
        let Ok(glyph_id) = u16::try_from(glyph) else {
            tracing::warn!("Glyph index {} out of range for rasterizer", glyph);
            return self.empty_glyph(glyph);
        };
        let Some(font) = swash::FontRef::from_index(&self.data, self.face_index as usize) else {
            return self.empty_glyph(glyph);
        };

        let mut context = Library::get().scale_context();
        let mut scaler = context
            .builder(font)
            .size(self.pixel_size as f32)
            .hint(true)
            .build();

        let mut render = Render::new(&[Source::Outline]);
        render.format(Format::Alpha);

        match render.render(&mut scaler, glyph_id) {
            Some(img) => RasterizedGlyph {
                pitch: img.placement.width as usize,
                width: img.placement.width,
                rows: img.placement.height,
                left: img.placement.left,
                top: img.placement.top,
                coverage: img.data,
                advance: self.advance(glyph),
            },
            // Empty glyph (like space) - no bitmap but has advance
            None => self.empty_glyph(glyph),
        }
    }
}
