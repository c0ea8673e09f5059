#![allow(dead_code)]

use std::cell::Cell;
use std::collections::HashMap;

use typeshelf_text::{GlyphIndex, RasterFace, RasterizedGlyph, NOTDEF};

/// Bitmap size, bearings and advance of one scripted glyph
#[derive(Debug, Clone, Copy)]
pub struct GlyphShape {
    pub width: u32,
    pub rows: u32,
    pub left: i32,
    pub top: i32,
    /// 26.6
    pub advance: i32,
}

/// A face whose metrics are fixed up front and that counts rasterizations
#[derive(Default)]
pub struct ScriptedFace {
    glyphs: HashMap<char, (GlyphIndex, GlyphShape)>,
    kerning: HashMap<(GlyphIndex, GlyphIndex), i32>,
    notdef: Option<GlyphShape>,
    rasterized: Cell<usize>,
}

impl ScriptedFace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyph(mut self, ch: char, index: GlyphIndex, shape: GlyphShape) -> Self {
        self.glyphs.insert(ch, (index, shape));
        self
    }

    pub fn notdef(mut self, shape: GlyphShape) -> Self {
        self.notdef = Some(shape);
        self
    }

    pub fn kern(mut self, left: char, right: char, delta: i32) -> Self {
        let l = self.index_of(left);
        let r = self.index_of(right);
        self.kerning.insert((l, r), delta);
        self
    }

    pub fn rasterizations(&self) -> usize {
        self.rasterized.get()
    }

    fn index_of(&self, ch: char) -> GlyphIndex {
        self.glyphs.get(&ch).map_or(NOTDEF, |(index, _)| *index)
    }

    fn shape(&self, glyph: GlyphIndex) -> Option<GlyphShape> {
        if glyph == NOTDEF {
            return self.notdef;
        }
        self.glyphs
            .values()
            .find(|(index, _)| *index == glyph)
            .map(|(_, shape)| *shape)
    }
}

impl RasterFace for ScriptedFace {
    fn glyph_index(&self, ch: char) -> GlyphIndex {
        self.index_of(ch)
    }

    fn glyph_index_bound(&self) -> GlyphIndex {
        self.glyphs.values().map(|(index, _)| *index).max().unwrap_or(0)
    }

    fn advance(&self, glyph: GlyphIndex) -> i32 {
        self.shape(glyph).map_or(0, |shape| shape.advance)
    }

    fn kerning(&self, left: GlyphIndex, right: GlyphIndex) -> i32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0)
    }

    fn rasterize(&self, glyph: GlyphIndex) -> RasterizedGlyph {
        self.rasterized.set(self.rasterized.get() + 1);
        let Some(shape) = self.shape(glyph) else {
            return RasterizedGlyph::default();
        };
        RasterizedGlyph {
            coverage: vec![255; (shape.width * shape.rows) as usize],
            width: shape.width,
            rows: shape.rows,
            pitch: shape.width as usize,
            left: shape.left,
            top: shape.top,
            advance: shape.advance,
        }
    }
}

pub const A: GlyphShape = GlyphShape {
    width: 14,
    rows: 18,
    left: 1,
    top: 18,
    advance: 1024,
};

pub const V: GlyphShape = GlyphShape {
    width: 15,
    rows: 18,
    left: 0,
    top: 18,
    advance: 960,
};

pub const SPACE: GlyphShape = GlyphShape {
    width: 0,
    rows: 0,
    left: 0,
    top: 0,
    advance: 448,
};

/// Glyph 'A' (14x18, 16px advance), 'V' (15x18, 15px advance),
/// space (no bitmap, 7px advance) and kerning('A', 'V') = -2px
pub fn av_face() -> ScriptedFace {
    ScriptedFace::new()
        .glyph('A', 36, A)
        .glyph('V', 57, V)
        .glyph(' ', 3, SPACE)
        .kern('A', 'V', -128)
}
