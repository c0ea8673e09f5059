//! Text pipeline
//!
//! One loop drives both measuring and drawing, so a measured width is always
//! exactly the distance a draw call moves the pen. Each codepoint is mapped
//! to a glyph, kerned against the previous codepoint, handed to a
//! [`GlyphSink`] at its pen position and then advanced past.

use std::convert::Infallible;

use typeshelf_paint::{Canvas, Color};

use crate::atlas::AtlasSet;
use crate::cache::GlyphCache;
use crate::raster::{to_pixels, GlyphIndex, RasterFace};
use crate::TextError;

/// Receives every glyph the pipeline walks over
pub trait GlyphSink {
    type Error;

    /// Called once per glyph with the kerned pen position
    fn glyph(&mut self, glyph: GlyphIndex, x: i32, y: i32) -> Result<(), Self::Error>;
}

/// Sink that only lets the pipeline accumulate advances
#[derive(Debug, Default, Clone, Copy)]
pub struct Measure;

impl GlyphSink for Measure {
    type Error = Infallible;

    fn glyph(&mut self, _glyph: GlyphIndex, _x: i32, _y: i32) -> Result<(), Infallible> {
        Ok(())
    }
}

/// Sink that caches glyphs on first use and draws them
pub struct Draw<'a, F: RasterFace + ?Sized, C: Canvas + ?Sized> {
    pub face: &'a F,
    pub cache: &'a mut GlyphCache,
    pub atlas: &'a mut AtlasSet,
    pub canvas: &'a mut C,
    pub font_height: i32,
    pub tint: Color,
}

impl<F: RasterFace + ?Sized, C: Canvas + ?Sized> GlyphSink for Draw<'_, F, C> {
    type Error = TextError;

    fn glyph(&mut self, glyph: GlyphIndex, x: i32, y: i32) -> Result<(), TextError> {
        let cached = self.cache.get_or_create(
            glyph,
            self.face,
            self.atlas,
            self.canvas,
            self.font_height,
        )?;
        self.canvas.draw_region(
            &cached.region,
            x + cached.offset_x,
            y + cached.offset_y,
            self.tint,
        );
        Ok(())
    }
}

/// Codepoint loop over one face
pub struct TextPipeline<'a, F: RasterFace + ?Sized> {
    face: &'a F,
    kerning: bool,
}

impl<'a, F: RasterFace + ?Sized> TextPipeline<'a, F> {
    pub fn new(face: &'a F, kerning: bool) -> Self {
        Self { face, kerning }
    }

    /// Walk the first `count` codepoints of `text` starting at `(x, y)`.
    ///
    /// Returns the total horizontal advance. Stops early if `text` holds
    /// fewer than `count` codepoints.
    pub fn process<S: GlyphSink>(
        &self,
        text: &str,
        count: usize,
        x: i32,
        y: i32,
        sink: &mut S,
    ) -> Result<i32, S::Error> {
        let mut prev = None;
        let mut pen = x;
        for ch in text.chars().take(count) {
            pen += self.render_glyph(prev, ch, pen, y, sink)?;
            prev = Some(ch);
        }
        Ok(pen - x)
    }

    /// Handle one codepoint, kerning against `prev` when there is one.
    ///
    /// Returns how far the pen moved, kerning included.
    pub fn render_glyph<S: GlyphSink>(
        &self,
        prev: Option<char>,
        ch: char,
        x: i32,
        y: i32,
        sink: &mut S,
    ) -> Result<i32, S::Error> {
        let glyph = self.face.glyph_index(ch);
        let mut pen = x;

        if self.kerning {
            if let Some(prev) = prev {
                let delta = self.face.kerning(self.face.glyph_index(prev), glyph);
                pen += to_pixels(delta);
            }
        }

        sink.glyph(glyph, pen, y)?;

        pen += to_pixels(self.face.advance(glyph));
        Ok(pen - x)
    }

    /// Total advance of the first `count` codepoints
    pub fn measure(&self, text: &str, count: usize) -> i32 {
        match self.process(text, count, 0, 0, &mut Measure) {
            Ok(width) => width,
            Err(never) => match never {},
        }
    }

    /// Advance of a single codepoint, no kerning
    pub fn measure_char(&self, ch: char) -> i32 {
        match self.render_glyph(None, ch, 0, 0, &mut Measure) {
            Ok(width) => width,
            Err(never) => match never {},
        }
    }
}
