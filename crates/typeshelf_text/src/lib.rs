//! Glyph atlas cache for Typeshelf
//!
//! This crate provides:
//! - Font loading and rasterization (TTF/OTF via ttf-parser and swash)
//! - Shelf packing of glyph bitmaps into 256x256 atlases
//! - A lazy, append-only glyph cache filled on first draw
//! - One measuring/drawing loop with pairwise kerning
//!
//! ```no_run
//! use typeshelf_paint::{Color, CpuCanvas};
//! use typeshelf_text::{load_font, FontBackend, LoadFlags};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut canvas = CpuCanvas::new(320, 64)?;
//! let mut font = load_font("DejaVuSans.ttf", 24, LoadFlags::NONE)?;
//! let width = font.measure_text("Hello", 5);
//! font.draw_text(&mut canvas, "Hello", 5, (320 - width) / 2, 20, Color::WHITE)?;
//! font.destroy(&mut canvas);
//! # Ok(())
//! # }
//! ```

pub mod atlas;
pub mod cache;
pub mod font;
pub mod library;
pub mod pipeline;
pub mod raster;
pub mod ttf;

pub use atlas::{AtlasSet, ATLAS_SIZE, GLYPH_PADDING};
pub use cache::{CachedGlyph, GlyphCache};
pub use font::{load_font, load_font_from_memory, Font, FontBackend, LoadFlags};
pub use library::Library;
pub use pipeline::{Draw, GlyphSink, Measure, TextPipeline};
pub use raster::{
    check_pixel_size, to_pixels, GlyphIndex, RasterFace, RasterizedGlyph, MAX_PIXEL_SIZE, NOTDEF,
};
pub use ttf::TtfFace;

use thiserror::Error;

/// Text rendering errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    #[error("Failed to parse font: {0}")]
    FontParse(String),

    #[error("Invalid pixel size: {0}")]
    InvalidPixelSize(u32),

    #[error("Glyph of {width}x{height} does not fit a {atlas}x{atlas} atlas")]
    GlyphTooLarge { width: u32, height: u32, atlas: u32 },

    #[error(transparent)]
    Paint(#[from] typeshelf_paint::PaintError),
}

pub type Result<T> = std::result::Result<T, TextError>;
