mod common;

use common::{av_face, GlyphShape, ScriptedFace};
use pretty_assertions::assert_eq;
use typeshelf_paint::{Canvas, Color, CpuCanvas};
use typeshelf_text::{Font, FontBackend, LoadFlags, TextError};

fn canvas() -> CpuCanvas {
    CpuCanvas::new(200, 64).unwrap()
}

#[test]
fn drawing_same_glyph_twice_rasterizes_once() {
    let mut canvas = canvas();
    let mut font = Font::with_face(av_face(), 24, LoadFlags::NONE).unwrap();
    let a = font.glyph_index('A');

    font.draw_char(&mut canvas, 'A', 0, 0, Color::WHITE).unwrap();
    let first = *font.cached_glyph(a).unwrap();
    let atlases = font.atlas_count();

    font.draw_char(&mut canvas, 'A', 40, 0, Color::WHITE).unwrap();

    assert_eq!(font.face().rasterizations(), 1);
    assert_eq!(font.atlas_count(), atlases);
    assert_eq!(*font.cached_glyph(a).unwrap(), first);
    font.destroy(&mut canvas);
}

#[test]
fn drawing_aa_uses_one_entry_and_one_region() {
    let mut canvas = canvas();
    let mut font = Font::with_face(av_face(), 24, LoadFlags::NONE).unwrap();

    font.draw_text(&mut canvas, "AA", 2, 0, 0, Color::WHITE).unwrap();

    assert_eq!(font.atlas_count(), 1);
    assert_eq!(font.cached_glyph_count(), 1);
    assert_eq!(font.face().rasterizations(), 1);
    assert!(font.cached_glyph(font.glyph_index('A')).is_some());
    font.destroy(&mut canvas);
}

#[test]
fn measuring_never_caches() {
    let canvas = canvas();
    let font = Font::with_face(av_face(), 24, LoadFlags::NONE).unwrap();

    assert_eq!(font.measure_char('A'), 16);
    assert_eq!(font.measure_text("AV A", 4), 29 + 7 + 16);

    for ch in ['A', 'V', ' '] {
        assert!(font.cached_glyph(font.glyph_index(ch)).is_none());
    }
    assert_eq!(font.cached_glyph_count(), 0);
    assert_eq!(font.atlas_count(), 0);
    assert_eq!(font.face().rasterizations(), 0);
    assert_eq!(canvas.bitmap_count(), 0);
}

#[test]
fn measure_after_draw_still_matches() {
    let mut canvas = canvas();
    let mut font = Font::with_face(av_face(), 24, LoadFlags::NONE).unwrap();

    let before = font.measure_text("AVA", 3);
    let drawn = font
        .draw_text(&mut canvas, "AVA", 3, 10, 10, Color::WHITE)
        .unwrap();
    let after = font.measure_text("AVA", 3);

    assert_eq!(before, drawn);
    assert_eq!(before, after);
    font.destroy(&mut canvas);
}

#[test]
fn cached_offsets_follow_bearings() {
    let mut canvas = canvas();
    let mut font = Font::with_face(av_face(), 24, LoadFlags::NONE).unwrap();

    font.draw_char(&mut canvas, 'A', 0, 0, Color::WHITE).unwrap();

    let cached = font.cached_glyph(font.glyph_index('A')).unwrap();
    // offset_y = height - top = 24 - 18
    assert_eq!((cached.offset_x, cached.offset_y), (1, 6));
    assert_eq!((cached.region.width, cached.region.height), (14, 18));
    font.destroy(&mut canvas);
}

#[test]
fn drawn_pixels_carry_the_tint() {
    let mut canvas = canvas();
    let mut font = Font::with_face(av_face(), 24, LoadFlags::NONE).unwrap();
    let red = Color::from_rgba8(255, 0, 0, 255);

    let advance = font.draw_char(&mut canvas, 'A', 10, 5, red).unwrap();

    assert_eq!(advance, 16);
    let frame = canvas.capture();
    // glyph box spans x 11..25, y 11..29
    assert_eq!(frame.get_pixel(11, 11), Some([255, 0, 0, 255]));
    assert_eq!(frame.get_pixel(24, 28), Some([255, 0, 0, 255]));
    assert_eq!(frame.get_pixel(10, 11), Some([0, 0, 0, 0]));
    assert_eq!(frame.get_pixel(11, 10), Some([0, 0, 0, 0]));
    font.destroy(&mut canvas);
}

#[test]
fn empty_glyph_still_gets_a_region() {
    let mut canvas = canvas();
    let mut font = Font::with_face(av_face(), 24, LoadFlags::NONE).unwrap();

    let advance = font.draw_char(&mut canvas, ' ', 0, 0, Color::WHITE).unwrap();

    assert_eq!(advance, 7);
    let cached = font.cached_glyph(font.glyph_index(' ')).unwrap();
    assert_eq!((cached.region.width, cached.region.height), (1, 1));
    assert!(canvas.capture().is_blank());
    font.destroy(&mut canvas);
}

#[test]
fn missing_codepoint_uses_notdef() {
    let mut canvas = canvas();
    let face = av_face().notdef(GlyphShape {
        width: 8,
        rows: 12,
        left: 1,
        top: 12,
        advance: 640,
    });
    let mut font = Font::with_face(face, 24, LoadFlags::NONE).unwrap();

    assert_eq!(font.glyph_index('Z'), typeshelf_text::NOTDEF);
    assert_eq!(font.measure_char('Z'), 10);
    font.draw_text(&mut canvas, "ZQ", 2, 0, 0, Color::WHITE).unwrap();

    assert_eq!(font.cached_glyph_count(), 1);
    assert!(font.cached_glyph(typeshelf_text::NOTDEF).is_some());
    font.destroy(&mut canvas);
}

#[test]
fn oversized_glyph_is_reported() {
    let mut canvas = canvas();
    let face = av_face().glyph(
        'W',
        80,
        GlyphShape {
            width: 300,
            rows: 20,
            left: 0,
            top: 20,
            advance: 64 * 300,
        },
    );
    let mut font = Font::with_face(face, 24, LoadFlags::NONE).unwrap();

    let result = font.draw_char(&mut canvas, 'W', 0, 0, Color::WHITE);

    assert!(matches!(
        result,
        Err(TextError::GlyphTooLarge {
            width: 300,
            atlas: 256,
            ..
        })
    ));
    assert!(font.cached_glyph(80).is_none());
    assert_eq!(canvas.bitmap_count(), 0);

    // the font stays usable
    assert_eq!(font.draw_char(&mut canvas, 'A', 0, 0, Color::WHITE).unwrap(), 16);
    font.destroy(&mut canvas);
}

#[test]
fn destroy_releases_every_atlas() {
    let mut canvas = CpuCanvas::new(8, 8).unwrap();
    let mut face = ScriptedFace::new();
    // 40 distinct 120x120 glyphs need one atlas per four glyphs
    let chars: Vec<char> = ('a'..='z').chain('A'..='N').collect();
    for (i, &ch) in chars.iter().enumerate() {
        face = face.glyph(
            ch,
            i as u32 + 1,
            GlyphShape {
                width: 120,
                rows: 120,
                left: 0,
                top: 120,
                advance: 64 * 120,
            },
        );
    }
    let text: String = chars.iter().collect();
    let mut font = Font::with_face(face, 120, LoadFlags::NONE).unwrap();

    font.draw_text(&mut canvas, &text, chars.len(), 0, 0, Color::WHITE)
        .unwrap();

    assert_eq!(font.atlas_count(), 10);
    assert_eq!(canvas.bitmap_count(), 10);
    let atlases = font.atlases().to_vec();

    font.destroy(&mut canvas);

    assert_eq!(canvas.bitmap_count(), 0);
    assert!(atlases.iter().all(|&a| canvas.bitmap_size(a).is_none()));
}
