//! Tests against a real font. Skipped when no known system font is installed.

use std::path::Path;

use typeshelf_paint::{Color, CpuCanvas};
use typeshelf_text::{load_font, load_font_from_memory, FontBackend, LoadFlags};

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

fn system_font_path() -> Option<&'static str> {
    SYSTEM_FONTS.iter().copied().find(|p| Path::new(p).exists())
}

#[test]
fn draw_hello_world() {
    let Some(path) = system_font_path() else {
        println!("No system font available, skipping");
        return;
    };

    let mut canvas = CpuCanvas::new(320, 48).unwrap();
    let mut font = load_font(path, 24, LoadFlags::NONE).unwrap();
    assert_eq!(font.height(), 24);

    let text = "Hello, world";
    let count = text.chars().count();
    let measured = font.measure_text(text, count);
    assert_eq!(font.cached_glyph_count(), 0);

    let drawn = font
        .draw_text(&mut canvas, text, count, 4, 8, Color::WHITE)
        .unwrap();

    assert_eq!(measured, drawn);
    assert!(measured > 0);
    assert!(!canvas.capture().is_blank());
    // H e l o , space w r d
    assert_eq!(font.cached_glyph_count(), 9);
    assert_eq!(font.atlas_count(), 1);

    font.destroy(&mut canvas);
    assert_eq!(canvas.bitmap_count(), 0);
}

#[test]
fn measuring_matches_sum_of_chars_without_kerning() {
    let Some(path) = system_font_path() else {
        println!("No system font available, skipping");
        return;
    };

    let font = load_font(path, 18, LoadFlags::NO_KERNING).unwrap();
    let text = "AVATAR Wave";
    let sum: i32 = text.chars().map(|c| font.measure_char(c)).sum();
    assert_eq!(font.measure_text(text, text.chars().count()), sum);
}

#[test]
fn memory_and_file_loads_agree() {
    let Some(path) = system_font_path() else {
        println!("No system font available, skipping");
        return;
    };

    let data = std::fs::read(path).unwrap();
    let from_memory = load_font_from_memory(data, 20, LoadFlags::NONE).unwrap();
    let from_file = load_font(path, 20, LoadFlags::NONE).unwrap();

    for text in ["AV", "To", "typeshelf"] {
        let count = text.chars().count();
        assert_eq!(
            from_memory.measure_text(text, count),
            from_file.measure_text(text, count)
        );
    }
}
