//! Texture pages produced from a laid-out glyph table.

use fontbake_core::glyph::{GlyphKey, GlyphRecord, GlyphTable};
use fontbake_core::layout::{LayoutOptions, Padding, PageSize, arrange_glyphs};
use fontbake_render::prelude::*;

/// Solid glyphs sized from the glyph index: `index % 7 + 1` square.
struct Squares;

impl Squares {
    fn side(glyph: u32) -> u32 {
        glyph % 7 + 1
    }
}

impl GlyphRasterizer for Squares {
    fn rasterize(&self, glyph: u32) -> RenderResult<GlyphBitmap> {
        let side = Self::side(glyph);
        Ok(GlyphBitmap {
            width: side,
            height: side,
            left: 0,
            top: side as i32,
            coverage: vec![255; (side * side) as usize],
        })
    }
}

fn glyph_table(count: u32) -> GlyphTable {
    (1..=count)
        .map(|index| {
            let side = Squares::side(index);
            let record = GlyphRecord {
                code_point: index,
                width: side,
                height: side,
                x_advance: side as i32,
                ..Default::default()
            };
            (GlyphKey::primary(index), record)
        })
        .collect()
}

#[test]
fn test_packed_glyphs_render_without_overlap() {
    let mut glyphs = glyph_table(60);
    let padding = Padding { up: 1, right: 1, down: 1, left: 1 };
    let options = LayoutOptions {
        padding,
        texture_sizes: vec![PageSize::new(32, 32)],
        ..Default::default()
    };
    let pages = arrange_glyphs(&mut glyphs, &options).unwrap();
    assert!(pages.len() > 1);

    let canvases = render_pages(&glyphs, &pages, GlyphSources::new(&Squares), padding).unwrap();
    assert_eq!(canvases.len(), pages.len());

    let covered: usize = canvases
        .iter()
        .map(|canvas| {
            (0..canvas.height())
                .flat_map(|y| (0..canvas.width()).map(move |x| (x, y)))
                .filter(|&(x, y)| canvas.coverage_at(x, y) > 0)
                .count()
        })
        .sum();
    let expected: u32 = glyphs.values().map(|glyph| glyph.width * glyph.height).sum();
    assert_eq!(covered, expected as usize);

    for glyph in glyphs.values() {
        let canvas = &canvases[glyph.page as usize];
        assert_eq!(canvas.coverage_at(glyph.x, glyph.y), 0, "padding stays empty");
        assert_eq!(canvas.coverage_at(glyph.x + 1, glyph.y + 1), 255);
    }
}

#[test]
fn test_png_pages_written_and_read_back() {
    let mut glyphs = glyph_table(10);
    let pages = arrange_glyphs(&mut glyphs, &LayoutOptions::default()).unwrap();
    let canvases = render_pages(&glyphs, &pages, GlyphSources::new(&Squares), Padding::default()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let style = TextureStyle {
        color: Color::rgb(255, 0, 0),
        background: Some(Color::rgb(0, 0, 255)),
    };
    let path = dir.path().join("font_0.png");
    std::fs::write(&path, encode_png(&canvases[0].compose(&style)).unwrap()).unwrap();

    let image = image::open(&path).unwrap().to_rgb8();
    assert_eq!((image.width(), image.height()), (pages[0].width, pages[0].height));

    let first = &glyphs[&GlyphKey::primary(1)];
    assert_eq!(image.get_pixel(first.x, first.y).0, [254, 0, 0]);
    let background = image
        .pixels()
        .filter(|pixel| pixel.0 == [0, 0, 255])
        .count();
    assert!(background > 0);
}
