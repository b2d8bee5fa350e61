//! Glyph rectangles handed to the packer.

use super::Alignment;
use crate::glyph::{GlyphKey, GlyphTable};

/// A glyph's footprint on a page, already inflated and aligned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub width: u32,
    pub height: u32,
    /// The glyph this rectangle belongs to.
    pub tag: GlyphKey,
}

impl Rectangle {
    /// Area in pixels.
    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

#[inline]
fn align_up(value: u32, align: u32) -> u32 {
    let align = align.max(1);
    value.div_ceil(align) * align
}

/// One rectangle per non-empty glyph, in glyph key order.
///
/// Each side is grown by the extra amount and rounded up to the alignment grid.
pub fn prepare_rectangles(
    glyphs: &GlyphTable,
    extra_width: u32,
    extra_height: u32,
    alignment: Alignment,
) -> Vec<Rectangle> {
    glyphs
        .iter()
        .filter(|(_, glyph)| !glyph.is_empty())
        .map(|(&tag, glyph)| Rectangle {
            width: align_up(glyph.width + extra_width, alignment.horizontal),
            height: align_up(glyph.height + extra_height, alignment.vertical),
            tag,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphRecord;

    fn table(sizes: &[(u32, u32)]) -> GlyphTable {
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(width, height))| {
                (
                    GlyphKey::primary(i as u32 + 1),
                    GlyphRecord { code_point: 65 + i as u32, width, height, ..Default::default() },
                )
            })
            .collect()
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 4), 0);
        assert_eq!(align_up(1, 4), 4);
        assert_eq!(align_up(8, 4), 8);
        assert_eq!(align_up(9, 1), 9);
        assert_eq!(align_up(9, 0), 9);
    }

    #[test]
    fn test_empty_glyphs_are_skipped() {
        let glyphs = table(&[(5, 7), (0, 0), (3, 0), (0, 3), (1, 1)]);
        let rects = prepare_rectangles(&glyphs, 0, 0, Alignment::default());
        let tags: Vec<u32> = rects.iter().map(|r| r.tag.index).collect();
        assert_eq!(tags, vec![1, 5]);
    }

    #[test]
    fn test_inflate_then_align() {
        let glyphs = table(&[(5, 7), (8, 8)]);
        let alignment = Alignment { horizontal: 4, vertical: 3 };
        let rects = prepare_rectangles(&glyphs, 2, 1, alignment);

        assert_eq!((rects[0].width, rects[0].height), (8, 9));
        assert_eq!((rects[1].width, rects[1].height), (12, 9));
        for rect in &rects {
            assert_eq!(rect.width % 4, 0);
            assert_eq!(rect.height % 3, 0);
        }
    }
}
