//! Glyph records and the glyph table shared by the pipeline phases.

use std::collections::BTreeMap;
use std::fmt;

/// Which font a glyph was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FontSlot {
    /// The main font.
    Primary,
    /// The fallback font consulted when the primary font lacks a code point.
    Secondary,
}

impl FontSlot {
    /// Whether this is the fallback font.
    #[inline]
    pub fn is_secondary(self) -> bool {
        matches!(self, Self::Secondary)
    }
}

/// Identifies a resolved glyph: the glyph index within the font it came from.
///
/// Keys order primary glyphs before secondary ones, then by glyph index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphKey {
    /// Font the glyph index belongs to.
    pub slot: FontSlot,
    /// Glyph index inside that font.
    pub index: u32,
}

impl GlyphKey {
    /// Key for a glyph of the primary font.
    pub const fn primary(index: u32) -> Self {
        Self {
            slot: FontSlot::Primary,
            index,
        }
    }

    /// Key for a glyph of the secondary font.
    pub const fn secondary(index: u32) -> Self {
        Self {
            slot: FontSlot::Secondary,
            index,
        }
    }
}

impl fmt::Display for GlyphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            FontSlot::Primary => write!(f, "#{}", self.index),
            FontSlot::Secondary => write!(f, "#{} (secondary)", self.index),
        }
    }
}

/// Per-glyph metrics and placement.
///
/// Sizes and offsets are in pixels; the side-bearing deltas are in 26.6 fixed point.
/// `page`, `x` and `y` are written once by the page planner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphRecord {
    /// Code point this glyph was resolved from.
    pub code_point: u32,
    /// Bitmap width.
    pub width: u32,
    /// Bitmap height.
    pub height: u32,
    /// Horizontal pen advance.
    pub x_advance: i32,
    /// Offset from the pen position to the left of the bitmap.
    pub x_offset: i32,
    /// Offset from the line top to the top of the bitmap.
    pub y_offset: i32,
    /// Left side bearing change caused by hinting.
    pub lsb_delta: i32,
    /// Right side bearing change caused by hinting.
    pub rsb_delta: i32,
    /// Page the glyph was packed on.
    pub page: u32,
    /// Left edge on the page.
    pub x: u32,
    /// Top edge on the page.
    pub y: u32,
}

impl GlyphRecord {
    /// A glyph without a visible bitmap. Empty glyphs are never packed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// All resolved glyphs, ordered by key.
pub type GlyphTable = BTreeMap<GlyphKey, GlyphRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_ordering() {
        let mut keys = vec![
            GlyphKey::secondary(1),
            GlyphKey::primary(9),
            GlyphKey::primary(2),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GlyphKey::primary(2),
                GlyphKey::primary(9),
                GlyphKey::secondary(1)
            ]
        );
    }

    #[test]
    fn test_same_index_in_both_fonts_is_distinct() {
        let mut table = GlyphTable::new();
        table.insert(GlyphKey::primary(5), GlyphRecord { code_point: 65, ..Default::default() });
        table.insert(GlyphKey::secondary(5), GlyphRecord { code_point: 0x4E00, ..Default::default() });
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_is_empty() {
        let space = GlyphRecord { code_point: 32, x_advance: 8, ..Default::default() };
        assert!(space.is_empty());

        let line = GlyphRecord { width: 10, height: 0, ..Default::default() };
        assert!(line.is_empty());

        let a = GlyphRecord { width: 10, height: 12, ..Default::default() };
        assert!(!a.is_empty());
    }
}
