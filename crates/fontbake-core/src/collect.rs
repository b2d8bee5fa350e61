//! Resolving requested code points into the glyph table.

use std::collections::BTreeSet;

use crate::engine::{FontEngine, ShapingFeatures, Shaper};
use crate::error::Result;
use crate::glyph::{FontSlot, GlyphKey, GlyphRecord, GlyphTable};
use crate::logging::targets;

const BYTE_ORDER_MARK: u32 = 0xFEFF;

/// The primary font and an optional fallback.
#[derive(Clone, Copy)]
pub struct FontSet<'a> {
    /// Main font; its ascent positions every glyph vertically.
    pub primary: &'a dyn FontEngine,
    /// Fallback consulted for code points the primary font lacks.
    pub secondary: Option<&'a dyn FontEngine>,
}

impl<'a> FontSet<'a> {
    /// A set with only a primary font.
    pub fn new(primary: &'a dyn FontEngine) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Add a fallback font.
    pub fn with_secondary(mut self, secondary: &'a dyn FontEngine) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// The engine for a font slot. A missing fallback resolves to the primary font.
    pub fn engine(&self, slot: FontSlot) -> &'a dyn FontEngine {
        match (slot, self.secondary) {
            (FontSlot::Secondary, Some(secondary)) => secondary,
            _ => self.primary,
        }
    }
}

impl std::fmt::Debug for FontSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("secondary", &self.secondary.is_some())
            .finish_non_exhaustive()
    }
}

#[inline]
fn is_decimal_digit(code_point: u32) -> bool {
    (0x30..=0x39).contains(&code_point)
}

/// Resolve code points to glyphs and measure them.
///
/// Decimal digits go through the shaper as one run so `tnum` and `zero`
/// substitutions apply. Everything else is looked up in the primary cmap, then the
/// secondary one. Unresolved code points are skipped with a warning. When several
/// code points land on the same glyph, the highest code point is kept.
pub fn collect_glyphs(
    fonts: FontSet<'_>,
    shaper: &dyn Shaper,
    code_points: &BTreeSet<u32>,
    features: &ShapingFeatures,
) -> Result<GlyphTable> {
    let mut resolved: BTreeSet<(GlyphKey, u32)> = BTreeSet::new();
    let mut digits = Vec::new();

    for &code_point in code_points {
        if is_decimal_digit(code_point) {
            digits.push(code_point);
            continue;
        }

        let key = match fonts.primary.glyph_index(code_point) {
            Some(index) => Some(GlyphKey::primary(index)),
            None => fonts
                .secondary
                .and_then(|font| font.glyph_index(code_point))
                .map(GlyphKey::secondary),
        };

        match key {
            Some(key) => {
                resolved.insert((key, code_point));
            }
            None if code_point == BYTE_ORDER_MARK => tracing::warn!(
                target: targets::GLYPHS,
                code_point,
                "glyph not found (it looks like Unicode byte order mark (BOM))"
            ),
            None => tracing::warn!(target: targets::GLYPHS, code_point, "glyph not found"),
        }
    }

    if !digits.is_empty() {
        let run = shaper.shape(&digits, features)?;
        for shaped in run.glyphs {
            if shaped.glyph == 0 {
                tracing::warn!(
                    target: targets::GLYPHS,
                    code_point = shaped.code_point,
                    "glyph not found"
                );
                continue;
            }
            resolved.insert((GlyphKey::primary(shaped.glyph), shaped.code_point));
        }
    }

    let ascent = fonts.primary.face_metrics().ascent;
    let mut glyphs = GlyphTable::new();
    for (key, code_point) in resolved {
        let metrics = fonts.engine(key.slot).glyph_metrics(key.index)?;
        let record = GlyphRecord {
            code_point,
            width: metrics.width,
            height: metrics.height,
            x_advance: metrics.advance,
            x_offset: metrics.bearing_x,
            y_offset: ascent - metrics.bearing_y,
            lsb_delta: metrics.lsb_delta,
            rsb_delta: metrics.rsb_delta,
            ..Default::default()
        };
        if let Some(previous) = glyphs.insert(key, record) {
            tracing::debug!(
                target: targets::GLYPHS,
                glyph = %key,
                replaced = previous.code_point,
                code_point,
                "code points share a glyph"
            );
        }
    }

    tracing::debug!(target: targets::GLYPHS, count = glyphs.len(), "collected glyphs");
    Ok(glyphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FaceInfo, FaceMetrics, GlyphMetrics, KerningFit, ShapedGlyph, ShapedRun};
    use std::collections::BTreeMap;

    struct Face {
        cmap: BTreeMap<u32, u32>,
        ascent: i32,
    }

    impl FontEngine for Face {
        fn glyph_index(&self, code_point: u32) -> Option<u32> {
            self.cmap.get(&code_point).copied()
        }

        fn glyph_metrics(&self, glyph: u32) -> Result<GlyphMetrics> {
            Ok(GlyphMetrics {
                width: glyph,
                height: 10,
                bearing_x: 1,
                bearing_y: 8,
                advance: glyph as i32 + 2,
                ..Default::default()
            })
        }

        fn kerning(&self, _: u32, _: u32, _: KerningFit) -> i32 {
            0
        }

        fn is_scalable(&self) -> bool {
            true
        }

        fn face_info(&self) -> FaceInfo {
            FaceInfo::default()
        }

        fn face_metrics(&self) -> FaceMetrics {
            FaceMetrics {
                ascent: self.ascent,
                ..Default::default()
            }
        }

        fn code_points(&self) -> BTreeSet<u32> {
            self.cmap.keys().copied().collect()
        }
    }

    /// Maps digits through the primary cmap, swapping in glyph 50+n when tnum is on.
    struct DigitShaper<'a>(&'a Face);

    impl Shaper for DigitShaper<'_> {
        fn shape(&self, code_points: &[u32], features: &ShapingFeatures) -> Result<ShapedRun> {
            let glyphs = code_points
                .iter()
                .map(|&code_point| {
                    let base = self.0.glyph_index(code_point).unwrap_or(0);
                    ShapedGlyph {
                        glyph: if features.tabular_numbers && base != 0 {
                            base + 50
                        } else {
                            base
                        },
                        code_point,
                        x_advance: 500,
                    }
                })
                .collect();
            Ok(ShapedRun {
                glyphs,
                units_to_pixels: 0.032,
            })
        }
    }

    fn face(pairs: &[(u32, u32)], ascent: i32) -> Face {
        Face {
            cmap: pairs.iter().copied().collect(),
            ascent,
        }
    }

    #[test]
    fn test_primary_and_secondary_resolution() {
        let primary = face(&[(65, 3), (66, 4)], 20);
        let secondary = face(&[(0x4E00, 3)], 30);
        let fonts = FontSet::new(&primary).with_secondary(&secondary);
        let chars: BTreeSet<u32> = [65, 66, 0x4E00, 0x4E01].into_iter().collect();

        let glyphs = collect_glyphs(fonts, &DigitShaper(&primary), &chars, &ShapingFeatures::default()).unwrap();

        assert_eq!(glyphs.len(), 3);
        assert_eq!(glyphs[&GlyphKey::primary(3)].code_point, 65);
        assert_eq!(glyphs[&GlyphKey::secondary(3)].code_point, 0x4E00);
        // Vertical offset always uses the primary ascent.
        assert_eq!(glyphs[&GlyphKey::secondary(3)].y_offset, 20 - 8);
        assert_eq!(glyphs[&GlyphKey::primary(4)].x_advance, 6);
    }

    #[test]
    fn test_digits_are_shaped() {
        let primary = face(&[(0x30, 10), (0x31, 11)], 20);
        let chars: BTreeSet<u32> = [0x30, 0x31].into_iter().collect();
        let features = ShapingFeatures {
            tabular_numbers: true,
            slashed_zero: false,
        };

        let glyphs = collect_glyphs(FontSet::new(&primary), &DigitShaper(&primary), &chars, &features).unwrap();

        assert_eq!(glyphs[&GlyphKey::primary(60)].code_point, 0x30);
        assert_eq!(glyphs[&GlyphKey::primary(61)].code_point, 0x31);
    }

    #[test]
    fn test_shared_glyph_keeps_highest_code_point() {
        let primary = face(&[(0x20, 1), (0xA0, 1)], 20);
        let chars: BTreeSet<u32> = [0x20, 0xA0].into_iter().collect();

        let glyphs = collect_glyphs(FontSet::new(&primary), &DigitShaper(&primary), &chars, &ShapingFeatures::default()).unwrap();

        assert_eq!(glyphs.len(), 1);
        assert_eq!(glyphs[&GlyphKey::primary(1)].code_point, 0xA0);
    }

    #[test]
    fn test_missing_code_points_are_skipped() {
        let primary = face(&[(65, 3)], 20);
        let chars: BTreeSet<u32> = [65, 0xFEFF, 0x39].into_iter().collect();

        let glyphs = collect_glyphs(FontSet::new(&primary), &DigitShaper(&primary), &chars, &ShapingFeatures::default()).unwrap();

        assert_eq!(glyphs.len(), 1);
        assert!(glyphs.contains_key(&GlyphKey::primary(3)));
    }
}
