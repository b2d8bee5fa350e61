//! Kerning pair generation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{FontEngine, KerningFit, ShapingFeatures, Shaper};
use crate::error::Result;
use crate::glyph::{GlyphKey, GlyphRecord, GlyphTable};
use crate::logging::targets;

/// How kerning pairs are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KerningMode {
    /// No kerning pairs.
    #[default]
    Disabled,
    /// Kerning table values rounded to whole pixels by the engine.
    Basic,
    /// Unfitted kerning table values refined with the hinter's side-bearing deltas.
    Regular,
    /// Pairs re-shaped through the shaping engine.
    Extended,
}

impl KerningMode {
    pub const ALL: [Self; 4] = [Self::Disabled, Self::Basic, Self::Regular, Self::Extended];

    /// The option value for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Basic => "basic",
            Self::Regular => "regular",
            Self::Extended => "extended",
        }
    }
}

impl fmt::Display for KerningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KerningMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == lower)
            .ok_or_else(|| format!("unknown kerning mode '{s}'"))
    }
}

/// A pixel adjustment between two code points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KerningPair {
    pub first: u32,
    pub second: u32,
    pub amount: i32,
}

#[derive(Debug, Default)]
struct ReshapeStats {
    regular: usize,
    special: usize,
    reshaped: usize,
}

/// Computes kerning pairs for the glyphs of the primary font.
///
/// Every ordered pair of glyphs is visited once, a glyph paired with itself
/// included. Glyphs from the secondary font never take part.
pub struct KerningResolver<'a> {
    font: &'a dyn FontEngine,
    shaper: &'a dyn Shaper,
    features: ShapingFeatures,
}

impl<'a> KerningResolver<'a> {
    /// Create a resolver over the primary font and its shaper.
    pub fn new(font: &'a dyn FontEngine, shaper: &'a dyn Shaper, features: ShapingFeatures) -> Self {
        Self {
            font,
            shaper,
            features,
        }
    }

    /// Produce the non-zero kerning pairs, sorted by (first, second).
    pub fn resolve(&self, glyphs: &GlyphTable, mode: KerningMode) -> Result<Vec<KerningPair>> {
        let primary: Vec<(&GlyphKey, &GlyphRecord)> = glyphs
            .iter()
            .filter(|(key, _)| !key.slot.is_secondary())
            .collect();

        let mut pairs = match mode {
            KerningMode::Disabled => return Ok(Vec::new()),
            KerningMode::Basic | KerningMode::Regular => self.from_table(&primary, mode),
            KerningMode::Extended => self.from_shaping(&primary)?,
        };

        pairs.sort_unstable();
        pairs.dedup_by_key(|pair| (pair.first, pair.second));
        tracing::debug!(target: targets::KERNING, %mode, count = pairs.len(), "kerning pairs resolved");
        Ok(pairs)
    }

    fn from_table(&self, glyphs: &[(&GlyphKey, &GlyphRecord)], mode: KerningMode) -> Vec<KerningPair> {
        let mut pairs = Vec::new();
        for &(left_key, left) in glyphs {
            for &(right_key, right) in glyphs {
                let amount = self.table_kerning(left_key.index, left, right_key.index, right, mode);
                if amount != 0 {
                    pairs.push(KerningPair {
                        first: left.code_point,
                        second: right.code_point,
                        amount,
                    });
                }
            }
        }
        pairs
    }

    fn table_kerning(
        &self,
        left_glyph: u32,
        left: &GlyphRecord,
        right_glyph: u32,
        right: &GlyphRecord,
        mode: KerningMode,
    ) -> i32 {
        let fit = if mode == KerningMode::Basic {
            KerningFit::Default
        } else {
            KerningFit::Unfitted
        };
        let raw = self.font.kerning(left_glyph, right_glyph, fit);

        // Bitmap fonts report whole pixels already.
        if !self.font.is_scalable() {
            return raw;
        }

        let deltas = if mode == KerningMode::Regular && raw != 0 {
            right.lsb_delta - left.rsb_delta
        } else {
            0
        };
        (deltas + raw + 32).div_euclid(64)
    }

    fn from_shaping(&self, glyphs: &[(&GlyphKey, &GlyphRecord)]) -> Result<Vec<KerningPair>> {
        let mut stats = ReshapeStats::default();
        let mut pairs = Vec::new();

        for &(left_key, left) in glyphs {
            for &(right_key, right) in glyphs {
                let run = self
                    .shaper
                    .shape(&[left.code_point, right.code_point], &self.features)?;

                let unchanged = run.glyphs.len() == 2
                    && run.glyphs[0].glyph == left_key.index
                    && run.glyphs[1].glyph == right_key.index;
                if !unchanged {
                    stats.reshaped += 1;
                    continue;
                }

                let advance = (run.glyphs[0].x_advance as f32 * run.units_to_pixels).round() as i32;
                if advance == left.x_advance {
                    stats.regular += 1;
                    continue;
                }

                stats.special += 1;
                pairs.push(KerningPair {
                    first: left.code_point,
                    second: right.code_point,
                    amount: advance - left.x_advance,
                });
            }
        }

        tracing::debug!(
            target: targets::KERNING,
            regular = stats.regular,
            special = stats.special,
            reshaped = stats.reshaped,
            "re-shaped glyph pairs"
        );
        Ok(pairs)
    }
}

impl fmt::Debug for KerningResolver<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KerningResolver")
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FaceInfo, FaceMetrics, GlyphMetrics, ShapedGlyph, ShapedRun};
    use std::collections::{BTreeSet, HashMap};

    /// A font with a hand-written kerning table in 26.6 units.
    struct Face {
        kern: HashMap<(u32, u32), i32>,
        scalable: bool,
    }

    impl FontEngine for Face {
        fn glyph_index(&self, _: u32) -> Option<u32> {
            None
        }

        fn glyph_metrics(&self, _: u32) -> Result<GlyphMetrics> {
            Ok(GlyphMetrics::default())
        }

        fn kerning(&self, left: u32, right: u32, fit: KerningFit) -> i32 {
            let raw = self.kern.get(&(left, right)).copied().unwrap_or(0);
            match fit {
                KerningFit::Unfitted => raw,
                KerningFit::Default => (raw + 32) & !63,
            }
        }

        fn is_scalable(&self) -> bool {
            self.scalable
        }

        fn face_info(&self) -> FaceInfo {
            FaceInfo::default()
        }

        fn face_metrics(&self) -> FaceMetrics {
            FaceMetrics::default()
        }

        fn code_points(&self) -> BTreeSet<u32> {
            BTreeSet::new()
        }
    }

    /// Shapes 'A' = glyph 1, 'V' = glyph 2, 'f' = glyph 3; "ff" becomes a ligature.
    struct PairShaper;

    impl Shaper for PairShaper {
        fn shape(&self, code_points: &[u32], _: &ShapingFeatures) -> Result<ShapedRun> {
            let glyph = |cp: u32| match char::from_u32(cp) {
                Some('A') => 1,
                Some('V') => 2,
                Some('f') => 3,
                _ => 0,
            };
            let glyphs = match code_points {
                [0x66, 0x66] => vec![ShapedGlyph { glyph: 9, code_point: 0x66, x_advance: 1100 }],
                [0x41, 0x56] => vec![
                    ShapedGlyph { glyph: 1, code_point: 0x41, x_advance: 550 },
                    ShapedGlyph { glyph: 2, code_point: 0x56, x_advance: 600 },
                ],
                _ => code_points
                    .iter()
                    .map(|&cp| ShapedGlyph { glyph: glyph(cp), code_point: cp, x_advance: 600 })
                    .collect(),
            };
            Ok(ShapedRun { glyphs, units_to_pixels: 0.02 })
        }
    }

    fn table() -> GlyphTable {
        let mut glyphs = GlyphTable::new();
        glyphs.insert(
            GlyphKey::primary(1),
            GlyphRecord { code_point: 0x41, x_advance: 12, rsb_delta: -20, lsb_delta: 0, width: 10, height: 10, ..Default::default() },
        );
        glyphs.insert(
            GlyphKey::primary(2),
            GlyphRecord { code_point: 0x56, x_advance: 12, lsb_delta: 10, width: 10, height: 10, ..Default::default() },
        );
        glyphs.insert(
            GlyphKey::primary(3),
            GlyphRecord { code_point: 0x66, x_advance: 12, width: 6, height: 10, ..Default::default() },
        );
        glyphs.insert(
            GlyphKey::secondary(1),
            GlyphRecord { code_point: 0x4E00, x_advance: 30, width: 28, height: 28, ..Default::default() },
        );
        glyphs
    }

    fn face() -> Face {
        Face {
            kern: [((1, 2), -100), ((2, 1), -20)].into_iter().collect(),
            scalable: true,
        }
    }

    #[test]
    fn test_disabled() {
        let face = face();
        let resolver = KerningResolver::new(&face, &PairShaper, ShapingFeatures::default());
        assert!(resolver.resolve(&table(), KerningMode::Disabled).unwrap().is_empty());
    }

    #[test]
    fn test_basic() {
        let face = face();
        let resolver = KerningResolver::new(&face, &PairShaper, ShapingFeatures::default());
        let pairs = resolver.resolve(&table(), KerningMode::Basic).unwrap();
        // -100 fits to -128 -> -2 px; -20 fits to 0 and is dropped.
        assert_eq!(pairs, vec![KerningPair { first: 0x41, second: 0x56, amount: -2 }]);
    }

    #[test]
    fn test_regular_uses_side_bearing_deltas() {
        let face = face();
        let resolver = KerningResolver::new(&face, &PairShaper, ShapingFeatures::default());
        let pairs = resolver.resolve(&table(), KerningMode::Regular).unwrap();
        // A,V: floor((10 - (-20) - 100 + 32) / 64) = floor(-38 / 64) = -1
        // V,A: floor((0 - 0 - 20 + 32) / 64) = 0
        assert_eq!(pairs, vec![KerningPair { first: 0x41, second: 0x56, amount: -1 }]);
    }

    #[test]
    fn test_bitmap_font_values_are_pixels() {
        let face = Face {
            kern: [((2, 1), -1)].into_iter().collect(),
            scalable: false,
        };
        let resolver = KerningResolver::new(&face, &PairShaper, ShapingFeatures::default());
        let pairs = resolver.resolve(&table(), KerningMode::Regular).unwrap();
        assert_eq!(pairs, vec![KerningPair { first: 0x56, second: 0x41, amount: -1 }]);
    }

    #[test]
    fn test_extended_skips_ligatures_and_unchanged_advances() {
        let face = face();
        let resolver = KerningResolver::new(&face, &PairShaper, ShapingFeatures::default());
        let pairs = resolver.resolve(&table(), KerningMode::Extended).unwrap();
        // Only "AV" shapes to a different advance: round(550 * 0.02) = 11, 11 - 12 = -1.
        assert_eq!(pairs, vec![KerningPair { first: 0x41, second: 0x56, amount: -1 }]);
    }

    #[test]
    fn test_no_duplicates_no_zeros() {
        let face = face();
        let resolver = KerningResolver::new(&face, &PairShaper, ShapingFeatures::default());
        for mode in KerningMode::ALL {
            let pairs = resolver.resolve(&table(), mode).unwrap();
            let unique: BTreeSet<(u32, u32)> = pairs.iter().map(|p| (p.first, p.second)).collect();
            assert_eq!(unique.len(), pairs.len());
            assert!(pairs.iter().all(|p| p.amount != 0));
            assert!(pairs.iter().all(|p| p.first != 0x4E00 && p.second != 0x4E00));
        }
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Extended".parse::<KerningMode>().unwrap(), KerningMode::Extended);
        assert_eq!(KerningMode::Regular.to_string(), "regular");
        assert!("fancy".parse::<KerningMode>().is_err());
    }
}
