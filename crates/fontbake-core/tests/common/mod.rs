//! In-memory font and shaper used by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use fontbake_core::Result;
use fontbake_core::engine::{
    FaceInfo, FaceMetrics, FontEngine, GlyphMetrics, KerningFit, ShapedGlyph, ShapedRun, Shaper,
    ShapingFeatures,
};

pub const ADVANCE: i32 = 11;

/// Route pipeline events to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
/// Glyph index of the `fi` ligature.
pub const FI_LIGATURE: u32 = 0xFB01;

/// A font whose glyph index equals the code point.
///
/// Every visible glyph is `width` x `height`; the space is empty.
pub struct GridFont {
    pub code_points: BTreeSet<u32>,
    pub width: u32,
    pub height: u32,
    /// Kerning table in 26.6 fixed point.
    pub kerning: BTreeMap<(u32, u32), i32>,
}

impl GridFont {
    pub fn new(code_points: impl IntoIterator<Item = u32>, width: u32, height: u32) -> Self {
        Self {
            code_points: code_points.into_iter().collect(),
            width,
            height,
            kerning: BTreeMap::new(),
        }
    }

    pub fn ascii() -> Self {
        Self::new(32..=126, 10, 12)
    }

    pub fn with_kerning(mut self, left: char, right: char, amount: i32) -> Self {
        self.kerning.insert((left as u32, right as u32), amount);
        self
    }
}

impl FontEngine for GridFont {
    fn glyph_index(&self, code_point: u32) -> Option<u32> {
        self.code_points.contains(&code_point).then_some(code_point)
    }

    fn glyph_metrics(&self, glyph: u32) -> Result<GlyphMetrics> {
        if glyph == 0x20 {
            return Ok(GlyphMetrics { advance: ADVANCE, ..Default::default() });
        }
        Ok(GlyphMetrics {
            width: self.width,
            height: self.height,
            bearing_x: 1,
            bearing_y: 10,
            advance: ADVANCE,
            ..Default::default()
        })
    }

    fn kerning(&self, left: u32, right: u32, _fit: KerningFit) -> i32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0)
    }

    fn is_scalable(&self) -> bool {
        true
    }

    fn face_info(&self) -> FaceInfo {
        FaceInfo {
            family: Some("Grid".to_string()),
            style: Some("Regular".to_string()),
            bold: false,
            italic: false,
        }
    }

    fn face_metrics(&self) -> FaceMetrics {
        FaceMetrics { ascent: 10, descent: -3, line_height: 14, total_height: 15 }
    }

    fn code_points(&self) -> BTreeSet<u32> {
        self.code_points.clone()
    }
}

/// Shapes one glyph per code point, tightens `AV` and forms an `fi` ligature.
pub struct GridShaper;

impl Shaper for GridShaper {
    fn shape(&self, code_points: &[u32], _features: &ShapingFeatures) -> Result<ShapedRun> {
        let glyphs = match code_points {
            [f, i] if *f == 'f' as u32 && *i == 'i' as u32 => vec![ShapedGlyph {
                glyph: FI_LIGATURE,
                code_point: *f,
                x_advance: ADVANCE,
            }],
            _ => code_points
                .iter()
                .enumerate()
                .map(|(position, &code_point)| {
                    let tightened = position == 0
                        && code_points.get(1) == Some(&('V' as u32))
                        && code_point == 'A' as u32;
                    ShapedGlyph {
                        glyph: code_point,
                        code_point,
                        x_advance: if tightened { ADVANCE - 2 } else { ADVANCE },
                    }
                })
                .collect(),
        };
        Ok(ShapedRun { glyphs, units_to_pixels: 1.0 })
    }
}
