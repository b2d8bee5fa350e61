//! In-memory fonts for driving the whole pipeline without font files.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::path::Path;

use fontbake::cli::Options;
use fontbake::config::Config;
use fontbake_core::engine::{
    FaceInfo, FaceMetrics, FontEngine, GlyphMetrics, KerningFit, ShapedGlyph, ShapedRun, Shaper,
    ShapingFeatures,
};
use fontbake_render::{GlyphBitmap, GlyphRasterizer, RenderResult};

/// A font drawing every glyph as a solid block of `coverage`.
///
/// Glyph index equals the code point; the space has an advance but no bitmap.
pub struct BlockFont {
    pub family: &'static str,
    pub code_points: BTreeSet<u32>,
    pub width: u32,
    pub height: u32,
    pub coverage: u8,
}

impl BlockFont {
    pub fn new(family: &'static str, code_points: impl IntoIterator<Item = u32>) -> Self {
        Self {
            family,
            code_points: code_points.into_iter().collect(),
            width: 10,
            height: 12,
            coverage: 255,
        }
    }

    pub fn with_coverage(mut self, coverage: u8) -> Self {
        self.coverage = coverage;
        self
    }

    fn size_of(&self, glyph: u32) -> (u32, u32) {
        if glyph == 0x20 { (0, 0) } else { (self.width, self.height) }
    }
}

impl FontEngine for BlockFont {
    fn glyph_index(&self, code_point: u32) -> Option<u32> {
        self.code_points.contains(&code_point).then_some(code_point)
    }

    fn glyph_metrics(&self, glyph: u32) -> fontbake_core::Result<GlyphMetrics> {
        let (width, height) = self.size_of(glyph);
        Ok(GlyphMetrics {
            width,
            height,
            bearing_x: 0,
            bearing_y: height as i32,
            advance: self.width as i32 + 1,
            ..Default::default()
        })
    }

    fn kerning(&self, left: u32, right: u32, _fit: KerningFit) -> i32 {
        if (left, right) == ('A' as u32, 'V' as u32) { -128 } else { 0 }
    }

    fn is_scalable(&self) -> bool {
        true
    }

    fn face_info(&self) -> FaceInfo {
        FaceInfo {
            family: Some(self.family.to_string()),
            style: Some("Regular".to_string()),
            ..Default::default()
        }
    }

    fn face_metrics(&self) -> FaceMetrics {
        FaceMetrics { ascent: 12, descent: -3, line_height: 16, total_height: 15 }
    }

    fn code_points(&self) -> BTreeSet<u32> {
        self.code_points.clone()
    }
}

impl GlyphRasterizer for BlockFont {
    fn rasterize(&self, glyph: u32) -> RenderResult<GlyphBitmap> {
        let (width, height) = self.size_of(glyph);
        Ok(GlyphBitmap {
            width,
            height,
            left: 0,
            top: height as i32,
            coverage: vec![self.coverage; (width * height) as usize],
        })
    }
}

/// One glyph per code point with the font's advances.
pub struct PlainShaper;

impl Shaper for PlainShaper {
    fn shape(&self, code_points: &[u32], _features: &ShapingFeatures) -> fontbake_core::Result<ShapedRun> {
        let glyphs = code_points
            .iter()
            .map(|&code_point| ShapedGlyph { glyph: code_point, code_point, x_advance: 11 })
            .collect();
        Ok(ShapedRun { glyphs, units_to_pixels: 1.0 })
    }
}

/// Options writing `font` into `dir`.
pub fn options(dir: &Path) -> Options {
    Options {
        font_file: Some("unused.ttf".into()),
        output: Some(dir.join("font")),
        ..Default::default()
    }
}

pub fn config(options: Options) -> Config {
    Config::from_options(options).unwrap()
}
