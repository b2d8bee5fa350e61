//! Text shaping with rustybuzz.

use std::fmt;

use fontbake_core::engine::{ShapedGlyph, ShapedRun, Shaper, ShapingFeatures};
use rustybuzz::ttf_parser::Tag;
use rustybuzz::{Direction, Feature, Language, UnicodeBuffer};

use crate::error::{RenderError, RenderResult};
use crate::font::FontFace;

/// Shapes runs with the primary font, left to right, Common script, English.
pub struct HarfShaper<'a> {
    face: rustybuzz::Face<'a>,
    size: f32,
    language: Option<Language>,
}

impl<'a> HarfShaper<'a> {
    /// A shaper for the given face at its configured pixel size.
    pub fn new(font: &'a FontFace) -> RenderResult<Self> {
        let face = rustybuzz::Face::from_slice(font.data(), font.index())
            .ok_or_else(|| RenderError::FontParse("face cannot be shaped".to_string()))?;
        Ok(Self {
            face,
            size: font.options().size as f32,
            language: "en".parse().ok(),
        })
    }

    fn features(features: &ShapingFeatures) -> Vec<Feature> {
        let toggle = |tag: &[u8; 4], on: bool| Feature::new(Tag::from_bytes(tag), u32::from(on), ..);
        vec![
            toggle(b"liga", false),
            toggle(b"tnum", features.tabular_numbers),
            toggle(b"zero", features.slashed_zero),
        ]
    }
}

impl fmt::Debug for HarfShaper<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HarfShaper")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl Shaper for HarfShaper<'_> {
    fn shape(&self, code_points: &[u32], features: &ShapingFeatures) -> fontbake_core::Result<ShapedRun> {
        let mut buffer = UnicodeBuffer::new();
        for (cluster, &code_point) in code_points.iter().enumerate() {
            let ch = char::from_u32(code_point).ok_or_else(|| {
                fontbake_core::Error::engine(format!("U+{code_point:04X} is not a valid character"))
            })?;
            buffer.add(ch, cluster as u32);
        }
        buffer.set_direction(Direction::LeftToRight);
        buffer.set_script(rustybuzz::script::COMMON);
        if let Some(language) = &self.language {
            buffer.set_language(language.clone());
        }

        let output = rustybuzz::shape(&self.face, &Self::features(features), buffer);
        let glyphs = output
            .glyph_infos()
            .iter()
            .zip(output.glyph_positions())
            .map(|(info, position)| ShapedGlyph {
                glyph: info.glyph_id,
                code_point: code_points.get(info.cluster as usize).copied().unwrap_or(0),
                x_advance: position.x_advance,
            })
            .collect();

        let upem = self.face.units_per_em().max(1) as f32;
        Ok(ShapedRun {
            glyphs,
            units_to_pixels: self.size / upem,
        })
    }
}
