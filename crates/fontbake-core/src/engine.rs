//! Capabilities the pipeline consumes from font rendering and text shaping engines.
//!
//! The core never parses font files itself. A rendering backend implements
//! [`FontEngine`] for each loaded face and [`Shaper`] for the primary face; tests
//! use small in-memory fakes.

use std::collections::BTreeSet;

use crate::error::Result;

/// Pixel metrics of one rasterized glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Bitmap width in pixels.
    pub width: u32,
    /// Bitmap height in pixels.
    pub height: u32,
    /// Distance from the pen position to the left edge of the bitmap.
    pub bearing_x: i32,
    /// Distance from the baseline up to the top edge of the bitmap.
    pub bearing_y: i32,
    /// Horizontal advance in whole pixels.
    pub advance: i32,
    /// Left side bearing change caused by hinting, 26.6 fixed point.
    pub lsb_delta: i32,
    /// Right side bearing change caused by hinting, 26.6 fixed point.
    pub rsb_delta: i32,
}

/// Identity of a font face.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceInfo {
    /// Family name, if the face has one.
    pub family: Option<String>,
    /// Style name, if the face has one.
    pub style: Option<String>,
    /// Whether the face is flagged bold.
    pub bold: bool,
    /// Whether the face is flagged italic.
    pub italic: bool,
}

/// Face-level vertical metrics at the requested pixel size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceMetrics {
    /// Baseline distance from the line top, rounded up.
    pub ascent: i32,
    /// Lowest extent below the baseline, rounded down (usually negative).
    pub descent: i32,
    /// Distance between consecutive baselines.
    pub line_height: i32,
    /// Height of the face bounding box.
    pub total_height: i32,
}

/// How a kerning table value is fitted to the pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KerningFit {
    /// Scaled and rounded to whole pixels.
    Default,
    /// Scaled only, left in 26.6 fixed point.
    Unfitted,
}

/// A font face opened at a fixed pixel size.
pub trait FontEngine {
    /// Glyph index for a code point, `None` when the face does not map it.
    fn glyph_index(&self, code_point: u32) -> Option<u32>;

    /// Rasterize a glyph and report its metrics.
    fn glyph_metrics(&self, glyph: u32) -> Result<GlyphMetrics>;

    /// Kerning between two glyphs from the face's kerning table.
    ///
    /// Scalable faces return 26.6 fixed point values; bitmap faces return whole pixels.
    fn kerning(&self, left: u32, right: u32, fit: KerningFit) -> i32;

    /// Whether the face has outlines (as opposed to fixed bitmap strikes).
    fn is_scalable(&self) -> bool;

    /// Names and style flags.
    fn face_info(&self) -> FaceInfo;

    /// Vertical metrics at the current size.
    fn face_metrics(&self) -> FaceMetrics;

    /// Every code point the face maps to a glyph.
    fn code_points(&self) -> BTreeSet<u32>;
}

/// OpenType feature toggles applied when shaping.
///
/// Ligatures are always disabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapingFeatures {
    /// Enable `tnum` (tabular figures).
    pub tabular_numbers: bool,
    /// Enable `zero` (slashed zero).
    pub slashed_zero: bool,
}

/// One glyph of a shaped run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapedGlyph {
    /// Resolved glyph index.
    pub glyph: u32,
    /// Code point of the cluster the glyph belongs to.
    pub code_point: u32,
    /// Advance in font units.
    pub x_advance: i32,
}

/// Output of a shaping call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapedRun {
    /// Glyphs in visual order.
    pub glyphs: Vec<ShapedGlyph>,
    /// Multiplier from font units to pixels.
    pub units_to_pixels: f32,
}

/// Shapes short runs left to right with Common script and English language.
pub trait Shaper {
    /// Shape the given code points as a single run.
    fn shape(&self, code_points: &[u32], features: &ShapingFeatures) -> Result<ShapedRun>;
}
