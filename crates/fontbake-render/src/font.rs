//! Font faces opened at a fixed pixel size.
//!
//! A [`FontFace`] owns the raw font bytes. Tables are read with `ttf-parser`,
//! glyphs are rasterized with `swash`. Everything the pipeline asks for repeatedly
//! (the Unicode cmap, names, vertical metrics and the location of the `kern`
//! table) is extracted once when the face is opened.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Range;

use fontbake_core::engine::{FaceInfo, FaceMetrics, FontEngine, GlyphMetrics, KerningFit};
use fontbake_core::logging::targets;
use swash::scale::{Render, ScaleContext, Scaler, Source, StrikeWith};
use swash::zeno::Format;
use swash::{CacheKey, FontRef};
use ttf_parser::name_id;

use crate::error::{RenderError, RenderResult};

/// Coverage at or above this value becomes opaque in monochrome mode.
const MONOCHROME_THRESHOLD: u8 = 128;

/// Sizes below this many pixels per em get their fitted kerning scaled down.
const SMALL_PPEM: i64 = 25;

/// Hinting applied when rasterizing outlines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Hinting {
    /// Full hinting.
    #[default]
    Normal,
    /// Light hinting. The rasterizer has a single hinting strength, so this
    /// hints like [`Hinting::Normal`], for bitmaps and kerning deltas alike.
    Light,
    /// Unhinted outlines.
    Disabled,
}

impl Hinting {
    fn enabled(self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// How a face is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontOptions {
    /// Pixel size (pixels per em).
    pub size: u32,
    /// Threshold coverage to fully on or off.
    pub monochrome: bool,
    pub hinting: Hinting,
}

impl Default for FontOptions {
    fn default() -> Self {
        Self {
            size: 32,
            monochrome: false,
            hinting: Hinting::Normal,
        }
    }
}

/// An 8-bit coverage bitmap of one glyph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphBitmap {
    pub width: u32,
    pub height: u32,
    /// Distance from the pen position to the left edge.
    pub left: i32,
    /// Distance from the baseline up to the top edge.
    pub top: i32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// Something that can draw glyph coverage bitmaps.
pub trait GlyphRasterizer {
    /// Rasterize one glyph by index.
    fn rasterize(&self, glyph: u32) -> RenderResult<GlyphBitmap>;
}

/// A font face loaded from memory.
pub struct FontFace {
    data: Vec<u8>,
    index: u32,
    offset: u32,
    key: CacheKey,
    options: FontOptions,
    scalable: bool,
    units_per_em: u16,
    /// Byte range of the `kern` table within `data`.
    kern: Option<Range<usize>>,
    cmap: BTreeMap<u32, u32>,
    info: FaceInfo,
    metrics: FaceMetrics,
    context: RefCell<ScaleContext>,
    unhinted_context: RefCell<ScaleContext>,
}

impl FontFace {
    /// Open face `index` of the given font data.
    pub fn from_bytes(data: Vec<u8>, index: u32, options: FontOptions) -> RenderResult<Self> {
        if options.size == 0 {
            return Err(RenderError::InvalidSize(options.size));
        }

        let face = ttf_parser::Face::parse(&data, index)
            .map_err(|e| RenderError::FontParse(e.to_string()))?;
        let cmap = unicode_cmap(&face)?;
        let tables = face.tables();
        let scalable = tables.glyf.is_some() || tables.cff.is_some() || tables.cff2.is_some();
        let units_per_em = face.units_per_em();
        let kern = table_range(&face, ttf_parser::Tag::from_bytes(b"kern"));
        let info = face_info(&face);
        let metrics = if scalable {
            scaled_metrics(&face, options.size)
        } else {
            bitmap_metrics(options.size)
        };

        let font_ref = FontRef::from_index(&data, index as usize)
            .ok_or_else(|| RenderError::FontParse(format!("face {index} is not a valid font")))?;
        let (offset, key) = (font_ref.offset, font_ref.key);

        tracing::debug!(
            target: targets::RENDER,
            family = info.family.as_deref().unwrap_or("unknown"),
            size = options.size,
            glyphs = cmap.len(),
            scalable,
            "font face opened"
        );

        Ok(Self {
            data,
            index,
            offset,
            key,
            options,
            scalable,
            units_per_em,
            kern,
            cmap,
            info,
            metrics,
            context: RefCell::new(ScaleContext::new()),
            unhinted_context: RefCell::new(ScaleContext::new()),
        })
    }

    /// The raw font data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Index of the face within a collection file.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn options(&self) -> FontOptions {
        self.options
    }

    fn font_ref(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }

    fn glyph_id(glyph: u32) -> RenderResult<u16> {
        u16::try_from(glyph).map_err(|_| RenderError::Rasterize { glyph })
    }

    /// Kerning table value in font units.
    fn raw_kerning(&self, left: u32, right: u32) -> i32 {
        self.kern
            .clone()
            .and_then(|range| self.data.get(range))
            .map_or(0, |table| kern_table_value(table, left, right))
    }
}

/// Where a table's bytes sit in the font data.
fn table_range(face: &ttf_parser::Face<'_>, tag: ttf_parser::Tag) -> Option<Range<usize>> {
    let record = face
        .raw_face()
        .table_records
        .into_iter()
        .find(|record| record.tag == tag)?;
    let start = usize::try_from(record.offset).ok()?;
    let end = start.checked_add(usize::try_from(record.length).ok()?)?;
    Some(start..end)
}

/// Pair value from raw `kern` table bytes, summed over horizontal subtables.
///
/// Only the table header is read here; subtables are searched in place.
fn kern_table_value(table: &[u8], left: u32, right: u32) -> i32 {
    let (Ok(left), Ok(right)) = (u16::try_from(left), u16::try_from(right)) else {
        return 0;
    };
    let Some(kern) = ttf_parser::kern::Table::parse(table) else {
        return 0;
    };
    kern.subtables
        .into_iter()
        .filter(|subtable| subtable.horizontal && !subtable.variable && !subtable.has_cross_stream)
        .filter_map(|subtable| subtable.glyphs_kerning(ttf_parser::GlyphId(left), ttf_parser::GlyphId(right)))
        .map(i32::from)
        .sum()
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("index", &self.index)
            .field("options", &self.options)
            .field("scalable", &self.scalable)
            .field("info", &self.info)
            .field("glyphs", &self.cmap.len())
            .finish_non_exhaustive()
    }
}

impl GlyphRasterizer for FontFace {
    fn rasterize(&self, glyph: u32) -> RenderResult<GlyphBitmap> {
        let id = Self::glyph_id(glyph)?;
        let mut context = self.context.borrow_mut();
        let mut scaler = context
            .builder(self.font_ref())
            .size(self.options.size as f32)
            .hint(self.options.hinting.enabled())
            .build();

        let Some(image) = Render::new(&[Source::Outline, Source::Bitmap(StrikeWith::BestFit)])
            .format(Format::Alpha)
            .render(&mut scaler, id)
        else {
            tracing::trace!(target: targets::RENDER, glyph, "glyph has no image");
            return Ok(GlyphBitmap::default());
        };

        let mut coverage = image.data;
        if self.options.monochrome {
            for value in &mut coverage {
                *value = if *value >= MONOCHROME_THRESHOLD { u8::MAX } else { 0 };
            }
        }

        Ok(GlyphBitmap {
            width: image.placement.width,
            height: image.placement.height,
            left: image.placement.left,
            top: image.placement.top,
            coverage,
        })
    }
}

impl FontEngine for FontFace {
    fn glyph_index(&self, code_point: u32) -> Option<u32> {
        self.cmap.get(&code_point).copied()
    }

    fn glyph_metrics(&self, glyph: u32) -> fontbake_core::Result<GlyphMetrics> {
        let bitmap = self.rasterize(glyph)?;
        let id = Self::glyph_id(glyph)?;
        let size = self.options.size as f32;

        let advance = self
            .font_ref()
            .glyph_metrics(&[])
            .scale(size)
            .advance_width(id)
            .ceil() as i32;

        let (lsb_delta, rsb_delta) = if self.scalable && self.options.hinting.enabled() {
            let mut context = self.context.borrow_mut();
            let mut unhinted_context = self.unhinted_context.borrow_mut();
            let mut hinted = context.builder(self.font_ref()).size(size).hint(true).build();
            let mut unhinted = unhinted_context.builder(self.font_ref()).size(size).hint(false).build();
            hinting_deltas(&mut hinted, &mut unhinted, id)
        } else {
            (0, 0)
        };

        Ok(GlyphMetrics {
            width: bitmap.width,
            height: bitmap.height,
            bearing_x: bitmap.left,
            bearing_y: bitmap.top,
            advance,
            lsb_delta,
            rsb_delta,
        })
    }

    fn kerning(&self, left: u32, right: u32, fit: KerningFit) -> i32 {
        let raw = self.raw_kerning(left, right);
        if raw == 0 || !self.scalable {
            return raw;
        }

        // Font units to 26.6 pixels.
        let ppem = i64::from(self.options.size);
        let upem = i64::from(self.units_per_em.max(1));
        let scaled = (i64::from(raw) * ppem * 64 * 2 + upem).div_euclid(upem * 2);

        let value = match fit {
            KerningFit::Unfitted => scaled,
            KerningFit::Default => {
                let value = if ppem < SMALL_PPEM { scaled * ppem / SMALL_PPEM } else { scaled };
                (value + 32) & !63
            }
        };
        value as i32
    }

    fn is_scalable(&self) -> bool {
        self.scalable
    }

    fn face_info(&self) -> FaceInfo {
        self.info.clone()
    }

    fn face_metrics(&self) -> FaceMetrics {
        self.metrics
    }

    fn code_points(&self) -> BTreeSet<u32> {
        self.cmap.keys().copied().collect()
    }
}

/// Side-bearing changes caused by hinting, in 26.6 fixed point.
///
/// Measured between the hinted and unhinted outlines. Light hinting uses the same
/// hinted outline as normal hinting, so both modes report the same deltas.
///
/// A hinted left edge moving left grows the left delta; a hinted right edge
/// moving right shrinks the right delta.
fn hinting_deltas(hinted: &mut Scaler<'_>, unhinted: &mut Scaler<'_>, id: u16) -> (i32, i32) {
    let (Some(hinted), Some(unhinted)) = (hinted.scale_outline(id), unhinted.scale_outline(id)) else {
        return (0, 0);
    };
    let hinted = hinted.bounds();
    let unhinted = unhinted.bounds();
    let lsb = ((unhinted.min.x - hinted.min.x) * 64.0).round() as i32;
    let rsb = ((unhinted.max.x - hinted.max.x) * 64.0).round() as i32;
    (lsb, rsb)
}

/// Code point to glyph mapping from every Unicode cmap subtable.
fn unicode_cmap(face: &ttf_parser::Face<'_>) -> RenderResult<BTreeMap<u32, u32>> {
    let cmap = face.tables().cmap.ok_or(RenderError::MissingUnicodeCmap)?;
    let mut map = BTreeMap::new();
    let mut found = false;
    for subtable in cmap.subtables.into_iter().filter(|subtable| subtable.is_unicode()) {
        found = true;
        subtable.codepoints(|code_point| {
            if let Some(glyph) = subtable.glyph_index(code_point)
                && glyph.0 != 0
            {
                map.entry(code_point).or_insert(u32::from(glyph.0));
            }
        });
    }
    if !found {
        return Err(RenderError::MissingUnicodeCmap);
    }
    Ok(map)
}

fn name(face: &ttf_parser::Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == id && name.is_unicode())
        .find_map(|name| name.to_string())
}

fn face_info(face: &ttf_parser::Face<'_>) -> FaceInfo {
    FaceInfo {
        family: name(face, name_id::FAMILY),
        style: name(face, name_id::SUBFAMILY),
        bold: face.is_bold(),
        italic: face.is_italic(),
    }
}

fn scaled_metrics(face: &ttf_parser::Face<'_>, size: u32) -> FaceMetrics {
    let scale = size as f32 / f32::from(face.units_per_em().max(1));
    let ascender = f32::from(face.ascender()) * scale;
    let descender = f32::from(face.descender()) * scale;
    let height = f32::from(face.height()) * scale;
    let bbox = face.global_bounding_box();
    let y_max = (f32::from(bbox.y_max) * scale).ceil() as i32;
    let y_min = (f32::from(bbox.y_min) * scale).floor() as i32;

    FaceMetrics {
        ascent: ascender.ceil() as i32,
        descent: descender.floor() as i32,
        line_height: height.round() as i32,
        total_height: y_max - y_min,
    }
}

/// Bitmap-only faces report the strike size for everything above the baseline.
fn bitmap_metrics(size: u32) -> FaceMetrics {
    let size = i32::try_from(size).unwrap_or(i32::MAX);
    FaceMetrics {
        ascent: size,
        descent: 0,
        line_height: size,
        total_height: size,
    }
}
