//! Building the descriptor model from the pipeline state.

use super::whitespace::is_whitespace;
use super::{Char, Common, DescriptorModel, Info, InfoPadding, InfoSpacing, Kerning, PageScale};
use crate::engine::{FaceInfo, FaceMetrics};
use crate::error::{Result, narrow};
use crate::glyph::{GlyphRecord, GlyphTable};
use crate::kerning::KerningPair;
use crate::layout::{PageSize, Padding, Spacing};
use crate::logging::targets;

const ALL_CHANNELS: u8 = 15;
const GLYPH_CHANNEL: u8 = 4;

/// Generation settings recorded in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSettings {
    /// Requested pixel size.
    pub font_size: u16,
    /// Anti-aliasing was disabled.
    pub monochrome: bool,
    pub padding: Padding,
    pub spacing: Spacing,
    /// Write the style, descent and total height fields.
    pub extra_info: bool,
}

fn shared_scale(pages: &[PageSize]) -> Result<Option<PageScale>> {
    let Some(first) = pages.first() else {
        return Ok(None);
    };
    if pages.iter().any(|page| page != first) {
        return Ok(None);
    }
    Ok(Some(PageScale {
        width: narrow("scaleW", first.width)?,
        height: narrow("scaleH", first.height)?,
    }))
}

fn char_entry(glyph: &GlyphRecord, padding: Padding) -> Result<Char> {
    let mut entry = Char {
        id: glyph.code_point,
        xadvance: narrow("xadvance", glyph.x_advance)?,
        chnl: ALL_CHANNELS,
        ..Default::default()
    };

    // Invisible glyphs other than whitespace carry only their advance.
    if !glyph.is_empty() || is_whitespace(glyph.code_point) {
        entry.x = narrow("x", glyph.x)?;
        entry.y = narrow("y", glyph.y)?;
        entry.width = narrow("width", glyph.width + padding.horizontal())?;
        entry.height = narrow("height", glyph.height + padding.vertical())?;
        entry.page = narrow("page", glyph.page)?;
        entry.xoffset = narrow("xoffset", i64::from(glyph.x_offset) - i64::from(padding.left))?;
        entry.yoffset = narrow("yoffset", i64::from(glyph.y_offset) - i64::from(padding.up))?;
    }

    Ok(entry)
}

/// Assemble the descriptor for the packed glyphs.
///
/// `page_names` must list the file name of every page in `pages`, in order.
pub fn assemble_descriptor(
    glyphs: &GlyphTable,
    pages: &[PageSize],
    page_names: Vec<String>,
    kernings: &[KerningPair],
    face: &FaceInfo,
    metrics: &FaceMetrics,
    settings: &DescriptorSettings,
) -> Result<DescriptorModel> {
    let info = Info {
        face: face.family.clone().unwrap_or_else(|| "unknown".to_string()),
        style: face.style.clone().unwrap_or_else(|| "unknown".to_string()),
        size: -narrow::<i16, _>("size", settings.font_size)?,
        bold: face.bold,
        italic: face.italic,
        smooth: !settings.monochrome,
        padding: InfoPadding {
            up: narrow("padding", settings.padding.up)?,
            right: narrow("padding", settings.padding.right)?,
            down: narrow("padding", settings.padding.down)?,
            left: narrow("padding", settings.padding.left)?,
        },
        spacing: InfoSpacing {
            horizontal: narrow("spacing", settings.spacing.horizontal)?,
            vertical: narrow("spacing", settings.spacing.vertical)?,
        },
        ..Info::default()
    };

    let common = Common {
        line_height: narrow("lineHeight", metrics.line_height)?,
        base: narrow("base", metrics.ascent)?,
        scale: shared_scale(pages)?,
        packed: false,
        alpha_chnl: 0,
        red_chnl: GLYPH_CHANNEL,
        green_chnl: GLYPH_CHANNEL,
        blue_chnl: GLYPH_CHANNEL,
        descent: narrow("descent", metrics.descent)?,
        total_height: narrow("totalHeight", metrics.total_height)?,
    };

    let mut sorted: Vec<&GlyphRecord> = glyphs.values().collect();
    sorted.sort_by_key(|glyph| glyph.code_point);
    let chars = sorted
        .into_iter()
        .map(|glyph| char_entry(glyph, settings.padding))
        .collect::<Result<Vec<_>>>()?;

    let kernings = kernings
        .iter()
        .map(|pair| {
            Ok(Kerning {
                first: pair.first,
                second: pair.second,
                amount: narrow("amount", pair.amount)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        target: targets::CODEC,
        chars = chars.len(),
        kernings = kernings.len(),
        pages = page_names.len(),
        "descriptor assembled"
    );

    Ok(DescriptorModel {
        info,
        common,
        pages: page_names,
        chars,
        kernings,
        extra_info: settings.extra_info,
    })
}
