//! The generation pipeline.
//!
//! [`generate`] runs every phase in memory: glyph collection, layout, naming,
//! kerning, descriptor encoding and page rendering. Nothing touches the disk until
//! all of them succeeded; [`Artifacts::write`] then writes the pages and the
//! descriptor as one group, so a failed write leaves none of them behind.

use std::fs;
use std::path::{Path, PathBuf};

use fontbake_core::codec;
use fontbake_core::collect::{FontSet, collect_glyphs};
use fontbake_core::descriptor::{DescriptorSettings, assemble_descriptor};
use fontbake_core::engine::{FontEngine, Shaper};
use fontbake_core::kerning::KerningResolver;
use fontbake_core::layout::arrange_glyphs;
use fontbake_core::logging::targets;
use fontbake_core::naming::{ensure_unique_names, texture_file_names};
use fontbake_render::font::{FontFace, FontOptions, GlyphRasterizer};
use fontbake_render::shaping::HarfShaper;
use fontbake_render::texture::{GlyphSources, encode_png, render_pages};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::output::write_files;

/// A font that can be measured and rasterized.
pub trait FontSource: FontEngine + GlyphRasterizer {}

impl<T: FontEngine + GlyphRasterizer + ?Sized> FontSource for T {}

/// The engines one run works with.
#[derive(Clone, Copy)]
pub struct Engines<'a> {
    pub primary: &'a dyn FontSource,
    pub secondary: Option<&'a dyn FontSource>,
    /// Shaper over the primary font.
    pub shaper: &'a dyn Shaper,
}

/// One file to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Every file a run produces, fully encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Page images, in page order.
    pub pages: Vec<OutputFile>,
    pub descriptor: OutputFile,
}

impl Artifacts {
    /// Write the pages, then the descriptor.
    pub fn write(&self) -> AppResult<()> {
        let files = self.pages.iter().chain(std::iter::once(&self.descriptor));
        write_files(files.map(|file| (file.path.as_path(), file.bytes.as_slice())))
    }
}

/// Open a font file at the configured size.
pub fn open_font(path: &Path, options: FontOptions) -> AppResult<FontFace> {
    let data = fs::read(path).map_err(|e| AppError::read(path, e))?;
    let face = FontFace::from_bytes(data, 0, options)?;
    tracing::debug!(target: targets::APP, path = %path.display(), "font opened");
    Ok(face)
}

/// Produce all output files for `config` without writing them.
pub fn generate(config: &Config, engines: &Engines<'_>) -> AppResult<Artifacts> {
    let mut code_points = config.chars.clone();
    if config.all_chars {
        code_points.extend(engines.primary.code_points());
    }

    let mut fonts = FontSet::new(engines.primary);
    let mut sources = GlyphSources::new(engines.primary);
    if let Some(secondary) = engines.secondary {
        fonts = fonts.with_secondary(secondary);
        sources = sources.with_secondary(secondary);
    }

    let mut glyphs = collect_glyphs(fonts, engines.shaper, &code_points, &config.features)?;
    let pages = arrange_glyphs(&mut glyphs, &config.layout)?;
    if let Some(max) = config.max_texture_count
        && pages.len() > max
    {
        return Err(fontbake_core::Error::TooManyPages {
            count: pages.len(),
            max,
        }
        .into());
    }

    let page_names = texture_file_names(&config.output_stem(), pages.len(), config.texture_name_suffix);
    ensure_unique_names(&page_names)?;

    let kernings = KerningResolver::new(engines.primary, engines.shaper, config.features)
        .resolve(&glyphs, config.kerning)?;

    let settings = DescriptorSettings {
        font_size: config.font_size,
        monochrome: config.monochrome,
        padding: config.layout.padding,
        spacing: config.layout.spacing,
        extra_info: config.extra_info,
    };
    let model = assemble_descriptor(
        &glyphs,
        &pages,
        page_names.clone(),
        &kernings,
        &engines.primary.face_info(),
        &engines.primary.face_metrics(),
        &settings,
    )?;
    let descriptor = OutputFile {
        path: config.descriptor_path(),
        bytes: codec::encode(&model, config.data_format)?,
    };

    let output_dir = config.output_dir();
    let canvases = render_pages(&glyphs, &pages, sources, config.layout.padding)?;
    let pages = canvases
        .iter()
        .zip(&page_names)
        .map(|(canvas, name)| {
            Ok(OutputFile {
                path: output_dir.join(name),
                bytes: encode_png(&canvas.compose(&config.style))?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    tracing::info!(
        target: targets::APP,
        glyphs = glyphs.len(),
        pages = pages.len(),
        kernings = kernings.len(),
        format = %config.data_format,
        "font generated"
    );

    Ok(Artifacts { pages, descriptor })
}

/// Open the fonts named in `config`, generate everything and write it.
pub fn run(config: &Config) -> AppResult<()> {
    let options = config.font_options();
    let primary = open_font(&config.font_file, options)?;
    let secondary = config
        .secondary_font_file
        .as_deref()
        .map(|path| open_font(path, options))
        .transpose()?;
    let shaper = HarfShaper::new(&primary)?;

    let engines = Engines {
        primary: &primary,
        secondary: secondary.as_ref().map(|font| font as &dyn FontSource),
        shaper: &shaper,
    };
    generate(config, &engines)?.write()
}
