//! Command line options.
//!
//! The same set of options can come from a TOML file passed with `--config`.
//! Keys in the file use the long option names, e.g. `font-size = 24`.

use std::path::PathBuf;

use clap::Parser;
use fontbake_core::codec::DataFormat;
use fontbake_core::kerning::KerningMode;
use fontbake_core::naming::TextureNameSuffix;
use serde::Deserialize;

/// Command line bitmap font generator, compatible with bmfont.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[command(name = "fontbake", version, about, long_about = None)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    /// TOML file with default values for any of the other options
    #[arg(long, value_name = "FILE")]
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Path to the font file, required
    #[arg(long, value_name = "FILE")]
    pub font_file: Option<PathBuf>,

    /// Fallback font for characters the main font lacks
    #[arg(long, value_name = "FILE")]
    pub secondary_font_file: Option<PathBuf>,

    /// Required characters, for example: 32-64,92,0x78-0x7e [default: 32-126 unless
    /// chars-file is given]
    #[arg(long)]
    pub chars: Option<String>,

    /// UTF-8 text file with required characters, combined with --chars
    #[arg(long, value_name = "FILE")]
    pub chars_file: Vec<PathBuf>,

    /// Add every character the font maps
    #[arg(long)]
    pub all_chars: bool,

    /// Foreground RGB color [default: 255,255,255]
    #[arg(long, value_name = "R,G,B")]
    pub color: Option<String>,

    /// Background RGB color [default: transparent]
    #[arg(long, value_name = "R,G,B")]
    pub background_color: Option<String>,

    /// Font size in pixels [default: 32]
    #[arg(long)]
    pub font_size: Option<u16>,

    #[arg(long)]
    pub padding_up: Option<u32>,

    #[arg(long)]
    pub padding_right: Option<u32>,

    #[arg(long)]
    pub padding_down: Option<u32>,

    #[arg(long)]
    pub padding_left: Option<u32>,

    #[arg(long)]
    pub spacing_vert: Option<u32>,

    #[arg(long)]
    pub spacing_horiz: Option<u32>,

    /// Output file name without extension, required
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Descriptor format: txt, xml, json, bin or cbor [default: txt]
    #[arg(long)]
    pub data_format: Option<DataFormat>,

    /// Kerning pairs: disabled, basic, regular (tuned by hinter) or extended
    /// (bigger output, more precise) [default: disabled]
    #[arg(long)]
    pub kerning_pairs: Option<KerningMode>,

    /// Disable anti-aliasing
    #[arg(long)]
    pub monochrome: bool,

    /// Use a lighter hinting algorithm
    #[arg(long)]
    pub light_hinting: bool,

    /// Rasterize unhinted outlines
    #[arg(long)]
    pub no_hinting: bool,

    /// Enable non-proportional numbers
    #[arg(long)]
    pub tabular_numbers: bool,

    /// Enable slashed zero
    #[arg(long)]
    pub slashed_zero: bool,

    /// Write extra information to the descriptor
    #[arg(long)]
    pub extra_info: bool,

    /// Texture sizes tried from left to right, for example: 256x256,512x256
    #[arg(long, value_name = "WxH,...")]
    pub texture_size: Option<String>,

    /// Crop unused parts of textures (width)
    #[arg(long)]
    pub texture_crop_width: bool,

    /// Crop unused parts of textures (height)
    #[arg(long)]
    pub texture_crop_height: bool,

    /// Align glyph horizontal positions [default: 1]
    #[arg(long)]
    pub align_horiz: Option<u32>,

    /// Align glyph vertical positions [default: 1]
    #[arg(long)]
    pub align_vert: Option<u32>,

    /// Maximum number of generated textures
    #[arg(long)]
    pub max_texture_count: Option<u32>,

    /// Texture name suffix: index_aligned, index or none [default: index_aligned]
    #[arg(long)]
    pub texture_name_suffix: Option<TextureNameSuffix>,

    /// Verbose output
    #[arg(long)]
    pub verbose: bool,
}

impl Options {
    /// Fill everything not given on the command line from `file`.
    pub fn merge(self, file: Options) -> Options {
        Options {
            config: self.config,
            font_file: self.font_file.or(file.font_file),
            secondary_font_file: self.secondary_font_file.or(file.secondary_font_file),
            chars: self.chars.or(file.chars),
            chars_file: if self.chars_file.is_empty() {
                file.chars_file
            } else {
                self.chars_file
            },
            all_chars: self.all_chars || file.all_chars,
            color: self.color.or(file.color),
            background_color: self.background_color.or(file.background_color),
            font_size: self.font_size.or(file.font_size),
            padding_up: self.padding_up.or(file.padding_up),
            padding_right: self.padding_right.or(file.padding_right),
            padding_down: self.padding_down.or(file.padding_down),
            padding_left: self.padding_left.or(file.padding_left),
            spacing_vert: self.spacing_vert.or(file.spacing_vert),
            spacing_horiz: self.spacing_horiz.or(file.spacing_horiz),
            output: self.output.or(file.output),
            data_format: self.data_format.or(file.data_format),
            kerning_pairs: self.kerning_pairs.or(file.kerning_pairs),
            monochrome: self.monochrome || file.monochrome,
            light_hinting: self.light_hinting || file.light_hinting,
            no_hinting: self.no_hinting || file.no_hinting,
            tabular_numbers: self.tabular_numbers || file.tabular_numbers,
            slashed_zero: self.slashed_zero || file.slashed_zero,
            extra_info: self.extra_info || file.extra_info,
            texture_size: self.texture_size.or(file.texture_size),
            texture_crop_width: self.texture_crop_width || file.texture_crop_width,
            texture_crop_height: self.texture_crop_height || file.texture_crop_height,
            align_horiz: self.align_horiz.or(file.align_horiz),
            align_vert: self.align_vert.or(file.align_vert),
            max_texture_count: self.max_texture_count.or(file.max_texture_count),
            texture_name_suffix: self.texture_name_suffix.or(file.texture_name_suffix),
            verbose: self.verbose || file.verbose,
        }
    }
}
