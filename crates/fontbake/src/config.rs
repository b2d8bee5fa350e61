//! Validated generator configuration.
//!
//! [`Config::load`] merges the command line with the optional TOML option file,
//! parses every textual option and rejects invalid combinations before any font
//! is opened.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use fontbake_core::codec::DataFormat;
use fontbake_core::engine::ShapingFeatures;
use fontbake_core::kerning::KerningMode;
use fontbake_core::layout::{Alignment, LayoutOptions, Padding, PageSize, Spacing, default_texture_sizes};
use fontbake_core::naming::TextureNameSuffix;
use fontbake_render::font::{FontOptions, Hinting};
use fontbake_render::texture::{Color, TextureStyle};

use crate::cli::Options;
use crate::error::{AppError, AppResult};

/// Characters generated when neither `chars` nor `chars-file` is given.
pub const DEFAULT_CHARS: &str = "32-126";

const MAX_CODE_POINT: u32 = 0x10FFFF;
const MAX_TEXTURE_SIDE: u32 = 65536;

/// Everything a run needs, fully parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub font_file: PathBuf,
    pub secondary_font_file: Option<PathBuf>,
    /// Requested code points, from `chars` and every `chars-file`.
    pub chars: BTreeSet<u32>,
    /// Also generate every code point the primary font maps.
    pub all_chars: bool,
    pub style: TextureStyle,
    pub font_size: u16,
    pub monochrome: bool,
    pub hinting: Hinting,
    pub features: ShapingFeatures,
    pub layout: LayoutOptions,
    /// Output path without extension; pages and descriptor are written next to it.
    pub output: PathBuf,
    pub data_format: DataFormat,
    pub kerning: KerningMode,
    pub extra_info: bool,
    pub max_texture_count: Option<usize>,
    pub texture_name_suffix: TextureNameSuffix,
    pub verbose: bool,
}

impl Config {
    /// Merge the option file named by `--config` (if any) into `cli` and validate.
    pub fn load(cli: Options) -> AppResult<Self> {
        let options = match &cli.config {
            Some(path) => {
                let file = read_option_file(path)?;
                cli.merge(file)
            }
            None => cli,
        };
        Self::from_options(options)
    }

    /// Validate already merged options.
    pub fn from_options(options: Options) -> AppResult<Self> {
        let font_file = options
            .font_file
            .ok_or_else(|| AppError::config("--font-file required"))?;
        let output = options
            .output
            .ok_or_else(|| AppError::config("--output required"))?;
        if output.file_name().is_none() {
            return Err(AppError::config(format!(
                "invalid --output '{}', expected a file name without extension",
                output.display()
            )));
        }

        let chars_text = match (&options.chars, options.chars_file.is_empty()) {
            (Some(chars), _) => chars.as_str(),
            (None, true) => DEFAULT_CHARS,
            (None, false) => "",
        };
        let mut chars = parse_chars(chars_text)?;
        for path in &options.chars_file {
            chars.extend(read_chars_file(path)?);
        }

        let color = match &options.color {
            Some(color) => parse_color("--color", color)?,
            None => Color::WHITE,
        };
        let background = options
            .background_color
            .as_deref()
            .map(|color| parse_color("--background-color", color))
            .transpose()?;

        let font_size = options.font_size.unwrap_or(32);
        if font_size == 0 {
            return Err(AppError::config("invalid --font-size 0"));
        }

        let alignment = Alignment {
            horizontal: options.align_horiz.unwrap_or(1),
            vertical: options.align_vert.unwrap_or(1),
        };
        if alignment.horizontal == 0 {
            return Err(AppError::config("invalid --align-horiz"));
        }
        if alignment.vertical == 0 {
            return Err(AppError::config("invalid --align-vert"));
        }

        let texture_sizes = match &options.texture_size {
            Some(sizes) => parse_texture_sizes(sizes)?,
            None => default_texture_sizes(),
        };

        if options.light_hinting && options.no_hinting {
            return Err(AppError::config(
                "--light-hinting and --no-hinting can't be used together",
            ));
        }
        let hinting = if options.no_hinting {
            Hinting::Disabled
        } else if options.light_hinting {
            Hinting::Light
        } else {
            Hinting::Normal
        };

        let data_format = options.data_format.unwrap_or_default();
        if options.extra_info && !data_format.supports_extra_info() {
            return Err(AppError::config(format!(
                "--extra-info is not compatible with the {data_format} data format"
            )));
        }

        Ok(Self {
            font_file,
            secondary_font_file: options.secondary_font_file,
            chars,
            all_chars: options.all_chars,
            style: TextureStyle { color, background },
            font_size,
            monochrome: options.monochrome,
            hinting,
            features: ShapingFeatures {
                tabular_numbers: options.tabular_numbers,
                slashed_zero: options.slashed_zero,
            },
            layout: LayoutOptions {
                padding: Padding {
                    up: options.padding_up.unwrap_or(0),
                    right: options.padding_right.unwrap_or(0),
                    down: options.padding_down.unwrap_or(0),
                    left: options.padding_left.unwrap_or(0),
                },
                spacing: Spacing {
                    horizontal: options.spacing_horiz.unwrap_or(0),
                    vertical: options.spacing_vert.unwrap_or(0),
                },
                alignment,
                texture_sizes,
                crop_width: options.texture_crop_width,
                crop_height: options.texture_crop_height,
            },
            output,
            data_format,
            kerning: options.kerning_pairs.unwrap_or_default(),
            extra_info: options.extra_info,
            max_texture_count: options.max_texture_count.map(|count| count as usize),
            texture_name_suffix: options.texture_name_suffix.unwrap_or_default(),
            verbose: options.verbose,
        })
    }

    /// How fonts are opened for this run.
    pub fn font_options(&self) -> FontOptions {
        FontOptions {
            size: u32::from(self.font_size),
            monochrome: self.monochrome,
            hinting: self.hinting,
        }
    }

    /// File name stem shared by the pages, e.g. `font` for `out/font`.
    pub fn output_stem(&self) -> String {
        self.output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Directory the pages and the descriptor are written to.
    pub fn output_dir(&self) -> &Path {
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Path of the descriptor file. Every format uses the `.fnt` extension.
    pub fn descriptor_path(&self) -> PathBuf {
        self.output_dir().join(format!("{}.fnt", self.output_stem()))
    }
}

fn read_option_file(path: &Path) -> AppResult<Options> {
    let content = fs::read_to_string(path).map_err(|e| AppError::read(path, e))?;
    toml::from_str(&content).map_err(|source| AppError::OptionFile {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_code_point(value: &str, list: &str) -> AppResult<u32> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };
    let code_point =
        parsed.map_err(|_| AppError::config(format!("invalid character '{value}' in --chars '{list}'")))?;
    if code_point > MAX_CODE_POINT {
        return Err(AppError::config(format!(
            "invalid utf-32 value {value} (out of range 0x000000..0x10ffff)"
        )));
    }
    Ok(code_point)
}

/// Parse a character list such as `32-64,92,0x78-0x7e`.
///
/// Whitespace is ignored, values are decimal or `0x` hexadecimal and ranges are
/// inclusive. A range whose end is below its start adds nothing.
pub fn parse_chars(list: &str) -> AppResult<BTreeSet<u32>> {
    let compact: String = list.chars().filter(|c| !c.is_whitespace()).collect();
    let mut chars = BTreeSet::new();

    for segment in compact.split(',').filter(|segment| !segment.is_empty()) {
        match segment.split_once('-') {
            Some((start, end)) => {
                let start = parse_code_point(start, list)?;
                let end = parse_code_point(end, list)?;
                chars.extend(start..=end);
            }
            None => {
                chars.insert(parse_code_point(segment, list)?);
            }
        }
    }
    Ok(chars)
}

/// Every code point of a UTF-8 text file.
pub fn read_chars_file(path: &Path) -> AppResult<BTreeSet<u32>> {
    let bytes = fs::read(path).map_err(|e| AppError::read(path, e))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        AppError::config(format!(
            "characters file '{}' is not valid UTF-8: {}",
            path.display(),
            e.utf8_error()
        ))
    })?;
    Ok(text.chars().map(u32::from).collect())
}

fn parse_color(option: &str, value: &str) -> AppResult<Color> {
    value
        .parse()
        .map_err(|e: String| AppError::config(format!("invalid {option}: {e}")))
}

fn parse_side(value: &str) -> Option<u32> {
    let digits = !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) && !value.starts_with('0');
    digits
        .then(|| value.parse::<u32>().ok())
        .flatten()
        .filter(|side| *side <= MAX_TEXTURE_SIDE)
}

/// Parse a texture size list such as `256x256,512x256`.
pub fn parse_texture_sizes(list: &str) -> AppResult<Vec<PageSize>> {
    let invalid = || AppError::config(format!("invalid texture size argument '{list}'"));
    let mut sizes = Vec::new();

    for item in list.split(',').filter(|item| !item.is_empty()) {
        let (width, height) = item.split_once('x').ok_or_else(invalid)?;
        let width = parse_side(width).ok_or_else(invalid)?;
        let height = parse_side(height).ok_or_else(invalid)?;
        sizes.push(PageSize::new(width, height));
    }

    if sizes.is_empty() {
        return Err(invalid());
    }
    Ok(sizes)
}
