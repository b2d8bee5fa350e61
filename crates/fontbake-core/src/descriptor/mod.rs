//! The bitmap font descriptor: font identity, common metrics, pages, chars and kernings.
//!
//! A [`DescriptorModel`] is assembled once from the pipeline state by
//! [`assemble_descriptor`] and then handed to the codecs unchanged. Field widths
//! follow the legacy binary layout so every format can represent every value.

mod assemble;
mod whitespace;

pub use assemble::{DescriptorSettings, assemble_descriptor};
pub use whitespace::{WHITESPACE, is_whitespace};

/// Padding stored in the descriptor, in up, right, down, left order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoPadding {
    pub up: u8,
    pub right: u8,
    pub down: u8,
    pub left: u8,
}

/// Spacing stored in the descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfoSpacing {
    pub horizontal: u8,
    pub vertical: u8,
}

/// How the font was generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Info {
    pub face: String,
    /// Style name, only written with extra info.
    pub style: String,
    /// Font size; negative means the size matches the cell height.
    pub size: i16,
    pub bold: bool,
    pub italic: bool,
    /// Character set of a non-unicode font.
    pub charset: u8,
    pub unicode: bool,
    pub stretch_h: u16,
    pub smooth: bool,
    /// Supersampling level.
    pub aa: u8,
    pub padding: InfoPadding,
    pub spacing: InfoSpacing,
    pub outline: u8,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            face: String::new(),
            style: String::new(),
            size: 0,
            bold: false,
            italic: false,
            charset: 0,
            unicode: true,
            stretch_h: 100,
            smooth: true,
            aa: 1,
            padding: InfoPadding::default(),
            spacing: InfoSpacing::default(),
            outline: 0,
        }
    }
}

impl Info {
    /// The `charset` value as written by the text formats: empty for unicode fonts.
    pub fn charset_name(&self) -> String {
        if self.unicode {
            String::new()
        } else {
            charset_name(self.charset)
        }
    }
}

/// Shared page size, present only when every page has the same size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageScale {
    pub width: u16,
    pub height: u16,
}

/// Metrics shared by all characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Common {
    pub line_height: u16,
    /// Distance from the line top to the baseline.
    pub base: u16,
    /// `None` when the pages differ in size; written as 0.
    pub scale: Option<PageScale>,
    pub packed: bool,
    pub alpha_chnl: u8,
    pub red_chnl: u8,
    pub green_chnl: u8,
    pub blue_chnl: u8,
    /// Extra info: lowest extent below the baseline.
    pub descent: i16,
    /// Extra info: height of the face bounding box.
    pub total_height: u16,
}

impl Default for Common {
    fn default() -> Self {
        Self {
            line_height: 0,
            base: 0,
            scale: None,
            packed: false,
            alpha_chnl: 0,
            red_chnl: 4,
            green_chnl: 4,
            blue_chnl: 4,
            descent: 0,
            total_height: 0,
        }
    }
}

impl Common {
    /// `scaleW` as written by the encoders.
    #[inline]
    pub fn scale_w(&self) -> u16 {
        self.scale.map_or(0, |scale| scale.width)
    }

    /// `scaleH` as written by the encoders.
    #[inline]
    pub fn scale_h(&self) -> u16 {
        self.scale.map_or(0, |scale| scale.height)
    }
}

/// One character entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Char {
    pub id: u32,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub xoffset: i16,
    pub yoffset: i16,
    pub xadvance: i16,
    pub page: u8,
    /// Texture channels holding the glyph; 15 means all four.
    pub chnl: u8,
}

/// One kerning entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Kerning {
    pub first: u32,
    pub second: u32,
    pub amount: i16,
}

/// Everything a descriptor file contains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptorModel {
    pub info: Info,
    pub common: Common,
    /// Page file names in page order.
    pub pages: Vec<String>,
    /// Characters sorted by id.
    pub chars: Vec<Char>,
    pub kernings: Vec<Kerning>,
    /// Write the style, descent and total height fields.
    pub extra_info: bool,
}

/// Windows character set names, numeric for unknown values.
pub fn charset_name(charset: u8) -> String {
    let name = match charset {
        0 => "ANSI",
        1 => "DEFAULT",
        2 => "SYMBOL",
        77 => "MAC",
        128 => "SHIFTJIS",
        129 => "HANGUL",
        130 => "JOHAB",
        134 => "GB2312",
        136 => "CHINESEBIG5",
        161 => "GREEK",
        162 => "TURKISH",
        163 => "VIETNAMESE",
        177 => "HEBREW",
        178 => "ARABIC",
        186 => "BALTIC",
        204 => "RUSSIAN",
        222 => "THAI",
        238 => "EASTEUROPE",
        255 => "OEM",
        other => return other.to_string(),
    };
    name.to_string()
}
