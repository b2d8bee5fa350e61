//! Error types for the render crate.

use thiserror::Error;

/// Errors that can occur while loading fonts or producing texture pages.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The font data could not be parsed.
    #[error("couldn't load font: {0}")]
    FontParse(String),

    /// The face has no Unicode character map.
    #[error("font doesn't contain a Unicode charmap")]
    MissingUnicodeCmap,

    /// The requested pixel size is unusable.
    #[error("invalid font size: {0}")]
    InvalidSize(u32),

    /// A glyph could not be rasterized.
    #[error("error loading glyph {glyph}")]
    Rasterize { glyph: u32 },

    /// A glyph bitmap does not fit the page it was assigned to.
    #[error("glyph {glyph} at {x},{y} lies outside the {width}x{height} page")]
    OutOfBounds { glyph: u32, x: u32, y: u32, width: u32, height: u32 },

    /// Encoding a page image failed.
    #[error("failed to encode texture: {0}")]
    ImageEncode(String),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

impl From<RenderError> for fontbake_core::Error {
    fn from(err: RenderError) -> Self {
        fontbake_core::Error::engine(err.to_string())
    }
}
