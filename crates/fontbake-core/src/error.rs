//! Error types for the layout and descriptor pipeline.

use crate::codec::DataFormat;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while arranging glyphs or producing a descriptor.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The packer could not place a single remaining glyph on any candidate texture.
    #[error("cannot fit glyphs into a page ({remaining} glyphs left unplaced)")]
    CannotFitGlyphs { remaining: usize },

    /// More pages were produced than the configured limit.
    #[error("too many generated textures ({count}, the limit is {max})")]
    TooManyPages { count: usize, max: usize },

    /// Two pages would be written under the same file name.
    #[error("textures have the same names: '{name}'")]
    DuplicatePageName { name: String },

    /// Extra information was requested for a format that cannot carry it.
    #[error("extra info is not compatible with the {format} format")]
    ExtraInfoUnsupported { format: DataFormat },

    /// The binary format needs every page name to have the same length.
    #[error("texture names have different length (incompatible with the {format} format)")]
    PageNameLengthMismatch { format: DataFormat },

    /// A value does not fit the width of its descriptor field.
    #[error("value {value} does not fit the '{field}' field")]
    OutOfRange { field: &'static str, value: i64 },

    /// A font or shaping engine reported a failure.
    #[error("font engine error: {0}")]
    Engine(String),

    /// Serializing the descriptor failed.
    #[error("{format} encoding failed: {message}")]
    Encode { format: DataFormat, message: String },

    /// A JSON descriptor could not be parsed.
    #[error("invalid JSON descriptor: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Create an engine error.
    pub fn engine(message: impl Into<String>) -> Self {
        Self::Engine(message.into())
    }

    /// Create an encoding error for the given format.
    pub fn encode(format: DataFormat, message: impl std::fmt::Display) -> Self {
        Self::Encode {
            format,
            message: message.to_string(),
        }
    }

    /// Create an out-of-range error for a descriptor field.
    pub fn out_of_range(field: &'static str, value: impl Into<i64>) -> Self {
        Self::OutOfRange {
            field,
            value: value.into(),
        }
    }
}

/// Convert a value into a narrower descriptor field type.
pub(crate) fn narrow<T, V>(field: &'static str, value: V) -> Result<T>
where
    V: Copy + Into<i64>,
    T: TryFrom<V>,
{
    T::try_from(value).map_err(|_| Error::out_of_range(field, value))
}
