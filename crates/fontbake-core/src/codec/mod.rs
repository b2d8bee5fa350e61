//! Descriptor encoders.
//!
//! Every format encodes the same [`DescriptorModel`]; only the representation
//! differs. Encoders produce an in-memory buffer and check format capabilities
//! before writing a single byte, so a failed encode never leaves partial output.

mod binary;
mod cbor;
mod json;
mod text;
mod xml;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use json::decode_json;

use crate::descriptor::DescriptorModel;
use crate::error::{Error, Result};
use crate::logging::targets;

/// Descriptor file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFormat {
    /// Line-oriented `key=value` text.
    #[default]
    #[serde(rename = "txt")]
    Text,
    /// XML document with a `font` root element.
    #[serde(rename = "xml")]
    Xml,
    /// Little-endian block format, version 3.
    #[serde(rename = "bin")]
    Binary,
    /// JSON object.
    #[serde(rename = "json")]
    Json,
    /// CBOR stream mirroring the binary layout.
    #[serde(rename = "cbor")]
    Cbor,
}

impl DataFormat {
    pub const ALL: [Self; 5] = [Self::Text, Self::Xml, Self::Binary, Self::Json, Self::Cbor];

    /// The option value for this format.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Xml => "xml",
            Self::Binary => "bin",
            Self::Json => "json",
            Self::Cbor => "cbor",
        }
    }

    /// Whether the format can carry the extra-info fields.
    pub fn supports_extra_info(self) -> bool {
        !matches!(self, Self::Binary | Self::Cbor)
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == lower)
            .ok_or_else(|| format!("unknown data format '{s}'"))
    }
}

/// Fail if the model uses something the format cannot represent.
pub fn check_capabilities(model: &DescriptorModel, format: DataFormat) -> Result<()> {
    if model.extra_info && !format.supports_extra_info() {
        return Err(Error::ExtraInfoUnsupported { format });
    }
    if format == DataFormat::Binary
        && let Some(first) = model.pages.first()
        && model.pages.iter().any(|name| name.len() != first.len())
    {
        return Err(Error::PageNameLengthMismatch { format });
    }
    Ok(())
}

/// Encode the model in the given format.
pub fn encode(model: &DescriptorModel, format: DataFormat) -> Result<Vec<u8>> {
    check_capabilities(model, format)?;
    let bytes = match format {
        DataFormat::Text => text::encode(model)?.into_bytes(),
        DataFormat::Xml => xml::encode(model)?,
        DataFormat::Binary => binary::encode(model)?,
        DataFormat::Json => json::encode(model)?.into_bytes(),
        DataFormat::Cbor => cbor::encode(model)?,
    };
    tracing::debug!(target: targets::CODEC, %format, bytes = bytes.len(), "descriptor encoded");
    Ok(bytes)
}
