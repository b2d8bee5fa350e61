//! JSON format.
//!
//! Keys are written in sorted order with four-space indentation. Boolean fields
//! are written as `0`/`1`; the decoder also accepts JSON booleans.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::DataFormat;
use crate::descriptor::{
    Char, Common, DescriptorModel, Info, InfoPadding, InfoSpacing, Kerning, PageScale, charset_name,
};
use crate::error::{Error, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Number(u64),
}

fn ser_flag<S: Serializer>(value: &bool, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(value) => value,
        FlagRepr::Number(value) => value != 0,
    })
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInfo {
    face: String,
    size: i16,
    #[serde(serialize_with = "ser_flag", deserialize_with = "de_flag")]
    bold: bool,
    #[serde(serialize_with = "ser_flag", deserialize_with = "de_flag")]
    italic: bool,
    #[serde(default)]
    charset: String,
    #[serde(serialize_with = "ser_flag", deserialize_with = "de_flag")]
    unicode: bool,
    stretch_h: u16,
    #[serde(serialize_with = "ser_flag", deserialize_with = "de_flag")]
    smooth: bool,
    aa: u8,
    padding: [u8; 4],
    spacing: [u8; 2],
    outline: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCommon {
    line_height: u16,
    base: u16,
    scale_w: u16,
    scale_h: u16,
    #[serde(default)]
    pages: usize,
    #[serde(serialize_with = "ser_flag", deserialize_with = "de_flag")]
    packed: bool,
    alpha_chnl: u8,
    red_chnl: u8,
    green_chnl: u8,
    blue_chnl: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_height: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    descent: Option<i16>,
}

#[derive(Serialize, Deserialize)]
struct WireChar {
    id: u32,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    xoffset: i16,
    yoffset: i16,
    xadvance: i16,
    page: u8,
    chnl: u8,
}

#[derive(Serialize, Deserialize)]
struct WireKerning {
    first: u32,
    second: u32,
    amount: i16,
}

#[derive(Serialize, Deserialize)]
struct WireDescriptor {
    info: WireInfo,
    common: WireCommon,
    pages: Vec<String>,
    chars: Vec<WireChar>,
    #[serde(default)]
    kernings: Vec<WireKerning>,
}

impl From<&DescriptorModel> for WireDescriptor {
    fn from(model: &DescriptorModel) -> Self {
        let info = &model.info;
        let common = &model.common;
        Self {
            info: WireInfo {
                face: info.face.clone(),
                size: info.size,
                bold: info.bold,
                italic: info.italic,
                charset: info.charset_name(),
                unicode: info.unicode,
                stretch_h: info.stretch_h,
                smooth: info.smooth,
                aa: info.aa,
                padding: [info.padding.up, info.padding.right, info.padding.down, info.padding.left],
                spacing: [info.spacing.horizontal, info.spacing.vertical],
                outline: info.outline,
                style: model.extra_info.then(|| info.style.clone()),
            },
            common: WireCommon {
                line_height: common.line_height,
                base: common.base,
                scale_w: common.scale_w(),
                scale_h: common.scale_h(),
                pages: model.pages.len(),
                packed: common.packed,
                alpha_chnl: common.alpha_chnl,
                red_chnl: common.red_chnl,
                green_chnl: common.green_chnl,
                blue_chnl: common.blue_chnl,
                total_height: model.extra_info.then_some(common.total_height),
                descent: model.extra_info.then_some(common.descent),
            },
            pages: model.pages.clone(),
            chars: model
                .chars
                .iter()
                .map(|c| WireChar {
                    id: c.id,
                    x: c.x,
                    y: c.y,
                    width: c.width,
                    height: c.height,
                    xoffset: c.xoffset,
                    yoffset: c.yoffset,
                    xadvance: c.xadvance,
                    page: c.page,
                    chnl: c.chnl,
                })
                .collect(),
            kernings: model
                .kernings
                .iter()
                .map(|k| WireKerning { first: k.first, second: k.second, amount: k.amount })
                .collect(),
        }
    }
}

fn charset_value(name: &str) -> std::result::Result<u8, serde_json::Error> {
    if name.is_empty() {
        return Ok(0);
    }
    if let Ok(value) = name.parse::<u8>() {
        return Ok(value);
    }
    (0..=u8::MAX)
        .find(|&value| charset_name(value) == name)
        .ok_or_else(|| serde_json::Error::custom(format!("unknown charset '{name}'")))
}

impl TryFrom<WireDescriptor> for DescriptorModel {
    type Error = serde_json::Error;

    fn try_from(wire: WireDescriptor) -> std::result::Result<Self, Self::Error> {
        let WireDescriptor { info, common, pages, chars, kernings } = wire;
        let extra_info =
            info.style.is_some() || common.total_height.is_some() || common.descent.is_some();
        let [up, right, down, left] = info.padding;
        let [horizontal, vertical] = info.spacing;

        let scale = (common.scale_w != 0 || common.scale_h != 0)
            .then_some(PageScale { width: common.scale_w, height: common.scale_h });

        Ok(Self {
            info: Info {
                face: info.face,
                style: info.style.unwrap_or_default(),
                size: info.size,
                bold: info.bold,
                italic: info.italic,
                charset: charset_value(&info.charset)?,
                unicode: info.unicode,
                stretch_h: info.stretch_h,
                smooth: info.smooth,
                aa: info.aa,
                padding: InfoPadding { up, right, down, left },
                spacing: InfoSpacing { horizontal, vertical },
                outline: info.outline,
            },
            common: Common {
                line_height: common.line_height,
                base: common.base,
                scale,
                packed: common.packed,
                alpha_chnl: common.alpha_chnl,
                red_chnl: common.red_chnl,
                green_chnl: common.green_chnl,
                blue_chnl: common.blue_chnl,
                descent: common.descent.unwrap_or_default(),
                total_height: common.total_height.unwrap_or_default(),
            },
            pages,
            chars: chars
                .into_iter()
                .map(|c| Char {
                    id: c.id,
                    x: c.x,
                    y: c.y,
                    width: c.width,
                    height: c.height,
                    xoffset: c.xoffset,
                    yoffset: c.yoffset,
                    xadvance: c.xadvance,
                    page: c.page,
                    chnl: c.chnl,
                })
                .collect(),
            kernings: kernings
                .into_iter()
                .map(|k| Kerning { first: k.first, second: k.second, amount: k.amount })
                .collect(),
            extra_info,
        })
    }
}

pub(super) fn encode(model: &DescriptorModel) -> Result<String> {
    // Going through `Value` sorts the keys.
    let value = serde_json::to_value(WireDescriptor::from(model))
        .map_err(|e| Error::encode(DataFormat::Json, e))?;

    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::encode(DataFormat::Json, e))?;
    String::from_utf8(out).map_err(|e| Error::encode(DataFormat::Json, e))
}

/// Parse a JSON descriptor back into a model.
///
/// Extra-info fields are optional; the model's `extra_info` flag is set when any of
/// them is present. Boolean fields may be `0`/`1` or JSON booleans.
pub fn decode_json(input: &str) -> Result<DescriptorModel> {
    let wire: WireDescriptor = serde_json::from_str(input)?;
    Ok(DescriptorModel::try_from(wire)?)
}
