//! Legacy binary format, version 3.
//!
//! The file starts with `BMF` and a version byte, followed by tagged blocks. Each
//! block is a one-byte tag, a little-endian `i32` payload length and the payload
//! itself. Fields are packed with no alignment padding.

use super::DataFormat;
use crate::descriptor::DescriptorModel;
use crate::error::{Error, Result};

const MAGIC: &[u8; 4] = b"BMF\x03";

const INFO_BLOCK: u8 = 1;
const COMMON_BLOCK: u8 = 2;
const PAGES_BLOCK: u8 = 3;
const CHARS_BLOCK: u8 = 4;
const KERNINGS_BLOCK: u8 = 5;

const SMOOTH_BIT: u8 = 0x01;
const UNICODE_BIT: u8 = 0x02;
const ITALIC_BIT: u8 = 0x04;
const BOLD_BIT: u8 = 0x08;
const PACKED_BIT: u8 = 0x80;

/// Size of one char record.
pub(crate) const CHAR_RECORD_LEN: usize = 20;
/// Size of one kerning record.
pub(crate) const KERNING_RECORD_LEN: usize = 10;

fn bit(set: bool, mask: u8) -> u8 {
    if set { mask } else { 0 }
}

fn push_block(out: &mut Vec<u8>, tag: u8, payload: &[u8]) -> Result<()> {
    let len = i32::try_from(payload.len())
        .map_err(|_| Error::encode(DataFormat::Binary, format!("block {tag} is too large")))?;
    out.push(tag);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

fn info_payload(model: &DescriptorModel) -> Vec<u8> {
    let info = &model.info;
    let mut payload = Vec::with_capacity(15 + info.face.len());
    payload.extend_from_slice(&info.size.to_le_bytes());
    payload.push(
        bit(info.smooth, SMOOTH_BIT)
            | bit(info.unicode, UNICODE_BIT)
            | bit(info.italic, ITALIC_BIT)
            | bit(info.bold, BOLD_BIT),
    );
    payload.push(if info.unicode { 0 } else { info.charset });
    payload.extend_from_slice(&info.stretch_h.to_le_bytes());
    payload.push(info.aa);
    payload.extend_from_slice(&[
        info.padding.up,
        info.padding.right,
        info.padding.down,
        info.padding.left,
        info.spacing.horizontal,
        info.spacing.vertical,
        info.outline,
    ]);
    payload.extend_from_slice(info.face.as_bytes());
    payload.push(0);
    payload
}

fn common_payload(model: &DescriptorModel) -> Result<Vec<u8>> {
    let common = &model.common;
    let pages = u16::try_from(model.pages.len()).map_err(|_| Error::OutOfRange {
        field: "pages",
        value: model.pages.len() as i64,
    })?;

    let mut payload = Vec::with_capacity(15);
    for value in [common.line_height, common.base, common.scale_w(), common.scale_h(), pages] {
        payload.extend_from_slice(&value.to_le_bytes());
    }
    payload.extend_from_slice(&[
        bit(common.packed, PACKED_BIT),
        common.alpha_chnl,
        common.red_chnl,
        common.green_chnl,
        common.blue_chnl,
    ]);
    Ok(payload)
}

fn pages_payload(model: &DescriptorModel) -> Vec<u8> {
    if model.pages.is_empty() {
        return vec![0];
    }
    let mut payload = Vec::new();
    for name in &model.pages {
        payload.extend_from_slice(name.as_bytes());
        payload.push(0);
    }
    payload
}

fn chars_payload(model: &DescriptorModel) -> Vec<u8> {
    let mut payload = Vec::with_capacity(model.chars.len() * CHAR_RECORD_LEN);
    for c in &model.chars {
        payload.extend_from_slice(&c.id.to_le_bytes());
        for value in [c.x, c.y, c.width, c.height] {
            payload.extend_from_slice(&value.to_le_bytes());
        }
        for value in [c.xoffset, c.yoffset, c.xadvance] {
            payload.extend_from_slice(&value.to_le_bytes());
        }
        payload.push(c.page);
        payload.push(c.chnl);
    }
    payload
}

fn kernings_payload(model: &DescriptorModel) -> Vec<u8> {
    let mut payload = Vec::with_capacity(model.kernings.len() * KERNING_RECORD_LEN);
    for k in &model.kernings {
        payload.extend_from_slice(&k.first.to_le_bytes());
        payload.extend_from_slice(&k.second.to_le_bytes());
        payload.extend_from_slice(&k.amount.to_le_bytes());
    }
    payload
}

pub(super) fn encode(model: &DescriptorModel) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    push_block(&mut out, INFO_BLOCK, &info_payload(model))?;
    push_block(&mut out, COMMON_BLOCK, &common_payload(model)?)?;
    push_block(&mut out, PAGES_BLOCK, &pages_payload(model))?;
    push_block(&mut out, CHARS_BLOCK, &chars_payload(model))?;
    if !model.kernings.is_empty() {
        push_block(&mut out, KERNINGS_BLOCK, &kernings_payload(model))?;
    }
    Ok(out)
}
