//! CBOR format.
//!
//! An indefinite-length array holding the same values as the binary format,
//! flattened to scalars: the `BMF` marker with version 3 and revision 1, the info
//! and common fields, then definite arrays of page names, char fields (ten per
//! char) and kerning fields (three per pair).

use std::io;

use ciborium_ll::{Encoder, Header, simple};

use super::DataFormat;
use crate::descriptor::DescriptorModel;
use crate::error::{Error, Result};

const CHAR_FIELDS: usize = 10;
const KERNING_FIELDS: usize = 3;

struct CborWriter<'a> {
    encoder: Encoder<&'a mut Vec<u8>>,
}

impl<'a> CborWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { encoder: Encoder::from(out) }
    }

    fn uint(&mut self, value: impl Into<u64>) -> io::Result<()> {
        self.encoder.push(Header::Positive(value.into()))
    }

    fn int(&mut self, value: impl Into<i64>) -> io::Result<()> {
        let value = value.into();
        if value < 0 {
            self.encoder.push(Header::Negative((-1 - value) as u64))
        } else {
            self.encoder.push(Header::Positive(value as u64))
        }
    }

    fn flag(&mut self, value: bool) -> io::Result<()> {
        let simple = if value { simple::TRUE } else { simple::FALSE };
        self.encoder.push(Header::Simple(simple))
    }

    fn text(&mut self, value: &str) -> io::Result<()> {
        self.encoder.text(value, None)
    }

    fn array(&mut self, len: Option<usize>) -> io::Result<()> {
        self.encoder.push(Header::Array(len))
    }

    fn end(&mut self) -> io::Result<()> {
        self.encoder.push(Header::Break)
    }
}

fn write_model(model: &DescriptorModel, w: &mut CborWriter<'_>) -> io::Result<()> {
    w.array(None)?;
    w.text("BMF")?;
    w.uint(3u8)?;
    w.uint(1u8)?;

    let info = &model.info;
    w.int(info.size)?;
    w.flag(info.smooth)?;
    w.flag(info.unicode)?;
    w.flag(info.italic)?;
    w.flag(info.bold)?;
    w.uint(if info.unicode { 0 } else { info.charset })?;
    w.uint(info.stretch_h)?;
    w.int(info.aa)?;
    for value in [
        info.padding.up,
        info.padding.right,
        info.padding.down,
        info.padding.left,
        info.spacing.horizontal,
        info.spacing.vertical,
        info.outline,
    ] {
        w.uint(value)?;
    }

    let common = &model.common;
    w.uint(common.line_height)?;
    w.uint(common.base)?;
    w.uint(common.scale_w())?;
    w.uint(common.scale_h())?;
    w.uint(model.pages.len() as u64)?;
    w.flag(common.packed)?;
    for value in [common.alpha_chnl, common.red_chnl, common.green_chnl, common.blue_chnl] {
        w.uint(value)?;
    }

    w.array(Some(model.pages.len()))?;
    for name in &model.pages {
        w.text(name)?;
    }

    w.array(Some(model.chars.len() * CHAR_FIELDS))?;
    for c in &model.chars {
        w.uint(c.id)?;
        w.uint(c.x)?;
        w.uint(c.y)?;
        w.uint(c.width)?;
        w.uint(c.height)?;
        w.int(c.xoffset)?;
        w.int(c.yoffset)?;
        w.int(c.xadvance)?;
        w.int(c.page)?;
        w.int(c.chnl)?;
    }

    w.array(Some(model.kernings.len() * KERNING_FIELDS))?;
    for k in &model.kernings {
        w.uint(k.first)?;
        w.uint(k.second)?;
        w.int(k.amount)?;
    }

    w.end()
}

pub(super) fn encode(model: &DescriptorModel) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut writer = CborWriter::new(&mut out);
        write_model(model, &mut writer).map_err(|e| Error::encode(DataFormat::Cbor, e))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fixtures;

    #[test]
    fn test_header_and_info() {
        let bytes = encode(&fixtures::model()).unwrap();
        let expected_head = [
            0x9F, // indefinite array
            0x63, b'B', b'M', b'F', // "BMF"
            0x03, 0x01, // version, revision
            0x38, 0x1F, // size -32
            0xF5, 0xF5, 0xF4, 0xF4, // smooth, unicode, italic, bold
            0x00, // charset
            0x18, 0x64, // stretchH 100
            0x01, // aa
            0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x00, // padding, spacing, outline
        ];
        assert_eq!(&bytes[..expected_head.len()], &expected_head);
    }

    #[test]
    fn test_common_pages_and_tail() {
        let bytes = encode(&fixtures::model()).unwrap();
        let common = [
            0x18, 0x25, // lineHeight 37
            0x18, 0x1E, // base 30
            0x19, 0x01, 0x00, // scaleW 256
            0x18, 0x80, // scaleH 128
            0x02, // pages
            0xF4, // packed
            0x00, 0x04, 0x04, 0x04, // channels
            0x82, // two page names
        ];
        let start = 24;
        assert_eq!(&bytes[start..start + common.len()], &common);

        let kernings = [
            0x83, // three kerning fields
            0x18, 0x41, 0x18, 0x56, 0x21, // 65, 86, -2
            0xFF, // break
        ];
        assert!(bytes.ends_with(&kernings));
    }

    #[test]
    fn test_char_array_is_flat() {
        let bytes = encode(&fixtures::model()).unwrap();
        // Ten scalars per char, twenty in total.
        let first_char = [0x94, 0x18, 0x20, 0x00, 0x00, 0x06, 0x04, 0x23, 0x20, 0x09, 0x00, 0x0F];
        assert!(bytes.windows(first_char.len()).any(|w| w == first_char));
    }

    #[test]
    fn test_empty_model() {
        let mut model = fixtures::model();
        model.pages.clear();
        model.chars.clear();
        model.kernings.clear();
        let bytes = encode(&model).unwrap();
        assert!(bytes.ends_with(&[0x80, 0x80, 0x80, 0xFF]));
    }
}
