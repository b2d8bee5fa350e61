//! XML format with a `font` root element.

use std::io;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::DataFormat;
use crate::descriptor::DescriptorModel;
use crate::error::{Error, Result};

type Attributes = Vec<(&'static str, String)>;

pub(super) fn encode(model: &DescriptorModel) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    write_document(model, &mut writer).map_err(|e| Error::encode(DataFormat::Xml, e))?;
    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn element(name: &str, attributes: &Attributes) -> BytesStart<'static> {
    let mut start = BytesStart::new(name.to_string());
    for (key, value) in attributes {
        start.push_attribute((*key, value.as_str()));
    }
    start
}

fn write_empty(writer: &mut Writer<Vec<u8>>, name: &str, attributes: &Attributes) -> io::Result<()> {
    writer.write_event(Event::Empty(element(name, attributes)))
}

/// Write a container element; it self-closes when there are no children.
fn write_container(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    attributes: &Attributes,
    children: &[(&str, Attributes)],
) -> io::Result<()> {
    if children.is_empty() {
        return write_empty(writer, name, attributes);
    }
    writer.write_event(Event::Start(element(name, attributes)))?;
    for (child, child_attributes) in children {
        write_empty(writer, child, child_attributes)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn flag(value: bool) -> String {
    u8::from(value).to_string()
}

fn write_document(model: &DescriptorModel, writer: &mut Writer<Vec<u8>>) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;
    writer.write_event(Event::Start(BytesStart::new("font")))?;

    let info = &model.info;
    let padding = &info.padding;
    let mut info_attributes: Attributes = vec![
        ("face", info.face.clone()),
        ("size", info.size.to_string()),
        ("bold", flag(info.bold)),
        ("italic", flag(info.italic)),
        ("charset", info.charset_name()),
        ("unicode", flag(info.unicode)),
        ("stretchH", info.stretch_h.to_string()),
        ("smooth", flag(info.smooth)),
        ("aa", info.aa.to_string()),
        ("padding", format!("{},{},{},{}", padding.up, padding.right, padding.down, padding.left)),
        ("spacing", format!("{},{}", info.spacing.horizontal, info.spacing.vertical)),
        ("outline", info.outline.to_string()),
    ];
    if model.extra_info {
        info_attributes.push(("style", info.style.clone()));
    }
    write_empty(writer, "info", &info_attributes)?;

    let common = &model.common;
    let mut common_attributes: Attributes = vec![
        ("lineHeight", common.line_height.to_string()),
        ("base", common.base.to_string()),
        ("scaleW", common.scale_w().to_string()),
        ("scaleH", common.scale_h().to_string()),
        ("pages", model.pages.len().to_string()),
        ("packed", flag(common.packed)),
        ("alphaChnl", common.alpha_chnl.to_string()),
        ("redChnl", common.red_chnl.to_string()),
        ("greenChnl", common.green_chnl.to_string()),
        ("blueChnl", common.blue_chnl.to_string()),
    ];
    if model.extra_info {
        common_attributes.push(("totalHeight", common.total_height.to_string()));
        common_attributes.push(("descent", common.descent.to_string()));
    }
    write_empty(writer, "common", &common_attributes)?;

    let pages: Vec<(&str, Attributes)> = model
        .pages
        .iter()
        .enumerate()
        .map(|(id, file)| ("page", vec![("id", id.to_string()), ("file", file.clone())]))
        .collect();
    write_container(writer, "pages", &Vec::new(), &pages)?;

    let chars: Vec<(&str, Attributes)> = model
        .chars
        .iter()
        .map(|c| {
            let attributes = vec![
                ("id", c.id.to_string()),
                ("x", c.x.to_string()),
                ("y", c.y.to_string()),
                ("width", c.width.to_string()),
                ("height", c.height.to_string()),
                ("xoffset", c.xoffset.to_string()),
                ("yoffset", c.yoffset.to_string()),
                ("xadvance", c.xadvance.to_string()),
                ("page", c.page.to_string()),
                ("chnl", c.chnl.to_string()),
            ];
            ("char", attributes)
        })
        .collect();
    write_container(writer, "chars", &vec![("count", chars.len().to_string())], &chars)?;

    let kernings: Vec<(&str, Attributes)> = model
        .kernings
        .iter()
        .map(|k| {
            let attributes = vec![
                ("first", k.first.to_string()),
                ("second", k.second.to_string()),
                ("amount", k.amount.to_string()),
            ];
            ("kerning", attributes)
        })
        .collect();
    write_container(writer, "kernings", &vec![("count", kernings.len().to_string())], &kernings)?;

    writer.write_event(Event::End(BytesEnd::new("font")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fixtures;

    fn encode_str(model: &DescriptorModel) -> String {
        String::from_utf8(encode(model).unwrap()).unwrap()
    }

    #[test]
    fn test_document_layout() {
        let xml = encode_str(&fixtures::model());
        let expected = r#"<?xml version="1.0"?>
<font>
    <info face="Test Sans" size="-32" bold="0" italic="0" charset="" unicode="1" stretchH="100" smooth="1" aa="1" padding="1,2,3,4" spacing="5,6" outline="0"/>
    <common lineHeight="37" base="30" scaleW="256" scaleH="128" pages="2" packed="0" alphaChnl="0" redChnl="4" greenChnl="4" blueChnl="4"/>
    <pages>
        <page id="0" file="font_0.png"/>
        <page id="1" file="font_1.png"/>
    </pages>
    <chars count="2">
        <char id="32" x="0" y="0" width="6" height="4" xoffset="-4" yoffset="-1" xadvance="9" page="0" chnl="15"/>
        <char id="65" x="5" y="6" width="20" height="28" xoffset="-3" yoffset="2" xadvance="19" page="1" chnl="15"/>
    </chars>
    <kernings count="1">
        <kerning first="65" second="86" amount="-2"/>
    </kernings>
</font>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_extra_info_writes_descent_attribute() {
        let mut model = fixtures::model();
        model.extra_info = true;
        let xml = encode_str(&model);
        assert!(xml.contains(r#"outline="0" style="Regular"/>"#));
        assert!(xml.contains(r#"base="30""#));
        assert!(xml.contains(r#"blueChnl="4" totalHeight="40" descent="-8"/>"#));
    }

    #[test]
    fn test_empty_sections_self_close() {
        let mut model = fixtures::model();
        model.kernings.clear();
        model.pages.clear();
        let xml = encode_str(&model);
        assert!(xml.contains("    <pages/>\n"));
        assert!(xml.contains(r#"    <kernings count="0"/>"#));
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut model = fixtures::model();
        model.info.face = "A & \"B\"".to_string();
        let xml = encode_str(&model);
        assert!(xml.contains(r#"face="A &amp; &quot;B&quot;""#));
    }
}
