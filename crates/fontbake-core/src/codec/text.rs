//! Plain text format: one `key=value` record per line.

use std::fmt::{self, Write};

use super::DataFormat;
use crate::descriptor::DescriptorModel;
use crate::error::{Error, Result};

pub(super) fn encode(model: &DescriptorModel) -> Result<String> {
    let mut out = String::new();
    write_model(model, &mut out).map_err(|e| Error::encode(DataFormat::Text, e))?;
    Ok(out)
}

fn write_model(model: &DescriptorModel, out: &mut String) -> fmt::Result {
    let info = &model.info;
    let padding = &info.padding;
    write!(
        out,
        "info face=\"{}\" size={} bold={} italic={} charset=\"{}\" unicode={} stretchH={} smooth={} aa={} padding={},{},{},{} spacing={},{} outline={}",
        info.face,
        info.size,
        u8::from(info.bold),
        u8::from(info.italic),
        info.charset_name(),
        u8::from(info.unicode),
        info.stretch_h,
        u8::from(info.smooth),
        info.aa,
        padding.up,
        padding.right,
        padding.down,
        padding.left,
        info.spacing.horizontal,
        info.spacing.vertical,
        info.outline,
    )?;
    if model.extra_info {
        write!(out, " style=\"{}\"", info.style)?;
    }
    out.push('\n');

    let common = &model.common;
    write!(
        out,
        "common lineHeight={} base={} scaleW={} scaleH={} pages={} packed={} alphaChnl={} redChnl={} greenChnl={} blueChnl={}",
        common.line_height,
        common.base,
        common.scale_w(),
        common.scale_h(),
        model.pages.len(),
        u8::from(common.packed),
        common.alpha_chnl,
        common.red_chnl,
        common.green_chnl,
        common.blue_chnl,
    )?;
    if model.extra_info {
        write!(out, " totalHeight={} descent={}", common.total_height, common.descent)?;
    }
    out.push('\n');

    for (id, file) in model.pages.iter().enumerate() {
        writeln!(out, "page id={id} file=\"{file}\"")?;
    }

    writeln!(out, "chars count={}", model.chars.len())?;
    for c in &model.chars {
        writeln!(
            out,
            "char id={:<4} x={:<5} y={:<5} width={:<5} height={:<5} xoffset={:<5} yoffset={:<5} xadvance={:<5} page={:<2} chnl={:<2}",
            c.id, c.x, c.y, c.width, c.height, c.xoffset, c.yoffset, c.xadvance, c.page, c.chnl,
        )?;
    }

    if !model.kernings.is_empty() {
        writeln!(out, "kernings count={}", model.kernings.len())?;
        for k in &model.kernings {
            writeln!(out, "kerning first={} second={} amount={}", k.first, k.second, k.amount)?;
        }
    }

    Ok(())
}
