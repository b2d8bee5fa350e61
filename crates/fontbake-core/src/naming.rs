//! Texture page file names.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the page index is appended to the output name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureNameSuffix {
    /// `_NN`, zero-padded to the width of the last page index.
    #[default]
    IndexAligned,
    /// `_N` without padding.
    Index,
    /// No suffix; only valid for a single page.
    None,
}

impl TextureNameSuffix {
    pub const ALL: [Self; 3] = [Self::IndexAligned, Self::Index, Self::None];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IndexAligned => "index_aligned",
            Self::Index => "index",
            Self::None => "none",
        }
    }
}

impl fmt::Display for TextureNameSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TextureNameSuffix {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|suffix| suffix.as_str() == s)
            .ok_or_else(|| format!("unknown texture name suffix '{s}'"))
    }
}

fn digit_count(mut value: usize) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

/// File name of one page, e.g. `font_07.png`.
pub fn texture_file_name(
    stem: &str,
    page: usize,
    page_count: usize,
    suffix: TextureNameSuffix,
) -> String {
    match suffix {
        TextureNameSuffix::IndexAligned => {
            let width = digit_count(page_count.saturating_sub(1));
            format!("{stem}_{page:0width$}.png")
        }
        TextureNameSuffix::Index => format!("{stem}_{page}.png"),
        TextureNameSuffix::None => format!("{stem}.png"),
    }
}

/// File names of all pages, in page order.
pub fn texture_file_names(stem: &str, page_count: usize, suffix: TextureNameSuffix) -> Vec<String> {
    (0..page_count)
        .map(|page| texture_file_name(stem, page, page_count, suffix))
        .collect()
}

/// Fail on the first name that occurs twice.
pub fn ensure_unique_names(names: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(Error::DuplicatePageName { name: name.clone() });
        }
    }
    Ok(())
}
