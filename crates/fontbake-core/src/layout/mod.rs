//! Texture atlas layout: glyph rectangles, bin packing and page planning.
//!
//! [`arrange_glyphs`] runs the whole layout phase: it turns the non-empty glyphs
//! into aligned rectangles and lets the [`PagePlanner`] distribute them over as
//! many pages as needed, writing each glyph's page and position back into the
//! glyph table.

mod packer;
mod planner;
mod rect;

pub use packer::{BinPacker, MaxRectsPacker, PlacedRect};
pub use planner::{PagePlanner, PlanState};
pub use rect::{Rectangle, prepare_rectangles};

use crate::error::Result;
use crate::glyph::GlyphTable;

/// Empty border around each glyph bitmap, part of the glyph's descriptor rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Padding {
    pub up: u32,
    pub right: u32,
    pub down: u32,
    pub left: u32,
}

impl Padding {
    /// Padding added to the width.
    #[inline]
    pub fn horizontal(&self) -> u32 {
        self.left + self.right
    }

    /// Padding added to the height.
    #[inline]
    pub fn vertical(&self) -> u32 {
        self.up + self.down
    }
}

/// Gap kept between neighbouring glyphs and along the top and left page edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spacing {
    pub horizontal: u32,
    pub vertical: u32,
}

/// Grid that glyph rectangle sizes are rounded up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub horizontal: u32,
    pub vertical: u32,
}

impl Default for Alignment {
    fn default() -> Self {
        Self {
            horizontal: 1,
            vertical: 1,
        }
    }
}

/// Size of a texture page in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    /// Create a page size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The built-in list of candidate texture sizes, 32x32 up to 8192x8192.
///
/// Each step doubles the width, then the height.
pub fn default_texture_sizes() -> Vec<PageSize> {
    let mut sizes = vec![PageSize::new(32, 32)];
    while let Some(&last) = sizes.last() {
        if last.width == 8192 && last.height == 8192 {
            break;
        }
        let next = if last.width == last.height {
            PageSize::new(last.width * 2, last.height)
        } else {
            PageSize::new(last.width, last.height * 2)
        };
        sizes.push(next);
    }
    sizes
}

/// Everything the layout phase needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutOptions {
    pub padding: Padding,
    pub spacing: Spacing,
    pub alignment: Alignment,
    /// Candidate page sizes, smallest first.
    pub texture_sizes: Vec<PageSize>,
    /// Shrink each page's width to the placed glyphs.
    pub crop_width: bool,
    /// Shrink each page's height to the placed glyphs.
    pub crop_height: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            spacing: Spacing::default(),
            alignment: Alignment::default(),
            texture_sizes: default_texture_sizes(),
            crop_width: false,
            crop_height: false,
        }
    }
}

/// Pack every non-empty glyph onto pages and return the page sizes in order.
pub fn arrange_glyphs(glyphs: &mut GlyphTable, options: &LayoutOptions) -> Result<Vec<PageSize>> {
    let extra_width = options.spacing.horizontal + options.padding.horizontal();
    let extra_height = options.spacing.vertical + options.padding.vertical();
    let rectangles = prepare_rectangles(glyphs, extra_width, extra_height, options.alignment);

    let mut planner = PagePlanner::new(options.texture_sizes.clone(), options.spacing)
        .crop(options.crop_width, options.crop_height);
    planner.plan(rectangles, glyphs)
}
