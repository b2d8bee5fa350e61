//! Font access and texture rendering for fontbake.
//!
//! This crate backs the engine traits of `fontbake-core` with real font files:
//!
//! - **Fonts**: [`FontFace`] parses a face with ttf-parser and rasterizes glyphs with swash
//! - **Shaping**: [`HarfShaper`] shapes runs with rustybuzz for ligature detection and
//!   extended kerning
//! - **Textures**: [`render_pages`] draws glyph coverage onto pages and [`encode_png`]
//!   turns composited pages into PNG files
//!
//! # Example
//!
//! ```ignore
//! use fontbake_render::prelude::*;
//!
//! let face = FontFace::from_bytes(std::fs::read("font.ttf")?, 0, FontOptions::default())?;
//! let shaper = HarfShaper::new(&face)?;
//! let pages = render_pages(&glyphs, &sizes, GlyphSources::new(&face), padding)?;
//! let png = encode_png(&pages[0].compose(&TextureStyle::default()))?;
//! ```

pub mod font;
pub mod shaping;
pub mod texture;

mod error;

pub use error::{RenderError, RenderResult};

pub use font::{FontFace, FontOptions, GlyphBitmap, GlyphRasterizer, Hinting};
pub use shaping::HarfShaper;
pub use texture::{Color, CoveragePage, GlyphSources, TextureStyle, encode_png, render_pages};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::font::{FontFace, FontOptions, GlyphBitmap, GlyphRasterizer, Hinting};
    pub use crate::shaping::HarfShaper;
    pub use crate::texture::{
        Color, CoveragePage, GlyphSources, TextureStyle, encode_png, render_pages,
    };
    pub use crate::{RenderError, RenderResult};
}
