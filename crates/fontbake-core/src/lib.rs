//! Atlas layout and descriptor codecs for the fontbake bitmap font generator.
//!
//! This crate holds everything between the font engine and the files on disk:
//!
//! - **Glyph collection**: resolve requested code points through a primary and an
//!   optional secondary font ([`collect_glyphs`])
//! - **Layout**: pad and align glyph rectangles, then pack them onto as few texture
//!   pages as the candidate sizes allow ([`arrange_glyphs`], [`PagePlanner`])
//! - **Kerning**: kerning-table and shaping-based pair amounts ([`KerningResolver`])
//! - **Descriptors**: one [`DescriptorModel`] encoded as text, XML, binary, JSON or
//!   CBOR ([`codec::encode`])
//!
//! Font access is abstracted behind the [`FontEngine`] and [`Shaper`] traits; the
//! `fontbake-render` crate implements them on top of real font files.
//!
//! # Example
//!
//! ```ignore
//! use fontbake_core::prelude::*;
//!
//! let fonts = FontSet::new(&face);
//! let mut glyphs = collect_glyphs(&fonts, &shaper, &code_points, &features)?;
//! let pages = arrange_glyphs(&mut glyphs, &LayoutOptions::default())?;
//! let kernings = KerningResolver::new(&face, &shaper, features).resolve(&glyphs, KerningMode::Regular)?;
//! ```

pub mod codec;
pub mod collect;
pub mod descriptor;
pub mod engine;
pub mod glyph;
pub mod kerning;
pub mod layout;
pub mod logging;
pub mod naming;

mod error;

pub use error::{Error, Result};

pub use codec::DataFormat;
pub use collect::{FontSet, collect_glyphs};
pub use descriptor::{DescriptorModel, DescriptorSettings, assemble_descriptor};
pub use engine::{FontEngine, Shaper};
pub use kerning::{KerningMode, KerningResolver};
pub use layout::{LayoutOptions, PagePlanner, arrange_glyphs};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::codec::{DataFormat, check_capabilities, decode_json, encode};
    pub use crate::collect::{FontSet, collect_glyphs};
    pub use crate::descriptor::{DescriptorModel, DescriptorSettings, assemble_descriptor};
    pub use crate::engine::{
        FaceInfo, FaceMetrics, FontEngine, GlyphMetrics, KerningFit, ShapedGlyph, ShapedRun,
        Shaper, ShapingFeatures,
    };
    pub use crate::glyph::{FontSlot, GlyphKey, GlyphRecord, GlyphTable};
    pub use crate::kerning::{KerningMode, KerningPair, KerningResolver};
    pub use crate::layout::{
        Alignment, LayoutOptions, Padding, PageSize, PagePlanner, Spacing, arrange_glyphs,
        default_texture_sizes,
    };
    pub use crate::naming::{TextureNameSuffix, ensure_unique_names, texture_file_names};
    pub use crate::{Error, Result};
}
