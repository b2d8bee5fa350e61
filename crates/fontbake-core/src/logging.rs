//! Logging facilities for fontbake.
//!
//! All crates in the workspace emit events through the `tracing` crate. Install a
//! subscriber in the application to see them:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("fontbake::kerning=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Glyph collection and shaping target.
    pub const GLYPHS: &str = "fontbake::glyphs";
    /// Rectangle preparation and page planning target.
    pub const LAYOUT: &str = "fontbake::layout";
    /// Kerning resolution target.
    pub const KERNING: &str = "fontbake::kerning";
    /// Descriptor assembly and encoding target.
    pub const CODEC: &str = "fontbake::codec";
    /// Glyph rasterization and texture encoding target.
    pub const RENDER: &str = "fontbake::render";
    /// Application driver target.
    pub const APP: &str = "fontbake::app";
}
