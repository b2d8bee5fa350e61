//! Command line bitmap font generator.
//!
//! Renders the requested characters of a font onto texture pages and writes a
//! BMFont-compatible descriptor in text, XML, binary, JSON or CBOR form.
//!
//! - [`cli::Options`]: command line and option file parsing
//! - [`Config`]: validated settings
//! - [`app::generate`] / [`app::run`]: the pipeline
//! - [`output::AtomicWriter`]: all-or-nothing file output

pub mod app;
pub mod cli;
pub mod config;
pub mod output;

mod error;

pub use app::{Artifacts, Engines, FontSource, generate, run};
pub use cli::Options;
pub use config::Config;
pub use error::{AppError, AppResult};
