//! Error type of the command line application.

use std::io;
use std::path::{Path, PathBuf};

use fontbake_render::RenderError;
use thiserror::Error;

/// Result type alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum AppError {
    /// Options are missing, malformed or contradict each other.
    #[error("{0}")]
    Config(String),

    /// The option file is not valid TOML or has unknown keys.
    #[error("invalid option file '{path}': {source}")]
    OptionFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// An input file could not be read.
    #[error("can't read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output file could not be written.
    #[error("can't write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Core(#[from] fontbake_core::Error),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}
