//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Settings file and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("cannot read settings '{path}': {source}")]
    ReadFile {
        /// Settings path.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Settings file could not be written.
    #[error("cannot write settings '{path}': {source}")]
    WriteFile {
        /// Settings path.
        path: PathBuf,
        /// I/O cause.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML or a value of the wrong type.
    #[error("settings TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML.
    #[error("settings TOML output: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// `[filter] window` is not one of the supported windows.
    #[error("unknown window '{0}' (expected hann, hamming, blackman or rectangular)")]
    UnknownWindow(String),

    /// Geometry or steering values out of range.
    #[error("invalid settings: {0}")]
    Invalid(#[from] quadra_core::Error),
}

impl ConfigError {
    /// `ReadFile` for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// `WriteFile` for `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }
}
